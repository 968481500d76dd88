//! Region validation for regionkit.
//!
//! Drawing never refuses a box just because it is unordered, empty or out of
//! bounds: those cases have a defined outcome. This module reports them so
//! callers (and the CLI's `--strict` mode) can decide what to do.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::geometry::BBox;

/// Validates regions against a `width` x `height` image.
///
/// Non-finite coordinates are errors. Unordered corners, zero-area boxes and
/// boxes extending outside the image are warnings.
pub fn validate_regions(regions: &[BBox], width: u32, height: u32) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (index, bbox) in regions.iter().enumerate() {
        let context = IssueContext::Region { index };

        if !bbox.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::RegionNotFinite,
                format!(
                    "Non-finite coordinates ({}, {}, {}, {})",
                    bbox.x1, bbox.y1, bbox.x2, bbox.y2
                ),
                context,
            ));
            continue; // Skip further checks if coordinates are invalid
        }

        if !bbox.is_ordered() {
            report.add(ValidationIssue::warning(
                IssueCode::RegionUnordered,
                format!(
                    "Corners given max-first: ({}, {}) -> ({}, {})",
                    bbox.x1, bbox.y1, bbox.x2, bbox.y2
                ),
                context.clone(),
            ));
        }

        let Some(span) = bbox.to_span() else {
            report.add(ValidationIssue::warning(
                IssueCode::RegionZeroArea,
                "Region covers no pixels",
                context,
            ));
            continue;
        };

        if span.x0 < 0 || span.y0 < 0 || span.x1 >= width as i64 || span.y1 >= height as i64 {
            report.add(ValidationIssue::warning(
                IssueCode::RegionOutOfBounds,
                format!(
                    "Region ({}, {}, {}, {}) extends outside image bounds (0, 0, {}, {})",
                    span.x0,
                    span.y0,
                    span.x1,
                    span.y1,
                    width.saturating_sub(1),
                    height.saturating_sub(1)
                ),
                context,
            ));
        }
    }

    report
}

/// Validates labeled regions: the region checks plus equal array lengths.
pub fn validate_annotations(
    regions: &[BBox],
    label_count: usize,
    confidence_count: usize,
    width: u32,
    height: u32,
) -> ValidationReport {
    let mut report = validate_regions(regions, width, height);

    if regions.len() != label_count || regions.len() != confidence_count {
        report.add(ValidationIssue::error(
            IssueCode::LabelCountMismatch,
            format!(
                "{} box(es), {} label(s), {} confidence(s)",
                regions.len(),
                label_count,
                confidence_count
            ),
            IssueContext::Image,
        ));
    }

    report
}
