//! Findings from region validation.
//!
//! A report is a flat list of issues. Errors mean drawing would be
//! meaningless; warnings describe inputs that still have a defined outcome.

use std::fmt;

#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// No errors; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// No issues of any severity.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues attached to the region at `index`.
    pub fn for_region(&self, index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |i| matches!(i.context, IssueContext::Region { index: at } if at == index))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "All regions valid");
        }

        writeln!(
            f,
            "{} error(s), {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Stable identifier, printed with `{:?}`.
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(f, "{severity} {}: {:?}: {}", self.context, self.code, self.message)
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Drawing still has a defined outcome (clipping, no-op).
    Warning,
    /// Drawing would be meaningless.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A region has non-finite coordinates (NaN or Infinity).
    RegionNotFinite,
    /// A region's corners are given max-first.
    RegionUnordered,
    /// A region covers no pixels once cast to integers.
    RegionZeroArea,
    /// A region extends outside the image and will be clipped.
    RegionOutOfBounds,
    /// Boxes, labels and confidences have different lengths.
    LabelCountMismatch,
}

/// Context about where a validation issue occurred.
#[derive(Clone, Debug)]
pub enum IssueContext {
    /// Issue with the inputs as a whole.
    Image,
    /// Issue with the region at this position in the input slice.
    Region { index: usize },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Image => write!(f, "image"),
            IssueContext::Region { index } => write!(f, "region {}", index),
        }
    }
}
