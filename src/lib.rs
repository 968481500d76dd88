//! Regionkit: region filtering and annotation for raster images.
//!
//! Regionkit blacks out or blurs rectangular regions, draws bounding boxes
//! with class/confidence labels, stacks text in an image corner, and encodes
//! frame directories to GIF or MP4.
//!
//! # Modules
//!
//! - [`color`]: hex colors and channel order
//! - [`geometry`]: float boxes and the pixel spans they cover
//! - [`filter`]: black/blur region filter
//! - [`annotate`]: box outlines, labels and text overlays
//! - [`frame_io`]: image reading, sorted directories, auto-indexed saving
//! - [`video`]: frame sequence encoding
//! - [`validation`]: region checks and reports
//! - [`config`]: JSON/YAML tool configuration
//! - [`error`]: error types for regionkit operations

pub mod annotate;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame_io;
pub mod geometry;
pub mod validation;
pub mod video;

#[cfg(test)]
mod test_utils;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use image::RgbImage;
use log::{info, warn};

use annotate::{Corner, FontRenderer, LabeledBox, TextLocation};
use color::{swap_red_blue, Color};
use config::{load_config, ToolConfig};
use filter::FilterMode;
use geometry::BBox;
use validation::ValidationReport;
use video::{Container, VideoOptions, VideoWriter};

pub use error::RegionKitError;

/// The regionkit CLI application.
#[derive(Parser)]
#[command(name = "regionkit")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Black out or blur rectangular regions of an image.
    Filter(FilterArgs),
    /// Draw box outlines.
    Boxes(BoxesArgs),
    /// Draw boxes with "label: confidence" tags from a detections file.
    Annotate(AnnotateArgs),
    /// Stack lines of text in an image corner.
    Overlay(OverlayArgs),
    /// Encode a directory of frames to GIF or MP4.
    Encode(EncodeArgs),
}

/// Input/output options shared by the image subcommands.
#[derive(clap::Args)]
struct ImageIo {
    /// Input image.
    input: PathBuf,

    /// Output image; the encoder is chosen from the extension.
    output: PathBuf,

    /// Write to OUTPUT's first free `{stem}_{i}` variant instead.
    #[arg(long)]
    auto_index: bool,

    /// JSON or YAML file with default styles.
    #[arg(long, env = "REGIONKIT_CONFIG")]
    config: Option<PathBuf>,
}

/// Arguments for the filter subcommand.
#[derive(clap::Args)]
struct FilterArgs {
    #[command(flatten)]
    io: ImageIo,

    /// Region as `x1,y1,x2,y2`; repeat for more regions.
    #[arg(long = "region", value_name = "X1,Y1,X2,Y2", allow_hyphen_values = true)]
    regions: Vec<BBox>,

    /// Replacement for region pixels ('black' or 'blur').
    #[arg(long)]
    mode: Option<FilterMode>,

    /// Blur kernel size; even values are rounded up.
    #[arg(long)]
    blur_radius: Option<u32>,

    /// Outline thickness around each region (0 for none).
    #[arg(long)]
    border_thickness: Option<u32>,

    /// Outline color as hex, e.g. '#ff0000'.
    #[arg(long)]
    border_color: Option<Color>,

    /// Fail on validation warnings too.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the boxes subcommand.
#[derive(clap::Args)]
struct BoxesArgs {
    #[command(flatten)]
    io: ImageIo,

    /// Box as `x1,y1,x2,y2`; repeat for more boxes.
    #[arg(long = "region", value_name = "X1,Y1,X2,Y2", allow_hyphen_values = true)]
    regions: Vec<BBox>,

    /// Outline thickness in pixels.
    #[arg(long)]
    thickness: Option<u32>,

    /// Outline color as hex.
    #[arg(long)]
    color: Option<Color>,

    /// Fail on validation warnings too.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the annotate subcommand.
#[derive(clap::Args)]
struct AnnotateArgs {
    #[command(flatten)]
    io: ImageIo,

    /// JSON array of `{"bbox": {...}, "label": ..., "confidence": ...}`.
    #[arg(long)]
    detections: PathBuf,

    /// TrueType/OpenType font file.
    #[arg(long)]
    font: PathBuf,

    /// Tag placement ('above' or 'below').
    #[arg(long)]
    location: Option<TextLocation>,

    /// Fail on validation warnings too.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the overlay subcommand.
#[derive(clap::Args)]
struct OverlayArgs {
    #[command(flatten)]
    io: ImageIo,

    /// Line of text; repeat for more lines, drawn top to bottom.
    #[arg(long = "text", required = true)]
    lines: Vec<String>,

    /// TrueType/OpenType font file.
    #[arg(long)]
    font: PathBuf,

    /// Anchor corner ('upper_left', 'upper_right', 'lower_left', 'lower_right').
    #[arg(long)]
    corner: Option<Corner>,

    /// Text scale; 1.0 is about 30 pixels tall.
    #[arg(long)]
    font_scale: Option<f32>,
}

/// Arguments for the encode subcommand.
#[derive(clap::Args)]
struct EncodeArgs {
    /// Directory of png/jpg frames, read in natural name order.
    frames: PathBuf,

    /// Directory the video is written to; created if missing.
    output_dir: PathBuf,

    /// Video file name; the container extension is added if missing.
    name: String,

    /// Output container ('mp4' or 'gif').
    #[arg(long, default_value = "mp4")]
    container: Container,

    /// Frames per second.
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// ffmpeg codec for MP4 output.
    #[arg(long, default_value = "libx264")]
    codec: String,
}

/// Run the regionkit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RegionKitError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Filter(args)) => run_filter(args),
        Some(Commands::Boxes(args)) => run_boxes(args),
        Some(Commands::Annotate(args)) => run_annotate(args),
        Some(Commands::Overlay(args)) => run_overlay(args),
        Some(Commands::Encode(args)) => run_encode(args),
        None => {
            println!("regionkit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Region filtering and annotation for raster images.");
            println!();
            println!("Run 'regionkit --help' for usage information.");
            Ok(())
        }
    }
}

fn tool_config(path: Option<&Path>) -> Result<ToolConfig, RegionKitError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ToolConfig::default()),
    }
}

/// Reads the input and returns it in drawing (blue, green, red) order.
fn read_for_drawing(path: &Path) -> Result<RgbImage, RegionKitError> {
    Ok(swap_red_blue(&frame_io::read_rgb(path)?))
}

/// Converts a drawing-order result back to RGB and saves it.
fn save_drawn(image: &RgbImage, io: &ImageIo) -> Result<(), RegionKitError> {
    let written = frame_io::save_image(&swap_red_blue(image), &io.output, io.auto_index)?;
    println!("Wrote {}", written.display());
    Ok(())
}

/// Logs warnings and fails on errors, or on warnings when `strict`.
fn check_report(report: ValidationReport, strict: bool) -> Result<(), RegionKitError> {
    for issue in &report.issues {
        warn!("{}", issue);
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (strict && has_warnings) {
        eprint!("{}", report);
        Err(RegionKitError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the filter subcommand.
fn run_filter(args: FilterArgs) -> Result<(), RegionKitError> {
    let mut options = tool_config(args.io.config.as_deref())?.filter;
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(radius) = args.blur_radius {
        options.blur_radius = radius;
    }
    if let Some(thickness) = args.border_thickness {
        options.border_thickness = thickness;
    }
    if let Some(color) = args.border_color {
        options.border_color = color;
    }

    let image = read_for_drawing(&args.io.input)?;
    let (width, height) = image.dimensions();
    check_report(
        validation::validate_regions(&args.regions, width, height),
        args.strict,
    )?;

    info!(
        "filtering {} region(s) of {} with {}",
        args.regions.len(),
        args.io.input.display(),
        options.mode
    );
    let out = filter::filter_regions(&image, &args.regions, &options)?;
    save_drawn(&out, &args.io)
}

/// Execute the boxes subcommand.
fn run_boxes(args: BoxesArgs) -> Result<(), RegionKitError> {
    let mut style = tool_config(args.io.config.as_deref())?.boxes;
    if let Some(thickness) = args.thickness {
        style.thickness = thickness;
    }
    if let Some(color) = args.color {
        style.color = color;
    }

    let image = read_for_drawing(&args.io.input)?;
    let (width, height) = image.dimensions();
    check_report(
        validation::validate_regions(&args.regions, width, height),
        args.strict,
    )?;

    let out = annotate::draw_boxes(&image, &args.regions, &style)?;
    save_drawn(&out, &args.io)
}

fn read_detections(path: &Path) -> Result<Vec<LabeledBox>, RegionKitError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| RegionKitError::InvalidDetections {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Execute the annotate subcommand.
fn run_annotate(args: AnnotateArgs) -> Result<(), RegionKitError> {
    let config = tool_config(args.io.config.as_deref())?;
    let mut label_style = config.labels;
    if let Some(location) = args.location {
        label_style.location = location;
    }

    let detections = read_detections(&args.detections)?;
    let renderer = FontRenderer::from_file(&args.font)?;
    let image = read_for_drawing(&args.io.input)?;
    let (width, height) = image.dimensions();

    let boxes: Vec<BBox> = detections.iter().map(|d| d.bbox).collect();
    check_report(
        validation::validate_annotations(
            &boxes,
            detections.len(),
            detections.len(),
            width,
            height,
        ),
        args.strict,
    )?;

    let out = annotate::draw_annotated_boxes(
        &image,
        &detections,
        &renderer,
        &config.boxes,
        &label_style,
    )?;
    save_drawn(&out, &args.io)
}

/// Execute the overlay subcommand.
fn run_overlay(args: OverlayArgs) -> Result<(), RegionKitError> {
    let overlay = tool_config(args.io.config.as_deref())?.overlay;
    let corner = args.corner.unwrap_or(overlay.corner);
    let style = match args.font_scale {
        Some(scale) => annotate::OverlayStyle {
            color: overlay.style.color,
            line_spacing: overlay.style.line_spacing,
            ..annotate::OverlayStyle::with_font_scale(scale)
        },
        None => overlay.style,
    };

    let renderer = FontRenderer::from_file(&args.font)?;
    let image = read_for_drawing(&args.io.input)?;

    // overlay_text hands back display order, so it saves directly.
    let (_, written) = annotate::overlay_text_to_file(
        &image,
        &args.lines,
        corner,
        &renderer,
        &style,
        &args.io.output,
        args.io.auto_index,
    )?;
    println!("Wrote {}", written.display());
    Ok(())
}

/// Execute the encode subcommand.
fn run_encode(args: EncodeArgs) -> Result<(), RegionKitError> {
    let options = VideoOptions {
        container: args.container,
        frame_rate: args.fps,
        codec: args.codec,
    };

    let writer =
        VideoWriter::new(&args.output_dir, &args.name, options)?.with_frames_from_dir(&args.frames)?;
    info!(
        "encoding {} frame(s) from {}",
        writer.frame_count(),
        args.frames.display()
    );
    let written = writer.write()?;
    println!("Wrote {}", written.display());
    Ok(())
}
