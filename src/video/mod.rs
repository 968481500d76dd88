//! Encoding frame sequences to animated GIF or MP4.
//!
//! GIF is encoded in-process with the `image` crate. MP4 is encoded by
//! piping raw RGB frames into an `ffmpeg` child process, which must be on
//! `PATH`.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::RegionKitError;
use crate::frame_io::read_images_sorted;

/// Output container for a [`VideoWriter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    #[default]
    Mp4,
    Gif,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Gif => "gif",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Container {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "gif" => Ok(Container::Gif),
            _ => Err(RegionKitError::UnsupportedFormat(format!(
                "'{}' (supported: mp4, gif)",
                s
            ))),
        }
    }
}

/// Encoding settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub container: Container,
    /// Frames per second.
    pub frame_rate: u32,
    /// ffmpeg video codec; only used for MP4.
    pub codec: String,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            container: Container::Mp4,
            frame_rate: 20,
            codec: "libx264".to_string(),
        }
    }
}

/// Collects frames and writes them out as one video file.
#[derive(Debug)]
pub struct VideoWriter {
    output_path: PathBuf,
    options: VideoOptions,
    frames: Vec<DynamicImage>,
}

impl VideoWriter {
    /// Creates a writer for `save_dir/file_name`, creating `save_dir`.
    ///
    /// The container's extension is appended unless `file_name` already
    /// ends in `.mp4` or `.gif`.
    pub fn new(
        save_dir: &Path,
        file_name: &str,
        options: VideoOptions,
    ) -> Result<Self, RegionKitError> {
        if options.frame_rate == 0 {
            return Err(RegionKitError::Encoder("frame rate must be positive".to_string()));
        }
        fs::create_dir_all(save_dir).map_err(RegionKitError::Io)?;

        let file_name = if file_name.ends_with(".mp4") || file_name.ends_with(".gif") {
            file_name.to_string()
        } else {
            format!("{}.{}", file_name, options.container.extension())
        };

        Ok(Self {
            output_path: save_dir.join(file_name),
            options,
            frames: Vec::new(),
        })
    }

    /// Preloads every image in `dir`, in natural file-name order.
    pub fn with_frames_from_dir(mut self, dir: &Path) -> Result<Self, RegionKitError> {
        let frames = read_images_sorted(dir)?;
        debug!("loaded {} frame(s) from {}", frames.len(), dir.display());
        self.frames
            .extend(frames.into_iter().map(DynamicImage::ImageRgb8));
        Ok(self)
    }

    /// The file [`write`](Self::write) will produce.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Appends one frame. Any pixel type is accepted; frames are converted
    /// to 8-bit RGB when written.
    pub fn add_frame(&mut self, frame: impl Into<DynamicImage>) {
        self.frames.push(frame.into());
    }

    /// Replaces the collected frames with `frames` and writes them.
    pub fn write_frames(mut self, frames: Vec<DynamicImage>) -> Result<PathBuf, RegionKitError> {
        self.frames = frames;
        self.write()
    }

    /// Encodes the collected frames and returns the output path.
    ///
    /// # Errors
    ///
    /// * [`RegionKitError::EmptyFrameSequence`] - no frames were added
    /// * [`RegionKitError::FrameSizeMismatch`] - frames differ in size
    /// * [`RegionKitError::Encoder`] - the encoder failed
    pub fn write(self) -> Result<PathBuf, RegionKitError> {
        let frames = coerce_frames(&self.frames)?;

        match self.options.container {
            Container::Gif => write_gif(&self.output_path, &frames, self.options.frame_rate)?,
            Container::Mp4 => write_mp4(&self.output_path, &frames, &self.options)?,
        }

        info!(
            "wrote {} frame(s) at {} fps to {}",
            frames.len(),
            self.options.frame_rate,
            self.output_path.display()
        );
        Ok(self.output_path)
    }
}

/// Converts every frame to 8-bit RGB and checks they share one size.
fn coerce_frames(frames: &[DynamicImage]) -> Result<Vec<RgbImage>, RegionKitError> {
    let Some(first) = frames.first() else {
        return Err(RegionKitError::EmptyFrameSequence);
    };
    let expected = (first.width(), first.height());

    frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let actual = (frame.width(), frame.height());
            if actual != expected {
                return Err(RegionKitError::FrameSizeMismatch {
                    index,
                    expected,
                    actual,
                });
            }
            Ok(frame.to_rgb8())
        })
        .collect()
}

fn write_gif(path: &Path, frames: &[RgbImage], frame_rate: u32) -> Result<(), RegionKitError> {
    let file = File::create(path).map_err(RegionKitError::Io)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| RegionKitError::Encoder(e.to_string()))?;

    let delay = Delay::from_numer_denom_ms(1000, frame_rate);
    let gif_frames = frames.iter().map(|frame| {
        let rgba = DynamicImage::ImageRgb8(frame.clone()).to_rgba8();
        Frame::from_parts(rgba, 0, 0, delay)
    });
    encoder
        .encode_frames(gif_frames)
        .map_err(|e| RegionKitError::Encoder(e.to_string()))
}

fn write_mp4(path: &Path, frames: &[RgbImage], options: &VideoOptions) -> Result<(), RegionKitError> {
    let (width, height) = frames[0].dimensions();
    let mut child = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
        .args(["-s", &format!("{width}x{height}")])
        .args(["-r", &options.frame_rate.to_string()])
        .args(["-i", "-", "-an", "-c:v", &options.codec, "-pix_fmt", "yuv420p"])
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RegionKitError::Encoder(format!("failed to start ffmpeg: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| RegionKitError::Encoder("ffmpeg stdin unavailable".to_string()))?;
    let written = frames
        .iter()
        .try_for_each(|frame| stdin.write_all(frame.as_raw()));
    // Closing stdin lets ffmpeg finish, or exit if it already failed.
    drop(stdin);

    let output = child.wait_with_output().map_err(RegionKitError::Io)?;
    if !output.status.success() {
        return Err(RegionKitError::Encoder(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    written.map_err(|e| RegionKitError::Encoder(format!("writing frames to ffmpeg: {e}")))?;
    Ok(())
}

/// Whether an `ffmpeg` binary can be started.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
