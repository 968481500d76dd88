//! Reading and writing single images and sorted image directories.
//!
//! Everything read here is converted to 8-bit RGB (display order).

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{DynamicImage, EncodableLayout, PixelWithColorType, RgbImage};
use imageproc::definitions::Image;
use log::debug;
use walkdir::WalkDir;

use crate::error::RegionKitError;

/// File extensions picked up by [`read_images_sorted`].
pub const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The representation [`read_image`] should hand back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// A dense `RgbImage` buffer.
    Buffer,
    /// A flat height x width x channel array.
    Tensor,
    /// The decoder's `DynamicImage`, converted to RGB.
    Dynamic,
}

impl FromStr for TargetFormat {
    type Err = RegionKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buffer" | "numpy" => Ok(TargetFormat::Buffer),
            "tensor" | "torch" => Ok(TargetFormat::Tensor),
            "dynamic" | "pil" => Ok(TargetFormat::Dynamic),
            _ => Err(RegionKitError::UnsupportedFormat(format!(
                "'{}' (supported: buffer, tensor, dynamic)",
                s
            ))),
        }
    }
}

/// Row-major height x width x channel samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HwcTensor {
    /// `[height, width, channels]`.
    pub shape: [usize; 3],
    pub data: Vec<u8>,
}

impl From<RgbImage> for HwcTensor {
    fn from(image: RgbImage) -> Self {
        let shape = [image.height() as usize, image.width() as usize, 3];
        Self {
            shape,
            data: image.into_raw(),
        }
    }
}

/// A decoded image in the requested representation.
#[derive(Clone, Debug)]
pub enum LoadedImage {
    Buffer(RgbImage),
    Tensor(HwcTensor),
    Dynamic(DynamicImage),
}

impl LoadedImage {
    /// Returns the dense buffer, converting if needed.
    ///
    /// Fails only for a tensor whose data does not match its shape.
    pub fn into_rgb(self) -> Result<RgbImage, RegionKitError> {
        match self {
            LoadedImage::Buffer(image) => Ok(image),
            LoadedImage::Dynamic(image) => Ok(image.to_rgb8()),
            LoadedImage::Tensor(tensor) => {
                let [height, width, channels] = tensor.shape;
                if channels != 3 {
                    return Err(RegionKitError::UnsupportedFormat(format!(
                        "tensor with {channels} channel(s)"
                    )));
                }
                RgbImage::from_raw(width as u32, height as u32, tensor.data).ok_or_else(|| {
                    RegionKitError::UnsupportedFormat(format!(
                        "tensor data does not fill shape {height}x{width}x3"
                    ))
                })
            }
        }
    }
}

/// Decodes one image file to 8-bit RGB.
pub fn read_rgb(path: &Path) -> Result<RgbImage, RegionKitError> {
    if !path.exists() {
        return Err(RegionKitError::ImageNotFound {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path).map_err(|source| RegionKitError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Reads an image and returns it in the requested representation.
///
/// # Errors
///
/// * [`RegionKitError::ImageNotFound`] - `path` does not exist
/// * [`RegionKitError::ImageDecode`] - the file is not a readable image
pub fn read_image(path: &Path, format: TargetFormat) -> Result<LoadedImage, RegionKitError> {
    let rgb = read_rgb(path)?;
    Ok(match format {
        TargetFormat::Buffer => LoadedImage::Buffer(rgb),
        TargetFormat::Tensor => LoadedImage::Tensor(HwcTensor::from(rgb)),
        TargetFormat::Dynamic => LoadedImage::Dynamic(DynamicImage::ImageRgb8(rgb)),
    })
}

/// Lists the image files directly inside `dir` in natural order.
///
/// Only [`FRAME_EXTENSIONS`] are kept (case-insensitive). Digit runs in file
/// names compare as numbers, so `frame2.png` sorts before `frame10.png`.
pub fn list_images_sorted(dir: &Path) -> Result<Vec<PathBuf>, RegionKitError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| {
            RegionKitError::Io(std::io::Error::other(format!(
                "failed while listing {}: {}",
                dir.display(),
                source
            )))
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), &FRAME_EXTENSIONS) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| natural_cmp(a, b));
    Ok(files)
}

/// Reads every image in `dir`, in natural file-name order.
pub fn read_images_sorted(dir: &Path) -> Result<Vec<RgbImage>, RegionKitError> {
    list_images_sorted(dir)?
        .iter()
        .map(|path| read_rgb(path))
        .collect()
}

fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    };
    alphanumeric_sort::compare_str(name(a), name(b))
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Returns the first `{stem}_{i}.{ext}` next to `path` that does not exist,
/// trying `i = 0, 1, 2, ...`.
///
/// `path` itself is never returned.
pub fn resolve_indexed_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (0u64..)
        .map(|index| parent.join(format!("{stem}_{index}{suffix}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Saves `image` to `path`, choosing the encoder from the extension.
///
/// With `auto_index`, the image goes to [`resolve_indexed_path`] instead.
/// Returns the path that was written.
pub fn save_image<P>(image: &Image<P>, path: &Path, auto_index: bool) -> Result<PathBuf, RegionKitError>
where
    P: PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let target = if auto_index {
        resolve_indexed_path(path)
    } else {
        path.to_path_buf()
    };

    image
        .save(&target)
        .map_err(|source| RegionKitError::ImageEncode {
            path: target.clone(),
            source,
        })?;
    debug!("Image saved to {}", target.display());

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};

    fn write_solid(path: &Path, value: u8) {
        RgbImage::from_pixel(4, 3, Rgb([value, value, value]))
            .save(path)
            .expect("write fixture image");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_image(Path::new("/no/such/image.png"), TargetFormat::Buffer).unwrap_err();
        assert!(matches!(err, RegionKitError::ImageNotFound { .. }));
    }

    #[test]
    fn unknown_target_format_is_unsupported() {
        let err = "opencv".parse::<TargetFormat>().unwrap_err();
        assert!(matches!(err, RegionKitError::UnsupportedFormat(_)));
        assert_eq!("numpy".parse::<TargetFormat>().unwrap(), TargetFormat::Buffer);
        assert_eq!("PIL".parse::<TargetFormat>().unwrap(), TargetFormat::Dynamic);
    }

    #[test]
    fn read_returns_requested_representation() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(5, 2, Luma([77]))
            .save(&path)
            .expect("write gray png");

        let LoadedImage::Tensor(tensor) = read_image(&path, TargetFormat::Tensor).unwrap() else {
            panic!("expected tensor");
        };
        assert_eq!(tensor.shape, [2, 5, 3]);
        assert!(tensor.data.iter().all(|v| *v == 77));

        let rgb = read_image(&path, TargetFormat::Dynamic)
            .unwrap()
            .into_rgb()
            .unwrap();
        assert_eq!(rgb.get_pixel(4, 1), &Rgb([77, 77, 77]));
    }

    #[test]
    fn directory_is_read_in_natural_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_solid(&dir.path().join("frame10.png"), 10);
        write_solid(&dir.path().join("frame2.png"), 2);
        write_solid(&dir.path().join("frame1.jpg"), 1);
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let names: Vec<String> = list_images_sorted(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["frame1.jpg", "frame2.png", "frame10.png"]);

        let frames = read_images_sorted(dir.path()).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].get_pixel(0, 0), &Rgb([10, 10, 10]));
    }

    #[test]
    fn auto_index_skips_taken_names() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out.png");
        let image = RgbImage::new(2, 2);

        save_image(&image, &path, false).unwrap();
        assert!(path.exists());

        let first = save_image(&image, &path, true).unwrap();
        assert_eq!(first, dir.path().join("out_0.png"));
        let second = save_image(&image, &path, true).unwrap();
        assert_eq!(second, dir.path().join("out_1.png"));
    }

    #[test]
    fn auto_index_never_uses_the_bare_name() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("fresh.png");
        assert_eq!(resolve_indexed_path(&path), dir.path().join("fresh_0.png"));
        assert_eq!(
            resolve_indexed_path(&dir.path().join("noext")),
            dir.path().join("noext_0")
        );
    }

    #[test]
    fn unknown_extension_fails_to_encode() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = save_image(&RgbImage::new(2, 2), &dir.path().join("out.xyz"), false).unwrap_err();
        assert!(matches!(err, RegionKitError::ImageEncode { .. }));
    }
}
