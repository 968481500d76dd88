//! Tool configuration files.
//!
//! A config bundles the default styles for every drawing operation. Every
//! section and field is optional; missing values take their defaults.
//!
//! ```yaml
//! filter:
//!   mode: blur
//!   blur_radius: 21
//! boxes:
//!   thickness: 2
//!   color: "#00ff00"
//! overlay:
//!   corner: lower_right
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::annotate::{BoxStyle, Corner, LabelStyle, OverlayStyle};
use crate::error::RegionKitError;
use crate::filter::FilterOptions;

/// Overlay settings plus the corner the text block is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub corner: Corner,
    #[serde(flatten)]
    pub style: OverlayStyle,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub filter: FilterOptions,
    pub boxes: BoxStyle,
    pub labels: LabelStyle,
    pub overlay: OverlayConfig,
}

/// Loads a config from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// * [`RegionKitError::UnsupportedFormat`] - any other extension
/// * [`RegionKitError::ConfigParse`] - the file does not deserialize
pub fn load_config(path: &Path) -> Result<ToolConfig, RegionKitError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let parse_error = |message: String| RegionKitError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let config = match ext.as_str() {
        "json" => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?
        }
        "yaml" | "yml" => {
            let text = fs::read_to_string(path)?;
            // An empty YAML document is `null`, not an empty mapping.
            if text.trim().is_empty() {
                ToolConfig::default()
            } else {
                serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
            }
        }
        _ => {
            return Err(RegionKitError::UnsupportedFormat(format!(
                "config '{}' (supported: .json, .yaml, .yml)",
                path.display()
            )))
        }
    };

    debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::filter::FilterMode;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write(
            &dir,
            "tool.yaml",
            "filter:\n  mode: blur\n  blur_radius: 21\nboxes:\n  color: \"#00ff00\"\noverlay:\n  corner: lower_right\n  line_spacing: 4\n",
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.filter.mode, FilterMode::Blur);
        assert_eq!(config.filter.blur_radius, 21);
        assert_eq!(config.filter.border_thickness, 0);
        assert_eq!(config.boxes.color, Color::new(0, 255, 0));
        assert_eq!(config.boxes.thickness, 1);
        assert_eq!(config.overlay.corner, Corner::LowerRight);
        assert_eq!(config.overlay.style.line_spacing, 4);
        assert_eq!(config.labels, LabelStyle::default());
    }

    #[test]
    fn json_config_parses() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write(
            &dir,
            "tool.json",
            r##"{"filter": {"border_thickness": 3, "border_color": "#ff0000"}}"##,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.filter.border_thickness, 3);
        assert_eq!(config.filter.border_color, Color::RED);
        assert_eq!(config.boxes, BoxStyle::default());
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write(&dir, "empty.yml", "");
        assert_eq!(load_config(&path).unwrap(), ToolConfig::default());
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write(&dir, "bad.json", r#"{"filter": {"mode": "pixelate"}}"#);
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, RegionKitError::ConfigParse { .. }));

        let path = write(&dir, "bad_color.yaml", "boxes:\n  color: \"#12\"\n");
        assert!(matches!(
            load_config(&path).unwrap_err(),
            RegionKitError::ConfigParse { .. }
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write(&dir, "tool.toml", "");
        assert!(matches!(
            load_config(&path).unwrap_err(),
            RegionKitError::UnsupportedFormat(_)
        ));
    }
}
