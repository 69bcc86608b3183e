//! Build configuration module.
//!
//! Handles loading, validating, and merging the optional `config.toml` that
//! lives next to the emoji images. Stock defaults are overridden by whatever
//! the file specifies; everything else keeps its default.
//!
//! ## Config File Location
//!
//! ```text
//! emoji/
//! ├── config.toml          # Optional, overrides stock defaults
//! ├── smile.png
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [manifest]
//! format = "json"           # json | php, used when --format is not given
//!
//! [scan]
//! vector_size = [20, 20]    # width, height reported for SVG files
//!
//! [editor]
//! max_count = 16            # Hard cap on the editor shortlist
//! columns = 4               # Shortlist is trimmed to whole rows
//! keep_grandfathered = false
//!
//! [preview]
//! enabled = true
//! filename = "preview.html"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::editor::EditorPolicy;
use crate::scan::ScanOptions;
use crate::store::ManifestFormat;
use crate::types::Dimensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Image directory not found: {0}")]
    ImageDirNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Unknown manifest format '{0}' (expected json or php)")]
    UnknownFormat(String),
}

/// Build configuration loaded from `config.toml`.
///
/// User files need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub manifest: ManifestConfig,
    pub scan: ScanConfig,
    pub editor: EditorConfig,
    pub preview: PreviewConfig,
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.manifest_format()?;
        if self.scan.vector_size[0] == 0 || self.scan.vector_size[1] == 0 {
            return Err(ConfigError::Validation(
                "scan.vector_size values must be non-zero".into(),
            ));
        }
        if self.editor.max_count == 0 {
            return Err(ConfigError::Validation(
                "editor.max_count must be at least 1".into(),
            ));
        }
        if self.editor.columns == 0 {
            return Err(ConfigError::Validation(
                "editor.columns must be at least 1".into(),
            ));
        }
        if self.preview.filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "preview.filename must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn manifest_format(&self) -> Result<ManifestFormat, ConfigError> {
        self.manifest.format.parse()
    }

    pub fn editor_policy(&self) -> EditorPolicy {
        EditorPolicy {
            max_count: self.editor.max_count,
            columns: self.editor.columns,
            keep_grandfathered: self.editor.keep_grandfathered,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            vector_size: Dimensions::new(self.scan.vector_size[0], self.scan.vector_size[1]),
        }
    }
}

/// Manifest output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// `json` or `php`. A `--format` flag takes precedence.
    pub format: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            format: ManifestFormat::default().to_string(),
        }
    }
}

/// Directory scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// `[width, height]` assumed for SVG files.
    pub vector_size: [u32; 2],
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            vector_size: [20, 20],
        }
    }
}

/// Editor shortlist settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub max_count: usize,
    pub columns: usize,
    /// Keep existing picks that rounding to whole rows would drop.
    pub keep_grandfathered: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let policy = EditorPolicy::default();
        Self {
            max_count: policy.max_count,
            columns: policy.columns,
            keep_grandfathered: policy.keep_grandfathered,
        }
    }
}

/// Preview page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub enabled: bool,
    /// Written inside the image directory.
    pub filename: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filename: "preview.html".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuildConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the image directory.
pub fn load_config(dir: &Path) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Check that `path` is an existing directory and return its canonical form.
pub fn resolve_image_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ImageDirNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path.to_path_buf()));
    }
    Ok(path.canonicalize()?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# emoji-manifest configuration
# ============================
# Place this file next to your emoji images as config.toml.
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Manifest output
# ---------------------------------------------------------------------------
[manifest]
# File format written when --format is not given: "json" or "php".
# The manifest is named manifest.json or manifest.php accordingly.
format = "json"

# ---------------------------------------------------------------------------
# Directory scan
# ---------------------------------------------------------------------------
[scan]
# SVG files have no pixel size; report them as [width, height].
vector_size = [20, 20]

# ---------------------------------------------------------------------------
# Editor shortlist
# ---------------------------------------------------------------------------
[editor]
# Never list more than this many emoji.
max_count = 16

# Below max_count, the list is trimmed to a multiple of this (whole rows).
columns = 4

# Keep emoji already on the list even when trimming to whole rows
# would drop them.
keep_grandfathered = false

# ---------------------------------------------------------------------------
# Preview page
# ---------------------------------------------------------------------------
[preview]
# Write an HTML page showing every emoji next to the manifest.
enabled = true

# File name of the preview page, inside the image directory.
filename = "preview.html"
"##
}

// ============================================================================
// Tests
// ============================================================================
