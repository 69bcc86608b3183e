//! Reading and writing the manifest file.
//!
//! Two on-disk forms carry the same data:
//!
//! - **JSON** (`manifest.json`): pretty-printed with four-space indents,
//!   slashes left unescaped, trailing newline.
//! - **PHP** (`manifest.php`): `<?php return array (...);` in `var_export`
//!   layout, for PHP hosts that `include` the manifest directly.
//!
//! Both writers are deterministic, so rebuilding an unchanged directory
//! produces a byte-identical file.
//!
//! Loading is forgiving. The previous manifest is user state, possibly
//! hand-edited: a missing file is an empty manifest, and a file that does not
//! parse to a mapping is logged and treated as empty. Only an unreadable file
//! is an error.

pub mod php;

use crate::config::ConfigError;
use crate::manifest::Manifest;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Malformed manifest: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Json,
    Php,
}

impl ManifestFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Php => "php",
        }
    }

    /// `manifest.json` or `manifest.php`.
    pub fn default_filename(&self) -> String {
        format!("manifest.{}", self.extension())
    }
}

impl FromStr for ManifestFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "php" => Ok(ManifestFormat::Php),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize a manifest to file contents.
pub fn render(manifest: &Manifest, format: ManifestFormat) -> Result<String, StoreError> {
    match format {
        ManifestFormat::Json => {
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            manifest.serialize(&mut ser)?;
            let mut text = String::from_utf8(buf)
                .map_err(|e| StoreError::Malformed(e.to_string()))?;
            text.push('\n');
            Ok(text)
        }
        ManifestFormat::Php => Ok(php::to_php(&serde_json::to_value(manifest)?)),
    }
}

/// Parse file contents into a manifest.
pub fn parse(text: &str, format: ManifestFormat) -> Result<Manifest, StoreError> {
    let value: Value = match format {
        ManifestFormat::Json => {
            serde_json::from_str(text).map_err(|e| StoreError::Malformed(e.to_string()))?
        }
        ManifestFormat::Php => php::from_php(text).map_err(|e| StoreError::Malformed(e.to_string()))?,
    };
    if !value.is_object() {
        return Err(StoreError::Malformed("top level is not a mapping".into()));
    }
    Manifest::from_value(value)
        .ok_or_else(|| StoreError::Malformed("fields have unexpected types".into()))
}

/// Load the previous manifest.
///
/// Missing or malformed files yield [`Manifest::default`].
pub fn load(path: &Path, format: ManifestFormat) -> Result<Manifest, StoreError> {
    if !path.exists() {
        tracing::debug!("No manifest at {}, starting fresh", path.display());
        return Ok(Manifest::default());
    }
    let bytes = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = String::from_utf8(bytes)
        .map_err(|e| StoreError::Malformed(e.to_string()))
        .and_then(|text| parse(&text, format));
    match parsed {
        Ok(manifest) => Ok(manifest),
        Err(e) => {
            tracing::warn!("Ignoring previous manifest {}: {e}", path.display());
            Ok(Manifest::default())
        }
    }
}

/// Write a manifest, replacing any existing file.
pub fn save(path: &Path, manifest: &Manifest, format: ManifestFormat) -> Result<(), StoreError> {
    let text = render(manifest, format)?;
    write(path, &text)
}

/// Write already-rendered manifest text.
pub fn write(path: &Path, text: &str) -> Result<(), StoreError> {
    fs::write(path, text).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
