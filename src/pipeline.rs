//! The `build` command end to end.
//!
//! ```text
//! image dir ──► config.toml ──► scan ──┐
//! manifest.{json,php} ──► load ────────┼──► reconcile ──► render ──► write
//! defaults.json ───────────────────────┘
//! ```
//!
//! Everything is computed in memory before the first write: a probe failure,
//! a bad config or unusable defaults leave the existing manifest and preview
//! untouched. Both files are then written next to their targets and renamed
//! into place, preview first, so a failed write leaves the old manifest.

use crate::config::{self, ConfigError};
use crate::defaults::{Defaults, DefaultsError};
use crate::imaging::ImageProbe;
use crate::manifest::Manifest;
use crate::preview;
use crate::reconcile;
use crate::scan::{self, ScanError, ScanWarning};
use crate::store::{self, ManifestFormat, StoreError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Defaults(#[from] DefaultsError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Cannot write preview {path}: {source}")]
    Preview {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to build, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub image_dir: PathBuf,
    /// Overrides `manifest.format` from `config.toml`.
    pub format: Option<ManifestFormat>,
    /// Defaults to `manifest.<format>` inside the image directory.
    pub manifest_path: Option<PathBuf>,
    /// Defaults to the stock tables.
    pub defaults_path: Option<PathBuf>,
}

/// Outcome of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub image_dir: PathBuf,
    pub format: ManifestFormat,
    pub manifest_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub manifest: Manifest,
    /// Image files that made it into the scan, all resolutions counted.
    pub files: usize,
    pub warnings: Vec<ScanWarning>,
}

/// Scan, reconcile, and write the manifest and preview.
pub fn build(options: &BuildOptions, probe: &dyn ImageProbe) -> Result<BuildReport, BuildError> {
    let image_dir = config::resolve_image_dir(&options.image_dir)?;
    let config = config::load_config(&image_dir)?;

    let format = match options.format {
        Some(format) => format,
        None => config.manifest_format()?,
    };
    let manifest_path = options
        .manifest_path
        .clone()
        .unwrap_or_else(|| image_dir.join(format.default_filename()));

    let defaults = Defaults::resolve(options.defaults_path.as_deref())?;
    let prior = store::load(&manifest_path, format)?;
    let scanned = scan::scan(&image_dir, probe, &config.scan_options())?;
    let manifest = reconcile::reconcile(&prior, &scanned, &defaults, &config.editor_policy());

    let manifest_text = store::render(&manifest, format)?;
    let preview = config.preview.enabled.then(|| {
        (
            image_dir.join(&config.preview.filename),
            preview::render_preview(&manifest).into_string(),
        )
    });

    let manifest_file =
        Staged::write(&manifest_path, &manifest_text).map_err(|source| StoreError::Write {
            path: manifest_path.clone(),
            source,
        })?;
    let preview_file = match &preview {
        Some((path, html)) => Some(Staged::write(path, html).map_err(|source| {
            BuildError::Preview {
                path: path.clone(),
                source,
            }
        })?),
        None => None,
    };

    if let Some(staged) = preview_file {
        let path = staged.target.clone();
        staged
            .commit()
            .map_err(|source| BuildError::Preview { path: path.clone(), source })?;
        tracing::debug!("Wrote {}", path.display());
    }
    manifest_file.commit().map_err(|source| StoreError::Write {
        path: manifest_path.clone(),
        source,
    })?;
    tracing::debug!("Wrote {}", manifest_path.display());

    Ok(BuildReport {
        files: scanned.emoji.values().map(|record| record.sizes.len()).sum(),
        warnings: scanned.warnings,
        image_dir,
        format,
        manifest_path,
        preview_path: preview.map(|(path, _)| path),
        manifest,
    })
}

/// Output written to a hidden sibling file, renamed over the target on
/// [`Staged::commit`] and removed if dropped uncommitted.
struct Staged {
    temp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl Staged {
    fn write(target: &Path, contents: &str) -> io::Result<Self> {
        let file_name = target
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no file name"))?;
        let temp = target.with_file_name(format!(
            ".{}.tmp.{}",
            file_name.to_string_lossy(),
            std::process::id()
        ));
        let staged = Self {
            temp,
            target: target.to_path_buf(),
            committed: false,
        };
        fs::write(&staged.temp, contents)?;
        Ok(staged)
    }

    fn commit(mut self) -> io::Result<()> {
        fs::rename(&self.temp, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
