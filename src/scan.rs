//! Emoji directory scanning.
//!
//! Stage 1 of the build. Lists a flat directory of emoji images and groups
//! the files into [`EmojiRecord`]s, one per emoji name, with every resolution
//! variant attached.
//!
//! ## Directory Structure
//!
//! ```text
//! emoji/
//! ├── config.toml          # Build configuration (optional)
//! ├── icon.png             # Marker asset, ignored
//! ├── set-icon@2x.png      # Marker asset, ignored
//! ├── smile.png            # smile, 1×
//! ├── smile@2x.png         # smile, 2×
//! ├── heart.svg            # heart, fixed vector size
//! └── manifest.json        # Previous build output, not an image
//! ```
//!
//! ## Output
//!
//! Produces a [`ScanResult`] containing:
//! - Every emoji keyed by name
//! - Min/max bounds over the 1× variants
//! - The set of multipliers seen across all emoji
//! - Data-quality warnings (never fatal)
//!
//! ## Determinism
//!
//! Dimension probes run in parallel, but results are folded in sorted
//! filename order, so the result never depends on probe completion order.

use crate::imaging::{ImageProbe, ProbeError};
use crate::naming;
use crate::types::{Dimensions, EmojiRecord, Multiplier};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read image {filename}: {source}")]
    Probe {
        filename: String,
        #[source]
        source: ProbeError,
    },
}

/// Scanner settings that come from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Size reported for vector files, which have no pixel dimensions.
    pub vector_size: Dimensions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            vector_size: Dimensions::new(20, 20),
        }
    }
}

/// Non-fatal findings about the scanned set.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanWarning {
    /// The emoji has higher-resolution files but no 1× file.
    MissingBase { name: String },
    /// The emoji lacks multipliers other emoji in the set provide.
    MultiplierMismatch {
        name: String,
        missing: Vec<Multiplier>,
    },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::MissingBase { name } => write!(f, "{name} has no 1x image"),
            ScanWarning::MultiplierMismatch { name, missing } => {
                let missing: Vec<String> = missing.iter().map(|m| m.to_string()).collect();
                write!(f, "{name} is missing {}", missing.join(", "))
            }
        }
    }
}

/// Everything the scanner learned about a directory.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub emoji: BTreeMap<String, EmojiRecord>,
    pub min_size: Option<Dimensions>,
    pub max_size: Option<Dimensions>,
    pub multipliers: BTreeSet<Multiplier>,
    pub warnings: Vec<ScanWarning>,
}

/// A file that passed filtering, waiting for its dimensions.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    filename: String,
    name: String,
    multiplier: Multiplier,
    vector: bool,
}

pub fn scan(
    dir: &Path,
    probe: &dyn ImageProbe,
    options: &ScanOptions,
) -> Result<ScanResult, ScanError> {
    let candidates: Vec<Candidate> = collect_files(dir)?
        .into_iter()
        .filter_map(|path| {
            let filename = path.file_name()?.to_string_lossy().to_string();
            if !naming::is_supported(&filename) || naming::is_icon(&filename) {
                tracing::debug!("Skipping {filename}");
                return None;
            }
            let parsed = naming::parse_filename(&filename);
            Some(Candidate {
                vector: naming::is_vector(&filename),
                path,
                filename,
                name: parsed.name,
                multiplier: parsed.multiplier,
            })
        })
        .collect();

    // Every file is probed; the reported failure is the first in name order.
    let probed: Vec<Result<Dimensions, ScanError>> = candidates
        .par_iter()
        .map(|c| {
            if c.vector {
                Ok(options.vector_size)
            } else {
                probe.identify(&c.path).map_err(|source| ScanError::Probe {
                    filename: c.filename.clone(),
                    source,
                })
            }
        })
        .collect();
    let dimensions: Vec<Dimensions> = probed.into_iter().collect::<Result<_, _>>()?;

    let mut result = ScanResult::default();
    for (candidate, dims) in candidates.iter().zip(dimensions) {
        let record = result
            .emoji
            .entry(candidate.name.clone())
            .or_insert_with(|| EmojiRecord::new(&candidate.name, &candidate.filename));
        record.add_variant(&candidate.filename, candidate.multiplier, dims);

        if candidate.multiplier.is_base() {
            let min = result.min_size.unwrap_or(dims);
            let max = result.max_size.unwrap_or(dims);
            result.min_size = Some(Dimensions::new(
                min.width.min(dims.width),
                min.height.min(dims.height),
            ));
            result.max_size = Some(Dimensions::new(
                max.width.max(dims.width),
                max.height.max(dims.height),
            ));
        }
    }

    result.multipliers = result
        .emoji
        .values()
        .flat_map(|r| r.sizes.keys().copied())
        .collect();
    result.warnings = check_variants(&result.emoji, &result.multipliers);
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }

    Ok(result)
}

/// List regular files directly inside `dir`, sorted by path.
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Compare each record's variants against the union of all multipliers.
fn check_variants(
    emoji: &BTreeMap<String, EmojiRecord>,
    multipliers: &BTreeSet<Multiplier>,
) -> Vec<ScanWarning> {
    let mut warnings = Vec::new();
    for record in emoji.values() {
        if record.base.is_none() {
            warnings.push(ScanWarning::MissingBase {
                name: record.name.clone(),
            });
        }
        let missing: Vec<Multiplier> = multipliers
            .iter()
            .filter(|m| !record.sizes.contains_key(m))
            .copied()
            .collect();
        if !missing.is_empty() {
            warnings.push(ScanWarning::MultiplierMismatch {
                name: record.name.clone(),
                missing,
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockProbe;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn scan_with(dir: &Path, probe: &MockProbe) -> ScanResult {
        scan(dir, probe, &ScanOptions::default()).unwrap()
    }

    #[test]
    fn groups_resolution_variants() {
        let tmp = emoji_dir(&["smile.png", "smile@2x.png", "wink.png"]);
        let probe = MockProbe::new()
            .with("smile.png", 32, 32)
            .with("smile@2x.png", 64, 64)
            .with("wink.png", 40, 20);

        let result = scan_with(tmp.path(), &probe);

        assert_eq!(emoji_names(&result), vec!["smile", "wink"]);
        let smile = find_emoji(&result, "smile");
        assert_eq!(smile.filename, "smile.png");
        assert_eq!(smile.base, Some(Dimensions::new(32, 32)));
        assert_eq!(smile.sizes.len(), 2);
        assert_eq!(smile.sizes[&Multiplier(2.0)].width, 64);

        let wink = find_emoji(&result, "wink");
        assert_eq!(wink.base, Some(Dimensions::new(40, 20)));
        assert_eq!(wink.sizes.len(), 1);
    }

    #[test]
    fn bounds_cover_base_variants_only() {
        let tmp = emoji_dir(&["a.png", "a@2x.png", "b.png"]);
        let probe = MockProbe::new()
            .with("a.png", 20, 30)
            .with("a@2x.png", 400, 600)
            .with("b.png", 40, 10);

        let result = scan_with(tmp.path(), &probe);

        assert_eq!(result.min_size, Some(Dimensions::new(20, 10)));
        assert_eq!(result.max_size, Some(Dimensions::new(40, 30)));
    }

    #[test]
    fn skips_unsupported_and_icon_files() {
        let tmp = emoji_dir(&[
            "smile.png",
            "icon.png",
            "set-icon@2x.png",
            "notes.txt",
            "manifest.json",
            "photo.webp",
        ]);
        let probe = MockProbe::new().with("smile.png", 32, 32);

        let result = scan_with(tmp.path(), &probe);

        assert_eq!(emoji_names(&result), vec!["smile"]);
        assert_eq!(probe.calls(), vec!["smile.png".to_string()]);
    }

    #[test]
    fn svg_uses_vector_size_without_probing() {
        let tmp = emoji_dir(&["heart.svg"]);
        let probe = MockProbe::new();

        let result = scan_with(tmp.path(), &probe);

        assert_eq!(find_emoji(&result, "heart").base, Some(Dimensions::new(20, 20)));
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn configured_vector_size() {
        let tmp = emoji_dir(&["heart.svg"]);
        let options = ScanOptions {
            vector_size: Dimensions::new(24, 24),
        };

        let result = scan(tmp.path(), &MockProbe::new(), &options).unwrap();

        assert_eq!(result.max_size, Some(Dimensions::new(24, 24)));
    }

    #[test]
    fn probe_failure_is_fatal() {
        let tmp = emoji_dir(&["smile.png", "broken.png"]);
        let probe = MockProbe::new().with("smile.png", 32, 32);

        let result = scan(tmp.path(), &probe, &ScanOptions::default());

        assert!(matches!(
            result,
            Err(ScanError::Probe { ref filename, .. }) if filename == "broken.png"
        ));
    }

    #[test]
    fn first_failure_in_name_order_is_reported() {
        let names = ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png", "g.png", "h.png"];
        let tmp = emoji_dir(&names);
        let probe = MockProbe::new().with("a.png", 32, 32).with("e.png", 32, 32);

        for _ in 0..20 {
            let result = scan(tmp.path(), &probe, &ScanOptions::default());
            assert!(matches!(
                result,
                Err(ScanError::Probe { ref filename, .. }) if filename == "b.png"
            ));
        }
    }

    #[test]
    fn empty_directory_yields_empty_result() {
        let tmp = TempDir::new().unwrap();
        let result = scan_with(tmp.path(), &MockProbe::new());

        assert!(result.emoji.is_empty());
        assert!(result.multipliers.is_empty());
        assert_eq!(result.min_size, None);
        assert_eq!(result.max_size, None);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn subdirectories_ignored() {
        let tmp = emoji_dir(&["smile.png"]);
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();
        let probe = MockProbe::new().with("smile.png", 32, 32);

        let result = scan_with(tmp.path(), &probe);
        assert_eq!(emoji_names(&result), vec!["smile"]);
    }

    #[test]
    fn multipliers_are_union_across_emoji() {
        let tmp = emoji_dir(&["a.png", "a@2x.png", "b.png", "b@3x.png"]);
        let probe = MockProbe::new()
            .with("a.png", 20, 20)
            .with("a@2x.png", 40, 40)
            .with("b.png", 20, 20)
            .with("b@3x.png", 60, 60);

        let result = scan_with(tmp.path(), &probe);

        let multipliers: Vec<Multiplier> = result.multipliers.iter().copied().collect();
        assert_eq!(
            multipliers,
            vec![Multiplier(1.0), Multiplier(2.0), Multiplier(3.0)]
        );
        assert_eq!(
            result.warnings,
            vec![
                ScanWarning::MultiplierMismatch {
                    name: "a".to_string(),
                    missing: vec![Multiplier(3.0)],
                },
                ScanWarning::MultiplierMismatch {
                    name: "b".to_string(),
                    missing: vec![Multiplier(2.0)],
                },
            ]
        );
    }

    #[test]
    fn matching_variants_produce_no_warnings() {
        let tmp = emoji_dir(&["a.png", "a@2x.png", "b.png", "b@2x.png"]);
        let probe = MockProbe::new()
            .with("a.png", 20, 20)
            .with("a@2x.png", 40, 40)
            .with("b.png", 20, 20)
            .with("b@2x.png", 40, 40);

        let result = scan_with(tmp.path(), &probe);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_base_is_warned() {
        let tmp = emoji_dir(&["big@2x.png"]);
        let probe = MockProbe::new().with("big@2x.png", 64, 64);

        let result = scan_with(tmp.path(), &probe);

        let big = find_emoji(&result, "big");
        assert_eq!(big.base, None);
        assert_eq!(big.filename, "big@2x.png");
        assert_eq!(result.min_size, None);
        assert!(result.warnings.contains(&ScanWarning::MissingBase {
            name: "big".to_string()
        }));
    }

    #[test]
    fn reads_real_images() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "smile.png", 32, 32);
        write_png(tmp.path(), "smile@2x.png", 64, 64);

        let result = scan(
            tmp.path(),
            &crate::imaging::RustProbe::new(),
            &ScanOptions::default(),
        )
        .unwrap();

        assert_eq!(find_emoji(&result, "smile").base, Some(Dimensions::new(32, 32)));
        assert_eq!(result.multipliers.len(), 2);
    }

    #[test]
    fn warning_display() {
        let warning = ScanWarning::MultiplierMismatch {
            name: "a".to_string(),
            missing: vec![Multiplier(2.0), Multiplier(1.5)],
        };
        assert_eq!(warning.to_string(), "a is missing @2x, @1.5x");
    }
}
