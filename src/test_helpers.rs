//! Shared test utilities for the emoji-manifest test suite.
//!
//! Provides fixture directories, lookup helpers and bulk extractors that work
//! with scan-phase data structures (`ScanResult`, `EmojiRecord`, `Manifest`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let scan = scan_result(&[("smile.png", 32, 32), ("smile@2x.png", 64, 64)]);
//!
//! assert_eq!(emoji_names(&scan), vec!["smile"]);
//! let smile = find_emoji(&scan, "smile");
//! assert_eq!(smile.sizes.len(), 2);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::imaging::backend::tests::MockProbe;
use crate::manifest::Manifest;
use crate::scan::{ScanOptions, ScanResult, scan};
use crate::types::{Dimensions, EmojiRecord, Multiplier};

// =========================================================================
// Fixture setup
// =========================================================================

/// A temp directory holding an empty placeholder file per name.
///
/// Pair with [`MockProbe`], which answers by filename and never reads them.
pub fn emoji_dir(filenames: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in filenames {
        std::fs::write(tmp.path().join(name), b"").unwrap();
    }
    tmp
}

/// Write a real, solid-color PNG of the given size.
pub fn write_png(dir: &Path, filename: &str, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 200, 0, 255]));
    img.save(dir.join(filename)).unwrap();
}

/// Scan a fixture directory of `(filename, width, height)` entries.
///
/// The directory is gone once this returns; only the result is kept.
pub fn scan_result(files: &[(&str, u32, u32)]) -> ScanResult {
    let names: Vec<&str> = files.iter().map(|(name, _, _)| *name).collect();
    let tmp = emoji_dir(&names);
    let probe = files
        .iter()
        .fold(MockProbe::new(), |probe, (name, w, h)| probe.with(name, *w, *h));
    scan(tmp.path(), &probe, &ScanOptions::default()).unwrap()
}

/// A manifest with every field populated, for round-trip tests.
pub fn sample_manifest() -> Manifest {
    let mut manifest = Manifest::default();
    manifest.name = "Sample Set".into();
    manifest.author = "O'Neil \\ Co".into();
    manifest.description = "Faces & things".into();
    for (name, filename) in [("smile", "smile.png"), ("wink", "wink.gif"), ("100", "100.png")] {
        manifest.emoji.insert(name.into(), filename.into());
    }
    for (alias, name) in [(";)", "wink"), (":)", "smile"), (":100:", "100")] {
        manifest.aliases.insert(alias.into(), name.into());
    }
    manifest.editor.insert(":)".into(), "smile".into());
    manifest.archive.insert("happy".into(), "smile.png".into());
    manifest.min_size = Some(Dimensions::new(16, 18));
    manifest.max_size = Some(Dimensions::new(32, 30));
    manifest.sizes = vec![Multiplier(1.0), Multiplier(1.5), Multiplier(2.0)];
    manifest
        .extra
        .insert("homepage".into(), serde_json::json!("https://example.com/set"));
    manifest
        .extra
        .insert("tags".into(), serde_json::json!(["faces", 3, true]));
    manifest
}

// =========================================================================
// Scan lookups (panic with a clear message on miss)
// =========================================================================

/// Find a scanned emoji by name. Panics if not found.
pub fn find_emoji<'a>(result: &'a ScanResult, name: &str) -> &'a EmojiRecord {
    result.emoji.get(name).unwrap_or_else(|| {
        let names = emoji_names(result);
        panic!("emoji '{name}' not found. Available: {names:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All scanned emoji names in sorted order.
pub fn emoji_names(result: &ScanResult) -> Vec<&str> {
    result.emoji.keys().map(String::as_str).collect()
}
