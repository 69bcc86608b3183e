//! # emoji-manifest
//!
//! Builds the manifest of an emoji set from a flat directory of images, plus
//! an HTML page previewing every emoji. The directory is the data source:
//! each image is an emoji named after its file, and `@2x`-style suffixes are
//! grouped as resolution variants of the same emoji.
//!
//! # Architecture: Scan, Reconcile, Write
//!
//! ```text
//! 1. Scan       emoji/            →  ScanResult   (files → records + bounds)
//! 2. Load       manifest.json     →  Manifest     (previous build, user edits)
//! 3. Reconcile  scan + previous   →  Manifest     (renames, aliases, archive, editor)
//! 4. Write      Manifest          →  manifest.{json,php} + preview.html
//! ```
//!
//! The previous manifest is an input as well as the output. Users rename
//! emoji, add aliases and curate the editor shortlist by editing it, and a
//! rebuild must keep those edits while picking up added and removed files.
//! Rebuilding an unchanged directory is a byte-for-byte no-op.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename conventions: emoji name, `@Nx` multiplier, supported types, icon markers |
//! | [`imaging`] | The [`imaging::ImageProbe`] seam and its `image`-crate implementation |
//! | [`scan`] | Stage 1: groups directory files into emoji records with size bounds |
//! | [`manifest`] | The persisted [`manifest::Manifest`] and its lenient deserialization |
//! | [`defaults`] | Built-in alias, archive and editor tables |
//! | [`reconcile`] | Stage 3: merges the scan with the previous manifest |
//! | [`editor`] | Editor shortlist selection and grid truncation |
//! | [`store`] | JSON and PHP manifest files |
//! | [`preview`] | Preview page rendering with Maud |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`pipeline`] | The `build` command end to end |
//! | [`output`] | CLI summary formatting |
//! | [`types`] | Shared types: dimensions, multipliers, emoji records |
//!
//! # Design Decisions
//!
//! ## Filenames Anchor Identity
//!
//! An emoji's name can be changed in the manifest, but its file cannot be
//! changed without the scan noticing. So the reconciler keys user edits by
//! filename: a file that was called `happy` last time is still `happy`, no
//! matter what its filename derives to.
//!
//! ## Tolerant of Old State, Strict About Configuration
//!
//! A malformed previous manifest, or one that references deleted files, never
//! fails a build; the bad parts are dropped and logged. A malformed
//! `config.toml` or defaults file is an error, because those are written on
//! purpose and a silent fallback would hide the mistake.
//!
//! ## Compute, Then Write
//!
//! The manifest and preview are rendered in memory before either file is
//! touched, so a failed build leaves the previous output in place.

pub mod config;
pub mod defaults;
pub mod editor;
pub mod imaging;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod reconcile;
pub mod scan;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
