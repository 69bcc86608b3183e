//! Image probe trait and shared error type.
//!
//! The scanner only needs one thing from an image file: its pixel size.
//! [`ImageProbe`] is that seam. Production code uses
//! [`RustProbe`](super::rust_backend::RustProbe); tests swap in a mock that
//! answers from a table so fixtures don't need real image bytes.

use crate::types::Dimensions;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read image dimensions of {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Reads pixel dimensions from an image file.
///
/// `Sync` so probes can run on the rayon pool.
pub trait ImageProbe: Sync {
    fn identify(&self, path: &Path) -> Result<Dimensions, ProbeError>;
}
