//! Pure Rust probe backed by the `image` crate.
//!
//! `image::image_dimensions` reads only the format header (PNG IHDR, GIF
//! logical screen descriptor, JPEG SOF), so probing a few hundred emoji is
//! cheap. GIF, JPEG and PNG decoders are compiled in; SVG is never probed.

use super::backend::{ImageProbe, ProbeError};
use crate::types::Dimensions;
use image::ImageError;
use std::path::Path;

/// Production probe. See the [module docs](self).
pub struct RustProbe;

impl RustProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProbe for RustProbe {
    fn identify(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| match e {
            ImageError::IoError(io) => ProbeError::Io(io),
            other => ProbeError::Unreadable {
                path: path.display().to_string(),
                message: other.to_string(),
            },
        })?;
        Ok(Dimensions { width, height })
    }
}
