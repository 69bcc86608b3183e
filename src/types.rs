//! Shared types used by the scanner, the reconciler and the manifest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Pixel dimensions of an image.
///
/// Serialized as `{"w": .., "h": ..}`, the shape manifest consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when the image is wider than it is tall.
    pub fn is_wide(&self) -> bool {
        self.width > self.height
    }
}

/// A resolution multiplier parsed from an `@<n>x` filename token.
///
/// Totally ordered so it can key a `BTreeMap`. Whole values serialize as
/// integers (`2`), fractional ones as floats (`1.5`).
#[derive(Debug, Clone, Copy)]
pub struct Multiplier(pub f64);

impl Multiplier {
    pub const BASE: Multiplier = Multiplier(1.0);

    pub fn is_base(&self) -> bool {
        self.0 == 1.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Multiplier {}

impl PartialOrd for Multiplier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Multiplier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}x", self.0)
    }
}

impl Serialize for Multiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0 >= 0.0 && self.0 <= u32::MAX as f64 {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Multiplier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Multiplier)
    }
}

/// One resolution variant of an emoji.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeVariant {
    pub width: u32,
    pub height: u32,
    pub multiplier: Multiplier,
}

/// A scanned emoji: its 1× identity plus every resolution variant found.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiRecord {
    /// Canonical name derived from the filename.
    pub name: String,
    /// The 1× filename once one has been seen; the first variant's filename before that.
    pub filename: String,
    /// Dimensions of the 1× variant, if the directory has one.
    pub base: Option<Dimensions>,
    pub sizes: BTreeMap<Multiplier, SizeVariant>,
}

impl EmojiRecord {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            base: None,
            sizes: BTreeMap::new(),
        }
    }

    /// Records a variant. Only the 1× variant updates the base fields.
    pub fn add_variant(&mut self, filename: &str, multiplier: Multiplier, dims: Dimensions) {
        if multiplier.is_base() {
            self.filename = filename.to_string();
            self.base = Some(dims);
        }
        self.sizes.insert(
            multiplier,
            SizeVariant {
                width: dims.width,
                height: dims.height,
                multiplier,
            },
        );
    }

    /// Wide glyphs are excluded from fresh editor picks. Records with no 1×
    /// variant have nothing to compare and count as not wide.
    pub fn is_wide(&self) -> bool {
        self.base.is_some_and(|d| d.is_wide())
    }
}
