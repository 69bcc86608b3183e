//! Filename conventions for emoji image files.
//!
//! Every file in an emoji directory follows the pattern `<name>[@<n>x].<ext>`:
//!
//! - `smile.png` → name `smile`, multiplier 1
//! - `smile@2x.png` → name `smile`, multiplier 2
//! - `wave@1.5x.gif` → name `wave`, multiplier 1.5
//!
//! Marker assets (`icon.png`, `set-icon.png`) share the directory but are not
//! emoji and are excluded. Parsing never fails: a name that does not fit the
//! pattern is used as-is.

use crate::types::Multiplier;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions that can hold an emoji, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png", "svg"];

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)(@[0-9.]+x)?\.[a-z]+$").expect("name pattern must compile")
});

static MULTIPLIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@([0-9.]+)x").expect("multiplier pattern must compile"));

/// Result of parsing an emoji filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFilename {
    pub name: String,
    pub multiplier: Multiplier,
}

/// Parse a basename into its emoji name and resolution multiplier.
pub fn parse_filename(basename: &str) -> ParsedFilename {
    ParsedFilename {
        name: derive_name(basename),
        multiplier: derive_multiplier(basename),
    }
}

/// Strip the `@<n>x` suffix and the extension from a basename.
///
/// - `"smile@2x.png"` → `"smile"`
/// - `"Smile.PNG"` → `"Smile"`
/// - `"no-extension"` → `"no-extension"`
pub fn derive_name(basename: &str) -> String {
    NAME_PATTERN
        .captures(basename)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| basename.to_string())
}

/// Extract the multiplier from the first `@<n>x` token, defaulting to 1.
pub fn derive_multiplier(basename: &str) -> Multiplier {
    MULTIPLIER_PATTERN
        .captures(basename)
        .and_then(|c| c.get(1))
        .map(|m| Multiplier(parse_leading_number(m.as_str())))
        .unwrap_or(Multiplier::BASE)
}

/// Read the longest numeric prefix of a digits-and-dots token.
///
/// `"1.2.3"` reads as 1.2 and `"."` as 0, the way loose numeric casts
/// treat them.
fn parse_leading_number(token: &str) -> f64 {
    let end = token
        .match_indices('.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    token[..end].parse().unwrap_or(0.0)
}

fn extension(basename: &str) -> Option<String> {
    Path::new(basename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// True if the file extension is one an emoji can use.
pub fn is_supported(basename: &str) -> bool {
    extension(basename).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// True for vector files, which carry no pixel dimensions.
pub fn is_vector(basename: &str) -> bool {
    extension(basename).is_some_and(|ext| ext == "svg")
}

/// True for icon marker files: `icon.<ext>` or anything containing `-icon`.
pub fn is_icon(basename: &str) -> bool {
    let stem_is_icon = Path::new(basename)
        .file_stem()
        .is_some_and(|s| s.eq_ignore_ascii_case("icon"));
    stem_is_icon || basename.to_lowercase().contains("-icon")
}
