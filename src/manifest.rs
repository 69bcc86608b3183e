//! The emoji manifest: the persisted description of an emoji set.
//!
//! ```json
//! {
//!     "name": "Twitter",
//!     "author": "",
//!     "description": "",
//!     "format": "<img class=\"emoji\" src=\"{src}\" title=\"{name}\" alt=\"{name}\" />",
//!     "emoji": { "smile": "smile.png" },
//!     "aliases": { ":)": "smile" },
//!     "editor": { ":)": "smile" },
//!     "archive": { "happy": "smile.png" },
//!     "minSize": { "w": 20, "h": 20 },
//!     "maxSize": { "w": 32, "h": 32 },
//!     "sizes": [1, 2]
//! }
//! ```
//!
//! Known fields are typed; anything else found at the top level is kept in
//! [`Manifest::extra`] and written back unchanged.
//!
//! Manifests are often hand-edited or produced by older tooling, so reading
//! is lenient: a map field stored as a list (an empty `[]` is the common
//! case) is accepted, and a size that is not an object reads as absent.

use crate::types::{Dimensions, Multiplier};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Markup template used when a manifest does not define its own.
pub const DEFAULT_FORMAT: &str = r#"<img class="emoji" src="{src}" title="{name}" alt="{name}" />"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
    pub author: String,
    pub description: String,
    /// HTML template for one emoji. See [`crate::preview::render_emoji`].
    pub format: String,
    /// Active emoji, name → filename.
    #[serde(deserialize_with = "map_or_list")]
    pub emoji: BTreeMap<String, String>,
    /// Alias → emoji name.
    #[serde(deserialize_with = "map_or_list")]
    pub aliases: IndexMap<String, String>,
    /// Editor shortlist, alias → emoji name.
    #[serde(deserialize_with = "map_or_list")]
    pub editor: IndexMap<String, String>,
    /// Archived name or alias → filename.
    #[serde(deserialize_with = "map_or_list")]
    pub archive: BTreeMap<String, String>,
    #[serde(
        rename = "minSize",
        deserialize_with = "size_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_size: Option<Dimensions>,
    #[serde(
        rename = "maxSize",
        deserialize_with = "size_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_size: Option<Dimensions>,
    pub sizes: Vec<Multiplier>,
    /// Unrecognized top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            description: String::new(),
            format: DEFAULT_FORMAT.to_string(),
            emoji: BTreeMap::new(),
            aliases: IndexMap::new(),
            editor: IndexMap::new(),
            archive: BTreeMap::new(),
            min_size: None,
            max_size: None,
            sizes: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Manifest {
    /// Interpret a parsed document as a manifest.
    ///
    /// Returns `None` when the document is not a mapping or its known fields
    /// can't be read, leaving the caller to decide how to degrade.
    pub fn from_value(value: Value) -> Option<Manifest> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The first alias, in alias-table order, that points at `name`.
    pub fn alias_for(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapOrList {
    Map(IndexMap<String, String>),
    List(Vec<String>),
}

/// Accept a map, or a list whose indices become keys.
fn map_or_list<'de, D, M>(deserializer: D) -> Result<M, D::Error>
where
    D: Deserializer<'de>,
    M: FromIterator<(String, String)>,
{
    Ok(match MapOrList::deserialize(deserializer)? {
        MapOrList::Map(map) => map.into_iter().collect(),
        MapOrList::List(list) => list
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
    })
}

/// Accept `{"w":..,"h":..}`; anything else (`[]`, `null`, junk) is absent.
fn size_or_absent<'de, D>(deserializer: D) -> Result<Option<Dimensions>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
