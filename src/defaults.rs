//! Default alias, archive and editor tables.
//!
//! Every emoji set shares a baseline of text aliases (`:)` → `smile`), names
//! retired from older sets (the archive), and a starter editor shortlist.
//! The stock tables ship inside the binary (`static/defaults.json`); a set
//! can replace them with its own file via `--defaults`.
//!
//! ```json
//! {
//!     "aliases": { ":)": "smile" },
//!     "archive": { "happy": "smile" },
//!     "editor": { ":)": "smile" }
//! }
//! ```
//!
//! The archive maps a retired name (or alias) to the current emoji name it
//! now resolves to. Key order is significant for `aliases` and `editor`.

use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STOCK_DEFAULTS: &str = include_str!("../static/defaults.json");

#[derive(Error, Debug)]
pub enum DefaultsError {
    #[error("Cannot read defaults file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid defaults file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub aliases: IndexMap<String, String>,
    pub archive: IndexMap<String, String>,
    pub editor: IndexMap<String, String>,
}

impl Defaults {
    /// The tables embedded in the binary.
    pub fn stock() -> Self {
        serde_json::from_str(STOCK_DEFAULTS).expect("embedded defaults must parse")
    }

    /// Load tables from a JSON file. Missing sections are empty.
    pub fn load(path: &Path) -> Result<Self, DefaultsError> {
        let content = fs::read_to_string(path).map_err(|source| DefaultsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DefaultsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stock tables, or the file at `path` when one is given.
    pub fn resolve(path: Option<&Path>) -> Result<Self, DefaultsError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::stock()),
        }
    }
}
