//! Editor shortlist selection.
//!
//! The editor shortlist is the handful of emoji an authoring UI shows as
//! quick picks. It renders as a fixed grid, so the list is capped at
//! `max_count` entries and otherwise trimmed to whole rows of `columns`.
//!
//! ## Selection order
//!
//! 1. Candidates are the default editor list overlaid with the current one:
//!    for a shared alias the current choice wins, and new current aliases
//!    follow the defaults.
//! 2. Candidates pointing at emoji that no longer exist are dropped.
//! 3. Candidates already in the current list are kept as they are.
//! 4. New candidates are kept only if the glyph is not wider than tall.
//! 5. The list is capped, or rounded down to whole rows.

use crate::reconcile::overlay;
use crate::types::EmojiRecord;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Grid shape and truncation policy for the shortlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorPolicy {
    pub max_count: usize,
    pub columns: usize,
    /// Keep current picks even when rounding to whole rows would drop them.
    pub keep_grandfathered: bool,
}

impl Default for EditorPolicy {
    fn default() -> Self {
        Self {
            max_count: 16,
            columns: 4,
            keep_grandfathered: false,
        }
    }
}

impl EditorPolicy {
    /// Number of entries to keep out of `len` eligible ones.
    pub fn truncated_len(&self, len: usize) -> usize {
        if len > self.max_count {
            self.max_count
        } else {
            len - len % self.columns.max(1)
        }
    }
}

/// Pick the editor shortlist, alias → emoji name.
///
/// `emoji` is the set the shortlist may reference, keyed by final name.
pub fn select_editor_shortlist(
    current: &IndexMap<String, String>,
    defaults: &IndexMap<String, String>,
    emoji: &BTreeMap<String, &EmojiRecord>,
    policy: &EditorPolicy,
) -> IndexMap<String, String> {
    let candidates = overlay(defaults, current);

    let eligible: IndexMap<String, String> = candidates
        .into_iter()
        .filter(|(alias, name)| match emoji.get(name) {
            None => false,
            Some(record) => current.contains_key(alias) || !record.is_wide(),
        })
        .collect();

    let keep = policy.truncated_len(eligible.len());
    eligible
        .into_iter()
        .enumerate()
        .filter(|(i, (alias, _))| {
            *i < keep || (policy.keep_grandfathered && current.contains_key(alias))
        })
        .map(|(_, entry)| entry)
        .collect()
}
