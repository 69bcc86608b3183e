//! Reconciling a fresh scan with the previous manifest.
//!
//! Stage 2 of the build. A rescan only knows what the files are called; the
//! previous manifest knows what the user decided about them. This module
//! merges the two into a new [`Manifest`]:
//!
//! 1. **Renames**: identity is anchored to the filename. If `smile.png` was
//!    stored as `happy` last time, it stays `happy`.
//! 2. **Archive**: names listed in the default archive leave the active set.
//! 3. **Aliases**: default aliases overlaid with the previous ones, minus any
//!    that point at missing emoji.
//! 4. **Archive backfill**: every archived alias whose target is still active
//!    also resolves through the archive, so old links keep working.
//! 5. **Editor**: see [`crate::editor`].
//! 6. **Sizes**: bounds come from the scan, falling back to the previous
//!    manifest for an empty directory.
//! 7. **Passthrough**: free-text metadata, the template and unknown keys carry
//!    over. Computed fields never do.
//!
//! Nothing here fails. Stale references in the previous manifest are dropped
//! silently, because old user state must never block a rebuild.

use crate::defaults::Defaults;
use crate::editor::{EditorPolicy, select_editor_shortlist};
use crate::manifest::Manifest;
use crate::scan::ScanResult;
use crate::types::EmojiRecord;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// Overlay `top` onto `base`.
///
/// For keys in both, `top`'s value wins and the key keeps its position from
/// `base`. Keys only in `top` are appended in `top`'s order.
pub fn overlay(
    base: &IndexMap<String, String>,
    top: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in top {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Build the new manifest from the previous one, a scan and the defaults.
pub fn reconcile(
    prior: &Manifest,
    scan: &ScanResult,
    defaults: &Defaults,
    policy: &EditorPolicy,
) -> Manifest {
    // Later names win when the previous manifest lists a file twice.
    let known_files: HashMap<&str, &str> = prior
        .emoji
        .iter()
        .map(|(name, filename)| (filename.as_str(), name.as_str()))
        .collect();

    let mut emoji: BTreeMap<String, String> = BTreeMap::new();
    let mut archive: BTreeMap<String, String> = BTreeMap::new();
    let mut active: BTreeMap<String, &EmojiRecord> = BTreeMap::new();

    for record in scan.emoji.values() {
        let name = match known_files.get(record.filename.as_str()) {
            Some(prior_name) => {
                if *prior_name != record.name {
                    tracing::debug!("Keeping name {prior_name} for {}", record.filename);
                }
                prior_name.to_string()
            }
            None => record.name.clone(),
        };

        if defaults.archive.contains_key(&name) {
            archive.insert(name, record.filename.clone());
        } else {
            emoji.insert(name.clone(), record.filename.clone());
            active.insert(name, record);
        }
    }

    let aliases: IndexMap<String, String> = overlay(&defaults.aliases, &prior.aliases)
        .into_iter()
        .filter(|(_, name)| emoji.contains_key(name))
        .collect();

    for (alias, name) in &defaults.archive {
        if let Some(filename) = emoji.get(name) {
            archive.insert(alias.clone(), filename.clone());
        }
    }

    let editor = select_editor_shortlist(&prior.editor, &defaults.editor, &active, policy);

    Manifest {
        name: prior.name.clone(),
        author: prior.author.clone(),
        description: prior.description.clone(),
        format: prior.format.clone(),
        emoji,
        aliases,
        editor,
        archive,
        min_size: scan.min_size.or(prior.min_size),
        max_size: scan.max_size.or(prior.max_size),
        sizes: scan.multipliers.iter().copied().collect(),
        extra: prior.extra.clone(),
    }
}
