//! CLI output formatting for the build command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each emoji leads with
//! its positional index and name; the file it comes from and the aliases that
//! reach it are indented context lines. A renamed emoji therefore reads as
//! its chosen name, with the filename underneath.
//!
//! # Output Format
//!
//! ```text
//! Emoji
//! 001 grin
//!     Source: smile.png
//!     Aliases: :) :-)
//! 002 wink
//!     Source: wink.png
//!
//! Archive
//!     happy → smile.png
//!
//! Editor
//!     :) → grin
//!
//! Warnings
//!     wink is missing @2x
//!
//! Manifest: emoji/manifest.json (json)
//! Preview: emoji/preview.html
//! Built 2 emoji from 3 files, 1 archived, 2 aliases, 1 in editor
//! ```
//!
//! Empty sections are omitted.
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O, so they can be
//! tested directly; `print_*` wrappers write to stdout.

use crate::manifest::Manifest;
use crate::pipeline::BuildReport;
use crate::scan::ScanWarning;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format the emoji inventory: index + name, then source and aliases.
pub fn format_emoji_list(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    if manifest.emoji.is_empty() {
        return lines;
    }

    lines.push("Emoji".to_string());
    for (i, (name, filename)) in manifest.emoji.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), name));
        lines.push(format!("{}Source: {}", indent(1), filename));

        let aliases: Vec<&str> = manifest
            .aliases
            .iter()
            .filter(|(_, target)| *target == name)
            .map(|(alias, _)| alias.as_str())
            .collect();
        if !aliases.is_empty() {
            lines.push(format!("{}Aliases: {}", indent(1), aliases.join(" ")));
        }
    }
    lines
}

fn format_mapping<'a>(
    title: &str,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    lines.extend(entries.map(|(key, value)| format!("{}{} → {}", indent(1), key, value)));
    if lines.len() == 1 { Vec::new() } else { lines }
}

fn format_warnings(warnings: &[ScanWarning]) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Warnings".to_string()];
    lines.extend(warnings.iter().map(|w| format!("{}{}", indent(1), w)));
    lines
}

/// Format the full build summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let manifest = &report.manifest;
    let sections = [
        format_emoji_list(manifest),
        format_mapping("Archive", manifest.archive.iter()),
        format_mapping("Editor", manifest.editor.iter()),
        format_warnings(&report.warnings),
    ];

    let mut lines = Vec::new();
    for section in sections.into_iter().filter(|s| !s.is_empty()) {
        lines.extend(section);
        lines.push(String::new());
    }

    lines.push(format!("Images: {}", report.image_dir.display()));
    lines.push(format!(
        "Manifest: {} ({})",
        report.manifest_path.display(),
        report.format
    ));
    if let Some(preview) = &report.preview_path {
        lines.push(format!("Preview: {}", preview.display()));
    }
    lines.push(format!(
        "Built {} from {}, {} archived, {}, {} in editor",
        plural(manifest.emoji.len(), "emoji", "emoji"),
        plural(report.files, "file", "files"),
        manifest.archive.len(),
        plural(manifest.aliases.len(), "alias", "aliases"),
        manifest.editor.len(),
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
