//! HTML preview of an emoji set.
//!
//! Stage 4 of the build. Renders one static page listing every active emoji,
//! drawn with the manifest's own `format` template so the preview shows
//! exactly the markup a consumer would embed. Each entry reads:
//!
//! ```text
//! [image]  :name:                 first-alias
//! ```
//!
//! ## Templates
//!
//! The `format` string may use these placeholders, all HTML-escaped on
//! substitution:
//!
//! | Placeholder          | Value for `smile.png` named `grin` |
//! |----------------------|------------------------------------|
//! | `{src}`, `%1$s`      | `smile.png`                        |
//! | `{name}`, `%2$s`     | `grin`                             |
//! | `{filename}`         | `smile.png`                        |
//! | `{basename}`         | `smile`                            |
//! | `{ext}`              | `.png`                             |
//! | `{dir}`              | empty                              |
//!
//! The stylesheet (`static/preview.css`) is embedded at compile time. The
//! image column is sized from the manifest's `maxSize` so names line up.

use crate::manifest::Manifest;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;

const CSS_STATIC: &str = include_str!("../static/preview.css");

/// Render the full preview document.
pub fn render_preview(manifest: &Manifest) -> Markup {
    let column = manifest.max_size.map_or(0, |size| size.width);
    let css = format!(":root {{\n    --emoji-column: {column}px;\n}}\n\n{CSS_STATIC}");
    let name = manifest.name.as_str();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                @if !name.is_empty() {
                    title { (name) }
                }
                style { (PreEscaped(css)) }
            }
            body {
                @if !name.is_empty() {
                    h1 {
                        (name) " "
                        small { (group_thousands(manifest.emoji.len())) " emoji" }
                    }
                }
                div.emoji-list {
                    @for (emoji_name, filename) in &manifest.emoji {
                        (render_entry(manifest, emoji_name, filename))
                    }
                }
            }
        }
    }
}

fn render_entry(manifest: &Manifest, name: &str, filename: &str) -> Markup {
    let img = render_emoji(&manifest.format, name, filename);
    html! {
        span class="emoji-wrap emoji-wrap-1x" {
            span.emoji-img-wrap { (PreEscaped(img)) }
            " :" (name) ":"
            @if let Some(alias) = manifest.alias_for(name) {
                span.alias { (alias) }
            }
        }
        "\n"
    }
}

/// Fill a `format` template for one emoji.
///
/// Substitution is a single left-to-right pass, so a value that happens to
/// contain a placeholder is not expanded again.
pub fn render_emoji(format: &str, name: &str, filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let basename = filename.strip_suffix(ext.as_str()).unwrap_or(filename);

    let tokens: [(&str, &str); 8] = [
        ("%1$s", filename),
        ("%2$s", name),
        ("{src}", filename),
        ("{name}", name),
        ("{dir}", ""),
        ("{filename}", filename),
        ("{basename}", basename),
        ("{ext}", &ext),
    ];

    let mut out = String::with_capacity(format.len() + filename.len());
    let mut rest = format;
    'scan: while let Some(c) = rest.chars().next() {
        for (token, value) in &tokens {
            if let Some(after) = rest.strip_prefix(token) {
                out.push_str(&escape(value));
                rest = after;
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// `1234567` → `1,234,567`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::DEFAULT_FORMAT;
    use crate::types::Dimensions;

    fn manifest_with(emoji: &[(&str, &str)]) -> Manifest {
        let mut manifest = Manifest::default();
        for (name, filename) in emoji {
            manifest.emoji.insert(name.to_string(), filename.to_string());
        }
        manifest
    }

    #[test]
    fn default_template() {
        assert_eq!(
            render_emoji(DEFAULT_FORMAT, "grin", "smile.png"),
            r#"<img class="emoji" src="smile.png" title="grin" alt="grin" />"#
        );
    }

    #[test]
    fn all_placeholders() {
        let format = "%1$s|%2$s|{src}|{name}|{dir}|{filename}|{basename}|{ext}";
        assert_eq!(
            render_emoji(format, "grin", "smile.png"),
            "smile.png|grin|smile.png|grin||smile.png|smile|.png"
        );
    }

    #[test]
    fn values_are_escaped() {
        assert_eq!(
            render_emoji(r#"<i title="{name}">"#, r#"a"&<b>"#, "x.png"),
            r#"<i title="a&quot;&amp;&lt;b&gt;">"#
        );
    }

    #[test]
    fn substituted_values_not_expanded_again() {
        assert_eq!(render_emoji("{name}", "{src}", "x.png"), "{src}");
    }

    #[test]
    fn filename_without_extension() {
        assert_eq!(render_emoji("{basename}[{ext}]", "x", "noext"), "noext[]");
    }

    #[test]
    fn document_lists_emoji_in_order() {
        let mut manifest = manifest_with(&[("wink", "wink.png"), ("smile", "smile.png")]);
        manifest.aliases.insert(":)".into(), "smile".into());

        let html = render_preview(&manifest).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        let smile = html.find(" :smile:").unwrap();
        let wink = html.find(" :wink:").unwrap();
        assert!(smile < wink);
        assert!(html.contains(r#"src="smile.png""#));
        assert!(html.contains(r#"<span class="alias">:)</span>"#));
        assert_eq!(html.matches("class=\"alias\"").count(), 1);
    }

    #[test]
    fn title_and_heading_only_when_named() {
        let unnamed = render_preview(&manifest_with(&[("a", "a.png")])).into_string();
        assert!(!unnamed.contains("<title>"));
        assert!(!unnamed.contains("<h1>"));

        let mut manifest = manifest_with(&[("a", "a.png"), ("b", "b.png")]);
        manifest.name = "Faces & Things".into();
        let named = render_preview(&manifest).into_string();
        assert!(named.contains("<title>Faces &amp; Things</title>"));
        assert!(named.contains("<small>2 emoji</small>"));
    }

    #[test]
    fn column_sized_from_max_width() {
        let mut manifest = manifest_with(&[]);
        manifest.max_size = Some(Dimensions::new(48, 32));
        let html = render_preview(&manifest).into_string();
        assert!(html.contains("--emoji-column: 48px;"));
    }

    #[test]
    fn empty_set_renders() {
        let html = render_preview(&Manifest::default()).into_string();
        assert!(html.contains(r#"<div class="emoji-list"></div>"#));
        assert!(html.contains("--emoji-column: 0px;"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
