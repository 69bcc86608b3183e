//! PHP array files: `<?php return array (...);`
//!
//! The writer emits the layout of PHP's `var_export`, minus the trailing
//! space `var_export` leaves after `=>` before a nested array. The parser
//! reads that layout back, plus the short `[...]` syntax and the usual scalar
//! literals. It does not evaluate PHP: expressions, constants and objects are
//! rejected.
//!
//! Values travel as [`serde_json::Value`]. A PHP array whose keys are exactly
//! `0..n` in order becomes a JSON list; any other array becomes an object with
//! stringified keys. An empty array is a list.

use serde_json::{Map, Number, Value};
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("{message} at byte {offset}")]
pub struct PhpParseError {
    pub offset: usize,
    pub message: String,
}

// =========================================================================
// Writer
// =========================================================================

/// Render a complete PHP file returning `value`.
pub fn to_php(value: &Value) -> String {
    let mut out = String::from("<?php return ");
    export(value, 0, &mut out);
    out.push_str(";\n");
    out
}

fn export(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => export_number(n, out),
        Value::String(s) => export_string(s, out),
        Value::Array(items) => {
            let entries = items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v));
            export_array(entries, depth, out);
        }
        Value::Object(map) => {
            let entries = map.iter().map(|(k, v)| (export_key(k), v));
            export_array(entries, depth, out);
        }
    }
}

fn export_array<'a>(
    entries: impl Iterator<Item = (String, &'a Value)>,
    depth: usize,
    out: &mut String,
) {
    let pad = "  ".repeat(depth);
    out.push_str("array (\n");
    for (key, value) in entries {
        let _ = write!(out, "{pad}  {key} =>");
        if value.is_array() || value.is_object() {
            let _ = write!(out, "\n{pad}  ");
        } else {
            out.push(' ');
        }
        export(value, depth + 1, out);
        out.push_str(",\n");
    }
    out.push_str(&pad);
    out.push(')');
}

/// Integer-looking keys are written bare, as PHP itself normalizes them.
fn export_key(key: &str) -> String {
    match key.parse::<i64>() {
        Ok(n) if n.to_string() == key => key.to_string(),
        _ => {
            let mut out = String::new();
            export_string(key, &mut out);
            out
        }
    }
}

fn export_string(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

fn export_number(n: &Number, out: &mut String) {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        if f.fract() == 0.0 && f.is_finite() {
            let _ = write!(out, "{f:.1}");
        } else {
            let _ = write!(out, "{f}");
        }
    } else {
        let _ = write!(out, "{n}");
    }
}

// =========================================================================
// Parser
// =========================================================================

/// Parse the text of a PHP file that returns an array literal.
pub fn from_php(text: &str) -> Result<Value, PhpParseError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    parser.skip_trivia();
    parser.eat_keyword("<?php");
    parser.skip_trivia();
    parser.eat_keyword("return");
    let value = parser.value()?;
    parser.skip_trivia();
    parser.eat(';');
    parser.skip_trivia();
    parser.eat_keyword("?>");
    parser.skip_trivia();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing content"));
    }
    Ok(value)
}

/// Array key as written in the source.
enum Key {
    Int(i64),
    Str(String),
}

/// Array nesting limit, the same as serde_json's recursion limit.
const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> PhpParseError {
        PhpParseError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), PhpParseError> {
        self.skip_trivia();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    /// Consume `word` case-insensitively when it is next and not followed by
    /// an identifier character.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        let matches = rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
            && !rest[word.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if matches {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Whitespace and `//`, `#`, `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            let rest = self.rest();
            if rest.starts_with("//") || (rest.starts_with('#') && !rest.starts_with("#[")) {
                let end = rest.find('\n').unwrap_or(rest.len());
                self.pos += end;
            } else if rest.starts_with("/*") {
                let end = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
                self.pos += end;
            } else {
                break;
            }
        }
    }

    fn value(&mut self) -> Result<Value, PhpParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('[') => {
                self.bump();
                self.array_body(']')
            }
            Some('\'') => self.single_quoted().map(Value::String),
            Some('"') => self.double_quoted().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(_) => {
                if self.eat_keyword("array") {
                    self.expect('(')?;
                    self.array_body(')')
                } else if self.eat_keyword("true") {
                    Ok(Value::Bool(true))
                } else if self.eat_keyword("false") {
                    Ok(Value::Bool(false))
                } else if self.eat_keyword("null") {
                    Ok(Value::Null)
                } else {
                    Err(self.error("unsupported expression"))
                }
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array_body(&mut self, close: char) -> Result<Value, PhpParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = self.array_entries(close);
        self.depth -= 1;
        value
    }

    fn array_entries(&mut self, close: char) -> Result<Value, PhpParseError> {
        let mut entries: Vec<(Key, Value)> = Vec::new();
        let mut next_index: i64 = 0;

        loop {
            self.skip_trivia();
            if self.eat(close) {
                break;
            }

            let first = self.value()?;
            self.skip_trivia();
            let (key, value) = if self.rest().starts_with("=>") {
                self.pos += 2;
                let key = match first {
                    Value::String(s) => match s.parse::<i64>() {
                        Ok(n) if n.to_string() == s => Key::Int(n),
                        _ => Key::Str(s),
                    },
                    Value::Number(n) => match n.as_i64() {
                        Some(i) => Key::Int(i),
                        None => return Err(self.error("array keys must be integers or strings")),
                    },
                    Value::Bool(b) => Key::Int(b as i64),
                    _ => return Err(self.error("array keys must be integers or strings")),
                };
                (key, self.value()?)
            } else {
                (Key::Int(next_index), first)
            };

            if let Key::Int(i) = key {
                next_index = next_index.max(i.saturating_add(1));
            }
            match entries.iter_mut().find(|(k, _)| same_key(k, &key)) {
                Some(existing) => existing.1 = value,
                None => entries.push((key, value)),
            }

            self.skip_trivia();
            if self.eat(',') {
                continue;
            }
            self.expect(close)?;
            break;
        }

        Ok(into_value(entries))
    }

    fn single_quoted(&mut self) -> Result<String, PhpParseError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.peek() {
                    Some(c @ ('\\' | '\'')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn double_quoted(&mut self) -> Result<String, PhpParseError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '"' | '$')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some('$') if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '{') => {
                    return Err(self.error("string interpolation is not supported"));
                }
                Some('"') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<Value, PhpParseError> {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(i, c)| {
                !(c.is_ascii_digit()
                    || c == '.'
                    || c == 'e'
                    || c == 'E'
                    || c == '_'
                    || ((c == '-' || c == '+') && (i == 0 || self.rest()[..i].ends_with(['e', 'E']))))
            })
            .map_or(self.rest().len(), |(i, _)| i);
        let literal: String = self.rest()[..len].chars().filter(|&c| c != '_').collect();
        self.pos += len;

        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Value::from(i));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(PhpParseError {
                offset: start,
                message: format!("invalid number '{literal}'"),
            })
    }
}

fn same_key(a: &Key, b: &Key) -> bool {
    match (a, b) {
        (Key::Int(x), Key::Int(y)) => x == y,
        (Key::Str(x), Key::Str(y)) => x == y,
        _ => false,
    }
}

fn into_value(entries: Vec<(Key, Value)>) -> Value {
    let sequential = entries
        .iter()
        .enumerate()
        .all(|(i, (key, _))| matches!(key, Key::Int(k) if *k == i as i64));

    if sequential {
        Value::Array(entries.into_iter().map(|(_, v)| v).collect())
    } else {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value)| match key {
                Key::Int(i) => (i.to_string(), value),
                Key::Str(s) => (s, value),
            })
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_var_export_layout() {
        let value = json!({
            "name": "Set",
            "emoji": { "smile": "smile.png" },
            "sizes": [1, 2],
        });
        let expected = "<?php return array (\n  'name' => 'Set',\n  'emoji' =>\n  array (\n    'smile' => 'smile.png',\n  ),\n  'sizes' =>\n  array (\n    0 => 1,\n    1 => 2,\n  ),\n);\n";
        assert_eq!(to_php(&value), expected);
    }

    #[test]
    fn writes_empty_array() {
        assert_eq!(
            to_php(&json!({ "aliases": {} })),
            "<?php return array (\n  'aliases' =>\n  array (\n  ),\n);\n"
        );
    }

    #[test]
    fn writes_scalars() {
        assert_eq!(to_php(&json!(1.5)), "<?php return 1.5;\n");
        assert_eq!(to_php(&json!(2.0)), "<?php return 2.0;\n");
        assert_eq!(to_php(&json!(null)), "<?php return NULL;\n");
        assert_eq!(to_php(&json!(true)), "<?php return true;\n");
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(
            to_php(&json!("it's a \\ path")),
            "<?php return 'it\\'s a \\\\ path';\n"
        );
    }

    #[test]
    fn numeric_string_keys_written_bare() {
        let out = to_php(&json!({ "10": "a", "x": "b" }));
        assert!(out.contains("  10 => 'a',"));
        assert!(out.contains("  'x' => 'b',"));
    }

    #[test]
    fn parses_what_it_writes() {
        let value = json!({
            "name": "It's here",
            "format": "<img src=\"{src}\" />",
            "emoji": { "smile": "smile.png", "wink": "wink.png" },
            "aliases": { ":)": "smile", ";)": "wink" },
            "maxSize": { "w": 32, "h": 30 },
            "sizes": [1, 1.5, 2],
            "nothing": null,
            "flag": false,
        });
        assert_eq!(from_php(&to_php(&value)).unwrap(), value);
    }

    #[test]
    fn parse_keeps_key_order() {
        let value = from_php("<?php return array('b' => 1, 'a' => 2);").unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn parses_short_syntax_and_comments() {
        let text = r#"<?php
            // generated
            return [
                'name' => "Set\tOne", # inline
                /* block */ 'sizes' => [1, 2],
                'aliases' => [],
            ];
        "#;
        assert_eq!(
            from_php(text).unwrap(),
            json!({ "name": "Set\tOne", "sizes": [1, 2], "aliases": [] })
        );
    }

    #[test]
    fn implicit_and_explicit_int_keys() {
        assert_eq!(from_php("<?php return array('a', 'b');").unwrap(), json!(["a", "b"]));
        assert_eq!(
            from_php("<?php return array(1 => 'a', 2 => 'b');").unwrap(),
            json!({ "1": "a", "2": "b" })
        );
        assert_eq!(
            from_php("<?php return array('0' => 'a', '1' => 'b');").unwrap(),
            json!(["a", "b"])
        );
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        assert_eq!(
            from_php("<?php return array('a' => 1, 'a' => 2);").unwrap(),
            json!({ "a": 2 })
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            from_php("<?php return ARRAY(TRUE, NULL, False);").unwrap(),
            json!([true, null, false])
        );
    }

    #[test]
    fn negative_and_float_numbers() {
        assert_eq!(
            from_php("<?php return [-3, 1.25, 1e2];").unwrap(),
            json!([-3, 1.25, 100.0])
        );
    }

    #[test]
    fn rejects_expressions() {
        let err = from_php("<?php return array('a' => FOO);").unwrap_err();
        assert_eq!(err.message, "unsupported expression");
        assert!(from_php("<?php return array('a' => 'b'").is_err());
        assert!(from_php("<?php return 'unterminated").is_err());
        assert!(from_php("<?php return array(); echo 1;").is_err());
    }

    #[test]
    fn rejects_interpolation() {
        assert!(from_php(r#"<?php return "$name";"#).is_err());
    }

    #[test]
    fn rejects_deep_nesting() {
        let text = format!("<?php return {};", "[".repeat(200_000));
        let err = from_php(&text).unwrap_err();
        assert_eq!(err.message, "nesting too deep");
        assert_eq!(err.offset, 13 + MAX_DEPTH + 1);
    }

    #[test]
    fn nesting_at_limit_parses() {
        let text = format!(
            "<?php return {}{};",
            "[".repeat(MAX_DEPTH),
            "]".repeat(MAX_DEPTH)
        );
        assert!(from_php(&text).is_ok());
    }

    #[test]
    fn largest_int_key_does_not_overflow() {
        let value = from_php("<?php return array (9223372036854775807 => 'x');").unwrap();
        assert_eq!(value, json!({ "9223372036854775807": "x" }));
    }

    #[test]
    fn error_reports_offset() {
        let err = from_php("<?php return [1, ?];").unwrap_err();
        assert_eq!(err.offset, 17);
    }
}
