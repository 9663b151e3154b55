//! Codepoint token and codepoint map parsing (made by FontLab https://www.fontlab.com/)

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};

/// Icon name to codepoint, in the order the icons were declared.
pub type CodepointMap = IndexMap<String, u32>;

/// Parse a single codepoint token supplied for `icon_name`.
///
/// Accepted shapes, tried in order: a `0x`-prefixed hex literal or plain
/// decimal digits, exactly one character, a CSS escape (`\` followed by one
/// to six hex digits).
pub fn parse_code_point(token: &str, icon_name: &str) -> Result<u32> {
    if let Some(hex) = token.strip_prefix("0x") {
        if is_hex(hex) {
            if let Ok(cp) = u32::from_str_radix(hex, 16) {
                return Ok(cp);
            }
        }
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(cp) = token.parse::<u32>() {
            return Ok(cp);
        }
    }

    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(u32::from(ch));
    }

    if let Some(escape) = token.strip_prefix('\\') {
        if (1..=6).contains(&escape.len()) && is_hex(escape) {
            if let Ok(cp) = u32::from_str_radix(escape, 16) {
                return Ok(cp);
            }
        }
    }

    Err(invalid_code_point(icon_name))
}

/// Read a JSON codepoint map file and parse every entry.
pub async fn parse_codepoints_map(path: &Path) -> Result<CodepointMap> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    parse_codepoints_json(&text)
}

/// Parse codepoint map JSON text (an object of icon name to token).
///
/// Numeric JSON values are read through their decimal text, matching how
/// they would be written as string tokens.
pub fn parse_codepoints_json(text: &str) -> Result<CodepointMap> {
    let raw: IndexMap<String, Value> = serde_json::from_str(text)
        .map_err(|_| Error::validation("Codepoints map is invalid JSON"))?;

    let mut map = CodepointMap::with_capacity(raw.len());
    for (name, value) in raw {
        let cp = match &value {
            Value::String(token) => parse_code_point(token, &name)?,
            Value::Number(num) => parse_code_point(&num.to_string(), &name)?,
            _ => return Err(invalid_code_point(&name)),
        };
        map.insert(name, cp);
    }
    Ok(map)
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn invalid_code_point(icon_name: &str) -> Error {
    Error::validation(format!(
        "Codepoints map contains invalid code point for icon '{icon_name}'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_literals_take_precedence_over_single_chars() {
        assert_eq!(parse_code_point("7", "seven").unwrap(), 7);
        assert_eq!(parse_code_point("0xf101", "home").unwrap(), 0xF101);
        assert_eq!(parse_code_point("61697", "home").unwrap(), 61697);
    }

    #[test]
    fn single_character_and_escape_forms() {
        assert_eq!(parse_code_point("A", "a").unwrap(), 65);
        assert_eq!(parse_code_point("\u{e900}", "pua").unwrap(), 0xE900);
        assert_eq!(parse_code_point("\\0041", "a").unwrap(), 0x41);
        assert_eq!(parse_code_point("\\f", "f").unwrap(), 0xF);
    }

    #[test]
    fn lone_backslash_is_a_single_character() {
        assert_eq!(parse_code_point("\\", "slash").unwrap(), 92);
    }

    #[test]
    fn rejects_unknown_shapes() {
        for token in ["??", "", "0x", "0xzz", "\\1234567", "12a", "\\xyz"] {
            let err = parse_code_point(token, "broken").unwrap_err();
            assert!(err.is_validation(), "{token}");
            assert_eq!(
                err.to_string(),
                "Codepoints map contains invalid code point for icon 'broken'"
            );
        }
    }

    #[test]
    fn parses_map_preserving_order() {
        let map = parse_codepoints_json(
            r#"{"zeta": "0xe001", "alpha": 59394, "beta": "\\e003", "gamma": "Z"}"#,
        )
        .expect("parse map");

        let entries: Vec<(&str, u32)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(
            entries,
            vec![("zeta", 0xE001), ("alpha", 59394), ("beta", 0xE003), ("gamma", 90)]
        );
    }

    #[test]
    fn map_must_be_a_json_object() {
        for text in ["not json", "[1, 2]", "\"text\""] {
            let err = parse_codepoints_json(text).unwrap_err();
            assert_eq!(err.to_string(), "Codepoints map is invalid JSON");
        }
    }

    #[test]
    fn map_reports_the_offending_icon() {
        let err = parse_codepoints_json(r#"{"ok": "0xe001", "bad": true}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Codepoints map contains invalid code point for icon 'bad'"
        );
    }
}
