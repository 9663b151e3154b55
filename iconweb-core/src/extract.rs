//! Recover the icon-name-to-codepoint map from generated stylesheet text.
//!
//! Engines that report a structured map make this unnecessary; it stays as
//! the compatibility path for engines that only hand back CSS.

use std::sync::OnceLock;

use indexmap::IndexMap;
use log::warn;
use regex::Regex;

use crate::codepoint::{parse_code_point, CodepointMap};

fn rule_pattern() -> &'static Regex {
    static RULE: OnceLock<Regex> = OnceLock::new();
    RULE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[^\n-]*-([^\s:]+):before[^\n]*?(?:\n[ \t]*)?content:[ \t]*"(\\)?([^"]*)""#,
        )
        .expect("valid rule regex")
    })
}

/// The quoted `content` of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RuleContent {
    /// Whether the text followed a backslash (a CSS hex escape).
    escaped: bool,
    text: String,
}

fn scan(css: &str) -> IndexMap<String, RuleContent> {
    let normalized = css.replace("\r\n", "\n");
    let mut out = IndexMap::new();
    for caps in rule_pattern().captures_iter(&normalized) {
        out.insert(
            caps[1].to_string(),
            RuleContent {
                escaped: caps.get(2).is_some(),
                text: caps[3].to_string(),
            },
        );
    }
    out
}

/// Scan `css` for `-<name>:before { content: "<code>" }` rules.
///
/// Keys keep the order in which they first appear; values are the raw text
/// between the quotes without the leading backslash (`"\f101"` gives `f101`).
pub fn extract_codepoints(css: &str) -> IndexMap<String, String> {
    scan(css)
        .into_iter()
        .map(|(name, content)| (name, content.text))
        .collect()
}

/// Scan `css` and turn each recovered code into an integer codepoint.
///
/// Escaped content is read as hex; unescaped content must be exactly one
/// character. Rules matching neither are left out.
pub fn codepoints_from_css(css: &str) -> CodepointMap {
    let mut map = CodepointMap::new();
    for (name, content) in scan(css) {
        let parsed = if content.escaped {
            parse_code_point(&format!("\\{}", content.text), &name).ok()
        } else {
            single_char(&content.text)
        };
        match parsed {
            Some(cp) => {
                map.insert(name, cp);
            }
            None => warn!("skipping '{name}': content {:?} is not a codepoint", content.text),
        }
    }
    map
}

fn single_char(text: &str) -> Option<u32> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(u32::from(ch)),
        _ => None,
    }
}
