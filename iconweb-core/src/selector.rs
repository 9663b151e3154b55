//! Lenient CSS selector splitting.
//!
//! Malformed selectors are never rejected: whatever matches the restricted
//! identifier class is kept, the rest is ignored.

use std::sync::OnceLock;

use regex::Regex;

/// Tag and class names recovered from a selector such as `span.foo.bar`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub class_names: Vec<String>,
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r#"^[a-zA-Z0-9='"\[\]_-]*"#).expect("valid tag regex"))
}

fn class_pattern() -> &'static Regex {
    static CLASS: OnceLock<Regex> = OnceLock::new();
    CLASS.get_or_init(|| Regex::new(r#"\.([a-zA-Z0-9='"\[\]_-]+)"#).expect("valid class regex"))
}

/// Split `selector` into its leading tag and `.class` names.
///
/// An empty leading run yields no tag, so callers fall back to their own
/// default tag.
pub fn parse_selector(selector: &str) -> Selector {
    if selector.is_empty() {
        return Selector::default();
    }

    let tag = tag_pattern()
        .find(selector)
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let class_names = class_pattern()
        .captures_iter(selector)
        .map(|caps| caps[1].to_string())
        .collect();

    Selector { tag, class_names }
}
