use once_cell::sync::Lazy;
use regex::Regex;

static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.").unwrap());

/// Collapses whitespace runs to single spaces (non-breaking spaces included),
/// trims, and reattaches periods orphaned by the collapse. Idempotent.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace('\u{a0}', " ");
    let collapsed = MULTI_WHITESPACE.replace_all(&unified, " ");
    SPACE_BEFORE_PERIOD
        .replace_all(collapsed.trim(), ".")
        .into_owned()
}

/// Appends `value` unless already present, preserving insertion order.
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
