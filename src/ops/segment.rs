use std::sync::LazyLock;

use regex::Regex;

/// Separators that delimit task titles inside one utterance: " and ",
/// a comma with optional surrounding whitespace, or " then ".
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) and |\s*,\s*| then ").unwrap());

/// Split one dictated utterance into candidate task titles, in source
/// order.
///
/// This is a syntactic heuristic, not semantic parsing: it has no notion
/// of grammar, so "bread and butter" splits into two titles even though a
/// human means one grocery item. Do not widen the separator set without
/// changing the documented behavior.
pub fn segment_transcript(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let titles: Vec<String> = SEPARATORS
        .split(trimmed)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(capitalize_first)
        .collect();

    if titles.is_empty() {
        // Every fragment was empty; keep the whole utterance as one task
        return vec![capitalize_first(trimmed)];
    }
    titles
}

/// Uppercase only the first character, leaving the rest untouched.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
