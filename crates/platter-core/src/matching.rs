//! Keyword-table regex builders shared by the extractor, weight deriver and classifier.

use regex::Regex;

fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Case-insensitive matcher for whole phrases. Inner spaces match any run of whitespace.
pub(crate) fn phrase_regex(phrases: &[&str]) -> Regex {
    let alternatives: Vec<String> = phrases.iter().map(|p| phrase_pattern(p)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).expect("static phrase table")
}

/// Case-insensitive matcher mixing fragments and words. Fragments match anywhere
/// (`burger` in `Cheeseburger`); words only match whole, optionally plural
/// (`tea` but not `steak`, `cola` but not `chocolate`).
pub(crate) fn keyword_regex(fragments: &[&str], words: &[&str]) -> Regex {
    let mut alternatives: Vec<String> = fragments.iter().map(|f| phrase_pattern(f)).collect();
    if !words.is_empty() {
        let joined: Vec<String> = words.iter().map(|w| phrase_pattern(w)).collect();
        alternatives.push(format!(r"\b(?:{})s?\b", joined.join("|")));
    }
    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).expect("static keyword table")
}

/// Lower-cased text with runs of whitespace collapsed to one space
pub(crate) fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
