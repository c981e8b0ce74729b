//! Preference Extractor - keyword cues to a [`PreferenceDelta`]
//!
//! Recognises a fixed, enumerable set of English cue patterns. Anything it does not
//! understand is simply left unset; extraction never fails.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Cuisine, DishKind, PreferenceDelta, SpiceLevel};
use crate::error::CollaboratorError;
use crate::matching::{normalize_phrase, phrase_regex};

const SPICE_LITERALS: &[(&str, SpiceLevel)] = &[
    ("not spicy", SpiceLevel::NotSpicy),
    ("non-spicy", SpiceLevel::NotSpicy),
    ("no spice", SpiceLevel::NotSpicy),
    ("without spice", SpiceLevel::NotSpicy),
    ("no chili", SpiceLevel::NotSpicy),
    ("mild", SpiceLevel::Mild),
    ("not too spicy", SpiceLevel::Mild),
    ("slightly spicy", SpiceLevel::Mild),
    ("a little spicy", SpiceLevel::Mild),
    ("a bit spicy", SpiceLevel::Mild),
    ("medium spicy", SpiceLevel::Medium),
    ("medium heat", SpiceLevel::Medium),
    ("moderately spicy", SpiceLevel::Medium),
    ("quite spicy", SpiceLevel::Hot),
    ("pretty spicy", SpiceLevel::Hot),
    ("spicy hot", SpiceLevel::Hot),
    ("very spicy", SpiceLevel::VeryHot),
    ("extra spicy", SpiceLevel::VeryHot),
    ("super spicy", SpiceLevel::VeryHot),
    ("very hot", SpiceLevel::VeryHot),
    ("extra hot", SpiceLevel::VeryHot),
];

// words that end a negation's reach before a spice cue ("no drinks but spicy")
const SPICE_NEGATION_BREAKS: &[&str] = &["but", "and", "or", "though", "although", "just", "so"];

const FILLER_WORDS: &[&str] = &[
    "a", "an", "and", "any", "anything", "no", "not", "or", "the", "some", "to", "of", "with", "it", "them",
    "me", "i", "my", "we", "our", "eat", "eating", "food", "foods", "stuff", "things", "too",
    "also", "either", "something", "thanks", "thank", "you", "in", "at", "all", "more", "much", "very",
];

lazy_static! {
    static ref SPICE_LITERAL: Regex = {
        let mut phrases: Vec<&str> = SPICE_LITERALS.iter().map(|(p, _)| *p).collect();
        // leftmost-first alternation: longer phrases must be tried first
        phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
        phrase_regex(&phrases)
    };
    static ref SPICE_NEGATED: Regex = Regex::new(
        r"(?i)\b(?:no|not|nothing|never|without|avoid|don['’]?t\s+(?:want|like|eat|need)|do\s+not\s+(?:want|like|eat|need)|can['’]?t\s+(?:eat|handle|take)|cannot\s+(?:eat|handle|take))\s+((?:[a-z'’]+\s+){0,3}?)spic(?:y|e)\b"
    )
    .expect("static spice negation pattern");
    static ref SPICE_GENERIC: Regex =
        phrase_regex(&["spicy", "heavy flavor", "strong flavor", "want it hot", "bold flavor"]);
    static ref EXCLUDE_CUE: Regex = Regex::new(
        r"(?i)\b(?:don['’]?t\s+want|do\s+not\s+want|won['’]?t\s+eat|don['’]?t\s+eat|do\s+not\s+eat|can['’]?t\s+eat|cannot\s+eat|avoid|allergic\s+to|without)\b"
    )
    .expect("static exclude cue pattern");
    static ref CLAUSE_END: Regex =
        Regex::new(r"(?i)[.!?;:\n]|\b(?:but|budget|please|for)\b").expect("static clause pattern");
    static ref BUDGET_CUE: Regex = Regex::new(
        r"(?i)\b(?:budget|at\s+most|under|below|less\s+than|no\s+more\s+than|max|up\s+to)\b\D{0,12}?\$?\s*(\d{2,6}(?:\.\d+)?)"
    )
    .expect("static budget pattern");
    static ref BUDGET_UNIT: Regex = Regex::new(
        r"(?i)\$\s*(\d{1,6}(?:\.\d+)?)|\b(\d{1,6}(?:\.\d+)?)\s*(?:dollars?|bucks|usd|ntd|nt|twd|yuan)\b"
    )
    .expect("static currency pattern");
    static ref CUISINE: Regex = phrase_regex(&Cuisine::ALL.map(|c| c.as_str()));
    static ref DRINK_NEGATED: Regex = Regex::new(
        r"(?i)\b(?:(?:no|without|skip|hold|don['’]?t\s+want|do\s+not\s+want|don['’]?t\s+need|do\s+not\s+need|no\s+need\s+for)\s+(?:(?:a|an|the|any|some)\s+)?(?:drinks?|beverages?)|nothing\s+to\s+drink)\b"
    )
    .expect("static drink negation pattern");
    static ref DRINK_AFFIRMED: Regex =
        phrase_regex(&["drink", "drinks", "beverage", "beverages", "thirsty", "something to sip"]);
    static ref PEOPLE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*(?:people|persons|person|pax|guests|diners)\b"
    )
    .expect("static people pattern");
}

/// Extract a preference delta from one user turn.
///
/// Pure and deterministic. Empty or whitespace-only text yields an empty delta.
pub fn extract(text: &str) -> PreferenceDelta {
    let t = text.trim();
    if t.is_empty() {
        return PreferenceDelta::default();
    }

    let excludes = extract_excludes(t);
    let need_drink = extract_need_drink(t, &excludes);

    let delta = PreferenceDelta {
        budget: extract_budget(t),
        spice_level: extract_spice(t),
        need_drink,
        people: extract_people(t),
        cuisine: extract_cuisine(t),
        preferred_dish: extract_dish_kind(t),
        excludes,
        notes: Some(text.to_string()),
    };
    tracing::debug!(?delta, "preferences extracted");
    delta
}

/// Start of the first "no/don't want ... spicy" phrase, if any
fn negated_spice(t: &str) -> Option<usize> {
    SPICE_NEGATED.captures_iter(t).find_map(|caps| {
        let between = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
        if between
            .split_whitespace()
            .any(|word| SPICE_NEGATION_BREAKS.contains(&word))
        {
            return None;
        }
        caps.get(0).map(|m| m.start())
    })
}

fn extract_spice(t: &str) -> Option<SpiceLevel> {
    let negated = negated_spice(t);
    if let Some(m) = SPICE_LITERAL.find(t) {
        // a literal wins ties so "not too spicy" stays mild
        if negated.map_or(true, |start| m.start() <= start) {
            let found = normalize_phrase(m.as_str());
            return SPICE_LITERALS
                .iter()
                .find(|(phrase, _)| *phrase == found)
                .map(|(_, level)| *level);
        }
    }
    if negated.is_some() {
        return Some(SpiceLevel::NotSpicy);
    }
    if SPICE_GENERIC.is_match(t) {
        return Some(SpiceLevel::Hot);
    }
    None
}

fn extract_excludes(t: &str) -> Vec<String> {
    let mut excludes: Vec<String> = Vec::new();
    for cue in EXCLUDE_CUE.find_iter(t) {
        let rest = &t[cue.end()..];
        let segment = match CLAUSE_END.find(rest) {
            Some(stop) => &rest[..stop.start()],
            None => rest,
        };
        for raw in segment.split(|c: char| c == ',' || c.is_whitespace()) {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty()
                || !token.chars().any(|c| c.is_alphabetic())
                || FILLER_WORDS.contains(&token.as_str())
            {
                continue;
            }
            if !excludes.contains(&token) {
                excludes.push(token);
            }
        }
    }
    excludes
}

fn extract_budget(t: &str) -> Option<f64> {
    if let Some(caps) = BUDGET_CUE.captures(t) {
        return caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
    }
    let caps = BUDGET_UNIT.captures(t)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn extract_cuisine(t: &str) -> Option<Cuisine> {
    let found = normalize_phrase(CUISINE.find(t)?.as_str());
    Cuisine::ALL.into_iter().find(|c| c.as_str() == found)
}

fn extract_dish_kind(t: &str) -> Option<DishKind> {
    let lower = t.to_lowercase();
    DishKind::ALL
        .into_iter()
        .find(|kind| kind.keywords().iter().any(|k| lower.contains(k)))
}

fn extract_need_drink(t: &str, excludes: &[String]) -> Option<bool> {
    if excludes.iter().any(|e| e == "drink") {
        Some(false)
    } else if DRINK_NEGATED.is_match(t) {
        Some(false)
    } else if DRINK_AFFIRMED.is_match(t) {
        Some(true)
    } else {
        None
    }
}

fn extract_people(t: &str) -> Option<u32> {
    PEOPLE
        .captures_iter(t)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .find(|n| (1..=99).contains(n))
}

/// Pluggable preference extraction strategy
pub trait Extractor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn extract(&self, text: &str) -> Result<PreferenceDelta, CollaboratorError>;
}

/// Keyword extractor. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl Extractor for KeywordExtractor {
    fn name(&self) -> &str {
        "keyword"
    }

    fn extract(&self, text: &str) -> Result<PreferenceDelta, CollaboratorError> {
        Ok(extract(text))
    }
}

/// Keyword extraction refined by an optional overlay extractor.
///
/// The overlay fills fields the keyword pass left unset and may replace the dish kind.
/// If the overlay fails the keyword delta is used as is.
pub struct LayeredExtractor {
    overlay: Option<Box<dyn Extractor>>,
}

impl LayeredExtractor {
    /// Keyword extraction only
    pub fn new() -> Self {
        Self { overlay: None }
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Extractor>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

impl Default for LayeredExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayeredExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredExtractor")
            .field("overlay", &self.overlay.as_ref().map(|o| o.name().to_string()))
            .finish()
    }
}

impl Extractor for LayeredExtractor {
    fn name(&self) -> &str {
        "layered"
    }

    fn extract(&self, text: &str) -> Result<PreferenceDelta, CollaboratorError> {
        let mut delta = extract(text);
        if delta.is_empty() {
            return Ok(delta);
        }
        if let Some(overlay) = &self.overlay {
            match overlay.extract(text) {
                Ok(refined) => delta.fill_from(refined),
                Err(err) => tracing::warn!(
                    extractor = overlay.name(),
                    error = %err,
                    "extractor overlay failed, keeping keyword preferences"
                ),
            }
        }
        Ok(delta)
    }
}
