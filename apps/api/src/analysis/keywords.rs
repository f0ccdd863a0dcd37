//! Crisis and negative-emotion keyword detection.
//!
//! Matching is case-insensitive substring containment, so a keyword embedded in a
//! longer word still matches ("scared" inside "unscared"). Callers must tolerate
//! those false positives; switching to word-boundary matching changes behavior.

/// Phrases indicating potential self-harm or suicide risk.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end it all",
    "no reason to live",
    "want to die",
    "better off dead",
    "hopeless",
    "can't go on",
    "self harm",
    "hurt myself",
    "cut myself",
    "overdose",
    "give up",
];

/// Negative emotion indicators.
pub const NEGATIVE_EMOTIONS: &[&str] = &[
    "depressed",
    "depression",
    "anxious",
    "anxiety",
    "scared",
    "fear",
    "sad",
    "lonely",
    "isolated",
    "worthless",
    "helpless",
    "desperate",
];

/// Emotion matches beyond this many are dropped (first-found, table order).
pub const MAX_EMOTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordScan {
    pub emotions: Vec<String>,
    pub crisis_flag: bool,
    pub crisis_keywords: Vec<String>,
}

/// Scans text against the crisis and emotion tables.
/// Pure and synchronous; safe to run on every submission.
pub fn detect_crisis_and_emotions(text: &str) -> KeywordScan {
    let text_lower = text.to_lowercase();

    let emotions = matches_in(&text_lower, NEGATIVE_EMOTIONS)
        .take(MAX_EMOTIONS)
        .collect();
    let crisis_keywords: Vec<String> = matches_in(&text_lower, CRISIS_KEYWORDS).collect();

    KeywordScan {
        emotions,
        crisis_flag: !crisis_keywords.is_empty(),
        crisis_keywords,
    }
}

fn matches_in<'a>(
    text_lower: &'a str,
    table: &'static [&'static str],
) -> impl Iterator<Item = String> + 'a {
    table
        .iter()
        .filter(move |&&keyword| text_lower.contains(keyword))
        .map(|&keyword| keyword.to_string())
}
