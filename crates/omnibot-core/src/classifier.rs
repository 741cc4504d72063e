use crate::types::Category;

/// Keyword sets in priority order. The first set with any substring hit wins,
/// so the order here is the tie-break rule.
const KEYWORDS: [(Category, &[&str]); 5] = [
    (Category::Youtube, &["youtube", "summarize", "video"]),
    (Category::Weather, &["weather", "forecast"]),
    (Category::Ev, &["ev", "charging", "station"]),
    (Category::Image, &["draw", "generate", "image", "picture"]),
    (Category::Crypto, &["bitcoin", "price", "crypto", "eth"]),
];

/// Guess the intent of free text by case-insensitive substring search.
///
/// Matching is on raw substrings, not words: "every" contains "ev" and so
/// classifies as [`Category::Ev`] unless an earlier set matched first.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown)
}
