use crate::error::{ChatError, Result};
use crate::types::{Category, DisplayMessage};
use std::collections::HashMap;

/// Produces a canned reply for one category.
pub type FallbackFn = fn() -> DisplayMessage;

/// Example prompts offered when the input can't be acted on.
pub const SUGGESTIONS: [&str; 5] = [
    "Summarize this YouTube video: https://youtube.com/watch?v=dQw4w9WgXcQ",
    "What's the weather in Tokyo?",
    "Find EV charging stations near Central Park",
    "Draw a cat playing piano",
    "What's the price of Bitcoin?",
];

/// Default reply for unknown intents and insufficient input.
pub fn suggestions() -> DisplayMessage {
    DisplayMessage::text(
        "I'm not sure how to help with that yet. Here are some things you can try:",
    )
    .with_suggestions(SUGGESTIONS)
}

fn youtube() -> DisplayMessage {
    DisplayMessage::text("Here's a summary of that YouTube video:").with_lines([
        "The video discusses climate change impacts on global ecosystems.",
        "Key points include rising sea levels affecting coastal communities.",
        "It presents solutions like renewable energy and policy changes.",
    ])
}

fn weather() -> DisplayMessage {
    DisplayMessage::text("Here's the current weather in Tokyo:").with_lines([
        "Temperature: 22°C (72°F)",
        "Conditions: Partly Cloudy",
        "Humidity: 65%",
        "Wind: 8 km/h",
    ])
}

fn ev() -> DisplayMessage {
    DisplayMessage::text("I found these EV charging stations near Central Park:")
        .with_lines([
            "🔌 Central Park North - 110th St (2 available)",
            "🔌 Columbus Circle Parking (4 available)",
            "🔌 Museum of Natural History Garage (1 available)",
        ])
        .with_map("https://www.google.com/maps/search/ev+charging+stations/@40.7831,-73.9712,14z/")
}

fn image() -> DisplayMessage {
    DisplayMessage::text("I've created an image of a cat playing piano:")
        .with_image("https://via.placeholder.com/400x300/6200ea/FFFFFF?text=Cat+Playing+Piano")
}

fn crypto() -> DisplayMessage {
    DisplayMessage::text("Current Bitcoin price:").with_lines([
        "BTC/USD: $51,432.78 (+2.3% in last 24h)",
        "Market Cap: $986.7 Billion",
        "24h Volume: $32.4 Billion",
    ])
}

/// Canned replies keyed by category, used when the backend is unreachable
/// and when a turn fails unexpectedly.
#[derive(Clone)]
pub struct FallbackTable {
    entries: HashMap<Category, FallbackFn>,
}

impl FallbackTable {
    /// Build a table from explicit entries and check it covers every category.
    pub fn from_entries(entries: impl IntoIterator<Item = (Category, FallbackFn)>) -> Result<Self> {
        let table = Self {
            entries: entries.into_iter().collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// The built-in demo table.
    pub fn standard() -> Result<Self> {
        let entries: [(Category, FallbackFn); 6] = [
            (Category::Youtube, youtube),
            (Category::Weather, weather),
            (Category::Ev, ev),
            (Category::Image, image),
            (Category::Crypto, crypto),
            (Category::Unknown, suggestions),
        ];
        Self::from_entries(entries)
    }

    /// Fail if any category lacks an entry.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|c| !self.entries.contains_key(*c))
            .map(|c| c.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChatError::Config(format!(
                "Fallback table has no entry for: {}",
                missing.join(", ")
            )))
        }
    }

    /// Canned reply for `category`. Falls back to the suggestion message,
    /// which a validated table never needs.
    pub fn get(&self, category: Category) -> DisplayMessage {
        match self.entries.get(&category) {
            Some(make) => make(),
            None => suggestions(),
        }
    }
}

impl std::fmt::Debug for FallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(|c| c.as_str()).collect();
        keys.sort_unstable();
        f.debug_struct("FallbackTable").field("categories", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_covers_all_categories() {
        let table = FallbackTable::standard().unwrap();
        for category in Category::ALL {
            assert!(!table.get(category).is_empty(), "{category} has no fallback");
        }
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let entries: [(Category, FallbackFn); 2] =
            [(Category::Youtube, youtube), (Category::Weather, weather)];
        let err = FallbackTable::from_entries(entries).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ev"));
        assert!(msg.contains("unknown"));
        assert!(!msg.contains("youtube"));
    }

    #[test]
    fn test_image_fallback_text() {
        let table = FallbackTable::standard().unwrap();
        let msg = table.get(Category::Image);
        assert_eq!(
            msg.text.as_deref(),
            Some("I've created an image of a cat playing piano:")
        );
        assert!(msg.image_url.is_some());
    }

    #[test]
    fn test_unknown_maps_to_suggestions() {
        let table = FallbackTable::standard().unwrap();
        let msg = table.get(Category::Unknown);
        assert_eq!(msg.suggestions.as_ref().map(Vec::len), Some(SUGGESTIONS.len()));
    }
}
