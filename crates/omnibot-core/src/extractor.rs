use crate::types::{Category, Params};
use regex::Regex;
use std::sync::OnceLock;

const YOUTUBE_URL: &str =
    r"(?i)https?://(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)[a-zA-Z0-9_-]+";
const WEATHER_FILLER: &str = r"(?i)weather|forecast|temperature|in";
const EV_FILLER: &str = r"(?i)ev|charging|station|near|find|stations";
const IMAGE_FILLER: &str = r"(?i)draw|generate|image|picture|of|a";

/// Symbol overrides, checked in order; BTC when none match.
const SYMBOLS: [(&str, &[&str]); 3] = [
    ("ETH", &["ethereum", "eth"]),
    ("SOL", &["solana", "sol"]),
    ("DOGE", &["doge", "dogecoin"]),
];
const DEFAULT_SYMBOL: &str = "BTC";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is valid"))
}

fn youtube_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, YOUTUBE_URL)
}

fn weather_filler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, WEATHER_FILLER)
}

fn ev_filler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, EV_FILLER)
}

fn image_filler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, IMAGE_FILLER)
}

/// Remove every filler occurrence and return what is left, if anything.
///
/// This is substring removal, not tokenization: "Berlin" loses its "in".
fn strip_filler(re: &Regex, text: &str) -> Option<String> {
    let rest = re.replace_all(text, "");
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Symbol keywords are matched case-sensitively on the raw text, so
/// "Ethereum" or "DOGE" still ask for BTC.
fn crypto_symbol(text: &str) -> &'static str {
    SYMBOLS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(symbol, _)| *symbol)
        .unwrap_or(DEFAULT_SYMBOL)
}

/// Derive the request argument for `category` from the user's text.
///
/// `None` means the text does not carry enough to make a request. Crypto
/// never fails: with no symbol keyword it asks for BTC.
pub fn extract(text: &str, category: Category) -> Option<Params> {
    match category {
        Category::Youtube => youtube_url().find(text).map(|m| Params::Youtube {
            url: m.as_str().to_string(),
        }),
        Category::Weather => {
            strip_filler(weather_filler(), text).map(|location| Params::Weather { location })
        }
        Category::Ev => strip_filler(ev_filler(), text).map(|location| Params::Ev { location }),
        Category::Image => strip_filler(image_filler(), text).map(|prompt| Params::Image { prompt }),
        Category::Crypto => Some(Params::Crypto {
            symbol: crypto_symbol(text).to_string(),
        }),
        Category::Unknown => None,
    }
}
