use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of intents the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Youtube,
    Weather,
    Ev,
    Image,
    Crypto,
    Unknown,
}

impl Category {
    /// Every category, in classifier priority order with `Unknown` last.
    pub const ALL: [Category; 6] = [
        Category::Youtube,
        Category::Weather,
        Category::Ev,
        Category::Image,
        Category::Crypto,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Youtube => "youtube",
            Category::Weather => "weather",
            Category::Ev => "ev",
            Category::Image => "image",
            Category::Crypto => "crypto",
            Category::Unknown => "unknown",
        }
    }

    /// Endpoint path relative to the API base. `Unknown` has no endpoint.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Category::Youtube => Some("/youtube/summarize"),
            Category::Weather => Some("/weather/current"),
            Category::Ev => Some("/ev/nearby"),
            Category::Image => Some("/image/generate"),
            Category::Crypto => Some("/crypto/price"),
            Category::Unknown => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured argument extracted from user text. Serializes to the exact
/// request body the category's endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Params {
    Youtube { url: String },
    Weather { location: String },
    Ev { location: String },
    Image { prompt: String },
    Crypto { symbol: String },
}

impl Params {
    pub fn category(&self) -> Category {
        match self {
            Params::Youtube { .. } => Category::Youtube,
            Params::Weather { .. } => Category::Weather,
            Params::Ev { .. } => Category::Ev,
            Params::Image { .. } => Category::Image,
            Params::Crypto { .. } => Category::Crypto,
        }
    }
}

/// A bot reply in display shape. Every field is optional; renderers draw
/// whichever are present, in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl DisplayMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_map(mut self, url: impl Into<String>) -> Self {
        self.map_url = Some(url.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = Some(suggestions.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.lines.is_none()
            && self.image_url.is_none()
            && self.map_url.is_none()
            && self.suggestions.is_none()
    }
}

/// What the dispatcher hands to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Decoded JSON body of a successful response.
    Payload(serde_json::Value),
    /// Canned reply substituted for a failed request, already in display shape.
    Fallback(DisplayMessage),
    /// The request failed and no fallback applies.
    NoResponse,
}

impl RawResponse {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RawResponse::Fallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_serialize_as_request_body() {
        let body = serde_json::to_value(Params::Weather {
            location: "Tokyo".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"location": "Tokyo"}));

        let body = serde_json::to_value(Params::Crypto {
            symbol: "ETH".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"symbol": "ETH"}));
    }

    #[test]
    fn test_every_known_category_has_endpoint() {
        for category in Category::ALL {
            assert_eq!(category.endpoint().is_none(), category == Category::Unknown);
        }
    }

    #[test]
    fn test_display_message_skips_absent_fields() {
        let msg = DisplayMessage::text("hi").with_image("https://img.example/1.png");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hi", "image_url": "https://img.example/1.png"})
        );
        assert!(DisplayMessage::default().is_empty());
        assert!(!msg.is_empty());
    }
}
