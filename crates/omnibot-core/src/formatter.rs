use crate::error::{ChatError, Result};
use crate::fallback;
use crate::types::{Category, DisplayMessage, RawResponse};
use crate::wire::{CryptoResponse, EvResponse, ImageResponse, WeatherResponse, YoutubeResponse};
use serde::de::DeserializeOwned;

const NO_RESPONSE_TEXT: &str =
    "I'm having trouble with that request right now. Please try again later.";
const NO_RESPONSE_DETAIL: &str = "There was an error processing your request.";

const BILLION: f64 = 1_000_000_000.0;

/// Project a backend answer into display shape.
///
/// Fallback payloads pass through untouched and `NoResponse` becomes a
/// generic error message. A payload that doesn't decode as the category's
/// response type is an [`ChatError::UnexpectedResponse`].
pub fn format(category: Category, raw: &RawResponse) -> Result<DisplayMessage> {
    let value = match raw {
        RawResponse::Fallback(message) => return Ok(message.clone()),
        RawResponse::NoResponse => {
            return Ok(DisplayMessage::text(NO_RESPONSE_TEXT).with_lines([NO_RESPONSE_DETAIL]))
        }
        RawResponse::Payload(value) => value,
    };

    let message = match category {
        Category::Youtube => {
            let r: YoutubeResponse = decode(category, value)?;
            DisplayMessage::text(format!("Here's a summary of \"{}\":", r.title)).with_lines(r.summary)
        }
        Category::Weather => {
            let w = decode::<WeatherResponse>(category, value)?.weather;
            DisplayMessage::text(format!("Current weather in {}:", w.location)).with_lines([
                format!(
                    "Temperature: {}°C ({:.1}°F)",
                    w.temperature, w.temperature_fahrenheit
                ),
                format!("Conditions: {}", w.conditions),
                format!("Humidity: {}%", w.humidity),
                format!("Wind Speed: {} km/h", w.wind_speed),
            ])
        }
        Category::Ev => {
            let r: EvResponse = decode(category, value)?;
            let stations = r
                .stations
                .iter()
                .map(|s| format!("🔌 {} - {}/{} available", s.name, s.available, s.total));
            DisplayMessage::text(format!(
                "I found these EV charging stations near {}:",
                r.location
            ))
            .with_lines(stations)
            .with_map(r.map_url)
        }
        Category::Image => {
            let r: ImageResponse = decode(category, value)?;
            DisplayMessage::text(format!("I've created an image based on: \"{}\"", r.prompt))
                .with_image(r.image_url)
        }
        Category::Crypto => {
            let r: CryptoResponse = decode(category, value)?;
            let c = r.crypto;
            DisplayMessage::text(format!("Current {} ({}) price:", r.name, r.symbol)).with_lines([
                format!(
                    "{}/USD: ${} ({}{:.2}% in last 24h)",
                    r.symbol,
                    group_thousands(c.price),
                    if c.change_24h > 0.0 { "+" } else { "" },
                    c.change_24h
                ),
                format!("Market Cap: ${:.1} Billion", c.market_cap / BILLION),
                format!("24h Volume: ${:.1} Billion", c.volume_24h / BILLION),
            ])
        }
        Category::Unknown => fallback::suggestions(),
    };
    Ok(message)
}

fn decode<T: DeserializeOwned>(category: Category, value: &serde_json::Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| ChatError::UnexpectedResponse {
        category: category.to_string(),
        message: e.to_string(),
    })
}

/// US-style number: comma thousands separators, at most three decimals,
/// trailing zeros dropped.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RawResponse {
        RawResponse::Payload(value)
    }

    #[test]
    fn test_youtube_summary() {
        let raw = payload(json!({
            "title": "Rust in 100 Seconds",
            "summary": ["Memory safety", "No GC"],
            "url": "https://youtube.com/watch?v=abc"
        }));
        let msg = format(Category::Youtube, &raw).unwrap();
        assert_eq!(
            msg.text.as_deref(),
            Some("Here's a summary of \"Rust in 100 Seconds\":")
        );
        assert_eq!(
            msg.lines,
            Some(vec!["Memory safety".to_string(), "No GC".to_string()])
        );
    }

    #[test]
    fn test_weather_units() {
        let raw = payload(json!({
            "weather": {
                "location": "Tokyo, Japan",
                "temperature": 22.5,
                "temperature_fahrenheit": 72.5,
                "conditions": "Clear",
                "humidity": 40,
                "wind_speed": 12
            },
            "location_coords": {"lat": 35.68, "lng": 139.69}
        }));
        let msg = format(Category::Weather, &raw).unwrap();
        assert_eq!(msg.text.as_deref(), Some("Current weather in Tokyo, Japan:"));
        let lines = msg.lines.unwrap();
        assert_eq!(lines[0], "Temperature: 22.5°C (72.5°F)");
        assert_eq!(lines[1], "Conditions: Clear");
        assert_eq!(lines[2], "Humidity: 40%");
        assert_eq!(lines[3], "Wind Speed: 12 km/h");
    }

    #[test]
    fn test_weather_whole_degrees_have_no_decimal() {
        let raw = payload(json!({
            "weather": {
                "location": "Oslo",
                "temperature": 20.0,
                "temperature_fahrenheit": 68.0,
                "conditions": "Rain",
                "humidity": 90,
                "wind_speed": 3.2
            }
        }));
        let lines = format(Category::Weather, &raw).unwrap().lines.unwrap();
        assert_eq!(lines[0], "Temperature: 20°C (68.0°F)");
        assert_eq!(lines[3], "Wind Speed: 3.2 km/h");
    }

    #[test]
    fn test_ev_stations_and_map() {
        let raw = payload(json!({
            "location": "Central Park",
            "stations": [
                {"name": "North Lot", "available": 2, "total": 4},
                {"name": "South Garage", "available": 0, "total": 8}
            ],
            "map_url": "https://maps.example/cp"
        }));
        let msg = format(Category::Ev, &raw).unwrap();
        assert_eq!(
            msg.text.as_deref(),
            Some("I found these EV charging stations near Central Park:")
        );
        assert_eq!(
            msg.lines.unwrap(),
            vec![
                "🔌 North Lot - 2/4 available".to_string(),
                "🔌 South Garage - 0/8 available".to_string()
            ]
        );
        assert_eq!(msg.map_url.as_deref(), Some("https://maps.example/cp"));
    }

    #[test]
    fn test_image() {
        let raw = payload(json!({"prompt": "sunset", "image_url": "https://img.example/s.png"}));
        let msg = format(Category::Image, &raw).unwrap();
        assert_eq!(
            msg.text.as_deref(),
            Some("I've created an image based on: \"sunset\"")
        );
        assert_eq!(msg.image_url.as_deref(), Some("https://img.example/s.png"));
    }

    #[test]
    fn test_crypto_metrics() {
        let raw = payload(json!({
            "name": "Bitcoin",
            "symbol": "BTC",
            "crypto": {
                "price": 51432.78,
                "change_24h": 2.3,
                "market_cap": 986_700_000_000.0,
                "volume_24h": 32_400_000_000.0
            }
        }));
        let msg = format(Category::Crypto, &raw).unwrap();
        assert_eq!(msg.text.as_deref(), Some("Current Bitcoin (BTC) price:"));
        let lines = msg.lines.unwrap();
        assert_eq!(lines[0], "BTC/USD: $51,432.78 (+2.30% in last 24h)");
        assert_eq!(lines[1], "Market Cap: $986.7 Billion");
        assert_eq!(lines[2], "24h Volume: $32.4 Billion");
    }

    #[test]
    fn test_crypto_negative_change_has_no_plus() {
        let raw = payload(json!({
            "name": "Dogecoin",
            "symbol": "DOGE",
            "crypto": {"price": 0.12, "change_24h": -1.2, "market_cap": 16.8e9, "volume_24h": 1.2e9}
        }));
        let lines = format(Category::Crypto, &raw).unwrap().lines.unwrap();
        assert_eq!(lines[0], "DOGE/USD: $0.12 (-1.20% in last 24h)");
    }

    #[test]
    fn test_no_response_is_generic_error() {
        let msg = format(Category::Weather, &RawResponse::NoResponse).unwrap();
        assert_eq!(msg.text.as_deref(), Some(NO_RESPONSE_TEXT));
        assert_eq!(msg.lines, Some(vec![NO_RESPONSE_DETAIL.to_string()]));
    }

    #[test]
    fn test_fallback_passes_through() {
        let canned = DisplayMessage::text("canned").with_lines(["a", "b"]);
        let raw = RawResponse::Fallback(canned.clone());
        assert_eq!(format(Category::Crypto, &raw).unwrap(), canned);
    }

    #[test]
    fn test_format_is_idempotent() {
        let raw = RawResponse::Fallback(DisplayMessage::text("canned"));
        assert_eq!(
            format(Category::Image, &raw).unwrap(),
            format(Category::Image, &raw).unwrap()
        );

        let raw = payload(json!({"prompt": "owl", "image_url": "https://img.example/o.png"}));
        assert_eq!(
            format(Category::Image, &raw).unwrap(),
            format(Category::Image, &raw).unwrap()
        );
    }

    #[test]
    fn test_malformed_payload_is_unexpected() {
        let raw = payload(json!({"status": "ok"}));
        let err = format(Category::Weather, &raw).unwrap_err();
        assert!(matches!(err, ChatError::UnexpectedResponse { .. }));
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn test_unknown_payload_yields_suggestions() {
        let msg = format(Category::Unknown, &payload(json!({}))).unwrap();
        assert!(msg.suggestions.is_some());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(51432.78), "51,432.78");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
        assert_eq!(group_thousands(0.12), "0.12");
        assert_eq!(group_thousands(999.9999), "1,000");
        assert_eq!(group_thousands(-2815.4), "-2,815.4");
        assert_eq!(group_thousands(100.0), "100");
    }
}
