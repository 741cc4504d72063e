//! JSON shapes exchanged with the `/api` backend.
//!
//! The client decodes responses with these types and the demo server encodes
//! them, so both sides agree on one definition. Fields the client does not
//! need are optional or defaulted so that leaner backends still decode.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeResponse {
    pub title: String,
    pub summary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub location: String,
    /// Celsius.
    pub temperature: f64,
    pub temperature_fahrenheit: f64,
    pub conditions: String,
    /// Percent.
    pub humidity: i64,
    /// km/h.
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub weather: WeatherData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_coords: Option<Coords>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvStation {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub available: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvResponse {
    pub location: String,
    pub stations: Vec<EvStation>,
    pub map_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub prompt: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoRequest {
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CryptoData {
    /// USD.
    pub price: f64,
    /// Percent.
    pub change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoResponse {
    pub name: String,
    pub symbol: String,
    pub crypto: CryptoData,
}

/// Body of a non-2xx answer from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
