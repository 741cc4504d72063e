//! Deterministic stand-in data for the demo backend.
//!
//! Nothing here calls out to a real weather, charging, image, or market
//! service; answers are derived from the request so repeated calls agree.

use omnibot_core::wire::{
    Coords, CryptoData, CryptoResponse, EvResponse, EvStation, ImageResponse, WeatherData,
    WeatherResponse, YoutubeResponse,
};

const CONDITIONS: [&str; 6] = [
    "Clear",
    "Partly Cloudy",
    "Overcast",
    "Light Rain",
    "Thunderstorm",
    "Fog",
];

const STATION_SUFFIXES: [&str; 3] = ["Central Garage", "Main Street Plaza", "Riverside Lot"];

/// Symbol, name, and mock market data. Unknown symbols get the BTC row.
const MARKET: [(&str, &str, CryptoData); 4] = [
    (
        "BTC",
        "Bitcoin",
        CryptoData {
            price: 51432.78,
            change_24h: 2.3,
            market_cap: 986.7e9,
            volume_24h: 32.4e9,
        },
    ),
    (
        "ETH",
        "Ethereum",
        CryptoData {
            price: 2815.42,
            change_24h: 1.8,
            market_cap: 338.5e9,
            volume_24h: 18.2e9,
        },
    ),
    (
        "SOL",
        "Solana",
        CryptoData {
            price: 149.87,
            change_24h: 4.5,
            market_cap: 63.7e9,
            volume_24h: 5.8e9,
        },
    ),
    (
        "DOGE",
        "Dogecoin",
        CryptoData {
            price: 0.12,
            change_24h: -1.2,
            market_cap: 16.8e9,
            volume_24h: 1.2e9,
        },
    ),
];

/// Extra display names for symbols without mock data.
const NAMES: [(&str, &str); 6] = [
    ("ADA", "Cardano"),
    ("DOT", "Polkadot"),
    ("SHIB", "Shiba Inu"),
    ("AVAX", "Avalanche"),
    ("MATIC", "Polygon"),
    ("LTC", "Litecoin"),
];

fn seed(text: &str) -> u32 {
    text.to_lowercase()
        .bytes()
        .fold(17u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

/// Pull the video id out of a YouTube watch, shorts, embed, or short link.
pub fn video_id(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let mut segments = parsed.path_segments()?;

    let id = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" => match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts") | Some("embed") | Some("v") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub fn youtube(url: &str, id: &str) -> YoutubeResponse {
    YoutubeResponse {
        title: format!("YouTube Video {}", id),
        summary: vec![
            "The video opens by introducing its main topic and why it matters.".into(),
            "The middle section walks through key examples and supporting points.".into(),
            "It closes with a short recap and suggestions for further viewing.".into(),
        ],
        url: Some(url.to_string()),
    }
}

fn coords(location: &str) -> Coords {
    let s = seed(location);
    Coords {
        lat: ((s % 12_000) as f64 / 100.0 - 60.0).clamp(-90.0, 90.0),
        lng: (((s / 12_000) % 36_000) as f64 / 100.0 - 180.0).clamp(-180.0, 180.0),
    }
}

pub fn weather(location: &str) -> WeatherResponse {
    let s = seed(location);
    let celsius = (s % 35) as f64 - 5.0 + ((s / 35) % 10) as f64 / 10.0;
    WeatherResponse {
        weather: WeatherData {
            location: location.to_string(),
            temperature: celsius,
            temperature_fahrenheit: celsius * 9.0 / 5.0 + 32.0,
            conditions: CONDITIONS[(s as usize / 7) % CONDITIONS.len()].to_string(),
            humidity: 30 + (s % 60) as i64,
            wind_speed: ((s / 3) % 40) as f64 / 2.0,
        },
        location_coords: Some(coords(location)),
    }
}

/// Map link in the same shape the charging service produces.
pub fn map_url(at: Coords) -> String {
    format!(
        "https://www.google.com/maps/search/ev+charging+stations/@{},{},14z/data=!3m1!4b1",
        at.lat, at.lng
    )
}

pub fn ev(location: &str) -> EvResponse {
    let s = seed(location);
    let at = coords(location);
    let stations = STATION_SUFFIXES
        .iter()
        .enumerate()
        .map(|(i, suffix)| {
            let total = 2 + (s as usize + i * 3) % 7;
            let available = (s as usize / (i + 2)) % (total + 1);
            EvStation {
                id: format!("demo-{:08x}-{}", s, i + 1),
                name: format!("{} {}", location, suffix),
                address: format!("{} {}, {}", 10 + i * 25, suffix, location),
                latitude: at.lat + 0.004 * (i as f64 + 1.0),
                longitude: at.lng - 0.003 * (i as f64 + 1.0),
                available: available as u32,
                total: total as u32,
            }
        })
        .collect();

    EvResponse {
        location: location.to_string(),
        stations,
        map_url: map_url(at),
    }
}

pub fn image(prompt: &str) -> ImageResponse {
    let text: String = url::form_urlencoded::byte_serialize(prompt.as_bytes()).collect();
    ImageResponse {
        prompt: prompt.to_string(),
        image_url: format!(
            "https://via.placeholder.com/512x512/6200ea/FFFFFF?text={}",
            text
        ),
    }
}

pub fn crypto(symbol: &str) -> CryptoResponse {
    let symbol = symbol.trim().to_uppercase();
    let data = MARKET
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, _, d)| *d)
        .unwrap_or(MARKET[0].2);
    let name = MARKET
        .iter()
        .map(|(s, n, _)| (*s, *n))
        .chain(NAMES)
        .find(|(s, _)| *s == symbol)
        .map(|(_, n)| n.to_string())
        .unwrap_or_else(|| format!("{} Cryptocurrency", symbol));

    CryptoResponse {
        name,
        symbol,
        crypto: data,
    }
}
