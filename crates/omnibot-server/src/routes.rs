use crate::demo;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use omnibot_core::wire::{
    CryptoRequest, CryptoResponse, ErrorResponse, EvResponse, ImageRequest, ImageResponse,
    LocationRequest, WeatherResponse, YoutubeRequest, YoutubeResponse,
};

/// A 4xx answer carrying an [`ErrorResponse`] body.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: error.into(),
                details: None,
            },
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn required(value: &str, what: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::bad_request(format!("{} is required", what)))
    } else {
        Ok(value.to_string())
    }
}

// ── Health ──────────────────────────────────────────────────────────────

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ── YouTube ─────────────────────────────────────────────────────────────

pub fn youtube_routes() -> Router {
    Router::new().route("/youtube/summarize", post(summarize))
}

async fn summarize(Json(req): Json<YoutubeRequest>) -> ApiResult<YoutubeResponse> {
    let url = required(&req.url, "Video URL")?;
    let id = demo::video_id(&url).ok_or_else(|| {
        ApiError::bad_request("Invalid YouTube URL. Could not extract video ID.")
            .with_details(url.clone())
    })?;
    tracing::info!("Summarizing video {}", id);
    Ok(Json(demo::youtube(&url, &id)))
}

// ── Weather ─────────────────────────────────────────────────────────────

pub fn weather_routes() -> Router {
    Router::new().route("/weather/current", post(current_weather))
}

async fn current_weather(Json(req): Json<LocationRequest>) -> ApiResult<WeatherResponse> {
    let location = required(&req.location, "Location")?;
    tracing::info!("Processing weather request for location: {}", location);
    Ok(Json(demo::weather(&location)))
}

// ── EV charging ─────────────────────────────────────────────────────────

pub fn ev_routes() -> Router {
    Router::new().route("/ev/nearby", post(nearby_stations))
}

async fn nearby_stations(Json(req): Json<LocationRequest>) -> ApiResult<EvResponse> {
    let location = required(&req.location, "Location")?;
    tracing::info!("Looking up charging stations near {}", location);
    Ok(Json(demo::ev(&location)))
}

// ── Image ───────────────────────────────────────────────────────────────

pub fn image_routes() -> Router {
    Router::new().route("/image/generate", post(generate_image))
}

async fn generate_image(Json(req): Json<ImageRequest>) -> ApiResult<ImageResponse> {
    let prompt = required(&req.prompt, "Prompt")?;
    tracing::info!("Generating image for prompt: {}", prompt);
    Ok(Json(demo::image(&prompt)))
}

// ── Crypto ──────────────────────────────────────────────────────────────

pub fn crypto_routes() -> Router {
    Router::new().route("/crypto/price", post(crypto_price))
}

async fn crypto_price(Json(req): Json<CryptoRequest>) -> ApiResult<CryptoResponse> {
    let symbol = required(&req.symbol, "Cryptocurrency symbol")?;
    Ok(Json(demo::crypto(&symbol)))
}
