pub mod demo;
pub mod routes;

use axum::Router;
use omnibot_core::config::ServerConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the axum Router with all `/api` routes and middleware.
pub fn build_router(config: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(routes::health_routes())
        .merge(routes::youtube_routes())
        .merge(routes::weather_routes())
        .merge(routes::ev_routes())
        .merge(routes::image_routes())
        .merge(routes::crypto_routes());

    let mut app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve_with_listener(listener: TcpListener, config: &ServerConfig) -> anyhow::Result<()> {
    let router = build_router(config);
    tracing::info!("Demo backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

/// Start the demo backend on the configured address.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    serve_with_listener(listener, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(&ServerConfig::default())
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_weather_route() {
        let (status, body) =
            post_json("/api/weather/current", serde_json::json!({"location": "Tokyo"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weather"]["location"], "Tokyo");
        assert!(body["weather"]["temperature_fahrenheit"].is_number());
        assert!(body["location_coords"]["lat"].is_number());
    }

    #[tokio::test]
    async fn test_blank_location_rejected() {
        let (status, body) =
            post_json("/api/ev/nearby", serde_json::json!({"location": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Location is required");
    }

    #[tokio::test]
    async fn test_invalid_youtube_url_rejected() {
        let (status, body) = post_json(
            "/api/youtube/summarize",
            serde_json::json!({"url": "https://vimeo.com/1"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "https://vimeo.com/1");
    }

    #[tokio::test]
    async fn test_crypto_route_uppercases_symbol() {
        let (status, body) =
            post_json("/api/crypto/price", serde_json::json!({"symbol": "sol"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "SOL");
        assert_eq!(body["name"], "Solana");
    }

    #[tokio::test]
    async fn test_image_route() {
        let (status, body) =
            post_json("/api/image/generate", serde_json::json!({"prompt": "owl"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prompt"], "owl");
        assert!(body["image_url"].as_str().unwrap().contains("text=owl"));
    }
}
