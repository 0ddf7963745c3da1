//! HTTP surface: routing, request handlers, and error-to-response mapping.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use weather_core::{FetchError, OpenWeatherClient, export};

/// Shared application state accessible to all route handlers.
///
/// Cloned per request (cheap Arc clone); handlers share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OpenWeatherClient>,
}

/// Create the router with all route definitions.
///
/// # Routes
///
/// - `GET /api/weather?city=` - Normalized current weather as JSON
/// - `GET /api/export?city=` - The same data as a CSV attachment
/// - `GET /health` - Health check
pub fn create_router(client: Arc<OpenWeatherClient>) -> Router {
    let state = AppState { client };

    // All origins, methods and headers allowed: development-oriented policy
    // so browser frontends can call the gateway directly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/weather", get(get_weather))
        .route("/api/export", get(export_csv))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors)
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: String,
}

/// Wrapper mapping [`FetchError`] onto plain-text HTTP responses.
///
/// An upstream error propagates the upstream's own status code with an
/// opaque body; everything else becomes a 500 carrying the message.
struct ApiError(FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            FetchError::Upstream(code) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "Error from upstream API").into_response()
            }
            FetchError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching weather: {message}"),
            )
                .into_response(),
        }
    }
}

/// GET /api/weather - fetch and normalize current weather for a city.
async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.client.fetch(&query.city).await?;
    Ok(Json(report))
}

/// GET /api/export - the same fetch, rendered as a CSV attachment.
///
/// Shares the fetch path with the JSON endpoint instead of re-parsing its
/// wire output; a failed fetch short-circuits before any CSV is built.
async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.client.fetch(&query.city).await?;
    let csv = export::to_csv(&report, &query.city);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=UTF-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", csv.filename),
        ),
    ];

    Ok((headers, csv.bytes))
}

/// GET /health - health check.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
