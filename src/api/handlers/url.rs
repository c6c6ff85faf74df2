//! # URL Handlers
//!
//! Handler‌های کوتاه‌سازی و redirect

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    api::extractors::ShortenPayload,
    error::Result,
    models::ShortenResponse,
    services::AppState,
};

// =====================================
// Create Short URL
// =====================================
/// ساخت یا پیدا کردن کد کوتاه
///
/// # Endpoint
/// `POST /api/shorturl`
///
/// # Request Body
/// JSON یا فرم (`application/x-www-form-urlencoded`):
/// ```json
/// { "url": "https://www.example.com" }
/// ```
///
/// # Response
/// ```json
/// { "original_url": "https://www.example.com", "short_url": 1 }
/// ```
/// یا `{ "error": "invalid url" }` با status 200
pub async fn shorten_url(
    State(state): State<AppState>,
    ShortenPayload(request): ShortenPayload,
) -> Result<Json<ShortenResponse>> {
    let response = state.shortener.shorten_request(request).await?;

    Ok(Json(response))
}

// =====================================
// Redirect
// =====================================
/// Redirect به URL اصلی
///
/// # Endpoint
/// `GET /api/shorturl/:short_url`
///
/// # Response
/// - `302 Found` با header `Location`
/// - `{ "error": "No short URL found for the given input" }` اگه پیدا نشه
pub async fn redirect_short_url(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
) -> Result<Response> {
    let original_url = state.redirector.resolve_raw(&short_url).await?;

    info!(short_url = %short_url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
}
