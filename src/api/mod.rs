//! # لایه API
//!
//! این ماژول HTTP handlers و routing رو مدیریت میکنه.
//!
//! ## ساختار URL‌ها:
//! - `POST /api/shorturl` - ساخت یا پیدا کردن کد کوتاه
//! - `GET /api/shorturl/:short_url` - Redirect به URL اصلی
//! - `GET /health` - Health check
//! - `GET /` - صفحه HTML فرم
//! - `GET /public/*` - فایل‌های استاتیک

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use std::{path::PathBuf, time::Duration};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::services::AppState;

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # مفاهیم:
/// - `.route()`: اضافه کردن route
/// - `.route_service()` / `.nest_service()`: سرو کردن فایل با سرویس‌های tower-http
/// - `.layer()`: اضافه کردن middleware
/// - `.with_state()`: تزریق state
pub fn create_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.static_dir);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        // صفحه اصلی و فایل‌های استاتیک
        .route_service("/", ServeFile::new(static_dir.join("views").join("index.html")))
        .nest_service("/public", ServeDir::new(static_dir.join("public")))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_timing))
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                // CORS باز، مثل سرویس قبلی
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorturl", post(handlers::url::shorten_url))
        .route("/shorturl/:short_url", get(handlers::url::redirect_short_url))
}
