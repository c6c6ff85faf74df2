//! # Health Check Handler
//!
//! برای بررسی سلامت سرویس

use axum::{extract::State, Json};
use tracing::warn;

use crate::{models::HealthResponse, services::AppState};

/// بررسی سلامت سرویس و دسترسی به دیتابیس
///
/// # Endpoint
/// `GET /health`
///
/// # Response
/// ```json
/// { "status": "healthy", "version": "0.1.0", "database": true }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = match state.store.health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Database health check failed");
            false
        }
    };

    Json(HealthResponse::from_database(db_ok))
}
