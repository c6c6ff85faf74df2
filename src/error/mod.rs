//! # ماژول مدیریت خطاها (Error Handling)
//!
//! این ماژول سیستم مدیریت خطای سرویس رو تعریف میکنه.
//!
//! ## دسته‌بندی خطاها
//!
//! | دسته | variant | پاسخ HTTP |
//! |------|---------|-----------|
//! | خطای اعتبارسنجی | `InvalidUrl` | `200 {"error": "invalid url"}` |
//! | پیدا نشدن | `NotFound` | `200 {"error": "No short URL found for the given input"}` |
//! | خطای ذخیره‌سازی | `Database`, `CodeTaken`, `Internal`, ... | `500 "Server error"` |
//!
//! ## مفاهیم Rust:
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار نوع‌ها با `#[from]`
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد
//!
//! هیچ خطایی نباید process رو متوقف کنه؛ همه‌شون در لبه API به payload تبدیل میشن.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// پیام خطای اعتبارسنجی که کلاینت می‌بینه
pub const INVALID_URL_MESSAGE: &str = "invalid url";

/// پیام خطای پیدا نشدن کد کوتاه
pub const NOT_FOUND_MESSAGE: &str = "No short URL found for the given input";

/// بدنه پاسخ خطاهای سرور
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای `Result<UrlRecord, AppError>` مینویسیم `Result<UrlRecord>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
///
/// # مفاهیم:
/// - `#[derive(Error)]`: از thiserror برای پیاده‌سازی Error trait
/// - `#[error("...")]`: پیام خطا برای هر نوع
/// - `#[from]`: تبدیل خودکار از نوع‌های دیگه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر
    // ----------------------------------------

    /// URL ورودی یه آدرس وب مطلق نیست
    #[error("invalid url")]
    InvalidUrl,

    /// هیچ رکوردی با این کد کوتاه ثبت نشده
    #[error("no short url for code '{0}'")]
    NotFound(String),

    /// بدنه درخواست قابل خوندن نیست - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    // ----------------------------------------
    // خطاهای ذخیره‌سازی و سرور (5xx)
    // ----------------------------------------

    /// کد تخصیص داده شده قبلا در دیتابیس ثبت شده
    /// (مثلا یه instance دیگه همین عدد رو داده)
    #[error("short code {0} is already taken")]
    CodeTaken(i64),

    /// خطای دیتابیس
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// خطای اجرای migration
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// خطای خوندن تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای داخلی
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code متناسب با خطا
    ///
    /// خطای اعتبارسنجی و پیدا نشدن عمدا 200 هستن؛
    /// کلاینت‌های موجود خطا رو از بدنه JSON تشخیص میدن، نه از status.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl | Self::NotFound(_) => StatusCode::OK,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CodeTaken(_)
            | Self::Database(_)
            | Self::Migrate(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// آیا خطا از لایه ذخیره‌سازی اومده؟
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::CodeTaken(_) | Self::Migrate(_) | Self::Internal(_)
        )
    }

    /// ساخت خطای Not Found برای کد کوتاه
    #[must_use]
    pub fn code_not_found(short_code: impl std::fmt::Display) -> Self {
        Self::NotFound(short_code.to_string())
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
///
/// فقط یه فیلد `error` داره تا با کلاینت‌های قدیمی سازگار بمونه.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// # مفاهیم:
/// - `IntoResponse`: trait خاص axum برای تبدیل به response
/// - handler‌ها میتونن مستقیم `Result<_, AppError>` برگردونن
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::InvalidUrl => (status, Json(ErrorResponse::new(INVALID_URL_MESSAGE))).into_response(),
            Self::NotFound(_) => (status, Json(ErrorResponse::new(NOT_FOUND_MESSAGE))).into_response(),
            Self::BadRequest(message) => (status, Json(ErrorResponse::new(message))).into_response(),
            other => {
                // جزئیات خطای داخلی فقط در لاگ میمونه
                error!(error = %other, "Server error occurred");
                (status, Json(SERVER_ERROR_MESSAGE)).into_response()
            }
        }
    }
}

// =====================================
// From Implementations
// =====================================
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(_: validator::ValidationErrors) -> Self {
        AppError::InvalidUrl
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, short_code: impl std::fmt::Display) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, short_code: impl std::fmt::Display) -> Result<T> {
        self.ok_or_else(|| AppError::code_not_found(short_code))
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidUrl.status_code(), StatusCode::OK);
        assert_eq!(AppError::code_not_found(7).status_code(), StatusCode::OK);
        assert_eq!(
            AppError::BadRequest("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CodeTaken(3).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_classification() {
        assert!(AppError::CodeTaken(1).is_storage_error());
        assert!(AppError::Database(sqlx::Error::PoolTimedOut).is_storage_error());
        assert!(!AppError::InvalidUrl.is_storage_error());
        assert!(!AppError::code_not_found(1).is_storage_error());
    }

    #[tokio::test]
    async fn test_invalid_url_payload() {
        let (status, body) = body_json(AppError::InvalidUrl).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "error": "invalid url" }));
    }

    #[tokio::test]
    async fn test_not_found_payload() {
        let (status, body) = body_json(AppError::code_not_found(999)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "error": "No short URL found for the given input" })
        );
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let (status, body) = body_json(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!("Server error"));
    }

    #[test]
    fn test_option_extension() {
        assert!(Some(42).ok_or_not_found(1).is_ok());
        assert!(matches!(
            None::<i32>.ok_or_not_found(1),
            Err(AppError::NotFound(_))
        ));
    }
}
