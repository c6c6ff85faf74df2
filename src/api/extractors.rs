//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## مفاهیم Rust + Axum:
//! - **FromRequest**: trait برای extractor‌هایی که بدنه رو مصرف میکنن
//! - **Rejection**: نوع خطا برای extractors
//!
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};

use crate::{error::AppError, models::ShortenRequest};

// =====================================
// Shorten Payload Extractor
// =====================================
/// بدنه درخواست کوتاه‌سازی؛ JSON یا فرم
///
/// # رفتار:
/// - `application/json` → `Json<ShortenRequest>`
/// - `application/x-www-form-urlencoded` → `Form<ShortenRequest>`
/// - هر چیز دیگه (یا بدون Content-Type) → درخواست خالی که بعدا `invalid url` میگیره
/// - بدنه خراب (مثلا JSON نامعتبر) → `400 Bad Request`
///
/// # استفاده در handler:
/// ```rust,ignore
/// async fn handler(ShortenPayload(request): ShortenPayload) -> ... {
///     // request.url
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShortenPayload(pub ShortenRequest);

#[async_trait]
impl<S> FromRequest<S> for ShortenPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(request) = Json::<ShortenRequest>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            return Ok(Self(request));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(request) = Form::<ShortenRequest>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            return Ok(Self(request));
        }

        Ok(Self(ShortenRequest::default()))
    }
}
