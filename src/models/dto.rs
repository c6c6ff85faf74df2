//! # Data Transfer Objects (DTOs)
//!
//! DTO‌هایی که در API استفاده میشن

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::UrlRecord;

// =====================================
// Shorten Request
// =====================================
/// درخواست کوتاه کردن آدرس
///
/// # مفاهیم:
/// - `#[serde(default)]`: نبودن فیلد `url` خطای parse نیست،
///   بلکه به رشته خالی تبدیل میشه و بعدا `invalid url` میگیره
/// - `deserialize_with`: مقدار غیر رشته‌ای (عدد، آرایه، `null`) هم رشته خالی میشه
/// - `#[derive(Validate)]`: اعتبارسنجی اولیه قبل از رسیدن به سرویس
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShortenRequest {
    /// آدرس اصلی
    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(url, length(min = 1, max = 2048))]
    pub url: String,
}

impl ShortenRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// مقدار خام فیلد `url`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUrl {
    Text(String),
    Other(IgnoredAny),
}

/// رشته رو همونطور نگه میداره؛ هر نوع دیگه‌ای رشته خالی میشه
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawUrl::deserialize(deserializer)? {
        RawUrl::Text(url) => url,
        RawUrl::Other(_) => String::new(),
    })
}

// =====================================
// Shorten Response
// =====================================
/// پاسخ موفق کوتاه کردن
///
/// ```json
/// { "original_url": "https://www.example.com", "short_url": 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlRecord> for ShortenResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            original_url: record.original_url,
            short_url: record.short_code,
        }
    }
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    /// ساخت پاسخ بر اساس وضعیت دیتابیس
    #[must_use]
    pub fn from_database(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}
