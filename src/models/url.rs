//! # مدل URL
//!
//! تنها entity ذخیره شده: نگاشت آدرس اصلی به کد کوتاه عددی

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =====================================
// URL Entity
// =====================================
/// رکورد ذخیره شده برای یک آدرس
///
/// # ویژگی‌ها:
/// - `original_url` دقیقا همون رشته‌ای هست که کاربر فرستاده (بدون نرمال‌سازی)
/// - `short_code` یکتا هست و به ترتیب تخصیص زیاد میشه
/// - بعد از ساخت هیچوقت تغییر نمیکنه
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UrlRecord {
    /// آدرس اصلی
    pub original_url: String,

    /// کد کوتاه عددی
    pub short_code: i64,
}

impl UrlRecord {
    /// ساخت رکورد جدید
    #[must_use]
    pub fn new(original_url: impl Into<String>, short_code: i64) -> Self {
        Self {
            original_url: original_url.into(),
            short_code,
        }
    }
}

// =====================================
// Insert Outcome
// =====================================
/// نتیجه `insert_if_absent`
///
/// # مفاهیم:
/// - enum با داده: هر variant رکورد نهایی رو با خودش داره
/// - caller میفهمه رکورد تازه ساخته شده یا از قبل بوده
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredOutcome {
    /// رکورد جدید با کد پیشنهادی ذخیره شد
    Created(UrlRecord),

    /// همین آدرس قبلا ثبت شده بود؛ رکورد موجود برگشت
    Existing(UrlRecord),
}

impl StoredOutcome {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
