//! # سرویس کوتاه‌سازی (Shortening Service)
//!
//! مسیر «بساز یا پیدا کن»: اعتبارسنجی، جستجوی تکراری، تخصیص کد و ذخیره.
//!
//! ## ترتیب کار:
//! 1. اعتبارسنجی آدرس (بدون هیچ دسترسی به دیتابیس)
//! 2. جستجو با تطابق دقیق رشته؛ اگه بود همون برمیگرده
//! 3. گرفتن کد جدید و `insert_if_absent`
//! 4. اگه کد مال کس دیگه‌ای بود، شمارنده جلو میره و دوباره تلاش میشه

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::CodeAllocator;
use crate::{
    database::UrlStore,
    error::{AppError, Result},
    models::{ShortenRequest, ShortenResponse, StoredOutcome, UrlRecord},
    utils,
};

/// حداکثر دفعات تلاش وقتی کد تخصیص داده شده قبلا گرفته شده
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

// =====================================
// Shorten Service
// =====================================
/// سرویس کوتاه کردن آدرس
///
/// # مسئولیت‌ها:
/// - اعتبارسنجی آدرس ورودی
/// - جلوگیری از رکورد تکراری برای یک آدرس
/// - تخصیص کد و ذخیره رکورد
#[derive(Clone)]
pub struct ShortenService {
    store: Arc<dyn UrlStore>,
    allocator: Arc<dyn CodeAllocator>,
}

impl ShortenService {
    /// ساخت سرویس جدید
    #[must_use]
    pub fn new(store: Arc<dyn UrlStore>, allocator: Arc<dyn CodeAllocator>) -> Self {
        Self { store, allocator }
    }

    /// کوتاه کردن از روی DTO درخواست
    ///
    /// # Errors
    /// - `InvalidUrl`: آدرس نامعتبر
    /// - خطاهای ذخیره‌سازی
    pub async fn shorten_request(&self, request: ShortenRequest) -> Result<ShortenResponse> {
        request.validate()?;
        self.shorten(&request.url).await
    }

    /// کوتاه کردن یک آدرس
    ///
    /// # مفاهیم:
    /// - `#[instrument]`: macro برای tracing خودکار
    /// - Idempotent: فراخوانی دوباره با همون آدرس همون کد رو میده
    ///
    /// # Errors
    /// - `InvalidUrl`: آدرس وب مطلق نیست
    /// - `Database` / `Internal`: خطای ذخیره‌سازی؛ کد مصرف شده برنمیگرده
    #[instrument(skip(self))]
    pub async fn shorten(&self, original_url: &str) -> Result<ShortenResponse> {
        // Step 1: اعتبارسنجی
        if !utils::is_valid_web_url(original_url) {
            debug!("Rejected invalid url");
            return Err(AppError::InvalidUrl);
        }

        // Step 2: آدرس تکراری؟
        if let Some(existing) = self.store.find_by_original_url(original_url).await? {
            debug!(short_code = existing.short_code, "Returning existing short url");
            return Ok(existing.into());
        }

        // Step 3: تخصیص و ذخیره
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let record = UrlRecord::new(original_url, self.allocator.next_code());

            match self.store.insert_if_absent(&record).await {
                Ok(StoredOutcome::Created(created)) => {
                    info!(short_code = created.short_code, "Created new short url");
                    return Ok(created.into());
                }
                Ok(StoredOutcome::Existing(existing)) => {
                    // درخواست همزمان دیگه‌ای زودتر ذخیره کرد؛ کد ما بی‌استفاده میمونه
                    debug!(
                        skipped_code = record.short_code,
                        short_code = existing.short_code,
                        "Lost insert race, returning winner"
                    );
                    return Ok(existing.into());
                }
                Err(AppError::CodeTaken(code)) => {
                    warn!(code, attempt, "Allocated short code already taken");
                    let max = self.store.max_short_code().await?;
                    self.allocator.observe_used(max.max(code));
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::Internal(format!(
            "no free short code after {MAX_ALLOCATION_ATTEMPTS} attempts"
        )))
    }
}
