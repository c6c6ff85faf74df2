//! # سرویس Redirect
//!
//! تبدیل کد کوتاه به آدرس اصلی.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    database::UrlStore,
    error::{AppError, OptionExt, Result},
    utils,
};

/// سرویس پیدا کردن آدرس مقصد
#[derive(Clone)]
pub struct RedirectService {
    store: Arc<dyn UrlStore>,
}

impl RedirectService {
    #[must_use]
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self { store }
    }

    /// آدرس اصلی برای یک کد کوتاه
    ///
    /// # Errors
    /// - `NotFound`: کد هیچوقت تخصیص داده نشده
    /// - خطاهای ذخیره‌سازی
    #[instrument(skip(self))]
    pub async fn resolve(&self, short_code: i64) -> Result<String> {
        let record = self
            .store
            .find_by_short_code(short_code)
            .await?
            .ok_or_not_found(short_code)?;

        Ok(record.original_url)
    }

    /// مثل `resolve` ولی با پارامتر خام مسیر
    ///
    /// مقدار غیر عددی هم یه «پیدا نشد» معمولیه، نه خطای سرور.
    pub async fn resolve_raw(&self, raw: &str) -> Result<String> {
        let Some(short_code) = utils::parse_short_code(raw) else {
            debug!(raw, "Short code is not numeric");
            return Err(AppError::code_not_found(raw));
        };

        self.resolve(short_code).await
    }
}
