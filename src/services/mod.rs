//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! این ماژول منطق اصلی سرویس رو پیاده‌سازی میکنه.
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- shorten / resolve (اینجا!)
//! ├─────────────────┤
//! │   UrlStore      │  <-- Data access
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```

mod allocator;
mod redirect;
mod shortener;

pub use allocator::*;
pub use redirect::*;
pub use shortener::*;

use std::sync::Arc;

use crate::{
    config::Config,
    database::{Database, UrlRepository, UrlStore},
    error::Result,
};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// # مفاهیم:
/// - `Arc<T>`: Reference counting برای thread-safe sharing
/// - `Clone`: فقط Arc‌ها clone میشن، نه داده
#[derive(Clone)]
pub struct AppState {
    /// تنظیمات برنامه
    pub config: Arc<Config>,

    /// ذخیره‌ساز مشترک (برای health check)
    pub store: Arc<dyn UrlStore>,

    /// سرویس کوتاه‌سازی
    pub shortener: Arc<ShortenService>,

    /// سرویس redirect
    pub redirector: Arc<RedirectService>,
}

impl AppState {
    /// ساخت AppState از وابستگی‌های آماده
    ///
    /// # مفاهیم:
    /// - Dependency Injection: store و allocator از بیرون تزریق میشن
    #[must_use]
    pub fn new(store: Arc<dyn UrlStore>, allocator: Arc<dyn CodeAllocator>, config: Config) -> Self {
        let shortener = Arc::new(ShortenService::new(store.clone(), allocator));
        let redirector = Arc::new(RedirectService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            shortener,
            redirector,
        }
    }

    /// ساخت AppState روی دیتابیس واقعی
    ///
    /// شمارنده بسته به `allocator_seed_from_store` یا از بعد از بزرگ‌ترین کد
    /// ذخیره شده ادامه میده یا از 1 شروع میکنه.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه خوندن بزرگ‌ترین کد fail بشه
    pub async fn from_database(db: Database, config: Config) -> Result<Self> {
        let store: Arc<dyn UrlStore> = Arc::new(UrlRepository::new(db));

        let allocator = if config.allocator_seed_from_store {
            SequenceAllocator::seeded_from(store.as_ref()).await?
        } else {
            SequenceAllocator::new()
        };

        Ok(Self::new(store, Arc::new(allocator), config))
    }
}
