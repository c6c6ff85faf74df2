//! # Short URL Library
//!
//! سرویس کوتاه‌کننده URL با کدهای عددی ترتیبی.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه - اینجا!
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # pool و UrlStore
//! ├── models/         # UrlRecord و DTO‌ها
//! ├── services/       # allocator، shorten، resolve
//! ├── api/            # router و handler‌ها
//! └── utils/          # اعتبارسنجی آدرس
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use short_url::{database::Database, services::AppState, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> short_url::Result<()> {
//!     let db = Database::in_memory().await?;
//!     let state = AppState::from_database(db, Config::default()).await?;
//!
//!     let created = state.shortener.shorten("https://www.example.com").await?;
//!     assert_eq!(created.short_url, 1);
//!     Ok(())
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================

/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::{Database, UrlRepository, UrlStore};
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
}
