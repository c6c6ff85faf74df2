//! # ماژول مدل‌ها (Domain Models)
//!
//! این ماژول مدل‌های داده سرویس رو تعریف میکنه.
//!
//! ## تفاوت انواع مدل:
//! - **Entity** (`UrlRecord`): داده‌ای که در دیتابیس ذخیره میشه
//! - **DTO** (`ShortenRequest`, `ShortenResponse`, ...): برای ارسال/دریافت از API

mod url;
mod dto;

// Re-export همه مدل‌ها
pub use url::*;
pub use dto::*;
