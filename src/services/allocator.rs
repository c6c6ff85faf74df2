//! # تخصیص کد کوتاه (Code Allocator)
//!
//! شمارنده‌ای که کد عددی بعدی رو برای آدرس‌های جدید میده.
//!
//! ## مفاهیم Rust:
//! - **Atomics**: `AtomicI64::fetch_add` بدون نیاز به Mutex
//! - **Trait Objects**: سرویس‌ها `Arc<dyn CodeAllocator>` نگه میدارن
//!
//! کدی که گرفته بشه و insert‌ش fail بشه دیگه استفاده نمیشه؛
//! یعنی دنباله کدها ممکنه فاصله داشته باشه.

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::info;

use crate::{database::UrlStore, error::Result};

/// اولین کدی که تخصیص داده میشه
pub const FIRST_CODE: i64 = 1;

// =====================================
// Allocator Trait
// =====================================
/// تولیدکننده کد کوتاه
///
/// پیاده‌سازی‌ها به ذخیره‌ساز دسترسی ندارن؛ فقط عدد میدن.
pub trait CodeAllocator: Send + Sync + std::fmt::Debug {
    /// کد بعدی؛ در هر فراخوانی زیاد میشه، حتی اگه ذخیره بعدا fail بشه
    fn next_code(&self) -> i64;

    /// کدی که فراخوانی بعدی `next_code` میده (بدون مصرف کردنش)
    fn peek(&self) -> i64;

    /// اعلام اینکه `code` جای دیگه‌ای استفاده شده؛
    /// شمارنده حداقل تا `code + 1` جلو میره
    fn observe_used(&self, code: i64);
}

// =====================================
// Sequence Allocator
// =====================================
/// شمارنده ترتیبی process-wide
///
/// # مثال
/// ```rust
/// use short_url::services::{CodeAllocator, SequenceAllocator};
///
/// let allocator = SequenceAllocator::new();
/// assert_eq!(allocator.next_code(), 1);
/// assert_eq!(allocator.next_code(), 2);
/// ```
#[derive(Debug)]
pub struct SequenceAllocator {
    next: AtomicI64,
}

impl SequenceAllocator {
    /// شمارنده‌ای که از 1 شروع میشه
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(FIRST_CODE)
    }

    /// شمارنده‌ای که از `start` شروع میشه (حداقل 1)
    #[must_use]
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start.max(FIRST_CODE)),
        }
    }

    /// شمارنده‌ای که بعد از بزرگ‌ترین کد ذخیره شده ادامه میده
    ///
    /// با این کار restart سرویس کدهای قبلی رو دوباره تخصیص نمیده.
    ///
    /// # Errors
    /// خطای ذخیره‌ساز رو برمیگردونه
    pub async fn seeded_from(store: &dyn UrlStore) -> Result<Self> {
        let max = store.max_short_code().await?;
        let allocator = Self::starting_at(max.saturating_add(1));

        info!(next_code = allocator.peek(), "Allocator seeded from store");
        Ok(allocator)
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeAllocator for SequenceAllocator {
    fn next_code(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }

    fn observe_used(&self, code: i64) {
        self.next.fetch_max(code.saturating_add(1), Ordering::SeqCst);
    }
}
