//! # Repository Pattern
//!
//! لایه ذخیره‌سازی رکوردها.
//!
//! ## Repository Pattern چیه؟
//! یه لایه انتزاعی بین منطق برنامه و دیتابیس.
//! - سرویس‌ها فقط trait `UrlStore` رو می‌بینن
//! - تست سرویس‌ها با mock انجام میشه
//! - پیاده‌سازی واقعی (`UrlRepository`) روی SQLite هست
//!
//! ## یکتایی
//! هر دو ستون `original_url` و `short_code` ایندکس یکتا دارن.
//! `insert_if_absent` با یک نوشتن شرطی جای الگوی «اول بگرد، بعد insert کن» رو میگیره
//! تا دو درخواست همزمان برای یک آدرس جدید دو رکورد نسازن.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use super::Database;
use crate::{
    error::{AppError, Result},
    models::{StoredOutcome, UrlRecord},
};

// =====================================
// Store Trait
// =====================================
/// ذخیره‌ساز بادوام رکوردهای URL
///
/// # مفاهیم:
/// - `#[async_trait]`: macro برای async در traits
/// - `Send + Sync`: امکان اشتراک بین threads از طریق `Arc<dyn UrlStore>`
/// - `automock`: در تست‌ها `MockUrlStore` ساخته میشه
///
/// هیچ cache‌ای در این لایه وجود نداره؛ همه عملیات‌ها مستقیم به دیتابیس میرن.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// پیدا کردن با تطابق دقیق رشته آدرس اصلی
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>>;

    /// پیدا کردن با کد کوتاه
    async fn find_by_short_code(&self, short_code: i64) -> Result<Option<UrlRecord>>;

    /// ذخیره رکورد جدید
    ///
    /// # Errors
    /// - `CodeTaken` اگه `short_code` قبلا ثبت شده باشه
    /// - `Database` برای هر خطای دیگه (از جمله آدرس تکراری)
    async fn insert(&self, record: &UrlRecord) -> Result<()>;

    /// ذخیره رکورد فقط اگه آدرس اصلیش قبلا ثبت نشده باشه
    ///
    /// اگه آدرس وجود داشته باشه، رکورد موجود با `Existing` برمیگرده و
    /// کد پیشنهادی استفاده نمیشه.
    ///
    /// # Errors
    /// - `CodeTaken` اگه کد پیشنهادی مال آدرس دیگه‌ای باشه
    async fn insert_if_absent(&self, record: &UrlRecord) -> Result<StoredOutcome>;

    /// بزرگ‌ترین کد ذخیره شده (صفر اگه جدول خالی باشه)
    async fn max_short_code(&self) -> Result<i64>;

    /// تعداد کل رکوردها
    async fn count(&self) -> Result<i64>;

    /// بررسی دسترسی به دیتابیس
    async fn health_check(&self) -> Result<()>;
}

// =====================================
// SQLite Repository
// =====================================
/// پیاده‌سازی `UrlStore` روی SQLite
#[derive(Debug, Clone)]
pub struct UrlRepository {
    db: Database,
}

impl UrlRepository {
    /// ساخت repository جدید
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// تشخیص تداخل روی ستون `short_code`
///
/// پیام SQLite برای این حالت `UNIQUE constraint failed: short_urls.short_code` هست.
fn map_write_error(err: sqlx::Error, short_code: i64) -> AppError {
    let code_taken = err.as_database_error().is_some_and(|db_err| {
        let message = db_err.message();
        (db_err.is_unique_violation() || message.starts_with("UNIQUE constraint failed"))
            && message.contains("short_code")
    });

    if code_taken {
        AppError::CodeTaken(short_code)
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl UrlStore for UrlRepository {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT original_url, short_code
            FROM short_urls
            WHERE original_url = ?
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    async fn find_by_short_code(&self, short_code: i64) -> Result<Option<UrlRecord>> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT original_url, short_code
            FROM short_urls
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    #[instrument(skip(self, record), fields(short_code = record.short_code))]
    async fn insert(&self, record: &UrlRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO short_urls (original_url, short_code, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.original_url)
        .bind(record.short_code)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await
        .map_err(|e| map_write_error(e, record.short_code))?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(short_code = record.short_code))]
    async fn insert_if_absent(&self, record: &UrlRecord) -> Result<StoredOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (original_url, short_code, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(original_url) DO NOTHING
            "#,
        )
        .bind(&record.original_url)
        .bind(record.short_code)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await
        .map_err(|e| map_write_error(e, record.short_code))?;

        if result.rows_affected() > 0 {
            return Ok(StoredOutcome::Created(record.clone()));
        }

        // یه درخواست دیگه زودتر همین آدرس رو ثبت کرده
        debug!("Original URL already stored, returning existing record");
        let existing = self
            .find_by_original_url(&record.original_url)
            .await?
            .ok_or_else(|| {
                AppError::Internal("conditional insert skipped but no record exists".to_string())
            })?;

        Ok(StoredOutcome::Existing(existing))
    }

    async fn max_short_code(&self) -> Result<i64> {
        let max = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(short_code), 0) FROM short_urls",
        )
        .fetch_one(self.db.pool())
        .await?;

        Ok(max)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> Result<()> {
        self.db.health_check().await
    }
}
