//! # ماژول تنظیمات (Configuration)
//!
//! این ماژول مسئول خوندن و مدیریت تنظیمات سرویس هست.
//!
//! ## ترتیب منابع (اولویت از کم به زیاد):
//! 1. مقادیر پیش‌فرض
//! 2. فایل اختیاری `config/default.toml`
//! 3. متغیرهای محیطی (`PORT`, `DATABASE_URL`, ...)
//!
//! ## مفاهیم Rust:
//! - **config crate**: لایه‌بندی منابع تنظیمات
//! - **Serde**: دسریالایز مستقیم به struct
//! - **Builder Pattern**: ساخت تدریجی آبجکت (برای تست‌ها)

use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// پورت پیش‌فرض وقتی `PORT` تنظیم نشده
pub const DEFAULT_PORT: u16 = 3000;

/// آدرس پیش‌فرض دیتابیس
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/urls.db?mode=rwc";

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use short_url::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// پوشه‌ای که `views/` و `public/` داخلش هستن
    pub static_dir: String,

    /// شروع شمارنده از بزرگ‌ترین کد ذخیره شده
    ///
    /// با `false` شمارنده بعد از هر restart از 1 شروع میشه
    /// (رفتار قدیمی، فقط برای تست سازگاری).
    pub allocator_seed_from_store: bool,

    /// حداکثر زمان پردازش هر درخواست (ثانیه)
    pub request_timeout_secs: u64,

    /// محیط اجرا (development, production)
    pub environment: Environment,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    /// محیط توسعه - لاگ‌های خوانا
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید - لاگ JSON
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// تبدیل String به Environment
///
/// مقدار ناشناخته به Development برمیگرده.
impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            static_dir: ".".to_string(),
            allocator_seed_from_store: true,
            request_timeout_secs: 30,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از فایل و متغیرهای محیطی
    ///
    /// # مفاهیم:
    /// - `config::Config::builder()`: ترکیب چند منبع
    /// - `try_parsing(true)`: تبدیل `"3000"` به عدد و `"false"` به bool
    /// - `try_deserialize()`: تبدیل نتیجه به struct خودمون
    ///
    /// # Errors
    /// خطا برمیگردونه اگه مقداری قابل parse نباشه یا اعتبارسنجی fail بشه
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let config: Config = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("static_dir", defaults.static_dir)?
            .set_default("allocator_seed_from_store", defaults.allocator_seed_from_store)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("environment", "development")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    ///
    /// # Errors
    /// خطا برمیگردونه اگه پورت صفر یا آدرس دیتابیس خالی باشه
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL cannot be empty".to_string()));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use short_url::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .database_url("sqlite::memory:")
///     .build();
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// تنظیم پورت
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// تنظیم هاست
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// تنظیم database_url
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// تنظیم پوشه فایل‌های استاتیک
    #[must_use]
    pub fn static_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.static_dir = dir.into();
        self
    }

    #[must_use]
    pub fn allocator_seed_from_store(mut self, enabled: bool) -> Self {
        self.config.allocator_seed_from_store = enabled;
        self
    }

    /// تنظیم محیط
    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اعتبارسنجی fail بشه
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
