//! # ماژول توابع کمکی (Utilities)
//!
//! اعتبارسنجی آدرس وب و parse کردن کد کوتاه.

/// حداکثر طول URL اصلی
pub const MAX_URL_LENGTH: usize = 2048;

/// scheme‌های مجاز
pub const WEB_SCHEMES: [&str; 2] = ["http", "https"];

/// کاراکترهای غیر حرف و عدد که در URI مجازن (RFC 3986)
///
/// unreserved (`-._~`)، gen-delims (`:/?#[]@`)، sub-delims (`!$&'()*+,;=`) و `%`
const URI_PUNCTUATION: &str = "-._~:/?#[]@!$&'()*+,;=%";

/// آیا کاراکتر میتونه بدون encode در URI بیاد؟
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || URI_PUNCTUATION.contains(c)
}

// =====================================
// URL Validation
// =====================================
/// parse کردن یه آدرس وب مطلق
///
/// # قوانین:
/// - scheme باید `http` یا `https` باشه و دقیقا با `://` بیاد
///   (`http:example.com` رد میشه، هرچند url crate قبولش میکنه)
/// - host اجباریه
/// - طول حداکثر `MAX_URL_LENGTH`
/// - فقط کاراکترهای مجاز URI؛ فاصله، کاراکتر کنترلی و غیر ASCII رد میشن
///   (url crate اینها رو بی‌صدا حذف یا encode میکنه، ولی رشته خام ذخیره میشه
///   و بعدا باید توی header `Location` بشینه)
///
/// هیچ نرمال‌سازی روی رشته اصلی انجام نمیشه؛ مقدار برگشتی فقط برای بررسی هست.
#[must_use]
pub fn parse_web_url(url_str: &str) -> Option<url::Url> {
    if url_str.is_empty() || url_str.len() > MAX_URL_LENGTH {
        return None;
    }

    if !url_str.chars().all(is_uri_char) {
        return None;
    }

    let parsed = url::Url::parse(url_str).ok()?;

    let scheme = parsed.scheme();
    if !WEB_SCHEMES.contains(&scheme) {
        return None;
    }

    // scheme در رشته ورودی ممکنه حروف بزرگ داشته باشه
    let rest = url_str.get(scheme.len()..)?;
    if !rest.starts_with("://") {
        return None;
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed),
        _ => None,
    }
}

/// اعتبارسنجی URL
///
/// # مثال
/// ```rust
/// use short_url::utils::is_valid_web_url;
///
/// assert!(is_valid_web_url("https://www.example.com"));
/// assert!(!is_valid_web_url("not-a-url"));
/// assert!(!is_valid_web_url("ftp://example.com"));
/// ```
#[must_use]
pub fn is_valid_web_url(url_str: &str) -> bool {
    parse_web_url(url_str).is_some()
}

// =====================================
// Short Code Parsing
// =====================================
/// تبدیل پارامتر مسیر به کد کوتاه عددی
///
/// فاصله‌های دو طرف حذف میشن؛ هر چیز غیر عددی `None` میده.
///
/// ```rust
/// use short_url::utils::parse_short_code;
///
/// assert_eq!(parse_short_code("42"), Some(42));
/// assert_eq!(parse_short_code("abc"), None);
/// ```
#[must_use]
pub fn parse_short_code(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
