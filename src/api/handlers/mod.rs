//! # HTTP Handlers
//!
//! هر handler یه async function هست که request میگیره و response برمیگردونه.
//! منطق اصلی در سرویس‌هاست؛ handler‌ها فقط ورودی رو استخراج و خروجی رو شکل میدن.

pub mod url;
pub mod health;
