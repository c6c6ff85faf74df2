//! # تست‌های Integration
//!
//! router واقعی روی دیتابیس SQLite in-memory، بدون باز کردن پورت.
//!
//! ## اجرای تست‌ها:
//! ```bash
//! cargo test                           # همه تست‌ها
//! cargo test --test integration_tests  # فقط این فایل
//! ```

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use short_url::{
    api::create_router,
    config::ConfigBuilder,
    database::Database,
    services::AppState,
};

// =====================================
// Helpers
// =====================================
async fn state_on(db: Database, seed_from_store: bool) -> AppState {
    let config = ConfigBuilder::new()
        .static_dir(env!("CARGO_MANIFEST_DIR"))
        .allocator_seed_from_store(seed_from_store)
        .build();

    AppState::from_database(db, config).await.unwrap()
}

async fn test_app() -> (Router, AppState) {
    let db = Database::in_memory().await.unwrap();
    let state = state_on(db, true).await;
    (create_router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn shorten_json(app: &Router, url: &str) -> (StatusCode, Value) {
    let request = Request::post("/api/shorturl")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap();

    let response = send(app, request).await;
    let status = response.status();
    (status, read_json(response).await)
}

async fn visit(app: &Router, short_url: &str) -> axum::response::Response {
    let request = Request::get(format!("/api/shorturl/{short_url}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// =====================================
// API Scenario Tests
// =====================================
mod api_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// سناریوی کامل: ساخت، تکرار، آدرس دوم، redirect، کد ناموجود، آدرس نامعتبر
    #[tokio::test]
    async fn test_full_scenario() {
        let (app, _) = test_app().await;

        let (status, body) = shorten_json(&app, "https://www.example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "original_url": "https://www.example.com", "short_url": 1 })
        );

        let (_, again) = shorten_json(&app, "https://www.example.com").await;
        assert_eq!(again, body);

        let (_, other) = shorten_json(&app, "https://www.other.com").await;
        assert_eq!(
            other,
            json!({ "original_url": "https://www.other.com", "short_url": 2 })
        );

        let response = visit(&app, "1").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://www.example.com"
        );

        let response = visit(&app, "999").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "error": "No short URL found for the given input" })
        );

        let (status, invalid) = shorten_json(&app, "not-a-url").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(invalid, json!({ "error": "invalid url" }));
    }

    #[tokio::test]
    async fn test_form_submission() {
        let (app, _) = test_app().await;

        let request = Request::post("/api/shorturl")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("url=https%3A%2F%2Fwww.example.com%2Fpath"))
            .unwrap();

        let body = read_json(send(&app, request).await).await;
        assert_eq!(
            body,
            json!({ "original_url": "https://www.example.com/path", "short_url": 1 })
        );
    }

    #[tokio::test]
    async fn test_missing_url_field_is_invalid() {
        let (app, state) = test_app().await;

        let request = Request::post("/api/shorturl")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let body = read_json(send(&app, request).await).await;
        assert_eq!(body, json!({ "error": "invalid url" }));
        assert_eq!(state.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = test_app().await;

        let request = Request::post("/api/shorturl")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"url\":"))
            .unwrap();

        assert_eq!(send(&app, request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_urls_are_not_stored() {
        let (app, state) = test_app().await;

        for input in ["not-a-url", "ftp://example.com", "www.example.com", "http://", ""] {
            let (_, body) = shorten_json(&app, input).await;
            assert_eq!(body, json!({ "error": "invalid url" }), "input: {input:?}");
        }

        assert_eq!(state.store.count().await.unwrap(), 0);
    }

    /// آدرسی که url crate بی‌صدا اصلاحش میکنه رد میشه، چون رشته خام باید توی `Location` بشینه
    #[tokio::test]
    async fn test_urls_with_unencoded_characters_are_rejected() {
        let (app, state) = test_app().await;

        for input in [
            "https://example.com/a\nb",
            "https://example.com/\tx",
            "https://example.com/a b",
            "https://example.com/\u{e4}",
        ] {
            let (status, body) = shorten_json(&app, input).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "error": "invalid url" }), "input: {input:?}");
        }

        assert_eq!(state.store.count().await.unwrap(), 0);

        let response = visit(&app, "1").await;
        assert_eq!(
            read_json(response).await,
            json!({ "error": "No short URL found for the given input" })
        );
    }

    /// هر آدرس پذیرفته شده یه redirect کامل با header `Location` میده
    #[tokio::test]
    async fn test_accepted_url_redirects_verbatim() {
        let (app, _) = test_app().await;
        let url = "https://example.com/a%20b?q=1&r=(x)#top";

        let (_, body) = shorten_json(&app, url).await;
        assert_eq!(body["short_url"], json!(1));

        let response = visit(&app, "1").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), url);
    }

    #[tokio::test]
    async fn test_non_string_url_is_invalid() {
        let (app, state) = test_app().await;

        for payload in [json!({ "url": 5 }), json!({ "url": null }), json!({ "url": {} })] {
            let request = Request::post("/api/shorturl")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap();

            let response = send(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(read_json(response).await, json!({ "error": "invalid url" }));
        }

        assert_eq!(state.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_code_is_not_found() {
        let (app, _) = test_app().await;

        let response = visit(&app, "abc").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "error": "No short URL found for the given input" })
        );
    }

    #[tokio::test]
    async fn test_no_normalization_on_dedup() {
        let (app, _) = test_app().await;

        let (_, first) = shorten_json(&app, "https://www.example.com").await;
        let (_, second) = shorten_json(&app, "https://www.example.com/").await;

        assert_eq!(first["short_url"], json!(1));
        assert_eq!(second["short_url"], json!(2));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app().await;

        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["database"], json!(true));
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let (app, _) = test_app().await;

        let response = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/shorturl"));
    }

    #[tokio::test]
    async fn test_request_id_header() {
        let (app, _) = test_app().await;

        let request = Request::get("/health")
            .header("x-request-id", "abc123")
            .body(Body::empty())
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_cors_is_open() {
        let (app, _) = test_app().await;

        let request = Request::get("/health")
            .header(header::ORIGIN, "https://elsewhere.example")
            .body(Body::empty())
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}

// =====================================
// Concurrency Tests
// =====================================
mod concurrency_tests {
    use super::*;
    use std::collections::HashSet;

    /// درخواست‌های همزمان برای یک آدرس جدید فقط یک رکورد میسازن
    #[tokio::test]
    async fn test_concurrent_same_url_creates_one_record() {
        let (_, state) = test_app().await;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let shortener = state.shortener.clone();
                tokio::spawn(async move { shortener.shorten("https://race.example.com").await })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap().unwrap().short_url);
        }

        assert_eq!(codes.len(), 1);
        assert_eq!(state.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_distinct_urls_get_distinct_codes() {
        let (_, state) = test_app().await;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let shortener = state.shortener.clone();
                tokio::spawn(async move {
                    shortener
                        .shorten(&format!("https://site{i}.example.com"))
                        .await
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            assert!(codes.insert(handle.await.unwrap().unwrap().short_url));
        }

        assert_eq!(codes.len(), 20);
    }
}

// =====================================
// Restart Tests
// =====================================
mod restart_tests {
    use super::*;

    /// بعد از restart، شمارنده از بعد از بزرگ‌ترین کد ادامه میده
    #[tokio::test]
    async fn test_restart_continues_after_stored_codes() {
        let db = Database::in_memory().await.unwrap();

        let first_run = state_on(db.clone(), true).await;
        first_run.shortener.shorten("https://a.example.com").await.unwrap();
        first_run.shortener.shorten("https://b.example.com").await.unwrap();

        let second_run = state_on(db, true).await;
        let created = second_run
            .shortener
            .shorten("https://c.example.com")
            .await
            .unwrap();
        assert_eq!(created.short_url, 3);

        assert_eq!(
            second_run.redirector.resolve(1).await.unwrap(),
            "https://a.example.com"
        );
    }

    /// شمارنده قدیمی (شروع از 1) با کد تکراری برخورد میکنه ولی سرویس بازیابی میکنه
    #[tokio::test]
    async fn test_legacy_counter_recovers_from_collision() {
        let db = Database::in_memory().await.unwrap();

        let first_run = state_on(db.clone(), true).await;
        first_run.shortener.shorten("https://a.example.com").await.unwrap();
        first_run.shortener.shorten("https://b.example.com").await.unwrap();

        let legacy_run = state_on(db, false).await;
        let created = legacy_run
            .shortener
            .shorten("https://c.example.com")
            .await
            .unwrap();
        assert_eq!(created.short_url, 3);
        assert_eq!(legacy_run.store.count().await.unwrap(), 3);
    }
}

// =====================================
// Property-Based Tests
// =====================================
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use short_url::utils;

    proptest! {
        /// رشته‌ای که `://` نداره هیچوقت آدرس وب معتبر نیست
        #[test]
        fn strings_without_scheme_separator_are_invalid(s in "[^:]{0,64}") {
            prop_assert!(!utils::is_valid_web_url(&s));
        }

        /// آدرس‌های ساده http/https همیشه معتبرن
        #[test]
        fn simple_web_urls_are_valid(
            scheme in prop::sample::select(vec!["http", "https"]),
            host in "[a-z]{1,12}\\.[a-z]{2,6}",
            path in "(/[a-z0-9]{0,8}){0,3}",
        ) {
            let url = format!("{scheme}://{host}{path}");
            prop_assert!(utils::is_valid_web_url(&url));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// shorten دوبار برای هر آدرس همون کد رو میده و resolve همون آدرس رو برمیگردونه
        #[test]
        fn shorten_is_idempotent_and_resolvable(host in "[a-z]{1,12}\\.com", path in "[a-z0-9]{0,10}") {
            let url = format!("https://{host}/{path}");
            let runtime = tokio::runtime::Runtime::new().unwrap();

            runtime.block_on(async {
                let (_, state) = test_app().await;

                let first = state.shortener.shorten(&url).await.unwrap();
                let second = state.shortener.shorten(&url).await.unwrap();
                assert_eq!(first, second);

                let resolved = state.redirector.resolve(first.short_url).await.unwrap();
                assert_eq!(resolved, url);
            });
        }
    }
}
