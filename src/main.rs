//! # Short URL - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` → تنظیمات → لاگ → دیتابیس → migration → state → سرور

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use short_url::{
    api::create_router,
    config::{Config, Environment},
    database::Database,
    services::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // اگه فایل .env نباشه اوکیه
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;

    init_tracing(config.environment);
    info!("Starting short-url service...");

    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("Database connected");

    database.migrate().await.context("failed to run migrations")?;
    info!("Database migrations applied");

    let state = AppState::from_database(database.clone(), config.clone())
        .await
        .context("failed to initialise application state")?;

    let app = create_router(state);

    let addr = config.server_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    info!("Shutdown complete");

    Ok(())
}

/// راه‌اندازی سیستم tracing
///
/// - `RUST_LOG` فیلتر رو تعیین میکنه (پیش‌فرض `short_url=debug,tower_http=debug`)
/// - در production خروجی JSON، در بقیه محیط‌ها pretty
fn init_tracing(environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("short_url=debug,tower_http=debug"));

    let json = environment.is_production();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
        }))
        .init();
}

/// صبر برای Ctrl+C یا SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
