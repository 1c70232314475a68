use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use teamflow::config::{self, CliArgs};
use teamflow::db::{self, RetryConfig, Store};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// `RUST_LOG` when set, otherwise warnings plus this crate's own events
fn log_filter(debug: bool) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,teamflow={}", default_level)))
}

/// Resolves the configuration under a temporary stdout subscriber
///
/// The log directory is part of the configuration, so the full subscriber
/// can only be installed afterwards.
fn load_config(args: CliArgs) -> config::Config {
    let debug = args.debug;
    let bootstrap = tracing_subscriber::fmt().with_env_filter(log_filter(debug)).finish();
    tracing::subscriber::with_default(bootstrap, || config::get_config(args))
}

/// Installs the stdout layer and, when a log directory is configured, a JSON
/// layer written to a daily rolling file
///
/// The returned guard flushes the file writer when dropped and must live as
/// long as the server.
fn init_logging(debug: bool, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = || log_filter(debug);

    let console_layer = tracing_subscriber::fmt::layer().with_filter(filter());

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "teamflow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    info!(log_dir = ?log_dir, "File logging enabled");
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let debug = args.debug;
    let config = load_config(args);
    let _guard = init_logging(debug, config.log_dir.as_deref())?;

    let pool = db::init_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    {
        let mut conn = pool.get().context("Failed to get a database connection")?;
        teamflow::run_migrations(&mut conn)?;
    }

    let store = Arc::new(Store::new(pool, RetryConfig::with_max_retries(config.max_retries)));
    let app = teamflow::create_app(store);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await
        .context("Server error")?;
    Ok(())
}
