//! # Urneo Layout Server
//!
//! Local template server for the Urneo layout editor.
//! Binds to localhost only.

use std::net::SocketAddr;

use clap::Parser;
use layout_core::DocumentStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use layout_server::{build_router, AppState, CliArgs, ServerConfig};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,layout_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,layout_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::try_from(CliArgs::parse())?;

    let store = match &config.data_dir {
        Some(dir) => {
            tracing::info!("Persisting templates to: {:?}", dir);
            DocumentStore::with_data_dir(dir)?
        }
        None => {
            tracing::warn!("No data directory configured; templates are kept in memory only");
            DocumentStore::new()
        }
    };
    tracing::info!(
        "Categories: {}",
        config
            .categories
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let state = AppState::new(store, config.categories);
    let app = build_router(state, config.port);

    // Bind to localhost ONLY
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Urneo layout server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
