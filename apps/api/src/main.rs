mod config;
mod errors;
mod models;
mod prediction;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::prediction::metrics::CurrencyTable;
use crate::prediction::scorer::LinearModelScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("paygrade_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Paygrade API v{}", env!("CARGO_PKG_VERSION"));

    // Load the scorer once, before first use. A load failure means no
    // request can succeed, so refuse to start rather than serve errors.
    let (scorer, native_currency, benchmarks) =
        LinearModelScorer::load(Path::new(&config.model_path))?;
    info!(
        "Salary model loaded from {} (native currency: {native_currency})",
        config.model_path
    );

    // Currency table: builtin factors unless an override file is given.
    let currencies = match &config.currency_table_path {
        Some(path) => CurrencyTable::from_path(Path::new(path))?,
        None => CurrencyTable::builtin(),
    };
    currencies.validate(&native_currency)?;
    info!(
        "Currency table ready: {}",
        currencies.codes().collect::<Vec<_>>().join(", ")
    );

    // Build app state — everything shared read-only from here on.
    let state = AppState {
        config: config.clone(),
        scorer: Arc::new(scorer),
        currencies: Arc::new(currencies),
        benchmarks: Arc::new(benchmarks),
        native_currency,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
