//! Balcao Server Entry Point
//!
//! Wires the catalog, stores, gateway transport and conversation engine
//! together, then serves the webhook until shutdown.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use balcao_catalog::load_catalog;
use balcao_config::{load_settings, Settings};
use balcao_engine::{Attendant, AttendantOptions};
use balcao_server::{create_router, init_metrics, start_sweeper, AppState, GatewayTransport};

/// How often the idle-session sweeper runs.
const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("BALCAO_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting Balcao Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let _metrics_handle = init_metrics();
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    // A store that cannot open means no session can be tracked; that is
    // fatal at startup rather than a degraded mode.
    let stores = match balcao_persistence::open(Path::new(&config.store.path)) {
        Ok(stores) => stores,
        Err(e) => {
            tracing::error!(path = %config.store.path, error = %e, "Failed to open store");
            std::process::exit(1);
        }
    };
    let sessions = stores.sessions.clone();

    let catalog = match load_catalog(Path::new(&config.catalog.path)) {
        Ok(index) => {
            tracing::info!(
                path = %config.catalog.path,
                products = index.product_count(),
                "Catalog loaded"
            );
            Arc::new(index)
        }
        Err(e) => {
            tracing::error!(path = %config.catalog.path, error = %e, "Failed to load catalog");
            std::process::exit(1);
        }
    };

    let transport = Arc::new(GatewayTransport::new(&config.gateway)?);
    tracing::info!(gateway = %config.gateway.base_url, "Gateway transport ready");

    let attendant = Arc::new(Attendant::new(
        catalog.clone(),
        stores,
        transport,
        AttendantOptions {
            company_name: config.attendant.company_name.clone(),
            specialist_id: config.attendant.specialist_id.clone(),
            catalog_artifact: config.catalog.artifact.clone(),
        },
    ));

    let sweeper_shutdown = start_sweeper(
        sessions.clone(),
        chrono::Duration::hours(config.attendant.session_ttl_hours as i64),
        SWEEP_INTERVAL,
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState::new(Arc::new(config), attendant, catalog, sessions);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = sweeper_shutdown.send(true);
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing from the observability settings.
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("balcao={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
