use anyhow::{Context, Result};
use axum::serve;
use parkeo::api::client::ApiClient;
use parkeo::core::config::Config;
use parkeo::core::routes::build_router;
use parkeo::core::state::AppState;
use parkeo::core::tracing_init::init_tracing;
use parkeo::stores::parking_state::{OccupancyPoller, ParkingState};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and point base_url at the parking service.",
        config_path.display()
    ))?;

    init_tracing(&config.logging);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        num_threads = config.server.num_threads,
        backend = %config.backend.base_url,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Parking console starting"
    );

    let api = ApiClient::new(&config.backend.base_url, config.request_timeout())
        .context("Failed to create API client")?;

    let parking = Arc::new(ParkingState::new());

    // A failure here is logged and leaves the configuration in the failed state
    if let Ok(parking_config) = parking
        .refresh_config(&api, config.backend.config_id)
        .await
    {
        info!(
            slot = parking_config.slot,
            precio = parking_config.precio,
            "Parking configuration loaded"
        );
    }

    let poller = OccupancyPoller::spawn(
        Arc::clone(&parking),
        api.clone(),
        config.occupancy_interval(),
    );

    info!(
        interval_ms = config.polling.occupancy_interval_ms,
        "Occupancy poller started"
    );

    let port = config.server.port;
    let state = Arc::new(AppState::new(config, api, parking));

    let app = build_router(state).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "Parking console listening");

    let result = serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error");

    if let Err(e) = &result {
        error!(error = %format!("{:#}", e), "Console server failed");
    }

    drop(poller);
    info!("Shutting down gracefully");

    result
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
