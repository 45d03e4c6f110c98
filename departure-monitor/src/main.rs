use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departure_monitor::config::AppConfig;
use departure_monitor::poll::{StopRegistry, spawn_stop};
use departure_monitor::web::{AppState, create_router};
use departure_monitor::wienerlinien::{MockMonitorSource, MonitorClient, MonitorSource};

const DEFAULT_LOG_FILTER: &str = "departure_monitor=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let source: Arc<dyn MonitorSource> = match &config.provider.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving monitor data from mock directory");
            Arc::new(MockMonitorSource::from_dir(dir)?)
        }
        None => Arc::new(MonitorClient::new(config.client())?),
    };

    let registry = StopRegistry::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let queries = config.stop_queries()?;
    info!(
        stops = queries.len(),
        selection = %config.selection,
        interval_secs = config.poll_interval_secs,
        "starting pollers"
    );
    let tasks: Vec<_> = queries
        .into_iter()
        .map(|query| {
            spawn_stop(
                query,
                source.clone(),
                config.board(),
                config.timing(),
                registry.clone(),
                shutdown_rx.clone(),
            )
        })
        .collect();

    let app = create_router(AppState::new(registry));
    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    info!(addr = %config.server.bind, "listening");
    info!("endpoints: GET /health, GET /stops, GET /stops/:id");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutting down");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    for task in tasks {
        if let Err(e) = task.await {
            error!(error = %e, "stop task panicked");
        }
    }

    Ok(())
}
