use std::{net::SocketAddr, sync::Arc};

use application::{CityStorePort, RefreshService};
use infrastructure::{
    AppConfig, InMemoryCityStore, LogFormat, RefreshScheduler, build_weather_sources, init_logging,
};
use presentation_http::{
    RateLimiterConfig, RateLimiterLayer, create_app, state::AppState,
    tasks::spawn_rate_limit_cleanup_task,
};
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = AppConfig::load_or_default();

    let log_format = config.server.log_format.parse::<LogFormat>();
    init_logging(log_format.clone().unwrap_or_default())?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }
    if let Err(e) = log_format {
        warn!("{}, using text logs", e);
    }

    info!("Weather server v{} starting...", env!("CARGO_PKG_VERSION"));

    let cities: Vec<String> = config
        .weather
        .cities()
        .into_iter()
        .map(String::from)
        .collect();
    let interval = config.weather.refresh_interval();

    info!(
        host = %config.server.host,
        port = config.server.port,
        cities = ?cities,
        interval_secs = interval.as_secs(),
        openweathermap_key = config.weather.has_api_key(),
        "Configuration loaded"
    );
    if !config.weather.has_api_key() {
        warn!("WEATHER_API_KEY not set, OpenWeatherMap readings will be skipped");
    }

    let store: Arc<dyn CityStorePort> = Arc::new(InMemoryCityStore::with_retention(
        config.weather.history_retention(),
    ));
    let sources = build_weather_sources(&config.weather)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather sources: {e}"))?;
    let refresh = Arc::new(RefreshService::new(sources, Arc::clone(&store)));

    let shutdown = CancellationToken::new();
    let scheduler = RefreshScheduler::new(Arc::clone(&refresh), cities, interval);
    let scheduler_handle = scheduler.spawn(shutdown.child_token());

    let rate_limiter = RateLimiterLayer::new(&RateLimiterConfig {
        enabled: config.server.rate_limit_enabled,
        requests_per_minute: config.server.rate_limit_rpm,
    });
    let cleanup_handle =
        spawn_rate_limit_cleanup_task(rate_limiter.state(), None, shutdown.child_token());

    let state = AppState::new(refresh)
        .map_err(|e| anyhow::anyhow!("Failed to compile page templates: {e}"))?;
    let app = create_app(state, rate_limiter);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown.cancel();
    let _ = tokio::join!(scheduler_handle, cleanup_handle);

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
