use anyhow::Context;
use app_config::AppConfig;
use app_database::{db_connect::initialize_db, service::DbService};
use app_error::AppError;
use app_models::RaffleEntry;
use micro_raffle::{RaffleService, SharedRaffleService, create_routes};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::{FmtSubscriber, layer::SubscriberExt};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing DATABASE_URL stops the process here
    let config = AppConfig::from_env()?;

    let sentry_guard = match &config.monitoring.sentry_dsn {
        Some(dsn) => Some(sentry::init((
            dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(config.environment.clone().into()),
                ..Default::default()
            },
        ))),
        None => None,
    };

    let log_level = match config.monitoring.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    let subscriber = subscriber.with(sentry_tracing::layer());
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if sentry_guard.is_some() {
        info!("Sentry error reporting enabled");
    }

    info!(
        "Starting raffle service in {} environment at {}",
        config.environment,
        chrono::Utc::now()
    );

    // Connects lazily on the first request that needs the store
    let db = initialize_db(&config.database);
    let entries = Arc::new(DbService::<RaffleEntry>::new(db, RaffleEntry::TABLE));
    let raffle_service: SharedRaffleService =
        Arc::new(RaffleService::new(entries, config.raffle.clone()));

    let app = create_routes(raffle_service, &config);

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .context(format!("Failed to bind to address: {}", address))?;

    info!("Raffle service API available at: http://{}", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}
