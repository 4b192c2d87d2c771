use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plexgate::adapters::http::{api_router, AccessSettings, AppState};
use plexgate::adapters::{
    PlexConfig, PlexMediaClient, PlexSessionValidator, PostgresAccessDirectory,
    SqliteAccessDirectory, StripeBillingAdapter, StripeConfig,
};
use plexgate::config::{AppConfig, DatabaseDriver};
use plexgate::ports::{BillingProvider, MediaAccessClient, SessionValidator};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.server.environment.json_logs() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        driver = ?config.database.driver,
        "Starting plexgate"
    );

    let plex = Arc::new(PlexMediaClient::new(PlexConfig::from(&config.plex))?);
    let media: Arc<dyn MediaAccessClient> = plex.clone();
    let billing: Arc<dyn BillingProvider> =
        Arc::new(StripeBillingAdapter::new(StripeConfig::from(&config.stripe))?);
    let settings = AccessSettings::from_config(&config)?;
    let sessions: Arc<dyn SessionValidator> =
        Arc::new(PlexSessionValidator::new(plex, settings.admin_user_id));

    let state = match config.database.driver {
        DatabaseDriver::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .connect(&config.database.url)
                .await?;
            let directory = PostgresAccessDirectory::new(pool);
            if config.database.run_migrations {
                directory.migrate().await?;
            }
            AppState::new(Arc::new(directory), media, billing, sessions, settings)
        }
        DatabaseDriver::Sqlite => {
            let directory =
                SqliteAccessDirectory::open(&config.database.url, config.database.max_connections)
                    .await?;
            AppState::new(Arc::new(directory), media, billing, sessions, settings)
        }
    };

    let app = api_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
