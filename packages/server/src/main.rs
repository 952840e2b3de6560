use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use lifecycle::LifecycleEngine;
use lifecycle::clock::SystemClock;
use lifecycle::notify::{Notifier, TracingNotifier};
use server::config::AppConfig;
use server::notifier::HttpRelayNotifier;
use server::state::AppState;
use server::store::SeaOrmStore;
use server::{build_router, database, seed};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialise database")?;

    let notifier: Arc<dyn Notifier> = match &config.notify.relay_url {
        Some(url) => {
            info!(relay = %url, "Delivering mail through HTTP relay");
            Arc::new(HttpRelayNotifier::new(url.clone(), &config.notify)?)
        }
        None => {
            info!("No mail relay configured, mails are only logged");
            Arc::new(TracingNotifier::new(config.notify.signature.clone()))
        }
    };

    let engine = LifecycleEngine::new(
        Arc::new(SeaOrmStore::new(db)),
        notifier,
        Arc::new(SystemClock),
    );

    if let Some(admin) = &config.bootstrap_admin {
        seed::seed_bootstrap_admin(&engine, admin)
            .await
            .context("Failed to seed bootstrap admin")?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        engine,
        config: Arc::new(config),
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
