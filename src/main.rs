//! Server binary: settings from the environment, lazy datastore pools, graceful shutdown.

use interiors_site::{app, AppState, DatastoreStatus, Datastores, PgStore, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("interiors_site=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let state = match (settings.datastore_status(), settings.admin_datastore_status()) {
        (DatastoreStatus::Ready(public_url), DatastoreStatus::Ready(admin_url)) => {
            let schema = settings.database_schema.clone();
            let public = PgStore::connect_lazy(&public_url, &schema, settings.max_connections)?;
            let admin = PgStore::connect_lazy(&admin_url, &schema, settings.max_connections)?;
            AppState::new(settings, Datastores::new(Arc::new(public), Arc::new(admin)))
        }
        (public, admin) => {
            let reason = public
                .problem()
                .or_else(|| admin.problem().map(|_| "DATABASE_ADMIN_URL is not a usable postgres:// URL"))
                .unwrap_or("datastore is not configured");
            tracing::warn!(reason, "datastore unavailable; content and form routes will answer config_error");
            AppState::unconfigured(settings, reason)
        }
    };

    let bind_addr = state.settings.bind_addr.clone();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
