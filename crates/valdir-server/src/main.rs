mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use valdir_backend::BackendClient;
use valdir_locator::{Locator, NominatimClient, ViaCepClient};

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = valdir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let data = Arc::new(valdir_core::load_locator_data(&config.locator_path)?);
    let timeout = config.http_timeout_secs.map(Duration::from_secs);
    let addresses = ViaCepClient::with_base_url(&config.viacep_base_url, timeout)?;
    let geocoder = NominatimClient::with_base_url(
        &config.nominatim_base_url,
        &config.geocoder_user_agent,
        timeout,
    )?;
    let locator = Locator::new(data, Arc::new(addresses), Arc::new(geocoder));
    let backend = BackendClient::new(&config.backend_url, &config.backend_api_key, timeout)?;

    let auth = AuthState::from_keys(
        &config.api_keys,
        matches!(config.env, valdir_core::Environment::Development),
    )?;
    let state = AppState {
        locator,
        backend,
        site_url: Arc::from(config.site_url.as_str()),
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "valdir-server listening");
    axum::serve(listener, app)
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
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
