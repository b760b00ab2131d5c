use std::{net::SocketAddr, sync::Arc};
use tank_maintainer::{
    actions,
    api::TankApi,
    auth::{IdentityProvider, StaticTokenProvider},
    router, AppState, Config,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let api = TankApi::new(&config.api_base_url)?;
    let identity = config.identity.as_ref().map(|identity| {
        Arc::new(StaticTokenProvider::new(&identity.user, &identity.token))
            as Arc<dyn IdentityProvider>
    });
    let state = AppState::new(api, identity);

    info!(api = %config.api_base_url, "loading tanks");
    if let Err(message) = actions::refresh(&state).await {
        warn!("initial tank fetch failed, serving the error page: {message}");
    }
    let _identity_watch = actions::watch_identity(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("could not listen for ctrl-c, shutting down only when killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
