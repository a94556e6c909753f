use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::http::{self, AppState};

pub async fn serve(config: &Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    let provider = crate::provider_from_config(config);
    info!(
        provider = provider.name(),
        base_url = %config.provider.base_url,
        model = %config.provider.model,
        "provider configured"
    );

    let (orchestrator, executor) = crate::build_agent(provider, config.provider.temperature);
    let state = AppState::new(orchestrator, executor);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = http::router(state).layer(cors);

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
