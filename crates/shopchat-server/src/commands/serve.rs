//! Serve command
//!
//! Usage: shopchat-server serve [--bind <ADDR>]

use std::net::SocketAddr;

use clap::Args;
use shopchat_core::logging_facility::{self, init};
use shopchat_core::AppConfig;
use tokio::net::TcpListener;

use crate::outbound::install_outbound_propagation;
use crate::routes::{create_router, AppState};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

/// Execute serve command
pub async fn execute(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init(config.log_profile);
    let _propagation = install_outbound_propagation();

    let addr = args.bind.unwrap_or(config.bind_addr);
    let listener = TcpListener::bind(addr).await?;
    logging_facility::info(
        "server listening",
        &serde_json::json!({"bindAddr": addr.to_string()}),
    );

    axum::serve(listener, create_router(AppState::from_config(&config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    logging_facility::info("server stopped", &());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
