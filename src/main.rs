use dotenv_flow::dotenv_flow;
use eyre::{Result, WrapErr};
use inclusion_gateway::app;
use std::env;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load dotenv-flow variables
    dotenv_flow().ok();

    // Enable logging
    config_tracing();

    // Start server
    let port = env::var("SERVER_LOCAL_PORT").unwrap_or("3000".to_owned());
    let addr: SocketAddr = format!("0.0.0.0:{port}")
        .parse()
        .wrap_err("invalid bind address")?;

    info!("listening on {addr}");
    server_with_graceful_shutdown(addr).await
}

async fn server_with_graceful_shutdown(addr: SocketAddr) -> Result<()> {
    // Load plugins
    let (mut plugin_container, router) = app()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;

    // Spawn task for server
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!("server stopped: {err}");
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down gracefully");
            let _ = plugin_container.unload();
        }
    };

    Ok(())
}

fn config_tracing() {
    let tracing_layer = tracing_subscriber::fmt::layer();
    let filter = filter::Targets::new()
        .with_target("hyper::proto", tracing::Level::INFO)
        .with_target("tower_http::trace", tracing::Level::DEBUG)
        .with_default(tracing::Level::DEBUG);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}
