use anyhow::Context;
use axum::extract::Request;
use axum::ServiceExt;
use clap::Parser;
use std::net::SocketAddr;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{router, AppState};

/// Stratus: marketing site + content core for a VPS hosting provider.
#[derive(Parser, Debug)]
#[command(name = "stratus")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "STRATUS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt_layer)
        .init();

    let args = Args::parse();
    let state = AppState::in_memory();

    let routes = router::build(state);
    let routes = NormalizePathLayer::trim_trailing_slash().layer(routes);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "stratus listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(routes))
        .await
        .context("server exited")?;
    Ok(())
}
