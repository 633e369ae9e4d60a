//! `semfind` binary: `search` CLI, `serve` HTTP server, `health-check` probe.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use semfind::cli::{self, Args, Command};
use semfind::config::Config;
use semfind::embedding::{Embedder, LazyEmbedder};
use semfind::gateway::{HandlerState, create_router_with_state};
use semfind::matching::MatchEngine;
use semfind::service::MatchService;
use semfind::telemetry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Search(search) => cli::run_search(search)?,
        Command::Serve => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(serve())?,
        Command::HealthCheck { port } => std::process::exit(run_health_check(port)),
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    telemetry::init_server_logging()?;

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        threshold = config.threshold,
        max_seq_len = config.max_seq_len,
        cache = ?config.cache_policy(),
        "semfind starting"
    );

    if config.model_path.is_none() {
        tracing::warn!("No SEMFIND_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = LazyEmbedder::from_config(config.encoder_config());
    let engine = MatchEngine::with_params(embedder, config.match_params());
    let service = Arc::new(MatchService::new(engine, config.cache_policy()));

    if config.preload {
        let service = Arc::clone(&service);
        tokio::task::spawn_blocking(move || service.engine().embedder().load()).await??;
    }

    let state = HandlerState::new(service, config.threshold);
    let app = create_router_with_state(state, config.max_body_bytes);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("semfind shutdown complete");
    Ok(())
}

fn run_health_check(port: Option<u16>) -> i32 {
    let port = port
        .or_else(|| {
            std::env::var("SEMFIND_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
        })
        .unwrap_or(5000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        let Ok(res) = client.get(&url).send().await else {
            return 1;
        };
        if !res.status().is_success() {
            return 1;
        }

        match res.json::<serde_json::Value>().await {
            Ok(body) if body["status"] == "ok" => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
