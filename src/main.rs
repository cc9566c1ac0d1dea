//! analyst - data-analysis agent over HTTP.
//!
//! Accepts a task description plus supporting files, has an LLM write a
//! one-shot Python analysis script, runs it in an isolated workspace
//! under a wall-clock budget, and returns the script's JSON verbatim.

mod config;
mod error;
mod executor;
mod extract;
mod http_server;
mod llm;
mod patch;
mod prompt;
mod state;
mod validate;
mod workspace;

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "Data-analysis agent over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = config::Config::from_env();
    info!(
        model = %config.model,
        timeout_secs = config.exec_timeout.as_secs(),
        workspace_root = %config.workspace_root.display(),
        "configuration loaded"
    );

    let state = state::AppState::new(config);
    let app = http_server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
