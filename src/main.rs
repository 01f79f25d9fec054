mod config;
mod state;
mod routes;
mod handlers;
mod error;
mod languages;
mod translate;
mod upstream;
mod client;


use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "live-translate", about = "Live machine translation relay and console client")]
struct Cli {
    /// Path to a YAML or JSON config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy)]
enum Mode {
    /// Run the translation relay server (default)
    Serve,
    /// Run the interactive console client against a relay
    Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let mode = cli.command.unwrap_or(Mode::Serve);

    // Client output goes to stdout, so logs stay on stderr and quieter
    let default_filter = match mode {
        Mode::Serve => "live_translate=debug,tower_http=debug",
        Mode::Client => "live_translate=warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, loaded_path) = Config::discover(cli.config.as_deref())?;
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No config file found, using defaults"),
    }

    match mode {
        Mode::Serve => serve(config).await,
        Mode::Client => client::console::run(&config.client_config).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    // Fails here, before binding, when the API key is missing
    let app_state = AppState::new(config.clone())?;

    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let system_config = &config.system_config;
    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
