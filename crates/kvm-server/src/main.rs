use anyhow::Result;
use clap::Parser;
use infrastructure::ServiceConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kvm_server::{api, setup_app_state};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Listen address (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,kvm_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting KVM Manager Service...");

    let mut config = ServiceConfig::load(&args.config_dir)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        baud_rate = config.serial.line.baud_rate,
        settle_delay_ms = config.serial.line.settle_delay_ms,
        serialize_access = config.serial.serialize_access,
        "Serial line configured"
    );

    let state = setup_app_state(&config);

    match state.list_serial_ports().await {
        Ok(ports) => {
            let devices: Vec<&str> = ports.iter().map(|p| p.device.as_str()).collect();
            info!(?devices, "Available serial ports");
        }
        Err(e) => warn!(error = %e, "Could not enumerate serial ports"),
    }

    let app = api::create_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("API Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("KVM Manager Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
