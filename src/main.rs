use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::watch;

use sensor_gateway_rs::csv_log::{self, CsvLogWriter};
use sensor_gateway_rs::server;
use sensor_gateway_rs::state::GatewayState;
use sensor_gateway_rs::window::DEFAULT_WINDOW_SIZE;

#[derive(Parser, Debug)]
#[command(name = "sensor_gateway")]
#[command(about = "Telemetry ingestion server for the vehicle sensor module", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Directory holding the sensor log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Samples kept per channel for the live view
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let csv_path = args.data_dir.join("sensor_data.csv");
    csv_log::init_csv_log(&csv_path)?;

    let state = GatewayState::new(args.window_size);

    let (stop_tx, stop_rx) = watch::channel(false);
    let writer = CsvLogWriter::new(state.queue(), csv_path);
    let writer_handle = tokio::spawn(writer.run(stop_rx));

    let app = server::router(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("sensor gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let the writer finish its current pass before exiting. Whatever is
    // still queued at this point is dropped with the process.
    log::info!("shutting down, stopping log writer");
    let _ = stop_tx.send(true);
    writer_handle.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to install ctrl-c handler: {}", err);
    }
}
