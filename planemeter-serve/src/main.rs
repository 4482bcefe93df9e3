use std::{path::PathBuf, sync::Arc};

use argh::FromArgs;
use planemeter::MeasurementConfig;
use planemeter_serve::{app, ConfigStore};

#[derive(FromArgs)]
/// Serve planar distance measurements over HTTP
struct Args {
    /// address to bind to
    #[argh(option, default = "String::from(\"127.0.0.1\")")]
    host: String,

    /// port to listen on
    #[argh(option, default = "5000")]
    port: u16,

    /// path to a JSON measurement configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // configuration errors stop the server before it starts listening
    let config = match &args.config {
        Some(path) => MeasurementConfig::from_file(path)?,
        None => {
            log::info!("no configuration given, using the web reference setup");
            MeasurementConfig::reference_web()?
        }
    };
    let store = Arc::new(ConfigStore::new(config)?);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Starting the server");
    log::info!("🔥 Listening on: http://{addr}");
    log::info!("🔧 Press Ctrl+C to stop the server");

    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for Ctrl+C: {e}");
    }
    log::info!("shutting down");
}
