use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use clap::Parser;
use sensor::Reading;
use sensor_exporter::app::open_device;
use sensor_exporter::app::ApplicationBuilder;
use sensor_exporter::config::Cli;
use sensor_exporter::config::Commands;
use sensor_exporter::config::ReadArgs;
use sensor_exporter::config::ServeArgs;
use sensor_exporter::logging;
use serde::Serialize;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(serve_args) => run_serve(*serve_args).await,
        Commands::Read(read_args) => run_read(read_args).await,
    }
}

async fn run_serve(serve_args: ServeArgs) -> Result<()> {
    let _guard = logging::init(serve_args.log_file.as_ref())?;

    tracing::info!("Starting sensor exporter {}", &**version::VERSION);

    let app = ApplicationBuilder::new(serve_args).build()?;

    app.run().await?;
    app.shutdown();

    Ok(())
}

#[derive(Serialize)]
struct ReadOutput {
    captured_at: DateTime<Utc>,
    #[serde(flatten)]
    reading: Reading,
}

async fn run_read(read_args: ReadArgs) -> Result<()> {
    utils::logging::init();

    let mut device = open_device(&read_args.device)
        .map_err(|e| anyhow::anyhow!("Failed to initialize sensor: {e:?}"))?;

    let output = tokio::task::spawn_blocking(move || {
        device.sense().map(|reading| ReadOutput {
            captured_at: Utc::now(),
            reading,
        })
    })
    .await
    .context("sensor task panicked")?
    .map_err(|e| anyhow::anyhow!("Failed to read sensor: {e:?}"))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
