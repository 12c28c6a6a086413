//! Cyclone warning-record encoder service.
//!
//! Reads pre-decoded bulletin feature collections (JSON), runs the
//! record-assembly transform, and writes warning-record and GeoJSON
//! artifacts to the filesystem.

mod config;
mod decoder;
mod sink;

use anyhow::Result;
use bytes::Bytes;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dat_transform::{OutputChannel, Transformer};

use config::EncoderConfig;
use decoder::JsonDecoder;
use sink::FsSink;

#[derive(Parser, Debug)]
#[command(name = "dat-encoder")]
#[command(about = "Tropical-cyclone bulletin to warning-record encoder")]
struct Args {
    /// Decoded bulletin file (JSON feature collections)
    input: String,

    /// Output directory root (overrides DAT_OUTPUT_DIR)
    #[arg(short, long)]
    output: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = EncoderConfig::from_env()?;
    if let Some(output) = args.output {
        config.output_dir = output.into();
    }

    info!(
        input = %args.input,
        output = %config.output_dir.display(),
        topic = %config.topic_path,
        "Starting warning-record encoder"
    );

    let data = tokio::fs::read(&args.input).await?;

    let mut transformer =
        Transformer::new(JsonDecoder, OutputChannel::new(&config.topic_path));
    transformer.transform(&Bytes::from(data), &args.input)?;

    let sink = FsSink::new(&config.output_dir);
    let published = transformer.publish(&sink)?;

    info!(artifacts = published, "Published artifacts");
    Ok(())
}
