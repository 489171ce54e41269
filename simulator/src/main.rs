mod errors;
mod export;
mod telemetry;
mod upload;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use errors::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use upload::Uploader;

/// Generates a day of sample IoT sensor data as CSV and uploads it to S3.
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    /// Target S3 bucket
    #[arg(env = "S3_BUCKET")]
    bucket: String,

    /// Number of simulated devices (sensor-001, sensor-002, ...)
    #[arg(long, env = "DEVICES", default_value_t = 5)]
    devices: usize,

    /// Day to generate, defaults to today (UTC)
    #[arg(long, env = "DATE")]
    date: Option<NaiveDate>,

    /// Local staging directory
    #[arg(long, env = "OUTPUT_DIR", default_value = "temp_data")]
    output_dir: PathBuf,

    /// Keep the staged CSV files after the run
    #[arg(long)]
    keep_files: bool,

    /// Write the CSV files without uploading them
    #[arg(long)]
    skip_upload: bool,

    /// Seed for reproducible data
    #[arg(long, env = "SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    upload::validate_bucket_name(&args.bucket)?;

    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let device_ids = device_ids(args.devices);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("Generating sample IoT data for {} devices...", device_ids.len());

    let mut files = Vec::with_capacity(device_ids.len());
    let mut total_records = 0;
    for device_id in &device_ids {
        let readings = telemetry::generate_day(&mut rng, device_id, date);
        let path = export::write_csv(&args.output_dir, date, device_id, &readings).await?;
        info!("Generated {} readings for {}", readings.len(), device_id);

        total_records += readings.len();
        files.push((path, export::object_key(date, device_id)));
    }

    if args.skip_upload {
        info!("Skipping upload, files left in {}", args.output_dir.display());
    } else {
        info!("Uploading files to S3 bucket: {}", args.bucket);
        let uploader = Uploader::from_env(args.bucket.clone()).await;
        for (path, key) in &files {
            uploader.upload_file(path, key).await?;
        }
    }

    if !args.keep_files && !args.skip_upload {
        tokio::fs::remove_dir_all(&args.output_dir).await?;
    }

    info!(
        "Successfully generated {} CSV files with {} total records",
        files.len(),
        total_records
    );
    Ok(())
}

fn device_ids(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("sensor-{:03}", n)).collect()
}
