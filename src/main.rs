use anniversary::{
    generate_fixtures, handle_tenure_request, init_storage, init_tracing, FixtureRequest,
};
use anniversary_config::{RuntimeConfig, StorageBackend};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate synthetic employee datasets and filter them by tenure
#[derive(Parser)]
#[command(name = "anniversary")]
#[command(version)]
#[command(about = "Generate synthetic employee datasets and filter them by tenure", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Storage backend: fs, s3, memory (overrides config file)
    #[arg(short, long, value_name = "BACKEND", global = true)]
    storage: Option<StorageBackend>,

    /// Root directory for buckets (filesystem backend only)
    #[arg(short, long, value_name = "DIR", global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a synthetic employee dataset as Parquet
    Generate {
        /// Bucket to create and write into
        #[arg(short, long)]
        bucket: String,

        /// Number of rows (defaults to generator.default_rows)
        #[arg(short = 'n', long)]
        num_rows: Option<usize>,

        /// Object key (defaults to generator.dataset_key)
        #[arg(long)]
        key: Option<String>,

        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Filter a dataset by tenure and write the matches as CSV
    Filter {
        /// Whole number of years employed
        #[arg(long, allow_hyphen_values = true)]
        tenure_years: String,

        #[arg(long)]
        source_bucket: String,

        #[arg(long)]
        source_key: String,

        /// s3://bucket/key or bucket/key
        #[arg(long)]
        destination_path: String,
    },

    /// Create a bucket, printing whether it succeeded
    CreateBucket {
        #[arg(short, long)]
        bucket: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };

    apply_cli_overrides(&mut config, &cli)?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log);
    let storage = init_storage(&config)?;

    match cli.command {
        Command::Generate {
            bucket,
            num_rows,
            key,
            seed,
        } => {
            let request = FixtureRequest {
                bucket,
                key: key.unwrap_or_else(|| config.generator.dataset_key.clone()),
                num_rows: num_rows.unwrap_or(config.generator.default_rows),
                seed,
            };
            let summary = generate_fixtures(&storage, &request)
                .await
                .context("Fixture generation failed")?;

            println!(
                "{}",
                json!({
                    "location": summary.location.to_string(),
                    "row_count": summary.row_count,
                    "bytes_written": summary.bytes_written,
                    "bucket_created": summary.bucket_created,
                })
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Filter {
            tenure_years,
            source_bucket,
            source_key,
            destination_path,
        } => {
            // Passed through as a string; the handler owns tenure validation
            let payload = json!({
                "tenure_years": tenure_years,
                "source_bucket": source_bucket,
                "source_key": source_key,
                "destination_path": destination_path,
            });
            let response = handle_tenure_request(&storage, &payload).await;
            println!("{}", response.to_json());

            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::CreateBucket { bucket } => {
            let created = storage.create_bucket(&bucket).await;
            println!("{}", created);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) -> Result<()> {
    if let Some(backend) = cli.storage {
        config.storage.backend = backend;
        match backend {
            StorageBackend::Fs => {
                config.storage.fs.get_or_insert_with(Default::default);
            }
            StorageBackend::S3 => {
                config.storage.s3.get_or_insert_with(Default::default);
            }
            StorageBackend::Memory => {}
        }
    }

    // Override output directory (only valid for fs backend)
    if let Some(output) = &cli.output {
        if config.storage.backend != StorageBackend::Fs {
            anyhow::bail!(
                "--output flag only works with filesystem backend, but backend is '{}'.\n\
                Either remove --output flag or set backend to 'fs'.",
                config.storage.backend
            );
        }

        let fs_config = config.storage.fs.get_or_insert_with(Default::default);
        fs_config.path = output.to_string_lossy().to_string();
    }

    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    Ok(())
}
