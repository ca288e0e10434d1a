//! Heatwatch CLI
//!
//! Command-line entry point:
//! - `watch` (default): interactive dashboard
//! - `snapshot`: fetch once and print the grid
//! - `config`: print or write a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use heatwatch::config::{generate_default_config, Config, LoggingConfig};
use heatwatch::dashboard;
use heatwatch::fetcher::{FetchController, HeatmapClient, HeatmapSource};
use heatwatch::heatmap::{render_snapshot, snapshot_json, SnapshotStyle};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "heatwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal dashboard for a live activity heatmap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Heatmap endpoint URL (overrides config and HEATWATCH_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Maximum grid columns (overrides config)
    #[arg(long, global = true)]
    pub columns: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive dashboard (default)
    Watch {
        /// Refresh automatically every N seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Fetch once and print the heatmap
    Snapshot {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Disable ANSI colors in text output
        #[arg(long)]
        no_color: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.url {
        config.endpoint.url = url;
    }
    if let Some(columns) = cli.columns {
        config.dashboard.max_columns = columns;
    }

    match cli.command.unwrap_or(Commands::Watch { interval: None }) {
        Commands::Watch { interval } => {
            init_logging(&config.logging, true)?;
            if let Some(secs) = interval {
                config.dashboard.auto_refresh_secs = (secs > 0).then_some(secs);
            }

            let client = HeatmapClient::new(config.endpoint.client_config())?;
            let controller = FetchController::new(Arc::new(client));
            dashboard::run(controller, &config.dashboard)
                .await
                .context("dashboard terminated")?;
        }

        Commands::Snapshot { format, no_color } => {
            init_logging(&config.logging, false)?;

            let client = HeatmapClient::new(config.endpoint.client_config())?;
            tracing::info!(endpoint = %client.endpoint(), "Fetching heatmap snapshot");
            let payload = client.fetch().await?;

            match format {
                OutputFormat::Json => {
                    let body = snapshot_json(&payload, config.dashboard.max_columns);
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    let style = if no_color {
                        SnapshotStyle::Plain
                    } else {
                        SnapshotStyle::Color
                    };
                    print!(
                        "{}",
                        render_snapshot(&payload, config.dashboard.max_columns, style)
                    );
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// The interactive dashboard owns the terminal, so it only logs when a log
/// file is configured.
fn init_logging(config: &LoggingConfig, interactive: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("heatwatch={}", config.level).into());

    let (writer, ansi) = match (&config.file, interactive) {
        (Some(path), _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, true) => (BoxMakeWriter::new(std::io::sink), false),
        (None, false) => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt_layer.json()).try_init()?;
    } else {
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
