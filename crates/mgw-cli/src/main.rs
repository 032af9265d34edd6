use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mgw_core::{
    FormattedStatus, JsonFileStore, ServiceConfig, SnapshotStore, StatusRecord, StatusService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod server;

#[derive(Debug, Parser)]
#[command(name = "mgwd")]
#[command(about = "Media gateway status console (telemetry receiver)")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value = "./data/mgw-current.json")]
    state_file: PathBuf,

    #[arg(long, default_value_t = 100)]
    history_capacity: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept status reports over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
    /// Print the persisted status.
    Show {
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
    /// Check a status payload file without storing it.
    Validate { file: PathBuf },
    /// Delete the persisted status.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = ServiceConfig {
        history_capacity: cli.history_capacity,
    };
    let store = JsonFileStore::new(cli.state_file.clone());

    match cli.command {
        Command::Serve { bind } => {
            let service = Arc::new(StatusService::open(store, config).await);
            server::serve(service, &bind).await?;
        }
        Command::Show { format } => {
            let service = StatusService::open(store, config).await;
            print_status(&service.formatted_status().await, format)?;
        }
        Command::Validate { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("read payload {}", file.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parse payload {}", file.display()))?;
            let record = StatusRecord::decode(&raw)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Clear => {
            store.delete().await?;
            info!(path = %store.path().display(), "status snapshot removed");
        }
    }

    Ok(())
}

fn print_status(status: &FormattedStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(status)?);
        }
        OutputFormat::Human => {
            let Some(view) = status.view() else {
                println!("No data received yet");
                return Ok(());
            };

            println!("=== MGW Status ===");
            println!(
                "Connection: {} lan={} wan={}",
                view.connection.status, view.connection.lan_ip, view.connection.wan_ip
            );
            println!(
                "Signal:     csqw={} csqm={} rssim={} quality={}",
                view.signal.csqw, view.signal.csqm, view.signal.rssim, view.signal.quality
            );
            println!(
                "Storage:    {} used of {} ({} free, {}%)",
                view.storage.used, view.storage.total, view.storage.free, view.storage.usage_percent
            );
            println!(
                "System:     {} ({}) speaker_errors={}",
                view.system.temperature, view.system.temperature_status, view.system.speaker_errors
            );
            println!(
                "Speakers:   {} [{} {}]",
                view.system.speakers.summary, view.system.speakers.binary, view.system.speakers.hex
            );
            println!(
                "Media:      fm={} playlist={}",
                view.media.fm_status, view.media.current_playlist
            );
            if let Some(ts) = view.metadata.last_update {
                println!("Updated:    {} ({})", ts.to_rfc3339(), view.metadata.uptime);
            }
            println!(
                "Liveness:   {} after {} updates",
                view.metadata.data_age, view.metadata.total_updates
            );
        }
    }

    Ok(())
}
