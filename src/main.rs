//! Inspect which entities a device directory fixture produces.
//!
//! Usage:
//!   cargo run -- --fixture fixtures/devices.json --include "Hall Sensor,Bedroom Humidifier"
//!
//! Runs both platform setups once against the fixture (with an initial
//! update per entity) and prints the resulting entities.

use clap::Parser;
use log::{error, info};
use quasar_sensors::config::{Config, DOMAIN, IntegrationConfig, load_dotenv};
use quasar_sensors::error::{QuasarError, Result};
use quasar_sensors::platform::{ConfigEntry, EntityPlatform, HostData};
use quasar_sensors::quasar::MemoryDirectory;
use quasar_sensors::sensors::{binary_sensor, sensor};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "quasar-sensors")]
#[command(about = "List the entities Quasar devices expose")]
struct Cli {
    /// JSON fixture describing devices and their properties
    #[arg(long, env = "QUASAR_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Device names to include (comma separated)
    #[arg(long, env = "QUASAR_INCLUDE", value_delimiter = ',')]
    include: Vec<String>,

    /// Config entry id to attach the directory to
    #[arg(long, env = "QUASAR_ENTRY_ID")]
    entry_id: Option<String>,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();
    init_logger();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if cli.fixture.is_some() {
        config.fixture = cli.fixture;
    }
    if !cli.include.is_empty() {
        config.integration = IntegrationConfig::new(
            cli.include.iter().map(|s| s.trim()).filter(|s| !s.is_empty()),
        );
    }
    if let Some(entry_id) = cli.entry_id {
        config.entry_id = entry_id;
    }

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let fixture = config.fixture.ok_or(QuasarError::MissingFixture)?;

    info!("Loading device directory from {}", fixture.display());
    let directory = Arc::new(MemoryDirectory::from_file(&fixture)?);

    let host = HostData::new();
    host.register_domain(DOMAIN, config.integration);
    host.attach_directory(DOMAIN, &config.entry_id, directory)?;
    let entry = ConfigEntry::new(config.entry_id);

    let mut sensors = EntityPlatform::new("sensor");
    let mut binary_sensors = EntityPlatform::new("binary_sensor");
    sensor::setup_entry(&host, &entry, &mut sensors).await?;
    binary_sensor::setup_entry(&host, &entry, &mut binary_sensors).await?;

    for platform in [&sensors, &binary_sensors] {
        for entity in platform.entities() {
            let value = entity
                .native_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "{:<14} {:<32} {:<40} {} {}",
                platform.name(),
                entity.unique_id(),
                entity.name(),
                value,
                entity.unit_of_measurement().unwrap_or("")
            );
        }
    }

    host.unload_entry(DOMAIN, &entry.unique_id);
    Ok(())
}
