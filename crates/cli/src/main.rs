//! Entity Time CLI - build and inspect jabber:iq:time payloads

mod config;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, DEFAULT_LOG_FILTER, ENV_DEFAULT_TZ};
use entity_time_core::application::{EntityTimeService, RemoteTime};
use entity_time_core::port::SystemTimeProvider;
use entity_time_core::{TimePayload, Zone};

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Parser)]
#[command(name = "entity-time")]
#[command(about = "Entity time (jabber:iq:time) payload tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Default zone used for conversions (IANA name, UTC, or +HH:MM)
    #[arg(long, global = true, env = ENV_DEFAULT_TZ)]
    default_tz: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a time request with the current local time
    Now {
        /// Zone to report instead of the default zone
        #[arg(long)]
        tz: Option<String>,

        /// Print the payload as JSON instead of XML
        #[arg(long)]
        json: bool,
    },

    /// Build a payload for an explicit local time
    At {
        /// Local wall-clock time, e.g. 2024-01-15T10:30:00
        instant: String,

        /// Zone the local time is expressed in
        #[arg(long)]
        tz: String,

        /// Print the payload as JSON instead of XML
        #[arg(long)]
        json: bool,
    },

    /// Decode a received <query xmlns="jabber:iq:time"> fragment
    Decode {
        /// XML fragment
        xml: String,

        /// Print the interpretation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct FieldRow {
    field: &'static str,
    value: String,
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_payload(payload: &TimePayload, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(payload).context("Failed to encode payload as JSON")?
        );
    } else {
        println!("{}", payload.to_xml());
    }
    Ok(())
}

fn print_remote(payload: &TimePayload, remote: &RemoteTime, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(remote).context("Failed to encode result as JSON")?
        );
        return Ok(());
    }

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let rows = vec![
        FieldRow {
            field: "utc",
            value: show(payload.utc().map(str::to_string)),
        },
        FieldRow {
            field: "tz",
            value: show(payload.tz().map(str::to_string)),
        },
        FieldRow {
            field: "display",
            value: show(remote.display.clone()),
        },
        FieldRow {
            field: "local time",
            value: show(remote.local_instant.map(|t| t.to_string())),
        },
        FieldRow {
            field: "peer local time",
            value: show(remote.peer_local.map(|t| t.to_string())),
        },
    ];
    println!("{}", Table::new(rows));
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let provider = Arc::new(SystemTimeProvider::new(config.default_zone));
    let service = EntityTimeService::new(provider);

    match cli.command {
        Commands::Now { tz, json } => {
            let payload = match tz {
                Some(id) => {
                    let zone = Zone::parse(&id).with_context(|| format!("Invalid zone '{id}'"))?;
                    TimePayload::now(&SystemTimeProvider::new(zone))
                }
                None => service.respond(),
            };
            print_payload(&payload, json)
        }
        Commands::At { instant, tz, json } => {
            let instant = NaiveDateTime::parse_from_str(&instant, INSTANT_FORMAT)
                .with_context(|| format!("Invalid local time '{instant}', expected {INSTANT_FORMAT}"))?;
            let payload = service
                .payload_at(instant, &tz)
                .with_context(|| format!("Invalid zone '{tz}'"))?;
            print_payload(&payload, json)
        }
        Commands::Decode { xml, json } => {
            let payload = entity_time_core::codec::decode(&xml).context("Failed to decode fragment")?;
            let remote = service.interpret(&payload);
            print_remote(&payload, &remote, json)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // 1. Load configuration, then initialize logging
    let config = Config::load(cli.default_tz.as_deref());
    init_logging(&config);
    for warning in &config.warnings {
        warn!("{}", warning);
    }
    debug!(default_zone = %config.default_zone, "Configuration loaded");

    // 2. Run the command
    if let Err(e) = run(cli, config) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
