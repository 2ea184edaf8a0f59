//! # rdns-cache
//!
//! Reverse-DNS cache with a SQLite work queue and a readiness-gated
//! dispatcher. Each subcommand runs one role; `run` runs all of them.

mod bootstrap;
mod di;

use clap::{Parser, Subcommand};
use rdns_cache_application::use_cases::ExportSnapshotUseCase;
use rdns_cache_domain::CliOverrides;
use rdns_cache_jobs::{write_snapshot_file, JobRunner};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::{info, warn};

use bootstrap::{connect_bus, init_database, init_logging, load_config, shutdown_token};
use di::{Jobs, Services};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "rdns-cache")]
#[command(version)]
#[command(about = "Reverse-DNS resolution cache with a durable work queue")]
struct Cli {
    /// Path to configuration file (default: ./rdns-cache.toml if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// SQLite database path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Message bus host
    #[arg(long, global = true)]
    bus_host: Option<String>,

    /// Message bus port
    #[arg(long, global = true)]
    bus_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every role in this process
    Run,
    /// Drain the queue onto the request topic, and ingest published addresses
    Dispatcher,
    /// Resolve request batches and signal readiness
    Worker,
    /// Periodic snapshot export and cache eviction
    Scheduler,
    /// Append addresses to the work queue
    Enqueue {
        #[arg(required = true)]
        addresses: Vec<IpAddr>,
    },
    /// Print the cache as JSON
    Snapshot {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    fn is_single_role(&self) -> bool {
        matches!(self, Command::Dispatcher | Command::Worker | Command::Scheduler)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        database_path: cli.database.clone(),
        bus_host: cli.bus_host.clone(),
        bus_port: cli.bus_port,
        log_level: cli.log_level.clone(),
    };
    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config, cli.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting rdns-cache");

    let pool = init_database(&config.database).await?;
    let services = Services::new(&config, pool.clone())?;

    match cli.command {
        Command::Enqueue { addresses } => {
            for ip in addresses {
                let id = services.queue.enqueue(ip).await?;
                info!(ip = %ip, id, "Enqueued");
            }
        }
        Command::Snapshot { output } => {
            let json = ExportSnapshotUseCase::new(services.engine.clone())
                .execute()
                .await?;
            match output {
                Some(path) => {
                    write_snapshot_file(&path, &json).await?;
                    info!(path = %path.display(), "Snapshot written");
                }
                None => println!("{}", json),
            }
        }
        ref command => {
            let shutdown = shutdown_token();
            let bus = connect_bus(&config.bus, command.is_single_role()).await?;
            let jobs = Jobs::new(&config, &services, bus, shutdown.clone());

            let runner = match command {
                Command::Dispatcher => JobRunner::new()
                    .with_ingest(jobs.ingest())
                    .with_dispatcher(jobs.dispatcher()),
                Command::Worker => JobRunner::new().with_worker(jobs.worker()),
                Command::Scheduler => JobRunner::new()
                    .with_snapshot(jobs.snapshot())
                    .with_eviction(jobs.eviction()),
                _ => JobRunner::new()
                    .with_ingest(jobs.ingest())
                    .with_worker(jobs.worker())
                    .with_dispatcher(jobs.dispatcher())
                    .with_snapshot(jobs.snapshot())
                    .with_eviction(jobs.eviction()),
            };

            let handles = runner.start().await?;
            info!("Ready. Press Ctrl+C to stop");

            shutdown.cancelled().await;
            for result in futures::future::join_all(handles).await {
                if let Err(e) = result {
                    warn!(error = %e, "Task ended abnormally");
                }
            }
        }
    }

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}
