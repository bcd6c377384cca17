//! # timetable_planner
//!
//! ```bash
//! # HTTP API on 127.0.0.1:8000 (or $PLANNER_ADDR)
//! timetable_planner serve --addr 0.0.0.0:8000
//!
//! # One-off run from a request file
//! timetable_planner generate --input request.json
//! timetable_planner generate --input request.json --report
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::debug;
use thiserror::Error;

use timetable_planner::config::{ServerConfig, DEFAULT_LISTEN_ADDR, DEFAULT_LOG_FILTER};
use timetable_planner::report::{class_timetables, Report};
use timetable_planner::request::{PlanningRequest, PlanningResponse};
use timetable_planner::{server, ScheduleError};

#[derive(Parser, Debug)]
#[command(name = "timetable_planner")]
#[command(author, version, about = "Greedy weekly course timetable planner", long_about = None)]
struct Cli {
    /// Log filter, overrides RUST_LOG (e.g. `debug`, `timetable_planner=trace`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "PLANNER_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
        addr: SocketAddr,
        /// Disable permissive CORS headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Plan a single request read from a JSON file
    Generate {
        #[arg(long, short)]
        input: PathBuf,
        /// Print the text report and class grids instead of JSON
        #[arg(long)]
        report: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid request: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("server error: {0}")]
    Server(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = match &cli.log_level {
        Some(filter) => {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(filter);
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)),
    };
    logger.init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve { addr, no_cors } => {
            let config = ServerConfig {
                enable_cors: !no_cors,
                ..ServerConfig::new(addr)
            };
            server::run_server(config).await.map_err(CliError::Server)
        }
        Commands::Generate { input, report } => {
            let raw = std::fs::read_to_string(&input).map_err(|source| CliError::Read {
                path: input.clone(),
                source,
            })?;
            let request: PlanningRequest = serde_json::from_str(&raw)?;
            debug!("Loaded request from {}", input.display());

            let planning = request.execute()?;
            if report {
                println!("{}\n\n{}", Report(&planning), class_timetables(&planning));
            } else {
                let response = PlanningResponse::from(&planning);
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Ok(())
        }
    }
}
