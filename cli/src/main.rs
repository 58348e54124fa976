//! stakerdb: operator tool for inspecting a staking transaction ledger.
//!
//! Every subcommand is read-only and prints JSON on stdout. Logs go to
//! stderr.

mod commands;
mod config;
mod view;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use staker_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use staker_utils::LogFormat;

use crate::commands::PageRequest;
use crate::config::StakerDbConfig;

#[derive(Parser)]
#[command(name = "stakerdb", about = "Inspect a staking transaction ledger")]
struct Cli {
    /// Path to a TOML configuration file. Flags and env vars override it.
    #[arg(long, env = "STAKERDB_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the LMDB environment.
    #[arg(long, env = "STAKERDB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "STAKERDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "STAKERDB_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone, Copy)]
struct PageArgs {
    /// Number of records to skip.
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Maximum number of records to print.
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Page from the newest record backwards.
    #[arg(long)]
    reversed: bool,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            offset: args.offset,
            limit: args.limit,
            reversed: args.reversed,
        }
    }
}

#[derive(clap::Subcommand)]
enum Command {
    /// List tracked transactions in insertion order.
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List transactions whose timelock has expired.
    Withdrawable {
        /// Current best Bitcoin block height.
        #[arg(long)]
        best_height: u32,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one transaction by staking txid.
    Get { txid: String },
    /// Whether an outpoint (`<txid>:<vout>`) is spent by a tracked transaction.
    OutpointUsed { outpoint: String },
    /// Number of tracked transactions.
    Count,
    /// Cross-check the ledger databases.
    Check,
}

fn load_config(cli: &Cli) -> anyhow::Result<StakerDbConfig> {
    let mut config = match &cli.config {
        Some(path) => StakerDbConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StakerDbConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    staker_utils::init_logging(config.log_format, &config.log_level)?;

    let data_dir = &config.data_dir;
    check_data_dir(data_dir)?;
    if !data_dir.join("data.mdb").exists() {
        anyhow::bail!("no ledger found at {}", data_dir.display());
    }

    let env = LmdbEnvironment::open(data_dir, &config.lmdb)
        .with_context(|| format!("opening ledger at {}", data_dir.display()))?;
    let store = env.tracked_transaction_store();
    let limits = &config.paging;

    match cli.command {
        Command::List { page } => print_json(&commands::list(&store, limits, page.into())?),
        Command::Withdrawable { best_height, page } => print_json(&commands::withdrawable(
            &store,
            limits,
            page.into(),
            best_height,
        )?),
        Command::Get { txid } => print_json(&commands::get(&store, &txid)?),
        Command::OutpointUsed { outpoint } => {
            print_json(&commands::outpoint_used(&store, &outpoint)?)
        }
        Command::Count => print_json(&commands::count(&store)?),
        Command::Check => {
            let report = check_integrity(&env)?;
            print_json(&report)?;
            if !report.is_healthy() {
                anyhow::bail!("ledger integrity check found {} errors", report.errors.len());
            }
            Ok(())
        }
    }
}
