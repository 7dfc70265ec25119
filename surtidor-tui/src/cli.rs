use std::path::PathBuf;

use clap::{Parser, Subcommand};
use surtidor_provider_minetur::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(name = "surtidor")]
#[command(about = "Browse Spanish fuel station prices by province, municipality and fuel type")]
pub(crate) struct Cli {
    /// Base URL of the fuel-price REST service.
    #[arg(long, env = "SURTIDOR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "SURTIDOR_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,

    /// User agent sent with every request.
    #[arg(long, env = "SURTIDOR_USER_AGENT", default_value = "surtidor/0.1")]
    pub user_agent: String,

    /// Write logs to this file (the interactive UI logs nowhere otherwise).
    #[arg(long, env = "SURTIDOR_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Non-interactive listings; without a subcommand the terminal UI starts.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List provinces.
    Provinces,
    /// List the municipalities of a province.
    Municipalities {
        /// Province identifier.
        #[arg(long)]
        province: String,
    },
    /// List fuel types.
    FuelTypes,
    /// List stations of a municipality that sell a fuel type.
    Stations {
        /// Province identifier.
        #[arg(long)]
        province: String,
        /// Municipality identifier.
        #[arg(long)]
        municipality: String,
        /// Fuel type identifier.
        #[arg(long)]
        fuel_type: String,
        /// Only stations open right now.
        #[arg(long)]
        open_now: bool,
    },
}
