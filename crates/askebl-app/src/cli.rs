//! CLI argument definitions for the AskEBL application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// AskEBL - a rule-based banking assistant with loan and currency calculators.
#[derive(Parser, Debug)]
#[command(name = "askebl", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory for the SQLite knowledge store.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// TOML file overriding the builtin catalogs and entries.
    #[arg(short = 'k', long = "knowledge")]
    pub knowledge: Option<PathBuf>,

    /// Run without the knowledge store; suggestions are kept in memory.
    #[arg(long = "no-store")]
    pub no_store: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Chat with the assistant (default).
    Chat,
    /// Calculate the monthly installment for a loan.
    Emi {
        /// Loan amount in BDT.
        #[arg(long)]
        principal: f64,
        /// Tenure in years.
        #[arg(long)]
        years: u32,
        /// Annual interest rate in percent; defaults to the product's rate.
        #[arg(long)]
        rate: Option<f64>,
        /// Loan product: personal, home, car, education.
        #[arg(long)]
        product: Option<String>,
    },
    /// Convert a foreign currency amount to BDT.
    Convert {
        amount: f64,
        /// ISO currency code, e.g. USD.
        currency: String,
    },
    /// Insert the demo FAQ and popular questions into an empty store.
    Seed,
    /// List recently suggested questions.
    Suggestions {
        #[arg(short = 'n', long = "limit", default_value_t = 20)]
        limit: u64,
    },
    /// List active popular questions, or switch one on or off by id.
    Popular {
        #[arg(long, value_name = "ID", conflicts_with = "deactivate")]
        activate: Option<Uuid>,
        #[arg(long, value_name = "ID")]
        deactivate: Option<Uuid>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ASKEBL_CONFIG env var > ~/.askebl/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ASKEBL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory override, if any.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level override, if any.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Chat)
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".askebl").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".askebl").join("config.toml");
    }
    PathBuf::from("config.toml")
}
