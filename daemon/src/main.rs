//! cryptobook: command-line front end for the token ledger.

mod commands;
mod config;
mod host;

use std::path::PathBuf;

use clap::Parser;
use cryptobook_types::{AccountName, Asset, Symbol, SymbolCode};
use cryptobook_utils::LogFormat;

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "cryptobook", about = "Fungible token ledger with staking")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "CRYPTOBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "CRYPTOBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// The ledger's own account (the only one allowed to create tokens).
    #[arg(long, env = "CRYPTOBOOK_CONTRACT")]
    contract: Option<AccountName>,

    /// Additional known accounts (comma-separated), added to the config list.
    #[arg(long = "account", env = "CRYPTOBOOK_ACCOUNTS", value_delimiter = ',')]
    accounts: Vec<AccountName>,

    /// Log level or filter directive, e.g. "info" or "cryptobook_ledger=debug".
    #[arg(long, env = "CRYPTOBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format: "human" or "json".
    #[arg(long, env = "CRYPTOBOOK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Identity that signs the action. Repeatable. Defaults to the
    /// action's natural actor.
    #[arg(long = "signer")]
    signers: Vec<AccountName>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Register a new token with zero supply.
    Create {
        #[arg(long)]
        issuer: AccountName,
        /// e.g. "1000000.0000 CRW"; the precision is taken from the digits.
        #[arg(long)]
        max_supply: Asset,
    },
    /// Mint new units and deliver them to an account.
    Issue {
        #[arg(long)]
        to: AccountName,
        #[arg(long)]
        quantity: Asset,
        #[arg(long, default_value = "")]
        memo: String,
    },
    /// Move units between two accounts.
    Transfer {
        #[arg(long)]
        from: AccountName,
        #[arg(long)]
        to: AccountName,
        #[arg(long)]
        quantity: Asset,
        #[arg(long, default_value = "")]
        memo: String,
    },
    /// Raise the locked amount of an existing stake.
    Stake {
        #[arg(long)]
        owner: AccountName,
        #[arg(long)]
        quantity: Asset,
    },
    /// Lower the locked amount of a stake.
    Unstake {
        #[arg(long)]
        owner: AccountName,
        #[arg(long)]
        quantity: Asset,
    },
    /// Apply a JSON-lines file of signed actions in order.
    Push { file: PathBuf },
    /// Write a zero stake row so the owner can start staking.
    OpenStake {
        #[arg(long)]
        owner: AccountName,
        /// Full symbol, e.g. "4,CRW".
        #[arg(long)]
        symbol: Symbol,
    },
    /// Print registry rows as JSON.
    Stats {
        #[arg(long)]
        symbol: Option<SymbolCode>,
    },
    /// Print an account's balances as JSON.
    Balance {
        #[arg(long)]
        owner: AccountName,
        #[arg(long)]
        symbol: Option<SymbolCode>,
    },
    /// Print an account's locked stake as JSON.
    ShowStake {
        #[arg(long)]
        owner: AccountName,
        #[arg(long)]
        symbol: SymbolCode,
    },
    /// Print the snapshot hash and row counts.
    Snapshot {
        /// Print every row, not just the summary.
        #[arg(long)]
        full: bool,
    },
    /// Verify every stored row.
    Check,
}

impl Cli {
    /// File settings as the base, flags and env vars on top.
    fn resolve_config(&self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(contract) = self.contract {
            config.contract = contract;
        }
        config.accounts.extend(self.accounts.iter().copied());
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    cryptobook_utils::init_tracing(&config.log_level, config.log_format);

    if let Some(path) = &cli.config {
        tracing::debug!("loaded config from {}", path.display());
    }

    let ledger = commands::open_ledger(&config)?;
    commands::run(&ledger, &cli.signers, cli.command)
}
