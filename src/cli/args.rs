use crate::core::TransferPolicy;
use crate::strategy::SessionConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay banking sessions against account and customer record files
#[derive(Parser, Debug)]
#[command(name = "toy-bank")]
#[command(about = "Replay banking sessions against account and customer records", long_about = None)]
pub struct CliArgs {
    /// Customer record file (`name id` per line)
    #[arg(long = "customers", value_name = "PATH")]
    pub customers: Option<PathBuf>,

    /// Account record file (`tag balance [extra]` per line)
    #[arg(long = "accounts", value_name = "PATH")]
    pub accounts: PathBuf,

    /// Session scripts to replay, in order
    #[arg(
        long = "session",
        value_name = "PATH",
        help = "Session CSV to replay (may be given several times)"
    )]
    pub sessions: Vec<PathBuf>,

    /// Replay strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Replay strategy: 'sync' runs sessions in order, 'async' runs them concurrently"
    )]
    pub strategy: StrategyType,

    /// Worker threads for the async strategy
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Worker threads for the async strategy (default: CPU cores)"
    )]
    pub max_concurrent_sessions: Option<usize>,

    /// Rows read per await point (async strategy only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Session rows read per batch in async mode (default: 100)"
    )]
    pub batch_size: Option<usize>,

    /// Pre-check used by transfers
    #[arg(
        long = "transfer-policy",
        value_name = "POLICY",
        default_value = "legacy",
        help = "Transfer pre-check: 'legacy' compares the plain balance, 'overdraft-aware' includes the overdraft limit"
    )]
    pub transfer_policy: TransferPolicyArg,

    /// Write the final records back to the input files
    ///
    /// Refused when loading skipped any line of those files.
    #[arg(long = "save")]
    pub save: bool,
}

/// Available replay strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Transfer policy as spelled on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransferPolicyArg {
    Legacy,
    OverdraftAware,
}

impl From<TransferPolicyArg> for TransferPolicy {
    fn from(arg: TransferPolicyArg) -> Self {
        match arg {
            TransferPolicyArg::Legacy => TransferPolicy::Legacy,
            TransferPolicyArg::OverdraftAware => TransferPolicy::OverdraftAware,
        }
    }
}

impl CliArgs {
    /// Build a SessionConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values are replaced by the
    /// defaults with a logged warning.
    pub fn to_session_config(&self) -> SessionConfig {
        if self.max_concurrent_sessions.is_none() && self.batch_size.is_none() {
            return SessionConfig::default();
        }

        let default = SessionConfig::default();
        SessionConfig::new(
            self.max_concurrent_sessions
                .unwrap_or(default.max_concurrent_sessions),
            self.batch_size.unwrap_or(default.batch_size),
        )
    }
}
