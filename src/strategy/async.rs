//! Asynchronous session strategy
//!
//! Replays several session scripts at the same time on a tokio
//! multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncSessionStrategy
//!     ├── SessionConfig (max_concurrent_sessions, batch_size)
//!     ├── AsyncReader (one per session file)
//!     └── SessionRunner (one task per session)
//!         └── SharedLedger (single lock around the engine)
//! ```
//!
//! # Ordering
//!
//! Records of one session are applied in script order. Records of
//! different sessions interleave in lock acquisition order, so balances
//! after a run depend on scheduling whenever sessions touch the same
//! accounts. Every transfer is still atomic with respect to all sessions.

use crate::core::{Bank, SessionRunner, SharedLedger};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{SessionStrategy, SessionSummary};
use crate::types::BankError;
use std::path::PathBuf;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Rows read from a session file per await point
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Configuration for concurrent session replay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Worker threads in the runtime
    pub max_concurrent_sessions: usize,
    /// Rows read from a session file per await point
    pub batch_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionConfig {
    /// Create a SessionConfig, replacing zero values with defaults
    pub fn new(max_concurrent_sessions: usize, batch_size: usize) -> Self {
        let default = Self::default();

        let max_concurrent_sessions = if max_concurrent_sessions == 0 {
            tracing::warn!(
                default = default.max_concurrent_sessions,
                "invalid max_concurrent_sessions (0), using default"
            );
            default.max_concurrent_sessions
        } else {
            max_concurrent_sessions
        };

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "invalid batch_size (0), using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        Self {
            max_concurrent_sessions,
            batch_size,
        }
    }
}

/// Asynchronous session strategy
///
/// Builds its own runtime per run, so it must not be called from inside
/// another tokio runtime.
#[derive(Debug, Clone)]
pub struct AsyncSessionStrategy {
    config: SessionConfig,
}

impl AsyncSessionStrategy {
    /// Create a new AsyncSessionStrategy with the specified configuration
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// The configuration this strategy runs with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl SessionStrategy for AsyncSessionStrategy {
    fn run(&self, bank: Bank, sessions: &[PathBuf]) -> Result<SessionSummary, BankError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_sessions)
            .build()
            .map_err(|e| BankError::SessionFailed {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let mut readers = Vec::with_capacity(sessions.len());
            for path in sessions {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| BankError::open_failed(path, e))?;
                readers.push((path.display().to_string(), AsyncReader::new(file.compat())));
            }

            let ledger = SharedLedger::new(bank);
            let runner = SessionRunner::new(ledger.clone(), self.config.batch_size);
            let tallies = runner.run_all(readers).await?;

            Ok(SessionSummary {
                bank: ledger.snapshot().await,
                tallies,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary session script
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn bank() -> Bank {
        let mut bank = Bank::new();
        bank.add_account(Account::business(dec!(1000)).unwrap());
        bank.add_account(Account::business(dec!(1000)).unwrap());
        bank.add_account(Account::checking(dec!(0), dec!(100)).unwrap());
        bank
    }

    #[rstest]
    #[case::defaults(SessionConfig::new(0, 0), SessionConfig::default())]
    #[case::custom(
        SessionConfig::new(3, 7),
        SessionConfig { max_concurrent_sessions: 3, batch_size: 7 }
    )]
    fn test_session_config(#[case] config: SessionConfig, #[case] expected: SessionConfig) {
        assert_eq!(config, expected);
    }

    #[test]
    fn test_async_strategy_keeps_order_within_a_session() {
        // A small batch size forces the script across several reads
        let file = create_temp_csv(
            "type,account,target,amount\n\
             withdraw,2,,100\n\
             overdraft,2,,300\n\
             withdraw,2,,150\n\
             deposit,2,,50\n",
        );

        let strategy = AsyncSessionStrategy::new(SessionConfig::new(2, 1));
        let summary = strategy.run(bank(), &[file.path().to_path_buf()]).unwrap();

        assert_eq!(summary.bank.accounts()[2].balance(), dec!(-200));
        assert_eq!(summary.applied(), 4);
    }

    #[test]
    fn test_async_strategy_conserves_money_across_sessions() {
        let forward = create_temp_csv(&format!(
            "type,account,target,amount\n{}",
            "transfer,0,1,10\n".repeat(50)
        ));
        let backward = create_temp_csv(&format!(
            "type,account,target,amount\n{}",
            "transfer,1,0,10\n".repeat(50)
        ));

        let strategy = AsyncSessionStrategy::new(SessionConfig::new(4, 8));
        let summary = strategy
            .run(
                bank(),
                &[forward.path().to_path_buf(), backward.path().to_path_buf()],
            )
            .unwrap();

        let total: Decimal = summary.bank.accounts().iter().map(Account::balance).sum();
        assert_eq!(total, dec!(2000));
        assert_eq!(summary.applied(), 100);
        assert_eq!(summary.bank.accounts()[0].balance(), dec!(1000));
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncSessionStrategy::new(SessionConfig::default());

        let result = strategy.run(bank(), &[Path::new("nonexistent.csv").to_path_buf()]);

        assert!(matches!(result, Err(BankError::FileNotFound { .. })));
    }
}
