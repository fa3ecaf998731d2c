//! Session replay strategies
//!
//! This module defines the Strategy pattern for replaying session scripts
//! against a bank. Both strategies take ownership of a populated `Bank`,
//! apply every session to it, and hand back the final bank together with
//! per-session counts. Which one runs is chosen at runtime from the CLI.

use crate::cli::StrategyType;
use crate::core::{Bank, SessionTally};
use crate::types::BankError;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncSessionStrategy, SessionConfig};
pub use sync::SyncSessionStrategy;

/// Result of replaying a set of sessions
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Bank state after every session finished
    pub bank: Bank,

    /// One tally per session, in the order the sessions were given
    pub tallies: Vec<SessionTally>,
}

impl SessionSummary {
    /// Records applied across all sessions
    pub fn applied(&self) -> usize {
        self.tallies.iter().map(|t| t.applied).sum()
    }

    /// Records rejected or skipped across all sessions
    pub fn rejected(&self) -> usize {
        self.tallies.iter().map(|t| t.rejected).sum()
    }
}

/// Session replay strategy
///
/// Implementations differ only in scheduling. Records inside one session
/// are always applied in script order.
pub trait SessionStrategy: Send + Sync {
    /// Replay `sessions` against `bank`
    ///
    /// # Arguments
    ///
    /// * `bank` - Populated bank the sessions operate on
    /// * `sessions` - Paths of session scripts
    ///
    /// # Returns
    ///
    /// * `Ok(SessionSummary)` once every session has been replayed
    /// * `Err(BankError)` if a session file cannot be opened or a session
    ///   task fails
    ///
    /// # Errors
    ///
    /// All session files are opened before any record is applied, so a
    /// missing file leaves the bank untouched. Rejected records are logged
    /// and counted, never returned as errors.
    fn run(&self, bank: Bank, sessions: &[PathBuf]) -> Result<SessionSummary, BankError>;
}

/// Create a session strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Which scheduling to use (Sync or Async)
/// * `config` - Optional configuration for the async strategy (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<SessionConfig>,
) -> Box<dyn SessionStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncSessionStrategy),
        StrategyType::Async => Box::new(AsyncSessionStrategy::new(config.unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let summary = SessionSummary {
            bank: Bank::new(),
            tallies: vec![
                SessionTally {
                    session: "a".to_string(),
                    applied: 3,
                    rejected: 1,
                },
                SessionTally {
                    session: "b".to_string(),
                    applied: 2,
                    rejected: 0,
                },
            ],
        };

        assert_eq!(summary.applied(), 5);
        assert_eq!(summary.rejected(), 1);
    }

    #[test]
    fn test_create_strategy_runs_with_no_sessions() {
        for strategy_type in [StrategyType::Sync, StrategyType::Async] {
            let strategy = create_strategy(strategy_type, Some(SessionConfig::new(1, 1)));
            let summary = strategy.run(Bank::new(), &[]).unwrap();
            assert!(summary.tallies.is_empty());
            assert_eq!(summary.bank.account_count(), 0);
        }
    }
}
