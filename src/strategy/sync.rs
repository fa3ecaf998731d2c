//! Synchronous session strategy
//!
//! Replays session scripts one after another on the calling thread. Each
//! script is streamed through a `SessionReader` and applied by a single
//! `LedgerEngine`, so the result is fully determined by the order of the
//! session paths.
//!
//! # Memory Efficiency
//!
//! Records are read and applied one at a time; memory use is
//! O(accounts + customers), not O(records).

use crate::core::{Bank, LedgerEngine, SessionTally};
use crate::io::sync_reader::SessionReader;
use crate::strategy::{SessionStrategy, SessionSummary};
use crate::types::BankError;
use std::path::PathBuf;

/// Synchronous session strategy
///
/// # Examples
///
/// ```no_run
/// use toy_bank_ledger::core::Bank;
/// use toy_bank_ledger::strategy::{SessionStrategy, SyncSessionStrategy};
/// use std::path::PathBuf;
///
/// let summary = SyncSessionStrategy
///     .run(Bank::new(), &[PathBuf::from("session.csv")])
///     .expect("Replay failed");
/// println!("{} applied, {} rejected", summary.applied(), summary.rejected());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncSessionStrategy;

impl SessionStrategy for SyncSessionStrategy {
    fn run(&self, bank: Bank, sessions: &[PathBuf]) -> Result<SessionSummary, BankError> {
        let readers = sessions
            .iter()
            .map(|path| SessionReader::new(path).map(|r| (path.display().to_string(), r)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut engine = LedgerEngine::new(bank);
        let mut tallies = Vec::with_capacity(readers.len());

        for (session, reader) in readers {
            let mut tally = SessionTally {
                session,
                ..SessionTally::default()
            };

            for result in reader {
                match result {
                    // The engine logs its own rejections
                    Ok(record) => match engine.process(record) {
                        Ok(_) => tally.applied += 1,
                        Err(_) => tally.rejected += 1,
                    },
                    Err(e) => {
                        tracing::warn!(session = %tally.session, error = %e, "skipping session row");
                        tally.rejected += 1;
                    }
                }
            }

            tracing::info!(
                session = %tally.session,
                applied = tally.applied,
                rejected = tally.rejected,
                "session finished"
            );
            tallies.push(tally);
        }

        Ok(SessionSummary {
            bank: engine.into_bank(),
            tallies,
        })
    }
}
