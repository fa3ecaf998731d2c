//! Concurrent session replay
//!
//! This module provides the `SessionRunner` struct, which replays several
//! session scripts at the same time against one `SharedLedger`.
//!
//! # Design
//!
//! Each session becomes its own tokio task. Inside a task the session's
//! records are applied strictly in script order; across tasks, records
//! interleave in whatever order the ledger lock is acquired.
//!
//! # Architecture
//!
//! ```text
//! SessionRunner
//!     ├── SharedLedger  (one lock around the whole engine)
//!     └── batch_size    (rows read per await point)
//! ```

use super::SharedLedger;
use crate::io::async_reader::AsyncReader;
use crate::types::BankError;
use futures::io::AsyncRead;

/// Counts for one replayed session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTally {
    /// Name the session was registered under (usually its path)
    pub session: String,

    /// Records applied successfully
    pub applied: usize,

    /// Records rejected by the ledger or skipped as malformed
    pub rejected: usize,
}

/// Replays session scripts concurrently against a shared ledger
#[derive(Debug, Clone)]
pub struct SessionRunner {
    ledger: SharedLedger,
    batch_size: usize,
}

impl SessionRunner {
    /// Create a runner over `ledger`, reading `batch_size` rows at a time
    pub fn new(ledger: SharedLedger, batch_size: usize) -> Self {
        Self {
            ledger,
            batch_size: batch_size.max(1),
        }
    }

    /// Replay one session to completion
    ///
    /// Records are applied in script order. Rejected records are counted
    /// and processing continues with the next one.
    pub async fn run_session<R>(&self, session: String, mut reader: AsyncReader<R>) -> SessionTally
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut tally = SessionTally {
            session,
            ..SessionTally::default()
        };

        loop {
            let batch = reader.read_batch(self.batch_size).await;
            if batch.is_empty() {
                break;
            }

            for record in batch {
                match self.ledger.process(record).await {
                    Ok(_) => tally.applied += 1,
                    Err(_) => tally.rejected += 1,
                }
            }
        }

        tally.rejected += reader.malformed();
        tracing::info!(
            session = %tally.session,
            applied = tally.applied,
            rejected = tally.rejected,
            "session finished"
        );
        tally
    }

    /// Replay every session concurrently, one task per session
    ///
    /// # Returns
    ///
    /// One tally per session, in the order the sessions were given.
    ///
    /// # Errors
    ///
    /// `SessionFailed` if a session task panicked or was cancelled.
    pub async fn run_all<R>(
        &self,
        sessions: Vec<(String, AsyncReader<R>)>,
    ) -> Result<Vec<SessionTally>, BankError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut tasks = Vec::with_capacity(sessions.len());
        for (name, reader) in sessions {
            let runner = self.clone();
            tasks.push(tokio::spawn(async move {
                runner.run_session(name, reader).await
            }));
        }

        let mut tallies = Vec::with_capacity(tasks.len());
        for task in tasks {
            let tally = task.await.map_err(|e| BankError::SessionFailed {
                message: e.to_string(),
            })?;
            tallies.push(tally);
        }

        Ok(tallies)
    }
}
