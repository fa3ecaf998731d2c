//! Concurrent access to the ledger
//!
//! This module lets several session scripts run at the same time against
//! one bank.
//!
//! # Architecture
//!
//! - **SharedLedger**: The engine behind a single async mutex
//! - **SessionRunner**: Spawns one task per session and tallies the results
//!
//! # Thread Safety
//!
//! Every operation, transfers included, runs while holding the one ledger
//! lock. A transfer's withdrawal and deposit are never observed apart.

pub mod session_runner;
pub mod shared_ledger;

pub use session_runner::{SessionRunner, SessionTally};
pub use shared_ledger::SharedLedger;
