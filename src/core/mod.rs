//! Core ledger logic
//!
//! This module contains the banking components:
//! - `bank` - The account and customer aggregate, including the transfer protocol
//! - `engine` - Applies operation records to a bank
//! - `async` - Shared ledger and concurrent session replay

pub mod r#async;
pub mod bank;
pub mod engine;

pub use bank::{Bank, TransferPolicy};
pub use engine::LedgerEngine;
pub use r#async::{SessionRunner, SessionTally, SharedLedger};
