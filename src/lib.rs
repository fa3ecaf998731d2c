//! Toy Bank Ledger Library
//! # Overview
//!
//! This library keeps an in-memory ledger of customers and accounts, loads
//! and saves them as whitespace-separated record files, and replays session
//! scripts of banking operations against them with either a sync or an
//! async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Customer, operations, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::bank`] - Account and customer aggregate, transfer protocol
//!   - [`core::engine`] - Applies operation records to a bank
//!   - [`core::async`] - Shared ledger and concurrent session replay
//! - [`io`] - Record files and session scripts
//! - [`strategy`] - Sync and async session replay
//!
//! # Account Types
//!
//! - **Savings**: Earns interest on demand; cannot be overdrawn
//! - **Checking**: May be overdrawn down to its overdraft limit
//! - **Business**: Plain balance, no interest and no overdraft
//!
//! # Operations
//!
//! - **Deposit**: Credit a positive amount
//! - **Withdraw**: Debit within the account's headroom
//! - **Transfer**: Withdraw from one account and deposit into another
//! - **Interest**: Credit `balance * rate` to a savings account
//! - **Overdraft**: Change a checking account's overdraft limit

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{Bank, LedgerEngine, SharedLedger, TransferPolicy};
pub use io::{write_accounts, write_customers};
pub use types::{
    Account, AccountHandle, AccountType, BankError, Customer, OperationOutcome, OperationRecord,
};
