//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account sum type, type tags and handles
//! - `customer`: Customer records and id validation
//! - `operation`: Operation records and outcomes
//! - `error`: Error types for the ledger

pub mod account;
pub mod customer;
pub mod error;
pub mod operation;

pub use account::{Account, AccountHandle, AccountKind, AccountRecord, AccountType};
pub use customer::{is_valid_id, validate_id, Customer};
pub use error::BankError;
pub use operation::{
    LimitChange, OperationOutcome, OperationRecord, OperationType, TransferReceipt,
    WithdrawalOutcome,
};
