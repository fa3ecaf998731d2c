//! Error types for the toy bank ledger
//!
//! This module defines all error types that can occur while operating on
//! accounts, loading record files, or replaying session scripts.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Parsing Errors**: Malformed record lines or session rows
//! - **Ledger Errors**: Invalid amounts, insufficient funds, unknown accounts, etc.
//!
//! Every ledger error is recoverable: the rejected operation leaves all
//! balances untouched and the caller decides how to report it.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Each variant carries enough context to print a useful diagnostic
/// without the caller having to keep the original request around.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Deposit, withdrawal or transfer amount was zero or negative
    #[error("Invalid amount {amount}: amount must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Withdrawal or transfer exceeds what the source account allows
    ///
    /// `available` is the figure the check was made against: the plain
    /// balance, or balance plus overdraft limit for checking withdrawals.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Funds the check allowed
        available: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// An account handle does not resolve to an account in the bank
    #[error("Invalid account reference: no account at index {index}")]
    InvalidAccountReference {
        /// The unresolved index
        index: usize,
    },

    /// Account factory received a tag outside 1..=3
    #[error("Unknown account type: {tag}")]
    UnknownAccountType {
        /// The unrecognized tag
        tag: u8,
    },

    /// Customer id is not exactly nine decimal digits
    #[error("Malformed customer id '{id}': expected 9 digits")]
    MalformedIdentifier {
        /// The rejected id
        id: String,
    },

    /// Variant-specific operation invoked on the wrong account type
    #[error("{operation} is not supported by {account_type} accounts")]
    UnsupportedOperation {
        /// Operation that was attempted
        operation: String,
        /// Label of the account type it was attempted on
        account_type: String,
    },

    /// Account parameter out of range (negative rate, negative limit, bad opening balance)
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Offending value
        value: Decimal,
    },

    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents the session from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Record or session row could not be parsed
    ///
    /// Recoverable: the line is skipped and loading continues.
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Saving would drop lines that could not be loaded
    #[error("Refusing to save '{path}': {skipped} unreadable line(s) would be lost")]
    SaveRefused {
        /// Record file that would be overwritten
        path: String,
        /// Lines skipped when the file was loaded
        skipped: usize,
    },

    /// A concurrent session task could not be completed
    #[error("Session failed: {message}")]
    SessionFailed {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        BankError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(available: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            available,
            requested,
        }
    }

    /// Create an InvalidAccountReference error
    pub fn invalid_account(index: usize) -> Self {
        BankError::InvalidAccountReference { index }
    }

    /// Create an UnknownAccountType error
    pub fn unknown_account_type(tag: u8) -> Self {
        BankError::UnknownAccountType { tag }
    }

    /// Create a MalformedIdentifier error
    pub fn malformed_identifier(id: &str) -> Self {
        BankError::MalformedIdentifier { id: id.to_string() }
    }

    /// Create an UnsupportedOperation error
    pub fn unsupported(operation: &str, account_type: &str) -> Self {
        BankError::UnsupportedOperation {
            operation: operation.to_string(),
            account_type: account_type.to_string(),
        }
    }

    /// Create an InvalidParameter error
    pub fn invalid_parameter(name: &str, value: Decimal) -> Self {
        BankError::InvalidParameter {
            name: name.to_string(),
            value,
        }
    }

    /// Map a failure to open `path` to FileNotFound or IoError
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => BankError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => BankError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        BankError::ParseError {
            line,
            message: message.into(),
        }
    }
}
