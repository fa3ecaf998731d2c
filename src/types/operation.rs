//! Operation records and their outcomes
//!
//! Session scripts are parsed into [`OperationRecord`]s which the engine
//! applies to the bank. Every successful operation yields an
//! [`OperationOutcome`] describing the resulting state, so callers can
//! report it however they like.

use super::account::AccountHandle;
use rust_decimal::Decimal;
use std::fmt;

/// Operation types accepted in session scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Credit funds to an account
    Deposit,

    /// Debit funds according to the account's withdrawal policy
    Withdraw,

    /// Move funds between two accounts
    Transfer,

    /// Credit one period of interest to a savings account
    Interest,

    /// Replace a checking account's overdraft limit
    Overdraft,
}

/// A single ledger operation, addressed by account handles
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRecord {
    Deposit {
        account: AccountHandle,
        amount: Decimal,
    },
    Withdraw {
        account: AccountHandle,
        amount: Decimal,
    },
    Transfer {
        from: AccountHandle,
        to: AccountHandle,
        amount: Decimal,
    },
    ApplyInterest {
        account: AccountHandle,
    },
    SetOverdraftLimit {
        account: AccountHandle,
        limit: Decimal,
    },
}

impl OperationRecord {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationRecord::Deposit { .. } => OperationType::Deposit,
            OperationRecord::Withdraw { .. } => OperationType::Withdraw,
            OperationRecord::Transfer { .. } => OperationType::Transfer,
            OperationRecord::ApplyInterest { .. } => OperationType::Interest,
            OperationRecord::SetOverdraftLimit { .. } => OperationType::Overdraft,
        }
    }
}

/// Result of a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WithdrawalOutcome {
    /// Balance stayed at or above zero
    Completed { balance: Decimal },

    /// Checking withdrawal left the balance negative
    ///
    /// Informational only; the withdrawal went through.
    OverdraftEngaged {
        balance: Decimal,
        overdrawn_by: Decimal,
    },
}

impl WithdrawalOutcome {
    pub fn balance(&self) -> Decimal {
        match *self {
            WithdrawalOutcome::Completed { balance } => balance,
            WithdrawalOutcome::OverdraftEngaged { balance, .. } => balance,
        }
    }

    pub fn is_overdraft(&self) -> bool {
        matches!(self, WithdrawalOutcome::OverdraftEngaged { .. })
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub from: AccountHandle,
    pub to: AccountHandle,
    pub amount: Decimal,
    /// Source balance after the transfer
    pub from_balance: Decimal,
    /// Destination balance after the transfer
    pub to_balance: Decimal,
    /// Set when the source withdrawal went into overdraft
    pub overdrawn_by: Option<Decimal>,
}

/// Result of replacing a checking account's overdraft limit
#[derive(Debug, Clone, PartialEq)]
pub struct LimitChange {
    pub previous: Decimal,
    pub current: Decimal,
    pub balance: Decimal,
    /// The balance is already below `-current`
    pub exceeds_limit: bool,
}

/// What an applied operation did
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Deposited {
        account: AccountHandle,
        amount: Decimal,
        balance: Decimal,
    },
    Withdrawn {
        account: AccountHandle,
        amount: Decimal,
        outcome: WithdrawalOutcome,
    },
    Transferred(TransferReceipt),
    InterestApplied {
        account: AccountHandle,
        interest: Decimal,
        balance: Decimal,
    },
    OverdraftLimitChanged {
        account: AccountHandle,
        change: LimitChange,
    },
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationOutcome::Deposited {
                account,
                amount,
                balance,
            } => write!(f, "Deposit of {} to {} completed, balance {}", amount, account, balance),
            OperationOutcome::Withdrawn {
                account,
                amount,
                outcome,
            } => match outcome {
                WithdrawalOutcome::Completed { balance } => write!(
                    f,
                    "Withdrawal of {} from {} completed, balance {}",
                    amount, account, balance
                ),
                WithdrawalOutcome::OverdraftEngaged { overdrawn_by, .. } => write!(
                    f,
                    "Withdrawal of {} from {} completed, account overdrawn by {}",
                    amount, account, overdrawn_by
                ),
            },
            OperationOutcome::Transferred(receipt) => write!(
                f,
                "Transfer of {} from {} to {} completed",
                receipt.amount, receipt.from, receipt.to
            ),
            OperationOutcome::InterestApplied {
                account,
                interest,
                balance,
            } => write!(
                f,
                "Interest of {} applied to {}, balance {}",
                interest, account, balance
            ),
            OperationOutcome::OverdraftLimitChanged { account, change } => write!(
                f,
                "Overdraft limit of {} updated to {}",
                account, change.current
            ),
        }
    }
}
