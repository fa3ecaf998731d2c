//! Ledger operation engine
//!
//! This module provides the LedgerEngine that applies operation records
//! from session scripts to a Bank.
//!
//! The engine is a thin routing layer: every business rule lives on
//! `Bank` and `Account`. What the engine adds is a uniform
//! `OperationRecord -> OperationOutcome` entry point and the tracing of
//! each applied or rejected operation.

use crate::core::bank::Bank;
use crate::types::{BankError, OperationOutcome, OperationRecord};

/// Operation processing engine
///
/// Owns the bank for the duration of a session and applies records to it
/// one at a time.
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine {
    bank: Bank,
}

impl LedgerEngine {
    /// Create an engine over an already populated bank
    pub fn new(bank: Bank) -> Self {
        LedgerEngine { bank }
    }

    /// Apply a single operation record
    ///
    /// Routes the record to the matching `Bank` operation. A rejected
    /// record leaves every balance unchanged.
    ///
    /// # Arguments
    ///
    /// * `record` - The operation to apply
    ///
    /// # Returns
    ///
    /// * `Ok(OperationOutcome)` describing the new state
    /// * `Err(BankError)` if the operation was rejected
    pub fn process(&mut self, record: OperationRecord) -> Result<OperationOutcome, BankError> {
        let operation = record.operation_type();
        let result = self.apply(record);

        match &result {
            Ok(outcome) => tracing::info!(?operation, "{}", outcome),
            Err(e) => tracing::warn!(?operation, error = %e, "operation rejected"),
        }

        result
    }

    fn apply(&mut self, record: OperationRecord) -> Result<OperationOutcome, BankError> {
        match record {
            OperationRecord::Deposit { account, amount } => {
                let balance = self.bank.deposit(account, amount)?;
                Ok(OperationOutcome::Deposited {
                    account,
                    amount,
                    balance,
                })
            }
            OperationRecord::Withdraw { account, amount } => {
                let outcome = self.bank.withdraw(account, amount)?;
                Ok(OperationOutcome::Withdrawn {
                    account,
                    amount,
                    outcome,
                })
            }
            OperationRecord::Transfer { from, to, amount } => self
                .bank
                .transfer(from, to, amount)
                .map(OperationOutcome::Transferred),
            OperationRecord::ApplyInterest { account } => {
                let interest = self.bank.apply_interest(account)?;
                let balance = self
                    .bank
                    .get_account(account)
                    .map(|a| a.balance())
                    .ok_or_else(|| BankError::invalid_account(account.index()))?;
                Ok(OperationOutcome::InterestApplied {
                    account,
                    interest,
                    balance,
                })
            }
            OperationRecord::SetOverdraftLimit { account, limit } => {
                let change = self.bank.set_overdraft_limit(account, limit)?;
                if change.exceeds_limit {
                    tracing::warn!(
                        %account,
                        balance = %change.balance,
                        limit = %change.current,
                        "balance already below the new overdraft limit"
                    );
                }
                Ok(OperationOutcome::OverdraftLimitChanged { account, change })
            }
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Hand the bank back once the session is over
    pub fn into_bank(self) -> Bank {
        self.bank
    }
}
