//! Bank aggregate
//!
//! This module provides the `Bank` struct which owns every customer and
//! account for a session and implements the transfer protocol.
//!
//! The Bank is responsible for:
//! - Keeping customers and accounts in insertion order
//! - Resolving account handles (indices never move once assigned)
//! - Routing single-account operations to the right account
//! - Running transfers as a checked withdraw-then-deposit pair
//! - Writing the customer and account listings

use crate::types::{
    Account, AccountHandle, BankError, Customer, LimitChange, TransferReceipt, WithdrawalOutcome,
};
use rust_decimal::Decimal;
use std::io::Write;

/// How the transfer pre-check measures the source account's funds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferPolicy {
    /// Compare against the plain balance, ignoring checking overdraft headroom
    ///
    /// A checking source with overdraft room left can be refused here even
    /// though a direct withdrawal of the same amount would succeed. Kept as
    /// the default for compatibility with existing ledgers.
    #[default]
    Legacy,

    /// Compare against the source's withdrawal headroom
    ///
    /// Checking sources may transfer into their overdraft, matching what
    /// their own withdrawal policy allows.
    OverdraftAware,
}

/// Owner of all customers and accounts for a session
///
/// Accounts are addressed through [`AccountHandle`]s handed out by
/// [`Bank::add_account`]. Nothing is ever removed, so a handle stays valid
/// for the lifetime of the bank.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    /// Customers in insertion order
    customers: Vec<Customer>,

    /// Accounts in insertion order; the position is the handle
    accounts: Vec<Account>,

    /// Pre-check used by [`Bank::transfer`]
    transfer_policy: TransferPolicy,
}

impl Bank {
    /// Create an empty bank using the legacy transfer pre-check
    pub fn new() -> Self {
        Bank::default()
    }

    /// Create an empty bank with the given transfer pre-check
    pub fn with_transfer_policy(transfer_policy: TransferPolicy) -> Self {
        Bank {
            transfer_policy,
            ..Bank::default()
        }
    }

    pub fn transfer_policy(&self) -> TransferPolicy {
        self.transfer_policy
    }

    /// Append a customer
    ///
    /// Neither the id format nor its uniqueness is checked here.
    pub fn add_customer(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.customers.push(Customer::new(name, id));
    }

    /// Append an account and return its handle
    pub fn add_account(&mut self, account: Account) -> AccountHandle {
        self.accounts.push(account);
        AccountHandle::new(self.accounts.len() - 1)
    }

    /// Look up an account, `None` if the handle is out of range
    pub fn get_account(&self, handle: AccountHandle) -> Option<&Account> {
        self.accounts.get(handle.index())
    }

    fn account_mut(&mut self, handle: AccountHandle) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(handle.index())
            .ok_or_else(|| BankError::invalid_account(handle.index()))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Handles of all accounts, in insertion order
    pub fn handles(&self) -> impl Iterator<Item = AccountHandle> {
        (0..self.accounts.len()).map(AccountHandle::new)
    }

    /// Write one summary line per account, in insertion order
    pub fn show_accounts(&self, output: &mut dyn Write) -> Result<(), BankError> {
        for account in &self.accounts {
            writeln!(output, "{}", account)?;
        }
        Ok(())
    }

    /// Write one summary line per customer, in insertion order
    pub fn show_customers(&self, output: &mut dyn Write) -> Result<(), BankError> {
        for customer in &self.customers {
            writeln!(output, "{}", customer)?;
        }
        Ok(())
    }

    /// Deposit into the account behind `handle`
    ///
    /// # Errors
    ///
    /// - `InvalidAccountReference` if the handle does not resolve
    /// - `InvalidAmount` if `amount` is not positive
    pub fn deposit(&mut self, handle: AccountHandle, amount: Decimal) -> Result<Decimal, BankError> {
        self.account_mut(handle)?.deposit(amount)
    }

    /// Withdraw from the account behind `handle`
    ///
    /// # Errors
    ///
    /// - `InvalidAccountReference` if the handle does not resolve
    /// - `InvalidAmount` / `InsufficientFunds` from the account's policy
    pub fn withdraw(
        &mut self,
        handle: AccountHandle,
        amount: Decimal,
    ) -> Result<WithdrawalOutcome, BankError> {
        self.account_mut(handle)?.withdraw(amount)
    }

    /// Apply interest to the savings account behind `handle`
    ///
    /// # Returns
    ///
    /// The interest credited.
    pub fn apply_interest(&mut self, handle: AccountHandle) -> Result<Decimal, BankError> {
        self.account_mut(handle)?.apply_interest()
    }

    /// Replace the overdraft limit of the checking account behind `handle`
    pub fn set_overdraft_limit(
        &mut self,
        handle: AccountHandle,
        limit: Decimal,
    ) -> Result<LimitChange, BankError> {
        self.account_mut(handle)?.set_overdraft_limit(limit)
    }

    /// Move `amount` from one account to another
    ///
    /// The transfer runs in three stages:
    /// 1. Both handles must resolve, otherwise `InvalidAccountReference`
    /// 2. The pre-check selected by [`TransferPolicy`] must cover `amount`,
    ///    otherwise `InsufficientFunds`
    /// 3. Withdraw from `from`, then deposit into `to`
    ///
    /// Either both balances change (by `-amount` and `+amount`) or neither
    /// does. If the deposit leg fails the source balance is put back.
    ///
    /// # Errors
    ///
    /// - `InvalidAccountReference` if either handle does not resolve
    /// - `InvalidAmount` if `amount` is not positive
    /// - `InsufficientFunds` if the pre-check or the source's own policy rejects it
    pub fn transfer(
        &mut self,
        from: AccountHandle,
        to: AccountHandle,
        amount: Decimal,
    ) -> Result<TransferReceipt, BankError> {
        let source = self
            .get_account(from)
            .ok_or_else(|| BankError::invalid_account(from.index()))?;
        if self.get_account(to).is_none() {
            return Err(BankError::invalid_account(to.index()));
        }

        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }

        let available = match self.transfer_policy {
            TransferPolicy::Legacy => source.balance(),
            TransferPolicy::OverdraftAware => source.withdrawal_headroom(),
        };
        if available < amount {
            return Err(BankError::insufficient_funds(available, amount));
        }

        let source_before = source.balance();
        let withdrawal = self.account_mut(from)?.withdraw(amount)?;

        if let Err(e) = self.account_mut(to)?.deposit(amount) {
            tracing::warn!(%from, %to, %amount, error = %e, "deposit leg failed, restoring source");
            self.account_mut(from)?.restore_balance(source_before);
            return Err(e);
        }

        let overdrawn_by = match withdrawal {
            WithdrawalOutcome::OverdraftEngaged { overdrawn_by, .. } => Some(overdrawn_by),
            WithdrawalOutcome::Completed { .. } => None,
        };

        Ok(TransferReceipt {
            from,
            to,
            amount,
            from_balance: self.accounts[from.index()].balance(),
            to_balance: self.accounts[to.index()].balance(),
            overdrawn_by,
        })
    }
}
