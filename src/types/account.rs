//! Account types for the toy bank ledger
//!
//! An [`Account`] is a shared balance record plus an [`AccountKind`] payload
//! carrying the variant-specific parameter. Withdrawal policy is the one
//! behaviour that varies by kind: savings and business accounts never go
//! below zero, checking accounts may go down to `-overdraft_limit`.

use super::error::BankError;
use super::operation::{LimitChange, WithdrawalOutcome};
use rust_decimal::Decimal;
use std::fmt;

/// Interest rate used for savings accounts opened without one (1%)
pub const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Overdraft limit used for checking accounts opened without one
pub const DEFAULT_OVERDRAFT_LIMIT: Decimal = Decimal::ZERO;

/// Stable handle to an account inside a [`crate::core::Bank`]
///
/// Handles are positions in the bank's insertion-ordered account list.
/// Any index can be wrapped, so resolving a handle may fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountHandle(usize);

impl AccountHandle {
    pub fn new(index: usize) -> Self {
        AccountHandle(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Account type tag as used by the record files and the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Savings,
    Checking,
    Business,
}

impl AccountType {
    /// Numeric tag (1 = savings, 2 = checking, 3 = business)
    pub fn tag(self) -> u8 {
        match self {
            AccountType::Savings => 1,
            AccountType::Checking => 2,
            AccountType::Business => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
            AccountType::Business => "Business",
        }
    }
}

impl TryFrom<u8> for AccountType {
    type Error = BankError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(AccountType::Savings),
            2 => Ok(AccountType::Checking),
            3 => Ok(AccountType::Business),
            other => Err(BankError::unknown_account_type(other)),
        }
    }
}

/// Variant-specific account payload
#[derive(Debug, Clone, PartialEq)]
pub enum AccountKind {
    /// Interest-bearing account; balance never negative
    Savings {
        /// Fraction credited per interest application (0.01 = 1%)
        interest_rate: Decimal,
    },

    /// Account allowed to go negative down to `-overdraft_limit`
    Checking {
        /// Maximum overdrawn amount, never negative
        overdraft_limit: Decimal,
    },

    /// Plain account; balance never negative
    Business,
}

/// Flat view of an account used by the persistence layer
///
/// `extra` holds the interest rate for savings accounts and the overdraft
/// limit for checking accounts; business accounts have none.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub tag: u8,
    pub balance: Decimal,
    pub extra: Option<Decimal>,
}

/// A balance holder with a kind-specific withdrawal policy
///
/// The balance is private and only changes through [`Account::deposit`],
/// [`Account::withdraw`] and [`Account::apply_interest`].
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    balance: Decimal,
    kind: AccountKind,
}

impl Account {
    /// Open a savings account
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the rate or the opening balance is negative.
    pub fn savings(initial_balance: Decimal, interest_rate: Decimal) -> Result<Self, BankError> {
        if interest_rate < Decimal::ZERO {
            return Err(BankError::invalid_parameter("interest rate", interest_rate));
        }
        if initial_balance < Decimal::ZERO {
            return Err(BankError::invalid_parameter(
                "opening balance",
                initial_balance,
            ));
        }

        Ok(Account {
            balance: initial_balance,
            kind: AccountKind::Savings { interest_rate },
        })
    }

    /// Open a checking account
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the limit is negative or the opening balance is
    /// already below `-overdraft_limit`.
    pub fn checking(
        initial_balance: Decimal,
        overdraft_limit: Decimal,
    ) -> Result<Self, BankError> {
        if overdraft_limit < Decimal::ZERO {
            return Err(BankError::invalid_parameter(
                "overdraft limit",
                overdraft_limit,
            ));
        }
        if initial_balance < -overdraft_limit {
            return Err(BankError::invalid_parameter(
                "opening balance",
                initial_balance,
            ));
        }

        Ok(Account {
            balance: initial_balance,
            kind: AccountKind::Checking { overdraft_limit },
        })
    }

    /// Open a business account
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the opening balance is negative.
    pub fn business(initial_balance: Decimal) -> Result<Self, BankError> {
        if initial_balance < Decimal::ZERO {
            return Err(BankError::invalid_parameter(
                "opening balance",
                initial_balance,
            ));
        }

        Ok(Account {
            balance: initial_balance,
            kind: AccountKind::Business,
        })
    }

    /// Build an account from its numeric type tag
    ///
    /// `parameter` is the interest rate for savings (default 0.01) and the
    /// overdraft limit for checking (default 0). It is ignored for business
    /// accounts.
    ///
    /// # Errors
    ///
    /// - `UnknownAccountType` for tags outside 1..=3
    /// - `InvalidParameter` from the typed constructors
    pub fn from_tag(
        tag: u8,
        initial_balance: Decimal,
        parameter: Option<Decimal>,
    ) -> Result<Self, BankError> {
        match AccountType::try_from(tag)? {
            AccountType::Savings => Account::savings(
                initial_balance,
                parameter.unwrap_or(DEFAULT_INTEREST_RATE),
            ),
            AccountType::Checking => Account::checking(
                initial_balance,
                parameter.unwrap_or(DEFAULT_OVERDRAFT_LIMIT),
            ),
            AccountType::Business => Account::business(initial_balance),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        match self.kind {
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::Checking { .. } => AccountType::Checking,
            AccountKind::Business => AccountType::Business,
        }
    }

    /// Interest rate, for savings accounts only
    pub fn interest_rate(&self) -> Option<Decimal> {
        match self.kind {
            AccountKind::Savings { interest_rate } => Some(interest_rate),
            _ => None,
        }
    }

    /// Overdraft limit, for checking accounts only
    pub fn overdraft_limit(&self) -> Option<Decimal> {
        match self.kind {
            AccountKind::Checking { overdraft_limit } => Some(overdraft_limit),
            _ => None,
        }
    }

    /// Largest amount a single withdrawal may take
    ///
    /// Saturates at `Decimal::MAX` for checking accounts near the top of the range.
    pub fn withdrawal_headroom(&self) -> Decimal {
        match self.kind {
            AccountKind::Checking { overdraft_limit } => {
                self.balance.saturating_add(overdraft_limit)
            }
            AccountKind::Savings { .. } | AccountKind::Business => self.balance,
        }
    }

    /// Credit `amount` to the account
    ///
    /// # Returns
    ///
    /// The balance after the deposit.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is not positive or the new balance would
    /// overflow. The balance is unchanged on error.
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::invalid_amount(amount))?;

        Ok(self.balance)
    }

    /// Debit `amount` according to the account's withdrawal policy
    ///
    /// Savings and business accounts allow withdrawals up to the balance.
    /// Checking accounts allow up to balance plus overdraft limit, and report
    /// [`WithdrawalOutcome::OverdraftEngaged`] when the result is negative.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is not positive
    /// - `InsufficientFunds` if the policy rejects the amount
    ///
    /// The balance is unchanged on error.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<WithdrawalOutcome, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }

        let headroom = self.withdrawal_headroom();
        if amount > headroom {
            return Err(BankError::insufficient_funds(headroom, amount));
        }

        self.balance -= amount;

        if self.balance < Decimal::ZERO {
            Ok(WithdrawalOutcome::OverdraftEngaged {
                balance: self.balance,
                overdrawn_by: -self.balance,
            })
        } else {
            Ok(WithdrawalOutcome::Completed {
                balance: self.balance,
            })
        }
    }

    /// Credit one period of interest to a savings account
    ///
    /// Not idempotent: each call compounds on the current balance.
    ///
    /// # Returns
    ///
    /// The interest amount credited.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for checking and business accounts.
    pub fn apply_interest(&mut self) -> Result<Decimal, BankError> {
        let AccountKind::Savings { interest_rate } = self.kind else {
            return Err(BankError::unsupported(
                "apply interest",
                self.account_type().label(),
            ));
        };

        let interest = self
            .balance
            .checked_mul(interest_rate)
            .ok_or_else(|| BankError::invalid_parameter("interest rate", interest_rate))?;
        let new_balance = self
            .balance
            .checked_add(interest)
            .ok_or_else(|| BankError::invalid_amount(interest))?;

        self.balance = new_balance;
        Ok(interest)
    }

    /// Replace the overdraft limit of a checking account
    ///
    /// The current balance is not re-validated against the new limit. A
    /// balance already below `-new_limit` stays as is and is flagged on the
    /// returned [`LimitChange`]; further withdrawals are refused until the
    /// balance recovers.
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation` for savings and business accounts
    /// - `InvalidParameter` if `new_limit` is negative
    pub fn set_overdraft_limit(&mut self, new_limit: Decimal) -> Result<LimitChange, BankError> {
        let account_type = self.account_type();
        let AccountKind::Checking { overdraft_limit } = &mut self.kind else {
            return Err(BankError::unsupported(
                "set overdraft limit",
                account_type.label(),
            ));
        };

        if new_limit < Decimal::ZERO {
            return Err(BankError::invalid_parameter("overdraft limit", new_limit));
        }

        let previous = std::mem::replace(overdraft_limit, new_limit);

        Ok(LimitChange {
            previous,
            current: new_limit,
            balance: self.balance,
            exceeds_limit: self.balance < -new_limit,
        })
    }

    /// Put back a balance captured before a failed multi-step operation
    pub(crate) fn restore_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Flatten the account for persistence
    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            tag: self.account_type().tag(),
            balance: self.balance,
            extra: match self.kind {
                AccountKind::Savings { interest_rate } => Some(interest_rate),
                AccountKind::Checking { overdraft_limit } => Some(overdraft_limit),
                AccountKind::Business => None,
            },
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = BankError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        Account::from_tag(record.tag, record.balance, record.extra)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccountKind::Savings { interest_rate } => write!(
                f,
                "Savings account, balance: {:.2}, interest rate: {}",
                self.balance,
                interest_rate.normalize()
            ),
            AccountKind::Checking { overdraft_limit } => write!(
                f,
                "Checking account, balance: {:.2}, overdraft limit: {:.2}",
                self.balance, overdraft_limit
            ),
            AccountKind::Business => write!(f, "Business account, balance: {:.2}", self.balance),
        }
    }
}
