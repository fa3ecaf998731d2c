//! Record format handling for ledger files
//!
//! This module centralizes all text format concerns, providing:
//! - Conversion of account record fields (`tag balance [extra]`)
//! - Conversion of customer record fields (`name id`)
//! - SessionRecord structure for session script deserialization
//! - Writers for account and customer record files
//!
//! All functions are pure (no file access) for easy testing.

use crate::types::{
    validate_id, Account, AccountHandle, AccountRecord, Customer, OperationRecord,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Field separator of account and customer record files
pub const RECORD_DELIMITER: u8 = b' ';

/// Session script row
///
/// Matches the session CSV with columns: type, account, target, amount.
/// `target` is only used by transfers; `amount` by everything but interest.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub account: usize,
    pub target: Option<usize>,
    pub amount: Option<String>,
}

fn parse_decimal(field: &str, what: &str) -> Result<Decimal, String> {
    Decimal::from_str(field.trim()).map_err(|_| format!("Invalid {} '{}'", what, field))
}

/// Convert the fields of one account record line into an Account
///
/// Empty fields (from repeated separators) are ignored. The line must hold
/// a type tag, a balance, and at most one extra parameter.
///
/// # Returns
///
/// Result containing either:
/// - Ok(Account) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_account_fields<'a, I>(fields: I) -> Result<Account, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    let (tag, balance, extra) = match fields.as_slice() {
        [tag, balance] => (*tag, *balance, None),
        [tag, balance, extra] => (*tag, *balance, Some(*extra)),
        other => {
            return Err(format!(
                "Expected 'tag balance [extra]', found {} fields",
                other.len()
            ))
        }
    };

    let tag = tag
        .parse::<u8>()
        .map_err(|_| format!("Invalid account type '{}'", tag))?;
    let record = AccountRecord {
        tag,
        balance: parse_decimal(balance, "balance")?,
        extra: extra.map(|e| parse_decimal(e, "parameter")).transpose()?,
    };

    Account::try_from(record).map_err(|e| e.to_string())
}

/// Convert the fields of one customer record line into a Customer
///
/// The id must pass the nine-digit check.
pub fn convert_customer_fields<'a, I>(fields: I) -> Result<Customer, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    match fields.as_slice() {
        [name, id] => {
            validate_id(id).map_err(|e| e.to_string())?;
            Ok(Customer::new(*name, *id))
        }
        other => Err(format!("Expected 'name id', found {} fields", other.len())),
    }
}

/// Convert a SessionRecord to an OperationRecord
///
/// This function:
/// - Parses the operation type (case insensitive)
/// - Parses the amount string into a Decimal (if present)
/// - Validates that transfers name a target account
/// - Validates that an amount is present where one is needed
pub fn convert_session_record(record: SessionRecord) -> Result<OperationRecord, String> {
    let amount = match record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            Some(parse_decimal(&amount_str, "amount")?)
        }
        _ => None,
    };

    let op_type = record.op_type.trim().to_lowercase();
    let account = AccountHandle::new(record.account);
    let require_amount = || {
        amount.ok_or_else(|| {
            format!(
                "{} operation on account {} requires an amount",
                op_type, record.account
            )
        })
    };

    let operation = match op_type.as_str() {
        "deposit" => OperationRecord::Deposit {
            account,
            amount: require_amount()?,
        },
        "withdraw" | "withdrawal" => OperationRecord::Withdraw {
            account,
            amount: require_amount()?,
        },
        "transfer" => {
            let target = record.target.ok_or_else(|| {
                format!(
                    "transfer from account {} requires a target account",
                    record.account
                )
            })?;
            OperationRecord::Transfer {
                from: account,
                to: AccountHandle::new(target),
                amount: require_amount()?,
            }
        }
        "interest" => OperationRecord::ApplyInterest { account },
        "overdraft" => OperationRecord::SetOverdraftLimit {
            account,
            limit: require_amount()?,
        },
        _ => {
            return Err(format!(
                "Invalid operation type: '{}' for account {}",
                record.op_type, record.account
            ))
        }
    };

    Ok(operation)
}

/// Write accounts in record format: `tag balance [extra]`, one per line
///
/// Decimals are normalized so that reloading a saved file gives back the
/// same values without trailing zeros piling up.
pub fn write_accounts(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(RECORD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_writer(output);

    for account in accounts {
        let record = account.to_record();
        let mut fields = vec![record.tag.to_string(), record.balance.normalize().to_string()];
        if let Some(extra) = record.extra {
            fields.push(extra.normalize().to_string());
        }

        writer
            .write_record(&fields)
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write customers in record format: `name id`, one per line
///
/// Names containing spaces are quoted so they read back as one field.
pub fn write_customers(customers: &[Customer], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(RECORD_DELIMITER)
        .has_headers(false)
        .from_writer(output);

    for customer in customers {
        writer
            .write_record([customer.name(), customer.id()])
            .map_err(|e| format!("Failed to write customer record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
