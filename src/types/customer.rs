//! Customer identity records
//!
//! Customers are plain identity records owned by the bank. Id format is
//! checked by whoever builds the customer (the record loader), not by the
//! record itself.

use super::error::BankError;
use std::fmt;

/// Length of a well-formed customer id
pub const CUSTOMER_ID_LEN: usize = 9;

/// Immutable customer identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    id: String,
}

impl Customer {
    /// Create a customer record
    ///
    /// No validation is performed; see [`validate_id`].
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Customer {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer: {}, ID: {}", self.name, self.id)
    }
}

/// Check whether `id` is exactly nine decimal digits
pub fn is_valid_id(id: &str) -> bool {
    id.len() == CUSTOMER_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a customer id, yielding `MalformedIdentifier` on failure
pub fn validate_id(id: &str) -> Result<(), BankError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(BankError::malformed_identifier(id))
    }
}
