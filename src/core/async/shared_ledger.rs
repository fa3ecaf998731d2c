//! Ledger shared between concurrent sessions
//!
//! This module provides `SharedLedger`, a cloneable handle to a single
//! `LedgerEngine` guarded by one async mutex.
//!
//! # Design
//!
//! A transfer touches two accounts, so per-account locking would need a
//! lock ordering to stay deadlock free. Instead every operation takes the
//! one ledger-wide lock for its full duration. No session can observe a
//! transfer whose funds have left the source but not yet reached the
//! destination.
//!
//! # Thread Safety
//!
//! `SharedLedger` is `Send + Sync` and cheap to clone; clones share the
//! same engine.

use crate::core::bank::Bank;
use crate::core::engine::LedgerEngine;
use crate::types::{BankError, OperationOutcome, OperationRecord};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable, lock-protected ledger engine
#[derive(Debug, Clone)]
pub struct SharedLedger {
    engine: Arc<Mutex<LedgerEngine>>,
}

impl SharedLedger {
    /// Wrap a populated bank for shared use
    pub fn new(bank: Bank) -> Self {
        Self {
            engine: Arc::new(Mutex::new(LedgerEngine::new(bank))),
        }
    }

    /// Apply one record while holding the ledger lock
    pub async fn process(&self, record: OperationRecord) -> Result<OperationOutcome, BankError> {
        self.engine.lock().await.process(record)
    }

    /// Copy of the current bank state
    pub async fn snapshot(&self) -> Bank {
        self.engine.lock().await.bank().clone()
    }
}
