//! Benchmark suite for comparing session strategies
//!
//! Compares the sync and async strategies replaying the same generated
//! session scripts, using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Generated Sessions
//!
//! Each session mixes deposits, withdrawals, transfers, interest and
//! overdraft changes over a small set of accounts. Scripts are written to a
//! temporary directory before timing starts.

use divan::Bencher;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use toy_bank_ledger::cli::StrategyType;
use toy_bank_ledger::strategy::{create_strategy, SessionConfig};
use toy_bank_ledger::{Account, Bank};

const ACCOUNTS: usize = 12;
const RECORDS_PER_SESSION: usize = 2_000;

fn main() {
    divan::main();
}

fn bank() -> Bank {
    let mut bank = Bank::new();
    for i in 0..ACCOUNTS {
        let account = match i % 3 {
            0 => Account::savings(Decimal::from(50_000), Decimal::new(1, 3)),
            1 => Account::checking(Decimal::from(50_000), Decimal::from(5_000)),
            _ => Account::business(Decimal::from(50_000)),
        }
        .expect("Invalid benchmark account");
        bank.add_account(account);
    }
    bank
}

fn session_script(seed: usize) -> String {
    let mut script = String::from("type,account,target,amount\n");
    for n in 0..RECORDS_PER_SESSION {
        let account = (seed + n) % ACCOUNTS;
        let line = match n % 6 {
            0 => format!("deposit,{},,{}.25\n", account, n % 500 + 1),
            1 => format!("withdraw,{},,{}\n", account, n % 300 + 1),
            2 | 3 => format!("transfer,{},{},{}\n", account, (account + 5) % ACCOUNTS, n % 200 + 1),
            4 => format!("interest,{},,\n", account),
            _ => format!("overdraft,{},,{}\n", account, n % 4_000),
        };
        script.push_str(&line);
    }
    script
}

fn sessions(count: usize) -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let paths = (0..count)
        .map(|seed| {
            let path = dir.path().join(format!("session_{}.csv", seed));
            fs::write(&path, session_script(seed)).expect("Failed to write session");
            path
        })
        .collect();
    (dir, paths)
}

/// Synchronous strategy, sessions replayed one after another
#[divan::bench(args = [1, 4, 16])]
fn sync_strategy(bencher: Bencher, session_count: usize) {
    let (_dir, paths) = sessions(session_count);
    let strategy = create_strategy(StrategyType::Sync, None);

    bencher
        .with_inputs(bank)
        .bench_values(|bank| strategy.run(bank, &paths).expect("Replay failed"));
}

/// Asynchronous strategy, one task per session
#[divan::bench(args = [1, 4, 16])]
fn async_strategy(bencher: Bencher, session_count: usize) {
    let (_dir, paths) = sessions(session_count);
    let strategy = create_strategy(StrategyType::Async, Some(SessionConfig::default()));

    bencher
        .with_inputs(bank)
        .bench_values(|bank| strategy.run(bank, &paths).expect("Replay failed"));
}
