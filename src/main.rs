//! Toy Bank CLI
//!
//! Loads customer and account records, replays session scripts against
//! them, and prints the resulting customer and account listings.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --customers customers.txt --accounts accounts.txt
//! cargo run -- --accounts accounts.txt --session monday.csv --session tuesday.csv
//! cargo run -- --accounts accounts.txt --session monday.csv --strategy async --max-concurrent 4
//! cargo run -- --accounts accounts.txt --session monday.csv --transfer-policy overdraft-aware --save
//! ```
//!
//! Listings go to stdout. Logs go to stderr and are filtered with
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, unreadable file, refused save, failed session, etc.)

use std::process;
use toy_bank_ledger::cli;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let stdout = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut stdout.lock()) {
        tracing::error!(error = %e, "run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
