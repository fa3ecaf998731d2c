use crate::cli::{CliArgs, StrategyType};
use crate::core::Bank;
use crate::io::sync_reader::{load_accounts, load_customers, save_accounts, save_customers};
use crate::strategy;
use crate::types::BankError;
use std::io::Write;

/// Load the record files, replay the sessions and write the listings
///
/// Customers are listed before accounts. With `--save` the final records
/// replace the input files; the save is refused up front if loading
/// skipped any line, since rewriting the file would drop it.
///
/// # Errors
///
/// File level failures (missing or unreadable files, a refused save, a
/// failed session task). Rejected operations are only logged.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), BankError> {
    let customers = match &args.customers {
        Some(path) => Some((path, load_customers(path)?)),
        None => None,
    };
    let accounts = load_accounts(&args.accounts)?;

    if args.save {
        if let Some((path, loaded)) = &customers {
            loaded.ensure_complete(path)?;
        }
        accounts.ensure_complete(&args.accounts)?;
    }

    let mut bank = Bank::with_transfer_policy(args.transfer_policy.into());
    for customer in customers.iter().flat_map(|(_, loaded)| &loaded.records) {
        bank.add_customer(customer.name(), customer.id());
    }
    for account in accounts.records {
        bank.add_account(account);
    }

    let config = match args.strategy {
        StrategyType::Async => Some(args.to_session_config()),
        StrategyType::Sync => None,
    };
    let summary = strategy::create_strategy(args.strategy, config).run(bank, &args.sessions)?;
    tracing::info!(
        applied = summary.applied(),
        rejected = summary.rejected(),
        "sessions replayed"
    );

    summary.bank.show_customers(output)?;
    summary.bank.show_accounts(output)?;
    output.flush()?;

    if args.save {
        if let Some((path, _)) = &customers {
            save_customers(path, summary.bank.customers())?;
        }
        save_accounts(&args.accounts, summary.bank.accounts())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(dir: &Path, extra: &[&str]) -> CliArgs {
        let customers = dir.join("customers.txt");
        let accounts = dir.join("accounts.txt");
        let session = dir.join("session.csv");

        let mut argv = vec![
            "program",
            "--customers",
            customers.to_str().unwrap(),
            "--accounts",
            accounts.to_str().unwrap(),
            "--session",
            session.to_str().unwrap(),
        ];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn write_inputs(dir: &Path, customers: &str, accounts: &str) {
        fs::write(dir.join("customers.txt"), customers).unwrap();
        fs::write(dir.join("accounts.txt"), accounts).unwrap();
        fs::write(
            dir.join("session.csv"),
            "type,account,target,amount\ndeposit,1,,25\n",
        )
        .unwrap();
    }

    #[test]
    fn test_run_prints_customers_then_accounts() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), "Alice 123456789\n", "1 100 0.01\n3 50\n");
        let mut output = Vec::new();

        run(&args(dir.path(), &[]), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Customer: Alice, ID: 123456789\n\
             Savings account, balance: 100.00, interest rate: 0.01\n\
             Business account, balance: 75.00\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.txt")).unwrap(),
            "1 100 0.01\n3 50\n"
        );
    }

    #[test]
    fn test_save_writes_final_records() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), "\"Bob Stone\" 987654321\n", "1 100 0.01\n3 50\n");
        let mut output = Vec::new();

        run(&args(dir.path(), &["--save"]), &mut output).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.txt")).unwrap(),
            "1 100 0.01\n3 75\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("customers.txt")).unwrap(),
            "\"Bob Stone\" 987654321\n"
        );
    }

    #[test]
    fn test_save_refused_when_account_lines_were_skipped() {
        let dir = TempDir::new().unwrap();
        let accounts = "1 100 0.01\n9 100\n3 abc\n3 50\n";
        write_inputs(dir.path(), "Alice 123456789\n", accounts);
        let mut output = Vec::new();

        let result = run(&args(dir.path(), &["--save"]), &mut output);

        assert!(matches!(
            result,
            Err(BankError::SaveRefused { skipped: 2, .. })
        ));
        assert!(output.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.txt")).unwrap(),
            accounts
        );
    }

    #[test]
    fn test_save_refused_when_customer_lines_were_skipped() {
        let dir = TempDir::new().unwrap();
        let customers = "Carol 555000111\nDave 12345\n";
        write_inputs(dir.path(), customers, "3 50\n");
        let mut output = Vec::new();

        let result = run(&args(dir.path(), &["--save"]), &mut output);

        assert!(matches!(
            result,
            Err(BankError::SaveRefused { skipped: 1, .. })
        ));
        assert_eq!(
            fs::read_to_string(dir.path().join("customers.txt")).unwrap(),
            customers
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.txt")).unwrap(),
            "3 50\n"
        );
    }

    #[test]
    fn test_skipped_lines_do_not_block_a_run_without_save() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), "Dave 12345\n", "9 100\n3 50\n");
        let mut output = Vec::new();

        run(&args(dir.path(), &["--strategy", "async"]), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Business account, balance: 50.00\n"
        );
    }
}
