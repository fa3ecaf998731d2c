//! Synchronous readers for record files and session scripts
//!
//! Provides:
//! - `SessionReader`, a streaming iterator over the operations of one session script
//! - `read_accounts` / `read_customers` for whitespace-separated record files
//! - `load_*` and `save_*` helpers working on file paths; saves replace the
//!   file through a temporary sibling
//!
//! Format concerns are delegated to the record_format module.
//!
//! # Iterator Interface
//!
//! SessionReader implements the Iterator trait, yielding
//! `Result<OperationRecord, BankError>` for each CSV row:
//!
//! ```no_run
//! use toy_bank_ledger::io::sync_reader::SessionReader;
//! use std::path::Path;
//!
//! let reader = SessionReader::new(Path::new("session.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()` and the loaders
//! - Malformed rows are yielded as Err variants (sessions) or logged, counted and skipped (record files)
//! - Line numbers are included in error messages for debugging

use crate::io::record_format::{
    convert_account_fields, convert_customer_fields, convert_session_record, write_accounts,
    write_customers, SessionRecord, RECORD_DELIMITER,
};
use crate::types::{Account, BankError, Customer, OperationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn open(path: &Path) -> Result<File, BankError> {
    File::open(path).map_err(|e| BankError::open_failed(path, e))
}

/// Synchronous session script reader
///
/// Streams one operation at a time; memory use does not grow with the
/// length of the script.
#[derive(Debug)]
pub struct SessionReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SessionReader {
    /// Open a session script
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (target and amount are optional)
    ///
    /// # Errors
    ///
    /// `FileNotFound` or `IoError` if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, BankError> {
        let file = open(path)?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SessionReader {
    type Item = Result<OperationRecord, BankError>;

    /// Get the next operation from the script
    ///
    /// # Returns
    ///
    /// * `Some(Ok(OperationRecord))` - Successfully parsed row
    /// * `Some(Err(BankError::ParseError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<SessionRecord>();
        let result = deserializer.next()?;
        self.line_num += 1;

        Some(match result {
            Ok(session_record) => convert_session_record(session_record)
                .map_err(|e| BankError::parse_error(Some(self.line_num), e)),
            Err(e) => Err(BankError::parse_error(Some(self.line_num), e.to_string())),
        })
    }
}

fn record_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(RECORD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Records read from a record file
///
/// `skipped` counts the lines that were logged and dropped. Writing
/// `records` back over the source file would lose those lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecords<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> LoadedRecords<T> {
    /// Check that `path` can be overwritten without losing lines
    ///
    /// # Errors
    ///
    /// `SaveRefused` if any line was skipped while loading.
    pub fn ensure_complete(&self, path: &Path) -> Result<(), BankError> {
        if self.skipped == 0 {
            return Ok(());
        }

        Err(BankError::SaveRefused {
            path: path.display().to_string(),
            skipped: self.skipped,
        })
    }
}

fn read_records<R, T, F>(reader: R, what: &str, convert: F) -> LoadedRecords<T>
where
    R: Read,
    F: Fn(&StringRecord) -> Result<T, String>,
{
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, result) in record_reader(reader).records().enumerate() {
        let line = index as u64 + 1;
        match result.map_err(|e| e.to_string()).and_then(|r| convert(&r)) {
            Ok(item) => records.push(item),
            Err(e) => {
                skipped += 1;
                tracing::warn!(line, error = %e, "skipping malformed {} record", what);
            }
        }
    }

    tracing::debug!(count = records.len(), skipped, "loaded {} records", what);
    LoadedRecords { records, skipped }
}

/// Read account records (`tag balance [extra]` per line)
///
/// Malformed lines, unknown type tags and out-of-range parameters are
/// logged, counted and skipped.
pub fn read_accounts<R: Read>(reader: R) -> LoadedRecords<Account> {
    read_records(reader, "account", |r| convert_account_fields(r.iter()))
}

/// Read customer records (`name id` per line)
///
/// Lines whose id is not nine digits are logged, counted and skipped.
pub fn read_customers<R: Read>(reader: R) -> LoadedRecords<Customer> {
    read_records(reader, "customer", |r| convert_customer_fields(r.iter()))
}

/// Load an account record file
pub fn load_accounts(path: &Path) -> Result<LoadedRecords<Account>, BankError> {
    Ok(read_accounts(open(path)?))
}

/// Load a customer record file
pub fn load_customers(path: &Path) -> Result<LoadedRecords<Customer>, BankError> {
    Ok(read_customers(open(path)?))
}

/// Replace `path` with what `write` produces
///
/// Output goes to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write leaves the original intact.
fn write_replacing<F>(path: &Path, write: F) -> Result<(), BankError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), String>,
{
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    write(file.as_file_mut()).map_err(|message| BankError::IoError { message })?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| BankError::IoError {
        message: format!("Failed to replace '{}': {}", path.display(), e.error),
    })?;
    Ok(())
}

/// Write accounts to a record file, replacing its contents
pub fn save_accounts(path: &Path, accounts: &[Account]) -> Result<(), BankError> {
    write_replacing(path, |output| write_accounts(accounts, output))
}

/// Write customers to a record file, replacing its contents
pub fn save_customers(path: &Path, customers: &[Customer]) -> Result<(), BankError> {
    write_replacing(path, |output| write_customers(customers, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountHandle, AccountType};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    /// Helper function to create a temporary file for testing
    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_session_reader_fails_on_missing_file() {
        let result = SessionReader::new(Path::new("nonexistent.csv"));
        assert_eq!(
            result.unwrap_err(),
            BankError::FileNotFound {
                path: "nonexistent.csv".to_string()
            }
        );
    }

    #[test]
    fn test_session_reader_iterates_all_operation_types() {
        let content = "type,account,target,amount\n\
            deposit,0,,100\n\
            withdraw,1,,50\n\
            transfer,0,2,25\n\
            interest,0,,\n\
            overdraft,1,,500\n";
        let file = create_temp_file(content);

        let reader = SessionReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[2],
            OperationRecord::Transfer {
                from: AccountHandle::new(0),
                to: AccountHandle::new(2),
                amount: dec!(25),
            }
        );
        assert_eq!(
            records[3],
            OperationRecord::ApplyInterest {
                account: AccountHandle::new(0)
            }
        );
    }

    #[test]
    fn test_session_reader_allows_short_rows() {
        let content = "type,account,target,amount\ninterest,0\n";
        let file = create_temp_file(content);

        let reader = SessionReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 1);
        assert!(records[0].is_ok());
    }

    #[test]
    fn test_session_reader_includes_line_numbers_in_errors() {
        let content = "type,account,target,amount\n\
            deposit,0,,100\n\
            deposit,0,,lots\n\
            deposit,x,,5\n\
            deposit,0,,5\n";
        let file = create_temp_file(content);

        let reader = SessionReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 4);
        assert!(records[0].is_ok());
        assert!(records[3].is_ok());

        match &records[1] {
            Err(BankError::ParseError { line, message }) => {
                assert_eq!(*line, Some(3));
                assert!(message.contains("Invalid amount"));
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
        assert!(matches!(
            records[2],
            Err(BankError::ParseError { line: Some(4), .. })
        ));
    }

    #[test]
    fn test_read_accounts_skips_malformed_lines() {
        let content = "1 10680 0.05\n\
            2 5000 1500\n\
            9 100\n\
            3 abc\n\
            \n\
            3 250\n";

        let loaded = read_accounts(content.as_bytes());
        assert_eq!(loaded.skipped, 2);
        let accounts = loaded.records;

        let types: Vec<AccountType> = accounts.iter().map(Account::account_type).collect();
        assert_eq!(
            types,
            vec![AccountType::Savings, AccountType::Checking, AccountType::Business]
        );
        assert_eq!(accounts[2].balance(), dec!(250));
    }

    #[test]
    fn test_read_customers_skips_invalid_ids() {
        let content = "Alice 123456789\nBob 774831\n\"Carol Ann\" 555666777\n";

        let loaded = read_customers(content.as_bytes());

        assert_eq!(loaded.skipped, 1);
        assert_eq!(
            loaded.records,
            vec![
                Customer::new("Alice", "123456789"),
                Customer::new("Carol Ann", "555666777"),
            ]
        );
    }

    #[test]
    fn test_load_missing_record_file() {
        assert!(matches!(
            load_accounts(Path::new("no_such_accounts.txt")),
            Err(BankError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_save_then_load_preserves_accounts_and_customers() {
        let accounts = vec![
            Account::savings(dec!(11214.00), dec!(0.05)).unwrap(),
            Account::checking(dec!(-1000), dec!(1500)).unwrap(),
            Account::business(dec!(3.5)).unwrap(),
        ];
        let customers = vec![
            Customer::new("Alice", "123456789"),
            Customer::new("Bob Stone", "987654321"),
        ];
        let accounts_file = NamedTempFile::new().unwrap();
        let customers_file = NamedTempFile::new().unwrap();

        save_accounts(accounts_file.path(), &accounts).unwrap();
        save_customers(customers_file.path(), &customers).unwrap();

        assert_eq!(
            load_accounts(accounts_file.path()).unwrap(),
            LoadedRecords {
                records: accounts,
                skipped: 0
            }
        );
        assert_eq!(load_customers(customers_file.path()).unwrap().records, customers);
    }

    #[test]
    fn test_skipped_lines_block_overwriting_the_source() {
        let content = "1 100 0.01\n9 100\n3 abc\n3 50\n";
        let file = create_temp_file(content);

        let loaded = load_accounts(file.path()).unwrap();
        assert_eq!(loaded.records.len(), 2);

        let refused = loaded.ensure_complete(file.path());
        assert_eq!(
            refused,
            Err(BankError::SaveRefused {
                path: file.path().display().to_string(),
                skipped: 2,
            })
        );
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), content);
    }

    #[test]
    fn test_clean_load_may_be_saved_back() {
        let file = create_temp_file("Alice 123456789\n");

        let loaded = load_customers(file.path()).unwrap();

        assert_eq!(loaded.ensure_complete(file.path()), Ok(()));
    }

    #[test]
    fn test_save_replaces_file_without_leaving_temporaries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, "3 1\n3 2\n3 3\n3 4\n").unwrap();

        save_accounts(&path, &[Account::business(dec!(9)).unwrap()]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3 9\n");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        std::fs::write(&path, "3 1\n").unwrap();

        let result = write_replacing(&path, |output| {
            output.write_all(b"3 ").map_err(|e| e.to_string())?;
            Err("disk full".to_string())
        });

        assert_eq!(
            result,
            Err(BankError::IoError {
                message: "disk full".to_string()
            })
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3 1\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("accounts.txt");

        let result = save_accounts(&path, &[Account::business(dec!(9)).unwrap()]);

        assert!(matches!(result, Err(BankError::IoError { .. })));
    }
}
