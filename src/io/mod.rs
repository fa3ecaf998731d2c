//! I/O module
//!
//! Handles record files and session scripts.
//!
//! # Components
//!
//! - `record_format` - Format handling (record conversion, output serialization)
//! - `sync_reader` - Blocking readers, loaders and savers
//! - `async_reader` - Asynchronous session reader with batch reading interface

pub mod async_reader;
pub mod record_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use record_format::{
    convert_account_fields, convert_customer_fields, convert_session_record, write_accounts,
    write_customers, SessionRecord,
};
pub use sync_reader::{
    load_accounts, load_customers, read_accounts, read_customers, save_accounts, save_customers,
    LoadedRecords, SessionReader,
};
