//! Asynchronous session script reader with batch interface
//!
//! Provides a streaming interface over the operations of a session script.
//! Used by the async strategy, where several sessions are read and applied
//! at the same time.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - Batch reading so a session task yields between chunks of work
//!
//! # Architecture
//!
//! ```text
//! Session CSV → AsyncReader → Batches of OperationRecords
//!                   ↓
//!           record_format module
//!     (SessionRecord, convert_session_record)
//! ```

use crate::io::record_format::{convert_session_record, SessionRecord};
use crate::types::OperationRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous session reader
///
/// Malformed rows are logged, counted and skipped.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    malformed: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            malformed: 0,
        }
    }

    /// Read a batch of operation records
    ///
    /// Reads up to `batch_size` rows, converting them to OperationRecords.
    ///
    /// # Returns
    ///
    /// The successfully converted records, in script order. An empty
    /// vector means the end of the script was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<SessionRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(session_record)) => match convert_session_record(session_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => {
                        self.malformed += 1;
                        tracing::warn!(error = %e, "skipping malformed session row");
                    }
                },
                Some(Err(e)) => {
                    self.malformed += 1;
                    tracing::warn!(error = %e, "session CSV parse error");
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}
