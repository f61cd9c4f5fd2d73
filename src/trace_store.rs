//! Storage seam for trace records.
//!
//! The façade only talks to `dyn TraceStore` behind a mutex, so the backing
//! medium can be swapped without touching the HTTP layer. The production
//! implementation lives in `trace_store_sqlite`.

use thiserror::Error;

use crate::trace_record::{NewTrace, TraceRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unsupported schema version {found}, max supported {supported}")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },
}

pub trait TraceStore: Send {
    /// Persist a batch of records as a single unit and return them with
    /// their assigned ids, in input order. An empty batch is a no-op that
    /// returns an empty vec.
    fn append(&mut self, records: Vec<NewTrace>) -> Result<Vec<TraceRecord>, StorageError>;

    /// Read back records in insertion order (ascending id), skipping the
    /// first `skip` and returning at most `limit`.
    fn list(&self, skip: u64, limit: u64) -> Result<Vec<TraceRecord>, StorageError>;
}
