//! SQLite-backed [`TraceStore`].
//!
//! One `traces` table; ids come from `INTEGER PRIMARY KEY AUTOINCREMENT` so
//! they stay monotonic and are never reused across restarts. The
//! object-valued columns (`headers`, `body`, `fields`) persist as JSON text.

use std::path::Path;

use rusqlite::{params, Connection, Row};
use serde_json::{Map, Value};

use crate::trace_record::{NewTrace, TraceRecord};
use crate::trace_store::{StorageError, TraceStore};

pub const TRACE_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS traces (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    kind        TEXT NOT NULL,
    ts          INTEGER NOT NULL,
    request_id  TEXT,
    url         TEXT,
    method      TEXT,
    status      INTEGER,
    headers     TEXT,
    body        TEXT,
    label       TEXT,
    locator     TEXT,
    fields      TEXT
);
CREATE INDEX IF NOT EXISTS idx_traces_kind ON traces(kind);
CREATE INDEX IF NOT EXISTS idx_traces_request_id ON traces(request_id);
";

pub struct SqliteTraceStore {
    conn: Connection,
}

impl SqliteTraceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn schema_version(&self) -> Result<i64, StorageError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        let current = self.schema_version()?;
        if current > TRACE_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchemaVersion {
                found: current,
                supported: TRACE_SCHEMA_VERSION,
            });
        }

        if current < 1 {
            self.conn.execute_batch(SCHEMA)?;
            self.conn
                .execute("PRAGMA user_version = 1", [])
                .map(|_| ())?;
        }

        Ok(())
    }
}

impl TraceStore for SqliteTraceStore {
    fn append(&mut self, records: Vec<NewTrace>) -> Result<Vec<TraceRecord>, StorageError> {
        let tx = self.conn.transaction()?;
        let mut created = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO traces
                    (kind, ts, request_id, url, method, status,
                     headers, body, label, locator, fields)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.kind,
                    record.ts,
                    record.request_id,
                    record.url,
                    record.method,
                    record.status,
                    encode_json(record.headers.as_ref())?,
                    encode_json(record.body.as_ref())?,
                    record.label,
                    record.locator,
                    encode_json(record.fields.as_ref())?,
                ])?;
                created.push(record.into_record(tx.last_insert_rowid()));
            }
        }
        tx.commit()?;
        Ok(created)
    }

    fn list(&self, skip: u64, limit: u64) -> Result<Vec<TraceRecord>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let skip = i64::try_from(skip).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(
            "SELECT id, kind, ts, request_id, url, method, status,
                    headers, body, label, locator, fields
             FROM traces
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, skip], RawTraceRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

/// Row image with the JSON columns still in text form; decoding happens
/// outside the rusqlite row callback so JSON errors stay [`StorageError`]s.
struct RawTraceRow {
    id: i64,
    kind: String,
    ts: i64,
    request_id: Option<String>,
    url: Option<String>,
    method: Option<String>,
    status: Option<i64>,
    headers: Option<String>,
    body: Option<String>,
    label: Option<String>,
    locator: Option<String>,
    fields: Option<String>,
}

impl RawTraceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            ts: row.get(2)?,
            request_id: row.get(3)?,
            url: row.get(4)?,
            method: row.get(5)?,
            status: row.get(6)?,
            headers: row.get(7)?,
            body: row.get(8)?,
            label: row.get(9)?,
            locator: row.get(10)?,
            fields: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<TraceRecord, StorageError> {
        Ok(TraceRecord {
            id: self.id,
            kind: self.kind,
            ts: self.ts,
            request_id: self.request_id,
            url: self.url,
            method: self.method,
            status: self.status,
            headers: decode_json(self.headers)?,
            body: decode_json(self.body)?,
            label: self.label,
            locator: self.locator,
            fields: decode_json(self.fields)?,
        })
    }
}

fn encode_json(value: Option<&Map<String, Value>>) -> Result<Option<String>, StorageError> {
    value
        .map(|map| {
            serde_json::to_string(map).map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
}

fn decode_json(value: Option<String>) -> Result<Option<Map<String, Value>>, StorageError> {
    value
        .map(|text| {
            serde_json::from_str(&text).map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
}
