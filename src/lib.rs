//! Library root for the `mcpclick-api` crate.
//!
//! HTTP backend for the MCP.click UI trace capture tool: batch-create and
//! list trace records over a single SQLite table.

// Core error handling
pub mod api_errors;

// Trace data model & persistence
pub mod trace_record;
pub mod trace_store;
pub mod trace_store_sqlite;

// Configuration
pub mod config_loader;

// Web server interface
pub mod api;
pub mod app_state;
pub mod web;


pub use trace_record::{NewTrace, TraceRecord};
pub use trace_store::{StorageError, TraceStore};
pub use trace_store_sqlite::SqliteTraceStore;
