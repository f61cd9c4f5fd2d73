use std::sync::{Arc, Mutex};

use crate::trace_store::TraceStore;

/// Shared state handed to every handler. The store is the only
/// cross-request resource; each request takes the lock for the duration of
/// its single store call and the guard releases it on every exit path.
pub struct AppState {
    pub store: Arc<Mutex<dyn TraceStore>>,
}

impl AppState {
    pub fn new(store: Arc<Mutex<dyn TraceStore>>) -> Self {
        Self { store }
    }
}
