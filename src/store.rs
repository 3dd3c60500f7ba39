//! Persistence of finished results behind a save/read key-value interface.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StreamError;
use crate::model::AggregateResult;

/// Key-value store for finished task results.
pub trait ResultStore: Send + Sync {
    fn save(&self, key: &str, result: &AggregateResult) -> Result<(), StreamError>;

    fn read(&self, key: &str) -> Result<Option<AggregateResult>, StreamError>;
}

/// Process-local store keeping each result as its JSON encoding.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&self, key: &str, result: &AggregateResult) -> Result<(), StreamError> {
        let encoded = serde_json::to_string(result)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StreamError::StoreError(e.to_string()))?;
        entries.insert(key.to_string(), encoded);
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<AggregateResult>, StreamError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StreamError::StoreError(e.to_string()))?;
        entries
            .get(key)
            .map(|raw| serde_json::from_str(raw).map_err(StreamError::from))
            .transpose()
    }
}
