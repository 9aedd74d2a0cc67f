//! In-memory state store backend
//!
//! Keeps one record per persistence ID in a concurrent map. Stateless:
//! nothing to connect, and data lives as long as the backend value.
//! Intended for tests and embedded single-process use.

use async_trait::async_trait;
use dashmap::DashMap;
use durastate_domain::error::Result;
use durastate_domain::ports::{Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::DurableStateRecord;

use crate::constants::BACKEND_MEMORY;

/// In-memory backend driver
#[derive(Debug, Default)]
pub struct MemoryStateBackend {
    records: DashMap<String, DurableStateRecord>,
}

impl MemoryStateBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every stored record
    pub fn clear(&self) {
        self.records.clear();
    }
}

#[async_trait]
impl StateStoreBackend for MemoryStateBackend {
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Stateless
    }

    async fn upsert(&self, record: &DurableStateRecord) -> Result<()> {
        self.records
            .insert(record.persistence_id.clone(), record.clone());
        Ok(())
    }

    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>> {
        Ok(self
            .records
            .get(persistence_id)
            .map(|entry| entry.value().clone()))
    }

    fn backend_name(&self) -> &str {
        BACKEND_MEMORY
    }
}
