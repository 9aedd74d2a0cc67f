//! Scripted in-process backend for facade tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use durastate_domain::error::{Error, Result};
use durastate_domain::ports::{Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::DurableStateRecord;

#[derive(Debug)]
pub struct ScriptedBackend {
    lifecycle: Lifecycle,
    records: Mutex<HashMap<String, DurableStateRecord>>,
    connected: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    failing_connects: AtomicUsize,
    upsert_delay: Option<Duration>,
    disconnect_delay: Option<Duration>,
}

impl ScriptedBackend {
    fn with_lifecycle(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            records: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            failing_connects: AtomicUsize::new(0),
            upsert_delay: None,
            disconnect_delay: None,
        }
    }

    pub fn session() -> Self {
        Self::with_lifecycle(Lifecycle::Session)
    }

    pub fn stateless() -> Self {
        Self::with_lifecycle(Lifecycle::Stateless)
    }

    /// Fail the next `count` connect attempts
    pub fn failing_connects(self, count: usize) -> Self {
        self.failing_connects.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every upsert
    pub fn slow_upserts(mut self, delay: Duration) -> Self {
        self.upsert_delay = Some(delay);
        self
    }

    /// Drop the session, then wait before returning from disconnect
    pub fn slow_disconnects(mut self, delay: Duration) -> Self {
        self.disconnect_delay = Some(delay);
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Session && !self.connected.load(Ordering::SeqCst) {
            return Err(Error::not_connected("scripted"));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStoreBackend for ScriptedBackend {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        // Yield so racing callers overlap inside connect
        tokio::task::yield_now().await;
        if self
            .failing_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(Error::connection("scripted", "connection refused"));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        if let Some(delay) = self.disconnect_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn upsert(&self, record: &DurableStateRecord) -> Result<()> {
        self.ensure_connected()?;
        if let Some(delay) = self.upsert_delay {
            tokio::time::sleep(delay).await;
        }
        self.records
            .lock()
            .map_err(|_| Error::backend_write("scripted", &record.persistence_id, "poisoned"))?
            .insert(record.persistence_id.clone(), record.clone());
        Ok(())
    }

    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>> {
        self.ensure_connected()?;
        let records = self
            .records
            .lock()
            .map_err(|_| Error::backend_read("scripted", persistence_id, "poisoned"))?;
        Ok(records.get(persistence_id).cloned())
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}
