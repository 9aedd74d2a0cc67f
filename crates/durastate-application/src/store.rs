//! Durable Store Facade
//!
//! Composes the [`PayloadCodec`] with one backend driver and exposes the
//! [`DurableStateStore`] contract.
//!
//! ## Lifecycle
//!
//! | State | `connect` | `disconnect` | `ping` |
//! |-------|-----------|--------------|--------|
//! | Disconnected | open session | no-op | open session |
//! | Connected | no-op | close session | no-op |
//!
//! A failed or cancelled `disconnect` still leaves the store `Disconnected`.
//! Stateless backends start and stay `Connected`; every lifecycle call is a
//! no-op for them. Transitions are serialised by an async mutex so that
//! concurrent `connect` calls open at most one session. Reads and writes do
//! not take that lock and never connect implicitly.

use std::sync::Arc;

use async_trait::async_trait;
use durastate_domain::codec::{PayloadCodec, TypeRegistry};
use durastate_domain::error::Result;
use durastate_domain::ports::{DurableStateStore, Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::{
    CallContext, DurableState, DurableStateRecord, validate_persistence_id,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::guard::{check_entry, guarded};

/// Connection state of the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No live backend session
    Disconnected,
    /// Backend session open, or the backend is stateless
    Connected,
}

/// Durable state store over one backend driver
pub struct DurableStore {
    backend: Arc<dyn StateStoreBackend>,
    codec: PayloadCodec,
    state: Mutex<LifecycleState>,
}

impl DurableStore {
    /// Create a store over `backend`, decoding with the types in `registry`
    pub fn new(backend: Arc<dyn StateStoreBackend>, registry: Arc<TypeRegistry>) -> Self {
        let initial = match backend.lifecycle() {
            Lifecycle::Stateless => LifecycleState::Connected,
            Lifecycle::Session => LifecycleState::Disconnected,
        };
        Self {
            backend,
            codec: PayloadCodec::new(registry),
            state: Mutex::new(initial),
        }
    }

    /// Name of the backing driver
    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// The payload codec
    pub fn codec(&self) -> &PayloadCodec {
        &self.codec
    }

    /// Current lifecycle state
    pub async fn lifecycle_state(&self) -> LifecycleState {
        *self.state.lock().await
    }

    /// Fetch the stored record without decoding it
    ///
    /// Used by operator tooling that inspects records of types the process
    /// has not registered.
    pub async fn get_latest_record(
        &self,
        ctx: &CallContext,
        persistence_id: &str,
    ) -> Result<Option<DurableStateRecord>> {
        self.fetch(ctx, "get_latest_record", persistence_id).await
    }

    async fn fetch(
        &self,
        ctx: &CallContext,
        operation: &str,
        persistence_id: &str,
    ) -> Result<Option<DurableStateRecord>> {
        validate_persistence_id(persistence_id)?;
        guarded(ctx, operation, self.backend.get_by_key(persistence_id)).await
    }

    async fn persist(&self, state: &DurableState) -> Result<()> {
        let record = DurableStateRecord::from_state(&self.codec, state)?;
        self.backend.upsert(&record).await?;
        debug!(
            backend = self.backend_name(),
            persistence_id = %record.persistence_id,
            version = record.version_number,
            manifest = %record.state_manifest,
            "state written"
        );
        Ok(())
    }

    async fn open(&self, ctx: &CallContext, operation: &str) -> Result<()> {
        if self.backend.lifecycle() == Lifecycle::Stateless {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if *state == LifecycleState::Connected {
            debug!(backend = self.backend_name(), operation, "already connected");
            return Ok(());
        }

        match guarded(ctx, operation, self.backend.connect()).await {
            Ok(()) => {
                *state = LifecycleState::Connected;
                info!(backend = self.backend_name(), "durable store connected");
                Ok(())
            }
            Err(e) => {
                warn!(backend = self.backend_name(), error = %e, "durable store connect failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("backend", &self.backend_name())
            .field("lifecycle", &self.backend.lifecycle())
            .field("registry", self.codec.registry())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DurableStateStore for DurableStore {
    async fn connect(&self, ctx: &CallContext) -> Result<()> {
        self.open(ctx, "connect").await
    }

    async fn disconnect(&self, ctx: &CallContext) -> Result<()> {
        if self.backend.lifecycle() == Lifecycle::Stateless {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if *state == LifecycleState::Disconnected {
            debug!(backend = self.backend_name(), "already disconnected");
            return Ok(());
        }

        check_entry(ctx, "disconnect")?;
        // A cancelled teardown may have already dropped the session, so the
        // next connect or ping must reopen it.
        *state = LifecycleState::Disconnected;
        guarded(ctx, "disconnect", self.backend.disconnect()).await?;
        info!(backend = self.backend_name(), "durable store disconnected");
        Ok(())
    }

    async fn ping(&self, ctx: &CallContext) -> Result<()> {
        self.open(ctx, "ping").await
    }

    async fn write_state(&self, ctx: &CallContext, state: &DurableState) -> Result<()> {
        guarded(ctx, "write_state", self.persist(state)).await
    }

    async fn get_latest_state(
        &self,
        ctx: &CallContext,
        persistence_id: &str,
    ) -> Result<Option<DurableState>> {
        let Some(record) = self
            .fetch(ctx, "get_latest_state", persistence_id)
            .await?
        else {
            debug!(backend = self.backend_name(), persistence_id, "no state stored");
            return Ok(None);
        };

        debug!(
            backend = self.backend_name(),
            persistence_id,
            version = record.version_number,
            manifest = %record.state_manifest,
            "state read"
        );
        record.into_state(&self.codec).map(Some)
    }
}
