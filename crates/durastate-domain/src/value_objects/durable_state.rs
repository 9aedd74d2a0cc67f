//! Durable state exchanged with the actor runtime

use std::sync::Arc;

use crate::codec::StateMessage;

/// Latest materialized state of one persistence ID
///
/// The runtime hands one to `write_state` and receives one back from
/// `get_latest_state`. Version, timestamp and shard are caller-assigned and
/// returned verbatim; the store never interprets them.
#[derive(Debug, Clone)]
pub struct DurableState {
    /// Identity of the stateful entity
    pub persistence_id: String,
    /// Caller-supplied write counter
    pub version_number: u64,
    /// The typed application state
    pub state: Arc<dyn StateMessage>,
    /// Producer wall-clock time of the write, in nanoseconds
    pub timestamp: i64,
    /// Opaque routing hint
    pub shard: u64,
}

impl DurableState {
    /// Create a durable state from a concrete message
    pub fn new<P, M>(
        persistence_id: P,
        version_number: u64,
        state: M,
        timestamp: i64,
        shard: u64,
    ) -> Self
    where
        P: Into<String>,
        M: StateMessage,
    {
        Self {
            persistence_id: persistence_id.into(),
            version_number,
            state: Arc::new(state),
            timestamp,
            shard,
        }
    }

    /// Create a durable state from an already type-erased message
    pub fn from_shared<P: Into<String>>(
        persistence_id: P,
        version_number: u64,
        state: Arc<dyn StateMessage>,
        timestamp: i64,
        shard: u64,
    ) -> Self {
        Self {
            persistence_id: persistence_id.into(),
            version_number,
            state,
            timestamp,
            shard,
        }
    }

    /// Borrow the state as its concrete type, if it is one
    pub fn state_as<M: StateMessage>(&self) -> Option<&M> {
        self.state.downcast_ref::<M>()
    }

    /// Manifest of the carried state
    pub fn manifest(&self) -> String {
        self.state.manifest()
    }
}
