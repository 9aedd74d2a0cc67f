//! Backend-neutral record
//!
//! [`DurableStateRecord`] is the single row stored per persistence ID. Each
//! backend driver maps it to and from its native representation; the
//! facade builds one per write and decodes one per read, never caching it.

use crate::codec::PayloadCodec;
use crate::error::{Error, Result};
use crate::value_objects::DurableState;

/// One stored row, keyed by `persistence_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurableStateRecord {
    /// Primary / partition key, never empty
    pub persistence_id: String,
    /// Caller-supplied write counter
    pub version_number: u64,
    /// Encoded envelope bytes
    pub state_payload: Vec<u8>,
    /// Fully-qualified type name used to select the decoder
    pub state_manifest: String,
    /// Producer wall-clock time in nanoseconds
    pub timestamp: i64,
    /// Opaque routing hint
    pub shard_number: u64,
}

impl DurableStateRecord {
    /// Encode a durable state into a record
    pub fn from_state(codec: &PayloadCodec, state: &DurableState) -> Result<Self> {
        validate_persistence_id(&state.persistence_id)?;
        let encoded = codec.encode(state.state.as_ref())?;
        Ok(Self {
            persistence_id: state.persistence_id.clone(),
            version_number: state.version_number,
            state_payload: encoded.payload,
            state_manifest: encoded.manifest,
            timestamp: state.timestamp,
            shard_number: state.shard,
        })
    }

    /// Decode the record back into a typed durable state
    pub fn into_state(self, codec: &PayloadCodec) -> Result<DurableState> {
        let state = codec.decode(&self.state_manifest, &self.state_payload)?;
        Ok(DurableState::from_shared(
            self.persistence_id,
            self.version_number,
            state,
            self.timestamp,
            self.shard_number,
        ))
    }
}

/// Reject empty persistence IDs before they reach a backend
pub fn validate_persistence_id(persistence_id: &str) -> Result<()> {
    if persistence_id.is_empty() {
        return Err(Error::invalid_argument("persistence_id cannot be empty"));
    }
    Ok(())
}
