//! Payload Codec
//!
//! Turns a typed state message into `(manifest, bytes)` and back.
//!
//! ## Wire layout
//!
//! | Field | Content |
//! |-------|---------|
//! | manifest | fully-qualified name of the application message |
//! | payload | `google.protobuf.Any` envelope wrapping the message |
//!
//! ## Decode order
//!
//! 1. registry lookup by manifest ([`Error::UnknownType`])
//! 2. parse the envelope ([`Error::Decoding`])
//! 3. envelope type URL must name the manifest type ([`Error::Unpack`])
//! 4. parse the inner message ([`Error::Decoding`])
//!
//! Records whose manifest is the envelope type itself resolve the concrete
//! type from the envelope's type URL instead.

/// Type-erased message trait
pub mod message;
/// Manifest-keyed decoder registry
pub mod registry;

use std::sync::Arc;

use prost::Message;
use prost_types::Any;

use crate::constants::ENVELOPE_MANIFEST;
use crate::error::{Error, Result};

pub use message::{StateMessage, type_name_from_url};
pub use registry::{DecodeFn, TypeRegistry};

/// Output of [`PayloadCodec::encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedState {
    /// Fully-qualified type name of the wrapped message
    pub manifest: String,
    /// Encoded envelope bytes
    pub payload: Vec<u8>,
}

/// Codec for state payloads backed by an injected [`TypeRegistry`]
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    registry: Arc<TypeRegistry>,
}

impl PayloadCodec {
    /// Create a codec over a frozen registry
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// The registry used for decoding
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Serialize a message wrapped in the polymorphic envelope
    pub fn encode(&self, state: &dyn StateMessage) -> Result<EncodedState> {
        let manifest = state.manifest();
        if manifest.is_empty() {
            return Err(Error::encoding_msg(
                manifest,
                "state message has no fully-qualified type name",
            ));
        }

        let envelope = Any {
            type_url: state.type_url(),
            value: state.encode_message(),
        };
        let mut payload = Vec::with_capacity(envelope.encoded_len());
        envelope
            .encode(&mut payload)
            .map_err(|e| Error::encoding(&manifest, "failed to encode envelope", e))?;

        Ok(EncodedState { manifest, payload })
    }

    /// Reconstruct the message named by `manifest` from `payload`
    pub fn decode(&self, manifest: &str, payload: &[u8]) -> Result<Arc<dyn StateMessage>> {
        let declared = if manifest == ENVELOPE_MANIFEST {
            None
        } else {
            Some(
                self.registry
                    .resolve(manifest)
                    .ok_or_else(|| Error::unknown_type(manifest))?,
            )
        };

        let envelope = Any::decode(payload)
            .map_err(|e| Error::decoding(manifest, "payload is not a valid envelope", e))?;
        let carried = type_name_from_url(&envelope.type_url).ok_or_else(|| {
            Error::unpack(
                manifest,
                format!("envelope has no type name in '{}'", envelope.type_url),
            )
        })?;

        let decoder = match declared {
            Some(decoder) => {
                if carried != manifest {
                    return Err(Error::unpack(
                        manifest,
                        format!("envelope carries '{carried}'"),
                    ));
                }
                decoder
            }
            None => self
                .registry
                .resolve(carried)
                .ok_or_else(|| Error::unknown_type(carried))?,
        };

        decoder(&envelope.value)
            .map_err(|e| Error::decoding(carried, "failed to decode state message", e))
    }
}
