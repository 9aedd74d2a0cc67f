//! State Type Registry
//!
//! Maps a manifest (fully-qualified protobuf name) to the decoder for that
//! message type. The registry is built once at startup, frozen behind an
//! `Arc` and handed to the [`PayloadCodec`](super::PayloadCodec); there is
//! no ambient global table and no removal.
//!
//! ```ignore
//! use durastate_domain::codec::TypeRegistry;
//!
//! let registry = TypeRegistry::new()
//!     .with::<Account>()
//!     .with::<Wallet>();
//! assert!(registry.contains("sample.Account"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use prost::{DecodeError, Message, Name};

use super::message::StateMessage;

/// Decoder registered for one message type
pub type DecodeFn = fn(&[u8]) -> Result<Arc<dyn StateMessage>, DecodeError>;

fn decode_as<M>(bytes: &[u8]) -> Result<Arc<dyn StateMessage>, DecodeError>
where
    M: Message + Name + Default + 'static,
{
    let message = M::decode(bytes)?;
    Ok(Arc::new(message))
}

/// Manifest-keyed table of decoders
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `M` under its fully-qualified name
    ///
    /// Registering the same type twice is harmless.
    pub fn register<M>(&mut self) -> &mut Self
    where
        M: Message + Name + Default + 'static,
    {
        self.decoders
            .insert(M::full_name(), decode_as::<M> as DecodeFn);
        self
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with<M>(mut self) -> Self
    where
        M: Message + Name + Default + 'static,
    {
        self.register::<M>();
        self
    }

    /// Look up the decoder for a manifest
    pub fn resolve(&self, manifest: &str) -> Option<DecodeFn> {
        self.decoders.get(manifest).copied()
    }

    /// Whether a manifest is registered
    pub fn contains(&self, manifest: &str) -> bool {
        self.decoders.contains_key(manifest)
    }

    /// Registered manifests, sorted
    pub fn manifests(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Freeze the registry for sharing with codecs
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("manifests", &self.manifests())
            .finish()
    }
}
