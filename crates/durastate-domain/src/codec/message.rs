//! Type-erased state messages
//!
//! The store persists any application message without compile-time
//! knowledge of its type. [`StateMessage`] is the object-safe view of a
//! protobuf message that the codec works with; every `prost` message that
//! also implements [`prost::Name`] gets it for free.

use std::fmt;

use downcast_rs::{DowncastSync, impl_downcast};
use prost::{Message, Name};

/// Object-safe protobuf message carried as durable state
///
/// Recover the concrete type with `downcast_ref::<M>()` or
/// `DurableState::state_as::<M>()`.
pub trait StateMessage: DowncastSync + fmt::Debug {
    /// Fully-qualified protobuf type name, e.g. `sample.Account`
    fn manifest(&self) -> String;

    /// Type URL written into the envelope, e.g. `/sample.Account`
    fn type_url(&self) -> String;

    /// Protobuf wire encoding of the message
    fn encode_message(&self) -> Vec<u8>;
}

impl_downcast!(sync StateMessage);

impl<M> StateMessage for M
where
    M: Message + Name + 'static,
{
    fn manifest(&self) -> String {
        M::full_name()
    }

    fn type_url(&self) -> String {
        M::type_url()
    }

    fn encode_message(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

/// Extract the type name from an envelope type URL
///
/// Accepts both `type.googleapis.com/pkg.Type` and `/pkg.Type`; returns
/// `None` when nothing follows the last `/` or the URL is empty.
pub fn type_name_from_url(type_url: &str) -> Option<&str> {
    let name = match type_url.rfind('/') {
        Some(idx) => &type_url[idx + 1..],
        None => type_url,
    };
    if name.is_empty() { None } else { Some(name) }
}
