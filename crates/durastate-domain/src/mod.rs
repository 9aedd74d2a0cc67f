//! # durastate domain
//!
//! Backend-agnostic core of the durable state store: the record model, the
//! payload codec, the error taxonomy and the ports implemented by the
//! application and provider layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`codec`] | Protobuf payload codec with an injectable type registry |
//! | [`value_objects`] | Durable state, stored record, call context |
//! | [`ports`] | Backend driver and store contracts |
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`constants`] | Persisted table, column and attribute names |

pub mod codec;
pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use codec::{EncodedState, PayloadCodec, StateMessage, TypeRegistry};
pub use error::{CancellationCause, Error, Result};
pub use ports::{DurableStateStore, Lifecycle, StateStoreBackend};
pub use value_objects::{CallContext, DurableState, DurableStateRecord};
