//! Durable State Store Port
//!
//! The contract the actor runtime calls. Implemented by the application
//! layer's `DurableStore` facade.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{CallContext, DurableState};

/// Durable state store
///
/// # Lifecycle
///
/// `connect` and `disconnect` are idempotent; `ping` connects lazily when
/// disconnected. Writes and reads never connect implicitly.
///
/// # Example
///
/// ```ignore
/// let ctx = CallContext::background();
/// store.connect(&ctx).await?;
/// store.write_state(&ctx, &DurableState::new("account_1", 1, account, now, 1)).await?;
/// match store.get_latest_state(&ctx, "account_1").await? {
///     Some(latest) => println!("{:?}", latest.state_as::<Account>()),
///     None => println!("never written"),
/// }
/// ```
#[async_trait]
pub trait DurableStateStore: Send + Sync {
    /// Open the backend connection
    async fn connect(&self, ctx: &CallContext) -> Result<()>;

    /// Close the backend connection
    async fn disconnect(&self, ctx: &CallContext) -> Result<()>;

    /// Verify the store is usable, connecting if necessary
    async fn ping(&self, ctx: &CallContext) -> Result<()>;

    /// Persist the latest state for `state.persistence_id`, replacing any previous one
    async fn write_state(&self, ctx: &CallContext, state: &DurableState) -> Result<()>;

    /// Fetch the latest state; `Ok(None)` when the persistence ID was never written
    async fn get_latest_state(
        &self,
        ctx: &CallContext,
        persistence_id: &str,
    ) -> Result<Option<DurableState>>;
}
