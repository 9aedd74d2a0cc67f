//! Cancellation guard
//!
//! Races a backend round-trip against the caller's [`CallContext`]. When the
//! token fires or the deadline passes first, the in-flight future is dropped
//! and the call fails with [`Error::Cancelled`]; no background work is left
//! behind.

use std::future::Future;

use durastate_domain::error::{CancellationCause, Error, Result};
use durastate_domain::value_objects::CallContext;

/// Fail fast if the context already fired
pub fn check_entry(ctx: &CallContext, operation: &str) -> Result<()> {
    if ctx.is_cancelled() {
        return Err(Error::cancelled(operation, CancellationCause::Cancelled));
    }
    if ctx.is_expired() {
        return Err(Error::cancelled(
            operation,
            CancellationCause::DeadlineExceeded,
        ));
    }
    Ok(())
}

/// Run `future` unless `ctx` is cancelled or its deadline elapses first
pub async fn guarded<T, F>(ctx: &CallContext, operation: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    check_entry(ctx, operation)?;

    let deadline = async {
        match ctx.deadline() {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        () = ctx.token().cancelled() => {
            Err(Error::cancelled(operation, CancellationCause::Cancelled))
        }
        () = deadline => {
            Err(Error::cancelled(operation, CancellationCause::DeadlineExceeded))
        }
        result = future => result,
    }
}
