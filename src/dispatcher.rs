//! Bounded concurrent execution of independent per-item operations.
//!
//! [`dispatch`] runs one operation per item with at most `max_concurrent` in
//! flight. Each operation is spawned as its own task only once a slot is free,
//! so a slow item holds its own slot and nothing else. A failed or panicked
//! item is logged and dropped; the rest of the batch carries on.
//!
//! Results come back in completion order, not input order.

use futures::stream::{self, StreamExt};
use std::fmt::Display;
use std::future::Future;
use tracing::{error, info, instrument, warn};

/// Concurrency used when the caller does not specify one.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Run `op` over `items` with at most `max_concurrent` operations in flight.
///
/// A limit of zero is treated as one.
///
/// # Returns
///
/// The `Ok` values of every operation that succeeded.
#[instrument(level = "info", skip_all, fields(items = items.len(), max_concurrent = max_concurrent))]
pub async fn dispatch<I, F, Fut, T, E>(items: Vec<I>, max_concurrent: usize, op: F) -> Vec<T>
where
    I: Display,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let total = items.len();
    let limit = max_concurrent.max(1);

    let results: Vec<T> = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let label = item.to_string();
            let handle = tokio::spawn(op(item));
            async move { (index, label, handle.await) }
        })
        .buffer_unordered(limit)
        .filter_map(|(index, label, joined)| async move {
            match joined {
                Ok(Ok(value)) => Some(value),
                Ok(Err(e)) => {
                    warn!(index, item = %label, error = %e, "Item failed; dropping");
                    None
                }
                Err(e) => {
                    error!(index, item = %label, error = %e, "Item task aborted; dropping");
                    None
                }
            }
        })
        .collect()
        .await;

    info!(
        total,
        succeeded = results.len(),
        failed = total - results.len(),
        "Batch complete"
    );
    results
}
