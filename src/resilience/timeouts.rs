//! Deadline enforcement for protocol exchanges.
//!
//! The protocol has no timeout of its own. A peer can hold a connection
//! open forever without reaching the body cap, so the gateway bounds the
//! whole exchange. With no deadline configured the future runs to
//! completion unbounded.

use std::future::Future;
use std::time::Duration;

/// Run `fut`, giving up after `deadline` if one is set.
///
/// On expiry the future is dropped, which closes any connection it owns,
/// and the deadline is returned as the error.
pub async fn with_deadline<F, T>(deadline: Option<Duration>, fut: F) -> Result<T, Duration>
where
    F: Future<Output = T>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}
