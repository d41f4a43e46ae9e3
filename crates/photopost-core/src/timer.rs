//! Executor-agnostic timeouts.
//!
//! The core never spawns tasks or owns a runtime; a caller that wants stage
//! timeouts supplies a `Timer` backed by whatever clock its event loop has.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::{select, Either};

/// Source of delays on the caller's event loop.
#[async_trait(?Send)]
pub trait Timer {
    /// Complete after `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// Race `future` against `limit` on `timer`.
///
/// Returns `None` if the limit elapsed first. Without a timer or a limit the
/// future simply runs to completion.
pub async fn with_timeout<F: Future>(
    timer: Option<&dyn Timer>,
    limit: Option<Duration>,
    future: F,
) -> Option<F::Output> {
    let (timer, limit) = match (timer, limit) {
        (Some(timer), Some(limit)) => (timer, limit),
        _ => return Some(future.await),
    };

    let future = pin!(future);
    match select(future, timer.sleep(limit)).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::TokioTimer;
    use super::*;

    #[tokio::test]
    async fn test_without_timer_runs_to_completion() {
        let result = with_timeout(None, Some(Duration::from_millis(1)), async { 7 }).await;
        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn test_without_limit_runs_to_completion() {
        let result = with_timeout(Some(&TokioTimer), None, async { "done" }).await;
        assert_eq!(result, Some("done"));
    }

    #[tokio::test]
    async fn test_fast_future_wins() {
        let result = with_timeout(Some(&TokioTimer), Some(Duration::from_secs(5)), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            42
        })
        .await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_slow_future_times_out() {
        let result = with_timeout(
            Some(&TokioTimer),
            Some(Duration::from_millis(10)),
            std::future::pending::<()>(),
        )
        .await;
        assert_eq!(result, None);
    }
}
