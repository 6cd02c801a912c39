//! Re-running operations that lost a race in the store.

use std::time::Duration;

use engine::{EngineError, ResultEngine};

const BASE_DELAY: Duration = Duration::from_millis(5);

/// Runs `op`, re-running it up to `retries` more times while it fails with
/// [`EngineError::Conflict`]. Any other outcome is returned as is.
///
/// Engine operations roll back entirely on error, so a re-run starts from
/// the committed state.
pub(crate) async fn on_conflict<T, F, Fut>(retries: u32, label: &str, mut op: F) -> ResultEngine<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ResultEngine<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(err) if err.is_conflict() && attempt < retries => {
                attempt += 1;
                tracing::warn!(attempt, retries, "{label} conflicted, retrying: {err}");
                tokio::time::sleep(BASE_DELAY * attempt).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn conflict() -> EngineError {
        EngineError::Conflict("database is locked".to_string())
    }

    #[tokio::test]
    async fn succeeds_after_transient_conflicts() {
        let calls = AtomicU32::new(0);
        let result = on_conflict(3, "op", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_retries() {
        let calls = AtomicU32::new(0);
        let result: ResultEngine<()> = on_conflict(2, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;

        assert_eq!(result, Err(conflict()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: ResultEngine<()> = on_conflict(5, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(EngineError::InsufficientFunds("x".to_string()))
        })
        .await;

        assert!(matches!(result, Err(EngineError::InsufficientFunds(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_retries_runs_once() {
        let calls = AtomicU32::new(0);
        let result: ResultEngine<()> = on_conflict(0, "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
