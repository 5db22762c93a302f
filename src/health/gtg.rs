//! Good-to-go (readiness) aggregation.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::service::ServiceError;

/// Outcome of one or many liveness checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub good_to_go: bool,
    pub message: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Self {
            good_to_go: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            good_to_go: false,
            message: Some(message.into()),
        }
    }
}

impl From<Result<(), ServiceError>> for Status {
    fn from(result: Result<(), ServiceError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

/// A named liveness check.
#[async_trait]
pub trait StatusChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> Status;
}

/// Run all checks concurrently and return as soon as one fails.
///
/// Remaining checks are dropped once a failure is seen. With no checkers the
/// result is good to go.
pub async fn fail_fast_parallel_check<C>(checkers: &[Arc<C>]) -> Status
where
    C: StatusChecker + ?Sized,
{
    let mut pending: FuturesUnordered<_> = checkers.iter().map(|c| c.check()).collect();

    while let Some(status) = pending.next().await {
        if !status.good_to_go {
            return status;
        }
    }
    Status::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct FixedCheck {
        name: String,
        status: Status,
        delay: Duration,
        finished: AtomicBool,
    }

    impl FixedCheck {
        fn new(name: &str, status: Status, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                status,
                delay: Duration::from_millis(delay_ms),
                finished: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl StatusChecker for FixedCheck {
        fn name(&self) -> &str {
            &self.name
        }

        async fn check(&self) -> Status {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            self.status.clone()
        }
    }

    #[tokio::test]
    async fn test_all_ok() {
        let checks = vec![
            FixedCheck::new("a", Status::ok(), 0),
            FixedCheck::new("b", Status::ok(), 5),
        ];
        assert_eq!(fail_fast_parallel_check(&checks).await, Status::ok());
    }

    #[tokio::test]
    async fn test_no_checks_is_ok() {
        let checks: Vec<Arc<FixedCheck>> = Vec::new();
        assert!(fail_fast_parallel_check(&checks).await.good_to_go);
    }

    #[tokio::test]
    async fn test_single_failure_surfaces_message() {
        let checks = vec![
            FixedCheck::new("a", Status::ok(), 0),
            FixedCheck::new("b", Status::failed("db down"), 0),
        ];
        let status = fail_fast_parallel_check(&checks).await;
        assert!(!status.good_to_go);
        assert_eq!(status.message.as_deref(), Some("db down"));
    }

    #[tokio::test]
    async fn test_fails_fast_without_waiting_for_slow_checks() {
        let slow = FixedCheck::new("slow", Status::ok(), 5_000);
        let checks = vec![slow.clone(), FixedCheck::new("broken", Status::failed("broken"), 0)];

        let status = tokio::time::timeout(Duration::from_secs(1), fail_fast_parallel_check(&checks))
            .await
            .expect("aggregate should not wait for the slow check");
        assert_eq!(status, Status::failed("broken"));
        assert!(!slow.finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_status_from_result() {
        assert_eq!(Status::from(Ok(())), Status::ok());
        assert_eq!(
            Status::from(Err(ServiceError::unavailable("db down"))),
            Status::failed("db down")
        );
    }
}
