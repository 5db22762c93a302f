//! Composite health report.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;

use super::gtg::StatusChecker;

/// Result of one collection's check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    #[serde(rename = "checkOutput")]
    pub output: String,
}

/// All checks, plus an overall verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub name: String,
    pub description: String,
    pub ok: bool,
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    /// Run every check concurrently and collect the individual results.
    pub async fn run<C>(name: &str, description: &str, checkers: &[Arc<C>]) -> Self
    where
        C: StatusChecker + ?Sized,
    {
        let statuses = join_all(checkers.iter().map(|c| c.check())).await;

        let checks: Vec<CheckResult> = checkers
            .iter()
            .zip(statuses)
            .map(|(checker, status)| CheckResult {
                name: checker.name().to_string(),
                ok: status.good_to_go,
                output: status.message.unwrap_or_else(|| "OK".to_string()),
            })
            .collect();

        Self {
            name: name.to_string(),
            description: description.to_string(),
            ok: checks.iter().all(|c| c.ok),
            checks,
        }
    }

    /// Checks that did not pass.
    pub fn failing(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.ok)
    }
}
