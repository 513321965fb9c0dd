//! Orchestration engine contract: run discovery and terminal-status waits.

use std::time::Duration;

use tracing::debug;

use crate::api::{OrchestrationApi, RunStatus, RunSummary};
use crate::error::CloudResult;

/// Find the first run in the engine's history whose name starts with
/// `name_prefix`. `None` when no run matches.
pub async fn find_run(
    api: &impl OrchestrationApi,
    engine: &str,
    name_prefix: &str,
) -> CloudResult<Option<RunSummary>> {
    let runs = api.list_runs(engine).await?;
    Ok(runs.into_iter().find(|run| run.name.starts_with(name_prefix)))
}

/// Poll a run until it reports a terminal status.
///
/// One status fetch per poll, `poll_interval` apart, at most `poll_budget`
/// polls. The caller's `progress` callback is invoked once per poll with the
/// observed status. Returns `Ok(None)` when the budget is exhausted with the
/// run still active; there is no other cancellation path.
pub async fn wait_for_terminal(
    api: &impl OrchestrationApi,
    run: &RunSummary,
    poll_interval: Duration,
    poll_budget: u32,
    mut progress: impl FnMut(RunStatus),
) -> CloudResult<Option<RunStatus>> {
    for poll in 0..poll_budget {
        let status = api.describe_run(&run.id).await?;
        progress(status);

        if status.is_terminal() {
            debug!(run = %run.name, poll, ?status, "run reached terminal status");
            return Ok(Some(status));
        }

        tokio::time::sleep(poll_interval).await;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn find_run_matches_by_prefix() {
        let mut mock = MockProvider::default();
        mock.add_run("proj-cfg-web-rel1-20260801", "run-1");
        mock.add_run("proj-cfg-web-rel2-20260802", "run-2");

        let run = find_run(&mock, "deployer", "proj-cfg-web-rel2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(run.id, "run-2");

        let missing = find_run(&mock, "deployer", "proj-cfg-web-rel9")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn wait_reports_each_poll_until_terminal() {
        let mut mock = MockProvider::default();
        mock.add_run("proj-cfg-web-rel1", "run-1");
        mock.script_run_statuses(&[RunStatus::Running, RunStatus::Running, RunStatus::Halted]);

        let run = RunSummary {
            name: "proj-cfg-web-rel1".to_string(),
            id: "run-1".to_string(),
        };
        let mut seen = Vec::new();
        let status = wait_for_terminal(&mock, &run, Duration::from_millis(1), 10, |s| {
            seen.push(s);
        })
        .await
        .unwrap();

        assert_eq!(status, Some(RunStatus::Halted));
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_returns_none() {
        let mut mock = MockProvider::default();
        mock.script_run_statuses(&[RunStatus::Running; 5]);

        let run = RunSummary {
            name: "proj-cfg-web-rel1".to_string(),
            id: "run-1".to_string(),
        };
        let status = wait_for_terminal(&mock, &run, Duration::from_millis(1), 3, |_| {})
            .await
            .unwrap();
        assert_eq!(status, None);
    }
}
