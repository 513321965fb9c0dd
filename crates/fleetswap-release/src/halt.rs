//! Halt orchestration: cooperative stop of an in-flight release run.
//!
//! Halting signals, it does not kill. The halting flag is written to
//! durable storage and the in-flight run is expected to observe it at its
//! next checkpoint and self-terminate; this module only watches for that to
//! happen, within a fixed poll budget.

use std::time::Duration;

use tracing::{debug, info};

use fleetswap_cloud::api::{OrchestrationApi, RunStatus, StorageApi};
use fleetswap_cloud::orchestration::{find_run, wait_for_terminal};

use crate::descriptor::ReleaseSpec;
use crate::error::{ReleaseError, ReleaseResult};

/// Separator joining the identity fields into a run name.
///
/// The convention must stay bit-exact: runs created under it are discovered
/// by prefix, and changing it strands every in-flight run.
const RUN_NAME_SEPARATOR: &str = "-";

/// Poll pacing and budget for the terminal-status wait.
#[derive(Debug, Clone, Copy)]
pub struct HaltOptions {
    pub poll_interval: Duration,
    pub poll_budget: u32,
}

impl Default for HaltOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            poll_budget: 120,
        }
    }
}

/// The deterministic prefix of the orchestration run driving this release.
pub fn run_name_prefix(release: &ReleaseSpec) -> String {
    [
        release.project_name.as_str(),
        release.config_name.as_str(),
        release.service_name.as_str(),
        release.release_id.as_str(),
    ]
    .join(RUN_NAME_SEPARATOR)
}

/// Durable-storage key of the release's halting flag.
pub fn halt_flag_key(release: &ReleaseSpec) -> String {
    format!(
        "{}/{}/{}/{}/halt",
        release.project_name, release.config_name, release.service_name, release.release_id
    )
}

/// Ask the release's in-flight orchestration run to stop, then wait for it
/// to reach a terminal status.
///
/// The run is located in `engine`'s history by the release's naming prefix;
/// no matching run fails with [`ReleaseError::RunNotFound`] before any flag
/// is written. `progress` is invoked once per poll with the observed status.
/// Exhausting the poll budget fails with [`ReleaseError::RunStillActive`];
/// wrapping the call in an external timeout is the only earlier exit.
pub async fn halt(
    orchestration: &impl OrchestrationApi,
    storage: &impl StorageApi,
    engine: &str,
    release: &ReleaseSpec,
    options: HaltOptions,
    progress: impl FnMut(RunStatus),
) -> ReleaseResult<RunStatus> {
    let prefix = run_name_prefix(release);

    let run = find_run(orchestration, engine, &prefix)
        .await?
        .ok_or_else(|| ReleaseError::RunNotFound(prefix.clone()))?;
    debug!(run = %run.name, "found in-flight run");

    let flag = serde_json::json!({ "halt": true }).to_string();
    storage.put_object(&halt_flag_key(release), flag.as_bytes()).await?;
    info!(
        release = %release.release_id,
        service = %release.service_name,
        "halting flag written, waiting for run to stop"
    );

    let status = wait_for_terminal(
        orchestration,
        &run,
        options.poll_interval,
        options.poll_budget,
        progress,
    )
    .await?
    .ok_or(ReleaseError::RunStillActive {
        prefix,
        polls: options.poll_budget,
    })?;

    info!(run = %run.name, ?status, "run stopped");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetswap_cloud::mock::MockProvider;

    fn release() -> ReleaseSpec {
        ReleaseSpec {
            project_name: "project".to_string(),
            config_name: "config".to_string(),
            service_name: "service".to_string(),
            release_id: "rel-1".to_string(),
            image: "service-image".to_string(),
            profile: None,
            security_groups: vec![],
            load_balancers: vec![],
            target_groups: vec![],
            subnets: vec![],
        }
    }

    fn fast() -> HaltOptions {
        HaltOptions {
            poll_interval: Duration::from_millis(1),
            poll_budget: 10,
        }
    }

    #[test]
    fn prefix_joins_all_four_identity_fields() {
        assert_eq!(run_name_prefix(&release()), "project-config-service-rel-1");
    }

    #[tokio::test]
    async fn halts_a_running_release() {
        let mut mock = MockProvider::default();
        mock.add_run("project-config-service-rel-1-20260806", "run-1");
        mock.script_run_statuses(&[
            RunStatus::Running,
            RunStatus::Running,
            RunStatus::Halted,
        ]);

        let mut polls = 0;
        let status = halt(&mock, &mock, "deployer", &release(), fast(), |_| {
            polls += 1;
        })
        .await
        .unwrap();

        assert_eq!(status, RunStatus::Halted);
        assert_eq!(polls, 3);
        assert_eq!(
            mock.written_keys(),
            vec!["project/config/service/rel-1/halt".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_run_writes_no_flag() {
        let mut mock = MockProvider::default();
        mock.add_run("project-config-service-rel-9-20260806", "run-9");

        let err = halt(&mock, &mock, "deployer", &release(), fast(), |_| {})
            .await
            .unwrap_err();
        match err {
            ReleaseError::RunNotFound(prefix) => {
                assert_eq!(prefix, "project-config-service-rel-1");
            }
            other => panic!("expected RunNotFound, got {other:?}"),
        }
        assert!(mock.written_keys().is_empty());
    }

    #[tokio::test]
    async fn exhausted_budget_reports_still_active() {
        let mut mock = MockProvider::default();
        mock.add_run("project-config-service-rel-1-20260806", "run-1");
        mock.script_run_statuses(&[RunStatus::Running; 20]);

        let options = HaltOptions {
            poll_interval: Duration::from_millis(1),
            poll_budget: 3,
        };
        let err = halt(&mock, &mock, "deployer", &release(), options, |_| {})
            .await
            .unwrap_err();
        match err {
            ReleaseError::RunStillActive { polls, .. } => assert_eq!(polls, 3),
            other => panic!("expected RunStillActive, got {other:?}"),
        }
        // The flag write happened before the wait; signaling is best-effort.
        assert_eq!(mock.written_keys().len(), 1);
    }
}
