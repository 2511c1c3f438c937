use anyhow::bail;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::InvocationContext;
use crate::github::{ActionsApi, Run};

/// How many times the run listing is checked before giving up.
const DISCOVERY_ATTEMPTS: u32 = 30;

/// Pacing between discovery attempts.
const DISCOVERY_INTERVAL: Duration = Duration::from_secs(2);

/// Only runs created within this window before the check are eligible.
const RECENCY_WINDOW_SECS: i64 = 60;

/// Whether the run was created within the recency window before `now`.
///
/// Guards against correlating a stale prior run that happens to still be the
/// most recent one on a quiet branch.
pub fn created_recently(run: &Run, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(run.created_at) < TimeDelta::seconds(RECENCY_WINDOW_SECS)
}

/// Discovers the run the dispatch produced.
///
/// The dispatch call returns no run id, so this repeatedly lists the most
/// recent run of the workflow on the target branch until one shows up that
/// was created within the last minute. The correlation is heuristic; the API
/// offers no stronger identifier.
///
/// # Errors
///
/// Returns an error if a listing call fails, or if no eligible run appeared
/// within the discovery budget.
pub async fn correlate_run<A: ActionsApi>(
    api: &A,
    ctx: &InvocationContext,
    workflow_id: u64,
) -> anyhow::Result<Run> {
    let branch = ctx.branch();

    for attempt in 1..=DISCOVERY_ATTEMPTS {
        debug!(
            "looking for a fresh run of workflow {workflow_id} on {branch} \
             ({attempt}/{DISCOVERY_ATTEMPTS})…"
        );
        let runs = api
            .list_runs(&ctx.owner, &ctx.repo, workflow_id, branch, 1)
            .await?;

        if let Some(run) = runs.first() {
            if created_recently(run, Utc::now()) {
                info!("found run {} created at {}", run.id, run.created_at);
                return Ok(run.clone());
            }
        }
        sleep(DISCOVERY_INTERVAL).await;
    }

    bail!("no new run of workflow {workflow_id} on {branch} appeared within the discovery window")
}
