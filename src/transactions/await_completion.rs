use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::InvocationContext;
use crate::github::{ActionsApi, Run};

/// Default pacing between completion polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls the correlated run by id until its status reaches the terminal
/// value, returning the final snapshot.
///
/// There is deliberately no attempt cap; the only bound on this loop is the
/// host's own overall invocation timeout. The interval is a parameter so
/// hosts can pace it to their own ceiling.
///
/// # Errors
///
/// Returns an error if a fetch of the run fails.
pub async fn await_completion<A: ActionsApi>(
    api: &A,
    ctx: &InvocationContext,
    run_id: u64,
    interval: Duration,
) -> anyhow::Result<Run> {
    let mut run = api.get_run(&ctx.owner, &ctx.repo, run_id).await?;
    while !run.is_completed() {
        debug!(
            "run {run_id} is {}, checking again in {}s…",
            run.status,
            interval.as_secs()
        );
        sleep(interval).await;
        run = api.get_run(&ctx.owner, &ctx.repo, run_id).await?;
    }
    info!(
        "run {run_id} completed with conclusion {}",
        run.conclusion.as_deref().unwrap_or("none")
    );
    Ok(run)
}
