use tracing::{debug, info};

use crate::config::InvocationContext;
use crate::github::{ActionsApi, Workflow};

/// Issues the dispatch call for the located workflow, carrying the resolved
/// ref and the opaque inputs mapping.
///
/// The returned HTTP status is logged for diagnostics only; a successful
/// dispatch does not mean a run has started yet.
///
/// # Errors
///
/// Returns the API's rejection verbatim when the dispatch call fails.
pub async fn dispatch_workflow<A: ActionsApi>(
    api: &A,
    ctx: &InvocationContext,
    workflow: &Workflow,
) -> anyhow::Result<()> {
    debug!("dispatching workflow {} on {}…", workflow.id, ctx.r#ref);
    let status = api
        .dispatch(&ctx.owner, &ctx.repo, workflow.id, &ctx.r#ref, &ctx.inputs)
        .await?;
    info!(
        "dispatched workflow {} on {} (status {status})",
        workflow.id, ctx.r#ref
    );
    Ok(())
}
