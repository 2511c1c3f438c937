use anyhow::bail;
use tracing::{debug, info};

use crate::config::InvocationContext;
use crate::github::{ActionsApi, Workflow};

/// Finds the first workflow in listing order whose display name, stringified
/// numeric id, path filename, or full path equals the identifier.
pub fn find_workflow<'a>(workflows: &'a [Workflow], identifier: &str) -> Option<&'a Workflow> {
    workflows.iter().find(|workflow| {
        workflow.name == identifier
            || workflow.id.to_string() == identifier
            || workflow.path.ends_with(&format!("/{identifier}"))
            || workflow.path == identifier
    })
}

/// Fetches the repository's full workflow listing and resolves the
/// identifier against it.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched, or if no workflow
/// matches the identifier.
pub async fn locate_workflow<A: ActionsApi>(
    api: &A,
    ctx: &InvocationContext,
) -> anyhow::Result<Workflow> {
    debug!("resolving workflow `{}`…", ctx.workflow);
    let workflows = api.list_workflows(&ctx.owner, &ctx.repo).await?;

    if ctx.debug {
        debug!("### start workflow listing");
        debug!("{}", serde_json::to_string_pretty(&workflows)?);
        debug!("### end workflow listing");
    }

    match find_workflow(&workflows, &ctx.workflow) {
        Some(workflow) => {
            info!(
                "found workflow {} ({}) at {}",
                workflow.name, workflow.id, workflow.path
            );
            Ok(workflow.clone())
        }
        None => bail!(
            "no workflow matching `{}` in {}/{}",
            ctx.workflow,
            ctx.owner,
            ctx.repo
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::FakeApi;
    use crate::transactions::tests::context;

    fn workflow(id: u64, name: &str, path: &str) -> Workflow {
        Workflow {
            id,
            name: String::from(name),
            path: String::from(path),
        }
    }

    fn listing() -> Vec<Workflow> {
        vec![
            workflow(161335, "CI", ".github/workflows/ci.yml"),
            workflow(269289, "Deploy", ".github/workflows/deploy.yml"),
        ]
    }

    #[test]
    fn matches_by_display_name() {
        let workflows = listing();
        assert_eq!(find_workflow(&workflows, "Deploy").unwrap().id, 269289);
    }

    #[test]
    fn matches_by_numeric_id() {
        let workflows = listing();
        assert_eq!(find_workflow(&workflows, "269289").unwrap().name, "Deploy");
    }

    #[test]
    fn matches_by_path_filename() {
        let workflows = listing();
        assert_eq!(find_workflow(&workflows, "deploy.yml").unwrap().id, 269289);
    }

    #[test]
    fn matches_by_full_path() {
        let workflows = listing();
        assert_eq!(
            find_workflow(&workflows, ".github/workflows/ci.yml")
                .unwrap()
                .id,
            161335
        );
    }

    #[test]
    fn earliest_listing_entry_wins_when_several_match() {
        // The second entry matches by name, the first by filename; API order
        // decides, not which predicate fired.
        let workflows = vec![
            workflow(1, "Nightly", ".github/workflows/deploy.yml"),
            workflow(2, "deploy.yml", ".github/workflows/other.yml"),
        ];
        assert_eq!(find_workflow(&workflows, "deploy.yml").unwrap().id, 1);
    }

    #[test]
    fn no_match_returns_none() {
        assert!(find_workflow(&listing(), "release.yml").is_none());
    }

    #[tokio::test]
    async fn missing_workflow_names_identifier_owner_and_repo() {
        let api = FakeApi::with_workflows(listing());
        let ctx = context("release.yml");
        let message = locate_workflow(&api, &ctx).await.unwrap_err().to_string();
        assert!(message.contains("release.yml"), "{message}");
        assert!(message.contains("octo"), "{message}");
        assert!(message.contains("hello"), "{message}");
    }

    #[tokio::test]
    async fn resolves_against_the_fetched_listing() {
        let api = FakeApi::with_workflows(listing());
        let ctx = context("Deploy");
        let found = locate_workflow(&api, &ctx).await.unwrap();
        assert_eq!(found.id, 269289);
    }
}
