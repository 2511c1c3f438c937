//! The runner-facing binary: reads the environment, runs the invocation,
//! and maps the outcome to an exit code.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use workflow_dispatch::config::{ActionInputs, InvocationContext};
use workflow_dispatch::github::client::GithubClient;
use workflow_dispatch::output::GithubOutput;
use workflow_dispatch::transactions::{absorb_disabled_workflow, run};

#[tokio::main]
async fn main() -> ExitCode {
    let debug = env::var("RUNNER_DEBUG").is_ok_and(|value| value == "1");
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
    info!("workflow-dispatch v{}", env!("CARGO_PKG_VERSION"));

    match absorb_disabled_workflow(invoke(debug).await) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn invoke(debug: bool) -> anyhow::Result<()> {
    let inputs = ActionInputs::from_env()?;
    let ambient_repo = env::var("GITHUB_REPOSITORY").unwrap_or_default();
    let ambient_ref = env::var("GITHUB_REF").unwrap_or_default();

    let client = GithubClient::new(inputs.token.clone());
    let ctx = InvocationContext::resolve(inputs, &ambient_repo, &ambient_ref, debug)?;
    let mut outputs = GithubOutput::from_env();
    run(&client, &ctx, &mut outputs).await
}
