//! Action inputs and their resolution into an immutable invocation context.

use std::env;

use anyhow::{Context as _, bail};
use serde_json::{Map, Value};

/// The raw inputs of one invocation, as supplied by the host.
#[derive(Debug, Default, Clone)]
pub struct ActionInputs {
    /// Name, numeric id, or path/filename of the target workflow.
    pub workflow: String,
    /// Credential for the API calls.
    pub token: String,
    /// Branch, tag or SHA to run the workflow against.
    pub r#ref: Option<String>,
    /// Target repository as `owner/repo`.
    pub repo: Option<String>,
    /// Raw JSON object string forwarded to the triggered workflow.
    pub inputs: Option<String>,
}

impl ActionInputs {
    /// Reads the inputs from the runner's `INPUT_*` environment variables.
    ///
    /// Optional inputs that are unset or empty are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `workflow` or `token` is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            workflow: input("workflow").context("required input `workflow` is not set")?,
            token: input("token").context("required input `token` is not set")?,
            r#ref: input("ref"),
            repo: input("repo"),
            inputs: input("inputs"),
        })
    }
}

fn input(name: &str) -> Option<String> {
    env::var(format!("INPUT_{}", name.to_uppercase()))
        .ok()
        .filter(|value| !value.is_empty())
}

/// Everything one invocation needs, resolved once at the start and held
/// immutably for its duration.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub owner: String,
    pub repo: String,
    pub r#ref: String,
    /// The workflow identifier, matched by name, id, or path.
    pub workflow: String,
    /// The opaque inputs mapping passed through to the dispatch call.
    pub inputs: Map<String, Value>,
    /// Whether the host's verbose/debug channel is enabled.
    pub debug: bool,
}

impl InvocationContext {
    /// Resolves the raw inputs against the ambient repository and trigger ref
    /// of the surrounding run.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is not of the form `owner/repo`, or
    /// if the `inputs` string is present but not a valid JSON object.
    pub fn resolve(
        inputs: ActionInputs,
        ambient_repo: &str,
        ambient_ref: &str,
        debug: bool,
    ) -> anyhow::Result<Self> {
        let (owner, repo) = split_repository(inputs.repo.as_deref().unwrap_or(ambient_repo))?;
        let dispatch_inputs = match &inputs.inputs {
            Some(raw) => serde_json::from_str::<Map<String, Value>>(raw)
                .context("input `inputs` is not a valid JSON object")?,
            None => Map::new(),
        };

        Ok(Self {
            owner,
            repo,
            r#ref: inputs.r#ref.unwrap_or_else(|| String::from(ambient_ref)),
            workflow: inputs.workflow,
            inputs: dispatch_inputs,
            debug,
        })
    }

    /// The branch name the correlation filter uses, with any `refs/heads/`
    /// prefix stripped from the resolved ref.
    pub fn branch(&self) -> &str {
        self.r#ref.strip_prefix("refs/heads/").unwrap_or(&self.r#ref)
    }
}

fn split_repository(full: &str) -> anyhow::Result<(String, String)> {
    match full.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((String::from(owner), String::from(repo)))
        }
        _ => bail!("malformed repository `{full}`, expected `owner/repo`"),
    }
}
