//! Data models of GitHub Actions workflows and the API surface this crate
//! consumes.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod client;

/// Represents a workflow definition from GitHub REST API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub path: String,
}

/// Represents a workflow run from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct Run {
    pub id: u64,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Run {
    /// Whether the run's status has reached the terminal value.
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// The slice of the GitHub Actions REST API consumed by the orchestration.
///
/// [`client::GithubClient`] is the real implementation; tests substitute an
/// in-memory fake.
#[allow(async_fn_in_trait)]
pub trait ActionsApi {
    /// Lists every workflow defined in the repository, across all pages.
    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>>;

    /// Triggers a new run of a workflow on the given ref, returning the HTTP
    /// status of the dispatch call.
    async fn dispatch(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        r#ref: &str,
        inputs: &Map<String, Value>,
    ) -> anyhow::Result<StatusCode>;

    /// Lists the most recent runs of a workflow on a branch, newest first.
    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        branch: &str,
        per_page: u8,
    ) -> anyhow::Result<Vec<Run>>;

    /// Fetches a single run by id.
    async fn get_run(&self, owner: &str, repo: &str, run_id: u64) -> anyhow::Result<Run>;
}
