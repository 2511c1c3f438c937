//! The sink the invocation reports its named outputs through.

use std::env;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use tracing::info;

/// Receives the invocation's named outputs.
pub trait OutputSink {
    /// Sets a named output. Each name is set at most once per invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot record the output.
    fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()>;
}

/// Appends `name=value` lines to the file named by `GITHUB_OUTPUT`, the
/// runner's output channel. Outside a runner the outputs are only logged.
#[derive(Debug)]
pub struct GithubOutput {
    path: Option<PathBuf>,
}

impl GithubOutput {
    /// Resolves the output file from the `GITHUB_OUTPUT` environment variable.
    pub fn from_env() -> Self {
        Self {
            path: env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }
}

impl OutputSink for GithubOutput {
    fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        info!("output {name}={value}");
        if let Some(path) = &self.path {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open output file {}", path.display()))?;
            writeln!(file, "{name}={value}")
                .with_context(|| format!("failed to write output {name}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::OutputSink;

    /// Records outputs in memory, in the order they were set.
    #[derive(Debug, Default)]
    pub(crate) struct RecordedOutputs(pub Vec<(String, String)>);

    impl RecordedOutputs {
        pub(crate) fn get(&self, name: &str) -> Option<&str> {
            self.0
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        }
    }

    impl OutputSink for RecordedOutputs {
        fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
            self.0.push((String::from(name), String::from(value)));
            Ok(())
        }
    }
}
