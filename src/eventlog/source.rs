use crate::config::LogSourceConfig;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LogSourceError {
    #[error("could not start command: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("{status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Produces the raw text of the host event log.
pub trait LogSource {
    fn describe(&self) -> &str;

    async fn dump(&self) -> Result<String, LogSourceError>;
}

/// Runs an external dump command (`errpt -a -d H` by default) and returns its
/// stdout.
#[derive(Debug, Clone)]
pub struct CommandLogSource {
    program: String,
    args: Vec<String>,
}

impl CommandLogSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(cfg: &LogSourceConfig) -> Self {
        Self::new(cfg.program.clone(), cfg.args.clone())
    }
}

impl LogSource for CommandLogSource {
    fn describe(&self) -> &str {
        &self.program
    }

    async fn dump(&self) -> Result<String, LogSourceError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(LogSourceError::Spawn)?;

        if !output.status.success() {
            return Err(LogSourceError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(
            program = %self.program,
            bytes = output.stdout.len(),
            "event log dumped"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
