//! Step execution against the host.

use async_trait::async_trait;
use std::io::ErrorKind;

use osaft_docker_core::error::{OsaftError, Result};

use super::step::{EngineCommand, Step};

/// Executes a single step. Implementations must block until the step is done.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, step: &Step) -> Result<()>;
}

/// Runs steps on the local machine, engine commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostRunner;

#[async_trait]
impl StepRunner for HostRunner {
    async fn run(&self, step: &Step) -> Result<()> {
        match step {
            Step::CreateDir(path) => {
                tokio::fs::create_dir(path).await.map_err(|e| match e.kind() {
                    ErrorKind::AlreadyExists => {
                        OsaftError::WorkdirExists(path.display().to_string())
                    }
                    _ => OsaftError::WorkdirCreate {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    },
                })
            }
            Step::WriteFile { path, contents } => {
                tokio::fs::write(path, contents).await?;
                Ok(())
            }
            Step::CopyFile { from, to } => {
                tokio::fs::copy(from, to).await.map_err(|e| {
                    OsaftError::Config(format!(
                        "Failed to copy {} to {}: {}",
                        from.display(),
                        to.display(),
                        e
                    ))
                })?;
                Ok(())
            }
            Step::Engine(command) => run_engine(command).await,
            Step::RemoveFile(path) => {
                tokio::fs::remove_file(path).await?;
                Ok(())
            }
            Step::RemoveDir(path) => {
                tokio::fs::remove_dir_all(path).await?;
                Ok(())
            }
        }
    }
}

/// Run an engine command with inherited stdio and wait for it to exit.
async fn run_engine(command: &EngineCommand) -> Result<()> {
    let status = tokio::process::Command::new(&command.program)
        .args(&command.args)
        .status()
        .await
        .map_err(|e| OsaftError::EngineSpawn {
            program: command.program.clone(),
            message: e.to_string(),
        })?;

    if status.success() {
        return Ok(());
    }

    // Killed by a signal: no exit code, report a generic failure
    let code = status.code().unwrap_or(1);
    Err(OsaftError::EngineFailed {
        command: command.to_string(),
        code,
    })
}
