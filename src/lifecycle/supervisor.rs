//! Process supervisor for running both workers from one command.
//!
//! Each worker is this same binary re-executed with a role argument, so the
//! front-end and the relay never share an address space.

use std::path::PathBuf;
use std::process::ExitStatus;

use tokio::process::{Child, Command};

use crate::lifecycle::signals::wait_for_signal;
use crate::lifecycle::startup::Role;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("cannot locate current executable: {0}")]
    CurrentExe(std::io::Error),

    #[error("failed to start {role:?} worker: {source}")]
    Spawn {
        role: Role,
        source: std::io::Error,
    },

    #[error("failed waiting on {role:?} worker: {source}")]
    Wait {
        role: Role,
        source: std::io::Error,
    },

    #[error("{role:?} worker exited with {status}")]
    WorkerExited { role: Role, status: ExitStatus },
}

/// Starts the http and relay workers and stops both when either ends.
pub struct Supervisor {
    program: PathBuf,
    config_path: Option<PathBuf>,
}

impl Supervisor {
    pub fn new(program: impl Into<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config_path,
        }
    }

    /// Supervise copies of the running executable.
    pub fn current(config_path: Option<PathBuf>) -> Result<Self, SupervisorError> {
        let program = std::env::current_exe().map_err(SupervisorError::CurrentExe)?;
        Ok(Self::new(program, config_path))
    }

    fn command(&self, role: Role) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(path) = &self.config_path {
            command.arg("--config").arg(path);
        }
        command.arg(role.as_arg()).kill_on_drop(true);
        command
    }

    fn spawn(&self, role: Role) -> Result<Child, SupervisorError> {
        let child = self
            .command(role)
            .spawn()
            .map_err(|source| SupervisorError::Spawn { role, source })?;
        tracing::info!(process = role.process_name(), pid = child.id(), "Worker started");
        Ok(child)
    }

    /// Run until a signal arrives or a worker exits; then stop both workers.
    pub async fn run(self) -> Result<(), SupervisorError> {
        let mut http = self.spawn(Role::Http)?;
        let mut relay = self.spawn(Role::Relay)?;

        let exited = tokio::select! {
            status = http.wait() => Some((Role::Http, status)),
            status = relay.wait() => Some((Role::Relay, status)),
            _ = wait_for_signal() => None,
        };

        for (role, child) in [(Role::Http, &mut http), (Role::Relay, &mut relay)] {
            if let Err(e) = child.kill().await {
                tracing::debug!(process = role.process_name(), error = %e, "Worker already stopped");
            }
        }

        match exited {
            None => {
                tracing::info!("Workers stopped");
                Ok(())
            }
            Some((role, Ok(status))) if status.success() => {
                tracing::info!(process = role.process_name(), "Worker exited");
                Ok(())
            }
            Some((role, Ok(status))) => {
                tracing::error!(process = role.process_name(), %status, "Worker exited unexpectedly");
                Err(SupervisorError::WorkerExited { role, status })
            }
            Some((role, Err(source))) => Err(SupervisorError::Wait { role, source }),
        }
    }
}
