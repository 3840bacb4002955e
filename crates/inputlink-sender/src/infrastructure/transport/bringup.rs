//! Transport bring-up: the one-shot preparation step before listening.
//!
//! For plain TCP there is nothing to do. Deployments that forward over a
//! radio link (Bluetooth RFCOMM behind a TCP shim, PAN interfaces and the
//! like) configure a bring-up command that is run exactly once at startup;
//! its success gates the session. The step is deliberately opaque to the
//! rest of the system.

use std::process::Command;

use thiserror::Error;
use tracing::info;

/// Error type for transport bring-up.
#[derive(Debug, Error)]
pub enum BringupError {
    /// The bring-up command could not be spawned.
    #[error("failed to run bring-up command: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// The bring-up command ran and reported failure.
    #[error("bring-up command exited with {status}")]
    Failed { status: std::process::ExitStatus },
}

/// One-shot transport preparation invoked before the listener is bound.
pub trait TransportBringup {
    /// Performs the bring-up step. Failure aborts startup.
    fn bring_up(&self) -> Result<(), BringupError>;
}

/// Bring-up for transports that need no preparation (plain TCP).
pub struct NoopBringup;

impl TransportBringup for NoopBringup {
    fn bring_up(&self) -> Result<(), BringupError> {
        Ok(())
    }
}

/// Bring-up that runs a configured shell command once.
pub struct CommandBringup {
    command: String,
}

impl CommandBringup {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

impl TransportBringup for CommandBringup {
    fn bring_up(&self) -> Result<(), BringupError> {
        info!(command = %self.command, "running transport bring-up");
        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .status()
            .map_err(|source| BringupError::Spawn { source })?;
        if !status.success() {
            return Err(BringupError::Failed { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_bringup_always_succeeds() {
        assert!(NoopBringup.bring_up().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_bringup_succeeds_on_zero_exit() {
        let bringup = CommandBringup::new("true");
        assert!(bringup.bring_up().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_bringup_fails_on_nonzero_exit() {
        let bringup = CommandBringup::new("exit 3");
        assert!(matches!(bringup.bring_up(), Err(BringupError::Failed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_bringup_reports_unfindable_command_as_failure() {
        // The shell itself spawns fine; the missing binary surfaces as a
        // nonzero exit.
        let bringup = CommandBringup::new("/nonexistent-binary-for-bringup-test");
        assert!(matches!(bringup.bring_up(), Err(BringupError::Failed { .. })));
    }
}
