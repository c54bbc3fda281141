use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// Contract for the external display-mode side effect. The tracker only owns
/// the enabled flag and its persistence; actually flipping the display is
/// delegated here.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayToggle {
    fn flip(&mut self) -> Result<()>;
}

/// Flips the display mode by running a user-configured command through the
/// platform shell. Without a configured command the flip is log-only, which
/// keeps the daemon usable for dry runs.
pub struct CommandToggle {
    command: Option<String>,
}

impl CommandToggle {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl DisplayToggle for CommandToggle {
    fn flip(&mut self) -> Result<()> {
        let Some(command) = &self.command else {
            warn!("No toggle command configured, display mode left untouched");
            return Ok(());
        };

        let status = shell_command(command)
            .status()
            .with_context(|| format!("Failed to run toggle command {command:?}"))?;
        if !status.success() {
            bail!("Toggle command {command:?} exited with {status}");
        }
        info!("Toggle command finished");
        Ok(())
    }
}

fn shell_command(command: &str) -> std::process::Command {
    #[cfg(windows)]
    {
        let mut shell = std::process::Command::new("cmd");
        shell.args(["/C", command]);
        shell
    }
    #[cfg(not(windows))]
    {
        let mut shell = std::process::Command::new("sh");
        shell.args(["-c", command]);
        shell
    }
}

#[cfg(test)]
mod display_tests {
    use super::*;

    #[test]
    fn unconfigured_toggle_is_a_noop() {
        let mut toggle = CommandToggle::new(None);
        assert!(toggle.flip().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_surfaces_an_error() {
        let mut toggle = CommandToggle::new(Some("exit 3".into()));
        assert!(toggle.flip().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_is_ok() {
        let mut toggle = CommandToggle::new(Some("true".into()));
        assert!(toggle.flip().is_ok());
    }
}
