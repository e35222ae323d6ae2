use crate::sources::desktop::DesktopEntry;
use anyhow::{Result, anyhow};
use std::path::Path;
use std::process::{Command, Stdio};

/// Fire-and-forget program launching.
pub trait Launcher {
    /// Starts the application behind a launch token.
    fn launch(&mut self, launch_path: &str);

    /// Runs a shell-style command line from a static menu item.
    fn spawn(&mut self, command: &str);
}

/// Launches `.desktop` files and command lines as detached processes.
pub struct DesktopLauncher {
    terminal: Option<String>,
}

impl DesktopLauncher {
    pub fn new(terminal: Option<String>) -> Self {
        Self { terminal }
    }

    /// Argument vector for the desktop file at `path`.
    pub fn command_for(&self, path: &Path) -> Result<Vec<String>> {
        let entry = DesktopEntry::read(path)?;
        let cmd = entry
            .command_line()
            .ok_or_else(|| anyhow!("{} has no Exec line", path.display()))?;

        let mut cmd_parts: Vec<String> = Vec::new();
        if entry.terminal {
            if let Some(term_cmd) = &self.terminal {
                cmd_parts.extend(term_cmd.split_whitespace().map(str::to_string));
            }
        }
        cmd_parts.extend(cmd.split_whitespace().map(str::to_string));
        Ok(cmd_parts)
    }

    fn run(&self, cmd_parts: &[String]) -> Result<()> {
        let Some((program, args)) = cmd_parts.split_first() else {
            return Ok(());
        };

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

impl Launcher for DesktopLauncher {
    fn launch(&mut self, launch_path: &str) {
        let result = self
            .command_for(Path::new(launch_path))
            .and_then(|parts| self.run(&parts));
        match result {
            Ok(()) => log::info!("Launched {}", launch_path),
            Err(e) => log::error!("Failed to launch {}: {:#}", launch_path, e),
        }
    }

    fn spawn(&mut self, command: &str) {
        let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if let Err(e) = self.run(&parts) {
            log::error!("Failed to run '{}': {:#}", command, e);
        }
    }
}
