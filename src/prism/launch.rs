use std::{ffi::OsStr, path::PathBuf, process::Command};

use tracing::trace;

use super::{FLATPAK_APP_ID, LAUNCHER, LAUNCHER_EXE};
use crate::utils::{get_launch_command, get_launch_command_flatpak};

/// How the launcher executable is started for a chosen instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherCommand {
    /// Explicit launcher executable, takes precedence over everything else
    pub exe: Option<PathBuf>,
    pub is_using_flatpak: bool,
}

impl LauncherCommand {
    pub fn new(exe: Option<PathBuf>, is_using_flatpak: bool) -> Self {
        Self {
            exe,
            is_using_flatpak,
        }
    }

    /// Command which starts the instance stored in the directory `dir_name`
    pub fn command(&self, dir_name: &OsStr) -> Command {
        let args = ["--launch"];
        let mut launch_command = match &self.exe {
            Some(exe) => get_launch_command(exe, args),
            None if self.is_using_flatpak => get_launch_command_flatpak(FLATPAK_APP_ID, args),
            None => get_launch_command(LAUNCHER_EXE, args),
        };
        launch_command.arg(dir_name);
        trace!("{LAUNCHER} - launch command for {dir_name:?}: {launch_command:?}");

        launch_command
    }
}
