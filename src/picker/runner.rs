use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    process::Command,
};

use clap::ValueEnum;

use crate::utils::get_launch_command;

/// Supported picker programs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Runner {
    #[default]
    Rofi,
    Wofi,
    Fuzzel,
}

/// How entries and their icons are written to a picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineProtocol {
    /// `label\0icon\x1fpath`, the picker prints back `label`
    NullSeparatedIcon,
    /// `img:path:text:label`, the picker prints back the whole line
    ImagePrefix,
}

/// Per runner invocation details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerProfile {
    pub args: &'static [&'static str],
    pub protocol: LineProtocol,
}

impl Runner {
    /// Executable name looked up in `PATH` when no explicit executable is given
    pub fn name(self) -> &'static str {
        match self {
            Runner::Rofi => "rofi",
            Runner::Wofi => "wofi",
            Runner::Fuzzel => "fuzzel",
        }
    }

    pub fn profile(self) -> RunnerProfile {
        match self {
            Runner::Rofi => RunnerProfile {
                args: &["-dmenu", "-p", "instance", "-i", "-show-icons"],
                protocol: LineProtocol::NullSeparatedIcon,
            },
            Runner::Wofi => RunnerProfile {
                args: &["--dmenu", "--allow-images", "--insensitive"],
                protocol: LineProtocol::ImagePrefix,
            },
            Runner::Fuzzel => RunnerProfile {
                args: &["--dmenu"],
                protocol: LineProtocol::NullSeparatedIcon,
            },
        }
    }
}

impl Display for Runner {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pickers read one entry per line, so labels must not contain line breaks or the
/// protocol's separators
pub(crate) fn sanitise_label(label: &str) -> String {
    label.replace(['\n', '\r', '\0', '\x1f'], " ")
}

impl LineProtocol {
    /// Line written to the picker's stdin for an entry, without the trailing newline
    pub fn format_line(self, label: &str, icon: Option<&Path>) -> String {
        let label = sanitise_label(label);
        let Some(icon) = icon else {
            return label;
        };

        match self {
            LineProtocol::NullSeparatedIcon => format!("{label}\0icon\x1f{}", icon.display()),
            LineProtocol::ImagePrefix => format!("img:{}:text:{label}", icon.display()),
        }
    }

    /// Line the picker prints when the entry is chosen
    pub fn selection(self, label: &str, icon: Option<&Path>) -> String {
        match self {
            LineProtocol::NullSeparatedIcon => sanitise_label(label),
            LineProtocol::ImagePrefix => self.format_line(label, icon),
        }
    }
}

/// The configured picker program plus its invocation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    pub runner: Runner,
    /// Explicit picker executable, otherwise the runner's name is resolved through `PATH`
    pub exe: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn new(runner: Runner, exe: Option<PathBuf>) -> Self {
        Self { runner, exe }
    }

    pub fn command(&self) -> Command {
        let args = self.runner.profile().args.iter().copied();
        match &self.exe {
            Some(exe) => get_launch_command(exe, args),
            None => get_launch_command(self.runner.name(), args),
        }
    }
}
