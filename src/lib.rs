//! [![License](https://img.shields.io/badge/License-AGPLv3-green.svg)](https://www.gnu.org/licenses/agpl-3.0)
//!
//! Pick a Prism Launcher instance from rofi, wofi or fuzzel and launch it. Currently only
//! supports Linux.
//!
//! # Description
//!
//! Instances are read from the launcher's own data directory, each is given an icon (the
//! instance's custom icon, otherwise one matching its mod loader) and the list is shown in the
//! chosen picker. The selected instance is then started through `prismlauncher --launch`, or
//! through flatpak when the launcher is installed that way.
//!
//! # Usage
//!
//! ```rust,no_run
//! use prism_picker::{
//!     Options,
//!     picker::runner::{Runner, RunnerConfig},
//!     process::SystemSpawner,
//!     run,
//! };
//!
//! let options = Options {
//!     runner: RunnerConfig::new(Runner::Wofi, None),
//!     ..Options::default()
//! };
//! let outcome = run(&options, &SystemSpawner)?;
//! # Ok::<(), prism_picker::error::Error>(())
//! ```
//!
//! # Pipeline
//!
//! - [`prism::config::resolve`] finds the instances and icons directories
//! - [`prism::catalog::scan`] lists and classifies the instances
//! - [`prism::icons::IconResolver`] picks an icon for each of them
//! - [`picker::present_and_launch`] runs the picker and starts the chosen instance

use std::path::PathBuf;

use cfg_if::cfg_if;
use tracing::debug;

pub mod data;
pub mod error;
mod macros;
mod parsers;
pub mod picker;
pub mod prism;
pub mod process;
mod utils;

use error::Error;
use picker::{Outcome, runner::RunnerConfig};
use prism::{
    icons::{BundledIcons, IconResolver},
    launch::LauncherCommand,
};
use process::Spawner;

cfg_if! {
    if #[cfg(target_os = "linux")] {
        /// Settings for a single pick-and-launch run
        #[derive(Debug, Clone)]
        pub struct Options {
            /// Launcher root directory or config file, defaults to the user's data directory
            pub config_dir: Option<PathBuf>,
            pub runner: RunnerConfig,
            /// Launcher executable, defaults to `prismlauncher` or its flatpak
            pub launcher_exe: Option<PathBuf>,
            /// Where the bundled icons are written for the picker to read
            pub path_bundled_icons: PathBuf,
        }
    } else {
        compile_error!("This platform is currently not supported by prism_picker");
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config_dir: None,
            runner: RunnerConfig::default(),
            launcher_exe: None,
            path_bundled_icons: BundledIcons::default_dir(),
        }
    }
}

/// Primary entry point into the crate - discover all instances, show them in the picker and
/// launch the chosen one
pub fn run(options: &Options, spawner: &impl Spawner) -> Result<Outcome, Error> {
    let config = prism::config::resolve(options.config_dir.as_deref())?;
    debug!("Using launcher config: {config:?}");

    let mut entries = prism::catalog::scan(&config)?;

    let resolver = IconResolver::new(BundledIcons::install(&options.path_bundled_icons));
    resolver.resolve_all(&mut entries, &config);

    let launcher = LauncherCommand::new(options.launcher_exe.clone(), config.is_using_flatpak);
    picker::present_and_launch(&entries, &options.runner, &launcher, spawner)
}
