//! Prism Launcher specifics: config, instance catalog, icons and the launch command.
pub mod catalog;
pub mod config;
pub mod icons;
pub mod launch;

/// Name used to prefix log messages from this launcher's modules
const LAUNCHER: &str = "PrismLauncher";

/// Flatpak application id of the launcher
pub const FLATPAK_APP_ID: &str = "org.prismlauncher.PrismLauncher";
/// Launcher root directory inside the flatpak sandbox, relative to the home directory
pub const FLATPAK_DATA_DIR: &str = ".var/app/org.prismlauncher.PrismLauncher/data/PrismLauncher";
/// Native launcher executable name
pub const LAUNCHER_EXE: &str = "prismlauncher";
