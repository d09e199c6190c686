// PATHS:
// - ~/.local/share/PrismLauncher/prismlauncher.cfg
// - ~/.var/app/org.prismlauncher.PrismLauncher/data/PrismLauncher/prismlauncher.cfg
use std::{
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{FLATPAK_DATA_DIR, LAUNCHER};
use crate::{
    data::LauncherConfig,
    error::ConfigError,
    macros::logs::{debug_fallback_flatpak, debug_path},
    parsers::{Settings, parse_settings_cfg},
    utils::some_if_dir,
};

/// Name of the launcher's main settings file, relative to its root directory
pub const CONFIG_FILE_NAME: &str = "prismlauncher.cfg";

const KEY_INSTANCES_DIR: &str = "InstanceDir";
// Prism writes `IconsDir`, older MultiMC derived configs may use `IconDir`
const KEYS_ICONS_DIR: [&str; 2] = ["IconsDir", "IconDir"];

struct ParsableConfigData<'a> {
    instances_dir: &'a str,
    icons_dir: &'a str,
}

/// Validates the parsed settings against the keys this crate requires
#[tracing::instrument(level = "trace", skip(settings))]
fn parse_prism_config(settings: &Settings) -> Result<ParsableConfigData<'_>, ConfigError> {
    let instances_dir = settings
        .get_any(&[KEY_INSTANCES_DIR])
        .ok_or(ConfigError::MissingKey(KEY_INSTANCES_DIR))?;
    let icons_dir = settings
        .get_any(&KEYS_ICONS_DIR)
        .ok_or(ConfigError::MissingKey(KEYS_ICONS_DIR[0]))?;

    Ok(ParsableConfigData {
        instances_dir,
        icons_dir,
    })
}

/// Paths in the launcher config may be relative to the launcher's root directory
fn resolve_dir(path_root: &Path, value: &str) -> PathBuf {
    let mut path = PathBuf::from(value);
    if !path.is_absolute() {
        path = path_root.join(path);
    }

    path
}

/// Reads and validates the config file at `path_config`
fn load(
    path_root: PathBuf,
    path_config: &Path,
    is_using_flatpak: bool,
) -> Result<LauncherConfig, ConfigError> {
    let file_content = read_to_string(path_config).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(path_config.to_path_buf()),
        _ => ConfigError::Io {
            path: path_config.to_path_buf(),
            source,
        },
    })?;

    let settings = parse_settings_cfg(&file_content);
    let ParsableConfigData {
        instances_dir,
        icons_dir,
    } = parse_prism_config(&settings)?;

    let path_instances = resolve_dir(&path_root, instances_dir);
    let path_icons = resolve_dir(&path_root, icons_dir);

    debug_path!("instances directory", path_instances);
    debug_path!("icons directory", path_icons);

    Ok(LauncherConfig {
        path_root,
        path_instances,
        path_icons,
        is_using_flatpak,
    })
}

/// Resolves the launcher config from an explicitly given path.
///
/// A directory is taken to be the launcher's root directory, anything else the config file.
pub fn resolve_from_path(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let (path_root, path_config) = if path.is_dir() {
        (path.to_path_buf(), path.join(CONFIG_FILE_NAME))
    } else {
        let path_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        (path_root, path.to_path_buf())
    };

    debug!("{LAUNCHER} - using config override {path_config:?}");
    load(path_root, &path_config, false)
}

/// Resolves the launcher config from its default location under the given home and data
/// directories, falling back to the flatpak install if the native one is missing.
pub fn resolve_default(
    path_home: &Path,
    path_data: &Path,
) -> Result<LauncherConfig, ConfigError> {
    let mut is_using_flatpak = false;
    let mut path_root = path_data.join("PrismLauncher");

    if !path_root.is_dir() {
        debug_fallback_flatpak!();

        if let Some(path_flatpak_root) = some_if_dir(path_home.join(FLATPAK_DATA_DIR)) {
            is_using_flatpak = true;
            path_root = path_flatpak_root;
        }
    }

    debug_path!("root directory", path_root);

    let path_config = path_root.join(CONFIG_FILE_NAME);
    load(path_root, &path_config, is_using_flatpak)
}

/// Locates and parses the launcher's configuration, either from `override_path` or from the
/// current user's data directory.
pub fn resolve(override_path: Option<&Path>) -> Result<LauncherConfig, ConfigError> {
    if let Some(path) = override_path {
        return resolve_from_path(path);
    }

    let path_home = dirs::home_dir().ok_or(ConfigError::NoDataDir)?;
    let path_data = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;

    resolve_default(&path_home, &path_data)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn write_config(dir: &Path, content: &str) {
        create_dir_all(dir).unwrap();
        write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test_case("InstanceDir=instances\nIconsDir=icons\n", "instances", "icons"; "relative")]
    #[test_case("InstanceDir=/srv/mc/instances\nIconsDir=/srv/mc/icons\n", "/srv/mc/instances", "/srv/mc/icons"; "absolute")]
    #[test_case("[General]\nIconDir=my icons\nInstanceDir=/srv/i\n", "/srv/i", "my icons"; "legacy icon key")]
    fn test_resolve_from_root_dir(content: &str, instances: &str, icons: &str) {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), content);

        let config = resolve_from_path(dir.path()).unwrap();

        assert_eq!(config.path_root, dir.path());
        assert_eq!(config.path_instances, dir.path().join(instances));
        assert_eq!(config.path_icons, dir.path().join(icons));
        assert!(!config.is_using_flatpak);
    }

    #[test]
    fn test_resolve_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path_config = dir.path().join("custom.cfg");
        write(&path_config, "InstanceDir=inst\nIconsDir=ico").unwrap();

        let config = resolve(Some(path_config.as_path())).unwrap();

        assert_eq!(config.path_instances, dir.path().join("inst"));
        assert_eq!(config.path_icons, dir.path().join("ico"));
    }

    #[test]
    fn test_missing_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_from_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test_case("IconsDir=icons", "InstanceDir"; "no instances dir")]
    #[test_case("InstanceDir=instances", "IconsDir"; "no icons dir")]
    #[test_case("InstanceDir=\nIconsDir=icons", "InstanceDir"; "empty instances dir")]
    fn test_missing_key(content: &str, expected_key: &str) {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), content);

        let err = resolve_from_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(key) if key == expected_key));
    }

    #[test_case(false, ".local/share"; "standard")]
    #[test_case(true, "invalid/data/path"; "flatpak")]
    fn test_resolve_default(is_testing_flatpak: bool, path_data: &str) {
        let home = tempfile::tempdir().unwrap();
        let path_root = if is_testing_flatpak {
            home.path().join(FLATPAK_DATA_DIR)
        } else {
            home.path().join(path_data).join("PrismLauncher")
        };
        write_config(&path_root, "InstanceDir=instances\nIconsDir=icons");

        let config = resolve_default(home.path(), &home.path().join(path_data)).unwrap();

        assert_eq!(config.is_using_flatpak, is_testing_flatpak);
        assert_eq!(config.path_root, path_root);
        assert_eq!(config.path_instances, path_root.join("instances"));
    }

    #[test]
    fn test_resolve_default_with_nothing_installed() {
        let home = tempfile::tempdir().unwrap();

        let err = resolve_default(home.path(), &home.path().join(".local/share")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
