// PATHS:
// - <instances>/instgroups.json
// - <instances>/<id>/instance.cfg
// - <instances>/<id>/mmc-pack.json
use std::{
    collections::HashMap,
    ffi::OsString,
    fs::{read_dir, read_to_string},
    io,
    path::Path,
};

use itertools::Itertools;
use serde::Deserialize;
use tracing::{debug, error, trace, warn};

use super::LAUNCHER;
use crate::{
    data::{InstanceEntry, LauncherConfig, Modloader},
    error::CatalogError,
    macros::logs::warn_no_instances,
    parsers::{Settings, parse_settings_cfg},
};

const INSTANCE_CONFIG_FILE: &str = "instance.cfg";
const COMPONENTS_FILE: &str = "mmc-pack.json";
const GROUPS_FILE: &str = "instgroups.json";

/// Directories the launcher uses for staging, which are never instances
const IGNORED_DIRS: [&str; 3] = [".tmp", "_MMC_TEMP", "_LAUNCHER_TEMP"];

/// Components every instance carries regardless of mod loader
const BASE_COMPONENTS: [&str; 3] = ["net.minecraft", "org.lwjgl", "org.lwjgl3"];
const GAME_COMPONENT: &str = "net.minecraft";

/// Sentinel icon key the launcher uses for instances without a custom icon
const DEFAULT_ICON_KEY: &str = "default";

#[derive(Debug, Default)]
struct ParsableInstanceConfigData {
    title: Option<String>,
    icon_key: Option<String>,
    modpack_version: Option<String>,
}

#[derive(Debug, Default)]
struct ParsableComponentsData {
    uids: Vec<String>,
    game_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComponentsJson {
    #[serde(default)]
    components: Vec<ComponentJson>,
}

#[derive(Debug, Deserialize)]
struct ComponentJson {
    uid: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupsJson {
    #[serde(default)]
    groups: HashMap<String, GroupJson>,
}

#[derive(Debug, Deserialize)]
struct GroupJson {
    #[serde(default)]
    instances: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Used for extracting the relevant instance data from a parsed `instance.cfg`
fn parse_instance_config(settings: &Settings) -> ParsableInstanceConfigData {
    ParsableInstanceConfigData {
        title: non_empty(settings.get("name")),
        icon_key: non_empty(settings.get("iconKey")).filter(|key| key != DEFAULT_ICON_KEY),
        modpack_version: non_empty(settings.get("ManagedPackVersionName")),
    }
}

/// Used for extracting the component uids and game version from `mmc-pack.json` contents
#[tracing::instrument(level = "trace", skip(file_content))]
fn parse_components_json(file_content: &str) -> serde_json::Result<ParsableComponentsData> {
    let ComponentsJson { components } = serde_json::from_str(file_content)?;

    let game_version = components
        .iter()
        .find(|c| c.uid == GAME_COMPONENT)
        .and_then(|c| c.version.clone());
    let uids = components.into_iter().map(|c| c.uid).collect();

    Ok(ParsableComponentsData { uids, game_version })
}

/// Maps every grouped instance id to the name of its group
#[tracing::instrument(level = "trace", skip(file_content))]
fn parse_groups_json(file_content: &str) -> serde_json::Result<HashMap<String, String>> {
    let GroupsJson { groups } = serde_json::from_str(file_content)?;

    Ok(groups
        .into_iter()
        .flat_map(|(group, GroupJson { instances })| {
            instances.into_iter().map(move |id| (id, group.clone()))
        })
        .collect())
}

/// Determines the mod loader of an instance from its component uids.
///
/// Loaders are tried in [`Modloader::DETECTION_ORDER`], so an instance listing several
/// loaders always classifies the same way. No components, or only the base game components,
/// means [`Modloader::Vanilla`]; any other unmatched component means [`Modloader::Unknown`].
pub fn classify_modloader<S: AsRef<str>>(components: &[S]) -> Modloader {
    let uids: Vec<String> = components
        .iter()
        .map(|c| c.as_ref().to_lowercase())
        .collect();

    let detected = Modloader::DETECTION_ORDER.into_iter().find(|loader| {
        loader
            .component_marker()
            .is_some_and(|marker| uids.iter().any(|uid| uid.contains(marker)))
    });

    if let Some(loader) = detected {
        return loader;
    }

    if uids.iter().all(|uid| BASE_COMPONENTS.contains(&uid.as_str())) {
        Modloader::Vanilla
    } else {
        Modloader::Unknown
    }
}

fn read_groups(path_instances: &Path) -> HashMap<String, String> {
    let path_groups = path_instances.join(GROUPS_FILE);

    let file_content = match read_to_string(&path_groups) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{LAUNCHER} - no groups file at {path_groups:?}");
            return HashMap::new();
        }
        Err(e) => {
            warn!("{LAUNCHER} - error reading groups file at {path_groups:?}: {e}");
            return HashMap::new();
        }
    };

    parse_groups_json(&file_content).unwrap_or_else(|e| {
        warn!("{LAUNCHER} - error parsing groups file at {path_groups:?}: {e}");
        HashMap::new()
    })
}

fn read_instance_config(path_instance: &Path) -> ParsableInstanceConfigData {
    let path_config = path_instance.join(INSTANCE_CONFIG_FILE);

    match read_to_string(&path_config) {
        Ok(file_content) => parse_instance_config(&parse_settings_cfg(&file_content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{LAUNCHER} - no instance config at {path_config:?}");
            ParsableInstanceConfigData::default()
        }
        Err(e) => {
            warn!("{LAUNCHER} - error reading instance config at {path_config:?}: {e}");
            ParsableInstanceConfigData::default()
        }
    }
}

fn read_components(path_instance: &Path) -> ParsableComponentsData {
    let path_components = path_instance.join(COMPONENTS_FILE);

    let file_content = match read_to_string(&path_components) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{LAUNCHER} - no components file at {path_components:?}");
            return ParsableComponentsData::default();
        }
        Err(e) => {
            warn!("{LAUNCHER} - error reading components file at {path_components:?}: {e}");
            return ParsableComponentsData::default();
        }
    };

    parse_components_json(&file_content).unwrap_or_else(|e| {
        warn!("{LAUNCHER} - error parsing components file at {path_components:?}: {e}");
        ParsableComponentsData::default()
    })
}

/// Builds the entry for the instance stored in `path_instance`, degrading to the directory
/// name for anything the metadata does not provide
fn read_instance(
    dir_name: OsString,
    path_instance: &Path,
    groups: &HashMap<String, String>,
) -> InstanceEntry {
    let id = dir_name.to_string_lossy().into_owned();

    let ParsableInstanceConfigData {
        title,
        icon_key,
        modpack_version,
    } = read_instance_config(path_instance);
    let ParsableComponentsData { uids, game_version } = read_components(path_instance);

    let entry = InstanceEntry {
        display_name: title.unwrap_or_else(|| id.clone()),
        modloader: classify_modloader(&uids),
        icon_ref: icon_key.unwrap_or_default(),
        group: groups.get(&id).cloned(),
        game_version,
        modpack_version,
        resolved_icon_path: None,
        id,
        dir_name,
    };
    trace!("{LAUNCHER} - parsed instance: {entry:?}");

    entry
}

/// Scans the configured instances directory, returning one entry per instance directory,
/// sorted case-insensitively by display name.
#[tracing::instrument(level = "trace", skip(config), fields(path = ?config.path_instances))]
pub fn scan(config: &LauncherConfig) -> Result<Vec<InstanceEntry>, CatalogError> {
    let path_instances = &config.path_instances;
    let dir_entries =
        read_dir(path_instances).map_err(|source| CatalogError::DirUnreadable {
            path: path_instances.clone(),
            source,
        })?;
    let groups = read_groups(path_instances);

    let mut entries = Vec::new();
    for dir_entry in dir_entries {
        let dir_entry = match dir_entry {
            Ok(dir_entry) => dir_entry,
            Err(e) => {
                error!("{LAUNCHER} - skipping unreadable entry of {path_instances:?}: {e}");
                continue;
            }
        };
        let path = dir_entry.path();
        if !path.is_dir() {
            continue;
        }

        let dir_name = dir_entry.file_name();
        if IGNORED_DIRS.iter().any(|ignored| dir_name == *ignored) {
            trace!("{LAUNCHER} - skipping staging directory {path:?}");
            continue;
        }
        if dir_name.to_str().is_none() {
            debug!("{LAUNCHER} - instance directory name is not UTF-8: {path:?}");
        }

        entries.push(read_instance(dir_name, &path, &groups));
    }

    if entries.is_empty() {
        warn_no_instances!(path_instances);
    }

    Ok(entries
        .into_iter()
        .sorted_by_cached_key(|e| {
            (
                e.display_name.to_lowercase(),
                e.id.clone(),
                e.dir_name.clone(),
            )
        })
        .collect())
}
