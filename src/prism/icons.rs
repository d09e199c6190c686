use std::{
    env,
    fs::{self, create_dir_all},
    path::{Path, PathBuf},
};

use tracing::{debug, error, trace, warn};

use super::LAUNCHER;
use crate::{
    data::{InstanceEntry, LauncherConfig, Modloader},
    utils::{get_existing_image_path, some_if_file},
};

/// An icon compiled into the binary
#[derive(Debug)]
struct BundledIcon {
    file_name: &'static str,
    bytes: &'static [u8],
}

macro_rules! bundled_icon {
    ($file_name: literal) => {
        BundledIcon {
            file_name: $file_name,
            bytes: include_bytes!(concat!("../../assets/icons/", $file_name)),
        }
    };
}

const ICON_FABRIC: BundledIcon = bundled_icon!("fabric.svg");
const ICON_FORGE: BundledIcon = bundled_icon!("forge.svg");
const ICON_NEOFORGE: BundledIcon = bundled_icon!("neoforge.svg");
const ICON_QUILT: BundledIcon = bundled_icon!("quilt.svg");
const ICON_VANILLA: BundledIcon = bundled_icon!("grass.svg");
const ICON_FALLBACK: BundledIcon = bundled_icon!("unknown.svg");

const ALL_ICONS: [&BundledIcon; 6] = [
    &ICON_FABRIC,
    &ICON_FORGE,
    &ICON_NEOFORGE,
    &ICON_QUILT,
    &ICON_VANILLA,
    &ICON_FALLBACK,
];

fn bundled_icon_for(modloader: Modloader) -> Option<&'static BundledIcon> {
    match modloader {
        Modloader::Fabric => Some(&ICON_FABRIC),
        Modloader::Forge => Some(&ICON_FORGE),
        Modloader::NeoForge => Some(&ICON_NEOFORGE),
        Modloader::Quilt => Some(&ICON_QUILT),
        Modloader::Vanilla => Some(&ICON_VANILLA),
        Modloader::Unknown => None,
    }
}

fn icons_dir_in(path_base: PathBuf) -> PathBuf {
    path_base.join("prism-picker").join("icons")
}

/// Returns whether every bundled icon is now present in `path_dir`
fn write_icons(path_dir: &Path) -> bool {
    if let Err(e) = create_dir_all(path_dir) {
        warn!("Could not create bundled icons directory {path_dir:?}: {e}");
        return false;
    }

    ALL_ICONS.iter().all(|icon| {
        let path = path_dir.join(icon.file_name);
        if fs::read(&path).is_ok_and(|existing| existing == icon.bytes) {
            return true;
        }

        match fs::write(&path, icon.bytes) {
            Ok(()) => {
                trace!("Wrote bundled icon {path:?}");
                true
            }
            Err(e) => {
                warn!("Could not write bundled icon {path:?}: {e}");
                false
            }
        }
    })
}

/// Directory holding the icons shipped with this program, as files the picker can read
#[derive(Debug, Clone)]
pub struct BundledIcons {
    path_dir: PathBuf,
}

impl BundledIcons {
    /// Uses icons already present in `path_dir`, without writing anything
    pub fn new(path_dir: impl Into<PathBuf>) -> Self {
        Self {
            path_dir: path_dir.into(),
        }
    }

    /// Default per-user location for the bundled icons
    pub fn default_dir() -> PathBuf {
        icons_dir_in(
            dirs::runtime_dir()
                .or_else(dirs::cache_dir)
                .unwrap_or_else(env::temp_dir),
        )
    }

    /// Writes every bundled icon into `path_dir` unless an identical copy is already there.
    ///
    /// If `path_dir` is not writable the icons go to the temporary directory instead, so the
    /// fallback icon exists whenever either location works.
    #[tracing::instrument(level = "trace", skip_all, fields(path = ?path_dir.as_ref()))]
    pub fn install(path_dir: impl AsRef<Path>) -> Self {
        let path_dir = path_dir.as_ref();
        if write_icons(path_dir) {
            return Self::new(path_dir);
        }

        let path_temp = icons_dir_in(env::temp_dir());
        if path_temp != path_dir {
            warn!("Falling back to {path_temp:?} for bundled icons");
            if write_icons(&path_temp) {
                return Self::new(path_temp);
            }
        }

        error!("Bundled icons could not be written, the picker will show missing icons");
        Self::new(path_dir)
    }

    /// Path of the bundled icon for `modloader`, if there is one and it exists on disk
    pub fn path_for(&self, modloader: Modloader) -> Option<PathBuf> {
        bundled_icon_for(modloader)
            .and_then(|icon| some_if_file(self.path_dir.join(icon.file_name)))
    }

    /// Path of the generic icon, returned whether or not it exists
    pub fn fallback(&self) -> PathBuf {
        self.path_dir.join(ICON_FALLBACK.file_name)
    }
}

/// A single step of the icon fallback chain
pub type IconStep = fn(&InstanceEntry, &LauncherConfig, &BundledIcons) -> Option<PathBuf>;

/// The user's custom icon from the launcher's icons directory.
///
/// The launcher stores icons keyed by file stem, so the exact name is tried first and then the
/// known image extensions.
pub fn custom_icon(
    entry: &InstanceEntry,
    config: &LauncherConfig,
    _: &BundledIcons,
) -> Option<PathBuf> {
    if entry.icon_ref.is_empty() {
        return None;
    }

    some_if_file(config.path_icons.join(&entry.icon_ref))
        .or_else(|| get_existing_image_path(&config.path_icons, &entry.icon_ref))
}

/// The bundled icon matching the entry's mod loader
pub fn modloader_icon(
    entry: &InstanceEntry,
    _: &LauncherConfig,
    bundled: &BundledIcons,
) -> Option<PathBuf> {
    bundled.path_for(entry.modloader)
}

/// Steps tried in order before falling back to the generic icon
pub const ICON_STEPS: [IconStep; 2] = [custom_icon, modloader_icon];

/// Resolves every instance to an icon path, preferring custom icons over mod loader icons
/// over the generic fallback
#[derive(Debug, Clone)]
pub struct IconResolver {
    bundled: BundledIcons,
}

impl IconResolver {
    pub fn new(bundled: BundledIcons) -> Self {
        Self { bundled }
    }

    /// Always returns a path: the last link of the chain is unconditional
    pub fn resolve(&self, entry: &InstanceEntry, config: &LauncherConfig) -> PathBuf {
        let path = ICON_STEPS
            .iter()
            .find_map(|step| step(entry, config, &self.bundled))
            .unwrap_or_else(|| self.bundled.fallback());
        trace!("{LAUNCHER} - Icon for '{}': {path:?}", entry.id);

        path
    }

    /// Fills in `resolved_icon_path` for every entry
    pub fn resolve_all(&self, entries: &mut [InstanceEntry], config: &LauncherConfig) {
        for entry in entries.iter_mut() {
            entry.resolved_icon_path = Some(self.resolve(entry, config));
        }
        debug!("{LAUNCHER} - Resolved icons for {} instances", entries.len());
    }
}
