use std::{
    ffi::OsString,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

/// Paths read from the launcher's configuration file, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Root data directory of the launcher, e.g. `~/.local/share/PrismLauncher`
    pub path_root: PathBuf,
    pub path_instances: PathBuf,
    pub path_icons: PathBuf,
    /// Whether the launcher root was found inside the flatpak sandbox directory
    pub is_using_flatpak: bool,
}

/// Mod loader an instance is configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modloader {
    Fabric,
    Forge,
    Quilt,
    NeoForge,
    Vanilla,
    Unknown,
}

impl Modloader {
    /// Loaders which can be detected from an instance's component list, in the order in which
    /// they are tried. `NeoForge` must come before `Forge` as its marker contains `forge`.
    pub const DETECTION_ORDER: [Modloader; 4] = [
        Modloader::Fabric,
        Modloader::NeoForge,
        Modloader::Forge,
        Modloader::Quilt,
    ];

    /// Lowercase fragment of the loader's component uid, used for matching
    pub fn component_marker(self) -> Option<&'static str> {
        match self {
            Modloader::Fabric => Some("fabric-loader"),
            Modloader::NeoForge => Some("neoforge"),
            Modloader::Forge => Some("forge"),
            Modloader::Quilt => Some("quilt-loader"),
            Modloader::Vanilla | Modloader::Unknown => None,
        }
    }
}

impl Display for Modloader {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Modloader::Fabric => "Fabric",
                Modloader::Forge => "Forge",
                Modloader::Quilt => "Quilt",
                Modloader::NeoForge => "NeoForge",
                Modloader::Vanilla => "Vanilla",
                Modloader::Unknown => "Unknown",
            }
        )
    }
}

/// Data structure which defines all relevant data about a single launcher instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEntry {
    /// Name of the instance directory, lossily converted to UTF-8 if needed
    pub id: String,
    /// Exact name of the instance directory, which is what the launcher is given to start it
    pub dir_name: OsString,
    pub display_name: String,
    pub modloader: Modloader,
    /// Raw icon key from the instance metadata, empty if the instance uses the default icon
    pub icon_ref: String,
    pub group: Option<String>,
    pub game_version: Option<String>,
    pub modpack_version: Option<String>,
    pub resolved_icon_path: Option<PathBuf>,
}

impl InstanceEntry {
    /// Entry for an instance without any usable metadata
    pub fn bare(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            dir_name: OsString::from(&id),
            id,
            modloader: Modloader::Vanilla,
            icon_ref: String::new(),
            group: None,
            game_version: None,
            modpack_version: None,
            resolved_icon_path: None,
        }
    }

    /// Human readable label shown in the picker, e.g. `Fabric Pack (Modded, 1.2.0, Minecraft 1.21.1)`
    pub fn label(&self) -> String {
        let mut label = format!(
            "{} ({}",
            self.display_name,
            self.group.as_deref().unwrap_or("Ungrouped")
        );

        if let Some(modpack_version) = &self.modpack_version {
            label.push_str(", ");
            label.push_str(modpack_version);
        }

        if let Some(game_version) = &self.game_version {
            label.push_str(", Minecraft ");
            label.push_str(game_version);
        }

        label.push(')');
        label
    }
}
