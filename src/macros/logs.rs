/// Logs a directory taken from the launcher config, noting whether it is actually there
macro_rules! debug_path {
    ($description: expr, $path: ident) => {
        tracing::debug!(
            "{LAUNCHER} - {}: {:?} (present: {})",
            $description,
            $path,
            $path.is_dir()
        );
    };
}
pub(crate) use debug_path;

macro_rules! debug_fallback_flatpak {
    () => {
        tracing::debug!("{LAUNCHER} - No native install found, trying the flatpak one");
    };
}
pub(crate) use debug_fallback_flatpak;

/// An empty instances directory is valid, but usually means the wrong directory was configured
macro_rules! warn_no_instances {
    ($path: expr) => {
        tracing::warn!("{LAUNCHER} - No instances found in {:?}", $path);
    };
}
pub(crate) use warn_no_instances;
