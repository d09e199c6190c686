use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// Image extensions the launcher accepts for custom instance icons
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "svg", "ico", "gif"];

/// `Some(path)` if it is a file
pub fn some_if_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// `Some(path)` if it is a directory
pub fn some_if_dir(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}

/// Finds the image stored in `path_dir` under the file stem `stem`, trying each of
/// [`IMAGE_EXTENSIONS`] in turn
pub fn get_existing_image_path(path_dir: &Path, stem: impl Display) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .find_map(|ext| some_if_file(path_dir.join(format!("{stem}.{ext}"))))
}
