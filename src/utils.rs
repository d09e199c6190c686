mod commands;
mod paths;

pub use commands::{get_launch_command, get_launch_command_flatpak};
pub use paths::{get_existing_image_path, some_if_dir, some_if_file};
