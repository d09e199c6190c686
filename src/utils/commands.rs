use std::{ffi::OsStr, process::Command};

/// `program` with its leading arguments, ready for further arguments to be appended
pub fn get_launch_command<'a>(
    program: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = &'a str>,
) -> Command {
    let mut command = Command::new(program);
    command.args(args);

    command
}

/// `flatpak run <app_id>` followed by `args`
pub fn get_launch_command_flatpak<'a>(
    app_id: &str,
    args: impl IntoIterator<Item = &'a str>,
) -> Command {
    let mut command = get_launch_command("flatpak", ["run", app_id]);
    command.args(args);

    command
}
