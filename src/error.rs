//! Error types used by this crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while locating or reading the launcher's own configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("launcher config not found at {0:?}")]
    NotFound(PathBuf),

    /// A required setting is absent from the configuration file
    #[error("launcher config is missing the required key '{0}'")]
    MissingKey(&'static str),

    /// No data directory could be determined for the current user
    #[error("could not determine the user data directory")]
    NoDataDir,

    /// Error originating from [`io::Error`]
    #[error("could not read launcher config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while scanning the instances directory.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The instances directory itself could not be read
    #[error("could not read instances directory {path:?}: {source}")]
    DirUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while running the picker program.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The picker executable could not be found
    #[error("picker executable '{0}' not found")]
    NotFound(String),

    /// The picker executable was found but could not be started
    #[error("could not start picker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Writing entries to, or reading the choice from, the picker failed
    #[error("error communicating with picker '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while interpreting the picker's output.
#[derive(Error, Debug)]
pub enum PickerError {
    /// The picker returned a line which does not correspond to any offered entry
    #[error("picker returned an unrecognised choice: {0:?}")]
    UnrecognizedChoice(String),
}

/// Errors raised while starting the chosen instance.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The launcher executable could not be started
    #[error("could not start launcher '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Umbrella error returned by the full pick-and-launch pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Picker(#[from] PickerError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}
