//! The two ways this crate starts external programs: run the picker to completion, and start
//! the launcher without waiting for it.
use std::{
    io::{self, Write},
    process::{Command, Stdio},
};

use tracing::{debug, trace};

use crate::error::{LaunchError, RunnerError};

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

pub trait Spawner {
    /// Runs `command` with `input` written to its stdin, blocking until it exits, and returns
    /// everything it wrote to stdout
    fn run_with_input(&self, command: Command, input: &[u8]) -> Result<Vec<u8>, RunnerError>;

    /// Starts `command` and returns as soon as it is running. The process outlives this one.
    fn detach(&self, command: Command) -> Result<(), LaunchError>;
}

/// [`Spawner`] which starts real operating system processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    #[tracing::instrument(level = "trace", skip(self, input))]
    fn run_with_input(&self, mut command: Command, input: &[u8]) -> Result<Vec<u8>, RunnerError> {
        let program = program_name(&command);

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => RunnerError::NotFound(program.clone()),
                _ => RunnerError::Spawn {
                    program: program.clone(),
                    source,
                },
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input) {
                // The picker may exit before reading all entries, e.g. when killed
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    trace!("{program} closed its input early");
                }
                result => result.map_err(|source| RunnerError::Io {
                    program: program.clone(),
                    source,
                })?,
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|source| RunnerError::Io {
                program: program.clone(),
                source,
            })?;
        debug!("{program} exited with {}", output.status);

        Ok(output.stdout)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn detach(&self, mut command: Command) -> Result<(), LaunchError> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program_name(&command),
                source,
            })?;
        debug!("Started {:?} with pid {}", command.get_program(), child.id());

        Ok(())
    }
}
