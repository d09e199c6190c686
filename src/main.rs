use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use is_terminal::IsTerminal;
use prism_picker::{
    Options,
    picker::{
        Outcome,
        runner::{Runner, RunnerConfig},
    },
    prism::icons::BundledIcons,
    process::SystemSpawner,
    run,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Launcher helper for Prism Launcher instances
#[derive(Parser, Debug)]
#[command(name = "prism-picker", version, about)]
struct Cli {
    /// Path to the Prism Launcher data directory (or its config file), uses XDG_DATA_HOME if unset
    #[arg(short, long, value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// The type of runner to use
    #[arg(short, long, value_enum, default_value_t = Runner::Rofi)]
    runner: Runner,

    /// Runner executable to launch, looked up in PATH by the runner's name if unset
    #[arg(short, long, value_name = "PATH")]
    exe: Option<PathBuf>,

    /// Prism Launcher executable to launch instances with
    #[arg(short = 'p', long = "prism", value_name = "PATH")]
    launcher: Option<PathBuf>,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            config_dir: cli.config_dir,
            runner: RunnerConfig::new(cli.runner, cli.exe),
            launcher_exe: cli.launcher,
            path_bundled_icons: BundledIcons::default_dir(),
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_line_number(true)
                // Don't output colours for logs not being printed to a terminal
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    debug!("Parsed arguments: {cli:?}");

    match run(&Options::from(cli), &SystemSpawner) {
        Ok(Outcome::Launched { id }) => {
            debug!("Launched '{id}'");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("prism-picker: {e}");
            ExitCode::FAILURE
        }
    }
}
