mod cli;
mod commands;
mod menu;
mod render;

use std::io;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tasktrack_core::{Config, FileStorage, TaskStore};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use menu::Menu;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().wrap_err("Failed to load config")?,
    };
    init_tracing(&config.log.level, cli.verbose);

    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.storage.data_path());
    tracing::debug!("Using data file {:?}", path);

    let mut store = TaskStore::open(FileStorage::new(&path))
        .wrap_err_with(|| format!("Failed to load data from {}", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Task(command)) => commands::run_task(&mut store, command, &mut out)?,
        Some(Commands::Goal(command)) => commands::run_goal(&mut store, command, &mut out)?,
        Some(Commands::Stats) => render::stats(&mut out, &store.stats())?,
        Some(Commands::Menu) | None => {
            let stdin = io::stdin();
            Menu::new(&mut store, stdin.lock(), &mut out).run()?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for `--json` output.
/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_tracing(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
