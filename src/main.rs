//! filelink - mark pdf/doc/zip links in rendered HTML.

mod cli;
mod config;
mod link;
mod logger;
mod page;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    if config.has_file() {
        debug!("config"; "using {}", config.config_path.display());
    } else {
        debug!("config"; "no {} found, using defaults", cli.config.display());
    }

    match &cli.command {
        Commands::Annotate { args } => cli::annotate::run_annotate(args, &config),
        Commands::Scan { args } => cli::scan::run_scan(args, &config),
    }
}
