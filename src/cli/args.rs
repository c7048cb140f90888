//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Config file name searched for when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "filelink.toml";

/// Annotate pdf/doc/zip links in rendered HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: filelink.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_NAME, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Mark file links in HTML files (in place or into an output directory)
    #[command(visible_alias = "a")]
    Annotate {
        #[command(flatten)]
        args: AnnotateArgs,
    },

    /// Report file links as JSON without writing any HTML
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },
}

/// Shared input arguments for Annotate and Scan
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// HTML files or directories. If omitted, uses `[annotate] input`.
    /// Use `-` to read paths from stdin (one per line).
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Base URL relative links resolve against (overrides `[annotate] base_url`)
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,
}

/// Annotate command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write annotated files here instead of rewriting them in place
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry: bool,
}

/// Scan command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Input arguments of the active command.
    pub fn input(&self) -> &InputArgs {
        match &self.command {
            Commands::Annotate { args } => &args.input,
            Commands::Scan { args } => &args.input,
        }
    }

    /// Output directory for annotated HTML, if the command writes one.
    pub fn html_output(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Annotate { args } => args.output.as_ref(),
            Commands::Scan { .. } => None,
        }
    }
}
