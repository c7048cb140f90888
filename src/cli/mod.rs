//! Command-line interface module.

mod args;
pub mod annotate;
pub mod common;
mod report;
pub mod scan;

pub use args::{AnnotateArgs, Cli, Commands, DEFAULT_CONFIG_NAME, ScanArgs};
