//! Configuration management for `filelink.toml`.
//!
//! The config file is optional. When present it is found by searching upward
//! from the current directory, and its directory becomes the project root.
//!
//! | Key                     | Purpose                                       |
//! |-------------------------|-----------------------------------------------|
//! | `[annotate] input`      | Directory scanned when no paths are given     |
//! | `[annotate] output`     | Write annotated files here instead of in place |
//! | `[annotate] base_url`   | Base URL relative links resolve against       |
//! | `[annotate] exclude`    | Directory names skipped while walking         |
//!
//! CLI flags (`--output`, `--base-url`) override the file.

mod error;
mod util;

pub use error::ConfigError;
use util::find_config_file;

use crate::cli::{Cli, DEFAULT_CONFIG_NAME};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

// ============================================================================
// [annotate] section
// ============================================================================

/// `[annotate]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateSection {
    /// Directory scanned when no paths are given on the command line.
    pub input: PathBuf,

    /// Output directory. `None` rewrites files in place.
    pub output: Option<PathBuf>,

    /// Base URL relative links resolve against.
    pub base_url: Option<String>,

    /// Directory names skipped while walking.
    pub exclude: Vec<String>,
}

impl Default for AnnotateSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: None,
            base_url: None,
            exclude: vec![".git".to_string(), "node_modules".to_string()],
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing filelink.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Parsed `annotate.base_url` (internal use only)
    #[serde(skip)]
    pub base: Option<Url>,

    /// Annotation settings
    #[serde(default)]
    pub annotate: AnnotateSection,
}

impl Config {
    /// Load configuration for a CLI invocation.
    ///
    /// A missing default config file is fine; a missing file named with
    /// `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                let path = cwd.join(&cli.config);
                return Err(ConfigError::Io(
                    path,
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
                .into());
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.finalize(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve paths against the root and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli) {
        let section = &mut self.annotate;

        section.input = self.root.join(&section.input);
        if let Some(output) = &section.output {
            section.output = Some(self.root.join(output));
        }

        // CLI paths are relative to cwd, not to the config root
        if let Some(output) = cli.html_output() {
            section.output = Some(normalize_path(output));
        }
        if let Some(base_url) = &cli.input().base_url {
            section.base_url = Some(base_url.clone());
        }
    }

    /// Validate settings and parse the base URL.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.base = match &self.annotate.base_url {
            Some(raw) => Some(parse_base_url(raw)?),
            None => None,
        };

        if let Some(output) = &self.annotate.output
            && output.is_file()
        {
            return Err(ConfigError::Validation(format!(
                "annotate.output `{}` is a file, expected a directory",
                output.display()
            )));
        }

        Ok(())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Whether a config file was found.
    pub fn has_file(&self) -> bool {
        !self.config_path.as_os_str().is_empty()
    }
}

/// Parse a base URL, rejecting relative or non-hierarchical ones.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ConfigError::Validation(format!("annotate.base_url `{raw}`: {err}")))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::Validation(format!(
            "annotate.base_url `{raw}` cannot be used as a base URL"
        )));
    }

    Ok(url)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("filelink").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.annotate, AnnotateSection::default());
        assert_eq!(config.annotate.input, PathBuf::from("."));
        assert_eq!(config.annotate.exclude, [".git", "node_modules"]);
    }

    #[test]
    fn test_parse_section() {
        let config = Config::from_str(
            r#"
            [annotate]
            input = "public"
            output = "dist"
            base_url = "https://example.com/docs/"
            exclude = ["drafts"]
            "#,
        )
        .unwrap();
        assert_eq!(config.annotate.input, PathBuf::from("public"));
        assert_eq!(config.annotate.output, Some(PathBuf::from("dist")));
        assert_eq!(
            config.annotate.base_url.as_deref(),
            Some("https://example.com/docs/")
        );
        assert_eq!(config.annotate.exclude, ["drafts"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_str("[annotate\ninput = 1").is_err());
        assert!(Config::from_str("[annotate]\ninput = 1").is_err());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) = Config::parse_with_ignored(
            "[annotate]\ninput = \"public\"\nicons = true\n\n[site]\ntitle = \"x\"\n",
        )
        .unwrap();
        assert_eq!(config.annotate.input, PathBuf::from("public"));
        assert_eq!(ignored, ["annotate.icons", "site"]);
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = Config::default();
        config.annotate.base_url = Some("https://example.com/a/".to_string());
        config.validate().unwrap();
        assert_eq!(
            config.base.as_ref().map(Url::as_str),
            Some("https://example.com/a/")
        );

        config.annotate.base_url = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.annotate.base_url = Some("mailto:someone@example.com".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_output_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("out.html");
        std::fs::write(&file, "").unwrap();

        let mut config = Config::default();
        config.annotate.output = Some(file);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_finalize_resolves_against_root_and_applies_cli() {
        let mut config = Config::from_str(
            "[annotate]\ninput = \"public\"\noutput = \"dist\"\nbase_url = \"https://a.com/\"\n",
        )
        .unwrap();
        config.root = PathBuf::from("/site");

        config.finalize(&cli(&["annotate"]));
        assert_eq!(config.annotate.input, PathBuf::from("/site/public"));
        assert_eq!(config.annotate.output, Some(PathBuf::from("/site/dist")));
        assert_eq!(config.annotate.base_url.as_deref(), Some("https://a.com/"));
    }

    #[test]
    fn test_finalize_cli_overrides() {
        let mut config = Config::from_str("[annotate]\nbase_url = \"https://a.com/\"\n").unwrap();
        config.root = PathBuf::from("/site");

        config.finalize(&cli(&["annotate", "-o", "/tmp/out", "-U", "https://b.org/"]));
        assert_eq!(config.annotate.output, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.annotate.base_url.as_deref(), Some("https://b.org/"));

        // scan's --output is a report file, not an html directory
        let mut config = Config::default();
        config.root = PathBuf::from("/site");
        config.finalize(&cli(&["scan", "-o", "report.json"]));
        assert_eq!(config.annotate.output, None);
    }

    #[test]
    fn test_has_file() {
        let mut config = Config::default();
        assert!(!config.has_file());
        config.config_path = PathBuf::from("/site/filelink.toml");
        assert!(config.has_file());
    }
}
