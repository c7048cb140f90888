//! Common utilities shared across CLI commands.
//!
//! File discovery and the load step both commands run: read a file, parse it
//! into an `HtmlPage` and fire the page load hooks.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::debug;
use crate::link::{Anchor, FileKind, annotate_file_links};
use crate::page::{HtmlPage, LoadHooks};
use crate::utils::path::{is_html_file, normalize_path, resolve_path};

// =============================================================================
// File Discovery
// =============================================================================

/// An HTML file to process and the directory its output path is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Collect HTML files from CLI paths, or from `[annotate] input` when none are given.
pub fn collect_html_files(paths: &[PathBuf], config: &Config) -> Result<Vec<InputFile>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    let input_dir = &config.annotate.input;
    let skip = WalkFilter::new(config);

    if paths.is_empty() {
        if !input_dir.is_dir() {
            bail!("Input directory not found: {}", input_dir.display());
        }
        return Ok(walk_html(&normalize_path(input_dir), &skip));
    }

    let mut files = Vec::new();
    for path in &paths {
        let resolved = resolve_path(path, input_dir);

        if resolved.is_file() {
            if !is_html_file(&resolved) {
                bail!("Not an html file: {}", path.display());
            }
            let root = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
            files.push(InputFile {
                path: resolved,
                root,
            });
        } else if resolved.is_dir() {
            files.extend(walk_html(&resolved, &skip));
        } else {
            bail!(
                "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                path.display(),
                path.display(),
                input_dir.join(path).display()
            );
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

/// Directories skipped while walking.
#[derive(Debug, Clone, Default)]
struct WalkFilter {
    names: FxHashSet<String>,
    /// Output directory, so a nested output is never fed back in.
    output: Option<PathBuf>,
}

impl WalkFilter {
    fn new(config: &Config) -> Self {
        Self {
            names: config.annotate.exclude.iter().cloned().collect(),
            output: config.annotate.output.as_deref().map(normalize_path),
        }
    }

    fn skips_dir(&self, path: &Path) -> bool {
        let excluded_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.names.contains(n));
        excluded_name || self.output.as_deref().is_some_and(|out| path == out)
    }
}

/// Walk `dir` for HTML files, pruning excluded directories.
fn walk_html(dir: &Path, skip: &WalkFilter) -> Vec<InputFile> {
    let filter = skip.clone();
    let mut files: Vec<InputFile> = WalkDir::new(dir)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry| match entry {
                Ok(e) => !(e.file_type().is_dir() && filter.skips_dir(&e.path())),
                Err(_) => true,
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_html_file(p))
        .map(|path| InputFile {
            path,
            root: dir.to_path_buf(),
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

// =============================================================================
// Page Loading
// =============================================================================

/// Load hooks every page runs; the file link pass is registered here.
pub fn page_hooks() -> LoadHooks<HtmlPage> {
    let mut hooks = LoadHooks::new();
    hooks.on_load(|page: &mut HtmlPage| {
        let stats = annotate_file_links(page.anchors_mut());
        debug!(
            "annotate";
            "{} anchors, {} file links (pdf {}, doc {}, zip {})",
            page.anchors().len(),
            stats.total(),
            stats.count(FileKind::Pdf),
            stats.count(FileKind::Doc),
            stats.count(FileKind::Zip)
        );
    });
    hooks
}

/// URL a page is served at: its path under the input root, appended to `base_url`.
///
/// `base_url` names the input root directory, so `https://example.com/docs`
/// and `https://example.com/docs/` are the same site. Files outside the root
/// keep only their file name.
pub fn page_url(base_url: Option<&Url>, file: &InputFile) -> Option<Url> {
    let base_url = base_url?;
    let rel = match file.path.strip_prefix(&file.root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => Path::new(file.path.file_name()?),
    };

    let mut url = base_url.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(rel.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        }));
    Some(url)
}

/// Read and parse a page, then fire the load hooks on it.
///
/// Relative links resolve against `url`, the page's own address.
pub fn load_page(path: &Path, hooks: &LoadHooks<HtmlPage>, url: Option<&Url>) -> Result<HtmlPage> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut page = HtmlPage::parse(source, url)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    if let Some(base) = page.base() {
        debug!("page"; "{}: resolving links against {}", path.display(), base);
    }
    hooks.fire(&mut page);
    Ok(page)
}

/// A file link found on a page after the load hooks ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub href: String,
    pub kind: FileKind,
    pub class: &'static str,
    /// Whether this load changed the anchor.
    #[serde(skip)]
    pub changed: bool,
}

/// File links of a loaded page, in document order.
pub fn link_records(page: &HtmlPage) -> Vec<LinkRecord> {
    page.file_links()
        .map(|(anchor, kind)| LinkRecord {
            href: anchor.href().unwrap_or_default().to_string(),
            kind,
            class: kind.class_token(),
            changed: anchor.is_changed(),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
