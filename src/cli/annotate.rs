//! `filelink annotate`: mark file links and write the pages back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use crate::cli::AnnotateArgs;
use crate::config::Config;
use crate::logger::{ProgressLine, is_verbose};
use crate::page::{HtmlPage, LoadHooks};
use crate::utils::path::{display_relative, output_path_for};
use crate::{debug, log};

use super::common::{
    InputFile, LinkRecord, collect_html_files, link_records, load_page, page_hooks, page_url,
};
use super::report::AnnotateReport;

/// Run the annotate command.
pub fn run_annotate(args: &AnnotateArgs, config: &Config) -> Result<()> {
    let files = collect_html_files(&args.input.paths, config)?;
    if files.is_empty() {
        log!("annotate"; "no html files found");
        return Ok(());
    }

    if let Some(output) = &config.annotate.output {
        debug!("annotate"; "writing to {}", output.display());
    }

    let hooks = page_hooks();
    let progress = ProgressLine::new("annotate", &[("html", files.len())]);

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let result = annotate_file(file, &hooks, config, args.dry);
            progress.inc("html");
            (file, result)
        })
        .collect();

    progress.finish();

    let mut report = AnnotateReport::default();
    for (file, result) in results {
        let path = display_relative(&file.path, config.get_root());
        match result {
            Ok(records) => report.add_file(path, &records),
            Err(err) => report.add_error(path, &err),
        }
    }

    report.print(args.dry || is_verbose());
    if report.links.is_empty() {
        debug!("annotate"; "no pdf, doc or zip links found");
    }
    if args.dry {
        log!("annotate"; "dry run: {}", report);
    } else {
        log!("annotate"; "{}", report);
    }

    if report.has_errors() {
        bail!("{} file(s) failed", report.errors.len());
    }
    Ok(())
}

/// Load, annotate and (unless `dry`) write a single file.
fn annotate_file(
    file: &InputFile,
    hooks: &LoadHooks<HtmlPage>,
    config: &Config,
    dry: bool,
) -> Result<Vec<LinkRecord>> {
    let url = page_url(config.base.as_ref(), file);
    let page = load_page(&file.path, hooks, url.as_ref())?;
    let records = link_records(&page);

    if !dry {
        let dest = destination(file, config.annotate.output.as_deref());
        write_page(&page, &file.path, dest.as_deref())?;
    }

    Ok(records)
}

/// Output path for a file, `None` when rewriting in place.
fn destination(file: &InputFile, output_dir: Option<&Path>) -> Option<PathBuf> {
    output_dir.map(|dir| output_path_for(&file.path, &file.root, dir))
}

/// Write a page to `dest`, or back to `source` if it changed.
fn write_page(page: &HtmlPage, source: &Path, dest: Option<&Path>) -> Result<()> {
    let target = match dest {
        Some(dest) => dest,
        None if page.is_modified() => source,
        None => return Ok(()),
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(target, page.render().as_bytes())
        .with_context(|| format!("failed to write {}", target.display()))
}

// =============================================================================
// Tests
// =============================================================================
