//! `filelink scan`: report file links as JSON without writing HTML.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::path::display_relative;

use super::common::{
    LinkRecord, collect_html_files, link_records, load_page, page_hooks, page_url,
};

/// File links of one page.
#[derive(Debug, Serialize)]
pub struct PageLinks {
    pub path: String,
    pub links: Vec<LinkRecord>,
}

/// Pages with file links plus the files that failed to load.
#[derive(Debug, Default)]
struct ScanResult {
    pages: Vec<PageLinks>,
    errors: BTreeMap<String, String>,
}

/// Run the scan command.
///
/// Pages that fail to load are reported after the JSON for the rest is
/// written, and make the command fail.
pub fn run_scan(args: &ScanArgs, config: &Config) -> Result<()> {
    let ScanResult { pages, errors } = scan_pages(args, config)?;
    let formatted = format_report(&pages, args.pretty)?;

    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        writeln!(file, "{formatted}")?;
        log!("scan"; "wrote {} page(s) to {}", pages.len(), output_path.display());
    } else {
        println!("{formatted}");
    }

    if !errors.is_empty() {
        for (path, error) in &errors {
            log!("error"; "{}: {}", path, error);
        }
        bail!("{} file(s) failed", errors.len());
    }
    Ok(())
}

/// Load every input page and keep those with at least one file link.
fn scan_pages(args: &ScanArgs, config: &Config) -> Result<ScanResult> {
    let files = collect_html_files(&args.input.paths, config)?;
    let hooks = page_hooks();
    let progress = ProgressLine::new("scan", &[("html", files.len())]);

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let url = page_url(config.base.as_ref(), file);
            let page = load_page(&file.path, &hooks, url.as_ref());
            progress.inc("html");
            (file, page.map(|page| link_records(&page)))
        })
        .collect();

    progress.finish();

    let mut scan = ScanResult::default();
    for (file, result) in results {
        let path = display_relative(&file.path, config.get_root());
        match result {
            Ok(links) if links.is_empty() => {}
            Ok(links) => scan.pages.push(PageLinks { path, links }),
            Err(err) => {
                scan.errors.insert(path, format!("{err:#}"));
            }
        }
    }
    Ok(scan)
}

fn format_report(pages: &[PageLinks], pretty: bool) -> Result<String> {
    let formatted = if pretty {
        serde_json::to_string_pretty(pages)?
    } else {
        serde_json::to_string(pages)?
    };
    Ok(formatted)
}

// =============================================================================
// Tests
// =============================================================================
