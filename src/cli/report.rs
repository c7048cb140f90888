//! Annotate run summary.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::link::{FileKind, LinkStats};
use crate::utils::{plural_count, plural_s};

use super::common::LinkRecord;

/// Summary of an annotate run
#[derive(Debug, Default)]
pub struct AnnotateReport {
    /// Files loaded successfully.
    pub scanned: usize,
    /// Files whose markup changed, with the links changed in each.
    pub changed: BTreeMap<String, usize>,
    /// File links present after the pass, by kind.
    pub links: LinkStats,
    /// Per-file failures.
    pub errors: BTreeMap<String, String>,
}

impl AnnotateReport {
    /// Record a successfully loaded file.
    pub fn add_file(&mut self, path: String, records: &[LinkRecord]) {
        self.scanned += 1;
        for record in records {
            self.links.record(record.kind);
        }

        let changed = records.iter().filter(|r| r.changed).count();
        if changed > 0 {
            self.changed.insert(path, changed);
        }
    }

    /// Record a file that failed to load or write.
    pub fn add_error(&mut self, path: String, error: &anyhow::Error) {
        self.errors.insert(path, format!("{error:#}"));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Print changed files (verbose) and errors to stderr.
    pub fn print(&self, list_changed: bool) {
        if list_changed && !self.changed.is_empty() {
            for (path, count) in &self.changed {
                eprintln!(
                    "{} {} {}",
                    "→".green(),
                    path,
                    format!("({})", plural_count(*count, "link")).dimmed()
                );
            }
        }

        if self.errors.is_empty() {
            return;
        }

        eprintln!();
        eprintln!(
            "{} {}",
            "errors".red().bold(),
            format!(
                "({} file{})",
                self.errors.len(),
                plural_s(self.errors.len())
            )
            .dimmed()
        );
        for (path, error) in &self.errors {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            eprintln!("{} {}", "→".red(), error);
        }
    }
}

impl fmt::Display for AnnotateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} changed, {} (pdf {}, doc {}, zip {})",
            plural_count(self.scanned, "file"),
            self.changed.len(),
            plural_count(self.links.total(), "file link"),
            self.links.count(FileKind::Pdf),
            self.links.count(FileKind::Doc),
            self.links.count(FileKind::Zip),
        )?;
        if self.has_errors() {
            write!(
                f,
                ", {}",
                plural_count(self.errors.len(), "error").red()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: FileKind, changed: bool) -> LinkRecord {
        LinkRecord {
            href: format!("x{}", kind.needle()),
            kind,
            class: kind.class_token(),
            changed,
        }
    }

    #[test]
    fn test_report_counts() {
        let mut report = AnnotateReport::default();
        report.add_file(
            "a.html".into(),
            &[record(FileKind::Pdf, true), record(FileKind::Zip, false)],
        );
        report.add_file("b.html".into(), &[record(FileKind::Doc, false)]);
        report.add_file("c.html".into(), &[]);

        assert_eq!(report.scanned, 3);
        assert_eq!(report.changed.len(), 1);
        assert_eq!(report.changed["a.html"], 1);
        assert_eq!(report.links.total(), 3);
        assert!(!report.has_errors());

        assert_eq!(
            report.to_string(),
            "3 files scanned, 1 changed, 3 file links (pdf 1, doc 1, zip 1)"
        );
    }

    #[test]
    fn test_report_errors() {
        let mut report = AnnotateReport::default();
        report.add_error("bad.html".into(), &anyhow::anyhow!("failed to read"));
        assert!(report.has_errors());
        assert_eq!(report.errors["bad.html"], "failed to read");
        assert!(report.to_string().contains("1 error"));
    }
}
