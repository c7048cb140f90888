//! File link annotation.
//!
//! Marks links to downloadable documents so themes can show a file-type icon
//! and open them in a new tab.
//!
//! | Needle | Class token | Target   |
//! |--------|-------------|----------|
//! | `.pdf` | `pdfLink`   | `_blank` |
//! | `.doc` | `docLink`   | `_blank` |
//! | `.zip` | `zipLink`   | `_blank` |
//!
//! Matching is a plain substring test on the resolved URL, so `foo.pdfs` and
//! `mydocx.html` match too. Rules run in table order and each one replaces the
//! class, so the last matching rule wins.

mod resolve;

pub use resolve::{effective_base, resolve_href};

use serde::Serialize;

/// Target value that opens a link in a new browsing context.
pub const NEW_CONTEXT_TARGET: &str = "_blank";

// =============================================================================
// FileKind
// =============================================================================

/// Recognized file link kinds, in rule evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Doc,
    Zip,
}

impl FileKind {
    /// All kinds in the order their rules are applied.
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Doc, Self::Zip];

    /// Substring searched for in the resolved URL.
    #[inline]
    pub const fn needle(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Doc => ".doc",
            Self::Zip => ".zip",
        }
    }

    /// Class token assigned to matching links.
    #[inline]
    pub const fn class_token(self) -> &'static str {
        match self {
            Self::Pdf => "pdfLink",
            Self::Doc => "docLink",
            Self::Zip => "zipLink",
        }
    }

    /// Every kind whose needle occurs in `url`, in rule order.
    pub fn matching(url: &str) -> impl Iterator<Item = Self> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |kind| url.contains(kind.needle()))
    }

    /// The kind whose class ends up on a link with this URL (last match wins).
    pub fn classify(url: &str) -> Option<Self> {
        Self::matching(url).last()
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Anchor
// =============================================================================

/// A hyperlink element owned by some host document.
pub trait Anchor {
    /// Resolved link URL, `None` when the element has no `href`.
    fn href(&self) -> Option<&str>;

    /// Replace (or add) the `target` attribute.
    fn set_target(&mut self, target: &str);

    /// Replace (or add) the `class` attribute.
    fn set_class(&mut self, class: &str);
}

/// Per-kind counts of annotated anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    counts: [usize; 3],
}

impl LinkStats {
    #[inline]
    pub fn record(&mut self, kind: FileKind) {
        self.counts[kind.index()] += 1;
    }

    #[inline]
    pub fn count(&self, kind: FileKind) -> usize {
        self.counts[kind.index()]
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// =============================================================================
// Annotation Pass
// =============================================================================

/// Annotate every anchor that links to a pdf, doc or zip resource.
///
/// Anchors without a match are left alone. Running the pass twice yields the
/// same state as running it once.
pub fn annotate_file_links<'a, A, I>(anchors: I) -> LinkStats
where
    A: Anchor + 'a,
    I: IntoIterator<Item = &'a mut A>,
{
    let mut stats = LinkStats::default();

    for anchor in anchors {
        let kinds: Vec<FileKind> = FileKind::matching(anchor.href().unwrap_or_default()).collect();

        for &kind in &kinds {
            anchor.set_target(NEW_CONTEXT_TARGET);
            anchor.set_class(kind.class_token());
        }

        if let Some(&winner) = kinds.last() {
            stats.record(winner);
        }
    }

    stats
}

// =============================================================================
// Tests
// =============================================================================
