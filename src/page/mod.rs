//! Rendered HTML documents.
//!
//! `HtmlPage` is the host document for the link annotation pass. It parses
//! the page with `tl`, snapshots every `<a>` start tag and, when rendering,
//! splices back only the start tags whose attributes changed. Every other
//! byte of the source is preserved.
//!
//! # Modules
//!
//! - `tag`: start tag parsing and serialization
//! - `hooks`: additive "page loaded" handlers

mod hooks;
mod tag;

pub use hooks::LoadHooks;

use std::borrow::Cow;
use std::ops::Range;

use anyhow::{Result, anyhow};
use url::Url;

use crate::debug;
use crate::link::{Anchor, FileKind, effective_base, resolve_href};
use tag::{StartTag, raw_text_ranges, start_tag_len};

// =============================================================================
// AnchorElement
// =============================================================================

/// One `<a>` element of a page.
#[derive(Debug, Clone)]
pub struct AnchorElement {
    /// Byte range of the start tag in the page source.
    span: Range<usize>,
    original: StartTag,
    tag: StartTag,
    /// Resolved `href`, computed once at load.
    href: Option<String>,
}

impl AnchorElement {
    /// Whether the start tag differs from the source.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.tag != self.original
    }

    /// Kind of file this anchor links to (last matching rule).
    pub fn file_kind(&self) -> Option<FileKind> {
        self.href.as_deref().and_then(FileKind::classify)
    }
}

impl Anchor for AnchorElement {
    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    fn set_target(&mut self, target: &str) {
        self.tag.set("target", target);
    }

    fn set_class(&mut self, class: &str) {
        self.tag.set("class", class);
    }
}

// =============================================================================
// HtmlPage
// =============================================================================

/// A parsed HTML document and its anchor snapshot.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    source: String,
    anchors: Vec<AnchorElement>,
    base: Option<Url>,
}

impl HtmlPage {
    /// Parse a page, resolving links against its own `url` and any `<base href>`.
    pub fn parse(source: String, url: Option<&Url>) -> Result<Self> {
        let located = locate_elements(&source)?;
        let base = effective_base(url, located.base_href.as_deref());

        let anchors = located
            .anchors
            .into_iter()
            .filter_map(|span| {
                let tag = StartTag::parse(&source[span.clone()])?;
                let href = tag
                    .raw_value("href")
                    .map(|raw| resolve_href(raw, base.as_ref()));
                Some(AnchorElement {
                    span,
                    original: tag.clone(),
                    tag,
                    href,
                })
            })
            .collect();

        Ok(Self {
            source,
            anchors,
            base,
        })
    }

    /// Base URL links were resolved against.
    #[inline]
    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    #[inline]
    pub fn anchors(&self) -> &[AnchorElement] {
        &self.anchors
    }

    #[inline]
    pub fn anchors_mut(&mut self) -> &mut [AnchorElement] {
        &mut self.anchors
    }

    /// Whether any anchor changed since load.
    pub fn is_modified(&self) -> bool {
        self.anchors.iter().any(AnchorElement::is_changed)
    }

    /// Anchors linking to a pdf, doc or zip resource.
    pub fn file_links(&self) -> impl Iterator<Item = (&AnchorElement, FileKind)> {
        self.anchors
            .iter()
            .filter_map(|anchor| anchor.file_kind().map(|kind| (anchor, kind)))
    }

    /// Serialize the page. Borrows the source when nothing changed.
    pub fn render(&self) -> Cow<'_, str> {
        let mut changed = self.anchors.iter().filter(|a| a.is_changed()).peekable();
        if changed.peek().is_none() {
            return Cow::Borrowed(&self.source);
        }

        let mut out = String::with_capacity(self.source.len() + 64);
        let mut cursor = 0;
        for anchor in changed {
            out.push_str(&self.source[cursor..anchor.span.start]);
            out.push_str(&anchor.tag.render());
            cursor = anchor.span.end;
        }
        out.push_str(&self.source[cursor..]);

        Cow::Owned(out)
    }
}

// =============================================================================
// Element Location
// =============================================================================

struct Located {
    /// Anchor start tag spans, in document order.
    anchors: Vec<Range<usize>>,
    /// Raw `href` of the first `<base>` carrying one.
    base_href: Option<String>,
}

fn locate_elements(source: &str) -> Result<Located> {
    let dom = tl::parse(source, tl::ParserOptions::default())
        .map_err(|err| anyhow!("failed to parse html: {err:?}"))?;

    let mut anchors = Vec::new();
    let mut bases = Vec::new();

    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else {
            continue;
        };
        let name = tag.name().as_utf8_str();

        let is_anchor = name.eq_ignore_ascii_case("a");
        if !is_anchor && !name.eq_ignore_ascii_case("base") {
            continue;
        }

        let Some(span) = start_tag_span(source, tag.raw().as_bytes()) else {
            debug!("page"; "skipping <{}>: start tag not found in source", name);
            continue;
        };

        if is_anchor {
            anchors.push(span);
        } else {
            bases.push(span);
        }
    }

    // Markup-looking text inside script, style, textarea or title is not
    // part of the document.
    let raw_text = raw_text_ranges(source);
    let outside_raw_text = |span: &Range<usize>| !raw_text.iter().any(|r| r.contains(&span.start));
    anchors.retain(outside_raw_text);
    bases.retain(outside_raw_text);

    anchors.sort_by_key(|span| span.start);
    anchors.dedup_by_key(|span| span.start);
    bases.sort_by_key(|span| span.start);

    let base_href = bases.iter().find_map(|span| {
        StartTag::parse(&source[span.clone()])?
            .raw_value("href")
            .map(str::to_string)
    });

    Ok(Located { anchors, base_href })
}

/// Byte offset of `slice` inside `source`, if it borrows from it.
fn offset_in(source: &str, slice: &[u8]) -> Option<usize> {
    let start = source.as_ptr() as usize;
    let ptr = slice.as_ptr() as usize;
    (ptr >= start && ptr + slice.len() <= start + source.len()).then(|| ptr - start)
}

/// Span of the start tag at the beginning of an element's raw markup.
fn start_tag_span(source: &str, raw: &[u8]) -> Option<Range<usize>> {
    let start = offset_in(source, raw)?;
    let rest = source.get(start..start + raw.len())?;
    let len = start_tag_len(rest)?;
    Some(start..start + len)
}

// =============================================================================
// Tests
// =============================================================================
