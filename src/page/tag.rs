//! Start tag model used to rewrite a single element in place.
//!
//! Attributes keep their order, quoting and raw (undecoded) values, so a tag
//! that is parsed and rendered again only differs in inter-attribute
//! whitespace. Values written through [`StartTag::set`] are double-quoted.

use std::ops::Range;

use crate::utils::html::{escape_attr, unescape};

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrValue {
    /// Value as written in the source, without quotes.
    raw: String,
    quote: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attr {
    name: String,
    value: Option<AttrValue>,
}

/// A parsed `<name attr=value ...>` start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    attrs: Vec<Attr>,
    self_closing: bool,
}

impl StartTag {
    /// Parse a complete start tag, `<` through `>`.
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix('<')?.strip_suffix('>')?;

        let name_len = body
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(body.len());
        if name_len == 0 {
            return None;
        }
        let (name, rest) = body.split_at(name_len);

        let (attrs, self_closing) = parse_attributes(rest);
        Some(Self {
            name: name.to_string(),
            attrs,
            self_closing,
        })
    }

    /// Raw value of the first attribute called `name` (`""` for a bare attribute).
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|attr| attr.value.as_ref().map_or("", |v| v.raw.as_str()))
    }

    /// Set an attribute, replacing the first occurrence or appending.
    ///
    /// Returns `false` when the attribute already holds `value`.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let new_value = AttrValue {
            raw: escape_attr(value).into_owned(),
            quote: Some('"'),
        };

        match self
            .attrs
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => {
                let current = attr.value.as_ref().map_or("", |v| v.raw.as_str());
                if attr.value.is_some() && unescape(current) == value {
                    return false;
                }
                attr.value = Some(new_value);
            }
            None => self.attrs.push(Attr {
                name: name.to_string(),
                value: Some(new_value),
            }),
        }
        true
    }

    /// Serialize back to markup.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2 + self.attrs.len() * 16);
        out.push('<');
        out.push_str(&self.name);

        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push('=');
                match value.quote {
                    Some(q) => {
                        out.push(q);
                        out.push_str(&value.raw);
                        out.push(q);
                    }
                    None => out.push_str(&value.raw),
                }
            }
        }

        if self.self_closing {
            // An unquoted value would swallow the slash.
            let last_unquoted = self
                .attrs
                .last()
                .and_then(|attr| attr.value.as_ref())
                .is_some_and(|v| v.quote.is_none());
            if last_unquoted {
                out.push(' ');
            }
            out.push('/');
        }

        out.push('>');
        out
    }

    fn find(&self, name: &str) -> Option<&Attr> {
        self.attrs
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }
}

/// Byte length of the start tag at the beginning of `s`, `>` included.
///
/// Quoted attribute values may contain `>`.
pub fn start_tag_len(s: &str) -> Option<usize> {
    if !s.starts_with('<') {
        return None;
    }

    let mut quote = None;
    let mut after_eq = false;
    for (i, c) in s.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '>' => return Some(i + 1),
                '"' | '\'' if after_eq => quote = Some(c),
                _ => {}
            },
        }
        if quote.is_none() && !c.is_ascii_whitespace() {
            after_eq = c == '=';
        }
    }
    None
}

/// Elements whose content is text, never markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Byte ranges of the content of every raw text element in `source`.
///
/// A range runs from the end of the start tag to the matching `</name`
/// (ASCII case-insensitive), or to the end of the source when unclosed.
/// Comments are skipped so a commented-out `<script>` opens nothing.
pub fn raw_text_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find('<') {
        let start = pos + found;
        let rest = &source[start..];

        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(source.len(), |end| start + end + 3);
            continue;
        }

        let Some(name) = raw_text_name(&rest[1..]) else {
            pos = start + 1;
            continue;
        };
        let Some(tag_len) = start_tag_len(rest) else {
            break;
        };

        let content = start + tag_len;
        let end = find_end_tag(&source[content..], name).map_or(source.len(), |i| content + i);
        ranges.push(content..end);
        pos = end;
    }

    ranges
}

/// The raw text element name `s` starts with, if any.
fn raw_text_name(s: &str) -> Option<&'static str> {
    RAW_TEXT_ELEMENTS
        .into_iter()
        .find(|name| starts_with_tag_name(s, name))
}

/// Offset of the first `</name` end tag in `s`.
fn find_end_tag(s: &str, name: &str) -> Option<usize> {
    s.match_indices("</")
        .map(|(i, _)| i)
        .find(|&i| starts_with_tag_name(&s[i + 2..], name))
}

/// Whether `s` starts with `name` followed by a tag name boundary.
fn starts_with_tag_name(s: &str, name: &str) -> bool {
    let matches_name = s
        .get(..name.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(name));
    matches_name
        && s[name.len()..]
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_whitespace() || c == '/' || c == '>')
}

/// Parse the attribute section of a start tag.
///
/// Input: ` href="a.pdf" class=x download /`
fn parse_attributes(s: &str) -> (Vec<Attr>, bool) {
    let mut attrs = Vec::new();
    let mut self_closing = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_whitespace() {
            continue;
        }

        if c == '/' {
            // Only a slash right before `>` marks the tag self-closing.
            self_closing = chars.clone().all(|c| c.is_ascii_whitespace());
            continue;
        }

        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_ascii_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            attrs.push(Attr { name, value: None });
            continue;
        }
        chars.next();

        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }

        let value = match chars.peek().copied() {
            Some(q @ ('"' | '\'')) => {
                chars.next();
                let raw: String = chars.by_ref().take_while(|&c| c != q).collect();
                AttrValue {
                    raw,
                    quote: Some(q),
                }
            }
            _ => {
                let mut raw = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_whitespace() {
                        break;
                    }
                    raw.push(c);
                    chars.next();
                }
                AttrValue { raw, quote: None }
            }
        };

        attrs.push(Attr {
            name,
            value: Some(value),
        });
    }

    (attrs, self_closing)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let tag = StartTag::parse(r#"<a href="report.pdf" class='old' download>"#).unwrap();
        assert_eq!(tag.name, "a");
        assert_eq!(tag.raw_value("href"), Some("report.pdf"));
        assert_eq!(tag.raw_value("class"), Some("old"));
        assert_eq!(tag.raw_value("download"), Some(""));
        assert_eq!(tag.raw_value("target"), None);
    }

    #[test]
    fn test_parse_unquoted_and_case() {
        let tag = StartTag::parse("<A HREF=files/a.zip Title = x>").unwrap();
        assert_eq!(tag.name, "A");
        assert_eq!(tag.raw_value("href"), Some("files/a.zip"));
        assert_eq!(tag.raw_value("title"), Some("x"));
    }

    #[test]
    fn test_parse_rejects_non_tags() {
        assert!(StartTag::parse("a href=x>").is_none());
        assert!(StartTag::parse("<a href=x").is_none());
        assert!(StartTag::parse("<>").is_none());
    }

    #[test]
    fn test_raw_value_keeps_entities() {
        let tag = StartTag::parse(r#"<a href="get?f=a.zip&amp;v=2">"#).unwrap();
        assert_eq!(tag.raw_value("href"), Some("get?f=a.zip&amp;v=2"));
    }

    #[test]
    fn test_render_roundtrip_preserves_quoting() {
        let src = r#"<a href='x.pdf' data-x=1 hidden class="a b">"#;
        assert_eq!(StartTag::parse(src).unwrap().render(), src);
    }

    #[test]
    fn test_render_normalizes_whitespace_only() {
        let tag = StartTag::parse("<a   href=\"x\"\n  id=y >").unwrap();
        assert_eq!(tag.render(), r#"<a href="x" id=y>"#);
    }

    #[test]
    fn test_set_replaces_first_occurrence() {
        let mut tag = StartTag::parse(r#"<a class="one" href="a.pdf" class="two">"#).unwrap();
        assert!(tag.set("class", "pdfLink"));
        assert_eq!(
            tag.render(),
            r#"<a class="pdfLink" href="a.pdf" class="two">"#
        );
    }

    #[test]
    fn test_set_appends_missing() {
        let mut tag = StartTag::parse(r#"<a href="a.pdf">"#).unwrap();
        assert!(tag.set("target", "_blank"));
        assert!(tag.set("class", "pdfLink"));
        assert_eq!(
            tag.render(),
            r#"<a href="a.pdf" target="_blank" class="pdfLink">"#
        );
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let mut tag = StartTag::parse("<a target='_blank' class=pdfLink>").unwrap();
        let before = tag.clone();
        assert!(!tag.set("TARGET", "_blank"));
        assert!(!tag.set("class", "pdfLink"));
        assert_eq!(tag, before);
    }

    #[test]
    fn test_set_bare_attribute_gets_value() {
        let mut tag = StartTag::parse("<a href=a.zip class>").unwrap();
        assert!(tag.set("class", "zipLink"));
        assert_eq!(tag.render(), r#"<a href=a.zip class="zipLink">"#);
    }

    #[test]
    fn test_self_closing() {
        let tag = StartTag::parse(r#"<a href="x.pdf"/>"#).unwrap();
        assert_eq!(tag.raw_value("href"), Some("x.pdf"));
        assert_eq!(tag.render(), r#"<a href="x.pdf"/>"#);

        let tag = StartTag::parse("<a href=x.pdf />").unwrap();
        assert_eq!(tag.render(), "<a href=x.pdf />");
    }

    #[test]
    fn test_start_tag_len() {
        assert_eq!(start_tag_len("<a href=\"x\">text</a>"), Some(12));
        assert_eq!(start_tag_len("<a title=\"a > b\" href=x>t</a>"), Some(24));
        assert_eq!(start_tag_len("<a title='it\"s'>"), Some(16));
        assert_eq!(start_tag_len("<a href=\"unterminated"), None);
        assert_eq!(start_tag_len("text"), None);
    }

    #[test]
    fn test_raw_text_ranges() {
        assert_eq!(raw_text_ranges("<p>x</p><script>a<b</script>"), [16..19]);
        assert_eq!(raw_text_ranges("<STYLE type=x>b</Style >"), [14..15]);
        assert_eq!(
            raw_text_ranges("<title>t</title><textarea>a</textarea>"),
            [7..8, 26..27]
        );
    }

    #[test]
    fn test_raw_text_ranges_unclosed_runs_to_end() {
        assert_eq!(raw_text_ranges("<textarea><a href=x>"), [10..20]);
    }

    #[test]
    fn test_raw_text_ranges_ignores_lookalikes() {
        assert!(raw_text_ranges("<!-- <script> --><a href=x>").is_empty());
        assert!(raw_text_ranges("<scripts>x</scripts><titles>").is_empty());
        assert!(raw_text_ranges("no markup").is_empty());
    }
}
