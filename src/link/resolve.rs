//! Resolve raw `href` attribute values into the URL a browser would report.

use url::Url;

use crate::utils::html::unescape;

/// Resolve an `href` attribute value.
///
/// Character references are decoded and surrounding ASCII whitespace trimmed.
/// With a base URL the value is joined against it; a value that fails to join
/// is returned as written, like `HTMLAnchorElement.href` does.
pub fn resolve_href(raw: &str, base: Option<&Url>) -> String {
    let decoded = unescape(raw);
    let value = decoded.trim_matches(|c: char| c.is_ascii_whitespace());

    match base.map(|base| base.join(value)) {
        Some(Ok(url)) => url.into(),
        _ => value.to_string(),
    }
}

/// Pick the base URL links in a document resolve against.
///
/// The document's own `<base href>` wins over the page URL. A relative
/// `<base href>` is joined to the page URL; an unusable one is ignored.
pub fn effective_base(page_url: Option<&Url>, doc_base: Option<&str>) -> Option<Url> {
    let Some(raw) = doc_base else {
        return page_url.cloned();
    };

    let decoded = unescape(raw);
    let value = decoded.trim_matches(|c: char| c.is_ascii_whitespace());

    let parsed = match page_url {
        Some(page) => page.join(value),
        None => Url::parse(value),
    };

    match parsed {
        Ok(url) if !url.cannot_be_a_base() => Some(url),
        _ => page_url.cloned(),
    }
}
