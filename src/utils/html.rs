//! HTML utility functions.
//!
//! - `escape_attr()` - attribute value escaping
//! - `unescape()` - character reference decoding

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping inside a double-quoted attribute.
const ATTR_ESCAPE_CHARS: [char; 4] = ['<', '>', '&', '"'];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape a value for a double-quoted HTML attribute.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ATTR_ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// HTML Unescaping
// =============================================================================

/// Longest entity body we try to decode (without `&` and `;`).
const MAX_ENTITY_LEN: usize = 10;

/// Decode HTML character references.
///
/// Handles numeric references, common named entities and the named forms of
/// URL punctuation (`&period;`, `&sol;`, `&quest;`). Anything that does not
/// form a complete, known reference is kept verbatim, so `?a=1&b=2` survives
/// untouched.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];

        let decoded = rest
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|&(_, c)| c == ';')
            .and_then(|(end, _)| decode_entity(&rest[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &rest[end + 1..];
            }
            None => result.push('&'),
        }
    }

    result.push_str(rest);
    Cow::Owned(result)
}

/// Decode a single entity body such as `amp` or `#x2E`.
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        // URL punctuation
        "period" => Some('.'),
        "sol" => Some('/'),
        "colon" => Some(':'),
        "quest" => Some('?'),
        "equals" => Some('='),
        "num" => Some('#'),
        "percnt" => Some('%'),
        "commat" => Some('@'),
        "lowbar" => Some('_'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("normal"), "normal");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_attr("<x>"), "&lt;x&gt;");
        assert!(matches!(escape_attr("pdfLink"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("hello"), "hello");
        assert_eq!(unescape("&lt;script&gt;"), "<script>");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(unescape("&#39;"), "'");
        assert_eq!(unescape("&#x27;"), "'");
        assert_eq!(unescape("&#65;"), "A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_bare_ampersands() {
        assert_eq!(unescape("?a=1&b=2.pdf"), "?a=1&b=2.pdf");
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("trailing&"), "trailing&");
        assert_eq!(unescape("&unknown;"), "&unknown;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_unescape_url_punctuation() {
        assert_eq!(unescape("a&period;pdf"), "a.pdf");
        assert_eq!(
            unescape("https&colon;&sol;&sol;example.com&sol;get&quest;f&equals;x&period;zip"),
            "https://example.com/get?f=x.zip"
        );
        assert_eq!(unescape("&num;top&percnt;20&commat;me&lowbar;x"), "#top%20@me_x");
    }
}
