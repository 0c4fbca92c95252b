use aho_corasick::{AhoCorasick, MatchKind};
use memchr::memchr;
use once_cell::sync::Lazy;

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Unescape XML special characters.
///
/// Replaces the five standard XML entities and numeric character references
/// (`&#233;`, `&#xE9;`) with their corresponding characters.
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use docgrade::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("Obr&#225;zek"), "Obrázek");
/// assert_eq!(unescape_xml("a & b"), "a & b"); // unchanged
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// ```
pub fn unescape_xml(s: &str) -> String {
    if memchr(b'&', s.as_bytes()).is_none() {
        return s.to_string();
    }
    if !s.contains("&#") {
        return XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]);
    }
    unescape_refs(s)
}

/// Resolve the body of a general entity reference (`amp`, `#233`, `#xE9`).
///
/// Returns `None` for entities that are neither predefined nor numeric.
pub fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}

fn unescape_refs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';').and_then(|end| resolve_entity(&tail[..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            },
            None => {
                out.push('&');
                rest = tail;
            },
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_named_entities() {
        assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unescape_numeric_references() {
        assert_eq!(unescape_xml("&#x4F;K &#79;K"), "OK OK");
        assert_eq!(unescape_xml("&#;"), "&#;");
        assert_eq!(unescape_xml("&#12"), "&#12");
        assert_eq!(unescape_xml("&amp;#65; &#65;"), "&#65; A");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("#x41"), Some('A'));
        assert_eq!(resolve_entity("nbsp"), None);
    }
}
