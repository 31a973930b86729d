//! Link reference definitions (CommonMark).

use rustc_hash::FxHashMap;

use crate::escape::unescape;
use crate::inline::links::{scan_link_destination, scan_link_label, scan_link_title, skip_spaces_and_newline};

/// A link reference definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    /// Label as written, without brackets.
    pub label: String,
    /// Destination with escapes and entities resolved.
    pub url: String,
    pub title: Option<String>,
}

/// Where a stored definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionSource {
    /// A `[label]: url` line in the document.
    Explicit,
    /// Synthesized from a heading's text, pointing at its identifier.
    HeadingReference,
}

/// Store of link reference definitions, keyed by normalized label.
#[derive(Debug, Default, Clone)]
pub struct LinkRefStore {
    defs: Vec<(LinkDefinition, DefinitionSource)>,
    by_label: FxHashMap<String, usize>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    ///
    /// Returns false when the label was already defined.
    pub fn insert(&mut self, normalized: String, def: LinkDefinition, source: DefinitionSource) -> bool {
        if self.by_label.contains_key(&normalized) {
            return false;
        }
        let idx = self.defs.len();
        self.defs.push((def, source));
        self.by_label.insert(normalized, idx);
        true
    }

    /// Look up by an already-normalized label.
    pub fn get(&self, normalized: &str) -> Option<&LinkDefinition> {
        self.by_label.get(normalized).map(|&idx| &self.defs[idx].0)
    }

    /// Look up by a raw label as written in the document.
    pub fn lookup(&self, raw_label: &str) -> Option<&LinkDefinition> {
        self.get(&normalize_label(raw_label))
    }

    pub fn source(&self, normalized: &str) -> Option<DefinitionSource> {
        self.by_label.get(normalized).map(|&idx| self.defs[idx].1)
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.by_label.contains_key(normalized)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&LinkDefinition, DefinitionSource)> {
        self.defs.iter().map(|(def, source)| (def, *source))
    }
}

/// Normalize a link label per CommonMark: collapse internal whitespace to
/// single spaces, trim, and case-fold.
///
/// Escapes and entities are left as written, so `[foo\!]` and `[foo!]` are
/// different labels.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    normalize_label_into(&mut out, label);
    out
}

/// [`normalize_label`] into a reusable buffer (cleared first).
pub fn normalize_label_into(out: &mut String, label: &str) {
    out.clear();
    let mut last_was_space = true;

    for ch in label.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }

        last_was_space = false;
        // full case folding maps these to "ss"; to_lowercase does not
        if ch == 'ß' || ch == 'ẞ' {
            out.push_str("ss");
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
}

/// A definition recognized at the start of paragraph text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    pub definition: LinkDefinition,
    /// Bytes consumed, including the final line ending if present.
    pub consumed: usize,
}

/// Try to read one link reference definition at the start of `text`.
///
/// `text` is paragraph content: lines joined by `\n` with leading
/// indentation already removed. A definition always ends at a line end.
pub fn parse_definition(text: &str) -> Option<ParsedDefinition> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let (label_range, after_label) = scan_link_label(bytes, 0)?;
    if bytes.get(after_label) != Some(&b':') {
        return None;
    }
    let label = &text[label_range];

    let dest_start = skip_spaces_and_newline(bytes, after_label + 1);
    let (dest_range, after_dest) = scan_link_destination(bytes, dest_start)?;
    // `[foo]: <>` is allowed, a bare empty destination is not
    if dest_range.is_empty() && bytes.get(dest_start) != Some(&b'<') {
        return None;
    }
    let url = unescape(&text[dest_range]).into_owned();

    let line_end_after = |pos: usize| -> Option<usize> {
        let mut i = pos;
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        match bytes.get(i) {
            None => Some(i),
            Some(b'\n') => Some(i + 1),
            _ => None,
        }
    };

    // with a title
    let title_start = skip_spaces_and_newline(bytes, after_dest);
    if title_start > after_dest {
        if let Some((title_range, after_title)) = scan_link_title(bytes, title_start) {
            if let Some(end) = line_end_after(after_title) {
                return Some(ParsedDefinition {
                    definition: LinkDefinition {
                        label: label.to_owned(),
                        url,
                        title: Some(unescape(&text[title_range]).into_owned()),
                    },
                    consumed: end,
                });
            }
        }
    }

    // without a title the destination must end its line
    let end = line_end_after(after_dest)?;
    Some(ParsedDefinition {
        definition: LinkDefinition {
            label: label.to_owned(),
            url,
            title: None,
        },
        consumed: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(label: &str, url: &str) -> LinkDefinition {
        LinkDefinition {
            label: label.into(),
            url: url.into(),
            title: None,
        }
    }

    #[test]
    fn test_first_definition_wins() {
        let mut store = LinkRefStore::new();
        assert!(store.insert("foo".into(), def("foo", "/url1"), DefinitionSource::Explicit));
        assert!(!store.insert("foo".into(), def("Foo", "/url2"), DefinitionSource::Explicit));
        assert_eq!(store.get("foo").unwrap().url, "/url1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Foo   Bar\n baz "), "foo bar baz");
        assert_eq!(normalize_label("ẞ"), "ss");
        assert_eq!(normalize_label("Straße"), "strasse");
        assert_eq!(normalize_label(r"a\]b"), r"a\]b");
        assert_eq!(normalize_label("&ouml;"), "&ouml;");
        assert_eq!(normalize_label("ΑΓΩ"), "αγω");
    }

    #[test]
    fn test_escaped_label_is_distinct() {
        let mut store = LinkRefStore::new();
        store.insert(normalize_label("foo!"), def("foo!", "/url"), DefinitionSource::Explicit);
        assert!(store.lookup(r"foo\!").is_none());
        assert!(store.lookup("FOO!").is_some());
    }

    #[test]
    fn test_normalize_into_keeps_capacity() {
        let mut buf = String::with_capacity(64);
        buf.push_str("stale");
        normalize_label_into(&mut buf, " Foo\tBar ");
        assert_eq!(buf, "foo bar");
        assert!(buf.capacity() >= 64);
    }

    #[test]
    fn test_lookup_normalizes() {
        let mut store = LinkRefStore::new();
        store.insert(normalize_label("Foo Bar"), def("Foo Bar", "/x"), DefinitionSource::Explicit);
        assert_eq!(store.lookup("FOO   bar").unwrap().url, "/x");
    }

    #[test]
    fn test_parse_simple_definition() {
        let parsed = parse_definition("[foo]: /url \"title\"\nrest").unwrap();
        assert_eq!(parsed.definition.label, "foo");
        assert_eq!(parsed.definition.url, "/url");
        assert_eq!(parsed.definition.title.as_deref(), Some("title"));
        assert_eq!(parsed.consumed, 20);
    }

    #[test]
    fn test_parse_definition_multiline() {
        let text = "[Foo bar]:\n<my url>\n'title'";
        let parsed = parse_definition(text).unwrap();
        assert_eq!(parsed.definition.url, "my url");
        assert_eq!(parsed.definition.title.as_deref(), Some("title"));
        assert_eq!(parsed.consumed, text.len());
    }

    #[test]
    fn test_title_on_next_line_falls_back() {
        // the title line has trailing junk, so the definition ends after the url
        let parsed = parse_definition("[foo]: /url\n\"title\" ok").unwrap();
        assert_eq!(parsed.definition.title, None);
        assert_eq!(parsed.consumed, 12);
    }

    #[test]
    fn test_rejects() {
        assert!(parse_definition("[foo]:").is_none());
        assert!(parse_definition("[foo] /url").is_none());
        assert!(parse_definition("[foo]: /url \"title\" junk").is_none());
        assert!(parse_definition("foo: /url").is_none());
    }

    #[test]
    fn test_empty_angle_destination() {
        let parsed = parse_definition("[foo]: <>").unwrap();
        assert_eq!(parsed.definition.url, "");
    }
}
