//! Generic attribute blocks: `{#id .class key=value}`.
//!
//! Attached to ATX headings and fenced code info strings when the matching
//! option is enabled. A block with a syntax error is left as literal text.

/// Parsed attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Key/value pairs in source order; keys carry the configured prefix.
    pub properties: Vec<(String, String)>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.properties.is_empty()
    }

    /// Value of a property by its (prefixed) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Split a trailing attribute block off `text`.
///
/// Returns the text before the block (right-trimmed) and the attributes, or
/// `None` when `text` does not end in a well-formed block.
pub fn split_trailing<'a>(text: &'a str, prefix: &str) -> Option<(&'a str, Attributes)> {
    let trimmed = text.trim_end_matches([' ', '\t']);
    if !trimmed.ends_with('}') {
        return None;
    }
    let open = trimmed.rfind('{')?;
    // an escaped brace is literal text
    if trimmed[..open].ends_with('\\') {
        return None;
    }
    let attrs = parse(&trimmed[open..], prefix)?;
    Some((trimmed[..open].trim_end_matches([' ', '\t']), attrs))
}

/// Parse a complete `{...}` block.
pub fn parse(text: &str, prefix: &str) -> Option<Attributes> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    let bytes = inner.as_bytes();
    let mut attrs = Attributes::default();
    let mut i = 0;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b'#' => {
                let (name, next) = take_name(inner, i + 1)?;
                attrs.id = Some(name.to_owned());
                i = next;
            }
            b'.' => {
                let (name, next) = take_name(inner, i + 1)?;
                attrs.classes.push(name.to_owned());
                i = next;
            }
            b if is_key_start(b) => {
                let key_start = i;
                while i < bytes.len() && is_key_char(bytes[i]) {
                    i += 1;
                }
                let key = &inner[key_start..i];
                let value = if bytes.get(i) == Some(&b'=') {
                    let (value, next) = take_value(inner, i + 1)?;
                    i = next;
                    value
                } else {
                    ""
                };
                match key {
                    "id" => attrs.id = Some(value.to_owned()),
                    "class" => attrs
                        .classes
                        .extend(value.split_ascii_whitespace().map(str::to_owned)),
                    _ => attrs.properties.push((format!("{prefix}{key}"), value.to_owned())),
                }
            }
            _ => return None,
        }
        // items must be separated by whitespace
        if i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            return None;
        }
    }

    Some(attrs)
}

fn take_name(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'{' | b'}' | b'#' | b'.' | b'"' | b'\'' | b'=') {
        i += 1;
    }
    (i > start).then(|| (&text[start..i], i))
}

fn take_value(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    match bytes.get(start)? {
        quote @ (b'"' | b'\'') => {
            let close = memchr::memchr(*quote, &bytes[start + 1..])? + start + 1;
            Some((&text[start + 1..close], close + 1))
        }
        _ => {
            let mut i = start;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`' | b'{' | b'}')
            {
                i += 1;
            }
            (i > start).then(|| (&text[start..i], i))
        }
    }
}

#[inline]
fn is_key_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

#[inline]
fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':' | b'-')
}

/// Check a prefix for characters that could not start an attribute key.
pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    !prefix
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '{' | '}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_block() {
        let attrs = parse(r#"{#intro .lead .wide data-x=1 title="Hello there"}"#, "").unwrap();
        assert_eq!(attrs.id.as_deref(), Some("intro"));
        assert_eq!(attrs.classes, vec!["lead", "wide"]);
        assert_eq!(attrs.get("data-x"), Some("1"));
        assert_eq!(attrs.get("title"), Some("Hello there"));
    }

    #[test]
    fn test_prefix_applies_to_plain_keys_only() {
        let attrs = parse("{#a .b id=c class='d e' k=v flag}", "data-").unwrap();
        assert_eq!(attrs.id.as_deref(), Some("c"));
        assert_eq!(attrs.classes, vec!["b", "d", "e"]);
        assert_eq!(attrs.get("data-k"), Some("v"));
        assert_eq!(attrs.get("data-flag"), Some(""));
        assert_eq!(attrs.get("k"), None);
    }

    #[test]
    fn test_errors_reject_block() {
        assert_eq!(parse("{#}", ""), None);
        assert_eq!(parse("{key=\"open}", ""), None);
        assert_eq!(parse("{!bang}", ""), None);
        assert_eq!(parse("{.a.b}", ""), None);
        assert_eq!(parse("no braces", ""), None);
    }

    #[test]
    fn test_empty_block_is_valid() {
        assert_eq!(parse("{}", ""), Some(Attributes::default()));
    }

    #[test]
    fn test_split_trailing() {
        let (rest, attrs) = split_trailing("Heading text {#custom}", "").unwrap();
        assert_eq!(rest, "Heading text");
        assert_eq!(attrs.id.as_deref(), Some("custom"));

        assert!(split_trailing("Heading text {#bad id=}", "").is_none());
        assert!(split_trailing("No block", "").is_none());
        assert!(split_trailing(r"Escaped \{#x}", "").is_none());
    }

    #[test]
    fn test_prefix_validation() {
        assert!(is_valid_prefix(""));
        assert!(is_valid_prefix("data-"));
        assert!(!is_valid_prefix("data x"));
        assert!(!is_valid_prefix("a=b"));
    }
}
