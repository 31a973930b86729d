//! Heading identifiers.
//!
//! [`slugify`] turns heading text into an identifier and [`IdGenerator`]
//! keeps identifiers unique within one document.

use rustc_hash::FxHashMap;
use unicode_categories::UnicodeCategories;

/// Identifier used when nothing survives slugging.
pub const FALLBACK_ID: &str = "section";

/// Slugify heading text.
///
/// ```
/// assert_eq!(mdtree::slug::slugify("Maître d'hôtel"), "maître-dhôtel");
/// assert_eq!(mdtree::slug::slugify("??"), "section");
/// ```
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    slugify_into(&mut out, text);
    out
}

/// Slugify into a caller-provided buffer (cleared first).
pub fn slugify_into(out: &mut String, text: &str) {
    out.clear();
    let mut last: Option<char> = None;

    for c in text.chars() {
        let mapped = if c.is_whitespace() {
            '-'
        } else if c == '_' || c == '-' || c == '.' {
            c
        } else if c.is_letter() || c.is_number() || c.is_mark() {
            // lowercasing may expand, e.g. 'İ'
            for lower in c.to_lowercase() {
                out.push(lower);
            }
            last = out.chars().next_back();
            continue;
        } else {
            continue;
        };

        if last.is_some_and(is_separator) {
            continue;
        }
        if last.is_none() {
            // leading separators are dropped
            continue;
        }
        out.push(mapped);
        last = Some(mapped);
    }

    while out.ends_with(is_separator) {
        out.pop();
    }
    if out.is_empty() {
        out.push_str(FALLBACK_ID);
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.')
}

/// Hands out unique identifiers: `heading`, `heading-1`, `heading-2`, ...
#[derive(Debug, Default)]
pub struct IdGenerator {
    used: FxHashMap<String, u32>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an explicit identifier so generated ones avoid it.
    ///
    /// Returns false when it was already taken.
    pub fn reserve(&mut self, id: &str) -> bool {
        if self.used.contains_key(id) {
            return false;
        }
        self.used.insert(id.to_owned(), 0);
        true
    }

    /// A fresh identifier derived from `base`.
    pub fn unique(&mut self, base: &str) -> String {
        let Some(counter) = self.used.get(base).copied() else {
            self.used.insert(base.to_owned(), 0);
            return base.to_owned();
        };

        let mut n = counter + 1;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.used.contains_key(&candidate) {
                self.used.insert(base.to_owned(), n);
                self.used.insert(candidate.clone(), 0);
                return candidate;
            }
            n += 1;
        }
    }
}
