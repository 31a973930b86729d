//! Footnote definitions storage.

use rustc_hash::FxBuildHasher as FastHashBuilder;
use std::collections::HashMap;

use crate::link_ref::normalize_label;

/// A footnote definition as seen by references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteEntry {
    /// The label as first written.
    pub label: String,
    /// 1-based number, assigned in order of first reference.
    pub order: Option<u32>,
}

/// Store of footnote definitions, keyed by normalized label.
#[derive(Debug, Default, Clone)]
pub struct FootnoteStore {
    defs: Vec<FootnoteEntry>,
    by_label: HashMap<String, usize, FastHashBuilder>,
    next_order: u32,
}

impl FootnoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    pub fn insert(&mut self, normalized_label: String, label: String) -> bool {
        if self.by_label.contains_key(&normalized_label) {
            return false;
        }
        let idx = self.defs.len();
        self.defs.push(FootnoteEntry { label, order: None });
        self.by_label.insert(normalized_label, idx);
        true
    }

    pub fn get(&self, normalized_label: &str) -> Option<&FootnoteEntry> {
        self.by_label.get(normalized_label).map(|&idx| &self.defs[idx])
    }

    pub fn contains(&self, normalized_label: &str) -> bool {
        self.by_label.contains_key(normalized_label)
    }

    /// Number of a footnote, assigning the next one on first reference.
    pub fn reference(&mut self, normalized_label: &str) -> Option<u32> {
        let idx = *self.by_label.get(normalized_label)?;
        let entry = &mut self.defs[idx];
        if entry.order.is_none() {
            self.next_order += 1;
            entry.order = Some(self.next_order);
        }
        entry.order
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FootnoteEntry> {
        self.defs.iter()
    }
}

/// Validate and normalize a footnote label (the text between `[^` and `]`).
///
/// Labels may not be empty or contain whitespace or brackets.
pub fn normalize_footnote_label(label: &str) -> Option<String> {
    if label.is_empty() || label.chars().any(|c| c.is_whitespace() || c == '[' || c == ']') {
        return None;
    }
    Some(normalize_label(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_follows_first_reference() {
        let mut store = FootnoteStore::new();
        store.insert("a".into(), "a".into());
        store.insert("b".into(), "b".into());
        assert_eq!(store.reference("b"), Some(1));
        assert_eq!(store.reference("a"), Some(2));
        assert_eq!(store.reference("b"), Some(1));
        assert_eq!(store.reference("missing"), None);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut store = FootnoteStore::new();
        assert!(store.insert("note".into(), "Note".into()));
        assert!(!store.insert("note".into(), "note".into()));
        assert_eq!(store.get("note").unwrap().label, "Note");
    }

    #[test]
    fn test_label_rules() {
        assert_eq!(normalize_footnote_label("Note-1"), Some("note-1".into()));
        assert_eq!(normalize_footnote_label(""), None);
        assert_eq!(normalize_footnote_label("two words"), None);
    }
}
