//! Tag set with case-insensitive de-duplication

use serde::{Deserialize, Serialize};

use crate::util::{collapse_whitespace, eq_ignore_case};

/// Ordered tag list where no two entries are equal ignoring case.
///
/// The first spelling of a tag wins; insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a tag. Returns `false` when the tag is blank or already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = collapse_whitespace(tag);
        if tag.is_empty() || self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Remove a tag, matching case-insensitively.
    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = collapse_whitespace(tag);
        let before = self.0.len();
        self.0.retain(|existing| !eq_ignore_case(existing, &tag));
        self.0.len() != before
    }

    /// Case-insensitive exact membership test.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| eq_ignore_case(existing, tag))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.insert(tag.as_ref());
        }
        tags
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_ignores_case_insensitive_duplicates() {
        let mut tags = TagSet::new();
        assert!(tags.insert("Travel"));
        assert!(!tags.insert("travel"));
        assert!(!tags.insert("TRAVEL "));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.as_slice(), ["Travel"]);
    }

    #[test]
    fn insert_rejects_blank_and_normalizes_whitespace() {
        let mut tags = TagSet::new();
        assert!(!tags.insert("   "));
        assert!(tags.insert("  road   trip "));
        assert_eq!(tags.as_slice(), ["road trip"]);
    }

    #[test]
    fn keeps_insertion_order() {
        let tags: TagSet = ["work", "home", "Work", "errands"].into_iter().collect();
        assert_eq!(tags.as_slice(), ["work", "home", "errands"]);
    }

    #[test]
    fn remove_matches_case_insensitively() {
        let mut tags: TagSet = ["Work", "home"].into_iter().collect();
        assert!(tags.remove("WORK"));
        assert!(!tags.remove("missing"));
        assert_eq!(tags.as_slice(), ["home"]);
    }

    #[test]
    fn contains_is_exact_not_substring() {
        let tags: TagSet = ["homework"].into_iter().collect();
        assert!(tags.contains("HOMEWORK"));
        assert!(!tags.contains("home"));
    }

    #[test]
    fn serializes_as_plain_list() {
        let tags: TagSet = ["a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn deserializing_deduplicates() {
        let tags: TagSet = serde_json::from_str(r#"["Go","go","rust"]"#).unwrap();
        assert_eq!(tags.as_slice(), ["Go", "rust"]);
    }
}
