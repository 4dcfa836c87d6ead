//! Bounded log of notice ids reported in earlier runs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of ids retained between runs.
pub const DEFAULT_CAPACITY: usize = 200;

/// Insertion-ordered set of seen ids with FIFO eviction.
///
/// Serialises as a plain JSON array of strings. Eviction follows insertion
/// order only; looking an id up never refreshes it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    ids: VecDeque<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|seen| seen == id)
    }

    /// Append ids in order, then drop the oldest entries beyond `capacity`.
    pub fn record<I, S>(&mut self, ids: I, capacity: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self.truncate(capacity);
    }

    /// Keep only the `capacity` most recently appended ids.
    pub fn truncate(&mut self, capacity: usize) {
        while self.ids.len() > capacity {
            self.ids.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut seen = SeenSet::from_iter(["100"]);
        seen.record(["101", "102"], DEFAULT_CAPACITY);

        assert_eq!(seen.iter().collect::<Vec<_>>(), vec!["100", "101", "102"]);
        assert!(seen.contains("101"));
        assert!(!seen.contains("103"));
    }

    #[test]
    fn test_record_evicts_oldest_first() {
        let mut seen = SeenSet::new();
        seen.record((0..150).map(|i| i.to_string()), DEFAULT_CAPACITY);
        seen.record((150..260).map(|i| i.to_string()), DEFAULT_CAPACITY);

        assert_eq!(seen.len(), DEFAULT_CAPACITY);
        let ids: Vec<_> = seen.iter().collect();
        assert_eq!(ids.first(), Some(&"60"));
        assert_eq!(ids.last(), Some(&"259"));
        assert!(!seen.contains("59"));
    }

    #[test]
    fn test_lookup_does_not_refresh() {
        let mut seen = SeenSet::from_iter(["a", "b", "c"]);
        assert!(seen.contains("a"));
        seen.record(["d"], 3);

        assert_eq!(seen.iter().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_json_is_plain_array() {
        let seen = SeenSet::from_iter(["100", "101"]);
        assert_eq!(serde_json::to_string(&seen).unwrap(), r#"["100","101"]"#);

        let parsed: SeenSet = serde_json::from_str(r#"["7","8"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.contains("8"));
    }
}
