//! Novelty filtering against the seen-set.

use std::collections::HashSet;

use crate::models::{Notice, SeenSet};

/// Keep the notices whose id is not in `seen`, in their original order.
pub fn filter_novel(candidates: &[Notice], seen: &SeenSet) -> Vec<Notice> {
    let seen_ids: HashSet<&str> = seen.iter().collect();

    candidates
        .iter()
        .filter(|notice| !seen_ids.contains(notice.id.as_str()))
        .cloned()
        .collect()
}
