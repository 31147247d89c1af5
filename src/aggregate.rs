use crate::constants::COVERAGE_TARGET;
use std::collections::btree_map::{self, BTreeMap};

/// Accumulators keyed by a grouping value, created on first sight.
/// Iteration is ascending by key, which fixes the emission order.
#[derive(Debug, Clone)]
pub struct Groups<T> {
    groups: BTreeMap<String, T>,
}

impl<T> Default for Groups<T> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<T> Groups<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulator for `key`, built by `init` only if the key is new.
    pub fn entry_with(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        self.groups.entry(key.to_string()).or_insert_with(init)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, T> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<T: Default> Groups<T> {
    pub fn entry(&mut self, key: &str) -> &mut T {
        self.entry_with(key, T::default)
    }
}

impl<'a, T> IntoIterator for &'a Groups<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = btree_map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Signed per-name tally; entries stay present even when they net to zero.
pub type NameCounts = Groups<i64>;

impl NameCounts {
    pub fn add(&mut self, name: &str, delta: i64) {
        *self.entry(name) += delta;
    }
}

/// Reviewers still needed to reach the coverage target on one paper.
pub fn coverage_deficit(confirmed: u32, tentative: u32) -> u32 {
    COVERAGE_TARGET.saturating_sub(confirmed + tentative)
}

/// Confirmed reviewers beyond the coverage target on one paper.
pub fn coverage_surplus(confirmed: u32) -> u32 {
    confirmed.saturating_sub(COVERAGE_TARGET)
}
