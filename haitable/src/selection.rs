//! Row selection set.

use std::collections::HashSet;
use std::hash::Hash;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Selecting a row replaces the previous one.
    #[default]
    Single,
    /// Rows are toggled independently and may be bulk-selected.
    Multi,
}

/// Selected row keys under a [`SelectionMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Clone + Eq + Hash> {
    mode: SelectionMode,
    keys: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            keys: HashSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Flip one key. In single mode a newly selected key replaces the rest.
    pub fn toggle(&mut self, key: K) {
        if self.keys.remove(&key) {
            return;
        }
        if self.mode == SelectionMode::Single {
            self.keys.clear();
        }
        self.keys.insert(key);
    }

    /// Add every key. Ignored in single mode.
    pub fn select_all<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        if self.mode == SelectionMode::Multi {
            self.keys.extend(keys.into_iter().cloned());
        }
    }

    pub fn deselect_all<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        for key in keys {
            self.keys.remove(key);
        }
    }

    /// Keep only the keys `keep` accepts.
    pub fn retain<F: FnMut(&K) -> bool>(&mut self, keep: F) {
        self.keys.retain(keep);
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
