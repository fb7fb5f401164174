//! Named, declaration-ordered resource tables.

use std::collections::HashMap;

/// Resources of one kind keyed by their script name.
///
/// Entries keep declaration order; the most recent one is "current" and is
/// what attribute lines of the open block modify.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` as the current entry. An existing entry of the same name is
    /// kept and `false` returned.
    pub fn insert(&mut self, name: &str, value: T) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.last().map(|(_, v)| v)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.entries.last_mut().map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

/// "1 material", "3 materials"; `None` for zero.
pub(crate) fn count_label(count: usize, noun: &str) -> Option<String> {
    match count {
        0 => None,
        1 => Some(format!("1 {}", noun)),
        n => Some(format!("{} {}s", n, noun)),
    }
}
