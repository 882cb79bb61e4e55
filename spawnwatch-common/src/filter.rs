use std::collections::HashSet;

use crate::types::Entry;

/// Categories nobody wants to walk to.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "pidgey", "poliwag", "caterpie", "zubat", "staryu",
    "rattata", "spearow", "goldeen", "weedle", "pinsir",
    "kakuna", "golbat", "drowzee", "raticate", "fearow",
    "krabby", "bellsprout", "psyduck", "magikarp", "tentacool",
    "jigglypuff", "paras", "oddish", "pidgeotto", "doduo", "dodrio",
];

/// Fixed set of lowercase category identifiers hidden from display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    categories: HashSet<String>,
}

impl Denylist {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(&category.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

/// Entries whose category is not denylisted, in their original order.
pub fn visible_entries(entries: &[Entry], denylist: &Denylist) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| !denylist.contains(&entry.category))
        .cloned()
        .collect()
}
