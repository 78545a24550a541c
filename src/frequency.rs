//! Frequency maps from display text to occurrence count.

use std::collections::btree_map::{self, BTreeMap};

use crate::error::{Result, WordCloudError};
use crate::table::{Row, Table};

/// Which column supplies the text shown in the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayField {
    /// GO term identifier
    Id,
    /// Human-readable term name
    #[default]
    Description,
}

impl DisplayField {
    pub fn from_use_id(use_id: bool) -> Self {
        if use_id {
            DisplayField::Id
        } else {
            DisplayField::Description
        }
    }

    fn select<'a>(&self, row: &'a Row) -> &'a str {
        match self {
            DisplayField::Id => &row.id,
            DisplayField::Description => &row.description,
        }
    }
}

/// Mapping from display text to occurrence count.
///
/// Keys are unique; when two rows share display text the later row wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    entries: BTreeMap<String, u64>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from the rows of `table`
    pub fn from_table(table: &Table, field: DisplayField) -> Self {
        let mut map = Self::new();
        for row in table.iter() {
            map.insert(field.select(row), row.occurrence_count);
        }
        map
    }

    pub fn insert(&mut self, text: impl Into<String>, count: u64) {
        self.entries.insert(text.into(), count);
    }

    pub fn get(&self, text: &str) -> Option<u64> {
        self.entries.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.entries.iter()
    }

    /// Largest count in the map
    pub fn max(&self) -> Option<u64> {
        self.entries.values().copied().max()
    }

    /// Normalization denominator shared by every category's color mapping.
    ///
    /// Call on the aggregate map of the unfiltered table. Fails when there is
    /// no positive count to normalize against.
    pub fn global_max(&self) -> Result<u64> {
        match self.max() {
            Some(max) if max > 0 => Ok(max),
            _ => Err(WordCloudError::NoOccurrences),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (text, count) in iter {
            map.insert(text, count);
        }
        map
    }
}

impl<'a> IntoIterator for &'a FrequencyMap {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
