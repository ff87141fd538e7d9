//! Route binding with conflict detection.

use std::collections::HashMap;

use crate::{RouteEntry, RouteError};

/// Routes keyed by URL path, in binding order.
///
/// Binding the same entry twice is a no-op. Binding a different render path
/// to an already bound URL path fails with [`RouteError::Conflict`].
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries, stopping at the first conflict.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Conflict`] if two entries share a URL path.
    pub fn from_entries(entries: impl IntoIterator<Item = RouteEntry>) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for entry in entries {
            table.bind(entry)?;
        }
        Ok(table)
    }

    /// Bind an entry.
    ///
    /// Returns `true` if the entry was added and `false` if the identical
    /// entry was already bound.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Conflict`] if the URL path is bound to another
    /// render path.
    pub fn bind(&mut self, entry: RouteEntry) -> Result<bool, RouteError> {
        if let Some(&pos) = self.index.get(&entry.get_path) {
            let existing = &self.entries[pos];
            if existing.render_path == entry.render_path {
                tracing::debug!(get_path = %entry.get_path, "Route already bound");
                return Ok(false);
            }
            return Err(RouteError::Conflict {
                path: entry.get_path,
                existing: existing.render_path.clone(),
                incoming: entry.render_path,
            });
        }

        self.index.insert(entry.get_path.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(true)
    }

    /// Iterate entries in binding order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Number of bound routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no routes are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(get_path: &str, render_path: &str) -> RouteEntry {
        RouteEntry {
            get_path: get_path.to_owned(),
            render_path: render_path.to_owned(),
        }
    }

    #[test]
    fn test_bind_keeps_order() {
        let table = RouteTable::from_entries([
            entry("/b", "b"),
            entry("/", "index"),
            entry("/a", "a"),
        ])
        .unwrap();

        let paths: Vec<_> = table.iter().map(|e| e.get_path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/", "/a"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_bind_same_entry_twice_is_noop() {
        let mut table = RouteTable::new();

        assert!(table.bind(entry("/about", "about")).unwrap());
        assert!(!table.bind(entry("/about", "about")).unwrap());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bind_conflict() {
        let mut table = RouteTable::new();
        table.bind(entry("/blog", "blog")).unwrap();

        let err = table.bind(entry("/blog", "blog/index")).unwrap_err();

        match err {
            RouteError::Conflict {
                path,
                existing,
                incoming,
            } => {
                assert_eq!(path, "/blog");
                assert_eq!(existing, "blog");
                assert_eq!(incoming, "blog/index");
            }
            other => panic!("unexpected error: {other}"),
        }
        let bound: Vec<_> = table.iter().cloned().collect();
        assert_eq!(bound, vec![entry("/blog", "blog")]);
    }

    #[test]
    fn test_trailing_slash_is_a_distinct_path() {
        let table =
            RouteTable::from_entries([entry("/docs", "index"), entry("/docs/", "other")]).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert_eq!((&table).into_iter().count(), 0);
    }
}
