//! Hierarchical entry tree assembled from slash-delimited key names.
//!
//! Vault keys like `/appc/ppcc/limit` become nested nodes; each intermediate
//! segment is one branch, created on first use and shared by every later key
//! that walks through it. The final value is keyed by the full entry name so
//! lookups work with the exact string the firmware wrote.

use crate::value::EntryValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One node of the tree: a nested branch or a decoded leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Tree(EntryTree),
    Value(EntryValue),
}

/// Insertion-ordered mapping from entry name to node.
///
/// Vaults hold tens of entries, so a vector with exact-name lookup is
/// enough and keeps output reproducible across decodes of the same bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryTree {
    entries: Vec<(String, Entry)>,
}

impl EntryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node stored directly under `name` in this tree.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Insert or replace a node.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = entry;
        } else {
            self.entries.push((name, entry));
        }
    }

    /// Child branch named `name`, created empty if absent.
    ///
    /// A leaf already sitting under that name is replaced; the firmware does
    /// not reuse a path segment as both a key and a directory.
    pub fn branch(&mut self, name: &str) -> &mut EntryTree {
        let idx = match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.entries
                    .push((name.to_string(), Entry::Tree(EntryTree::new())));
                self.entries.len() - 1
            }
        };
        if !matches!(self.entries[idx].1, Entry::Tree(_)) {
            self.entries[idx].1 = Entry::Tree(EntryTree::new());
        }
        match &mut self.entries[idx].1 {
            Entry::Tree(tree) => tree,
            Entry::Value(_) => unreachable!("branch slot was just made a tree"),
        }
    }

    /// Resolve the node a named value belongs in.
    ///
    /// Walks (and creates) one branch per intermediate segment of a
    /// slash-delimited name. Names without a leading slash are flat keys
    /// that live directly in this node.
    pub fn resolve_path(&mut self, name: &str) -> &mut EntryTree {
        let Some(path) = name.strip_prefix('/') else {
            return self;
        };
        let mut node = self;
        let mut segments = path.split('/').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                break; // final segment names the value, not a branch
            }
            if segment.is_empty() {
                continue;
            }
            node = node.branch(segment);
        }
        node
    }

    /// Leaf lookup by full path, e.g. `/appc/ppcc/limit`.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        if !name.starts_with('/') {
            return self.get(name);
        }
        let segments: Vec<&str> = name[1..].split('/').collect();
        let mut node = self;
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if segment.is_empty() {
                continue;
            }
            match node.get(segment)? {
                Entry::Tree(tree) => node = tree,
                Entry::Value(_) => return None,
            }
        }
        node.get(name)
    }
}

impl Serialize for EntryTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Tree(tree) => tree.serialize(serializer),
            Entry::Value(value) => value.serialize(serializer),
        }
    }
}
