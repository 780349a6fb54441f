//! Lookups over a tree by exact path or by name.

pub mod index;

use serde::{Deserialize, Serialize};

use crate::models::entry::Entry;

/// Order in which [`by_path`] visits folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPriority {
    /// Descend into each folder as soon as it is met.
    Depth,
    /// Check every entry of a level before descending into that level's
    /// folders, in order.
    #[default]
    PseudoBreadth,
}

pub fn by_path(path: &str, collection: &[Entry], priority: SearchPriority) -> Option<Entry> {
    let mut folders = Vec::new();
    for node in collection {
        if node.path() == path {
            return Some(node.clone());
        }
        if !node.is_folder() {
            continue;
        }
        match priority {
            SearchPriority::Depth => {
                if let Some(found) = by_path(path, &node.children(), priority) {
                    return Some(found);
                }
            }
            SearchPriority::PseudoBreadth => folders.push(node),
        }
    }
    folders
        .into_iter()
        .find_map(|folder| by_path(path, &folder.children(), priority))
}

/// Every entry named `name`, parents before their children.
pub fn by_name(name: &str, collection: &[Entry]) -> Vec<Entry> {
    let mut found = Vec::new();
    collect_named(name, collection, &mut found);
    found
}

fn collect_named(name: &str, collection: &[Entry], found: &mut Vec<Entry>) {
    for node in collection {
        if node.has_name(name) {
            found.push(node.clone());
        }
        if node.is_folder() {
            collect_named(name, &node.children(), found);
        }
    }
}

/// A lookup that [`Entry::find`] can run against an entry's children.
pub trait Query {
    type Output;

    fn run(self, scope: &Entry) -> Self::Output;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByPath {
    pub path: String,
    /// Falls back to the scope's search priority hook.
    pub priority: Option<SearchPriority>,
}

impl ByPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: SearchPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl Query for ByPath {
    type Output = Option<Entry>;

    fn run(self, scope: &Entry) -> Self::Output {
        let priority = self
            .priority
            .or_else(|| scope.resolve(|hooks| hooks.search_priority))
            .unwrap_or_default();
        by_path(&self.path, &scope.children(), priority)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByName(pub String);

impl ByName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Query for ByName {
    type Output = Vec<Entry>;

    fn run(self, scope: &Entry) -> Self::Output {
        by_name(&self.0, &scope.children())
    }
}

impl Entry {
    pub fn find<Q: Query>(&self, query: Q) -> Q::Output {
        query.run(self)
    }
}
