use std::collections::HashMap;

use crate::models::entry::Entry;

/// Point-in-time lookup table over a subtree.
///
/// Built with one pre-order walk. It does not follow later mutations; rebuild
/// it after the tree changes.
#[derive(Debug, Default)]
pub struct PathIndex {
    by_path: HashMap<String, Entry>,
    by_name: HashMap<String, Vec<Entry>>,
}

impl PathIndex {
    pub fn build(scope: &Entry) -> Self {
        let mut index = Self::default();
        scope.walk(|entry| {
            index.by_path.insert(entry.path(), entry.clone());
            if let Some(name) = entry.name() {
                index.by_name.entry(name).or_default().push(entry.clone());
            }
        });
        tracing::debug!(entries = index.len(), "indexed tree");
        index
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.by_path.get(path)
    }

    /// Matches in pre-order, like [`by_name`](super::by_name).
    pub fn named(&self, name: &str) -> &[Entry] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Indexed paths in sorted order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.by_path.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Result;
    use crate::services::search::by_name;
    use crate::services::tree::build::{build, parse};

    #[test]
    fn indexes_every_descendant() -> Result<()> {
        let root = build(&parse(r#"["x", ["d", ["y", ["x", []]]]]"#)?)?;
        let index = PathIndex::build(&root);

        assert_eq!(index.len(), 4);
        assert_eq!(index.paths(), vec!["/d", "/d/x", "/d/y", "/x"]);
        assert_eq!(index.get("/d/y").map(Entry::path).as_deref(), Some("/d/y"));
        assert!(index.get("/y").is_none());
        assert_eq!(index.named("x"), by_name("x", &root.children()).as_slice());
        assert!(index.named("nope").is_empty());
        Ok(())
    }

    #[test]
    fn snapshot_does_not_follow_renames() -> Result<()> {
        let root = build(&parse(r#"["a"]"#)?)?;
        let index = PathIndex::build(&root);
        let a = index.get("/a").cloned();

        if let Some(a) = &a {
            a.rename("b")?;
        }
        assert!(index.get("/a").is_some());
        assert!(root.find(crate::services::search::ByPath::new("/a")).is_none());
        Ok(())
    }
}
