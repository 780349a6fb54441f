//! Building trees from the nested serialized form and writing them back.
//!
//! A file is a bare name and a folder is a `[name, [children...]]` pair:
//!
//! ```json
//! ["README.md", ["src", ["main.rs", ["bin", []]]]]
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::Result;
use crate::models::entry::{Entry, ItemInit, ItemKind};
use crate::models::hooks::Hooks;
use crate::services::naming;

/// Per-kind constructors. Override a method to hand out entries configured
/// by the host (read-only flags, menus, icons, folder hooks).
pub trait EntryFactory {
    fn root(&self, hooks: Hooks) -> Entry {
        Entry::root_with(hooks)
    }

    fn folder(&self, init: ItemInit) -> Entry {
        Entry::folder(init)
    }

    fn file(&self, init: ItemInit) -> Entry {
        Entry::file(init)
    }

    fn symlink(&self, init: ItemInit) -> Entry {
        Entry::symlink(init)
    }

    fn make(&self, kind: ItemKind, init: ItemInit) -> Entry {
        match kind {
            ItemKind::Folder => self.folder(init),
            ItemKind::File => self.file(init),
            ItemKind::Symlink => self.symlink(init),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl EntryFactory for DefaultFactory {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedEntry {
    File(String),
    Folder(String, Vec<SerializedEntry>),
}

impl SerializedEntry {
    pub fn name(&self) -> &str {
        match self {
            SerializedEntry::File(name) | SerializedEntry::Folder(name, _) => name,
        }
    }
}

pub fn parse(json: &str) -> Result<Vec<SerializedEntry>> {
    Ok(serde_json::from_str(json)?)
}

pub fn build(entries: &[SerializedEntry]) -> Result<Entry> {
    build_with(&DefaultFactory, Hooks::default(), entries)
}

/// Creates the root with `hooks`, then every entry in pre-order. Names are
/// validated and must be unique among siblings; no rename requests or
/// expansion events are fired.
pub fn build_with(
    factory: &dyn EntryFactory,
    hooks: Hooks,
    entries: &[SerializedEntry],
) -> Result<Entry> {
    let root = factory.root(hooks);
    let mut count = 0;
    for entry in entries {
        build_entry(factory, &root, entry, &mut count)?;
    }
    debug!(entries = count, "built tree");
    Ok(root)
}

fn build_entry(
    factory: &dyn EntryFactory,
    parent: &Entry,
    node: &SerializedEntry,
    count: &mut usize,
) -> Result<()> {
    let name = naming::validate(parent, node.name())?;
    *count += 1;
    match node {
        SerializedEntry::File(_) => {
            parent.append(factory.file(ItemInit::new(name)))?;
        }
        SerializedEntry::Folder(_, children) => {
            let folder = parent.append(factory.folder(ItemInit::new(name)))?;
            for child in children {
                build_entry(factory, &folder, child, count)?;
            }
        }
    }
    Ok(())
}

/// Shape of `scope`'s children. Symlinks are written as files.
pub fn to_serialized(scope: &Entry) -> Vec<SerializedEntry> {
    scope
        .children()
        .iter()
        .map(|child| {
            let name = child.name().unwrap_or_default();
            if child.is_folder() {
                SerializedEntry::Folder(name, to_serialized(child))
            } else {
                SerializedEntry::File(name)
            }
        })
        .collect()
}

pub fn to_json(scope: &Entry, pretty: bool) -> Result<String> {
    let serialized = to_serialized(scope);
    let json = if pretty {
        serde_json::to_string_pretty(&serialized)?
    } else {
        serde_json::to_string(&serialized)?
    };
    Ok(json)
}

impl Entry {
    pub fn to_serialized(&self) -> Vec<SerializedEntry> {
        to_serialized(self)
    }
}
