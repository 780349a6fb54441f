//! Menu items offered for an entry. Rendering and positioning the popup is
//! left to the host; this module only decides what is listed and what each
//! item does when clicked.

use std::fmt;
use std::rc::Rc;

use crate::core::errors::{Error, Result};
use crate::models::entry::{Entry, EntryKind, ItemKind, WeakEntry};
use crate::models::events::RenameRequest;

#[derive(Clone)]
pub enum MenuAction {
    Rename,
    AddFile,
    AddFolder,
    Custom(Rc<dyn Fn(&Entry) -> Result<()>>),
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Rename => f.write_str("Rename"),
            MenuAction::AddFile => f.write_str("AddFile"),
            MenuAction::AddFolder => f.write_str("AddFolder"),
            MenuAction::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    target: WeakEntry,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction, target: &Entry) -> Self {
        Self {
            label: label.into(),
            action,
            target: target.downgrade(),
        }
    }

    pub fn custom(
        label: impl Into<String>,
        target: &Entry,
        action: impl Fn(&Entry) -> Result<()> + 'static,
    ) -> Self {
        Self::new(label, MenuAction::Custom(Rc::new(action)), target)
    }

    pub fn target(&self) -> Option<Entry> {
        self.target.upgrade()
    }

    /// Runs the item's action against its target.
    pub fn click(&self) -> Result<()> {
        let target = self.target().ok_or(Error::Detached)?;
        match &self.action {
            MenuAction::Rename => {
                target.request_rename(RenameRequest::default());
                Ok(())
            }
            MenuAction::AddFile => target.add(ItemKind::File, None).map(drop),
            MenuAction::AddFolder => target.add(ItemKind::Folder, None).map(drop),
            MenuAction::Custom(action) => action(&target),
        }
    }
}

/// The built-in policy: nothing for the root or read-only entries, rename
/// plus creation for folders, rename for files and symlinks.
pub fn default_items(entry: &Entry) -> Vec<MenuItem> {
    if entry.readonly() {
        return Vec::new();
    }
    match entry.kind() {
        EntryKind::Root => Vec::new(),
        EntryKind::Folder => vec![
            MenuItem::new("Rename", MenuAction::Rename, entry),
            MenuItem::new("New File", MenuAction::AddFile, entry),
            MenuItem::new("New Folder", MenuAction::AddFolder, entry),
        ],
        EntryKind::File | EntryKind::Symlink => {
            vec![MenuItem::new("Rename", MenuAction::Rename, entry)]
        }
    }
}

/// Resolves the entry's own supplier, then the nearest ancestor's hook, then
/// [`default_items`].
pub fn context_menu_items(entry: &Entry) -> Vec<MenuItem> {
    if let Some(supplier) = entry.item().and_then(|item| item.context_menu.clone()) {
        return supplier(entry);
    }
    let scope = entry.parent().unwrap_or_else(|| entry.clone());
    match scope.resolve(|hooks| hooks.context_menu.clone()) {
        Some(supplier) => supplier(entry),
        None => default_items(entry),
    }
}

impl Entry {
    pub fn context_menu_items(&self) -> Vec<MenuItem> {
        context_menu_items(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ItemInit;
    use crate::models::events::{EventKind, TreeEvent};
    use crate::models::hooks::Hooks;
    use std::cell::Cell;

    fn labels(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn default_policy_by_kind() -> Result<()> {
        let root = Entry::root();
        let folder = root.append(Entry::folder(ItemInit::new("src")))?;
        let file = root.append(Entry::file(ItemInit::new("a")))?;
        let link = root.append(Entry::symlink(ItemInit::new("l")))?;
        let locked = root.append(Entry::file(ItemInit::new("b").readonly(true)))?;

        assert!(root.context_menu_items().is_empty());
        assert_eq!(
            labels(&folder.context_menu_items()),
            vec!["Rename", "New File", "New Folder"]
        );
        assert_eq!(labels(&file.context_menu_items()), vec!["Rename"]);
        assert_eq!(labels(&link.context_menu_items()), vec!["Rename"]);
        assert!(locked.context_menu_items().is_empty());
        Ok(())
    }

    #[test]
    fn entry_override_beats_ancestor_hook() -> Result<()> {
        let root = Entry::root_with(Hooks::new().with_context_menu(|entry| {
            vec![MenuItem::custom("From root", entry, |_| Ok(()))]
        }));
        let folder = root.append(Entry::folder(ItemInit::new("src")))?;
        let plain = folder.append(Entry::file(ItemInit::new("a")))?;
        let special = folder.append(Entry::file(ItemInit::new("b").with_context_menu(|entry| {
            vec![MenuItem::custom("Own", entry, |_| Ok(()))]
        })))?;

        assert_eq!(labels(&plain.context_menu_items()), vec!["From root"]);
        assert_eq!(labels(&special.context_menu_items()), vec!["Own"]);
        assert_eq!(labels(&root.context_menu_items()), vec!["From root"]);
        Ok(())
    }

    #[test]
    fn nearest_ancestor_hook_wins() -> Result<()> {
        let root = Entry::root_with(Hooks::new().with_context_menu(|_| Vec::new()));
        let folder = root.append(Entry::folder(ItemInit::new("src").with_hooks(
            Hooks::new().with_context_menu(|entry| {
                vec![MenuItem::custom("Folder scoped", entry, |_| Ok(()))]
            }),
        )))?;
        let file = folder.append(Entry::file(ItemInit::new("a")))?;

        assert_eq!(labels(&file.context_menu_items()), vec!["Folder scoped"]);
        assert!(folder.context_menu_items().is_empty());
        Ok(())
    }

    #[test]
    fn clicking_wires_to_mutations() -> Result<()> {
        let root = Entry::root();
        let folder = root.append(Entry::folder(ItemInit::new("src")))?;
        let rename_requests = Rc::new(Cell::new(0));
        let seen = rename_requests.clone();
        folder.on(EventKind::RequestRename, move |event| {
            if matches!(event, TreeEvent::RequestRename(_)) {
                seen.set(seen.get() + 1);
            }
        });

        for item in folder.context_menu_items() {
            item.click()?;
        }

        assert_eq!(rename_requests.get(), 1);
        let kinds: Vec<EntryKind> = folder.children().iter().map(Entry::kind).collect();
        assert_eq!(kinds, vec![EntryKind::File, EntryKind::Folder]);
        Ok(())
    }

    #[test]
    fn click_after_target_dropped_fails() {
        let items = {
            let file = Entry::file(ItemInit::new("gone"));
            default_items(&file)
        };
        assert!(matches!(items[0].click(), Err(Error::Detached)));
    }
}
