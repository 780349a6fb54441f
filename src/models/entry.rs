//! The tree's node type.
//!
//! An [`Entry`] is a cheap, cloneable handle to shared node state. Parents own
//! their children through strong handles; a child only keeps a weak reference
//! back to its parent, so dropping the root drops the whole tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::models::hooks::{ContextMenuSupplier, Hooks};
use crate::models::icon::{default_icon, FolderIcon, IconInit, IconKey, IconSlots, Renderable};
use crate::services::events::channel::EventChannel;
use crate::services::events::propagation::Link;
use crate::services::tree::scheduler::LocalQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Root,
    Folder,
    File,
    Symlink,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Root => "root",
            EntryKind::Folder => "folder",
            EntryKind::File => "file",
            EntryKind::Symlink => "symlink",
        }
    }

    /// Roots and folders own a child sequence.
    pub fn is_parent(&self) -> bool {
        matches!(self, EntryKind::Root | EntryKind::Folder)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds that can be created as a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Folder,
    File,
    Symlink,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        EntryKind::from(*self).as_str()
    }
}

impl From<ItemKind> for EntryKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Folder => EntryKind::Folder,
            ItemKind::File => EntryKind::File,
            ItemKind::Symlink => EntryKind::Symlink,
        }
    }
}

/// Constructor arguments for folders, files and symlinks.
#[derive(Clone, Default)]
pub struct ItemInit {
    pub name: String,
    pub readonly: bool,
    pub context_menu: Option<ContextMenuSupplier>,
    pub icon: Option<IconInit>,
    /// Only used by folders.
    pub hooks: Hooks,
}

impl ItemInit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_context_menu(
        mut self,
        supplier: impl Fn(&Entry) -> Vec<crate::services::context_menu::MenuItem> + 'static,
    ) -> Self {
        self.context_menu = Some(Rc::new(supplier));
        self
    }

    pub fn with_icon(mut self, icon: IconInit) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}

pub(crate) struct Item {
    pub(crate) name: RefCell<String>,
    pub(crate) parent: RefCell<Weak<Node>>,
    pub(crate) readonly: bool,
    pub(crate) context_menu: Option<ContextMenuSupplier>,
}

impl Item {
    fn new(init: &ItemInit) -> Self {
        Self {
            name: RefCell::new(init.name.clone()),
            parent: RefCell::new(Weak::new()),
            readonly: init.readonly,
            context_menu: init.context_menu.clone(),
        }
    }
}

pub(crate) struct Children {
    pub(crate) entries: RefCell<Vec<Entry>>,
    pub(crate) links: RefCell<Vec<Link>>,
    pub(crate) hooks: RefCell<Hooks>,
}

impl Children {
    fn new(hooks: Hooks) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            links: RefCell::new(Vec::new()),
            hooks: RefCell::new(hooks),
        }
    }
}

pub(crate) enum Body {
    Root {
        children: Children,
    },
    Folder {
        item: Item,
        children: Children,
        icon: FolderIcon,
    },
    File {
        item: Item,
        icon: Renderable,
    },
    Symlink {
        item: Item,
        icon: Renderable,
    },
}

pub(crate) struct Node {
    body: Body,
    events: EventChannel,
}

#[derive(Clone)]
pub struct Entry(Rc<Node>);

#[derive(Clone, Default)]
pub struct WeakEntry(Weak<Node>);

impl WeakEntry {
    pub fn upgrade(&self) -> Option<Entry> {
        self.0.upgrade().map(Entry)
    }
}

impl fmt::Debug for WeakEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(entry) => write!(f, "WeakEntry({:?})", entry),
            None => f.write_str("WeakEntry(<dropped>)"),
        }
    }
}

impl Entry {
    fn from_body(body: Body) -> Self {
        Entry(Rc::new(Node {
            body,
            events: EventChannel::new(),
        }))
    }

    /// A root with default hooks and a [`LocalQueue`] for deferred work.
    pub fn root() -> Self {
        Self::root_with(Hooks::default())
    }

    pub fn root_with(mut hooks: Hooks) -> Self {
        if hooks.scheduler.is_none() {
            hooks.scheduler = Some(Rc::new(LocalQueue::new()));
        }
        Self::from_body(Body::Root {
            children: Children::new(hooks),
        })
    }

    pub fn folder(init: ItemInit) -> Self {
        let icon = FolderIcon::default();
        if let Some(IconInit::Dual { open, closed }) = &init.icon {
            icon.open.set(open.clone());
            icon.closed.set(closed.clone());
        }
        Self::from_body(Body::Folder {
            item: Item::new(&init),
            children: Children::new(init.hooks),
            icon,
        })
    }

    pub fn file(init: ItemInit) -> Self {
        Self::from_body(Body::File {
            item: Item::new(&init),
            icon: single_icon(&init),
        })
    }

    pub fn symlink(init: ItemInit) -> Self {
        Self::from_body(Body::Symlink {
            item: Item::new(&init),
            icon: single_icon(&init),
        })
    }

    pub fn kind(&self) -> EntryKind {
        match &self.0.body {
            Body::Root { .. } => EntryKind::Root,
            Body::Folder { .. } => EntryKind::Folder,
            Body::File { .. } => EntryKind::File,
            Body::Symlink { .. } => EntryKind::Symlink,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.0.body, Body::Root { .. })
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.0.body, Body::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.0.body, Body::File { .. })
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.0.body, Body::Symlink { .. })
    }

    pub fn is_parent(&self) -> bool {
        self.kind().is_parent()
    }

    pub fn is_item(&self) -> bool {
        !self.is_root()
    }

    pub(crate) fn item(&self) -> Option<&Item> {
        match &self.0.body {
            Body::Root { .. } => None,
            Body::Folder { item, .. } | Body::File { item, .. } | Body::Symlink { item, .. } => {
                Some(item)
            }
        }
    }

    pub(crate) fn children_cell(&self) -> Option<&Children> {
        match &self.0.body {
            Body::Root { children } | Body::Folder { children, .. } => Some(children),
            Body::File { .. } | Body::Symlink { .. } => None,
        }
    }

    /// `None` for the root.
    pub fn name(&self) -> Option<String> {
        self.item().map(|item| item.name.borrow().clone())
    }

    pub(crate) fn has_name(&self, name: &str) -> bool {
        self.item().is_some_and(|item| *item.name.borrow() == name)
    }

    /// Slash-joined names from the root down to this entry, derived on every
    /// call. The root's path is empty.
    pub fn path(&self) -> String {
        let Some(item) = self.item() else {
            return String::new();
        };
        let parent_path = self.parent().map(|parent| parent.path()).unwrap_or_default();
        format!("{}/{}", parent_path, item.name.borrow())
    }

    pub fn parent(&self) -> Option<Entry> {
        self.item()
            .and_then(|item| item.parent.borrow().upgrade())
            .map(Entry)
    }

    pub(crate) fn set_parent(&self, parent: Option<&Entry>) {
        if let Some(item) = self.item() {
            *item.parent.borrow_mut() = parent.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
        }
    }

    pub fn ancestors(&self) -> impl Iterator<Item = Entry> {
        std::iter::successors(self.parent(), |entry| entry.parent())
    }

    /// Number of ancestors; 0 for the root and for detached items.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    pub fn readonly(&self) -> bool {
        self.item().is_some_and(|item| item.readonly)
    }

    /// Snapshot of the child sequence; empty for files and symlinks.
    pub fn children(&self) -> Vec<Entry> {
        self.children_cell()
            .map(|children| children.entries.borrow().clone())
            .unwrap_or_default()
    }

    pub fn child_count(&self) -> usize {
        self.children_cell()
            .map_or(0, |children| children.entries.borrow().len())
    }

    pub fn child(&self, index: usize) -> Option<Entry> {
        self.children_cell()
            .and_then(|children| children.entries.borrow().get(index).cloned())
    }

    /// Current position of `child` among this entry's children, by identity.
    pub fn index_of(&self, child: &Entry) -> Option<usize> {
        self.children_cell().and_then(|children| {
            children
                .entries
                .borrow()
                .iter()
                .position(|candidate| candidate == child)
        })
    }

    pub fn events(&self) -> &EventChannel {
        &self.0.events
    }

    pub fn icon(&self) -> Option<IconSlots<'_>> {
        match &self.0.body {
            Body::Root { .. } => None,
            Body::Folder { icon, .. } => Some(IconSlots::Dual(icon)),
            Body::File { icon, .. } | Body::Symlink { icon, .. } => Some(IconSlots::Single(icon)),
        }
    }

    /// Fills empty icon slots from the nearest ancestor's icon hook.
    pub(crate) fn fill_default_icons(&self) {
        let hook = self
            .parent()
            .and_then(|parent| parent.resolve(|hooks| hooks.default_icon.clone()));
        let pick = |key: IconKey| match &hook {
            Some(hook) => hook(key),
            None => default_icon(key),
        };
        match &self.0.body {
            Body::Root { .. } => {}
            Body::Folder { icon, .. } => {
                icon.open.fill_with(|| pick(IconKey::FolderOpen));
                icon.closed.fill_with(|| pick(IconKey::FolderClosed));
            }
            Body::File { icon, .. } => icon.fill_with(|| pick(IconKey::File)),
            Body::Symlink { icon, .. } => icon.fill_with(|| pick(IconKey::Symlink)),
        }
    }

    /// This entry's own hooks; `None` for files and symlinks.
    pub fn hooks(&self) -> Option<Hooks> {
        self.children_cell()
            .map(|children| children.hooks.borrow().clone())
    }

    /// Replaces this parent's hooks. Returns `false` for files and symlinks.
    pub fn update_hooks(&self, update: impl FnOnce(&mut Hooks)) -> bool {
        match self.children_cell() {
            Some(children) => {
                update(&mut children.hooks.borrow_mut());
                true
            }
            None => false,
        }
    }

    /// First hook value found on this entry or its ancestors.
    pub(crate) fn resolve<T>(&self, pick: impl Fn(&Hooks) -> Option<T>) -> Option<T> {
        let mut current = Some(self.clone());
        while let Some(entry) = current {
            if let Some(children) = entry.children_cell() {
                if let Some(found) = pick(&children.hooks.borrow()) {
                    return Some(found);
                }
            }
            current = entry.parent();
        }
        None
    }

    pub fn downgrade(&self) -> WeakEntry {
        WeakEntry(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Entry) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn single_icon(init: &ItemInit) -> Renderable {
    let icon = Renderable::default();
    if let Some(IconInit::Single(content)) = &init.icon {
        icon.set(content.clone());
    }
    icon
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Entry {}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("kind", &self.kind())
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_item_state() {
        let root = Entry::root();
        assert!(root.is_root());
        assert!(root.is_parent());
        assert_eq!(root.name(), None);
        assert_eq!(root.path(), "");
        assert!(root.parent().is_none());
        assert!(!root.readonly());
        assert!(root.icon().is_none());
    }

    #[test]
    fn detached_item_path_has_no_prefix() {
        let file = Entry::file(ItemInit::new("notes.md"));
        assert_eq!(file.path(), "/notes.md");
        assert_eq!(file.depth(), 0);
        assert!(file.children().is_empty());
        assert!(file.hooks().is_none());
    }

    #[test]
    fn kinds_are_exclusive() {
        let folder = Entry::folder(ItemInit::new("src"));
        let link = Entry::symlink(ItemInit::new("latest"));
        assert_eq!(folder.kind(), EntryKind::Folder);
        assert!(folder.is_parent() && folder.is_item());
        assert_eq!(link.kind(), EntryKind::Symlink);
        assert!(!link.is_parent());
        assert_eq!(ItemKind::Symlink.as_str(), "symlink");
    }

    #[test]
    fn explicit_icons_are_kept() {
        let folder = Entry::folder(ItemInit::new("assets").with_icon(IconInit::Dual {
            open: "o".into(),
            closed: "c".into(),
        }));
        match folder.icon() {
            Some(IconSlots::Dual(icon)) => {
                assert_eq!(icon.open.get().as_deref(), Some("o"));
                assert_eq!(icon.closed.get().as_deref(), Some("c"));
            }
            other => panic!("unexpected icon slots: {other:?}"),
        }
    }

    #[test]
    fn identity_equality() {
        let a = Entry::file(ItemInit::new("a"));
        let b = Entry::file(ItemInit::new("a"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.downgrade().upgrade(), Some(a));
    }
}
