//! Structural changes to the tree: add, move, remove, rename, sort.
//!
//! Each operation either completes in one synchronous step or returns an error
//! with the tree untouched. The only deferred work is the rename request that
//! follows an interactive add, which goes through the nearest [`Scheduler`].
//!
//! [`Scheduler`]: crate::services::tree::scheduler::Scheduler

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::core::errors::{Error, Result};
use crate::models::entry::{Entry, ItemInit, ItemKind};
use crate::models::events::{Depth, EventKind, RenameRequest, TreeEvent};
use crate::services::events::propagation;
use crate::services::naming;
use crate::services::tree::build::{DefaultFactory, EntryFactory};

/// What [`Entry::add`] should insert.
#[derive(Debug, Clone)]
pub enum NewChild {
    Kind(ItemKind),
    Existing(Entry),
}

impl From<ItemKind> for NewChild {
    fn from(kind: ItemKind) -> Self {
        NewChild::Kind(kind)
    }
}

impl From<Entry> for NewChild {
    fn from(entry: Entry) -> Self {
        NewChild::Existing(entry)
    }
}

impl From<&Entry> for NewChild {
    fn from(entry: &Entry) -> Self {
        NewChild::Existing(entry.clone())
    }
}

/// Case-insensitive name order; lowercase sorts first among names that only
/// differ in case.
///
/// Letters are folded with Unicode lowercasing and then compared by code
/// point, with no locale collation: `é` sorts after `z`. Hosts that need a
/// locale order can install a comparator hook.
pub fn compare_names(a: &Entry, b: &Entry) -> Ordering {
    let a = a.name().unwrap_or_default();
    let b = b.name().unwrap_or_default();
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(&a))
}

impl Entry {
    /// Inserts a child at `index` (appending when `None` or past the end).
    ///
    /// Given an [`ItemKind`], the child is built by the nearest factory hook
    /// with a unique default name; the parent then fires
    /// [`TreeEvent::RequestOpen`] and defers a rename request to the child.
    /// Once the child reports [`TreeEvent::Renamed`] the parent fires
    /// [`TreeEvent::ChildAddFinalized`].
    ///
    /// Given an existing entry, the entry is moved here from wherever it was,
    /// fires [`TreeEvent::Reparented`], and the parent fires
    /// [`TreeEvent::RequestOpen`]. No rename is requested.
    pub fn add(&self, child: impl Into<NewChild>, index: Option<usize>) -> Result<Entry> {
        if !self.is_parent() {
            return Err(Error::NotAParent(self.kind()));
        }
        if self.readonly() {
            warn!(path = %self.path(), "refusing to add into a read-only folder");
            return Err(Error::ReadOnly(self.path()));
        }
        match child.into() {
            NewChild::Kind(kind) => self.create(kind, index),
            NewChild::Existing(entry) => self.adopt(entry, index),
        }
    }

    /// Attaches `child` at the end without any UI side effects.
    pub fn append(&self, child: Entry) -> Result<Entry> {
        self.attach(&child, None)?;
        Ok(child)
    }

    fn create(&self, kind: ItemKind, index: Option<usize>) -> Result<Entry> {
        let default_name = self
            .resolve(|hooks| hooks.default_name.clone())
            .map_or_else(|| kind.as_str().to_string(), |default_name| default_name(kind));
        let name = naming::unique_name(self, &default_name)?;
        let init = ItemInit::new(name);
        let child = match self.resolve(|hooks| hooks.factory.clone()) {
            Some(factory) => factory.make(kind, init),
            None => DefaultFactory.make(kind, init),
        };

        let position = self.attach(&child, index)?;
        debug!(path = %child.path(), position, kind = kind.as_str(), "created entry");

        self.fire(TreeEvent::RequestOpen(Depth::Local));
        self.defer_rename(&child);
        Ok(child)
    }

    fn adopt(&self, entry: Entry, index: Option<usize>) -> Result<Entry> {
        let previous = entry.parent();
        let position = self.attach(&entry, index)?;
        debug!(path = %entry.path(), position, "moved entry");

        if previous.as_ref() != Some(self) {
            entry.fire(TreeEvent::Reparented);
        }
        self.fire(TreeEvent::RequestOpen(Depth::Local));
        Ok(entry)
    }

    /// Second phase of an interactive add. Runs on the host's queue, so it
    /// re-checks that the child is still ours before asking for a rename.
    fn defer_rename(&self, child: &Entry) {
        let weak_parent = self.downgrade();
        let weak_child = child.downgrade();
        let task = Box::new(move || {
            let (Some(parent), Some(child)) = (weak_parent.upgrade(), weak_child.upgrade()) else {
                return;
            };
            if child.parent().as_ref() != Some(&parent) {
                debug!(path = %child.path(), "entry moved before its rename request ran");
                return;
            }
            let finalize_parent = parent.downgrade();
            let finalize_child = child.downgrade();
            child.once(EventKind::Renamed, move |_| {
                let (Some(parent), Some(child)) =
                    (finalize_parent.upgrade(), finalize_child.upgrade())
                else {
                    return;
                };
                if parent.index_of(&child).is_some() {
                    parent.fire(TreeEvent::ChildAddFinalized { entry: child });
                }
            });
            child.request_rename(RenameRequest::default());
        });

        match self.resolve(|hooks| hooks.scheduler.clone()) {
            Some(scheduler) => scheduler.defer(task),
            None => task(),
        }
    }

    /// Runs every check [`attach`](Self::attach) needs and returns the name
    /// the child will carry here, as rewritten by the validator hook.
    fn check_attach(&self, child: &Entry) -> Result<String> {
        if !self.is_parent() {
            return Err(Error::NotAParent(self.kind()));
        }
        let current = child.name().ok_or(Error::RootEntry)?;
        if self == child || self.ancestors().any(|ancestor| ancestor == *child) {
            return Err(Error::Cycle { path: child.path() });
        }
        let name = naming::validate(self, &current)?;
        if !naming::is_name_unique_except(self, &name, Some(child)) {
            let suggestion = naming::unique_name_except(self, &name, Some(child))?;
            return Err(Error::NameTaken { name, suggestion });
        }
        Ok(name)
    }

    /// Inserts `child`, detaching it from its current parent first. All checks
    /// run before anything changes. The child keeps the name produced by this
    /// parent's validator.
    pub(crate) fn attach(&self, child: &Entry, index: Option<usize>) -> Result<usize> {
        let name = self.check_attach(child)?;
        Ok(self.insert_checked(child, name, index))
    }

    fn insert_checked(&self, child: &Entry, name: String, index: Option<usize>) -> usize {
        let Some(children) = self.children_cell() else {
            return 0;
        };
        if let Some(previous) = child.parent() {
            previous.detach(child);
        }
        if let Some(item) = child.item() {
            if *item.name.borrow() != name {
                debug!(from = %item.name.borrow(), to = %name, "validator rewrote name on attach");
                *item.name.borrow_mut() = name;
            }
        }
        let position = {
            let mut entries = children.entries.borrow_mut();
            let position = index.map_or(entries.len(), |index| index.min(entries.len()));
            entries.insert(position, child.clone());
            position
        };
        child.set_parent(Some(self));
        propagation::install(self, child);
        child.fill_default_icons();
        position
    }

    /// Moves several existing entries here in one step, in order, starting at
    /// `index` (appending when `None` or past the end).
    ///
    /// Every entry is checked against this parent and against the rest of the
    /// batch before any of them moves, so either all are inserted or none.
    /// Moved entries fire [`TreeEvent::Reparented`]; the parent fires a single
    /// [`TreeEvent::RequestOpen`].
    pub fn add_all(&self, entries: &[Entry], index: Option<usize>) -> Result<Vec<Entry>> {
        if !self.is_parent() {
            return Err(Error::NotAParent(self.kind()));
        }
        if self.readonly() {
            warn!(path = %self.path(), "refusing to add into a read-only folder");
            return Err(Error::ReadOnly(self.path()));
        }

        let mut checked: Vec<(Entry, String)> = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = self.check_attach(entry)?;
            if checked
                .iter()
                .any(|(other, other_name)| other == entry || *other_name == name)
            {
                let suggestion = naming::unique_name_except(self, &name, Some(entry))?;
                return Err(Error::NameTaken { name, suggestion });
            }
            checked.push((entry.clone(), name));
        }

        let mut moved = Vec::with_capacity(checked.len());
        for (offset, (entry, name)) in checked.into_iter().enumerate() {
            let previous = entry.parent();
            let position = self.insert_checked(&entry, name, index.map(|index| index + offset));
            debug!(path = %entry.path(), position, "moved entry");
            if previous.as_ref() != Some(self) {
                entry.fire(TreeEvent::Reparented);
            }
            moved.push(entry);
        }
        self.fire(TreeEvent::RequestOpen(Depth::Local));
        Ok(moved)
    }

    /// Drops `child` from the sequence and its relay link. Returns whether the
    /// child was present.
    fn detach(&self, child: &Entry) -> bool {
        let Some(children) = self.children_cell() else {
            return false;
        };
        let removed = {
            let mut entries = children.entries.borrow_mut();
            entries
                .iter()
                .position(|candidate| candidate == child)
                .map(|position| entries.remove(position))
        };
        propagation::unlink(self, child);
        child.set_parent(None);
        removed.is_some()
    }

    /// Detaches this item from its parent. Removing an item that is not
    /// attached is a logic error and reported as [`Error::Detached`].
    pub fn remove(&self) -> Result<()> {
        if self.is_root() {
            return Err(Error::RootEntry);
        }
        let parent = self.parent().ok_or(Error::Detached)?;
        let path = self.path();
        if !parent.detach(self) {
            return Err(Error::Detached);
        }
        debug!(%path, "removed entry");
        Ok(())
    }

    /// Renames this item after validating against its parent's hooks.
    ///
    /// Blank input, or the current name, cancels: the name is kept but
    /// [`TreeEvent::Renamed`] still fires so a pending add can settle.
    pub fn rename(&self, new_name: &str) -> Result<()> {
        let item = self.item().ok_or(Error::RootEntry)?;
        if item.readonly {
            return Err(Error::ReadOnly(self.path()));
        }
        let from = item.name.borrow().clone();

        let to = if new_name.trim().is_empty() || new_name == from {
            from.clone()
        } else {
            match self.parent() {
                Some(parent) => {
                    let validated = naming::validate(&parent, new_name)?;
                    if !naming::is_name_unique_except(&parent, &validated, Some(self)) {
                        let suggestion =
                            naming::unique_name_except(&parent, &validated, Some(self))?;
                        warn!(name = %validated, %suggestion, "rename collides with a sibling");
                        return Err(Error::NameTaken {
                            name: validated,
                            suggestion,
                        });
                    }
                    validated
                }
                None => naming::check_content(new_name)?,
            }
        };

        *item.name.borrow_mut() = to.clone();
        debug!(%from, %to, "renamed entry");
        self.fire(TreeEvent::Renamed { from, to });
        Ok(())
    }

    /// Stable sort of the children by the nearest comparator hook, or
    /// [`compare_names`].
    pub fn sort(&self) -> Result<()> {
        let children = self.children_cell().ok_or(Error::NotAParent(self.kind()))?;
        let mut sorted = children.entries.borrow().clone();
        match self.resolve(|hooks| hooks.comparator.clone()) {
            Some(comparator) => sorted.sort_by(|a, b| comparator(a, b)),
            None => sorted.sort_by(compare_names),
        }
        *children.entries.borrow_mut() = sorted;
        debug!(path = %self.path(), "sorted children");
        Ok(())
    }

    /// Visits every descendant once, each folder before its own children.
    pub fn walk(&self, mut visit: impl FnMut(&Entry)) {
        self.walk_with(&mut visit);
    }

    fn walk_with(&self, visit: &mut dyn FnMut(&Entry)) {
        for child in self.children() {
            visit(&child);
            child.walk_with(visit);
        }
    }

    /// Detaches this entry if attached and closes the event channels of it
    /// and every descendant.
    pub fn dispose(&self) -> Result<()> {
        if self.parent().is_some() {
            self.remove()?;
        }
        self.walk(|entry| entry.events().close());
        self.events().close();
        Ok(())
    }

    /// Runs deferred tasks queued on the nearest scheduler.
    pub fn run_pending(&self) -> usize {
        self.resolve(|hooks| hooks.scheduler.clone())
            .map_or(0, |scheduler| scheduler.run_pending())
    }
}
