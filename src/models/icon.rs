use std::cell::RefCell;

/// Which icon a default-icon hook is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    File,
    Symlink,
    FolderOpen,
    FolderClosed,
}

pub fn default_icon(key: IconKey) -> String {
    match key {
        IconKey::File => "file".to_string(),
        IconKey::Symlink => "symlink".to_string(),
        IconKey::FolderOpen => "folder-open".to_string(),
        IconKey::FolderClosed => "folder-closed".to_string(),
    }
}

/// Placeholder filled in by a rendering layer. The model only stores an opaque
/// reference to whatever the view decides to draw.
#[derive(Debug, Default)]
pub struct Renderable {
    content: RefCell<Option<String>>,
}

impl Renderable {
    pub fn get(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    pub fn set(&self, content: impl Into<String>) {
        *self.content.borrow_mut() = Some(content.into());
    }

    pub fn clear(&self) {
        self.content.borrow_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.content.borrow().is_none()
    }

    pub(crate) fn fill_with(&self, content: impl FnOnce() -> String) {
        if self.is_empty() {
            self.set(content());
        }
    }
}

#[derive(Debug, Default)]
pub struct FolderIcon {
    pub open: Renderable,
    pub closed: Renderable,
}

/// Borrowed view of an entry's icon slots.
#[derive(Debug, Clone, Copy)]
pub enum IconSlots<'a> {
    Single(&'a Renderable),
    Dual(&'a FolderIcon),
}

/// Icon content supplied up front, bypassing the default-icon hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconInit {
    Single(String),
    Dual { open: String, closed: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_with_keeps_existing_content() {
        let slot = Renderable::default();
        slot.fill_with(|| "first".to_string());
        slot.fill_with(|| "second".to_string());
        assert_eq!(slot.get().as_deref(), Some("first"));

        slot.clear();
        assert!(slot.is_empty());
    }

    #[test]
    fn default_icons_are_distinct() {
        let keys = [
            IconKey::File,
            IconKey::Symlink,
            IconKey::FolderOpen,
            IconKey::FolderClosed,
        ];
        let mut names: Vec<String> = keys.iter().map(|k| default_icon(*k)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), keys.len());
    }
}
