pub mod channel;
pub(crate) mod propagation;

use crate::models::entry::Entry;
use crate::models::events::{EventKind, RenameRequest, TreeEvent};
use channel::Subscription;

impl Entry {
    pub fn fire(&self, event: TreeEvent) -> usize {
        self.events().fire(&event)
    }

    pub fn on(&self, kind: EventKind, handler: impl Fn(&TreeEvent) + 'static) -> Subscription {
        self.events().subscribe(kind, handler)
    }

    pub fn once(&self, kind: EventKind, handler: impl Fn(&TreeEvent) + 'static) -> Subscription {
        self.events().subscribe_once(kind, handler)
    }

    pub fn click(&self) {
        self.fire(TreeEvent::Clicked);
    }

    pub fn request_rename(&self, request: RenameRequest) {
        self.fire(TreeEvent::RequestRename(request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ItemInit;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(entry: &Entry) -> Rc<RefCell<Vec<TreeEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        entry
            .events()
            .subscribe_all(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn child_click_is_relayed_with_current_index() -> crate::core::errors::Result<()> {
        let root = Entry::root();
        root.append(Entry::file(ItemInit::new("a")))?;
        let b = root.append(Entry::file(ItemInit::new("b")))?;
        let log = record(&root);

        b.click();
        root.child(0).map(|a| a.remove()).transpose()?;
        b.click();

        let indices: Vec<usize> = log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                TreeEvent::ChildClicked { entry, index } if *entry == b => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![1, 0]);
        Ok(())
    }

    #[test]
    fn nested_events_bubble_to_the_root() -> crate::core::errors::Result<()> {
        let root = Entry::root();
        let folder = root.append(Entry::folder(ItemInit::new("src")))?;
        let file = folder.append(Entry::file(ItemInit::new("main.rs")))?;
        let log = record(&root);

        file.rename("lib.rs")?;

        let relayed = log.borrow();
        assert_eq!(relayed.len(), 1);
        match &relayed[0] {
            TreeEvent::ChildRenamed {
                entry,
                from,
                to,
                index,
            } => {
                assert_eq!(*entry, file);
                assert_eq!((from.as_str(), to.as_str(), *index), ("main.rs", "lib.rs", 0));
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn detached_child_no_longer_reaches_parent() -> crate::core::errors::Result<()> {
        let root = Entry::root();
        let file = root.append(Entry::file(ItemInit::new("a")))?;
        let log = record(&root);

        file.remove()?;
        file.click();
        file.fire(TreeEvent::Renamed {
            from: "a".into(),
            to: "b".into(),
        });

        assert!(log.borrow().is_empty());
        assert_eq!(file.events().listener_count(), 0);
        Ok(())
    }

    #[test]
    fn item_only_events_are_not_relayed() -> crate::core::errors::Result<()> {
        let root = Entry::root();
        let file = root.append(Entry::file(ItemInit::new("a")))?;
        let log = record(&root);

        file.request_rename(RenameRequest::default());
        file.fire(TreeEvent::RequestFocusToggle);

        assert!(log.borrow().is_empty());
        Ok(())
    }
}
