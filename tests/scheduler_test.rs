use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use filetree::services::tree::scheduler::TokioScheduler;
use filetree::{Entry, EventKind, Hooks, ItemKind, TreeEvent};
use tokio::task::LocalSet;

#[tokio::test]
async fn tokio_scheduler_delivers_rename_request_later() -> Result<()> {
    let local = LocalSet::new();
    local
        .run_until(async {
            let root = Entry::root_with(Hooks::new().with_scheduler(Rc::new(TokioScheduler)));
            let child = root.add(ItemKind::File, None)?;

            let requests = Rc::new(RefCell::new(0));
            let count = requests.clone();
            child.on(EventKind::RequestRename, move |_| *count.borrow_mut() += 1);
            assert_eq!(*requests.borrow(), 0);
            assert_eq!(root.run_pending(), 0);

            tokio::task::yield_now().await;
            assert_eq!(*requests.borrow(), 1);

            let finalized = Rc::new(RefCell::new(Vec::new()));
            let sink = finalized.clone();
            root.on(EventKind::ChildAddFinalized, move |event| {
                if let TreeEvent::ChildAddFinalized { entry } = event {
                    sink.borrow_mut().push(entry.path());
                }
            });
            child.rename("notes.md")?;
            assert_eq!(*finalized.borrow(), vec!["/notes.md".to_string()]);
            Ok::<(), anyhow::Error>(())
        })
        .await
}

#[tokio::test]
async fn moved_child_gets_no_late_rename_request() -> Result<()> {
    let local = LocalSet::new();
    local
        .run_until(async {
            let root = Entry::root_with(Hooks::new().with_scheduler(Rc::new(TokioScheduler)));
            let other = root.add(ItemKind::Folder, None)?;
            let child = root.add(ItemKind::File, None)?;

            let requests = Rc::new(RefCell::new(0));
            let count = requests.clone();
            child.on(EventKind::RequestRename, move |_| *count.borrow_mut() += 1);
            other.add(&child, None)?;

            tokio::task::yield_now().await;
            assert_eq!(*requests.borrow(), 0);
            assert_eq!(child.path(), "/folder/file");
            Ok::<(), anyhow::Error>(())
        })
        .await
}
