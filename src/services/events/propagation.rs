//! Relays item events from a child to its parent.
//!
//! Every attached child carries one link installed by its parent. The link is
//! removed when the child is detached, and the relay also re-checks the
//! child's position at fire time, so a detached child can never reach its
//! former parent.

use crate::models::entry::{Entry, WeakEntry};
use crate::models::events::TreeEvent;
use crate::services::events::channel::Subscription;

pub(crate) struct Link {
    child: WeakEntry,
    subscription: Subscription,
}

impl Link {
    pub(crate) fn is_for(&self, child: &Entry) -> bool {
        self.child.upgrade().is_some_and(|linked| linked == *child)
    }
}

pub(crate) fn link(parent: &Entry, child: &Entry) -> Link {
    let weak_parent = parent.downgrade();
    let weak_child = child.downgrade();
    let subscription = child.events().subscribe_all(move |event| {
        let (Some(parent), Some(child)) = (weak_parent.upgrade(), weak_child.upgrade()) else {
            return;
        };
        let Some(index) = parent.index_of(&child) else {
            return;
        };
        let relayed = match event {
            TreeEvent::Clicked => TreeEvent::ChildClicked {
                entry: child,
                index,
            },
            TreeEvent::Renamed { from, to } => TreeEvent::ChildRenamed {
                entry: child,
                from: from.clone(),
                to: to.clone(),
                index,
            },
            TreeEvent::ChildClicked { .. } | TreeEvent::ChildRenamed { .. } => event.clone(),
            _ => return,
        };
        parent.events().fire(&relayed);
    });
    Link {
        child: child.downgrade(),
        subscription,
    }
}

/// Tears down the link for `child`, if any. Returns whether one existed.
pub(crate) fn unlink(parent: &Entry, child: &Entry) -> bool {
    let Some(children) = parent.children_cell() else {
        return false;
    };
    let removed = {
        let mut links = children.links.borrow_mut();
        links
            .iter()
            .position(|link| link.is_for(child))
            .map(|position| links.remove(position))
    };
    match removed {
        Some(link) => {
            link.subscription.unsubscribe();
            true
        }
        None => false,
    }
}

pub(crate) fn install(parent: &Entry, child: &Entry) {
    if let Some(children) = parent.children_cell() {
        let link = link(parent, child);
        children.links.borrow_mut().push(link);
    }
}
