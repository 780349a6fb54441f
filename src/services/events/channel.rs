use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::models::events::{EventKind, TreeEvent};

type Handler = Rc<dyn Fn(&TreeEvent)>;

struct Listener {
    id: u64,
    filter: Option<EventKind>,
    once: bool,
    handler: Handler,
}

impl Listener {
    fn wants(&self, kind: EventKind) -> bool {
        self.filter.map_or(true, |filter| filter == kind)
    }
}

#[derive(Default)]
struct ChannelState {
    next_id: u64,
    listeners: Vec<Listener>,
    closed: bool,
}

/// Synchronous publish/subscribe for one entry.
///
/// Handlers are invoked without any borrow of the channel held, so they may
/// subscribe, unsubscribe or fire again. A listener that is removed while a
/// fire is running is skipped for the rest of that fire.
#[derive(Clone, Default)]
pub struct EventChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&TreeEvent) + 'static,
    ) -> Subscription {
        self.register(Some(kind), false, Rc::new(handler))
    }

    /// Like [`subscribe`](Self::subscribe), but the handler is dropped right
    /// before its first invocation.
    pub fn subscribe_once(
        &self,
        kind: EventKind,
        handler: impl Fn(&TreeEvent) + 'static,
    ) -> Subscription {
        self.register(Some(kind), true, Rc::new(handler))
    }

    /// Receives every event fired on this channel.
    pub fn subscribe_all(&self, handler: impl Fn(&TreeEvent) + 'static) -> Subscription {
        self.register(None, false, Rc::new(handler))
    }

    fn register(&self, filter: Option<EventKind>, once: bool, handler: Handler) -> Subscription {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Subscription::inert();
        }
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Listener {
            id,
            filter,
            once,
            handler,
        });
        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Delivers `event` to matching listeners in subscription order and
    /// returns how many ran. A closed channel delivers nothing.
    pub fn fire(&self, event: &TreeEvent) -> usize {
        let kind = event.kind();
        let pending: Vec<u64> = {
            let state = self.state.borrow();
            if state.closed {
                return 0;
            }
            state
                .listeners
                .iter()
                .filter(|listener| listener.wants(kind))
                .map(|listener| listener.id)
                .collect()
        };
        tracing::trace!(event = %kind, listeners = pending.len(), "firing event");

        let mut delivered = 0;
        for id in pending {
            if let Some(handler) = self.claim(id) {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Looks up a still-registered listener, removing it first if it is a
    /// one-shot.
    fn claim(&self, id: u64) -> Option<Handler> {
        let mut state = self.state.borrow_mut();
        let position = state.listeners.iter().position(|listener| listener.id == id)?;
        if state.listeners[position].once {
            Some(state.listeners.remove(position).handler)
        } else {
            Some(state.listeners[position].handler.clone())
        }
    }

    /// Drops every listener; later subscriptions are inert and fires are
    /// no-ops.
    pub fn close(&self) {
        let dropped = {
            let mut state = self.state.borrow_mut();
            state.closed = true;
            std::mem::take(&mut state.listeners)
        };
        drop(dropped);
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventChannel")
            .field("listeners", &state.listeners.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Handle returned by the subscribe calls. Dropping it keeps the listener;
/// call [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    state: Weak<RefCell<ChannelState>>,
    id: u64,
}

impl Subscription {
    fn inert() -> Self {
        Self {
            state: Weak::new(),
            id: u64::MAX,
        }
    }

    /// Safe to call any number of times, also after the channel is gone.
    pub fn unsubscribe(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let removed = {
            let mut state = state.borrow_mut();
            state
                .listeners
                .iter()
                .position(|listener| listener.id == self.id)
                .map(|position| state.listeners.remove(position))
        };
        drop(removed);
    }

    pub fn is_active(&self) -> bool {
        self.state.upgrade().is_some_and(|state| {
            state
                .borrow()
                .listeners
                .iter()
                .any(|listener| listener.id == self.id)
        })
    }
}
