//! Subscribe/unsubscribe registry for synchronous change notification.
//!
//! All methods take `&self` so stores can notify while callers hold shared
//! references to them. Notification runs over a snapshot of the listener
//! list with no borrow held, so a listener may subscribe, unsubscribe, or
//! mutate the store that is notifying it.

use std::{
    cell::{Cell, RefCell},
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use tracing::warn;

/// Opaque handle returned by [`ListenerRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

pub struct ListenerRegistry<E> {
    name: &'static str,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> ListenerRegistry<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` when the handle was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Delivers `event` to every listener registered when the call began.
    ///
    /// A panicking listener is logged and skipped; later listeners still run.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(ListenerId, Listener<E>)> = self.listeners.borrow().clone();
        for (id, listener) in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event)));
            if let Err(payload) = outcome {
                warn!(
                    registry = self.name,
                    listener = id.0,
                    reason = panic_message(payload.as_ref()),
                    "listener panicked during notification"
                );
            }
        }
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("name", &self.name)
            .field("listeners", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
