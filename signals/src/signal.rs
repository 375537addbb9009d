use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::connection::Connection;
use crate::dispatch::{DispatchQueue, DispatchScope};
use crate::slot::{self, IntoSlot, Liveness, SlotEntry, SlotFn, SlotId};

/// A typed event source that any number of slots can attach to.
///
/// `A` is the argument every slot receives; use a tuple for several arguments and `()`
/// for none. Each invoked slot gets its own clone of the notified value.
///
/// Slots are invoked in the order they were connected. Entries whose owner has been
/// dropped are swept lazily, at the start of `connect`, `notify` and `count`.
pub struct Signal<A> {
    inner: Rc<Inner<A>>,
    dispatch: Rc<DispatchQueue<A>>,
}

struct Inner<A> {
    entries: RefCell<Vec<Rc<SlotEntry<A>>>>,
    next_id: Cell<u64>,
}

impl<A> Inner<A> {
    // Removed entries are dropped only after the borrow ends: a slot's closure may own
    // connections to this same signal, and dropping those calls back into `disconnect`.
    fn disconnect(&self, id: SlotId) {
        trace!(slot = %id, "Signal.disconnect");
        let removed = {
            let mut entries = self.entries.borrow_mut();
            entries.iter().position(|entry| entry.id == id).map(|index| entries.remove(index))
        };
        drop(removed);
    }
}

impl<A> std::fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("slots", &self.inner.entries.borrow().len()).finish()
    }
}

impl<A: Clone + 'static> Default for Signal<A> {
    fn default() -> Self { Self::new() }
}

impl<A: Clone + 'static> Signal<A> {
    /// Creates a signal with its own dispatch queue
    pub fn new() -> Self { Self::with_scope(DispatchScope::Instance) }

    /// Creates a signal whose pending deliveries live in the given scope.
    /// See [`DispatchScope`] for how nested notifications behave in each.
    pub fn with_scope(scope: DispatchScope) -> Self {
        Self {
            inner: Rc::new(Inner { entries: RefCell::new(Vec::new()), next_id: Cell::new(0) }),
            dispatch: DispatchQueue::for_scope(scope),
        }
    }

    /// Attaches a slot. It stays attached until the returned connection is released or dropped,
    /// or until [`disconnect_all`](Self::disconnect_all) is called.
    pub fn connect<F>(&self, slot: F) -> Connection
    where F: Fn(A) + 'static {
        self.attach(IntoSlot::<A>::into_slot(slot), None)
    }

    /// Attaches anything convertible into a slot, such as a channel sender.
    /// Values that cannot be sent because the receiver is gone are dropped.
    pub fn connect_slot<S>(&self, slot: S) -> Connection
    where S: IntoSlot<A> {
        self.attach(slot.into_slot(), None)
    }

    /// Attaches a slot that can fail. An `Err` is logged and discarded like a panic would be,
    /// and does not keep the remaining slots from running.
    pub fn connect_fallible<F, E>(&self, slot: F) -> Connection
    where
        F: Fn(A) -> Result<(), E> + 'static,
        E: std::error::Error + 'static,
    {
        self.attach(slot::fallible(slot), None)
    }

    /// Attaches `method` bound to `owner` without keeping the owner alive.
    ///
    /// Once the last strong reference to the owner is dropped the slot is never invoked again,
    /// and the entry is removed at the next `connect`, `notify` or `count`.
    pub fn connect_method<T, M>(&self, owner: &Rc<T>, method: M) -> Connection
    where
        T: 'static,
        M: Fn(&T, A) + 'static,
    {
        let (callable, liveness) = slot::bound(owner, method);
        self.attach(callable, Some(liveness))
    }

    fn attach(&self, callable: SlotFn<A>, liveness: Option<Box<dyn Liveness>>) -> Connection {
        self.sweep();
        let id = SlotId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        trace!(slot = %id, bound = liveness.is_some(), "Signal.connect");
        self.inner.entries.borrow_mut().push(Rc::new(SlotEntry::new(id, callable, liveness)));

        // The connection does not keep the signal alive; releasing it after the signal is gone does nothing.
        let inner: Weak<Inner<A>> = Rc::downgrade(&self.inner);
        Connection::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.disconnect(id);
            }
        })
    }

    /// Invokes every attached slot with a clone of `args`, in connection order.
    ///
    /// The set of slots is fixed when the call starts: slots connected during delivery
    /// wait for the next notify, and slots disconnected during delivery still receive this one.
    /// A slot that panics is skipped over. If a slot notifies a signal sharing this signal's
    /// dispatch queue, the new deliveries are queued behind the current ones and delivered
    /// before the outermost `notify` returns.
    pub fn notify(&self, args: A) {
        self.sweep();
        let snapshot: Vec<Rc<SlotEntry<A>>> = self.inner.entries.borrow().clone();
        trace!(slots = snapshot.len(), nested = self.dispatch.is_draining(), "Signal.notify");
        self.dispatch.dispatch(snapshot, args);
    }

    /// Same as [`notify`](Self::notify)
    pub fn emit(&self, args: A) { self.notify(args) }

    /// A closure that notifies this signal, for handing the signal to APIs that want a callback.
    pub fn as_fn(&self) -> impl Fn(A) + '_ { move |args| self.notify(args) }

    /// Detaches every slot immediately. Deliveries already queued by a running notify still happen.
    pub fn disconnect_all(&self) {
        let removed = std::mem::take(&mut *self.inner.entries.borrow_mut());
        debug!(slots = removed.len(), "Signal.disconnect_all");
        drop(removed);
    }

    /// The number of attached slots, after dropping those whose owner is gone
    pub fn count(&self) -> usize {
        self.sweep();
        self.inner.entries.borrow().len()
    }

    pub fn slot_count(&self) -> usize { self.count() }

    pub fn is_empty(&self) -> bool { self.count() == 0 }

    fn sweep(&self) {
        let expired: Vec<Rc<SlotEntry<A>>> = {
            let mut entries = self.inner.entries.borrow_mut();
            if !entries.iter().any(|entry| entry.expired()) {
                return;
            }
            let (live, expired) = std::mem::take(&mut *entries).into_iter().partition(|entry| !entry.expired());
            *entries = live;
            expired
        };
        trace!(removed = expired.len(), "Signal.sweep");
        drop(expired);
    }
}
