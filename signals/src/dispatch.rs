use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::SlotError;
use crate::slot::SlotEntry;

/// Where a signal keeps its pending deliveries while a notify is being drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchScope {
    /// Every signal drains its own queue. A slot notifying another signal sees that
    /// signal deliver fully before its nested `notify` call returns.
    #[default]
    Instance,
    /// All signals on this thread with the same argument type share one queue.
    /// A nested `notify` only enqueues; the outermost drain delivers everything
    /// in enqueue order, interleaving entries from different signals.
    Signature,
}

/// One pending invocation: the entry plus the arguments of the notify that queued it.
pub(crate) struct Delivery<A> {
    entry: Rc<SlotEntry<A>>,
    args: Rc<A>,
}

/// A FIFO of pending deliveries and the flag saying somebody is draining it.
pub(crate) struct DispatchQueue<A> {
    pending: RefCell<VecDeque<Delivery<A>>>,
    draining: Cell<bool>,
}

thread_local! {
    static SHARED_QUEUES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

impl<A: Clone + 'static> DispatchQueue<A> {
    fn new() -> Self { Self { pending: RefCell::new(VecDeque::new()), draining: Cell::new(false) } }

    /// Returns the queue a new signal with the given scope should use.
    pub(crate) fn for_scope(scope: DispatchScope) -> Rc<Self> {
        match scope {
            DispatchScope::Instance => Rc::new(Self::new()),
            DispatchScope::Signature => SHARED_QUEUES.with(|queues| {
                let mut queues = queues.borrow_mut();
                let queue = queues.entry(TypeId::of::<A>()).or_insert_with(|| Rc::new(Self::new()) as Rc<dyn Any>).clone();
                match queue.downcast::<Self>() {
                    Ok(queue) => queue,
                    // keyed by TypeId::of::<A>, so the downcast cannot miss
                    Err(_) => unreachable!("shared dispatch queue registered under the wrong type"),
                }
            }),
        }
    }

    pub(crate) fn is_draining(&self) -> bool { self.draining.get() }

    pub(crate) fn len(&self) -> usize { self.pending.borrow().len() }

    /// Queues one delivery per entry, then drains unless a drain is already running
    /// further up the stack, in which case that drain picks the new deliveries up.
    pub(crate) fn dispatch(&self, entries: Vec<Rc<SlotEntry<A>>>, args: A) {
        let args = Rc::new(args);
        self.pending.borrow_mut().extend(entries.into_iter().map(|entry| Delivery { entry, args: args.clone() }));

        if self.draining.get() {
            trace!(pending = self.len(), "dispatch: deferred to the running drain");
            return;
        }

        let _guard = DrainGuard::new(&self.draining);
        // The borrow must end before the slot runs, since the slot may notify again.
        while let Some(delivery) = self.pop() {
            if let Err(e) = invoke(&delivery) {
                warn!(slot = %delivery.entry.id(), "dispatch: slot error discarded: {}", e);
            }
        }
    }

    fn pop(&self) -> Option<Delivery<A>> { self.pending.borrow_mut().pop_front() }
}

fn invoke<A: Clone>(delivery: &Delivery<A>) -> Result<(), SlotError> {
    let args = (*delivery.args).clone();
    match catch_unwind(AssertUnwindSafe(|| delivery.entry.invoke(args))) {
        Ok(result) => result,
        Err(payload) => Err(SlotError::from_panic(payload)),
    }
}

/// Clears the draining flag when the drain loop exits, however it exits.
struct DrainGuard<'a>(&'a Cell<bool>);

impl<'a> DrainGuard<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) { self.0.set(false); }
}
