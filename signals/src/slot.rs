use std::rc::{Rc, Weak};

use crate::error::SlotError;

/// A unique identifier for a slot within one signal.
/// Ids are handed out by the signal in increasing order and never reused.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u64);

impl From<SlotId> for u64 {
    fn from(id: SlotId) -> Self { id.0 }
}
impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// The type-erased callable stored for every slot.
pub type SlotFn<A> = Box<dyn Fn(A) -> Result<(), SlotError> + 'static>;

/// A non-owning reference that can tell whether the object it points at is gone.
pub(crate) trait Liveness {
    /// True once the referenced object has been dropped.
    fn expired(&self) -> bool;
}

impl<T: ?Sized> Liveness for Weak<T> {
    fn expired(&self) -> bool { self.strong_count() == 0 }
}

/// One registered subscription
pub(crate) struct SlotEntry<A> {
    pub(crate) id: SlotId,
    callable: SlotFn<A>,
    liveness: Option<Box<dyn Liveness>>,
}

impl<A> SlotEntry<A> {
    pub(crate) fn new(id: SlotId, callable: SlotFn<A>, liveness: Option<Box<dyn Liveness>>) -> Self { Self { id, callable, liveness } }

    pub(crate) fn id(&self) -> SlotId { self.id }

    /// True when the entry is bound to an owner that has been dropped.
    /// Entries without a liveness reference never expire.
    pub(crate) fn expired(&self) -> bool { self.liveness.as_ref().is_some_and(|liveness| liveness.expired()) }

    pub(crate) fn invoke(&self, args: A) -> Result<(), SlotError> { (self.callable)(args) }
}

impl<A> std::fmt::Debug for SlotEntry<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotEntry").field("id", &self.id).field("bound", &self.liveness.is_some()).finish()
    }
}

/// Trait for types that can be converted into a slot.
pub trait IntoSlot<A> {
    /// Convert this type into the callable a signal stores and invokes on notify.
    fn into_slot(self) -> SlotFn<A>;
}

// Implementation for plain closures
impl<F, A> IntoSlot<A> for F
where F: Fn(A) + 'static
{
    fn into_slot(self) -> SlotFn<A> {
        Box::new(move |args| {
            self(args);
            Ok(())
        })
    }
}

impl<A: 'static> IntoSlot<A> for std::sync::mpsc::Sender<A> {
    fn into_slot(self) -> SlotFn<A> {
        Box::new(move |args| {
            let _ = self.send(args); // Ignore send errors
            Ok(())
        })
    }
}

#[cfg(feature = "tokio")]
impl<A: 'static> IntoSlot<A> for tokio::sync::mpsc::UnboundedSender<A> {
    fn into_slot(self) -> SlotFn<A> {
        Box::new(move |args| {
            let _ = self.send(args); // Ignore send errors
            Ok(())
        })
    }
}

/// Wraps a slot that reports failure through its return value.
pub(crate) fn fallible<A, E, F>(slot: F) -> SlotFn<A>
where
    F: Fn(A) -> Result<(), E> + 'static,
    E: std::error::Error + 'static,
{
    Box::new(move |args| slot(args).map_err(|e| SlotError::Failed(Box::new(e))))
}

/// Builds the callable for a member-bound slot.
/// The owner is only held weakly; a call after the owner is gone does nothing.
pub(crate) fn bound<T, A, M>(owner: &Rc<T>, method: M) -> (SlotFn<A>, Box<dyn Liveness>)
where
    T: 'static,
    M: Fn(&T, A) + 'static,
{
    let weak = Rc::downgrade(owner);
    let callable: SlotFn<A> = Box::new(move |args| {
        if let Some(owner) = weak.upgrade() {
            method(&owner, args);
        }
        Ok(())
    });
    (callable, Box::new(Rc::downgrade(owner)))
}
