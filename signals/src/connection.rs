/// The right to detach exactly one slot from a signal.
///
/// Returned by [`Signal::connect`](crate::Signal::connect) and friends. Dropping the
/// connection detaches the slot, so it must be kept alive for as long as the slot should
/// stay attached. Connections cannot be cloned; moving one moves the right with it, and
/// assigning over an active connection detaches the slot it held before.
///
/// ```rust
/// use signal_slots::Signal;
/// use std::{cell::Cell, rc::Rc};
///
/// let signal = Signal::<i32>::new();
/// let seen = Rc::new(Cell::new(0));
/// {
///     let seen = seen.clone();
///     let _connection = signal.connect(move |v| seen.set(v));
///     signal.notify(42);
/// } // detached here
/// signal.notify(7);
/// assert_eq!(seen.get(), 42);
/// ```
#[must_use = "dropping a Connection detaches its slot immediately"]
#[derive(Default)]
pub struct Connection {
    release: Option<Box<dyn FnOnce() + 'static>>,
}

impl Connection {
    /// Creates an active connection that runs `release` once when released or dropped.
    pub fn new<F: FnOnce() + 'static>(release: F) -> Self { Self { release: Some(Box::new(release)) } }

    /// Whether releasing this connection would still detach something
    pub fn is_active(&self) -> bool { self.release.is_some() }

    /// Detaches the slot now. Calling this again, or dropping the connection afterwards, does nothing.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Gives up the right to detach without detaching, leaving the slot attached
    /// for as long as its signal lives.
    pub fn forget(mut self) { self.release = None; }
}

impl Drop for Connection {
    fn drop(&mut self) { self.release(); }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("Connection").field("active", &self.is_active()).finish() }
}
