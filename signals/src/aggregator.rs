use tracing::debug;

use crate::connection::Connection;

/// Owns a group of connections and releases all of them, in the order they were added,
/// when it is cleared or dropped.
///
/// Embed one in a subscriber so that everything the subscriber connected is detached
/// when the subscriber goes away.
///
/// ```rust
/// use signal_slots::{ConnectionSet, Signal};
///
/// let clicked = Signal::<()>::new();
/// let resized = Signal::<(u32, u32)>::new();
/// {
///     let mut connections = ConnectionSet::new();
///     connections.add(clicked.connect(|_| println!("clicked")));
///     connections.add(resized.connect(|(w, h)| println!("{w}x{h}")));
///     assert_eq!(clicked.count(), 1);
/// }
/// assert_eq!(clicked.count(), 0);
/// assert_eq!(resized.count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ConnectionSet {
    owned: Vec<Connection>,
}

impl ConnectionSet {
    pub fn new() -> Self { Self::default() }

    /// Takes ownership of a connection.
    pub fn add(&mut self, connection: Connection) { self.owned.push(connection); }

    /// Releases every owned connection in insertion order and forgets them.
    pub fn clear(&mut self) {
        if self.owned.is_empty() {
            return;
        }
        debug!(connections = self.owned.len(), "ConnectionSet.clear");
        for mut connection in self.owned.drain(..) {
            connection.release();
        }
    }

    pub fn len(&self) -> usize { self.owned.len() }

    pub fn is_empty(&self) -> bool { self.owned.is_empty() }
}

impl Drop for ConnectionSet {
    fn drop(&mut self) { self.clear(); }
}

impl Extend<Connection> for ConnectionSet {
    fn extend<I: IntoIterator<Item = Connection>>(&mut self, iter: I) { self.owned.extend(iter); }
}

impl FromIterator<Connection> for ConnectionSet {
    fn from_iter<I: IntoIterator<Item = Connection>>(iter: I) -> Self { Self { owned: iter.into_iter().collect() } }
}

/// For subscriber types that embed a [`ConnectionSet`].
///
/// Implementing `connections_mut` provides `add_connection`; the set itself takes care of
/// releasing everything when the subscriber is dropped.
pub trait AutoDisconnect {
    fn connections_mut(&mut self) -> &mut ConnectionSet;

    fn add_connection(&mut self, connection: Connection) { self.connections_mut().add(connection); }
}

impl AutoDisconnect for ConnectionSet {
    fn connections_mut(&mut self) -> &mut ConnectionSet { self }
}
