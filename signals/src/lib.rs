/*!
Single-threaded signals and slots

A [`Signal`] is a typed event source. Slots attach to it with [`Signal::connect`] (or
[`Signal::connect_method`] for a method on an `Rc`-owned object) and receive every value
passed to [`Signal::notify`]. Each attach returns a [`Connection`]; dropping it detaches
the slot. A [`ConnectionSet`] collects connections so that a subscriber detaches
everything it attached when it goes away.

# Guarantees:
- slots run in the order they were connected
- a slot bound to an owner is never invoked once the owner is dropped
- connecting or disconnecting from inside a slot is fine, and only affects later notifications
- a slot that panics (or returns `Err`, see [`Signal::connect_fallible`]) does not stop the others
- a slot may call `notify` again; nested deliveries are queued rather than recursed into

# Basic usage

```rust
use signal_slots::*;
use std::{cell::RefCell, rc::Rc};

let changed = Signal::<(String, i32)>::new();
let log = Rc::new(RefCell::new(Vec::new()));

let connection = {
    let log = log.clone();
    changed.connect(move |(name, value)| log.borrow_mut().push(format!("{name}={value}")))
};

changed.notify(("age".to_string(), 29));
drop(connection);
changed.notify(("age".to_string(), 30));

assert_eq!(*log.borrow(), ["age=29"]);
```

# Owner-bound slots

```rust
use signal_slots::*;
use std::{cell::Cell, rc::Rc};

struct Display {
    shown: Cell<i32>,
}

let value = Signal::<i32>::new();
let display = Rc::new(Display { shown: Cell::new(0) });
let _connection = value.connect_method(&display, |display, v| display.shown.set(v));

value.notify(7);
assert_eq!(display.shown.get(), 7);

drop(display);
value.notify(8); // nobody to deliver to
assert_eq!(value.count(), 0);
```
*/

mod aggregator;
mod connection;
mod dispatch;
mod error;
mod signal;
mod slot;

pub use aggregator::*;
pub use connection::*;
pub use dispatch::DispatchScope;
pub use error::*;
pub use signal::*;
pub use slot::{IntoSlot, SlotFn, SlotId};
