mod common;
use common::watcher;
use signal_slots::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct Handler {
    last_value: Cell<i32>,
}

impl Handler {
    fn new() -> Rc<Self> { Rc::new(Self { last_value: Cell::new(0) }) }

    fn on_value(&self, value: i32) { self.last_value.set(value); }
}

#[test]
fn test_owner_bound_slot_is_not_invoked_after_owner_dropped() {
    let signal = Signal::<i32>::new();
    let (record, check) = watcher();
    let owner = Rc::new(record);
    let _connection = signal.connect_method(&owner, |record, v| record(v));
    assert_eq!(signal.count(), 1);

    drop(owner);
    signal.notify(7);
    assert_eq!(check(), [] as [i32; 0]);
    assert_eq!(signal.count(), 0);
}

#[test]
fn test_weak_lifetime_management() {
    let signal = Signal::<i32>::new();
    let handler1 = Handler::new();
    let handler2 = Handler::new();

    let _c1 = signal.connect_method(&handler1, Handler::on_value);
    let _c2 = signal.connect_method(&handler2, Handler::on_value);
    assert_eq!(signal.count(), 2);

    signal.notify(100);
    assert_eq!(handler1.last_value.get(), 100);
    assert_eq!(handler2.last_value.get(), 100);

    drop(handler1);
    signal.notify(200);
    assert_eq!(signal.count(), 1);
    assert_eq!(handler2.last_value.get(), 200);

    drop(handler2);
    assert_eq!(signal.count(), 0);
}

#[test]
fn test_owner_bound_slot_does_not_keep_owner_alive() {
    let signal = Signal::<i32>::new();
    let handler = Handler::new();
    let _connection = signal.connect_method(&handler, Handler::on_value);
    assert_eq!(Rc::strong_count(&handler), 1);
    assert_eq!(Rc::weak_count(&handler), 2);
}

#[test]
fn test_dead_entry_is_swept_by_connect() {
    let signal = Signal::<i32>::new();
    let handler = Handler::new();
    let _bound = signal.connect_method(&handler, Handler::on_value);
    drop(handler);

    let _other = signal.connect(|_: i32| {});
    assert_eq!(signal.count(), 1);
}

#[test]
fn test_dead_entry_without_further_calls_is_harmless() {
    let signal = Signal::<i32>::new();
    let handler = Handler::new();
    let token = Rc::new(());
    let connection = {
        let token = token.clone();
        signal.connect_method(&handler, move |handler: &Handler, v| {
            let _held = &token;
            handler.on_value(v)
        })
    };

    drop(handler);
    // no sweep has run, so the signal still owns the dead entry and what it captured
    assert_eq!(Rc::strong_count(&token), 2);

    // dropping the signal releases it; the connection then has nothing left to release
    drop(signal);
    assert_eq!(Rc::strong_count(&token), 1);
    drop(connection);
}

#[test]
fn test_releasing_bound_connection() {
    let signal = Signal::<i32>::new();
    let handler = Handler::new();
    let mut connection = signal.connect_method(&handler, Handler::on_value);
    connection.release();
    signal.notify(5);
    assert_eq!(handler.last_value.get(), 0);
    assert_eq!(signal.count(), 0);
}

#[test]
fn test_connection_outliving_signal() {
    let signal = Signal::<String>::new();
    let connection = signal.connect(|_: String| {});
    drop(signal);
    assert!(connection.is_active());
    drop(connection);
}

// A subscriber that detaches everything it connected when it is dropped
struct Widget {
    value: Rc<Cell<usize>>,
    connections: ConnectionSet,
}

impl Widget {
    fn new() -> Self { Self { value: Rc::new(Cell::new(0)), connections: ConnectionSet::new() } }

    fn connect_to(&mut self, signal: &Signal<usize>) {
        let value = self.value.clone();
        self.add_connection(signal.connect(move |v: usize| value.set(v)));
    }

    fn connect_text(&mut self, signal: &Signal<String>) {
        let value = self.value.clone();
        self.add_connection(signal.connect(move |s: String| value.set(s.len())));
    }
}

impl AutoDisconnect for Widget {
    fn connections_mut(&mut self) -> &mut ConnectionSet { &mut self.connections }
}

#[test]
fn test_auto_disconnect_basic() {
    let signal = Signal::<usize>::new();
    {
        let mut widget = Widget::new();
        widget.connect_to(&signal);
        assert_eq!(signal.count(), 1);

        signal.notify(42);
        assert_eq!(widget.value.get(), 42);
    }
    assert_eq!(signal.count(), 0);
}

#[test]
fn test_auto_disconnect_multiple_signals() {
    let numbers = Signal::<usize>::new();
    let text = Signal::<String>::new();
    {
        let mut widget = Widget::new();
        widget.connect_to(&numbers);
        widget.connect_text(&text);
        assert_eq!(numbers.count(), 1);
        assert_eq!(text.count(), 1);

        numbers.notify(100);
        assert_eq!(widget.value.get(), 100);
        text.notify("hello".to_string());
        assert_eq!(widget.value.get(), 5);
    }
    assert_eq!(numbers.count(), 0);
    assert_eq!(text.count(), 0);
}

#[test]
fn test_auto_disconnect_partial_destruction() {
    let signal = Signal::<usize>::new();
    let mut widget1 = Widget::new();
    let mut widget2 = Widget::new();
    widget1.connect_to(&signal);
    widget2.connect_to(&signal);
    assert_eq!(signal.count(), 2);

    signal.notify(50);
    assert_eq!(widget1.value.get(), 50);
    assert_eq!(widget2.value.get(), 50);

    drop(widget1);
    assert_eq!(signal.count(), 1);

    signal.notify(75);
    assert_eq!(widget2.value.get(), 75);

    drop(widget2);
    assert_eq!(signal.count(), 0);
}

#[test]
fn test_connection_set_releases_in_insertion_order() {
    let (record, check) = watcher();
    let signals: Vec<Signal<()>> = (0..3).map(|_| Signal::new()).collect();
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut set = ConnectionSet::new();
    for (n, signal) in signals.iter().enumerate() {
        let record = record.clone();
        set.add(signal.connect(move |_| record(n)));
        let order = order.clone();
        set.add(Connection::new(move || order.borrow_mut().push(n)));
    }
    for signal in &signals {
        signal.notify(());
    }
    assert_eq!(check(), [0, 1, 2]);

    set.clear();
    assert_eq!(*order.borrow(), [0, 1, 2]);
    assert!(signals.iter().all(|signal| signal.count() == 0));
}
