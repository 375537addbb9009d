use std::cell::RefCell;
use std::rc::Rc;

/// Returns a recorder to hand to slots and a check function that drains what was recorded.
#[allow(unused)]
pub fn watcher<T: 'static>() -> (Rc<dyn Fn(T)>, Box<dyn Fn() -> Vec<T>>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let watcher = {
        let changes = changes.clone();
        Rc::new(move |value: T| {
            changes.borrow_mut().push(value);
        })
    };

    let check = Box::new(move || {
        let changes: Vec<T> = changes.borrow_mut().drain(..).collect();
        changes
    });

    (watcher, check)
}

#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init(); }
