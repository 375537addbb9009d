//! A document model announcing its changes to a view and a logger.
//! `cargo run -p signal-slots --example document_viewer`

use signal_slots::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::Level;

#[derive(Default)]
struct Document {
    title: RefCell<String>,
    content: RefCell<String>,
    title_changed: Signal<String>,
    content_changed: Signal<String>,
    saved: Signal<()>,
}

impl Document {
    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
        self.title_changed.notify(title.to_string());
    }

    fn set_content(&self, content: &str) {
        *self.content.borrow_mut() = content.to_string();
        self.content_changed.notify(content.to_string());
    }

    fn save(&self) { self.saved.notify(()); }
}

#[derive(Default)]
struct View {
    displayed_title: RefCell<String>,
    dirty: RefCell<bool>,
}

impl View {
    fn on_title(&self, title: String) { *self.displayed_title.borrow_mut() = title; }
    fn on_content(&self, _content: String) { *self.dirty.borrow_mut() = true; }
    fn on_saved(&self, _: ()) { *self.dirty.borrow_mut() = false; }
}

/// Logs every change for as long as it lives
struct Logger {
    lines: Rc<RefCell<Vec<String>>>,
    connections: ConnectionSet,
}

impl Logger {
    fn attach(document: &Document) -> Self {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let mut logger = Self { lines: lines.clone(), connections: ConnectionSet::new() };
        let log = move |line: String| lines.borrow_mut().push(line);
        let log = Rc::new(log);
        logger.add_connection(document.title_changed.connect({
            let log = log.clone();
            move |title: String| log(format!("Title changed: {title}"))
        }));
        logger.add_connection(document.content_changed.connect({
            let log = log.clone();
            move |content: String| log(format!("Content changed: {content}"))
        }));
        logger.add_connection(document.saved.connect(move |_| log("Document saved".to_string())));
        logger
    }
}

impl AutoDisconnect for Logger {
    fn connections_mut(&mut self) -> &mut ConnectionSet { &mut self.connections }
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::TRACE).init();

    let document = Document::default();
    let view = Rc::new(View::default());
    let _view_connections: ConnectionSet = [
        document.title_changed.connect_method(&view, View::on_title),
        document.content_changed.connect_method(&view, View::on_content),
        document.saved.connect_method(&view, View::on_saved),
    ]
    .into_iter()
    .collect();

    let logger = Logger::attach(&document);

    document.set_title("My Document");
    document.set_content("Hello World");
    println!("title: {}, dirty: {}", view.displayed_title.borrow(), view.dirty.borrow());
    document.save();
    println!("title: {}, dirty: {}", view.displayed_title.borrow(), view.dirty.borrow());

    let lines = logger.lines.clone();
    drop(logger);
    document.set_title("Unlogged");
    for line in lines.borrow().iter() {
        println!("log: {line}");
    }

    drop(view);
    document.set_title("Nobody watching");
    println!("slots left on title_changed: {}", document.title_changed.count());
}
