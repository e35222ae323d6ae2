//! Typed event routing between the toolkit and the search session.
//!
//! A session connects one handler per signal it listens to. Events for
//! signals without a live handler are dropped, so anything still queued for
//! a session after its teardown has no effect.

use crate::keys::KeyPress;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    QueryChanged,
    Key,
    RowActivated,
    ButtonPress,
    RowMeasured,
    Destroyed,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::QueryChanged,
        Signal::Key,
        Signal::RowActivated,
        Signal::ButtonPress,
        Signal::RowMeasured,
        Signal::Destroyed,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEventKind {
    /// Entry text replaced by the toolkit (paste, IME, ...).
    QueryChanged(String),
    Key(KeyPress),
    /// Double click or activation of a result row.
    RowActivated(usize),
    /// Pointer press in window coordinates.
    ButtonPress { x: f64, y: f64 },
    /// Height of a result row after layout.
    RowMeasured(u32),
    /// Window destroyed by the window manager.
    Destroyed,
}

impl SearchEventKind {
    pub fn signal(&self) -> Signal {
        match self {
            Self::QueryChanged(_) => Signal::QueryChanged,
            Self::Key(_) => Signal::Key,
            Self::RowActivated(_) => Signal::RowActivated,
            Self::ButtonPress { .. } => Signal::ButtonPress,
            Self::RowMeasured(_) => Signal::RowMeasured,
            Self::Destroyed => Signal::Destroyed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchEvent {
    pub session: SessionId,
    pub kind: SearchEventKind,
}

impl SearchEvent {
    pub fn new(session: SessionId, kind: SearchEventKind) -> Self {
        Self { session, kind }
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    next: u64,
    handlers: HashMap<HandlerId, (SessionId, Signal)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, session: SessionId, signal: Signal) -> HandlerId {
        let id = HandlerId(self.next);
        self.next += 1;
        self.handlers.insert(id, (session, signal));
        id
    }

    pub fn disconnect(&mut self, handler: HandlerId) -> bool {
        self.handlers.remove(&handler).is_some()
    }

    /// Whether `event` has a live handler to go to.
    pub fn accepts(&self, event: &SearchEvent) -> bool {
        let signal = event.kind.signal();
        self.handlers
            .values()
            .any(|&(session, s)| session == event.session && s == signal)
    }

    pub fn handlers_for(&self, session: SessionId) -> usize {
        self.handlers.values().filter(|(s, _)| *s == session).count()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
