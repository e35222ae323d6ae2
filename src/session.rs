//! Type-ahead search overlay opened from the main menu.

use crate::dispatch::{Dispatcher, HandlerId, SearchEventKind, SessionId, Signal};
use crate::host::{PanelEdge, SearchSurface};
use crate::index::ApplicationIndex;
use crate::keys::Key;
use crate::model::AppEntry;
use crate::view::SortedFilteredView;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// What Up at the first row and Down at the last row do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Stay on the end row.
    #[default]
    Clamp,
    /// Move to the opposite end.
    Jump,
}

/// Computes the result list height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSizer {
    fixed: bool,
    max_height: u32,
    row_height: Option<u32>,
}

impl WindowSizer {
    pub fn new(fixed: bool, max_height: u32) -> Self {
        Self { fixed, max_height, row_height: None }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn row_height(&self) -> Option<u32> {
        self.row_height
    }

    /// Keeps the first measurement only. Returns true if it was stored.
    pub fn record_row_height(&mut self, height: u32) -> bool {
        if self.row_height.is_some() || height == 0 {
            return false;
        }
        self.row_height = Some(height);
        true
    }

    pub fn list_height(&self, rows: usize) -> u32 {
        if self.fixed {
            return self.max_height;
        }
        match self.row_height {
            Some(h) => {
                let wanted = u64::from(h) * rows as u64;
                wanted.min(u64::from(self.max_height)) as u32
            }
            // Nothing measured yet, start at the configured height.
            None => self.max_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub fixed_height: bool,
    pub height: u32,
    pub edge_policy: EdgePolicy,
}

/// Result of feeding one event to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Close,
    /// Launch this token, then close.
    Launch(String),
    /// The window is already gone; close without destroying it again.
    WindowGone,
}

pub struct SearchSession {
    id: SessionId,
    view: SortedFilteredView,
    selected: Option<usize>,
    sizer: WindowSizer,
    policy: EdgePolicy,
    surface: Box<dyn SearchSurface>,
    handlers: Vec<HandlerId>,
}

impl SearchSession {
    /// Builds the overlay seeded with `seed` and shows it.
    pub fn open(
        id: SessionId,
        seed: char,
        index: &ApplicationIndex,
        settings: SessionSettings,
        edge: PanelEdge,
        surface: Box<dyn SearchSurface>,
        dispatcher: &mut Dispatcher,
    ) -> Self {
        let handlers = Signal::ALL.iter().map(|&s| dispatcher.connect(id, s)).collect();
        let view = SortedFilteredView::new(index, &seed.to_string());
        let selected = (view.row_count() > 0).then_some(0);

        let mut session = Self {
            id,
            view,
            selected,
            sizer: WindowSizer::new(settings.fixed_height, settings.height),
            policy: settings.edge_policy,
            surface,
            handlers,
        };

        session.surface.anchor(edge);
        session.refresh(index);
        session.surface.grab_input();
        session.surface.show();
        session.surface.set_query(session.view.query());

        info!("SearchSession {}: opened with '{}', {} rows", id.0, seed, session.view.row_count());
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn query(&self) -> &str {
        self.view.query()
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected
    }

    pub fn visible_row_count(&self) -> usize {
        self.view.row_count()
    }

    pub fn fixed_height_mode(&self) -> bool {
        self.sizer.is_fixed()
    }

    pub fn is_window_visible(&self) -> bool {
        self.surface.is_visible()
    }

    /// Current result rows, in display order.
    pub fn rows<'a>(&'a self, index: &'a ApplicationIndex) -> impl Iterator<Item = &'a AppEntry> + 'a {
        self.view.rows(index)
    }

    pub fn selected_entry<'a>(&self, index: &'a ApplicationIndex) -> Option<&'a AppEntry> {
        self.view.row_at(index, self.selected?)
    }

    pub fn handle(&mut self, kind: SearchEventKind, index: &ApplicationIndex) -> Transition {
        debug_assert!(self.view.is_current(index), "search session outlived its index");
        if !self.view.is_current(index) {
            return Transition::Close;
        }

        match kind {
            SearchEventKind::QueryChanged(query) => {
                if query != self.view.query() {
                    self.set_query(index, &query);
                }
                Transition::Stay
            }
            SearchEventKind::Key(press) => match press.key {
                Key::Escape => Transition::Close,
                Key::Enter => {
                    // No selection means the first row.
                    let row = self.selected.unwrap_or(0);
                    match self.view.row_at(index, row) {
                        Some(entry) => Transition::Launch(entry.launch_path.clone()),
                        None => Transition::Stay,
                    }
                }
                Key::Up => {
                    self.move_selection(index, -1);
                    Transition::Stay
                }
                Key::Down => {
                    self.move_selection(index, 1);
                    Transition::Stay
                }
                Key::BackSpace => {
                    let mut query = self.view.query().to_string();
                    if query.pop().is_some() {
                        self.set_query(index, &query);
                    }
                    Transition::Stay
                }
                Key::Char(c) if press.modifiers.is_plain() => {
                    let query = format!("{}{c}", self.view.query());
                    self.set_query(index, &query);
                    Transition::Stay
                }
                _ => Transition::Stay,
            },
            SearchEventKind::RowActivated(row) => match self.view.row_at(index, row) {
                Some(entry) => Transition::Launch(entry.launch_path.clone()),
                None => Transition::Close,
            },
            SearchEventKind::ButtonPress { x, y } => {
                let (w, h) = self.surface.size();
                if x < 0.0 || y < 0.0 || x > f64::from(w) || y > f64::from(h) {
                    debug!("SearchSession {}: click outside window", self.id.0);
                    Transition::Close
                } else {
                    Transition::Stay
                }
            }
            SearchEventKind::RowMeasured(height) => {
                if self.sizer.record_row_height(height) {
                    self.resize();
                }
                Transition::Stay
            }
            SearchEventKind::Destroyed => Transition::WindowGone,
        }
    }

    fn set_query(&mut self, index: &ApplicationIndex, query: &str) {
        self.view.set_query(index, query);
        self.selected = (self.view.row_count() > 0).then_some(0);
        self.surface.set_query(query);
        self.refresh(index);
    }

    fn move_selection(&mut self, index: &ApplicationIndex, delta: i32) {
        let count = self.view.row_count();
        if count == 0 {
            self.selected = None;
            return;
        }
        let last = count - 1;

        self.selected = Some(match self.selected {
            None => 0,
            Some(current) if delta < 0 => match (current, self.policy) {
                (0, EdgePolicy::Jump) => last,
                (0, EdgePolicy::Clamp) => 0,
                _ => current.min(last).saturating_sub(1),
            },
            Some(current) => match (current >= last, self.policy) {
                (true, EdgePolicy::Jump) => 0,
                (true, EdgePolicy::Clamp) => last,
                _ => current + 1,
            },
        });
        self.refresh(index);
    }

    fn resize(&mut self) {
        let height = self.sizer.list_height(self.view.row_count());
        self.surface.set_list_height(height);
    }

    fn refresh(&mut self, index: &ApplicationIndex) {
        let rows: Vec<&AppEntry> = self.view.rows(index).collect();
        self.surface.show_rows(&rows, self.selected);
        self.resize();
    }

    /// Disconnects every handler, then releases input and the window.
    pub fn close(mut self, dispatcher: &mut Dispatcher, window_gone: bool) {
        for handler in self.handlers.drain(..) {
            dispatcher.disconnect(handler);
        }
        self.surface.release_input();
        if !window_gone {
            self.surface.destroy();
        }
        info!("SearchSession {}: closed", self.id.0);
    }
}
