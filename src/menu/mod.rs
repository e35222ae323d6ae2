//! Popup menu tree shown by the panel button.

pub mod builder;

use crate::config::ItemAction;
use crate::model::{AppEntry, IconHandle};

/// Who created an item. Reloads only ever touch system-generated runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    UserAuthored,
    SystemGenerated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Separator,
    /// Inert item standing in for an unavailable or empty system menu.
    Placeholder,
    Application {
        entry: AppEntry,
        tooltip: Option<String>,
    },
    Directory {
        label: String,
        icon: IconHandle,
        /// `menu://` location of the directory.
        token: String,
    },
    Static {
        label: String,
        icon: Option<IconHandle>,
        action: ItemAction,
    },
    /// Entry of a right-click context menu.
    Context {
        label: String,
        action: ContextAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    AddToDesktop(String),
    Properties(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub kind: ItemKind,
    pub owner: Owner,
    pub submenu: Option<Menu>,
    /// Submenu parked while a context menu occupies `submenu`.
    pub saved_submenu: Option<Menu>,
    pub context_open: bool,
}

impl MenuItem {
    pub fn new(kind: ItemKind, owner: Owner) -> Self {
        Self {
            kind,
            owner,
            submenu: None,
            saved_submenu: None,
            context_open: false,
        }
    }

    pub fn separator(owner: Owner) -> Self {
        Self::new(ItemKind::Separator, owner)
    }

    pub fn is_system(&self) -> bool {
        self.owner == Owner::SystemGenerated
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            ItemKind::Separator | ItemKind::Placeholder => "",
            ItemKind::Application { entry, .. } => &entry.display_name,
            ItemKind::Directory { label, .. }
            | ItemKind::Static { label, .. }
            | ItemKind::Context { label, .. } => label,
        }
    }

    pub fn launch_path(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Application { entry, .. } => Some(&entry.launch_path),
            _ => None,
        }
    }

    /// What the context menu acts on: the desktop file of an application,
    /// the menu location of a directory.
    pub fn context_token(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Application { entry, .. } => Some(&entry.launch_path),
            ItemKind::Directory { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Swaps the item's submenu slot for a context menu, parking any existing
    /// submenu. Returns false when a context menu is already open or the item
    /// has nothing to act on.
    pub fn open_context_menu(&mut self) -> bool {
        if self.context_open {
            return false;
        }
        let Some(path) = self.context_token().map(str::to_string) else {
            return false;
        };

        let mut menu = Menu::new();
        menu.push(MenuItem::new(
            ItemKind::Context {
                label: "Add to desktop".to_string(),
                action: ContextAction::AddToDesktop(path.clone()),
            },
            Owner::UserAuthored,
        ));
        menu.push(MenuItem::separator(Owner::UserAuthored));
        menu.push(MenuItem::new(
            ItemKind::Context {
                label: "Properties".to_string(),
                action: ContextAction::Properties(path),
            },
            Owner::UserAuthored,
        ));

        self.saved_submenu = self.submenu.replace(menu);
        self.context_open = true;
        true
    }

    /// Puts the parked submenu back after the item is deselected.
    pub fn restore_submenu(&mut self) {
        if self.context_open {
            self.submenu = self.saved_submenu.take();
            self.context_open = false;
        }
    }
}

/// Ordered list of menu items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Inserts at `pos`, or appends when `pos` is `None` or past the end.
    pub fn insert(&mut self, pos: Option<usize>, item: MenuItem) {
        debug_assert!(pos.is_none_or(|p| p <= self.items.len()), "insert past the end of the menu");
        match pos {
            Some(p) if p <= self.items.len() => self.items.insert(p, item),
            _ => self.items.push(item),
        }
    }

    /// Follows `path` (indices at each level) down the tree.
    pub fn item_at_mut(&mut self, path: &[usize]) -> Option<&mut MenuItem> {
        let (first, rest) = path.split_first()?;
        let item = self.items.get_mut(*first)?;
        if rest.is_empty() {
            Some(item)
        } else {
            item.submenu.as_mut()?.item_at_mut(rest)
        }
    }

    /// Total number of items at every depth.
    pub fn node_count(&self) -> usize {
        self.items
            .iter()
            .map(|i| 1 + i.submenu.as_ref().map_or(0, Menu::node_count))
            .sum()
    }

    /// Indented text dump, one line per item, tagged by owner.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        for item in &self.items {
            let tag = if item.is_system() { "sys" } else { "usr" };
            let text = match &item.kind {
                ItemKind::Separator => "---".to_string(),
                ItemKind::Placeholder => "(empty)".to_string(),
                ItemKind::Directory { label, .. } => format!("{label}/"),
                _ => item.label().to_string(),
            };
            out.push_str(&format!("{}[{tag}] {text}\n", "  ".repeat(depth)));
            if let Some(sub) = &item.submenu {
                sub.write_outline(depth + 1, out);
            }
        }
    }
}
