use crate::error::MenuError;
use bitflags::bitflags;

pub mod desktop;

bitflags! {
    /// Desktop environments an application may be restricted to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisibilityFlags: u32 {
        const GNOME = 1 << 0;
        const KDE = 1 << 1;
        const XFCE = 1 << 2;
        const LXDE = 1 << 3;
        const LXQT = 1 << 4;
        const MATE = 1 << 5;
        const CINNAMON = 1 << 6;
        const UNITY = 1 << 7;
        const ROX = 1 << 8;
        const OLD = 1 << 9;
        const OTHER = 1 << 31;
    }
}

impl VisibilityFlags {
    /// Maps a desktop name as written in `OnlyShowIn`/`XDG_CURRENT_DESKTOP`.
    pub fn from_desktop_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "GNOME" => Self::GNOME,
            "KDE" => Self::KDE,
            "XFCE" => Self::XFCE,
            "LXDE" => Self::LXDE,
            "LXQT" => Self::LXQT,
            "MATE" => Self::MATE,
            "CINNAMON" | "X-CINNAMON" => Self::CINNAMON,
            "UNITY" => Self::UNITY,
            "ROX" => Self::ROX,
            "OLD" => Self::OLD,
            _ => Self::OTHER,
        }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .map(|n| Self::from_desktop_name(n.as_ref()))
            .fold(Self::empty(), |acc, f| acc | f)
    }
}

/// Application record from the system menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuApp {
    pub id: String,             // Desktop file id, e.g. "firefox.desktop"
    pub name: String,
    pub comment: Option<String>,
    pub icon: Option<String>,
    pub file_path: String,      // Launch token
    pub no_display: bool,
    pub only_show_in: VisibilityFlags,
    pub not_show_in: VisibilityFlags,
}

impl MenuApp {
    pub fn new(id: &str, name: &str, file_path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            comment: None,
            icon: None,
            file_path: file_path.to_string(),
            no_display: false,
            only_show_in: VisibilityFlags::empty(),
            not_show_in: VisibilityFlags::empty(),
        }
    }

    pub fn is_visible(&self, flags: VisibilityFlags) -> bool {
        if self.no_display {
            return false;
        }
        if !self.only_show_in.is_empty() && !self.only_show_in.intersects(flags) {
            return false;
        }
        !self.not_show_in.intersects(flags)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDir {
    pub id: String,
    pub name: String,
    pub comment: Option<String>,
    pub icon: Option<String>,
    pub visible: bool,
    pub children: Vec<MenuNode>,
}

impl MenuDir {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            comment: None,
            icon: None,
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Separator,
    Application(MenuApp),
    Directory(MenuDir),
}

/// Subscription handle returned by [`MenuSource::add_reload_notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReloadNotify(pub u64);

/// Hierarchical application data provided by the system.
pub trait MenuSource {
    /// Current root directory, or why it cannot be read.
    fn root(&self) -> Result<MenuDir, MenuError>;

    /// Asks the source to send `()` on `tx` whenever its data changes.
    fn add_reload_notify(&mut self, tx: calloop::channel::Sender<()>) -> ReloadNotify;

    fn remove_reload_notify(&mut self, notify: ReloadNotify);
}
