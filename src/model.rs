use std::path::PathBuf;

/// Resolved icon for an entry. The toolkit turns this into pixels; the core
/// only carries it around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle {
    pub name: String,
    pub path: Option<PathBuf>,
    pub size: u32,
}

impl IconHandle {
    pub fn unresolved(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            size,
        }
    }
}

/// One launchable application in the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub display_name: String,  // Label shown in menus and search results
    pub icon: IconHandle,
    pub launch_path: String,   // Token understood by the launcher (desktop file path)
}

impl AppEntry {
    pub fn new(display_name: String, icon: IconHandle, launch_path: String) -> Self {
        Self {
            display_name,
            icon,
            launch_path,
        }
    }
}
