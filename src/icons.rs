use crate::model::IconHandle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const FALLBACK_ICON: &str = "application-x-executable";

const EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Looks icon names up in the icon theme directories.
///
/// Results are cached per (name, size) until the theme changes.
pub struct IconResolver {
    theme: String,
    roots: Vec<PathBuf>,
    cache: HashMap<(String, u32), Option<PathBuf>>,
}

impl IconResolver {
    pub fn new(theme: &str) -> Self {
        let xdg_dirs = xdg::BaseDirectories::new();
        let mut roots: Vec<PathBuf> = xdg_dirs.get_data_home().map(|d| d.join("icons")).into_iter().collect();
        if let Some(home) = directories::BaseDirs::new() {
            roots.push(home.home_dir().join(".icons"));
        }
        roots.extend(xdg_dirs.get_data_dirs().into_iter().map(|d| d.join("icons")));
        roots.push(PathBuf::from("/usr/share/pixmaps"));
        Self::with_roots(theme, roots)
    }

    pub fn with_roots(theme: &str, roots: Vec<PathBuf>) -> Self {
        Self {
            theme: theme.to_string(),
            roots,
            cache: HashMap::new(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Switches theme and forgets every cached lookup.
    pub fn set_theme(&mut self, theme: &str) {
        self.theme = theme.to_string();
        self.cache.clear();
    }

    /// Resolves `name`, leaving the path empty when nothing is found.
    pub fn lookup(&mut self, name: &str, size: u32) -> IconHandle {
        let key = (name.to_string(), size);
        let path = match self.cache.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let found = self.find(name, size);
                self.cache.insert(key, found.clone());
                found
            }
        };
        IconHandle {
            name: name.to_string(),
            path,
            size,
        }
    }

    /// Like [`lookup`](Self::lookup) but falls back to the generic
    /// executable icon when `name` is missing or cannot be found.
    pub fn lookup_or_fallback(&mut self, name: Option<&str>, size: u32) -> IconHandle {
        if let Some(name) = name {
            let handle = self.lookup(name, size);
            if handle.path.is_some() {
                return handle;
            }
        }
        self.lookup(FALLBACK_ICON, size)
    }

    fn find(&self, icon_name: &str, size: u32) -> Option<PathBuf> {
        let path = Path::new(icon_name);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        let sized = format!("{size}x{size}");
        let mut themes = vec![self.theme.as_str()];
        if self.theme != "hicolor" {
            themes.push("hicolor");
        }

        for root in &self.roots {
            if !root.exists() { continue; }

            let mut subdirs: Vec<PathBuf> = Vec::new();
            for theme in &themes {
                for context in ["apps", "categories", "places", "actions"] {
                    subdirs.push(Path::new(theme).join(&sized).join(context));
                    subdirs.push(Path::new(theme).join("scalable").join(context));
                }
            }
            subdirs.push(PathBuf::new());

            for sub in subdirs {
                let dir = root.join(sub);
                if !dir.exists() { continue; }

                for ext in EXTENSIONS {
                    let file_path = dir.join(format!("{icon_name}.{ext}"));
                    if file_path.exists() {
                        return Some(file_path);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_sized_theme_icon() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Adwaita/24x24/apps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("firefox.png"), b"").unwrap();

        let mut icons = IconResolver::with_roots("Adwaita", vec![root.path().to_path_buf()]);
        let handle = icons.lookup("firefox", 24);
        assert_eq!(handle.path, Some(dir.join("firefox.png")));
    }

    #[test]
    fn falls_back_to_hicolor_then_generic() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("hicolor/scalable/apps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("application-x-executable.svg"), b"").unwrap();

        let mut icons = IconResolver::with_roots("Adwaita", vec![root.path().to_path_buf()]);
        let handle = icons.lookup_or_fallback(Some("missing-app"), 32);
        assert_eq!(handle.name, FALLBACK_ICON);
        assert!(handle.path.is_some());
    }

    #[test]
    fn theme_change_drops_cache() {
        let root = tempfile::tempdir().unwrap();
        let mut icons = IconResolver::with_roots("Adwaita", vec![root.path().to_path_buf()]);
        assert!(icons.lookup("term", 16).path.is_none());

        let dir = root.path().join("Papirus/16x16/apps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("term.png"), b"").unwrap();

        icons.set_theme("Papirus");
        assert!(icons.lookup("term", 16).path.is_some());
    }
}
