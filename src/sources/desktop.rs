use crate::error::MenuError;
use crate::sources::{MenuApp, MenuDir, MenuNode, MenuSource, ReloadNotify, VisibilityFlags};
use log::{debug, info, warn};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Fields of a `[Desktop Entry]` group the menu needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub exec: Option<String>,
    pub comment: Option<String>,
    pub icon: Option<String>,
    pub entry_type: Option<String>,
    pub categories: Vec<String>,
    pub only_show_in: Vec<String>,
    pub not_show_in: Vec<String>,
    pub terminal: bool,
    pub no_display: bool,
    pub hidden: bool,
}

impl DesktopEntry {
    pub fn parse(content: &str) -> Self {
        let mut entry = Self::default();
        let mut in_group = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }

            if line.starts_with('[') {
                in_group = line == "[Desktop Entry]";
                continue;
            }
            if !in_group { continue; }

            let Some((key, value)) = line.split_once('=') else { continue; };
            let value = value.trim();
            match key.trim() {
                "Name" => entry.name = Some(value.to_string()),
                "Exec" => entry.exec = Some(value.to_string()),
                "Comment" => entry.comment = Some(value.to_string()),
                "Icon" => entry.icon = Some(value.to_string()),
                "Type" => entry.entry_type = Some(value.to_string()),
                "Categories" => entry.categories = split_list(value),
                "OnlyShowIn" => entry.only_show_in = split_list(value),
                "NotShowIn" => entry.not_show_in = split_list(value),
                "Terminal" => entry.terminal = value == "true",
                "NoDisplay" => entry.no_display = value == "true",
                "Hidden" => entry.hidden = value == "true",
                _ => {}
            }
        }
        entry
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn is_application(&self) -> bool {
        self.entry_type.as_deref().is_none_or(|t| t == "Application")
    }

    /// `Exec` with field codes removed, ready to split into argv.
    pub fn command_line(&self) -> Option<String> {
        static FIELD_CODE: OnceLock<Regex> = OnceLock::new();
        let re = FIELD_CODE.get_or_init(|| Regex::new("%[%a-zA-Z]").expect("valid field code pattern"));

        let exec = self.exec.as_deref()?;
        let stripped = re.replace_all(exec, |caps: &regex::Captures| {
            if &caps[0] == "%%" { "%".to_string() } else { String::new() }
        });
        let cmd = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        if cmd.is_empty() { None } else { Some(cmd) }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

struct Category {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    matches: &'static [&'static str],
}

// Settings first so configuration tools land in Preferences even when they
// also carry System.
const CATEGORIES: &[Category] = &[
    Category { id: "Preferences", name: "Preferences", icon: "preferences-desktop", matches: &["Settings", "DesktopSettings"] },
    Category { id: "Accessories", name: "Accessories", icon: "applications-accessories", matches: &["Utility"] },
    Category { id: "Education", name: "Education", icon: "applications-education", matches: &["Education"] },
    Category { id: "Games", name: "Games", icon: "applications-games", matches: &["Game"] },
    Category { id: "Graphics", name: "Graphics", icon: "applications-graphics", matches: &["Graphics"] },
    Category { id: "Internet", name: "Internet", icon: "applications-internet", matches: &["Network"] },
    Category { id: "Office", name: "Office", icon: "applications-office", matches: &["Office"] },
    Category { id: "Programming", name: "Programming", icon: "applications-development", matches: &["Development"] },
    Category { id: "Science", name: "Science", icon: "applications-science", matches: &["Science"] },
    Category { id: "SoundVideo", name: "Sound & Video", icon: "applications-multimedia", matches: &["AudioVideo", "Audio", "Video"] },
    Category { id: "SystemTools", name: "System Tools", icon: "applications-system", matches: &["System"] },
];

static OTHER: Category = Category { id: "Other", name: "Other", icon: "applications-other", matches: &[] };

fn category_for(entry: &DesktopEntry) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|c| entry.categories.iter().any(|cat| c.matches.contains(&cat.as_str())))
        .unwrap_or(&OTHER)
}

/// Menu source built from the XDG `applications` directories.
pub struct DesktopMenuSource {
    dirs: Vec<PathBuf>,
    next_notify: u64,
    watchers: HashMap<u64, RecommendedWatcher>,
}

impl DesktopMenuSource {
    pub fn new() -> Self {
        Self::with_dirs(default_application_dirs())
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            next_notify: 0,
            watchers: HashMap::new(),
        }
    }

    fn scan(&self) -> Vec<(MenuApp, &'static Category)> {
        let mut seen = HashSet::new();
        let mut apps = Vec::new();

        for dir in &self.dirs {
            if !dir.exists() { continue; }
            debug!("Scanning desktop files in {:?}", dir);

            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name().into_iter().flatten() {
                let path = entry.path();
                if !entry.file_type().is_file() { continue; }
                if path.extension().and_then(|s| s.to_str()) != Some("desktop") { continue; }

                let Some(id) = desktop_file_id(dir, path) else { continue; };
                // Earlier directories shadow later ones, hidden entries included.
                if !seen.insert(id.clone()) { continue; }

                let Ok(content) = fs::read_to_string(path) else { continue; };
                let parsed = DesktopEntry::parse(&content);
                if let Some(app) = app_from_entry(&id, path, &parsed) {
                    apps.push((app, category_for(&parsed)));
                }
            }
        }

        info!("DesktopMenuSource: found {} applications", apps.len());
        apps
    }
}

impl Default for DesktopMenuSource {
    fn default() -> Self {
        Self::new()
    }
}

/// `applications` under the data home, then under each data dir, most
/// preferred first.
fn default_application_dirs() -> Vec<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::new();
    xdg_dirs
        .get_data_home()
        .into_iter()
        .chain(xdg_dirs.get_data_dirs())
        .map(|dir| dir.join("applications"))
        .collect()
}

/// Watches every existing application directory and pings `tx` when a
/// desktop file is created, changed or removed.
fn watch_dirs(dirs: &[PathBuf], tx: calloop::channel::Sender<()>) -> notify::Result<RecommendedWatcher> {
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(ev) => {
                if matches!(
                    ev.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    debug!("DesktopMenuSource: change detected, notifying");
                    let _ = tx.send(());
                }
            }
            Err(e) => warn!("DesktopMenuSource: watch error: {:?}", e),
        },
        notify::Config::default(),
    )?;
    for dir in dirs.iter().filter(|d| d.is_dir()) {
        watcher.watch(dir, RecursiveMode::Recursive)?;
    }
    Ok(watcher)
}

fn desktop_file_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel.iter().filter_map(|p| p.to_str()).collect();
    if parts.is_empty() { None } else { Some(parts.join("-")) }
}

fn app_from_entry(id: &str, path: &Path, entry: &DesktopEntry) -> Option<MenuApp> {
    if entry.hidden || !entry.is_application() { return None; }
    let name = entry.name.clone()?;
    entry.exec.as_ref()?;

    let mut app = MenuApp::new(id, &name, &path.to_string_lossy());
    app.comment = entry.comment.clone();
    app.icon = entry.icon.clone();
    app.no_display = entry.no_display;
    app.only_show_in = VisibilityFlags::from_names(&entry.only_show_in);
    app.not_show_in = VisibilityFlags::from_names(&entry.not_show_in);
    Some(app)
}

impl MenuSource for DesktopMenuSource {
    fn root(&self) -> Result<MenuDir, MenuError> {
        if !self.dirs.iter().any(|d| d.is_dir()) {
            return Err(MenuError::Unavailable(format!(
                "no application directory among {:?}",
                self.dirs
            )));
        }

        let mut groups: Vec<(&'static Category, Vec<MenuApp>)> = Vec::new();
        for (app, category) in self.scan() {
            match groups.iter_mut().find(|(c, _)| c.id == category.id) {
                Some((_, apps)) => apps.push(app),
                None => groups.push((category, vec![app])),
            }
        }

        let mut dirs: Vec<MenuDir> = groups
            .into_iter()
            .map(|(category, mut apps)| {
                apps.sort_by_cached_key(|a| a.name.to_lowercase());
                let mut dir = MenuDir::new(category.id, category.name);
                dir.icon = Some(category.icon.to_string());
                dir.with_children(apps.into_iter().map(MenuNode::Application).collect())
            })
            .collect();
        dirs.sort_by_cached_key(|d| d.name.to_lowercase());

        Ok(MenuDir::new("Applications", "Applications")
            .with_children(dirs.into_iter().map(MenuNode::Directory).collect()))
    }

    fn add_reload_notify(&mut self, tx: calloop::channel::Sender<()>) -> ReloadNotify {
        let id = self.next_notify;
        self.next_notify += 1;

        match watch_dirs(&self.dirs, tx) {
            Ok(watcher) => {
                self.watchers.insert(id, watcher);
            }
            Err(e) => warn!("DesktopMenuSource: cannot watch application directories: {}", e),
        }
        ReloadNotify(id)
    }

    fn remove_reload_notify(&mut self, notify: ReloadNotify) {
        if self.watchers.remove(&notify.0).is_none() {
            debug!("DesktopMenuSource: no watcher for subscription {}", notify.0);
        }
    }
}
