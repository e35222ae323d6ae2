//! Host-facing side of the menu: lifecycle, button and key entry points.

use crate::config::{Config, ItemAction, MenuBlock, StaticItem, save_config};
use crate::dispatch::{Dispatcher, SearchEvent, SessionId};
use crate::error::ConfigError;
use crate::executor::Launcher;
use crate::host::PanelHost;
use crate::icons::IconResolver;
use crate::index::ApplicationIndex;
use crate::keys::KeyPress;
use crate::menu::builder::{MenuBuilder, reload_menu};
use crate::menu::{ContextAction, ItemKind, Menu, MenuItem, Owner};
use crate::session::{SearchSession, SessionSettings, Transition};
use crate::sources::{MenuDir, MenuSource, ReloadNotify, VisibilityFlags};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Delay between an external show request and the popup.
pub const SHOW_MENU_DELAY: Duration = Duration::from_millis(200);

/// Values editable from the configuration dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDialog {
    pub image: String,
    pub padding: u32,
}

/// Collaborators handed to the plugin by the host.
pub struct PluginContext {
    pub host: Box<dyn PanelHost>,
    pub source: Box<dyn MenuSource>,
    pub launcher: Box<dyn Launcher>,
    pub icons: IconResolver,
    /// Where settings are persisted, if anywhere.
    pub config_path: Option<PathBuf>,
}

pub struct MenuPlugin {
    host: Box<dyn PanelHost>,
    source: Box<dyn MenuSource>,
    launcher: Box<dyn Launcher>,
    icons: IconResolver,
    config: Config,
    config_path: Option<PathBuf>,
    handle: LoopHandle<'static, MenuPlugin>,

    menu: Option<Menu>,
    index: ApplicationIndex,
    has_system_menu: bool,
    reload_notify: Option<(ReloadNotify, RegistrationToken)>,
    show_timer: Option<RegistrationToken>,

    dispatcher: Dispatcher,
    session: Option<SearchSession>,
    next_session: u64,
}

impl MenuPlugin {
    /// Builds the plugin and its menu. A configuration error aborts
    /// construction; the host carries on without the plugin.
    pub fn construct(
        handle: LoopHandle<'static, MenuPlugin>,
        config: Config,
        ctx: PluginContext,
    ) -> Result<Self, ConfigError> {
        let mut plugin = Self {
            host: ctx.host,
            source: ctx.source,
            launcher: ctx.launcher,
            icons: ctx.icons,
            config,
            config_path: ctx.config_path,
            handle,
            menu: None,
            index: ApplicationIndex::new(),
            has_system_menu: false,
            reload_notify: None,
            show_timer: None,
            dispatcher: Dispatcher::new(),
            session: None,
            next_session: 0,
        };

        if let Some(path) = plugin.config_path.clone() {
            if !path.exists() {
                if let Err(e) = save_config(&path, &plugin.config) {
                    warn!("menu: could not write default config to {:?}: {}", path, e);
                }
            }
        }

        if let Err(e) = plugin.create_menu() {
            warn!("menu: plugin init failed: {}", e);
            plugin.unsubscribe_reload();
            return Err(e);
        }
        plugin.update_button();
        info!("menu: constructed with {} applications", plugin.index.len());
        Ok(plugin)
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn index(&self) -> &ApplicationIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn has_system_menu(&self) -> bool {
        self.has_system_menu
    }

    pub fn show_pending(&self) -> bool {
        self.show_timer.is_some()
    }

    fn visibility_flags(&self) -> VisibilityFlags {
        VisibilityFlags::from_names(&self.config.show_in)
    }

    fn load_root(&self) -> Option<MenuDir> {
        match self.source.root() {
            Ok(root) => Some(root),
            Err(e) => {
                warn!("menu: {}", e);
                None
            }
        }
    }

    fn create_menu(&mut self) -> Result<(), ConfigError> {
        let blocks = self.config.blocks()?;
        let mut menu = Menu::new();

        for block in blocks {
            match block {
                MenuBlock::Item(item) => {
                    let mi = self.static_item(item);
                    menu.push(mi);
                }
                MenuBlock::Separator => menu.push(MenuItem::separator(Owner::UserAuthored)),
                MenuBlock::System => self.read_system_menu(&mut menu),
            }
        }

        self.menu = Some(menu);
        Ok(())
    }

    fn static_item(&mut self, item: StaticItem) -> MenuItem {
        let size = self.host.icon_size();
        let icon = item
            .image
            .as_deref()
            .map(|name| self.icons.lookup(name, size))
            .filter(|handle| handle.path.is_some());
        MenuItem::new(
            ItemKind::Static { label: item.label, icon, action: item.action },
            Owner::UserAuthored,
        )
    }

    /// Inserts the system tree the first time a `system` block is seen.
    fn read_system_menu(&mut self, menu: &mut Menu) {
        if self.reload_notify.is_none() {
            self.subscribe_reload();
            let root = self.load_root();
            let flags = self.visibility_flags();
            let size = self.host.icon_size();
            MenuBuilder::new(&mut self.index, &mut self.icons, flags, size)
                .insert_system_items(root.as_ref(), menu, None);
        }
        self.has_system_menu = true;
    }

    fn subscribe_reload(&mut self) {
        let (tx, rx) = calloop::channel::channel::<()>();
        let token = self.handle.insert_source(rx, |event, _, plugin: &mut MenuPlugin| {
            if let calloop::channel::Event::Msg(()) = event {
                plugin.handle_reload();
            }
        });
        match token {
            Ok(token) => {
                let notify = self.source.add_reload_notify(tx);
                self.reload_notify = Some((notify, token));
            }
            Err(e) => warn!("menu: cannot watch for menu reloads: {}", e.error),
        }
    }

    fn unsubscribe_reload(&mut self) {
        if let Some((notify, token)) = self.reload_notify.take() {
            self.source.remove_reload_notify(notify);
            self.handle.remove(token);
        }
    }

    /// Rebuilds every system-owned run after the menu source changed.
    pub fn handle_reload(&mut self) {
        // Views must not survive the index they point into.
        self.close_session(false);

        let root = self.load_root();
        let flags = self.visibility_flags();
        let size = self.host.icon_size();
        if let Some(menu) = self.menu.as_mut() {
            reload_menu(&mut self.index, &mut self.icons, flags, size, root.as_ref(), menu);
        } else {
            self.index.clear();
        }
    }

    fn update_button(&mut self) {
        let width = self.host.icon_size() + 2 * self.config.padding;
        self.host.set_button_icon(&self.config.image, width);
    }

    fn teardown_menu(&mut self) {
        // A pending show request belongs to the menu being torn down.
        if let Some(token) = self.show_timer.take() {
            self.handle.remove(token);
        }
        self.close_session(false);
        self.index.clear();
        self.menu = None;
        self.unsubscribe_reload();
        self.has_system_menu = false;
    }

    /// Applies changed panel or plugin settings and rebuilds the menu.
    pub fn reconfigure(&mut self, config: Config) -> Result<(), ConfigError> {
        self.config = config;
        self.update_button();
        self.teardown_menu();
        self.create_menu()
    }

    pub fn on_icon_theme_changed(&mut self, theme: &str) -> Result<(), ConfigError> {
        info!("menu: icon theme changed to {}", theme);
        self.icons.set_theme(theme);
        self.config.icon_theme = theme.to_string();
        self.teardown_menu();
        self.create_menu()
    }

    pub fn open_config_dialog(&self) -> ConfigDialog {
        ConfigDialog {
            image: self.config.image.clone(),
            padding: self.config.padding,
        }
    }

    pub fn apply_config(&mut self, dialog: &ConfigDialog) -> Result<(), ConfigError> {
        self.config.image = dialog.image.clone();
        self.config.padding = dialog.padding;
        self.update_button();
        if let Some(path) = &self.config_path {
            save_config(path, &self.config)?;
        }
        Ok(())
    }

    pub fn on_button_press(&mut self, button: u32) -> bool {
        if button != 1 {
            return false;
        }
        self.popup_main_menu();
        true
    }

    fn popup_main_menu(&mut self) {
        if let Some(menu) = &self.menu {
            self.host.popup_menu(menu);
        }
    }

    /// Pops the menu up shortly after an external request. Requests arriving
    /// while one is pending are ignored.
    pub fn on_external_show_request(&mut self) {
        if !self.has_system_menu || self.show_timer.is_some() {
            return;
        }
        let timer = Timer::from_duration(SHOW_MENU_DELAY);
        let token = self.handle.insert_source(timer, |_, _, plugin: &mut MenuPlugin| {
            plugin.show_timer = None;
            plugin.popup_main_menu();
            TimeoutAction::Drop
        });
        match token {
            Ok(token) => self.show_timer = Some(token),
            Err(e) => warn!("menu: cannot schedule show request: {}", e.error),
        }
    }

    /// Key pressed while the main menu is open.
    pub fn on_menu_key(&mut self, press: &KeyPress) -> bool {
        if press.is_bare_super() {
            self.host.hide_menu();
            return true;
        }
        match press.search_seed() {
            Some(seed) => {
                self.start_search(seed);
                true
            }
            None => false,
        }
    }

    /// Opens a search session unless one is already open.
    pub fn start_search(&mut self, seed: char) -> Option<SessionId> {
        if self.session.is_some() {
            debug!("menu: search already open, ignoring '{}'", seed);
            return None;
        }

        self.host.hide_menu();
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let settings = SessionSettings {
            fixed_height: self.config.fixed,
            height: self.config.search_height,
            edge_policy: self.config.edge_policy,
        };
        let edge = self.host.edge();
        let surface = self.host.create_search_surface();
        let session = SearchSession::open(id, seed, &self.index, settings, edge, surface, &mut self.dispatcher);
        self.session = Some(session);
        Some(id)
    }

    /// Routes a toolkit event to the open session. Returns whether any
    /// handler received it.
    pub fn deliver(&mut self, event: SearchEvent) -> bool {
        if !self.dispatcher.accepts(&event) {
            debug!("menu: dropping {:?} for session {}", event.kind.signal(), event.session.0);
            return false;
        }
        let Some(session) = self.session.as_mut().filter(|s| s.id() == event.session) else {
            return false;
        };

        match session.handle(event.kind, &self.index) {
            Transition::Stay => {}
            Transition::Close => self.close_session(false),
            Transition::WindowGone => self.close_session(true),
            Transition::Launch(path) => {
                self.launcher.launch(&path);
                self.close_session(false);
            }
        }
        true
    }

    /// The host hid the main menu.
    pub fn on_menu_hidden(&mut self) {
        if self.session.as_ref().is_some_and(|s| !s.is_window_visible()) {
            self.close_session(false);
        }
    }

    fn close_session(&mut self, window_gone: bool) {
        if let Some(session) = self.session.take() {
            session.close(&mut self.dispatcher, window_gone);
        }
    }

    /// Activates the item found by following `path` through the menu.
    pub fn activate_item(&mut self, path: &[usize]) -> bool {
        let Some(kind) = self
            .menu
            .as_mut()
            .and_then(|m| m.item_at_mut(path))
            .map(|item| item.kind.clone())
        else {
            return false;
        };

        match kind {
            ItemKind::Application { entry, .. } => self.launcher.launch(&entry.launch_path),
            ItemKind::Static { action: ItemAction::Builtin(cmd), .. } => self.host.run_builtin(cmd),
            ItemKind::Static { action: ItemAction::Spawn(cmd), .. } => self.launcher.spawn(&cmd),
            ItemKind::Context { action: ContextAction::AddToDesktop(file), .. } => {
                if let Err(e) = add_to_desktop(Path::new(&file)) {
                    warn!("menu: add to desktop failed: {:#}", e);
                }
            }
            ItemKind::Context { action: ContextAction::Properties(file), .. } => {
                self.host.show_properties(&file);
            }
            ItemKind::Separator | ItemKind::Placeholder | ItemKind::Directory { .. } => return false,
        }
        true
    }

    /// Right click on a system item swaps in its context menu.
    pub fn on_item_button_press(&mut self, path: &[usize], button: u32) -> bool {
        if button != 3 {
            return false;
        }
        match self.menu.as_mut().and_then(|m| m.item_at_mut(path)) {
            Some(item) if item.is_system() => item.open_context_menu(),
            _ => false,
        }
    }

    pub fn on_item_deselect(&mut self, path: &[usize]) {
        if let Some(item) = self.menu.as_mut().and_then(|m| m.item_at_mut(path)) {
            item.restore_submenu();
        }
    }

    /// Releases timers, the search session and reload subscriptions.
    pub fn destroy(mut self) {
        self.teardown_menu();
        info!("menu: destroyed");
    }
}

fn add_to_desktop(file: &Path) -> anyhow::Result<()> {
    if !file.is_file() {
        anyhow::bail!("{} is not a file", file.display());
    }
    let dirs = directories::UserDirs::new().ok_or_else(|| anyhow::anyhow!("no home directory"))?;
    let desktop = dirs
        .desktop_dir()
        .ok_or_else(|| anyhow::anyhow!("no desktop directory"))?;
    let name = file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("{} has no file name", file.display()))?;
    std::os::unix::fs::symlink(file, desktop.join(name))?;
    Ok(())
}
