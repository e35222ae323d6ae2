#![allow(dead_code)]

use calloop::EventLoop;
use smenu::config::{BuiltinCommand, Config};
use smenu::error::MenuError;
use smenu::executor::Launcher;
use smenu::host::{PanelEdge, PanelHost, SearchSurface};
use smenu::icons::IconResolver;
use smenu::menu::Menu;
use smenu::model::AppEntry;
use smenu::plugin::{MenuPlugin, PluginContext};
use smenu::sources::{MenuApp, MenuDir, MenuNode, MenuSource, ReloadNotify};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default, Debug)]
pub struct SurfaceLog {
    pub anchor: Option<PanelEdge>,
    pub heights: Vec<u32>,
    pub query: String,
    pub rows: Vec<String>,
    pub selected: Option<usize>,
    pub visible: bool,
    pub grabbed: bool,
    pub grab_count: usize,
    pub release_count: usize,
    pub destroyed: bool,
}

pub struct FakeSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl SearchSurface for FakeSurface {
    fn anchor(&mut self, edge: PanelEdge) {
        self.log.borrow_mut().anchor = Some(edge);
    }

    fn set_list_height(&mut self, height: u32) {
        self.log.borrow_mut().heights.push(height);
    }

    fn set_query(&mut self, query: &str) {
        self.log.borrow_mut().query = query.to_string();
    }

    fn show_rows(&mut self, rows: &[&AppEntry], selected: Option<usize>) {
        let mut log = self.log.borrow_mut();
        log.rows = rows.iter().map(|e| e.display_name.clone()).collect();
        log.selected = selected;
    }

    fn show(&mut self) {
        self.log.borrow_mut().visible = true;
    }

    fn is_visible(&self) -> bool {
        self.log.borrow().visible
    }

    fn size(&self) -> (u32, u32) {
        (300, 200)
    }

    fn grab_input(&mut self) {
        let mut log = self.log.borrow_mut();
        log.grabbed = true;
        log.grab_count += 1;
    }

    fn release_input(&mut self) {
        let mut log = self.log.borrow_mut();
        log.grabbed = false;
        log.release_count += 1;
    }

    fn destroy(&mut self) {
        let mut log = self.log.borrow_mut();
        log.visible = false;
        log.destroyed = true;
    }
}

#[derive(Default, Debug)]
pub struct HostLog {
    pub popups: Vec<String>,
    pub hides: usize,
    pub builtins: Vec<BuiltinCommand>,
    pub properties: Vec<String>,
    pub button: Option<(String, u32)>,
    pub surfaces: Vec<Rc<RefCell<SurfaceLog>>>,
}

pub struct FakeHost {
    pub log: Rc<RefCell<HostLog>>,
    pub edge: PanelEdge,
}

impl PanelHost for FakeHost {
    fn icon_size(&self) -> u32 {
        24
    }

    fn edge(&self) -> PanelEdge {
        self.edge
    }

    fn set_button_icon(&mut self, icon: &str, width: u32) {
        self.log.borrow_mut().button = Some((icon.to_string(), width));
    }

    fn popup_menu(&mut self, menu: &Menu) {
        self.log.borrow_mut().popups.push(menu.outline());
    }

    fn hide_menu(&mut self) {
        self.log.borrow_mut().hides += 1;
    }

    fn run_builtin(&mut self, command: BuiltinCommand) {
        self.log.borrow_mut().builtins.push(command);
    }

    fn show_properties(&mut self, launch_path: &str) {
        self.log.borrow_mut().properties.push(launch_path.to_string());
    }

    fn create_search_surface(&mut self) -> Box<dyn SearchSurface> {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        self.log.borrow_mut().surfaces.push(log.clone());
        Box::new(FakeSurface { log })
    }
}

#[derive(Default, Debug)]
pub struct LaunchLog {
    pub launched: Vec<String>,
    pub spawned: Vec<String>,
}

pub struct FakeLauncher {
    pub log: Rc<RefCell<LaunchLog>>,
}

impl Launcher for FakeLauncher {
    fn launch(&mut self, launch_path: &str) {
        self.log.borrow_mut().launched.push(launch_path.to_string());
    }

    fn spawn(&mut self, command: &str) {
        self.log.borrow_mut().spawned.push(command.to_string());
    }
}

#[derive(Default)]
pub struct SourceState {
    pub root: Option<MenuDir>,
    pub subscribers: Vec<(ReloadNotify, calloop::channel::Sender<()>)>,
    pub next: u64,
}

/// Menu source whose tree the test can swap at will.
pub struct MemorySource {
    pub state: Rc<RefCell<SourceState>>,
}

impl MenuSource for MemorySource {
    fn root(&self) -> Result<MenuDir, MenuError> {
        self.state
            .borrow()
            .root
            .clone()
            .ok_or_else(|| MenuError::Unavailable("no menu".to_string()))
    }

    fn add_reload_notify(&mut self, tx: calloop::channel::Sender<()>) -> ReloadNotify {
        let mut state = self.state.borrow_mut();
        let id = ReloadNotify(state.next);
        state.next += 1;
        state.subscribers.push((id, tx));
        id
    }

    fn remove_reload_notify(&mut self, notify: ReloadNotify) {
        self.state.borrow_mut().subscribers.retain(|(id, _)| *id != notify);
    }
}

pub fn app(name: &str) -> MenuNode {
    MenuNode::Application(MenuApp::new(
        &format!("{}.desktop", name.to_lowercase()),
        name,
        &format!("/usr/share/applications/{}.desktop", name.to_lowercase()),
    ))
}

pub fn dir(name: &str, children: Vec<MenuNode>) -> MenuNode {
    MenuNode::Directory(MenuDir::new(name, name).with_children(children))
}

pub fn root(children: Vec<MenuNode>) -> MenuDir {
    MenuDir::new("Applications", "Applications").with_children(children)
}

pub fn firefox_files_find() -> MenuDir {
    root(vec![
        dir("Internet", vec![app("Firefox")]),
        dir("Accessories", vec![app("Files"), app("Find")]),
    ])
}

pub struct Harness {
    pub event_loop: EventLoop<'static, MenuPlugin>,
    pub plugin: MenuPlugin,
    pub host: Rc<RefCell<HostLog>>,
    pub launches: Rc<RefCell<LaunchLog>>,
    pub source: Rc<RefCell<SourceState>>,
}

impl Harness {
    pub fn new(root: Option<MenuDir>) -> Self {
        Self::with_config(root, Config::default())
    }

    pub fn with_config(root: Option<MenuDir>, config: Config) -> Self {
        Self::try_with_config(root, config, PanelEdge::Top).expect("plugin constructs")
    }

    pub fn try_with_config(
        root: Option<MenuDir>,
        config: Config,
        edge: PanelEdge,
    ) -> Result<Self, smenu::error::ConfigError> {
        let event_loop: EventLoop<'static, MenuPlugin> = EventLoop::try_new().unwrap();
        let host = Rc::new(RefCell::new(HostLog::default()));
        let launches = Rc::new(RefCell::new(LaunchLog::default()));
        let source = Rc::new(RefCell::new(SourceState { root, ..SourceState::default() }));

        let ctx = PluginContext {
            host: Box::new(FakeHost { log: host.clone(), edge }),
            source: Box::new(MemorySource { state: source.clone() }),
            launcher: Box::new(FakeLauncher { log: launches.clone() }),
            icons: IconResolver::with_roots("hicolor", Vec::new()),
            config_path: None,
        };
        let plugin = MenuPlugin::construct(event_loop.handle(), config, ctx)?;
        Ok(Self { event_loop, plugin, host, launches, source })
    }

    pub fn surface(&self) -> Rc<RefCell<SurfaceLog>> {
        self.host.borrow().surfaces.last().expect("a surface was created").clone()
    }

    pub fn dispatch(&mut self, millis: u64) {
        self.event_loop
            .dispatch(Some(std::time::Duration::from_millis(millis)), &mut self.plugin)
            .unwrap();
    }
}
