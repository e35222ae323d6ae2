//! Terminal stand-in for the panel host, used by the command-line tool.

use smenu::config::BuiltinCommand;
use smenu::host::{PanelEdge, PanelHost, SearchSurface};
use smenu::menu::Menu;
use smenu::model::AppEntry;
use log::{debug, info};

pub struct HeadlessHost {
    pub icon_size: u32,
    pub print_menu: bool,
}

impl PanelHost for HeadlessHost {
    fn icon_size(&self) -> u32 {
        self.icon_size
    }

    fn edge(&self) -> PanelEdge {
        PanelEdge::Top
    }

    fn set_button_icon(&mut self, icon: &str, width: u32) {
        debug!("button icon {} ({}px)", icon, width);
    }

    fn popup_menu(&mut self, menu: &Menu) {
        if self.print_menu {
            print!("{}", menu.outline());
        }
    }

    fn hide_menu(&mut self) {}

    fn run_builtin(&mut self, command: BuiltinCommand) {
        info!("builtin command {} is handled by the panel", command.label());
    }

    fn show_properties(&mut self, launch_path: &str) {
        println!("{launch_path}");
    }

    fn create_search_surface(&mut self) -> Box<dyn SearchSurface> {
        Box::new(HeadlessSurface::default())
    }
}

#[derive(Default)]
pub struct HeadlessSurface {
    visible: bool,
    height: u32,
}

impl SearchSurface for HeadlessSurface {
    fn anchor(&mut self, _edge: PanelEdge) {}

    fn set_list_height(&mut self, height: u32) {
        self.height = height;
    }

    fn set_query(&mut self, query: &str) {
        debug!("query '{}'", query);
    }

    fn show_rows(&mut self, rows: &[&AppEntry], selected: Option<usize>) {
        debug!("{} rows, selected {:?}", rows.len(), selected);
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn size(&self) -> (u32, u32) {
        (400, self.height)
    }

    fn grab_input(&mut self) {}

    fn release_input(&mut self) {}

    fn destroy(&mut self) {
        self.visible = false;
    }
}
