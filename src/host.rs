//! Interfaces the panel host and its toolkit provide to the plugin.

use crate::config::BuiltinCommand;
use crate::menu::Menu;
use crate::model::AppEntry;

/// Screen edge the panel is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelEdge {
    #[default]
    Top,
    Bottom,
}

/// Panel-side services used by the plugin shell.
pub trait PanelHost {
    /// Safe icon size for menu and button icons, in pixels.
    fn icon_size(&self) -> u32;

    fn edge(&self) -> PanelEdge;

    /// Updates the panel button; `width` includes padding.
    fn set_button_icon(&mut self, icon: &str, width: u32);

    /// Pops the main menu up, anchored at the plugin button.
    fn popup_menu(&mut self, menu: &Menu);

    fn hide_menu(&mut self);

    fn run_builtin(&mut self, command: BuiltinCommand);

    /// Shows the file properties dialog for a launch token.
    fn show_properties(&mut self, launch_path: &str);

    /// Creates the undecorated popup window used by a search session.
    fn create_search_surface(&mut self) -> Box<dyn SearchSurface>;
}

/// Popup window holding the search entry and its result list.
pub trait SearchSurface {
    /// Puts the result list above the entry for bottom panels, below for top ones.
    fn anchor(&mut self, edge: PanelEdge);

    fn set_list_height(&mut self, height: u32);

    /// Replaces the entry text and moves the cursor to its end.
    fn set_query(&mut self, query: &str);

    fn show_rows(&mut self, rows: &[&AppEntry], selected: Option<usize>);

    fn show(&mut self);

    fn is_visible(&self) -> bool;

    /// Current window size, used to tell clicks outside the window.
    fn size(&self) -> (u32, u32);

    fn grab_input(&mut self);

    fn release_input(&mut self);

    fn destroy(&mut self);
}
