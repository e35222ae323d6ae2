//! Walks the system menu source into popup menus and fills the index.

use crate::icons::IconResolver;
use crate::index::ApplicationIndex;
use crate::menu::{ItemKind, Menu, MenuItem, Owner};
use crate::model::AppEntry;
use crate::sources::{MenuDir, MenuNode, VisibilityFlags};
use log::{debug, info};

/// Token of the menu root; directory tokens extend it with their ids.
pub const MENU_ROOT: &str = "menu://applications";

/// Borrowed state for one build or reload pass.
pub struct MenuBuilder<'a> {
    pub index: &'a mut ApplicationIndex,
    pub icons: &'a mut IconResolver,
    pub flags: VisibilityFlags,
    pub icon_size: u32,
}

impl<'a> MenuBuilder<'a> {
    pub fn new(
        index: &'a mut ApplicationIndex,
        icons: &'a mut IconResolver,
        flags: VisibilityFlags,
        icon_size: u32,
    ) -> Self {
        Self { index, icons, flags, icon_size }
    }

    /// Inserts the system tree into `menu` at `pos` (`None` appends) and
    /// returns how many top-level items were inserted.
    ///
    /// Without a usable root, or when every node prunes away, a single
    /// system-owned placeholder is inserted instead so a later reload can
    /// find the spot again.
    pub fn insert_system_items(&mut self, root: Option<&MenuDir>, menu: &mut Menu, pos: Option<usize>) -> usize {
        let inserted = match root {
            Some(dir) => self.load_dir(dir, MENU_ROOT, menu, pos),
            None => 0,
        };
        if inserted == 0 {
            debug!("MenuBuilder: nothing to show, inserting placeholder");
            menu.insert(pos, MenuItem::new(ItemKind::Placeholder, Owner::SystemGenerated));
            return 1;
        }
        inserted
    }

    /// Depth-first walk of `dir`. Empty directories are dropped together with
    /// their item; the cursor only advances for items actually inserted.
    pub fn load_submenu(&mut self, dir: &MenuDir, menu: &mut Menu, pos: Option<usize>) -> usize {
        self.load_dir(dir, MENU_ROOT, menu, pos)
    }

    /// Same walk; `token` names `dir` itself.
    fn load_dir(&mut self, dir: &MenuDir, token: &str, menu: &mut Menu, pos: Option<usize>) -> usize {
        if !dir.visible {
            return 0;
        }

        let mut cursor = pos;
        let mut count = 0;
        for node in &dir.children {
            let item = match node {
                MenuNode::Separator => Some(MenuItem::separator(Owner::SystemGenerated)),
                MenuNode::Application(app) => {
                    if !app.is_visible(self.flags) {
                        continue;
                    }
                    let icon = self.icons.lookup_or_fallback(app.icon.as_deref(), self.icon_size);
                    let entry = AppEntry::new(app.name.clone(), icon, app.file_path.clone());
                    self.index.insert(entry.clone());
                    Some(MenuItem::new(
                        ItemKind::Application { entry, tooltip: app.comment.clone() },
                        Owner::SystemGenerated,
                    ))
                }
                MenuNode::Directory(sub_dir) => {
                    let mut sub = Menu::new();
                    let sub_token = format!("{token}/{}", sub_dir.id);
                    if self.load_dir(sub_dir, &sub_token, &mut sub, None) == 0 {
                        debug!("MenuBuilder: pruning empty directory {}", sub_dir.name);
                        None
                    } else {
                        let icon = self.icons.lookup_or_fallback(sub_dir.icon.as_deref(), self.icon_size);
                        let mut item = MenuItem::new(
                            ItemKind::Directory { label: sub_dir.name.clone(), icon, token: sub_token },
                            Owner::SystemGenerated,
                        );
                        item.submenu = Some(sub);
                        Some(item)
                    }
                }
            };

            if let Some(item) = item {
                menu.insert(cursor, item);
                cursor = cursor.map(|p| p + 1);
                count += 1;
            }
        }
        count
    }

    /// Replaces every contiguous run of system-owned items with a fresh walk
    /// of `root`, recursing into user-authored items' submenus.
    pub fn reload(&mut self, root: Option<&MenuDir>, menu: &mut Menu) {
        let mut idx = 0;
        while idx < menu.items.len() {
            if menu.items[idx].is_system() {
                let end = menu.items[idx..]
                    .iter()
                    .position(|item| !item.is_system())
                    .map_or(menu.items.len(), |n| idx + n);
                menu.items.drain(idx..end);
                idx += self.insert_system_items(root, menu, Some(idx));
            } else {
                if let Some(sub) = menu.items[idx].submenu.as_mut() {
                    self.reload(root, sub);
                }
                idx += 1;
            }
        }
    }
}

/// Clears `index` and reloads every system run in `menu`.
pub fn reload_menu(
    index: &mut ApplicationIndex,
    icons: &mut IconResolver,
    flags: VisibilityFlags,
    icon_size: u32,
    root: Option<&MenuDir>,
    menu: &mut Menu,
) {
    index.clear();
    MenuBuilder::new(index, icons, flags, icon_size).reload(root, menu);
    info!("MenuBuilder: reloaded, {} applications indexed", index.len());
}
