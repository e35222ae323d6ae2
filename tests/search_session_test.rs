mod common;

use common::{Harness, app, dir, firefox_files_find, root};
use smenu::config::Config;
use smenu::dispatch::{SearchEvent, SearchEventKind, SessionId};
use smenu::host::PanelEdge;
use smenu::keys::{Key, KeyPress, Modifiers};
use smenu::session::EdgePolicy;
use smenu::sources::{MenuApp, MenuNode};

fn key(id: SessionId, key: Key) -> SearchEvent {
    SearchEvent::new(id, SearchEventKind::Key(KeyPress::plain(key)))
}

fn type_text(h: &mut Harness, id: SessionId, text: &str) {
    for c in text.chars() {
        h.plugin.deliver(key(id, Key::Char(c)));
    }
}

fn rows(h: &Harness) -> Vec<String> {
    h.surface().borrow().rows.clone()
}

#[test]
fn typing_narrows_and_enter_launches_once() {
    let mut h = Harness::new(Some(firefox_files_find()));

    let id = h.plugin.start_search('f').unwrap();
    assert_eq!(rows(&h), ["Files", "Find", "Firefox"]);

    type_text(&mut h, id, "i");
    assert_eq!(h.plugin.session().unwrap().query(), "fi");
    assert_eq!(rows(&h).len(), 3);

    type_text(&mut h, id, "re");
    assert_eq!(rows(&h), ["Firefox"]);

    h.plugin.deliver(key(id, Key::Enter));
    assert_eq!(h.launches.borrow().launched, ["/usr/share/applications/firefox.desktop"]);
    assert!(h.plugin.session().is_none());
    assert!(h.surface().borrow().destroyed);
}

#[test]
fn enter_with_no_rows_does_nothing() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('z').unwrap();
    type_text(&mut h, id, "zz");

    let session = h.plugin.session().unwrap();
    assert_eq!(session.visible_row_count(), 0);
    assert_eq!(session.selected_row(), None);

    h.plugin.deliver(key(id, Key::Enter));
    h.plugin.deliver(key(id, Key::Up));
    h.plugin.deliver(key(id, Key::Down));
    assert!(h.launches.borrow().launched.is_empty());
    assert!(h.plugin.session().is_some());
}

#[test]
fn second_session_is_rejected() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let first = h.plugin.start_search('f').unwrap();
    assert!(h.plugin.start_search('g').is_none());
    assert_eq!(h.host.borrow().surfaces.len(), 1);
    assert_eq!(h.plugin.session().unwrap().id(), first);
}

#[test]
fn main_menu_key_opens_search() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let shift = Modifiers { shift: true, ..Modifiers::none() };

    assert!(h.plugin.on_menu_key(&KeyPress::new(Key::Char('F'), shift)));
    assert_eq!(h.host.borrow().hides, 1);
    let session = h.plugin.session().unwrap();
    assert_eq!(session.query(), "F");
    assert_eq!(h.surface().borrow().query, "F");
    assert!(h.surface().borrow().grabbed);
    assert!(h.surface().borrow().visible);
}

#[test]
fn super_key_hides_menu_without_search() {
    let mut h = Harness::new(Some(firefox_files_find()));
    assert!(h.plugin.on_menu_key(&KeyPress::plain(Key::SuperL)));
    assert_eq!(h.host.borrow().hides, 1);
    assert!(h.plugin.session().is_none());
    assert!(!h.plugin.on_menu_key(&KeyPress::plain(Key::Char('-'))));
}

#[test]
fn clamp_policy_stops_at_ends() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(0));

    h.plugin.deliver(key(id, Key::Up));
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(0));

    for _ in 0..5 {
        h.plugin.deliver(key(id, Key::Down));
    }
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(2));
    assert_eq!(h.surface().borrow().selected, Some(2));

    h.plugin.deliver(key(id, Key::Enter));
    assert_eq!(h.launches.borrow().launched, ["/usr/share/applications/firefox.desktop"]);
}

#[test]
fn jump_policy_moves_to_opposite_end() {
    let config = Config { edge_policy: EdgePolicy::Jump, ..Config::default() };
    let mut h = Harness::with_config(Some(firefox_files_find()), config);
    let id = h.plugin.start_search('f').unwrap();

    h.plugin.deliver(key(id, Key::Up));
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(2));
    h.plugin.deliver(key(id, Key::Down));
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(0));
}

#[test]
fn editing_query_resets_selection() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(key(id, Key::Down));
    h.plugin.deliver(key(id, Key::Down));
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(2));

    h.plugin.deliver(key(id, Key::BackSpace));
    let session = h.plugin.session().unwrap();
    assert_eq!(session.query(), "");
    assert_eq!(session.selected_row(), Some(0));
    assert_eq!(session.visible_row_count(), 3);

    h.plugin
        .deliver(SearchEvent::new(id, SearchEventKind::QueryChanged("FIND".to_string())));
    assert_eq!(rows(&h), ["Find"]);
    assert_eq!(h.plugin.session().unwrap().selected_row(), Some(0));
}

#[test]
fn modified_chars_are_not_typed() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    let ctrl = Modifiers { ctrl: true, ..Modifiers::none() };
    h.plugin
        .deliver(SearchEvent::new(id, SearchEventKind::Key(KeyPress::new(Key::Char('a'), ctrl))));
    assert_eq!(h.plugin.session().unwrap().query(), "f");
}

#[test]
fn escape_closes_without_launch() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(key(id, Key::Escape));

    assert!(h.plugin.session().is_none());
    assert!(h.launches.borrow().launched.is_empty());
    let surface = h.surface();
    let surface = surface.borrow();
    assert!(surface.destroyed);
    assert_eq!(surface.grab_count, surface.release_count);
}

#[test]
fn row_activation_launches_that_row() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::RowActivated(1)));

    assert_eq!(h.launches.borrow().launched, ["/usr/share/applications/find.desktop"]);
    assert!(h.plugin.session().is_none());
}

#[test]
fn click_outside_closes_and_releases_grab() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();

    h.plugin
        .deliver(SearchEvent::new(id, SearchEventKind::ButtonPress { x: 10.0, y: 10.0 }));
    assert!(h.plugin.session().is_some());

    h.plugin
        .deliver(SearchEvent::new(id, SearchEventKind::ButtonPress { x: -1.0, y: 50.0 }));
    assert!(h.plugin.session().is_none());
    assert!(!h.surface().borrow().grabbed);
}

#[test]
fn window_manager_destroy_releases_without_second_destroy() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::Destroyed));

    assert!(h.plugin.session().is_none());
    let surface = h.surface();
    assert!(!surface.borrow().destroyed);
    assert!(!surface.borrow().grabbed);
    assert!(h.plugin.dispatcher().is_empty());
}

#[test]
fn queued_events_after_teardown_have_no_effect() {
    let mut h = Harness::new(Some(firefox_files_find()));
    let id = h.plugin.start_search('f').unwrap();
    let queued = vec![
        key(id, Key::Enter),
        SearchEvent::new(id, SearchEventKind::RowActivated(0)),
        SearchEvent::new(id, SearchEventKind::QueryChanged("fire".to_string())),
    ];

    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::Destroyed));
    assert_eq!(h.plugin.dispatcher().handlers_for(id), 0);

    for event in queued {
        assert!(!h.plugin.deliver(event));
    }
    assert!(h.launches.borrow().launched.is_empty());

    // A fresh session does not pick up the old session's events.
    let next = h.plugin.start_search('x').unwrap();
    assert_ne!(next, id);
    assert!(!h.plugin.deliver(key(id, Key::Enter)));
    assert!(h.plugin.session().is_some());
}

#[test]
fn auto_height_follows_row_count() {
    let config = Config { search_height: 100, ..Config::default() };
    let mut h = Harness::with_config(Some(firefox_files_find()), config);
    let id = h.plugin.start_search('f').unwrap();
    assert_eq!(h.surface().borrow().heights.last(), Some(&100));

    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::RowMeasured(20)));
    assert_eq!(h.surface().borrow().heights.last(), Some(&60));

    type_text(&mut h, id, "ir");
    assert_eq!(h.surface().borrow().heights.last(), Some(&20));

    // Later measurements are ignored.
    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::RowMeasured(50)));
    assert_eq!(h.surface().borrow().heights.last(), Some(&20));
    assert!(!h.plugin.session().unwrap().fixed_height_mode());
}

#[test]
fn auto_height_is_capped_by_configured_height() {
    let config = Config { search_height: 50, ..Config::default() };
    let mut h = Harness::with_config(Some(firefox_files_find()), config);
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::RowMeasured(30)));
    assert_eq!(h.surface().borrow().heights.last(), Some(&50));
}

#[test]
fn fixed_height_never_changes() {
    let config = Config { fixed: true, search_height: 250, ..Config::default() };
    let mut h = Harness::with_config(Some(firefox_files_find()), config);
    let id = h.plugin.start_search('f').unwrap();
    h.plugin.deliver(SearchEvent::new(id, SearchEventKind::RowMeasured(20)));
    type_text(&mut h, id, "irefox");

    assert!(h.plugin.session().unwrap().fixed_height_mode());
    assert!(h.surface().borrow().heights.iter().all(|&x| x == 250));
}

#[test]
fn list_follows_panel_edge() {
    let h = Harness::try_with_config(Some(firefox_files_find()), Config::default(), PanelEdge::Bottom);
    let mut h = h.unwrap();
    h.plugin.start_search('f').unwrap();
    assert_eq!(h.surface().borrow().anchor, Some(PanelEdge::Bottom));
}

#[test]
fn menu_hidden_closes_invisible_session_only() {
    let mut h = Harness::new(Some(firefox_files_find()));
    h.plugin.start_search('f').unwrap();
    h.plugin.on_menu_hidden();
    assert!(h.plugin.session().is_some());

    h.surface().borrow_mut().visible = false;
    h.plugin.on_menu_hidden();
    assert!(h.plugin.session().is_none());
}

#[test]
fn duplicate_names_sort_stably() {
    let second = MenuApp::new("editor-gtk.desktop", "editor", "/usr/share/applications/editor-gtk.desktop");
    let tree = root(vec![dir(
        "Editors",
        vec![app("Editor"), MenuNode::Application(second), app("Alpha")],
    )]);
    let mut h = Harness::new(Some(tree));
    let id = h.plugin.start_search('e').unwrap();

    let mut orders = Vec::new();
    for _ in 0..2 {
        h.plugin.deliver(key(id, Key::BackSpace));
        let paths: Vec<String> = h
            .plugin
            .session()
            .unwrap()
            .rows(h.plugin.index())
            .map(|e| e.launch_path.clone())
            .collect();
        orders.push(paths);
        h.plugin.deliver(key(id, Key::Char('e')));
    }
    assert_eq!(orders[0], orders[1]);
    assert_eq!(
        orders[0],
        [
            "/usr/share/applications/alpha.desktop",
            "/usr/share/applications/editor.desktop",
            "/usr/share/applications/editor-gtk.desktop",
        ]
    );
}
