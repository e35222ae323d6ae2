use xkbcommon::xkb::{self, keysyms};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    /// True when no modifier other than Shift is held.
    pub fn is_plain(&self) -> bool {
        !self.ctrl && !self.alt && !self.logo
    }

    pub fn is_empty(&self) -> bool {
        self.is_plain() && !self.shift
    }
}

/// Keys the menu and the search overlay care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Up,
    Down,
    BackSpace,
    SuperL,
    Char(char),
    Other(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }

    /// Builds a key press from a raw keysym and the text it produced. Hosts
    /// feed their keyboard events through here.
    pub fn from_keysym(raw_sym: u32, utf8: Option<&str>, modifiers: Modifiers) -> Self {
        let key = match raw_sym {
            keysyms::KEY_Escape => Key::Escape,
            keysyms::KEY_Return | keysyms::KEY_KP_Enter => Key::Enter,
            keysyms::KEY_Up | keysyms::KEY_KP_Up => Key::Up,
            keysyms::KEY_Down | keysyms::KEY_KP_Down => Key::Down,
            keysyms::KEY_BackSpace => Key::BackSpace,
            keysyms::KEY_Super_L => Key::SuperL,
            _ => {
                let mut chars = utf8.unwrap_or("").chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c),
                    _ => Key::Other(raw_sym),
                }
            }
        };
        Self { key, modifiers }
    }

    /// Key press that types `c`, as a keyboard with that key would send it.
    pub fn from_char(c: char, modifiers: Modifiers) -> Self {
        let sym = u32::from(xkb::utf32_to_keysym(u32::from(c)));
        Self::from_keysym(sym, Some(c.encode_utf8(&mut [0; 4])), modifiers)
    }

    /// Character that opens a search from the main menu, if any.
    pub fn search_seed(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if c.is_alphanumeric() && self.modifiers.is_plain() => Some(c),
            _ => None,
        }
    }

    pub fn is_bare_super(&self) -> bool {
        self.key == Key::SuperL && self.modifiers.is_empty()
    }
}
