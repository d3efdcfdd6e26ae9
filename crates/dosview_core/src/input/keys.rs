use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

/// Host virtual key code (macOS `kVK_*` numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const A: Self = Self(0);
    pub const N: Self = Self(45);
    pub const Y: Self = Self(16);
    pub const RETURN: Self = Self(36);
    pub const TAB: Self = Self(48);
    pub const SPACE: Self = Self(49);
    pub const BACKSPACE: Self = Self(51);
    pub const ESCAPE: Self = Self(53);
    pub const F1: Self = Self(122);
    pub const F2: Self = Self(120);
    pub const F3: Self = Self(99);
    pub const F4: Self = Self(118);
    pub const F5: Self = Self(96);
    pub const F6: Self = Self(97);
    pub const F7: Self = Self(98);
    pub const F8: Self = Self(100);
    pub const F9: Self = Self(101);
    pub const F10: Self = Self(109);
    pub const F11: Self = Self(103);
    pub const F12: Self = Self(111);
    pub const HOME: Self = Self(115);
    pub const PAGE_UP: Self = Self(116);
    pub const END: Self = Self(119);
    pub const PAGE_DOWN: Self = Self(121);
    pub const LEFT: Self = Self(123);
    pub const RIGHT: Self = Self(124);
    pub const DOWN: Self = Self(125);
    pub const UP: Self = Self(126);

    /// Largest code the host keyboard layer produces.
    pub const MAX: u16 = 127;

    pub fn is_valid(self) -> bool {
        self.0 <= Self::MAX
    }
}

const NAMED: &[(&str, KeyCode)] = &[
    ("esc", KeyCode::ESCAPE),
    ("escape", KeyCode::ESCAPE),
    ("enter", KeyCode::RETURN),
    ("return", KeyCode::RETURN),
    ("tab", KeyCode::TAB),
    ("space", KeyCode::SPACE),
    ("backspace", KeyCode::BACKSPACE),
    ("f1", KeyCode::F1),
    ("f2", KeyCode::F2),
    ("f3", KeyCode::F3),
    ("f4", KeyCode::F4),
    ("f5", KeyCode::F5),
    ("f6", KeyCode::F6),
    ("f7", KeyCode::F7),
    ("f8", KeyCode::F8),
    ("f9", KeyCode::F9),
    ("f10", KeyCode::F10),
    ("f11", KeyCode::F11),
    ("f12", KeyCode::F12),
    ("home", KeyCode::HOME),
    ("end", KeyCode::END),
    ("pageup", KeyCode::PAGE_UP),
    ("pgup", KeyCode::PAGE_UP),
    ("pagedown", KeyCode::PAGE_DOWN),
    ("pgdn", KeyCode::PAGE_DOWN),
    ("left", KeyCode::LEFT),
    ("right", KeyCode::RIGHT),
    ("up", KeyCode::UP),
    ("down", KeyCode::DOWN),
];

/// ANSI layout positions, `kVK_ANSI_*`.
const CHARACTERS: &[(char, u16)] = &[
    ('a', 0), ('s', 1), ('d', 2), ('f', 3), ('h', 4), ('g', 5), ('z', 6), ('x', 7),
    ('c', 8), ('v', 9), ('b', 11), ('q', 12), ('w', 13), ('e', 14), ('r', 15), ('y', 16),
    ('t', 17), ('1', 18), ('2', 19), ('3', 20), ('4', 21), ('6', 22), ('5', 23), ('=', 24),
    ('9', 25), ('7', 26), ('-', 27), ('8', 28), ('0', 29), (']', 30), ('o', 31), ('u', 32),
    ('[', 33), ('i', 34), ('p', 35), ('l', 37), ('j', 38), ('\'', 39), ('k', 40), (';', 41),
    ('\\', 42), (',', 43), ('/', 44), ('n', 45), ('m', 46), ('.', 47), ('`', 50),
];

impl KeyCode {
    /// Key producing `ch` on an ANSI layout, ignoring case.
    pub fn for_char(ch: char) -> Option<Self> {
        if ch == ' ' {
            return Some(Self::SPACE);
        }
        let lower = ch.to_ascii_lowercase();
        CHARACTERS.iter().find(|(key, _)| *key == lower).map(|&(_, code)| Self(code))
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const OPTION = 0b0100;
        const COMMAND = 0b1000;
    }
}

/// One key press from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    /// Character the press produces, if any.
    pub text: Option<char>,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self { code, modifiers: Modifiers::empty(), text: None }
    }

    pub fn with_text(code: KeyCode, text: char) -> Self {
        Self { code, modifiers: Modifiers::empty(), text: Some(text) }
    }

    /// Printable text carried by the event, when no command modifier is held.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.intersects(Modifiers::CONTROL | Modifiers::COMMAND) {
            return None;
        }
        self.text.filter(|ch| !ch.is_control())
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown key `{0}`")]
pub struct UnknownKey(pub String);

/// Parses `F1`, `Esc`, `shift+pgdn`, `y`, `#53`.
impl FromStr for KeyEvent {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::empty();
        let mut parts: Vec<&str> = s.split('+').collect();
        let key = match parts.pop() {
            Some("") if s.ends_with('+') => "+",
            Some(key) => key,
            None => return Err(UnknownKey(s.to_string())),
        };

        for part in parts.iter().filter(|part| !part.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "shift" => Modifiers::SHIFT,
                "ctrl" | "control" => Modifiers::CONTROL,
                "alt" | "option" => Modifiers::OPTION,
                "cmd" | "command" => Modifiers::COMMAND,
                _ => return Err(UnknownKey(s.to_string())),
            };
        }

        let mut event = parse_key(key).ok_or_else(|| UnknownKey(s.to_string()))?;
        event.modifiers = modifiers;
        Ok(event)
    }
}

fn parse_key(key: &str) -> Option<KeyEvent> {
    if let Some(raw) = key.strip_prefix('#') {
        return raw.parse().ok().map(|code| KeyEvent::new(KeyCode(code)));
    }

    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.clone().next()) {
        let code = KeyCode::for_char(ch).unwrap_or(KeyCode(KeyCode::MAX));
        return Some(KeyEvent::with_text(code, ch));
    }

    let lower = key.to_ascii_lowercase();
    NAMED.iter().find(|(name, _)| *name == lower).map(|&(_, code)| {
        let text = (code == KeyCode::SPACE).then_some(' ');
        KeyEvent { code, modifiers: Modifiers::empty(), text }
    })
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NAMED.iter().find(|(_, code)| code == self) {
            Some((name, _)) => f.write_str(name),
            None => write!(f, "#{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_keys() {
        assert_eq!("F1".parse::<KeyEvent>().unwrap().code, KeyCode::F1);
        assert_eq!("esc".parse::<KeyEvent>().unwrap().code, KeyCode::ESCAPE);
        assert_eq!("PgDn".parse::<KeyEvent>().unwrap().code, KeyCode::PAGE_DOWN);
        assert_eq!("#53".parse::<KeyEvent>().unwrap().code, KeyCode::ESCAPE);
    }

    #[test]
    fn parses_characters_with_text() {
        let event: KeyEvent = "y".parse().unwrap();
        assert_eq!(event.code, KeyCode::Y);
        assert_eq!(event.printable(), Some('y'));

        let event: KeyEvent = "N".parse().unwrap();
        assert_eq!(event.code, KeyCode::N);
        assert_eq!(event.text, Some('N'));

        let event: KeyEvent = "ж".parse().unwrap();
        assert_eq!(event.printable(), Some('ж'));
    }

    #[test]
    fn parses_modifiers() {
        let event: KeyEvent = "ctrl+shift+f".parse().unwrap();
        assert_eq!(event.modifiers, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(event.printable(), None);
        assert!("hyper+f".parse::<KeyEvent>().is_err());
        assert!("nope".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn named_codes_are_valid() {
        for (name, code) in NAMED {
            assert!(code.is_valid(), "{name}");
        }
    }
}
