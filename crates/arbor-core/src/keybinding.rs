#![forbid(unsafe_code)]

//! Closed key enum for navigation dispatch.
//!
//! Widgets never compare key names as strings. A [`KeyEvent`] is resolved
//! once into a [`Key`], and every handler matches on that enum. Adding a
//! binding means adding a variant, so a misspelled key cannot silently
//! fall through.
//!
//! # Resolution rules
//!
//! | Event                                  | Key               |
//! |----------------------------------------|-------------------|
//! | printable char, no Ctrl/Alt/Super      | `Char(c)`         |
//! | char with Ctrl/Alt/Super               | `Chord(c, mods)`  |
//! | control characters                     | `Unbound`         |
//! | release events                         | `Unbound`         |
//! | named keys (arrows, Enter, ...)        | matching variant  |
//! | BackTab, Delete, function keys         | `Unbound`         |

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// A resolved key, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character typed without a command modifier.
    Char(char),
    /// A character combined with Ctrl, Alt, or Super.
    Chord(char, Modifiers),
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Anything the navigation layer does not bind.
    Unbound,
}

impl Key {
    /// Resolve a raw key event.
    #[must_use]
    pub fn from_event(event: &KeyEvent) -> Self {
        if event.kind == KeyEventKind::Release {
            return Self::Unbound;
        }
        match event.code {
            KeyCode::Char(c) if c.is_control() => Self::Unbound,
            KeyCode::Char(c) if event.has_command_modifier() => Self::Chord(c, event.modifiers),
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Enter => Self::Enter,
            KeyCode::Escape => Self::Escape,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Tab => Self::Tab,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Home => Self::Home,
            KeyCode::End => Self::End,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown => Self::PageDown,
            KeyCode::BackTab | KeyCode::Delete | KeyCode::F(_) => Self::Unbound,
        }
    }

    /// The printable character, if this is a plain character key.
    #[must_use]
    pub const fn printable(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Short stable name used in log fields.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Char(' ') => "space".to_owned(),
            Self::Char(c) => c.to_string(),
            Self::Chord(c, mods) => format!("{mods:?}+{c}"),
            Self::Enter => "enter".to_owned(),
            Self::Escape => "escape".to_owned(),
            Self::Backspace => "backspace".to_owned(),
            Self::Tab => "tab".to_owned(),
            Self::Up => "up".to_owned(),
            Self::Down => "down".to_owned(),
            Self::Left => "left".to_owned(),
            Self::Right => "right".to_owned(),
            Self::Home => "home".to_owned(),
            Self::End => "end".to_owned(),
            Self::PageUp => "page_up".to_owned(),
            Self::PageDown => "page_down".to_owned(),
            Self::Unbound => "unbound".to_owned(),
        }
    }
}

impl From<&KeyEvent> for Key {
    fn from(event: &KeyEvent) -> Self {
        Self::from_event(event)
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        Self::from_event(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_resolves_to_char() {
        assert_eq!(Key::from_event(&KeyEvent::char('j')), Key::Char('j'));
    }

    #[test]
    fn shifted_char_keeps_case() {
        let event = KeyEvent::char('G').with_modifiers(Modifiers::SHIFT);
        assert_eq!(Key::from_event(&event), Key::Char('G'));
    }

    #[test]
    fn ctrl_char_resolves_to_chord() {
        let event = KeyEvent::char('t').with_modifiers(Modifiers::CTRL);
        assert_eq!(Key::from_event(&event), Key::Chord('t', Modifiers::CTRL));
        assert_eq!(Key::from_event(&event).printable(), None);
    }

    #[test]
    fn release_is_unbound() {
        let event = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Release);
        assert_eq!(Key::from_event(&event), Key::Unbound);
    }

    #[test]
    fn repeat_is_treated_like_press() {
        let event = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Repeat);
        assert_eq!(Key::from_event(&event), Key::Down);
    }

    #[test]
    fn control_chars_are_unbound() {
        assert_eq!(Key::from_event(&KeyEvent::char('\u{7f}')), Key::Unbound);
        assert_eq!(Key::from_event(&KeyEvent::new(KeyCode::F(5))), Key::Unbound);
    }

    #[test]
    fn named_keys_resolve() {
        let cases = [
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Escape, Key::Escape),
            (KeyCode::Backspace, Key::Backspace),
            (KeyCode::Tab, Key::Tab),
            (KeyCode::Home, Key::Home),
            (KeyCode::End, Key::End),
            (KeyCode::PageUp, Key::PageUp),
            (KeyCode::PageDown, Key::PageDown),
            (KeyCode::Left, Key::Left),
            (KeyCode::Right, Key::Right),
        ];
        for (code, expected) in cases {
            assert_eq!(Key::from(KeyEvent::new(code)), expected);
        }
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(Key::Char(' ').name(), "space");
        assert_eq!(Key::Char('x').name(), "x");
        assert_eq!(Key::PageDown.name(), "page_down");
    }
}
