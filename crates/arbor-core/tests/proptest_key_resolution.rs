//! Property-based tests for key resolution.
//!
//! 1. Printable characters without command modifiers resolve to `Key::Char`.
//! 2. Command modifiers never produce `Key::Char`.
//! 3. Release events never produce a bound key.
//! 4. Scroll easing always settles on the requested target.

use arbor_core::animation::SmoothScroller;
use arbor_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
use arbor_core::keybinding::Key;
use proptest::prelude::*;

fn printable() -> impl Strategy<Value = char> {
    any::<char>().prop_filter("printable", |c| !c.is_control())
}

fn command_modifiers() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        Just(Modifiers::CTRL),
        Just(Modifiers::ALT),
        Just(Modifiers::SUPER),
        Just(Modifiers::CTRL | Modifiers::SHIFT),
        Just(Modifiers::ALT | Modifiers::CTRL),
    ]
}

proptest! {
    #[test]
    fn printable_resolves_to_char(c in printable(), shift in any::<bool>()) {
        let mods = if shift { Modifiers::SHIFT } else { Modifiers::NONE };
        let event = KeyEvent::char(c).with_modifiers(mods);
        prop_assert_eq!(Key::from_event(&event), Key::Char(c));
    }

    #[test]
    fn command_modifier_never_yields_char(c in printable(), mods in command_modifiers()) {
        let event = KeyEvent::char(c).with_modifiers(mods);
        prop_assert!(Key::from_event(&event).printable().is_none());
    }

    #[test]
    fn release_is_always_unbound(c in printable()) {
        for code in [KeyCode::Char(c), KeyCode::Enter, KeyCode::Up, KeyCode::Tab] {
            let event = KeyEvent::new(code).with_kind(KeyEventKind::Release);
            prop_assert_eq!(Key::from_event(&event), Key::Unbound);
        }
    }

    #[test]
    fn scroller_settles_on_target(y in 0u32..5000) {
        let mut scroller = SmoothScroller::new();
        scroller.set_target(0.0, f64::from(y));
        for _ in 0..2000 {
            if !scroller.is_animating() {
                break;
            }
            scroller.update(0.016);
        }
        prop_assert!(!scroller.is_animating());
        prop_assert_eq!(scroller.position(), (0.0, f64::from(y)));
    }
}
