//! Translates winit input events into tileterm [`InputEvent`] values.

use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key as WKey, NamedKey};

use tileterm_core::{InputEvent, Key};

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// Key-down events (auto-repeat included) become [`InputEvent::KeyDown`].
pub(crate) fn translate_keyboard(event: &KeyEvent) -> Option<InputEvent> {
    if event.state != ElementState::Pressed {
        return None;
    }
    translate_key(&event.logical_key).map(InputEvent::KeyDown)
}

pub(crate) fn translate_key(key: &WKey) -> Option<Key> {
    let key = match key {
        WKey::Named(named) => match named {
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Char(' '),
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Insert => Key::Insert,
            other => Key::Other(format!("{other:?}")),
        },
        WKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Other(s.to_string()),
            }
        }
        WKey::Unidentified(_) | WKey::Dead(_) => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// A primary-button release completes a click.
pub(crate) fn translate_mouse_button(state: ElementState, button: MouseButton) -> Option<InputEvent> {
    match (state, button) {
        (ElementState::Released, MouseButton::Left) => Some(InputEvent::Click),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::SmolStr;

    use super::*;

    #[test]
    fn named_keys() {
        assert_eq!(translate_key(&WKey::Named(NamedKey::Enter)), Some(Key::Enter));
        assert_eq!(translate_key(&WKey::Named(NamedKey::Space)), Some(Key::Char(' ')));
        assert_eq!(
            translate_key(&WKey::Named(NamedKey::F1)),
            Some(Key::Other("F1".into()))
        );
    }

    #[test]
    fn characters() {
        assert_eq!(translate_key(&WKey::Character(SmolStr::new("q"))), Some(Key::Char('q')));
        assert_eq!(
            translate_key(&WKey::Character(SmolStr::new("e\u{301}"))),
            Some(Key::Other("e\u{301}".into()))
        );
    }

    #[test]
    fn only_primary_release_clicks() {
        assert_eq!(
            translate_mouse_button(ElementState::Released, MouseButton::Left),
            Some(InputEvent::Click)
        );
        assert_eq!(translate_mouse_button(ElementState::Pressed, MouseButton::Left), None);
        assert_eq!(translate_mouse_button(ElementState::Released, MouseButton::Right), None);
    }
}
