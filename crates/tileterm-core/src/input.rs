//! Input events: [`Key`], [`InputEvent`], and the [`Echo`] element.

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A keyboard key, as reported by a keydown event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// A printable character: exactly one Unicode code point. Space is
    /// `Char(' ')`.
    Char(char),
    /// Any other named key (`"F1"`, `"Shift"`, ...). Never dispatched.
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    ///
    /// A value of exactly one code point is a [`Key::Char`]; anything else
    /// is matched against the named keys.
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::Char(c);
        }
        match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            "Tab" => Self::Tab,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Insert" => Self::Insert,
            other => Self::Other(other.to_string()),
        }
    }
}

/// The first UTF-16 code unit of `c` (the high surrogate for characters
/// outside the basic multilingual plane).
#[inline]
pub fn utf16_unit(c: char) -> u16 {
    let mut buf = [0u16; 2];
    c.encode_utf16(&mut buf)[0]
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// An input event delivered to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    /// A primary-button click anywhere on the surface.
    Click,
}

// ---------------------------------------------------------------------------
// Echo
// ---------------------------------------------------------------------------

/// The text element that captures keyboard input.
///
/// Its content is cleared once after every dispatched key so typed text
/// never accumulates; clicks move focus to it without scrolling.
pub trait Echo {
    fn clear(&mut self);
    fn focus(&mut self);
}

/// An echo for environments without a text element.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEcho;

impl Echo for NoEcho {
    fn clear(&mut self) {}
    fn focus(&mut self) {}
}

impl<T: Echo + ?Sized> Echo for &mut T {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn focus(&mut self) {
        (**self).focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys() {
        assert_eq!(Key::from_dom("a"), Key::Char('a'));
        assert_eq!(Key::from_dom(" "), Key::Char(' '));
        assert_eq!(Key::from_dom("é"), Key::Char('é'));
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom("F5"), Key::Other("F5".into()));
        assert_eq!(Key::from_dom("Shift"), Key::Other("Shift".into()));
    }

    #[test]
    fn utf16_first_unit() {
        assert_eq!(utf16_unit('A'), 65);
        assert_eq!(utf16_unit('é'), 0xE9);
        assert_eq!(utf16_unit('😀'), 0xD83D);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn key_serde_round_trip() {
        let json = serde_json::to_string(&Key::Char('x')).unwrap();
        assert_eq!(serde_json::from_str::<Key>(&json).unwrap(), Key::Char('x'));
    }
}
