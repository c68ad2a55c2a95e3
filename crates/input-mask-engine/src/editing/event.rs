use serde::{Deserialize, Serialize};

/// Keys the reducer reacts to on key-down. Everything else is `Other` and
/// passes through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Backspace,
    Delete,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Other(u32),
}

impl Key {
    /// Translate a legacy DOM `keyCode`.
    pub fn from_code(code: u32) -> Self {
        match code {
            8 => Key::Backspace,
            46 => Key::Delete,
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            other => Key::Other(other),
        }
    }

    pub fn is_deletion(self) -> bool {
        matches!(self, Key::Backspace | Key::Delete)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(self) -> bool {
        self.alt || self.ctrl
    }
}

/// Host selection in display space. `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection, ordering the ends so `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer placed the caret or selected a range.
    Click { selection: Selection },
    /// Key went down while the field had `selection`.
    KeyDown { key: Key, selection: Selection },
    /// A character was typed. Follows the `KeyDown` for the same key.
    KeyPress { ch: char, modifiers: Modifiers },
    /// Raw field content once a paste has landed.
    Paste { content: String },
    /// Field lost focus.
    Blur,
}

impl InputEvent {
    /// Unmodified key press of `ch`.
    pub fn typed(ch: char) -> Self {
        InputEvent::KeyPress {
            ch,
            modifiers: Modifiers::none(),
        }
    }

    pub fn key_down(key: Key, at: usize) -> Self {
        InputEvent::KeyDown {
            key,
            selection: Selection::collapsed(at),
        }
    }

    pub fn click(at: usize) -> Self {
        InputEvent::Click {
            selection: Selection::collapsed(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, Key::Backspace)]
    #[case(46, Key::Delete)]
    #[case(37, Key::ArrowLeft)]
    #[case(38, Key::ArrowUp)]
    #[case(39, Key::ArrowRight)]
    #[case(40, Key::ArrowDown)]
    #[case(9, Key::Other(9))]
    #[case(65, Key::Other(65))]
    fn test_key_from_dom_code(#[case] code: u32, #[case] key: Key) {
        assert_eq!(Key::from_code(code), key);
    }

    #[test]
    fn test_only_backspace_and_delete_are_deletions() {
        assert!(Key::Backspace.is_deletion());
        assert!(Key::Delete.is_deletion());
        assert!(!Key::ArrowLeft.is_deletion());
        assert!(!Key::Other(8).is_deletion());
    }

    #[test]
    fn test_selection_orders_ends() {
        let selection = Selection::new(7, 2);
        assert_eq!(selection, Selection { start: 2, end: 7 });
        assert!(!selection.is_collapsed());
        assert!(Selection::collapsed(3).is_collapsed());
    }

    #[test]
    fn test_modifiers_any() {
        assert!(!Modifiers::none().any());
        assert!(Modifiers { alt: true, ctrl: false }.any());
        assert!(Modifiers { alt: false, ctrl: true }.any());
    }
}
