//! Keystrokes: a key code plus the modifiers held with it.
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a keystroke.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt.
        const ALT = 1 << 2;
    }
}

/// Logical key codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter/return key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Shift + Tab key.
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// No key. Used as the trigger for signals raised outside input handling.
    Null,
    /// Escape key.
    Esc,
    /// Function key `F(n)`.
    F(u8),
    /// A character.
    Char(char),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// A keystroke with modifiers.
    pub fn new(mods: Mods, key: impl Into<KeyCode>) -> Self {
        Self {
            mods,
            key: key.into(),
        }
    }

    /// A control-modified character.
    pub const fn ctrl(c: char) -> Self {
        Self {
            mods: Mods::CTRL,
            key: KeyCode::Char(c),
        }
    }

    /// An unmodified key code.
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            mods: Mods::empty(),
            key,
        }
    }

    /// The printable character carried by this key, if it has no control or
    /// alt modifier.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            KeyCode::Char(c)
                if !self.mods.intersects(Mods::CTRL | Mods::ALT) && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Fold shift into the character it produces, so a binding for `A`
    /// matches both shift+a and shift+A. Shift is kept on non-character keys
    /// and on space.
    ///
    /// | input             | normalized       |
    /// |-------------------|------------------|
    /// | shift + a         | A                |
    /// | shift + )         | )                |
    /// | shift + space     | shift + space    |
    /// | shift + enter     | shift + enter    |
    /// | shift + ctrl + a  | ctrl + A         |
    pub fn normalize(&self) -> Self {
        match self.key {
            KeyCode::Char(c) if c != ' ' && self.mods.contains(Mods::SHIFT) => Self {
                mods: self.mods - Mods::SHIFT,
                key: KeyCode::Char(c.to_ascii_uppercase()),
            },
            _ => *self,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [(Mods::CTRL, "ctrl"), (Mods::ALT, "alt"), (Mods::SHIFT, "shift")] {
            if self.mods.contains(flag) {
                write!(f, "{name}-")?;
            }
        }
        match self.key {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            k => write!(f, "{k:?}"),
        }
    }
}

impl PartialEq<KeyCode> for Key {
    /// Only unmodified keys compare equal to a bare key code.
    fn eq(&self, c: &KeyCode) -> bool {
        self.mods.is_empty() && *c == self.key
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        *self == KeyCode::Char(*c)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Self::plain(c)
    }
}

/// Named input codes shared by every widget.
pub mod keys {
    use super::{Key, KeyCode};

    /// Cancels the current interaction.
    pub const CANCEL: Key = Key::plain(KeyCode::Esc);
    /// Commits the current interaction.
    pub const RETURN: Key = Key::plain(KeyCode::Enter);
    /// Commits, or moves to the next field.
    pub const TAB: Key = Key::plain(KeyCode::Tab);
    /// Replace the current value with the paste buffer.
    pub const PASTE: Key = Key::ctrl('v');
    /// Copy the current value into the paste buffer.
    pub const COPY: Key = Key::ctrl('y');
    /// Copy the current value into the paste buffer and clear it.
    pub const CUT: Key = Key::ctrl('x');
    /// Clear the current value.
    pub const ERASE: Key = Key::ctrl('u');
    /// Swap the character under the cursor with the next one.
    pub const TRANSPOSE: Key = Key::ctrl('t');
    /// Erase and redraw the whole screen.
    pub const REFRESH: Key = Key::ctrl('l');
    /// Move to the start of the line.
    pub const BEGIN_OF_LINE: Key = Key::ctrl('a');
    /// Move to the end of the line.
    pub const END_OF_LINE: Key = Key::ctrl('e');
    /// Page forward.
    pub const FORWARD: Key = Key::ctrl('f');
    /// Page backward.
    pub const BACKWARD: Key = Key::ctrl('b');
    /// Jump to a position.
    pub const JUMP: Key = Key::ctrl('g');
}
