//! Keyboard input as the host reports it.

/// Modifier keys held while an input arrives.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift. Turns wheel scrolling horizontal.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt.
    pub alt: bool,
}

impl Mods {
    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Is any modifier held?
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Keys the core and its containers distinguish. Everything else arrives
/// as a character.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyCode {
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
    /// Enter or return.
    Enter,
    /// Escape.
    Esc,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// A character key.
    Char(char),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A key code with the modifiers held when it was pressed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifiers.
    pub mods: Mods,
    /// The key.
    pub key: KeyCode,
}

impl Key {
    /// A key pressed with modifiers.
    pub fn with(mods: Mods, key: KeyCode) -> Self {
        Self { mods, key }
    }
}

impl From<KeyCode> for Key {
    fn from(key: KeyCode) -> Self {
        Self::with(Mods::default(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_carry_no_modifiers() {
        let k = Key::from(KeyCode::from('a'));
        assert_eq!(k.key, KeyCode::Char('a'));
        assert!(!k.mods.any());
        let k = Key::with(Mods::SHIFT, KeyCode::Home);
        assert!(k.mods.shift && k.mods.any());
    }
}
