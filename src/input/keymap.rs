//! Key mapping for window input
//!
//! Converts looked-up key presses into the integer codes `wait` returns.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a press
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const LOCK  = 0b0010;
        const CTRL  = 0b0100;
        const ALT   = 0b1000;
    }
}

impl Modifiers {
    /// Convert an X11 key/button `state` field
    pub fn from_x11_state(state: u32) -> Self {
        let mut result = Modifiers::empty();
        if state & 0x01 != 0 {
            result |= Modifiers::SHIFT;
        }
        if state & 0x02 != 0 {
            result |= Modifiers::LOCK;
        }
        if state & 0x04 != 0 {
            result |= Modifiers::CTRL;
        }
        // Mod1
        if state & 0x08 != 0 {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// A key press after the native lookup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPress {
    /// Pointer position inside the window
    pub x: i32,
    pub y: i32,
    /// Bytes the input method produced for the key, possibly empty
    pub text: Vec<u8>,
    /// Native key symbol
    pub keysym: u32,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(x: i32, y: i32, text: &[u8], keysym: u32) -> Self {
        Self {
            x,
            y,
            text: text.to_vec(),
            keysym,
            modifiers: Modifiers::empty(),
        }
    }
}

/// First navigation key code
pub const NAV_CODE_BASE: u32 = 129;

/// Navigation keys, in native keysym order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Home,
    Left,
    Up,
    Right,
    Down,
    PageUp,
    PageDown,
    End,
    Begin,
}

impl NavKey {
    const FIRST: u32 = 0xff50;
    const LAST: u32 = 0xff58;

    const ALL: [NavKey; 9] = [
        NavKey::Home,
        NavKey::Left,
        NavKey::Up,
        NavKey::Right,
        NavKey::Down,
        NavKey::PageUp,
        NavKey::PageDown,
        NavKey::End,
        NavKey::Begin,
    ];

    pub fn from_keysym(keysym: u32) -> Option<Self> {
        if (Self::FIRST..=Self::LAST).contains(&keysym) {
            Some(Self::ALL[(keysym - Self::FIRST) as usize])
        } else {
            None
        }
    }

    pub fn keysym(self) -> u32 {
        Self::FIRST + self as u32
    }

    /// Code returned by `wait`: 129 for Home through 137 for Begin
    pub fn code(self) -> u32 {
        NAV_CODE_BASE + self as u32
    }
}

/// Key mapper for converting key presses to wait codes
pub struct KeyMapper;

impl KeyMapper {
    /// Map a key press to a code, or `None` when the key has no code
    pub fn map(key: &KeyPress) -> Option<u32> {
        // A single byte from the lookup wins over the keysym
        if let [byte] = key.text.as_slice() {
            return Some(u32::from(*byte));
        }

        NavKey::from_keysym(key.keysym).map(NavKey::code)
    }
}
