//! Input handling.
//!
//! - **keymap**: key press to return-code mapping (printable bytes, navigation keys)
//! - **translator**: native event classification for the waiting loop

pub mod keymap;
pub mod translator;

pub use keymap::{KeyMapper, KeyPress, Modifiers, NavKey, NAV_CODE_BASE};
pub use translator::{classify, Action, Position, Translation};
