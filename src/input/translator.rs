//! Event translation
//!
//! Reduces native events to what `wait` cares about: a code to return, a new
//! window size, or nothing.

use tracing::trace;

use super::keymap::KeyMapper;
use crate::core::display::NativeEvent;

/// Pointer position inside the window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// What an event asks the waiting loop to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Stop waiting and hand this code to the caller
    Return(u32),
    /// Record the new window size and keep waiting
    UpdateGeometry(u32, u32),
    /// Keep waiting
    Ignore,
}

/// Result of classifying one event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translation {
    /// Set for every key and button press, even an ignored one
    pub pointer: Option<Position>,
    pub action: Action,
}

impl Translation {
    fn ignore() -> Self {
        Self {
            pointer: None,
            action: Action::Ignore,
        }
    }
}

/// Classify a native event
pub fn classify(event: &NativeEvent) -> Translation {
    match event {
        NativeEvent::KeyPress(key) => {
            let pointer = Some(Position { x: key.x, y: key.y });
            let action = match KeyMapper::map(key) {
                Some(code) => {
                    trace!("key press code={} modifiers={:?}", code, key.modifiers);
                    Action::Return(code)
                }
                None => {
                    trace!(
                        "ignoring key press keysym=0x{:x} modifiers={:?}",
                        key.keysym, key.modifiers
                    );
                    Action::Ignore
                }
            };
            Translation { pointer, action }
        }
        NativeEvent::ButtonPress { x, y, button, modifiers } => {
            trace!("button press {} modifiers={:?}", button, modifiers);
            Translation {
                pointer: Some(Position { x: *x, y: *y }),
                action: Action::Return(*button),
            }
        }
        NativeEvent::Configure { width, height } => Translation {
            pointer: None,
            action: Action::UpdateGeometry(*width, *height),
        },
        NativeEvent::MapNotify | NativeEvent::Other(_) => Translation::ignore(),
    }
}

/// Whether `event_waiting` should report and restore this event
pub fn is_input(event: &NativeEvent) -> bool {
    matches!(event, NativeEvent::KeyPress(_) | NativeEvent::ButtonPress { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyPress, Modifiers};

    #[test]
    fn test_key_press_returns_code() {
        let event = NativeEvent::KeyPress(KeyPress::new(10, 20, b"x", 0x78));
        let t = classify(&event);
        assert_eq!(t.action, Action::Return(b'x' as u32));
        assert_eq!(t.pointer, Some(Position { x: 10, y: 20 }));
    }

    #[test]
    fn test_unresolved_key_records_pointer() {
        let event = NativeEvent::KeyPress(KeyPress::new(3, 4, b"", 0xffe3));
        let t = classify(&event);
        assert_eq!(t.action, Action::Ignore);
        assert_eq!(t.pointer, Some(Position { x: 3, y: 4 }));
    }

    #[test]
    fn test_button_press() {
        let event = NativeEvent::button(7, 9, 3);
        let t = classify(&event);
        assert_eq!(t.action, Action::Return(3));
        assert_eq!(t.pointer, Some(Position { x: 7, y: 9 }));
    }

    #[test]
    fn test_modifiers_do_not_change_codes() {
        let event = NativeEvent::ButtonPress {
            x: 1,
            y: 2,
            button: 2,
            modifiers: Modifiers::SHIFT | Modifiers::CTRL,
        };
        assert_eq!(classify(&event).action, Action::Return(2));

        let mut key = KeyPress::new(0, 0, b"A", 0x41);
        key.modifiers = Modifiers::SHIFT;
        assert_eq!(
            classify(&NativeEvent::KeyPress(key)).action,
            Action::Return(u32::from(b'A'))
        );
    }

    #[test]
    fn test_configure_updates_geometry() {
        let t = classify(&NativeEvent::Configure { width: 640, height: 480 });
        assert_eq!(t.action, Action::UpdateGeometry(640, 480));
        assert_eq!(t.pointer, None);
    }

    #[test]
    fn test_other_events_ignored() {
        assert_eq!(classify(&NativeEvent::MapNotify), Translation::ignore());
        assert_eq!(classify(&NativeEvent::Other(12)), Translation::ignore());
    }

    #[test]
    fn test_is_input() {
        assert!(is_input(&NativeEvent::KeyPress(KeyPress::default())));
        assert!(is_input(&NativeEvent::button(0, 0, 1)));
        assert!(!is_input(&NativeEvent::Configure { width: 1, height: 1 }));
        assert!(!is_input(&NativeEvent::MapNotify));
    }
}
