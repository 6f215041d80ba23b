//! FILENAME: table-core/src/event.rs
//! UI events delivered to toggle handlers.

/// The parts of a checkbox or click event the engine reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleEvent {
    /// The checkbox state after the click, when the event came from one.
    pub checked: Option<bool>,
    pub shift_key: bool,
}

impl ToggleEvent {
    pub fn click() -> Self {
        ToggleEvent::default()
    }

    pub fn checked(checked: bool) -> Self {
        ToggleEvent {
            checked: Some(checked),
            shift_key: false,
        }
    }

    pub fn shift_click() -> Self {
        ToggleEvent {
            checked: None,
            shift_key: true,
        }
    }
}

/// A closure suitable for binding straight to a UI control.
pub type EventHandler = Box<dyn Fn(&ToggleEvent)>;
