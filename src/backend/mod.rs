//! The capability set both input backends satisfy (§4.6), expressed as a
//! trait object so the dispatcher can own either one behind
//! `Box<dyn InputBackend + Send>` without knowing which at compile time —
//! mirrors the teacher's `HandposeEngine` seam for swappable backends.

#[cfg(feature = "local-backend")]
pub mod local;
#[cfg(feature = "hid-peripheral")]
pub mod hid;

use crate::error::BackendError;

/// A keyboard modifier, used with [`InputBackend::chord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    Control,
    Shift,
    Super,
}

/// A non-modifier key used in a chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowLeft,
    ArrowRight,
}

pub trait InputBackend {
    /// Moves the pointer to absolute screen coordinates.
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BackendError>;
    fn left_down(&mut self) -> Result<(), BackendError>;
    fn left_up(&mut self) -> Result<(), BackendError>;
    fn click_left(&mut self) -> Result<(), BackendError>;
    /// Scrolls by `(dx, dy)`; positive `dy` scrolls up.
    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), BackendError>;
    /// Presses `modifiers` + `key` and releases them before returning.
    fn chord(&mut self, modifiers: &[Modifier], key: Key) -> Result<(), BackendError>;
}
