//! Directly drives the OS pointer and keyboard via `enigo`. Feature-gated
//! behind `local-backend`, the default for a desktop build.

use crate::backend::{InputBackend, Key, Modifier};
use crate::error::BackendError;
use enigo::{
    Axis, Coordinate, Direction, Enigo, Key as EnigoKey, Keyboard, Mouse, Settings,
};

pub struct LocalBackend {
    enigo: Enigo,
}

impl LocalBackend {
    pub fn new() -> Result<Self, BackendError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        Ok(Self { enigo })
    }

    fn to_enigo_key(modifier: Modifier) -> EnigoKey {
        match modifier {
            Modifier::Control => EnigoKey::Control,
            Modifier::Shift => EnigoKey::Shift,
            Modifier::Super => EnigoKey::Meta,
        }
    }

    fn non_modifier_key(key: Key) -> EnigoKey {
        match key {
            Key::Char(c) => EnigoKey::Unicode(c),
            Key::ArrowLeft => EnigoKey::LeftArrow,
            Key::ArrowRight => EnigoKey::RightArrow,
        }
    }
}

impl InputBackend for LocalBackend {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BackendError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))
    }

    fn left_down(&mut self) -> Result<(), BackendError> {
        self.enigo
            .button(enigo::Button::Left, Direction::Press)
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))
    }

    fn left_up(&mut self) -> Result<(), BackendError> {
        self.enigo
            .button(enigo::Button::Left, Direction::Release)
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))
    }

    fn click_left(&mut self) -> Result<(), BackendError> {
        self.enigo
            .button(enigo::Button::Left, Direction::Click)
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
        if dx != 0 {
            self.enigo
                .scroll(dx, Axis::Horizontal)
                .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        }
        if dy != 0 {
            self.enigo
                .scroll(dy, Axis::Vertical)
                .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        }
        Ok(())
    }

    fn chord(&mut self, modifiers: &[Modifier], key: Key) -> Result<(), BackendError> {
        let enigo_modifiers: Vec<EnigoKey> = modifiers.iter().copied().map(Self::to_enigo_key).collect();
        let enigo_key = Self::non_modifier_key(key);

        for m in &enigo_modifiers {
            self.enigo
                .key(*m, Direction::Press)
                .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        }
        self.enigo
            .key(enigo_key, Direction::Click)
            .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        for m in enigo_modifiers.iter().rev() {
            self.enigo
                .key(*m, Direction::Release)
                .map_err(|e| BackendError::CapabilityUnavailable(e.to_string()))?;
        }
        Ok(())
    }
}
