//! Translates the absolute-coordinate [`InputBackend`] interface into the
//! signed-byte relative-delta HID mouse reports a Bluetooth host expects.
//! Grounded on SPEC_FULL.md §4.6's "HID peripheral backend" paragraph.

use crate::backend::{InputBackend, Key, Modifier};
use crate::error::BackendError;
use crate::hid::report::{keycode, modifier as hid_modifier, KeyboardReport, MouseButtons, MouseReport};
use crate::hid::HidTransport;

const STEP_LIMIT: i32 = 127;
/// Gap between a keyboard down-report and its release, kept well under
/// the dispatcher's 100ms budget for `chord()` (§5).
const CHORD_RELEASE_DELAY: std::time::Duration = std::time::Duration::from_millis(20);

pub struct HidBackend<T: HidTransport> {
    transport: T,
    last_pos: Option<(i32, i32)>,
    buttons: MouseButtons,
}

impl<T: HidTransport> HidBackend<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, last_pos: None, buttons: MouseButtons::empty() }
    }

    fn send_mouse(&mut self, dx: i8, dy: i8, wheel: i8) -> Result<(), BackendError> {
        let report = MouseReport { buttons: self.buttons, dx, dy, wheel };
        self.transport.send_interrupt(&report.encode())
    }

    /// Emits one or more mouse reports whose deltas sum to `(total_dx,
    /// total_dy)`, each report's per-axis delta clamped into
    /// `[-127, 127]`.
    fn step_move(&mut self, total_dx: i32, total_dy: i32) -> Result<(), BackendError> {
        let mut remaining_x = total_dx;
        let mut remaining_y = total_dy;

        if remaining_x == 0 && remaining_y == 0 {
            // Button-state-only report; still send so the host sees the
            // change even with zero motion.
            return self.send_mouse(0, 0, 0);
        }

        while remaining_x != 0 || remaining_y != 0 {
            let step_x = remaining_x.clamp(-STEP_LIMIT, STEP_LIMIT);
            let step_y = remaining_y.clamp(-STEP_LIMIT, STEP_LIMIT);
            self.send_mouse(step_x as i8, step_y as i8, 0)?;
            remaining_x -= step_x;
            remaining_y -= step_y;
        }
        Ok(())
    }

    fn send_keyboard_chord(&mut self, modifiers: u8, key: u8) -> Result<(), BackendError> {
        let down = KeyboardReport::chord(modifiers, key);
        self.transport.send_interrupt(&down.encode())?;
        std::thread::sleep(CHORD_RELEASE_DELAY);
        self.transport.send_interrupt(&KeyboardReport::RELEASE.encode())
    }

    fn hid_modifiers(modifiers: &[Modifier]) -> u8 {
        modifiers.iter().fold(0u8, |acc, m| {
            acc | match m {
                Modifier::Control => hid_modifier::LEFT_CTRL,
                Modifier::Shift => hid_modifier::LEFT_SHIFT,
                Modifier::Super => hid_modifier::LEFT_SUPER,
            }
        })
    }

    fn hid_keycode(key: Key) -> u8 {
        match key {
            Key::Char('c') | Key::Char('C') => keycode::C,
            Key::Char('v') | Key::Char('V') => keycode::V,
            Key::Char('3') => keycode::NUM_3,
            Key::Char(_) => 0,
            Key::ArrowLeft => keycode::ARROW_LEFT,
            Key::ArrowRight => keycode::ARROW_RIGHT,
        }
    }
}

impl<T: HidTransport> InputBackend for HidBackend<T> {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BackendError> {
        let (last_x, last_y) = self.last_pos.unwrap_or((x, y));
        self.last_pos = Some((x, y));
        self.step_move(x - last_x, y - last_y)
    }

    fn left_down(&mut self) -> Result<(), BackendError> {
        self.buttons.insert(MouseButtons::LEFT);
        self.send_mouse(0, 0, 0)
    }

    fn left_up(&mut self) -> Result<(), BackendError> {
        self.buttons.remove(MouseButtons::LEFT);
        self.send_mouse(0, 0, 0)
    }

    fn click_left(&mut self) -> Result<(), BackendError> {
        self.left_down()?;
        self.left_up()
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
        let _ = dx;
        let wheel = dy.clamp(-STEP_LIMIT, STEP_LIMIT) as i8;
        self.send_mouse(0, 0, wheel)
    }

    fn chord(&mut self, modifiers: &[Modifier], key: Key) -> Result<(), BackendError> {
        self.send_keyboard_chord(Self::hid_modifiers(modifiers), Self::hid_keycode(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::RecordingTransport;

    fn decode_mouse(bytes: &[u8]) -> (u8, i8, i8, i8) {
        (bytes[2], bytes[3] as i8, bytes[4] as i8, bytes[5] as i8)
    }

    #[test]
    fn small_move_emits_single_report() {
        let mut backend = HidBackend::new(RecordingTransport::default());
        backend.move_to(100, 100).unwrap();
        backend.move_to(105, 95).unwrap();
        assert_eq!(backend.transport.sent.len(), 2);
        let (_, dx, dy, _) = decode_mouse(&backend.transport.sent[1]);
        assert_eq!((dx, dy), (5, -5));
    }

    #[test]
    fn large_move_steps_across_multiple_reports() {
        let mut backend = HidBackend::new(RecordingTransport::default());
        backend.move_to(0, 0).unwrap();
        backend.move_to(300, 0).unwrap();
        // 300 needs two reports: 127 + 127 + 46.
        let reports = &backend.transport.sent[1..];
        assert_eq!(reports.len(), 3);
        let total: i32 = reports.iter().map(|r| decode_mouse(r).1 as i32).sum();
        assert_eq!(total, 300);
        for r in reports {
            let (_, dx, _, _) = decode_mouse(r);
            assert!((-127..=127).contains(&(dx as i32)));
        }
    }

    #[test]
    fn left_down_sets_button_bit_even_with_zero_motion() {
        let mut backend = HidBackend::new(RecordingTransport::default());
        backend.left_down().unwrap();
        let (buttons, dx, dy, _) = decode_mouse(&backend.transport.sent[0]);
        assert_eq!(buttons & MouseButtons::LEFT.bits(), MouseButtons::LEFT.bits());
        assert_eq!((dx, dy), (0, 0));
    }

    #[test]
    fn chord_sends_down_then_all_zero_release() {
        let mut backend = HidBackend::new(RecordingTransport::default());
        backend.chord(&[Modifier::Super], Key::Char('c')).unwrap();
        assert_eq!(backend.transport.sent.len(), 2);
        assert_eq!(backend.transport.sent[0][2], hid_modifier::LEFT_SUPER);
        assert_eq!(backend.transport.sent[0][4], keycode::C);
        assert_eq!(&backend.transport.sent[1][2..], [0u8; 8]);
    }
}
