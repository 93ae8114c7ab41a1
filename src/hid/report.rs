//! Fixed HID report descriptor and report encoders for the two collections
//! this peripheral advertises: Report ID 1 (mouse) and Report ID 2
//! (keyboard). Byte-for-byte grounded on the descriptor in
//! `backend/input/bluetooth_service.py`.

/// Usage Page (Generic Desktop) / Mouse collection with Report ID 1,
/// followed by a Usage Page (Generic Desktop) / Keyboard collection with
/// Report ID 2. BlueZ expects this exact byte sequence in the SDP record's
/// `0x0206` attribute.
#[rustfmt::skip]
pub const HID_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, 0x09, 0x02, 0xa1, 0x01, 0x85, 0x01, 0x09, 0x01, 0xa1, 0x00,
    0x05, 0x09, 0x19, 0x01, 0x29, 0x03, 0x15, 0x00, 0x25, 0x01, 0x95, 0x03,
    0x75, 0x01, 0x81, 0x02, 0x95, 0x01, 0x75, 0x05, 0x81, 0x03, 0x05, 0x01,
    0x09, 0x30, 0x09, 0x31, 0x09, 0x38, 0x15, 0x81, 0x25, 0x7f, 0x75, 0x08,
    0x95, 0x03, 0x81, 0x06, 0xc0, 0xc0,

    0x05, 0x01, 0x09, 0x06, 0xa1, 0x01, 0x85, 0x02, 0x05, 0x07, 0x19, 0xe0,
    0x29, 0xe7, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x08, 0x81, 0x02,
    0x95, 0x01, 0x75, 0x08, 0x81, 0x01, 0x95, 0x05, 0x75, 0x01, 0x05, 0x08,
    0x19, 0x01, 0x29, 0x05, 0x91, 0x02, 0x95, 0x01, 0x75, 0x03, 0x91, 0x01,
    0x95, 0x06, 0x75, 0x08, 0x15, 0x00, 0x25, 0x65, 0x05, 0x07, 0x19, 0x00,
    0x29, 0x65, 0x81, 0x00, 0xc0,
];

pub const REPORT_ID_MOUSE: u8 = 0x01;
pub const REPORT_ID_KEYBOARD: u8 = 0x02;

/// `0xA1` = DATA | INPUT framing byte BlueZ's HID transport prepends to
/// every report sent on the interrupt channel.
const HIDP_DATA_INPUT: u8 = 0xa1;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const LEFT = 0b0000_0001;
        const RIGHT = 0b0000_0010;
        const MIDDLE = 0b0000_0100;
    }
}

/// One mouse input report: buttons bitmask plus signed-byte relative
/// x/y/wheel deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseReport {
    pub buttons: MouseButtons,
    pub dx: i8,
    pub dy: i8,
    pub wheel: i8,
}

impl MouseReport {
    /// Encodes this report with the `0xA1 DATA|INPUT` framing byte and
    /// Report ID 1 prefix, ready to write to the interrupt L2CAP channel.
    pub fn encode(&self) -> [u8; 6] {
        [HIDP_DATA_INPUT, REPORT_ID_MOUSE, self.buttons.bits(), self.dx as u8, self.dy as u8, self.wheel as u8]
    }
}

/// One keyboard input report: eight modifier bits followed by a reserved
/// byte and six keycode slots (BIOS boot-protocol layout).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardReport {
    pub const RELEASE: KeyboardReport = KeyboardReport { modifiers: 0, keys: [0; 6] };

    pub fn chord(modifiers: u8, key: u8) -> Self {
        let mut keys = [0u8; 6];
        keys[0] = key;
        Self { modifiers, keys }
    }

    pub fn encode(&self) -> [u8; 10] {
        let mut out = [0u8; 10];
        out[0] = HIDP_DATA_INPUT;
        out[1] = REPORT_ID_KEYBOARD;
        out[2] = self.modifiers;
        out[3] = 0; // reserved
        out[4..10].copy_from_slice(&self.keys);
        out
    }
}

/// USB HID modifier bit positions, usage page 0x07.
pub mod modifier {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_SUPER: u8 = 0x08;
}

/// USB HID keyboard usage IDs used by this crate's chords.
pub mod keycode {
    pub const C: u8 = 0x06;
    pub const V: u8 = 0x19;
    pub const NUM_3: u8 = 0x20;
    pub const ARROW_LEFT: u8 = 0x50;
    pub const ARROW_RIGHT: u8 = 0x4f;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_report_encodes_framing_and_report_id() {
        let report = MouseReport { buttons: MouseButtons::LEFT, dx: -5, dy: 10, wheel: 0 };
        let bytes = report.encode();
        assert_eq!(bytes[0], 0xa1);
        assert_eq!(bytes[1], REPORT_ID_MOUSE);
        assert_eq!(bytes[2], MouseButtons::LEFT.bits());
        assert_eq!(bytes[3] as i8, -5);
        assert_eq!(bytes[4] as i8, 10);
    }

    #[test]
    fn keyboard_chord_and_release_roundtrip_keycode() {
        let chord = KeyboardReport::chord(modifier::LEFT_SUPER, keycode::C);
        let bytes = chord.encode();
        assert_eq!(bytes[0], 0xa1);
        assert_eq!(bytes[1], REPORT_ID_KEYBOARD);
        assert_eq!(bytes[2], modifier::LEFT_SUPER);
        assert_eq!(bytes[4], keycode::C);

        let release = KeyboardReport::RELEASE.encode();
        assert_eq!(&release[2..], [0u8; 8]);
    }

    #[test]
    fn descriptor_declares_both_report_ids() {
        assert!(HID_REPORT_DESCRIPTOR.windows(2).any(|w| w == [0x85, 0x01]));
        assert!(HID_REPORT_DESCRIPTOR.windows(2).any(|w| w == [0x85, 0x02]));
    }
}
