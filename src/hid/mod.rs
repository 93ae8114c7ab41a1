//! HID report framing and the L2CAP transport a paired host receives them
//! over (§4.7/§6 HID wire boundary).

pub mod report;
pub mod transport;

pub use report::{KeyboardReport, MouseButtons, MouseReport, HID_REPORT_DESCRIPTOR};
pub use transport::{HidTransport, RecordingTransport, PSM_CONTROL, PSM_INTERRUPT};
