//! Turns a camera-observed hand into host pointer/keyboard input: 21
//! landmarks in, HID or local-OS events out, with a companion session
//! relay for clipboard sharing between peers.
//!
//! See `SPEC_FULL.md` for the full component breakdown; `DESIGN.md` for
//! where each piece of this crate is grounded.

pub mod arbiter;
pub mod backend;
pub mod clipboard;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hid;
pub mod relay;
pub mod tracker;
pub mod types;

pub use arbiter::{Arbiter, ArbiterConfig};
pub use config::AppConfig;
pub use dispatcher::Dispatcher;
pub use error::HandpilotError;
pub use types::{Clock, Event, Hand, Handedness, Landmark, MonotonicClock, Snapshot};
