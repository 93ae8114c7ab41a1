//! Seven independent gesture detectors, each a pure state machine over a
//! stream of [`Snapshot`]s. A machine is a deterministic function of its own
//! state plus the current snapshot; machines never observe each other's
//! output, and ordering of events emitted within one `update` call is not
//! significant.

pub mod copy_paste;
pub mod frame;
pub mod palm_arrow;
pub mod pinch;
pub mod scroll;
pub mod stop_resume;
pub mod swipe;

pub use copy_paste::CopyPasteMachine;
pub use frame::FrameMachine;
pub use palm_arrow::PalmArrowMachine;
pub use pinch::PinchMachine;
pub use scroll::ScrollMachine;
pub use stop_resume::StopResumeMachine;
pub use swipe::SwipeMachine;

use crate::types::{Event, Hand, Snapshot};

/// Common interface satisfied by every gesture detector.
pub trait GestureMachine {
    /// Feeds one snapshot and returns the events it produces, if any.
    fn update(&mut self, snapshot: &Snapshot) -> Vec<Event>;
}

/// Single-hand gesture machines only ever look at one [`Hand`]; this trait
/// lets the arbiter drive them against whichever hand it has selected as
/// primary without re-deriving that selection in each machine.
pub trait SingleHandGestureMachine {
    fn update_hand(&mut self, t: f64, hand: Option<&Hand>) -> Vec<Event>;
}
