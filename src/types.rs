//! Core data model: landmarks, hands, snapshots, and the event vocabulary
//! emitted by the gesture machines.

use std::time::Instant;

/// One of the 21 MediaPipe hand landmarks, normalised to the image frame.
///
/// `x`/`y` are in `[0, 1]` with the origin at the top-left of the frame,
/// increasing right/down. `z` is relative depth with the wrist as reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Which of the user's hands a [`Hand`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

/// Well-known landmark indices, named the way the MediaPipe hand topology
/// documents them.
pub mod landmark_index {
    pub const WRIST: usize = 0;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    pub const NUM_LANDMARKS: usize = 21;
}

/// A single tracked hand: 21 landmarks plus the tracker's handedness label
/// and confidence score.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub label: Handedness,
    pub score: f32,
    pub landmarks: [Landmark; landmark_index::NUM_LANDMARKS],
}

impl Hand {
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.landmark(landmark_index::THUMB_TIP)
    }

    pub fn index_tip(&self) -> Landmark {
        self.landmark(landmark_index::INDEX_TIP)
    }

    pub fn fingertips(&self) -> [Landmark; 5] {
        use landmark_index::*;
        [
            self.landmark(THUMB_TIP),
            self.landmark(INDEX_TIP),
            self.landmark(MIDDLE_TIP),
            self.landmark(RING_TIP),
            self.landmark(PINKY_TIP),
        ]
    }
}

/// An immutable per-frame snapshot of zero, one, or two tracked hands.
///
/// `t` is a monotonic-clock timestamp in seconds; successive snapshots are
/// not assumed to be regularly spaced.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub hands: Vec<Hand>,
}

impl Snapshot {
    pub fn new(t: f64, hands: Vec<Hand>) -> Self {
        Self { t, hands }
    }

    pub fn empty(t: f64) -> Self {
        Self { t, hands: Vec::new() }
    }

    /// The hand the tracker reported with the single highest confidence
    /// score, ties broken by tracker order. See DESIGN.md, Open Question (a).
    pub fn primary_hand(&self) -> Option<&Hand> {
        self.hands
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(ib.cmp(ia))
            })
            .map(|(_, hand)| hand)
    }

    pub fn hand_with_label(&self, label: Handedness) -> Option<&Hand> {
        self.hands.iter().find(|h| h.label == label)
    }
}

/// A discrete action produced by a gesture machine. Events flow only
/// forward (arbiter -> dispatcher -> backend); machines never observe each
/// other's events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Move(i32, i32),
    Click,
    PinchStart,
    PinchEnd,
    Scroll(f32),
    Screenshot,
    CtrlLeft,
    CtrlRight,
    Copy,
    Paste,
    Stop,
    Resume,
}

/// A monotonic timestamp source, so gesture machines and the cursor mapper
/// never read wall-clock time directly. Production code uses
/// [`MonotonicClock`]; tests can substitute a fixed/advancing fake.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(label: Handedness, score: f32) -> Hand {
        Hand {
            label,
            score,
            landmarks: [Landmark::new(0.0, 0.0, 0.0); landmark_index::NUM_LANDMARKS],
        }
    }

    #[test]
    fn primary_hand_picks_highest_confidence() {
        let snap = Snapshot::new(
            0.0,
            vec![hand(Handedness::Left, 0.4), hand(Handedness::Right, 0.9)],
        );
        assert_eq!(snap.primary_hand().unwrap().label, Handedness::Right);
    }

    #[test]
    fn primary_hand_ties_keep_first() {
        let snap = Snapshot::new(
            0.0,
            vec![hand(Handedness::Left, 0.5), hand(Handedness::Right, 0.5)],
        );
        assert_eq!(snap.primary_hand().unwrap().label, Handedness::Left);
    }

    #[test]
    fn primary_hand_none_when_empty() {
        let snap = Snapshot::empty(0.0);
        assert!(snap.primary_hand().is_none());
    }
}
