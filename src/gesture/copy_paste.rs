//! Copy (bundled fingertips) and paste (spread fingertips) share a single
//! candidate field: switching shape mid-hold cancels the pending gesture
//! rather than running two independent timers. Grounded on
//! `backend/gestures/copy.py` and `backend/gestures/paste.py`.

use crate::error::ConfigError;
use crate::geometry::{centroid, dist3, finger_extended, hand_openness};
use crate::gesture::SingleHandGestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Hand};

#[derive(Clone, Copy, Debug)]
pub struct CopyPasteConfig {
    pub bundle_radius: f32,
    pub open_thr: f32,
    pub spread_min_dist: f32,
    pub hold_duration: f64,
}

impl Default for CopyPasteConfig {
    fn default() -> Self {
        Self { bundle_radius: 0.06, open_thr: 0.18, spread_min_dist: 0.08, hold_duration: 0.4 }
    }
}

impl CopyPasteConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.hold_duration < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "hold_duration",
                reason: "hold_duration must be non-negative".into(),
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Candidate {
    None,
    Copy { start_t: f64 },
    Paste { start_t: f64 },
}

#[derive(Clone, Debug)]
pub struct CopyPasteMachine {
    config: CopyPasteConfig,
    candidate: Candidate,
}

impl CopyPasteMachine {
    pub fn new(config: CopyPasteConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, candidate: Candidate::None })
    }

    fn is_bundled(&self, hand: &Hand) -> bool {
        let tips = hand.fingertips();
        let points: Vec<(f32, f32)> = tips.iter().map(|t| (t.x, t.y)).collect();
        let (cx, cy) = centroid(&points);
        tips.iter().all(|t| {
            let dx = t.x - cx;
            let dy = t.y - cy;
            (dx * dx + dy * dy).sqrt() <= self.config.bundle_radius
        })
    }

    fn is_spread(&self, hand: &Hand) -> bool {
        let all_extended = [
            (THUMB_TIP, THUMB_IP),
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ]
        .iter()
        .all(|&(tip, pip)| finger_extended(hand.landmark(tip), hand.landmark(pip), 0.0));

        let tips = hand.fingertips();
        let pairs_spread = tips
            .windows(2)
            .all(|w| dist3(w[0], w[1]) >= self.config.spread_min_dist);

        all_extended && hand_openness(hand) > self.config.open_thr && pairs_spread
    }
}

impl SingleHandGestureMachine for CopyPasteMachine {
    fn update_hand(&mut self, t: f64, hand: Option<&Hand>) -> Vec<Event> {
        let Some(hand) = hand else {
            self.candidate = Candidate::None;
            return Vec::new();
        };

        let bundled = self.is_bundled(hand);
        let spread = self.is_spread(hand);

        let mut events = Vec::new();

        self.candidate = match (self.candidate, bundled, spread) {
            (Candidate::Copy { start_t }, true, _) => {
                if t - start_t >= self.config.hold_duration {
                    events.push(Event::Copy);
                    Candidate::None
                } else {
                    Candidate::Copy { start_t }
                }
            }
            (Candidate::Paste { start_t }, _, true) => {
                if t - start_t >= self.config.hold_duration {
                    events.push(Event::Paste);
                    Candidate::None
                } else {
                    Candidate::Paste { start_t }
                }
            }
            (_, true, _) => Candidate::Copy { start_t: t },
            (_, _, true) => Candidate::Paste { start_t: t },
            _ => Candidate::None,
        };

        events
    }
}
