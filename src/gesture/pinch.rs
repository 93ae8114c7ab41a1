//! One-handed pinch: thumb-tip/index-tip distance with hysteresis and a
//! hold delay distinguishing a quick click from a sustained drag.
//!
//! Grounded on `backend/gestures/pinch.py` in the reference implementation;
//! the debounce branch (release within 50ms of entry) is this crate's
//! addition to keep a single finger-flicker from emitting a spurious click.

use crate::error::ConfigError;
use crate::geometry::dist3;
use crate::gesture::SingleHandGestureMachine;
use crate::types::Event;
use crate::types::Hand;

#[derive(Clone, Copy, Debug)]
pub struct PinchConfig {
    pub pinch_thr: f32,
    pub release_thr: f32,
    pub hold_delay: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self { pinch_thr: 0.045, release_thr: 0.06, hold_delay: 0.25 }
    }
}

impl PinchConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.release_thr < self.pinch_thr {
            return Err(ConfigError::OutOfRange {
                field: "release_thr",
                reason: "release_thr must be >= pinch_thr".into(),
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Pressing { start_t: f64 },
    Dragging,
}

#[derive(Clone, Debug)]
pub struct PinchMachine {
    config: PinchConfig,
    state: State,
}

impl PinchMachine {
    pub fn new(config: PinchConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, state: State::Idle })
    }
}

impl SingleHandGestureMachine for PinchMachine {
    fn update_hand(&mut self, t: f64, hand: Option<&Hand>) -> Vec<Event> {
        let Some(hand) = hand else {
            self.state = State::Idle;
            return Vec::new();
        };

        let d = dist3(hand.thumb_tip(), hand.index_tip());
        let mut events = Vec::new();

        self.state = match self.state {
            State::Idle => {
                if d < self.config.pinch_thr {
                    State::Pressing { start_t: t }
                } else {
                    State::Idle
                }
            }
            State::Pressing { start_t } => {
                if d < self.config.pinch_thr {
                    if t - start_t >= self.config.hold_delay {
                        events.push(Event::PinchStart);
                        State::Dragging
                    } else {
                        State::Pressing { start_t }
                    }
                } else if d > self.config.release_thr {
                    if t - start_t > 0.05 {
                        events.push(Event::Click);
                    }
                    State::Idle
                } else {
                    State::Pressing { start_t }
                }
            }
            State::Dragging => {
                if d > self.config.release_thr {
                    events.push(Event::PinchEnd);
                    State::Idle
                } else {
                    State::Dragging
                }
            }
        };

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::landmark_index::{INDEX_TIP, THUMB_TIP};
    use crate::types::{Handedness, Landmark};

    fn hand_with_pinch_distance(d: f32) -> Hand {
        let mut landmarks = [Landmark::new(0.0, 0.0, 0.0); crate::types::landmark_index::NUM_LANDMARKS];
        landmarks[THUMB_TIP] = Landmark::new(0.0, 0.0, 0.0);
        landmarks[INDEX_TIP] = Landmark::new(d, 0.0, 0.0);
        Hand { label: Handedness::Right, score: 0.9, landmarks }
    }

    fn cfg() -> PinchConfig {
        PinchConfig { pinch_thr: 0.045, release_thr: 0.06, hold_delay: 0.25 }
    }

    #[test]
    fn rejects_release_below_pinch_threshold() {
        let cfg = PinchConfig { pinch_thr: 0.06, release_thr: 0.045, hold_delay: 0.25 };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn scenario_pinch_click() {
        let mut m = PinchMachine::new(cfg()).unwrap();
        let mut all = Vec::new();
        all.extend(m.update_hand(0.00, Some(&hand_with_pinch_distance(0.08))));
        all.extend(m.update_hand(0.10, Some(&hand_with_pinch_distance(0.02))));
        all.extend(m.update_hand(0.20, Some(&hand_with_pinch_distance(0.09))));
        assert_eq!(all, vec![Event::Click]);
    }

    #[test]
    fn scenario_pinch_drag() {
        let mut m = PinchMachine::new(cfg()).unwrap();
        let mut all = Vec::new();
        all.extend(m.update_hand(0.00, Some(&hand_with_pinch_distance(0.08))));
        all.extend(m.update_hand(0.10, Some(&hand_with_pinch_distance(0.02))));
        // hold_delay of 0.25s elapses between t=0.10 and t=0.50
        all.extend(m.update_hand(0.36, Some(&hand_with_pinch_distance(0.02))));
        all.extend(m.update_hand(0.50, Some(&hand_with_pinch_distance(0.02))));
        all.extend(m.update_hand(0.60, Some(&hand_with_pinch_distance(0.09))));
        assert_eq!(all, vec![Event::PinchStart, Event::PinchEnd]);
    }

    #[test]
    fn flicker_within_debounce_window_emits_nothing() {
        let mut m = PinchMachine::new(cfg()).unwrap();
        let mut all = Vec::new();
        all.extend(m.update_hand(0.00, Some(&hand_with_pinch_distance(0.08))));
        all.extend(m.update_hand(0.01, Some(&hand_with_pinch_distance(0.02))));
        all.extend(m.update_hand(0.02, Some(&hand_with_pinch_distance(0.09))));
        assert!(all.is_empty());
    }

    #[test]
    fn pinch_start_end_balanced_across_closed_cycle() {
        let mut m = PinchMachine::new(cfg()).unwrap();
        let mut starts = 0i32;
        let mut ends = 0i32;
        let frames = [
            (0.00, 0.08),
            (0.10, 0.02),
            (0.40, 0.02),
            (0.60, 0.09),
            (0.70, 0.08),
            (0.80, 0.02),
            (1.10, 0.02),
            (1.30, 0.09),
        ];
        for (t, d) in frames {
            for e in m.update_hand(t, Some(&hand_with_pinch_distance(d))) {
                match e {
                    Event::PinchStart => starts += 1,
                    Event::PinchEnd => ends += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(starts, ends);
        assert_eq!(starts, 2);
    }

    #[test]
    fn losing_the_hand_resets_to_idle() {
        let mut m = PinchMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&hand_with_pinch_distance(0.02)));
        m.update_hand(0.3, Some(&hand_with_pinch_distance(0.02)));
        assert_eq!(m.state, State::Dragging);
        m.update_hand(0.4, None);
        assert_eq!(m.state, State::Idle);
    }
}
