//! Four-finger horizontal swipe: all four non-thumb fingertips extended and
//! held together, then moved sideways as a unit. Grounded on
//! `backend/gestures/swipe.py`, whose `_fingers_together` gate (at least two
//! of the three adjacent tip pairs within `pair_thr`), `hold_time` dwell
//! before motion tracking starts, and horizontal-over-vertical dominance
//! check are all reproduced here.
//!
//! The emitted control key follows the hand's label: a left hand emits
//! [`Event::CtrlLeft`], a right hand [`Event::CtrlRight`].

use crate::error::ConfigError;
use crate::geometry::{dist3, finger_extended};
use crate::gesture::SingleHandGestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Hand, Handedness};

#[derive(Clone, Copy, Debug)]
pub struct SwipeConfig {
    pub extended_epsilon: f32,
    pub pair_thr: f32,
    pub hold_time: f64,
    pub min_delta: f32,
    pub cooldown: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self { extended_epsilon: 0.0, pair_thr: 0.08, hold_time: 0.2, min_delta: 0.08, cooldown: 0.6 }
    }
}

impl SwipeConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.min_delta <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "min_delta",
                reason: "min_delta must be positive".into(),
            });
        }
        if self.cooldown < 0.0 || self.hold_time < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "cooldown/hold_time",
                reason: "timers must be non-negative".into(),
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Debug)]
pub struct SwipeMachine {
    config: SwipeConfig,
    hold_start: Option<f64>,
    reference: Option<(f32, f32)>,
    last_fire_t: Option<f64>,
}

impl SwipeMachine {
    pub fn new(config: SwipeConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, hold_start: None, reference: None, last_fire_t: None })
    }

    fn four_finger_pose(&self, hand: &Hand) -> bool {
        let eps = self.config.extended_epsilon;
        finger_extended(hand.landmark(INDEX_TIP), hand.landmark(INDEX_PIP), eps)
            && finger_extended(hand.landmark(MIDDLE_TIP), hand.landmark(MIDDLE_PIP), eps)
            && finger_extended(hand.landmark(RING_TIP), hand.landmark(RING_PIP), eps)
            && finger_extended(hand.landmark(PINKY_TIP), hand.landmark(PINKY_PIP), eps)
    }

    /// At least two of the three adjacent tip pairs within `pair_thr`,
    /// mirroring the reference `_fingers_together` check.
    fn fingers_together(&self, hand: &Hand) -> bool {
        let index_tip = hand.landmark(INDEX_TIP);
        let middle_tip = hand.landmark(MIDDLE_TIP);
        let ring_tip = hand.landmark(RING_TIP);
        let pinky_tip = hand.landmark(PINKY_TIP);

        let close_pairs = [
            dist3(index_tip, middle_tip) < self.config.pair_thr,
            dist3(middle_tip, ring_tip) < self.config.pair_thr,
            dist3(ring_tip, pinky_tip) < self.config.pair_thr,
        ]
        .iter()
        .filter(|&&close| close)
        .count();

        close_pairs >= 2
    }

    fn pose_active(&self, hand: &Hand) -> bool {
        self.four_finger_pose(hand) && self.fingers_together(hand)
    }

    fn reference_point(hand: &Hand) -> (f32, f32) {
        let x = (hand.landmark(INDEX_TIP).x
            + hand.landmark(MIDDLE_TIP).x
            + hand.landmark(RING_TIP).x
            + hand.landmark(PINKY_TIP).x)
            / 4.0;
        let y = (hand.landmark(INDEX_TIP).y
            + hand.landmark(MIDDLE_TIP).y
            + hand.landmark(RING_TIP).y
            + hand.landmark(PINKY_TIP).y)
            / 4.0;
        (x, y)
    }

    fn key_for(hand: &Hand) -> Event {
        match hand.label {
            Handedness::Left => Event::CtrlLeft,
            Handedness::Right => Event::CtrlRight,
        }
    }
}

impl SingleHandGestureMachine for SwipeMachine {
    fn update_hand(&mut self, t: f64, hand: Option<&Hand>) -> Vec<Event> {
        let Some(hand) = hand else {
            self.hold_start = None;
            self.reference = None;
            return Vec::new();
        };

        if !self.pose_active(hand) {
            self.hold_start = None;
            self.reference = None;
            return Vec::new();
        }

        let hold_start = *self.hold_start.get_or_insert(t);
        if t - hold_start < self.config.hold_time {
            return Vec::new();
        }

        let current = Self::reference_point(hand);

        let Some((x_ref, y_ref)) = self.reference else {
            self.reference = Some(current);
            return Vec::new();
        };

        let dx = current.0 - x_ref;
        let dy = current.1 - y_ref;

        if let Some(last) = self.last_fire_t {
            if t - last < self.config.cooldown {
                return Vec::new();
            }
        }

        if dx.abs() > self.config.min_delta && dx.abs() > dy.abs() {
            self.reference = Some(current);
            self.last_fire_t = Some(t);
            vec![Self::key_for(hand)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::landmark_index::NUM_LANDMARKS;
    use crate::types::Landmark;

    fn four_finger_hand(x: f32, label: Handedness) -> Hand {
        four_finger_hand_at(x, 0.2, label)
    }

    fn four_finger_hand_at(x: f32, y: f32, label: Handedness) -> Hand {
        let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS];
        for (tip, pip) in [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            landmarks[pip] = Landmark::new(x, y + 0.4, 0.0);
            landmarks[tip] = Landmark::new(x, y, 0.0);
        }
        Hand { label, score: 0.9, landmarks }
    }

    /// Same four-finger extension, but spread far enough apart that fewer
    /// than two adjacent pairs are within `pair_thr`.
    fn spread_finger_hand(x: f32, label: Handedness) -> Hand {
        let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS];
        for (i, (tip, pip)) in [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ]
        .into_iter()
        .enumerate()
        {
            let offset = i as f32 * 0.3;
            landmarks[pip] = Landmark::new(x + offset, 0.6, 0.0);
            landmarks[tip] = Landmark::new(x + offset, 0.2, 0.0);
        }
        Hand { label, score: 0.9, landmarks }
    }

    fn cfg() -> SwipeConfig {
        SwipeConfig { extended_epsilon: 0.0, pair_thr: 0.08, hold_time: 0.2, min_delta: 0.08, cooldown: 0.6 }
    }

    #[test]
    fn scenario_swipe_emits_ctrl_right_for_right_hand() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand(0.2, Handedness::Right)));
        m.update_hand(0.25, Some(&four_finger_hand(0.2, Handedness::Right)));
        let events = m.update_hand(0.3, Some(&four_finger_hand(0.55, Handedness::Right)));
        assert_eq!(events, vec![Event::CtrlRight]);
    }

    #[test]
    fn left_hand_emits_ctrl_left() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand(0.2, Handedness::Left)));
        m.update_hand(0.25, Some(&four_finger_hand(0.2, Handedness::Left)));
        let events = m.update_hand(0.3, Some(&four_finger_hand(0.55, Handedness::Left)));
        assert_eq!(events, vec![Event::CtrlLeft]);
    }

    #[test]
    fn cooldown_suppresses_rapid_repeats() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand(0.1, Handedness::Right)));
        m.update_hand(0.25, Some(&four_finger_hand(0.1, Handedness::Right)));
        m.update_hand(0.3, Some(&four_finger_hand(0.5, Handedness::Right)));
        let events = m.update_hand(0.35, Some(&four_finger_hand(0.9, Handedness::Right)));
        assert!(events.is_empty());
    }

    #[test]
    fn small_motion_does_not_fire() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand(0.2, Handedness::Right)));
        m.update_hand(0.25, Some(&four_finger_hand(0.2, Handedness::Right)));
        let events = m.update_hand(0.3, Some(&four_finger_hand(0.22, Handedness::Right)));
        assert!(events.is_empty());
    }

    #[test]
    fn hold_time_gates_firing_before_dwell() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand(0.2, Handedness::Right)));
        // Only 0.1s elapsed, short of hold_time 0.2s: still gated, no reference set yet.
        let events = m.update_hand(0.1, Some(&four_finger_hand(0.6, Handedness::Right)));
        assert!(events.is_empty());
    }

    #[test]
    fn spread_fingers_never_engage_pose() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&spread_finger_hand(0.1, Handedness::Right)));
        m.update_hand(0.25, Some(&spread_finger_hand(0.1, Handedness::Right)));
        let events = m.update_hand(0.3, Some(&spread_finger_hand(0.6, Handedness::Right)));
        assert!(events.is_empty());
    }

    #[test]
    fn vertical_dominant_motion_does_not_fire() {
        let mut m = SwipeMachine::new(cfg()).unwrap();
        m.update_hand(0.0, Some(&four_finger_hand_at(0.2, 0.2, Handedness::Right)));
        m.update_hand(0.25, Some(&four_finger_hand_at(0.2, 0.2, Handedness::Right)));
        // x moves past min_delta, but y moves further still: vertical wins.
        let events = m.update_hand(0.3, Some(&four_finger_hand_at(0.35, 0.7, Handedness::Right)));
        assert!(events.is_empty());
    }

    #[test]
    fn rejects_non_positive_min_delta() {
        let cfg = SwipeConfig { min_delta: 0.0, ..SwipeConfig::default() };
        assert!(cfg.validated().is_err());
    }
}
