//! Two-finger scroll: index and middle tips extended and close together,
//! ring and pinky folded; vertical motion of the mean tip y drives scroll
//! deltas. Grounded on `backend/gestures/scroll.py`.
//!
//! DESIGN.md Open Question (c): the reference implementation checked both a
//! raw-delta threshold (`min_delta`) and a separately scaled "sensitivity
//! filter" (magic constant `0.3`). Here both conditions are evaluated in one
//! `should_emit` gate instead of two scattered `if`s.

use crate::geometry::{dist3, finger_extended};
use crate::gesture::SingleHandGestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Hand};

const SCALED_MAGNITUDE_FLOOR: f32 = 0.3;

#[derive(Clone, Copy, Debug)]
pub struct ScrollConfig {
    pub raise_thr: f32,
    pub pair_thr: f32,
    pub min_delta: f32,
    pub sensitivity: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { raise_thr: 0.0, pair_thr: 0.08, min_delta: 0.0003, sensitivity: 150.0 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScrollMachine {
    config: ScrollConfig,
    y_ref: Option<f32>,
    is_scrolling: bool,
}

impl ScrollMachine {
    pub fn new(config: ScrollConfig) -> Self {
        Self { config, y_ref: None, is_scrolling: false }
    }

    /// True exactly while the scroll pose is active on the most recent
    /// frame; the arbiter uses this to suppress cursor movement.
    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    fn active(&self, hand: &Hand) -> bool {
        let index_tip = hand.landmark(INDEX_TIP);
        let index_pip = hand.landmark(INDEX_PIP);
        let middle_tip = hand.landmark(MIDDLE_TIP);
        let middle_pip = hand.landmark(MIDDLE_PIP);
        let ring_tip = hand.landmark(RING_TIP);
        let ring_pip = hand.landmark(RING_PIP);
        let pinky_tip = hand.landmark(PINKY_TIP);
        let pinky_pip = hand.landmark(PINKY_PIP);

        finger_extended(index_tip, index_pip, self.config.raise_thr)
            && finger_extended(middle_tip, middle_pip, self.config.raise_thr)
            && dist3(index_tip, middle_tip) < self.config.pair_thr
            && ring_tip.y >= ring_pip.y
            && pinky_tip.y >= pinky_pip.y
    }

    fn should_emit(&self, delta: f32, scaled: f32) -> bool {
        delta.abs() > self.config.min_delta && scaled.abs() > SCALED_MAGNITUDE_FLOOR
    }
}

impl SingleHandGestureMachine for ScrollMachine {
    fn update_hand(&mut self, _t: f64, hand: Option<&Hand>) -> Vec<Event> {
        let Some(hand) = hand else {
            self.y_ref = None;
            self.is_scrolling = false;
            return Vec::new();
        };

        if !self.active(hand) {
            self.y_ref = None;
            self.is_scrolling = false;
            return Vec::new();
        }

        self.is_scrolling = true;
        let current_y = (hand.landmark(INDEX_TIP).y + hand.landmark(MIDDLE_TIP).y) / 2.0;

        let Some(y_ref) = self.y_ref else {
            self.y_ref = Some(current_y);
            return Vec::new();
        };

        let delta = current_y - y_ref;
        let scaled = -delta * self.config.sensitivity;

        if self.should_emit(delta, scaled) {
            self.y_ref = Some(current_y);
            vec![Event::Scroll(scaled)]
        } else {
            Vec::new()
        }
    }
}
