//! Two-handed "picture frame" pose: left hand thumb-up/index-right, right
//! hand thumb-down/index-left, held for `activation_time` before emitting
//! `Screenshot`, then a cooldown before retriggering. Unlike the other
//! machines this one needs both hands at once, so it implements
//! [`GestureMachine`] directly rather than [`SingleHandGestureMachine`].
//!
//! Grounded on `backend/gestures/frame.py`.

use crate::error::ConfigError;
use crate::gesture::GestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Handedness, Snapshot};

/// Tolerance applied to each ordering inequality below, matching
/// SPEC_FULL.md §4.3's note that Frame needs a larger epsilon (0.01) than
/// the crate-wide default (0.0) to keep flicker out of the held pose.
const FRAME_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug)]
pub struct FrameConfig {
    pub activation_time: f64,
    pub cooldown_s: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { activation_time: 0.6, cooldown_s: 2.0 }
    }
}

impl FrameConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.activation_time < 0.0 || self.cooldown_s < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "activation_time/cooldown_s",
                reason: "timers must be non-negative".into(),
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Holding { start_t: f64 },
    Cooldown { fired_t: f64 },
}

#[derive(Clone, Debug)]
pub struct FrameMachine {
    config: FrameConfig,
    state: State,
}

impl FrameMachine {
    pub fn new(config: FrameConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, state: State::Idle })
    }

    fn pose_active(snapshot: &Snapshot) -> bool {
        let (Some(left), Some(right)) = (
            snapshot.hand_with_label(Handedness::Left),
            snapshot.hand_with_label(Handedness::Right),
        ) else {
            return false;
        };

        let thumb_up = left.landmark(THUMB_TIP).y + FRAME_EPSILON < left.landmark(THUMB_IP).y
            && left.landmark(THUMB_IP).y + FRAME_EPSILON < left.landmark(THUMB_MCP).y;
        let index_right = left.landmark(INDEX_TIP).x > left.landmark(INDEX_PIP).x + FRAME_EPSILON
            && left.landmark(INDEX_PIP).x > left.landmark(INDEX_MCP).x + FRAME_EPSILON;

        let thumb_down = right.landmark(THUMB_TIP).y > right.landmark(THUMB_IP).y + FRAME_EPSILON
            && right.landmark(THUMB_IP).y > right.landmark(THUMB_MCP).y + FRAME_EPSILON;
        let index_left = right.landmark(INDEX_TIP).x + FRAME_EPSILON < right.landmark(INDEX_PIP).x
            && right.landmark(INDEX_PIP).x + FRAME_EPSILON < right.landmark(INDEX_MCP).x;

        thumb_up && index_right && thumb_down && index_left
    }
}

impl GestureMachine for FrameMachine {
    fn update(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let active = Self::pose_active(snapshot);
        let t = snapshot.t;
        let mut events = Vec::new();

        self.state = match self.state {
            State::Idle => {
                if active {
                    State::Holding { start_t: t }
                } else {
                    State::Idle
                }
            }
            State::Holding { start_t } => {
                if !active {
                    State::Idle
                } else if t - start_t >= self.config.activation_time {
                    events.push(Event::Screenshot);
                    State::Cooldown { fired_t: t }
                } else {
                    State::Holding { start_t }
                }
            }
            State::Cooldown { fired_t } => {
                if t - fired_t >= self.config.cooldown_s {
                    if active {
                        State::Holding { start_t: t }
                    } else {
                        State::Idle
                    }
                } else {
                    State::Cooldown { fired_t }
                }
            }
        };

        events
    }
}
