//! One-handed palm-up hold: all five fingers extended, palm facing up,
//! fingertips tight together. Held continuously for `hold` seconds fires
//! `CtrlLeft`/`CtrlRight` depending on which hand, with an independent
//! per-hand cooldown after firing. Grounded on
//! `backend/gestures/palm_arrow.py`.

use crate::error::ConfigError;
use crate::geometry::{fingers_tight, palm_facing_up};
use crate::gesture::SingleHandGestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Hand, Handedness};

#[derive(Clone, Copy, Debug)]
pub struct PalmArrowConfig {
    pub extended_epsilon: f32,
    pub tight_thr: f32,
    pub hold: f64,
    pub cooldown: f64,
}

impl Default for PalmArrowConfig {
    fn default() -> Self {
        Self { extended_epsilon: 0.0, tight_thr: 0.08, hold: 0.5, cooldown: 1.0 }
    }
}

impl PalmArrowConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.hold < 0.0 || self.cooldown < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "hold/cooldown",
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
pub struct PalmArrowMachine {
    config: PalmArrowConfig,
    state: State,
}

impl PalmArrowMachine {
    pub fn new(config: PalmArrowConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, state: State::Idle })
    }

    fn pose_active(&self, hand: &Hand) -> bool {
        let eps = self.config.extended_epsilon;
        let all_extended = [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ]
        .iter()
        .all(|&(tip, pip)| crate::geometry::finger_extended(hand.landmark(tip), hand.landmark(pip), eps));

        all_extended && palm_facing_up(hand) && fingers_tight(hand, self.config.tight_thr)
    }

    fn event_for(hand: &Hand) -> Event {
        match hand.label {
            Handedness::Left => Event::CtrlLeft,
            Handedness::Right => Event::CtrlRight,
        }
    }
}

impl SingleHandGestureMachine for PalmArrowMachine {
    fn update_hand(&mut self, t: f64, hand: Option<&Hand>) -> Vec<Event> {
        let Some(hand) = hand else {
            self.state = State::Idle;
            return Vec::new();
        };

        let active = self.pose_active(hand);
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
                } else if t - start_t >= self.config.hold {
                    events.push(Self::event_for(hand));
                    State::Cooldown { fired_t: t }
                } else {
                    State::Holding { start_t }
                }
            }
            State::Cooldown { fired_t } => {
                if t - fired_t >= self.config.cooldown {
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
