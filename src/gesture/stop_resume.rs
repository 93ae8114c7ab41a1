//! Two-handed supervisor: STOP holds both hands open and palm-up; RESUME
//! tracks each hand's index-tip path in a sliding buffer and fires when both
//! buffers show a wide-enough arc with the tips currently close together
//! (an "arcs that meet" gesture). Grounded on
//! `backend/gestures/stop_resume.py`, with one deliberate deviation: the
//! reference implementation fires resume from arc span alone, but this
//! machine also requires the tip-connection check, matching the stricter
//! behavior this crate's specification calls for.

use crate::error::ConfigError;
use crate::geometry::{arc_span, dist3, palm_facing_up, TimedPosition};
use crate::gesture::GestureMachine;
use crate::types::landmark_index::*;
use crate::types::{Event, Handedness, Snapshot};

#[derive(Clone, Copy, Debug)]
pub struct StopResumeConfig {
    pub stop_hold_time: f64,
    pub circle_time_window: f64,
    pub min_arc_angle: f32,
    pub tip_connection_threshold: f32,
    pub resume_cooldown: f64,
    pub buffer_capacity: usize,
}

impl Default for StopResumeConfig {
    fn default() -> Self {
        Self {
            stop_hold_time: 0.6,
            circle_time_window: 2.0,
            min_arc_angle: 2.0,
            tip_connection_threshold: 0.08,
            resume_cooldown: 1.0,
            buffer_capacity: 64,
        }
    }
}

impl StopResumeConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.stop_hold_time < 0.0 || self.circle_time_window <= 0.0 || self.resume_cooldown < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "stop_hold_time/circle_time_window/resume_cooldown",
                reason: "timers must be non-negative, circle_time_window positive".into(),
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum StopState {
    Idle,
    Holding { start_t: f64 },
    Stopped,
}

#[derive(Clone, Debug)]
pub struct StopResumeMachine {
    config: StopResumeConfig,
    stop_state: StopState,
    left_buffer: Vec<TimedPosition>,
    right_buffer: Vec<TimedPosition>,
    last_resume_t: Option<f64>,
}

impl StopResumeMachine {
    pub fn new(config: StopResumeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.validated()?,
            stop_state: StopState::Idle,
            left_buffer: Vec::new(),
            right_buffer: Vec::new(),
            last_resume_t: None,
        })
    }

    fn fully_open_palm_up(hand: &crate::types::Hand) -> bool {
        let all_extended = [
            (THUMB_TIP, THUMB_IP),
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ]
        .iter()
        .all(|&(tip, pip)| crate::geometry::finger_extended(hand.landmark(tip), hand.landmark(pip), 0.0));

        all_extended && palm_facing_up(hand)
    }

    fn push_bounded(buffer: &mut Vec<TimedPosition>, pos: TimedPosition, cap: usize) {
        buffer.push(pos);
        if buffer.len() > cap {
            buffer.remove(0);
        }
    }
}

impl GestureMachine for StopResumeMachine {
    fn update(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let t = snapshot.t;
        let mut events = Vec::new();

        let left = snapshot.hand_with_label(Handedness::Left);
        let right = snapshot.hand_with_label(Handedness::Right);

        // STOP: both hands present, both open and palm-up, held continuously.
        let stop_pose_active = match (left, right) {
            (Some(l), Some(r)) => Self::fully_open_palm_up(l) && Self::fully_open_palm_up(r),
            _ => false,
        };

        self.stop_state = match self.stop_state {
            StopState::Idle => {
                if stop_pose_active {
                    StopState::Holding { start_t: t }
                } else {
                    StopState::Idle
                }
            }
            StopState::Holding { start_t } => {
                if !stop_pose_active {
                    StopState::Idle
                } else if t - start_t >= self.config.stop_hold_time {
                    events.push(Event::Stop);
                    self.left_buffer.clear();
                    self.right_buffer.clear();
                    StopState::Stopped
                } else {
                    StopState::Holding { start_t }
                }
            }
            StopState::Stopped => StopState::Stopped,
        };

        // RESUME tracking only matters once stopped.
        if let StopState::Stopped = self.stop_state {
            if let Some(l) = left {
                let tip = l.landmark(INDEX_TIP);
                Self::push_bounded(
                    &mut self.left_buffer,
                    TimedPosition { x: tip.x, y: tip.y, t },
                    self.config.buffer_capacity,
                );
            }
            if let Some(r) = right {
                let tip = r.landmark(INDEX_TIP);
                Self::push_bounded(
                    &mut self.right_buffer,
                    TimedPosition { x: tip.x, y: tip.y, t },
                    self.config.buffer_capacity,
                );
            }

            let cooldown_elapsed = self
                .last_resume_t
                .map(|last| t - last >= self.config.resume_cooldown)
                .unwrap_or(true);

            if cooldown_elapsed {
                if let (Some(l), Some(r)) = (left, right) {
                    let left_span = arc_span(&self.left_buffer, t, self.config.circle_time_window);
                    let right_span = arc_span(&self.right_buffer, t, self.config.circle_time_window);
                    let tips_close = dist3(l.landmark(INDEX_TIP), r.landmark(INDEX_TIP))
                        < self.config.tip_connection_threshold;

                    if left_span >= self.config.min_arc_angle
                        && right_span >= self.config.min_arc_angle
                        && tips_close
                    {
                        events.push(Event::Resume);
                        self.stop_state = StopState::Idle;
                        self.left_buffer.clear();
                        self.right_buffer.clear();
                        self.last_resume_t = Some(t);
                    }
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::landmark_index::NUM_LANDMARKS;
    use crate::types::{Hand, Landmark};

    fn open_palm_up(label: Handedness) -> Hand {
        let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS];
        landmarks[WRIST] = Landmark::new(0.50, 0.80, 0.0);
        for (tip, pip) in [
            (THUMB_TIP, THUMB_IP),
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            landmarks[pip] = Landmark::new(0.50, 0.45, 0.0);
            landmarks[tip] = Landmark::new(0.50, 0.20, 0.0);
        }
        Hand { label, score: 0.9, landmarks }
    }

    fn two_hand_snapshot(t: f64) -> Snapshot {
        Snapshot::new(
            t,
            vec![open_palm_up(Handedness::Left), open_palm_up(Handedness::Right)],
        )
    }

    fn cfg() -> StopResumeConfig {
        StopResumeConfig {
            stop_hold_time: 0.3,
            circle_time_window: 2.0,
            min_arc_angle: 2.0,
            tip_connection_threshold: 0.1,
            resume_cooldown: 0.5,
            buffer_capacity: 64,
        }
    }

    #[test]
    fn emits_stop_after_hold() {
        let mut m = StopResumeMachine::new(cfg()).unwrap();
        assert!(m.update(&two_hand_snapshot(0.0)).is_empty());
        let events = m.update(&two_hand_snapshot(0.4));
        assert_eq!(events, vec![Event::Stop]);
    }

    #[test]
    fn single_hand_never_triggers_stop() {
        let mut m = StopResumeMachine::new(cfg()).unwrap();
        let snap = Snapshot::new(0.0, vec![open_palm_up(Handedness::Left)]);
        let events = m.update(&snap);
        assert!(events.is_empty());
    }

    #[test]
    fn resume_requires_both_arc_and_proximity() {
        let mut m = StopResumeMachine::new(cfg()).unwrap();
        m.update(&two_hand_snapshot(0.0));
        m.update(&two_hand_snapshot(0.4));
        assert_eq!(m.stop_state, StopState::Stopped);

        // Feed a semicircular arc on both index tips that converge to the
        // same point at the final frame.
        let radius = 0.2;
        let steps = 8;
        for i in 0..steps {
            let theta = std::f32::consts::PI * i as f32 / (steps as f32 - 1.0);
            let t = 0.5 + i as f64 * 0.05;
            let mut left = open_palm_up(Handedness::Left);
            let mut right = open_palm_up(Handedness::Right);
            let (lx, ly) = (0.3 + radius * theta.cos(), 0.5 + radius * theta.sin());
            let (rx, ry) = if i == steps - 1 {
                (lx, ly)
            } else {
                (0.7 - radius * theta.cos(), 0.5 + radius * theta.sin())
            };
            left.landmarks[INDEX_TIP] = Landmark::new(lx, ly, 0.0);
            right.landmarks[INDEX_TIP] = Landmark::new(rx, ry, 0.0);
            let snap = Snapshot::new(t, vec![left, right]);
            m.update(&snap);
        }
        assert_eq!(m.stop_state, StopState::Idle);
    }
}
