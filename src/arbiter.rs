//! The gesture arbiter composes the seven gesture machines and the cursor
//! mapper into one per-frame decision, applying the priority and
//! mutual-exclusion rules of SPEC_FULL.md §4.4.

use crate::cursor::CursorMapper;
use crate::error::ConfigError;
use crate::gesture::{
    CopyPasteMachine, FrameMachine, GestureMachine, PalmArrowMachine, PinchMachine, ScrollMachine,
    SingleHandGestureMachine, StopResumeMachine, SwipeMachine,
};
use crate::types::{Event, Handedness, Snapshot};

/// Every gesture machine plus the cursor mapper, wired per their configs.
pub struct Arbiter {
    stop_resume: StopResumeMachine,
    copy_paste: CopyPasteMachine,
    swipe: SwipeMachine,
    scroll: ScrollMachine,
    pinch: PinchMachine,
    frame: FrameMachine,
    palm_arrow_left: PalmArrowMachine,
    palm_arrow_right: PalmArrowMachine,
    cursor: CursorMapper,
    /// Set by Stop, cleared by Resume (§4.11). While set, every other
    /// machine's emissions are discarded before they reach the dispatcher.
    paused: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ArbiterConfig {
    pub stop_resume: crate::gesture::stop_resume::StopResumeConfig,
    pub copy_paste: crate::gesture::copy_paste::CopyPasteConfig,
    pub swipe: crate::gesture::swipe::SwipeConfig,
    pub scroll: crate::gesture::scroll::ScrollConfig,
    pub pinch: crate::gesture::pinch::PinchConfig,
    pub frame: crate::gesture::frame::FrameConfig,
    pub palm_arrow: crate::gesture::palm_arrow::PalmArrowConfig,
    pub cursor: crate::cursor::CursorConfig,
}

impl Arbiter {
    pub fn new(config: ArbiterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            stop_resume: StopResumeMachine::new(config.stop_resume)?,
            copy_paste: CopyPasteMachine::new(config.copy_paste)?,
            swipe: SwipeMachine::new(config.swipe)?,
            scroll: ScrollMachine::new(config.scroll),
            pinch: PinchMachine::new(config.pinch)?,
            frame: FrameMachine::new(config.frame)?,
            palm_arrow_left: PalmArrowMachine::new(config.palm_arrow)?,
            palm_arrow_right: PalmArrowMachine::new(config.palm_arrow)?,
            cursor: CursorMapper::new(config.cursor)?,
            paused: false,
        })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs every machine against `snapshot` in the order SPEC_FULL.md §4.4
    /// lays out and returns the events that survive arbitration.
    pub fn update(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        let mut events = Vec::new();

        // 1. Stop/Resume always runs and drives the pause flag.
        for event in self.stop_resume.update(snapshot) {
            match event {
                Event::Stop => self.paused = true,
                Event::Resume => self.paused = false,
                _ => {}
            }
            events.push(event);
        }

        // 2. Pause gates everything else.
        if self.paused {
            return events;
        }

        // 3. Primary-hand selection.
        let primary = snapshot.primary_hand();
        let t = snapshot.t;

        // 4. Copy/Paste on the primary hand.
        events.extend(self.copy_paste.update_hand(t, primary));

        // 5. Swipe; suppresses scroll and cursor this frame if it fires.
        let swipe_events = self.swipe.update_hand(t, primary);
        let swipe_fired = !swipe_events.is_empty();
        events.extend(swipe_events);

        let mut skip_cursor = swipe_fired;

        if !swipe_fired {
            // 6. Scroll; suppresses cursor only while actively scrolling.
            let scroll_events = self.scroll.update_hand(t, primary);
            events.extend(scroll_events);
            if self.scroll.is_scrolling() {
                skip_cursor = true;
            }
        }

        // 7. Cursor movement, unless suppressed above.
        if !skip_cursor {
            if let Some(hand) = primary {
                let (x, y) = self.cursor.update(hand.index_tip());
                events.push(Event::Move(x, y));
            }
        }

        // 8. Pinch.
        events.extend(self.pinch.update_hand(t, primary));

        // 9. Frame, over the full two-hand result.
        events.extend(self.frame.update(snapshot));

        // 10. Palm-arrow, per hand: each label gets its own machine instance
        // so one hand's None frame can't reset the other hand's hold timer.
        events.extend(self.palm_arrow_left.update_hand(t, snapshot.hand_with_label(Handedness::Left)));
        events.extend(self.palm_arrow_right.update_hand(t, snapshot.hand_with_label(Handedness::Right)));

        events
    }
}
