//! Bounded single-consumer event dispatcher: the main loop produces into a
//! `crossbeam_channel` without ever blocking, a dedicated thread owns the
//! `InputBackend` and drains it. Grounded on the teacher's camera-capture
//! thread pattern (`Arc<AtomicBool>` stop flag + `JoinHandle`, torn down
//! from `Drop`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender, TrySendError};

use crate::backend::{InputBackend, Key, Modifier};
use crate::types::Event;

const QUEUE_CAPACITY: usize = 256;

/// Wraps [`Event`] with the sentinel the dispatcher uses to signal
/// shutdown to its consumer thread.
enum Item {
    Event(Event),
    Shutdown,
}

pub struct Dispatcher {
    sender: Sender<Item>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns the consumer thread, which owns `backend` for its lifetime.
    /// `clipboard_trigger`, when present, is notified on every `Copy`
    /// event so the clipboard bridge's "send clipboard" path runs on its
    /// own tokio task without the dispatcher ever awaiting it.
    pub fn spawn(
        mut backend: Box<dyn InputBackend + Send>,
        clipboard_trigger: Option<tokio::sync::mpsc::UnboundedSender<()>>,
    ) -> Self {
        let (sender, receiver) = bounded::<Item>(QUEUE_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));

        let handle = std::thread::spawn(move || {
            let mut pinch_active = false;

            for item in receiver.iter() {
                match item {
                    Item::Event(event) => {
                        if let Event::PinchStart = event {
                            pinch_active = true;
                        }
                        if let Event::PinchEnd = event {
                            pinch_active = false;
                        }
                        if let Err(e) = apply(backend.as_mut(), event) {
                            log::warn!("input backend call failed: {e}");
                        }
                        if matches!(event, Event::Copy) {
                            if let Some(trigger) = &clipboard_trigger {
                                let _ = trigger.send(());
                            }
                        }
                    }
                    Item::Shutdown => {
                        if pinch_active {
                            if let Err(e) = backend.left_up() {
                                log::warn!("failed to flush unmatched PinchStart on shutdown: {e}");
                            }
                        }
                        break;
                    }
                }
            }
        });

        Self { sender, stop, handle: Some(handle) }
    }

    /// Enqueues `event` without blocking. Drops and logs at `warn` if the
    /// queue is full, since the per-frame producer must never stall.
    pub fn emit(&self, event: Event) {
        match self.sender.try_send(Item::Event(event)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::warn!("dispatcher queue full, dropping {event:?}"),
            Err(TrySendError::Disconnected(_)) => log::warn!("dispatcher consumer gone, dropping {event:?}"),
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.sender.send(Item::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Maps one [`Event`] to the backend calls of §4.5's table.
fn apply(backend: &mut dyn InputBackend, event: Event) -> Result<(), crate::error::BackendError> {
    match event {
        Event::Move(x, y) => backend.move_to(x, y),
        Event::Click => backend.click_left(),
        Event::PinchStart => backend.left_down(),
        Event::PinchEnd => backend.left_up(),
        Event::Scroll(dy) => backend.scroll(0, dy.round() as i32),
        Event::Screenshot => backend.chord(&[Modifier::Super, Modifier::Shift], Key::Char('3')),
        Event::CtrlLeft => backend.chord(&[Modifier::Control], Key::ArrowLeft),
        Event::CtrlRight => backend.chord(&[Modifier::Control], Key::ArrowRight),
        Event::Copy => backend.chord(&[Modifier::Super], Key::Char('c')),
        Event::Paste => backend.chord(&[Modifier::Super], Key::Char('v')),
        Event::Stop | Event::Resume => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl InputBackend for RecordingBackend {
        fn move_to(&mut self, x: i32, y: i32) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push(format!("move_to({x},{y})"));
            Ok(())
        }
        fn left_down(&mut self) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push("left_down".into());
            Ok(())
        }
        fn left_up(&mut self) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push("left_up".into());
            Ok(())
        }
        fn click_left(&mut self) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push("click_left".into());
            Ok(())
        }
        fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push(format!("scroll({dx},{dy})"));
            Ok(())
        }
        fn chord(&mut self, modifiers: &[Modifier], _key: Key) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push(format!("chord({} mods)", modifiers.len()));
            Ok(())
        }
    }

    #[test]
    fn events_reach_backend_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend { calls: calls.clone() };
        let dispatcher = Dispatcher::spawn(Box::new(backend), None);

        dispatcher.emit(Event::Move(10, 20));
        dispatcher.emit(Event::Click);
        drop(dispatcher);

        let recorded = calls.lock().unwrap();
        assert_eq!(&*recorded, &["move_to(10,20)", "click_left"]);
    }

    #[test]
    fn shutdown_flushes_unmatched_pinch_start() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend { calls: calls.clone() };
        let dispatcher = Dispatcher::spawn(Box::new(backend), None);

        dispatcher.emit(Event::PinchStart);
        drop(dispatcher);

        let recorded = calls.lock().unwrap();
        assert_eq!(&*recorded, &["left_down", "left_up"]);
    }

    #[test]
    fn balanced_pinch_does_not_double_flush() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend { calls: calls.clone() };
        let dispatcher = Dispatcher::spawn(Box::new(backend), None);

        dispatcher.emit(Event::PinchStart);
        dispatcher.emit(Event::PinchEnd);
        drop(dispatcher);

        let recorded = calls.lock().unwrap();
        assert_eq!(&*recorded, &["left_down", "left_up"]);
    }
}
