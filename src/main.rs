//! Host-control binary: drives the gesture pipeline from a camera/tracker
//! pair down to an input backend, with an optional clipboard bridge
//! running alongside on its own tokio runtime (§4.10, §5).

use std::time::Instant;

use clap::Parser;
use handpilot::backend::InputBackend;
use handpilot::clipboard::ClipboardConfig as WireClipboardConfig;
use handpilot::config::{AppConfig, BackendConfig, ClipboardConfig};
use handpilot::tracker::{CameraSource, Frame, HandTracker};
use handpilot::{Arbiter, Dispatcher};

/// Camera never available in this build: the camera frame source and the
/// hand-landmark model are external collaborators (§1's Out-of-scope
/// list) supplied by a caller that links a concrete adapter. This stub
/// makes the binary a complete, runnable skeleton without bundling an ML
/// runtime.
struct NoCameraSource;

impl CameraSource for NoCameraSource {
    fn read(&mut self) -> Option<Frame> {
        None
    }
}

struct NoHandTracker;

impl HandTracker for NoHandTracker {
    fn infer(&mut self, _frame: &Frame) -> handpilot::Snapshot {
        handpilot::Snapshot::empty(0.0)
    }
}

#[derive(Parser, Debug)]
#[command(name = "handpilot", about = "Camera-gesture to host input device")]
struct Args {
    /// Drive a Bluetooth HID peripheral instead of the local OS input.
    #[arg(long)]
    hid_peripheral: bool,

    /// Join a clipboard relay session: "<ws-uri> <session-id> <name>".
    #[arg(long, num_args = 3, value_names = ["RELAY_URI", "SESSION_ID", "NAME"])]
    clipboard: Option<Vec<String>>,
}

fn build_backend(backend: &BackendConfig) -> anyhow::Result<Box<dyn InputBackend + Send>> {
    match backend {
        BackendConfig::Local => {
            #[cfg(feature = "local-backend")]
            {
                Ok(Box::new(handpilot::backend::local::LocalBackend::new()?))
            }
            #[cfg(not(feature = "local-backend"))]
            {
                anyhow::bail!("local-backend feature not enabled")
            }
        }
        BackendConfig::HidPeripheral { .. } => {
            anyhow::bail!(
                "HID peripheral backend requires a paired host connection; wire a bluer adapter at startup"
            )
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = AppConfig::default();
    if args.hid_peripheral {
        config.backend = BackendConfig::HidPeripheral { psm_control: 17, psm_interrupt: 19 };
    }
    if let Some(triplet) = &args.clipboard {
        config.clipboard = Some(ClipboardConfig {
            relay_uri: triplet[0].clone(),
            session_id: triplet[1].clone(),
            name: triplet[2].clone(),
        });
    }
    let config = config.validated()?;

    let backend = build_backend(&config.backend)?;

    let clipboard_trigger = config.clipboard.as_ref().map(|wire| {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        spawn_clipboard_runtime(wire.clone().into(), rx);
        tx
    });

    let dispatcher = Dispatcher::spawn(backend, clipboard_trigger);
    let mut arbiter = Arbiter::new(config.arbiter)?;

    let mut camera = NoCameraSource;
    let mut tracker = NoHandTracker;
    let start = Instant::now();

    log::info!("handpilot main loop starting");
    while let Some(mut frame) = camera.read() {
        frame.mirror_horizontal();
        let mut snapshot = tracker.infer(&frame);
        snapshot.t = start.elapsed().as_secs_f64();

        for event in arbiter.update(&snapshot) {
            dispatcher.emit(event);
        }
    }
    log::info!("camera source closed, shutting down");

    Ok(())
}

/// Spawns the clipboard bridge on its own current-thread tokio runtime, per
/// §5's concurrency model: the main loop never awaits this task directly.
fn spawn_clipboard_runtime(
    config: WireClipboardConfig,
    send_trigger: tokio::sync::mpsc::UnboundedReceiver<()>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("failed to start clipboard runtime: {e}");
                return;
            }
        };

        #[cfg(feature = "local-backend")]
        let clipboard: Box<dyn handpilot::clipboard::ClipboardAccess> =
            match handpilot::clipboard::ArboardClipboard::new() {
                Ok(c) => Box::new(c),
                Err(e) => {
                    log::warn!("clipboard unavailable: {e}");
                    return;
                }
            };
        #[cfg(not(feature = "local-backend"))]
        let clipboard: Box<dyn handpilot::clipboard::ClipboardAccess> = {
            log::warn!("clipboard requested without the local-backend feature enabled");
            return;
        };

        if let Err(e) = runtime.block_on(handpilot::clipboard::run(config, clipboard, send_trigger)) {
            log::warn!("clipboard bridge ended: {e}");
        }
    });
}
