//! Camera and hand-tracker boundary traits (§6). No production camera or
//! ML inference implementation lives in this crate — a caller supplies a
//! concrete adapter backed by a camera library and an ONNX/other
//! inference runtime. This module only defines the shape those adapters
//! must satisfy, plus the one pure helper (horizontal mirroring) that sits
//! at the boundary.

use crate::types::Snapshot;

/// One raw captured video frame, opaque to the core: only the tracker
/// needs to interpret pixel data.
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Mirrors the frame horizontally in place, row by row, assuming
    /// `data` is tightly packed RGB (3 bytes/pixel). Done so that "right"
    /// on screen corresponds to the user's right hand, independent of any
    /// concrete image library.
    pub fn mirror_horizontal(&mut self) {
        const BYTES_PER_PIXEL: usize = 3;
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        for row in self.data.chunks_mut(row_bytes) {
            for px in 0..(self.width as usize / 2) {
                let left = px * BYTES_PER_PIXEL;
                let right = (self.width as usize - 1 - px) * BYTES_PER_PIXEL;
                for b in 0..BYTES_PER_PIXEL {
                    row.swap(left + b, right + b);
                }
            }
        }
    }
}

/// A blocking frame source. Returns `None` when the source closes
/// (camera unplugged, end of a recorded clip, etc.), which terminates the
/// main loop.
pub trait CameraSource {
    fn read(&mut self) -> Option<Frame>;
}

/// Yields a [`Snapshot`] for each captured frame. External boundary: the
/// core depends only on this shape, not on any particular inference
/// runtime.
pub trait HandTracker {
    fn infer(&mut self, frame: &Frame) -> Snapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_horizontal_reverses_pixel_order() {
        // 2x1 image, pixel 0 = (1,2,3), pixel 1 = (4,5,6).
        let mut frame = Frame { width: 2, height: 1, data: vec![1, 2, 3, 4, 5, 6] };
        frame.mirror_horizontal();
        assert_eq!(frame.data, vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn mirror_horizontal_is_involutive() {
        let original = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut frame = Frame { width: 3, height: 1, data: original.clone() };
        frame.mirror_horizontal();
        frame.mirror_horizontal();
        assert_eq!(frame.data, original);
    }
}
