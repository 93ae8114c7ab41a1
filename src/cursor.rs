//! Cursor kinematics: region-of-interest normalisation, gain, exponential
//! smoothing, and clamping to the screen bounds.

use crate::error::ConfigError;
use crate::types::Landmark;

/// Region of interest in normalised `[0, 1]` landmark coordinates within
/// which fingertip motion is mapped to the full screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roi {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for Roi {
    fn default() -> Self {
        Self { x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 1.0 }
    }
}

/// Configuration for [`CursorMapper`]. Validated at construction: an
/// inverted ROI or non-positive screen dimensions are programmer errors
/// (§7, "Out-of-range input"), not something the mapper tolerates silently.
#[derive(Clone, Copy, Debug)]
pub struct CursorConfig {
    pub screen_w: u32,
    pub screen_h: u32,
    pub roi: Roi,
    pub gain: f32,
    pub smoothing: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            screen_w: 1920,
            screen_h: 1080,
            roi: Roi::default(),
            gain: 1.0,
            smoothing: 0.5,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl CursorConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.screen_w == 0 || self.screen_h == 0 {
            return Err(ConfigError::OutOfRange {
                field: "screen_w/screen_h",
                reason: "screen dimensions must be positive".into(),
            });
        }
        if self.roi.x_max <= self.roi.x_min || self.roi.y_max <= self.roi.y_min {
            return Err(ConfigError::OutOfRange {
                field: "roi",
                reason: "ROI max must exceed min on both axes".into(),
            });
        }
        if self.gain < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "gain",
                reason: "gain must be >= 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing) || self.smoothing == 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "smoothing",
                reason: "smoothing alpha must be in (0, 1]".into(),
            });
        }
        Ok(self)
    }
}

/// Maps a chosen hand's index fingertip to smoothed screen pixel
/// coordinates. State lives for the process lifetime; recreating the
/// mapper resets smoothing.
#[derive(Clone, Debug)]
pub struct CursorMapper {
    config: CursorConfig,
    smoothed: Option<(f32, f32)>,
}

impl CursorMapper {
    pub fn new(config: CursorConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validated()?, smoothed: None })
    }

    pub fn reset(&mut self) {
        self.smoothed = None;
    }

    /// Maps `fingertip` through the ROI/gain/EMA pipeline described in
    /// SPEC_FULL.md §4.2 and returns rounded screen pixel coordinates,
    /// always within `[0, W-1] x [0, H-1]`.
    pub fn update(&mut self, fingertip: Landmark) -> (i32, i32) {
        let roi = self.config.roi;
        let nx = ((fingertip.x - roi.x_min) / (roi.x_max - roi.x_min)).clamp(0.0, 1.0);
        let ny = ((fingertip.y - roi.y_min) / (roi.y_max - roi.y_min)).clamp(0.0, 1.0);

        let mut tx = nx * self.config.screen_w as f32;
        let mut ty = ny * self.config.screen_h as f32;

        let (sx, sy) = match self.smoothed {
            None => (tx, ty),
            Some((sx, sy)) => {
                tx = sx + self.config.gain * (tx - sx);
                ty = sy + self.config.gain * (ty - sy);
                (sx, sy)
            }
        };

        tx += self.config.offset_x as f32;
        ty += self.config.offset_y as f32;

        let max_x = (self.config.screen_w - 1) as f32;
        let max_y = (self.config.screen_h - 1) as f32;
        tx = tx.clamp(0.0, max_x);
        ty = ty.clamp(0.0, max_y);

        let alpha = self.config.smoothing;
        let new_sx = if self.smoothed.is_none() { tx } else { (1.0 - alpha) * sx + alpha * tx };
        let new_sy = if self.smoothed.is_none() { ty } else { (1.0 - alpha) * sy + alpha * ty };

        self.smoothed = Some((new_sx, new_sy));
        (new_sx.round() as i32, new_sy.round() as i32)
    }
}
