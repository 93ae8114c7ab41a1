//! Pure geometric helpers over landmarks. No machine here holds state;
//! everything is a function of its inputs.

use crate::types::{landmark_index::*, Hand, Landmark};

/// Euclidean distance between two landmarks in normalised landmark space.
pub fn dist3(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// True iff `tip` is above `pip` by at least `epsilon` in image-y, i.e. the
/// finger is extended. Image y increases downward, so "tip above pip" means
/// `tip.y` is the smaller value.
pub fn finger_extended(tip: Landmark, pip: Landmark, epsilon: f32) -> bool {
    tip.y + epsilon < pip.y
}

/// True iff the hand's palm faces up: the wrist sits measurably below the
/// mean fingertip height.
pub fn palm_facing_up(hand: &Hand) -> bool {
    let tips = hand.fingertips();
    let mean_y = tips.iter().map(|t| t.y).sum::<f32>() / tips.len() as f32;
    hand.landmark(WRIST).y > mean_y + 0.02
}

/// Mean distance from the wrist to each of the five fingertips.
pub fn hand_openness(hand: &Hand) -> f32 {
    let wrist = hand.landmark(WRIST);
    let tips = hand.fingertips();
    tips.iter().map(|t| dist3(*t, wrist)).sum::<f32>() / tips.len() as f32
}

fn adjacent_fingertip_pairs(hand: &Hand) -> [(Landmark, Landmark); 4] {
    let [thumb, index, middle, ring, pinky] = hand.fingertips();
    [
        (thumb, index),
        (index, middle),
        (middle, ring),
        (ring, pinky),
    ]
}

/// True iff every adjacent fingertip pair (thumb-index, index-middle,
/// middle-ring, ring-pinky) is within `max_pair_dist`.
pub fn fingers_tight(hand: &Hand, max_pair_dist: f32) -> bool {
    adjacent_fingertip_pairs(hand)
        .iter()
        .all(|(a, b)| dist3(*a, *b) <= max_pair_dist)
}

/// True iff every adjacent fingertip pair exceeds `min_pair_dist`.
pub fn fingers_spread(hand: &Hand, min_pair_dist: f32) -> bool {
    adjacent_fingertip_pairs(hand)
        .iter()
        .all(|(a, b)| dist3(*a, *b) >= min_pair_dist)
}

/// Arithmetic centroid of a set of 2-D points.
pub fn centroid(points: &[(f32, f32)]) -> (f32, f32) {
    let n = points.len().max(1) as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    (sx / n, sy / n)
}

/// A single `(x, y, t)` sample in a sliding position buffer, `t` a
/// monotonic-clock seconds value.
#[derive(Clone, Copy, Debug)]
pub struct TimedPosition {
    pub x: f32,
    pub y: f32,
    pub t: f64,
}

/// Minimum mean radius about the centroid below which a buffer is
/// considered noise rather than a deliberate arc.
const ARC_RADIUS_FLOOR: f32 = 1e-4;

/// Given a sliding buffer of `(x, y, t)` samples, restrict to entries within
/// `window_s` of `now`, and return the angular span (radians) of the
/// resulting set about its centroid. Returns 0 if fewer than five points
/// remain, or if the mean radius is below the noise floor.
pub fn arc_span(positions: &[TimedPosition], now: f64, window_s: f64) -> f32 {
    let recent: Vec<&TimedPosition> = positions
        .iter()
        .filter(|p| now - p.t <= window_s)
        .collect();

    if recent.len() < 5 {
        return 0.0;
    }

    let points: Vec<(f32, f32)> = recent.iter().map(|p| (p.x, p.y)).collect();
    let (cx, cy) = centroid(&points);

    let radii: Vec<f32> = points
        .iter()
        .map(|(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
        .collect();
    let mean_radius = radii.iter().sum::<f32>() / radii.len() as f32;

    if mean_radius < ARC_RADIUS_FLOOR {
        return 0.0;
    }

    let mut angles: Vec<f32> = points
        .iter()
        .map(|(x, y)| (y - cy).atan2(x - cx))
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut span = angles.last().unwrap() - angles.first().unwrap();
    if span < 0.0 {
        span += std::f32::consts::TAU;
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lm(x: f32, y: f32, z: f32) -> Landmark {
        Landmark::new(x, y, z)
    }

    #[test]
    fn dist3_pythagorean() {
        let a = lm(0.0, 0.0, 0.0);
        let b = lm(3.0, 4.0, 0.0);
        assert_relative_eq!(dist3(a, b), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn finger_extended_respects_epsilon() {
        let tip = lm(0.0, 0.49, 0.0);
        let pip = lm(0.0, 0.50, 0.0);
        assert!(finger_extended(tip, pip, 0.0));
        assert!(!finger_extended(tip, pip, 0.02));
    }

    #[test]
    fn arc_span_empty_below_five_points() {
        let buf = vec![
            TimedPosition { x: 0.0, y: 0.0, t: 0.0 },
            TimedPosition { x: 1.0, y: 0.0, t: 0.1 },
        ];
        assert_eq!(arc_span(&buf, 0.2, 1.0), 0.0);
    }

    #[test]
    fn arc_span_detects_semicircle() {
        let mut buf = Vec::new();
        for i in 0..8 {
            let theta = std::f32::consts::PI * i as f32 / 7.0;
            buf.push(TimedPosition {
                x: theta.cos(),
                y: theta.sin(),
                t: i as f64 * 0.05,
            });
        }
        let span = arc_span(&buf, 0.4, 1.0);
        assert!(span > 2.5, "expected near-pi span, got {span}");
    }

    #[test]
    fn arc_span_zero_for_tight_cluster() {
        let buf: Vec<TimedPosition> = (0..6)
            .map(|i| TimedPosition { x: 0.0001 * i as f32, y: 0.0, t: i as f64 * 0.05 })
            .collect();
        assert_eq!(arc_span(&buf, 0.3, 1.0), 0.0);
    }
}
