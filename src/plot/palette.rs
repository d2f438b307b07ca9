//! Continuous color scales.
//!
//! Stops are the usual 5-point samplings of ColorBrewer RdBu and matplotlib
//! viridis; values between stops are linearly interpolated in RGB.

use crate::domain::ColorScale;

const RDBU: [(u8, u8, u8); 5] = [
    (202, 0, 32),
    (244, 165, 130),
    (247, 247, 247),
    (146, 197, 222),
    (5, 113, 176),
];

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn stops(scale: ColorScale) -> &'static [(u8, u8, u8)] {
    match scale {
        ColorScale::RdBu => &RDBU,
        ColorScale::Viridis => &VIRIDIS,
    }
}

/// Color for `t ∈ [0, 1]` (clamped; NaN maps to the low end).
pub fn sample(scale: ColorScale, t: f64) -> (u8, u8, u8) {
    let stops = stops(scale);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (stops.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(stops.len() - 1);
    let frac = pos - lo as f64;

    let lerp = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * frac).round() as u8 };
    let (a, b) = (stops[lo], stops[hi]);
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Normalize `value` into `[0, 1]` over `(lo, hi)`; a flat range maps to the middle.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Black or white, whichever reads better on `bg`.
pub fn contrasting_text((r, g, b): (u8, u8, u8)) -> (u8, u8, u8) {
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luma > 140.0 { (0, 0, 0) } else { (255, 255, 255) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        assert_eq!(sample(ColorScale::RdBu, 0.0), RDBU[0]);
        assert_eq!(sample(ColorScale::RdBu, 1.0), RDBU[4]);
        assert_eq!(sample(ColorScale::Viridis, 2.0), VIRIDIS[4]);
        assert_eq!(sample(ColorScale::Viridis, f64::NAN), VIRIDIS[0]);
    }

    #[test]
    fn midpoint_interpolates() {
        // Halfway between stop 0 and stop 1.
        let c = sample(ColorScale::Viridis, 0.125);
        assert_eq!(c, (64, 42, 112));
    }

    #[test]
    fn normalize_handles_flat_range() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(15.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn text_contrast() {
        assert_eq!(contrasting_text((247, 247, 247)), (0, 0, 0));
        assert_eq!(contrasting_text((68, 1, 84)), (255, 255, 255));
    }
}
