//! Barrel classification.
//!
//! A barrel needs an exit velocity of at least 98 mph and a launch angle
//! inside a window that opens as exit velocity rises. The window is published
//! per whole mph, so it is kept here as a lookup table rather than a formula:
//! a ball's speed is floored to its mph bucket and both window edges are
//! inclusive.
//!
//! | mph | angle window |
//! |-----|--------------|
//! | 98  | 26 - 30 |
//! | 99  | 25 - 31 |
//! | 100 | 24 - 33 |
//! | 101 .. 115 | lower edge -1, upper edge +1 per mph |
//! | 116 and faster | 8 - 50 |

use crate::error::{Result, StatcastError};

/// Slowest exit velocity that can produce a barrel.
pub const MIN_BARREL_SPEED: f64 = 98.0;

/// Inclusive launch-angle window for one mph bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrelWindow {
    pub speed: f64,
    pub min_angle: f64,
    pub max_angle: f64,
}

impl BarrelWindow {
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }

    pub fn center(&self) -> f64 {
        (self.min_angle + self.max_angle) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max_angle - self.min_angle) / 2.0
    }
}

const fn window(speed: f64, min_angle: f64, max_angle: f64) -> BarrelWindow {
    BarrelWindow {
        speed,
        min_angle,
        max_angle,
    }
}

/// Barrel windows for 98..=116 mph. The last row also covers every faster
/// ball.
pub const BARREL_WINDOWS: [BarrelWindow; 19] = [
    window(98.0, 26.0, 30.0),
    window(99.0, 25.0, 31.0),
    window(100.0, 24.0, 33.0),
    window(101.0, 23.0, 34.0),
    window(102.0, 22.0, 35.0),
    window(103.0, 21.0, 36.0),
    window(104.0, 20.0, 37.0),
    window(105.0, 19.0, 38.0),
    window(106.0, 18.0, 39.0),
    window(107.0, 17.0, 40.0),
    window(108.0, 16.0, 41.0),
    window(109.0, 15.0, 42.0),
    window(110.0, 14.0, 43.0),
    window(111.0, 13.0, 44.0),
    window(112.0, 12.0, 45.0),
    window(113.0, 11.0, 46.0),
    window(114.0, 10.0, 47.0),
    window(115.0, 9.0, 48.0),
    window(116.0, 8.0, 50.0),
];

/// Window that applies to `speed`, or `None` below the barrel floor.
pub fn barrel_window(speed: f64) -> Option<&'static BarrelWindow> {
    if speed.is_nan() || speed < MIN_BARREL_SPEED {
        return None;
    }
    let bucket = (speed - MIN_BARREL_SPEED).floor();
    let idx = if bucket >= (BARREL_WINDOWS.len() - 1) as f64 {
        BARREL_WINDOWS.len() - 1
    } else {
        bucket as usize
    };
    Some(&BARREL_WINDOWS[idx])
}

/// Whether one batted ball is a barrel. NaN inputs are never barrels.
pub fn is_barrel(speed: f64, angle: f64) -> bool {
    if angle.is_nan() {
        return false;
    }
    barrel_window(speed).is_some_and(|w| w.contains(angle))
}

/// Classify parallel exit-velocity / launch-angle series. A row with either
/// value missing is not a barrel.
pub fn calculate_barrel(speeds: &[Option<f64>], angles: &[Option<f64>]) -> Result<Vec<bool>> {
    if speeds.len() != angles.len() {
        return Err(StatcastError::LengthMismatch {
            what: "launch_angle series".to_string(),
            expected: speeds.len(),
            found: angles.len(),
        });
    }
    Ok(speeds
        .iter()
        .zip(angles)
        .map(|pair| match pair {
            (Some(s), Some(a)) => is_barrel(*s, *a),
            _ => false,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_window_edges_inclusive() {
        assert!(is_barrel(98.0, 26.0));
        assert!(is_barrel(98.0, 30.0));
        assert!(is_barrel(98.0, 28.0));
        assert!(!is_barrel(98.0, 25.9));
        assert!(!is_barrel(98.0, 30.1));
    }

    #[test]
    fn test_below_speed_floor() {
        for angle in [8.0, 26.0, 28.0, 30.0, 50.0] {
            assert!(!is_barrel(97.9, angle));
        }
    }

    #[test]
    fn test_bucket_is_floored() {
        // 99.9 mph still uses the 99 mph window
        assert!(is_barrel(99.9, 31.0));
        assert!(!is_barrel(99.9, 32.0));
        assert!(is_barrel(100.0, 33.0));
    }

    #[test]
    fn test_published_edges() {
        assert!(is_barrel(116.0, 8.0));
        assert!(is_barrel(116.0, 50.0));
        assert!(!is_barrel(116.0, 7.9));
        assert!(!is_barrel(116.0, 50.1));
        assert!(is_barrel(120.0, 50.0));
    }

    #[test]
    fn test_windows_widen_monotonically() {
        for pair in BARREL_WINDOWS.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(b.speed - a.speed, 1.0);
            assert!(b.min_angle < a.min_angle);
            assert!(b.max_angle > a.max_angle);
            assert!(b.half_width() > a.half_width());
            assert!(b.center() >= a.center());
        }
    }

    #[test]
    fn test_speed_flips_angle_outside_base_window() {
        assert!(!is_barrel(98.0, 31.0));
        assert!(is_barrel(99.0, 31.0));
        assert!(!is_barrel(98.0, 20.0));
        assert!(is_barrel(104.0, 20.0));
        // once inside, faster never excludes it again
        for mph in 104..=125 {
            assert!(is_barrel(f64::from(mph), 20.0), "{mph} mph");
        }
    }

    #[test]
    fn test_calculate_barrel_series() {
        let speeds = [Some(98.0), Some(97.9), None, Some(105.0)];
        let angles = [Some(26.0), Some(28.0), Some(28.0), None];
        assert_eq!(
            calculate_barrel(&speeds, &angles).unwrap(),
            vec![true, false, false, false]
        );
        assert!(calculate_barrel(&[], &[]).unwrap().is_empty());
        assert!(calculate_barrel(&speeds, &angles[..2]).is_err());
    }

    #[test]
    fn test_nan_is_never_barrel() {
        assert!(!is_barrel(f64::NAN, 28.0));
        assert!(!is_barrel(100.0, f64::NAN));
    }
}
