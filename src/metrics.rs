//! Pitch-level classifications and rate statistics.
//!
//! Every rate here is `numerator / denominator` computed fresh from the table
//! passed in. When the denominator is zero (including an empty table) the
//! rate is defined as `0.0`: an empty subset is an ordinary outcome of
//! slicing by season, pitcher or count, not an error. A table missing a
//! column a metric reads fails with `MissingColumn`; a zero-row table never
//! does, so classifiers return an empty mask and rates `0.0` for it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::barrel;
use crate::catalog::{self, Column};
use crate::data::model::{Table, Value};
use crate::error::Result;

/// Hard-hit exit velocity threshold, mph.
pub const HARD_HIT_THRESHOLD: f64 = 95.0;

/// Inclusive launch angle bounds of the sweet spot, degrees.
pub const SWEET_SPOT_ANGLES: (f64, f64) = (8.0, 32.0);

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|b| **b).count()
}

// ---------------------------------------------------------------------------
// Row classifications
// ---------------------------------------------------------------------------

fn description_mask(table: &Table, pred: fn(&str) -> bool) -> Result<Vec<bool>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    Ok(table
        .column(Column::Description)?
        .iter()
        .map(|v| v.as_str().is_some_and(pred))
        .collect())
}

fn zone_mask(table: &Table, pred: fn(i64) -> bool) -> Result<Vec<bool>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    Ok(table
        .column(Column::Zone)?
        .iter()
        .map(|v| v.as_i64().is_some_and(pred))
        .collect())
}

/// Rows where the batter swung (whiffs, fouls and balls in play).
pub fn swing_mask(table: &Table) -> Result<Vec<bool>> {
    description_mask(table, catalog::is_swing)
}

/// Rows where the batter swung and missed.
pub fn whiff_mask(table: &Table) -> Result<Vec<bool>> {
    description_mask(table, catalog::is_whiff)
}

/// Rows located in zones 1-9.
pub fn in_zone_mask(table: &Table) -> Result<Vec<bool>> {
    zone_mask(table, catalog::is_in_zone)
}

/// Rows located in zones 11-14.
pub fn out_of_zone_mask(table: &Table) -> Result<Vec<bool>> {
    zone_mask(table, catalog::is_out_of_zone)
}

/// Swings at pitches outside the zone.
pub fn chase_mask(table: &Table) -> Result<Vec<bool>> {
    let swings = swing_mask(table)?;
    let outside = out_of_zone_mask(table)?;
    Ok(swings.iter().zip(&outside).map(|(s, o)| *s && *o).collect())
}

/// Batted balls at or above `threshold` mph. Null exit velocities are false.
pub fn hard_hit_mask(table: &Table, threshold: f64) -> Result<Vec<bool>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    Ok(table
        .column(Column::LaunchSpeed)?
        .iter()
        .map(|v| v.as_f64().is_some_and(|s| s >= threshold))
        .collect())
}

fn optional_floats(values: &[Value]) -> Vec<Option<f64>> {
    values.iter().map(Value::as_f64).collect()
}

/// Barrel flag for every row of a table with exit velocity and launch angle.
pub fn barrel_column(table: &Table) -> Result<Vec<bool>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let speeds = optional_floats(table.column(Column::LaunchSpeed)?);
    let angles = optional_floats(table.column(Column::LaunchAngle)?);
    barrel::calculate_barrel(&speeds, &angles)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Swinging strikes per swing.
pub fn whiff_rate(table: &Table) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let swings = count(&swing_mask(table)?);
    let whiffs = count(&whiff_mask(table)?);
    Ok(rate(whiffs, swings))
}

/// Swings at out-of-zone pitches per out-of-zone pitch.
pub fn chase_rate(table: &Table) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let outside = count(&out_of_zone_mask(table)?);
    let chases = count(&chase_mask(table)?);
    Ok(rate(chases, outside))
}

/// In-zone pitches per pitch. Every row counts toward the denominator,
/// including rows with no zone recorded.
pub fn zone_rate(table: &Table) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let in_zone = count(&in_zone_mask(table)?);
    Ok(rate(in_zone, table.num_rows()))
}

/// Share of batted balls hit at least 95 mph.
pub fn hard_hit_rate(table: &Table) -> Result<f64> {
    hard_hit_rate_at(table, HARD_HIT_THRESHOLD)
}

/// Share of batted balls hit at least `threshold` mph. Rows with no exit
/// velocity are left out of both counts.
pub fn hard_hit_rate_at(table: &Table, threshold: f64) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let speeds = table.column(Column::LaunchSpeed)?;
    let batted = speeds.iter().filter(|v| v.as_f64().is_some()).count();
    let hard = count(&hard_hit_mask(table, threshold)?);
    Ok(rate(hard, batted))
}

/// Share of batted balls with a launch angle in the sweet spot (8-32 degrees).
pub fn sweet_spot_rate(table: &Table) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let (lo, hi) = SWEET_SPOT_ANGLES;
    let angles: Vec<f64> = table
        .column(Column::LaunchAngle)?
        .iter()
        .filter_map(Value::as_f64)
        .collect();
    let sweet = angles.iter().filter(|a| **a >= lo && **a <= hi).count();
    Ok(rate(sweet, angles.len()))
}

/// Barrels per batted ball with both exit velocity and launch angle.
pub fn barrel_rate(table: &Table) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let barrels = count(&barrel_column(table)?);
    let speeds = table.column(Column::LaunchSpeed)?;
    let angles = table.column(Column::LaunchAngle)?;
    let tracked = speeds
        .iter()
        .zip(angles)
        .filter(|(s, a)| s.as_f64().is_some() && a.as_f64().is_some())
        .count();
    Ok(rate(barrels, tracked))
}

// ---------------------------------------------------------------------------
// Plate-appearance rate stats
// ---------------------------------------------------------------------------

/// Outcome rates over plate appearances with a batting result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateStats {
    /// Plate appearances counted in the denominator.
    pub pa: usize,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub hr_pct: f64,
    pub hbp_pct: f64,
}

impl RateStats {
    /// Rates keyed by name (`k_pct`, `bb_pct`, `hr_pct`, `hbp_pct`).
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("k_pct", self.k_pct),
            ("bb_pct", self.bb_pct),
            ("hr_pct", self.hr_pct),
            ("hbp_pct", self.hbp_pct),
        ])
    }
}

/// K%, BB%, HR% and HBP% as fractions of countable plate appearances.
///
/// Rows with no terminal event, or whose event is a baserunning play that
/// closed the PA key (caught stealing, pickoff, ...), are not plate
/// appearances and are excluded from the denominator.
pub fn calculate_rate_stats(pa_table: &Table) -> Result<RateStats> {
    let mut pa = 0;
    let (mut k, mut bb, mut hr, mut hbp) = (0, 0, 0, 0);
    if !pa_table.is_empty() {
        for event in pa_table.column(Column::Events)?.iter().filter_map(Value::as_str) {
            if !catalog::is_batting_event(event) {
                continue;
            }
            pa += 1;
            if catalog::STRIKEOUT_EVENTS.contains(&event) {
                k += 1;
            } else if catalog::WALK_EVENTS.contains(&event) {
                bb += 1;
            } else if event == catalog::HOME_RUN_EVENT {
                hr += 1;
            } else if event == catalog::HIT_BY_PITCH_EVENT {
                hbp += 1;
            }
        }
    }
    Ok(RateStats {
        pa,
        k_pct: rate(k, pa),
        bb_pct: rate(bb, pa),
        hr_pct: rate(hr, pa),
        hbp_pct: rate(hbp, pa),
    })
}
