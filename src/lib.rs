//! Shared data access and sabermetric definitions for Statcast pitch data.
//!
//! Seasons are loaded as [`Table`]s with a typed column projection, then
//! classified and summarised by the functions in [`metrics`] and
//! [`plate_appearance`].
//!
//! ```no_run
//! use statcast_core::{load_seasons, metrics, Column};
//!
//! let pitches = load_seasons(&[2023, 2024], Some(&[Column::Description, Column::Zone]))?;
//! println!("chase rate: {:.3}", metrics::chase_rate(&pitches)?);
//! # Ok::<(), statcast_core::StatcastError>(())
//! ```

pub mod barrel;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod plate_appearance;

pub use barrel::{calculate_barrel, is_barrel};
pub use catalog::{Column, PitchGroup};
pub use config::{LoaderConfig, SeasonSet};
pub use data::loader::SeasonLoader;
pub use data::model::{Table, Value};
pub use error::{Result, StatcastError};
pub use metrics::{
    calculate_rate_stats, chase_rate, hard_hit_rate, whiff_rate, zone_rate, RateStats,
};
pub use plate_appearance::{aggregate_pa_results, PaAggregation, PaAggregator, PaKey};

/// Load one season using the default configuration (`STATCAST_DATA_DIR`
/// overrides the data directory).
pub fn load_season(year: u16, columns: Option<&[Column]>) -> Result<Table> {
    SeasonLoader::from_env().load_season(year, columns)
}

/// Load several seasons using the default configuration.
pub fn load_seasons(years: &[u16], columns: Option<&[Column]>) -> Result<Table> {
    SeasonLoader::from_env().load_seasons(years, columns)
}
