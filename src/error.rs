use std::path::PathBuf;

use thiserror::Error;

/// Every failure the library reports. None of these are recovered internally;
/// the calling analysis decides what to do with them.
#[derive(Debug, Error)]
pub enum StatcastError {
    #[error("season {season} is not one of the configured seasons ({available})")]
    UnknownSeason { season: u16, available: String },

    #[error("data for season {season} is unavailable: {} not found", .path.display())]
    DataUnavailable { season: u16, path: PathBuf },

    #[error("column '{column}' is missing from {location}")]
    MissingColumn { column: String, location: String },

    #[error(
        "plate appearance game_pk={game_pk} at_bat_number={at_bat_number} has \
         {terminal_rows} terminal-event rows"
    )]
    AmbiguousPlateAppearance {
        game_pk: i64,
        at_bat_number: i64,
        terminal_rows: usize,
    },

    #[error("column '{column}', row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("{what}: expected {expected} values, found {found}")]
    LengthMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' has unsupported Arrow type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {field} {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl StatcastError {
    pub(crate) fn missing_column(column: impl Into<String>, location: impl Into<String>) -> Self {
        StatcastError::MissingColumn {
            column: column.into(),
            location: location.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatcastError>;
