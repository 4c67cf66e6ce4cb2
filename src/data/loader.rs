use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;

use super::model::{Table, Value};
use crate::catalog::Column;
use crate::config::LoaderConfig;
use crate::error::{Result, StatcastError};

/// Columns pandas writes to carry a non-trivial index; never part of a schema.
const PANDAS_INDEX_PREFIX: &str = "__index_level_";

// ---------------------------------------------------------------------------
// SeasonLoader
// ---------------------------------------------------------------------------

/// Resolves seasons to Parquet files under the configured data directory and
/// materialises them as [`Table`]s.
///
/// A season is stored either as one file (`<prefix>_<year>.parquet`) or as
/// monthly partitions (`<prefix>_<year>_<MM>.parquet`). Every call reads from
/// disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SeasonLoader {
    config: LoaderConfig,
}

impl SeasonLoader {
    pub fn new(config: LoaderConfig) -> Self {
        SeasonLoader { config }
    }

    /// Loader over the default configuration with `STATCAST_DATA_DIR` applied.
    pub fn from_env() -> Self {
        SeasonLoader::new(LoaderConfig::default().with_env_overrides())
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Files backing `season`, in read order.
    ///
    /// Fails with `UnknownSeason` for a season outside the configured set and
    /// `DataUnavailable` when no file exists for it.
    pub fn partition_paths(&self, season: u16) -> Result<Vec<PathBuf>> {
        let months = self.partition_months(season)?;
        if months.is_empty() {
            return Ok(vec![self.config.season_path(season)]);
        }
        Ok(months
            .into_iter()
            .map(|m| self.config.partition_path(season, m))
            .collect())
    }

    /// Months a partitioned season resolves to, or an empty list when the
    /// single season file exists.
    ///
    /// Months before the first or after the last partition are treated as
    /// outside the collected range. A month missing between two present ones
    /// is `DataUnavailable` naming that partition.
    pub fn partition_months(&self, season: u16) -> Result<Vec<u8>> {
        if !self.config.seasons.contains(season) {
            return Err(StatcastError::UnknownSeason {
                season,
                available: self.config.seasons.to_string(),
            });
        }
        let single = self.config.season_path(season);
        if single.is_file() {
            return Ok(Vec::new());
        }
        let months: Vec<u8> = (1..=12u8)
            .filter(|&m| self.config.partition_path(season, m).is_file())
            .collect();
        let (first, last) = match (months.first(), months.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(StatcastError::DataUnavailable {
                    season,
                    path: single,
                })
            }
        };
        if let Some(gap) = (first..=last).find(|m| !months.contains(m)) {
            return Err(StatcastError::DataUnavailable {
                season,
                path: self.config.partition_path(season, gap),
            });
        }
        debug!("season {season}: monthly partitions {first:02}-{last:02}");
        Ok(months)
    }

    /// Canonical column list of a season, read from file metadata only.
    pub fn schema(&self, season: u16) -> Result<Vec<String>> {
        let paths = self.partition_paths(season)?;
        file_columns(&paths[0])
    }

    /// Load one season, projected to `columns` (all columns when `None`).
    ///
    /// With a projection the result has exactly those columns in the given
    /// order; a column absent from the season's files is `MissingColumn`.
    pub fn load_season(&self, season: u16, columns: Option<&[Column]>) -> Result<Table> {
        self.config.validate()?;
        let months = self.partition_months(season)?;
        if !months.is_empty() {
            warn!(
                "season {season}: no single-season file, loading monthly partitions {} only",
                describe_months(&months)
            );
        }
        let paths = self.partition_paths(season)?;
        let wanted: Vec<String> = match columns {
            Some(cols) => {
                let mut names: Vec<String> = Vec::with_capacity(cols.len());
                for c in cols {
                    if !names.iter().any(|n| n == c.as_str()) {
                        names.push(c.as_str().to_string());
                    }
                }
                names
            }
            None => file_columns(&paths[0])?,
        };

        let mut parts = Vec::with_capacity(paths.len());
        for path in &paths {
            parts.push(read_parquet(path, season, &wanted, self.config.batch_size)?);
        }
        let table = if parts.len() == 1 {
            parts.remove(0)
        } else {
            Table::concat(&parts)
        };
        let table = table.with_season(season);

        info!(
            "Loaded season {season}: {} pitches, {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }

    /// Load several seasons with the same projection and concatenate them in
    /// the order given.
    ///
    /// Every season is resolved before any file is read, so a request where
    /// some seasons are missing fails without loading a partial set.
    pub fn load_seasons(&self, seasons: &[u16], columns: Option<&[Column]>) -> Result<Table> {
        self.config.validate()?;
        for &season in seasons {
            self.partition_paths(season)?;
        }
        if seasons.is_empty() {
            let names: Vec<&str> = columns
                .unwrap_or_default()
                .iter()
                .map(|c| c.as_str())
                .collect();
            return Ok(Table::empty(names));
        }

        let mut tables = Vec::with_capacity(seasons.len());
        for &season in seasons {
            tables.push(self.load_season(season, columns)?);
        }
        let combined = Table::concat(&tables);
        info!(
            "Loaded {} seasons: {} pitches total",
            seasons.len(),
            combined.num_rows()
        );
        Ok(combined)
    }

    /// Load every season in `first..=last`.
    pub fn load_range(&self, first: u16, last: u16, columns: Option<&[Column]>) -> Result<Table> {
        let seasons: Vec<u16> = (first..=last).collect();
        self.load_seasons(&seasons, columns)
    }

    /// Load every configured season.
    pub fn load_all(&self, columns: Option<&[Column]>) -> Result<Table> {
        let seasons: Vec<u16> = self.config.seasons.iter().collect();
        self.load_seasons(&seasons, columns)
    }
}

fn describe_months(months: &[u8]) -> String {
    let list: Vec<String> = months.iter().map(|m| format!("{m:02}")).collect();
    list.join(", ")
}

// ---------------------------------------------------------------------------
// Parquet reading
// ---------------------------------------------------------------------------

fn file_columns(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    Ok(builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .filter(|n| !n.starts_with(PANDAS_INDEX_PREFIX))
        .collect())
}

/// Read `wanted` columns from one Parquet file, in `wanted` order.
fn read_parquet(path: &Path, season: u16, wanted: &[String], batch_size: usize) -> Result<Table> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let mut roots = Vec::with_capacity(wanted.len());
    for name in wanted {
        let idx = schema.index_of(name).map_err(|_| {
            StatcastError::missing_column(name.as_str(), format!("season {season} ({})", path.display()))
        })?;
        roots.push(idx);
    }
    debug!("{}: projecting {} of {} columns", path.display(), roots.len(), schema.fields().len());

    let mask = ProjectionMask::roots(builder.parquet_schema(), roots);
    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()?;

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); wanted.len()];
    for batch in reader {
        let batch = batch?;
        let batch_schema = batch.schema();
        for (name, out) in wanted.iter().zip(columns.iter_mut()) {
            let idx = batch_schema
                .index_of(name)
                .map_err(|_| StatcastError::missing_column(name.as_str(), format!("season {season}")))?;
            out.extend(array_values(name, batch.column(idx))?);
        }
    }

    Table::from_columns(wanted.iter().cloned().zip(columns))
}

/// Convert one Arrow column into cells.
fn array_values(name: &str, col: &ArrayRef) -> Result<Vec<Value>> {
    fn collect<I, T>(iter: I, wrap: impl Fn(T) -> Value) -> Vec<Value>
    where
        I: Iterator<Item = Option<T>>,
    {
        iter.map(|v| v.map_or(Value::Null, &wrap)).collect()
    }

    let values = match col.data_type() {
        DataType::Null => vec![Value::Null; col.len()],
        DataType::Boolean => collect(col.as_boolean().iter(), Value::Bool),
        DataType::Int8 => collect(col.as_primitive::<Int8Type>().iter(), |v| Value::Integer(v.into())),
        DataType::Int16 => collect(col.as_primitive::<Int16Type>().iter(), |v| Value::Integer(v.into())),
        DataType::Int32 => collect(col.as_primitive::<Int32Type>().iter(), |v| Value::Integer(v.into())),
        DataType::Int64 => collect(col.as_primitive::<Int64Type>().iter(), Value::Integer),
        DataType::UInt8 => collect(col.as_primitive::<UInt8Type>().iter(), |v| Value::Integer(v.into())),
        DataType::UInt16 => collect(col.as_primitive::<UInt16Type>().iter(), |v| Value::Integer(v.into())),
        DataType::UInt32 => collect(col.as_primitive::<UInt32Type>().iter(), |v| Value::Integer(v.into())),
        DataType::UInt64 => collect(col.as_primitive::<UInt64Type>().iter(), |v| {
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }),
        DataType::Float32 => collect(col.as_primitive::<Float32Type>().iter(), |v| Value::Float(v.into())),
        DataType::Float64 => collect(col.as_primitive::<Float64Type>().iter(), Value::Float),
        DataType::Utf8 => collect(col.as_string::<i32>().iter(), |s: &str| Value::String(s.to_string())),
        DataType::LargeUtf8 => collect(col.as_string::<i64>().iter(), |s: &str| Value::String(s.to_string())),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let text = cast(col, &DataType::Utf8)?;
            collect(text.as_string::<i32>().iter(), |s: &str| Value::Date(s.to_string()))
        }
        // pandas categoricals arrive as dictionaries
        DataType::Dictionary(_, inner) if is_string_type(inner) => {
            let text = cast(col, &DataType::Utf8)?;
            collect(text.as_string::<i32>().iter(), |s: &str| Value::String(s.to_string()))
        }
        other => {
            return Err(StatcastError::UnsupportedType {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            })
        }
    };
    Ok(values)
}

fn is_string_type(t: &DataType) -> bool {
    matches!(t, DataType::Utf8 | DataType::LargeUtf8)
}
