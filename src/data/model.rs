use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::Column;
use crate::error::{Result, StatcastError};

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes found in Statcast exports.
/// Used as a key in `BTreeSet` for unique-value scans, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date or timestamp rendered as ISO-8601 text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so Value can live in a BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Date(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. NaN floats read as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view; accepts integral floats since pandas stores nullable
    /// integer columns (zone, on_1b, ...) as float64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Date(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable column-oriented table
// ---------------------------------------------------------------------------

/// Column-oriented table of cells with per-row season provenance.
///
/// Every transforming method returns a new table; nothing mutates a table in
/// place, so one loaded season can back any number of analyses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    /// Season each row was loaded from (`None` for tables built in memory).
    seasons: Vec<Option<u16>>,
}

impl Table {
    /// Build a table from named columns of equal length.
    pub fn from_columns<S, I>(columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<Value>)>,
    {
        let mut names = Vec::new();
        let mut data: Vec<Vec<Value>> = Vec::new();
        for (name, values) in columns {
            let name = name.into();
            if let Some(first) = data.first() {
                if first.len() != values.len() {
                    return Err(StatcastError::LengthMismatch {
                        what: format!("column '{name}'"),
                        expected: first.len(),
                        found: values.len(),
                    });
                }
            }
            match names.iter().position(|n| *n == name) {
                Some(idx) => data[idx] = values,
                None => {
                    names.push(name);
                    data.push(values);
                }
            }
        }
        let n_rows = data.first().map_or(0, Vec::len);
        Ok(Table {
            names,
            columns: data,
            seasons: vec![None; n_rows],
        })
    }

    /// A zero-row table with the given column names.
    pub fn empty<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let columns = vec![Vec::new(); names.len()];
        Table {
            names,
            columns,
            seasons: Vec::new(),
        }
    }

    /// Tag every row with the season it came from.
    pub fn with_season(mut self, season: u16) -> Self {
        self.seasons = vec![Some(season); self.num_rows()];
        self
    }

    pub(crate) fn with_row_seasons(mut self, seasons: Vec<Option<u16>>) -> Result<Self> {
        if seasons.len() != self.num_rows() {
            return Err(StatcastError::LengthMismatch {
                what: "row seasons".to_string(),
                expected: self.num_rows(),
                found: seasons.len(),
            });
        }
        self.seasons = seasons;
        Ok(self)
    }

    pub fn num_rows(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.names.iter().any(|n| n == column.as_str())
    }

    /// Cells of a known column, or `MissingColumn` naming it.
    pub fn column(&self, column: Column) -> Result<&[Value]> {
        self.column_by_name(column.as_str())
    }

    pub fn column_by_name(&self, name: &str) -> Result<&[Value]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| StatcastError::missing_column(name, "the input table"))
    }

    pub fn season_of(&self, row: usize) -> Option<u16> {
        self.seasons.get(row).copied().flatten()
    }

    pub fn row_seasons(&self) -> &[Option<u16>] {
        &self.seasons
    }

    /// Iterate `(name, cells)` pairs in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// New table holding only `columns`, in the given order.
    pub fn select(&self, columns: &[Column]) -> Result<Table> {
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for col in columns {
            if names.iter().any(|n: &String| n == col.as_str()) {
                continue;
            }
            data.push(self.column(*col)?.to_vec());
            names.push(col.as_str().to_string());
        }
        Ok(Table {
            names,
            columns: data,
            seasons: self.seasons.clone(),
        })
    }

    /// New table with the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= self.num_rows()`. Use [`Table::filter`] for
    /// selections built from untrusted input.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| indices.iter().map(|&i| col[i].clone()).collect())
                .collect(),
            seasons: indices.iter().map(|&i| self.seasons[i]).collect(),
        }
    }

    /// New table with the rows where `mask` is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.num_rows() {
            return Err(StatcastError::LengthMismatch {
                what: "row mask".to_string(),
                expected: self.num_rows(),
                found: mask.len(),
            });
        }
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| i)
            .collect();
        Ok(self.take(&indices))
    }

    /// New table with `values` added as column `name` (replacing an existing
    /// column of that name).
    pub fn with_column(&self, name: impl Into<String>, values: Vec<Value>) -> Result<Table> {
        let name = name.into();
        if values.len() != self.num_rows() {
            return Err(StatcastError::LengthMismatch {
                what: format!("column '{name}'"),
                expected: self.num_rows(),
                found: values.len(),
            });
        }
        let mut out = self.clone();
        match out.names.iter().position(|n| *n == name) {
            Some(idx) => out.columns[idx] = values,
            None => {
                out.names.push(name);
                out.columns.push(values);
            }
        }
        Ok(out)
    }

    /// Row-wise union of tables in order. Columns are the union of all inputs
    /// in first-seen order; a table lacking a column contributes nulls.
    pub fn concat(tables: &[Table]) -> Table {
        let mut names: Vec<String> = Vec::new();
        for t in tables {
            for n in &t.names {
                if !names.contains(n) {
                    names.push(n.clone());
                }
            }
        }
        let total: usize = tables.iter().map(Table::num_rows).sum();
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(total); names.len()];
        let mut seasons = Vec::with_capacity(total);
        for t in tables {
            for (name, out) in names.iter().zip(columns.iter_mut()) {
                match t.names.iter().position(|n| n == name) {
                    Some(idx) => out.extend(t.columns[idx].iter().cloned()),
                    None => out.extend(std::iter::repeat(Value::Null).take(t.num_rows())),
                }
            }
            seasons.extend_from_slice(&t.seasons);
        }
        Table {
            names,
            columns,
            seasons,
        }
    }

    /// Sorted set of distinct values in a column.
    pub fn unique_values(&self, name: &str) -> Result<BTreeSet<Value>> {
        Ok(self.column_by_name(name)?.iter().cloned().collect())
    }

    /// Row counts per season of provenance.
    pub fn rows_per_season(&self) -> BTreeMap<Option<u16>, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.seasons {
            *counts.entry(*s).or_insert(0) += 1;
        }
        counts
    }
}
