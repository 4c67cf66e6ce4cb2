//! Reduce pitch rows to one row per plate appearance.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::catalog::Column;
use crate::data::model::{Table, Value};
use crate::error::{Result, StatcastError};

/// Context carried forward by [`aggregate_pa_results`] when present in the
/// input: the game state at the terminal pitch.
pub const DEFAULT_CONTEXT: &[Column] = &[
    Column::GameYear,
    Column::Batter,
    Column::Pitcher,
    Column::HomeTeam,
    Column::AwayTeam,
    Column::Inning,
    Column::InningTopbot,
    Column::Balls,
    Column::Strikes,
    Column::OutsWhenUp,
    Column::On1b,
    Column::On2b,
    Column::On3b,
];

/// Number of pitches seen in the plate appearance.
pub const N_PITCHES: &str = "n_pitches";

/// Identity of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaKey {
    pub game_pk: i64,
    pub at_bat_number: i64,
}

/// Result of aggregation: one row per complete plate appearance plus the
/// keys dropped for lacking a terminal event.
#[derive(Debug, Clone)]
pub struct PaAggregation {
    /// Columns: `game_pk`, `at_bat_number`, `events`, `n_pitches`, then the
    /// context columns, ordered by key.
    pub table: Table,
    pub incomplete: Vec<PaKey>,
}

impl PaAggregation {
    pub fn incomplete_count(&self) -> usize {
        self.incomplete.len()
    }
}

#[derive(Default)]
struct Group {
    pitches: usize,
    terminal: Vec<usize>,
}

/// Groups pitch rows by `(game_pk, at_bat_number)` and keeps the single row
/// whose `events` field is populated.
#[derive(Debug, Clone, Default)]
pub struct PaAggregator {
    /// `None` carries whichever [`DEFAULT_CONTEXT`] columns the input has.
    context: Option<Vec<Column>>,
}

impl PaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carry exactly `columns` forward; each must exist in the input.
    pub fn with_context(columns: &[Column]) -> Self {
        PaAggregator {
            context: Some(columns.to_vec()),
        }
    }

    fn context_columns(&self, table: &Table) -> Vec<Column> {
        let cols: Vec<Column> = match &self.context {
            Some(cols) => cols.clone(),
            None => DEFAULT_CONTEXT
                .iter()
                .copied()
                .filter(|c| table.has_column(*c))
                .collect(),
        };
        let mut out: Vec<Column> = Vec::with_capacity(cols.len());
        for c in cols {
            let is_output = matches!(c, Column::GamePk | Column::AtBatNumber | Column::Events);
            if !is_output && !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Aggregate pitch rows to plate appearances.
    ///
    /// A key with more than one terminal-event row is
    /// `AmbiguousPlateAppearance`. A key with none (an at-bat cut off at a
    /// file boundary) is dropped and listed in `incomplete`.
    pub fn aggregate(&self, table: &Table) -> Result<PaAggregation> {
        let context = self.context_columns(table);
        let mut names: Vec<String> = vec![
            Column::GamePk.to_string(),
            Column::AtBatNumber.to_string(),
            Column::Events.to_string(),
            N_PITCHES.to_string(),
        ];
        names.extend(context.iter().map(|c| c.to_string()));

        if table.is_empty() {
            return Ok(PaAggregation {
                table: Table::empty(names),
                incomplete: Vec::new(),
            });
        }

        let game_pks = table.column(Column::GamePk)?;
        let at_bats = table.column(Column::AtBatNumber)?;
        let events = table.column(Column::Events)?;
        let context_values: Vec<&[Value]> = context
            .iter()
            .map(|c| table.column(*c))
            .collect::<Result<_>>()?;

        let mut groups: BTreeMap<PaKey, Group> = BTreeMap::new();
        for row in 0..table.num_rows() {
            let key = PaKey {
                game_pk: key_value(game_pks, Column::GamePk, row)?,
                at_bat_number: key_value(at_bats, Column::AtBatNumber, row)?,
            };
            let group = groups.entry(key).or_default();
            group.pitches += 1;
            if !events[row].is_null() {
                group.terminal.push(row);
            }
        }

        let mut incomplete = Vec::new();
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut seasons = Vec::new();
        for (key, group) in &groups {
            let row = match group.terminal.as_slice() {
                [row] => *row,
                [] => {
                    incomplete.push(*key);
                    continue;
                }
                rows => {
                    return Err(StatcastError::AmbiguousPlateAppearance {
                        game_pk: key.game_pk,
                        at_bat_number: key.at_bat_number,
                        terminal_rows: rows.len(),
                    })
                }
            };
            columns[0].push(Value::Integer(key.game_pk));
            columns[1].push(Value::Integer(key.at_bat_number));
            columns[2].push(events[row].clone());
            columns[3].push(Value::Integer(group.pitches as i64));
            for (out, values) in columns[4..].iter_mut().zip(&context_values) {
                out.push(values[row].clone());
            }
            seasons.push(table.season_of(row));
        }

        if !incomplete.is_empty() {
            warn!(
                "Dropped {} incomplete plate appearances (no terminal event)",
                incomplete.len()
            );
        }
        debug!(
            "Aggregated {} pitches into {} plate appearances",
            table.num_rows(),
            seasons.len()
        );

        let pa_table = Table::from_columns(names.into_iter().zip(columns))?.with_row_seasons(seasons)?;
        Ok(PaAggregation {
            table: pa_table,
            incomplete,
        })
    }
}

fn key_value(values: &[Value], column: Column, row: usize) -> Result<i64> {
    values[row].as_i64().ok_or_else(|| StatcastError::InvalidValue {
        column: column.to_string(),
        row,
        reason: format!("plate appearance key must be an integer, got '{}'", values[row]),
    })
}

/// Aggregate with the default context columns.
pub fn aggregate_pa_results(table: &Table) -> Result<PaAggregation> {
    PaAggregator::new().aggregate(table)
}
