use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};
use crate::catalog::{Column, PitchGroup};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection: column name → set of accepted values.
/// A column absent from the map is unconstrained; an empty set rejects
/// every row.
pub type ValueFilter = BTreeMap<String, BTreeSet<Value>>;

/// Return indices of rows that pass all filters, in row order.
///
/// A row passes a column filter when its value for that column is in the
/// selected set. Filtering on a column the table lacks is `MissingColumn`.
pub fn filtered_indices(table: &Table, filters: &ValueFilter) -> Result<Vec<usize>> {
    let mut keep = vec![true; table.num_rows()];
    for (col, selected) in filters {
        let values = table.column_by_name(col)?;
        for (flag, value) in keep.iter_mut().zip(values) {
            if *flag && !selected.contains(value) {
                *flag = false;
            }
        }
    }
    Ok(keep
        .iter()
        .enumerate()
        .filter(|(_, k)| **k)
        .map(|(i, _)| i)
        .collect())
}

/// New table with only the rows passing `filters`.
pub fn apply_filter(table: &Table, filters: &ValueFilter) -> Result<Table> {
    let indices = filtered_indices(table, filters)?;
    Ok(table.take(&indices))
}

/// New table with only the pitches whose `pitch_type` belongs to `group`.
pub fn filter_pitch_group(table: &Table, group: PitchGroup) -> Result<Table> {
    let selected: BTreeSet<Value> = group.members().iter().map(|c| Value::from(*c)).collect();
    let mut filters = ValueFilter::new();
    filters.insert(Column::PitchType.as_str().to_string(), selected);
    apply_filter(table, &filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches() -> Table {
        Table::from_columns([
            (
                "pitch_type",
                vec!["FF".into(), "SL".into(), "CH".into(), "SI".into(), Value::Null],
            ),
            (
                "stand",
                vec!["R".into(), "L".into(), "R".into(), "L".into(), "R".into()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_pitch_group_filter() {
        let fastballs = filter_pitch_group(&pitches(), PitchGroup::Fastball).unwrap();
        assert_eq!(
            fastballs.column(Column::PitchType).unwrap(),
            &[Value::from("FF"), Value::from("SI")]
        );
    }

    #[test]
    fn test_combined_filters_intersect() {
        let mut filters = ValueFilter::new();
        filters.insert("stand".into(), [Value::from("R")].into_iter().collect());
        filters.insert(
            "pitch_type".into(),
            [Value::from("FF"), Value::from("CH"), Value::Null].into_iter().collect(),
        );
        assert_eq!(filtered_indices(&pitches(), &filters).unwrap(), vec![0, 2, 4]);
    }

    #[test]
    fn test_empty_selection_rejects_all() {
        let mut filters = ValueFilter::new();
        filters.insert("stand".into(), BTreeSet::new());
        assert!(apply_filter(&pitches(), &filters).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_filter_column() {
        let mut filters = ValueFilter::new();
        filters.insert("zone".into(), BTreeSet::new());
        assert!(filtered_indices(&pitches(), &filters).is_err());
    }
}
