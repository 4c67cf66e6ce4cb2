use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Table, Value};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Arrow conversion
// ---------------------------------------------------------------------------

/// Arrow type a column of cells is written as.
///
/// Integers stay Int64 unless mixed with floats; strings and dates become
/// Utf8; a column with no non-null cells is written as Float64 nulls.
fn infer_type(values: &[Value]) -> DataType {
    let mut ty: Option<DataType> = None;
    for v in values {
        let t = match v {
            Value::Null => continue,
            Value::Integer(_) => DataType::Int64,
            Value::Float(_) => DataType::Float64,
            Value::Bool(_) => DataType::Boolean,
            Value::String(_) | Value::Date(_) => DataType::Utf8,
        };
        ty = Some(match (ty, t) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::Utf8,
        });
    }
    ty.unwrap_or(DataType::Float64)
}

fn to_array(values: &[Value], ty: &DataType) -> ArrayRef {
    match ty {
        DataType::Int64 => Arc::new(values.iter().map(Value::as_i64).collect::<Int64Array>()),
        DataType::Float64 => Arc::new(values.iter().map(Value::as_f64).collect::<Float64Array>()),
        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        _ => Arc::new(
            values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect::<StringArray>(),
        ),
    }
}

/// Convert a table to a single Arrow record batch.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays = Vec::with_capacity(table.num_columns());
    for (name, values) in table.iter_columns() {
        let ty = infer_type(values);
        arrays.push(to_array(values, &ty));
        fields.push(Field::new(name, ty, true));
    }
    let schema = Arc::new(Schema::new(fields));
    Ok(RecordBatch::try_new(schema, arrays)?)
}

// ---------------------------------------------------------------------------
// Parquet / CSV output
// ---------------------------------------------------------------------------

/// Write a table as a Parquet file readable by [`super::loader::SeasonLoader`].
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write a table as CSV with a header row; nulls are empty fields.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.column_names())?;
    let columns: Vec<&[Value]> = table.iter_columns().map(|(_, v)| v).collect();
    for row in 0..table.num_rows() {
        writer.write_record(columns.iter().map(|col| col[row].to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_inference() {
        assert_eq!(infer_type(&[Value::Integer(1), Value::Null]), DataType::Int64);
        assert_eq!(infer_type(&[Value::Integer(1), Value::Float(2.5)]), DataType::Float64);
        assert_eq!(infer_type(&[Value::Null]), DataType::Float64);
        assert_eq!(infer_type(&[Value::Integer(1), Value::from("x")]), DataType::Utf8);
    }

    #[test]
    fn test_csv_output() {
        let t = Table::from_columns([
            ("events", vec![Value::from("strikeout"), Value::Null]),
            ("launch_speed", vec![Value::Null, Value::Float(101.5)]),
        ])
        .unwrap();
        let mut buf = Vec::new();
        write_csv(&t, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "events,launch_speed\nstrikeout,\n,101.5\n"
        );
    }
}
