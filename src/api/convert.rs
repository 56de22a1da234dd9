use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow::ipc::writer::StreamWriter;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::Value;

use crate::core::CsvqlError;
use crate::table::Table;

use super::types::TableJson;

impl TryFrom<&Table> for TableJson {
    type Error = CsvqlError;

    fn try_from(table: &Table) -> Result<Self, CsvqlError> {
        let batch = table.batch();
        let columns = batch
            .columns()
            .iter()
            .map(|array| array_to_json_values(array.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = (0..batch.num_rows())
            .map(|row| columns.iter().map(|col| col[row].clone()).collect())
            .collect();

        Ok(TableJson {
            name: None,
            columns: table.column_names(),
            num_rows: batch.num_rows(),
            rows,
        })
    }
}

fn array_to_json_values(array: &dyn Array) -> Result<Vec<Value>, CsvqlError> {
    macro_rules! primitive {
        ($t:ty) => {{
            let arr = array.as_primitive::<$t>();
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::from(arr.value(i))
                    }
                })
                .collect()
        }};
    }

    let values: Vec<Value> = match array.data_type() {
        DataType::Int8 => primitive!(Int8Type),
        DataType::Int16 => primitive!(Int16Type),
        DataType::Int32 => primitive!(Int32Type),
        DataType::Int64 => primitive!(Int64Type),
        DataType::UInt8 => primitive!(UInt8Type),
        DataType::UInt16 => primitive!(UInt16Type),
        DataType::UInt32 => primitive!(UInt32Type),
        DataType::UInt64 => primitive!(UInt64Type),
        DataType::Float32 => primitive!(Float32Type),
        DataType::Float64 => primitive!(Float64Type),
        DataType::Boolean => {
            let arr = array.as_boolean();
            (0..arr.len())
                .map(|i| match arr.is_null(i) {
                    true => Value::Null,
                    false => Value::Bool(arr.value(i)),
                })
                .collect()
        }
        DataType::Utf8 => {
            let arr = array.as_string::<i32>();
            arr.iter()
                .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            arr.iter()
                .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
                .collect()
        }
        DataType::Utf8View => {
            let arr = array.as_string_view();
            arr.iter()
                .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
                .collect()
        }
        // Dates, timestamps, decimals and the rest go out in their display form.
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            (0..array.len())
                .map(|i| match array.is_null(i) {
                    true => Value::Null,
                    false => Value::String(formatter.value(i).to_string()),
                })
                .collect()
        }
    };
    Ok(values)
}

/// Encodes the table as a single-batch Arrow IPC stream.
pub fn table_to_ipc(table: &Table) -> Result<Vec<u8>, CsvqlError> {
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &table.schema())?;
        writer.write(table.batch())?;
        writer.finish()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;

    #[test]
    fn test_table_to_json_rows() {
        let table = Loader::default()
            .load(
                b"id,name,score,ok,day\n1,Alice,2.5,true,2024-01-31\n2,,,false,2024-02-01\n",
                "t.csv",
            )
            .unwrap()
            .table;
        let json = TableJson::try_from(&table).unwrap();

        assert_eq!(json.columns, vec!["id", "name", "score", "ok", "day"]);
        assert_eq!(json.num_rows, 2);
        assert_eq!(
            json.rows[0],
            vec![
                Value::from(1),
                Value::from("Alice"),
                Value::from(2.5),
                Value::Bool(true),
                Value::from("2024-01-31"),
            ]
        );
        assert_eq!(json.rows[1][0], Value::from(2));
        assert_eq!(json.rows[1][2], Value::Null);
    }
}
