use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Row;
use serde_json::{Map, Number, Value};

use super::schema::{ColumnKind, TableSchema};
use crate::error::GatewayError;

/// Reads every column of `row` into a JSON object, typed by the table schema.
pub fn row_to_json(
    row: &Row<'_>,
    column_names: &[String],
    table: &TableSchema,
) -> rusqlite::Result<Map<String, Value>> {
    let mut object = Map::with_capacity(column_names.len());
    for (index, name) in column_names.iter().enumerate() {
        let kind = table.kind(name).unwrap_or(ColumnKind::Text);
        object.insert(name.clone(), cell_to_json(row.get_ref(index)?, kind));
    }
    Ok(object)
}

fn cell_to_json(cell: ValueRef<'_>, kind: ColumnKind) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) if kind == ColumnKind::Boolean => Value::Bool(i != 0),
        ValueRef::Integer(i) if kind == ColumnKind::Real => Number::from_f64(i as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

/// Converts a JSON scalar into a bindable SQLite value.
pub fn json_to_sql(column: &str, value: &Value) -> Result<SqlValue, GatewayError> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(GatewayError::InvalidRow(format!("{column}: number out of range")))
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(GatewayError::InvalidRow(format!(
            "{column}: nested values cannot be written"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_scalars_bind() {
        assert_eq!(json_to_sql("a", &json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(json_to_sql("a", &json!(150)).unwrap(), SqlValue::Integer(150));
        assert_eq!(json_to_sql("a", &json!(1500.5)).unwrap(), SqlValue::Real(1500.5));
        assert_eq!(json_to_sql("a", &json!(null)).unwrap(), SqlValue::Null);
        assert_eq!(
            json_to_sql("a", &json!("Acme")).unwrap(),
            SqlValue::Text("Acme".to_string())
        );
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let result = json_to_sql("companies", &json!({"name": "Acme"}));
        assert!(matches!(result, Err(GatewayError::InvalidRow(_))));
    }
}
