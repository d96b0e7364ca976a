//! Column value conversion between the domain and SQLite

use rusqlite::types::{Value, ValueRef};
use uuid::Uuid;
use vspheredb_domain::{ColumnValue, FieldKind, Result, VsphereDbError};

/// SQLite value for a column value; flags become `'y'` / `'n'`.
pub fn to_sql(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Null => Value::Null,
        ColumnValue::Text(s) => Value::Text(s.clone()),
        ColumnValue::Integer(i) => Value::Integer(*i),
        ColumnValue::Real(x) => Value::Real(*x),
        ColumnValue::Uuid(u) => Value::Blob(u.as_bytes().to_vec()),
        ColumnValue::Flag(b) => Value::Text(ColumnValue::flag_char(*b).to_string()),
    }
}

pub fn uuid_to_sql(uuid: &Uuid) -> Value {
    Value::Blob(uuid.as_bytes().to_vec())
}

/// Read a 16 byte UUID blob.
pub fn uuid_from_sql(value: ValueRef<'_>) -> Result<Uuid> {
    match value {
        ValueRef::Blob(bytes) => Uuid::from_slice(bytes)
            .map_err(|e| VsphereDbError::Database(format!("invalid UUID blob: {e}"))),
        other => Err(VsphereDbError::Database(format!(
            "expected UUID blob, got {}",
            other.data_type()
        ))),
    }
}

/// Read a stored column according to its declared kind.
pub fn from_sql(kind: FieldKind, value: ValueRef<'_>) -> Result<ColumnValue> {
    if let ValueRef::Null = value {
        return Ok(ColumnValue::Null);
    }

    match (kind, value) {
        (FieldKind::Reference, value) => uuid_from_sql(value).map(ColumnValue::Uuid),
        (FieldKind::Boolean, ValueRef::Text(b"y")) => Ok(ColumnValue::Flag(true)),
        (FieldKind::Boolean, ValueRef::Text(b"n")) => Ok(ColumnValue::Flag(false)),
        (FieldKind::Text, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .map(|s| ColumnValue::Text(s.to_string()))
            .map_err(|e| VsphereDbError::Database(format!("invalid UTF-8 in text column: {e}"))),
        (FieldKind::Text, ValueRef::Integer(i)) => Ok(ColumnValue::Text(i.to_string())),
        (FieldKind::Text, ValueRef::Real(x)) => Ok(ColumnValue::Text(x.to_string())),
        (FieldKind::Integer, ValueRef::Integer(i)) => Ok(ColumnValue::Integer(i)),
        (FieldKind::Real, ValueRef::Real(x)) => Ok(ColumnValue::Real(x)),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::Real, ValueRef::Integer(i)) => Ok(ColumnValue::Real(i as f64)),
        (kind, other) => Err(VsphereDbError::Database(format!(
            "unexpected {} value in {:?} column",
            other.data_type(),
            kind
        ))),
    }
}
