//! Property mapping
//!
//! Converts remote property values into column values according to the
//! field kind each descriptor declares.

use vspheredb_domain::{
    ColumnValue, FieldDescriptor, FieldKind, ObjectTypeDescriptor, PropertyValue, RemoteObject,
    Result, StoredRecord, VCenter, VsphereDbError,
};

/// Copy every mapped property present on `remote` into `record`.
///
/// Property paths missing from the remote object leave their column
/// untouched. The first value that does not fit its declared kind aborts
/// with [`VsphereDbError::Programming`].
pub fn apply_mapped_properties(
    record: &mut StoredRecord,
    remote: &RemoteObject,
    vcenter: &VCenter,
    descriptor: &ObjectTypeDescriptor,
) -> Result<()> {
    for field in descriptor.fields {
        if let Some(value) = remote.property(field.property_path) {
            let column_value = convert(field, value, vcenter)?;
            record.set(field.column, column_value);
        }
    }

    Ok(())
}

/// Convert a single property value for the given field.
pub fn convert(
    field: &FieldDescriptor,
    value: &PropertyValue,
    vcenter: &VCenter,
) -> Result<ColumnValue> {
    if value.is_null() {
        return Ok(ColumnValue::Null);
    }

    match field.kind {
        FieldKind::Reference => to_reference(field, value, vcenter),
        FieldKind::Boolean => match value {
            PropertyValue::Bool(b) => Ok(ColumnValue::Flag(*b)),
            other => Err(mismatch("Boolean", field, other)),
        },
        FieldKind::Text => Ok(ColumnValue::Text(to_text(value))),
        FieldKind::Integer => to_integer(field, value),
        FieldKind::Real => to_real(field, value),
    }
}

fn to_reference(
    field: &FieldDescriptor,
    value: &PropertyValue,
    vcenter: &VCenter,
) -> Result<ColumnValue> {
    let id = match value {
        PropertyValue::Reference(moref) => moref.value.as_str(),
        PropertyValue::Text(id) => id.as_str(),
        other => return Err(mismatch("Object reference", field, other)),
    };

    if id.is_empty() {
        Ok(ColumnValue::Null)
    } else {
        Ok(ColumnValue::Uuid(vcenter.make_global_uuid(id)))
    }
}

fn to_text(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Text(s) => s.clone(),
        PropertyValue::Reference(moref) => moref.value.clone(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Integer(i) => i.to_string(),
        PropertyValue::Float(x) => x.to_string(),
        PropertyValue::Other(json) => json.to_string(),
        PropertyValue::Null => String::new(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_integer(field: &FieldDescriptor, value: &PropertyValue) -> Result<ColumnValue> {
    match value {
        PropertyValue::Integer(i) => Ok(ColumnValue::Integer(*i)),
        PropertyValue::Float(x)
            if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x <= i64::MAX as f64 =>
        {
            Ok(ColumnValue::Integer(*x as i64))
        }
        PropertyValue::Text(s) => {
            s.trim().parse::<i64>().map(ColumnValue::Integer).map_err(|_| mismatch("Integer", field, value))
        }
        other => Err(mismatch("Integer", field, other)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_real(field: &FieldDescriptor, value: &PropertyValue) -> Result<ColumnValue> {
    match value {
        PropertyValue::Integer(i) => Ok(ColumnValue::Real(*i as f64)),
        PropertyValue::Float(x) => Ok(ColumnValue::Real(*x)),
        PropertyValue::Text(s) => {
            s.trim().parse::<f64>().map(ColumnValue::Real).map_err(|_| mismatch("Real", field, value))
        }
        other => Err(mismatch("Real", field, other)),
    }
}

fn mismatch(expected: &str, field: &FieldDescriptor, got: &PropertyValue) -> VsphereDbError {
    VsphereDbError::Programming(format!(
        "{expected} expected, got {got} (property {})",
        field.property_path
    ))
}
