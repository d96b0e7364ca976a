//! Field and record-type descriptors
//!
//! A descriptor names the table of an object kind and declares, per mapped
//! property, which column it lands in and how its value is converted.

use super::kind::ObjectKind;

/// How a remote property value is converted into a column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Stored as text
    Text,
    /// Stored as a 64 bit integer
    Integer,
    /// Stored as a floating point number
    Real,
    /// Stored as `'y'` / `'n'`
    Boolean,
    /// Managed object reference, stored as the derived UUID of its target
    Reference,
}

impl FieldKind {
    /// SQLite column type used for this kind
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Boolean => "TEXT",
            Self::Reference => "BLOB",
        }
    }
}

/// One mapped property of an object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub property_path: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(property_path: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { property_path, column, kind }
    }

    pub const fn text(property_path: &'static str, column: &'static str) -> Self {
        Self::new(property_path, column, FieldKind::Text)
    }

    pub const fn integer(property_path: &'static str, column: &'static str) -> Self {
        Self::new(property_path, column, FieldKind::Integer)
    }

    pub const fn real(property_path: &'static str, column: &'static str) -> Self {
        Self::new(property_path, column, FieldKind::Real)
    }

    pub const fn boolean(property_path: &'static str, column: &'static str) -> Self {
        Self::new(property_path, column, FieldKind::Boolean)
    }

    pub const fn reference(property_path: &'static str, column: &'static str) -> Self {
        Self::new(property_path, column, FieldKind::Reference)
    }

    /// The `parent` property, always a reference
    pub const fn parent() -> Self {
        Self::reference("parent", "parent_uuid")
    }
}

/// Static description of one synchronized object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectTypeDescriptor {
    pub kind: ObjectKind,
    pub table: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl ObjectTypeDescriptor {
    /// Property paths to request from the remote API, in declaration order
    pub fn property_set(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.property_path.to_string()).collect()
    }

    /// Mapped column names, in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }

    pub fn field_for_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column == column)
    }
}
