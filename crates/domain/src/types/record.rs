//! Locally persisted inventory records

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use uuid::Uuid;

/// A single column value of a stored record
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Uuid(Uuid),
    /// Persisted as `'y'` / `'n'`
    Flag(bool),
}

impl ColumnValue {
    /// Database representation of a flag
    pub const fn flag_char(value: bool) -> &'static str {
        if value {
            "y"
        } else {
            "n"
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Flag(b) => f.write_str(Self::flag_char(*b)),
        }
    }
}

static NULL: ColumnValue = ColumnValue::Null;

/// Local representation of one remote object
///
/// Keeps track of whether it came from the database and which columns have
/// been changed since. Setting a column to the value it already holds is not
/// a modification.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    uuid: Uuid,
    vcenter_uuid: Uuid,
    values: BTreeMap<String, ColumnValue>,
    loaded_from_db: bool,
    modified: BTreeSet<String>,
}

impl StoredRecord {
    /// A record that does not exist in the database yet
    pub fn new(uuid: Uuid, vcenter_uuid: Uuid) -> Self {
        Self {
            uuid,
            vcenter_uuid,
            values: BTreeMap::new(),
            loaded_from_db: false,
            modified: BTreeSet::new(),
        }
    }

    /// A record as read from the database, with no pending modifications
    pub fn from_db(uuid: Uuid, vcenter_uuid: Uuid, values: BTreeMap<String, ColumnValue>) -> Self {
        Self { uuid, vcenter_uuid, values, loaded_from_db: true, modified: BTreeSet::new() }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn vcenter_uuid(&self) -> Uuid {
        self.vcenter_uuid
    }

    /// Current value of a column; unset columns read as `Null`
    pub fn get(&self, column: &str) -> &ColumnValue {
        self.values.get(column).unwrap_or(&NULL)
    }

    /// Set a column, recording a modification only if the value changes
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, column: &str, value: ColumnValue) -> bool {
        if self.get(column) == &value && (self.loaded_from_db || self.values.contains_key(column)) {
            return false;
        }

        self.values.insert(column.to_string(), value);
        self.modified.insert(column.to_string());
        true
    }

    pub fn values(&self) -> &BTreeMap<String, ColumnValue> {
        &self.values
    }

    pub fn has_been_loaded_from_db(&self) -> bool {
        self.loaded_from_db
    }

    pub fn has_been_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Columns changed since load, in column name order
    pub fn modified_columns(&self) -> impl Iterator<Item = (&str, &ColumnValue)> + '_ {
        self.modified.iter().map(move |column| (column.as_str(), self.get(column)))
    }
}
