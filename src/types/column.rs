//! Columns as seen by expression analysis
//!
//! Analysis never scans data, so a column here is either a small materialized
//! vector of values, a constant wrapper repeating one value, or a placeholder
//! carrying a precomputed set for the right-hand side of `IN`.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::sets::SetRef;
use crate::types::{LogicalType, Value};
use std::fmt;
use std::sync::Arc;

/// Shared column pointer
pub type ColumnRef = Arc<Column>;

/// Column data
#[derive(Clone)]
pub enum Column {
    /// Materialized values
    Values(Vec<Value>),
    /// A single-row data column logically repeated `len` times
    Const { data: ColumnRef, len: usize },
    /// Deferred set placeholder for `IN` right-hand sides
    Set(ColumnSet),
}

/// Column payload referencing a precomputed set
#[derive(Clone)]
pub struct ColumnSet {
    len: usize,
    set: SetRef,
}

impl ColumnSet {
    pub fn new(len: usize, set: SetRef) -> Self {
        Self { len, set }
    }

    /// The set this column refers to, built or not
    pub fn set(&self) -> &SetRef {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Column {
    /// Create a constant column repeating `value` `len` times
    pub fn new_const(value: Value, len: usize) -> ColumnRef {
        Arc::new(Column::Const {
            data: Arc::new(Column::Values(vec![value])),
            len,
        })
    }

    /// Create a constant column wrapping a deferred set
    pub fn new_const_set(set: SetRef, len: usize) -> ColumnRef {
        Arc::new(Column::Const {
            data: Arc::new(Column::Set(ColumnSet::new(1, set))),
            len,
        })
    }

    /// Create a materialized column
    pub fn from_values(values: Vec<Value>) -> ColumnRef {
        Arc::new(Column::Values(values))
    }

    /// Number of logical rows
    pub fn len(&self) -> usize {
        match self {
            Column::Values(values) => values.len(),
            Column::Const { len, .. } => *len,
            Column::Set(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this column is a constant wrapper
    pub fn is_const(&self) -> bool {
        matches!(self, Column::Const { .. })
    }

    /// The wrapped data column of a constant, or the column itself
    pub fn data_column(&self) -> &Column {
        match self {
            Column::Const { data, .. } => data,
            other => other,
        }
    }

    /// The deferred set payload, looking through a constant wrapper
    pub fn as_column_set(&self) -> Option<&ColumnSet> {
        match self.data_column() {
            Column::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Value at `index`.
    ///
    /// Constants answer every index with their single value, even when their
    /// logical length is zero.
    pub fn get(&self, index: usize) -> PrismDBResult<Value> {
        match self {
            Column::Values(values) => values.get(index).cloned().ok_or_else(|| {
                PrismDBError::InvalidArgument(format!(
                    "Index {} out of bounds for column with {} values",
                    index,
                    values.len()
                ))
            }),
            Column::Const { data, .. } => data.get(0),
            Column::Set(_) => Err(PrismDBError::InvalidType(
                "Cannot extract a value from a set column".to_string(),
            )),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Column::Const { data, len } => f
                .debug_struct("Const")
                .field("data", data)
                .field("len", len)
                .finish(),
            Column::Set(set) => f
                .debug_struct("Set")
                .field("len", &set.len)
                .field("created", &set.set.is_created())
                .finish(),
        }
    }
}

/// A column together with its type and name
#[derive(Debug, Clone)]
pub struct ColumnWithTypeAndName {
    pub column: ColumnRef,
    pub data_type: LogicalType,
    pub name: String,
}

impl ColumnWithTypeAndName {
    pub fn new(column: ColumnRef, data_type: LogicalType, name: impl Into<String>) -> Self {
        Self {
            column,
            data_type,
            name: name.into(),
        }
    }
}
