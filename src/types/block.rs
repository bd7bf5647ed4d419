//! Blocks: ordered, name-indexed collections of typed columns

use crate::common::constants::DUMMY_COLUMN_NAME;
use crate::types::column::{Column, ColumnWithTypeAndName};
use crate::types::{LogicalType, Value};
use ahash::AHashMap;

/// Ordered collection of named columns.
///
/// Inserting a name that already exists replaces the column in place and keeps
/// its position.
#[derive(Debug, Clone, Default)]
pub struct Block {
    columns: Vec<ColumnWithTypeAndName>,
    index_by_name: AHashMap<String, usize>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block holding only the `_dummy` sentinel, the state of a constants
    /// block that expression analysis never filled
    pub fn with_dummy_column() -> Self {
        let mut block = Self::new();
        block.insert(ColumnWithTypeAndName::new(
            Column::new_const(Value::TinyInt(1), 1),
            LogicalType::TinyInt,
            DUMMY_COLUMN_NAME,
        ));
        block
    }

    pub fn from_columns(columns: impl IntoIterator<Item = ColumnWithTypeAndName>) -> Self {
        let mut block = Self::new();
        for column in columns {
            block.insert(column);
        }
        block
    }

    pub fn insert(&mut self, column: ColumnWithTypeAndName) {
        match self.index_by_name.get(&column.name) {
            Some(&position) => self.columns[position] = column,
            None => {
                self.index_by_name
                    .insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.index_by_name.contains_key(name)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ColumnWithTypeAndName> {
        self.index_by_name
            .get(name)
            .map(|&position| &self.columns[position])
    }

    pub fn get_by_position(&self, position: usize) -> Option<&ColumnWithTypeAndName> {
        self.columns.get(position)
    }

    pub fn columns(&self) -> &[ColumnWithTypeAndName] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
