//! Precomputed sets for `IN` predicates

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::logical_err;
use crate::types::{LogicalType, Value};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

/// Shared set pointer
pub type SetRef = Arc<Set>;

/// Pairs a position in the `IN` tuple with the index key column it constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyTuplePositionMapping {
    pub tuple_index: usize,
    pub key_index: usize,
}

impl KeyTuplePositionMapping {
    pub fn new(tuple_index: usize, key_index: usize) -> Self {
        Self {
            tuple_index,
            key_index,
        }
    }
}

/// A collection of rows against which membership is tested.
///
/// A set is registered before it is filled; it only becomes usable for index
/// analysis after [`Set::finish`] marks it created. Rows are fixed from then on.
#[derive(Debug)]
pub struct Set {
    data_types: Vec<LogicalType>,
    rows: RwLock<Vec<Vec<Value>>>,
    is_created: AtomicBool,
    ordered_rows: OnceLock<Arc<Vec<Vec<Value>>>>,
}

impl Set {
    /// Create an empty, not yet created set with one type per tuple position
    pub fn new(data_types: Vec<LogicalType>) -> Self {
        Self {
            data_types,
            rows: RwLock::new(Vec::new()),
            is_created: AtomicBool::new(false),
            ordered_rows: OnceLock::new(),
        }
    }

    /// Build a created set from the given rows in one go
    pub fn from_rows(data_types: Vec<LogicalType>, rows: Vec<Vec<Value>>) -> PrismDBResult<SetRef> {
        let set = Set::new(data_types);
        for row in rows {
            set.insert_row(row)?;
        }
        set.finish();
        Ok(Arc::new(set))
    }

    /// Append a row while the set is still being built
    pub fn insert_row(&self, row: Vec<Value>) -> PrismDBResult<()> {
        if self.is_created() {
            return Err(logical_err!("Cannot insert into a set that is already created"));
        }
        if row.len() != self.data_types.len() {
            return Err(PrismDBError::InvalidArgument(format!(
                "Set row has {} values, expected {}",
                row.len(),
                self.data_types.len()
            )));
        }
        self.rows.write().push(row);
        Ok(())
    }

    /// Mark the set as fully built
    pub fn finish(&self) {
        self.is_created.store(true, AtomicOrdering::Release);
    }

    /// Whether the set is fully built
    pub fn is_created(&self) -> bool {
        self.is_created.load(AtomicOrdering::Acquire)
    }

    /// Types the set was built with, one per tuple position
    pub fn data_types(&self) -> &[LogicalType] {
        &self.data_types
    }

    /// Compare the set's type at `position` with `other`, ignoring nullability.
    ///
    /// Out-of-range positions never match.
    pub fn are_types_equal(&self, position: usize, other: &LogicalType) -> bool {
        self.data_types
            .get(position)
            .map(|set_type| set_type.remove_nullable() == other.remove_nullable())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `row` is one of the set's rows
    pub fn contains(&self, row: &[Value]) -> PrismDBResult<bool> {
        for candidate in self.rows.read().iter() {
            if candidate.len() == row.len() && Self::compare_rows(candidate, row)? == Ordering::Equal {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Rows in ascending order, computed on first use after creation
    pub fn ordered_rows(&self) -> PrismDBResult<Arc<Vec<Vec<Value>>>> {
        if !self.is_created() {
            return Err(logical_err!("Set is not created yet"));
        }
        let ordered = self.ordered_rows.get_or_init(|| {
            let mut rows = self.rows.read().clone();
            rows.sort_by(|a, b| Self::compare_rows(a, b).unwrap_or(Ordering::Equal));
            rows.dedup_by(|a, b| matches!(Self::compare_rows(a, b), Ok(Ordering::Equal)));
            Arc::new(rows)
        });
        Ok(ordered.clone())
    }

    fn compare_rows(left: &[Value], right: &[Value]) -> PrismDBResult<Ordering> {
        for (a, b) in left.iter().zip(right.iter()) {
            let ordering = a.compare(b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(left.len().cmp(&right.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_lifecycle() {
        let set = Set::new(vec![LogicalType::Integer]);
        assert!(!set.is_created());
        set.insert_row(vec![Value::integer(3)]).unwrap();
        set.insert_row(vec![Value::integer(1)]).unwrap();
        assert!(set.ordered_rows().is_err());

        set.finish();
        assert!(set.is_created());
        assert!(set.insert_row(vec![Value::integer(2)]).unwrap_err().is_logical());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_row_arity_is_checked() {
        let set = Set::new(vec![LogicalType::Integer, LogicalType::Varchar]);
        assert!(set.insert_row(vec![Value::integer(1)]).is_err());
    }

    #[test]
    fn test_types_equal_ignores_nullable() {
        let set = Set::new(vec![LogicalType::Integer.make_nullable(), LogicalType::Varchar]);
        assert!(set.are_types_equal(0, &LogicalType::Integer));
        assert!(set.are_types_equal(1, &LogicalType::Varchar.make_nullable()));
        assert!(!set.are_types_equal(0, &LogicalType::BigInt));
        assert!(!set.are_types_equal(2, &LogicalType::Integer));
    }

    #[test]
    fn test_contains_and_ordering() {
        let set = Set::from_rows(
            vec![LogicalType::BigInt],
            vec![
                vec![Value::bigint(5)],
                vec![Value::bigint(-1)],
                vec![Value::bigint(5)],
            ],
        )
        .unwrap();

        assert!(set.contains(&[Value::integer(5)]).unwrap());
        assert!(!set.contains(&[Value::integer(4)]).unwrap());

        let ordered = set.ordered_rows().unwrap();
        assert_eq!(*ordered, vec![vec![Value::bigint(-1)], vec![Value::bigint(5)]]);
        // Cached on first use
        assert!(Arc::ptr_eq(&ordered, &set.ordered_rows().unwrap()));
    }
}
