//! Precomputed sets and the registry index analysis resolves them from

pub mod prepared_sets;
pub mod set;

pub use prepared_sets::{PreparedSetKey, PreparedSets, PreparedSetsRef};
pub use set::{KeyTuplePositionMapping, Set, SetRef};
