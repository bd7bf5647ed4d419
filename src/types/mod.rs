//! Type system module
//!
//! This module contains the type system components used by expression analysis:
//! - LogicalType: SQL-level types, including the nullable wrapper
//! - Value: Single values with their canonical textual form
//! - Column: Materialized, constant and set-carrying columns
//! - Block: Named collections of typed columns

pub mod block;
pub mod column;
pub mod logical_type;
pub mod value;

// Re-export main types for convenience
pub use block::Block;
pub use column::{Column, ColumnRef, ColumnSet, ColumnWithTypeAndName};
pub use logical_type::{LogicalType, TypeUtils};
pub use value::Value;
