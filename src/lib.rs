//! PrismDB RPN - Expression trees for index condition analysis
//!
//! Index analysis needs to ask the same questions of a predicate whether it
//! comes as a parsed syntax tree or as a planned computation graph: what is
//! its column name, is it a constant, which prepared set does it stand for.
//! This crate provides both representations and the uniform view over them.
//!
pub mod common;
pub mod execution;
pub mod parser;
pub mod planner;
pub mod rpn;
pub mod sets;
pub mod types;

// Re-export common types for convenience
pub use common::{init_logging, PrismDBError, PrismDBResult};

// Re-export type system for convenience
pub use types::{Block, Column, ColumnRef, ColumnWithTypeAndName, LogicalType, TypeUtils, Value};

// Re-export execution state for convenience
pub use execution::{QueryContext, QueryContextRef, QuerySettings};

// Re-export parser and planner for convenience
pub use parser::{parse_expression, AstNode, TreeHash};
pub use planner::{ActionType, ActionsDag, DagNode, DagNodeRef, ExpressionLowering, FunctionFactory};

// Re-export sets for convenience
pub use sets::{KeyTuplePositionMapping, PreparedSetKey, PreparedSets, PreparedSetsRef, Set, SetRef};

// Re-export the analysis view for convenience
pub use rpn::{LogicalOperator, RpnBuilder, RpnElement, RpnFunctionNode, RpnTreeContext, RpnTreeNode};
