//! Expression trees for index analysis
//!
//! Index analysis inspects predicates without caring whether they arrive as a
//! parsed syntax tree or as a planned computation graph. This module provides
//! the representation-agnostic view it works through:
//!
//! - [`RpnTreeContext`]: state shared by one analysis pass
//! - [`RpnTreeNode`]: any expression node
//! - [`RpnFunctionNode`]: a function call node
//! - [`RpnBuilder`]: turns a predicate into Reverse Polish Notation

pub mod builder;
pub mod column_name;
pub mod context;
pub mod function_node;
pub mod tree_node;

pub use builder::{LogicalOperator, RpnBuilder, RpnElement};
pub use column_name::{append_dag_column_name, dag_column_name};
pub use context::RpnTreeContext;
pub use function_node::RpnFunctionNode;
pub use tree_node::{RpnNodeRef, RpnTreeNode};
