//! Expression planning
//!
//! This module turns parsed expressions into the computation graph that
//! execution and index analysis work on:
//!
//! 1. **Resolution**: Maps surface function names to resolved functions
//! 2. **Lowering**: Binds identifiers and builds graph nodes
//! 3. **Sets**: Materializes `IN` right-hand sides as constant set columns

pub mod actions_dag;
pub mod function;
pub mod lowering;

pub use actions_dag::{ActionType, ActionsDag, DagNode, DagNodeRef};
pub use function::{FunctionBase, FunctionBaseRef, FunctionFactory, FunctionKind};
pub use lowering::ExpressionLowering;
