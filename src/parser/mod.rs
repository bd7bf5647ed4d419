//! Expression parsing
//!
//! This module provides the syntax tree for expressions and the SQL front end
//! that builds it from expression text.

pub mod ast;
pub mod sql;

pub use ast::{AstFunction, AstKind, AstNode, AstSubquery, TreeHash};
pub use sql::parse_expression;
