//! Constants used throughout index condition analysis

/// Name of the sentinel column present in a block with constants that was
/// never filled by expression analysis
pub const DUMMY_COLUMN_NAME: &str = "_dummy";

/// Function name rewritten for backward compatible key naming
pub const MODULO_FUNCTION_NAME: &str = "modulo";

/// Token older index metadata uses in place of `modulo`
pub const MODULO_LEGACY_FUNCTION_NAME: &str = "moduloLegacy";

/// Function name the planner uses for array expansion
pub const ARRAY_JOIN_FUNCTION_NAME: &str = "arrayJoin";

/// Prefix for generated names of anonymous subqueries
pub const SUBQUERY_NAME_PREFIX: &str = "__subquery_";

/// Default limit on expression nesting during RPN construction
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 1000;
