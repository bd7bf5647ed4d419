//! Error handling for PrismDB index condition analysis

use thiserror::Error;

/// Main error type for expression tree analysis
#[derive(Error, Debug)]
pub enum PrismDBError {
    /// A caller broke a documented precondition (e.g. asked a non-constant
    /// node for its constant value)
    #[error("Logical error: {0}")]
    Logical(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Expression is too deep: depth {depth} exceeds maximum {max_depth}")]
    TooDeep { depth: usize, max_depth: usize },
}

impl From<serde_json::Error> for PrismDBError {
    fn from(err: serde_json::Error) -> Self {
        PrismDBError::Serialization(err.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for PrismDBError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        PrismDBError::Parse(err.to_string())
    }
}

impl PrismDBError {
    /// Whether this error reports a broken caller contract
    pub fn is_logical(&self) -> bool {
        matches!(self, PrismDBError::Logical(_))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PrismDBError>;

/// Result type alias for PrismDB operations (alias for Result)
pub type PrismDBResult<T> = std::result::Result<T, PrismDBError>;

/// Macro for creating logical (contract violation) errors
#[macro_export]
macro_rules! logical_err {
    ($msg:expr) => {
        $crate::common::error::PrismDBError::Logical($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismDBError::Logical(format!($fmt, $($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_err {
    ($msg:expr) => {
        $crate::common::error::PrismDBError::Internal($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismDBError::Internal(format!($fmt, $($arg)*))
    };
}

/// Macro for creating not implemented errors
#[macro_export]
macro_rules! not_implemented_err {
    ($msg:expr) => {
        $crate::common::error::PrismDBError::NotImplemented($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismDBError::NotImplemented(format!($fmt, $($arg)*))
    };
}
