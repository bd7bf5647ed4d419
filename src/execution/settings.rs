//! Query settings
//!
//! Settings that influence expression analysis. They can be loaded from JSON or
//! changed one at a time with `SET`-style key/value pairs.

use crate::common::constants::DEFAULT_MAX_EXPRESSION_DEPTH;
use crate::common::error::{PrismDBError, PrismDBResult};
use serde::{Deserialize, Serialize};

/// Per-query settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    /// Maximum nesting depth the RPN builder accepts
    pub max_expression_depth: usize,
    /// Whether sets built from subqueries may be used for index analysis
    pub use_index_for_in_with_subqueries: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
            use_index_for_in_with_subqueries: true,
        }
    }
}

impl QuerySettings {
    /// Parse settings from a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> PrismDBResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PrismDBResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Change one setting. Keys are case-insensitive.
    pub fn set(&mut self, key: &str, value: &str) -> PrismDBResult<()> {
        match key.to_lowercase().as_str() {
            "max_expression_depth" => {
                self.max_expression_depth = value.trim().parse().map_err(|_| {
                    PrismDBError::InvalidArgument(format!(
                        "Invalid value '{}' for max_expression_depth",
                        value
                    ))
                })?;
            }
            "use_index_for_in_with_subqueries" => {
                self.use_index_for_in_with_subqueries = parse_bool(value).ok_or_else(|| {
                    PrismDBError::InvalidArgument(format!(
                        "Invalid value '{}' for use_index_for_in_with_subqueries",
                        value
                    ))
                })?;
            }
            _ => {
                return Err(PrismDBError::InvalidArgument(format!(
                    "Unknown setting {}",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
