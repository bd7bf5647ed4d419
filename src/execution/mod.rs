//! Query execution state
//!
//! This module provides the per-query context and the settings that control
//! how expressions are analyzed.

pub mod context;
pub mod settings;

pub use context::{QueryContext, QueryContextRef};
pub use settings::QuerySettings;
