//! Query Context
//!
//! Per-query state shared by everything that analyzes the query's expressions.

use crate::execution::settings::QuerySettings;
use std::sync::Arc;
use uuid::Uuid;

/// Shared query context pointer
pub type QueryContextRef = Arc<QueryContext>;

/// Context of one query
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Identifier used to correlate log records of one query
    pub query_id: Uuid,
    pub settings: QuerySettings,
}

impl QueryContext {
    /// Context with default settings
    pub fn new() -> Self {
        Self::with_settings(QuerySettings::default())
    }

    pub fn with_settings(settings: QuerySettings) -> Self {
        Self {
            query_id: Uuid::new_v4(),
            settings,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn into_ref(self) -> QueryContextRef {
        Arc::new(self)
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_ids_are_unique() {
        let a = QueryContext::new();
        let b = QueryContext::new();
        assert_ne!(a.query_id, b.query_id);
        assert_eq!(a.settings(), &QuerySettings::default());
    }
}
