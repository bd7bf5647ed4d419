//! Analysis context shared by every node of one pass

use crate::execution::context::QueryContextRef;
use crate::sets::PreparedSetsRef;
use crate::types::Block;
use std::sync::OnceLock;

/// State shared by all tree nodes created during one predicate-analysis pass.
///
/// The constants block and the set registry are fixed at construction.
#[derive(Debug)]
pub struct RpnTreeContext {
    query_context: QueryContextRef,
    block_with_constants: Option<Block>,
    /// Stand-in used when no constants block was supplied
    neutral_block: OnceLock<Block>,
    prepared_sets: Option<PreparedSetsRef>,
}

impl RpnTreeContext {
    /// Context without known constants or prepared sets
    pub fn new(query_context: QueryContextRef) -> Self {
        Self {
            query_context,
            block_with_constants: None,
            neutral_block: OnceLock::new(),
            prepared_sets: None,
        }
    }

    /// Context for full analysis: constants computed by expression analysis and
    /// the sets prepared for the query
    pub fn with_constants(
        query_context: QueryContextRef,
        block_with_constants: Block,
        prepared_sets: Option<PreparedSetsRef>,
    ) -> Self {
        Self {
            query_context,
            block_with_constants: Some(block_with_constants),
            neutral_block: OnceLock::new(),
            prepared_sets,
        }
    }

    pub fn query_context(&self) -> &QueryContextRef {
        &self.query_context
    }

    /// The supplied constants block, or a block holding only the `_dummy`
    /// sentinel when none was supplied
    pub fn block_with_constants(&self) -> &Block {
        match &self.block_with_constants {
            Some(block) => block,
            None => self.neutral_block.get_or_init(Block::with_dummy_column),
        }
    }

    pub fn prepared_sets(&self) -> Option<&PreparedSetsRef> {
        self.prepared_sets.as_ref()
    }
}
