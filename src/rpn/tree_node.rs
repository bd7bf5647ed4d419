//! Representation-agnostic expression nodes
//!
//! Index analysis walks predicates that come either as a syntax tree
//! ([`AstNode`]) or as a computation graph ([`DagNode`]). [`RpnTreeNode`] wraps
//! one node of either kind and answers the questions index analysis asks:
//! its column name, whether it is a call or a constant, and which prepared set
//! it stands for.

use crate::common::error::PrismDBResult;
use crate::logical_err;
use crate::parser::ast::AstNode;
use crate::planner::actions_dag::{ActionType, DagNode};
use crate::rpn::column_name::dag_column_name;
use crate::rpn::context::RpnTreeContext;
use crate::rpn::function_node::RpnFunctionNode;
use crate::sets::{KeyTuplePositionMapping, PreparedSetKey, SetRef};
use crate::types::{Column, ColumnWithTypeAndName, LogicalType, Value};
use tracing::trace;

/// The wrapped node
#[derive(Debug, Clone, Copy)]
pub enum RpnNodeRef<'a> {
    Ast(&'a AstNode),
    Dag(&'a DagNode),
}

/// View over one expression node and the analysis context it belongs to
#[derive(Debug, Clone, Copy)]
pub struct RpnTreeNode<'a> {
    node: RpnNodeRef<'a>,
    tree_context: &'a RpnTreeContext,
}

impl<'a> RpnTreeNode<'a> {
    pub fn from_ast(ast_node: &'a AstNode, tree_context: &'a RpnTreeContext) -> Self {
        Self {
            node: RpnNodeRef::Ast(ast_node),
            tree_context,
        }
    }

    pub fn from_dag(dag_node: &'a DagNode, tree_context: &'a RpnTreeContext) -> Self {
        Self {
            node: RpnNodeRef::Dag(dag_node),
            tree_context,
        }
    }

    pub fn node(&self) -> RpnNodeRef<'a> {
        self.node
    }

    pub fn as_ast(&self) -> Option<&'a AstNode> {
        match self.node {
            RpnNodeRef::Ast(ast_node) => Some(ast_node),
            RpnNodeRef::Dag(_) => None,
        }
    }

    pub fn as_dag(&self) -> Option<&'a DagNode> {
        match self.node {
            RpnNodeRef::Dag(dag_node) => Some(dag_node),
            RpnNodeRef::Ast(_) => None,
        }
    }

    pub fn tree_context(&self) -> &'a RpnTreeContext {
        self.tree_context
    }

    /// Column name of the expression with aliases ignored
    pub fn column_name(&self) -> String {
        match self.node {
            RpnNodeRef::Ast(ast_node) => ast_node.column_name_without_alias(),
            RpnNodeRef::Dag(dag_node) => dag_column_name(dag_node, false),
        }
    }

    /// Column name with `modulo` spelled as `moduloLegacy`, for matching keys
    /// created before `modulo` was renamed
    pub fn column_name_with_modulo_legacy(&self) -> String {
        match self.node {
            RpnNodeRef::Ast(ast_node) => ast_node
                .clone()
                .into_modulo_legacy()
                .column_name_without_alias(),
            RpnNodeRef::Dag(dag_node) => dag_column_name(dag_node, true),
        }
    }

    pub fn is_function(&self) -> bool {
        match self.node {
            RpnNodeRef::Ast(ast_node) => ast_node.is_function(),
            RpnNodeRef::Dag(dag_node) => dag_node.action_type == ActionType::Function,
        }
    }

    /// Whether the expression has a value known before reading any data
    pub fn is_constant(&self) -> bool {
        match self.node {
            RpnNodeRef::Ast(ast_node) => {
                ast_node.is_literal() || self.constant_from_block(ast_node).is_some()
            }
            RpnNodeRef::Dag(dag_node) => dag_node
                .column
                .as_ref()
                .is_some_and(|column| column.is_const()),
        }
    }

    /// The constant column of a constant expression.
    ///
    /// Fails with a logical error when the node is not constant.
    pub fn get_constant_column(&self) -> PrismDBResult<ColumnWithTypeAndName> {
        if !self.is_constant() {
            return Err(logical_err!(
                "Expression node {} is not a constant",
                self.column_name()
            ));
        }

        match self.node {
            RpnNodeRef::Ast(ast_node) => {
                if let Some(value) = ast_node.as_literal() {
                    return Ok(ColumnWithTypeAndName::new(
                        Column::new_const(value.clone(), 0),
                        value.infer_type(),
                        ast_node.column_name(),
                    ));
                }
                self.constant_from_block(ast_node)
                    .cloned()
                    .ok_or_else(|| logical_err!("Constant {} vanished from block", ast_node.column_name()))
            }
            RpnNodeRef::Dag(dag_node) => {
                let column = dag_node
                    .column
                    .clone()
                    .ok_or_else(|| logical_err!("Constant node {} has no column", dag_node.result_name))?;
                Ok(ColumnWithTypeAndName::new(
                    column,
                    dag_node.result_type.clone(),
                    dag_node.result_name.clone(),
                ))
            }
        }
    }

    /// Value and type of a constant expression, or `None` if it is not one.
    ///
    /// A type is reported without its nullable wrapper unless the value is NULL.
    pub fn try_get_constant(&self) -> Option<(Value, LogicalType)> {
        let (value, data_type) = match self.node {
            RpnNodeRef::Ast(ast_node) => {
                // Constants are looked up by alias when one is preferred
                let column_name = ast_node.column_name();
                let block = self.tree_context.block_with_constants();

                if let Some(value) = ast_node.as_literal() {
                    // A block that only holds constants may never have been
                    // filled by expression analysis. The fallback type comes
                    // from the value, not the `_dummy` entry, so it agrees with
                    // the type a lowered graph constant gets.
                    let data_type = block
                        .get_by_name(&column_name)
                        .map(|column| column.data_type.clone())
                        .unwrap_or_else(|| value.infer_type());
                    (value.clone(), data_type)
                } else {
                    let constant = self.constant_from_block(ast_node)?;
                    (constant.column.get(0).ok()?, constant.data_type.clone())
                }
            }
            RpnNodeRef::Dag(dag_node) => {
                let column = dag_node.column.as_ref().filter(|column| column.is_const())?;
                (column.get(0).ok()?, dag_node.result_type.clone())
            }
        };

        let data_type = if value.is_null() {
            data_type
        } else {
            data_type.remove_nullable()
        };
        trace!(column_name = %self.column_name(), %value, %data_type, "resolved constant");
        Some((value, data_type))
    }

    /// Any created set prepared for this expression
    pub fn try_get_prepared_set(&self) -> Option<SetRef> {
        match self.node {
            RpnNodeRef::Ast(ast_node) => {
                let prepared_sets = self.tree_context.prepared_sets()?;
                prepared_sets
                    .get_by_tree_hash(ast_node.tree_hash())
                    .into_iter()
                    .find(|set| set.is_created())
            }
            RpnNodeRef::Dag(dag_node) => set_from_dag_node(dag_node),
        }
    }

    /// The created set prepared for this expression with the given left-hand
    /// side types
    pub fn try_get_prepared_set_for_types(&self, data_types: &[LogicalType]) -> Option<SetRef> {
        match self.node {
            RpnNodeRef::Ast(ast_node) => {
                if ast_node.is_subquery() || ast_node.is_table_identifier() {
                    return self.subquery_set(ast_node);
                }
                let prepared_sets = self.tree_context.prepared_sets()?;
                prepared_sets.get(&PreparedSetKey::for_literal(ast_node, data_types.to_vec()))
            }
            RpnNodeRef::Dag(dag_node) => set_from_dag_node(dag_node),
        }
    }

    /// The created set whose types agree with the index key at every mapped
    /// tuple position.
    ///
    /// `mapping[i]` pairs with `data_types[i]`. Among structurally identical
    /// candidates the first full match in registration order wins.
    pub fn try_get_prepared_set_with_mapping(
        &self,
        mapping: &[KeyTuplePositionMapping],
        data_types: &[LogicalType],
    ) -> Option<SetRef> {
        match self.node {
            RpnNodeRef::Ast(ast_node) => {
                if ast_node.is_subquery() || ast_node.is_table_identifier() {
                    return self.subquery_set(ast_node);
                }
                if mapping.len() != data_types.len() {
                    trace!(
                        mapping_len = mapping.len(),
                        types_len = data_types.len(),
                        "mismatched set mapping"
                    );
                    return None;
                }
                let prepared_sets = self.tree_context.prepared_sets()?;
                prepared_sets
                    .get_by_tree_hash(ast_node.tree_hash())
                    .into_iter()
                    .find(|set| {
                        set.is_created()
                            && mapping
                                .iter()
                                .zip(data_types)
                                .all(|(position, data_type)| {
                                    set.are_types_equal(position.tuple_index, data_type)
                                })
                    })
            }
            RpnNodeRef::Dag(dag_node) => set_from_dag_node(dag_node),
        }
    }

    /// View this node as a function call.
    ///
    /// Fails with a logical error when the node is not a function.
    pub fn to_function_node(&self) -> PrismDBResult<RpnFunctionNode<'a>> {
        self.to_function_node_or_null().ok_or_else(|| {
            logical_err!("Expression node {} is not a function", self.column_name())
        })
    }

    pub fn to_function_node_or_null(&self) -> Option<RpnFunctionNode<'a>> {
        if self.is_function() {
            Some(RpnFunctionNode::new(*self))
        } else {
            None
        }
    }

    fn constant_from_block(&self, ast_node: &AstNode) -> Option<&'a ColumnWithTypeAndName> {
        self.tree_context
            .block_with_constants()
            .get_by_name(&ast_node.column_name())
            .filter(|column| column.column.is_const())
    }

    fn subquery_set(&self, ast_node: &AstNode) -> Option<SetRef> {
        if !self
            .tree_context
            .query_context()
            .settings()
            .use_index_for_in_with_subqueries
        {
            return None;
        }
        let prepared_sets = self.tree_context.prepared_sets()?;
        let set = prepared_sets.get(&PreparedSetKey::for_subquery(ast_node));
        trace!(
            subquery = %ast_node.column_name_without_alias(),
            found = set.is_some(),
            "subquery set lookup"
        );
        set
    }
}

/// Created set carried by the node's column, looking through a constant wrapper
fn set_from_dag_node(dag_node: &DagNode) -> Option<SetRef> {
    dag_node
        .column
        .as_ref()?
        .as_column_set()
        .map(|column_set| column_set.set())
        .filter(|set| set.is_created())
        .cloned()
}
