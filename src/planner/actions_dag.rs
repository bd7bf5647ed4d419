//! Computation graph of planned expressions
//!
//! An [`ActionsDag`] describes how result columns are computed from input
//! columns, constants and function calls. Nodes are shared through `Arc`, so a
//! parent keeps its children alive and a node reference stays valid as long as
//! any graph or view holds it.

use crate::common::constants::ARRAY_JOIN_FUNCTION_NAME;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::planner::function::FunctionBaseRef;
use crate::types::{ColumnRef, ColumnWithTypeAndName, LogicalType};
use std::sync::Arc;

/// Shared graph node pointer
pub type DagNodeRef = Arc<DagNode>;

/// What a node computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Column read from the input block
    Input,
    /// Column with a known value (constant or set placeholder)
    Column,
    /// Another name for its only child
    Alias,
    /// Expands the array child into rows
    ArrayJoin,
    /// Function applied to the children
    Function,
}

/// Graph node
#[derive(Debug)]
pub struct DagNode {
    pub action_type: ActionType,
    pub result_name: String,
    pub result_type: LogicalType,
    /// Materialized column, if the planner knows one
    pub column: Option<ColumnRef>,
    /// Resolved function for `Function` nodes
    pub function: Option<FunctionBaseRef>,
    pub children: Vec<DagNodeRef>,
}

impl DagNode {
    /// Resolved function name of a `Function` node
    pub fn function_name(&self) -> Option<&str> {
        self.function.as_ref().map(|function| function.name())
    }
}

/// Builder and owner of graph nodes
#[derive(Debug, Default)]
pub struct ActionsDag {
    nodes: Vec<DagNodeRef>,
    inputs: Vec<DagNodeRef>,
    outputs: Vec<DagNodeRef>,
}

impl ActionsDag {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: DagNode) -> DagNodeRef {
        let node = Arc::new(node);
        self.nodes.push(node.clone());
        node
    }

    pub fn add_input(&mut self, name: impl Into<String>, data_type: LogicalType) -> DagNodeRef {
        let node = self.push(DagNode {
            action_type: ActionType::Input,
            result_name: name.into(),
            result_type: data_type,
            column: None,
            function: None,
            children: Vec::new(),
        });
        self.inputs.push(node.clone());
        node
    }

    pub fn add_column(&mut self, column: ColumnWithTypeAndName) -> DagNodeRef {
        self.push(DagNode {
            action_type: ActionType::Column,
            result_name: column.name,
            result_type: column.data_type,
            column: Some(column.column),
            function: None,
            children: Vec::new(),
        })
    }

    /// Alias `child` as `alias`; the alias shares the child's type and column
    pub fn add_alias(&mut self, child: &DagNodeRef, alias: impl Into<String>) -> DagNodeRef {
        self.push(DagNode {
            action_type: ActionType::Alias,
            result_name: alias.into(),
            result_type: child.result_type.clone(),
            column: child.column.clone(),
            function: None,
            children: vec![child.clone()],
        })
    }

    /// Expand an array-typed `child`; the result has the element type
    pub fn add_array_join(
        &mut self,
        child: &DagNodeRef,
        result_name: impl Into<String>,
    ) -> PrismDBResult<DagNodeRef> {
        let element_type = child.result_type.list_element_type().cloned().ok_or_else(|| {
            PrismDBError::InvalidType(format!(
                "{} requires an array argument, got {}",
                ARRAY_JOIN_FUNCTION_NAME, child.result_type
            ))
        })?;
        Ok(self.push(DagNode {
            action_type: ActionType::ArrayJoin,
            result_name: result_name.into(),
            result_type: element_type,
            column: None,
            function: None,
            children: vec![child.clone()],
        }))
    }

    /// Apply `function` to `children`.
    ///
    /// Without an explicit name the node is named `f(a, b)` after the children.
    pub fn add_function(
        &mut self,
        function: FunctionBaseRef,
        children: Vec<DagNodeRef>,
        result_name: Option<String>,
    ) -> DagNodeRef {
        let result_name = result_name.unwrap_or_else(|| {
            let arguments: Vec<&str> = children
                .iter()
                .map(|child| child.result_name.as_str())
                .collect();
            format!("{}({})", function.name(), arguments.join(", "))
        });
        self.push(DagNode {
            action_type: ActionType::Function,
            result_name,
            result_type: function.return_type().clone(),
            column: None,
            function: Some(function),
            children,
        })
    }

    pub fn add_output(&mut self, node: &DagNodeRef) {
        self.outputs.push(node.clone());
    }

    pub fn find_output(&self, name: &str) -> Option<&DagNodeRef> {
        self.outputs.iter().find(|node| node.result_name == name)
    }

    pub fn inputs(&self) -> &[DagNodeRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[DagNodeRef] {
        &self.outputs
    }

    pub fn nodes(&self) -> &[DagNodeRef] {
        &self.nodes
    }
}
