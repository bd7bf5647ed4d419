//! Expression lowering
//!
//! Binds an [`AstNode`] against an input schema and produces the equivalent
//! [`ActionsDag`] nodes: identifiers become inputs, literals become constant
//! columns, calls are resolved through the [`FunctionFactory`], and the right
//! side of `IN` becomes a constant set column backed by [`PreparedSets`].

use crate::common::constants::ARRAY_JOIN_FUNCTION_NAME;
use crate::common::error::{PrismDBError, PrismDBResult};
use crate::not_implemented_err;
use crate::parser::ast::{AstKind, AstNode};
use crate::planner::actions_dag::{ActionsDag, DagNodeRef};
use crate::planner::function::FunctionFactory;
use crate::sets::{PreparedSetKey, PreparedSets, Set, SetRef};
use crate::types::{Column, ColumnWithTypeAndName, LogicalType, Value};
use ahash::AHashMap;
use tracing::debug;

/// Functions whose second argument is a set
const SET_FUNCTIONS: [&str; 4] = ["in", "notIn", "globalIn", "globalNotIn"];

/// Lowers syntax trees into a computation graph over a fixed input schema
pub struct ExpressionLowering<'a> {
    factory: &'a FunctionFactory,
    prepared_sets: Option<&'a PreparedSets>,
    input_types: AHashMap<String, LogicalType>,
    inputs: AHashMap<String, DagNodeRef>,
    dag: ActionsDag,
}

impl<'a> ExpressionLowering<'a> {
    pub fn new(factory: &'a FunctionFactory) -> Self {
        Self {
            factory,
            prepared_sets: None,
            input_types: AHashMap::new(),
            inputs: AHashMap::new(),
            dag: ActionsDag::new(),
        }
    }

    /// Declare an input column
    pub fn with_input(mut self, name: impl Into<String>, data_type: LogicalType) -> Self {
        self.input_types.insert(name.into(), data_type);
        self
    }

    /// Resolve and register `IN` sets through `prepared_sets`
    pub fn with_prepared_sets(mut self, prepared_sets: &'a PreparedSets) -> Self {
        self.prepared_sets = Some(prepared_sets);
        self
    }

    /// Lower `ast` and mark the result as a graph output
    pub fn lower(&mut self, ast: &AstNode) -> PrismDBResult<DagNodeRef> {
        let node = self.lower_node(ast)?;
        self.dag.add_output(&node);
        debug!(
            result_name = %node.result_name,
            result_type = %node.result_type,
            "lowered expression"
        );
        Ok(node)
    }

    /// Finish lowering and hand over the graph
    pub fn finish(self) -> ActionsDag {
        self.dag
    }

    fn lower_node(&mut self, ast: &AstNode) -> PrismDBResult<DagNodeRef> {
        let node = match &ast.kind {
            AstKind::Literal(value) => self.dag.add_column(ColumnWithTypeAndName::new(
                Column::new_const(value.clone(), 1),
                value.infer_type(),
                ast.column_name_without_alias(),
            )),
            AstKind::Identifier(parts) => self.input(&parts.join("."))?,
            AstKind::Function(function) => {
                let arguments = function.arguments();
                if SET_FUNCTIONS.contains(&function.name.as_str()) && arguments.len() == 2 {
                    let left = self.lower_node(&arguments[0])?;
                    let right = self.lower_set(&arguments[1], &left.result_type)?;
                    let resolved = self
                        .factory
                        .resolve(&function.name, &[left.result_type.clone(), LogicalType::Set])?;
                    self.dag.add_function(resolved, vec![left, right], None)
                } else if function.name == ARRAY_JOIN_FUNCTION_NAME && arguments.len() == 1 {
                    let child = self.lower_node(&arguments[0])?;
                    let result_name = format!("{}({})", ARRAY_JOIN_FUNCTION_NAME, child.result_name);
                    self.dag.add_array_join(&child, result_name)?
                } else {
                    let children = arguments
                        .iter()
                        .map(|argument| self.lower_node(argument))
                        .collect::<PrismDBResult<Vec<_>>>()?;
                    let argument_types: Vec<LogicalType> = children
                        .iter()
                        .map(|child| child.result_type.clone())
                        .collect();
                    let resolved = self.factory.resolve(&function.name, &argument_types)?;
                    self.dag.add_function(resolved, children, None)
                }
            }
            AstKind::Subquery(_) | AstKind::TableIdentifier { .. } => {
                return Err(not_implemented_err!(
                    "{} is only supported on the right side of IN",
                    ast.column_name_without_alias()
                ));
            }
        };

        Ok(match &ast.alias {
            Some(alias) => self.dag.add_alias(&node, alias.clone()),
            None => node,
        })
    }

    fn input(&mut self, name: &str) -> PrismDBResult<DagNodeRef> {
        if let Some(node) = self.inputs.get(name) {
            return Ok(node.clone());
        }
        let data_type = self
            .input_types
            .get(name)
            .cloned()
            .ok_or_else(|| PrismDBError::InvalidArgument(format!("Unknown identifier {}", name)))?;
        let node = self.dag.add_input(name, data_type);
        self.inputs.insert(name.to_string(), node.clone());
        Ok(node)
    }

    /// Lower the right side of `IN` into a constant set column
    fn lower_set(&mut self, rhs: &AstNode, left_type: &LogicalType) -> PrismDBResult<DagNodeRef> {
        let set = if rhs.is_subquery() || rhs.is_table_identifier() {
            let key = PreparedSetKey::for_subquery(rhs);
            self.prepared_sets
                .and_then(|sets| sets.find_registered(&key))
                .ok_or_else(|| {
                    PrismDBError::InvalidArgument(format!(
                        "No prepared set for {}",
                        rhs.column_name_without_alias()
                    ))
                })?
        } else {
            let key = PreparedSetKey::for_literal(rhs, vec![left_type.clone()]);
            match self.prepared_sets.and_then(|sets| sets.find_registered(&key)) {
                Some(set) => set,
                None => {
                    let set = build_literal_set(rhs, left_type)?;
                    debug!(key = %key, rows = set.len(), "built set from literal list");
                    match self.prepared_sets {
                        Some(sets) => sets.add(key, set),
                        None => set,
                    }
                }
            }
        };

        Ok(self.dag.add_column(ColumnWithTypeAndName::new(
            Column::new_const_set(set, 1),
            LogicalType::Set,
            rhs.column_name_without_alias(),
        )))
    }
}

/// Build a created set from a literal list such as `tuple(1, 2, 3)`.
///
/// A tuple-typed left side takes one row per inner `tuple(...)` element.
fn build_literal_set(rhs: &AstNode, left_type: &LogicalType) -> PrismDBResult<SetRef> {
    let set_types = match left_type.remove_nullable() {
        LogicalType::Tuple(types) => types,
        other => vec![other],
    };

    let elements: Vec<&AstNode> = match rhs.as_function() {
        Some(function) if function.name == "tuple" => function.arguments().iter().collect(),
        _ => vec![rhs],
    };

    let mut rows = Vec::with_capacity(elements.len());
    for element in elements {
        let row = if set_types.len() > 1 {
            element
                .as_function()
                .filter(|function| function.name == "tuple")
                .map(|function| {
                    function
                        .arguments()
                        .iter()
                        .map(literal_value)
                        .collect::<PrismDBResult<Vec<_>>>()
                })
                .transpose()?
                .ok_or_else(|| {
                    PrismDBError::InvalidArgument(format!(
                        "Expected a tuple of {} elements in IN list, got {}",
                        set_types.len(),
                        element.column_name_without_alias()
                    ))
                })?
        } else {
            vec![literal_value(element)?]
        };
        rows.push(row);
    }

    Set::from_rows(set_types, rows)
}

fn literal_value(ast: &AstNode) -> PrismDBResult<Value> {
    ast.as_literal().cloned().ok_or_else(|| {
        PrismDBError::InvalidArgument(format!(
            "IN list may contain only literals, got {}",
            ast.column_name_without_alias()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::planner::actions_dag::ActionType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lower_comparison() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let mut lowering = ExpressionLowering::new(&factory).with_input("col_a", LogicalType::Integer);

        let node = lowering.lower(&parse_expression("col_a = 5 AND col_a > 1")?)?;
        assert_eq!(node.result_name, "and(equals(col_a, 5), greater(col_a, 1))");
        assert_eq!(node.action_type, ActionType::Function);

        let dag = lowering.finish();
        // `col_a` is shared between both comparisons
        assert_eq!(dag.inputs().len(), 1);
        assert_eq!(dag.outputs().len(), 1);
        Ok(())
    }

    #[test]
    fn test_lower_alias_and_unknown_identifier() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let mut lowering = ExpressionLowering::new(&factory).with_input("a", LogicalType::BigInt);

        let ast = AstNode::function(
            "plus",
            vec![AstNode::identifier("a"), AstNode::literal(Value::bigint(1))],
        )
        .with_alias("a1");
        let node = lowering.lower(&ast)?;
        assert_eq!(node.action_type, ActionType::Alias);
        assert_eq!(node.result_name, "a1");
        assert_eq!(node.children[0].result_name, "plus(a, 1)");

        assert!(lowering.lower(&AstNode::identifier("missing")).is_err());
        Ok(())
    }

    #[test]
    fn test_lower_in_list_registers_set() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let sets = PreparedSets::new();
        let mut lowering = ExpressionLowering::new(&factory)
            .with_input("a", LogicalType::Integer)
            .with_prepared_sets(&sets);

        let node = lowering.lower(&parse_expression("a IN (1, 2, 3)")?)?;
        assert_eq!(node.result_name, "in(a, tuple(1, 2, 3))");

        let set_node = &node.children[1];
        assert_eq!(set_node.result_type, LogicalType::Set);
        let set = set_node
            .column
            .as_ref()
            .and_then(|column| column.as_column_set())
            .map(|column| column.set().clone())
            .unwrap();
        assert!(set.is_created());
        assert_eq!(set.len(), 3);
        assert_eq!(sets.len(), 1);
        Ok(())
    }

    #[test]
    fn test_lower_tuple_in_list() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let mut lowering = ExpressionLowering::new(&factory)
            .with_input("a", LogicalType::Integer)
            .with_input("b", LogicalType::Varchar);

        let node = lowering.lower(&parse_expression("(a, b) IN ((1, 'x'), (2, 'y'))")?)?;
        let set = node.children[1]
            .column
            .as_ref()
            .and_then(|column| column.as_column_set())
            .map(|column| column.set().clone())
            .unwrap();
        assert_eq!(set.data_types(), &[LogicalType::Integer, LogicalType::Varchar]);
        assert!(set.contains(&[Value::integer(2), Value::varchar("y")])?);
        Ok(())
    }

    #[test]
    fn test_lower_subquery_requires_prepared_set() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let sets = PreparedSets::new();
        let ast = parse_expression("a IN (SELECT x FROM t)")?;

        let mut lowering = ExpressionLowering::new(&factory)
            .with_input("a", LogicalType::Integer)
            .with_prepared_sets(&sets);
        assert!(lowering.lower(&ast).is_err());

        let rhs = &ast.as_function().unwrap().arguments()[1];
        sets.add(
            PreparedSetKey::for_subquery(rhs),
            std::sync::Arc::new(Set::new(vec![LogicalType::Integer])),
        );
        let node = lowering.lower(&ast)?;
        assert!(node.children[1].result_name.starts_with("__subquery_"));
        Ok(())
    }

    #[test]
    fn test_lower_array_join() -> PrismDBResult<()> {
        let factory = FunctionFactory::with_builtins();
        let mut lowering = ExpressionLowering::new(&factory)
            .with_input("tags", LogicalType::List(Box::new(LogicalType::Varchar)));

        let node = lowering.lower(&parse_expression("arrayJoin(tags) = 'a'")?)?;
        assert_eq!(node.children[0].action_type, ActionType::ArrayJoin);
        assert_eq!(node.children[0].result_type, LogicalType::Varchar);
        Ok(())
    }
}
