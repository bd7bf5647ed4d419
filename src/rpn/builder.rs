//! Reverse Polish Notation builder
//!
//! Flattens a predicate into RPN for index condition evaluation. Logical
//! connectives (`and`, `or`, `not`) become operators placed after their
//! operands; every other subtree is handed to an atom extractor supplied by the
//! index that is being analyzed.
//!
//! For `a = 1 AND (b < 2 OR NOT c)` the output is:
//!
//! ```text
//! atom(a = 1) atom(b < 2) atom(c) NOT OR AND
//! ```

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::parser::ast::AstNode;
use crate::planner::actions_dag::DagNode;
use crate::rpn::context::RpnTreeContext;
use crate::rpn::tree_node::RpnTreeNode;
use tracing::debug;

/// Logical connective recognized by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    Not,
    And,
    Or,
}

/// Element of the RPN produced by [`RpnBuilder`].
///
/// `Default` is the element for a condition the index cannot evaluate.
pub trait RpnElement: Default {
    fn logical(operator: LogicalOperator) -> Self;
}

/// Walks a predicate tree and produces its RPN
pub struct RpnBuilder<'a, E, F> {
    tree_context: &'a RpnTreeContext,
    extract_atom: F,
    max_depth: usize,
    rpn: Vec<E>,
}

impl<'a, E, F> RpnBuilder<'a, E, F>
where
    E: RpnElement,
    F: FnMut(RpnTreeNode<'a>) -> Option<E>,
{
    /// Build the RPN of a syntax tree predicate
    pub fn from_ast(root: &'a AstNode, tree_context: &'a RpnTreeContext, extract_atom: F) -> PrismDBResult<Vec<E>> {
        Self::new(tree_context, extract_atom).build(RpnTreeNode::from_ast(root, tree_context))
    }

    /// Build the RPN of a computation graph predicate
    pub fn from_dag(root: &'a DagNode, tree_context: &'a RpnTreeContext, extract_atom: F) -> PrismDBResult<Vec<E>> {
        Self::new(tree_context, extract_atom).build(RpnTreeNode::from_dag(root, tree_context))
    }

    fn new(tree_context: &'a RpnTreeContext, extract_atom: F) -> Self {
        Self {
            tree_context,
            extract_atom,
            max_depth: tree_context.query_context().settings().max_expression_depth,
            rpn: Vec::new(),
        }
    }

    fn build(mut self, root: RpnTreeNode<'a>) -> PrismDBResult<Vec<E>> {
        self.traverse(root, 1)?;
        debug!(
            query_id = %self.tree_context.query_context().query_id,
            elements = self.rpn.len(),
            "built RPN"
        );
        Ok(self.rpn)
    }

    fn traverse(&mut self, node: RpnTreeNode<'a>, depth: usize) -> PrismDBResult<()> {
        if depth > self.max_depth {
            return Err(PrismDBError::TooDeep {
                depth,
                max_depth: self.max_depth,
            });
        }

        if let Some(operator) = logical_operator(&node) {
            let function = node.to_function_node()?;
            // An n-ary connective contributes n - 1 binary operators; `not`
            // follows its only operand.
            for (i, argument) in function.arguments().enumerate() {
                self.traverse(argument, depth + 1)?;
                if i != 0 || operator == LogicalOperator::Not {
                    self.rpn.push(E::logical(operator));
                }
            }
            return Ok(());
        }

        let element = (self.extract_atom)(node).unwrap_or_default();
        self.rpn.push(element);
        Ok(())
    }
}

fn logical_operator(node: &RpnTreeNode<'_>) -> Option<LogicalOperator> {
    let function = node.to_function_node_or_null()?;
    match function.function_name() {
        "not" if function.arguments_size() == 1 => Some(LogicalOperator::Not),
        "and" | "indexHint" => Some(LogicalOperator::And),
        "or" => Some(LogicalOperator::Or),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{QueryContext, QuerySettings};
    use crate::parser::parse_expression;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    enum Element {
        #[default]
        Unknown,
        Atom(String),
        Operator(LogicalOperator),
    }

    impl RpnElement for Element {
        fn logical(operator: LogicalOperator) -> Self {
            Element::Operator(operator)
        }
    }

    fn atom(name: &str) -> Element {
        Element::Atom(name.to_string())
    }

    /// Accepts comparisons only
    fn extract_comparison(node: RpnTreeNode<'_>) -> Option<Element> {
        let function = node.to_function_node_or_null()?;
        match function.function_name() {
            "equals" | "less" | "greater" => Some(Element::Atom(node.column_name())),
            _ => None,
        }
    }

    #[test]
    fn test_nested_connectives() -> PrismDBResult<()> {
        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let ast = parse_expression("a = 1 AND (b < 2 OR NOT c > 3)")?;

        let rpn = RpnBuilder::from_ast(&ast, &context, extract_comparison)?;
        assert_eq!(
            rpn,
            vec![
                atom("equals(a, 1)"),
                atom("less(b, 2)"),
                atom("greater(c, 3)"),
                Element::Operator(LogicalOperator::Not),
                Element::Operator(LogicalOperator::Or),
                Element::Operator(LogicalOperator::And),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_n_ary_and_unknown_atoms() -> PrismDBResult<()> {
        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let ast = parse_expression("a = 1 AND b LIKE 'x%' AND c > 2")?;

        let rpn = RpnBuilder::from_ast(&ast, &context, extract_comparison)?;
        assert_eq!(
            rpn,
            vec![
                atom("equals(a, 1)"),
                Element::Unknown,
                Element::Operator(LogicalOperator::And),
                atom("greater(c, 2)"),
                Element::Operator(LogicalOperator::And),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_depth_limit() -> PrismDBResult<()> {
        let settings = QuerySettings {
            max_expression_depth: 2,
            ..QuerySettings::default()
        };
        let context = RpnTreeContext::new(QueryContext::with_settings(settings).into_ref());

        let shallow = parse_expression("a = 1 AND b = 2")?;
        assert_eq!(RpnBuilder::from_ast(&shallow, &context, extract_comparison)?.len(), 3);

        let deep = parse_expression("a = 1 AND (b = 2 OR NOT c = 3)")?;
        let err = RpnBuilder::from_ast(&deep, &context, extract_comparison).unwrap_err();
        assert!(matches!(err, PrismDBError::TooDeep { depth: 3, max_depth: 2 }));
        Ok(())
    }
}
