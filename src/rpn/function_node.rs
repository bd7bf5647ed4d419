//! Function call nodes

use crate::rpn::tree_node::{RpnNodeRef, RpnTreeNode};
use std::ops::Deref;

/// A tree node known to be a function call.
///
/// Obtained through [`RpnTreeNode::to_function_node`]; every tree node query is
/// available through `Deref`.
#[derive(Debug, Clone, Copy)]
pub struct RpnFunctionNode<'a> {
    node: RpnTreeNode<'a>,
}

impl<'a> RpnFunctionNode<'a> {
    pub(crate) fn new(node: RpnTreeNode<'a>) -> Self {
        debug_assert!(node.is_function());
        Self { node }
    }

    /// Called name for syntax trees, resolved implementation name for graphs
    pub fn function_name(&self) -> &'a str {
        match self.node.node() {
            RpnNodeRef::Ast(ast_node) => ast_node
                .as_function()
                .map(|function| function.name.as_str())
                .unwrap_or_default(),
            RpnNodeRef::Dag(dag_node) => dag_node
                .function_name()
                .unwrap_or(dag_node.result_name.as_str()),
        }
    }

    /// Number of arguments; zero for a call without an argument list
    pub fn arguments_size(&self) -> usize {
        match self.node.node() {
            RpnNodeRef::Ast(ast_node) => ast_node.children().len(),
            RpnNodeRef::Dag(dag_node) => dag_node.children.len(),
        }
    }

    /// The argument at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.arguments_size()`.
    pub fn argument_at(&self, index: usize) -> RpnTreeNode<'a> {
        let tree_context = self.node.tree_context();
        match self.node.node() {
            RpnNodeRef::Ast(ast_node) => RpnTreeNode::from_ast(&ast_node.children()[index], tree_context),
            RpnNodeRef::Dag(dag_node) => RpnTreeNode::from_dag(&dag_node.children[index], tree_context),
        }
    }

    pub fn arguments(&self) -> impl Iterator<Item = RpnTreeNode<'a>> + 'a {
        let function = *self;
        (0..function.arguments_size()).map(move |index| function.argument_at(index))
    }

    pub fn as_tree_node(&self) -> RpnTreeNode<'a> {
        self.node
    }
}

impl<'a> Deref for RpnFunctionNode<'a> {
    type Target = RpnTreeNode<'a>;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::QueryContext;
    use crate::parser::ast::AstNode;
    use crate::planner::{ExpressionLowering, FunctionFactory};
    use crate::rpn::context::RpnTreeContext;
    use crate::types::{LogicalType, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ast_function_arguments() {
        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let ast = AstNode::function(
            "equals",
            vec![AstNode::identifier("a"), AstNode::literal(Value::bigint(1))],
        );
        let function = RpnTreeNode::from_ast(&ast, &context).to_function_node().unwrap();

        assert_eq!(function.function_name(), "equals");
        assert_eq!(function.arguments_size(), 2);
        assert_eq!(function.argument_at(0).column_name(), "a");
        assert!(function.argument_at(1).is_constant());
        // Tree node queries through Deref
        assert_eq!(function.column_name(), "equals(a, 1)");

        let names: Vec<String> = function.arguments().map(|argument| argument.column_name()).collect();
        assert_eq!(names, vec!["a".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_call_without_argument_list() {
        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let ast = AstNode::function_without_arguments("now");
        let function = RpnTreeNode::from_ast(&ast, &context).to_function_node().unwrap();
        assert_eq!(function.arguments_size(), 0);
        assert_eq!(function.arguments().count(), 0);
    }

    #[test]
    fn test_dag_function_uses_resolved_name() {
        let factory = FunctionFactory::with_builtins();
        let mut lowering = ExpressionLowering::new(&factory).with_input("a", LogicalType::Integer);
        let ast = AstNode::function(
            "MOD",
            vec![AstNode::identifier("a"), AstNode::literal(Value::bigint(2))],
        );
        let root = lowering.lower(&ast).unwrap();

        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let function = RpnTreeNode::from_dag(&root, &context).to_function_node().unwrap();
        assert_eq!(function.function_name(), "modulo");
        assert_eq!(function.arguments_size(), 2);
        assert_eq!(function.argument_at(1).column_name(), "2");
    }

    #[test]
    #[should_panic]
    fn test_argument_out_of_range_panics() {
        let context = RpnTreeContext::new(QueryContext::new().into_ref());
        let ast = AstNode::function("f", vec![AstNode::identifier("x")]);
        let function = RpnTreeNode::from_ast(&ast, &context).to_function_node().unwrap();
        function.argument_at(1);
    }
}
