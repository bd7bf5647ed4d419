//! Abstract Syntax Tree (AST) for expressions
//!
//! Defines the parsed, not yet planned form of an expression: the shape the SQL
//! front end produces and the first of the two representations index analysis
//! walks.

use crate::common::constants::{
    MODULO_FUNCTION_NAME, MODULO_LEGACY_FUNCTION_NAME, SUBQUERY_NAME_PREFIX,
};
use crate::types::Value;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

/// Structural hash of an expression subtree
pub type TreeHash = u64;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstKind,
    pub alias: Option<String>,
    /// When set, `column_name` reports the alias instead of the expression text
    pub prefer_alias_to_column_name: bool,
}

/// Node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    Literal(Value),
    /// Possibly qualified column reference, one entry per name part
    Identifier(Vec<String>),
    /// Table used as the right-hand side of `IN`
    TableIdentifier {
        database: Option<String>,
        table: String,
    },
    Function(AstFunction),
    Subquery(AstSubquery),
}

/// Function call
#[derive(Debug, Clone, PartialEq)]
pub struct AstFunction {
    pub name: String,
    /// `None` when the call was written without an argument list
    pub arguments: Option<Vec<AstNode>>,
}

/// Subquery; the query itself is kept as normalized text
#[derive(Debug, Clone, PartialEq)]
pub struct AstSubquery {
    pub query: String,
    pub cte_name: Option<String>,
}

impl AstNode {
    fn new(kind: AstKind) -> Self {
        Self {
            kind,
            alias: None,
            prefer_alias_to_column_name: false,
        }
    }

    pub fn literal(value: Value) -> Self {
        Self::new(AstKind::Literal(value))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(AstKind::Identifier(vec![name.into()]))
    }

    pub fn compound_identifier(parts: Vec<String>) -> Self {
        Self::new(AstKind::Identifier(parts))
    }

    pub fn table_identifier(database: Option<String>, table: impl Into<String>) -> Self {
        Self::new(AstKind::TableIdentifier {
            database,
            table: table.into(),
        })
    }

    pub fn function(name: impl Into<String>, arguments: Vec<AstNode>) -> Self {
        Self::new(AstKind::Function(AstFunction {
            name: name.into(),
            arguments: Some(arguments),
        }))
    }

    /// A call with no argument list at all, as opposed to an empty one
    pub fn function_without_arguments(name: impl Into<String>) -> Self {
        Self::new(AstKind::Function(AstFunction {
            name: name.into(),
            arguments: None,
        }))
    }

    pub fn subquery(query: impl Into<String>) -> Self {
        Self::new(AstKind::Subquery(AstSubquery {
            query: query.into(),
            cte_name: None,
        }))
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_prefer_alias_to_column_name(mut self) -> Self {
        self.prefer_alias_to_column_name = true;
        self
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            AstKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&AstFunction> {
        match &self.kind {
            AstKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, AstKind::Literal(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, AstKind::Function(_))
    }

    pub fn is_subquery(&self) -> bool {
        matches!(self.kind, AstKind::Subquery(_))
    }

    pub fn is_table_identifier(&self) -> bool {
        matches!(self.kind, AstKind::TableIdentifier { .. })
    }

    /// Direct children (function arguments); empty for leaves
    pub fn children(&self) -> &[AstNode] {
        match &self.kind {
            AstKind::Function(function) => function.arguments(),
            _ => &[],
        }
    }

    /// Column name used to look the expression up among computed columns.
    ///
    /// Respects `prefer_alias_to_column_name` at every level.
    pub fn column_name(&self) -> String {
        let mut out = String::new();
        self.append_column_name(&mut out, false);
        out
    }

    /// Column name with every alias ignored
    pub fn column_name_without_alias(&self) -> String {
        let mut out = String::new();
        self.append_column_name_without_alias(&mut out);
        out
    }

    pub fn append_column_name_without_alias(&self, out: &mut String) {
        self.append_column_name(out, true);
    }

    fn append_column_name(&self, out: &mut String, without_alias: bool) {
        if !without_alias && self.prefer_alias_to_column_name {
            if let Some(alias) = &self.alias {
                out.push_str(alias);
                return;
            }
        }

        match &self.kind {
            AstKind::Literal(value) => out.push_str(&value.to_string()),
            AstKind::Identifier(parts) => out.push_str(&parts.join(".")),
            AstKind::TableIdentifier { database, table } => {
                if let Some(database) = database {
                    out.push_str(database);
                    out.push('.');
                }
                out.push_str(table);
            }
            AstKind::Function(function) => {
                out.push_str(&function.name);
                out.push('(');
                for (i, argument) in function.arguments().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    argument.append_column_name(out, without_alias);
                }
                out.push(')');
            }
            AstKind::Subquery(subquery) => match &subquery.cte_name {
                Some(cte_name) => out.push_str(cte_name),
                None => {
                    out.push_str(SUBQUERY_NAME_PREFIX);
                    out.push_str(&self.tree_hash().to_string());
                }
            },
        }
    }

    /// Structural hash of this subtree. Aliases do not contribute.
    pub fn tree_hash(&self) -> TreeHash {
        let mut hasher = XxHash64::with_seed(0);
        self.update_tree_hash(&mut hasher);
        hasher.finish()
    }

    fn update_tree_hash(&self, hasher: &mut XxHash64) {
        match &self.kind {
            AstKind::Literal(value) => {
                hasher.write_u8(1);
                value.get_type().hash(hasher);
                value.to_string().hash(hasher);
            }
            AstKind::Identifier(parts) => {
                hasher.write_u8(2);
                parts.hash(hasher);
            }
            AstKind::TableIdentifier { database, table } => {
                hasher.write_u8(3);
                database.hash(hasher);
                table.hash(hasher);
            }
            AstKind::Function(function) => {
                hasher.write_u8(4);
                function.name.hash(hasher);
                match &function.arguments {
                    Some(arguments) => {
                        hasher.write_usize(arguments.len());
                        for argument in arguments {
                            argument.update_tree_hash(hasher);
                        }
                    }
                    None => hasher.write_u8(0),
                }
            }
            AstKind::Subquery(subquery) => {
                hasher.write_u8(5);
                subquery.query.hash(hasher);
            }
        }
    }

    /// Rewrite every `modulo` call in the subtree to the legacy function name.
    ///
    /// Consumes the tree; callers that must keep the original clone it first.
    pub fn into_modulo_legacy(self) -> AstNode {
        let kind = match self.kind {
            AstKind::Function(function) => {
                let name = if function.name == MODULO_FUNCTION_NAME {
                    MODULO_LEGACY_FUNCTION_NAME.to_string()
                } else {
                    function.name
                };
                let arguments = function.arguments.map(|arguments| {
                    arguments
                        .into_iter()
                        .map(AstNode::into_modulo_legacy)
                        .collect()
                });
                AstKind::Function(AstFunction { name, arguments })
            }
            other => other,
        };
        AstNode { kind, ..self }
    }
}

impl AstFunction {
    /// Arguments, or an empty slice when there is no argument list
    pub fn arguments(&self) -> &[AstNode] {
        self.arguments.as_deref().unwrap_or(&[])
    }
}
