//! Column names of graph nodes
//!
//! Renders a computation graph node in the same textual form the syntax tree
//! uses for its column names, so the two representations name the same
//! expression identically.

use crate::common::constants::{ARRAY_JOIN_FUNCTION_NAME, MODULO_FUNCTION_NAME, MODULO_LEGACY_FUNCTION_NAME};
use crate::planner::actions_dag::{ActionType, DagNode};

/// Column name of `node`, ignoring aliases.
///
/// With `legacy` set, `modulo` calls are named `moduloLegacy`.
pub fn dag_column_name(node: &DagNode, legacy: bool) -> String {
    let mut out = String::new();
    append_dag_column_name(node, &mut out, legacy);
    out
}

pub fn append_dag_column_name(node: &DagNode, out: &mut String, legacy: bool) {
    match node.action_type {
        ActionType::Input => out.push_str(&node.result_name),
        ActionType::Column => {
            // The result name of a constant may be an alias; render the value.
            let constant = node
                .column
                .as_ref()
                .filter(|column| column.is_const() && column.as_column_set().is_none())
                .and_then(|column| column.get(0).ok());
            match constant {
                Some(value) => out.push_str(&value.to_string()),
                None => out.push_str(&node.result_name),
            }
        }
        ActionType::Alias => match node.children.first() {
            Some(child) => append_dag_column_name(child, out, legacy),
            None => out.push_str(&node.result_name),
        },
        ActionType::ArrayJoin => {
            out.push_str(ARRAY_JOIN_FUNCTION_NAME);
            out.push('(');
            if let Some(child) = node.children.first() {
                append_dag_column_name(child, out, legacy);
            }
            out.push(')');
        }
        ActionType::Function => {
            let name = node.function_name().unwrap_or(&node.result_name);
            if legacy && name == MODULO_FUNCTION_NAME {
                out.push_str(MODULO_LEGACY_FUNCTION_NAME);
            } else {
                out.push_str(name);
            }
            out.push('(');
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                append_dag_column_name(child, out, legacy);
            }
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::actions_dag::ActionsDag;
    use crate::planner::function::FunctionFactory;
    use crate::sets::Set;
    use crate::types::{Column, ColumnWithTypeAndName, LogicalType, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constant_renders_value_not_alias() {
        let mut dag = ActionsDag::new();
        let constant = dag.add_column(ColumnWithTypeAndName::new(
            Column::new_const(Value::varchar("it's"), 1),
            LogicalType::Varchar,
            "some_alias",
        ));
        assert_eq!(dag_column_name(&constant, false), "'it\\'s'");
    }

    #[test]
    fn test_set_column_uses_result_name() {
        let mut dag = ActionsDag::new();
        let set = Set::from_rows(vec![LogicalType::Integer], vec![vec![Value::integer(1)]]).unwrap();
        let node = dag.add_column(ColumnWithTypeAndName::new(
            Column::new_const_set(set, 1),
            LogicalType::Set,
            "tuple(1)",
        ));
        assert_eq!(dag_column_name(&node, false), "tuple(1)");
    }

    #[test]
    fn test_alias_array_join_and_legacy_modulo() {
        let factory = FunctionFactory::with_builtins();
        let mut dag = ActionsDag::new();
        let arr = dag.add_input("arr", LogicalType::List(Box::new(LogicalType::Integer)));
        let joined = dag.add_array_join(&arr, "x").unwrap();
        let aliased = dag.add_alias(&joined, "elem");
        let three = dag.add_column(ColumnWithTypeAndName::new(
            Column::new_const(Value::integer(3), 1),
            LogicalType::Integer,
            "3",
        ));
        let modulo = factory
            .resolve("modulo", &[LogicalType::Integer, LogicalType::Integer])
            .unwrap();
        let node = dag.add_function(modulo, vec![aliased, three], Some("m".to_string()));

        assert_eq!(dag_column_name(&node, false), "modulo(arrayJoin(arr), 3)");
        assert_eq!(dag_column_name(&node, true), "moduloLegacy(arrayJoin(arr), 3)");
    }
}
