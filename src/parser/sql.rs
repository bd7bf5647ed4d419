//! SQL expression front end
//!
//! Parses SQL expression text with `sqlparser` and lowers it into [`AstNode`]s,
//! naming operators the way the engine's function registry does.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::not_implemented_err;
use crate::parser::ast::AstNode;
use crate::types::Value;
use sqlparser::ast::{
    BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, UnaryOperator,
    Value as SqlValue,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::trace;

/// Parse a standalone SQL expression, e.g. a WHERE clause body
pub fn parse_expression(sql: &str) -> PrismDBResult<AstNode> {
    let dialect = GenericDialect {};
    let expr = Parser::new(&dialect).try_with_sql(sql)?.parse_expr()?;
    trace!(sql, "parsed expression");
    lower_expr(&expr)
}

fn binary_function_name(op: &BinaryOperator) -> Option<&'static str> {
    let name = match op {
        BinaryOperator::Eq => "equals",
        BinaryOperator::NotEq => "notEquals",
        BinaryOperator::Lt => "less",
        BinaryOperator::LtEq => "lessOrEquals",
        BinaryOperator::Gt => "greater",
        BinaryOperator::GtEq => "greaterOrEquals",
        BinaryOperator::Plus => "plus",
        BinaryOperator::Minus => "minus",
        BinaryOperator::Multiply => "multiply",
        BinaryOperator::Divide => "divide",
        BinaryOperator::Modulo => "modulo",
        BinaryOperator::And => "and",
        BinaryOperator::Or => "or",
        BinaryOperator::StringConcat => "concat",
        _ => return None,
    };
    Some(name)
}

fn lower_expr(expr: &Expr) -> PrismDBResult<AstNode> {
    match expr {
        Expr::Identifier(ident) => Ok(AstNode::identifier(ident.value.clone())),
        Expr::CompoundIdentifier(parts) => Ok(AstNode::compound_identifier(
            parts.iter().map(|part| part.value.clone()).collect(),
        )),
        Expr::Value(value) => Ok(AstNode::literal(lower_value(&value.value)?)),
        Expr::Nested(inner) => lower_expr(inner),
        Expr::BinaryOp { left, op, right } => {
            let name = binary_function_name(op)
                .ok_or_else(|| not_implemented_err!("Binary operator {}", op))?;
            if name == "and" || name == "or" {
                let mut arguments = Vec::new();
                flatten_junction(left, op, &mut arguments)?;
                flatten_junction(right, op, &mut arguments)?;
                return Ok(AstNode::function(name, arguments));
            }
            Ok(AstNode::function(
                name,
                vec![lower_expr(left)?, lower_expr(right)?],
            ))
        }
        Expr::UnaryOp { op, expr } => match op {
            UnaryOperator::Not => Ok(AstNode::function("not", vec![lower_expr(expr)?])),
            UnaryOperator::Plus => lower_expr(expr),
            UnaryOperator::Minus => {
                let operand = lower_expr(expr)?;
                // `-5` is a literal, not a call
                match operand.as_literal().and_then(negate_literal) {
                    Some(negated) => Ok(AstNode::literal(negated)),
                    None => Ok(AstNode::function("negate", vec![operand])),
                }
            }
            other => Err(not_implemented_err!("Unary operator {}", other)),
        },
        Expr::IsNull(inner) => Ok(AstNode::function("isNull", vec![lower_expr(inner)?])),
        Expr::IsNotNull(inner) => Ok(AstNode::function("isNotNull", vec![lower_expr(inner)?])),
        Expr::Between {
            expr,
            negated,
            low,
            high,
        } => {
            let value = lower_expr(expr)?;
            let between = AstNode::function(
                "and",
                vec![
                    AstNode::function("greaterOrEquals", vec![value.clone(), lower_expr(low)?]),
                    AstNode::function("lessOrEquals", vec![value, lower_expr(high)?]),
                ],
            );
            Ok(if *negated {
                AstNode::function("not", vec![between])
            } else {
                between
            })
        }
        Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => Ok(AstNode::function(
            if *negated { "notLike" } else { "like" },
            vec![lower_expr(expr)?, lower_expr(pattern)?],
        )),
        Expr::InList {
            expr,
            list,
            negated,
        } => {
            let elements = list.iter().map(lower_expr).collect::<PrismDBResult<Vec<_>>>()?;
            Ok(AstNode::function(
                if *negated { "notIn" } else { "in" },
                vec![lower_expr(expr)?, AstNode::function("tuple", elements)],
            ))
        }
        Expr::InSubquery {
            expr,
            subquery,
            negated,
        } => Ok(AstNode::function(
            if *negated { "notIn" } else { "in" },
            vec![lower_expr(expr)?, AstNode::subquery(subquery.to_string())],
        )),
        Expr::Subquery(query) => Ok(AstNode::subquery(query.to_string())),
        Expr::Tuple(elements) => Ok(AstNode::function(
            "tuple",
            elements.iter().map(lower_expr).collect::<PrismDBResult<Vec<_>>>()?,
        )),
        Expr::Function(function) => {
            let name = function.name.to_string();
            match &function.args {
                FunctionArguments::None => Ok(AstNode::function_without_arguments(name)),
                FunctionArguments::List(list) => {
                    let arguments = list
                        .args
                        .iter()
                        .map(|argument| match argument {
                            FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => lower_expr(expr),
                            other => Err(not_implemented_err!("Function argument {}", other)),
                        })
                        .collect::<PrismDBResult<Vec<_>>>()?;
                    Ok(AstNode::function(name, arguments))
                }
                FunctionArguments::Subquery(query) => Ok(AstNode::function(
                    name,
                    vec![AstNode::subquery(query.to_string())],
                )),
            }
        }
        other => Err(not_implemented_err!("Expression {}", other)),
    }
}

fn flatten_junction(
    expr: &Expr,
    junction: &BinaryOperator,
    arguments: &mut Vec<AstNode>,
) -> PrismDBResult<()> {
    match expr {
        Expr::BinaryOp { left, op, right } if op == junction => {
            flatten_junction(left, junction, arguments)?;
            flatten_junction(right, junction, arguments)
        }
        other => {
            arguments.push(lower_expr(other)?);
            Ok(())
        }
    }
}

fn lower_value(value: &SqlValue) -> PrismDBResult<Value> {
    match value {
        SqlValue::Number(text, _) => {
            if let Ok(integer) = text.parse::<i64>() {
                Ok(Value::BigInt(integer))
            } else {
                text.parse::<f64>().map(Value::Double).map_err(|_| {
                    PrismDBError::Parse(format!("Invalid numeric literal '{}'", text))
                })
            }
        }
        SqlValue::SingleQuotedString(text) | SqlValue::DoubleQuotedString(text) => {
            Ok(Value::Varchar(text.clone()))
        }
        SqlValue::Boolean(flag) => Ok(Value::Boolean(*flag)),
        SqlValue::Null => Ok(Value::Null),
        other => Err(not_implemented_err!("Literal {}", other)),
    }
}

fn negate_literal(value: &Value) -> Option<Value> {
    match value {
        Value::BigInt(v) => v.checked_neg().map(Value::BigInt),
        Value::Double(v) => Some(Value::Double(-v)),
        _ => None,
    }
}
