use criterion::{criterion_group, criterion_main, Criterion};
use prism_rpn::types::{LogicalType, Value};
use prism_rpn::{AstNode, ExpressionLowering, FunctionFactory, QueryContext, RpnTreeContext, RpnTreeNode};
use std::hint::black_box;

/// `plus(plus(plus(x, 1), 2), ...)` nested `depth` times
fn deep_expression(depth: usize) -> AstNode {
    let mut ast = AstNode::identifier("x");
    for i in 0..depth {
        let operand = AstNode::literal(Value::bigint(i as i64));
        let name = if i % 2 == 0 { "plus" } else { "modulo" };
        ast = AstNode::function(name, vec![ast, operand]);
    }
    ast
}

fn bench_column_name(c: &mut Criterion) {
    let ast = deep_expression(200);
    let factory = FunctionFactory::with_builtins();
    let mut lowering = ExpressionLowering::new(&factory).with_input("x", LogicalType::BigInt);
    let dag = lowering.lower(&ast).expect("expression lowers");
    let context = RpnTreeContext::new(QueryContext::new().into_ref());

    c.bench_function("column_name_ast", |b| {
        b.iter(|| black_box(RpnTreeNode::from_ast(&ast, &context).column_name()))
    });
    c.bench_function("column_name_dag", |b| {
        b.iter(|| black_box(RpnTreeNode::from_dag(&dag, &context).column_name()))
    });
    c.bench_function("column_name_modulo_legacy_ast", |b| {
        b.iter(|| black_box(RpnTreeNode::from_ast(&ast, &context).column_name_with_modulo_legacy()))
    });
}

criterion_group!(benches, bench_column_name);
criterion_main!(benches);
