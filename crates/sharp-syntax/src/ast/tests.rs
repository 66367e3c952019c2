use crate::ast::{
    AstNode, BinaryExpression, CompilationUnit, Expression, ForStatement, IfStatement,
    LambdaExpression, MemberDeclaration, MethodLike, PropertyLike, TypeDeclaration,
};
use crate::{parse_csharp, SyntaxKind};

fn unit(text: &str) -> CompilationUnit {
    let parse = parse_csharp(text);
    assert!(parse.errors.is_empty(), "{:?}", parse.errors);
    CompilationUnit::cast(parse.syntax()).expect("compilation unit")
}

#[test]
fn class_and_method_accessors() {
    let unit = unit("class Foo<T> where T : class { int Add(int a, int b) { return a + b; } }");
    let class = unit
        .members()
        .find_map(|m| TypeDeclaration::cast(m.syntax().clone()))
        .expect("class");
    assert_eq!(class.identifier().unwrap().text(), "Foo");
    assert_eq!(class.type_parameter_list().unwrap().parameters().count(), 1);
    assert_eq!(class.constraint_clauses().count(), 1);

    let method = class
        .members()
        .find_map(|m| MethodLike::cast(m.syntax().clone()))
        .expect("method");
    assert_eq!(method.identifier().unwrap().text(), "Add");
    assert_eq!(method.return_type().unwrap().syntax().text().to_string(), "int");
    let params: Vec<String> = method
        .parameter_list()
        .unwrap()
        .parameters()
        .map(|p| p.identifier().unwrap().text().to_string())
        .collect();
    assert_eq!(params, vec!["a", "b"]);
    assert_eq!(method.body().unwrap().statements().count(), 1);
}

#[test]
fn member_identifiers() {
    let unit = unit("class C { int _x, _y; C() { } int P { get; set; } void IFoo.Bar() { } }");
    let class = unit
        .members()
        .find_map(|m| TypeDeclaration::cast(m.syntax().clone()))
        .unwrap();
    let names: Vec<String> = class
        .members()
        .filter_map(|m: MemberDeclaration| m.identifier())
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(names, vec!["_x", "C", "P", "Bar"]);

    let property = class
        .members()
        .find_map(|m| PropertyLike::cast(m.syntax().clone()))
        .unwrap();
    assert!(property.is_auto_property());
}

#[test]
fn expression_accessors() {
    let unit = unit("class C { void M() { if ((a)) x = b - c; else y = c; } }");
    let if_stmt = unit
        .syntax()
        .descendants()
        .find_map(IfStatement::cast)
        .unwrap();
    let condition = if_stmt.condition().unwrap();
    assert_eq!(condition.kind(), SyntaxKind::ParenthesizedExpression);
    assert_eq!(condition.walk_down_parentheses().syntax().text().to_string(), "a");
    assert!(if_stmt.else_clause().is_some());

    let binary = unit
        .syntax()
        .descendants()
        .find_map(BinaryExpression::cast)
        .unwrap();
    assert_eq!(binary.operator_kind(), SyntaxKind::Minus);
    assert_eq!(binary.left().unwrap().syntax().text().to_string(), "b");
    assert_eq!(binary.right().unwrap().syntax().text().to_string(), "c");
    let inner = binary.left().unwrap();
    assert_eq!(inner.walk_up_parentheses(), inner);
}

#[test]
fn for_statement_sections() {
    let unit = unit("class C { void M() { for (int i = 0; i < n; i++, j--) { } } }");
    let for_stmt = unit
        .syntax()
        .descendants()
        .find_map(ForStatement::cast)
        .unwrap();
    assert!(for_stmt.declaration().is_some());
    assert_eq!(for_stmt.condition().unwrap().syntax().text().to_string(), "i < n");
    assert_eq!(for_stmt.incrementors().len(), 2);
    assert_eq!(for_stmt.statement().unwrap().kind(), SyntaxKind::Block);
}

#[test]
fn lambda_bodies() {
    let unit = unit("class C { void M() { F(x => x + 1, (a, b) => { }); } }");
    let lambdas: Vec<LambdaExpression> = unit
        .syntax()
        .descendants()
        .filter_map(LambdaExpression::cast)
        .collect();
    assert_eq!(lambdas.len(), 2);
    assert!(lambdas[0]
        .body()
        .and_then(Expression::cast)
        .is_some_and(|e| e.kind() == SyntaxKind::BinaryExpression));
    assert_eq!(lambdas[1].body().unwrap().kind(), SyntaxKind::Block);
    assert_eq!(lambdas[1].parameter_list().unwrap().parameters().count(), 2);
}
