use pretty_assertions::assert_eq;
use sharp_syntax::{AstNode, BinaryExpression, IfStatement, SyntaxKind, SyntaxNode, TextRange};
use sharp_test_utils::extract_range;

use super::*;
use crate::document::Document;
use crate::error::{InfoError, RefactorError};
use crate::semantic::DeclarationSemanticModel;

fn document(text: &str) -> Document {
    Document::new("Test.cs", text)
}

fn find(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?}"))
}

fn texts(expressions: &[sharp_syntax::Expression]) -> Vec<String> {
    expressions
        .iter()
        .map(|e| e.syntax().text().to_string())
        .collect()
}

#[test]
fn default_values_are_inert() {
    assert!(!BinaryExpressionInfo::default().success());
    assert!(BinaryExpressionInfo::default().expressions(true).is_empty());
    assert_eq!(BinaryExpressionInfo::default().kind(), None);
    assert!(!AssignmentExpressionInfo::default().success());
    assert!(!SimpleAssignmentStatementInfo::default().success());
    assert!(ConditionalExpressionInfo::default().condition().is_none());
    assert!(NullCheckExpressionInfo::default().expression().is_none());
    assert!(!NullCheckExpressionInfo::default().is_checking_null());
    assert_eq!(StringLiteralExpressionInfo::default().inner_text(), "");
    assert!(!StringLiteralExpressionInfo::default().contains_linefeed());
    assert!(StringConcatenationExpressionInfo::default()
        .to_string_literal_text()
        .is_err());
    assert_eq!(
        StringConcatenationExpressionInfo::default().to_interpolated_string_text(),
        Err(InfoError::NotInitialized("StringConcatenationExpressionInfo"))
    );
    assert!(GenericInfo::default().type_parameters().is_empty());
    assert!(!TypeParameterConstraintInfo::default().is_duplicate());
    assert!(StatementListInfo::default().statements().is_empty());
    assert!(MemberDeclarationListInfo::default().members().is_empty());
    assert!(UsingDirectiveListInfo::default().usings().is_empty());
    assert!(ParameterInfo::default().parameters().is_empty());
    assert!(SingleParameterLambdaExpressionInfo::default().body().is_none());
    assert!(RegionInfo::default().name().is_none());
    assert!(RegionInfo::default().remove_directives("").is_empty());
    assert!(DirectiveInfo::default().remove_all().is_empty());
    assert!(!SimpleIfStatementInfo::default().success());
    assert!(!SimpleIfElseInfo::default().success());
    assert_eq!(IfStatementCascadeInfo::default().count(), 0);
    assert!(AsExpressionInfo::default().ty().is_none());
    assert!(IsExpressionInfo::default().expression().is_none());
    assert!(LocalDeclarationStatementInfo::default().declarators().is_empty());
    assert!(!SingleLocalDeclarationStatementInfo::default().is_var());
    assert!(SimpleMemberInvocationExpressionInfo::default().arguments().is_empty());
    assert!(!SimpleMemberInvocationStatementInfo::default().success());
    assert_eq!(BinaryExpressionInfo::default(), BinaryExpressionInfo::default());
}

#[test]
fn chain_flattening_in_both_directions() {
    let doc = document("class C { int M() { return a + b + c + d; } }");
    let root = doc.syntax();
    let outer = root
        .descendants()
        .filter_map(BinaryExpression::cast)
        .next()
        .expect("binary");
    let info = binary_expression_info(outer.syntax(), MatchOptions::default());
    assert_eq!(info.kind(), Some(SyntaxKind::Plus));
    assert_eq!(texts(&info.expressions(true)), vec!["a", "b", "c", "d"]);
    assert_eq!(texts(&info.expressions(false)), vec!["d", "c", "b", "a"]);
}

#[test]
fn chain_stops_at_other_operator_kind() {
    let doc = document("class C { bool M() { return a && b || c && d; } }");
    let root = doc.syntax();
    let outer = root
        .descendants()
        .filter_map(BinaryExpression::cast)
        .next()
        .expect("binary");
    let info = binary_expression_info(outer.syntax(), MatchOptions::default());
    assert_eq!(info.kind(), Some(SyntaxKind::PipePipe));
    assert_eq!(texts(&info.expressions(true)), vec!["a && b", "c && d"]);
}

#[test]
fn topmost_climbs_only_through_left_operands() {
    let doc = document("class C { int M() { return a + b + c; } }");
    let root = doc.syntax();
    let binaries: Vec<BinaryExpression> =
        root.descendants().filter_map(BinaryExpression::cast).collect();
    let inner = binaries.last().expect("inner");
    assert_eq!(inner.syntax().text().to_string(), "a + b");
    assert_eq!(topmost_same_kind(inner), binaries[0]);

    let doc = document("class C { int M() { return a - (b - c); } }");
    let root = doc.syntax();
    let inner = root
        .descendants()
        .filter_map(BinaryExpression::cast)
        .last()
        .expect("inner");
    assert_eq!(topmost_same_kind(&inner), inner);
}

#[test]
fn parenthesized_operands_respect_options() {
    let doc = document("class C { int M() { return (a) * b; } }");
    let node = find(&doc.syntax(), SyntaxKind::BinaryExpression);
    assert!(binary_expression_info(&node, MatchOptions::default()).success());
    assert!(!binary_expression_info(&node, MatchOptions::strict()).success());
}

#[test]
fn missing_tokens_fail_unless_allowed() {
    let doc = document("class C { void M() { x = a + ; } }");
    let node = find(&doc.syntax(), SyntaxKind::BinaryExpression);
    assert!(!binary_expression_info(&node, MatchOptions::default()).success());
    let tolerant = MatchOptions {
        allow_missing: true,
        ..MatchOptions::default()
    };
    assert!(binary_expression_info(&node, tolerant).success());
}

fn null_check(text: &str, styles: NullCheckStyles) -> NullCheckExpressionInfo {
    let doc = document(text);
    let model = DeclarationSemanticModel::new(&doc);
    let condition = IfStatement::cast(find(&doc.syntax(), SyntaxKind::IfStatement))
        .and_then(|s| s.condition())
        .expect("condition");
    null_check_expression_info_with_model(condition.syntax(), &model, styles, MatchOptions::default())
}

#[test]
fn null_check_equals_null() {
    let info = null_check("class C { void M(string x) { if (x == null) { } } }", NullCheckStyles::ALL);
    assert!(info.success());
    assert_eq!(info.style(), NullCheckStyles::EQUALS_TO_NULL);
    assert!(info.is_checking_null());
    assert_eq!(
        info.expression().map(|e| e.syntax().text().to_string()),
        Some("x".to_string())
    );

    let reversed = null_check("class C { void M(string x) { if (null != x) { } } }", NullCheckStyles::ALL);
    assert_eq!(reversed.style(), NullCheckStyles::NOT_EQUALS_TO_NULL);
    assert!(reversed.is_checking_not_null());
}

#[test]
fn null_check_not_has_value() {
    let info = null_check("class C { void M(int? x) { if (!x.HasValue) { } } }", NullCheckStyles::ALL);
    assert!(info.success());
    assert_eq!(info.style(), NullCheckStyles::NOT_HAS_VALUE);
    assert!(info.is_checking_null());

    let compared = null_check(
        "class C { void M(int? x) { if (x.HasValue == false) { } } }",
        NullCheckStyles::ALL,
    );
    assert_eq!(compared.style(), NullCheckStyles::NOT_HAS_VALUE);

    let reference = null_check("class C { void M(string x) { if (!x.HasValue) { } } }", NullCheckStyles::ALL);
    assert!(!reference.success());
}

#[test]
fn null_check_patterns_and_filters() {
    let info = null_check("class C { void M(string x) { if (x is null) { } } }", NullCheckStyles::ALL);
    assert_eq!(info.style(), NullCheckStyles::IS_NULL);
    let negated = null_check("class C { void M(string x) { if (!(x is null)) { } } }", NullCheckStyles::ALL);
    assert_eq!(negated.style(), NullCheckStyles::NOT_IS_NULL);

    let filtered = null_check(
        "class C { void M(string x) { if (x == null) { } } }",
        NullCheckStyles::CHECKING_NOT_NULL,
    );
    assert!(!filtered.success());
}

#[test]
fn syntactic_null_check_rejects_has_value_styles() {
    let doc = document("class C { void M(string x) { if (x == null) { } } }");
    let node = find(&doc.syntax(), SyntaxKind::BinaryExpression);
    assert_eq!(
        null_check_expression_info(&node, NullCheckStyles::ALL, MatchOptions::default())
            .map(|info| info.success()),
        Err(InfoError::SemanticModelRequired("NullCheckStyles::HAS_VALUE_PROPERTY"))
    );
    assert!(null_check_expression_info(
        &node,
        NullCheckStyles::COMPARISON_TO_NULL,
        MatchOptions::default()
    )
    .is_ok_and(|info| info.success()));
}

#[test]
fn if_shapes() {
    let doc = document(
        "class C { void M() { if (a) x(); else if (b) y(); else z(); if (c) { } if (d) { } else { } } }",
    );
    let ifs: Vec<IfStatement> = doc
        .syntax()
        .descendants()
        .filter_map(IfStatement::cast)
        .collect();
    // ifs: [if a, else-if b, if c, if d]
    let cascade = if_statement_cascade_info(&ifs[1]);
    assert_eq!(cascade.count(), 3);
    assert!(cascade.ends_with_else());
    assert_eq!(cascade.topmost(), Some(&ifs[0]));

    assert!(!simple_if_else_info(ifs[0].syntax(), MatchOptions::default()).success());
    assert!(!simple_if_statement_info(ifs[1].syntax(), MatchOptions::default()).success());
    assert!(simple_if_statement_info(ifs[2].syntax(), MatchOptions::default()).success());
    assert!(simple_if_else_info(ifs[3].syntax(), MatchOptions::default()).success());
}

#[test]
fn single_local_declaration_from_any_part() {
    let doc = document("class C { void M() { var x = new object(); int a = 1, b = 2; } }");
    let root = doc.syntax();
    let creation = find(&root, SyntaxKind::ObjectCreationExpression);
    let info = single_local_declaration_statement_info(&creation, false);
    assert!(info.success());
    assert_eq!(info.name(), Some("x"));
    assert!(info.is_var());

    let second = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::LocalDeclarationStatement)
        .nth(1)
        .expect("second");
    assert!(!single_local_declaration_statement_info(&second, false).success());
    assert_eq!(local_declaration_statement_info(&second, false).declarators().len(), 2);
}

#[test]
fn member_invocation_and_lambda() {
    let doc = document("class C { void M() { items.Select(x => x.Name); F((y) => y); } }");
    let root = doc.syntax();
    let statement = find(&root, SyntaxKind::ExpressionStatement);
    let info = simple_member_invocation_statement_info(&statement, false);
    assert!(info.success());
    assert_eq!(info.invocation_info().name_text(), Some("Select"));
    assert_eq!(info.invocation_info().arguments().len(), 1);

    let simple = find(&root, SyntaxKind::SimpleLambdaExpression);
    let lambda = single_parameter_lambda_expression_info(&simple, false);
    assert!(lambda.success());
    assert!(!lambda.is_parenthesized());
    let parenthesized = find(&root, SyntaxKind::ParenthesizedLambdaExpression);
    assert!(single_parameter_lambda_expression_info(&parenthesized, false).is_parenthesized());
    assert_eq!(parameter_info(&parenthesized).parameters().len(), 1);
}

#[test]
fn statement_selection_requires_whole_statements() {
    let (text, span) = extract_range(
        "class C\n{\n    void M()\n    {\n        a();\n        /*start*/b();\n        c();/*end*/\n        d();\n    }\n}\n",
    );
    let doc = document(&text);
    let block = doc
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Block)
        .expect("block");
    let selection = statement_list_selection(&block, span).expect("selection");
    assert_eq!(selection.first_index(), 1);
    assert_eq!(selection.last_index(), 2);
    assert_eq!(selection.count(), 2);

    let partial = TextRange {
        start: span.start + 1,
        end: span.end,
    };
    assert!(statement_list_selection(&block, partial).is_none());
}

#[test]
fn generic_removal() {
    let doc = document("class C<T, U> where T : class where U : struct\n{\n}\n");
    let class = find(&doc.syntax(), SyntaxKind::ClassDeclaration);
    let info = generic_info(&class);
    assert_eq!(info.type_parameters().len(), 2);

    let removed = info.remove_type_parameter(&doc, "U").expect("remove");
    assert_eq!(removed.text(), "class C<T> where T : class\n{\n}\n");

    let removed = info.remove_all_constraint_clauses(&doc).expect("remove");
    assert_eq!(removed.text(), "class C<T, U>\n{\n}\n");

    let single = document("class C<T> where T : new() { }");
    let class = find(&single.syntax(), SyntaxKind::ClassDeclaration);
    let removed = generic_info(&class)
        .remove_type_parameter(&single, "T")
        .expect("remove");
    assert_eq!(removed.text(), "class C { }");
}

#[test]
fn removing_the_sole_constraint_clause_merges_trivia() {
    let inline = document("class C<T> where T : class { }");
    let class = find(&inline.syntax(), SyntaxKind::ClassDeclaration);
    let removed = generic_info(&class)
        .remove_constraint_clause(&inline, "T")
        .expect("remove");
    assert_eq!(removed.text(), "class C<T> { }");

    let own_line = document("class C<T>\n    where T : class\n{\n}\n");
    let class = find(&own_line.syntax(), SyntaxKind::ClassDeclaration);
    let removed = generic_info(&class)
        .remove_constraint_clause(&own_line, "T")
        .expect("remove");
    assert_eq!(removed.text(), "class C<T>\n{\n}\n");

    let missing = generic_info(&class).remove_constraint_clause(&own_line, "U");
    assert!(matches!(
        missing,
        Err(RefactorError::Info(InfoError::ConstraintClauseNotFound { .. }))
    ));
}

#[test]
fn constraint_info_resolves_type_parameter() {
    let doc = document("class C<T> where T : class, class { }");
    let constraints: Vec<SyntaxNode> = doc
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::ClassOrStructConstraint)
        .collect();
    let first = type_parameter_constraint_info(&constraints[0]);
    assert_eq!(first.name().as_deref(), Some("T"));
    assert!(first.type_parameter().is_some());
    assert!(!first.is_duplicate());
    assert!(type_parameter_constraint_info(&constraints[1]).is_duplicate());
}
