//! Block bodies and expression bodies.
//!
//! `{ return x; }` and `=> x;` convert into each other for members, accessors and local
//! functions; lambdas only ever go from an expression to a block.

use sharp_syntax::{
    support, AccessorDeclaration, AstNode, Block, CSharpFeature, Expression, LambdaExpression,
    MemberDeclaration, MethodLike, PropertyLike, Statement, SyntaxKind, SyntaxNode, TextRange,
};

use super::{
    has_comments_or_directives, indent_following_lines, indentation_of, newline,
    range_after_previous_token, range_of, text_of, token_range, INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::semantic::SemanticModel;

pub(crate) fn compute_member(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertBlockBodyToExpressionBody) {
        return Ok(());
    }
    let span = context.span();
    if let Some(method) = MethodLike::cast(member.syntax().clone()) {
        let Some(body) = method.body() else {
            return Ok(());
        };
        let needs_csharp7 = matches!(
            method.kind(),
            SyntaxKind::ConstructorDeclaration | SyntaxKind::DestructorDeclaration
        );
        if !range_of(body.syntax()).contains_range(span)
            || !context.supports(CSharpFeature::ExpressionBodiedMembers)
            || (needs_csharp7 && !context.supports_csharp7())
        {
            return Ok(());
        }
        let returns_value = match method.kind() {
            SyntaxKind::MethodDeclaration => !method.returns_void(),
            SyntaxKind::OperatorDeclaration | SyntaxKind::ConversionOperatorDeclaration => true,
            _ => false,
        };
        register_expression_body(context, body.syntax(), &body, returns_value);
        return Ok(());
    }

    let Some(property) = PropertyLike::cast(member.syntax().clone()) else {
        return Ok(());
    };
    let Some(accessor_list) = property.accessor_list() else {
        return Ok(());
    };
    if property.initializer().is_some()
        || !range_of(accessor_list.syntax()).contains_range(span)
        || !context.supports(CSharpFeature::ExpressionBodiedMembers)
    {
        return Ok(());
    }
    let mut accessors = accessor_list.accessors();
    let (Some(getter), None) = (accessors.next(), accessors.next()) else {
        return Ok(());
    };
    if getter.keyword().map(|k| k.kind()) != Some(SyntaxKind::GetKw)
        || getter.syntax().children().any(|n| match n.kind() {
            SyntaxKind::AttributeList => true,
            SyntaxKind::ModifierList => sharp_syntax::first_token(&n).is_some(),
            _ => false,
        })
    {
        return Ok(());
    }
    let expression = match (getter.body(), getter.expression_body()) {
        (Some(body), _) => {
            if has_comments_or_directives(body.syntax(), range_of(body.syntax())) {
                return Ok(());
            }
            expression_body_text(context, &body, true)
        }
        (None, Some(arrow)) => arrow.expression().map(|e| text_of(e.syntax())),
        (None, None) => None,
    };
    let (Some(expression), Some(range)) =
        (expression, range_after_previous_token(accessor_list.syntax()))
    else {
        return Ok(());
    };
    register_replacement(
        context,
        RefactoringId::ConvertBlockBodyToExpressionBody,
        range,
        format!(" => {expression};"),
    );
    Ok(())
}

pub(crate) fn compute_local_function(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertBlockBodyToExpressionBody) {
        return Ok(());
    }
    let Some(function) = MethodLike::cast(node.clone()) else {
        return Ok(());
    };
    let Some(body) = function.body() else {
        return Ok(());
    };
    if range_of(body.syntax()).contains_range(context.span()) {
        register_expression_body(context, body.syntax(), &body, !function.returns_void());
    }
    Ok(())
}

/// `get { return x; }` becomes `get => x;`.
pub(crate) fn compute_accessor(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertBlockBodyToExpressionBody)
        || !context.supports_csharp7()
    {
        return Ok(());
    }
    let Some(accessor) = AccessorDeclaration::cast(node.clone()) else {
        return Ok(());
    };
    let Some(body) = accessor.body() else {
        return Ok(());
    };
    if !range_of(body.syntax()).contains_range(context.span()) {
        return Ok(());
    }
    let returns_value = accessor.keyword().map(|k| k.kind()) == Some(SyntaxKind::GetKw);
    register_expression_body(context, body.syntax(), &body, returns_value);
    Ok(())
}

fn register_expression_body(
    context: &mut RefactoringContext<'_>,
    replaced: &SyntaxNode,
    body: &Block,
    returns_value: bool,
) {
    if has_comments_or_directives(body.syntax(), range_of(body.syntax())) {
        return;
    }
    let (Some(expression), Some(range)) = (
        expression_body_text(context, body, returns_value),
        range_after_previous_token(replaced),
    ) else {
        return;
    };
    register_replacement(
        context,
        RefactoringId::ConvertBlockBodyToExpressionBody,
        range,
        format!(" => {expression};"),
    );
}

/// The expression a single-statement block reduces to.
fn expression_body_text(
    context: &RefactoringContext<'_>,
    body: &Block,
    returns_value: bool,
) -> Option<String> {
    let mut statements = body.statements();
    let (Some(statement), None) = (statements.next(), statements.next()) else {
        return None;
    };
    let expression = statement_expression(&statement)?;
    match statement.kind() {
        SyntaxKind::ReturnStatement if returns_value => Some(text_of(expression.syntax())),
        SyntaxKind::ExpressionStatement if !returns_value => Some(text_of(expression.syntax())),
        SyntaxKind::ThrowStatement if context.supports(CSharpFeature::ThrowExpressions) => {
            Some(format!("throw {}", text_of(expression.syntax())))
        }
        _ => None,
    }
}

fn statement_expression(statement: &Statement) -> Option<Expression> {
    match statement.kind() {
        SyntaxKind::ReturnStatement | SyntaxKind::ExpressionStatement | SyntaxKind::ThrowStatement => {
            support::child(statement.syntax())
        }
        _ => None,
    }
}

/// `=> x;` becomes a block body.
pub(crate) fn compute_arrow_expression_clause(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertExpressionBodyToBlockBody) {
        return Ok(());
    }
    let (Some(owner), Some(expression)) =
        (node.parent(), node.children().find_map(Expression::cast))
    else {
        return Ok(());
    };
    let (Some(semicolon), Some(start)) = (
        support::token(&owner, SyntaxKind::Semicolon),
        range_after_previous_token(node),
    ) else {
        return Ok(());
    };
    let range = TextRange {
        start: start.start,
        end: token_range(&semicolon).end,
    };

    let document = context.document();
    let nl = newline(document.text());
    let indent = indentation_of(document, &owner);
    let value = indent_following_lines(&text_of(expression.syntax()), INDENT);

    let replacement = if let Some(method) = MethodLike::cast(owner.clone()) {
        let returns_value = match method.kind() {
            SyntaxKind::MethodDeclaration | SyntaxKind::LocalFunctionStatement => {
                !method.returns_void()
            }
            SyntaxKind::OperatorDeclaration | SyntaxKind::ConversionOperatorDeclaration => true,
            _ => false,
        };
        let statement = block_statement(&expression, &value, returns_value);
        format!("{nl}{indent}{{{nl}{indent}{INDENT}{statement}{nl}{indent}}}")
    } else if PropertyLike::can_cast(owner.kind()) {
        let statement = block_statement(&expression, &value, true);
        format!("{nl}{indent}{{{nl}{indent}{INDENT}get {{ {statement} }}{nl}{indent}}}")
    } else if let Some(accessor) = AccessorDeclaration::cast(owner.clone()) {
        let returns_value = accessor.keyword().map(|k| k.kind()) == Some(SyntaxKind::GetKw);
        let statement = block_statement(&expression, &value, returns_value);
        format!(" {{ {statement} }}")
    } else {
        return Ok(());
    };
    register_replacement(
        context,
        RefactoringId::ConvertExpressionBodyToBlockBody,
        range,
        replacement,
    );
    Ok(())
}

fn block_statement(expression: &Expression, text: &str, returns_value: bool) -> String {
    if expression.kind() == SyntaxKind::ThrowExpression || !returns_value {
        format!("{text};")
    } else {
        format!("return {text};")
    }
}

/// `x => x + 1` becomes `x => { return x + 1; }` laid out over several lines.
pub(crate) fn compute_lambda(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertLambdaExpressionBodyToBlockBody) {
        return Ok(());
    }
    let Some(lambda) = LambdaExpression::cast(node.clone()) else {
        return Ok(());
    };
    let (Some(arrow), Some(body)) = (lambda.arrow(), lambda.body().and_then(Expression::cast))
    else {
        return Ok(());
    };
    let model = context.semantic_model()?;
    let returns_value = !produces_no_value(&body, model.as_deref());

    let document = context.document();
    let nl = newline(document.text());
    let indent = indentation_of(document, node);
    let value = indent_following_lines(&text_of(body.syntax()), INDENT);
    let statement = block_statement(&body, &value, returns_value);
    let range = TextRange {
        start: token_range(&arrow).end,
        end: range_of(body.syntax()).end,
    };
    register_replacement(
        context,
        RefactoringId::ConvertLambdaExpressionBodyToBlockBody,
        range,
        format!("{nl}{indent}{{{nl}{indent}{INDENT}{statement}{nl}{indent}}}"),
    );
    Ok(())
}

/// Whether a lambda body is evaluated only for its effect: assignments, increments, and
/// calls the model types as `void`.
fn produces_no_value(body: &Expression, model: Option<&dyn SemanticModel>) -> bool {
    let body = body.walk_down_parentheses();
    match body.kind() {
        SyntaxKind::AssignmentExpression => true,
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression => {
            sharp_syntax::UnaryExpression::cast(body.syntax().clone()).is_some_and(|unary| {
                matches!(
                    unary.operator_kind(),
                    SyntaxKind::PlusPlus | SyntaxKind::MinusMinus
                )
            })
        }
        SyntaxKind::InvocationExpression | SyntaxKind::AwaitExpression => model
            .and_then(|model| model.type_of(body.syntax()))
            .is_some_and(|ty| ty.is_void()),
        _ => false,
    }
}

fn register_replacement(
    context: &mut RefactoringContext<'_>,
    id: RefactoringId,
    range: TextRange,
    replacement: String,
) {
    context.register_edit(id, id.title(), move |_| {
        let mut edits = EditSet::new();
        edits.replace(range, replacement.clone());
        Ok(edits)
    });
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    fn class(members: &str) -> String {
        format!("class C\n{{\n    int _v;\n\n{members}}}\n")
    }

    #[test]
    fn method_block_to_expression_body() {
        check(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class("    int M()\n    {\n        /*caret*/return _v + 1;\n    }\n"),
            &class("    int M() => _v + 1;\n"),
        );
    }

    #[test]
    fn void_method_keeps_expression_statement() {
        check(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class("    void M()\n    {\n        /*caret*/_v++;\n    }\n"),
            &class("    void M() => _v++;\n"),
        );
    }

    #[test]
    fn several_statements_stay_a_block() {
        check_not_offered(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class("    int M()\n    {\n        /*caret*/_v++;\n        return _v;\n    }\n"),
        );
    }

    #[test]
    fn get_only_property_to_expression_body() {
        check(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class("    int P\n    {\n        /*caret*/get { return _v; }\n    }\n"),
            &class("    int P => _v;\n"),
        );
    }

    #[test]
    fn getter_with_attributes_keeps_accessor_list() {
        check_not_offered(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class("    int P\n    {\n        [A] /*caret*/get { return _v; }\n    }\n"),
        );
    }

    #[test]
    fn accessor_to_expression_body() {
        check(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class(
                "    int P\n    {\n        get { /*caret*/return _v; }\n        set { _v = value; }\n    }\n",
            ),
            &class("    int P\n    {\n        get => _v;\n        set { _v = value; }\n    }\n"),
        );
    }

    #[test]
    fn local_function_to_expression_body() {
        check(
            RefactoringId::ConvertBlockBodyToExpressionBody,
            &class(
                "    void M()\n    {\n        int L()\n        {\n            /*caret*/return 1;\n        }\n    }\n",
            ),
            &class("    void M()\n    {\n        int L() => 1;\n    }\n"),
        );
    }

    #[test]
    fn method_expression_body_to_block() {
        check(
            RefactoringId::ConvertExpressionBodyToBlockBody,
            &class("    int M() /*caret*/=> _v;\n"),
            &class("    int M()\n    {\n        return _v;\n    }\n"),
        );
    }

    #[test]
    fn void_method_expression_body_to_block() {
        check(
            RefactoringId::ConvertExpressionBodyToBlockBody,
            &class("    void M() => /*caret*/F();\n"),
            &class("    void M()\n    {\n        F();\n    }\n"),
        );
    }

    #[test]
    fn property_expression_body_to_getter() {
        check(
            RefactoringId::ConvertExpressionBodyToBlockBody,
            &class("    int P => /*caret*/_v;\n"),
            &class("    int P\n    {\n        get { return _v; }\n    }\n"),
        );
    }

    #[test]
    fn lambda_with_value() {
        check(
            RefactoringId::ConvertLambdaExpressionBodyToBlockBody,
            &class("    void M()\n    {\n        Func<int, int> f = x /*caret*/=> x + 1;\n    }\n"),
            &class(
                "    void M()\n    {\n        Func<int, int> f = x =>\n        {\n            return x + 1;\n        };\n    }\n",
            ),
        );
    }

    #[test]
    fn lambda_with_assignment_has_no_return() {
        check(
            RefactoringId::ConvertLambdaExpressionBodyToBlockBody,
            &class("    void M()\n    {\n        Action<int> f = x /*caret*/=> _v = x;\n    }\n"),
            &class(
                "    void M()\n    {\n        Action<int> f = x =>\n        {\n            _v = x;\n        };\n    }\n",
            ),
        );
    }
}
