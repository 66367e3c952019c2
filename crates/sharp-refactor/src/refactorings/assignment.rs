use sharp_syntax::{
    AssignmentExpression, AstNode, Expression, IfStatement, Statement, SyntaxKind, SyntaxNode,
    VariableDeclarator,
};

use super::{
    are_equivalent, binary_precedence, indent_following_lines, indentation_of,
    mentions_identifier, newline, parenthesize_below, range_of, text_of, INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::document::Document;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{
    assignment_expression_info, null_check_expression_info, simple_assignment_statement_info,
    single_local_declaration_statement_info, statement_list_info, MatchOptions, NullCheckStyles,
    StatementListSelection,
};

pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if context.is_enabled(RefactoringId::ExpandCompoundAssignment) {
        compute_expand_compound(context, node);
    }
    if context.is_enabled(RefactoringId::CheckExpressionForNull) {
        let Some(assignment) = AssignmentExpression::cast(node.clone()) else {
            return Ok(());
        };
        let Some(left) = assignment.left() else {
            return Ok(());
        };
        if !range_of(left.syntax()).contains_range(context.span()) {
            return Ok(());
        }
        let Some(statement) = assignment.syntax().parent().and_then(Statement::cast) else {
            return Ok(());
        };
        if can_check_assignment(context, &statement)? {
            register_null_check(context, &left, statement, None);
        }
    }
    Ok(())
}

fn compute_expand_compound(context: &mut RefactoringContext<'_>, node: &SyntaxNode) {
    let info = assignment_expression_info(node, MatchOptions::default());
    let (Some(assignment), Some(operator)) = (info.assignment(), info.operator_kind()) else {
        return;
    };
    let Some((binary_kind, text)) = expanded_operator(operator) else {
        return;
    };
    let (Some(left), Some(right)) = (assignment.left(), assignment.right()) else {
        return;
    };
    // `??` associates to the right, every other binary operator to the left.
    let min = match binary_kind {
        SyntaxKind::QuestionQuestion => binary_precedence(binary_kind),
        _ => binary_precedence(binary_kind) + 1,
    };
    let left = text_of(left.syntax());
    let replacement = format!("{left} = {left} {text} {}", parenthesize_below(&right, min));
    let range = range_of(assignment.syntax());
    context.register_edit(
        RefactoringId::ExpandCompoundAssignment,
        RefactoringId::ExpandCompoundAssignment.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
}

fn expanded_operator(kind: SyntaxKind) -> Option<(SyntaxKind, &'static str)> {
    Some(match kind {
        SyntaxKind::PlusEq => (SyntaxKind::Plus, "+"),
        SyntaxKind::MinusEq => (SyntaxKind::Minus, "-"),
        SyntaxKind::StarEq => (SyntaxKind::Star, "*"),
        SyntaxKind::SlashEq => (SyntaxKind::Slash, "/"),
        SyntaxKind::PercentEq => (SyntaxKind::Percent, "%"),
        SyntaxKind::AmpEq => (SyntaxKind::Amp, "&"),
        SyntaxKind::PipeEq => (SyntaxKind::Pipe, "|"),
        SyntaxKind::CaretEq => (SyntaxKind::Caret, "^"),
        SyntaxKind::LeftShiftEq => (SyntaxKind::LeftShift, "<<"),
        SyntaxKind::RightShiftEq => (SyntaxKind::RightShift, ">>"),
        SyntaxKind::QuestionQuestionEq => (SyntaxKind::QuestionQuestion, "??"),
        _ => return None,
    })
}

/// `T x = value;` with the span on `x`.
pub(crate) fn compute_local_declaration(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CheckExpressionForNull) {
        return Ok(());
    }
    let info = single_local_declaration_statement_info(node, false);
    let Some(identifier) = info.identifier() else {
        return Ok(());
    };
    if !super::token_range(identifier).contains_range(context.span()) {
        return Ok(());
    }
    let Some(statement) = Statement::cast(node.clone()) else {
        return Ok(());
    };
    if let Some(name) = can_check_local(context, &statement)? {
        register_null_check_named(context, name, statement, None);
    }
    Ok(())
}

/// Two or more selected statements starting with a declaration or an assignment: the
/// rest of the selection moves into the check.
pub(crate) fn compute_selected(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CheckExpressionForNull) || selection.count() < 2 {
        return Ok(());
    }
    let first = selection.first().clone();
    let following = selection.count() - 1;
    match first.kind() {
        SyntaxKind::LocalDeclarationStatement => {
            if let Some(name) = can_check_local(context, &first)? {
                register_null_check_named(context, name, first, Some(following));
            }
        }
        SyntaxKind::ExpressionStatement => {
            let info = simple_assignment_statement_info(first.syntax(), MatchOptions::default());
            let Some(left) = info.assignment().assignment().and_then(|a| a.left()) else {
                return Ok(());
            };
            if can_check_assignment(context, &first)? {
                register_null_check(context, &left, first, Some(following));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Values that are never null: creations, `this` and literals (`null` included, since
/// checking it is pointless).
fn cannot_be_null(value: &Expression) -> bool {
    matches!(
        value.walk_down_parentheses().kind(),
        SyntaxKind::ObjectCreationExpression
            | SyntaxKind::ImplicitObjectCreationExpression
            | SyntaxKind::AnonymousObjectCreationExpression
            | SyntaxKind::ArrayCreationExpression
            | SyntaxKind::ImplicitArrayCreationExpression
            | SyntaxKind::ThisExpression
            | SyntaxKind::LiteralExpression
            | SyntaxKind::InterpolatedStringExpression
            | SyntaxKind::DefaultExpression
    )
}

fn can_check_assignment(
    context: &RefactoringContext<'_>,
    statement: &Statement,
) -> Result<bool, RefactorError> {
    let info = simple_assignment_statement_info(statement.syntax(), MatchOptions::default());
    let (Some(left), Some(right)) = (info.left(), info.right()) else {
        return Ok(false);
    };
    if cannot_be_null(right) || null_check_follows(statement, left.syntax()) {
        return Ok(false);
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(false);
    };
    Ok(model
        .type_of(left.syntax())
        .is_some_and(|ty| ty.is_reference_type() || ty.is_nullable_value_type()))
}

/// The local's name when a null check makes sense for it.
fn can_check_local(
    context: &RefactoringContext<'_>,
    statement: &Statement,
) -> Result<Option<String>, RefactorError> {
    let info = single_local_declaration_statement_info(statement.syntax(), false);
    let (Some(declarator), Some(name), Some(value)) =
        (info.declarator(), info.name(), info.value())
    else {
        return Ok(None);
    };
    if info.statement().is_some_and(|s| s.is_const()) || cannot_be_null(value) {
        return Ok(None);
    }
    if null_check_follows_name(statement, name) {
        return Ok(None);
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(None);
    };
    let nullable = model
        .type_of(declarator.syntax())
        .is_some_and(|ty| ty.is_reference_type() || ty.is_nullable_value_type());
    Ok(nullable.then(|| name.to_string()))
}

/// Whether the next statement already is `if (expression != null)`.
fn null_check_follows(statement: &Statement, expression: &SyntaxNode) -> bool {
    next_if_checked_expression(statement).is_some_and(|checked| are_equivalent(&checked, expression))
}

fn null_check_follows_name(statement: &Statement, name: &str) -> bool {
    next_if_checked_expression(statement).is_some_and(|checked| {
        checked.kind() == SyntaxKind::IdentifierName && text_of(&checked).trim() == name
    })
}

fn next_if_checked_expression(statement: &Statement) -> Option<SyntaxNode> {
    let list = statement_list_info(statement.syntax());
    let index = list.index_of(statement)?;
    let next = list.statements().get(index + 1)?;
    let condition = IfStatement::cast(next.syntax().clone())?.condition()?;
    let info = null_check_expression_info(
        condition.syntax(),
        NullCheckStyles::NOT_EQUALS_TO_NULL,
        MatchOptions::default(),
    )
    .ok()?;
    info.expression().map(|e| e.syntax().clone())
}

fn register_null_check(
    context: &mut RefactoringContext<'_>,
    expression: &Expression,
    statement: Statement,
    wrap: Option<usize>,
) {
    let text = text_of(expression.syntax());
    register_null_check_named(context, text, statement, wrap);
}

fn register_null_check_named(
    context: &mut RefactoringContext<'_>,
    expression: String,
    statement: Statement,
    wrap: Option<usize>,
) {
    if !statement_list_info(statement.syntax()).success() {
        return;
    }
    let title = format!("Check '{expression}' for null");
    context.register_edit(RefactoringId::CheckExpressionForNull, title, move |document| {
        Ok(null_check_edits(document, &expression, &statement, wrap))
    });
}

/// Inserts `if (x != null)` after `statement`. The body takes `wrap` following
/// statements, or every following statement up to the last one that uses `x` together
/// with the uses of anything those statements declare.
fn null_check_edits(
    document: &Document,
    expression: &str,
    statement: &Statement,
    wrap: Option<usize>,
) -> EditSet {
    let text = document.text();
    let nl = newline(text);
    let indent = indentation_of(document, statement.syntax());
    let list = statement_list_info(statement.syntax());
    let statements = list.statements();
    let index = list.index_of(statement).unwrap_or(0);
    let name = checked_name(expression);

    let last = match wrap {
        Some(count) => Some((index + count).min(statements.len().saturating_sub(1))),
        None => last_use(statements, index, &name),
    };

    let mut edits = EditSet::new();
    match last.filter(|last| *last > index) {
        Some(last) => {
            let range = sharp_syntax::TextRange {
                start: range_of(statements[index + 1].syntax()).start,
                end: range_of(statements[last].syntax()).end,
            };
            let body = indent_following_lines(document.slice(range), INDENT);
            edits.replace(
                range,
                format!(
                    "if ({expression} != null){nl}{indent}{{{nl}{indent}{INDENT}{body}{nl}{indent}}}"
                ),
            );
        }
        None => {
            edits.insert(
                range_of(statement.syntax()).end,
                format!("{nl}{indent}if ({expression} != null){nl}{indent}{{{nl}{indent}}}"),
            );
        }
    }
    edits
}

/// Last identifier of `this.x`, `a.b.x` or `x`.
fn checked_name(expression: &str) -> String {
    expression
        .rsplit('.')
        .next()
        .unwrap_or(expression)
        .trim()
        .to_string()
}

fn last_use(statements: &[Statement], index: usize, name: &str) -> Option<usize> {
    let mut last = statements
        .iter()
        .enumerate()
        .skip(index + 1)
        .filter(|(_, s)| mentions_identifier(s.syntax(), name))
        .map(|(i, _)| i)
        .last()?;
    // Locals declared inside the wrapped run must stay visible to their uses.
    loop {
        let declared: Vec<String> = statements[index + 1..=last]
            .iter()
            .flat_map(|s| s.syntax().descendants().filter_map(VariableDeclarator::cast))
            .filter_map(|d| d.identifier().map(|id| id.text().to_string()))
            .collect();
        let extended = statements
            .iter()
            .enumerate()
            .skip(last + 1)
            .filter(|(_, s)| declared.iter().any(|name| mentions_identifier(s.syntax(), name)))
            .map(|(i, _)| i)
            .last();
        match extended {
            Some(next) if next > last => last = next,
            _ => return Some(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered, titles};

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M()\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn expands_compound_assignment() {
        check(
            RefactoringId::ExpandCompoundAssignment,
            &method("        x /*caret*/+= 1;\n"),
            &method("        x = x + 1;\n"),
        );
        check(
            RefactoringId::ExpandCompoundAssignment,
            &method("        x /*caret*/*= a + b;\n"),
            &method("        x = x * (a + b);\n"),
        );
        check(
            RefactoringId::ExpandCompoundAssignment,
            &method("        x /*caret*/-= a - b;\n"),
            &method("        x = x - (a - b);\n"),
        );
    }

    #[test]
    fn simple_assignment_is_not_compound() {
        check_not_offered(
            RefactoringId::ExpandCompoundAssignment,
            &method("        x /*caret*/= 1;\n"),
        );
    }

    #[test]
    fn checks_local_and_wraps_its_uses() {
        check(
            RefactoringId::CheckExpressionForNull,
            &method("        string /*caret*/s = F();\n        G(s);\n        H();\n"),
            &method(
                "        string s = F();\n        if (s != null)\n        {\n            G(s);\n        }\n        H();\n",
            ),
        );
    }

    #[test]
    fn inserts_empty_check_when_unused() {
        check(
            RefactoringId::CheckExpressionForNull,
            &method("        string /*caret*/s = F();\n        H();\n"),
            &method(
                "        string s = F();\n        if (s != null)\n        {\n        }\n        H();\n",
            ),
        );
    }

    #[test]
    fn checks_assignment_target() {
        let fixture = method("        string s;\n        /*caret*/s = F();\n        G(s);\n");
        assert_eq!(
            titles(RefactoringId::CheckExpressionForNull, &fixture),
            vec!["Check 's' for null"]
        );
        check(
            RefactoringId::CheckExpressionForNull,
            &fixture,
            &method(
                "        string s;\n        s = F();\n        if (s != null)\n        {\n            G(s);\n        }\n",
            ),
        );
    }

    #[test]
    fn wraps_rest_of_selection() {
        check(
            RefactoringId::CheckExpressionForNull,
            &method("        /*start*/string s = F();\n        H();\n        I();/*end*/\n"),
            &method(
                "        string s = F();\n        if (s != null)\n        {\n            H();\n            I();\n        }\n",
            ),
        );
    }

    #[test]
    fn values_that_cannot_be_null_are_skipped() {
        check_not_offered(
            RefactoringId::CheckExpressionForNull,
            &method("        string /*caret*/s = \"a\";\n        G(s);\n"),
        );
        check_not_offered(
            RefactoringId::CheckExpressionForNull,
            &method("        int /*caret*/i = F();\n        G(i);\n"),
        );
    }

    #[test]
    fn existing_check_is_respected() {
        check_not_offered(
            RefactoringId::CheckExpressionForNull,
            &method(
                "        string /*caret*/s = F();\n        if (s != null)\n        {\n            G(s);\n        }\n",
            ),
        );
    }
}
