use sharp_syntax::{
    prev_token, support, AstNode, BinaryExpression, Expression, ParenthesizedExpression,
    SyntaxKind, SyntaxNode,
};

use super::{binary_precedence, precedence, token_range, PRIMARY_PRECEDENCE, UNARY_PRECEDENCE};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;

pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::RemoveParentheses) {
        return Ok(());
    }
    let Some(parenthesized) = ParenthesizedExpression::cast(node.clone()) else {
        return Ok(());
    };
    let (Some(open), Some(close), Some(inner)) = (
        support::token(node, SyntaxKind::OpenParen),
        support::token(node, SyntaxKind::CloseParen),
        parenthesized.expression(),
    ) else {
        return Ok(());
    };
    if !can_remove(node, &inner) {
        return Ok(());
    }

    // `return(x)` must keep a separator once the parenthesis is gone.
    let glued = prev_token(&open).is_some_and(|previous| {
        let range = token_range(&previous);
        range.end == token_range(&open).start && ends_with_word_char(previous.text())
    });
    let open_range = token_range(&open);
    let close_range = token_range(&close);
    context.register_edit(
        RefactoringId::RemoveParentheses,
        RefactoringId::RemoveParentheses.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(open_range, if glued { " " } else { "" });
            edits.delete(close_range);
            Ok(edits)
        },
    );
    Ok(())
}

fn ends_with_word_char(text: &str) -> bool {
    text.chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Whether `inner` keeps its meaning without the parentheses in `node`'s position.
fn can_remove(node: &SyntaxNode, inner: &Expression) -> bool {
    let inner_precedence = precedence(inner);
    let Some(parent) = node.parent() else {
        return true;
    };
    if !parent.kind().is_expression() {
        return true;
    }
    match parent.kind() {
        SyntaxKind::ParenthesizedExpression => true,
        SyntaxKind::BinaryExpression => {
            let Some(binary) = BinaryExpression::cast(parent) else {
                return false;
            };
            let operator = binary_precedence(binary.operator_kind());
            let is_left = binary
                .left()
                .is_some_and(|left| left.syntax() == node);
            inner_precedence > operator
                || (inner_precedence == operator
                    && is_left
                    && binary.operator_kind() != SyntaxKind::QuestionQuestion)
        }
        SyntaxKind::AssignmentExpression => {
            // Only the right side may be parenthesized meaningfully.
            sharp_syntax::AssignmentExpression::cast(parent)
                .and_then(|assignment| assignment.right())
                .is_some_and(|right| right.syntax() == node)
        }
        SyntaxKind::ConditionalExpression => inner_precedence > 2,
        SyntaxKind::PrefixUnaryExpression
        | SyntaxKind::CastExpression
        | SyntaxKind::AwaitExpression => inner_precedence >= UNARY_PRECEDENCE,
        SyntaxKind::SimpleLambdaExpression
        | SyntaxKind::ParenthesizedLambdaExpression
        | SyntaxKind::ThrowExpression => true,
        _ => inner_precedence >= PRIMARY_PRECEDENCE,
    }
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    fn method(body: &str) -> String {
        format!("class C\n{{\n    int M(int a, int b)\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn removes_around_initializer() {
        check(
            RefactoringId::RemoveParentheses,
            &method("        var x = /*caret*/(a + b);\n        return x;\n"),
            &method("        var x = a + b;\n        return x;\n"),
        );
    }

    #[test]
    fn keeps_separator_after_keyword() {
        check(
            RefactoringId::RemoveParentheses,
            &method("        return/*caret*/(a);\n"),
            &method("        return a;\n"),
        );
    }

    #[test]
    fn removes_when_precedence_allows() {
        check(
            RefactoringId::RemoveParentheses,
            &method("        return /*caret*/(a * b) + 1;\n"),
            &method("        return a * b + 1;\n"),
        );
    }

    #[test]
    fn keeps_grouping_that_changes_meaning() {
        check_not_offered(
            RefactoringId::RemoveParentheses,
            &method("        return /*caret*/(a + b) * 2;\n"),
        );
        check_not_offered(
            RefactoringId::RemoveParentheses,
            &method("        return a - /*caret*/(b - 1);\n"),
        );
    }
}
