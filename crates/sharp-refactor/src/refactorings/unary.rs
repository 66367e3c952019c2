use sharp_syntax::{AstNode, SyntaxKind, SyntaxNode, UnaryExpression};

use super::{range_of, text_of, token_range};
use crate::catalogue::RefactoringId;
use crate::context::{CodeAction, RefactoringContext};
use crate::edit::EditSet;
use crate::error::RefactorError;

/// `++`/`--` operators: flip the operator, or move it to the other side of the operand
/// when the value of the expression is discarded.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    let Some(unary) = UnaryExpression::cast(node.clone()) else {
        return Ok(());
    };
    let (Some(operator), Some(operand)) = (unary.operator(), unary.operand()) else {
        return Ok(());
    };
    let inverted = match operator.kind() {
        SyntaxKind::PlusPlus => "--",
        SyntaxKind::MinusMinus => "++",
        _ => return Ok(()),
    };

    if context.is_enabled(RefactoringId::InvertPrefixOrPostfixUnaryOperator) {
        let range = token_range(&operator);
        context.register_edit(
            RefactoringId::InvertPrefixOrPostfixUnaryOperator,
            RefactoringId::InvertPrefixOrPostfixUnaryOperator.title(),
            move |_| {
                let mut edits = EditSet::new();
                edits.replace(range, inverted);
                Ok(edits)
            },
        );
    }

    let discarded = node
        .parent()
        .is_some_and(|parent| parent.kind() == SyntaxKind::ExpressionStatement);
    if discarded && context.is_enabled(RefactoringId::ReplacePrefixOperatorWithPostfixOperator) {
        let operator_text = operator.text().to_string();
        let operand_text = text_of(operand.syntax());
        let (title, replacement) = if unary.is_prefix() {
            ("Use postfix operator", format!("{operand_text}{operator_text}"))
        } else {
            ("Use prefix operator", format!("{operator_text}{operand_text}"))
        };
        let range = range_of(node);
        let action = CodeAction::edit(
            RefactoringId::ReplacePrefixOperatorWithPostfixOperator,
            title,
            context.document(),
            move |_| {
                let mut edits = EditSet::new();
                edits.replace(range, replacement.clone());
                Ok(edits)
            },
        )
        .with_equivalence_key(format!(
            "{}.{}",
            RefactoringId::ReplacePrefixOperatorWithPostfixOperator.id(),
            if unary.is_prefix() { "Postfix" } else { "Prefix" }
        ));
        context.register(action);
    }
    Ok(())
}
