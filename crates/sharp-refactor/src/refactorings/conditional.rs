use sharp_syntax::{AstNode, SyntaxNode};

use super::{logically_invert, range_of, text_of};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{conditional_expression_info, MatchOptions};

/// `c ? a : b` becomes `!c ? b : a`.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::InvertConditionalExpression) {
        return Ok(());
    }
    let info = conditional_expression_info(node, MatchOptions::strict());
    let (Some(condition), Some(when_true), Some(when_false)) =
        (info.condition(), info.when_true(), info.when_false())
    else {
        return Ok(());
    };

    let edits = [
        (range_of(condition.syntax()), logically_invert(condition)),
        (range_of(when_true.syntax()), text_of(when_false.syntax())),
        (range_of(when_false.syntax()), text_of(when_true.syntax())),
    ];
    context.register_edit(
        RefactoringId::InvertConditionalExpression,
        RefactoringId::InvertConditionalExpression.title(),
        move |_| {
            let mut set = EditSet::new();
            for (range, text) in &edits {
                set.replace(*range, text.clone());
            }
            Ok(set)
        },
    );
    Ok(())
}
