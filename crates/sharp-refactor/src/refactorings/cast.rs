use sharp_syntax::{AstNode, Expression, SyntaxKind, SyntaxNode};

use super::{parenthesize_below, range_of, UNARY_PRECEDENCE};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::semantic::TypeSymbol;

/// Offers an explicit numeric cast for a value assigned to a narrower declared type.
///
/// `node` is the innermost expression at the span; the candidate is the whole
/// initializer (or assignment right side) containing it.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::AddCastExpression) {
        return Ok(());
    }
    let Some((value, target)) = cast_site(node) else {
        return Ok(());
    };
    let Some(model) = context.semantic_model()? else {
        return Ok(());
    };
    let (Some(declared), Some(actual)) = (model.type_of(&target), model.type_of(value.syntax()))
    else {
        return Ok(());
    };
    if !needs_cast(&declared, &actual) {
        return Ok(());
    }

    let range = range_of(value.syntax());
    let replacement = format!(
        "({}){}",
        declared.display(),
        parenthesize_below(&value, UNARY_PRECEDENCE + 1)
    );
    context.register_edit(
        RefactoringId::AddCastExpression,
        format!("Cast to '{}'", declared.display()),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// The converted value and the node whose type it must take: a variable declarator or
/// an assignment target.
fn cast_site(node: &SyntaxNode) -> Option<(Expression, SyntaxNode)> {
    let mut value = Expression::cast(node.clone())?;
    loop {
        let parent = value.syntax().parent()?;
        match parent.kind() {
            SyntaxKind::EqualsValueClause => {
                let declarator = parent
                    .parent()
                    .filter(|p| p.kind() == SyntaxKind::VariableDeclarator)?;
                return Some((value, declarator));
            }
            SyntaxKind::AssignmentExpression => {
                let assignment = sharp_syntax::AssignmentExpression::cast(parent)?;
                if assignment.operator_kind() != SyntaxKind::Eq {
                    return None;
                }
                let left = assignment.left()?;
                if left.syntax() == value.syntax() {
                    return None;
                }
                return Some((value, left.syntax().clone()));
            }
            _ => value = Expression::cast(parent)?,
        }
    }
}

fn needs_cast(declared: &TypeSymbol, actual: &TypeSymbol) -> bool {
    declared.is_numeric()
        && actual.is_numeric()
        && !actual.special.converts_implicitly_to(declared.special)
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
    fn casts_narrowing_initializer() {
        check(
            RefactoringId::AddCastExpression,
            &method("        long l = 1;\n        int i = /*caret*/l;\n"),
            &method("        long l = 1;\n        int i = (int)l;\n"),
        );
    }

    #[test]
    fn parenthesizes_binary_values() {
        check(
            RefactoringId::AddCastExpression,
            &method("        double d = 1;\n        float f = /*caret*/d * 2;\n"),
            &method("        double d = 1;\n        float f = (float)(d * 2);\n"),
        );
    }

    #[test]
    fn title_names_the_target_type() {
        assert_eq!(
            titles(
                RefactoringId::AddCastExpression,
                &method("        int i = /*caret*/1L;\n")
            ),
            vec!["Cast to 'int'"]
        );
    }

    #[test]
    fn widening_needs_no_cast() {
        check_not_offered(
            RefactoringId::AddCastExpression,
            &method("        int i = 1;\n        long l = /*caret*/i;\n"),
        );
    }
}
