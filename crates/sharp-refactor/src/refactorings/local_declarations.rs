use sharp_syntax::{AstNode, SyntaxNode};

use super::{indentation_of, newline, range_of, text_of};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::single_local_declaration_statement_info;

/// `T x = v;` becomes `T x;` followed by `x = v;`.
///
/// `var` needs the model to spell the declared type.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::SplitLocalDeclarationAndAssignment) {
        return Ok(());
    }
    let info = single_local_declaration_statement_info(node, false);
    let (Some(statement), Some(declarator), Some(ty), Some(name), Some(value)) = (
        info.statement(),
        info.declarator(),
        info.ty(),
        info.name(),
        info.value(),
    ) else {
        return Ok(());
    };
    if statement.is_const() || statement.using_keyword().is_some() {
        return Ok(());
    }
    if !range_of(declarator.syntax()).contains_range(context.span()) {
        return Ok(());
    }
    let type_text = if info.is_var() {
        let Some(model) = context.semantic_model()? else {
            return Ok(());
        };
        match model.type_of(value.syntax()) {
            Some(ty) if !ty.is_error() => ty.display().to_string(),
            _ => return Ok(()),
        }
    } else {
        text_of(ty.syntax())
    };

    let document = context.document();
    let nl = newline(document.text());
    let indent = indentation_of(document, statement.syntax());
    let replacement = format!(
        "{type_text} {name};{nl}{indent}{name} = {};",
        text_of(value.syntax())
    );
    let range = range_of(statement.syntax());
    context.register_edit(
        RefactoringId::SplitLocalDeclarationAndAssignment,
        RefactoringId::SplitLocalDeclarationAndAssignment.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M()\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn splits_typed_declaration() {
        check(
            RefactoringId::SplitLocalDeclarationAndAssignment,
            &method("        int /*caret*/x = 1 + 2;\n"),
            &method("        int x;\n        x = 1 + 2;\n"),
        );
    }

    #[test]
    fn var_is_spelled_out() {
        check(
            RefactoringId::SplitLocalDeclarationAndAssignment,
            &method("        var /*caret*/s = \"a\";\n"),
            &method("        string s;\n        s = \"a\";\n"),
        );
    }

    #[test]
    fn const_and_uninitialized_locals_stay() {
        check_not_offered(
            RefactoringId::SplitLocalDeclarationAndAssignment,
            &method("        const int /*caret*/x = 1;\n"),
        );
        check_not_offered(
            RefactoringId::SplitLocalDeclarationAndAssignment,
            &method("        int /*caret*/x;\n"),
        );
    }
}
