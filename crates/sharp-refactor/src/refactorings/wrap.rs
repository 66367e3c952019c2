//! Wrappers around a selected run of statements or members.
//!
//! Every wrapper replaces only the range from the first selected token to the last one,
//! so the leading trivia of the first item and the trailing trivia of the last stay
//! outside.

use sharp_syntax::{AstNode, TextRange};

use super::{indent_following_lines, indentation_of, newline, range_of, INDENT};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{
    single_local_declaration_statement_info, MemberDeclarationListSelection,
    StatementListSelection,
};

/// Shape of the code put around the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Condition,
    IfDirective,
    Region,
    TryCatch,
}

impl Wrapper {
    fn id(self) -> RefactoringId {
        match self {
            Wrapper::Condition => RefactoringId::WrapStatementsInCondition,
            Wrapper::IfDirective => RefactoringId::WrapLinesInPreprocessorDirective,
            Wrapper::Region => RefactoringId::WrapLinesInRegion,
            Wrapper::TryCatch => RefactoringId::WrapLinesInTryCatch,
        }
    }

    /// `selected` is the verbatim text of the selection; `indent` the indentation of the
    /// line it starts on.
    fn wrap(self, selected: &str, indent: &str, nl: &str) -> String {
        match self {
            Wrapper::Condition => format!(
                "if (condition){nl}{indent}{}",
                block(selected, indent, nl)
            ),
            Wrapper::TryCatch => format!(
                "try{nl}{indent}{}{nl}{indent}catch (Exception ex){nl}{indent}{{{nl}{indent}}}",
                block(selected, indent, nl)
            ),
            Wrapper::IfDirective => {
                format!("#if DEBUG{nl}{indent}{selected}{nl}{indent}#endif")
            }
            Wrapper::Region => format!("#region{nl}{indent}{selected}{nl}{indent}#endregion"),
        }
    }
}

/// `{`, the selection pushed one level in, `}`.
fn block(selected: &str, indent: &str, nl: &str) -> String {
    format!(
        "{{{nl}{indent}{INDENT}{}{nl}{indent}}}",
        indent_following_lines(selected, INDENT)
    )
}

fn register_wrapper(
    context: &mut RefactoringContext<'_>,
    wrapper: Wrapper,
    range: TextRange,
    indent: &str,
) {
    let document = context.document();
    let replacement = wrapper.wrap(document.slice(range), indent, newline(document.text()));
    let id = wrapper.id();
    context.register_edit(id, id.title(), move |_| {
        let mut edits = EditSet::new();
        edits.replace(range, replacement.clone());
        Ok(edits)
    });
}

pub(crate) fn compute_statements(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
) -> Result<(), RefactorError> {
    let range = selection.range();
    let indent = indentation_of(context.document(), selection.first().syntax());

    if context.is_enabled(RefactoringId::WrapStatementsInUsingStatement) {
        compute_using(context, selection, &indent)?;
    }
    for wrapper in [
        Wrapper::Condition,
        Wrapper::IfDirective,
        Wrapper::Region,
        Wrapper::TryCatch,
    ] {
        if context.is_enabled(wrapper.id()) {
            register_wrapper(context, wrapper, range, &indent);
        }
    }
    Ok(())
}

pub(crate) fn compute_members(
    context: &mut RefactoringContext<'_>,
    selection: &MemberDeclarationListSelection,
) -> Result<(), RefactorError> {
    if context.is_enabled(RefactoringId::WrapLinesInRegion) {
        let indent = indentation_of(context.document(), selection.first().syntax());
        register_wrapper(context, Wrapper::Region, selection.range(), &indent);
    }
    Ok(())
}

/// `var r = new StreamReader(p); F(r);` becomes `using (var r = new StreamReader(p)) { F(r); }`.
///
/// The first selected statement must declare a single disposable local.
fn compute_using(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
    indent: &str,
) -> Result<(), RefactorError> {
    let first = selection.first();
    let info = single_local_declaration_statement_info(first.syntax(), false);
    let (Some(statement), Some(declaration), Some(ty), Some(value)) =
        (info.statement(), info.declaration(), info.ty(), info.value())
    else {
        return Ok(());
    };
    if statement.is_const() || statement.using_keyword().is_some() {
        return Ok(());
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(());
    };
    let symbol = if info.is_var() {
        model.type_of(value.syntax())
    } else {
        model.type_of(ty.syntax())
    };
    if !symbol.is_some_and(|symbol| model.is_disposable(&symbol)) {
        return Ok(());
    }

    let document = context.document();
    let nl = newline(document.text());
    let header = document.slice(range_of(declaration.syntax()));
    let body = match selection.selected() {
        [_, .., last] => {
            let rest = TextRange {
                start: range_of(selection.selected()[1].syntax()).start,
                end: range_of(last.syntax()).end,
            };
            block(document.slice(rest), indent, nl)
        }
        _ => format!("{{{nl}{indent}}}"),
    };
    let replacement = format!("using ({header}){nl}{indent}{body}");
    let range = selection.range();
    context.register_edit(
        RefactoringId::WrapStatementsInUsingStatement,
        RefactoringId::WrapStatementsInUsingStatement.title(),
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

    const SELECTED: &str = "        // keep\n        /*start*/F();\n        G();/*end*/ // trailing\n";

    #[test]
    fn wraps_in_condition() {
        check(
            RefactoringId::WrapStatementsInCondition,
            &method(SELECTED),
            &method("        // keep\n        if (condition)\n        {\n            F();\n            G();\n        } // trailing\n"),
        );
    }

    #[test]
    fn wraps_in_try_catch() {
        check(
            RefactoringId::WrapLinesInTryCatch,
            &method(SELECTED),
            &method("        // keep\n        try\n        {\n            F();\n            G();\n        }\n        catch (Exception ex)\n        {\n        } // trailing\n"),
        );
    }

    #[test]
    fn try_catch_leaves_edge_trivia_outside() {
        check(
            RefactoringId::WrapLinesInTryCatch,
            &method("        /* lead */ /*start*/F();\n        // inner\n        G();/*end*/ // tail\n"),
            &method("        /* lead */ try\n        {\n            F();\n            // inner\n            G();\n        }\n        catch (Exception ex)\n        {\n        } // tail\n"),
        );
    }

    #[test]
    fn wraps_in_region_and_directive() {
        check(
            RefactoringId::WrapLinesInRegion,
            &method(SELECTED),
            &method("        // keep\n        #region\n        F();\n        G();\n        #endregion // trailing\n"),
        );
        check(
            RefactoringId::WrapLinesInPreprocessorDirective,
            &method(SELECTED),
            &method("        // keep\n        #if DEBUG\n        F();\n        G();\n        #endif // trailing\n"),
        );
    }

    #[test]
    fn wraps_members_in_region() {
        check(
            RefactoringId::WrapLinesInRegion,
            "class C\n{\n    /*start*/int _a;\n\n    void M() { }/*end*/\n}\n",
            "class C\n{\n    #region\n    int _a;\n\n    void M() { }\n    #endregion\n}\n",
        );
    }

    #[test]
    fn wraps_disposable_local_in_using() {
        check(
            RefactoringId::WrapStatementsInUsingStatement,
            &method("        /*start*/var reader = new StreamReader(path);\n        F(reader);/*end*/\n"),
            &method("        using (var reader = new StreamReader(path))\n        {\n            F(reader);\n        }\n"),
        );
    }

    #[test]
    fn non_disposable_local_is_not_wrapped_in_using() {
        check_not_offered(
            RefactoringId::WrapStatementsInUsingStatement,
            &method("        /*start*/var s = \"a\";\n        F(s);/*end*/\n"),
        );
    }
}
