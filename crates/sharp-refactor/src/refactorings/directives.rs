use sharp_syntax::{SyntaxKind, SyntaxNode};

use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::error::RefactorError;
use crate::syntax_info::{directive_info, region_info};

/// Directive pass: the span touches one or more directive lines.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    root: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_any_enabled(&[
        RefactoringId::RemoveRegion,
        RefactoringId::RemoveAllPreprocessorDirectives,
    ]) {
        return Ok(());
    }
    let info = directive_info(root);
    let Some(directive) = info.intersecting(context.span()).next().cloned() else {
        return Ok(());
    };

    if context.is_enabled(RefactoringId::RemoveRegion)
        && matches!(
            directive.kind(),
            SyntaxKind::RegionDirective | SyntaxKind::EndRegionDirective
        )
    {
        let region = region_info(&directive);
        if region.success() {
            context.register_edit(
                RefactoringId::RemoveRegion,
                RefactoringId::RemoveRegion.title(),
                move |document| Ok(region.remove_directives(document.text())),
            );
        }
    }

    if context.is_enabled(RefactoringId::RemoveAllPreprocessorDirectives) {
        context.register_edit(
            RefactoringId::RemoveAllPreprocessorDirectives,
            RefactoringId::RemoveAllPreprocessorDirectives.title(),
            move |_| Ok(info.remove_all()),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    #[test]
    fn removes_region_directives() {
        check(
            RefactoringId::RemoveRegion,
            "class C\n{\n    #region /*caret*/Fields\n    int a;\n    #endregion\n}\n",
            "class C\n{\n    int a;\n}\n",
        );
    }

    #[test]
    fn caret_before_region_keyword() {
        check(
            RefactoringId::RemoveRegion,
            "class C\n{\n    /*caret*/#region R\n    int a;\n    #endregion\n}\n",
            "class C\n{\n    int a;\n}\n",
        );
    }

    #[test]
    fn removes_all_directives() {
        check(
            RefactoringId::RemoveAllPreprocessorDirectives,
            "#if DEBUG\nclass C\n{\n    #region A\n    int a;\n    #endregion\n}\n#endif/*caret*/\n",
            "class C\n{\n    int a;\n}\n",
        );
    }

    #[test]
    fn region_needs_a_directive() {
        check_not_offered(RefactoringId::RemoveRegion, "class C { int /*caret*/a; }");
    }
}
