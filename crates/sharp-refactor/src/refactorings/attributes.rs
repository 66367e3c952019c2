use sharp_syntax::{AstNode, AttributeList, MemberDeclaration, SyntaxKind, SyntaxNode, TextRange};

use super::{has_comments_or_directives, newline, range_of, text_of};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::SyntaxListSelection;

/// Splits the attribute list under the caret: `[A, B]` becomes `[A]` and `[B]`, each on
/// its own line when the list starts a line and side by side otherwise.
pub(crate) fn compute_attribute_list(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::SplitAttributes) {
        return Ok(());
    }
    let Some(list) = AttributeList::cast(node.clone()) else {
        return Ok(());
    };
    if list.attributes().count() < 2 {
        return Ok(());
    }
    let text = context.document().text();
    let separator = list_separator(text, node);
    let replacement = split_list(&list).join(&separator);
    register_replacement(context, RefactoringId::SplitAttributes, range_of(node), replacement);
    Ok(())
}

/// Merge and split over several selected attribute lists of one declaration.
pub(crate) fn compute_member(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if !context.is_any_enabled(&[RefactoringId::SplitAttributes, RefactoringId::MergeAttributes])
        || member.kind() == SyntaxKind::NamespaceDeclaration
    {
        return Ok(());
    }
    let lists: Vec<AttributeList> = member.attribute_lists().collect();
    let Some(selection) = SyntaxListSelection::create(lists, context.span()) else {
        return Ok(());
    };
    if selection.count() < 2 {
        return Ok(());
    }
    let text = context.document().text();
    let range = selection.range();

    if context.is_enabled(RefactoringId::SplitAttributes)
        && selection
            .selected()
            .iter()
            .any(|list| list.attributes().count() > 1)
    {
        let separator = list_separator(text, selection.first().syntax());
        let replacement = selection
            .selected()
            .iter()
            .flat_map(split_list)
            .collect::<Vec<_>>()
            .join(&separator);
        register_replacement(context, RefactoringId::SplitAttributes, range, replacement);
    }

    if context.is_enabled(RefactoringId::MergeAttributes) {
        if has_comments_or_directives(member.syntax(), range) {
            return Ok(());
        }
        let target = selection.first().target().map(|t| text_of(t.syntax()));
        let same_target = selection
            .selected()
            .iter()
            .all(|list| list.target().map(|t| text_of(t.syntax())) == target);
        if !same_target {
            return Ok(());
        }
        let attributes: Vec<String> = selection
            .selected()
            .iter()
            .flat_map(|list| list.attributes().map(|a| text_of(a.syntax())).collect::<Vec<_>>())
            .collect();
        let replacement = bracketed(target.as_deref(), &attributes.join(", "));
        register_replacement(context, RefactoringId::MergeAttributes, range, replacement);
    }
    Ok(())
}

fn split_list(list: &AttributeList) -> Vec<String> {
    let target = list.target().map(|t| text_of(t.syntax()));
    list.attributes()
        .map(|attribute| bracketed(target.as_deref(), &text_of(attribute.syntax())))
        .collect()
}

fn bracketed(target: Option<&str>, attributes: &str) -> String {
    match target {
        Some(target) => format!("[{target} {attributes}]"),
        None => format!("[{attributes}]"),
    }
}

fn list_separator(text: &str, list: &SyntaxNode) -> String {
    let start = range_of(list).start_usize();
    let line_start = text[..start].rfind('\n').map_or(0, |idx| idx + 1);
    let before = &text[line_start..start];
    if before.trim().is_empty() {
        format!("{}{before}", newline(text))
    } else {
        " ".to_string()
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

    #[test]
    fn splits_list_onto_separate_lines() {
        check(
            RefactoringId::SplitAttributes,
            "class C\n{\n    [Obsolete, /*caret*/Serializable]\n    void M() { }\n}\n",
            "class C\n{\n    [Obsolete]\n    [Serializable]\n    void M() { }\n}\n",
        );
    }

    #[test]
    fn split_keeps_target() {
        check(
            RefactoringId::SplitAttributes,
            "[assembly: A, /*caret*/B]\n",
            "[assembly: A]\n[assembly: B]\n",
        );
    }

    #[test]
    fn inline_parameter_lists_split_side_by_side() {
        check(
            RefactoringId::SplitAttributes,
            "class C\n{\n    void M([In, /*caret*/Out] int x) { }\n}\n",
            "class C\n{\n    void M([In] [Out] int x) { }\n}\n",
        );
    }

    #[test]
    fn merges_selected_lists() {
        check(
            RefactoringId::MergeAttributes,
            "class C\n{\n    /*start*/[Obsolete]\n    [Serializable(true)]/*end*/\n    void M() { }\n}\n",
            "class C\n{\n    [Obsolete, Serializable(true)]\n    void M() { }\n}\n",
        );
    }

    #[test]
    fn different_targets_do_not_merge() {
        check_not_offered(
            RefactoringId::MergeAttributes,
            "class C\n{\n    /*start*/[return: NotNull]\n    [Pure]/*end*/\n    string M() => \"\";\n}\n",
        );
    }

    #[test]
    fn single_attribute_is_not_split() {
        check_not_offered(
            RefactoringId::SplitAttributes,
            "class C\n{\n    [/*caret*/Obsolete]\n    void M() { }\n}\n",
        );
    }
}
