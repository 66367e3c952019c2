use sharp_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::catalogue::RefactoringId;
use crate::context::{CodeAction, RefactoringContext};
use crate::error::RefactorError;
use crate::syntax_info::{modifier_list_info, Accessibility, ModifierListInfo};

/// Token pass: `token` is an accessibility keyword.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    token: &SyntaxToken,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ChangeAccessibility) {
        return Ok(());
    }
    let Some(member) = token
        .parent()
        .filter(|list| list.kind() == SyntaxKind::ModifierList)
        .and_then(|list| list.parent())
        .filter(|member| member.kind().is_member_declaration())
    else {
        return Ok(());
    };
    let info = modifier_list_info(&member);
    if !info.success() || info.is_override() {
        return Ok(());
    }
    let current = info.explicit_accessibility();
    for accessibility in allowed_accessibilities(&member, &info) {
        if accessibility == current {
            continue;
        }
        let info = info.clone();
        let title = format!("Change accessibility to '{}'", accessibility.text());
        let action = CodeAction::edit(
            RefactoringId::ChangeAccessibility,
            title,
            context.document(),
            move |_| Ok(info.with_explicit_accessibility(accessibility)?),
        )
        .with_equivalence_key(format!(
            "{}.{accessibility:?}",
            RefactoringId::ChangeAccessibility.id()
        ));
        context.register(action);
    }
    Ok(())
}

fn allowed_accessibilities(member: &SyntaxNode, info: &ModifierListInfo) -> Vec<Accessibility> {
    let container = member.parent().map(|parent| parent.kind());
    match container {
        Some(SyntaxKind::InterfaceDeclaration) | Some(SyntaxKind::EnumDeclaration) => Vec::new(),
        Some(
            SyntaxKind::CompilationUnit
            | SyntaxKind::NamespaceDeclaration
            | SyntaxKind::FileScopedNamespaceDeclaration,
        ) => vec![Accessibility::Public, Accessibility::Internal],
        Some(SyntaxKind::StructDeclaration) => vec![
            Accessibility::Public,
            Accessibility::Internal,
            Accessibility::Private,
        ],
        _ if info.is_static() && member.kind() == SyntaxKind::ConstructorDeclaration => Vec::new(),
        _ => Accessibility::EXPLICIT.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{actions, check_action, titles};

    #[test]
    fn offers_every_other_accessibility() {
        assert_eq!(
            titles(
                RefactoringId::ChangeAccessibility,
                "class C\n{\n    /*caret*/private int a;\n}\n"
            ),
            vec![
                "Change accessibility to 'public'",
                "Change accessibility to 'internal'",
                "Change accessibility to 'protected internal'",
                "Change accessibility to 'protected'",
                "Change accessibility to 'private protected'",
            ]
        );
    }

    #[test]
    fn top_level_types_are_public_or_internal() {
        let fixture = "/*caret*/public class C { }";
        assert_eq!(
            titles(RefactoringId::ChangeAccessibility, fixture),
            vec!["Change accessibility to 'internal'"]
        );
        check_action(
            &actions(fixture),
            RefactoringId::ChangeAccessibility,
            "internal class C { }",
        );
    }

    #[test]
    fn equivalence_keys_name_the_accessibility() {
        let keys: Vec<_> = actions("class C { /*caret*/public void M() { } }")
            .into_iter()
            .filter(|a| a.refactoring == RefactoringId::ChangeAccessibility)
            .map(|a| a.equivalence_key)
            .collect();
        assert!(keys.contains(&"RR0186.Private".to_string()));
        assert!(!keys.contains(&"RR0186.Public".to_string()));
    }

    #[test]
    fn overrides_are_skipped() {
        assert!(titles(
            RefactoringId::ChangeAccessibility,
            "class C { /*caret*/public override string ToString() => \"\"; }"
        )
        .is_empty());
    }
}
