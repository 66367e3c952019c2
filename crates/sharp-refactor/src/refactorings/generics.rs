use sharp_syntax::{
    first_token, prev_token, AstNode, DelegateDeclaration, MemberDeclaration, MethodLike,
    SyntaxKind, SyntaxNode, TextRange, TypeDeclaration,
};

use super::{indentation_of, mentions_identifier, newline, range_of, text_of, token_range, INDENT};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::generic_info;

/// Adds a fresh type parameter to a class, struct, interface, delegate or method.
///
/// Offered with the caret inside an existing type parameter list, or between the
/// declared name and the body (types) or parameter list (methods and delegates).
pub(crate) fn compute_member(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::AddGenericParameterToDeclaration) {
        return Ok(());
    }
    let node = member.syntax();
    let Some(limit) = name_region_end(node) else {
        return Ok(());
    };
    let info = generic_info(node);
    let Some(identifier) = info.identifier() else {
        return Ok(());
    };
    let span = context.span();

    let insertion = match info.type_parameter_list() {
        Some(list) => {
            let range = range_of(list.syntax());
            let list_text = text_of(list.syntax());
            if !span.is_empty() || !range.contains_range(span) || !list_text.ends_with('>') {
                return Ok(());
            }
            (range.end - 1, true)
        }
        None => {
            let name = token_range(&identifier);
            if span.start < name.end || span.end > limit {
                return Ok(());
            }
            (name.end, false)
        }
    };

    let name = fresh_type_parameter_name(node);
    let (offset, append) = insertion;
    let inserted = if append {
        format!(", {name}")
    } else {
        format!("<{name}>")
    };
    tracing::trace!(target: "sharp.refactor", %name, "adding type parameter");
    context.register_edit(
        RefactoringId::AddGenericParameterToDeclaration,
        RefactoringId::AddGenericParameterToDeclaration.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.insert(offset, inserted.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// Where the caret stops counting as "on the name".
fn name_region_end(node: &SyntaxNode) -> Option<u32> {
    match node.kind() {
        SyntaxKind::ClassDeclaration
        | SyntaxKind::StructDeclaration
        | SyntaxKind::InterfaceDeclaration => {
            let brace = TypeDeclaration::cast(node.clone())?.open_brace()?;
            Some(token_range(&brace).start)
        }
        SyntaxKind::DelegateDeclaration => {
            let parameters = DelegateDeclaration::cast(node.clone())?.parameter_list()?;
            Some(range_of(parameters.syntax()).start)
        }
        SyntaxKind::MethodDeclaration => {
            let method = MethodLike::cast(node.clone())?;
            if method.body().is_none() && method.expression_body().is_none() {
                return None;
            }
            Some(range_of(method.parameter_list()?.syntax()).start)
        }
        _ => None,
    }
}

/// `T`, then `T2`, `T3`, ... skipping names used by this or any enclosing declaration.
fn fresh_type_parameter_name(node: &SyntaxNode) -> String {
    let taken: Vec<String> = node
        .ancestors()
        .flat_map(|ancestor| generic_info(&ancestor).type_parameters())
        .filter_map(|parameter| parameter.identifier().map(|id| id.text().to_string()))
        .collect();
    let mut suffix = 1;
    loop {
        let candidate = if suffix == 1 {
            "T".to_string()
        } else {
            format!("T{suffix}")
        };
        if !taken.contains(&candidate) && !mentions_identifier(node, &candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Moves every constraint clause of a declaration onto its own line, or joins them back
/// onto the header line.
pub(crate) fn compute_constraint_clause(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::WrapConstraintClauses) {
        return Ok(());
    }
    let Some(owner) = node.parent() else {
        return Ok(());
    };
    let clauses = generic_info(&owner).constraint_clauses();
    let (Some(first), Some(last)) = (clauses.first(), clauses.last()) else {
        return Ok(());
    };
    let Some(before) = first_token(first.syntax()).and_then(|token| prev_token(&token)) else {
        return Ok(());
    };
    let document = context.document();
    let text = document.text();
    let range = TextRange {
        start: token_range(&before).end,
        end: range_of(last.syntax()).end,
    };
    let clause_texts: Vec<String> = clauses.iter().map(|c| text_of(c.syntax())).collect();
    let is_wrapped = document
        .slice(TextRange {
            start: range.start,
            end: range_of(first.syntax()).start,
        })
        .contains('\n');

    let (title, replacement) = if is_wrapped {
        ("Unwrap constraints", format!(" {}", clause_texts.join(" ")))
    } else {
        let nl = newline(text);
        let indent = format!("{}{INDENT}", indentation_of(document, &owner));
        let wrapped: String = clause_texts
            .iter()
            .map(|clause| format!("{nl}{indent}{clause}"))
            .collect();
        ("Wrap constraints", wrapped)
    };
    context.register_edit(RefactoringId::WrapConstraintClauses, title, move |_| {
        let mut edits = EditSet::new();
        edits.replace(range, replacement.clone());
        Ok(edits)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered, titles};

    #[test]
    fn adds_type_parameter_list() {
        check(
            RefactoringId::AddGenericParameterToDeclaration,
            "class C/*caret*/\n{\n}\n",
            "class C<T>\n{\n}\n",
        );
    }

    #[test]
    fn appends_to_existing_list() {
        check(
            RefactoringId::AddGenericParameterToDeclaration,
            "class C<T/*caret*/>\n{\n}\n",
            "class C<T, T2>\n{\n}\n",
        );
    }

    #[test]
    fn method_avoids_enclosing_names() {
        check(
            RefactoringId::AddGenericParameterToDeclaration,
            "class C<T>\n{\n    void M/*caret*/() { }\n}\n",
            "class C<T>\n{\n    void M<T2>() { }\n}\n",
        );
    }

    #[test]
    fn abstract_methods_are_skipped() {
        check_not_offered(
            RefactoringId::AddGenericParameterToDeclaration,
            "abstract class C\n{\n    abstract void M/*caret*/();\n}\n",
        );
    }

    #[test]
    fn wraps_constraints() {
        check(
            RefactoringId::WrapConstraintClauses,
            "class C<T, U> /*caret*/where T : class where U : new()\n{\n}\n",
            "class C<T, U>\n    where T : class\n    where U : new()\n{\n}\n",
        );
    }

    #[test]
    fn unwraps_constraints() {
        let fixture = "class C\n{\n    void M<T>()\n        where /*caret*/T : class\n    {\n    }\n}\n";
        assert_eq!(
            titles(RefactoringId::WrapConstraintClauses, fixture),
            vec!["Unwrap constraints".to_string()]
        );
        check(
            RefactoringId::WrapConstraintClauses,
            fixture,
            "class C\n{\n    void M<T>() where T : class\n    {\n    }\n}\n",
        );
    }
}
