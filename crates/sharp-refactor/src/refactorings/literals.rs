use sharp_syntax::{
    escape_regular_string_text, escape_verbatim_string_text, interpolated_string_parts,
    string_literal_inner_text, AstNode, BinaryExpression, InterpolatedPart,
    InterpolatedStringExpression, LiteralExpression, SyntaxKind, SyntaxNode, TextRange,
};

use super::token_range;
use crate::catalogue::RefactoringId;
use crate::context::{CodeAction, RefactoringContext};
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{
    string_concatenation_expression_info, string_literal_expression_info, topmost_same_kind,
    MatchOptions,
};

/// Boolean and string literals.
pub(crate) fn compute_literal(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    let Some(token) = LiteralExpression::cast(node.clone()).and_then(|literal| literal.token())
    else {
        return Ok(());
    };
    let range = token_range(&token);
    match token.kind() {
        SyntaxKind::TrueKw | SyntaxKind::FalseKw => {
            if context.is_enabled(RefactoringId::InvertBooleanLiteral) {
                let inverted = if token.kind() == SyntaxKind::TrueKw { "false" } else { "true" };
                register_replacement(context, RefactoringId::InvertBooleanLiteral, range, inverted);
            }
        }
        SyntaxKind::StringLiteral | SyntaxKind::VerbatimStringLiteral => {
            let info = string_literal_expression_info(node, MatchOptions::strict());
            if !info.success() {
                return Ok(());
            }
            if info.is_regular()
                && info.contains_escape_sequence()
                && context.is_enabled(RefactoringId::ConvertRegularStringLiteralToVerbatimStringLiteral)
            {
                let text = format!("@\"{}\"", escape_verbatim_string_text(&info.value_text()));
                register_replacement(
                    context,
                    RefactoringId::ConvertRegularStringLiteralToVerbatimStringLiteral,
                    range,
                    text,
                );
            }
            if info.is_verbatim()
                && !info.contains_linefeed()
                && context.is_enabled(RefactoringId::ConvertVerbatimStringLiteralToRegularStringLiteral)
            {
                let text = format!("\"{}\"", escape_regular_string_text(&info.value_text()));
                register_replacement(
                    context,
                    RefactoringId::ConvertVerbatimStringLiteralToRegularStringLiteral,
                    range,
                    text,
                );
            }
        }
        _ => {}
    }
    Ok(())
}

/// `$"…"` without holes becomes a plain literal.
pub(crate) fn compute_interpolated_string(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertInterpolatedStringToStringLiteral) {
        return Ok(());
    }
    let Some(token) =
        InterpolatedStringExpression::cast(node.clone()).and_then(|string| string.token())
    else {
        return Ok(());
    };
    let verbatim = token.kind() == SyntaxKind::VerbatimInterpolatedStringLiteral;
    let inner = string_literal_inner_text(token.text());
    let parts = interpolated_string_parts(inner, verbatim);
    if parts
        .iter()
        .any(|part| matches!(part, InterpolatedPart::Interpolation(_)))
    {
        return Ok(());
    }
    let unescaped = inner.replace("{{", "{").replace("}}", "}");
    let text = if verbatim {
        format!("@\"{unescaped}\"")
    } else {
        format!("\"{unescaped}\"")
    };
    register_replacement(
        context,
        RefactoringId::ConvertInterpolatedStringToStringLiteral,
        token_range(&token),
        text,
    );
    Ok(())
}

/// Joins the literal operands of a string concatenation.
///
/// Runs on the innermost `+`; the whole left-nested chain above it is considered, or
/// only the operands the selection covers.
pub(crate) fn compute_concatenation(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::JoinStringExpressions) {
        return Ok(());
    }
    let Some(binary) = BinaryExpression::cast(node.clone()) else {
        return Ok(());
    };
    if binary.operator_kind() != SyntaxKind::Plus {
        return Ok(());
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(());
    };
    let span = context.span();
    let top = topmost_same_kind(&binary);
    let info = string_concatenation_expression_info(
        &top,
        model.as_ref(),
        (!span.is_empty()).then_some(span),
    );
    let Some(range) = info.range() else {
        return Ok(());
    };
    let analysis = info.analyze();
    if analysis.literal_count() < 2 {
        return Ok(());
    }

    if analysis.all_string_literals() {
        let joined = info.to_string_literal_text()?;
        register_replacement(context, RefactoringId::JoinStringExpressions, range, joined);

        let multiline = info.to_multiline_string_literal_text()?;
        if multiline.contains('\n') {
            let action = CodeAction::edit(
                RefactoringId::JoinStringExpressions,
                "Join string expressions (multiline)",
                context.document(),
                move |_| {
                    let mut edits = EditSet::new();
                    edits.replace(range, multiline.clone());
                    Ok(edits)
                },
            )
            .with_equivalence_key(format!("{}.Multiline", RefactoringId::JoinStringExpressions.id()));
            context.register(action);
        }
    } else if context.supports_csharp6() {
        let interpolated = info.to_interpolated_string_text()?;
        register_replacement(context, RefactoringId::JoinStringExpressions, range, interpolated);
    }
    Ok(())
}

fn register_replacement(
    context: &mut RefactoringContext<'_>,
    id: RefactoringId,
    range: TextRange,
    text: impl Into<String>,
) {
    let text = text.into();
    context.register_edit(id, id.title(), move |_| {
        let mut edits = EditSet::new();
        edits.replace(range, text.clone());
        Ok(edits)
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sharp_syntax::CSharpLanguageVersion;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{
        actions, actions_with_version, check, check_action, check_not_offered,
    };

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M(string s)\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn inverts_boolean_literal() {
        check(
            RefactoringId::InvertBooleanLiteral,
            &method("        var b = /*caret*/true;\n"),
            &method("        var b = false;\n"),
        );
    }

    #[test]
    fn regular_string_with_escapes_to_verbatim() {
        check(
            RefactoringId::ConvertRegularStringLiteralToVerbatimStringLiteral,
            &method("        var p = /*caret*/\"C:\\\\dir\\\\\\\"x\\\"\";\n"),
            &method("        var p = @\"C:\\dir\\\"\"x\"\"\";\n"),
        );
    }

    #[test]
    fn plain_regular_string_is_left_alone() {
        check_not_offered(
            RefactoringId::ConvertRegularStringLiteralToVerbatimStringLiteral,
            &method("        var p = /*caret*/\"abc\";\n"),
        );
    }

    #[test]
    fn verbatim_string_to_regular() {
        check(
            RefactoringId::ConvertVerbatimStringLiteralToRegularStringLiteral,
            &method("        var p = /*caret*/@\"a\\b\"\"c\";\n"),
            &method("        var p = \"a\\\\b\\\"c\";\n"),
        );
    }

    #[test]
    fn multiline_verbatim_string_stays() {
        check_not_offered(
            RefactoringId::ConvertVerbatimStringLiteralToRegularStringLiteral,
            &method("        var p = /*caret*/@\"a\nb\";\n"),
        );
    }

    #[test]
    fn interpolated_string_without_holes() {
        check(
            RefactoringId::ConvertInterpolatedStringToStringLiteral,
            &method("        var p = /*caret*/$\"{{a}}\";\n"),
            &method("        var p = \"{a}\";\n"),
        );
        check_not_offered(
            RefactoringId::ConvertInterpolatedStringToStringLiteral,
            &method("        var p = /*caret*/$\"{s}\";\n"),
        );
    }

    #[test]
    fn joins_whole_literal_chain() {
        check(
            RefactoringId::JoinStringExpressions,
            &method("        var p = /*caret*/\"a\" + \"b\" + @\"c\";\n"),
            &method("        var p = \"abc\";\n"),
        );
    }

    #[test]
    fn joins_selected_operands_only() {
        check(
            RefactoringId::JoinStringExpressions,
            &method("        var p = s + /*start*/\"a\" + \"b\"/*end*/;\n"),
            &method("        var p = s + \"ab\";\n"),
        );
    }

    #[test]
    fn mixed_chain_becomes_interpolated_string() {
        check(
            RefactoringId::JoinStringExpressions,
            &method("        var p = /*caret*/\"a\" + s + \"b\";\n"),
            &method("        var p = $\"a{s}b\";\n"),
        );
        let offered: Vec<_> = actions_with_version(
            &method("        var p = /*caret*/\"a\" + s + \"b\";\n"),
            CSharpLanguageVersion::CSHARP_5,
        )
        .into_iter()
        .filter(|a| a.refactoring == RefactoringId::JoinStringExpressions)
        .collect();
        assert!(offered.is_empty());
    }

    #[test]
    fn multiline_variant_for_line_breaks() {
        let fixture = method("        var p = /*caret*/\"a\\n\" + \"b\";\n");
        let all = actions(&fixture);
        let keys: Vec<_> = all
            .iter()
            .filter(|a| a.refactoring == RefactoringId::JoinStringExpressions)
            .map(|a| a.equivalence_key.as_str())
            .collect();
        assert_eq!(keys, vec!["RR0078", "RR0078.Multiline"]);
        check_action(&all, RefactoringId::JoinStringExpressions, &method("        var p = \"a\\nb\";\n"));
    }

    #[test]
    fn arithmetic_is_not_joined() {
        check_not_offered(
            RefactoringId::JoinStringExpressions,
            &method("        var p = /*caret*/1 + 2;\n"),
        );
    }
}
