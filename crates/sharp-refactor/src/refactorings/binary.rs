use sharp_syntax::{
    support, AstNode, BinaryExpression, Block, Expression, IfStatement, SyntaxKind, SyntaxNode,
    TextRange, WhileStatement,
};

use super::{
    indent_following_lines, indentation_of, logically_invert, newline, range_of, text_of,
    token_range, INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{binary_expression_info, MatchOptions};

/// Swap operands of the innermost binary expression.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::SwapBinaryOperands) {
        return Ok(());
    }
    let Some(binary) = BinaryExpression::cast(node.clone()) else {
        return Ok(());
    };
    let (Some(left), Some(operator), Some(right)) =
        (binary.left(), binary.operator(), binary.right())
    else {
        return Ok(());
    };
    let Some(swapped) = swapped_operator(binary.operator_kind()) else {
        return Ok(());
    };
    if matches!(binary.operator_kind(), SyntaxKind::Plus | SyntaxKind::Star)
        && !has_numeric_operands(context, &left, &right)?
    {
        return Ok(());
    }

    let text = context.document().text();
    let left_range = range_of(left.syntax());
    let right_range = range_of(right.syntax());
    let operator_range = token_range(&operator);
    let replacement = format!(
        "{}{}{swapped}{}{}",
        &text[right_range.start_usize()..right_range.end_usize()],
        &text[left_range.end_usize()..operator_range.start_usize()],
        &text[operator_range.end_usize()..right_range.start_usize()],
        &text[left_range.start_usize()..left_range.end_usize()],
    );
    let range = TextRange {
        start: left_range.start,
        end: right_range.end,
    };
    context.register_edit(
        RefactoringId::SwapBinaryOperands,
        RefactoringId::SwapBinaryOperands.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// Operator text after swapping, for operators where a swap keeps the meaning.
fn swapped_operator(kind: SyntaxKind) -> Option<&'static str> {
    Some(match kind {
        SyntaxKind::AmpAmp => "&&",
        SyntaxKind::PipePipe => "||",
        SyntaxKind::Amp => "&",
        SyntaxKind::Pipe => "|",
        SyntaxKind::Caret => "^",
        SyntaxKind::EqEq => "==",
        SyntaxKind::BangEq => "!=",
        SyntaxKind::Plus => "+",
        SyntaxKind::Star => "*",
        SyntaxKind::Less => ">",
        SyntaxKind::LessEq => ">=",
        SyntaxKind::Greater => "<",
        SyntaxKind::GreaterEq => "<=",
        _ => return None,
    })
}

/// `+` concatenates strings and both operators may be user-defined; only numbers commute.
fn has_numeric_operands(
    context: &RefactoringContext<'_>,
    left: &Expression,
    right: &Expression,
) -> Result<bool, RefactorError> {
    let Some(model) = context.semantic_model()? else {
        return Ok(false);
    };
    let numeric = |e: &Expression| model.type_of(e.syntax()).is_some_and(|ty| ty.is_numeric());
    Ok(numeric(left) && numeric(right))
}

/// Extract a selected tail of an `&&` / `||` condition of an `if` or `while`.
pub(crate) fn compute_condition_owner(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ExtractExpressionFromCondition) {
        return Ok(());
    }
    let (condition, body) = match node.kind() {
        SyntaxKind::IfStatement => {
            let Some(statement) = IfStatement::cast(node.clone()) else {
                return Ok(());
            };
            if statement.else_clause().is_some() {
                return Ok(());
            }
            (statement.condition(), statement.statement())
        }
        SyntaxKind::WhileStatement => {
            let Some(statement) = WhileStatement::cast(node.clone()) else {
                return Ok(());
            };
            (statement.condition(), statement.statement())
        }
        _ => return Ok(()),
    };
    let (Some(condition), Some(body)) = (condition, body) else {
        return Ok(());
    };
    let Some(body) = Block::cast(body.syntax().clone()) else {
        return Ok(());
    };
    let info = binary_expression_info(condition.syntax(), MatchOptions::default());
    let Some(kind) = info
        .kind()
        .filter(|kind| matches!(kind, SyntaxKind::AmpAmp | SyntaxKind::PipePipe))
    else {
        return Ok(());
    };
    let Some(binary) = info.binary() else {
        return Ok(());
    };
    let operands = info.expressions(true);
    let Some(split) = selected_tail(context.document().text(), context.span(), &operands) else {
        return Ok(());
    };

    let text = context.document().text();
    let condition_range = range_of(binary.syntax());
    let kept = TextRange {
        start: condition_range.start,
        end: range_of(operands[split - 1].syntax()).end,
    };
    let extracted = TextRange {
        start: range_of(operands[split].syntax()).start,
        end: condition_range.end,
    };
    let kept_text = text[kept.start_usize()..kept.end_usize()].to_string();
    let extracted_text = text[extracted.start_usize()..extracted.end_usize()].to_string();

    match (node.kind(), kind) {
        (SyntaxKind::IfStatement, SyntaxKind::AmpAmp) => {
            let statements: Vec<_> = body.statements().collect();
            let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
                return Ok(());
            };
            let body_range = TextRange {
                start: range_of(first.syntax()).start,
                end: range_of(last.syntax()).end,
            };
            let indent = indentation_of(context.document(), first.syntax());
            let nl = newline(text);
            let inner = indent_following_lines(context.document().slice(body_range), INDENT);
            let nested = format!(
                "if ({extracted_text}){nl}{indent}{{{nl}{indent}{INDENT}{inner}{nl}{indent}}}"
            );
            register_extract(context, move |edits| {
                edits.replace(condition_range, kept_text.clone());
                edits.replace(body_range, nested.clone());
            });
        }
        (SyntaxKind::IfStatement, _) => {
            // The second `if` repeats the body, so it needs a statement list to live in.
            if node.parent().map(|p| p.kind()) != Some(SyntaxKind::Block) {
                return Ok(());
            }
            let Some(close_paren) = support::token(node, SyntaxKind::CloseParen) else {
                return Ok(());
            };
            let statement_range = range_of(node);
            let tail = &text[token_range(&close_paren).end_usize()..statement_range.end_usize()];
            let indent = indentation_of(context.document(), node);
            let sibling = format!("{}{indent}if ({extracted_text}){tail}", newline(text));
            register_extract(context, move |edits| {
                edits.replace(condition_range, kept_text.clone());
                edits.insert(statement_range.end, sibling.clone());
            });
        }
        (_, SyntaxKind::AmpAmp) => {
            let Some(open_brace) = body.open_brace() else {
                return Ok(());
            };
            let Some(inverted) = inverted_tail(&operands[split..]) else {
                return Ok(());
            };
            let nl = newline(text);
            let guard = match body.statements().next() {
                Some(first) => {
                    let indent = indentation_of(context.document(), first.syntax());
                    (
                        range_of(first.syntax()).start,
                        format!(
                            "if ({inverted}){nl}{indent}{{{nl}{indent}{INDENT}break;{nl}{indent}}}{nl}{nl}{indent}"
                        ),
                    )
                }
                None => {
                    let indent = format!("{}{INDENT}", indentation_of(context.document(), node));
                    (
                        token_range(&open_brace).end,
                        format!(
                            "{nl}{indent}if ({inverted}){nl}{indent}{{{nl}{indent}{INDENT}break;{nl}{indent}}}"
                        ),
                    )
                }
            };
            register_extract(context, move |edits| {
                edits.replace(condition_range, kept_text.clone());
                edits.insert(guard.0, guard.1.clone());
            });
        }
        _ => {}
    }
    Ok(())
}

/// Index of the first selected operand when the span covers exactly a tail of the chain
/// (never the whole chain).
fn selected_tail(text: &str, span: TextRange, operands: &[Expression]) -> Option<usize> {
    if span.is_empty() || operands.len() < 2 {
        return None;
    }
    let selected = &text[span.start_usize()..span.end_usize()];
    let start = span.start_usize() + (selected.len() - selected.trim_start().len());
    let end = span.end_usize() - (selected.len() - selected.trim_end().len());
    let last = operands.last()?;
    if range_of(last.syntax()).end_usize() != end {
        return None;
    }
    operands
        .iter()
        .position(|operand| range_of(operand.syntax()).start_usize() == start)
        .filter(|index| *index > 0)
}

/// Negation of the extracted `&&` tail, as text.
fn inverted_tail(operands: &[Expression]) -> Option<String> {
    match operands {
        [] => None,
        [single] => Some(logically_invert(single)),
        _ => {
            let joined = operands
                .iter()
                .map(|operand| text_of(operand.syntax()))
                .collect::<Vec<_>>()
                .join(" && ");
            Some(format!("!({joined})"))
        }
    }
}

fn register_extract(
    context: &mut RefactoringContext<'_>,
    build: impl Fn(&mut EditSet) + 'static,
) {
    context.register_edit(
        RefactoringId::ExtractExpressionFromCondition,
        RefactoringId::ExtractExpressionFromCondition.title(),
        move |_| {
            let mut edits = EditSet::new();
            build(&mut edits);
            Ok(edits)
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M()\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn swaps_equality_operands() {
        check(
            RefactoringId::SwapBinaryOperands,
            "class C { bool M() => a /*caret*/== b.C; }",
            "class C { bool M() => b.C == a; }",
        );
    }

    #[test]
    fn swaps_comparison_and_flips_it() {
        check(
            RefactoringId::SwapBinaryOperands,
            "class C { bool M() => a /*caret*/<= b; }",
            "class C { bool M() => b >= a; }",
        );
    }

    #[test]
    fn string_concatenation_is_not_swapped() {
        check_not_offered(
            RefactoringId::SwapBinaryOperands,
            "class C { string M(string a) => a /*caret*/+ \"x\"; }",
        );
    }

    #[test]
    fn numeric_addition_is_swapped() {
        check(
            RefactoringId::SwapBinaryOperands,
            "class C { int M(int a) => a /*caret*/+ 1; }",
            "class C { int M(int a) => 1 + a; }",
        );
    }

    #[test]
    fn extracts_and_operand_into_nested_if() {
        check(
            RefactoringId::ExtractExpressionFromCondition,
            &method("        if (a && /*start*/b/*end*/)\n        {\n            F();\n        }\n"),
            &method(
                "        if (a)\n        {\n            if (b)\n            {\n                F();\n            }\n        }\n",
            ),
        );
    }

    #[test]
    fn extracts_or_operand_into_sibling_if() {
        check(
            RefactoringId::ExtractExpressionFromCondition,
            &method(
                "        if (a || /*start*/b || c/*end*/)\n        {\n            F();\n        }\n",
            ),
            &method(
                "        if (a)\n        {\n            F();\n        }\n        if (b || c)\n        {\n            F();\n        }\n",
            ),
        );
    }

    #[test]
    fn or_extraction_needs_a_statement_list() {
        check_not_offered(
            RefactoringId::ExtractExpressionFromCondition,
            &method(
                "        while (x)\n            if (a || /*start*/b/*end*/)\n            {\n                F();\n            }\n",
            ),
        );
    }

    #[test]
    fn extracts_from_while_condition_into_break() {
        check(
            RefactoringId::ExtractExpressionFromCondition,
            &method(
                "        while (a && /*start*/b/*end*/)\n        {\n            F();\n        }\n",
            ),
            &method(
                "        while (a)\n        {\n            if (!b)\n            {\n                break;\n            }\n\n            F();\n        }\n",
            ),
        );
    }

    #[test]
    fn whole_condition_is_not_extracted() {
        check_not_offered(
            RefactoringId::ExtractExpressionFromCondition,
            &method("        if (/*start*/a && b/*end*/)\n        {\n            F();\n        }\n"),
        );
    }

    #[test]
    fn else_blocks_extraction() {
        check_not_offered(
            RefactoringId::ExtractExpressionFromCondition,
            &method(
                "        if (a && /*start*/b/*end*/)\n        {\n            F();\n        }\n        else\n        {\n            G();\n        }\n",
            ),
        );
    }
}
