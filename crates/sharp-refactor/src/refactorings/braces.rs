use sharp_syntax::{
    line_indentation, prev_token, AstNode, Block, IfStatement, Statement, SwitchSection, SyntaxKind, SyntaxNode,
    TextRange,
};

use super::{
    dedent_following_lines, indent_following_lines, indentation_of, newline,
    range_of, text_of, token_after, token_range, INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;

/// Add or remove braces around the innermost embedded statement.
pub(crate) fn compute_embedded_statement(
    context: &mut RefactoringContext<'_>,
    statement: &Statement,
) -> Result<(), RefactorError> {
    let Some(owner) = statement.syntax().parent() else {
        return Ok(());
    };
    if statement.kind() == SyntaxKind::Block {
        if context.is_enabled(RefactoringId::RemoveBraces) {
            compute_remove_braces(context, statement, &owner);
        }
        return Ok(());
    }
    if !context.is_enabled(RefactoringId::AddBraces)
        || (statement.kind() == SyntaxKind::IfStatement && owner.kind() == SyntaxKind::ElseClause)
    {
        return Ok(());
    }
    let Some(previous) = sharp_syntax::first_token(statement.syntax()).and_then(|t| prev_token(&t))
    else {
        return Ok(());
    };
    let text = context.document().text();
    let range = TextRange {
        start: token_range(&previous).end,
        end: range_of(statement.syntax()).end,
    };
    let owner_indent = indentation_of(context.document(), &owner);
    let statement_indent = indentation_of(context.document(), statement.syntax());
    let body = if statement_indent == owner_indent {
        indent_following_lines(&text_of(statement.syntax()), INDENT)
    } else {
        text_of(statement.syntax())
    };
    let nl = newline(text);
    let replacement =
        format!("{nl}{owner_indent}{{{nl}{owner_indent}{INDENT}{body}{nl}{owner_indent}}}");
    context.register_edit(
        RefactoringId::AddBraces,
        RefactoringId::AddBraces.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

fn compute_remove_braces(context: &mut RefactoringContext<'_>, statement: &Statement, owner: &SyntaxNode) {
    let Some(block) = Block::cast(statement.syntax().clone()) else {
        return;
    };
    let mut statements = block.statements();
    let (Some(inner), None) = (statements.next(), statements.next()) else {
        return;
    };
    if matches!(
        inner.kind(),
        SyntaxKind::LocalDeclarationStatement
            | SyntaxKind::LabeledStatement
            | SyntaxKind::LocalFunctionStatement
    ) {
        return;
    }
    let has_comments = block
        .syntax()
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| t.kind().is_comment() || t.kind().is_directive());
    if has_comments {
        return;
    }
    // `if (a) { if (b) x(); } else y();` would rebind the else.
    if inner.kind() == SyntaxKind::IfStatement
        && IfStatement::cast(owner.clone()).is_some_and(|owner| owner.else_clause().is_some())
    {
        return;
    }
    let Some(previous) = block.open_brace().and_then(|brace| prev_token(&brace)) else {
        return;
    };

    let document = context.document();
    let text = document.text();
    let nl = newline(text);
    let owner_indent = indentation_of(document, owner);
    let mut range = TextRange {
        start: token_range(&previous).end,
        end: range_of(block.syntax()).end,
    };
    let mut suffix = String::new();
    if let Some(next) = token_after(block.syntax())
        .filter(|t| matches!(t.kind(), SyntaxKind::ElseKw | SyntaxKind::WhileKw))
    {
        let next_range = token_range(&next);
        if !text[range.end_usize()..next_range.start_usize()].contains('\n') {
            range.end = next_range.start;
            suffix = format!("{nl}{owner_indent}");
        }
    }
    let inner_indent = line_indentation(text, range_of(inner.syntax()).start_usize());
    let body = if inner_indent.len() > owner_indent.len() {
        text_of(inner.syntax())
    } else {
        indent_following_lines(&text_of(inner.syntax()), INDENT)
    };
    let replacement = format!("{nl}{owner_indent}{INDENT}{body}{suffix}");
    context.register_edit(
        RefactoringId::RemoveBraces,
        RefactoringId::RemoveBraces.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
}

/// Switch sections: wrap the statements in a block, or unwrap a sole block.
pub(crate) fn compute_switch_section(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    let Some(section) = SwitchSection::cast(node.clone()) else {
        return Ok(());
    };
    let statements: Vec<Statement> = section.statements().collect();
    let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
        return Ok(());
    };
    let document = context.document();
    let text = document.text();
    let nl = newline(text);

    let sole_block = match statements.as_slice() {
        [only] => Block::cast(only.syntax().clone()),
        _ => None,
    };
    match sole_block {
        None => {
            if !context.is_enabled(RefactoringId::AddBracesToSwitchSection) {
                return Ok(());
            }
            let range = TextRange {
                start: range_of(first.syntax()).start,
                end: range_of(last.syntax()).end,
            };
            let indent = indentation_of(document, first.syntax());
            let body = indent_following_lines(document.slice(range), INDENT);
            let replacement = format!("{{{nl}{indent}{INDENT}{body}{nl}{indent}}}");
            context.register_edit(
                RefactoringId::AddBracesToSwitchSection,
                RefactoringId::AddBracesToSwitchSection.title(),
                move |_| {
                    let mut edits = EditSet::new();
                    edits.replace(range, replacement.clone());
                    Ok(edits)
                },
            );
        }
        Some(block) => {
            if !context.is_enabled(RefactoringId::RemoveBracesFromSwitchSection)
                || !can_unwrap_section_block(&block)
            {
                return Ok(());
            }
            let inner: Vec<Statement> = block.statements().collect();
            let (Some(inner_first), Some(inner_last)) = (inner.first(), inner.last()) else {
                return Ok(());
            };
            let range = range_of(block.syntax());
            let body = dedent_following_lines(
                document.slice(TextRange {
                    start: range_of(inner_first.syntax()).start,
                    end: range_of(inner_last.syntax()).end,
                }),
                INDENT,
            );
            context.register_edit(
                RefactoringId::RemoveBracesFromSwitchSection,
                RefactoringId::RemoveBracesFromSwitchSection.title(),
                move |_| {
                    let mut edits = EditSet::new();
                    edits.replace(range, body.clone());
                    Ok(edits)
                },
            );
        }
    }
    Ok(())
}

/// A block may replace the section's statement list only when it declares nothing that
/// would leak into the switch scope.
fn can_unwrap_section_block(block: &Block) -> bool {
    let mut statements = block.statements().peekable();
    statements.peek().is_some()
        && statements.all(|statement| {
            !matches!(
                statement.kind(),
                SyntaxKind::LocalDeclarationStatement | SyntaxKind::LocalFunctionStatement
            )
        })
}
