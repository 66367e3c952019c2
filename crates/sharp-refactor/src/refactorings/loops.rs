use sharp_syntax::{
    first_token, AstNode, DoStatement, Expression, ExpressionStatement, LocalDeclarationStatement,
    Statement, SyntaxKind, SyntaxNode, TextRange, UnaryExpression, WhileStatement,
};

use super::{
    indent_following_lines, indentation_of, logically_invert, mentions_identifier, newline,
    range_of, text_of, token_after, token_range, INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::StatementListSelection;

/// `while` keyword: convert to `do` or `for`.
pub(crate) fn compute_while(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    let Some(while_statement) = WhileStatement::cast(node.clone()) else {
        return Ok(());
    };
    if !on_keyword(context, node) {
        return Ok(());
    }
    let (Some(condition), Some(body)) = (while_statement.condition(), while_statement.statement())
    else {
        return Ok(());
    };
    let Some(header_end) = token_after(condition.syntax()).map(|paren| token_range(&paren).end)
    else {
        return Ok(());
    };

    if context.is_enabled(RefactoringId::ConvertWhileToDo) {
        let document = context.document();
        let nl = newline(document.text());
        let indent = indentation_of(document, node);
        let range = range_of(node);
        let condition_text = text_of(condition.syntax());
        let rest = document.slice(TextRange {
            start: header_end,
            end: range_of(body.syntax()).end,
        });
        let do_loop = format!("do{rest}{nl}{indent}while ({condition_text});");
        let replacement = if is_true_literal(&condition) {
            do_loop
        } else {
            format!(
                "if ({condition_text}){nl}{indent}{{{nl}{indent}{INDENT}{}{nl}{indent}}}",
                indent_following_lines(&do_loop, INDENT)
            )
        };
        register(context, RefactoringId::ConvertWhileToDo, range, replacement);
    }

    if context.is_enabled(RefactoringId::ConvertWhileToFor) {
        let range = TextRange {
            start: range_of(node).start,
            end: header_end,
        };
        let header = for_header("", &condition);
        register(context, RefactoringId::ConvertWhileToFor, range, header);
    }
    Ok(())
}

/// `do` keyword: convert to `while`.
///
/// `do { … } while (true);` maps directly. Any other condition moves to a trailing
/// `if (!c) { break; }` inside a `while (true)` body, so the body still runs first.
pub(crate) fn compute_do(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertDoToWhile) {
        return Ok(());
    }
    let Some(do_statement) = DoStatement::cast(node.clone()) else {
        return Ok(());
    };
    if !on_keyword(context, node) {
        return Ok(());
    }
    let (Some(body), Some(condition)) = (do_statement.statement(), do_statement.condition()) else {
        return Ok(());
    };
    let Some(keyword) = first_token(node) else {
        return Ok(());
    };
    let document = context.document();
    let body_range = range_of(body.syntax());
    let between = document.slice(TextRange {
        start: token_range(&keyword).end,
        end: body_range.start,
    });

    let replacement = if is_true_literal(&condition) {
        format!("while (true){between}{}", text_of(body.syntax()))
    } else {
        if body.kind() != SyntaxKind::Block || contains_continue(body.syntax()) {
            return Ok(());
        }
        let Some(close_brace) = sharp_syntax::Block::cast(body.syntax().clone())
            .and_then(|block| block.close_brace())
        else {
            return Ok(());
        };
        let nl = newline(document.text());
        let brace_indent = indentation_of(document, body.syntax());
        let inner = format!("{brace_indent}{INDENT}");
        let before_close = document
            .slice(TextRange {
                start: body_range.start,
                end: token_range(&close_brace).start,
            })
            .trim_end();
        let has_statements = body.syntax().children().next().is_some();
        let gap = if has_statements { format!("{nl}{nl}") } else { nl.to_string() };
        format!(
            "while (true){between}{before_close}{gap}{inner}if ({}){nl}{inner}{{{nl}{inner}{INDENT}break;{nl}{inner}}}{nl}{brace_indent}}}",
            logically_invert(&condition)
        )
    };
    register(context, RefactoringId::ConvertDoToWhile, range_of(node), replacement);
    Ok(())
}

/// Selected statements ending in a `while`: the preceding locals or expression
/// statements become the `for` initializer.
pub(crate) fn compute_selected(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ConvertWhileToFor) {
        return Ok(());
    }
    let Some(while_statement) = WhileStatement::cast(selection.last().syntax().clone()) else {
        return Ok(());
    };
    let Some(condition) = while_statement.condition() else {
        return Ok(());
    };
    let Some(header_end) = token_after(condition.syntax()).map(|paren| token_range(&paren).end)
    else {
        return Ok(());
    };
    let preceding = &selection.selected()[..selection.count() - 1];
    let following = &selection.items()[selection.last_index() + 1..];

    let initializer = match preceding.first().map(Statement::kind) {
        None => String::new(),
        Some(SyntaxKind::LocalDeclarationStatement) => {
            match local_initializer(preceding, following) {
                Some(text) => text,
                None => return Ok(()),
            }
        }
        Some(SyntaxKind::ExpressionStatement) => match expression_initializer(preceding) {
            Some(text) => text,
            None => return Ok(()),
        },
        Some(_) => return Ok(()),
    };

    let range = TextRange {
        start: selection.range().start,
        end: header_end,
    };
    let header = for_header(&initializer, &condition);
    register(context, RefactoringId::ConvertWhileToFor, range, header);
    Ok(())
}

/// `T a = 1, b = 2` from consecutive declarations of one type, none used after the loop.
fn local_initializer(preceding: &[Statement], following: &[Statement]) -> Option<String> {
    let mut ty: Option<String> = None;
    let mut declarators = Vec::new();
    for statement in preceding {
        let local = LocalDeclarationStatement::cast(statement.syntax().clone())?;
        if local.is_const() || local.using_keyword().is_some() {
            return None;
        }
        let declaration = local.declaration()?;
        let text = text_of(declaration.ty()?.syntax());
        match &ty {
            Some(existing) if *existing != text => return None,
            Some(_) => {}
            None => ty = Some(text),
        }
        for declarator in declaration.declarators() {
            let name = declarator.identifier()?;
            if following
                .iter()
                .any(|s| mentions_identifier(s.syntax(), name.text()))
            {
                return None;
            }
            declarators.push(text_of(declarator.syntax()));
        }
    }
    let ty = ty?;
    // An implicitly typed declaration declares a single variable.
    if ty == "var" && declarators.len() > 1 {
        return None;
    }
    Some(format!("{ty} {}", declarators.join(", ")))
}

/// Expressions that may appear in a `for` initializer, comma-separated.
fn expression_initializer(preceding: &[Statement]) -> Option<String> {
    let mut expressions = Vec::with_capacity(preceding.len());
    for statement in preceding {
        let expression = ExpressionStatement::cast(statement.syntax().clone())?.expression()?;
        if !can_initialize_for(&expression) {
            return None;
        }
        expressions.push(text_of(expression.syntax()));
    }
    Some(expressions.join(", "))
}

fn can_initialize_for(expression: &Expression) -> bool {
    match expression.kind() {
        SyntaxKind::AssignmentExpression
        | SyntaxKind::InvocationExpression
        | SyntaxKind::ObjectCreationExpression
        | SyntaxKind::AwaitExpression => true,
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression => {
            UnaryExpression::cast(expression.syntax().clone()).is_some_and(|unary| {
                matches!(
                    unary.operator_kind(),
                    SyntaxKind::PlusPlus | SyntaxKind::MinusMinus
                )
            })
        }
        _ => false,
    }
}

fn for_header(initializer: &str, condition: &Expression) -> String {
    if is_true_literal(condition) {
        format!("for ({initializer};;)")
    } else {
        format!("for ({initializer}; {};)", text_of(condition.syntax()))
    }
}

fn is_true_literal(expression: &Expression) -> bool {
    expression.kind() == SyntaxKind::LiteralExpression
        && first_token(expression.syntax()).is_some_and(|t| t.kind() == SyntaxKind::TrueKw)
}

fn on_keyword(context: &RefactoringContext<'_>, node: &SyntaxNode) -> bool {
    let span = context.span();
    first_token(node).is_some_and(|keyword| token_range(&keyword).contains_range(span))
}

/// A `continue` that targets the loop owning `body`.
fn contains_continue(body: &SyntaxNode) -> bool {
    body.descendants()
        .filter(|node| node.kind() == SyntaxKind::ContinueStatement)
        .any(|continue_statement| {
            !continue_statement
                .ancestors()
                .take_while(|ancestor| ancestor != body)
                .any(|ancestor| {
                    matches!(
                        ancestor.kind(),
                        SyntaxKind::WhileStatement
                            | SyntaxKind::DoStatement
                            | SyntaxKind::ForStatement
                            | SyntaxKind::ForEachStatement
                            | SyntaxKind::LocalFunctionStatement
                            | SyntaxKind::SimpleLambdaExpression
                            | SyntaxKind::ParenthesizedLambdaExpression
                            | SyntaxKind::AnonymousMethodExpression
                    )
                })
        })
}

fn register(
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

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M(int n)\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn while_to_do_keeps_entry_check() {
        check(
            RefactoringId::ConvertWhileToDo,
            &method("        /*caret*/while (n > 0)\n        {\n            n--;\n        }\n"),
            &method(
                "        if (n > 0)\n        {\n            do\n            {\n                n--;\n            }\n            while (n > 0);\n        }\n",
            ),
        );
    }

    #[test]
    fn infinite_while_to_do() {
        check(
            RefactoringId::ConvertWhileToDo,
            &method("        /*caret*/while (true)\n        {\n            F();\n        }\n"),
            &method("        do\n        {\n            F();\n        }\n        while (true);\n"),
        );
    }

    #[test]
    fn while_to_for() {
        check(
            RefactoringId::ConvertWhileToFor,
            &method("        /*caret*/while (n > 0)\n        {\n            n--;\n        }\n"),
            &method("        for (; n > 0;)\n        {\n            n--;\n        }\n"),
        );
        check(
            RefactoringId::ConvertWhileToFor,
            &method("        /*caret*/while (true)\n        {\n            F();\n        }\n"),
            &method("        for (;;)\n        {\n            F();\n        }\n"),
        );
    }

    #[test]
    fn body_caret_is_not_the_keyword() {
        check_not_offered(
            RefactoringId::ConvertWhileToDo,
            &method("        while (n > 0)\n        {\n            /*caret*/n--;\n        }\n"),
        );
    }

    #[test]
    fn selected_locals_move_into_for() {
        check(
            RefactoringId::ConvertWhileToFor,
            &method(
                "        /*start*/int i = 0;\n        int j = n;\n        while (i < j)\n        {\n            i++;\n        }/*end*/\n",
            ),
            &method("        for (int i = 0, j = n; i < j;)\n        {\n            i++;\n        }\n"),
        );
    }

    #[test]
    fn locals_used_after_loop_stay() {
        check_not_offered(
            RefactoringId::ConvertWhileToFor,
            &method(
                "        /*start*/int i = 0;\n        while (i < n)\n        {\n            i++;\n        }/*end*/\n        F(i);\n",
            ),
        );
    }

    #[test]
    fn selected_expression_statements_move_into_for() {
        check(
            RefactoringId::ConvertWhileToFor,
            &method(
                "        /*start*/n = 10;\n        while (n > 0)\n        {\n            n--;\n        }/*end*/\n",
            ),
            &method("        for (n = 10; n > 0;)\n        {\n            n--;\n        }\n"),
        );
    }

    #[test]
    fn do_to_while_checks_condition_last() {
        check(
            RefactoringId::ConvertDoToWhile,
            &method("        /*caret*/do\n        {\n            n--;\n        }\n        while (n > 0);\n"),
            &method(
                "        while (true)\n        {\n            n--;\n\n            if (n <= 0)\n            {\n                break;\n            }\n        }\n",
            ),
        );
    }

    #[test]
    fn do_with_continue_is_not_converted() {
        check_not_offered(
            RefactoringId::ConvertDoToWhile,
            &method(
                "        /*caret*/do\n        {\n            if (n == 2) continue;\n            n--;\n        }\n        while (n > 0);\n",
            ),
        );
    }
}
