use sharp_syntax::{
    line_indentation, AstNode, BinaryExpression, Expression, IfStatement, Statement, SyntaxKind,
    SyntaxNode, TextRange,
};

use super::{
    are_equivalent, binary_precedence, embedded_statements, indent_following_lines,
    indentation_of, logically_invert, newline, parenthesize_below, range_of, reindent, text_of,
    INDENT,
};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{
    if_statement_cascade_info, statement_list_info, IfCascadeItem, StatementListInfo,
    StatementListSelection,
};

pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    let Some(if_statement) = IfStatement::cast(node.clone()) else {
        return Ok(());
    };
    let (Some(condition), Some(statement)) = (if_statement.condition(), if_statement.statement())
    else {
        return Ok(());
    };
    match if_statement.else_clause().and_then(|clause| clause.statement()) {
        Some(when_false) => {
            if context.is_enabled(RefactoringId::InvertIfElse)
                && when_false.kind() != SyntaxKind::IfStatement
            {
                register_invert_if_else(context, &condition, &statement, &when_false);
            }
        }
        None => {
            if context.is_enabled(RefactoringId::InvertIf) {
                compute_invert_if(context, &if_statement, &condition, &statement);
            }
        }
    }
    if context.is_enabled(RefactoringId::ConvertIfToSwitch) {
        compute_convert_to_switch(context, &if_statement)?;
    }
    Ok(())
}

fn register_invert_if_else(
    context: &mut RefactoringContext<'_>,
    condition: &Expression,
    when_true: &Statement,
    when_false: &Statement,
) {
    let edits = [
        (range_of(condition.syntax()), logically_invert(condition)),
        (range_of(when_true.syntax()), text_of(when_false.syntax())),
        (range_of(when_false.syntax()), text_of(when_true.syntax())),
    ];
    context.register_edit(
        RefactoringId::InvertIfElse,
        RefactoringId::InvertIfElse.title(),
        move |_| {
            let mut set = EditSet::new();
            for (range, text) in &edits {
                set.replace(*range, text.clone());
            }
            Ok(set)
        },
    );
}

/// `if (c) { …; return; } rest` becomes `if (!c) { rest } …`.
fn compute_invert_if(
    context: &mut RefactoringContext<'_>,
    if_statement: &IfStatement,
    condition: &Expression,
    statement: &Statement,
) {
    let mut body = embedded_statements(statement);
    let Some(jump) = body.last().cloned() else {
        return;
    };
    if !matches!(
        jump.kind(),
        SyntaxKind::BreakStatement | SyntaxKind::ContinueStatement | SyntaxKind::ReturnStatement
    ) {
        return;
    }
    let list = statement_list_info(if_statement.syntax());
    let Some(index) = Statement::cast(if_statement.syntax().clone())
        .and_then(|statement| list.index_of(&statement))
    else {
        return;
    };
    let statements = list.statements();
    let Some(last_index) = last_moved_statement(statements, index) else {
        return;
    };
    if is_redundant_jump(&jump, &list, last_index) {
        body.pop();
    }
    let use_else = !statements[last_index].kind().is_jump_statement();

    let document = context.document();
    let text = document.text();
    let nl = newline(text);
    let indent = indentation_of(document, if_statement.syntax());
    let rest = indent_following_lines(
        document.slice(TextRange {
            start: range_of(statements[index + 1].syntax()).start,
            end: range_of(statements[last_index].syntax()).end,
        }),
        INDENT,
    );
    let mut replacement = format!(
        "if ({}){nl}{indent}{{{nl}{indent}{INDENT}{rest}{nl}{indent}}}",
        logically_invert(condition)
    );
    if let (Some(first), Some(last)) = (body.first(), body.last()) {
        let start = range_of(first.syntax()).start;
        let kept = document.slice(TextRange {
            start,
            end: range_of(last.syntax()).end,
        });
        let from = line_indentation(text, start as usize);
        if use_else {
            let kept = reindent(kept, from, &format!("{indent}{INDENT}"));
            replacement.push_str(&format!(
                "{nl}{indent}else{nl}{indent}{{{nl}{indent}{INDENT}{kept}{nl}{indent}}}"
            ));
        } else {
            let kept = reindent(kept, from, &indent);
            replacement.push_str(&format!("{nl}{nl}{indent}{kept}"));
        }
    }
    let range = TextRange {
        start: range_of(if_statement.syntax()).start,
        end: range_of(statements[last_index].syntax()).end,
    };
    context.register_edit(
        RefactoringId::InvertIf,
        RefactoringId::InvertIf.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
}

/// Index of the last statement that moves into the inverted `if`. Trailing local
/// functions stay where they are.
fn last_moved_statement(statements: &[Statement], index: usize) -> Option<usize> {
    let following = statements.get(index + 1..)?;
    let moved = following
        .iter()
        .take_while(|s| s.kind() != SyntaxKind::LocalFunctionStatement)
        .count();
    if moved == 0
        || following[moved..]
            .iter()
            .any(|s| s.kind() != SyntaxKind::LocalFunctionStatement)
    {
        return None;
    }
    Some(index + moved)
}

/// A `return;` at the end of a void body, or a `continue;` at the end of a loop body.
fn is_redundant_jump(jump: &Statement, list: &StatementListInfo, last_index: usize) -> bool {
    let statements = list.statements();
    let ends_list = statements[last_index + 1..]
        .iter()
        .all(|s| s.kind() == SyntaxKind::LocalFunctionStatement);
    let Some(owner) = list
        .parent()
        .filter(|parent| parent.kind() == SyntaxKind::Block)
        .and_then(|block| block.parent())
    else {
        return false;
    };
    if !ends_list {
        return false;
    }
    match jump.kind() {
        SyntaxKind::ReturnStatement => {
            jump.syntax().children().next().is_none()
                && matches!(
                    owner.kind(),
                    SyntaxKind::MethodDeclaration
                        | SyntaxKind::LocalFunctionStatement
                        | SyntaxKind::ConstructorDeclaration
                        | SyntaxKind::DestructorDeclaration
                        | SyntaxKind::AccessorDeclaration
                        | SyntaxKind::SimpleLambdaExpression
                        | SyntaxKind::ParenthesizedLambdaExpression
                        | SyntaxKind::AnonymousMethodExpression
                )
        }
        SyntaxKind::ContinueStatement => matches!(
            owner.kind(),
            SyntaxKind::WhileStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForEachStatement
        ),
        _ => false,
    }
}

/// An if-cascade comparing one expression against constants.
fn compute_convert_to_switch(
    context: &mut RefactoringContext<'_>,
    if_statement: &IfStatement,
) -> Result<(), RefactorError> {
    let cascade = if_statement_cascade_info(if_statement);
    let Some(topmost) = cascade.topmost() else {
        return Ok(());
    };
    let mut switch_expression: Option<Expression> = None;
    let mut sections: Vec<(Vec<String>, Statement)> = Vec::new();
    for item in cascade.items() {
        let Some(statement) = item.statement() else {
            return Ok(());
        };
        if contains_escaping_break(statement.syntax()) {
            return Ok(());
        }
        match item {
            IfCascadeItem::If(branch) => {
                let Some(condition) = branch.condition() else {
                    return Ok(());
                };
                let mut labels = Vec::new();
                for operand in or_operands(&condition) {
                    let Some((left, right)) = equality_operands(&operand) else {
                        return Ok(());
                    };
                    match &switch_expression {
                        Some(existing) if !are_equivalent(existing.syntax(), left.syntax()) => {
                            return Ok(())
                        }
                        Some(_) => {}
                        None => switch_expression = Some(left),
                    }
                    labels.push(format!("case {}:", text_of(right.syntax())));
                }
                sections.push((labels, statement));
            }
            IfCascadeItem::Else(_) => sections.push((vec!["default:".to_string()], statement)),
        }
    }
    let Some(switch_expression) = switch_expression else {
        return Ok(());
    };
    if let Some(model) = context.semantic_model()? {
        if model
            .type_of(switch_expression.syntax())
            .is_some_and(|ty| ty.is_reference_type() && !ty.is_string())
        {
            return Ok(());
        }
    }

    let document = context.document();
    let text = document.text();
    let nl = newline(text);
    let indent = indentation_of(document, topmost.syntax());
    let label_indent = format!("{indent}{INDENT}");
    let body_indent = format!("{label_indent}{INDENT}");
    let mut replacement = format!(
        "switch ({}){nl}{indent}{{",
        text_of(switch_expression.syntax())
    );
    for (labels, statement) in &sections {
        for label in labels {
            replacement.push_str(&format!("{nl}{label_indent}{label}"));
        }
        replacement.push_str(nl);
        replacement.push_str(&section_body(text, statement, &body_indent, nl));
    }
    replacement.push_str(&format!("{nl}{indent}}}"));

    let range = range_of(topmost.syntax());
    context.register_edit(
        RefactoringId::ConvertIfToSwitch,
        RefactoringId::ConvertIfToSwitch.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// Statements of a switch section built from an `if` branch, ending in a jump.
fn section_body(text: &str, statement: &Statement, indent: &str, nl: &str) -> String {
    let inner = format!("{indent}{INDENT}");
    if statement.kind() != SyntaxKind::Block && statement.kind().is_jump_statement() {
        let start = range_of(statement.syntax()).start as usize;
        let from = line_indentation(text, start);
        return format!("{indent}{}", reindent(&text_of(statement.syntax()), from, indent));
    }
    let statements = embedded_statements(statement);
    let mut out = format!("{indent}{{");
    for statement in &statements {
        let start = range_of(statement.syntax()).start as usize;
        let from = line_indentation(text, start);
        out.push_str(&format!(
            "{nl}{inner}{}",
            reindent(&text_of(statement.syntax()), from, &inner)
        ));
    }
    if !statements
        .last()
        .is_some_and(|last| last.kind().is_jump_statement())
    {
        out.push_str(&format!("{nl}{inner}break;"));
    }
    out.push_str(&format!("{nl}{indent}}}"));
    out
}

fn or_operands(condition: &Expression) -> Vec<Expression> {
    let condition = condition.walk_down_parentheses();
    match BinaryExpression::cast(condition.syntax().clone()) {
        Some(binary) if binary.operator_kind() == SyntaxKind::PipePipe => {
            match (binary.left(), binary.right()) {
                (Some(left), Some(right)) => {
                    let mut operands = or_operands(&left);
                    operands.extend(or_operands(&right));
                    operands
                }
                _ => vec![condition],
            }
        }
        _ => vec![condition],
    }
}

/// `x == constant`, as (switch expression, case value).
fn equality_operands(expression: &Expression) -> Option<(Expression, Expression)> {
    let binary = BinaryExpression::cast(expression.syntax().clone())?;
    if binary.operator_kind() != SyntaxKind::EqEq {
        return None;
    }
    let left = binary.left()?.walk_down_parentheses();
    let right = binary.right()?.walk_down_parentheses();
    is_case_constant(&right).then_some((left, right))
}

/// Literals (`null` aside), negated numbers and dotted names such as enum members.
fn is_case_constant(expression: &Expression) -> bool {
    match expression.kind() {
        SyntaxKind::LiteralExpression => sharp_syntax::first_token(expression.syntax())
            .is_some_and(|token| token.kind() != SyntaxKind::NullKw),
        SyntaxKind::PrefixUnaryExpression => {
            sharp_syntax::UnaryExpression::cast(expression.syntax().clone()).is_some_and(|unary| {
                unary.operator_kind() == SyntaxKind::Minus
                    && unary
                        .operand()
                        .is_some_and(|operand| operand.kind() == SyntaxKind::LiteralExpression)
            })
        }
        SyntaxKind::MemberAccessExpression => expression
            .syntax()
            .descendants()
            .all(|node| {
                matches!(
                    node.kind(),
                    SyntaxKind::MemberAccessExpression | SyntaxKind::IdentifierName
                )
            }),
        _ => false,
    }
}

/// A `break` that would bind to the new `switch` instead of its current target.
fn contains_escaping_break(statement: &SyntaxNode) -> bool {
    statement
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::BreakStatement)
        .any(|brk| {
            for ancestor in brk.ancestors() {
                if is_break_boundary(ancestor.kind()) {
                    return false;
                }
                if &ancestor == statement {
                    break;
                }
            }
            true
        })
}

fn is_break_boundary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::WhileStatement
            | SyntaxKind::DoStatement
            | SyntaxKind::ForStatement
            | SyntaxKind::ForEachStatement
            | SyntaxKind::SwitchStatement
            | SyntaxKind::LocalFunctionStatement
            | SyntaxKind::SimpleLambdaExpression
            | SyntaxKind::ParenthesizedLambdaExpression
            | SyntaxKind::AnonymousMethodExpression
    )
}

/// Selected `if`s without `else` and with equivalent bodies merge into one `||` test.
pub(crate) fn compute_selected(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::MergeIfStatements) || selection.count() < 2 {
        return Ok(());
    }
    let mut ifs = Vec::with_capacity(selection.count());
    for statement in selection.selected() {
        let Some(if_statement) = IfStatement::cast(statement.syntax().clone()) else {
            return Ok(());
        };
        if if_statement.else_clause().is_some() {
            return Ok(());
        }
        ifs.push(if_statement);
    }
    let first = &ifs[0];
    let (Some(first_condition), Some(first_body)) = (first.condition(), first.statement()) else {
        return Ok(());
    };
    let min = binary_precedence(SyntaxKind::PipePipe);
    let mut conditions = Vec::with_capacity(ifs.len());
    for if_statement in &ifs {
        let (Some(condition), Some(body)) = (if_statement.condition(), if_statement.statement())
        else {
            return Ok(());
        };
        if !are_equivalent(body.syntax(), first_body.syntax()) {
            return Ok(());
        }
        conditions.push(parenthesize_below(&condition, min));
    }

    let first_range = range_of(first.syntax());
    let condition_range = range_of(first_condition.syntax());
    let first_text = text_of(first.syntax());
    let start = (condition_range.start - first_range.start) as usize;
    let end = (condition_range.end - first_range.start) as usize;
    let merged = format!(
        "{}{}{}",
        &first_text[..start],
        conditions.join(" || "),
        &first_text[end..]
    );
    let range = selection.range();
    context.register_edit(
        RefactoringId::MergeIfStatements,
        RefactoringId::MergeIfStatements.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, merged.clone());
            Ok(edits)
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered, titles};

    fn method(signature: &str, body: &str) -> String {
        format!("class C\n{{\n    {signature}\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn inverts_if_else() {
        check(
            RefactoringId::InvertIfElse,
            &method(
                "void M(int a)",
                "        /*caret*/if (a > 0)\n        {\n            F();\n        }\n        else\n        {\n            G();\n        }\n",
            ),
            &method(
                "void M(int a)",
                "        if (a <= 0)\n        {\n            G();\n        }\n        else\n        {\n            F();\n        }\n",
            ),
        );
    }

    #[test]
    fn else_if_chains_are_not_inverted() {
        check_not_offered(
            RefactoringId::InvertIfElse,
            &method(
                "void M(int a)",
                "        /*caret*/if (a > 0)\n            F();\n        else if (a < 0)\n            G();\n",
            ),
        );
    }

    #[test]
    fn invert_if_drops_trailing_return() {
        check(
            RefactoringId::InvertIf,
            &method(
                "void M(bool a)",
                "        /*caret*/if (a)\n        {\n            return;\n        }\n\n        F();\n        G();\n",
            ),
            &method(
                "void M(bool a)",
                "        if (!a)\n        {\n            F();\n            G();\n        }\n",
            ),
        );
    }

    #[test]
    fn invert_if_moves_body_after() {
        check(
            RefactoringId::InvertIf,
            &method(
                "int M(bool a)",
                "        /*caret*/if (a)\n        {\n            return 1;\n        }\n\n        F();\n        return 2;\n",
            ),
            &method(
                "int M(bool a)",
                "        if (!a)\n        {\n            F();\n            return 2;\n        }\n\n        return 1;\n",
            ),
        );
    }

    #[test]
    fn invert_if_in_loop_drops_continue() {
        check(
            RefactoringId::InvertIf,
            &method(
                "void M(string[] xs)",
                "        foreach (var x in xs)\n        {\n            /*caret*/if (x == null)\n            {\n                continue;\n            }\n\n            F(x);\n        }\n",
            ),
            &method(
                "void M(string[] xs)",
                "        foreach (var x in xs)\n        {\n            if (x != null)\n            {\n                F(x);\n            }\n        }\n",
            ),
        );
    }

    #[test]
    fn invert_if_needs_jump() {
        check_not_offered(
            RefactoringId::InvertIf,
            &method(
                "void M(bool a)",
                "        /*caret*/if (a)\n        {\n            F();\n        }\n\n        G();\n",
            ),
        );
    }

    #[test]
    fn converts_cascade_to_switch() {
        check(
            RefactoringId::ConvertIfToSwitch,
            &method(
                "void M(int x)",
                "        /*caret*/if (x == 1)\n        {\n            F();\n        }\n        else if (x == 2 || x == 3)\n        {\n            return;\n        }\n        else\n        {\n            G();\n        }\n",
            ),
            &method(
                "void M(int x)",
                "        switch (x)\n        {\n            case 1:\n                {\n                    F();\n                    break;\n                }\n            case 2:\n            case 3:\n                {\n                    return;\n                }\n            default:\n                {\n                    G();\n                    break;\n                }\n        }\n",
            ),
        );
    }

    #[test]
    fn switch_needs_one_subject() {
        check_not_offered(
            RefactoringId::ConvertIfToSwitch,
            &method(
                "void M(int x, int y)",
                "        /*caret*/if (x == 1)\n            F();\n        else if (y == 2)\n            G();\n",
            ),
        );
    }

    #[test]
    fn loop_break_blocks_switch() {
        check_not_offered(
            RefactoringId::ConvertIfToSwitch,
            &method(
                "void M(int x)",
                "        while (true)\n        {\n            /*caret*/if (x == 1)\n                break;\n        }\n",
            ),
        );
    }

    #[test]
    fn merges_selected_ifs() {
        check(
            RefactoringId::MergeIfStatements,
            &method(
                "void M(bool a, bool b, bool c)",
                "        /*start*/if (a)\n        {\n            return;\n        }\n\n        if (b)\n        {\n            return;\n        }\n\n        if (c)\n        {\n            return;\n        }/*end*/\n\n        M(a, b, c);\n",
            ),
            &method(
                "void M(bool a, bool b, bool c)",
                "        if (a || b || c)\n        {\n            return;\n        }\n\n        M(a, b, c);\n",
            ),
        );
        assert_eq!(
            titles(
                RefactoringId::MergeIfStatements,
                &method(
                    "void M(bool a, bool b)",
                    "        /*start*/if (a) return;\n        if (b) return;/*end*/\n",
                ),
            ),
            vec!["Merge if statements"]
        );
    }

    #[test]
    fn merge_parenthesizes_looser_conditions() {
        check(
            RefactoringId::MergeIfStatements,
            &method(
                "void M(bool? a, bool b)",
                "        /*start*/if (a ?? b) return;\n        if (b) return;/*end*/\n",
            ),
            &method(
                "void M(bool? a, bool b)",
                "        if ((a ?? b) || b) return;\n",
            ),
        );
    }

    #[test]
    fn merge_requires_same_bodies() {
        check_not_offered(
            RefactoringId::MergeIfStatements,
            &method(
                "void M(bool a, bool b)",
                "        /*start*/if (a) return;\n        if (b) F();/*end*/\n",
            ),
        );
    }
}
