use sharp_syntax::{
    AssignmentExpression, AstNode, Expression, InitializerExpression,
    MemberAccessExpression, ObjectCreationExpression, Statement, SyntaxKind, SyntaxNode, TextRange,
};

use super::{indentation_of, mentions_identifier, newline, range_of, text_of, INDENT};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{
    simple_assignment_statement_info, single_local_declaration_statement_info,
    statement_list_info, MatchOptions, StatementListSelection,
};

/// `var p = new T { A = 1, 2 };` becomes `var p = new T();` followed by one statement per
/// element: `p.A = 1;` for member assignments and `p.Add(2);` otherwise.
pub(crate) fn compute_initializer(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::ExpandInitializer) {
        return Ok(());
    }
    let Some(initializer) = InitializerExpression::cast(node.clone()) else {
        return Ok(());
    };
    let Some(creation) = node.parent().and_then(ObjectCreationExpression::cast) else {
        return Ok(());
    };
    let elements: Vec<Expression> = initializer.expressions().collect();
    if elements.is_empty() {
        return Ok(());
    }
    let Some((statement, target)) = initialized_statement(&creation) else {
        return Ok(());
    };
    if !statement_list_info(statement.syntax()).success() {
        return Ok(());
    }
    let mut expanded = Vec::with_capacity(elements.len());
    for element in &elements {
        match expanded_element(&target, element) {
            Some(text) => expanded.push(text),
            None => return Ok(()),
        }
    }

    let document = context.document();
    let nl = newline(document.text());
    let indent = indentation_of(document, statement.syntax());
    let creation_range = range_of(creation.syntax());
    let mut bare_creation = document
        .slice(TextRange {
            start: creation_range.start,
            end: range_of(node).start,
        })
        .trim_end()
        .to_string();
    if creation.argument_list().is_none() {
        bare_creation.push_str("()");
    }
    let statement_range = range_of(statement.syntax());
    let mut replacement = format!(
        "{}{bare_creation}{}",
        document.slice(TextRange {
            start: statement_range.start,
            end: creation_range.start,
        }),
        document.slice(TextRange {
            start: creation_range.end,
            end: statement_range.end,
        })
    );
    for line in &expanded {
        replacement.push_str(&format!("{nl}{indent}{line}"));
    }
    context.register_edit(
        RefactoringId::ExpandInitializer,
        RefactoringId::ExpandInitializer.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(statement_range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// The statement that stores `creation` and the text of the variable it lands in.
fn initialized_statement(creation: &ObjectCreationExpression) -> Option<(Statement, String)> {
    let parent = creation.syntax().parent()?;
    if parent.kind() == SyntaxKind::AssignmentExpression {
        let info =
            simple_assignment_statement_info(&parent.parent()?, MatchOptions::strict());
        let right = info.right()?;
        if right.syntax() != creation.syntax() {
            return None;
        }
        let statement = Statement::cast(info.statement()?.syntax().clone())?;
        return Some((statement, text_of(info.left()?.syntax())));
    }
    let info = single_local_declaration_statement_info(creation.syntax(), false);
    let statement = Statement::cast(info.statement()?.syntax().clone())?;
    Some((statement, info.name()?.to_string()))
}

fn expanded_element(target: &str, element: &Expression) -> Option<String> {
    match element.kind() {
        SyntaxKind::AssignmentExpression => {
            let assignment = AssignmentExpression::cast(element.syntax().clone())?;
            let left = assignment.left()?;
            if assignment.operator_kind() != SyntaxKind::Eq
                || left.kind() != SyntaxKind::IdentifierName
            {
                return None;
            }
            Some(format!(
                "{target}.{} = {};",
                text_of(left.syntax()),
                text_of(assignment.right()?.syntax())
            ))
        }
        SyntaxKind::InitializerExpression => {
            let arguments: Vec<String> = InitializerExpression::cast(element.syntax().clone())?
                .expressions()
                .map(|e| text_of(e.syntax()))
                .collect();
            Some(format!("{target}.Add({});", arguments.join(", ")))
        }
        _ => Some(format!("{target}.Add({});", text_of(element.syntax()))),
    }
}

/// A selected local `var p = new T(…);` followed only by `p.Member = value;` statements
/// collapses into an object initializer. Any other statement in the run cancels it.
pub(crate) fn compute_selected(
    context: &mut RefactoringContext<'_>,
    selection: &StatementListSelection,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::UseObjectInitializer) || selection.count() < 2 {
        return Ok(());
    }
    let first = selection.first();
    let local = single_local_declaration_statement_info(first.syntax(), false);
    let (Some(name), Some(value)) = (local.name(), local.value()) else {
        return Ok(());
    };
    let Some(creation) = ObjectCreationExpression::cast(value.syntax().clone()) else {
        return Ok(());
    };
    if creation.initializer().is_some() {
        return Ok(());
    }

    let mut members = Vec::with_capacity(selection.count() - 1);
    for statement in &selection.selected()[1..] {
        match member_assignment(statement, name) {
            Some(member) => members.push(member),
            None => return Ok(()),
        }
    }

    let document = context.document();
    let range = selection.range();
    let creation_range = range_of(creation.syntax());
    let first_range = range_of(first.syntax());
    let rest = document.slice(TextRange {
        start: creation_range.end,
        end: first_range.end,
    });
    let replacement = if document.slice(range).contains('\n') {
        let nl = newline(document.text());
        let indent = indentation_of(document, first.syntax());
        let inner = format!("{indent}{INDENT}");
        let body = members.join(&format!(",{nl}{inner}"));
        format!(
            "{}{nl}{indent}{{{nl}{inner}{body}{nl}{indent}}}{rest}",
            document.slice(TextRange {
                start: first_range.start,
                end: creation_range.end,
            })
        )
    } else {
        // `new T()` loses its empty argument list on one line.
        let end = creation
            .argument_list()
            .filter(|list| list.arguments().next().is_none())
            .map_or(creation_range.end, |list| range_of(list.syntax()).start);
        let head = document.slice(TextRange {
            start: first_range.start,
            end,
        });
        format!("{} {{ {} }}{rest}", head.trim_end(), members.join(", "))
    };
    context.register_edit(
        RefactoringId::UseObjectInitializer,
        RefactoringId::UseObjectInitializer.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

/// `Member = value` from `name.Member = value;`, when `value` does not read `name`.
fn member_assignment(statement: &Statement, name: &str) -> Option<String> {
    let info = simple_assignment_statement_info(statement.syntax(), MatchOptions::strict());
    let access = MemberAccessExpression::cast(info.left()?.syntax().clone())?;
    if access.syntax().kind() != SyntaxKind::MemberAccessExpression {
        return None;
    }
    let receiver = access.expression()?;
    if receiver.kind() != SyntaxKind::IdentifierName || text_of(receiver.syntax()) != name {
        return None;
    }
    let right = info.right()?;
    if mentions_identifier(right.syntax(), name) {
        return None;
    }
    Some(format!(
        "{} = {}",
        access.name_text()?,
        text_of(right.syntax())
    ))
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    fn method(body: &str) -> String {
        format!("class C\n{{\n    void M(int x)\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn expands_object_initializer() {
        check(
            RefactoringId::ExpandInitializer,
            &method("        var p = new Point /*caret*/{ X = 1, Y = x };\n"),
            &method("        var p = new Point();\n        p.X = 1;\n        p.Y = x;\n"),
        );
    }

    #[test]
    fn expands_collection_initializer_on_assignment() {
        check(
            RefactoringId::ExpandInitializer,
            &method("        items = new List<int>() /*caret*/{ 1, x };\n"),
            &method("        items = new List<int>();\n        items.Add(1);\n        items.Add(x);\n"),
        );
    }

    #[test]
    fn field_initializers_are_not_expanded() {
        check_not_offered(
            RefactoringId::ExpandInitializer,
            "class C\n{\n    Point p = new Point /*caret*/{ X = 1 };\n}\n",
        );
    }

    #[test]
    fn collapses_member_assignments() {
        check(
            RefactoringId::UseObjectInitializer,
            &method(
                "        /*start*/var p = new Point();\n        p.X = 1;\n        p.Y = x;/*end*/\n        F(p);\n",
            ),
            &method(
                "        var p = new Point()\n        {\n            X = 1,\n            Y = x\n        };\n        F(p);\n",
            ),
        );
    }

    #[test]
    fn collapses_on_one_line() {
        check(
            RefactoringId::UseObjectInitializer,
            "class C { void M() { /*start*/var p = new Point(); p.X = 1; p.Y = 2;/*end*/ } }",
            "class C { void M() { var p = new Point { X = 1, Y = 2 }; } }",
        );
    }

    #[test]
    fn collapse_indents_from_the_statement_line() {
        check(
            RefactoringId::UseObjectInitializer,
            "class C\n{\n    void M() { /*start*/var p = new Point(1);\n      p.X = 2;/*end*/ }\n}\n",
            "class C\n{\n    void M() { var p = new Point(1)\n    {\n        X = 2\n    }; }\n}\n",
        );
    }

    #[test]
    fn collapse_is_all_or_nothing() {
        check_not_offered(
            RefactoringId::UseObjectInitializer,
            &method(
                "        /*start*/var p = new Point();\n        p.X = 1;\n        F(p);/*end*/\n",
            ),
        );
        check_not_offered(
            RefactoringId::UseObjectInitializer,
            &method(
                "        /*start*/var p = new Point();\n        q.X = 1;/*end*/\n",
            ),
        );
    }

    #[test]
    fn self_referencing_values_block_collapse() {
        check_not_offered(
            RefactoringId::UseObjectInitializer,
            &method(
                "        /*start*/var p = new Point();\n        p.X = p.Y;/*end*/\n",
            ),
        );
    }
}
