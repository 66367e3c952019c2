use sharp_syntax::{
    AstNode, BinaryExpression, Block, IfStatement, MemberDeclaration, MethodLike,
    ObjectCreationExpression, Parameter, Statement, SyntaxKind, SyntaxNode, ThrowStatement,
};

use super::{indentation_of, newline, range_of, text_of, token_range, INDENT};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::semantic::SemanticModel;

/// Caret on a parameter name.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CheckParameterForNull) {
        return Ok(());
    }
    let Some(parameter) = Parameter::cast(node.clone()) else {
        return Ok(());
    };
    let Some(identifier) = parameter.identifier() else {
        return Ok(());
    };
    if !token_range(&identifier).contains_range(context.span()) {
        return Ok(());
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(());
    };
    if can_check(&parameter, model.as_ref()) {
        register(context, vec![parameter]);
    }
    Ok(())
}

/// Whole parameters selected inside a method or constructor parameter list.
pub(crate) fn compute_member(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CheckParameterForNull) || context.span().is_empty() {
        return Ok(());
    }
    let Some(method) = MethodLike::cast(member.syntax().clone()) else {
        return Ok(());
    };
    let Some(list) = method.parameter_list() else {
        return Ok(());
    };
    let span = context.span();
    let selected: Vec<Parameter> = list
        .parameters()
        .filter(|parameter| span.contains_range(range_of(parameter.syntax())))
        .collect();
    if selected.is_empty() {
        return Ok(());
    }
    let Some(model) = context.semantic_model()? else {
        return Ok(());
    };
    let checkable: Vec<Parameter> = selected
        .into_iter()
        .filter(|parameter| can_check(parameter, model.as_ref()))
        .collect();
    if !checkable.is_empty() {
        register(context, checkable);
    }
    Ok(())
}

/// Block body of the method or constructor declaring `parameter`.
fn body_of(parameter: &Parameter) -> Option<Block> {
    let list = parameter.syntax().parent()?;
    if list.kind() != SyntaxKind::ParameterList {
        return None;
    }
    let owner = list.parent()?;
    if !matches!(
        owner.kind(),
        SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration
    ) {
        return None;
    }
    MethodLike::cast(owner)?.body()
}

fn can_check(parameter: &Parameter, model: &dyn SemanticModel) -> bool {
    let (Some(ty), Some(identifier), Some(body)) =
        (parameter.ty(), parameter.identifier(), body_of(parameter))
    else {
        return false;
    };
    let is_out = parameter
        .modifiers()
        .is_some_and(|modifiers| modifiers.has(SyntaxKind::OutKw));
    if is_out {
        return false;
    }
    let is_reference = model
        .type_of(ty.syntax())
        .is_some_and(|symbol| symbol.is_reference_type());
    is_reference
        && !leading_null_checks(&body)
            .iter()
            .any(|checked| checked == identifier.text())
}

/// Names checked by the `if (x == null) throw new ArgumentNullException(..)` run at the
/// top of `body`.
fn leading_null_checks(body: &Block) -> Vec<String> {
    body.statements().map_while(|s| null_checked_name(&s)).collect()
}

fn null_checked_name(statement: &Statement) -> Option<String> {
    let if_statement = IfStatement::cast(statement.syntax().clone())?;
    if if_statement.else_clause().is_some() {
        return None;
    }
    let condition = BinaryExpression::cast(if_statement.condition()?.syntax().clone())?;
    if condition.operator_kind() != SyntaxKind::EqEq
        || text_of(condition.right()?.syntax()) != "null"
    {
        return None;
    }
    let left = condition.left()?;
    if left.kind() != SyntaxKind::IdentifierName {
        return None;
    }

    let mut embedded = if_statement.statement()?;
    if let Some(block) = Block::cast(embedded.syntax().clone()) {
        let mut statements = block.statements();
        embedded = statements.next()?;
        if statements.next().is_some() {
            return None;
        }
    }
    let thrown = ThrowStatement::cast(embedded.syntax().clone())?.expression()?;
    let creation = ObjectCreationExpression::cast(thrown.syntax().clone())?;
    let exception = text_of(creation.ty()?.syntax());
    (exception == "ArgumentNullException" || exception.ends_with(".ArgumentNullException"))
        .then(|| text_of(left.syntax()))
}

fn register(context: &mut RefactoringContext<'_>, parameters: Vec<Parameter>) {
    let Some(body) = parameters.first().and_then(body_of) else {
        return;
    };
    let names: Vec<String> = parameters
        .iter()
        .filter_map(|p| p.identifier().map(|id| id.text().to_string()))
        .collect();
    let title = match names.as_slice() {
        [name] => format!("Check '{name}' for null"),
        _ => "Check parameters for null".to_string(),
    };

    let document = context.document();
    let nl = newline(document.text());
    let indent = format!("{}{INDENT}", indentation_of(document, body.syntax()));
    let use_nameof = context.supports_csharp6();
    let checks: Vec<String> = names
        .iter()
        .map(|name| {
            let argument = if use_nameof {
                format!("nameof({name})")
            } else {
                format!("\"{name}\"")
            };
            format!(
                "{indent}if ({name} == null){nl}{indent}{INDENT}throw new ArgumentNullException({argument});"
            )
        })
        .collect();
    let checks = checks.join(&format!("{nl}{nl}"));

    let statements: Vec<Statement> = body.statements().collect();
    let existing = leading_null_checks(&body).len();
    let (offset, inserted) = if existing > 0 {
        (
            range_of(statements[existing - 1].syntax()).end,
            format!("{nl}{nl}{checks}"),
        )
    } else if let Some(first) = statements.first() {
        let start = range_of(first.syntax()).start_usize();
        let line_start = document.text()[..start].rfind('\n').map_or(0, |idx| idx + 1);
        (line_start as u32, format!("{checks}{nl}{nl}"))
    } else {
        let Some(open) = body.open_brace() else {
            return;
        };
        (token_range(&open).end, format!("{nl}{checks}"))
    };
    tracing::trace!(
        target: "sharp.refactor",
        parameters = names.len(),
        "inserting parameter null checks"
    );
    context.register_edit(RefactoringId::CheckParameterForNull, title, move |_| {
        let mut edits = EditSet::new();
        edits.insert(offset, inserted.clone());
        Ok(edits)
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sharp_syntax::CSharpLanguageVersion;

    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{
        actions_with_version, check, check_action, check_not_offered, titles,
    };

    #[test]
    fn checks_parameter_before_first_statement() {
        check(
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    void M(string /*caret*/value)\n    {\n        F(value);\n    }\n}\n",
            "class C\n{\n    void M(string value)\n    {\n        if (value == null)\n            throw new ArgumentNullException(nameof(value));\n\n        F(value);\n    }\n}\n",
        );
    }

    #[test]
    fn appends_after_existing_checks() {
        check(
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    C(string a, string /*caret*/b)\n    {\n        if (a == null)\n            throw new ArgumentNullException(nameof(a));\n\n        F();\n    }\n}\n",
            "class C\n{\n    C(string a, string b)\n    {\n        if (a == null)\n            throw new ArgumentNullException(nameof(a));\n\n        if (b == null)\n            throw new ArgumentNullException(nameof(b));\n\n        F();\n    }\n}\n",
        );
    }

    #[test]
    fn already_checked_and_value_types_are_skipped() {
        check_not_offered(
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    void M(string /*caret*/a)\n    {\n        if (a == null)\n            throw new ArgumentNullException(nameof(a));\n    }\n}\n",
        );
        check_not_offered(
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    void M(int /*caret*/a)\n    {\n    }\n}\n",
        );
        check_not_offered(
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    void M(string /*caret*/a) => F(a);\n}\n",
        );
    }

    #[test]
    fn selected_parameters_are_checked_together() {
        let fixture = "class C\n{\n    void M(/*start*/string a, int n, object b/*end*/)\n    {\n    }\n}\n";
        assert_eq!(
            titles(RefactoringId::CheckParameterForNull, fixture),
            vec!["Check parameters for null".to_string()]
        );
        check(
            RefactoringId::CheckParameterForNull,
            fixture,
            "class C\n{\n    void M(string a, int n, object b)\n    {\n        if (a == null)\n            throw new ArgumentNullException(nameof(a));\n\n        if (b == null)\n            throw new ArgumentNullException(nameof(b));\n    }\n}\n",
        );
    }

    #[test]
    fn old_language_versions_use_string_literal() {
        let actions = actions_with_version(
            "class C\n{\n    void M(string /*caret*/s)\n    {\n        F();\n    }\n}\n",
            CSharpLanguageVersion::CSHARP_5,
        );
        check_action(
            &actions,
            RefactoringId::CheckParameterForNull,
            "class C\n{\n    void M(string s)\n    {\n        if (s == null)\n            throw new ArgumentNullException(\"s\");\n\n        F();\n    }\n}\n",
        );
    }
}
