//! Dispatch: decides which providers run for a span.
//!
//! The passes run in a fixed order: preprocessor directives, the token at the span
//! start, comment trivia, then a walk over the ancestors of the node covering the span.
//! During the walk each [`Category`] of handler fires at most once, for the innermost
//! node of that category.

use sharp_syntax::{AstNode, MemberDeclaration, Statement, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

use crate::catalogue::RefactoringSettings;
use crate::context::{CodeAction, RefactoringContext};
use crate::document::Document;
use crate::error::RefactorError;
use crate::refactorings::{
    accessibility, assignment, attributes, binary, bodies, braces, cast, comments, conditional,
    directives, generics, if_statements, initializers, literals, local_declarations, loops,
    members, null_checks, parentheses, token_range, unary, wrap,
};
use crate::semantic::SemanticModelProvider;
use crate::syntax_info::{member_declaration_list_selection, statement_list_selection};

/// Handler families guarded during the ancestor walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Category {
    AccessorDeclaration,
    ArrowExpressionClause,
    Parameter,
    SwitchSection,
    ConstraintClause,
    Expression,
    Assignment,
    Binary,
    Conditional,
    InterpolatedString,
    Literal,
    Parenthesized,
    Unary,
    Lambda,
    Initializer,
    MemberDeclaration,
    AttributeList,
    IfStatement,
    WhileStatement,
    DoStatement,
    LocalDeclaration,
    LocalFunction,
    EmbeddedStatement,
    Statement,
    SelectedStatements,
    SelectedMembers,
}

/// Bitset of the categories that already fired.
#[derive(Debug, Default, Clone, Copy)]
struct DispatchGuard(u64);

impl DispatchGuard {
    /// Marks `category` and reports whether this is its first occurrence.
    fn first(&mut self, category: Category) -> bool {
        let bit = 1u64 << category as u8;
        let first = self.0 & bit == 0;
        self.0 |= bit;
        first
    }

    fn is_done(&self, category: Category) -> bool {
        self.0 & (1u64 << category as u8) != 0
    }
}

/// Registers every applicable action for the context span.
pub fn compute_refactorings(context: &mut RefactoringContext<'_>) -> Result<(), RefactorError> {
    context.cancellation().check()?;
    let document = context.document().clone();
    let span = context.span();
    let root = document.syntax();

    directives::compute(context, &root)?;

    if let Some(token) = token_at(&document, span.start) {
        if token.kind().is_accessibility_modifier() {
            accessibility::compute(context, &token)?;
        }
    }

    if let Some(comment) = comment_at(&root, span) {
        comments::compute(context, &comment)?;
    }

    let Some(start) = node_at(&document, span) else {
        return Ok(());
    };

    let mut guard = DispatchGuard::default();
    let mut ancestors = 0usize;
    for node in start.ancestors() {
        context.cancellation().check()?;
        ancestors += 1;
        visit(context, &node, &mut guard)?;
    }

    tracing::debug!(
        target: "sharp.refactor",
        start = span.start,
        end = span.end,
        ancestors,
        actions = context.actions().len(),
        "computed refactorings"
    );
    Ok(())
}

fn visit(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
    guard: &mut DispatchGuard,
) -> Result<(), RefactorError> {
    let kind = node.kind();
    match kind {
        SyntaxKind::AccessorDeclaration => {
            if guard.first(Category::AccessorDeclaration) {
                bodies::compute_accessor(context, node)?;
            }
            return Ok(());
        }
        SyntaxKind::ArrowExpressionClause => {
            if guard.first(Category::ArrowExpressionClause) {
                bodies::compute_arrow_expression_clause(context, node)?;
            }
            return Ok(());
        }
        SyntaxKind::Parameter => {
            if guard.first(Category::Parameter) {
                null_checks::compute(context, node)?;
            }
            return Ok(());
        }
        SyntaxKind::TypeParameterConstraintClause => {
            if guard.first(Category::ConstraintClause) {
                generics::compute_constraint_clause(context, node)?;
            }
            return Ok(());
        }
        SyntaxKind::SwitchSection => {
            if guard.first(Category::SwitchSection) {
                braces::compute_switch_section(context, node)?;
            }
            compute_selected_statements(context, node, guard)?;
            return Ok(());
        }
        SyntaxKind::Argument
        | SyntaxKind::ArgumentList
        | SyntaxKind::BracketedArgumentList
        | SyntaxKind::AttributeArgumentList
        | SyntaxKind::ParameterList
        | SyntaxKind::BracketedParameterList
        | SyntaxKind::VariableDeclaration
        | SyntaxKind::VariableDeclarator
        | SyntaxKind::ElseClause
        | SyntaxKind::CaseSwitchLabel
        | SyntaxKind::UsingDirective
        | SyntaxKind::TypeParameterList => return Ok(()),
        _ => {}
    }

    if kind.is_expression() {
        return visit_expression(context, node, guard);
    }

    if kind == SyntaxKind::AttributeList {
        if guard.first(Category::AttributeList) {
            attributes::compute_attribute_list(context, node)?;
        }
        return Ok(());
    }

    if let Some(member) = MemberDeclaration::cast(node.clone()) {
        if guard.first(Category::MemberDeclaration) {
            members::compute(context, &member)?;
            comments::compute_member(context, &member)?;
            bodies::compute_member(context, &member)?;
            generics::compute_member(context, &member)?;
            attributes::compute_member(context, &member)?;
            null_checks::compute_member(context, &member)?;
        }
        compute_selected_members(context, node, guard)?;
        return Ok(());
    }

    if kind == SyntaxKind::CompilationUnit {
        compute_selected_members(context, node, guard)?;
        return Ok(());
    }

    if let Some(statement) = Statement::cast(node.clone()) {
        visit_statement(context, &statement, guard)?;
    }
    Ok(())
}

fn visit_expression(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
    guard: &mut DispatchGuard,
) -> Result<(), RefactorError> {
    if guard.first(Category::Expression) {
        cast::compute(context, node)?;
    }
    match node.kind() {
        SyntaxKind::AssignmentExpression if guard.first(Category::Assignment) => {
            assignment::compute(context, node)?;
        }
        SyntaxKind::BinaryExpression if guard.first(Category::Binary) => {
            binary::compute(context, node)?;
            literals::compute_concatenation(context, node)?;
        }
        SyntaxKind::ConditionalExpression if guard.first(Category::Conditional) => {
            conditional::compute(context, node)?;
        }
        SyntaxKind::InterpolatedStringExpression if guard.first(Category::InterpolatedString) => {
            literals::compute_interpolated_string(context, node)?;
        }
        SyntaxKind::LiteralExpression if guard.first(Category::Literal) => {
            literals::compute_literal(context, node)?;
        }
        SyntaxKind::ParenthesizedExpression if guard.first(Category::Parenthesized) => {
            parentheses::compute(context, node)?;
        }
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression
            if guard.first(Category::Unary) =>
        {
            unary::compute(context, node)?;
        }
        SyntaxKind::SimpleLambdaExpression
        | SyntaxKind::ParenthesizedLambdaExpression
        | SyntaxKind::AnonymousMethodExpression
            if guard.first(Category::Lambda) =>
        {
            bodies::compute_lambda(context, node)?;
        }
        SyntaxKind::InitializerExpression if guard.first(Category::Initializer) => {
            initializers::compute_initializer(context, node)?;
        }
        _ => {}
    }
    Ok(())
}

fn visit_statement(
    context: &mut RefactoringContext<'_>,
    statement: &Statement,
    guard: &mut DispatchGuard,
) -> Result<(), RefactorError> {
    let node = statement.syntax();
    match statement.kind() {
        SyntaxKind::IfStatement if guard.first(Category::IfStatement) => {
            if_statements::compute(context, node)?;
            binary::compute_condition_owner(context, node)?;
        }
        SyntaxKind::WhileStatement if guard.first(Category::WhileStatement) => {
            loops::compute_while(context, node)?;
            binary::compute_condition_owner(context, node)?;
        }
        SyntaxKind::DoStatement if guard.first(Category::DoStatement) => {
            loops::compute_do(context, node)?;
        }
        SyntaxKind::LocalDeclarationStatement if guard.first(Category::LocalDeclaration) => {
            local_declarations::compute(context, node)?;
            assignment::compute_local_declaration(context, node)?;
        }
        SyntaxKind::LocalFunctionStatement if guard.first(Category::LocalFunction) => {
            bodies::compute_local_function(context, node)?;
        }
        _ => {}
    }

    if statement.is_embedded() && guard.first(Category::EmbeddedStatement) {
        braces::compute_embedded_statement(context, statement)?;
    }
    if guard.first(Category::Statement) {
        comments::compute_statement(context, statement)?;
    }
    if statement.kind() == SyntaxKind::Block {
        compute_selected_statements(context, node, guard)?;
    }
    Ok(())
}

fn compute_selected_statements(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
    guard: &mut DispatchGuard,
) -> Result<(), RefactorError> {
    if guard.is_done(Category::SelectedStatements) {
        return Ok(());
    }
    let Some(selection) = statement_list_selection(node, context.span()) else {
        return Ok(());
    };
    guard.first(Category::SelectedStatements);
    if_statements::compute_selected(context, &selection)?;
    initializers::compute_selected(context, &selection)?;
    assignment::compute_selected(context, &selection)?;
    loops::compute_selected(context, &selection)?;
    wrap::compute_statements(context, &selection)?;
    Ok(())
}

fn compute_selected_members(
    context: &mut RefactoringContext<'_>,
    node: &SyntaxNode,
    guard: &mut DispatchGuard,
) -> Result<(), RefactorError> {
    if guard.is_done(Category::SelectedMembers) {
        return Ok(());
    }
    let Some(selection) = member_declaration_list_selection(node, context.span()) else {
        return Ok(());
    };
    guard.first(Category::SelectedMembers);
    members::compute_selected(context, &selection)?;
    wrap::compute_members(context, &selection)?;
    Ok(())
}

/// Token at `offset`, preferring the significant side when the offset sits between two.
fn token_at(document: &Document, offset: u32) -> Option<SyntaxToken> {
    let at = document.parse().token_at_offset(offset);
    let left = at.clone().left_biased();
    let right = at.right_biased();
    match (left, right) {
        (Some(left), Some(right)) if right.kind().is_trivia() && !left.kind().is_trivia() => {
            Some(left)
        }
        (left, right) => right.or(left),
    }
}

/// First comment touching `span`.
fn comment_at(root: &SyntaxNode, span: TextRange) -> Option<SyntaxToken> {
    root.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|token| token.kind().is_comment() && token_range(token).intersects(span))
}

/// Deepest node covering `span`.
fn node_at(document: &Document, span: TextRange) -> Option<SyntaxNode> {
    if span.is_empty() {
        return token_at(document, span.start)?.parent();
    }
    let element = document.parse().covering_element(span);
    match element.as_node() {
        Some(node) => Some(node.clone()),
        None => element.as_token()?.parent(),
    }
}

/// Runs the engine on a fresh context, containing any failure but cancellation.
pub fn refactorings_at(
    document: &Document,
    span: TextRange,
    settings: &dyn RefactoringSettings,
    semantic: Option<&dyn SemanticModelProvider>,
) -> Result<Vec<CodeAction>, RefactorError> {
    let mut context = RefactoringContext::new(document, span, settings);
    if let Some(provider) = semantic {
        context = context.with_semantic_model_provider(provider);
    }
    match compute_refactorings(&mut context) {
        Ok(()) => Ok(context.into_actions()),
        Err(RefactorError::Cancelled) => Err(RefactorError::Cancelled),
        Err(err) => {
            tracing::warn!(
                target: "sharp.refactor",
                file = %document.id(),
                start = span.start,
                end = span.end,
                error = %err,
                "refactoring providers failed"
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{DefaultSettings, RefactoringId};
    use crate::refactorings::testing::actions;
    use pretty_assertions::assert_eq;

    #[test]
    fn guard_fires_once_per_category() {
        let mut guard = DispatchGuard::default();
        assert!(guard.first(Category::Binary));
        assert!(!guard.first(Category::Binary));
        assert!(guard.first(Category::SelectedMembers));
        assert!(guard.is_done(Category::Binary));
        assert!(!guard.is_done(Category::Unary));
    }

    #[test]
    fn innermost_binary_only() {
        let titles: Vec<_> = actions("class C { bool M() => a == (b /*caret*/== c); }")
            .into_iter()
            .filter(|a| a.refactoring == RefactoringId::SwapBinaryOperands)
            .collect();
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn disabled_refactorings_do_not_register() {
        struct Only(RefactoringId);
        impl RefactoringSettings for Only {
            fn is_enabled(&self, id: RefactoringId) -> bool {
                id == self.0
            }
        }
        let document = Document::new("a.cs", "class C { bool F = true; }");
        let offset = document.text().find("true").unwrap();
        let span = TextRange::empty(offset);

        let all = refactorings_at(&document, span, &DefaultSettings, None).unwrap();
        assert!(all
            .iter()
            .any(|a| a.refactoring == RefactoringId::InvertBooleanLiteral));

        let none = refactorings_at(&document, span, &Only(RefactoringId::RemoveRegion), None).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn cancellation_propagates() {
        let document = Document::new("a.cs", "class C { bool F = true; }");
        let token = crate::cancellation::CancellationToken::new();
        token.cancel();
        let mut context = RefactoringContext::new(&document, TextRange::empty(20), &DefaultSettings)
            .with_cancellation(token);
        assert!(compute_refactorings(&mut context).unwrap_err().is_cancelled());
    }

    #[test]
    fn registration_order_is_deterministic() {
        let fixture = "class C { void M() { /*start*/F();\n        G();/*end*/ } }";
        let first: Vec<_> = actions(fixture).into_iter().map(|a| a.title).collect();
        let second: Vec<_> = actions(fixture).into_iter().map(|a| a.title).collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
