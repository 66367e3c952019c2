//! Pattern matchers over syntax.
//!
//! Every info type is an independent value produced by a free constructor function. The
//! `Default` value means "not recognised": [`success`](BinaryExpressionInfo::success)
//! is false and every accessor yields `None` or an empty list. Equality and hashing use
//! the identity of the matched root node.

use sharp_syntax::{contains_missing, AstNode, Expression, SyntaxKind, SyntaxNode};

mod assignment;
mod binary;
mod conditional;
mod directives;
mod generic;
mod if_statements;
mod invocation;
mod lists;
mod local_declaration;
mod modifiers;
mod null_check;
mod parameters;
mod string_concatenation;
mod string_literal;

pub(crate) use assignment::is_assignment_target;
pub use assignment::{
    assignment_expression_info, simple_assignment_expression_info,
    simple_assignment_statement_info, AssignmentExpressionInfo, SimpleAssignmentExpressionInfo,
    SimpleAssignmentStatementInfo,
};
pub use binary::{
    as_expression_info, binary_expression_info, is_expression_info, topmost_same_kind,
    AsExpressionInfo, BinaryExpressionInfo, IsExpressionInfo,
};
pub use conditional::{conditional_expression_info, ConditionalExpressionInfo};
pub use directives::{directive_info, region_info, DirectiveInfo, RegionInfo};
pub use generic::{
    generic_info, type_parameter_constraint_info, GenericInfo, TypeParameterConstraintInfo,
};
pub use if_statements::{
    if_statement_cascade_info, simple_if_else_info, simple_if_statement_info, IfCascadeItem,
    IfStatementCascadeInfo, SimpleIfElseInfo, SimpleIfStatementInfo,
};
pub use invocation::{
    simple_member_invocation_expression_info, simple_member_invocation_statement_info,
    SimpleMemberInvocationExpressionInfo, SimpleMemberInvocationStatementInfo,
};
pub use lists::{
    member_declaration_list_info, member_declaration_list_selection, statement_list_info,
    statement_list_selection, using_directive_list_info, MemberDeclarationListInfo,
    MemberDeclarationListSelection, StatementListInfo, StatementListSelection,
    SyntaxListSelection, UsingDirectiveListInfo,
};
pub use local_declaration::{
    local_declaration_statement_info, single_local_declaration_statement_info,
    LocalDeclarationStatementInfo, SingleLocalDeclarationStatementInfo,
};
pub use modifiers::{modifier_list_info, Accessibility, ModifierListInfo};
pub use null_check::{
    null_check_expression_info, null_check_expression_info_with_model, NullCheckExpressionInfo,
    NullCheckStyles,
};
pub use parameters::{
    parameter_info, single_parameter_lambda_expression_info, ParameterInfo,
    SingleParameterLambdaExpressionInfo,
};
pub use string_concatenation::{
    string_concatenation_expression_info, StringConcatenationAnalysis,
    StringConcatenationExpressionInfo,
};
pub use string_literal::{string_literal_expression_info, StringLiteralExpressionInfo};

/// Shared matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Strip `( … )` around the candidate and its operands. When false a parenthesized
    /// operand fails the match.
    pub walk_down_parentheses: bool,
    /// Accept candidates containing zero-width tokens inserted by error recovery.
    pub allow_missing: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            walk_down_parentheses: true,
            allow_missing: false,
        }
    }
}

impl MatchOptions {
    pub fn strict() -> Self {
        Self {
            walk_down_parentheses: false,
            allow_missing: false,
        }
    }
}

pub fn walk_down_parentheses(expression: &Expression) -> Expression {
    expression.walk_down_parentheses()
}

pub fn walk_up_parentheses(expression: &Expression) -> Expression {
    expression.walk_up_parentheses()
}

/// Present and, unless `allow_missing`, free of missing tokens.
pub fn check(node: Option<&SyntaxNode>, allow_missing: bool) -> bool {
    match node {
        Some(node) => allow_missing || !contains_missing(node),
        None => false,
    }
}

/// The candidate expression for `node` under `options`.
pub(crate) fn candidate(node: &SyntaxNode, options: MatchOptions) -> Option<Expression> {
    let expression = Expression::cast(node.clone())?;
    if options.walk_down_parentheses {
        Some(expression.walk_down_parentheses())
    } else {
        Some(expression)
    }
}

/// An operand of a matched expression under `options`.
pub(crate) fn operand(expression: Option<Expression>, options: MatchOptions) -> Option<Expression> {
    let expression = expression?;
    let expression = if options.walk_down_parentheses {
        expression.walk_down_parentheses()
    } else if expression.kind() == SyntaxKind::ParenthesizedExpression {
        return None;
    } else {
        expression
    };
    check(Some(expression.syntax()), options.allow_missing).then_some(expression)
}

/// Equality and hashing by the identity of the wrapped root.
macro_rules! identity_eq {
    ($ty:ident, $field:ident) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.$field == other.$field
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.$field.hash(state);
            }
        }
    };
}

pub(crate) use identity_eq;

#[cfg(test)]
mod tests;
