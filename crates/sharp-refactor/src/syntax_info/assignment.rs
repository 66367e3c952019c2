use sharp_syntax::{
    AssignmentExpression, AstNode, Expression, ExpressionStatement, SyntaxKind, SyntaxNode,
    SyntaxToken,
};

use super::{candidate, check, identity_eq, operand, MatchOptions};

/// Simple or compound assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentExpressionInfo {
    assignment: Option<AssignmentExpression>,
    left: Option<Expression>,
    operator: Option<SyntaxToken>,
    right: Option<Expression>,
}

identity_eq!(AssignmentExpressionInfo, assignment);

pub fn assignment_expression_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> AssignmentExpressionInfo {
    let Some(assignment) =
        candidate(node, options).and_then(|e| AssignmentExpression::cast(e.syntax().clone()))
    else {
        return AssignmentExpressionInfo::default();
    };
    if !check(Some(assignment.syntax()), options.allow_missing) {
        return AssignmentExpressionInfo::default();
    }
    let (Some(left), Some(operator), Some(right)) = (
        operand(assignment.left(), options),
        assignment.operator(),
        operand(assignment.right(), options),
    ) else {
        return AssignmentExpressionInfo::default();
    };
    AssignmentExpressionInfo {
        assignment: Some(assignment),
        left: Some(left),
        operator: Some(operator),
        right: Some(right),
    }
}

impl AssignmentExpressionInfo {
    pub fn success(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn assignment(&self) -> Option<&AssignmentExpression> {
        self.assignment.as_ref()
    }

    pub fn left(&self) -> Option<&Expression> {
        self.left.as_ref()
    }

    pub fn operator(&self) -> Option<&SyntaxToken> {
        self.operator.as_ref()
    }

    pub fn operator_kind(&self) -> Option<SyntaxKind> {
        self.operator.as_ref().map(SyntaxToken::kind)
    }

    pub fn right(&self) -> Option<&Expression> {
        self.right.as_ref()
    }

    pub fn is_compound(&self) -> bool {
        self.operator_kind()
            .is_some_and(|kind| kind.compound_assignment_operator().is_some())
    }
}

/// `left = right`.
#[derive(Debug, Clone, Default)]
pub struct SimpleAssignmentExpressionInfo {
    assignment: Option<AssignmentExpression>,
    left: Option<Expression>,
    right: Option<Expression>,
}

identity_eq!(SimpleAssignmentExpressionInfo, assignment);

pub fn simple_assignment_expression_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> SimpleAssignmentExpressionInfo {
    let info = assignment_expression_info(node, options);
    if info.operator_kind() != Some(SyntaxKind::Eq) {
        return SimpleAssignmentExpressionInfo::default();
    }
    SimpleAssignmentExpressionInfo {
        assignment: info.assignment,
        left: info.left,
        right: info.right,
    }
}

impl SimpleAssignmentExpressionInfo {
    pub fn success(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn assignment(&self) -> Option<&AssignmentExpression> {
        self.assignment.as_ref()
    }

    pub fn left(&self) -> Option<&Expression> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Expression> {
        self.right.as_ref()
    }
}

/// `left = right;` as a statement.
#[derive(Debug, Clone, Default)]
pub struct SimpleAssignmentStatementInfo {
    statement: Option<ExpressionStatement>,
    assignment: SimpleAssignmentExpressionInfo,
}

identity_eq!(SimpleAssignmentStatementInfo, statement);

pub fn simple_assignment_statement_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> SimpleAssignmentStatementInfo {
    let Some(statement) = ExpressionStatement::cast(node.clone()) else {
        return SimpleAssignmentStatementInfo::default();
    };
    let Some(expression) = statement.expression() else {
        return SimpleAssignmentStatementInfo::default();
    };
    // The statement's own expression is never parenthesized legally; match it directly.
    let assignment = simple_assignment_expression_info(
        expression.syntax(),
        MatchOptions {
            walk_down_parentheses: false,
            ..options
        },
    );
    if !assignment.success() || !check(Some(statement.syntax()), options.allow_missing) {
        return SimpleAssignmentStatementInfo::default();
    }
    SimpleAssignmentStatementInfo {
        statement: Some(statement),
        assignment,
    }
}

impl SimpleAssignmentStatementInfo {
    pub fn success(&self) -> bool {
        self.statement.is_some()
    }

    pub fn statement(&self) -> Option<&ExpressionStatement> {
        self.statement.as_ref()
    }

    pub fn assignment(&self) -> &SimpleAssignmentExpressionInfo {
        &self.assignment
    }

    pub fn left(&self) -> Option<&Expression> {
        self.assignment.left()
    }

    pub fn right(&self) -> Option<&Expression> {
        self.assignment.right()
    }
}

/// Whether `expression` is the left side of an assignment.
pub(crate) fn is_assignment_target(expression: &Expression) -> bool {
    expression
        .syntax()
        .parent()
        .and_then(AssignmentExpression::cast)
        .and_then(|a| a.left())
        .is_some_and(|left| left.syntax() == expression.syntax())
}
