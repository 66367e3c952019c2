use sharp_syntax::{
    first_token, Argument, ArgumentList, AstNode, Expression, ExpressionStatement,
    InvocationExpression, MemberAccessExpression, SyntaxKind, SyntaxNode, SyntaxToken,
};

use super::{candidate, check, identity_eq, MatchOptions};

/// `receiver.Name(arguments)`.
#[derive(Debug, Clone, Default)]
pub struct SimpleMemberInvocationExpressionInfo {
    invocation: Option<InvocationExpression>,
    member_access: Option<MemberAccessExpression>,
    expression: Option<Expression>,
    name: Option<SyntaxToken>,
    argument_list: Option<ArgumentList>,
}

identity_eq!(SimpleMemberInvocationExpressionInfo, invocation);

pub fn simple_member_invocation_expression_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> SimpleMemberInvocationExpressionInfo {
    let Some(invocation) =
        candidate(node, options).and_then(|e| InvocationExpression::cast(e.syntax().clone()))
    else {
        return SimpleMemberInvocationExpressionInfo::default();
    };
    if !check(Some(invocation.syntax()), options.allow_missing) {
        return SimpleMemberInvocationExpressionInfo::default();
    }
    let Some(member_access) = invocation
        .expression()
        .and_then(|e| MemberAccessExpression::cast(e.syntax().clone()))
        .filter(|access| !access.is_conditional())
    else {
        return SimpleMemberInvocationExpressionInfo::default();
    };
    let name = member_access
        .name()
        .filter(|name| name.kind() == SyntaxKind::IdentifierName)
        .and_then(|name| first_token(name.syntax()));
    let (Some(expression), Some(name), Some(argument_list)) = (
        member_access.expression(),
        name,
        invocation.argument_list(),
    ) else {
        return SimpleMemberInvocationExpressionInfo::default();
    };
    SimpleMemberInvocationExpressionInfo {
        invocation: Some(invocation),
        member_access: Some(member_access),
        expression: Some(expression),
        name: Some(name),
        argument_list: Some(argument_list),
    }
}

impl SimpleMemberInvocationExpressionInfo {
    pub fn success(&self) -> bool {
        self.invocation.is_some()
    }

    pub fn invocation(&self) -> Option<&InvocationExpression> {
        self.invocation.as_ref()
    }

    pub fn member_access(&self) -> Option<&MemberAccessExpression> {
        self.member_access.as_ref()
    }

    /// The receiver.
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    pub fn name(&self) -> Option<&SyntaxToken> {
        self.name.as_ref()
    }

    pub fn name_text(&self) -> Option<&str> {
        self.name.as_ref().map(SyntaxToken::text)
    }

    pub fn argument_list(&self) -> Option<&ArgumentList> {
        self.argument_list.as_ref()
    }

    pub fn arguments(&self) -> Vec<Argument> {
        self.argument_list
            .as_ref()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }
}

/// An expression statement holding a simple member invocation.
#[derive(Debug, Clone, Default)]
pub struct SimpleMemberInvocationStatementInfo {
    statement: Option<ExpressionStatement>,
    info: SimpleMemberInvocationExpressionInfo,
}

identity_eq!(SimpleMemberInvocationStatementInfo, statement);

pub fn simple_member_invocation_statement_info(
    node: &SyntaxNode,
    allow_missing: bool,
) -> SimpleMemberInvocationStatementInfo {
    let Some(statement) = ExpressionStatement::cast(node.clone()) else {
        return SimpleMemberInvocationStatementInfo::default();
    };
    if !check(Some(statement.syntax()), allow_missing) {
        return SimpleMemberInvocationStatementInfo::default();
    }
    let Some(expression) = statement.expression() else {
        return SimpleMemberInvocationStatementInfo::default();
    };
    let info = simple_member_invocation_expression_info(
        expression.syntax(),
        MatchOptions {
            walk_down_parentheses: false,
            allow_missing,
        },
    );
    if !info.success() {
        return SimpleMemberInvocationStatementInfo::default();
    }
    SimpleMemberInvocationStatementInfo {
        statement: Some(statement),
        info,
    }
}

impl SimpleMemberInvocationStatementInfo {
    pub fn success(&self) -> bool {
        self.statement.is_some()
    }

    pub fn statement(&self) -> Option<&ExpressionStatement> {
        self.statement.as_ref()
    }

    pub fn invocation_info(&self) -> &SimpleMemberInvocationExpressionInfo {
        &self.info
    }
}
