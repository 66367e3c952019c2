use sharp_syntax::{AstNode, ElseClause, Expression, IfStatement, Statement, SyntaxKind, SyntaxNode};

use super::{check, identity_eq, operand, MatchOptions};

/// `if (condition) statement` with no `else`.
#[derive(Debug, Clone, Default)]
pub struct SimpleIfStatementInfo {
    if_statement: Option<IfStatement>,
    condition: Option<Expression>,
    statement: Option<Statement>,
}

identity_eq!(SimpleIfStatementInfo, if_statement);

/// Fails for an `if` that has an `else` or is itself the `if` of an `else if`.
pub fn simple_if_statement_info(node: &SyntaxNode, options: MatchOptions) -> SimpleIfStatementInfo {
    let Some(if_statement) = IfStatement::cast(node.clone()) else {
        return SimpleIfStatementInfo::default();
    };
    if if_statement.else_clause().is_some() || if_statement.is_else_if() {
        return SimpleIfStatementInfo::default();
    }
    let Some(condition) = operand(if_statement.condition(), options) else {
        return SimpleIfStatementInfo::default();
    };
    let statement = if_statement.statement();
    if !check(statement.as_ref().map(Statement::syntax), options.allow_missing) {
        return SimpleIfStatementInfo::default();
    }
    SimpleIfStatementInfo {
        if_statement: Some(if_statement),
        condition: Some(condition),
        statement,
    }
}

impl SimpleIfStatementInfo {
    pub fn success(&self) -> bool {
        self.if_statement.is_some()
    }

    pub fn if_statement(&self) -> Option<&IfStatement> {
        self.if_statement.as_ref()
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }
}

/// `if (condition) when_true else when_false` where `when_false` is not another `if`.
#[derive(Debug, Clone, Default)]
pub struct SimpleIfElseInfo {
    if_statement: Option<IfStatement>,
    condition: Option<Expression>,
    when_true: Option<Statement>,
    when_false: Option<Statement>,
}

identity_eq!(SimpleIfElseInfo, if_statement);

pub fn simple_if_else_info(node: &SyntaxNode, options: MatchOptions) -> SimpleIfElseInfo {
    let Some(if_statement) = IfStatement::cast(node.clone()) else {
        return SimpleIfElseInfo::default();
    };
    if if_statement.is_else_if() {
        return SimpleIfElseInfo::default();
    }
    let Some(when_false) = if_statement.else_clause().and_then(|e| e.statement()) else {
        return SimpleIfElseInfo::default();
    };
    if when_false.kind() == SyntaxKind::IfStatement {
        return SimpleIfElseInfo::default();
    }
    let Some(condition) = operand(if_statement.condition(), options) else {
        return SimpleIfElseInfo::default();
    };
    let when_true = if_statement.statement();
    if !check(when_true.as_ref().map(Statement::syntax), options.allow_missing)
        || !check(Some(when_false.syntax()), options.allow_missing)
    {
        return SimpleIfElseInfo::default();
    }
    SimpleIfElseInfo {
        if_statement: Some(if_statement),
        condition: Some(condition),
        when_true,
        when_false: Some(when_false),
    }
}

impl SimpleIfElseInfo {
    pub fn success(&self) -> bool {
        self.if_statement.is_some()
    }

    pub fn if_statement(&self) -> Option<&IfStatement> {
        self.if_statement.as_ref()
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    pub fn when_true(&self) -> Option<&Statement> {
        self.when_true.as_ref()
    }

    pub fn when_false(&self) -> Option<&Statement> {
        self.when_false.as_ref()
    }
}

/// One link of an `if / else if / else` chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IfCascadeItem {
    If(IfStatement),
    Else(ElseClause),
}

impl IfCascadeItem {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            IfCascadeItem::If(it) => it.syntax(),
            IfCascadeItem::Else(it) => it.syntax(),
        }
    }

    pub fn statement(&self) -> Option<Statement> {
        match self {
            IfCascadeItem::If(it) => it.statement(),
            IfCascadeItem::Else(it) => it.statement(),
        }
    }

    pub fn as_if(&self) -> Option<&IfStatement> {
        match self {
            IfCascadeItem::If(it) => Some(it),
            IfCascadeItem::Else(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IfStatementCascadeInfo {
    topmost: Option<IfStatement>,
    items: Vec<IfCascadeItem>,
}

identity_eq!(IfStatementCascadeInfo, topmost);

/// The whole chain containing `if_statement`, starting from its topmost `if`.
pub fn if_statement_cascade_info(if_statement: &IfStatement) -> IfStatementCascadeInfo {
    let mut topmost = if_statement.clone();
    while let Some(parent) = topmost
        .syntax()
        .parent()
        .filter(|p| p.kind() == SyntaxKind::ElseClause)
        .and_then(|p| p.parent())
        .and_then(IfStatement::cast)
    {
        topmost = parent;
    }

    let mut items = Vec::new();
    let mut current = Some(topmost.clone());
    while let Some(if_statement) = current.take() {
        let else_clause = if_statement.else_clause();
        items.push(IfCascadeItem::If(if_statement));
        if let Some(else_clause) = else_clause {
            match else_clause.statement().and_then(|s| IfStatement::cast(s.syntax().clone())) {
                Some(nested) => current = Some(nested),
                None => items.push(IfCascadeItem::Else(else_clause)),
            }
        }
    }
    IfStatementCascadeInfo {
        topmost: Some(topmost),
        items,
    }
}

impl IfStatementCascadeInfo {
    pub fn success(&self) -> bool {
        self.topmost.is_some()
    }

    pub fn topmost(&self) -> Option<&IfStatement> {
        self.topmost.as_ref()
    }

    pub fn items(&self) -> &[IfCascadeItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn ends_with_else(&self) -> bool {
        matches!(self.items.last(), Some(IfCascadeItem::Else(_)))
    }

    pub fn ends_with_if(&self) -> bool {
        matches!(self.items.last(), Some(IfCascadeItem::If(_)))
    }
}
