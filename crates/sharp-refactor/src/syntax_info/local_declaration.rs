use sharp_syntax::{
    AstNode, EqualsValueClause, Expression, LocalDeclarationStatement, ModifierList, SyntaxKind,
    SyntaxNode, SyntaxToken, TypeSyntax, VariableDeclaration, VariableDeclarator,
};

use super::{check, identity_eq};

/// `T a = 1, b;` as a statement.
#[derive(Debug, Clone, Default)]
pub struct LocalDeclarationStatementInfo {
    statement: Option<LocalDeclarationStatement>,
    declaration: Option<VariableDeclaration>,
    ty: Option<TypeSyntax>,
    declarators: Vec<VariableDeclarator>,
}

identity_eq!(LocalDeclarationStatementInfo, statement);

pub fn local_declaration_statement_info(
    node: &SyntaxNode,
    allow_missing: bool,
) -> LocalDeclarationStatementInfo {
    let Some(statement) = LocalDeclarationStatement::cast(node.clone()) else {
        return LocalDeclarationStatementInfo::default();
    };
    if !check(Some(statement.syntax()), allow_missing) {
        return LocalDeclarationStatementInfo::default();
    }
    let Some(declaration) = statement.declaration() else {
        return LocalDeclarationStatementInfo::default();
    };
    let Some(ty) = declaration.ty() else {
        return LocalDeclarationStatementInfo::default();
    };
    let declarators: Vec<VariableDeclarator> = declaration.declarators().collect();
    if declarators.is_empty() {
        return LocalDeclarationStatementInfo::default();
    }
    LocalDeclarationStatementInfo {
        statement: Some(statement),
        declaration: Some(declaration),
        ty: Some(ty),
        declarators,
    }
}

impl LocalDeclarationStatementInfo {
    pub fn success(&self) -> bool {
        self.statement.is_some()
    }

    pub fn statement(&self) -> Option<&LocalDeclarationStatement> {
        self.statement.as_ref()
    }

    pub fn declaration(&self) -> Option<&VariableDeclaration> {
        self.declaration.as_ref()
    }

    pub fn ty(&self) -> Option<&TypeSyntax> {
        self.ty.as_ref()
    }

    pub fn declarators(&self) -> &[VariableDeclarator] {
        &self.declarators
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        self.statement.as_ref()?.modifiers()
    }

    pub fn is_const(&self) -> bool {
        self.statement.as_ref().is_some_and(LocalDeclarationStatement::is_const)
    }

    /// `using var x = …;`
    pub fn is_using(&self) -> bool {
        self.statement
            .as_ref()
            .is_some_and(|s| s.using_keyword().is_some())
    }
}

/// A local declaration statement with exactly one declarator.
#[derive(Debug, Clone, Default)]
pub struct SingleLocalDeclarationStatementInfo {
    statement: Option<LocalDeclarationStatement>,
    declaration: Option<VariableDeclaration>,
    ty: Option<TypeSyntax>,
    declarator: Option<VariableDeclarator>,
    identifier: Option<SyntaxToken>,
    initializer: Option<EqualsValueClause>,
    value: Option<Expression>,
}

identity_eq!(SingleLocalDeclarationStatementInfo, statement);

/// Accepts the statement, its declaration, its declarator or the initializer value.
pub fn single_local_declaration_statement_info(
    node: &SyntaxNode,
    allow_missing: bool,
) -> SingleLocalDeclarationStatementInfo {
    let statement_node = match node.kind() {
        SyntaxKind::LocalDeclarationStatement => Some(node.clone()),
        SyntaxKind::VariableDeclaration => node.parent(),
        SyntaxKind::VariableDeclarator => node.parent().and_then(|p| p.parent()),
        SyntaxKind::EqualsValueClause => node.ancestors().nth(3),
        kind if kind.is_expression() => node
            .parent()
            .filter(|p| p.kind() == SyntaxKind::EqualsValueClause)
            .and_then(|p| p.ancestors().nth(3)),
        _ => None,
    };
    let Some(statement_node) = statement_node else {
        return SingleLocalDeclarationStatementInfo::default();
    };
    let info = local_declaration_statement_info(&statement_node, allow_missing);
    let [declarator] = info.declarators() else {
        return SingleLocalDeclarationStatementInfo::default();
    };
    let Some(identifier) = declarator.identifier() else {
        return SingleLocalDeclarationStatementInfo::default();
    };
    let initializer = declarator.initializer();
    let value = initializer.as_ref().and_then(EqualsValueClause::value);
    SingleLocalDeclarationStatementInfo {
        declarator: Some(declarator.clone()),
        statement: info.statement,
        declaration: info.declaration,
        ty: info.ty,
        identifier: Some(identifier),
        initializer,
        value,
    }
}

impl SingleLocalDeclarationStatementInfo {
    pub fn success(&self) -> bool {
        self.statement.is_some()
    }

    pub fn statement(&self) -> Option<&LocalDeclarationStatement> {
        self.statement.as_ref()
    }

    pub fn declaration(&self) -> Option<&VariableDeclaration> {
        self.declaration.as_ref()
    }

    pub fn ty(&self) -> Option<&TypeSyntax> {
        self.ty.as_ref()
    }

    pub fn declarator(&self) -> Option<&VariableDeclarator> {
        self.declarator.as_ref()
    }

    pub fn identifier(&self) -> Option<&SyntaxToken> {
        self.identifier.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.identifier.as_ref().map(SyntaxToken::text)
    }

    pub fn initializer(&self) -> Option<&EqualsValueClause> {
        self.initializer.as_ref()
    }

    pub fn value(&self) -> Option<&Expression> {
        self.value.as_ref()
    }

    /// Declared with `var`.
    pub fn is_var(&self) -> bool {
        self.ty
            .as_ref()
            .is_some_and(|ty| ty.kind() == SyntaxKind::IdentifierName && ty.syntax().text() == "var")
    }
}
