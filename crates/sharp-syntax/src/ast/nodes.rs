use super::{support, AstNode, Expression, MemberDeclaration, Statement, TypeSyntax};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    support::token_where(node, |k| !k.is_trivia())
}

ast_node!(CompilationUnit => CompilationUnit);

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children(&self.syntax)
    }

    pub fn attribute_lists(&self) -> impl Iterator<Item = AttributeList> + '_ {
        support::children(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(
    /// Braced or file-scoped namespace.
    NamespaceDeclaration => NamespaceDeclaration | FileScopedNamespaceDeclaration
);

impl NamespaceDeclaration {
    pub fn is_file_scoped(&self) -> bool {
        self.syntax.kind() == SyntaxKind::FileScopedNamespaceDeclaration
    }

    pub fn name(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        support::children(&self.syntax)
    }

    pub fn open_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::OpenBrace)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::CloseBrace)
    }
}

ast_node!(UsingDirective => UsingDirective);

impl UsingDirective {
    pub fn is_static(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::StaticKw).is_some()
    }

    pub fn alias(&self) -> Option<NameEquals> {
        support::child(&self.syntax)
    }

    pub fn name(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }
}

ast_node!(NameEquals => NameEquals);

impl NameEquals {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

ast_node!(NameColon => NameColon);

impl NameColon {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

ast_node!(EnumDeclaration => EnumDeclaration);

impl EnumDeclaration {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = EnumMemberDeclaration> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(EnumMemberDeclaration => EnumMemberDeclaration);

impl EnumMemberDeclaration {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn value(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }
}

ast_node!(
    /// Method, local function, constructor, destructor, operator or conversion operator:
    /// everything with a parameter list and a block or arrow body.
    MethodLike => MethodDeclaration
        | LocalFunctionStatement
        | ConstructorDeclaration
        | DestructorDeclaration
        | OperatorDeclaration
        | ConversionOperatorDeclaration
);

impl MethodLike {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn attribute_lists(&self) -> impl Iterator<Item = AttributeList> + '_ {
        support::children(&self.syntax)
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    /// Declared return type (`None` for constructors and destructors).
    pub fn return_type(&self) -> Option<TypeSyntax> {
        match self.kind() {
            SyntaxKind::ConstructorDeclaration | SyntaxKind::DestructorDeclaration => None,
            _ => support::child(&self.syntax),
        }
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn constraint_clauses(&self) -> impl Iterator<Item = TypeParameterConstraintClause> + '_ {
        support::children(&self.syntax)
    }

    pub fn initializer(&self) -> Option<ConstructorInitializer> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(&self.syntax)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type().is_some_and(|ty| {
            ty.kind() == SyntaxKind::PredefinedType
                && first_significant_token(ty.syntax())
                    .is_some_and(|t| t.kind() == SyntaxKind::VoidKw)
        })
    }
}

ast_node!(ConstructorInitializer => ConstructorInitializer);

ast_node!(
    /// Property or indexer.
    PropertyLike => PropertyDeclaration | IndexerDeclaration
);

impl PropertyLike {
    pub fn modifiers(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    pub fn ty(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn accessor_list(&self) -> Option<AccessorList> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }

    /// `{ get; set; }` style: every accessor without a body.
    pub fn is_auto_property(&self) -> bool {
        self.syntax.kind() == SyntaxKind::PropertyDeclaration
            && self.accessor_list().is_some_and(|list| {
                let mut accessors = list.accessors().peekable();
                accessors.peek().is_some()
                    && accessors.all(|a| a.body().is_none() && a.expression_body().is_none())
            })
    }
}

ast_node!(
    /// Field or event field: modifiers plus a variable declaration.
    FieldDeclaration => FieldDeclaration | EventFieldDeclaration
);

impl FieldDeclaration {
    pub fn modifiers(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    pub fn is_const(&self) -> bool {
        self.modifiers()
            .is_some_and(|m| m.has(SyntaxKind::ConstKw))
    }
}

ast_node!(DelegateDeclaration => DelegateDeclaration);

impl DelegateDeclaration {
    pub fn return_type(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }
}

ast_node!(ModifierList => ModifierList);

impl ModifierList {
    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
    }

    pub fn has(&self, kind: SyntaxKind) -> bool {
        self.modifiers().any(|t| t.kind() == kind)
    }
}

ast_node!(AttributeList => AttributeList);

impl AttributeList {
    pub fn target(&self) -> Option<AttributeTargetSpecifier> {
        support::child(&self.syntax)
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(AttributeTargetSpecifier => AttributeTargetSpecifier);

ast_node!(Attribute => Attribute);

impl Attribute {
    pub fn name(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }
}

ast_node!(BaseList => BaseList);

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = TypeSyntax> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(TypeParameterList => TypeParameterList);

impl TypeParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = TypeParameter> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(TypeParameter => TypeParameter);

impl TypeParameter {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

ast_node!(TypeParameterConstraintClause => TypeParameterConstraintClause);

impl TypeParameterConstraintClause {
    /// Name of the constrained type parameter.
    pub fn name(&self) -> Option<SyntaxToken> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::IdentifierName)
            .and_then(|n| support::ident_token(&n))
    }

    pub fn constraints(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::TypeConstraint
                    | SyntaxKind::ClassOrStructConstraint
                    | SyntaxKind::ConstructorConstraint
            )
        })
    }
}

ast_node!(
    /// `( … )` or `[ … ]` parameter list.
    ParameterList => ParameterList | BracketedParameterList
);

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        support::children(&self.syntax)
    }

    pub fn open_token(&self) -> Option<SyntaxToken> {
        support::token_where(&self.syntax, |k| {
            matches!(k, SyntaxKind::OpenParen | SyntaxKind::OpenBracket)
        })
    }

    pub fn close_token(&self) -> Option<SyntaxToken> {
        support::token_where(&self.syntax, |k| {
            matches!(k, SyntaxKind::CloseParen | SyntaxKind::CloseBracket)
        })
    }
}

ast_node!(Parameter => Parameter);

impl Parameter {
    pub fn modifiers(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    pub fn ty(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn default_value(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }
}

ast_node!(EqualsValueClause => EqualsValueClause);

impl EqualsValueClause {
    pub fn value(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(ArrowExpressionClause => ArrowExpressionClause);

impl ArrowExpressionClause {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(AccessorList => AccessorList);

impl AccessorList {
    pub fn accessors(&self) -> impl Iterator<Item = AccessorDeclaration> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(AccessorDeclaration => AccessorDeclaration);

impl AccessorDeclaration {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        support::token_where(&self.syntax, |k| {
            matches!(
                k,
                SyntaxKind::GetKw
                    | SyntaxKind::SetKw
                    | SyntaxKind::InitKw
                    | SyntaxKind::AddKw
                    | SyntaxKind::RemoveKw
            )
        })
    }

    pub fn body(&self) -> Option<Block> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(&self.syntax)
    }
}

// --- Statements ---

ast_node!(Block => Block);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        support::children(&self.syntax)
    }

    pub fn open_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::OpenBrace)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::CloseBrace)
    }
}

ast_node!(LocalDeclarationStatement => LocalDeclarationStatement);

impl LocalDeclarationStatement {
    pub fn modifiers(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    pub fn is_const(&self) -> bool {
        self.modifiers().is_some_and(|m| m.has(SyntaxKind::ConstKw))
    }

    pub fn using_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::UsingKw)
    }
}

ast_node!(VariableDeclaration => VariableDeclaration);

impl VariableDeclaration {
    pub fn ty(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(VariableDeclarator => VariableDeclarator);

impl VariableDeclarator {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn initializer(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }
}

ast_node!(ExpressionStatement => ExpressionStatement);

impl ExpressionStatement {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(IfStatement => IfStatement);

impl IfStatement {
    pub fn condition(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }

    pub fn if_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IfKw)
    }

    /// True when this `if` is the `else if` of another statement.
    pub fn is_else_if(&self) -> bool {
        self.syntax
            .parent()
            .is_some_and(|p| p.kind() == SyntaxKind::ElseClause)
    }
}

ast_node!(ElseClause => ElseClause);

impl ElseClause {
    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }
}

ast_node!(SwitchStatement => SwitchStatement);

impl SwitchStatement {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn sections(&self) -> impl Iterator<Item = SwitchSection> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(SwitchSection => SwitchSection);

impl SwitchSection {
    pub fn labels(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::CaseSwitchLabel | SyntaxKind::DefaultSwitchLabel
            )
        })
    }

    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(CaseSwitchLabel => CaseSwitchLabel);

impl CaseSwitchLabel {
    pub fn value(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(WhileStatement => WhileStatement);

impl WhileStatement {
    pub fn condition(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }
}

ast_node!(DoStatement => DoStatement);

impl DoStatement {
    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }

    pub fn condition(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(ForStatement => ForStatement);

impl ForStatement {
    /// Child nodes of the `index`th `;`-separated header section.
    fn section(&self, index: usize) -> Vec<SyntaxNode> {
        let mut section = 0;
        let mut out = Vec::new();
        for element in self.syntax.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(tok) => match tok.kind() {
                    SyntaxKind::Semicolon => section += 1,
                    SyntaxKind::CloseParen => break,
                    _ => {}
                },
                rowan::NodeOrToken::Node(node) => {
                    if section == index {
                        out.push(node);
                    }
                }
            }
        }
        out
    }

    pub fn declaration(&self) -> Option<VariableDeclaration> {
        self.section(0).into_iter().find_map(VariableDeclaration::cast)
    }

    pub fn initializers(&self) -> Vec<Expression> {
        self.section(0).into_iter().filter_map(Expression::cast).collect()
    }

    pub fn condition(&self) -> Option<Expression> {
        self.section(1).into_iter().find_map(Expression::cast)
    }

    pub fn incrementors(&self) -> Vec<Expression> {
        self.section(2).into_iter().filter_map(Expression::cast).collect()
    }

    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }
}

ast_node!(ForEachStatement => ForEachStatement);

impl ForEachStatement {
    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }
}

ast_node!(ReturnStatement => ReturnStatement);

impl ReturnStatement {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(ThrowStatement => ThrowStatement);

impl ThrowStatement {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(TryStatement => TryStatement);

impl TryStatement {
    pub fn block(&self) -> Option<Block> {
        support::child(&self.syntax)
    }

    pub fn catches(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::CatchClause)
    }
}

ast_node!(UsingStatement => UsingStatement);

impl UsingStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Statement> {
        support::child(&self.syntax)
    }
}

ast_node!(LocalFunctionStatement => LocalFunctionStatement);

// --- Expressions ---

ast_node!(BinaryExpression => BinaryExpression);

impl BinaryExpression {
    pub fn left(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn operator_kind(&self) -> SyntaxKind {
        self.operator().map_or(SyntaxKind::Error, |t| t.kind())
    }

    /// Right operand; for `is`/`as` this is the type.
    pub fn right(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(1)
    }
}

ast_node!(AssignmentExpression => AssignmentExpression);

impl AssignmentExpression {
    pub fn left(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn operator_kind(&self) -> SyntaxKind {
        self.operator().map_or(SyntaxKind::Error, |t| t.kind())
    }

    pub fn right(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(1)
    }
}

ast_node!(ConditionalExpression => ConditionalExpression);

impl ConditionalExpression {
    pub fn condition(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn when_true(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(1)
    }

    pub fn when_false(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(2)
    }
}

ast_node!(ParenthesizedExpression => ParenthesizedExpression);

impl ParenthesizedExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(
    /// `++x`, `-x`, `!x`, … and `x++`, `x--`.
    UnaryExpression => PrefixUnaryExpression | PostfixUnaryExpression
);

impl UnaryExpression {
    pub fn is_prefix(&self) -> bool {
        self.syntax.kind() == SyntaxKind::PrefixUnaryExpression
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn operator_kind(&self) -> SyntaxKind {
        self.operator().map_or(SyntaxKind::Error, |t| t.kind())
    }

    pub fn operand(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(LiteralExpression => LiteralExpression);

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }
}

ast_node!(InterpolatedStringExpression => InterpolatedStringExpression);

impl InterpolatedStringExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }
}

ast_node!(InvocationExpression => InvocationExpression);

impl InvocationExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }
}

ast_node!(MemberAccessExpression => MemberAccessExpression | ConditionalAccessExpression);

impl MemberAccessExpression {
    pub fn is_conditional(&self) -> bool {
        self.syntax.kind() == SyntaxKind::ConditionalAccessExpression
    }

    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    /// Accessed member name (`IdentifierName` or `GenericName`).
    pub fn name(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(1)
    }

    pub fn name_text(&self) -> Option<String> {
        self.name()
            .and_then(|name| support::ident_token(name.syntax()))
            .map(|t| t.text().to_string())
    }
}

ast_node!(ElementAccessExpression => ElementAccessExpression);

ast_node!(
    /// `new T(...)`, `new T { ... }` and target-typed `new(...)`.
    ObjectCreationExpression => ObjectCreationExpression | ImplicitObjectCreationExpression
);

impl ObjectCreationExpression {
    pub fn ty(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<InitializerExpression> {
        support::child(&self.syntax)
    }
}

ast_node!(InitializerExpression => InitializerExpression);

impl InitializerExpression {
    pub fn expressions(&self) -> impl Iterator<Item = Expression> + '_ {
        support::children(&self.syntax)
    }

    pub fn open_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::OpenBrace)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::CloseBrace)
    }
}

ast_node!(ArgumentList => ArgumentList | BracketedArgumentList);

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        support::children(&self.syntax)
    }
}

ast_node!(Argument => Argument);

impl Argument {
    pub fn name_colon(&self) -> Option<NameColon> {
        support::child(&self.syntax)
    }

    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

ast_node!(CastExpression => CastExpression);

impl CastExpression {
    pub fn ty(&self) -> Option<TypeSyntax> {
        support::child(&self.syntax)
    }

    pub fn expression(&self) -> Option<Expression> {
        support::children(&self.syntax).nth(1)
    }
}

ast_node!(
    /// `x => …`, `(x, y) => …` or `delegate (…) { … }`.
    LambdaExpression => SimpleLambdaExpression
        | ParenthesizedLambdaExpression
        | AnonymousMethodExpression
);

impl LambdaExpression {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn parameter(&self) -> Option<Parameter> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    /// Body: a block or an expression.
    pub fn body(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::Block || n.kind().is_expression())
            .last()
    }

    pub fn arrow(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::FatArrow)
    }
}

ast_node!(IsPatternExpression => IsPatternExpression);

impl IsPatternExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn pattern(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::ConstantPattern | SyntaxKind::DeclarationPattern | SyntaxKind::NotPattern
            )
        })
    }
}

ast_node!(ConstantPattern => ConstantPattern);

impl ConstantPattern {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}
