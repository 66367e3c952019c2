use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, NodeOrToken};
use text_size::TextSize;

use crate::lexer::{lex, Token};
use crate::syntax_kind::{CSharpLanguage, SyntaxKind};
use crate::{ParseError, TextRange};

pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn token_at_offset(&self, offset: u32) -> rowan::TokenAtOffset<SyntaxToken> {
        self.syntax().token_at_offset(TextSize::from(offset))
    }

    pub fn covering_element(&self, range: TextRange) -> SyntaxElement {
        self.syntax().covering_element(range.into())
    }
}

/// Parse a complete C# compilation unit.
pub fn parse_csharp(input: &str) -> ParseResult {
    let result = Parser::new(input).parse();
    tracing::debug!(
        target: "sharp.syntax",
        len = input.len(),
        errors = result.errors.len(),
        "parsed compilation unit"
    );
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeMode {
    /// Declarations: `?` always makes a nullable type.
    Declaration,
    /// `is`/`as`/casts/`typeof`: `?` is only nullable when no expression follows.
    Expression,
    /// The type of an array creation (`new int[3]`): rank specifiers are not part of it.
    ArrayElement,
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    /// Raw index of the next token to push into the tree.
    pos: usize,
    /// Raw indexes of the non-trivia tokens.
    significant: Vec<usize>,
    /// Index into `significant` of the next non-trivia token.
    sig: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = lex(input);
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(idx, _)| idx)
            .collect();
        Self {
            input,
            tokens,
            pos: 0,
            significant,
            sig: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        self.parse_namespace_body(false);
        if self.at(SyntaxKind::Eof) {
            self.bump();
        }
        self.builder.finish_node();

        ParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // --- Declarations ---

    fn parse_namespace_body(&mut self, in_braces: bool) {
        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                SyntaxKind::CloseBrace if in_braces => break,
                SyntaxKind::UsingKw => self.parse_using_directive(),
                SyntaxKind::Identifier
                    if self.at_contextual("global") && self.nth(1) == SyntaxKind::UsingKw =>
                {
                    self.parse_using_directive()
                }
                SyntaxKind::NamespaceKw => self.parse_namespace(),
                SyntaxKind::OpenBracket if self.at_global_attribute() => {
                    self.parse_attribute_list()
                }
                SyntaxKind::CloseBrace => {
                    self.start(SyntaxKind::Error);
                    self.error_here("unexpected `}`");
                    self.bump();
                    self.finish();
                }
                _ => self.parse_member_declaration(),
            }
        }
    }

    fn at_global_attribute(&self) -> bool {
        self.nth(1) == SyntaxKind::Identifier
            && matches!(self.nth_text(1), "assembly" | "module")
            && self.nth(2) == SyntaxKind::Colon
    }

    fn parse_using_directive(&mut self) {
        self.start(SyntaxKind::UsingDirective);
        if self.at_contextual("global") {
            self.bump();
        }
        self.expect(SyntaxKind::UsingKw, "expected `using`");
        self.eat(SyntaxKind::StaticKw);
        if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Eq {
            self.start(SyntaxKind::NameEquals);
            self.bump();
            self.bump();
            self.finish();
        }
        self.parse_type(TypeMode::Declaration);
        self.expect(SyntaxKind::Semicolon, "expected `;` after using directive");
        self.finish();
    }

    fn parse_namespace(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        self.parse_type(TypeMode::Declaration);
        if self.at(SyntaxKind::Semicolon) {
            self.start_at(checkpoint, SyntaxKind::FileScopedNamespaceDeclaration);
            self.bump();
            self.parse_namespace_body(false);
            self.finish();
            return;
        }

        self.start_at(checkpoint, SyntaxKind::NamespaceDeclaration);
        if self.expect(SyntaxKind::OpenBrace, "expected `{`") {
            self.parse_namespace_body(true);
            self.expect(SyntaxKind::CloseBrace, "expected `}`");
            self.eat(SyntaxKind::Semicolon);
        }
        self.finish();
    }

    fn parse_member_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        let start = self.sig;
        self.parse_attribute_lists();
        self.parse_modifier_list();

        match self.current() {
            SyntaxKind::ClassKw => {
                self.parse_type_declaration(checkpoint, SyntaxKind::ClassDeclaration)
            }
            SyntaxKind::StructKw => {
                self.parse_type_declaration(checkpoint, SyntaxKind::StructDeclaration)
            }
            SyntaxKind::InterfaceKw => {
                self.parse_type_declaration(checkpoint, SyntaxKind::InterfaceDeclaration)
            }
            SyntaxKind::EnumKw => self.parse_enum_declaration(checkpoint),
            SyntaxKind::DelegateKw => self.parse_delegate_declaration(checkpoint),
            SyntaxKind::EventKw => self.parse_event_declaration(checkpoint),
            SyntaxKind::Tilde => self.parse_destructor(checkpoint),
            SyntaxKind::ImplicitKw | SyntaxKind::ExplicitKw => {
                self.parse_conversion_operator(checkpoint)
            }
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::OpenParen => {
                self.parse_constructor(checkpoint)
            }
            kind if kind == SyntaxKind::Identifier || kind.is_predefined_type_keyword() => {
                self.parse_member_after_type(checkpoint)
            }
            _ => {
                self.start_at(checkpoint, SyntaxKind::IncompleteMember);
                self.error_here("expected member declaration");
                if self.sig == start && !self.at(SyntaxKind::Eof) {
                    self.bump();
                }
                self.finish();
            }
        }
    }

    fn parse_member_after_type(&mut self, checkpoint: Checkpoint) {
        let type_checkpoint = self.checkpoint();
        self.parse_type(TypeMode::Declaration);

        match self.current() {
            SyntaxKind::OperatorKw => {
                self.start_at(checkpoint, SyntaxKind::OperatorDeclaration);
                self.bump();
                self.parse_overloadable_operator();
                self.parse_parameter_list();
                self.parse_method_body();
                self.finish();
            }
            SyntaxKind::ThisKw => {
                self.start_at(checkpoint, SyntaxKind::IndexerDeclaration);
                self.bump();
                self.parse_bracketed_parameter_list();
                self.parse_property_body();
                self.finish();
            }
            SyntaxKind::Identifier => {
                // Explicit interface implementations: `void IFoo.Bar()`.
                let mut n = 0;
                while self.nth(n) == SyntaxKind::Identifier && self.nth(n + 1) == SyntaxKind::Dot
                {
                    n += 2;
                }

                if self.nth(n) == SyntaxKind::ThisKw {
                    self.start_at(checkpoint, SyntaxKind::IndexerDeclaration);
                    for _ in 0..n {
                        self.bump();
                    }
                    self.bump();
                    self.parse_bracketed_parameter_list();
                    self.parse_property_body();
                    self.finish();
                    return;
                }

                match self.nth(n + 1) {
                    SyntaxKind::OpenParen | SyntaxKind::Less => {
                        self.start_at(checkpoint, SyntaxKind::MethodDeclaration);
                        for _ in 0..=n {
                            self.bump();
                        }
                        if self.at(SyntaxKind::Less) {
                            self.parse_type_parameter_list();
                        }
                        self.parse_parameter_list();
                        self.parse_constraint_clauses();
                        self.parse_method_body();
                        self.finish();
                    }
                    SyntaxKind::OpenBrace | SyntaxKind::FatArrow => {
                        self.start_at(checkpoint, SyntaxKind::PropertyDeclaration);
                        for _ in 0..=n {
                            self.bump();
                        }
                        self.parse_property_body();
                        self.finish();
                    }
                    _ => {
                        self.start_at(checkpoint, SyntaxKind::FieldDeclaration);
                        self.start_at(type_checkpoint, SyntaxKind::VariableDeclaration);
                        self.parse_variable_declarators();
                        self.finish();
                        self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
                        self.finish();
                    }
                }
            }
            _ => {
                self.start_at(checkpoint, SyntaxKind::IncompleteMember);
                self.error_here("expected member name");
                self.finish();
            }
        }
    }

    fn parse_type_declaration(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_at(checkpoint, kind);
        self.bump();
        self.expect_identifier("expected type name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        self.parse_constraint_clauses();
        if self.expect(SyntaxKind::OpenBrace, "expected `{`") {
            while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
                self.parse_member_declaration();
            }
            self.expect(SyntaxKind::CloseBrace, "expected `}`");
            self.eat(SyntaxKind::Semicolon);
        }
        self.finish();
    }

    fn parse_enum_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::EnumDeclaration);
        self.bump();
        self.expect_identifier("expected enum name");
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        if self.expect(SyntaxKind::OpenBrace, "expected `{`") {
            while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
                self.start(SyntaxKind::EnumMemberDeclaration);
                self.parse_attribute_lists();
                self.parse_modifier_list();
                self.expect_identifier("expected enum member name");
                if self.at(SyntaxKind::Eq) {
                    self.parse_equals_value_clause();
                }
                self.finish();
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            self.expect(SyntaxKind::CloseBrace, "expected `}`");
            self.eat(SyntaxKind::Semicolon);
        }
        self.finish();
    }

    fn parse_delegate_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::DelegateDeclaration);
        self.bump();
        self.parse_type(TypeMode::Declaration);
        self.expect_identifier("expected delegate name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list();
        self.parse_constraint_clauses();
        self.expect(SyntaxKind::Semicolon, "expected `;` after delegate declaration");
        self.finish();
    }

    fn parse_event_declaration(&mut self, checkpoint: Checkpoint) {
        self.bump();
        let type_checkpoint = self.checkpoint();
        self.parse_type(TypeMode::Declaration);
        if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::OpenBrace {
            self.start_at(checkpoint, SyntaxKind::EventDeclaration);
            self.bump();
            self.parse_accessor_list();
            self.finish();
            return;
        }

        self.start_at(checkpoint, SyntaxKind::EventFieldDeclaration);
        self.start_at(type_checkpoint, SyntaxKind::VariableDeclaration);
        self.parse_variable_declarators();
        self.finish();
        self.expect(SyntaxKind::Semicolon, "expected `;` after event declaration");
        self.finish();
    }

    fn parse_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::ConstructorDeclaration);
        self.bump();
        self.parse_parameter_list();
        if self.at(SyntaxKind::Colon) {
            self.start(SyntaxKind::ConstructorInitializer);
            self.bump();
            if self.at(SyntaxKind::BaseKw) || self.at(SyntaxKind::ThisKw) {
                self.bump();
            } else {
                self.error_here("expected `base` or `this`");
                self.missing(SyntaxKind::BaseKw);
            }
            self.parse_argument_list();
            self.finish();
        }
        self.parse_method_body();
        self.finish();
    }

    fn parse_destructor(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::DestructorDeclaration);
        self.bump();
        self.expect_identifier("expected destructor name");
        self.parse_parameter_list();
        self.parse_method_body();
        self.finish();
    }

    fn parse_conversion_operator(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::ConversionOperatorDeclaration);
        self.bump();
        self.expect(SyntaxKind::OperatorKw, "expected `operator`");
        self.parse_type(TypeMode::Declaration);
        self.parse_parameter_list();
        self.parse_method_body();
        self.finish();
    }

    fn parse_overloadable_operator(&mut self) {
        if let Some(joined) = self.at_right_shift() {
            if joined == SyntaxKind::RightShift {
                self.bump_joined(joined);
                return;
            }
        }
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Star
            | SyntaxKind::Slash
            | SyntaxKind::Percent
            | SyntaxKind::Amp
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
            | SyntaxKind::LeftShift
            | SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Less
            | SyntaxKind::LessEq
            | SyntaxKind::Greater
            | SyntaxKind::GreaterEq
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw => self.bump(),
            _ => {
                self.error_here("expected overloadable operator");
                self.missing(SyntaxKind::Plus);
            }
        }
    }

    fn parse_method_body(&mut self) {
        match self.current() {
            SyntaxKind::OpenBrace => self.parse_block(),
            SyntaxKind::FatArrow => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
            }
            _ => {
                self.expect(SyntaxKind::Semicolon, "expected method body or `;`");
            }
        }
    }

    fn parse_property_body(&mut self) {
        match self.current() {
            SyntaxKind::OpenBrace => {
                self.parse_accessor_list();
                if self.at(SyntaxKind::Eq) {
                    self.parse_equals_value_clause();
                    self.expect(SyntaxKind::Semicolon, "expected `;`");
                }
            }
            SyntaxKind::FatArrow => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
            }
            _ => {
                self.error_here("expected `{` or `=>`");
            }
        }
    }

    fn parse_accessor_list(&mut self) {
        self.start(SyntaxKind::AccessorList);
        self.bump();
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
            let start = self.sig;
            self.start(SyntaxKind::AccessorDeclaration);
            self.parse_attribute_lists();
            self.parse_modifier_list();
            let keyword = match self.nth_text(0) {
                "get" => Some(SyntaxKind::GetKw),
                "set" => Some(SyntaxKind::SetKw),
                "init" => Some(SyntaxKind::InitKw),
                "add" => Some(SyntaxKind::AddKw),
                "remove" => Some(SyntaxKind::RemoveKw),
                _ => None,
            };
            match keyword {
                Some(kind) if self.at(SyntaxKind::Identifier) => {
                    self.bump_remap(kind);
                    match self.current() {
                        SyntaxKind::OpenBrace => self.parse_block(),
                        SyntaxKind::FatArrow => {
                            self.parse_arrow_expression_clause();
                            self.expect(SyntaxKind::Semicolon, "expected `;`");
                        }
                        _ => {
                            self.expect(SyntaxKind::Semicolon, "expected accessor body or `;`");
                        }
                    }
                }
                _ => {
                    self.error_here("expected accessor");
                    if self.sig == start && !self.at(SyntaxKind::CloseBrace) {
                        self.bump();
                    }
                }
            }
            self.finish();
        }
        self.expect(SyntaxKind::CloseBrace, "expected `}`");
        self.finish();
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.start(SyntaxKind::ArrowExpressionClause);
        self.bump();
        self.parse_expression();
        self.finish();
    }

    fn parse_equals_value_clause(&mut self) {
        self.start(SyntaxKind::EqualsValueClause);
        self.bump();
        if self.at(SyntaxKind::OpenBrace) {
            self.parse_initializer_expression();
        } else {
            self.parse_expression();
        }
        self.finish();
    }

    fn parse_attribute_lists(&mut self) {
        while self.at(SyntaxKind::OpenBracket) {
            self.parse_attribute_list();
        }
    }

    fn parse_attribute_list(&mut self) {
        self.start(SyntaxKind::AttributeList);
        self.bump();
        let target = self.current();
        if (target == SyntaxKind::Identifier || target.is_keyword())
            && self.nth(1) == SyntaxKind::Colon
        {
            self.start(SyntaxKind::AttributeTargetSpecifier);
            self.bump();
            self.bump();
            self.finish();
        }
        while self.at(SyntaxKind::Identifier) {
            self.start(SyntaxKind::Attribute);
            self.parse_type(TypeMode::Declaration);
            if self.at(SyntaxKind::OpenParen) {
                self.parse_attribute_argument_list();
            }
            self.finish();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBracket, "expected `]`");
        self.finish();
    }

    fn parse_attribute_argument_list(&mut self) {
        self.start(SyntaxKind::AttributeArgumentList);
        self.bump();
        while !self.at(SyntaxKind::CloseParen) && self.can_start_expression() {
            self.start(SyntaxKind::AttributeArgument);
            if self.at(SyntaxKind::Identifier) {
                match self.nth(1) {
                    SyntaxKind::Eq => {
                        self.start(SyntaxKind::NameEquals);
                        self.bump();
                        self.bump();
                        self.finish();
                    }
                    SyntaxKind::Colon => {
                        self.start(SyntaxKind::NameColon);
                        self.bump();
                        self.bump();
                        self.finish();
                    }
                    _ => {}
                }
            }
            self.parse_expression();
            self.finish();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParen, "expected `)`");
        self.finish();
    }

    fn parse_modifier_list(&mut self) {
        self.start(SyntaxKind::ModifierList);
        loop {
            let kind = self.current();
            if kind.is_member_modifier() {
                self.bump();
                continue;
            }
            if kind == SyntaxKind::Identifier && self.contextual_modifier_follows() {
                match self.nth_text(0) {
                    "async" => {
                        self.bump_remap(SyntaxKind::AsyncKw);
                        continue;
                    }
                    "partial" => {
                        self.bump_remap(SyntaxKind::PartialKw);
                        continue;
                    }
                    _ => {}
                }
            }
            break;
        }
        self.finish();
    }

    fn contextual_modifier_follows(&self) -> bool {
        let next = self.nth(1);
        next.is_member_modifier()
            || next.is_predefined_type_keyword()
            || matches!(
                next,
                SyntaxKind::ClassKw
                    | SyntaxKind::StructKw
                    | SyntaxKind::InterfaceKw
                    | SyntaxKind::EnumKw
                    | SyntaxKind::DelegateKw
                    | SyntaxKind::EventKw
            )
            || (next == SyntaxKind::Identifier
                && !matches!(
                    self.nth(2),
                    SyntaxKind::Eq
                        | SyntaxKind::Semicolon
                        | SyntaxKind::Comma
                        | SyntaxKind::OpenParen
                        | SyntaxKind::OpenBrace
                        | SyntaxKind::FatArrow
                ))
    }

    fn parse_type_parameter_list(&mut self) {
        self.start(SyntaxKind::TypeParameterList);
        self.bump();
        loop {
            self.start(SyntaxKind::TypeParameter);
            self.parse_attribute_lists();
            if self.at(SyntaxKind::InKw) || self.at(SyntaxKind::OutKw) {
                self.bump();
            }
            self.expect_identifier("expected type parameter name");
            self.finish();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish();
    }

    fn parse_constraint_clauses(&mut self) {
        while self.at_contextual("where") {
            self.start(SyntaxKind::TypeParameterConstraintClause);
            self.bump_remap(SyntaxKind::WhereKw);
            self.start(SyntaxKind::IdentifierName);
            self.expect_identifier("expected type parameter name");
            self.finish();
            self.expect(SyntaxKind::Colon, "expected `:`");
            loop {
                match self.current() {
                    SyntaxKind::ClassKw | SyntaxKind::StructKw => {
                        self.start(SyntaxKind::ClassOrStructConstraint);
                        self.bump();
                        self.eat(SyntaxKind::Question);
                        self.finish();
                    }
                    SyntaxKind::NewKw => {
                        self.start(SyntaxKind::ConstructorConstraint);
                        self.bump();
                        self.expect(SyntaxKind::OpenParen, "expected `(`");
                        self.expect(SyntaxKind::CloseParen, "expected `)`");
                        self.finish();
                    }
                    _ => {
                        self.start(SyntaxKind::TypeConstraint);
                        self.parse_type(TypeMode::Declaration);
                        self.finish();
                    }
                }
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            self.finish();
        }
    }

    fn parse_base_list(&mut self) {
        self.start(SyntaxKind::BaseList);
        self.bump();
        loop {
            self.parse_type(TypeMode::Declaration);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish();
    }

    fn parse_parameter_list(&mut self) {
        self.parse_delimited_parameter_list(
            SyntaxKind::ParameterList,
            SyntaxKind::OpenParen,
            SyntaxKind::CloseParen,
            false,
        );
    }

    fn parse_bracketed_parameter_list(&mut self) {
        self.parse_delimited_parameter_list(
            SyntaxKind::BracketedParameterList,
            SyntaxKind::OpenBracket,
            SyntaxKind::CloseBracket,
            false,
        );
    }

    fn parse_delimited_parameter_list(
        &mut self,
        kind: SyntaxKind,
        open: SyntaxKind,
        close: SyntaxKind,
        allow_untyped: bool,
    ) {
        if !self.at(open) {
            self.error_here("expected parameter list");
            self.builder.start_node(kind.into());
            self.missing(open);
            self.missing(close);
            self.finish();
            return;
        }

        self.start(kind);
        self.bump();
        while !self.at(close) && !self.at(SyntaxKind::Eof) {
            let start = self.sig;
            self.parse_parameter(allow_untyped);
            if self.sig == start {
                break;
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(close, "expected end of parameter list");
        self.finish();
    }

    fn parse_parameter(&mut self, allow_untyped: bool) {
        self.start(SyntaxKind::Parameter);
        self.parse_attribute_lists();
        if allow_untyped
            && self.at(SyntaxKind::Identifier)
            && matches!(self.nth(1), SyntaxKind::Comma | SyntaxKind::CloseParen)
        {
            self.bump();
            self.finish();
            return;
        }
        self.start(SyntaxKind::ModifierList);
        while self.current().is_parameter_modifier() {
            self.bump();
        }
        self.finish();
        self.parse_type(TypeMode::Declaration);
        self.expect_identifier("expected parameter name");
        if self.at(SyntaxKind::Eq) {
            self.parse_equals_value_clause();
        }
        self.finish();
    }

    fn parse_variable_declaration(&mut self) {
        self.start(SyntaxKind::VariableDeclaration);
        self.parse_type(TypeMode::Declaration);
        self.parse_variable_declarators();
        self.finish();
    }

    fn parse_variable_declarators(&mut self) {
        loop {
            self.start(SyntaxKind::VariableDeclarator);
            self.expect_identifier("expected variable name");
            if self.at(SyntaxKind::Eq) {
                self.parse_equals_value_clause();
            }
            self.finish();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
    }

    // --- Statements ---

    fn parse_block(&mut self) {
        if !self.at(SyntaxKind::OpenBrace) {
            self.error_here("expected `{`");
            self.builder.start_node(SyntaxKind::Block.into());
            self.missing(SyntaxKind::OpenBrace);
            self.missing(SyntaxKind::CloseBrace);
            self.finish();
            return;
        }

        self.start(SyntaxKind::Block);
        self.bump();
        self.parse_statements_until(|p| p.at(SyntaxKind::CloseBrace));
        self.expect(SyntaxKind::CloseBrace, "expected `}`");
        self.finish();
    }

    fn parse_statements_until(&mut self, stop: impl Fn(&Self) -> bool) {
        while !self.at(SyntaxKind::Eof) && !stop(self) {
            let start = self.sig;
            self.parse_statement();
            if self.sig == start {
                self.start(SyntaxKind::Error);
                self.error_here("unexpected token");
                self.bump();
                self.finish();
            }
        }
    }

    fn parse_embedded_statement(&mut self) {
        if matches!(
            self.current(),
            SyntaxKind::CloseBrace | SyntaxKind::Eof | SyntaxKind::ElseKw
        ) {
            self.error_here("expected statement");
            self.builder.start_node(SyntaxKind::EmptyStatement.into());
            self.missing(SyntaxKind::Semicolon);
            self.finish();
            return;
        }
        self.parse_statement();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::OpenBrace => self.parse_block(),
            SyntaxKind::Semicolon => {
                self.start(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish();
            }
            SyntaxKind::IfKw => self.parse_if_statement(),
            SyntaxKind::SwitchKw => self.parse_switch_statement(),
            SyntaxKind::WhileKw => {
                self.start(SyntaxKind::WhileStatement);
                self.bump();
                self.parse_parenthesized_condition();
                self.parse_embedded_statement();
                self.finish();
            }
            SyntaxKind::DoKw => {
                self.start(SyntaxKind::DoStatement);
                self.bump();
                self.parse_embedded_statement();
                self.expect(SyntaxKind::WhileKw, "expected `while`");
                self.parse_parenthesized_condition();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish();
            }
            SyntaxKind::ForKw => self.parse_for_statement(),
            SyntaxKind::ForeachKw => self.parse_foreach_statement(),
            SyntaxKind::TryKw => self.parse_try_statement(),
            SyntaxKind::ReturnKw => self.parse_simple_statement(SyntaxKind::ReturnStatement, true),
            SyntaxKind::ThrowKw => self.parse_simple_statement(SyntaxKind::ThrowStatement, true),
            SyntaxKind::BreakKw => self.parse_simple_statement(SyntaxKind::BreakStatement, false),
            SyntaxKind::ContinueKw => {
                self.parse_simple_statement(SyntaxKind::ContinueStatement, false)
            }
            SyntaxKind::GotoKw => {
                self.start(SyntaxKind::GotoStatement);
                self.bump();
                if self.eat(SyntaxKind::CaseKw) {
                    self.parse_expression();
                } else if !self.eat(SyntaxKind::DefaultKw) {
                    self.expect_identifier("expected label");
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish();
            }
            SyntaxKind::LockKw => {
                self.start(SyntaxKind::LockStatement);
                self.bump();
                self.parse_parenthesized_condition();
                self.parse_embedded_statement();
                self.finish();
            }
            SyntaxKind::UsingKw if self.nth(1) == SyntaxKind::OpenParen => {
                self.start(SyntaxKind::UsingStatement);
                self.bump();
                self.bump();
                if self.at_declaration_header(&[SyntaxKind::Eq]) {
                    self.parse_variable_declaration();
                } else {
                    self.parse_expression();
                }
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.parse_embedded_statement();
                self.finish();
            }
            SyntaxKind::UsingKw => self.parse_local_declaration_statement(),
            SyntaxKind::CheckedKw | SyntaxKind::UncheckedKw
                if self.nth(1) == SyntaxKind::OpenBrace =>
            {
                self.start(SyntaxKind::CheckedStatement);
                self.bump();
                self.parse_block();
                self.finish();
            }
            SyntaxKind::UnsafeKw if self.nth(1) == SyntaxKind::OpenBrace => {
                self.start(SyntaxKind::UnsafeStatement);
                self.bump();
                self.parse_block();
                self.finish();
            }
            SyntaxKind::ConstKw => self.parse_local_declaration_statement(),
            SyntaxKind::Identifier
                if self.at_contextual("yield")
                    && matches!(self.nth(1), SyntaxKind::ReturnKw | SyntaxKind::BreakKw) =>
            {
                let kind = if self.nth(1) == SyntaxKind::ReturnKw {
                    SyntaxKind::YieldReturnStatement
                } else {
                    SyntaxKind::YieldBreakStatement
                };
                self.start(kind);
                self.bump_remap(SyntaxKind::YieldKw);
                self.bump();
                if kind == SyntaxKind::YieldReturnStatement {
                    self.parse_expression();
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish();
            }
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::Colon => {
                self.start(SyntaxKind::LabeledStatement);
                self.bump();
                self.bump();
                self.parse_embedded_statement();
                self.finish();
            }
            _ if self.at_local_function() => self.parse_local_function_statement(),
            _ if self.at_local_declaration() => self.parse_local_declaration_statement(),
            _ if self.can_start_expression() => {
                self.start(SyntaxKind::ExpressionStatement);
                self.parse_expression();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish();
            }
            _ => {
                self.start(SyntaxKind::Error);
                self.error_here("expected statement");
                self.bump();
                self.finish();
            }
        }
    }

    fn parse_simple_statement(&mut self, kind: SyntaxKind, with_expression: bool) {
        self.start(kind);
        self.bump();
        if with_expression && !self.at(SyntaxKind::Semicolon) && self.can_start_expression() {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        self.finish();
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::OpenParen, "expected `(`");
        self.parse_expression();
        self.expect(SyntaxKind::CloseParen, "expected `)`");
    }

    fn parse_if_statement(&mut self) {
        self.start(SyntaxKind::IfStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_embedded_statement();
        if self.at(SyntaxKind::ElseKw) {
            self.start(SyntaxKind::ElseClause);
            self.bump();
            self.parse_embedded_statement();
            self.finish();
        }
        self.finish();
    }

    fn at_switch_label(&self) -> bool {
        self.at(SyntaxKind::CaseKw)
            || (self.at(SyntaxKind::DefaultKw) && self.nth(1) == SyntaxKind::Colon)
    }

    fn parse_switch_statement(&mut self) {
        self.start(SyntaxKind::SwitchStatement);
        self.bump();
        self.parse_parenthesized_condition();
        if self.expect(SyntaxKind::OpenBrace, "expected `{`") {
            while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
                if self.at_switch_label() {
                    self.parse_switch_section();
                } else {
                    self.start(SyntaxKind::Error);
                    self.error_here("expected `case` or `default`");
                    self.bump();
                    self.finish();
                }
            }
            self.expect(SyntaxKind::CloseBrace, "expected `}`");
        }
        self.finish();
    }

    fn parse_switch_section(&mut self) {
        self.start(SyntaxKind::SwitchSection);
        while self.at_switch_label() {
            if self.at(SyntaxKind::CaseKw) {
                self.start(SyntaxKind::CaseSwitchLabel);
                self.bump();
                match self.scan_type(0) {
                    Some(end)
                        if self.nth(end) == SyntaxKind::Identifier
                            && self.nth(end + 1) == SyntaxKind::Colon =>
                    {
                        self.start(SyntaxKind::DeclarationPattern);
                        self.parse_type(TypeMode::Declaration);
                        self.bump();
                        self.finish();
                    }
                    _ => self.parse_expression(),
                }
                self.expect(SyntaxKind::Colon, "expected `:`");
                self.finish();
            } else {
                self.start(SyntaxKind::DefaultSwitchLabel);
                self.bump();
                self.bump();
                self.finish();
            }
        }
        self.parse_statements_until(|p| p.at(SyntaxKind::CloseBrace) || p.at_switch_label());
        self.finish();
    }

    fn parse_for_statement(&mut self) {
        self.start(SyntaxKind::ForStatement);
        self.bump();
        self.expect(SyntaxKind::OpenParen, "expected `(`");
        if !self.at(SyntaxKind::Semicolon) {
            if self.at_declaration_header(&[SyntaxKind::Eq, SyntaxKind::Semicolon, SyntaxKind::Comma])
            {
                self.parse_variable_declaration();
            } else {
                self.parse_expression_list();
            }
        }
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        if !self.at(SyntaxKind::CloseParen) {
            self.parse_expression_list();
        }
        self.expect(SyntaxKind::CloseParen, "expected `)`");
        self.parse_embedded_statement();
        self.finish();
    }

    fn parse_expression_list(&mut self) {
        loop {
            self.parse_expression();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
    }

    fn parse_foreach_statement(&mut self) {
        self.start(SyntaxKind::ForEachStatement);
        self.bump();
        self.expect(SyntaxKind::OpenParen, "expected `(`");
        self.parse_type(TypeMode::Declaration);
        self.expect_identifier("expected loop variable name");
        self.expect(SyntaxKind::InKw, "expected `in`");
        self.parse_expression();
        self.expect(SyntaxKind::CloseParen, "expected `)`");
        self.parse_embedded_statement();
        self.finish();
    }

    fn parse_try_statement(&mut self) {
        self.start(SyntaxKind::TryStatement);
        self.bump();
        self.parse_block();
        while self.at(SyntaxKind::CatchKw) {
            self.start(SyntaxKind::CatchClause);
            self.bump();
            if self.at(SyntaxKind::OpenParen) {
                self.start(SyntaxKind::CatchDeclaration);
                self.bump();
                self.parse_type(TypeMode::Declaration);
                if self.at(SyntaxKind::Identifier) {
                    self.bump();
                }
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.finish();
            }
            if self.at_contextual("when") {
                self.start(SyntaxKind::CatchFilterClause);
                self.bump_remap(SyntaxKind::WhenKw);
                self.parse_parenthesized_condition();
                self.finish();
            }
            self.parse_block();
            self.finish();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.start(SyntaxKind::FinallyClause);
            self.bump();
            self.parse_block();
            self.finish();
        }
        self.finish();
    }

    fn parse_local_declaration_statement(&mut self) {
        self.start(SyntaxKind::LocalDeclarationStatement);
        self.eat(SyntaxKind::UsingKw);
        self.start(SyntaxKind::ModifierList);
        while self.at(SyntaxKind::ConstKw) {
            self.bump();
        }
        self.finish();
        self.parse_variable_declaration();
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        self.finish();
    }

    fn parse_local_function_statement(&mut self) {
        self.start(SyntaxKind::LocalFunctionStatement);
        self.start(SyntaxKind::ModifierList);
        loop {
            match self.current() {
                SyntaxKind::StaticKw | SyntaxKind::UnsafeKw | SyntaxKind::ExternKw => self.bump(),
                SyntaxKind::Identifier if self.at_contextual("async") && self.nth(1) != SyntaxKind::OpenParen => {
                    self.bump_remap(SyntaxKind::AsyncKw)
                }
                _ => break,
            }
        }
        self.finish();
        self.parse_type(TypeMode::Declaration);
        self.expect_identifier("expected local function name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list();
        self.parse_constraint_clauses();
        self.parse_method_body();
        self.finish();
    }

    fn at_local_function(&self) -> bool {
        let mut n = 0;
        loop {
            match self.nth(n) {
                SyntaxKind::StaticKw | SyntaxKind::UnsafeKw | SyntaxKind::ExternKw => n += 1,
                SyntaxKind::Identifier
                    if self.nth_text(n) == "async"
                        && (self.nth(n + 1) == SyntaxKind::Identifier
                            || self.nth(n + 1).is_predefined_type_keyword()) =>
                {
                    n += 1
                }
                _ => break,
            }
        }
        if self.nth(n) == SyntaxKind::Identifier && self.nth_text(n) == "await" {
            return false;
        }
        match self.scan_type(n) {
            Some(end) => {
                self.nth(end) == SyntaxKind::Identifier
                    && matches!(self.nth(end + 1), SyntaxKind::OpenParen | SyntaxKind::Less)
            }
            None => false,
        }
    }

    fn at_local_declaration(&self) -> bool {
        let first = self.current();
        if first.is_predefined_type_keyword() {
            return self.nth(1) != SyntaxKind::Dot;
        }
        self.at_declaration_header(&[SyntaxKind::Eq, SyntaxKind::Semicolon, SyntaxKind::Comma])
    }

    /// `Type identifier` followed by one of `follow`.
    fn at_declaration_header(&self, follow: &[SyntaxKind]) -> bool {
        if self.at(SyntaxKind::Identifier) && self.nth_text(0) == "await" {
            return false;
        }
        if self.current().is_predefined_type_keyword() && self.nth(1) == SyntaxKind::Dot {
            return false;
        }
        match self.scan_type(0) {
            Some(end) => {
                self.nth(end) == SyntaxKind::Identifier && follow.contains(&self.nth(end + 1))
            }
            None => false,
        }
    }

    // --- Types ---

    fn parse_type(&mut self, mode: TypeMode) {
        let checkpoint = self.checkpoint();
        match self.current() {
            kind if kind.is_predefined_type_keyword() => {
                self.start(SyntaxKind::PredefinedType);
                self.bump();
                self.finish();
            }
            SyntaxKind::Identifier => {
                self.parse_simple_type_name();
                while (self.at(SyntaxKind::Dot) || self.at(SyntaxKind::ColonColon))
                    && self.nth(1) == SyntaxKind::Identifier
                {
                    self.start_at(checkpoint, SyntaxKind::QualifiedName);
                    self.bump();
                    self.parse_simple_type_name();
                    self.finish();
                }
            }
            _ => {
                self.error_here("expected type");
                self.builder.start_node(SyntaxKind::IdentifierName.into());
                self.missing(SyntaxKind::Identifier);
                self.finish();
                return;
            }
        }

        loop {
            if self.at(SyntaxKind::Question)
                && (mode != TypeMode::Expression || !can_start_expression(self.nth(1)))
            {
                self.start_at(checkpoint, SyntaxKind::NullableType);
                self.bump();
                self.finish();
                continue;
            }
            if mode != TypeMode::ArrayElement
                && self.at(SyntaxKind::OpenBracket)
                && matches!(self.nth(1), SyntaxKind::CloseBracket | SyntaxKind::Comma)
            {
                self.start_at(checkpoint, SyntaxKind::ArrayType);
                while self.at(SyntaxKind::OpenBracket)
                    && matches!(self.nth(1), SyntaxKind::CloseBracket | SyntaxKind::Comma)
                {
                    self.start(SyntaxKind::ArrayRankSpecifier);
                    self.bump();
                    while self.eat(SyntaxKind::Comma) {}
                    self.expect(SyntaxKind::CloseBracket, "expected `]`");
                    self.finish();
                }
                self.finish();
                continue;
            }
            break;
        }
    }

    fn parse_simple_type_name(&mut self) {
        if self.nth(1) == SyntaxKind::Less {
            self.start(SyntaxKind::GenericName);
            self.bump();
            self.parse_type_argument_list();
            self.finish();
        } else {
            self.start(SyntaxKind::IdentifierName);
            self.bump();
            self.finish();
        }
    }

    fn parse_type_argument_list(&mut self) {
        self.start(SyntaxKind::TypeArgumentList);
        self.bump();
        loop {
            self.parse_type(TypeMode::Declaration);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish();
    }

    /// Returns the index just past a type starting at the `n`th non-trivia token.
    fn scan_type(&self, n: usize) -> Option<usize> {
        let mut n = n;
        let first = self.nth(n);
        if first.is_predefined_type_keyword() {
            n += 1;
        } else if first == SyntaxKind::Identifier {
            n = self.scan_simple_name(n)?;
            while matches!(self.nth(n), SyntaxKind::Dot | SyntaxKind::ColonColon)
                && self.nth(n + 1) == SyntaxKind::Identifier
            {
                n = self.scan_simple_name(n + 1)?;
            }
        } else {
            return None;
        }

        loop {
            if self.nth(n) == SyntaxKind::Question {
                n += 1;
                continue;
            }
            if self.nth(n) == SyntaxKind::OpenBracket {
                let mut m = n + 1;
                while self.nth(m) == SyntaxKind::Comma {
                    m += 1;
                }
                if self.nth(m) == SyntaxKind::CloseBracket {
                    n = m + 1;
                    continue;
                }
            }
            break;
        }
        Some(n)
    }

    fn scan_simple_name(&self, n: usize) -> Option<usize> {
        if self.nth(n + 1) == SyntaxKind::Less {
            self.scan_type_argument_list(n + 1)
        } else {
            Some(n + 1)
        }
    }

    fn scan_type_argument_list(&self, n: usize) -> Option<usize> {
        let mut n = n + 1;
        loop {
            n = self.scan_type(n)?;
            match self.nth(n) {
                SyntaxKind::Comma => n += 1,
                SyntaxKind::Greater => return Some(n + 1),
                _ => return None,
            }
        }
    }

    // --- Expressions ---

    fn parse_expression(&mut self) {
        self.parse_expr_bp(0);
    }

    fn parse_expr_bp(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();

        loop {
            let joined = self.at_right_shift();
            let op = joined.unwrap_or_else(|| self.current());

            if op.is_assignment_operator() {
                if min_bp > 1 {
                    break;
                }
                self.start_at(checkpoint, SyntaxKind::AssignmentExpression);
                self.bump_operator(joined);
                if op == SyntaxKind::Eq && self.at(SyntaxKind::OpenBrace) {
                    self.parse_initializer_expression();
                } else {
                    self.parse_expr_bp(1);
                }
                self.finish();
                continue;
            }

            match op {
                SyntaxKind::Question => {
                    if min_bp > 2 {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::ConditionalExpression);
                    self.bump();
                    self.parse_expr_bp(2);
                    self.expect(SyntaxKind::Colon, "expected `:`");
                    self.parse_expr_bp(2);
                    self.finish();
                }
                SyntaxKind::QuestionQuestion => {
                    if min_bp > 3 {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump();
                    self.parse_expr_bp(3);
                    self.finish();
                }
                SyntaxKind::IsKw => {
                    if RELATIONAL_BP < min_bp {
                        break;
                    }
                    self.parse_is_expression(checkpoint);
                }
                SyntaxKind::AsKw => {
                    if RELATIONAL_BP < min_bp {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump();
                    self.parse_type(TypeMode::Expression);
                    self.finish();
                }
                _ => {
                    let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                        break;
                    };
                    if l_bp < min_bp {
                        break;
                    }
                    self.start_at(checkpoint, SyntaxKind::BinaryExpression);
                    self.bump_operator(joined);
                    self.parse_expr_bp(r_bp);
                    self.finish();
                }
            }
        }
    }

    fn parse_is_expression(&mut self, checkpoint: Checkpoint) {
        if self.nth(1) == SyntaxKind::Identifier && self.nth_text(1) == "not" {
            self.start_at(checkpoint, SyntaxKind::IsPatternExpression);
            self.bump();
            self.start(SyntaxKind::NotPattern);
            self.bump_remap(SyntaxKind::NotKw);
            self.parse_pattern_operand();
            self.finish();
            self.finish();
            return;
        }

        if is_constant_pattern_start(self.nth(1)) {
            self.start_at(checkpoint, SyntaxKind::IsPatternExpression);
            self.bump();
            self.parse_pattern_operand();
            self.finish();
            return;
        }

        if let Some(end) = self.scan_type(1) {
            let designation = self.nth(end) == SyntaxKind::Identifier
                && !matches!(self.nth_text(end), "and" | "or" | "when")
                && self.nth(end - 1) != SyntaxKind::Question;
            if designation {
                self.start_at(checkpoint, SyntaxKind::IsPatternExpression);
                self.bump();
                self.start(SyntaxKind::DeclarationPattern);
                self.parse_type(TypeMode::Declaration);
                self.bump();
                self.finish();
                self.finish();
                return;
            }
        }

        self.start_at(checkpoint, SyntaxKind::BinaryExpression);
        self.bump();
        self.parse_type(TypeMode::Expression);
        self.finish();
    }

    fn parse_pattern_operand(&mut self) {
        if is_constant_pattern_start(self.current()) {
            self.start(SyntaxKind::ConstantPattern);
            self.parse_unary();
            self.finish();
        } else {
            self.parse_type(TypeMode::Expression);
        }
    }

    fn parse_unary(&mut self) {
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Amp
            | SyntaxKind::Star => {
                self.start(SyntaxKind::PrefixUnaryExpression);
                self.bump();
                self.parse_unary();
                self.finish();
            }
            SyntaxKind::Identifier if self.at_contextual("await") && self.at_await_operand() => {
                self.start(SyntaxKind::AwaitExpression);
                self.bump_remap(SyntaxKind::AwaitKw);
                self.parse_unary();
                self.finish();
            }
            SyntaxKind::OpenParen if self.at_cast() => {
                self.start(SyntaxKind::CastExpression);
                self.bump();
                self.parse_type(TypeMode::Expression);
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.parse_unary();
                self.finish();
            }
            _ => self.parse_primary(),
        }
    }

    fn at_await_operand(&self) -> bool {
        let next = self.nth(1);
        can_start_expression(next)
            && !matches!(
                next,
                SyntaxKind::Plus
                    | SyntaxKind::Minus
                    | SyntaxKind::Star
                    | SyntaxKind::Amp
                    | SyntaxKind::PlusPlus
                    | SyntaxKind::MinusMinus
            )
    }

    fn at_cast(&self) -> bool {
        if self.at_parenthesized_lambda(0) {
            return false;
        }
        let Some(end) = self.scan_type(1) else {
            return false;
        };
        if self.nth(end) != SyntaxKind::CloseParen {
            return false;
        }
        let next = self.nth(end + 1);
        if self.nth(1).is_predefined_type_keyword() {
            return can_start_expression(next);
        }
        matches!(
            next,
            SyntaxKind::Identifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::VerbatimStringLiteral
                | SyntaxKind::InterpolatedStringLiteral
                | SyntaxKind::VerbatimInterpolatedStringLiteral
                | SyntaxKind::OpenParen
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::DefaultKw
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
        ) || next.is_predefined_type_keyword()
    }

    fn parse_primary(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::NumericLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::VerbatimStringLiteral
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw => {
                self.start(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::DefaultKw if self.nth(1) == SyntaxKind::OpenParen => {
                self.start(SyntaxKind::DefaultExpression);
                self.bump();
                self.bump();
                self.parse_type(TypeMode::Expression);
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.finish();
            }
            SyntaxKind::DefaultKw => {
                self.start(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::InterpolatedStringLiteral | SyntaxKind::VerbatimInterpolatedStringLiteral => {
                self.start(SyntaxKind::InterpolatedStringExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::ThisKw => {
                self.start(SyntaxKind::ThisExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::BaseKw => {
                self.start(SyntaxKind::BaseExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::OpenParen if self.at_parenthesized_lambda(0) => {
                self.parse_parenthesized_lambda(false);
                return;
            }
            SyntaxKind::OpenParen => {
                self.start(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.finish();
            }
            SyntaxKind::NewKw => self.parse_new_expression(checkpoint),
            SyntaxKind::TypeofKw => {
                self.start(SyntaxKind::TypeOfExpression);
                self.bump();
                self.expect(SyntaxKind::OpenParen, "expected `(`");
                self.parse_type(TypeMode::Expression);
                self.expect(SyntaxKind::CloseParen, "expected `)`");
                self.finish();
            }
            SyntaxKind::DelegateKw => {
                self.parse_anonymous_method(false);
                return;
            }
            SyntaxKind::ThrowKw => {
                self.start(SyntaxKind::ThrowExpression);
                self.bump();
                self.parse_expression();
                self.finish();
                return;
            }
            SyntaxKind::Identifier if self.at_contextual("async") && self.at_async_lambda() => {
                match self.nth(1) {
                    SyntaxKind::DelegateKw => self.parse_anonymous_method(true),
                    SyntaxKind::OpenParen => self.parse_parenthesized_lambda(true),
                    _ => self.parse_simple_lambda(true),
                }
                return;
            }
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::FatArrow => {
                self.parse_simple_lambda(false);
                return;
            }
            SyntaxKind::Identifier => self.parse_simple_name_expression(),
            kind if kind.is_predefined_type_keyword() => {
                self.start(SyntaxKind::PredefinedType);
                self.bump();
                self.finish();
            }
            _ => {
                self.error_here("expected expression");
                self.builder.start_node(SyntaxKind::IdentifierName.into());
                self.missing(SyntaxKind::Identifier);
                self.finish();
                return;
            }
        }

        self.parse_postfix(checkpoint);
    }

    fn parse_postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.start_at(checkpoint, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.parse_member_name();
                    self.finish();
                }
                SyntaxKind::QuestionDot => {
                    self.start_at(checkpoint, SyntaxKind::ConditionalAccessExpression);
                    self.bump();
                    self.parse_member_name();
                    self.finish();
                }
                SyntaxKind::OpenParen => {
                    self.start_at(checkpoint, SyntaxKind::InvocationExpression);
                    self.parse_argument_list();
                    self.finish();
                }
                SyntaxKind::OpenBracket => {
                    self.start_at(checkpoint, SyntaxKind::ElementAccessExpression);
                    self.start(SyntaxKind::BracketedArgumentList);
                    self.bump();
                    self.parse_arguments(SyntaxKind::CloseBracket);
                    self.expect(SyntaxKind::CloseBracket, "expected `]`");
                    self.finish();
                    self.finish();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                    self.finish();
                }
                _ => break,
            }
        }
    }

    fn parse_member_name(&mut self) {
        if self.at(SyntaxKind::Identifier) {
            self.parse_simple_name_expression();
        } else {
            self.error_here("expected member name");
            self.builder.start_node(SyntaxKind::IdentifierName.into());
            self.missing(SyntaxKind::Identifier);
            self.finish();
        }
    }

    fn parse_simple_name_expression(&mut self) {
        let generic = self.nth(1) == SyntaxKind::Less
            && self
                .scan_type_argument_list(1)
                .is_some_and(|end| is_type_argument_follower(self.nth(end)));
        if generic {
            self.start(SyntaxKind::GenericName);
            self.bump();
            self.parse_type_argument_list();
            self.finish();
        } else {
            self.start(SyntaxKind::IdentifierName);
            self.bump();
            self.finish();
        }
    }

    fn parse_new_expression(&mut self, checkpoint: Checkpoint) {
        self.bump();
        match self.current() {
            SyntaxKind::OpenParen => {
                self.start_at(checkpoint, SyntaxKind::ImplicitObjectCreationExpression);
                self.parse_argument_list();
                if self.at(SyntaxKind::OpenBrace) {
                    self.parse_initializer_expression();
                }
                self.finish();
            }
            SyntaxKind::OpenBracket => {
                self.start_at(checkpoint, SyntaxKind::ImplicitArrayCreationExpression);
                self.bump();
                while self.eat(SyntaxKind::Comma) {}
                self.expect(SyntaxKind::CloseBracket, "expected `]`");
                if self.at(SyntaxKind::OpenBrace) {
                    self.parse_initializer_expression();
                } else {
                    self.error_here("expected array initializer");
                }
                self.finish();
            }
            SyntaxKind::OpenBrace => {
                self.start_at(checkpoint, SyntaxKind::AnonymousObjectCreationExpression);
                self.bump();
                while !self.at(SyntaxKind::CloseBrace) && self.can_start_expression() {
                    self.start(SyntaxKind::AnonymousObjectMemberDeclarator);
                    if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Eq {
                        self.start(SyntaxKind::NameEquals);
                        self.bump();
                        self.bump();
                        self.finish();
                    }
                    self.parse_expression();
                    self.finish();
                    if !self.eat(SyntaxKind::Comma) {
                        break;
                    }
                }
                self.expect(SyntaxKind::CloseBrace, "expected `}`");
                self.finish();
            }
            _ => {
                let type_checkpoint = self.checkpoint();
                self.parse_type(TypeMode::ArrayElement);
                if self.at(SyntaxKind::OpenBracket) {
                    self.start_at(checkpoint, SyntaxKind::ArrayCreationExpression);
                    self.start_at(type_checkpoint, SyntaxKind::ArrayType);
                    while self.at(SyntaxKind::OpenBracket) {
                        self.start(SyntaxKind::ArrayRankSpecifier);
                        self.bump();
                        while !self.at(SyntaxKind::CloseBracket) {
                            if self.eat(SyntaxKind::Comma) {
                                continue;
                            }
                            if !self.can_start_expression() {
                                break;
                            }
                            self.parse_expression();
                        }
                        self.expect(SyntaxKind::CloseBracket, "expected `]`");
                        self.finish();
                    }
                    self.finish();
                    if self.at(SyntaxKind::OpenBrace) {
                        self.parse_initializer_expression();
                    }
                    self.finish();
                } else {
                    self.start_at(checkpoint, SyntaxKind::ObjectCreationExpression);
                    if self.at(SyntaxKind::OpenParen) {
                        self.parse_argument_list();
                    }
                    if self.at(SyntaxKind::OpenBrace) {
                        self.parse_initializer_expression();
                    } else if !self.at_previous(SyntaxKind::CloseParen) {
                        self.error_here("expected `(` or `{`");
                    }
                    self.finish();
                }
            }
        }
    }

    fn parse_initializer_expression(&mut self) {
        self.start(SyntaxKind::InitializerExpression);
        self.bump();
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::OpenBrace) {
                self.parse_initializer_expression();
            } else if self.can_start_expression() {
                self.parse_expression();
            } else {
                break;
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBrace, "expected `}`");
        self.finish();
    }

    fn parse_argument_list(&mut self) {
        if !self.at(SyntaxKind::OpenParen) {
            self.error_here("expected `(`");
            self.builder.start_node(SyntaxKind::ArgumentList.into());
            self.missing(SyntaxKind::OpenParen);
            self.missing(SyntaxKind::CloseParen);
            self.finish();
            return;
        }
        self.start(SyntaxKind::ArgumentList);
        self.bump();
        self.parse_arguments(SyntaxKind::CloseParen);
        self.expect(SyntaxKind::CloseParen, "expected `)`");
        self.finish();
    }

    fn parse_arguments(&mut self, close: SyntaxKind) {
        while !self.at(close) && !self.at(SyntaxKind::Eof) {
            let ref_kind = matches!(
                self.current(),
                SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw
            );
            let named = self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Colon;
            if !named && !ref_kind && !self.can_start_expression() {
                break;
            }

            self.start(SyntaxKind::Argument);
            if named {
                self.start(SyntaxKind::NameColon);
                self.bump();
                self.bump();
                self.finish();
            }
            if matches!(
                self.current(),
                SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw
            ) {
                self.bump();
            }
            let declaration = self.scan_type(0).is_some_and(|end| {
                self.nth(end) == SyntaxKind::Identifier
                    && matches!(self.nth(end + 1), SyntaxKind::Comma | SyntaxKind::CloseParen)
            });
            if declaration && self.at_previous(SyntaxKind::OutKw) {
                self.start(SyntaxKind::DeclarationExpression);
                self.parse_type(TypeMode::Declaration);
                self.bump();
                self.finish();
            } else {
                self.parse_expression();
            }
            self.finish();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
    }

    fn at_parenthesized_lambda(&self, n: usize) -> bool {
        if self.nth(n) != SyntaxKind::OpenParen {
            return false;
        }
        let mut depth = 0usize;
        let mut idx = n;
        loop {
            match self.nth(idx) {
                SyntaxKind::OpenParen => depth += 1,
                SyntaxKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth(idx + 1) == SyntaxKind::FatArrow;
                    }
                }
                SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::OpenBrace => return false,
                _ => {}
            }
            idx += 1;
        }
    }

    fn at_async_lambda(&self) -> bool {
        match self.nth(1) {
            SyntaxKind::DelegateKw => true,
            SyntaxKind::Identifier => self.nth(2) == SyntaxKind::FatArrow,
            SyntaxKind::OpenParen => self.at_parenthesized_lambda(1),
            _ => false,
        }
    }

    fn parse_simple_lambda(&mut self, is_async: bool) {
        self.start(SyntaxKind::SimpleLambdaExpression);
        if is_async {
            self.bump_remap(SyntaxKind::AsyncKw);
        }
        self.start(SyntaxKind::Parameter);
        self.bump();
        self.finish();
        self.expect(SyntaxKind::FatArrow, "expected `=>`");
        self.parse_lambda_body();
        self.finish();
    }

    fn parse_parenthesized_lambda(&mut self, is_async: bool) {
        self.start(SyntaxKind::ParenthesizedLambdaExpression);
        if is_async {
            self.bump_remap(SyntaxKind::AsyncKw);
        }
        self.parse_delimited_parameter_list(
            SyntaxKind::ParameterList,
            SyntaxKind::OpenParen,
            SyntaxKind::CloseParen,
            true,
        );
        self.expect(SyntaxKind::FatArrow, "expected `=>`");
        self.parse_lambda_body();
        self.finish();
    }

    fn parse_anonymous_method(&mut self, is_async: bool) {
        self.start(SyntaxKind::AnonymousMethodExpression);
        if is_async {
            self.bump_remap(SyntaxKind::AsyncKw);
        }
        self.bump();
        if self.at(SyntaxKind::OpenParen) {
            self.parse_parameter_list();
        }
        self.parse_block();
        self.finish();
    }

    fn parse_lambda_body(&mut self) {
        if self.at(SyntaxKind::OpenBrace) {
            self.parse_block();
        } else {
            self.parse_expression();
        }
    }

    // --- Token plumbing ---

    fn nth(&self, n: usize) -> SyntaxKind {
        self.significant
            .get(self.sig + n)
            .map(|&idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn nth_text(&self, n: usize) -> &'a str {
        self.significant
            .get(self.sig + n)
            .map(|&idx| self.tokens[idx].text(self.input))
            .unwrap_or("")
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::Identifier) && self.nth_text(0) == text
    }

    /// Kind of the last non-trivia token already pushed into the tree.
    fn at_previous(&self, kind: SyntaxKind) -> bool {
        self.sig
            .checked_sub(1)
            .and_then(|idx| self.significant.get(idx))
            .is_some_and(|&idx| self.tokens[idx].kind == kind)
    }

    fn can_start_expression(&self) -> bool {
        can_start_expression(self.current())
    }

    /// `>` `>` or `>` `>=` with no trivia in between.
    fn at_right_shift(&self) -> Option<SyntaxKind> {
        if self.current() != SyntaxKind::Greater {
            return None;
        }
        let first = self.tokens[*self.significant.get(self.sig)?];
        let second = self.tokens[*self.significant.get(self.sig + 1)?];
        if first.range.end != second.range.start {
            return None;
        }
        match second.kind {
            SyntaxKind::Greater => Some(SyntaxKind::RightShift),
            SyntaxKind::GreaterEq => Some(SyntaxKind::RightShiftEq),
            _ => None,
        }
    }

    fn eat_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|tok| tok.kind.is_trivia())
        {
            let tok = self.tokens[self.pos];
            self.builder.token(tok.kind.into(), tok.text(self.input));
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(tok) = self.tokens.get(self.pos).copied() {
            self.push_token(tok, tok.kind);
        }
    }

    fn bump_remap(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        if let Some(tok) = self.tokens.get(self.pos).copied() {
            self.push_token(tok, kind);
        }
    }

    fn bump_joined(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        let (Some(first), Some(second)) = (
            self.tokens.get(self.pos).copied(),
            self.tokens.get(self.pos + 1).copied(),
        ) else {
            return;
        };
        let text = &self.input[first.range.start as usize..second.range.end as usize];
        self.builder.token(kind.into(), text);
        self.pos += 2;
        self.sig += 2;
    }

    fn bump_operator(&mut self, joined: Option<SyntaxKind>) {
        match joined {
            Some(kind) => self.bump_joined(kind),
            None => self.bump(),
        }
    }

    fn push_token(&mut self, tok: Token, kind: SyntaxKind) {
        self.builder.token(kind.into(), tok.text(self.input));
        self.pos += 1;
        if !tok.kind.is_trivia() {
            self.sig += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` or inserts a zero-width token of that kind right after the previous
    /// token (trivia stays outside so node ranges remain tight).
    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            self.missing(kind);
            false
        }
    }

    fn expect_identifier(&mut self, message: &str) {
        self.expect(SyntaxKind::Identifier, message);
    }

    fn missing(&mut self, kind: SyntaxKind) {
        self.builder.token(kind.into(), "");
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn error_here(&mut self, message: &str) {
        let range = self
            .significant
            .get(self.sig)
            .map(|&idx| self.tokens[idx].range)
            .unwrap_or_else(|| TextRange::empty(self.input.len()));
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }
}

const RELATIONAL_BP: u8 = 17;

fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    // (left_bp, right_bp); larger binds tighter, right = left + 1 for left associativity.
    let bp = match op {
        SyntaxKind::PipePipe => (5, 6),
        SyntaxKind::AmpAmp => (7, 8),
        SyntaxKind::Pipe => (9, 10),
        SyntaxKind::Caret => (11, 12),
        SyntaxKind::Amp => (13, 14),
        SyntaxKind::EqEq | SyntaxKind::BangEq => (15, 16),
        SyntaxKind::Less | SyntaxKind::LessEq | SyntaxKind::Greater | SyntaxKind::GreaterEq => {
            (RELATIONAL_BP, RELATIONAL_BP + 1)
        }
        SyntaxKind::LeftShift | SyntaxKind::RightShift => (19, 20),
        SyntaxKind::Plus | SyntaxKind::Minus => (21, 22),
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (23, 24),
        _ => return None,
    };
    Some(bp)
}

fn is_constant_pattern_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NullKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NumericLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::VerbatimStringLiteral
            | SyntaxKind::Minus
    )
}

fn is_type_argument_follower(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OpenParen
            | SyntaxKind::CloseParen
            | SyntaxKind::CloseBracket
            | SyntaxKind::CloseBrace
            | SyntaxKind::Colon
            | SyntaxKind::Semicolon
            | SyntaxKind::Comma
            | SyntaxKind::Dot
            | SyntaxKind::QuestionDot
            | SyntaxKind::Question
            | SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Amp
            | SyntaxKind::OpenBracket
            | SyntaxKind::Eof
    )
}

fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_predefined_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::VerbatimStringLiteral
                | SyntaxKind::InterpolatedStringLiteral
                | SyntaxKind::VerbatimInterpolatedStringLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
                | SyntaxKind::DefaultKw
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::DelegateKw
                | SyntaxKind::ThrowKw
                | SyntaxKind::OpenParen
                | SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
                | SyntaxKind::Amp
                | SyntaxKind::Star
        )
}

/// Indented dump of a tree, one element per line. Used by tests and debugging.
pub fn debug_dump(node: &SyntaxNode) -> String {
    fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
        use std::fmt::Write;
        let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = indent);
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => go(&n, indent + 2, out),
                NodeOrToken::Token(t) => {
                    if t.kind().is_whitespace() {
                        continue;
                    }
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?} {:?}",
                        "",
                        t.kind(),
                        t.text(),
                        indent = indent + 2
                    );
                }
            }
        }
    }

    let mut out = String::new();
    go(node, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(text: &str) -> SyntaxNode {
        let parse = parse_csharp(text);
        assert_eq!(parse.errors, Vec::<ParseError>::new(), "{}", text);
        let root = parse.syntax();
        assert_eq!(root.text().to_string(), text);
        root
    }

    fn find(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
        root.descendants()
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind:?} in\n{}", debug_dump(root)))
    }

    #[test]
    fn node_ranges_exclude_surrounding_trivia() {
        let text = "class C\n{\n    void M()\n    {\n        // c\n        x = 1; // t\n    }\n}\n";
        let root = parse_ok(text);
        let stmt = find(&root, SyntaxKind::ExpressionStatement);
        assert_eq!(stmt.text().to_string(), "x = 1;");
        let method = find(&root, SyntaxKind::MethodDeclaration);
        assert!(method.text().to_string().starts_with("void M()"));
        assert!(method.text().to_string().ends_with('}'));
    }

    #[test]
    fn binary_precedence_and_associativity() {
        let root = parse_ok("class C { void M() { x = a + b * c - d; } }");
        let assignment = find(&root, SyntaxKind::AssignmentExpression);
        let binaries: Vec<String> = assignment
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::BinaryExpression)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(binaries, vec!["a + b * c - d", "a + b * c", "b * c"]);
    }

    #[test]
    fn generic_invocation_versus_comparison() {
        let root = parse_ok("class C { void M() { F<int>(x); var b = a < c && d > e; } }");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::GenericName));
        let and = root
            .descendants()
            .find(|n| {
                n.kind() == SyntaxKind::BinaryExpression && n.text().to_string().contains("&&")
            })
            .expect("&& expression");
        assert_eq!(and.text().to_string(), "a < c && d > e");
    }

    #[test]
    fn right_shift_is_joined() {
        let root = parse_ok("class C { void M() { x = y >> 2; x >>= 1; List<List<int>> l; } }");
        let kinds: Vec<SyntaxKind> = root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .filter(|k| {
                matches!(
                    k,
                    SyntaxKind::RightShift | SyntaxKind::RightShiftEq | SyntaxKind::Greater
                )
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::RightShift,
                SyntaxKind::RightShiftEq,
                SyntaxKind::Greater,
                SyntaxKind::Greater
            ]
        );
    }

    #[test]
    fn local_declarations_and_functions() {
        let root = parse_ok(
            "class C { void M() { var p = new Point(); int[] a = { 1 }; List<int> l; int F(int x) => x; } }",
        );
        assert_eq!(
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::LocalDeclarationStatement)
                .count(),
            3
        );
        assert!(root
            .descendants()
            .any(|n| n.kind() == SyntaxKind::LocalFunctionStatement));
    }

    #[test]
    fn members_of_every_kind() {
        let text = r#"
namespace N
{
    using System;

    [Serializable, Obsolete("x")]
    public partial class C<T> : Base, IFoo where T : class, new()
    {
        public const int K = 1;
        private int _a, _b = 2;
        public event EventHandler Changed;
        public C(int a) : base(a) { }
        ~C() { }
        public delegate void D(int x);
        public int P { get; private set; } = 3;
        public int this[int i] => i;
        public static C operator +(C a, C b) => a;
        public static implicit operator int(C c) => 0;
        protected internal async Task<int> M<U>(ref int x, params int[] rest) where U : struct { return await F(); }
        enum E { A, B = 2, }
        interface I { void X(); }
        struct S { }
    }
}
"#;
        let root = parse_ok(text);
        for kind in [
            SyntaxKind::NamespaceDeclaration,
            SyntaxKind::UsingDirective,
            SyntaxKind::AttributeList,
            SyntaxKind::ClassDeclaration,
            SyntaxKind::TypeParameterConstraintClause,
            SyntaxKind::ConstructorConstraint,
            SyntaxKind::FieldDeclaration,
            SyntaxKind::EventFieldDeclaration,
            SyntaxKind::ConstructorDeclaration,
            SyntaxKind::ConstructorInitializer,
            SyntaxKind::DestructorDeclaration,
            SyntaxKind::DelegateDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::IndexerDeclaration,
            SyntaxKind::OperatorDeclaration,
            SyntaxKind::ConversionOperatorDeclaration,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::AwaitExpression,
            SyntaxKind::EnumDeclaration,
            SyntaxKind::InterfaceDeclaration,
            SyntaxKind::StructDeclaration,
        ] {
            find(&root, kind);
        }
        let method = find(&root, SyntaxKind::MethodDeclaration);
        let modifiers = find(&method, SyntaxKind::ModifierList);
        assert_eq!(modifiers.text().to_string(), "protected internal async");
    }

    #[test]
    fn statements() {
        let text = r#"class C { void M() {
    if (a) b(); else if (c) { } else d();
    while (x) { }
    do x++; while (y);
    for (int i = 0; i < n; i++) { }
    foreach (var item in items) { }
    switch (k) { case 1: case 2: break; default: return; }
    try { } catch (Exception e) when (e != null) { } finally { }
    using (var r = Open()) { }
    using var s = Open();
    lock (o) { }
    label: goto label;
    throw new E();
} }"#;
        let root = parse_ok(text);
        for kind in [
            SyntaxKind::IfStatement,
            SyntaxKind::ElseClause,
            SyntaxKind::WhileStatement,
            SyntaxKind::DoStatement,
            SyntaxKind::ForStatement,
            SyntaxKind::ForEachStatement,
            SyntaxKind::SwitchStatement,
            SyntaxKind::SwitchSection,
            SyntaxKind::CaseSwitchLabel,
            SyntaxKind::DefaultSwitchLabel,
            SyntaxKind::TryStatement,
            SyntaxKind::CatchFilterClause,
            SyntaxKind::FinallyClause,
            SyntaxKind::UsingStatement,
            SyntaxKind::LockStatement,
            SyntaxKind::LabeledStatement,
            SyntaxKind::GotoStatement,
            SyntaxKind::ThrowStatement,
        ] {
            find(&root, kind);
        }
        let sections = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::SwitchSection)
            .count();
        assert_eq!(sections, 2);
    }

    #[test]
    fn patterns_casts_and_lambdas() {
        let root = parse_ok(
            "class C { void M() { var a = x is null; var b = x is not null; var c = o is string s; var d = o is string ? 1 : 2; var e = (int)f; var g = (a) + b; F(x => x, (y, z) => { }, async () => await T()); } }",
        );
        assert_eq!(
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::IsPatternExpression)
                .count(),
            3
        );
        find(&root, SyntaxKind::NotPattern);
        find(&root, SyntaxKind::DeclarationPattern);
        find(&root, SyntaxKind::ConditionalExpression);
        assert_eq!(
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::CastExpression)
                .count(),
            1
        );
        find(&root, SyntaxKind::SimpleLambdaExpression);
        assert_eq!(
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::ParenthesizedLambdaExpression)
                .count(),
            2
        );
    }

    #[test]
    fn object_and_collection_initializers() {
        let root = parse_ok("class C { void M() { var p = new Point { X = 1, Y = 2 }; var a = new[] { 1, 2 }; var b = new int[3]; var o = new { A = 1 }; } }");
        find(&root, SyntaxKind::ObjectCreationExpression);
        find(&root, SyntaxKind::InitializerExpression);
        find(&root, SyntaxKind::ImplicitArrayCreationExpression);
        find(&root, SyntaxKind::ArrayCreationExpression);
        find(&root, SyntaxKind::AnonymousObjectCreationExpression);
    }

    #[test]
    fn missing_tokens_are_zero_width() {
        let parse = parse_csharp("class C { void M() { x = 1 } }");
        assert_eq!(parse.errors.len(), 1);
        let root = parse.syntax();
        let stmt = find(&root, SyntaxKind::ExpressionStatement);
        let semicolon = stmt
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Semicolon)
            .expect("inserted semicolon");
        assert_eq!(semicolon.text(), "");
        assert_eq!(stmt.text().to_string(), "x = 1");
    }

    #[test]
    fn garbage_never_loops() {
        for text in [
            "}}} class",
            "class C { void M() { ) ] } }",
            "class C { int }",
            "namespace",
            "class C { void M() { if ( } }",
            "class C { void M() { new } }",
        ] {
            let parse = parse_csharp(text);
            assert_eq!(parse.syntax().text().to_string(), text);
            assert!(!parse.errors.is_empty(), "{text}");
        }
    }
}
