//! Wrappers over whole classes of node kinds.

use super::{support, AstNode};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

macro_rules! class_node {
    ($(#[$meta:meta])* $name:ident, $pred:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind.$pred()
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }

        impl $name {
            pub fn kind(&self) -> SyntaxKind {
                self.syntax.kind()
            }
        }
    };
}

class_node!(
    /// Any expression (type syntax included).
    Expression,
    is_expression
);
class_node!(
    /// Any statement.
    Statement,
    is_statement
);
class_node!(
    /// Any type syntax.
    TypeSyntax,
    is_type
);
class_node!(
    /// Any member of a compilation unit, namespace or type.
    MemberDeclaration,
    is_member_declaration
);
class_node!(
    /// Class, struct, interface, enum or delegate declaration.
    TypeDeclaration,
    is_type_declaration
);

impl MemberDeclaration {
    pub fn attribute_lists(&self) -> impl Iterator<Item = super::AttributeList> + '_ {
        support::children(&self.syntax)
    }

    pub fn modifiers(&self) -> Option<super::ModifierList> {
        support::child(&self.syntax)
    }

    /// The declared name, when the member has one.
    pub fn identifier(&self) -> Option<SyntaxToken> {
        match self.kind() {
            SyntaxKind::FieldDeclaration | SyntaxKind::EventFieldDeclaration => self
                .syntax
                .children()
                .find(|n| n.kind() == SyntaxKind::VariableDeclaration)
                .and_then(|decl| {
                    decl.children()
                        .find(|n| n.kind() == SyntaxKind::VariableDeclarator)
                })
                .and_then(|declarator| support::ident_token(&declarator)),
            _ => support::ident_token(&self.syntax),
        }
    }

    /// Block body of a method-like member.
    pub fn body(&self) -> Option<super::Block> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<super::ArrowExpressionClause> {
        support::child(&self.syntax)
    }

    pub fn is_type_declaration(&self) -> bool {
        self.kind().is_type_declaration()
    }
}

impl TypeDeclaration {
    pub fn attribute_lists(&self) -> impl Iterator<Item = super::AttributeList> + '_ {
        support::children(&self.syntax)
    }

    pub fn modifiers(&self) -> Option<super::ModifierList> {
        support::child(&self.syntax)
    }

    pub fn keyword(&self) -> Option<SyntaxToken> {
        support::token_where(&self.syntax, |k| {
            matches!(
                k,
                SyntaxKind::ClassKw
                    | SyntaxKind::StructKw
                    | SyntaxKind::InterfaceKw
                    | SyntaxKind::EnumKw
                    | SyntaxKind::DelegateKw
            )
        })
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn type_parameter_list(&self) -> Option<super::TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn base_list(&self) -> Option<super::BaseList> {
        support::child(&self.syntax)
    }

    pub fn constraint_clauses(
        &self,
    ) -> impl Iterator<Item = super::TypeParameterConstraintClause> + '_ {
        support::children(&self.syntax)
    }

    pub fn open_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::OpenBrace)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::CloseBrace)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        support::children(&self.syntax)
    }
}

impl Expression {
    /// Strips any number of enclosing parentheses.
    pub fn walk_down_parentheses(&self) -> Expression {
        let mut current = self.clone();
        while current.kind() == SyntaxKind::ParenthesizedExpression {
            match support::child::<Expression>(current.syntax()) {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// The outermost parenthesized expression wrapping `self` (or `self`).
    pub fn walk_up_parentheses(&self) -> Expression {
        let mut current = self.clone();
        while let Some(parent) = current
            .syntax()
            .parent()
            .filter(|p| p.kind() == SyntaxKind::ParenthesizedExpression)
            .and_then(Expression::cast)
        {
            current = parent;
        }
        current
    }
}

impl Statement {
    /// True for the body of an `if`/`else`/loop/`using`/`lock` (`if (x) Foo();`).
    pub fn is_embedded(&self) -> bool {
        self.syntax.parent().is_some_and(|parent| {
            matches!(
                parent.kind(),
                SyntaxKind::IfStatement
                    | SyntaxKind::ElseClause
                    | SyntaxKind::WhileStatement
                    | SyntaxKind::DoStatement
                    | SyntaxKind::ForStatement
                    | SyntaxKind::ForEachStatement
                    | SyntaxKind::UsingStatement
                    | SyntaxKind::LockStatement
            )
        })
    }
}
