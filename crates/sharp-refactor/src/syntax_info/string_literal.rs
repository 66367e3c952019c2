use sharp_syntax::{
    regular_string_value, string_literal_inner_text, verbatim_string_value, AstNode,
    LiteralExpression, SyntaxKind, SyntaxNode, SyntaxToken,
};

use super::{candidate, check, identity_eq, MatchOptions};

/// A regular (`"…"`) or verbatim (`@"…"`) string literal.
#[derive(Debug, Clone, Default)]
pub struct StringLiteralExpressionInfo {
    expression: Option<LiteralExpression>,
    token: Option<SyntaxToken>,
}

identity_eq!(StringLiteralExpressionInfo, expression);

pub fn string_literal_expression_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> StringLiteralExpressionInfo {
    let Some(expression) =
        candidate(node, options).and_then(|e| LiteralExpression::cast(e.syntax().clone()))
    else {
        return StringLiteralExpressionInfo::default();
    };
    match expression.token() {
        Some(token)
            if token.kind().is_string_literal_token()
                && check(Some(expression.syntax()), options.allow_missing) =>
        {
            StringLiteralExpressionInfo {
                expression: Some(expression),
                token: Some(token),
            }
        }
        _ => StringLiteralExpressionInfo::default(),
    }
}

impl StringLiteralExpressionInfo {
    pub fn success(&self) -> bool {
        self.expression.is_some()
    }

    pub fn expression(&self) -> Option<&LiteralExpression> {
        self.expression.as_ref()
    }

    pub fn token(&self) -> Option<&SyntaxToken> {
        self.token.as_ref()
    }

    pub fn is_verbatim(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| t.kind() == SyntaxKind::VerbatimStringLiteral)
    }

    pub fn is_regular(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| t.kind() == SyntaxKind::StringLiteral)
    }

    /// Source text between the quotes.
    pub fn inner_text(&self) -> String {
        self.token
            .as_ref()
            .map(|t| string_literal_inner_text(t.text()).to_string())
            .unwrap_or_default()
    }

    /// The literal's value with escapes decoded.
    pub fn value_text(&self) -> String {
        let inner = self.inner_text();
        if self.is_verbatim() {
            verbatim_string_value(&inner)
        } else {
            regular_string_value(&inner)
        }
    }

    /// `\…` in a regular literal, `""` in a verbatim one.
    pub fn contains_escape_sequence(&self) -> bool {
        let inner = self.inner_text();
        if self.is_verbatim() {
            inner.contains("\"\"")
        } else {
            inner.contains('\\')
        }
    }

    pub fn contains_linefeed(&self) -> bool {
        self.success() && self.value_text().contains('\n')
    }
}
