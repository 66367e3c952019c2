use sharp_syntax::{
    escape_regular_string_text, interpolated_string_parts, regular_string_value,
    string_literal_inner_text, verbatim_string_value, AstNode, BinaryExpression, Expression,
    InterpolatedPart, SyntaxKind, SyntaxToken, TextRange,
};

use super::{identity_eq, BinaryExpressionInfo, MatchOptions};
use crate::error::InfoError;
use crate::semantic::SemanticModel;

/// A `+` chain whose every link the semantic model types as `string`.
#[derive(Debug, Clone, Default)]
pub struct StringConcatenationExpressionInfo {
    binary: Option<BinaryExpression>,
    expressions: Vec<Expression>,
    span: Option<TextRange>,
}

identity_eq!(StringConcatenationExpressionInfo, binary);

/// Recognises the chain rooted at `binary`. With `span`, only the operands it fully
/// covers are kept, and at least two must remain.
pub fn string_concatenation_expression_info(
    binary: &BinaryExpression,
    model: &dyn SemanticModel,
    span: Option<TextRange>,
) -> StringConcatenationExpressionInfo {
    let info = super::binary_expression_info(binary.syntax(), MatchOptions::strict());
    if info.kind() != Some(SyntaxKind::Plus) {
        return StringConcatenationExpressionInfo::default();
    }

    // Every `+` in the chain must be a string concatenation, not an arithmetic addition.
    let mut current = Some(binary.clone());
    while let Some(link) = current {
        if !model.type_of(link.syntax()).is_some_and(|t| t.is_string()) {
            return StringConcatenationExpressionInfo::default();
        }
        current = link
            .left()
            .and_then(|left| BinaryExpression::cast(left.syntax().clone()))
            .filter(|left| left.operator_kind() == SyntaxKind::Plus);
    }

    let mut expressions = info.expressions(true);
    if let Some(span) = span {
        expressions.retain(|e| span.contains_range(TextRange::from(e.syntax().text_range())));
        if expressions.len() < 2 {
            return StringConcatenationExpressionInfo::default();
        }
    }
    StringConcatenationExpressionInfo {
        binary: Some(binary.clone()),
        expressions,
        span,
    }
}

/// Aggregate classification of a concatenation's operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringConcatenationAnalysis {
    regular_literals: usize,
    verbatim_literals: usize,
    regular_interpolated: usize,
    verbatim_interpolated: usize,
    others: usize,
}

impl StringConcatenationAnalysis {
    pub fn contains_string_literal(&self) -> bool {
        self.regular_literals + self.verbatim_literals > 0
    }

    pub fn contains_interpolated(&self) -> bool {
        self.regular_interpolated + self.verbatim_interpolated > 0
    }

    pub fn contains_non_literal(&self) -> bool {
        self.others > 0
    }

    pub fn contains_verbatim(&self) -> bool {
        self.verbatim_literals + self.verbatim_interpolated > 0
    }

    pub fn contains_regular(&self) -> bool {
        self.regular_literals + self.regular_interpolated > 0
    }

    fn total(&self) -> usize {
        self.regular_literals
            + self.verbatim_literals
            + self.regular_interpolated
            + self.verbatim_interpolated
            + self.others
    }

    pub fn all_verbatim(&self) -> bool {
        self.total() > 0 && self.verbatim_literals + self.verbatim_interpolated == self.total()
    }

    pub fn all_regular(&self) -> bool {
        self.total() > 0 && self.regular_literals + self.regular_interpolated == self.total()
    }

    pub fn all_string_literals(&self) -> bool {
        self.total() > 0 && self.regular_literals + self.verbatim_literals == self.total()
    }

    /// Number of operands that are string literals or interpolated strings.
    pub fn literal_count(&self) -> usize {
        self.total() - self.others
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OperandKind {
    RegularLiteral,
    VerbatimLiteral,
    RegularInterpolated,
    VerbatimInterpolated,
    Other,
}

fn operand_token(expression: &Expression) -> Option<SyntaxToken> {
    match expression.kind() {
        SyntaxKind::LiteralExpression | SyntaxKind::InterpolatedStringExpression => {
            sharp_syntax::first_token(expression.syntax())
        }
        _ => None,
    }
}

fn classify(expression: &Expression) -> OperandKind {
    match operand_token(expression).map(|t| t.kind()) {
        Some(SyntaxKind::StringLiteral) => OperandKind::RegularLiteral,
        Some(SyntaxKind::VerbatimStringLiteral) => OperandKind::VerbatimLiteral,
        Some(SyntaxKind::InterpolatedStringLiteral) => OperandKind::RegularInterpolated,
        Some(SyntaxKind::VerbatimInterpolatedStringLiteral) => OperandKind::VerbatimInterpolated,
        _ => OperandKind::Other,
    }
}

impl StringConcatenationExpressionInfo {
    pub fn success(&self) -> bool {
        self.binary.is_some()
    }

    pub fn binary(&self) -> Option<&BinaryExpression> {
        self.binary.as_ref()
    }

    /// Operands, left to right.
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn span(&self) -> Option<TextRange> {
        self.span
    }

    /// Source range covered by the kept operands.
    pub fn range(&self) -> Option<TextRange> {
        let first = self.expressions.first()?;
        let last = self.expressions.last()?;
        Some(TextRange {
            start: u32::from(first.syntax().text_range().start()),
            end: u32::from(last.syntax().text_range().end()),
        })
    }

    pub fn analyze(&self) -> StringConcatenationAnalysis {
        let mut analysis = StringConcatenationAnalysis::default();
        for expression in &self.expressions {
            match classify(expression) {
                OperandKind::RegularLiteral => analysis.regular_literals += 1,
                OperandKind::VerbatimLiteral => analysis.verbatim_literals += 1,
                OperandKind::RegularInterpolated => analysis.regular_interpolated += 1,
                OperandKind::VerbatimInterpolated => analysis.verbatim_interpolated += 1,
                OperandKind::Other => analysis.others += 1,
            }
        }
        analysis
    }

    /// One string literal holding the concatenated value.
    pub fn to_string_literal_text(&self) -> Result<String, InfoError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("StringConcatenationExpressionInfo"));
        }
        let analysis = self.analyze();
        if !analysis.all_string_literals() {
            return Err(InfoError::NonLiteralOperand);
        }
        let mut out = String::new();
        if analysis.all_verbatim() {
            out.push_str("@\"");
            for expression in &self.expressions {
                out.push_str(&inner_text(expression));
            }
        } else {
            out.push('"');
            for expression in &self.expressions {
                match classify(expression) {
                    OperandKind::RegularLiteral => out.push_str(&inner_text(expression)),
                    _ => out.push_str(&escape_regular_string_text(&verbatim_string_value(
                        &inner_text(expression),
                    ))),
                }
            }
        }
        out.push('"');
        Ok(out)
    }

    /// One verbatim literal whose line breaks are written as real line breaks.
    pub fn to_multiline_string_literal_text(&self) -> Result<String, InfoError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("StringConcatenationExpressionInfo"));
        }
        if !self.analyze().all_string_literals() {
            return Err(InfoError::NonLiteralOperand);
        }
        let mut value = String::new();
        for expression in &self.expressions {
            let inner = inner_text(expression);
            match classify(expression) {
                OperandKind::RegularLiteral => value.push_str(&regular_string_value(&inner)),
                _ => value.push_str(&verbatim_string_value(&inner)),
            }
        }
        Ok(format!("@\"{}\"", value.replace('"', "\"\"")))
    }

    /// One interpolated string; non-literal operands become interpolations.
    pub fn to_interpolated_string_text(&self) -> Result<String, InfoError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("StringConcatenationExpressionInfo"));
        }
        let analysis = self.analyze();
        let verbatim = analysis.contains_verbatim() && !analysis.contains_regular();
        let mut out = String::from(if verbatim { "$@\"" } else { "$\"" });
        for expression in &self.expressions {
            let inner = inner_text(expression);
            match classify(expression) {
                OperandKind::RegularLiteral => out.push_str(&escape_braces(&inner)),
                OperandKind::VerbatimLiteral if verbatim => out.push_str(&escape_braces(&inner)),
                OperandKind::VerbatimLiteral => out.push_str(&escape_braces(
                    &escape_regular_string_text(&verbatim_string_value(&inner)),
                )),
                OperandKind::RegularInterpolated => out.push_str(&inner),
                OperandKind::VerbatimInterpolated if verbatim => out.push_str(&inner),
                OperandKind::VerbatimInterpolated => {
                    for part in interpolated_string_parts(&inner, true) {
                        match part {
                            InterpolatedPart::Text(text) => {
                                out.push_str(&escape_regular_string_text(&verbatim_string_value(
                                    &text,
                                )))
                            }
                            InterpolatedPart::Interpolation(hole) => {
                                out.push('{');
                                out.push_str(&hole);
                                out.push('}');
                            }
                        }
                    }
                }
                OperandKind::Other => {
                    let text = expression.syntax().text().to_string();
                    out.push('{');
                    if expression.kind() == SyntaxKind::ConditionalExpression {
                        out.push('(');
                        out.push_str(&text);
                        out.push(')');
                    } else {
                        out.push_str(&text);
                    }
                    out.push('}');
                }
            }
        }
        out.push('"');
        Ok(out)
    }
}

fn inner_text(expression: &Expression) -> String {
    operand_token(expression)
        .map(|t| string_literal_inner_text(t.text()).to_string())
        .unwrap_or_default()
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}
