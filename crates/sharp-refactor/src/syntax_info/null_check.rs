use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use sharp_syntax::{
    AstNode, BinaryExpression, ConstantPattern, Expression, IsPatternExpression,
    MemberAccessExpression, SyntaxKind, SyntaxNode, UnaryExpression,
};

use super::{candidate, check, identity_eq, operand, MatchOptions};
use crate::error::InfoError;
use crate::semantic::SemanticModel;

/// Set of null-check shapes to recognise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NullCheckStyles(u16);

impl NullCheckStyles {
    pub const NONE: Self = Self(0);
    /// `x == null`, `null == x`
    pub const EQUALS_TO_NULL: Self = Self(1);
    /// `x != null`, `null != x`
    pub const NOT_EQUALS_TO_NULL: Self = Self(1 << 1);
    /// `x is null`
    pub const IS_NULL: Self = Self(1 << 2);
    /// `!(x is null)`, `x is not null`
    pub const NOT_IS_NULL: Self = Self(1 << 3);
    /// `x.HasValue`, `x.HasValue == true`, `x.HasValue != false`
    pub const HAS_VALUE: Self = Self(1 << 4);
    /// `!x.HasValue`, `x.HasValue == false`, `x.HasValue != true`
    pub const NOT_HAS_VALUE: Self = Self(1 << 5);

    pub const COMPARISON_TO_NULL: Self = Self(Self::EQUALS_TO_NULL.0 | Self::NOT_EQUALS_TO_NULL.0);
    pub const IS_PATTERN: Self = Self(Self::IS_NULL.0 | Self::NOT_IS_NULL.0);
    pub const HAS_VALUE_PROPERTY: Self = Self(Self::HAS_VALUE.0 | Self::NOT_HAS_VALUE.0);
    pub const CHECKING_NULL: Self =
        Self(Self::EQUALS_TO_NULL.0 | Self::IS_NULL.0 | Self::NOT_HAS_VALUE.0);
    pub const CHECKING_NOT_NULL: Self =
        Self(Self::NOT_EQUALS_TO_NULL.0 | Self::NOT_IS_NULL.0 | Self::HAS_VALUE.0);
    pub const ALL: Self = Self(Self::CHECKING_NULL.0 | Self::CHECKING_NOT_NULL.0);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for NullCheckStyles {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NullCheckStyles {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for NullCheckStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(NullCheckStyles, &str); 6] = [
            (NullCheckStyles::EQUALS_TO_NULL, "EQUALS_TO_NULL"),
            (NullCheckStyles::NOT_EQUALS_TO_NULL, "NOT_EQUALS_TO_NULL"),
            (NullCheckStyles::IS_NULL, "IS_NULL"),
            (NullCheckStyles::NOT_IS_NULL, "NOT_IS_NULL"),
            (NullCheckStyles::HAS_VALUE, "HAS_VALUE"),
            (NullCheckStyles::NOT_HAS_VALUE, "NOT_HAS_VALUE"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(style, _)| self.contains(*style))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NullCheckStyles(NONE)")
        } else {
            write!(f, "NullCheckStyles({})", names.join(" | "))
        }
    }
}

/// A recognised null check: the checked expression plus the style it was written in.
#[derive(Debug, Clone, Default)]
pub struct NullCheckExpressionInfo {
    node: Option<Expression>,
    expression: Option<Expression>,
    style: NullCheckStyles,
}

identity_eq!(NullCheckExpressionInfo, node);

/// Syntactic recognition. `HasValue` styles need to know the receiver is a nullable
/// value type; requesting any of them here is an error.
pub fn null_check_expression_info(
    node: &SyntaxNode,
    styles: NullCheckStyles,
    options: MatchOptions,
) -> Result<NullCheckExpressionInfo, InfoError> {
    if styles.intersects(NullCheckStyles::HAS_VALUE_PROPERTY) {
        return Err(InfoError::SemanticModelRequired("NullCheckStyles::HAS_VALUE_PROPERTY"));
    }
    Ok(create(node, styles, options, None))
}

pub fn null_check_expression_info_with_model(
    node: &SyntaxNode,
    model: &dyn SemanticModel,
    styles: NullCheckStyles,
    options: MatchOptions,
) -> NullCheckExpressionInfo {
    create(node, styles, options, Some(model))
}

impl NullCheckExpressionInfo {
    pub fn success(&self) -> bool {
        self.node.is_some()
    }

    /// The whole null-check expression.
    pub fn node(&self) -> Option<&Expression> {
        self.node.as_ref()
    }

    /// The expression being checked.
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    pub fn style(&self) -> NullCheckStyles {
        self.style
    }

    pub fn is_checking_null(&self) -> bool {
        self.style.intersects(NullCheckStyles::CHECKING_NULL)
    }

    pub fn is_checking_not_null(&self) -> bool {
        self.style.intersects(NullCheckStyles::CHECKING_NOT_NULL)
    }
}

fn create(
    node: &SyntaxNode,
    styles: NullCheckStyles,
    options: MatchOptions,
    model: Option<&dyn SemanticModel>,
) -> NullCheckExpressionInfo {
    let Some(expression) = candidate(node, options) else {
        return NullCheckExpressionInfo::default();
    };
    if !check(Some(expression.syntax()), options.allow_missing) {
        return NullCheckExpressionInfo::default();
    }
    let matched = match expression.kind() {
        SyntaxKind::BinaryExpression => {
            BinaryExpression::cast(expression.syntax().clone())
                .and_then(|binary| match_binary(&binary, styles, options, model))
        }
        SyntaxKind::IsPatternExpression => {
            IsPatternExpression::cast(expression.syntax().clone())
                .and_then(|is| match_is_pattern(&is, styles, options))
        }
        SyntaxKind::PrefixUnaryExpression => UnaryExpression::cast(expression.syntax().clone())
            .and_then(|unary| match_logical_not(&unary, styles, options, model)),
        SyntaxKind::MemberAccessExpression if styles.contains(NullCheckStyles::HAS_VALUE) => {
            has_value_receiver(expression.syntax(), model)
                .map(|receiver| (receiver, NullCheckStyles::HAS_VALUE))
        }
        _ => None,
    };
    match matched {
        Some((checked, style)) => NullCheckExpressionInfo {
            node: Some(expression),
            expression: Some(checked),
            style,
        },
        None => NullCheckExpressionInfo::default(),
    }
}

fn match_binary(
    binary: &BinaryExpression,
    styles: NullCheckStyles,
    options: MatchOptions,
    model: Option<&dyn SemanticModel>,
) -> Option<(Expression, NullCheckStyles)> {
    let equals = match binary.operator_kind() {
        SyntaxKind::EqEq => true,
        SyntaxKind::BangEq => false,
        _ => return None,
    };
    let left = operand(binary.left(), options)?;
    let right = operand(binary.right(), options)?;

    let (null_style, has_value_on_true) = if equals {
        (NullCheckStyles::EQUALS_TO_NULL, NullCheckStyles::HAS_VALUE)
    } else {
        (NullCheckStyles::NOT_EQUALS_TO_NULL, NullCheckStyles::NOT_HAS_VALUE)
    };

    if styles.contains(null_style) {
        if is_null_literal(&right) {
            return Some((left, null_style));
        }
        if is_null_literal(&left) {
            return Some((right, null_style));
        }
    }

    // `x.HasValue == true`, `x.HasValue != false`, ...
    let literal = bool_literal(&right)?;
    let style = if literal {
        has_value_on_true
    } else if has_value_on_true == NullCheckStyles::HAS_VALUE {
        NullCheckStyles::NOT_HAS_VALUE
    } else {
        NullCheckStyles::HAS_VALUE
    };
    if !styles.contains(style) {
        return None;
    }
    has_value_receiver(left.syntax(), model).map(|receiver| (receiver, style))
}

fn match_is_pattern(
    is: &IsPatternExpression,
    styles: NullCheckStyles,
    options: MatchOptions,
) -> Option<(Expression, NullCheckStyles)> {
    let expression = operand(is.expression(), options)?;
    let pattern = is.pattern()?;
    match pattern.kind() {
        SyntaxKind::ConstantPattern if styles.contains(NullCheckStyles::IS_NULL) => {
            is_null_pattern(&pattern).then_some((expression, NullCheckStyles::IS_NULL))
        }
        SyntaxKind::NotPattern if styles.contains(NullCheckStyles::NOT_IS_NULL) => {
            let inner = pattern.children().find(|n| n.kind() == SyntaxKind::ConstantPattern)?;
            is_null_pattern(&inner).then_some((expression, NullCheckStyles::NOT_IS_NULL))
        }
        _ => None,
    }
}

fn match_logical_not(
    unary: &UnaryExpression,
    styles: NullCheckStyles,
    options: MatchOptions,
    model: Option<&dyn SemanticModel>,
) -> Option<(Expression, NullCheckStyles)> {
    if unary.operator_kind() != SyntaxKind::Bang {
        return None;
    }
    let operand = unary.operand()?.walk_down_parentheses();
    match operand.kind() {
        SyntaxKind::IsPatternExpression if styles.contains(NullCheckStyles::NOT_IS_NULL) => {
            let is = IsPatternExpression::cast(operand.syntax().clone())?;
            let (expression, style) = match_is_pattern(&is, NullCheckStyles::IS_NULL, options)?;
            (style == NullCheckStyles::IS_NULL).then_some((expression, NullCheckStyles::NOT_IS_NULL))
        }
        SyntaxKind::MemberAccessExpression if styles.contains(NullCheckStyles::NOT_HAS_VALUE) => {
            has_value_receiver(operand.syntax(), model)
                .map(|receiver| (receiver, NullCheckStyles::NOT_HAS_VALUE))
        }
        _ => None,
    }
}

/// Receiver of `receiver.HasValue` when the model reports a nullable value type.
fn has_value_receiver(node: &SyntaxNode, model: Option<&dyn SemanticModel>) -> Option<Expression> {
    let model = model?;
    let access = MemberAccessExpression::cast(node.clone())?;
    if access.is_conditional() || access.name_text().as_deref() != Some("HasValue") {
        return None;
    }
    let receiver = access.expression()?;
    model
        .type_of(receiver.syntax())
        .is_some_and(|ty| ty.is_nullable_value_type())
        .then_some(receiver)
}

fn is_null_literal(expression: &Expression) -> bool {
    literal_token_kind(expression) == Some(SyntaxKind::NullKw)
}

fn bool_literal(expression: &Expression) -> Option<bool> {
    match literal_token_kind(expression)? {
        SyntaxKind::TrueKw => Some(true),
        SyntaxKind::FalseKw => Some(false),
        _ => None,
    }
}

fn literal_token_kind(expression: &Expression) -> Option<SyntaxKind> {
    if expression.kind() != SyntaxKind::LiteralExpression {
        return None;
    }
    sharp_syntax::first_token(expression.syntax()).map(|t| t.kind())
}

fn is_null_pattern(pattern: &SyntaxNode) -> bool {
    ConstantPattern::cast(pattern.clone())
        .and_then(|p| p.expression())
        .is_some_and(|e| is_null_literal(&e.walk_down_parentheses()))
}
