use sharp_syntax::{AstNode, BinaryExpression, Expression, SyntaxKind, SyntaxNode, TypeSyntax};

use super::{candidate, check, identity_eq, operand, MatchOptions};

/// `left op right`, with same-kind chain flattening.
#[derive(Debug, Clone, Default)]
pub struct BinaryExpressionInfo {
    binary: Option<BinaryExpression>,
    left: Option<Expression>,
    right: Option<Expression>,
}

identity_eq!(BinaryExpressionInfo, binary);

pub fn binary_expression_info(node: &SyntaxNode, options: MatchOptions) -> BinaryExpressionInfo {
    let Some(binary) = candidate(node, options).and_then(|e| BinaryExpression::cast(e.syntax().clone()))
    else {
        return BinaryExpressionInfo::default();
    };
    if !check(Some(binary.syntax()), options.allow_missing) {
        return BinaryExpressionInfo::default();
    }
    let (Some(left), Some(right)) = (operand(binary.left(), options), operand(binary.right(), options))
    else {
        return BinaryExpressionInfo::default();
    };
    BinaryExpressionInfo {
        binary: Some(binary),
        left: Some(left),
        right: Some(right),
    }
}

impl BinaryExpressionInfo {
    pub fn success(&self) -> bool {
        self.binary.is_some()
    }

    pub fn binary(&self) -> Option<&BinaryExpression> {
        self.binary.as_ref()
    }

    pub fn left(&self) -> Option<&Expression> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Expression> {
        self.right.as_ref()
    }

    /// Operator kind; `None` when not recognised.
    pub fn kind(&self) -> Option<SyntaxKind> {
        self.binary.as_ref().map(BinaryExpression::operator_kind)
    }

    /// Operands of the same-kind chain rooted at the matched expression.
    ///
    /// The chain descends through left operands of the same operator kind; the first left
    /// operand of another kind is itself an operand. `a + b + c + d` yields `[a, b, c, d]`
    /// left to right and `[d, c, b, a]` otherwise.
    pub fn expressions(&self, left_to_right: bool) -> Vec<Expression> {
        let Some(binary) = &self.binary else {
            return Vec::new();
        };
        let kind = binary.operator_kind();
        let mut operands = Vec::new();
        let mut current = binary.clone();
        loop {
            if let Some(right) = current.right() {
                operands.push(right);
            }
            match current.left() {
                Some(left) => match BinaryExpression::cast(left.syntax().clone()) {
                    Some(inner) if inner.operator_kind() == kind => current = inner,
                    _ => {
                        operands.push(left);
                        break;
                    }
                },
                None => break,
            }
        }
        if left_to_right {
            operands.reverse();
        }
        operands
    }
}

/// Outermost binary expression of the same operator kind reachable from `binary` by
/// climbing through parents in which the current expression is the left operand.
///
/// This mirrors [`BinaryExpressionInfo::expressions`], which only descends through left
/// operands, so flattening the result always includes `binary`'s operands.
pub fn topmost_same_kind(binary: &BinaryExpression) -> BinaryExpression {
    let kind = binary.operator_kind();
    let mut current = binary.clone();
    while let Some(parent) = current.syntax().parent().and_then(BinaryExpression::cast) {
        let is_left = parent.left().is_some_and(|left| left.syntax() == current.syntax());
        if parent.operator_kind() != kind || !is_left {
            break;
        }
        current = parent;
    }
    current
}

/// `expression as Type`.
#[derive(Debug, Clone, Default)]
pub struct AsExpressionInfo {
    binary: Option<BinaryExpression>,
    expression: Option<Expression>,
    ty: Option<TypeSyntax>,
}

identity_eq!(AsExpressionInfo, binary);

pub fn as_expression_info(node: &SyntaxNode, options: MatchOptions) -> AsExpressionInfo {
    let (binary, expression, ty) = match type_operator(node, SyntaxKind::AsKw, options) {
        Some(parts) => parts,
        None => return AsExpressionInfo::default(),
    };
    AsExpressionInfo {
        binary: Some(binary),
        expression: Some(expression),
        ty: Some(ty),
    }
}

impl AsExpressionInfo {
    pub fn success(&self) -> bool {
        self.binary.is_some()
    }

    pub fn binary(&self) -> Option<&BinaryExpression> {
        self.binary.as_ref()
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    pub fn ty(&self) -> Option<&TypeSyntax> {
        self.ty.as_ref()
    }
}

/// `expression is Type` (a type test, not a pattern).
#[derive(Debug, Clone, Default)]
pub struct IsExpressionInfo {
    binary: Option<BinaryExpression>,
    expression: Option<Expression>,
    ty: Option<TypeSyntax>,
}

identity_eq!(IsExpressionInfo, binary);

pub fn is_expression_info(node: &SyntaxNode, options: MatchOptions) -> IsExpressionInfo {
    let (binary, expression, ty) = match type_operator(node, SyntaxKind::IsKw, options) {
        Some(parts) => parts,
        None => return IsExpressionInfo::default(),
    };
    IsExpressionInfo {
        binary: Some(binary),
        expression: Some(expression),
        ty: Some(ty),
    }
}

impl IsExpressionInfo {
    pub fn success(&self) -> bool {
        self.binary.is_some()
    }

    pub fn binary(&self) -> Option<&BinaryExpression> {
        self.binary.as_ref()
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    pub fn ty(&self) -> Option<&TypeSyntax> {
        self.ty.as_ref()
    }
}

fn type_operator(
    node: &SyntaxNode,
    kind: SyntaxKind,
    options: MatchOptions,
) -> Option<(BinaryExpression, Expression, TypeSyntax)> {
    let binary = BinaryExpression::cast(candidate(node, options)?.syntax().clone())?;
    if binary.operator_kind() != kind || !check(Some(binary.syntax()), options.allow_missing) {
        return None;
    }
    let expression = operand(binary.left(), options)?;
    let ty = TypeSyntax::cast(binary.right()?.syntax().clone())?;
    Some((binary, expression, ty))
}
