use sharp_syntax::{AstNode, ConditionalExpression, Expression, SyntaxNode};

use super::{candidate, check, identity_eq, operand, MatchOptions};

/// `condition ? when_true : when_false`.
#[derive(Debug, Clone, Default)]
pub struct ConditionalExpressionInfo {
    conditional: Option<ConditionalExpression>,
    condition: Option<Expression>,
    when_true: Option<Expression>,
    when_false: Option<Expression>,
}

identity_eq!(ConditionalExpressionInfo, conditional);

pub fn conditional_expression_info(
    node: &SyntaxNode,
    options: MatchOptions,
) -> ConditionalExpressionInfo {
    let Some(conditional) =
        candidate(node, options).and_then(|e| ConditionalExpression::cast(e.syntax().clone()))
    else {
        return ConditionalExpressionInfo::default();
    };
    if !check(Some(conditional.syntax()), options.allow_missing) {
        return ConditionalExpressionInfo::default();
    }
    let (Some(condition), Some(when_true), Some(when_false)) = (
        operand(conditional.condition(), options),
        operand(conditional.when_true(), options),
        operand(conditional.when_false(), options),
    ) else {
        return ConditionalExpressionInfo::default();
    };
    ConditionalExpressionInfo {
        conditional: Some(conditional),
        condition: Some(condition),
        when_true: Some(when_true),
        when_false: Some(when_false),
    }
}

impl ConditionalExpressionInfo {
    pub fn success(&self) -> bool {
        self.conditional.is_some()
    }

    pub fn conditional(&self) -> Option<&ConditionalExpression> {
        self.conditional.as_ref()
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    pub fn when_true(&self) -> Option<&Expression> {
        self.when_true.as_ref()
    }

    pub fn when_false(&self) -> Option<&Expression> {
        self.when_false.as_ref()
    }
}
