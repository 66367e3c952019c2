use sharp_syntax::{
    AstNode, LambdaExpression, Parameter, ParameterList, SyntaxKind, SyntaxNode, TypeParameter,
    TypeParameterList,
};

use super::{check, identity_eq};

/// Parameters, type parameters and body of anything that declares parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterInfo {
    node: Option<SyntaxNode>,
    parameter: Option<Parameter>,
    parameter_list: Option<ParameterList>,
    type_parameter_list: Option<TypeParameterList>,
    body: Option<SyntaxNode>,
}

identity_eq!(ParameterInfo, node);

pub fn parameter_info(node: &SyntaxNode) -> ParameterInfo {
    let body_of = |node: &SyntaxNode| {
        node.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::Block | SyntaxKind::ArrowExpressionClause | SyntaxKind::AccessorList
            )
        })
    };
    match node.kind() {
        SyntaxKind::ConstructorDeclaration
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::OperatorDeclaration
        | SyntaxKind::ConversionOperatorDeclaration
        | SyntaxKind::DelegateDeclaration
        | SyntaxKind::LocalFunctionStatement
        | SyntaxKind::IndexerDeclaration => {
            let Some(parameter_list) = node.children().find_map(ParameterList::cast) else {
                return ParameterInfo::default();
            };
            ParameterInfo {
                node: Some(node.clone()),
                parameter: None,
                parameter_list: Some(parameter_list),
                type_parameter_list: node.children().find_map(TypeParameterList::cast),
                body: body_of(node),
            }
        }
        SyntaxKind::SimpleLambdaExpression
        | SyntaxKind::ParenthesizedLambdaExpression
        | SyntaxKind::AnonymousMethodExpression => {
            let Some(lambda) = LambdaExpression::cast(node.clone()) else {
                return ParameterInfo::default();
            };
            let parameter = if node.kind() == SyntaxKind::SimpleLambdaExpression {
                match lambda.parameter() {
                    Some(parameter) => Some(parameter),
                    None => return ParameterInfo::default(),
                }
            } else {
                None
            };
            let parameter_list = lambda.parameter_list();
            if parameter.is_none()
                && parameter_list.is_none()
                && node.kind() == SyntaxKind::ParenthesizedLambdaExpression
            {
                return ParameterInfo::default();
            }
            ParameterInfo {
                node: Some(node.clone()),
                parameter,
                parameter_list,
                type_parameter_list: None,
                body: lambda.body(),
            }
        }
        _ => ParameterInfo::default(),
    }
}

impl ParameterInfo {
    pub fn success(&self) -> bool {
        self.node.is_some()
    }

    pub fn node(&self) -> Option<&SyntaxNode> {
        self.node.as_ref()
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.node.as_ref().map(SyntaxNode::kind)
    }

    /// The lone parameter of a simple lambda.
    pub fn parameter(&self) -> Option<&Parameter> {
        self.parameter.as_ref()
    }

    pub fn parameter_list(&self) -> Option<&ParameterList> {
        self.parameter_list.as_ref()
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        match (&self.parameter, &self.parameter_list) {
            (Some(parameter), _) => vec![parameter.clone()],
            (None, Some(list)) => list.parameters().collect(),
            (None, None) => Vec::new(),
        }
    }

    pub fn type_parameter_list(&self) -> Option<&TypeParameterList> {
        self.type_parameter_list.as_ref()
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list
            .as_ref()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    /// Block, arrow clause, accessor list or lambda expression body.
    pub fn body(&self) -> Option<&SyntaxNode> {
        self.body.as_ref()
    }
}

/// `x => body` or `(x) => body`.
#[derive(Debug, Clone, Default)]
pub struct SingleParameterLambdaExpressionInfo {
    lambda: Option<LambdaExpression>,
    parameter: Option<Parameter>,
    parameter_list: Option<ParameterList>,
    body: Option<SyntaxNode>,
}

identity_eq!(SingleParameterLambdaExpressionInfo, lambda);

pub fn single_parameter_lambda_expression_info(
    node: &SyntaxNode,
    allow_missing: bool,
) -> SingleParameterLambdaExpressionInfo {
    let Some(lambda) = LambdaExpression::cast(node.clone()) else {
        return SingleParameterLambdaExpressionInfo::default();
    };
    if !check(Some(lambda.syntax()), allow_missing) {
        return SingleParameterLambdaExpressionInfo::default();
    }
    let (parameter, parameter_list) = match lambda.kind() {
        SyntaxKind::SimpleLambdaExpression => (lambda.parameter(), None),
        SyntaxKind::ParenthesizedLambdaExpression => {
            let Some(list) = lambda.parameter_list() else {
                return SingleParameterLambdaExpressionInfo::default();
            };
            let mut parameters = list.parameters();
            match (parameters.next(), parameters.next()) {
                (Some(parameter), None) => (Some(parameter), Some(list.clone())),
                _ => return SingleParameterLambdaExpressionInfo::default(),
            }
        }
        _ => return SingleParameterLambdaExpressionInfo::default(),
    };
    let (Some(parameter), Some(body)) = (parameter, lambda.body()) else {
        return SingleParameterLambdaExpressionInfo::default();
    };
    SingleParameterLambdaExpressionInfo {
        lambda: Some(lambda),
        parameter: Some(parameter),
        parameter_list,
        body: Some(body),
    }
}

impl SingleParameterLambdaExpressionInfo {
    pub fn success(&self) -> bool {
        self.lambda.is_some()
    }

    pub fn lambda(&self) -> Option<&LambdaExpression> {
        self.lambda.as_ref()
    }

    pub fn parameter(&self) -> Option<&Parameter> {
        self.parameter.as_ref()
    }

    /// Present for the parenthesized form.
    pub fn parameter_list(&self) -> Option<&ParameterList> {
        self.parameter_list.as_ref()
    }

    pub fn is_parenthesized(&self) -> bool {
        self.parameter_list.is_some()
    }

    pub fn body(&self) -> Option<&SyntaxNode> {
        self.body.as_ref()
    }
}
