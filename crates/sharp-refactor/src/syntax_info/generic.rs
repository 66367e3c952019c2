use sharp_syntax::{
    first_token, leading_trivia, prev_token, trailing_trivia, AstNode, SyntaxKind, SyntaxNode,
    SyntaxToken, TextRange, TypeParameter, TypeParameterConstraintClause, TypeParameterList,
};

use super::identity_eq;
use crate::document::Document;
use crate::edit::{EditSet, TextEdit};
use crate::error::{InfoError, RefactorError};

/// Uniform view over declarations that can carry type parameters: classes, structs,
/// interfaces, delegates, methods and local functions.
#[derive(Debug, Clone, Default)]
pub struct GenericInfo {
    node: Option<SyntaxNode>,
}

identity_eq!(GenericInfo, node);

pub fn generic_info(node: &SyntaxNode) -> GenericInfo {
    match node.kind() {
        SyntaxKind::ClassDeclaration
        | SyntaxKind::StructDeclaration
        | SyntaxKind::InterfaceDeclaration
        | SyntaxKind::DelegateDeclaration
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::LocalFunctionStatement => GenericInfo {
            node: Some(node.clone()),
        },
        _ => GenericInfo::default(),
    }
}

impl GenericInfo {
    pub fn success(&self) -> bool {
        self.node.is_some()
    }

    pub fn node(&self) -> Option<&SyntaxNode> {
        self.node.as_ref()
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.node.as_ref().map(SyntaxNode::kind)
    }

    /// Declared name.
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.node.as_ref().and_then(sharp_syntax::support::ident_token)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        self.node.as_ref()?.children().find_map(TypeParameterList::cast)
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    pub fn constraint_clauses(&self) -> Vec<TypeParameterConstraintClause> {
        self.node
            .as_ref()
            .map(|node| node.children().filter_map(TypeParameterConstraintClause::cast).collect())
            .unwrap_or_default()
    }

    pub fn find_type_parameter(&self, name: &str) -> Option<TypeParameter> {
        self.type_parameters()
            .into_iter()
            .find(|p| p.identifier().is_some_and(|id| id.text() == name))
    }

    pub fn find_constraint_clause(&self, name: &str) -> Option<TypeParameterConstraintClause> {
        self.constraint_clauses()
            .into_iter()
            .find(|c| c.name().is_some_and(|id| id.text() == name))
    }

    /// Removes type parameter `name` and its constraint clause. Removing the only type
    /// parameter removes the whole `<…>`.
    pub fn remove_type_parameter(
        &self,
        document: &Document,
        name: &str,
    ) -> Result<Document, RefactorError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("GenericInfo").into());
        }
        let parameters = self.type_parameters();
        let index = parameters
            .iter()
            .position(|p| p.identifier().is_some_and(|id| id.text() == name))
            .ok_or_else(|| InfoError::ParameterNotFound {
                name: name.to_string(),
            })?;

        let mut edits = EditSet::new();
        let range = if parameters.len() == 1 {
            match self.type_parameter_list() {
                Some(list) => range_of(list.syntax()),
                None => range_of(parameters[index].syntax()),
            }
        } else if index + 1 < parameters.len() {
            TextRange {
                start: range_of(parameters[index].syntax()).start,
                end: range_of(parameters[index + 1].syntax()).start,
            }
        } else {
            TextRange {
                start: range_of(parameters[index - 1].syntax()).end,
                end: range_of(parameters[index].syntax()).end,
            }
        };
        edits.delete(range);

        let clauses = self.constraint_clauses();
        if let Some(clause_index) = clauses
            .iter()
            .position(|c| c.name().is_some_and(|id| id.text() == name))
        {
            edits.push(remove_clause_edit(&clauses, clause_index));
        }
        Ok(document.apply_edits(edits)?)
    }

    pub fn remove_constraint_clause(
        &self,
        document: &Document,
        name: &str,
    ) -> Result<Document, RefactorError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("GenericInfo").into());
        }
        let clauses = self.constraint_clauses();
        let index = clauses
            .iter()
            .position(|c| c.name().is_some_and(|id| id.text() == name))
            .ok_or_else(|| InfoError::ConstraintClauseNotFound {
                name: name.to_string(),
            })?;
        let mut edits = EditSet::new();
        edits.push(remove_clause_edit(&clauses, index));
        Ok(document.apply_edits(edits)?)
    }

    pub fn remove_all_constraint_clauses(&self, document: &Document) -> Result<Document, RefactorError> {
        if !self.success() {
            return Err(InfoError::NotInitialized("GenericInfo").into());
        }
        let clauses = self.constraint_clauses();
        let (Some(first), Some(last)) = (clauses.first(), clauses.last()) else {
            return Ok(document.clone());
        };
        let mut edits = EditSet::new();
        edits.push(remove_through_previous_token(first.syntax(), last.syntax()));
        Ok(document.apply_edits(edits)?)
    }
}

/// Removing a clause that is followed by another clause takes everything up to the next
/// one. Removing the last clause merges the surrounding trivia instead, so the
/// declaration's next token keeps its layout.
fn remove_clause_edit(clauses: &[TypeParameterConstraintClause], index: usize) -> TextEdit {
    let clause = range_of(clauses[index].syntax());
    match clauses.get(index + 1) {
        Some(next) => TextEdit::delete(TextRange {
            start: clause.start,
            end: range_of(next.syntax()).start,
        }),
        None => remove_through_previous_token(clauses[index].syntax(), clauses[index].syntax()),
    }
}

/// Deletes `first..=last` together with the trivia separating `first` from the token
/// before it. Comments in that trivia survive; pure whitespace is dropped.
fn remove_through_previous_token(first: &SyntaxNode, last: &SyntaxNode) -> TextEdit {
    let end = range_of(last).end;
    let Some(first_tok) = first_token(first) else {
        return TextEdit::delete(TextRange {
            start: range_of(first).start,
            end,
        });
    };
    let Some(prev) = prev_token(&first_tok) else {
        return TextEdit::delete(TextRange {
            start: range_of(first).start,
            end,
        });
    };
    let mut kept = String::new();
    for trivia in [trailing_trivia(&prev), leading_trivia(&first_tok)] {
        if !trivia.iter().all(|t| t.kind().is_whitespace()) {
            for token in &trivia {
                kept.push_str(token.text());
            }
        }
    }
    TextEdit::replace(
        TextRange {
            start: u32::from(prev.text_range().end()),
            end,
        },
        kept,
    )
}

fn range_of(node: &SyntaxNode) -> TextRange {
    TextRange::from(node.text_range())
}

/// A single constraint (`class`, `new()`, `IFoo`) and the clause that owns it.
#[derive(Debug, Clone, Default)]
pub struct TypeParameterConstraintInfo {
    constraint: Option<SyntaxNode>,
    clause: Option<TypeParameterConstraintClause>,
}

identity_eq!(TypeParameterConstraintInfo, constraint);

pub fn type_parameter_constraint_info(node: &SyntaxNode) -> TypeParameterConstraintInfo {
    let is_constraint = matches!(
        node.kind(),
        SyntaxKind::TypeConstraint
            | SyntaxKind::ClassOrStructConstraint
            | SyntaxKind::ConstructorConstraint
    );
    if !is_constraint {
        return TypeParameterConstraintInfo::default();
    }
    match node.parent().and_then(TypeParameterConstraintClause::cast) {
        Some(clause) if clause.name().is_some() => TypeParameterConstraintInfo {
            constraint: Some(node.clone()),
            clause: Some(clause),
        },
        _ => TypeParameterConstraintInfo::default(),
    }
}

impl TypeParameterConstraintInfo {
    pub fn success(&self) -> bool {
        self.constraint.is_some()
    }

    pub fn constraint(&self) -> Option<&SyntaxNode> {
        self.constraint.as_ref()
    }

    pub fn clause(&self) -> Option<&TypeParameterConstraintClause> {
        self.clause.as_ref()
    }

    /// Constrained type parameter name.
    pub fn name(&self) -> Option<String> {
        self.clause.as_ref()?.name().map(|t| t.text().to_string())
    }

    /// Declaration owning the clause.
    pub fn declaration(&self) -> Option<SyntaxNode> {
        self.clause.as_ref()?.syntax().parent()
    }

    pub fn generic_info(&self) -> GenericInfo {
        self.declaration()
            .map(|declaration| generic_info(&declaration))
            .unwrap_or_default()
    }

    pub fn type_parameter(&self) -> Option<TypeParameter> {
        let name = self.name()?;
        self.generic_info().find_type_parameter(&name)
    }

    /// Whether the same constraint text appears earlier in the clause.
    pub fn is_duplicate(&self) -> bool {
        let (Some(constraint), Some(clause)) = (&self.constraint, &self.clause) else {
            return false;
        };
        let text = constraint.text().to_string();
        clause
            .constraints()
            .take_while(|c| c != constraint)
            .any(|c| c.text().to_string() == text)
    }
}
