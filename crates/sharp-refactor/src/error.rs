use thiserror::Error;

use crate::cancellation::Cancelled;
use crate::edit::EditError;

/// Precondition violations when materializing a rewrite from an info value.
///
/// These indicate a caller skipped the applicability check; recognition failures are
/// never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfoError {
    #[error("`{0}` is not initialized")]
    NotInitialized(&'static str),
    #[error("string concatenation contains an operand that is not a string literal")]
    NonLiteralOperand,
    #[error("type parameter `{name}` not found")]
    ParameterNotFound { name: String },
    #[error("constraint clause for `{name}` not found")]
    ConstraintClauseNotFound { name: String },
    #[error("accessibility `{0}` cannot be written as modifiers")]
    InvalidAccessibility(&'static str),
    #[error("`{0}` requires a semantic model")]
    SemanticModelRequired(&'static str),
}

#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("operation was cancelled")]
    Cancelled,
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Info(#[from] InfoError),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<Cancelled> for RefactorError {
    fn from(_: Cancelled) -> Self {
        RefactorError::Cancelled
    }
}

impl RefactorError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        RefactorError::InvalidOperation(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RefactorError::Cancelled)
    }
}
