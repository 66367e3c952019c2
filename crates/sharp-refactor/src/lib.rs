//! Code refactorings for C# documents.
//!
//! A host asks for the actions available at a span with [`refactorings_at`] (or drives a
//! [`RefactoringContext`] through [`compute_refactorings`] itself) and applies the one
//! the user picks. Applying an action never mutates anything: it yields a new
//! [`Document`], or a [`Solution`] when more than one file changes.
//!
//! Providers recognise code through the info types in [`syntax_info`]. Semantic
//! questions (the type of an expression, whether it is disposable) go through the
//! [`SemanticModel`] trait; [`DeclarationSemanticModel`] answers them from the
//! declarations of a single document.

mod cancellation;
mod catalogue;
mod context;
mod document;
mod edit;
mod engine;
mod error;
mod preview;
mod refactorings;
mod semantic;
pub mod syntax_info;

pub use cancellation::{CancellationToken, Cancelled};
pub use catalogue::{
    AllEnabled, DefaultSettings, RefactoringId, RefactoringSettings, UnknownRefactoring,
};
pub use context::{CodeAction, CodeActionResult, RefactoringContext};
pub use document::{Document, FileId, Solution};
pub use edit::{apply_text_edits, EditError, EditSet, TextEdit};
pub use engine::{compute_refactorings, refactorings_at};
pub use error::{InfoError, RefactorError};
pub use preview::{generate_preview, FileChangeKind, FilePreview, RefactoringPreview};
pub use semantic::{
    DeclarationSemanticModel, DeclarationSemanticModelProvider, SemanticModel,
    SemanticModelProvider, SpecialType, TypeKind, TypeSymbol,
};
pub use sharp_syntax::{CSharpLanguageVersion, TextRange};
