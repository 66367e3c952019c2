use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use sharp_syntax::{CSharpFeature, CSharpLanguageVersion, TextRange};

use crate::cancellation::CancellationToken;
use crate::catalogue::{RefactoringId, RefactoringSettings};
use crate::document::{Document, Solution};
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::semantic::{SemanticModel, SemanticModelProvider};

/// Outcome of applying a [`CodeAction`].
#[derive(Debug, Clone)]
pub enum CodeActionResult {
    Document(Document),
    Solution(Solution),
}

impl CodeActionResult {
    /// The changed document, when the action touches a single document.
    pub fn document(&self) -> Option<&Document> {
        match self {
            CodeActionResult::Document(document) => Some(document),
            CodeActionResult::Solution(_) => None,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            CodeActionResult::Document(_) => None,
            CodeActionResult::Solution(solution) => Some(solution),
        }
    }
}

type ApplyFn = dyn Fn(&CancellationToken) -> Result<CodeActionResult, RefactorError>;

/// A registered refactoring: a title plus a deferred rewrite.
pub struct CodeAction {
    pub title: String,
    /// Stable key identifying this action variant across invocations.
    pub equivalence_key: String,
    pub refactoring: RefactoringId,
    apply: Box<ApplyFn>,
}

impl CodeAction {
    pub fn new(
        refactoring: RefactoringId,
        title: impl Into<String>,
        apply: impl Fn(&CancellationToken) -> Result<CodeActionResult, RefactorError> + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            equivalence_key: refactoring.id().to_string(),
            refactoring,
            apply: Box::new(apply),
        }
    }

    /// An action that rewrites `document` through a set of text edits.
    pub fn edit(
        refactoring: RefactoringId,
        title: impl Into<String>,
        document: &Document,
        edits: impl Fn(&Document) -> Result<EditSet, RefactorError> + 'static,
    ) -> Self {
        let document = document.clone();
        Self::new(refactoring, title, move |_| {
            let edits = edits(&document)?;
            Ok(CodeActionResult::Document(document.apply_edits(edits)?))
        })
    }

    #[must_use]
    pub fn with_equivalence_key(mut self, key: impl Into<String>) -> Self {
        self.equivalence_key = key.into();
        self
    }

    /// Runs the deferred rewrite. Cancellation is checked before any work is done.
    pub fn apply(&self, cancellation: &CancellationToken) -> Result<CodeActionResult, RefactorError> {
        cancellation.check()?;
        (self.apply)(cancellation)
    }
}

impl fmt::Debug for CodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeAction")
            .field("title", &self.title)
            .field("equivalence_key", &self.equivalence_key)
            .field("refactoring", &self.refactoring)
            .finish_non_exhaustive()
    }
}

/// Per-invocation state handed to every provider.
///
/// Short-lived and single-threaded: syntax nodes are not `Send`.
pub struct RefactoringContext<'a> {
    document: Document,
    span: TextRange,
    settings: &'a dyn RefactoringSettings,
    semantic_provider: Option<&'a dyn SemanticModelProvider>,
    semantic_model: OnceCell<Option<Rc<dyn SemanticModel>>>,
    cancellation: CancellationToken,
    actions: Vec<CodeAction>,
}

impl<'a> RefactoringContext<'a> {
    pub fn new(document: &Document, span: TextRange, settings: &'a dyn RefactoringSettings) -> Self {
        Self {
            document: document.clone(),
            span,
            settings,
            semantic_provider: None,
            semantic_model: OnceCell::new(),
            cancellation: CancellationToken::new(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_semantic_model_provider(mut self, provider: &'a dyn SemanticModelProvider) -> Self {
        self.semantic_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn span(&self) -> TextRange {
        self.span
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn language_version(&self) -> CSharpLanguageVersion {
        self.document.language_version()
    }

    pub fn supports_csharp6(&self) -> bool {
        self.language_version().supports_csharp6()
    }

    pub fn supports_csharp7(&self) -> bool {
        self.language_version().supports_csharp7()
    }

    pub fn supports(&self, feature: CSharpFeature) -> bool {
        self.language_version().is_enabled(feature)
    }

    pub fn is_enabled(&self, id: RefactoringId) -> bool {
        self.settings.is_enabled(id)
    }

    pub fn is_any_enabled(&self, ids: &[RefactoringId]) -> bool {
        ids.iter().any(|id| self.is_enabled(*id))
    }

    /// Semantic model for the document, computed once per context.
    ///
    /// `None` when no provider is attached or the provider has no semantic support.
    pub fn semantic_model(&self) -> Result<Option<Rc<dyn SemanticModel>>, RefactorError> {
        self.cancellation.check()?;
        let model = self.semantic_model.get_or_init(|| {
            let provider = self.semantic_provider?;
            if !provider.supports_semantic_model() {
                return None;
            }
            provider.semantic_model(&self.document)
        });
        Ok(model.clone())
    }

    pub fn register(&mut self, action: CodeAction) {
        tracing::trace!(
            target: "sharp.refactor",
            id = action.refactoring.id(),
            title = %action.title,
            equivalence_key = %action.equivalence_key,
            "registered code action"
        );
        self.actions.push(action);
    }

    /// Shorthand for [`CodeAction::edit`] against the context document.
    pub fn register_edit(
        &mut self,
        refactoring: RefactoringId,
        title: impl Into<String>,
        edits: impl Fn(&Document) -> Result<EditSet, RefactorError> + 'static,
    ) {
        let action = CodeAction::edit(refactoring, title, &self.document, edits);
        self.register(action);
    }

    pub fn actions(&self) -> &[CodeAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<CodeAction> {
        self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::DefaultSettings;
    use crate::semantic::DeclarationSemanticModelProvider;

    #[test]
    fn actions_check_cancellation_before_applying() {
        let doc = Document::new("a.cs", "class A { }");
        let mut ctx = RefactoringContext::new(&doc, TextRange::empty(0), &DefaultSettings);
        ctx.register_edit(RefactoringId::RemoveComment, "Remove comment", |_| {
            Ok(EditSet::new())
        });
        let actions = ctx.into_actions();
        let token = CancellationToken::new();
        assert!(actions[0].apply(&token).is_ok());
        token.cancel();
        assert!(actions[0].apply(&token).unwrap_err().is_cancelled());
    }

    #[test]
    fn semantic_model_needs_a_provider() {
        let doc = Document::new("a.cs", "class A { }");
        let ctx = RefactoringContext::new(&doc, TextRange::empty(0), &DefaultSettings);
        assert!(ctx.semantic_model().unwrap().is_none());

        let provider = DeclarationSemanticModelProvider;
        let ctx = RefactoringContext::new(&doc, TextRange::empty(0), &DefaultSettings)
            .with_semantic_model_provider(&provider);
        assert!(ctx.semantic_model().unwrap().is_some());

        let token = CancellationToken::new();
        token.cancel();
        let ctx = RefactoringContext::new(&doc, TextRange::empty(0), &DefaultSettings)
            .with_cancellation(token);
        assert!(matches!(ctx.semantic_model(), Err(err) if err.is_cancelled()));
    }
}
