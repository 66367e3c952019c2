use std::fmt;

use sharp_syntax::{
    following_token, AstNode, ModifierList, SyntaxKind, SyntaxNode, SyntaxToken, TextRange,
};

use super::identity_eq;
use crate::edit::EditSet;
use crate::error::InfoError;

/// Declared accessibility, as spelled by one or two modifier keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    pub const EXPLICIT: [Accessibility; 6] = [
        Accessibility::Public,
        Accessibility::Internal,
        Accessibility::ProtectedOrInternal,
        Accessibility::Protected,
        Accessibility::ProtectedAndInternal,
        Accessibility::Private,
    ];

    /// Keywords in canonical order.
    pub fn keywords(self) -> &'static [SyntaxKind] {
        match self {
            Accessibility::NotApplicable => &[],
            Accessibility::Private => &[SyntaxKind::PrivateKw],
            Accessibility::ProtectedAndInternal => &[SyntaxKind::PrivateKw, SyntaxKind::ProtectedKw],
            Accessibility::Protected => &[SyntaxKind::ProtectedKw],
            Accessibility::Internal => &[SyntaxKind::InternalKw],
            Accessibility::ProtectedOrInternal => &[SyntaxKind::ProtectedKw, SyntaxKind::InternalKw],
            Accessibility::Public => &[SyntaxKind::PublicKw],
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Accessibility::NotApplicable => "",
            Accessibility::Private => "private",
            Accessibility::ProtectedAndInternal => "private protected",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedOrInternal => "protected internal",
            Accessibility::Public => "public",
        }
    }

    pub fn is_single_token_kind(self) -> bool {
        self.keywords().len() == 1
    }

    fn from_single(kind: SyntaxKind) -> Accessibility {
        match kind {
            SyntaxKind::PublicKw => Accessibility::Public,
            SyntaxKind::PrivateKw => Accessibility::Private,
            SyntaxKind::ProtectedKw => Accessibility::Protected,
            SyntaxKind::InternalKw => Accessibility::Internal,
            _ => Accessibility::NotApplicable,
        }
    }

    fn from_pair(first: SyntaxKind, second: SyntaxKind) -> Option<Accessibility> {
        use SyntaxKind::{InternalKw, PrivateKw, ProtectedKw};
        match (first, second) {
            (ProtectedKw, InternalKw) | (InternalKw, ProtectedKw) => {
                Some(Accessibility::ProtectedOrInternal)
            }
            (PrivateKw, ProtectedKw) | (ProtectedKw, PrivateKw) => {
                Some(Accessibility::ProtectedAndInternal)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessibility::NotApplicable => f.write_str("not applicable"),
            other => f.write_str(other.text()),
        }
    }
}

/// Canonical modifier order.
const CANONICAL_ORDER: [SyntaxKind; 17] = [
    SyntaxKind::NewKw,
    SyntaxKind::PublicKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::InternalKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ConstKw,
    SyntaxKind::StaticKw,
    SyntaxKind::VirtualKw,
    SyntaxKind::SealedKw,
    SyntaxKind::OverrideKw,
    SyntaxKind::AbstractKw,
    SyntaxKind::ExternKw,
    SyntaxKind::UnsafeKw,
    SyntaxKind::ReadonlyKw,
    SyntaxKind::VolatileKw,
    SyntaxKind::AsyncKw,
    SyntaxKind::PartialKw,
];

fn rank(kind: SyntaxKind) -> usize {
    CANONICAL_ORDER
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(CANONICAL_ORDER.len())
}

/// The modifier list of a declaration together with the declaration itself.
#[derive(Debug, Clone, Default)]
pub struct ModifierListInfo {
    parent: Option<SyntaxNode>,
    list: Option<ModifierList>,
}

identity_eq!(ModifierListInfo, parent);

/// Accepts a declaration that owns a modifier list, or the list itself.
pub fn modifier_list_info(node: &SyntaxNode) -> ModifierListInfo {
    let (parent, list) = if node.kind() == SyntaxKind::ModifierList {
        match node.parent() {
            Some(parent) => (parent, ModifierList::cast(node.clone())),
            None => return ModifierListInfo::default(),
        }
    } else {
        (node.clone(), node.children().find_map(ModifierList::cast))
    };
    match list {
        Some(list) => ModifierListInfo {
            parent: Some(parent),
            list: Some(list),
        },
        None => ModifierListInfo::default(),
    }
}

impl ModifierListInfo {
    pub fn success(&self) -> bool {
        self.parent.is_some()
    }

    /// The declaration owning the list.
    pub fn parent(&self) -> Option<&SyntaxNode> {
        self.parent.as_ref()
    }

    pub fn list(&self) -> Option<&ModifierList> {
        self.list.as_ref()
    }

    pub fn modifiers(&self) -> Vec<SyntaxToken> {
        self.list
            .as_ref()
            .map(|list| list.modifiers().collect())
            .unwrap_or_default()
    }

    pub fn has(&self, kind: SyntaxKind) -> bool {
        self.list.as_ref().is_some_and(|list| list.has(kind))
    }

    pub fn is_new(&self) -> bool {
        self.has(SyntaxKind::NewKw)
    }

    pub fn is_const(&self) -> bool {
        self.has(SyntaxKind::ConstKw)
    }

    pub fn is_static(&self) -> bool {
        self.has(SyntaxKind::StaticKw)
    }

    pub fn is_virtual(&self) -> bool {
        self.has(SyntaxKind::VirtualKw)
    }

    pub fn is_sealed(&self) -> bool {
        self.has(SyntaxKind::SealedKw)
    }

    pub fn is_override(&self) -> bool {
        self.has(SyntaxKind::OverrideKw)
    }

    pub fn is_abstract(&self) -> bool {
        self.has(SyntaxKind::AbstractKw)
    }

    pub fn is_extern(&self) -> bool {
        self.has(SyntaxKind::ExternKw)
    }

    pub fn is_unsafe(&self) -> bool {
        self.has(SyntaxKind::UnsafeKw)
    }

    pub fn is_readonly(&self) -> bool {
        self.has(SyntaxKind::ReadonlyKw)
    }

    pub fn is_volatile(&self) -> bool {
        self.has(SyntaxKind::VolatileKw)
    }

    pub fn is_async(&self) -> bool {
        self.has(SyntaxKind::AsyncKw)
    }

    pub fn is_partial(&self) -> bool {
        self.has(SyntaxKind::PartialKw)
    }

    fn accessibility_tokens(&self) -> Vec<SyntaxToken> {
        self.modifiers()
            .into_iter()
            .filter(|t| t.kind().is_accessibility_modifier())
            .collect()
    }

    /// Accessibility spelled in the list. Two-keyword forms are recognised only when the
    /// keywords are adjacent.
    pub fn explicit_accessibility(&self) -> Accessibility {
        let modifiers = self.modifiers();
        for (index, token) in modifiers.iter().enumerate() {
            if !token.kind().is_accessibility_modifier() {
                continue;
            }
            if let Some(pair) = modifiers
                .get(index + 1)
                .and_then(|next| Accessibility::from_pair(token.kind(), next.kind()))
            {
                return pair;
            }
            return Accessibility::from_single(token.kind());
        }
        Accessibility::NotApplicable
    }

    /// Edits rewriting the list to carry `accessibility`. `NotApplicable` removes any
    /// explicit accessibility.
    pub fn with_explicit_accessibility(
        &self,
        accessibility: Accessibility,
    ) -> Result<EditSet, InfoError> {
        let (Some(parent), Some(list)) = (&self.parent, &self.list) else {
            return Err(InfoError::NotInitialized("ModifierListInfo"));
        };
        if accessibility != Accessibility::NotApplicable && !parent.kind().is_member_declaration()
        {
            return Err(InfoError::InvalidAccessibility(accessibility.text()));
        }

        let mut edits = EditSet::new();
        let current = self.accessibility_tokens();
        let new_kinds = accessibility.keywords();
        if current.iter().map(SyntaxToken::kind).eq(new_kinds.iter().copied()) {
            return Ok(edits);
        }

        let modifiers = self.modifiers();
        if let ([old], [new]) = (current.as_slice(), new_kinds) {
            let insert_index = modifiers.iter().filter(|t| rank(t.kind()) < rank(*new)).count();
            let old_index = modifiers.iter().position(|t| t == old).unwrap_or(usize::MAX);
            if old_index == insert_index || old_index + 1 == insert_index {
                edits.replace(TextRange::from(old.text_range()), accessibility.text());
                return Ok(edits);
            }
        }

        for token in &current {
            edits.delete(token_with_trailing_whitespace(token));
        }
        let Some(first_new) = new_kinds.first() else {
            return Ok(edits);
        };
        let offset = modifiers
            .iter()
            .filter(|t| !t.kind().is_accessibility_modifier())
            .find(|t| rank(t.kind()) > rank(*first_new))
            .map(|t| u32::from(t.text_range().start()))
            .or_else(|| first_token_after(parent, list));
        match offset {
            Some(offset) => {
                edits.insert(offset, format!("{} ", accessibility.text()));
                Ok(edits)
            }
            None => Err(InfoError::NotInitialized("ModifierListInfo")),
        }
    }
}

fn token_with_trailing_whitespace(token: &SyntaxToken) -> TextRange {
    let mut end = token.text_range().end();
    let mut current = following_token(token);
    while let Some(next) = current.filter(|t| t.kind() == SyntaxKind::Whitespace) {
        end = next.text_range().end();
        current = following_token(&next);
    }
    TextRange {
        start: u32::from(token.text_range().start()),
        end: u32::from(end),
    }
}

/// Start of the first significant token following the list inside `parent`.
fn first_token_after(parent: &SyntaxNode, list: &ModifierList) -> Option<u32> {
    let list_end = list.syntax().text_range().end();
    parent
        .descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| {
            !t.kind().is_trivia() && !t.text().is_empty() && t.text_range().start() >= list_end
        })
        .map(|t| u32::from(t.text_range().start()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn rewrite(text: &str, accessibility: Accessibility) -> String {
        let document = Document::new("Test.cs", text);
        let member = document
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::MethodDeclaration)
            .expect("method");
        let edits = modifier_list_info(&member)
            .with_explicit_accessibility(accessibility)
            .expect("edits");
        document.apply_edits(edits).expect("apply").text().to_string()
    }

    #[test]
    fn adjacent_pairs_are_recognised() {
        let document = Document::new(
            "Test.cs",
            "class C { internal protected void A() { } private static protected void B() { } }",
        );
        let infos: Vec<_> = document
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::MethodDeclaration)
            .map(|n| modifier_list_info(&n).explicit_accessibility())
            .collect();
        assert_eq!(
            infos,
            vec![Accessibility::ProtectedOrInternal, Accessibility::Private]
        );
    }

    #[test]
    fn single_keyword_is_replaced_in_place() {
        assert_eq!(
            rewrite("class C { private static void M() { } }", Accessibility::Public),
            "class C { public static void M() { } }"
        );
    }

    #[test]
    fn out_of_order_keyword_moves_to_canonical_position() {
        assert_eq!(
            rewrite("class C { static private void M() { } }", Accessibility::Public),
            "class C { public static void M() { } }"
        );
    }

    #[test]
    fn two_keyword_forms_are_inserted() {
        assert_eq!(
            rewrite("class C { public void M() { } }", Accessibility::ProtectedOrInternal),
            "class C { protected internal void M() { } }"
        );
        assert_eq!(
            rewrite("class C { protected internal void M() { } }", Accessibility::Private),
            "class C { private void M() { } }"
        );
    }

    #[test]
    fn empty_list_inserts_before_the_declaration() {
        assert_eq!(
            rewrite("class C { void M() { } }", Accessibility::Internal),
            "class C { internal void M() { } }"
        );
    }

    #[test]
    fn default_info_is_inert() {
        let info = ModifierListInfo::default();
        assert!(!info.success());
        assert_eq!(info.explicit_accessibility(), Accessibility::NotApplicable);
        assert!(info.modifiers().is_empty());
        assert!(info.with_explicit_accessibility(Accessibility::Public).is_err());
    }
}
