use std::ops::Deref;

use sharp_syntax::{
    full_range, AstNode, MemberDeclaration, Statement, SyntaxKind, SyntaxNode, SyntaxToken,
    TextRange, UsingDirective,
};

use super::identity_eq;

/// Statements of a block or switch section.
#[derive(Debug, Clone, Default)]
pub struct StatementListInfo {
    parent: Option<SyntaxNode>,
    statements: Vec<Statement>,
}

identity_eq!(StatementListInfo, parent);

/// Accepts the block/switch section itself or one of its statements.
pub fn statement_list_info(node: &SyntaxNode) -> StatementListInfo {
    let parent = match node.kind() {
        SyntaxKind::Block | SyntaxKind::SwitchSection => node.clone(),
        kind if kind.is_statement() => match node.parent() {
            Some(parent)
                if matches!(parent.kind(), SyntaxKind::Block | SyntaxKind::SwitchSection) =>
            {
                parent
            }
            _ => return StatementListInfo::default(),
        },
        _ => return StatementListInfo::default(),
    };
    StatementListInfo {
        statements: parent.children().filter_map(Statement::cast).collect(),
        parent: Some(parent),
    }
}

impl StatementListInfo {
    pub fn success(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<&SyntaxNode> {
        self.parent.as_ref()
    }

    pub fn is_block(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| p.kind() == SyntaxKind::Block)
    }

    pub fn is_switch_section(&self) -> bool {
        self.parent
            .as_ref()
            .is_some_and(|p| p.kind() == SyntaxKind::SwitchSection)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn index_of(&self, statement: &Statement) -> Option<usize> {
        self.statements.iter().position(|s| s == statement)
    }
}

/// Members of a compilation unit, namespace, class, struct or interface.
#[derive(Debug, Clone, Default)]
pub struct MemberDeclarationListInfo {
    parent: Option<SyntaxNode>,
    members: Vec<MemberDeclaration>,
}

identity_eq!(MemberDeclarationListInfo, parent);

pub fn member_declaration_list_info(node: &SyntaxNode) -> MemberDeclarationListInfo {
    match node.kind() {
        SyntaxKind::CompilationUnit
        | SyntaxKind::NamespaceDeclaration
        | SyntaxKind::FileScopedNamespaceDeclaration
        | SyntaxKind::ClassDeclaration
        | SyntaxKind::StructDeclaration
        | SyntaxKind::InterfaceDeclaration => MemberDeclarationListInfo {
            parent: Some(node.clone()),
            members: node.children().filter_map(MemberDeclaration::cast).collect(),
        },
        _ => MemberDeclarationListInfo::default(),
    }
}

impl MemberDeclarationListInfo {
    pub fn success(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<&SyntaxNode> {
        self.parent.as_ref()
    }

    pub fn members(&self) -> &[MemberDeclaration] {
        &self.members
    }

    pub fn open_brace(&self) -> Option<SyntaxToken> {
        sharp_syntax::support::token(self.parent.as_ref()?, SyntaxKind::OpenBrace)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        sharp_syntax::support::token(self.parent.as_ref()?, SyntaxKind::CloseBrace)
    }
}

/// `using` directives of a compilation unit or namespace.
#[derive(Debug, Clone, Default)]
pub struct UsingDirectiveListInfo {
    parent: Option<SyntaxNode>,
    usings: Vec<UsingDirective>,
}

identity_eq!(UsingDirectiveListInfo, parent);

pub fn using_directive_list_info(node: &SyntaxNode) -> UsingDirectiveListInfo {
    match node.kind() {
        SyntaxKind::CompilationUnit
        | SyntaxKind::NamespaceDeclaration
        | SyntaxKind::FileScopedNamespaceDeclaration => UsingDirectiveListInfo {
            parent: Some(node.clone()),
            usings: node.children().filter_map(UsingDirective::cast).collect(),
        },
        _ => UsingDirectiveListInfo::default(),
    }
}

impl UsingDirectiveListInfo {
    pub fn success(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<&SyntaxNode> {
        self.parent.as_ref()
    }

    pub fn usings(&self) -> &[UsingDirective] {
        &self.usings
    }
}

/// A contiguous run of list items picked out by a selection.
///
/// The selection must begin between the first item's leading trivia and its first token,
/// and end between the last item's last token and the end of its trailing trivia. Empty
/// selections select nothing.
#[derive(Debug, Clone)]
pub struct SyntaxListSelection<T> {
    items: Vec<T>,
    span: TextRange,
    first_index: usize,
    last_index: usize,
}

impl<T: AstNode + Clone> SyntaxListSelection<T> {
    pub fn create(items: Vec<T>, span: TextRange) -> Option<Self> {
        if span.is_empty() {
            return None;
        }
        let first_index = items.iter().position(|item| {
            let full = full_range(item.syntax());
            let range = TextRange::from(item.syntax().text_range());
            full.start <= span.start && span.start <= range.start
        })?;
        let last_index = items
            .iter()
            .enumerate()
            .skip(first_index)
            .find(|(_, item)| {
                let full = full_range(item.syntax());
                let range = TextRange::from(item.syntax().text_range());
                range.end <= span.end && span.end <= full.end
            })
            .map(|(index, _)| index)?;
        Some(Self {
            items,
            span,
            first_index,
            last_index,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn span(&self) -> TextRange {
        self.span
    }

    pub fn first_index(&self) -> usize {
        self.first_index
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn count(&self) -> usize {
        self.last_index - self.first_index + 1
    }

    pub fn selected(&self) -> &[T] {
        &self.items[self.first_index..=self.last_index]
    }

    pub fn first(&self) -> &T {
        &self.items[self.first_index]
    }

    pub fn last(&self) -> &T {
        &self.items[self.last_index]
    }

    /// Range from the first selected item's first token to the last one's last token.
    pub fn range(&self) -> TextRange {
        TextRange {
            start: u32::from(self.first().syntax().text_range().start()),
            end: u32::from(self.last().syntax().text_range().end()),
        }
    }

    /// Like [`range`](Self::range) but including the owned leading and trailing trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange {
            start: full_range(self.first().syntax()).start,
            end: full_range(self.last().syntax()).end,
        }
    }
}

/// Selected statements of a block or switch section.
#[derive(Debug, Clone)]
pub struct StatementListSelection {
    info: StatementListInfo,
    selection: SyntaxListSelection<Statement>,
}

pub fn statement_list_selection(node: &SyntaxNode, span: TextRange) -> Option<StatementListSelection> {
    let info = statement_list_info(node);
    if !info.success() {
        return None;
    }
    let selection = SyntaxListSelection::create(info.statements.clone(), span)?;
    Some(StatementListSelection { info, selection })
}

impl StatementListSelection {
    pub fn info(&self) -> &StatementListInfo {
        &self.info
    }
}

impl Deref for StatementListSelection {
    type Target = SyntaxListSelection<Statement>;

    fn deref(&self) -> &Self::Target {
        &self.selection
    }
}

/// Selected members of a type, namespace or compilation unit.
#[derive(Debug, Clone)]
pub struct MemberDeclarationListSelection {
    info: MemberDeclarationListInfo,
    selection: SyntaxListSelection<MemberDeclaration>,
}

pub fn member_declaration_list_selection(
    node: &SyntaxNode,
    span: TextRange,
) -> Option<MemberDeclarationListSelection> {
    let info = member_declaration_list_info(node);
    if !info.success() {
        return None;
    }
    let selection = SyntaxListSelection::create(info.members.clone(), span)?;
    Some(MemberDeclarationListSelection { info, selection })
}

impl MemberDeclarationListSelection {
    pub fn info(&self) -> &MemberDeclarationListInfo {
        &self.info
    }
}

impl Deref for MemberDeclarationListSelection {
    type Target = SyntaxListSelection<MemberDeclaration>;

    fn deref(&self) -> &Self::Target {
        &self.selection
    }
}
