//! Member-level rewrites: sorting, removal, moving a type to its own file and
//! generating a constructor for selected fields.

use sharp_syntax::{
    first_token, leading_trivia, support, AstNode, FieldDeclaration, MemberDeclaration,
    NamespaceDeclaration, PropertyLike, SyntaxKind, SyntaxNode, TextRange, TypeDeclaration,
};

use super::{header_range, indentation_of, newline, range_of, reindent, token_range, INDENT};
use crate::catalogue::RefactoringId;
use crate::context::{CodeAction, CodeActionResult, RefactoringContext};
use crate::document::{Document, Solution};
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::{member_declaration_list_info, MemberDeclarationListSelection};

/// Position of a member kind in the sorted order; `None` for members that are never moved.
pub(crate) fn member_rank(member: &MemberDeclaration) -> Option<u8> {
    let rank = match member.kind() {
        SyntaxKind::FieldDeclaration => {
            let is_const = FieldDeclaration::cast(member.syntax().clone())
                .is_some_and(|field| field.is_const());
            if is_const {
                0
            } else {
                1
            }
        }
        SyntaxKind::ConstructorDeclaration => 2,
        SyntaxKind::DestructorDeclaration => 3,
        SyntaxKind::DelegateDeclaration => 4,
        SyntaxKind::EventFieldDeclaration => 5,
        SyntaxKind::EventDeclaration => 6,
        SyntaxKind::PropertyDeclaration => 7,
        SyntaxKind::IndexerDeclaration => 8,
        SyntaxKind::MethodDeclaration => 9,
        SyntaxKind::ConversionOperatorDeclaration => 10,
        SyntaxKind::OperatorDeclaration => 11,
        SyntaxKind::EnumDeclaration => 12,
        SyntaxKind::InterfaceDeclaration => 13,
        SyntaxKind::StructDeclaration => 14,
        SyntaxKind::ClassDeclaration => 15,
        SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration => 16,
        _ => return None,
    };
    Some(rank)
}

pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if context.is_enabled(RefactoringId::SortMemberDeclarations) && on_braces(context, member) {
        let info = member_declaration_list_info(member.syntax());
        if info.members().len() > 1 {
            register_sort(context, info.members())?;
        }
    }

    let header = header_range(member.syntax());
    if context.is_enabled(RefactoringId::RemoveMemberDeclaration)
        && header.contains_range(context.span())
        && member.kind() != SyntaxKind::IncompleteMember
    {
        let text = context.document().text();
        let range = removal_range(text, member_chunk(text, member.syntax()));
        context.register_edit(
            RefactoringId::RemoveMemberDeclaration,
            RefactoringId::RemoveMemberDeclaration.title(),
            move |_| {
                let mut edits = EditSet::new();
                edits.delete(range);
                Ok(edits)
            },
        );
    }

    if context.is_enabled(RefactoringId::ExtractTypeDeclarationToNewFile) {
        compute_extract_type(context, member);
    }
    Ok(())
}

fn on_braces(context: &RefactoringContext<'_>, member: &MemberDeclaration) -> bool {
    if !matches!(
        member.kind(),
        SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::NamespaceDeclaration
    ) {
        return false;
    }
    let span = context.span();
    [SyntaxKind::OpenBrace, SyntaxKind::CloseBrace]
        .into_iter()
        .filter_map(|kind| support::token(member.syntax(), kind))
        .any(|brace| token_range(&brace).contains_range(span))
}

/// Stable sort of `members` in place; the whitespace between them stays where it is.
fn register_sort(
    context: &mut RefactoringContext<'_>,
    members: &[MemberDeclaration],
) -> Result<(), RefactorError> {
    let mut ranked = Vec::with_capacity(members.len());
    for member in members {
        match member_rank(member) {
            Some(rank) => ranked.push((rank, member)),
            None => return Ok(()),
        }
    }
    if ranked.windows(2).all(|pair| pair[0].0 <= pair[1].0) {
        return Ok(());
    }
    let text = context.document().text();
    let chunks: Vec<TextRange> = members
        .iter()
        .map(|member| member_chunk(text, member.syntax()))
        .collect();
    let mut order: Vec<usize> = (0..members.len()).collect();
    order.sort_by_key(|&index| ranked[index].0);

    let mut replacement = String::new();
    for (position, &index) in order.iter().enumerate() {
        if position > 0 {
            replacement.push_str(slice(text, chunks[position - 1].end, chunks[position].start));
        }
        replacement.push_str(slice(text, chunks[index].start, chunks[index].end));
    }
    let range = TextRange {
        start: chunks[0].start,
        end: chunks[chunks.len() - 1].end,
    };
    tracing::trace!(
        target: "sharp.refactor",
        members = members.len(),
        "sorting member declarations"
    );
    context.register_edit(
        RefactoringId::SortMemberDeclarations,
        RefactoringId::SortMemberDeclarations.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.replace(range, replacement.clone());
            Ok(edits)
        },
    );
    Ok(())
}

fn slice(text: &str, start: u32, end: u32) -> &str {
    text.get(start as usize..end as usize).unwrap_or("")
}

/// A member together with the comments on the lines above it, from the start of the
/// first such line.
pub(crate) fn member_chunk(text: &str, member: &SyntaxNode) -> TextRange {
    let range = range_of(member);
    let start = first_token(member)
        .and_then(|token| {
            leading_trivia(&token)
                .into_iter()
                .find(|trivia| trivia.kind().is_comment())
        })
        .map_or(range.start, |comment| token_range(&comment).start);
    let line_start = text[..start as usize].rfind('\n').map_or(0, |idx| idx + 1);
    let start = if text[line_start..start as usize].trim().is_empty() {
        line_start as u32
    } else {
        start
    };
    TextRange {
        start,
        end: range.end,
    }
}

/// `chunk` plus its line break and one neighbouring blank line, so that no double blank
/// line is left behind.
pub(crate) fn removal_range(text: &str, chunk: TextRange) -> TextRange {
    let mut start = chunk.start as usize;
    let mut end = chunk.end as usize;
    let rest = &text[end..];
    let trailing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    if rest[trailing..].starts_with("\r\n") {
        end += trailing + 2;
    } else if rest[trailing..].starts_with('\n') {
        end += trailing + 1;
    }
    let before = &text[..start];
    if before.ends_with("\n\n") || before.ends_with("\r\n\r\n") {
        start -= if before.ends_with("\r\n") { 2 } else { 1 };
    } else if text[end..].starts_with("\r\n") {
        end += 2;
    } else if text[end..].starts_with('\n') {
        end += 1;
    }
    TextRange::new(start, end)
}

/// A top-level type, when the file declares more than one, moves to `{Name}.cs` next to
/// the document with the same `using` directives and namespace.
fn compute_extract_type(context: &mut RefactoringContext<'_>, member: &MemberDeclaration) {
    let Some(declaration) = TypeDeclaration::cast(member.syntax().clone()) else {
        return;
    };
    let Some(name) = declaration.identifier() else {
        return;
    };
    if !token_range(&name).contains_range(context.span()) {
        return;
    }
    let Some(container) = member.syntax().parent() else {
        return;
    };
    let namespace = NamespaceDeclaration::cast(container.clone());
    if container.kind() != SyntaxKind::CompilationUnit && namespace.is_none() {
        return;
    }
    let document = context.document();
    let root = document.syntax();
    let top_level_types = root
        .descendants()
        .filter(|node| {
            node.kind().is_type_declaration()
                && node.parent().is_some_and(|parent| {
                    matches!(
                        parent.kind(),
                        SyntaxKind::CompilationUnit
                            | SyntaxKind::NamespaceDeclaration
                            | SyntaxKind::FileScopedNamespaceDeclaration
                    )
                })
        })
        .count();
    if top_level_types < 2 {
        return;
    }

    let text = document.text();
    let nl = newline(text);
    let chunk = member_chunk(text, member.syntax());
    let removed = removal_range(text, chunk);
    let indent = indentation_of(document, member.syntax());
    let usings: Vec<String> = root
        .children()
        .filter(|node| node.kind() == SyntaxKind::UsingDirective)
        .map(|node| node.text().to_string())
        .collect();
    let mut new_text = String::new();
    for using in &usings {
        new_text.push_str(using);
        new_text.push_str(nl);
    }
    if !usings.is_empty() {
        new_text.push_str(nl);
    }
    let moved = slice(text, chunk.start, chunk.end).trim_start();
    match namespace.as_ref().and_then(|ns| ns.name().map(|n| (ns, n))) {
        Some((ns, ns_name)) if !ns.is_file_scoped() => {
            new_text.push_str(&format!(
                "namespace {}{nl}{{{nl}{INDENT}{}{nl}}}{nl}",
                ns_name.syntax().text(),
                reindent(moved, &indent, INDENT)
            ));
        }
        Some((_, ns_name)) => {
            new_text.push_str(&format!(
                "namespace {};{nl}{nl}{}{nl}",
                ns_name.syntax().text(),
                reindent(moved, &indent, "")
            ));
        }
        None => {
            new_text.push_str(&format!("{}{nl}", reindent(moved, &indent, "")));
        }
    }

    let new_id = document.id().sibling(&format!("{}.cs", name.text()));
    let original = document.clone();
    let new_document = Document::new(new_id, new_text).with_language_version(document.language_version());
    let action = CodeAction::new(
        RefactoringId::ExtractTypeDeclarationToNewFile,
        RefactoringId::ExtractTypeDeclarationToNewFile.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.delete(removed);
            let updated = original.apply_edits(edits)?;
            Ok(CodeActionResult::Solution(
                Solution::new()
                    .with_document(updated)
                    .with_document(new_document.clone()),
            ))
        },
    );
    context.register(action);
}

pub(crate) fn compute_selected(
    context: &mut RefactoringContext<'_>,
    selection: &MemberDeclarationListSelection,
) -> Result<(), RefactorError> {
    if context.is_enabled(RefactoringId::SortMemberDeclarations) && selection.count() > 1 {
        register_sort(context, selection.selected())?;
    }
    if context.is_enabled(RefactoringId::IntroduceConstructor) {
        compute_introduce_constructor(context, selection);
    }
    Ok(())
}

/// Instance field or auto-property without initializer: `(type, name)`.
fn assignable_member(member: &MemberDeclaration) -> Option<(String, String)> {
    let is_static = member
        .modifiers()
        .is_some_and(|modifiers| modifiers.has(SyntaxKind::StaticKw));
    if is_static {
        return None;
    }
    match member.kind() {
        SyntaxKind::FieldDeclaration => {
            let field = FieldDeclaration::cast(member.syntax().clone())?;
            if field.is_const() {
                return None;
            }
            let declaration = field.declaration()?;
            let mut declarators = declaration.declarators();
            let declarator = declarators.next()?;
            if declarators.next().is_some() || declarator.initializer().is_some() {
                return None;
            }
            Some((
                declaration.ty()?.syntax().text().to_string(),
                declarator.identifier()?.text().to_string(),
            ))
        }
        SyntaxKind::PropertyDeclaration => {
            let property = PropertyLike::cast(member.syntax().clone())?;
            if !property.is_auto_property() || property.initializer().is_some() {
                return None;
            }
            Some((
                property.ty()?.syntax().text().to_string(),
                property.identifier()?.text().to_string(),
            ))
        }
        _ => None,
    }
}

/// `_name` and `Name` both become `name`.
fn parameter_name(member_name: &str) -> String {
    let trimmed = member_name.trim_start_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => member_name.to_string(),
    }
}

fn compute_introduce_constructor(
    context: &mut RefactoringContext<'_>,
    selection: &MemberDeclarationListSelection,
) {
    let Some(parent) = selection.info().parent() else {
        return;
    };
    if !matches!(
        parent.kind(),
        SyntaxKind::ClassDeclaration | SyntaxKind::StructDeclaration
    ) {
        return;
    }
    let Some(type_name) = TypeDeclaration::cast(parent.clone()).and_then(|t| t.identifier()) else {
        return;
    };
    let assignable: Vec<(String, String)> = selection
        .selected()
        .iter()
        .filter_map(assignable_member)
        .collect();
    if assignable.is_empty() {
        return;
    }

    let document = context.document();
    let text = document.text();
    let nl = newline(text);
    let members = selection.items();
    let indent = indentation_of(document, members[0].syntax());
    let inner = format!("{indent}{INDENT}");
    let parameters: Vec<String> = assignable
        .iter()
        .map(|(ty, name)| format!("{ty} {}", parameter_name(name)))
        .collect();
    let mut constructor = format!(
        "public {}({}){nl}{indent}{{",
        type_name.text(),
        parameters.join(", ")
    );
    for (_, name) in &assignable {
        let parameter = parameter_name(name);
        let target = if *name == parameter {
            format!("this.{name}")
        } else {
            name.clone()
        };
        constructor.push_str(&format!("{nl}{inner}{target} = {parameter};"));
    }
    constructor.push_str(&format!("{nl}{indent}}}"));

    // After the last field or constructor, or ahead of everything else.
    let (offset, inserted) = match members
        .iter()
        .rposition(|member| member_rank(member).is_some_and(|rank| rank <= 2))
    {
        Some(index) => (
            range_of(members[index].syntax()).end,
            format!("{nl}{nl}{indent}{constructor}"),
        ),
        None => (
            member_chunk(text, members[0].syntax()).start,
            format!("{indent}{constructor}{nl}{nl}"),
        ),
    };
    context.register_edit(
        RefactoringId::IntroduceConstructor,
        RefactoringId::IntroduceConstructor.title(),
        move |_| {
            let mut edits = EditSet::new();
            edits.insert(offset, inserted.clone());
            Ok(edits)
        },
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::parameter_name;
    use crate::catalogue::RefactoringId;
    use crate::document::FileId;
    use crate::refactorings::testing::{actions, apply, check, check_not_offered};

    #[test]
    fn sorts_members_by_kind() {
        check(
            RefactoringId::SortMemberDeclarations,
            "class C\n/*caret*/{\n    void M() { }\n\n    int _f;\n\n    const int K = 1;\n\n    C() { }\n}\n",
            "class C\n{\n    const int K = 1;\n\n    int _f;\n\n    C() { }\n\n    void M() { }\n}\n",
        );
    }

    #[test]
    fn sorted_members_are_not_offered() {
        check_not_offered(
            RefactoringId::SortMemberDeclarations,
            "class C\n/*caret*/{\n    int _f;\n\n    void M() { }\n}\n",
        );
    }

    #[test]
    fn doc_comments_move_with_their_member() {
        check(
            RefactoringId::SortMemberDeclarations,
            "class C\n{\n    /// <summary>M</summary>\n    void M() { }\n\n    int _f;\n/*caret*/}\n",
            "class C\n{\n    int _f;\n\n    /// <summary>M</summary>\n    void M() { }\n}\n",
        );
    }

    #[test]
    fn sorts_selected_members_only() {
        check(
            RefactoringId::SortMemberDeclarations,
            "class C\n{\n    void A() { }\n\n    /*start*/void B() { }\n\n    int _f;/*end*/\n}\n",
            "class C\n{\n    void A() { }\n\n    int _f;\n\n    void B() { }\n}\n",
        );
    }

    #[test]
    fn removes_member_and_one_blank_line() {
        check(
            RefactoringId::RemoveMemberDeclaration,
            "class C\n{\n    int _a;\n\n    void /*caret*/M() { }\n\n    int _b;\n}\n",
            "class C\n{\n    int _a;\n\n    int _b;\n}\n",
        );
        check(
            RefactoringId::RemoveMemberDeclaration,
            "class C\n{\n    int /*caret*/_a;\n\n    int _b;\n}\n",
            "class C\n{\n    int _b;\n}\n",
        );
    }

    #[test]
    fn body_is_not_the_header() {
        check_not_offered(
            RefactoringId::RemoveMemberDeclaration,
            "class C\n{\n    void M()\n    {\n        /*caret*/F();\n    }\n}\n",
        );
    }

    #[test]
    fn extracts_type_to_new_file() {
        let all = actions(
            "using System;\n\nnamespace N\n{\n    class A\n    {\n    }\n\n    class /*caret*/B\n    {\n        int _x;\n    }\n}\n",
        );
        let action = all
            .iter()
            .find(|a| a.refactoring == RefactoringId::ExtractTypeDeclarationToNewFile)
            .expect("offered");
        let result = apply(action);
        let solution = result.solution().expect("solution result");
        assert_eq!(solution.len(), 2);
        assert_eq!(
            solution.get(&FileId::new("Test.cs")).map(|d| d.text()),
            Some("using System;\n\nnamespace N\n{\n    class A\n    {\n    }\n}\n")
        );
        assert_eq!(
            solution.get(&FileId::new("B.cs")).map(|d| d.text()),
            Some("using System;\n\nnamespace N\n{\n    class B\n    {\n        int _x;\n    }\n}\n")
        );
    }

    #[test]
    fn single_type_stays() {
        check_not_offered(
            RefactoringId::ExtractTypeDeclarationToNewFile,
            "class /*caret*/A\n{\n}\n",
        );
    }

    #[test]
    fn introduces_constructor_after_fields() {
        check(
            RefactoringId::IntroduceConstructor,
            "class Point\n{\n    /*start*/int _x;\n\n    public int Y { get; set; }/*end*/\n}\n",
            "class Point\n{\n    int _x;\n\n    public Point(int x, int y)\n    {\n        _x = x;\n        Y = y;\n    }\n\n    public int Y { get; set; }\n}\n",
        );
    }

    #[test]
    fn camel_cases_parameter_names() {
        assert_eq!(parameter_name("_value"), "value");
        assert_eq!(parameter_name("Name"), "name");
        assert_eq!(parameter_name("count"), "count");
    }
}
