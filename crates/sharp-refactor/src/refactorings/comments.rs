use sharp_syntax::{
    first_token, following_token, preceding_token, MemberDeclaration, AstNode, Statement,
    SyntaxKind, SyntaxToken, TextRange,
};

use super::{header_range, range_of, token_range, whole_lines};
use crate::catalogue::RefactoringId;
use crate::context::RefactoringContext;
use crate::edit::EditSet;
use crate::error::RefactorError;
use crate::syntax_info::statement_list_info;

/// Trivia pass: `comment` touches the span.
pub(crate) fn compute(
    context: &mut RefactoringContext<'_>,
    comment: &SyntaxToken,
) -> Result<(), RefactorError> {
    match comment.kind() {
        SyntaxKind::SingleLineComment => {
            if context.is_enabled(RefactoringId::UncommentSingleLineComment) {
                let comments = single_line_comment_run(comment);
                context.register_edit(
                    RefactoringId::UncommentSingleLineComment,
                    RefactoringId::UncommentSingleLineComment.title(),
                    move |_| {
                        let mut edits = EditSet::new();
                        for comment in &comments {
                            let start = token_range(comment).start;
                            edits.delete(TextRange {
                                start,
                                end: start + 2,
                            });
                        }
                        Ok(edits)
                    },
                );
            }
        }
        SyntaxKind::MultiLineComment => {
            if context.is_enabled(RefactoringId::UncommentMultiLineComment) {
                let range = token_range(comment);
                let closed = comment.text().len() >= 4 && comment.text().ends_with("*/");
                context.register_edit(
                    RefactoringId::UncommentMultiLineComment,
                    RefactoringId::UncommentMultiLineComment.title(),
                    move |_| {
                        let mut edits = EditSet::new();
                        edits.delete(TextRange {
                            start: range.start,
                            end: range.start + 2,
                        });
                        if closed {
                            edits.delete(TextRange {
                                start: range.end - 2,
                                end: range.end,
                            });
                        }
                        Ok(edits)
                    },
                );
            }
        }
        _ => return Ok(()),
    }

    if context.is_enabled(RefactoringId::RemoveComment) {
        let range = token_range(comment);
        context.register_edit(
            RefactoringId::RemoveComment,
            RefactoringId::RemoveComment.title(),
            move |document| {
                let mut edits = EditSet::new();
                edits.delete(removal_range(document.text(), range));
                Ok(edits)
            },
        );
    }
    Ok(())
}

/// `//` comments on consecutive lines around `comment`, in document order.
fn single_line_comment_run(comment: &SyntaxToken) -> Vec<SyntaxToken> {
    let step = |token: &SyntaxToken, forward: bool| -> Option<SyntaxToken> {
        let mut newlines = 0;
        let mut current = if forward {
            following_token(token)
        } else {
            preceding_token(token)
        };
        while let Some(candidate) = current {
            match candidate.kind() {
                SyntaxKind::Whitespace => {}
                SyntaxKind::Newline => newlines += 1,
                SyntaxKind::SingleLineComment if newlines == 1 => return Some(candidate),
                _ => return None,
            }
            if newlines > 1 {
                return None;
            }
            current = if forward {
                following_token(&candidate)
            } else {
                preceding_token(&candidate)
            };
        }
        None
    };

    let mut run = vec![comment.clone()];
    let mut current = comment.clone();
    while let Some(previous) = step(&current, false) {
        run.insert(0, previous.clone());
        current = previous;
    }
    let mut current = comment.clone();
    while let Some(next) = step(&current, true) {
        run.push(next.clone());
        current = next;
    }
    run
}

/// The whole line when the comment is alone on it, otherwise the comment and the
/// blanks before it.
fn removal_range(text: &str, range: TextRange) -> TextRange {
    let lines = whole_lines(text, range);
    if lines != range {
        return lines;
    }
    let before = &text[..range.start_usize()];
    let blanks = before.len() - before.trim_end_matches([' ', '\t']).len();
    TextRange::new(range.start_usize() - blanks, range.end_usize())
}

/// Inserts `// ` on every non-blank line of `range`, at the smallest indentation.
pub(crate) fn comment_out_lines(text: &str, range: TextRange) -> EditSet {
    let start = text[..range.start_usize()]
        .rfind('\n')
        .map_or(0, |idx| idx + 1);
    let block = &text[start..range.end_usize()];
    let indent = block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut edits = EditSet::new();
    let mut offset = start;
    for line in block.split_inclusive('\n') {
        if !line.trim().is_empty() {
            edits.insert((offset + indent) as u32, "// ");
        }
        offset += line.len();
    }
    edits
}

/// Whether `range` occupies its lines alone.
fn is_alone_on_lines(text: &str, range: TextRange) -> bool {
    whole_lines(text, range) != range
}

pub(crate) fn compute_member(
    context: &mut RefactoringContext<'_>,
    member: &MemberDeclaration,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CommentOutMemberDeclaration) {
        return Ok(());
    }
    let header = header_range(member.syntax());
    if !header.contains_range(context.span()) {
        return Ok(());
    }
    let range = range_of(member.syntax());
    if !is_alone_on_lines(context.document().text(), range) {
        return Ok(());
    }
    context.register_edit(
        RefactoringId::CommentOutMemberDeclaration,
        RefactoringId::CommentOutMemberDeclaration.title(),
        move |document| Ok(comment_out_lines(document.text(), range)),
    );
    Ok(())
}

pub(crate) fn compute_statement(
    context: &mut RefactoringContext<'_>,
    statement: &Statement,
) -> Result<(), RefactorError> {
    if !context.is_enabled(RefactoringId::CommentOutStatement)
        || statement.kind() == SyntaxKind::Block
        || !statement_list_info(statement.syntax()).success()
    {
        return Ok(());
    }
    let range = range_of(statement.syntax());
    let span = context.span();
    let on_keyword = first_token(statement.syntax())
        .is_some_and(|token| token_range(&token).contains_range(span));
    let simple = !statement
        .syntax()
        .descendants()
        .any(|node| node.kind() == SyntaxKind::Block);
    if !(on_keyword || simple && range.contains_range(span)) {
        return Ok(());
    }
    if !is_alone_on_lines(context.document().text(), range) {
        return Ok(());
    }
    context.register_edit(
        RefactoringId::CommentOutStatement,
        RefactoringId::CommentOutStatement.title(),
        move |document| Ok(comment_out_lines(document.text(), range)),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::catalogue::RefactoringId;
    use crate::refactorings::testing::{check, check_not_offered};

    #[test]
    fn uncomments_consecutive_single_line_comments() {
        check(
            RefactoringId::UncommentSingleLineComment,
            "class C\n{\n    //int a;\n    /*caret*///int b;\n\n    //int c;\n}\n",
            "class C\n{\n    int a;\n    int b;\n\n    //int c;\n}\n",
        );
    }

    #[test]
    fn uncomments_multi_line_comment() {
        check(
            RefactoringId::UncommentMultiLineComment,
            "class C { /*caret*//*int a;*/ }",
            "class C { int a; }",
        );
    }

    #[test]
    fn removes_comment_line() {
        check(
            RefactoringId::RemoveComment,
            "class C\n{\n    // note/*caret*/\n    int a;\n}\n",
            "class C\n{\n    int a;\n}\n",
        );
    }

    #[test]
    fn removes_trailing_comment() {
        check(
            RefactoringId::RemoveComment,
            "class C\n{\n    int a; // note/*caret*/\n}\n",
            "class C\n{\n    int a;\n}\n",
        );
    }

    #[test]
    fn comments_out_member() {
        check(
            RefactoringId::CommentOutMemberDeclaration,
            "class C\n{\n    void /*caret*/M()\n    {\n        F();\n    }\n}\n",
            "class C\n{\n    // void M()\n    // {\n    //     F();\n    // }\n}\n",
        );
    }

    #[test]
    fn member_body_is_not_the_header() {
        check_not_offered(
            RefactoringId::CommentOutMemberDeclaration,
            "class C\n{\n    void M()\n    {\n        /*caret*/F();\n    }\n}\n",
        );
    }

    #[test]
    fn comments_out_statement() {
        check(
            RefactoringId::CommentOutStatement,
            "class C\n{\n    void M()\n    {\n        /*caret*/if (x)\n        {\n            F();\n        }\n        G();\n    }\n}\n",
            "class C\n{\n    void M()\n    {\n        // if (x)\n        // {\n        //     F();\n        // }\n        G();\n    }\n}\n",
        );
    }
}
