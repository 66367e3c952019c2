//! Token-level trivia helpers.
//!
//! Trivia are ordinary tokens in the tree. Ownership is derived on demand: a token's
//! trailing trivia run up to and including the first newline after it; everything else
//! between two significant tokens is leading trivia of the second.

use rowan::NodeOrToken;

use crate::parser::{SyntaxElement, SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

/// Zero-width token inserted by the parser for an expected token that is absent.
pub fn is_missing(token: &SyntaxToken) -> bool {
    !token.kind().is_trivia() && token.kind() != SyntaxKind::Eof && token.text().is_empty()
}

pub fn contains_missing(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|tok| is_missing(&tok))
}

fn is_significant(token: &SyntaxToken) -> bool {
    !token.kind().is_trivia() && !token.text().is_empty()
}

/// First non-trivia, non-missing token of `node`.
pub fn first_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(is_significant)
}

/// Last non-trivia, non-missing token of `node`.
pub fn last_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(is_significant)
        .last()
}

/// Token after `token` in document order, trivia included.
///
/// Unlike rowan's `SyntaxToken::next_token`, this steps over empty nodes (the parser
/// emits an empty `ModifierList` for declarations without modifiers).
pub fn following_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut element = next_element(token.clone().into())?;
    loop {
        element = match element {
            NodeOrToken::Token(tok) => return Some(tok),
            NodeOrToken::Node(node) => match first_token_in(&node) {
                Some(tok) => return Some(tok),
                None => next_element(node.into())?,
            },
        };
    }
}

/// Token before `token` in document order, trivia included.
pub fn preceding_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut element = prev_element(token.clone().into())?;
    loop {
        element = match element {
            NodeOrToken::Token(tok) => return Some(tok),
            NodeOrToken::Node(node) => match last_token_in(&node) {
                Some(tok) => return Some(tok),
                None => prev_element(node.into())?,
            },
        };
    }
}

fn next_element(mut element: SyntaxElement) -> Option<SyntaxElement> {
    loop {
        if let Some(sibling) = element.next_sibling_or_token() {
            return Some(sibling);
        }
        element = element.parent()?.into();
    }
}

fn prev_element(mut element: SyntaxElement) -> Option<SyntaxElement> {
    loop {
        if let Some(sibling) = element.prev_sibling_or_token() {
            return Some(sibling);
        }
        element = element.parent()?.into();
    }
}

fn first_token_in(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.descendants_with_tokens().find_map(|it| it.into_token())
}

fn last_token_in(node: &SyntaxNode) -> Option<SyntaxToken> {
    let mut child = node.last_child_or_token();
    while let Some(element) = child {
        match &element {
            NodeOrToken::Token(tok) => return Some(tok.clone()),
            NodeOrToken::Node(inner) => {
                if let Some(tok) = last_token_in(inner) {
                    return Some(tok);
                }
            }
        }
        child = element.prev_sibling_or_token();
    }
    None
}

/// Next significant token in document order.
pub fn next_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut current = following_token(token);
    while let Some(tok) = current {
        if is_significant(&tok) || tok.kind() == SyntaxKind::Eof {
            return Some(tok);
        }
        current = following_token(&tok);
    }
    None
}

/// Previous significant token in document order.
pub fn prev_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut current = preceding_token(token);
    while let Some(tok) = current {
        if is_significant(&tok) {
            return Some(tok);
        }
        current = preceding_token(&tok);
    }
    None
}

/// Trivia owned by `token` after it: up to and including the first newline.
pub fn trailing_trivia(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut out = Vec::new();
    let mut current = following_token(token);
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            break;
        }
        let newline = tok.kind() == SyntaxKind::Newline;
        current = following_token(&tok);
        out.push(tok);
        if newline {
            break;
        }
    }
    out
}

/// Trivia owned by `token` before it.
pub fn leading_trivia(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut before = Vec::new();
    let mut current = preceding_token(token);
    let mut reached_start = true;
    while let Some(tok) = current {
        if !tok.kind().is_trivia() && !tok.text().is_empty() {
            reached_start = false;
            break;
        }
        current = preceding_token(&tok);
        if tok.kind().is_trivia() {
            before.push(tok);
        }
    }
    before.reverse();

    if reached_start {
        return before;
    }
    // Everything up to the first newline belongs to the previous token.
    match before.iter().position(|t| t.kind() == SyntaxKind::Newline) {
        Some(idx) => before.split_off(idx + 1),
        None => Vec::new(),
    }
}

/// Range of `node` including the leading trivia of its first token and the trailing
/// trivia of its last token.
pub fn full_range(node: &SyntaxNode) -> TextRange {
    let range = TextRange::from(node.text_range());
    let start = first_token(node)
        .and_then(|tok| leading_trivia(&tok).first().map(|t| TextRange::from(t.text_range())))
        .map_or(range.start, |r| r.start.min(range.start));
    let end = last_token(node)
        .and_then(|tok| trailing_trivia(&tok).last().map(|t| TextRange::from(t.text_range())))
        .map_or(range.end, |r| r.end.max(range.end));
    TextRange {
        start,
        end,
    }
}

/// Whitespace at the start of the line containing `offset`.
pub fn line_indentation(text: &str, offset: usize) -> &str {
    let offset = offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let rest = &text[line_start..];
    let len = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..len]
}

/// `region` for `#region Foo`, `endif` for `#  endif`.
pub fn directive_name(text: &str) -> &str {
    let rest = text.trim_start_matches('#').trim_start();
    let len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_csharp;
    use pretty_assertions::assert_eq;

    fn token(root: &SyntaxNode, text: &str) -> SyntaxToken {
        root.descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.text() == text)
            .unwrap_or_else(|| panic!("no token {text:?}"))
    }

    fn texts(tokens: &[SyntaxToken]) -> String {
        tokens.iter().map(|t| t.text()).collect()
    }

    #[test]
    fn trailing_trivia_stops_after_newline() {
        let root = parse_csharp("class C { int a; // one\n    // two\n    int b; }").syntax();
        let semicolon = token(&root, ";");
        assert_eq!(texts(&trailing_trivia(&semicolon)), " // one\n");
        let b_type = token(&root, "int");
        let second_int = root
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.text() == "int")
            .nth(1)
            .expect("second int");
        assert_eq!(texts(&leading_trivia(&second_int)), "    // two\n    ");
        assert_eq!(texts(&leading_trivia(&b_type)), "");
    }

    #[test]
    fn leading_trivia_at_file_start_is_everything() {
        let root = parse_csharp("// header\n\nclass C { }").syntax();
        let class_kw = token(&root, "class");
        assert_eq!(texts(&leading_trivia(&class_kw)), "// header\n\n");
    }

    #[test]
    fn full_range_covers_owned_trivia() {
        let text = "class C\n{\n    // doc\n    int a; // tail\n    int b;\n}";
        let root = parse_csharp(text).syntax();
        let field = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FieldDeclaration)
            .expect("field");
        let range = full_range(&field);
        assert_eq!(
            &text[range.start_usize()..range.end_usize()],
            "    // doc\n    int a; // tail\n"
        );
    }

    #[test]
    fn token_steps_cross_empty_modifier_lists() {
        let text = "class C\n{\n    int a;\n\n    /// <summary>M</summary>\n    void M() { }\n}";
        let root = parse_csharp(text).syntax();
        let method = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::MethodDeclaration)
            .expect("method");
        assert!(method
            .children()
            .any(|n| n.kind() == SyntaxKind::ModifierList && n.text_range().is_empty()));

        let void_kw = token(&root, "void");
        assert_eq!(prev_token(&void_kw).map(|t| t.text().to_string()), Some(";".into()));
        let semicolon = token(&root, ";");
        assert_eq!(next_token(&semicolon).map(|t| t.text().to_string()), Some("void".into()));
        assert_eq!(
            preceding_token(&void_kw).map(|t| t.kind()),
            Some(SyntaxKind::Whitespace)
        );

        let range = full_range(&method);
        assert_eq!(
            &text[range.start_usize()..range.end_usize()],
            "\n    /// <summary>M</summary>\n    void M() { }\n"
        );
    }

    #[test]
    fn missing_tokens_are_detected() {
        let root = parse_csharp("class C { void M() { F() } }").syntax();
        let stmt = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ExpressionStatement)
            .expect("statement");
        assert!(contains_missing(&stmt));
        assert_eq!(last_token(&stmt).map(|t| t.text().to_string()), Some(")".into()));
    }

    #[test]
    fn indentation_and_directive_names() {
        let text = "a\n    b\n\tc";
        assert_eq!(line_indentation(text, 7), "    ");
        assert_eq!(line_indentation(text, text.len()), "\t");
        assert_eq!(directive_name("#region Foo"), "region");
        assert_eq!(directive_name("#  endif"), "endif");
    }
}
