//! Transformation providers.
//!
//! Each module exposes `compute*` entry points called by the engine. A provider checks
//! that its refactoring is enabled, matches the syntax through `syntax_info`, and
//! registers a deferred rewrite that produces text edits against the original document.
//! Rewrites capture cloned nodes and infos only.

use sharp_syntax::{
    last_token, line_indentation, next_token, prev_token, AstNode, Expression, SyntaxKind,
    SyntaxNode, SyntaxToken, TextRange,
};

use crate::document::Document;

pub(crate) mod accessibility;
pub(crate) mod assignment;
pub(crate) mod attributes;
pub(crate) mod binary;
pub(crate) mod bodies;
pub(crate) mod braces;
pub(crate) mod cast;
pub(crate) mod comments;
pub(crate) mod conditional;
pub(crate) mod directives;
pub(crate) mod generics;
pub(crate) mod if_statements;
pub(crate) mod initializers;
pub(crate) mod literals;
pub(crate) mod local_declarations;
pub(crate) mod loops;
pub(crate) mod members;
pub(crate) mod null_checks;
pub(crate) mod parentheses;
pub(crate) mod unary;
pub(crate) mod wrap;

/// One level of indentation in generated code.
pub(crate) const INDENT: &str = "    ";

pub(crate) fn range_of(node: &SyntaxNode) -> TextRange {
    TextRange::from(node.text_range())
}

pub(crate) fn token_range(token: &SyntaxToken) -> TextRange {
    TextRange::from(token.text_range())
}

pub(crate) fn text_of(node: &SyntaxNode) -> String {
    node.text().to_string()
}

/// `\r\n` when the document already uses it.
pub(crate) fn newline(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Indentation of the line on which `node` starts.
pub(crate) fn indentation_of(document: &Document, node: &SyntaxNode) -> String {
    line_indentation(document.text(), range_of(node).start_usize()).to_string()
}

/// Prefixes every non-blank line after the first with `extra`.
pub(crate) fn indent_following_lines(text: &str, extra: &str) -> String {
    map_following_lines(text, |line| {
        if line.trim().is_empty() {
            line.to_string()
        } else {
            format!("{extra}{line}")
        }
    })
}

/// Strips one `unit` of indentation from every line after the first that has it.
pub(crate) fn dedent_following_lines(text: &str, unit: &str) -> String {
    map_following_lines(text, |line| {
        line.strip_prefix(unit).unwrap_or(line).to_string()
    })
}

/// Moves every line after the first from indentation `from` to `to`; lines not starting
/// with `from` are kept.
pub(crate) fn reindent(text: &str, from: &str, to: &str) -> String {
    map_following_lines(text, |line| match line.strip_prefix(from) {
        Some(rest) if !line.trim().is_empty() => format!("{to}{rest}"),
        _ => line.to_string(),
    })
}

fn map_following_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split_inclusive('\n').enumerate() {
        if index == 0 {
            out.push_str(line);
        } else {
            out.push_str(&f(line));
        }
    }
    out
}

/// Extends `range` to whole lines when it is alone on them: the indentation before it
/// and the line break after it (with any trailing blanks) are included.
pub(crate) fn whole_lines(text: &str, range: TextRange) -> TextRange {
    let start = range.start_usize().min(text.len());
    let end = range.end_usize().min(text.len());
    let line_start = text[..start].rfind('\n').map_or(0, |idx| idx + 1);
    let rest = &text[end..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after = &rest[blanks..];
    let line_break = if after.starts_with("\r\n") {
        Some(2)
    } else if after.starts_with('\n') {
        Some(1)
    } else if after.is_empty() {
        Some(0)
    } else {
        None
    };
    match line_break {
        Some(len) if text[line_start..start].trim().is_empty() => {
            TextRange::new(line_start, end + blanks + len)
        }
        _ => range,
    }
}

/// From the end of the significant token before `node` to the end of `node`.
///
/// Replacing this range moves `node` relative to its predecessor without touching
/// anything before it.
pub(crate) fn range_after_previous_token(node: &SyntaxNode) -> Option<TextRange> {
    let first = sharp_syntax::first_token(node)?;
    let previous = prev_token(&first)?;
    Some(TextRange {
        start: token_range(&previous).end,
        end: range_of(node).end,
    })
}

/// From the start of a member to the start of its body: attributes, modifiers, type,
/// name and parameters.
pub(crate) fn header_range(member: &SyntaxNode) -> TextRange {
    let range = range_of(member);
    let body_start = member
        .children_with_tokens()
        .find(|element| match (element.as_node(), element.as_token()) {
            (Some(node), _) => matches!(
                node.kind(),
                SyntaxKind::Block | SyntaxKind::AccessorList | SyntaxKind::ArrowExpressionClause
            ),
            (None, Some(token)) => token.kind() == SyntaxKind::OpenBrace,
            (None, None) => false,
        })
        .map(|element| TextRange::from(element.text_range()).start);
    TextRange {
        start: range.start,
        end: body_start.unwrap_or(range.end),
    }
}

/// Next significant token after `node`, when there is one in the document.
pub(crate) fn token_after(node: &SyntaxNode) -> Option<SyntaxToken> {
    next_token(&last_token(node)?).filter(|t| t.kind() != SyntaxKind::Eof)
}

/// Whether any comment or directive lies inside `range` of `node`'s subtree.
pub(crate) fn has_comments_or_directives(node: &SyntaxNode, range: TextRange) -> bool {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| t.kind().is_comment() || t.kind().is_directive())
        .any(|t| range.contains_range(token_range(&t)))
}

/// Binding strength of an expression; higher binds tighter.
pub(crate) fn precedence(expression: &Expression) -> u8 {
    match expression.kind() {
        SyntaxKind::AssignmentExpression
        | SyntaxKind::SimpleLambdaExpression
        | SyntaxKind::ParenthesizedLambdaExpression
        | SyntaxKind::AnonymousMethodExpression
        | SyntaxKind::ThrowExpression => 1,
        SyntaxKind::ConditionalExpression => 2,
        SyntaxKind::BinaryExpression => sharp_syntax::BinaryExpression::cast(
            expression.syntax().clone(),
        )
        .map_or(3, |binary| binary_precedence(binary.operator_kind())),
        SyntaxKind::IsPatternExpression => binary_precedence(SyntaxKind::IsKw),
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::CastExpression | SyntaxKind::AwaitExpression => {
            UNARY_PRECEDENCE
        }
        _ => PRIMARY_PRECEDENCE,
    }
}

pub(crate) const UNARY_PRECEDENCE: u8 = 14;
pub(crate) const PRIMARY_PRECEDENCE: u8 = 15;

pub(crate) fn binary_precedence(operator: SyntaxKind) -> u8 {
    match operator {
        SyntaxKind::QuestionQuestion => 3,
        SyntaxKind::PipePipe => 4,
        SyntaxKind::AmpAmp => 5,
        SyntaxKind::Pipe => 6,
        SyntaxKind::Caret => 7,
        SyntaxKind::Amp => 8,
        SyntaxKind::EqEq | SyntaxKind::BangEq => 9,
        SyntaxKind::Less
        | SyntaxKind::LessEq
        | SyntaxKind::Greater
        | SyntaxKind::GreaterEq
        | SyntaxKind::IsKw
        | SyntaxKind::AsKw => 10,
        SyntaxKind::LeftShift | SyntaxKind::RightShift => 11,
        SyntaxKind::Plus | SyntaxKind::Minus => 12,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => 13,
        _ => 3,
    }
}

/// Text of `expression`, parenthesized when it binds looser than `min`.
pub(crate) fn parenthesize_below(expression: &Expression, min: u8) -> String {
    let text = text_of(expression.syntax());
    if precedence(expression) < min {
        format!("({text})")
    } else {
        text
    }
}

/// Negated form of a boolean expression, as text.
pub(crate) fn logically_invert(expression: &Expression) -> String {
    invert(expression).text
}

struct Inverted {
    text: String,
    precedence: u8,
}

impl Inverted {
    fn at_least(self, min: u8) -> String {
        if self.precedence < min {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

fn invert(expression: &Expression) -> Inverted {
    let syntax = expression.syntax();
    match expression.kind() {
        SyntaxKind::ParenthesizedExpression => {
            let inner = expression.walk_down_parentheses();
            let inverted = invert(&inner);
            Inverted {
                text: inverted.at_least(UNARY_PRECEDENCE),
                precedence: PRIMARY_PRECEDENCE,
            }
        }
        SyntaxKind::LiteralExpression => {
            let text = match sharp_syntax::first_token(syntax).map(|t| t.kind()) {
                Some(SyntaxKind::TrueKw) => "false".to_string(),
                Some(SyntaxKind::FalseKw) => "true".to_string(),
                _ => format!("!{}", text_of(syntax)),
            };
            Inverted {
                text,
                precedence: PRIMARY_PRECEDENCE,
            }
        }
        SyntaxKind::PrefixUnaryExpression => {
            let unary = sharp_syntax::UnaryExpression::cast(syntax.clone());
            match unary.as_ref().and_then(|u| {
                (u.operator_kind() == SyntaxKind::Bang).then(|| u.operand()).flatten()
            }) {
                Some(operand) => {
                    let operand = operand.walk_down_parentheses();
                    Inverted {
                        text: text_of(operand.syntax()),
                        precedence: precedence(&operand),
                    }
                }
                None => negate(expression),
            }
        }
        SyntaxKind::BinaryExpression => {
            let Some(binary) = sharp_syntax::BinaryExpression::cast(syntax.clone()) else {
                return negate(expression);
            };
            let operator = binary.operator_kind();
            let swapped = match operator {
                SyntaxKind::EqEq => Some("!="),
                SyntaxKind::BangEq => Some("=="),
                SyntaxKind::Less => Some(">="),
                SyntaxKind::LessEq => Some(">"),
                SyntaxKind::Greater => Some("<="),
                SyntaxKind::GreaterEq => Some("<"),
                _ => None,
            };
            if let (Some(swapped), Some(token)) = (swapped, binary.operator()) {
                return Inverted {
                    text: replace_token_text(syntax, &token, swapped),
                    precedence: binary_precedence(operator),
                };
            }
            let (Some(left), Some(right)) = (binary.left(), binary.right()) else {
                return negate(expression);
            };
            let (joined, joined_kind) = match operator {
                SyntaxKind::AmpAmp => ("||", SyntaxKind::PipePipe),
                SyntaxKind::PipePipe => ("&&", SyntaxKind::AmpAmp),
                _ => return negate(expression),
            };
            let min = binary_precedence(joined_kind);
            Inverted {
                text: format!(
                    "{} {joined} {}",
                    invert(&left).at_least(min),
                    invert(&right).at_least(min)
                ),
                precedence: min,
            }
        }
        _ => negate(expression),
    }
}

fn negate(expression: &Expression) -> Inverted {
    Inverted {
        text: format!("!{}", parenthesize_below(expression, UNARY_PRECEDENCE)),
        precedence: UNARY_PRECEDENCE,
    }
}

/// Text of `node` with `token` replaced by `replacement`.
pub(crate) fn replace_token_text(node: &SyntaxNode, token: &SyntaxToken, replacement: &str) -> String {
    let base = range_of(node).start;
    let range = token_range(token);
    let text = text_of(node);
    let start = (range.start - base) as usize;
    let end = (range.end - base) as usize;
    format!("{}{replacement}{}", &text[..start], &text[end..])
}

/// Statements of a block body or the statement itself.
pub(crate) fn embedded_statements(statement: &sharp_syntax::Statement) -> Vec<sharp_syntax::Statement> {
    match sharp_syntax::Block::cast(statement.syntax().clone()) {
        Some(block) => block.statements().collect(),
        None => vec![statement.clone()],
    }
}

/// Equivalence of two expressions ignoring trivia.
pub(crate) fn are_equivalent(left: &SyntaxNode, right: &SyntaxNode) -> bool {
    let significant = |node: &SyntaxNode| {
        node.descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect::<Vec<_>>()
    };
    significant(left) == significant(right)
}

/// Whether any identifier token under `node` spells `name`.
pub(crate) fn mentions_identifier(node: &SyntaxNode, name: &str) -> bool {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| t.kind() == SyntaxKind::Identifier && t.text() == name)
}

#[cfg(test)]
pub(crate) mod testing {
    use pretty_assertions::assert_eq;
    use sharp_syntax::CSharpLanguageVersion;
    use sharp_test_utils::extract_selection;

    use crate::cancellation::CancellationToken;
    use crate::catalogue::{AllEnabled, RefactoringId};
    use crate::context::{CodeAction, CodeActionResult};
    use crate::document::Document;
    use crate::engine::refactorings_at;
    use crate::semantic::DeclarationSemanticModelProvider;

    pub(crate) fn actions_with_version(
        fixture: &str,
        version: CSharpLanguageVersion,
    ) -> Vec<CodeAction> {
        let (text, span) = extract_selection(fixture);
        let document = Document::new("Test.cs", text).with_language_version(version);
        refactorings_at(
            &document,
            span,
            &AllEnabled,
            Some(&DeclarationSemanticModelProvider),
        )
        .expect("refactorings")
    }

    pub(crate) fn actions(fixture: &str) -> Vec<CodeAction> {
        actions_with_version(fixture, CSharpLanguageVersion::default())
    }

    pub(crate) fn titles(id: RefactoringId, fixture: &str) -> Vec<String> {
        actions(fixture)
            .into_iter()
            .filter(|action| action.refactoring == id)
            .map(|action| action.title)
            .collect()
    }

    pub(crate) fn apply(action: &CodeAction) -> CodeActionResult {
        action
            .apply(&CancellationToken::new())
            .unwrap_or_else(|err| panic!("`{}` failed: {err}", action.title))
    }

    pub(crate) fn check_action(actions: &[CodeAction], id: RefactoringId, expected: &str) {
        let action = actions
            .iter()
            .find(|action| action.refactoring == id)
            .unwrap_or_else(|| {
                let offered: Vec<_> = actions.iter().map(|a| a.title.as_str()).collect();
                panic!("{id} not offered, got {offered:?}")
            });
        let result = apply(action);
        let document = result.document().expect("single document result");
        assert_eq!(document.text(), expected);
    }

    /// Runs the engine on `fixture` and applies the first action of `id`.
    pub(crate) fn check(id: RefactoringId, fixture: &str, expected: &str) {
        check_action(&actions(fixture), id, expected);
    }

    pub(crate) fn check_not_offered(id: RefactoringId, fixture: &str) {
        let offered = titles(id, fixture);
        assert!(offered.is_empty(), "{id} unexpectedly offered: {offered:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sharp_syntax::parse_csharp;

    fn expression(text: &str) -> Expression {
        let source = format!("class C {{ bool F = {text}; }}");
        let root = parse_csharp(&source).syntax();
        root.descendants()
            .find(|n| n.kind() == SyntaxKind::EqualsValueClause)
            .and_then(|clause| clause.children().find_map(Expression::cast))
            .expect("initializer expression")
    }

    #[test]
    fn inverts_comparisons_and_negations() {
        assert_eq!(logically_invert(&expression("a == b")), "a != b");
        assert_eq!(logically_invert(&expression("a < b")), "a >= b");
        assert_eq!(logically_invert(&expression("!a")), "a");
        assert_eq!(logically_invert(&expression("!(a || b)")), "a || b");
        assert_eq!(logically_invert(&expression("true")), "false");
        assert_eq!(logically_invert(&expression("a.B()")), "!a.B()");
    }

    #[test]
    fn applies_de_morgan() {
        assert_eq!(logically_invert(&expression("a && b")), "!a || !b");
        assert_eq!(logically_invert(&expression("a || b == c")), "!a && b != c");
        assert_eq!(logically_invert(&expression("a && (b || c)")), "!a || (!b && !c)");
    }

    #[test]
    fn negates_loose_expressions_with_parentheses() {
        assert_eq!(logically_invert(&expression("a ? b : c")), "!(a ? b : c)");
        assert_eq!(logically_invert(&expression("a ?? b")), "!(a ?? b)");
    }

    #[test]
    fn whole_lines_only_when_alone() {
        let text = "a\n    b;\nc d\n";
        assert_eq!(whole_lines(text, TextRange::new(6, 8)), TextRange::new(2, 9));
        assert_eq!(whole_lines(text, TextRange::new(11, 12)), TextRange::new(11, 12));
    }

    #[test]
    fn following_lines_indentation() {
        assert_eq!(indent_following_lines("a\nb\n\nc", "  "), "a\n  b\n\n  c");
        assert_eq!(dedent_following_lines("a\n    b\n  c", "    "), "a\nb\n  c");
    }
}
