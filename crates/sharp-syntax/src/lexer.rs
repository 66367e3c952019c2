use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range.start as usize..self.range.end as usize]
    }
}

/// Tokenize `input`. The result always ends with a zero-width [`SyntaxKind::Eof`] token and
/// the concatenated token texts reproduce `input` exactly.
pub fn lex(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == SyntaxKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Only whitespace has been seen since the last line break.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            at_line_start: true,
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Token {
                kind: SyntaxKind::Eof,
                range: TextRange::empty(start),
            };
        };

        let kind = match c {
            '\r' | '\n' | '\u{2028}' | '\u{2029}' | '\u{85}' => {
                if c == '\r' && self.peek_nth(1) == Some('\n') {
                    self.pos += 2;
                } else {
                    self.bump_char();
                }
                self.at_line_start = true;
                return self.finish(SyntaxKind::Newline, start);
            }
            c if is_whitespace(c) => {
                while self.peek_char().is_some_and(is_whitespace) {
                    self.bump_char();
                }
                return self.finish(SyntaxKind::Whitespace, start);
            }
            '#' if self.at_line_start => self.lex_directive(),
            '/' if self.peek_nth(1) == Some('/') => {
                let doc = self.rest().starts_with("///") && !self.rest().starts_with("////");
                self.eat_to_line_end();
                if doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::SingleLineComment
                }
            }
            '/' if self.peek_nth(1) == Some('*') => {
                self.pos += 2;
                match self.rest().find("*/") {
                    Some(idx) => self.pos += idx + 2,
                    None => self.pos = self.input.len(),
                }
                SyntaxKind::MultiLineComment
            }
            '@' if self.peek_nth(1) == Some('"') => {
                self.pos += 1;
                self.lex_verbatim_string();
                SyntaxKind::VerbatimStringLiteral
            }
            '@' if self.peek_nth(1) == Some('$') && self.peek_nth(2) == Some('"') => {
                self.pos += 2;
                self.lex_interpolated_string(true);
                SyntaxKind::VerbatimInterpolatedStringLiteral
            }
            '$' if self.peek_nth(1) == Some('@') && self.peek_nth(2) == Some('"') => {
                self.pos += 2;
                self.lex_interpolated_string(true);
                SyntaxKind::VerbatimInterpolatedStringLiteral
            }
            '$' if self.peek_nth(1) == Some('"') => {
                self.pos += 1;
                self.lex_interpolated_string(false);
                SyntaxKind::InterpolatedStringLiteral
            }
            '@' if self.peek_nth(1).is_some_and(is_ident_start) => {
                // Verbatim identifier (`@class`); never a keyword.
                self.pos += 1;
                self.eat_ident_rest();
                SyntaxKind::Identifier
            }
            '"' => {
                self.lex_regular_string();
                SyntaxKind::StringLiteral
            }
            '\'' => {
                self.lex_char_literal();
                SyntaxKind::CharLiteral
            }
            c if c.is_ascii_digit() => {
                self.lex_number();
                SyntaxKind::NumericLiteral
            }
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number();
                SyntaxKind::NumericLiteral
            }
            c if is_ident_start(c) => {
                self.eat_ident_rest();
                let text = &self.input[start..self.pos];
                SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
            }
            _ => self.lex_punctuation(),
        };

        self.at_line_start = false;
        self.finish(kind, start)
    }

    fn finish(&self, kind: SyntaxKind, start: usize) -> Token {
        Token {
            kind,
            range: TextRange::new(start, self.pos),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_to_line_end(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_newline(c) {
                break;
            }
            self.bump_char();
        }
    }

    fn eat_ident_rest(&mut self) {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.bump_char();
        }
    }

    fn lex_directive(&mut self) -> SyntaxKind {
        self.pos += 1;
        while self.peek_char().is_some_and(is_whitespace) {
            self.bump_char();
        }
        let name_start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump_char();
        }
        let kind = match &self.input[name_start..self.pos] {
            "region" => SyntaxKind::RegionDirective,
            "endregion" => SyntaxKind::EndRegionDirective,
            "if" => SyntaxKind::IfDirective,
            "elif" => SyntaxKind::ElifDirective,
            "else" => SyntaxKind::ElseDirective,
            "endif" => SyntaxKind::EndIfDirective,
            "define" => SyntaxKind::DefineDirective,
            "undef" => SyntaxKind::UndefDirective,
            "pragma" => SyntaxKind::PragmaDirective,
            _ => SyntaxKind::OtherDirective,
        };
        self.eat_to_line_end();
        kind
    }

    fn lex_regular_string(&mut self) {
        // Opening quote.
        self.pos += 1;
        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    self.pos += 1;
                    return;
                }
                '\\' => {
                    self.pos += 1;
                    if self.peek_char().is_some_and(|c| !is_newline(c)) {
                        self.bump_char();
                    }
                }
                c if is_newline(c) => return,
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    fn lex_verbatim_string(&mut self) {
        self.pos += 1;
        while let Some(c) = self.bump_char() {
            if c == '"' {
                if self.peek_char() == Some('"') {
                    self.pos += 1;
                } else {
                    return;
                }
            }
        }
    }

    fn lex_char_literal(&mut self) {
        self.pos += 1;
        while let Some(c) = self.peek_char() {
            match c {
                '\'' => {
                    self.pos += 1;
                    return;
                }
                '\\' => {
                    self.pos += 1;
                    if self.peek_char().is_some_and(|c| !is_newline(c)) {
                        self.bump_char();
                    }
                }
                c if is_newline(c) => return,
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    /// Lexes an interpolated string starting at its opening quote. Holes are skipped with
    /// brace matching; nested strings inside holes are skipped as a whole.
    fn lex_interpolated_string(&mut self, verbatim: bool) {
        self.pos += 1;
        while let Some(c) = self.peek_char() {
            match c {
                '"' if verbatim && self.peek_nth(1) == Some('"') => self.pos += 2,
                '"' => {
                    self.pos += 1;
                    return;
                }
                '\\' if !verbatim => {
                    self.pos += 1;
                    if self.peek_char().is_some_and(|c| !is_newline(c)) {
                        self.bump_char();
                    }
                }
                '{' if self.peek_nth(1) == Some('{') => self.pos += 2,
                '}' if self.peek_nth(1) == Some('}') => self.pos += 2,
                '{' => {
                    self.pos += 1;
                    self.skip_interpolation_hole();
                }
                c if is_newline(c) && !verbatim => return,
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    fn skip_interpolation_hole(&mut self) {
        let mut depth = 1usize;
        while let Some(c) = self.peek_char() {
            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                '"' => self.lex_regular_string(),
                '\'' => self.lex_char_literal(),
                '@' if self.peek_nth(1) == Some('"') => {
                    self.pos += 1;
                    self.lex_verbatim_string();
                }
                '$' if self.peek_nth(1) == Some('"') => {
                    self.pos += 1;
                    self.lex_interpolated_string(false);
                }
                '$' if self.peek_nth(1) == Some('@') && self.peek_nth(2) == Some('"') => {
                    self.pos += 2;
                    self.lex_interpolated_string(true);
                }
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    fn lex_number(&mut self) {
        let rest = self.rest().as_bytes();
        let hex_or_bin = rest.len() > 1
            && rest[0] == b'0'
            && matches!(rest[1], b'x' | b'X' | b'b' | b'B');
        if hex_or_bin {
            self.pos += 2;
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_hexdigit() || c == '_')
            {
                self.pos += 1;
            }
        } else {
            self.eat_digits();
            if self.peek_char() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            {
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                let sign = matches!(self.peek_nth(1), Some('+' | '-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += digit_at;
                    self.eat_digits();
                }
            }
        }
        // Suffixes: u, l, ul, lu, f, d, m (any case).
        while matches!(
            self.peek_char(),
            Some('u' | 'U' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D' | 'm' | 'M')
        ) {
            self.pos += 1;
        }
    }

    fn eat_digits(&mut self) {
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_digit() || c == '_')
        {
            self.pos += 1;
        }
    }

    fn lex_punctuation(&mut self) -> SyntaxKind {
        const PUNCT: &[(&str, SyntaxKind)] = &[
            ("??=", SyntaxKind::QuestionQuestionEq),
            ("<<=", SyntaxKind::LeftShiftEq),
            ("::", SyntaxKind::ColonColon),
            ("??", SyntaxKind::QuestionQuestion),
            ("=>", SyntaxKind::FatArrow),
            ("==", SyntaxKind::EqEq),
            ("!=", SyntaxKind::BangEq),
            ("<=", SyntaxKind::LessEq),
            (">=", SyntaxKind::GreaterEq),
            ("&&", SyntaxKind::AmpAmp),
            ("||", SyntaxKind::PipePipe),
            ("++", SyntaxKind::PlusPlus),
            ("--", SyntaxKind::MinusMinus),
            ("+=", SyntaxKind::PlusEq),
            ("-=", SyntaxKind::MinusEq),
            ("*=", SyntaxKind::StarEq),
            ("/=", SyntaxKind::SlashEq),
            ("%=", SyntaxKind::PercentEq),
            ("&=", SyntaxKind::AmpEq),
            ("|=", SyntaxKind::PipeEq),
            ("^=", SyntaxKind::CaretEq),
            ("<<", SyntaxKind::LeftShift),
            ("{", SyntaxKind::OpenBrace),
            ("}", SyntaxKind::CloseBrace),
            ("(", SyntaxKind::OpenParen),
            (")", SyntaxKind::CloseParen),
            ("[", SyntaxKind::OpenBracket),
            ("]", SyntaxKind::CloseBracket),
            (";", SyntaxKind::Semicolon),
            (",", SyntaxKind::Comma),
            (".", SyntaxKind::Dot),
            (":", SyntaxKind::Colon),
            ("+", SyntaxKind::Plus),
            ("-", SyntaxKind::Minus),
            ("*", SyntaxKind::Star),
            ("/", SyntaxKind::Slash),
            ("%", SyntaxKind::Percent),
            ("&", SyntaxKind::Amp),
            ("|", SyntaxKind::Pipe),
            ("^", SyntaxKind::Caret),
            ("!", SyntaxKind::Bang),
            ("~", SyntaxKind::Tilde),
            ("=", SyntaxKind::Eq),
            ("<", SyntaxKind::Less),
            (">", SyntaxKind::Greater),
        ];

        let rest = self.rest();
        // `?.` but not `?.5` (conditional with a numeric literal).
        if rest.starts_with("?.") && !rest[2..].starts_with(|c: char| c.is_ascii_digit()) {
            self.pos += 2;
            return SyntaxKind::QuestionDot;
        }
        if rest.starts_with('?') && !rest.starts_with("??") {
            self.pos += 1;
            return SyntaxKind::Question;
        }
        for (text, kind) in PUNCT {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.bump_char();
        SyntaxKind::Error
    }
}

fn is_newline(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{2028}' | '\u{2029}' | '\u{85}')
}

fn is_whitespace(c: char) -> bool {
    !is_newline(c) && (c == ' ' || c == '\t' || c == '\u{0B}' || c == '\u{0C}' || c.is_whitespace())
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokens_reproduce_input() {
        let input = "class C {\r\n  // hi\n  int x = 0x1F; /* c */ string s = @\"a\"\"b\";\n}";
        let tokens = lex(input);
        let joined: String = tokens.iter().map(|t| t.text(input)).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn directives_only_at_line_start() {
        assert_eq!(
            kinds("#region A\n  #endregion\n"),
            vec![
                SyntaxKind::RegionDirective,
                SyntaxKind::Newline,
                SyntaxKind::Whitespace,
                SyntaxKind::EndRegionDirective,
                SyntaxKind::Newline,
                SyntaxKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x #if"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Error,
                SyntaxKind::IfKw,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn interpolated_string_is_one_token() {
        let input = r#"$"a {b + "}"} {{c}}" x"#;
        let tokens = lex(input);
        assert_eq!(tokens[0].kind, SyntaxKind::InterpolatedStringLiteral);
        assert_eq!(tokens[0].text(input), r#"$"a {b + "}"} {{c}}""#);
        assert_eq!(tokens[2].kind, SyntaxKind::Identifier);
    }

    #[test]
    fn greater_than_is_never_joined() {
        assert_eq!(
            kinds("a >> b >>= c"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Greater,
                SyntaxKind::Greater,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Greater,
                SyntaxKind::GreaterEq,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn contextual_keywords_stay_identifiers() {
        assert_eq!(
            kinds("var where async"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn doc_comments_and_numbers() {
        assert_eq!(
            kinds("/// doc\n1.5e3f .5 10UL"),
            vec![
                SyntaxKind::DocComment,
                SyntaxKind::Newline,
                SyntaxKind::NumericLiteral,
                SyntaxKind::Whitespace,
                SyntaxKind::NumericLiteral,
                SyntaxKind::Whitespace,
                SyntaxKind::NumericLiteral,
                SyntaxKind::Eof,
            ]
        );
    }
}
