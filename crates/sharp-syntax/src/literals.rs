//! Text-level helpers for string and interpolated string literals.

/// A piece of an interpolated string's contents, as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolatedPart {
    /// Literal text; `{{`/`}}` and escape sequences are left as written.
    Text(String),
    /// Contents of a `{…}` hole, without the braces.
    Interpolation(String),
}

/// Text between the quotes of a (verbatim and/or interpolated) string literal.
pub fn string_literal_inner_text(token_text: &str) -> &str {
    let prefix = token_text
        .char_indices()
        .find(|&(_, c)| c == '"')
        .map_or(token_text.len(), |(idx, _)| idx + 1);
    let body = &token_text[prefix..];
    let prefix_is_verbatim = token_text[..prefix.saturating_sub(1)].contains('@');
    let closed = if prefix_is_verbatim {
        body.ends_with('"') && !verbatim_ends_with_escaped_quote(body)
    } else {
        body.ends_with('"') && !regular_ends_with_escaped_quote(body)
    };
    if closed {
        &body[..body.len() - 1]
    } else {
        body
    }
}

fn regular_ends_with_escaped_quote(body: &str) -> bool {
    let without_quote = &body[..body.len() - 1];
    let backslashes = without_quote.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

fn verbatim_ends_with_escaped_quote(body: &str) -> bool {
    let quotes = body.chars().rev().take_while(|&c| c == '"').count();
    quotes % 2 == 0
}

/// Value of a regular string literal's inner text (escape sequences decoded).
pub fn regular_string_value(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('u') => push_hex_escape(&mut out, &mut chars, 4, 4, 'u'),
            Some('U') => push_hex_escape(&mut out, &mut chars, 8, 8, 'U'),
            Some('x') => push_hex_escape(&mut out, &mut chars, 1, 4, 'x'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn push_hex_escape(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    min: usize,
    max: usize,
    letter: char,
) {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() >= min)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(letter);
            out.push_str(&digits);
        }
    }
}

/// Value of a verbatim string literal's inner text (`""` decoded).
pub fn verbatim_string_value(inner: &str) -> String {
    inner.replace("\"\"", "\"")
}

/// Source text (without quotes) of a regular literal holding `value`.
pub fn escape_regular_string_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

/// Source text (without quotes) of a verbatim literal holding `value`.
pub fn escape_verbatim_string_text(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Splits an interpolated string's inner text into literal runs and holes.
pub fn interpolated_string_parts(inner: &str, verbatim: bool) -> Vec<InterpolatedPart> {
    let bytes = inner.as_bytes();
    let mut parts = Vec::new();
    let mut text_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'}' if bytes.get(i + 1) == Some(&b'}') => i += 2,
            b'\\' if !verbatim => i += 2,
            b'{' => {
                if text_start < i {
                    parts.push(InterpolatedPart::Text(inner[text_start..i].to_string()));
                }
                let end = hole_end(inner, i + 1);
                parts.push(InterpolatedPart::Interpolation(
                    inner[i + 1..end.min(inner.len())].to_string(),
                ));
                i = (end + 1).min(inner.len());
                text_start = i;
            }
            _ => i += 1,
        }
    }
    if text_start < inner.len() {
        parts.push(InterpolatedPart::Text(inner[text_start..].to_string()));
    }
    parts
}

/// Byte index of the `}` closing a hole whose contents start at `start`.
fn hole_end(inner: &str, start: usize) -> usize {
    let bytes = inner.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                // Nested regular string inside the hole.
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'}' if depth == 0 => return i,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inner_text_of_each_literal_form() {
        assert_eq!(string_literal_inner_text(r#""a\"b""#), r#"a\"b"#);
        assert_eq!(string_literal_inner_text(r#"@"a""b""#), r#"a""b"#);
        assert_eq!(string_literal_inner_text(r#"$"x{y}""#), "x{y}");
        assert_eq!(string_literal_inner_text(r#"$@"x""#), "x");
        assert_eq!(string_literal_inner_text(r#"@$"x""#), "x");
        assert_eq!(string_literal_inner_text(r#""open"#), "open");
    }

    #[test]
    fn regular_values_decode_escapes() {
        assert_eq!(regular_string_value(r"a\tb\n\\\u0041\x42"), "a\tb\n\\AB");
        assert_eq!(regular_string_value(r"\q"), r"\q");
    }

    #[test]
    fn escaping_round_trips_through_values() {
        let value = "C:\\dir\n\"quoted\"";
        assert_eq!(regular_string_value(&escape_regular_string_text(value)), value);
        assert_eq!(verbatim_string_value(&escape_verbatim_string_text(value)), value);
    }

    #[test]
    fn interpolated_parts() {
        assert_eq!(
            interpolated_string_parts(r#"a {b} {{c}} {F("}")}"#, false),
            vec![
                InterpolatedPart::Text("a ".into()),
                InterpolatedPart::Interpolation("b".into()),
                InterpolatedPart::Text(" {{c}} ".into()),
                InterpolatedPart::Interpolation(r#"F("}")"#.into()),
            ]
        );
        assert_eq!(
            interpolated_string_parts("no holes", true),
            vec![InterpolatedPart::Text("no holes".into())]
        );
    }
}
