use sharp_syntax::TextRange;

const START_MARKER: &str = "/*start*/";
const END_MARKER: &str = "/*end*/";
const CARET_MARKER: &str = "/*caret*/";

/// Extracts a byte range selection from a fixture containing `/*start*/` and
/// `/*end*/` markers.
///
/// Returns the fixture with markers removed and the selection `TextRange`
/// pointing at the extracted region.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start = fixture
        .find(START_MARKER)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + START_MARKER.len();
    let end = fixture
        .find(END_MARKER)
        .expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + END_MARKER.len()..]);

    // The start stays put; the end shrinks by the length of the start marker.
    let range = TextRange::new(start, end - START_MARKER.len());
    (text, range)
}

/// Extracts an empty selection at the `/*caret*/` marker.
pub fn extract_caret(fixture: &str) -> (String, TextRange) {
    let offset = fixture
        .find(CARET_MARKER)
        .expect("fixture missing /*caret*/ marker");
    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CARET_MARKER.len()..]);
    (text, TextRange::empty(offset))
}

/// Extracts either a `/*start*/…/*end*/` selection or a `/*caret*/`.
pub fn extract_selection(fixture: &str) -> (String, TextRange) {
    if fixture.contains(CARET_MARKER) {
        extract_caret(fixture)
    } else {
        extract_range(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_selection_between_markers() {
        let (text, range) = extract_range("a /*start*/bc/*end*/ d");
        assert_eq!(text, "a bc d");
        assert_eq!(range, TextRange::new(2, 4));
        assert_eq!(&text[range.start_usize()..range.end_usize()], "bc");
    }

    #[test]
    fn extracts_caret() {
        let (text, range) = extract_selection("if (/*caret*/x) { }");
        assert_eq!(text, "if (x) { }");
        assert_eq!(range, TextRange::empty(4));
    }
}
