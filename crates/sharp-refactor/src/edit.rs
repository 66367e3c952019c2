use sharp_syntax::TextRange;
use thiserror::Error;

/// A single text replacement inside one document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self {
            range: TextRange {
                start: offset,
                end: offset,
            },
            replacement: text.into(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }
}

/// A set of edits against one document.
///
/// Edits are normalized (sorted, deduplicated, non-overlapping) before they are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn insert(&mut self, offset: u32, text: impl Into<String>) {
        self.push(TextEdit::insert(offset, text));
    }

    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.push(TextEdit::replace(range, text));
    }

    pub fn delete(&mut self, range: TextRange) {
        self.push(TextEdit::delete(range));
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Sort, deduplicate and validate non-overlap.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        // Inserts keep their push order at a shared offset; everything else sorts by range.
        self.edits.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then_with(|| a.range.end.cmp(&b.range.end))
        });

        // Exact duplicates are redundant.
        self.edits
            .dedup_by(|a, b| a.range == b.range && a.replacement == b.replacement);

        // Multiple inserts at the same position are concatenated in push order.
        let mut merged: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.range == edit.range && last.range.is_empty() {
                    last.replacement.push_str(&edit.replacement);
                    continue;
                }
                if last.range == edit.range {
                    return Err(EditError::OverlappingEdits {
                        first: last.range,
                        second: edit.range,
                    });
                }
            }
            merged.push(edit);
        }
        self.edits = merged;

        let mut prev: Option<TextRange> = None;
        for edit in &self.edits {
            if edit.range.start > edit.range.end {
                return Err(EditError::InvalidRange { range: edit.range });
            }
            if let Some(prev_range) = prev {
                if edit.range.start < prev_range.end {
                    return Err(EditError::OverlappingEdits {
                        first: prev_range,
                        second: edit.range,
                    });
                }
            }
            prev = Some(edit.range);
        }
        Ok(())
    }

    /// Normalizes the set and applies it to `original`.
    pub fn apply(mut self, original: &str) -> Result<String, EditError> {
        self.normalize()?;
        apply_text_edits(original, &self.edits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("invalid text range {}..{}", .range.start, .range.end)]
    InvalidRange { range: TextRange },
    #[error(
        "overlapping edits: {}..{} overlaps {}..{}",
        .first.start, .first.end, .second.start, .second.end
    )]
    OverlappingEdits { first: TextRange, second: TextRange },
    #[error("text edit range {}..{} is outside the document bounds (len={len})", .range.start, .range.end)]
    OutOfBounds { range: TextRange, len: usize },
    #[error("text edit range {}..{} does not fall on a character boundary", .range.start, .range.end)]
    NotCharBoundary { range: TextRange },
}

/// Apply non-overlapping `edits` to `original` and return the modified text.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(original.to_string());
    }

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then_with(|| b.range.end.cmp(&a.range.end))
    });

    let mut out = original.to_string();
    for edit in sorted {
        let len = out.len();
        let (start, end) = (edit.range.start_usize(), edit.range.end_usize());
        if end > len || start > end {
            return Err(EditError::OutOfBounds {
                range: edit.range,
                len,
            });
        }
        if !out.is_char_boundary(start) || !out.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { range: edit.range });
        }
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn applies_edits_back_to_front() {
        let mut edits = EditSet::new();
        edits.replace(TextRange::new(0, 1), "x");
        edits.insert(3, "!");
        edits.delete(TextRange::new(1, 2));
        assert_eq!(edits.apply("abc").unwrap(), "xc!");
    }

    #[test]
    fn inserts_at_one_offset_keep_push_order() {
        let mut edits = EditSet::new();
        edits.insert(1, "1");
        edits.insert(1, "2");
        assert_eq!(edits.apply("ab").unwrap(), "a12b");
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let mut edits = EditSet::new();
        edits.replace(TextRange::new(0, 3), "x");
        edits.replace(TextRange::new(2, 4), "y");
        assert!(matches!(
            edits.apply("abcdef"),
            Err(EditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let err = apply_text_edits("ab", &[TextEdit::delete(TextRange::new(1, 5))]).unwrap_err();
        assert_eq!(
            err,
            EditError::OutOfBounds {
                range: TextRange::new(1, 5),
                len: 2
            }
        );
    }
}
