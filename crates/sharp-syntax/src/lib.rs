//! Lossless C# syntax trees built on rowan.
//!
//! The parser accepts a practical subset of modern C# and never fails: unexpected input
//! ends up in `Error` nodes, expected-but-absent tokens are inserted with zero width (see
//! [`is_missing`]) and every problem is recorded as a [`ParseError`].
//!
//! Node ranges are tight: a node starts at its first non-trivia token and ends at its
//! last one. Leading/trailing trivia are derived on demand ([`leading_trivia`],
//! [`trailing_trivia`], [`full_range`]).

pub mod ast;
mod language_version;
mod lexer;
mod literals;
mod parser;
mod syntax_kind;
mod trivia;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ast::*;
pub use language_version::{CSharpFeature, CSharpLanguageVersion, FeatureAvailability};
pub use lexer::{lex, Token};
pub use literals::{
    escape_regular_string_text, escape_verbatim_string_text, interpolated_string_parts,
    regular_string_value, string_literal_inner_text, verbatim_string_value, InterpolatedPart,
};
pub use parser::{debug_dump, parse_csharp, ParseResult, SyntaxElement, SyntaxNode, SyntaxToken};
pub use syntax_kind::{CSharpLanguage, SyntaxKind};
pub use trivia::{
    contains_missing, directive_name, first_token, following_token, full_range, is_missing,
    last_token, leading_trivia, line_indentation, next_token, preceding_token, prev_token,
    trailing_trivia,
};

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    #[inline]
    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the ranges overlap or touch (an empty range at the edge of `self` counts).
    #[inline]
    pub fn intersects(self, other: TextRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    #[inline]
    pub fn start_usize(self) -> usize {
        self.start as usize
    }

    #[inline]
    pub fn end_usize(self) -> usize {
        self.end as usize
    }
}

impl From<text_size::TextRange> for TextRange {
    fn from(value: text_size::TextRange) -> Self {
        Self {
            start: u32::from(value.start()),
            end: u32::from(value.end()),
        }
    }
}

impl From<TextRange> for text_size::TextRange {
    fn from(value: TextRange) -> Self {
        text_size::TextRange::new(value.start.into(), value.end.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{message} at {}..{}", .range.start, .range.end)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}
