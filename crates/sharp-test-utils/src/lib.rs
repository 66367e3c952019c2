//! Utilities shared by Sharp tests.
//!
//! Fixtures are plain C# snippets annotated with comment markers:
//! `/*start*/ … /*end*/` for a selection and `/*caret*/` for an empty span.

mod fixtures;

pub use fixtures::*;
