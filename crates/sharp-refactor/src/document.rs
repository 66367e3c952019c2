use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use sharp_syntax::{parse_csharp, CSharpLanguageVersion, ParseError, ParseResult, SyntaxNode, TextRange};

use crate::edit::{EditError, EditSet};

/// Identifier for a document, usually its workspace-relative path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// A file with `file_name` in the same directory.
    pub fn sibling(&self, file_name: &str) -> FileId {
        match self.0.rfind(['/', '\\']) {
            Some(idx) => FileId(format!("{}{}", &self.0[..=idx], file_name)),
            None => FileId(file_name.to_string()),
        }
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        FileId::new(value)
    }
}

/// An immutable, parsed source document.
///
/// Cloning is cheap; every edit produces a brand-new document.
#[derive(Clone, Debug)]
pub struct Document {
    id: FileId,
    text: Arc<str>,
    parse: Arc<ParseResult>,
    language_version: CSharpLanguageVersion,
}

impl Document {
    pub fn new(id: impl Into<FileId>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let parse = Arc::new(parse_csharp(&text));
        Self {
            id: id.into(),
            text,
            parse,
            language_version: CSharpLanguageVersion::default(),
        }
    }

    #[must_use]
    pub fn with_language_version(mut self, version: CSharpLanguageVersion) -> Self {
        self.language_version = version;
        self
    }

    pub fn id(&self) -> &FileId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parse(&self) -> &ParseResult {
        &self.parse
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.parse.errors
    }

    /// Root of the syntax tree. Nodes from separate calls compare equal.
    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    pub fn language_version(&self) -> CSharpLanguageVersion {
        self.language_version
    }

    pub fn slice(&self, range: TextRange) -> &str {
        self.text
            .get(range.start_usize()..range.end_usize())
            .unwrap_or("")
    }

    /// Reparses `text` into a new document with the same id and language version.
    #[must_use]
    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Document {
        Document::new(self.id.clone(), text).with_language_version(self.language_version)
    }

    pub fn apply_edits(&self, edits: EditSet) -> Result<Document, EditError> {
        let text = edits.apply(&self.text)?;
        Ok(self.with_text(text))
    }
}

/// Documents keyed by id, for rewrites that touch more than one file.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    documents: BTreeMap<FileId, Document>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut solution = Self::new();
        for document in documents {
            solution.insert(document);
        }
        solution
    }

    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.id().clone(), document)
    }

    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.insert(document);
        self
    }

    pub fn get(&self, id: &FileId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_id_siblings() {
        let id = FileId::new("src/Models/Foo.cs");
        assert_eq!(id.file_name(), "Foo.cs");
        assert_eq!(id.sibling("Bar.cs"), FileId::new("src/Models/Bar.cs"));
        assert_eq!(FileId::new("Foo.cs").sibling("Bar.cs"), FileId::new("Bar.cs"));
    }

    #[test]
    fn edits_produce_a_new_document() {
        let doc = Document::new("a.cs", "class A { }")
            .with_language_version(CSharpLanguageVersion::CSHARP_7_3);
        let mut edits = EditSet::new();
        edits.replace(TextRange::new(6, 7), "B");
        let updated = doc.apply_edits(edits).unwrap();
        assert_eq!(doc.text(), "class A { }");
        assert_eq!(updated.text(), "class B { }");
        assert_eq!(updated.language_version(), CSharpLanguageVersion::CSHARP_7_3);
        assert_eq!(updated.id(), doc.id());
    }
}
