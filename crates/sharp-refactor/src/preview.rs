use similar::TextDiff;

use crate::context::CodeActionResult;
use crate::document::{Document, FileId, Solution};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileChangeKind {
    Created,
    Modified,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePreview {
    pub file: FileId,
    pub change: FileChangeKind,
    pub original: String,
    pub modified: String,
    pub unified_diff: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RefactoringPreview {
    pub files: Vec<FilePreview>,
}

impl RefactoringPreview {
    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    /// All file diffs concatenated, in file order.
    pub fn unified_diff(&self) -> String {
        self.files
            .iter()
            .map(|file| file.unified_diff.as_str())
            .collect()
    }
}

/// Diffs the outcome of a code action against the documents it started from.
///
/// Documents in `result` that `original` does not know are reported as created; documents
/// that come out unchanged are left out.
pub fn generate_preview(original: &Solution, result: &CodeActionResult) -> RefactoringPreview {
    let changed: Vec<&Document> = match result {
        CodeActionResult::Document(document) => vec![document],
        CodeActionResult::Solution(solution) => solution.documents().collect(),
    };

    let mut files = Vec::new();
    for document in changed {
        let id = document.id();
        let (change, before) = match original.get(id) {
            Some(before) => (FileChangeKind::Modified, before.text()),
            None => (FileChangeKind::Created, ""),
        };
        let after = document.text();
        if before == after {
            continue;
        }

        let header_from = match change {
            FileChangeKind::Created => "/dev/null".to_string(),
            FileChangeKind::Modified => format!("a/{id}"),
        };
        let unified_diff = TextDiff::from_lines(before, after)
            .unified_diff()
            .context_radius(3)
            .header(&header_from, &format!("b/{id}"))
            .to_string();

        files.push(FilePreview {
            file: id.clone(),
            change,
            original: before.to_string(),
            modified: after.to_string(),
            unified_diff,
        });
    }
    files.sort_by(|a, b| a.file.cmp(&b.file));
    RefactoringPreview { files }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn modified_document_produces_unified_diff() {
        let before = Document::new("A.cs", "class A\n{\n    int x;\n}\n");
        let after = before.with_text("class A\n{\n    int y;\n}\n");
        let preview = generate_preview(
            &Solution::from_documents([before]),
            &CodeActionResult::Document(after),
        );

        assert_eq!(preview.total_files(), 1);
        let file = &preview.files[0];
        assert_eq!(file.change, FileChangeKind::Modified);
        assert_eq!(
            file.unified_diff,
            "--- a/A.cs\n+++ b/A.cs\n@@ -1,4 +1,4 @@\n class A\n {\n-    int x;\n+    int y;\n }\n"
        );
    }

    #[test]
    fn new_and_unchanged_documents() {
        let a = Document::new("A.cs", "class A { }\n");
        let b = Document::new("B.cs", "class B { }\n");
        let preview = generate_preview(
            &Solution::from_documents([a.clone()]),
            &CodeActionResult::Solution(Solution::from_documents([a, b])),
        );

        assert_eq!(preview.total_files(), 1);
        assert_eq!(preview.files[0].file, FileId::new("B.cs"));
        assert_eq!(preview.files[0].change, FileChangeKind::Created);
        assert!(preview.files[0].unified_diff.starts_with("--- /dev/null\n+++ b/B.cs\n"));
    }
}
