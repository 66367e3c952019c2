use pretty_assertions::assert_eq;
use sharp_refactor::{
    compute_refactorings, generate_preview, refactorings_at, AllEnabled, CancellationToken,
    CodeAction, DeclarationSemanticModelProvider, DefaultSettings, Document, FileChangeKind,
    FileId, RefactorError, RefactoringContext, RefactoringId, RefactoringSettings, Solution,
};
use sharp_test_utils::extract_selection;

fn actions(fixture: &str, settings: &dyn RefactoringSettings) -> (Document, Vec<CodeAction>) {
    let (text, span) = extract_selection(fixture);
    let document = Document::new("Test.cs", text);
    let actions = refactorings_at(
        &document,
        span,
        settings,
        Some(&DeclarationSemanticModelProvider),
    )
    .expect("refactorings");
    (document, actions)
}

fn apply(actions: &[CodeAction], id: RefactoringId) -> Document {
    let action = actions
        .iter()
        .find(|action| action.refactoring == id)
        .unwrap_or_else(|| panic!("{id} not offered"));
    action
        .apply(&CancellationToken::new())
        .expect("apply")
        .document()
        .cloned()
        .expect("single document result")
}

#[test]
fn merge_if_statements_end_to_end() {
    let fixture = "class C\n{\n    void M(bool a, bool b, bool c)\n    {\n        /*start*/if (a)\n        {\n            return;\n        }\n\n        if (b)\n        {\n            return;\n        }\n\n        if (c)\n        {\n            return;\n        }/*end*/\n\n        M(a, b, c);\n    }\n}\n";
    let (_, actions) = actions(fixture, &DefaultSettings);
    let merge: Vec<&str> = actions
        .iter()
        .filter(|action| action.refactoring == RefactoringId::MergeIfStatements)
        .map(|action| action.title.as_str())
        .collect();
    assert_eq!(merge, vec!["Merge if statements"]);

    let merged = apply(&actions, RefactoringId::MergeIfStatements);
    assert_eq!(
        merged.text(),
        "class C\n{\n    void M(bool a, bool b, bool c)\n    {\n        if (a || b || c)\n        {\n            return;\n        }\n\n        M(a, b, c);\n    }\n}\n"
    );
}

#[test]
fn sorting_members_is_idempotent() {
    let fixture = "class C\n/*caret*/{\n    void M() { }\n\n    int _f;\n\n    C() { }\n}\n";
    let (_, first) = actions(fixture, &DefaultSettings);
    let sorted = apply(&first, RefactoringId::SortMemberDeclarations);
    assert_eq!(
        sorted.text(),
        "class C\n{\n    int _f;\n\n    C() { }\n\n    void M() { }\n}\n"
    );

    let brace = sorted.text().find('{').expect("open brace");
    let again = refactorings_at(
        &sorted,
        sharp_refactor::TextRange::new(brace, brace),
        &DefaultSettings,
        None,
    )
    .expect("refactorings");
    assert!(again
        .iter()
        .all(|action| action.refactoring != RefactoringId::SortMemberDeclarations));
}

#[test]
fn split_then_merge_attributes_round_trips() {
    let fixture = "class C\n{\n    [Obsolete, /*caret*/Serializable]\n    void M() { }\n}\n";
    let (original, first) = actions(fixture, &DefaultSettings);
    let split = apply(&first, RefactoringId::SplitAttributes);
    assert_eq!(
        split.text(),
        "class C\n{\n    [Obsolete]\n    [Serializable]\n    void M() { }\n}\n"
    );

    let start = split.text().find("[Obsolete]").expect("first list");
    let end = split.text().find("[Serializable]").expect("second list") + "[Serializable]".len();
    let second = refactorings_at(
        &split,
        sharp_refactor::TextRange::new(start, end),
        &DefaultSettings,
        None,
    )
    .expect("refactorings");
    let merged = apply(&second, RefactoringId::MergeAttributes);
    assert_eq!(merged.text(), original.text());
}

#[test]
fn off_by_default_refactorings_need_opt_in() {
    let fixture = "class C\n{\n    void M(int x)\n    {\n        var p = new Point /*caret*/{ X = x };\n    }\n}\n";
    let offered = |settings: &dyn RefactoringSettings| {
        actions(fixture, settings)
            .1
            .iter()
            .any(|action| action.refactoring == RefactoringId::ExpandInitializer)
    };
    assert_eq!(
        offered(&DefaultSettings),
        RefactoringId::ExpandInitializer.enabled_by_default()
    );
    assert!(offered(&AllEnabled));
}

#[test]
fn cancelled_token_stops_the_engine() {
    let document = Document::new("Test.cs", "class C { }\n");
    let token = CancellationToken::new();
    token.cancel();
    let mut context = RefactoringContext::new(
        &document,
        sharp_refactor::TextRange::new(6, 6),
        &DefaultSettings,
    )
    .with_cancellation(token);

    let result = compute_refactorings(&mut context);
    assert!(matches!(result, Err(RefactorError::Cancelled)));
}

#[test]
fn extracted_type_previews_as_new_file() {
    let fixture = "class A\n{\n}\n\nclass /*caret*/B\n{\n}\n";
    let (document, actions) = actions(fixture, &DefaultSettings);
    let action = actions
        .iter()
        .find(|action| action.refactoring == RefactoringId::ExtractTypeDeclarationToNewFile)
        .expect("extract offered");
    let result = action.apply(&CancellationToken::new()).expect("apply");

    let preview = generate_preview(&Solution::from_documents([document]), &result);
    let changes: Vec<(FileId, FileChangeKind)> = preview
        .files
        .iter()
        .map(|file| (file.file.clone(), file.change.clone()))
        .collect();
    assert_eq!(
        changes,
        vec![
            (FileId::new("B.cs"), FileChangeKind::Created),
            (FileId::new("Test.cs"), FileChangeKind::Modified),
        ]
    );
    assert_eq!(preview.files[0].modified, "class B\n{\n}\n");
    assert_eq!(preview.files[1].modified, "class A\n{\n}\n");
}
