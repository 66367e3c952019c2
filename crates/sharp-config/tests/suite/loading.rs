use pretty_assertions::assert_eq;
use sharp_config::{ConfigError, ConfigWarning, SharpConfig};
use sharp_refactor::{
    refactorings_at, CSharpLanguageVersion, Document, RefactoringId, RefactoringSettings,
    TextRange,
};
use tempfile::tempdir;

#[test]
fn reports_unknown_keys_and_refactorings() {
    let text = r#"
typo = 1

[language]
version = "7.3"

[refactorings]
RR0075 = false
merge_everything = true

[logging]
levle = "debug"
"#;

    let (config, diagnostics) =
        SharpConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(diagnostics.unknown_keys, vec!["logging.levle", "typo"]);
    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::UnknownRefactoring {
            key: "merge_everything".to_owned()
        }]
    );
    assert_eq!(config.language_version(), CSharpLanguageVersion::CSHARP_7_3);
    assert!(!config
        .refactorings
        .is_enabled(RefactoringId::MergeIfStatements));
}

#[test]
fn invalid_logging_level_is_a_warning() {
    let (config, diagnostics) =
        SharpConfig::load_from_str_with_diagnostics("[logging]\nlevel = \"sharp=loud\"\n")
            .expect("config should parse");
    assert_eq!(config.logging.level, "sharp=loud");
    assert!(matches!(
        diagnostics.warnings.as_slice(),
        [ConfigWarning::LoggingLevelInvalid { value, .. }] if value == "sharp=loud"
    ));
}

#[test]
fn loads_from_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sharp.toml");
    std::fs::write(
        &path,
        "[language]\nversion = \"6\"\n\n[logging]\nlevel = \"debug\"\njson = true\n",
    )
    .expect("write config");

    let (config, diagnostics) =
        SharpConfig::load_from_path_with_diagnostics(&path).expect("load");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.language_version(), CSharpLanguageVersion::CSHARP_6);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = SharpConfig::load_from_path(dir.path().join("absent.toml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let err = SharpConfig::load_from_str_with_diagnostics("[refactorings\n").expect_err("bad");
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn refactoring_settings_drive_the_engine() {
    let text = "class C\n{\n    void M(bool a, bool b)\n    {\n        if (a)\n        {\n            return;\n        }\n\n        if (b)\n        {\n            return;\n        }\n    }\n}\n";
    let start = text.find("if (a)").expect("first if");
    let end = text.rfind('}').expect("class brace") - "    }\n".len() - 1;
    let span = TextRange::new(start, end);
    let document = Document::new("Test.cs", text);

    let offered = |config: &SharpConfig| {
        refactorings_at(&document, span, &config.refactorings, None)
            .expect("refactorings")
            .iter()
            .any(|action| action.refactoring == RefactoringId::MergeIfStatements)
    };

    assert!(offered(&SharpConfig::default()));

    let (disabled, _) =
        SharpConfig::load_from_str_with_diagnostics("[refactorings]\nmerge_if_statements = false\n")
            .expect("config should parse");
    assert!(!offered(&disabled));
}
