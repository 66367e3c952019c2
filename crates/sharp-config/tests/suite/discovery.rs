use pretty_assertions::assert_eq;
use sharp_config::{
    discover_config_path, load_for_workspace, load_for_workspace_with_diagnostics, SharpConfig,
};
use sharp_refactor::{RefactoringId, RefactoringSettings};
use tempfile::tempdir;

#[test]
fn discovers_sharp_toml_in_workspace_root() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sharp.toml");
    std::fs::write(&path, "[refactorings]\nadd_braces = false\n").expect("write config");

    assert_eq!(discover_config_path(dir.path()), Some(path.clone()));

    let (config, found) = load_for_workspace(dir.path()).expect("load");
    assert_eq!(found, Some(path));
    assert!(!config.refactorings.is_enabled(RefactoringId::AddBraces));
}

#[test]
fn plain_name_wins_over_hidden_name() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".sharp.toml"), "").expect("write hidden config");
    assert_eq!(
        discover_config_path(dir.path()),
        Some(dir.path().join(".sharp.toml"))
    );

    std::fs::write(dir.path().join("sharp.toml"), "").expect("write config");
    assert_eq!(
        discover_config_path(dir.path()),
        Some(dir.path().join("sharp.toml"))
    );
}

#[test]
fn missing_config_returns_defaults() {
    let dir = tempdir().expect("tempdir");
    let (config, path, diagnostics) =
        load_for_workspace_with_diagnostics(dir.path()).expect("load");
    assert_eq!(config, SharpConfig::default());
    assert_eq!(path, None);
    assert!(diagnostics.is_empty());
}

#[test]
fn directory_named_like_config_is_ignored() {
    let dir = tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join("sharp.toml")).expect("mkdir");
    assert_eq!(discover_config_path(dir.path()), None);
}
