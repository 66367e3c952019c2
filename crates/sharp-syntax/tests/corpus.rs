use pretty_assertions::assert_eq;

use sharp_syntax::{debug_dump, parse_csharp, ParseError, SyntaxKind};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[test]
fn parser_fixtures_parse_cleanly() -> io::Result<()> {
    let root = testdata_dir().join("parser");
    let fixtures = collect_cs_files(&root)?;
    assert!(!fixtures.is_empty(), "no fixtures under {}", root.display());

    for path in fixtures {
        let input = read_normalized(&path)?;
        let parsed = parse_csharp(&input);
        if !parsed.errors.is_empty() {
            panic!(
                "expected no parse errors for fixture `{}`\n{}\n{}",
                path.display(),
                format_errors(&input, &parsed.errors),
                debug_dump(&parsed.syntax())
            );
        }
        assert_eq!(
            parsed.syntax().text().to_string(),
            input,
            "tree is not lossless for `{}`",
            path.display()
        );
        assert!(
            !parsed
                .syntax()
                .descendants()
                .any(|n| matches!(n.kind(), SyntaxKind::Error | SyntaxKind::IncompleteMember)),
            "error nodes in `{}`",
            path.display()
        );
    }
    Ok(())
}

#[test]
fn recovery_fixtures_report_errors_and_stay_lossless() -> io::Result<()> {
    let root = testdata_dir().join("recovery");
    for path in collect_cs_files(&root)? {
        let input = read_normalized(&path)?;
        let parsed = parse_csharp(&input);
        assert!(
            !parsed.errors.is_empty(),
            "expected parse errors for `{}`",
            path.display()
        );
        assert_eq!(parsed.syntax().text().to_string(), input);
        for error in &parsed.errors {
            assert!(error.range.end as usize <= input.len());
        }
    }
    Ok(())
}

#[test]
fn missing_semicolons_are_reported_where_they_belong() {
    let input = "class C { void M() { var x = 1\n Call(x)\n } }";
    let parsed = parse_csharp(input);
    let positions: Vec<(usize, usize)> = parsed
        .errors
        .iter()
        .map(|e| byte_offset_to_line_col(input, e.range.start as usize))
        .collect();
    assert_eq!(positions, vec![(2, 2), (3, 2)]);
}

fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn collect_cs_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if !root.exists() {
        return Ok(out);
    }
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.extension() == Some(OsStr::new("cs")) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn read_normalized(path: &Path) -> io::Result<String> {
    let raw = fs::read_to_string(path)?;
    Ok(raw.replace("\r\n", "\n").replace('\r', "\n"))
}

fn format_errors(source: &str, errors: &[ParseError]) -> String {
    let mut out = String::new();
    for error in errors {
        let (line, col) = byte_offset_to_line_col(source, error.range.start as usize);
        out.push_str(&format!("{line}:{col}: {}\n", error.message));
    }
    out
}

fn byte_offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut col = 1usize;
    for (idx, ch) in source.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
