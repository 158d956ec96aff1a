//! Hygiene: production sources under `src/` must stay free of crash paths and
//! silently discarded results. Every budget is zero and never grows.

use std::fs;
use std::path::{Path, PathBuf};

/// (pattern, budget, why it is banned)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "crashes on None/Err"),
    (".expect(", 0, "crashes on None/Err"),
    ("panic!(", 0, "crashes"),
    ("unreachable!(", 0, "crashes; make the state unrepresentable instead"),
    ("todo!(", 0, "unfinished code"),
    ("unimplemented!(", 0, "unfinished code"),
    ("let _ =", 0, "discards a result without looking at it"),
    (".ok()", 0, "discards an error without looking at it"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

fn production_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            production_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") && !path.to_string_lossy().ends_with("_test.rs") {
            out.push(path);
        }
    }
}

fn hits(files: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(move |(n, line)| format!("  {}:{}: {}", path.display(), n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn source_budgets_hold() {
    let mut paths = Vec::new();
    production_files(Path::new("src"), &mut paths);
    assert!(!paths.is_empty(), "no sources found; run from the package root");

    let files: Vec<(PathBuf, String)> = paths
        .into_iter()
        .map(|p| {
            let content = fs::read_to_string(&p).unwrap();
            (p, content)
        })
        .collect();

    let mut failures = Vec::new();
    for &(pattern, budget, why) in BUDGETS {
        let found = hits(&files, pattern);
        if found.len() > budget {
            failures.push(format!("{pattern} ({why}): found {}, max {budget}\n{}", found.len(), found.join("\n")));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
