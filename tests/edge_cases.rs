//! Edge case and error handling tests for codeorbit


use harness::{TestRepo, flatten, run_codeorbit, run_json};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};

fn paths(report: &serde_json::Value) -> Vec<String> {
    flatten(&report["tree"])
        .iter()
        .map(|n| n["path"].as_str().unwrap().to_string())
        .collect()
}

fn node<'a>(report: &'a serde_json::Value, path: &str) -> &'a serde_json::Value {
    flatten(&report["tree"])
        .into_iter()
        .find(|n| n["path"] == path)
        .unwrap_or_else(|| panic!("no node at {}", path))
}

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlink_to_file_skipped() {
    let repo = TestRepo::new();
    repo.add_file("target.ts", "export const t = 1");
    symlink(repo.path().join("target.ts"), repo.path().join("link.ts"))
        .expect("Failed to create symlink");

    let report = run_json(repo.path(), &["--no-layout"]);
    let paths = paths(&report);
    assert!(paths.contains(&"target.ts".to_string()));
    assert!(!paths.contains(&"link.ts".to_string()));
}

#[test]
fn test_symlink_to_parent_no_infinite_loop() {
    let repo = TestRepo::new();
    repo.add_file("src/a.ts", "");
    symlink(repo.path(), repo.path().join("src/loop")).expect("Failed to create symlink");

    let report = run_json(repo.path(), &["--no-layout"]);
    assert_eq!(report["stats"]["files"], 1);
}

#[test]
fn test_broken_symlink() {
    let repo = TestRepo::new();
    repo.add_file("a.ts", "");
    symlink(repo.path().join("missing.ts"), repo.path().join("broken.ts"))
        .expect("Failed to create symlink");

    let report = run_json(repo.path(), &["--no-layout"]);
    assert_eq!(paths(&report), vec!["".to_string(), "a.ts".to_string()]);
}

// ============================================================================
// Unreadable Entries
// ============================================================================

#[test]
fn test_unreadable_directory() {
    let repo = TestRepo::new();
    repo.add_file("readable/file.ts", "export const r = 1");
    let unreadable = repo.add_dir("unreadable");
    fs::write(unreadable.join("hidden.ts"), "export const h = 1").expect("Failed to write file");

    let mut perms = fs::metadata(&unreadable).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&unreadable, perms).expect("Failed to set permissions");

    let (stdout, stderr, success) = run_codeorbit(repo.path(), &["--json", "--no-layout"]);

    let mut perms = fs::metadata(&unreadable).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&unreadable, perms).expect("Failed to restore permissions");

    assert!(success, "unreadable directories should not abort: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let paths = paths(&report);
    assert!(paths.contains(&"readable/file.ts".to_string()));
    // Root can still list it; everyone else gets an issue instead
    if !paths.contains(&"unreadable/hidden.ts".to_string()) {
        let issues = report["diagnostics"]["issues"].as_array().unwrap();
        assert!(issues.iter().any(|i| i["kind"] == "entry_unreadable"));
    }
}

#[test]
fn test_unreadable_file_kept_with_default_score() {
    let repo = TestRepo::new();
    let file_path = repo.add_file("secret.ts", "import './other'\nexport function f() {}");
    repo.add_file("other.ts", "");

    let mut perms = fs::metadata(&file_path).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&file_path, perms).expect("Failed to set permissions");

    let (stdout, _stderr, success) = run_codeorbit(repo.path(), &["--json", "--no-layout"]);

    let mut perms = fs::metadata(&file_path).unwrap().permissions();
    perms.set_mode(0o644);
    fs::set_permissions(&file_path, perms).expect("Failed to restore permissions");

    assert!(success);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let secret = node(&report, "secret.ts");
    if secret["imports"].as_array().unwrap().is_empty() {
        assert!(secret.get("metrics").is_none());
        let issues = report["diagnostics"]["issues"].as_array().unwrap();
        assert!(issues.iter().any(|i| i["kind"] == "parse_failure"));
    }
}

// ============================================================================
// Special Filenames and Contents
// ============================================================================

#[test]
fn test_filename_with_spaces() {
    let repo = TestRepo::new();
    repo.add_file("my file.ts", "export const a = 1");
    repo.add_file("main.ts", "import { a } from './my file'");

    let report = run_json(repo.path(), &["--no-layout"]);
    let main = node(&report, "main.ts");
    assert_eq!(main["imports"].as_array().unwrap().len(), 1);
}

#[test]
fn test_filename_with_unicode() {
    let repo = TestRepo::new();
    repo.add_file("日本語.ts", "export const x = 1");
    let report = run_json(repo.path(), &[]);
    assert!(paths(&report).contains(&"日本語.ts".to_string()));
}

#[test]
fn test_non_utf8_filenames_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let repo = TestRepo::new();
    repo.add_file("b.ts", "export const b = 1");
    for raw in [&b"a\xff.ts"[..], &b"a\xfe.ts"[..]] {
        fs::write(repo.path().join(OsStr::from_bytes(raw)), "export const a = 1")
            .expect("Failed to write file");
    }

    let report = run_json(repo.path(), &[]);
    let paths = paths(&report);
    assert_eq!(paths, vec!["".to_string(), "b.ts".to_string()]);

    let ids: Vec<&str> = flatten(&report["tree"])
        .into_iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    let unique: std::collections::BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(report["layout"]["positions"].as_object().unwrap().len(), ids.len());

    let issues = report["diagnostics"]["issues"].as_array().unwrap();
    let skipped = issues
        .iter()
        .filter(|i| i["kind"] == "entry_unreadable")
        .count();
    assert_eq!(skipped, 2);
}

#[test]
fn test_empty_file() {
    let repo = TestRepo::new();
    repo.add_file("empty.ts", "");
    let report = run_json(repo.path(), &["--no-layout"]);
    let empty = node(&report, "empty.ts");
    assert_eq!(empty["size"], 0);
    assert_eq!(empty["metrics"]["lines"], 0);
    assert_eq!(empty["complexity"], 0.0);
}

#[test]
fn test_binary_file_with_source_extension() {
    let repo = TestRepo::new();
    fs::write(repo.path().join("blob.js"), [0xff, 0xfe, 0x00, 0x9f, 0x92, 0x96]).unwrap();
    repo.add_file("ok.js", "export default 1");

    let report = run_json(repo.path(), &["--no-layout"]);
    let blob = node(&report, "blob.js");
    assert_eq!(blob["complexity"], 1.0);
    assert_eq!(report["diagnostics"]["issues"][0]["kind"], "parse_failure");
    assert_eq!(report["stats"]["files"], 2);
}

#[test]
fn test_file_no_extension() {
    let repo = TestRepo::new();
    repo.add_file("Makefile", "all:\n\techo hi\n");
    let report = run_json(repo.path(), &["--no-layout"]);
    let makefile = node(&report, "Makefile");
    assert!(makefile.get("extension").is_none());
    assert_eq!(makefile["category"], "other");
}

#[test]
fn test_bom_is_ignored() {
    let repo = TestRepo::new();
    repo.add_file("a.ts", "\u{feff}import './b'\n");
    repo.add_file("b.ts", "");
    let report = run_json(repo.path(), &["--no-layout"]);
    assert_eq!(report["edges"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Shape Edge Cases
// ============================================================================

#[test]
fn test_empty_root() {
    let repo = TestRepo::new();
    let report = run_json(repo.path(), &[]);
    assert!(report["tree"].get("children").is_none());
    let positions = report["layout"]["positions"].as_object().unwrap();
    assert_eq!(positions.len(), 1);
    let origin = positions.values().next().unwrap();
    assert_eq!(origin, &serde_json::json!([0.0, 0.0, 0.0]));
}

#[test]
fn test_root_is_file() {
    let repo = TestRepo::new();
    let file = repo.add_file("a.ts", "");
    let (_stdout, stderr, success) = run_codeorbit(repo.path(), &[file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Not a directory"), "{}", stderr);
}

#[test]
fn test_very_deep_nesting() {
    let repo = TestRepo::new();
    let deep = (0..60).map(|i| format!("d{}", i)).collect::<Vec<_>>().join("/");
    repo.add_file(&format!("{}/leaf.ts", deep), "export const leaf = 1");

    let report = run_json(repo.path(), &["--iterations", "1"]);
    assert_eq!(report["stats"]["directories"], 61);
    assert_eq!(report["tree"]["size"], 21);
}

#[test]
fn test_many_files_in_directory() {
    let repo = TestRepo::new();
    for i in 0..300 {
        repo.add_file(&format!("src/f{:03}.ts", i), "export const v = 1\n");
    }
    let report = run_json(repo.path(), &["--iterations", "3"]);
    assert_eq!(report["stats"]["files"], 300);
    assert_eq!(report["layout"]["positions"].as_object().unwrap().len(), 302);
}

#[test]
fn test_sorting_order() {
    let repo = TestRepo::new();
    repo.add_file("b.ts", "");
    repo.add_file("a.ts", "");
    repo.add_file("z/c.ts", "");

    let report = run_json(repo.path(), &["--no-layout"]);
    let names: Vec<&str> = report["tree"]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["z", "a.ts", "b.ts"]);
}

#[test]
fn test_max_file_size_limit() {
    let repo = TestRepo::new();
    let body = "export function f() { if (x) { return 1 } }\n".repeat(100);
    repo.add_file("big.ts", &body);
    repo.add_file("small.ts", "export const s = 1\n");

    let report = run_json(repo.path(), &["--no-layout", "--max-file-size", "1K"]);
    let big = node(&report, "big.ts");
    assert!(big.get("metrics").is_none());
    assert_eq!(big["complexity"], 1.0);
    assert!(node(&report, "small.ts").get("metrics").is_some());
    assert!(report["diagnostics"]["issues"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_max_file_size() {
    let repo = TestRepo::new();
    let (_stdout, stderr, success) = run_codeorbit(repo.path(), &["--max-file-size", "big"]);
    assert!(!success);
    assert!(stderr.contains("invalid --max-file-size"));
}
