//! End-to-end tests for the lint driver over real directories.
use clap::Parser;
use guardlint_cli::args::CliArgs;
use guardlint_cli::config::FileMatcher;
use guardlint_cli::driver::{self, PARSE_ERROR_RULE};
use guardlint_common::DiagnosticCategory;
use guardlint_engine::builtin_rules;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNGUARDED: &str = "class Counter {\n  async load() {\n    await fetch();\n    emit(1);\n  }\n}\n";
const GUARDED: &str =
    "class Counter {\n  async load() {\n    await fetch();\n    if (isClosed) return;\n    emit(1);\n  }\n}\n";

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, text).expect("write file");
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["guardlint"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args")
}

#[test]
fn lints_a_directory() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "lib/counter.ts", UNGUARDED);
    write(dir.path(), "lib/safe.ts", GUARDED);
    write(dir.path(), "lib/readme.md", "emit(1);");

    let result = driver::run(&args(&[]), dir.path()).expect("run");
    let files: Vec<&str> = result.files.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(files, vec!["lib/counter.ts", "lib/safe.ts"]);

    let diagnostics: Vec<_> = result.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file, "lib/counter.ts");
    assert_eq!(diagnostics[0].rule_id, builtin_rules::EMIT_AFTER_AWAIT);
    assert!(!result.has_errors());
    assert!(result.files[0].fixes[0].is_some());
}

#[test]
fn config_controls_rules_and_files() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "lib/counter.ts", UNGUARDED);
    write(dir.path(), "lib/generated/api.ts", UNGUARDED);
    write(
        dir.path(),
        "guardlint.json",
        r#"{ "rules": { "emit-after-await": "error" }, "exclude": ["**/generated/**"] }"#,
    );

    let result = driver::run(&args(&[]), dir.path()).expect("run");
    assert_eq!(result.files.len(), 1);
    assert!(result.has_errors());
    let diagnostic = result.diagnostics().next().expect("diagnostic");
    assert_eq!(diagnostic.category, DiagnosticCategory::Error);
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = TempDir::new().expect("temp dir");
    let err = driver::run(&args(&["--config", "missing.json"]), dir.path()).expect_err("missing");
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn invalid_config_is_reported_with_its_path() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "guardlint.json", "{ not json");
    let err = driver::run(&args(&[]), dir.path()).expect_err("invalid");
    assert!(format!("{err:#}").contains("guardlint.json"));
}

#[test]
fn fix_rewrites_the_file_and_reanalyzes() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "counter.ts", UNGUARDED);

    let result = driver::run(&args(&["--fix", "counter.ts"]), dir.path()).expect("run");
    assert_eq!(result.fixes_applied(), 1);
    assert_eq!(result.diagnostics().count(), 0);

    let text = fs::read_to_string(dir.path().join("counter.ts")).expect("read back");
    assert_eq!(
        text,
        "class Counter {\n  async load() {\n    await fetch();\n    if (!isClosed) {\n      emit(1);\n    }\n  }\n}\n"
    );

    let again = driver::run(&args(&["--fix", "counter.ts"]), dir.path()).expect("second run");
    assert_eq!(again.fixes_applied(), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("counter.ts")).expect("read back"),
        text
    );
}

#[test]
fn parse_errors_are_reported_and_the_file_still_linted() {
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path(),
        "broken.ts",
        "async function f() {\n  await x();\n  emit(1);\n  ) \n}\n",
    );
    let result = driver::run(&args(&[]), dir.path()).expect("run");
    let rules: Vec<&str> = result.diagnostics().map(|d| d.rule_id.as_str()).collect();
    assert!(rules.contains(&PARSE_ERROR_RULE));
    assert!(rules.contains(&builtin_rules::EMIT_AFTER_AWAIT));
    assert!(result.has_errors());
}

#[test]
fn discovery_skips_hidden_and_dependency_dirs() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "src/a.ts", "");
    write(dir.path(), "src/b.jsx", "");
    write(dir.path(), "node_modules/pkg/index.ts", "");
    write(dir.path(), ".cache/c.ts", "");

    let matcher = FileMatcher::new(&[], &[]).expect("matcher");
    let files = driver::discover_files(dir.path(), &[], &matcher).expect("discover");
    let names: Vec<String> = files
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .expect("inside root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, vec!["src/a.ts", "src/b.jsx"]);
}

#[test]
fn missing_path_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    assert!(driver::run(&args(&["nope.ts"]), dir.path()).is_err());
}

#[test]
fn analyze_source_pairs_fixes_with_diagnostics() {
    let rules = builtin_rules::builtin_rules();
    let source = "async function f() { await x(); emit(1); const y = emit(2); }";
    let (diagnostics, fixes) = driver::analyze_source("inline.ts", source, &rules);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(fixes.len(), 2);
    assert!(fixes[0].is_some());
    assert!(fixes[1].is_none());
}
