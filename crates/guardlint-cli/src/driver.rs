//! Lint driver: configuration, file discovery, parallel analysis and fix
//! application.

use crate::args::CliArgs;
use crate::config::{FileMatcher, GuardlintConfig, resolve_config_path};
use anyhow::{Context, Result};
use guardlint_common::{Diagnostic, DiagnosticCategory};
use guardlint_engine::{
    AnalysisContext, Fix, RuleDeclaration, apply_fixes, evaluate_all, synthesize,
};
use guardlint_parser::{DeclaredTypeResolver, ParserState};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};
use walkdir::WalkDir;

/// Rule id reported for syntax errors.
pub const PARSE_ERROR_RULE: &str = "parse-error";

/// Extensions picked up when walking a directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mts", "cts"];

/// Outcome of linting one file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Path as shown to the user.
    pub file: String,
    /// Text the diagnostics refer to (after fixes, if any were applied).
    pub source: String,
    /// Parse errors and rule diagnostics, by offset.
    pub diagnostics: Vec<Diagnostic>,
    /// Fix for each entry of `diagnostics`, where one exists.
    pub fixes: Vec<Option<Fix>>,
    pub fixes_applied: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LintResult {
    pub files: Vec<FileResult>,
}

impl LintResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn fixes_applied(&self) -> usize {
        self.files.iter().map(|f| f.fixes_applied).sum()
    }
}

/// Load the configuration for `args` and return it with its active rules.
pub fn load_rules(args: &CliArgs, cwd: &Path) -> Result<(GuardlintConfig, Vec<RuleDeclaration>)> {
    let config = match resolve_config_path(cwd, args.config.as_deref())? {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            GuardlintConfig::load(&path)?
        }
        None => GuardlintConfig::default(),
    };
    let rules = config.active_rules()?;
    Ok((config, rules))
}

/// Lint every file selected by `args`.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<LintResult> {
    let (config, rules) = load_rules(args, cwd)?;
    let matcher = config.file_matcher()?;
    let files = discover_files(cwd, &args.paths, &matcher)?;
    info!(files = files.len(), rules = rules.len(), "linting");

    let mut results = files
        .par_iter()
        .map(|path| lint_file(cwd, path, &rules, args.fix))
        .collect::<Result<Vec<_>>>()?;
    results.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(LintResult { files: results })
}

/// Lint one file, applying and re-checking fixes when `fix` is set.
pub fn lint_file(
    cwd: &Path,
    path: &Path,
    rules: &[RuleDeclaration],
    fix: bool,
) -> Result<FileResult> {
    let file = display_path(cwd, path);
    let _span = info_span!("lint_file", file = %file).entered();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (diagnostics, fixes) = analyze_source(&file, &source, rules);

    if !fix {
        return Ok(FileResult {
            file,
            source,
            diagnostics,
            fixes,
            fixes_applied: 0,
        });
    }

    let applied = apply_fixes(&source, fixes.iter().flatten());
    if applied.skipped > 0 {
        warn!(skipped = applied.skipped, "overlapping fixes skipped");
    }
    if applied.applied == 0 {
        return Ok(FileResult {
            file,
            source,
            diagnostics,
            fixes,
            fixes_applied: 0,
        });
    }

    std::fs::write(path, &applied.text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(applied = applied.applied, "fixes written");
    let (diagnostics, fixes) = analyze_source(&file, &applied.text, rules);
    Ok(FileResult {
        file,
        source: applied.text,
        diagnostics,
        fixes,
        fixes_applied: applied.applied,
    })
}

/// Parse `source`, run every rule and synthesize fixes. Parse errors are
/// reported alongside rule diagnostics; the recovered tree is still linted.
pub fn analyze_source(
    file_name: &str,
    source: &str,
    rules: &[RuleDeclaration],
) -> (Vec<Diagnostic>, Vec<Option<Fix>>) {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    let mut entries: Vec<(Diagnostic, Option<Fix>)> = parser
        .get_diagnostics()
        .iter()
        .map(|d| {
            let diagnostic = Diagnostic::warning(
                file_name,
                d.start,
                d.length,
                PARSE_ERROR_RULE,
                d.message.clone(),
            )
            .with_category(DiagnosticCategory::Error);
            (diagnostic, None)
        })
        .collect();

    let arena = parser.into_arena();
    let types = DeclaredTypeResolver::new(&arena);
    let ctx = AnalysisContext::new(&arena, root, file_name, &types);
    for diagnostic in evaluate_all(&ctx, rules) {
        let fix = rules
            .iter()
            .find(|r| r.id == diagnostic.rule_id)
            .and_then(|rule| synthesize(&ctx, rule, &diagnostic));
        entries.push((diagnostic, fix));
    }

    entries.sort_by(|(a, _), (b, _)| (a.start, &a.rule_id).cmp(&(b.start, &b.rule_id)));
    entries.into_iter().unzip()
}

/// Source files under `paths` (the working directory when empty), sorted.
/// Files named explicitly are always linted; files found by walking a
/// directory must have a source extension and pass the include/exclude globs.
pub fn discover_files(cwd: &Path, paths: &[PathBuf], matcher: &FileMatcher) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        paths
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
            .collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("no such file or directory: {}", root.display());
        }
        let walker = WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry.path()));
        for entry in walker {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_source_extension(path) {
                continue;
            }
            let relative = path.strip_prefix(cwd).unwrap_or(path);
            if matcher.is_included(relative) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn is_skipped_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}

fn display_path(cwd: &Path, path: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
