//! `guardlint.json` configuration.
//!
//! ```json
//! {
//!   "rules": { "emit-after-await": "error", "unconstrained-text-in-row": "off" },
//!   "extraRules": [ { "id": "...", "message": "...", "matcher": { ... }, "guard": { ... } } ],
//!   "include": ["lib/**/*.ts"],
//!   "exclude": ["**/generated/**"]
//! }
//! ```
//!
//! Extra rules use the same declaration shape as the built-in catalogue.

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use guardlint_common::DiagnosticCategory;
use guardlint_engine::{RuleDeclaration, builtin_rules};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "guardlint.json";

/// Per-rule setting in the `rules` map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    Off,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GuardlintConfig {
    #[serde(default)]
    pub rules: IndexMap<String, RuleSetting>,
    #[serde(default)]
    pub extra_rules: Vec<RuleDeclaration>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl GuardlintConfig {
    pub fn parse(text: &str) -> Result<GuardlintConfig> {
        serde_json::from_str(text).context("invalid guardlint configuration")
    }

    pub fn load(path: &Path) -> Result<GuardlintConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        GuardlintConfig::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Built-in rules followed by `extraRules`, with the `rules` settings
    /// applied. Settings for unknown ids and duplicate ids are errors.
    pub fn active_rules(&self) -> Result<Vec<RuleDeclaration>> {
        let mut rules = builtin_rules();
        for extra in &self.extra_rules {
            if rules.iter().any(|r| r.id == extra.id) {
                bail!("rule '{}' is declared more than once", extra.id);
            }
            rules.push(extra.clone());
        }

        for (id, setting) in &self.rules {
            let Some(rule) = rules.iter_mut().find(|r| &r.id == id) else {
                bail!("unknown rule '{id}' in rules settings");
            };
            match setting {
                RuleSetting::Off => {}
                RuleSetting::Warning => rule.category = DiagnosticCategory::Warning,
                RuleSetting::Error => rule.category = DiagnosticCategory::Error,
            }
        }
        rules.retain(|r| self.rules.get(&r.id) != Some(&RuleSetting::Off));
        Ok(rules)
    }

    pub fn file_matcher(&self) -> Result<FileMatcher> {
        FileMatcher::new(&self.include, &self.exclude)
    }
}

/// Explicit `--config` path, or `guardlint.json` in `cwd` if present.
pub fn resolve_config_path(cwd: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(path) = explicit else {
        let candidate = cwd.join(CONFIG_FILE_NAME);
        return Ok(candidate.is_file().then_some(candidate));
    };
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if !path.is_file() {
        bail!("config not found at {}", path.display());
    }
    Ok(Some(path))
}

/// Compiled include/exclude globs, matched against paths relative to the
/// working directory.
pub struct FileMatcher {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Result<FileMatcher> {
        Ok(FileMatcher {
            include: compile_globs(include)?,
            exclude: compile_globs(exclude)?,
        })
    }

    /// Excludes win over includes; no include patterns means everything.
    pub fn is_included(&self, path: &Path) -> bool {
        if let Some(exclude) = &self.exclude
            && exclude.is_match(path)
        {
            return false;
        }
        self.include.as_ref().is_none_or(|include| include.is_match(path))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid glob '{pattern}'"))?);
    }
    Ok(Some(builder.build().context("failed to compile globs")?))
}
