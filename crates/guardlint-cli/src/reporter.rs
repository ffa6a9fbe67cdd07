use colored::Colorize;
use guardlint_common::{Diagnostic, DiagnosticCategory, LineMap};
use guardlint_engine::Fix;
use serde::Serialize;
use std::collections::HashMap;

pub struct Reporter {
    color: bool,
    sources: HashMap<String, String>,
    line_maps: HashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: HashMap::new(),
            line_maps: HashMap::new(),
        }
    }

    /// Register the text a file was analyzed with.
    pub fn add_source(&mut self, file: &str, text: &str) {
        self.line_maps.insert(file.to_string(), LineMap::build(text));
        self.sources.insert(file.to_string(), text.to_string());
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    /// `file:line:col - severity rule-id: message`, the source line with the
    /// range underlined, and the correction hint if there is one.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.position_for(&diagnostic.file, diagnostic.start) {
            Some((line, column)) => format!("{}:{line}:{column}", diagnostic.file),
            None => diagnostic.file.clone(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_rule(&diagnostic.rule_id));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }
        if let Some(correction) = &diagnostic.correction {
            let label = if self.color {
                "hint".dimmed().to_string()
            } else {
                "hint".to_string()
            };
            output.push_str(&format!("\n       {label}: {correction}"));
        }
        output
    }

    /// The first line of the range, underlined with `~`.
    fn format_snippet(&self, file: &str, start: u32, length: u32) -> Option<String> {
        if length == 0 {
            return None;
        }
        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_text = source.lines().nth((line_num - 1) as usize)?;
        let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);

        let prefix_len = (column - 1) as usize;
        let mut underline = String::new();
        for (i, ch) in line_text.char_indices() {
            if i < prefix_len {
                underline.push_str(if ch == '\t' { "    " } else { " " });
            } else if i < prefix_len + length as usize {
                underline.push_str(if ch == '\t' { "~~~~" } else { "~" });
            } else {
                break;
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let display_line = line_text.replace('\t', "    ");
        let underline_display = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n  {line_num:>3}   {display_line}\n        {underline_display}"
        ))
    }

    /// One-based (line, column) of a byte offset.
    pub fn position_for(&self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let position = self.line_maps.get(file)?.offset_to_position(offset);
        Some((position.line + 1, position.character + 1))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_rule(&self, rule_id: &str) -> String {
        if self.color {
            rule_id.bright_blue().to_string()
        } else {
            rule_id.to_string()
        }
    }

    /// Diagnostics as a JSON array, each with its one-based line and column
    /// and the fix offered for it.
    pub fn render_json(
        &self,
        diagnostics: &[Diagnostic],
        fixes: &[Option<Fix>],
    ) -> serde_json::Result<String> {
        let entries: Vec<JsonDiagnostic<'_>> = diagnostics
            .iter()
            .enumerate()
            .map(|(i, diagnostic)| {
                let (line, column) = self
                    .position_for(&diagnostic.file, diagnostic.start)
                    .unwrap_or((0, 0));
                JsonDiagnostic {
                    diagnostic,
                    line,
                    column,
                    fix: fixes.get(i).and_then(Option::as_ref),
                }
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
    line: u32,
    column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a Fix>,
}
