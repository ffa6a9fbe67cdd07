#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use guardlint_cli::args::{CliArgs, Command, OutputFormat};
use guardlint_cli::driver;
use guardlint_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERRORS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // No-op unless GUARDLINT_LOG or RUST_LOG is set.
    guardlint_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    if args.command == Some(Command::Rules) {
        return print_rules(&args, &cwd);
    }

    let result = driver::run(&args, &cwd)?;
    let color = args.pretty.unwrap_or_else(|| std::io::stdout().is_terminal());
    let mut reporter = Reporter::new(color);
    for file in &result.files {
        reporter.add_source(&file.file, &file.source);
    }

    match args.format {
        OutputFormat::Text => {
            for file in &result.files {
                print!("{}", reporter.render(&file.diagnostics));
            }
            let count = result.diagnostics().count();
            let fixed = result.fixes_applied();
            if fixed > 0 {
                eprintln!("Applied {fixed} fix(es).");
            }
            if count > 0 {
                eprintln!(
                    "Found {count} problem(s) in {} file(s).",
                    result.files.iter().filter(|f| !f.diagnostics.is_empty()).count()
                );
            }
        }
        OutputFormat::Json => {
            let (diagnostics, fixes): (Vec<_>, Vec<_>) = result
                .files
                .iter()
                .flat_map(|f| f.diagnostics.iter().cloned().zip(f.fixes.iter().cloned()))
                .unzip();
            println!("{}", reporter.render_json(&diagnostics, &fixes)?);
        }
    }

    if result.has_errors() {
        std::process::exit(EXIT_ERRORS_REPORTED);
    }
    std::process::exit(EXIT_SUCCESS);
}

fn print_rules(args: &CliArgs, cwd: &std::path::Path) -> Result<()> {
    let (_, rules) = driver::load_rules(args, cwd)?;
    match args.format {
        OutputFormat::Text => {
            for rule in &rules {
                println!("{:<28} {:<8} {}", rule.id, rule.category.as_str(), rule.description);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
    }
    Ok(())
}
