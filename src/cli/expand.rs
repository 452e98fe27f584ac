//! Expand subcommand - run every rule invocation in a source file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::context::Context;
use crate::diagnostics::{apply_fix_its, FixIt};
use crate::engine::{Engine, Expansion};
use crate::error::AppError;

/// Expand the generator rule invocations found in a source file.
#[derive(Parser)]
pub struct ExpandCommand {
    /// Source file containing annotated declarations.
    pub file: PathBuf,

    /// Output format (defaults to the configured format).
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Apply the mechanical fix-its of failed invocations to the file.
    #[arg(long)]
    pub fix: bool,
}

/// JSON document written for one file.
#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a Path,
    expansions: &'a [Expansion],
}

impl ExpandCommand {
    /// Run the expand command.
    pub fn run(self) -> Result<ExitCode> {
        let config = Config::load()?;
        let format = self.format.unwrap_or(config.output.format);
        let engine = Engine::new(&Context::from_config(&config));

        let source =
            std::fs::read_to_string(&self.file).map_err(|e| AppError::io(&self.file, e))?;
        let expansions = engine.expand_source(&source)?;
        tracing::info!(
            file = %self.file.display(),
            invocations = expansions.len(),
            "Expanded source"
        );

        match format {
            OutputFormat::Text => print!("{}", render_text(&self.file, &source, &expansions)),
            OutputFormat::Json => {
                let report = FileReport {
                    file: &self.file,
                    expansions: &expansions,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        if self.fix {
            self.apply_fixes(&source, &expansions)?;
        }

        let failed = expansions.iter().filter(|e| !e.is_success()).count();
        if failed > 0 {
            tracing::debug!(failed, "Invocations reported diagnostics");
            return Ok(ExitCode::from(1));
        }
        Ok(ExitCode::SUCCESS)
    }

    fn apply_fixes(&self, source: &str, expansions: &[Expansion]) -> Result<(), AppError> {
        let fix_its: Vec<&FixIt> = expansions
            .iter()
            .filter_map(|e| e.diagnostic.as_ref()?.fix_it.as_ref())
            .filter(|f| f.edit.range.is_some())
            .collect();
        if fix_its.is_empty() {
            tracing::info!("No applicable fix-its");
            return Ok(());
        }

        let count = fix_its.len();
        let fixed = apply_fix_its(source, fix_its)?;
        std::fs::write(&self.file, fixed).map_err(|e| AppError::io(&self.file, e))?;
        tracing::info!(file = %self.file.display(), count, "Applied fix-its");
        Ok(())
    }
}

/// 1-based line and column of a byte offset.
fn location(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

/// Human readable report: fragments per invocation, diagnostics as
/// `file:line:column: error[id]: message`.
fn render_text(path: &Path, source: &str, expansions: &[Expansion]) -> String {
    let mut out = String::new();
    for expansion in expansions {
        let (line, column) = expansion
            .span
            .as_ref()
            .map_or((0, 0), |span| location(source, span.start));
        let position = format!("{}:{line}:{column}", path.display());

        match &expansion.diagnostic {
            Some(diagnostic) => {
                let _ = writeln!(out, "{position}: {}", diagnostic.render());
            }
            None => {
                let _ = writeln!(out, "== {} at {position} ==", expansion.rule);
                for fragment in &expansion.fragments {
                    let _ = writeln!(out, "// {}", fragment.placement);
                    let _ = writeln!(out, "{}", fragment.text);
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_location() {
        let source = "struct A {}\n@Entity\nstruct B {}";
        assert_eq!(location(source, 0), (1, 1));
        assert_eq!(location(source, 12), (2, 1));
        assert_eq!(location(source, 13), (2, 2));
    }

    #[test]
    fn test_render_text() {
        let source = "@Entity\nclass User {\n    let id: UUID\n}\n\nstruct F {\n    #MakeRepository<AuthRepository>()\n}\n";
        let expansions = Engine::default().expand_source(source).unwrap();
        let text = render_text(Path::new("User.swift"), source, &expansions);
        assert_eq!(
            text,
            "User.swift:1:1: error[layergen.notAStruct]: '@Entity' can only be applied to structs.\n  fix-it: Replace 'class' with 'struct'\n\n\
             == MakeRepository at User.swift:7:5 ==\n// freestanding\npublic func makeAuthRepository() -> AuthRepository {\n    let authDataSource = dataSourceFactory.makeAuthDataSource()\n    return DefaultAuthRepository(authDataSource: authDataSource)\n}\n\n"
        );
    }
}
