//! Validate CHP scripts without running them

use crate::{Engine, EngineOptions, MemoryHost};

use super::CliError;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Name shown in diagnostics
    pub source_name: String,
    /// Script text
    pub source: String,
}

/// Result of a check operation
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// Lexing and parsing succeeded
    SyntaxValid,
}

/// Lex and parse a script, reporting the first lexical or syntax error
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let engine = Engine::with_host(MemoryHost::new(), EngineOptions::default());
    engine.check(&options.source_name, &options.source)?;
    Ok(CheckResult::SyntaxValid)
}
