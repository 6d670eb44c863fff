//! CLI support for chp-lang
//!
//! Provides programmatic access to the `chp` commands for embedding in
//! other tools.

mod check;
mod docs;
mod run;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{get_doc_topic, get_docs_overview};
pub use run::{EvalOptions, RunOptions, RunResult, execute_eval, execute_run};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Lexing, parsing or evaluation failed
    Script(crate::Error),
    /// IO error
    Io(io::Error),
    /// Unknown documentation topic
    UnknownTopic(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Script(e) => write!(f, "{}", e.render()),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::UnknownTopic(t) => {
                write!(f, "Unknown topic: '{}'\nRun 'chp docs' to see available topics.", t)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Script(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::UnknownTopic(_) => None,
        }
    }
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        CliError::Script(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
