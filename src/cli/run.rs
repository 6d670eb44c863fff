//! Execute CHP scripts and inline code

use std::fs;
use std::path::PathBuf;

use crate::{Engine, EngineOptions, Value, output};

use super::CliError;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Script to execute
    pub path: PathBuf,
    /// Read real input and print `HELP`/`DIR` output
    pub interactive: bool,
    /// Directory of help files
    pub help_dir: Option<PathBuf>,
}

/// Result of a run operation
#[derive(Debug)]
pub struct RunResult {
    /// Value of the program
    pub value: Value,
    /// `INPUT` was called outside interactive mode and got a placeholder
    pub input_requested: bool,
}

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Code to evaluate
    pub code: String,
    /// Print the result as JSON
    pub json: bool,
    /// Indent JSON output
    pub pretty: bool,
}

/// Execute a script file on the terminal
pub fn execute_run(options: &RunOptions) -> Result<RunResult, CliError> {
    let text = fs::read_to_string(&options.path)?;
    let mut engine = Engine::new(EngineOptions {
        interactive: options.interactive,
        help_dir: options.help_dir.clone(),
        ..EngineOptions::default()
    });

    let name = options.path.display().to_string();
    let value = engine.run(&name, &text)?;
    Ok(RunResult {
        value,
        input_requested: engine.input_requested(),
    })
}

/// Evaluate inline code and format the value of its last statement
pub fn execute_eval(options: &EvalOptions) -> Result<String, CliError> {
    let mut engine = Engine::new(EngineOptions::default());
    let value = engine.run("<eval>", &options.code)?;

    let last = match value.as_list() {
        Some(values) => values.last().cloned().unwrap_or_else(Value::null),
        None => value,
    };

    let text = match (options.json, options.pretty) {
        (true, true) => output::to_json_pretty(&last),
        (true, false) => output::to_json(&last),
        (false, _) => last.to_string(),
    };
    Ok(text)
}
