//! The [`Engine`] owns everything that lives across runs: the global scope,
//! the options and the host.

use std::path::PathBuf;
use std::rc::Rc;

use log::debug;

use crate::ast::TokenKind;
use crate::builtins::BuiltIn;
use crate::context::{Context, SymbolTable};
use crate::error::Error;
use crate::evaluator::Signal;
use crate::host::{Host, StdHost};
use crate::lexer;
use crate::parser::Parser;
use crate::value::Value;

/// Name of the outermost frame of every script.
pub const PROGRAM_CONTEXT: &str = "<program>";

/// Constants bound in every global scope.
pub const CONSTANTS: [(&str, f64); 5] = [
    ("NULL", 0.0),
    ("TRUE", 1.0),
    ("FALSE", 0.0),
    ("e", 2.71828),
    ("pi", 3.14159),
];

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Interactive sessions read real input and print `HELP`/`DIR` output.
    pub interactive: bool,
    /// Directory of help files, laid out as `<dir>/<CATEGORY>/<name>.txt`.
    /// Only used by [`StdHost`].
    pub help_dir: Option<PathBuf>,
    /// Deepest allowed nesting of calls and sub-scripts.
    pub max_call_depth: usize,
    /// Most node evaluations in progress at once. Raise it together with
    /// the stack size of the thread that runs the engine.
    pub max_nesting_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            interactive: false,
            help_dir: None,
            // Both fit a 2 MiB thread stack in unoptimized builds.
            max_call_depth: 64,
            max_nesting_depth: 192,
        }
    }
}

/// A CHP interpreter.
///
/// Globals persist between calls to [`Engine::run`], so a REPL can feed one
/// line at a time.
///
/// # Examples
///
/// ```
/// use chp_lang::{Engine, EngineOptions};
///
/// let mut engine = Engine::new(EngineOptions::default());
/// engine.run("<stdin>", "DEF square(x) THEN x ^ 2").unwrap();
/// let value = engine.run("<stdin>", "square(4)").unwrap();
/// assert_eq!(value.to_string(), "[16]");
/// ```
pub struct Engine<H: Host = StdHost> {
    host: H,
    options: EngineOptions,
    globals: Rc<SymbolTable>,
    pub(crate) input_requested: bool,
    pub(crate) nesting: usize,
}

impl Engine<StdHost> {
    /// Engine on the terminal and file system.
    pub fn new(options: EngineOptions) -> Self {
        let host = StdHost::with_help_dir(options.help_dir.clone());
        Engine::with_host(host, options)
    }
}

impl<H: Host> Engine<H> {
    pub fn with_host(host: H, options: EngineOptions) -> Self {
        let globals = Rc::new(SymbolTable::new());
        for (name, value) in CONSTANTS {
            globals.set(name, Value::number(value));
        }
        for builtin in BuiltIn::ALL {
            globals.set(builtin.name(), Value::builtin(builtin));
        }

        Engine {
            host,
            options,
            globals,
            input_requested: false,
            nesting: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn globals(&self) -> &Rc<SymbolTable> {
        &self.globals
    }

    /// Whether a script called `INPUT` outside interactive mode and got the
    /// placeholder instead of real input.
    pub fn input_requested(&self) -> bool {
        self.input_requested
    }

    /// Lexes and parses without evaluating.
    pub fn check(&self, source_name: &str, text: &str) -> Result<(), Error> {
        let tokens = lexer::tokenize(source_name, text)?;
        if is_blank(&tokens) {
            return Ok(());
        }
        Parser::new(tokens).parse().map(|_| ())
    }

    /// Runs a script in the global scope.
    ///
    /// The result is the list of statement values, or the value of a
    /// top-level `RETURN`. A script with no statements gives an empty list.
    pub fn run(&mut self, source_name: &str, text: &str) -> Result<Value, Error> {
        self.run_at_depth(source_name, text, 0)
    }

    pub(crate) fn run_at_depth(&mut self, source_name: &str, text: &str, depth: usize) -> Result<Value, Error> {
        debug!("lexing {source_name}");
        let tokens = lexer::tokenize(source_name, text)?;
        if is_blank(&tokens) {
            return Ok(Value::list(Vec::new()));
        }

        debug!("parsing {source_name}");
        let program = Parser::new(tokens).parse()?;

        debug!("evaluating {source_name}");
        let context = Rc::new(Context::nested_root(
            PROGRAM_CONTEXT,
            Rc::clone(&self.globals),
            depth,
        ));
        match self.evaluate(&program, &context) {
            Ok(value) | Err(Signal::Return(value)) => Ok(value),
            Err(Signal::Break | Signal::Continue) => Ok(Value::null()),
            Err(Signal::Error(error)) => {
                debug!("{source_name} failed: {error}");
                Err(error)
            }
        }
    }
}

impl<H: Host> Drop for Engine<H> {
    // Functions stored in the globals close over the globals themselves.
    fn drop(&mut self) {
        self.globals.clear();
    }
}

fn is_blank(tokens: &[crate::ast::Token]) -> bool {
    tokens
        .iter()
        .all(|t| matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
}
