pub mod ast;
pub mod builtins;
pub mod cli;
pub mod context;
pub mod docs;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod position;
pub mod value;

pub use ast::{BinOp, Keyword, Node, NodeKind, Token, TokenKind, UnaryOp};
pub use builtins::BuiltIn;
pub use context::{Context, SymbolTable};
pub use engine::{Engine, EngineOptions};
pub use error::{Error, ErrorKind};
pub use evaluator::Signal;
pub use host::{HelpCategory, Host, MemoryHost, StdHost};
pub use lexer::{Lexer, tokenize};
pub use output::{to_json, to_json_pretty};
pub use parser::{Parser, parse};
pub use position::{Position, Source, Span};
pub use value::{Function, Value, ValueKind};

/// Runs `text` on a fresh engine attached to the terminal.
///
/// # Examples
///
/// ```
/// let value = chp_lang::run("<stdin>", "VAR x = 2\nx * 21", false).unwrap();
/// assert_eq!(value.to_string(), "[2, 42]");
/// ```
pub fn run(source_name: &str, text: &str, interactive: bool) -> Result<Value, Error> {
    let options = EngineOptions {
        interactive,
        ..EngineOptions::default()
    };
    Engine::new(options).run(source_name, text)
}
