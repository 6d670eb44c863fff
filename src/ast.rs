//! # CHP - Abstract Syntax Tree
//!
//! This module defines the tokens and syntax tree of the CHP scripting
//! language.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Tree nodes, one variant per construct
//! - **[operators]** - Binary and prefix operators
//! - **[printer]** - Renders a tree back into source form
//!
//! ## Quick Start
//!
//! ```text
//! DEF fib(n) THEN
//!     IF n < 2 THEN RETURN n
//!     RETURN fib(n - 1) + fib(n - 2)
//! END
//! PRINT(fib(10))
//! ```
//!
//! ## Core Concepts
//!
//! ### Everything is an expression
//!
//! `IF`, `FOR`, `WHILE` and `DEF` are expressions. The inline form
//! (`IF x THEN y`) has the value of its body; the block form, where a newline
//! follows `THEN` and `END` closes the body, has the value null.
//!
//! ### Statements
//!
//! Statements are separated by newlines or `;`. A program evaluates to the
//! list of its statement values.
//!
//! ### Spans
//!
//! Every node keeps the span it was parsed from so that runtime errors can
//! point back at the source.
pub mod expressions;
pub mod operators;
pub mod printer;
pub mod tokens;

pub use expressions::{ElseCase, IfCase, Node, NodeKind};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Keyword, Token, TokenKind};
