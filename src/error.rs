//! Errors raised while lexing, parsing or evaluating a script, and the
//! renderer that turns them into source excerpts with caret underlines.

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::position::Span;

/// The four error categories of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character the lexer does not understand.
    IllegalCharacter,
    /// The token stream does not match the grammar.
    InvalidSyntax,
    /// Reserved for operator-definition misuse. Nothing raises it yet.
    InvalidOperator,
    /// Anything that goes wrong while evaluating.
    Runtime,
}

impl ErrorKind {
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::IllegalCharacter => "Illegal Character",
            ErrorKind::InvalidSyntax => "Invalid Syntax",
            ErrorKind::InvalidOperator => "Invalid Operator",
            ErrorKind::Runtime => "Runtime Error",
        }
    }
}

/// A diagnostic tied to a span of source.
///
/// Runtime errors also remember the [`Context`] they were raised in, which
/// is walked outward to build the traceback.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub context: Option<Rc<Context>>,
}

impl Error {
    pub fn illegal_character(span: Span, message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::IllegalCharacter,
            message: message.into(),
            span,
            context: None,
        }
    }

    pub fn invalid_syntax(span: Span, message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::InvalidSyntax,
            message: message.into(),
            span,
            context: None,
        }
    }

    pub fn runtime(span: Span, message: impl Into<String>, context: Option<Rc<Context>>) -> Self {
        Error {
            kind: ErrorKind::Runtime,
            message: message.into(),
            span,
            context,
        }
    }

    /// `Traceback (most recent call last):` followed by one line per frame,
    /// outermost first.
    pub fn traceback(&self) -> String {
        let mut frames = Vec::new();
        let mut pos = Some(self.span.start.clone());
        let mut ctx = self.context.clone();

        while let Some(current) = ctx {
            let line = match &pos {
                Some(p) => format!("  File {}, line {}, in {}", p.source_name(), p.line + 1, current.name),
                None => format!("  File <unknown>, in {}", current.name),
            };
            frames.push(line);
            pos = current.parent_span.as_ref().map(|s| s.start.clone());
            ctx = current.parent.clone();
        }

        frames.reverse();
        let mut result = String::from("Traceback (most recent call last):\n");
        for frame in frames {
            result.push_str(&frame);
            result.push('\n');
        }
        result
    }

    /// Full user-facing rendering of the error.
    pub fn render(&self) -> String {
        let excerpt = excerpt_with_carets(&self.span);
        match self.kind {
            ErrorKind::Runtime => format!(
                "{}{}: {}\n\n{}",
                self.traceback(),
                self.kind.title(),
                self.message,
                excerpt
            ),
            _ => format!(
                "{}: {}\nFile {}, line {}\n\n{}",
                self.kind.title(),
                self.message,
                self.span.source_name(),
                self.span.line_number(),
                excerpt
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.message)
    }
}

impl std::error::Error for Error {}

/// Renders the lines covered by `span`, each followed by a row of `^`
/// under the covered columns.
pub fn excerpt_with_carets(span: &Span) -> String {
    let text = span.start.source_text();
    let lines: Vec<&str> = text.split('\n').collect();
    let first = span.start.line;
    let last = span.end.line.max(first);

    let mut result = String::new();
    for line_no in first..=last {
        let Some(line) = lines.get(line_no) else {
            break;
        };
        let line = line.trim_end_matches('\r').replace('\t', " ");
        let width = line.chars().count();
        let col_start = if line_no == first { span.start.col } else { 0 };
        let col_end = if line_no == last { span.end.col } else { width };
        let carets = col_end.saturating_sub(col_start).max(1);

        result.push_str(&line);
        result.push('\n');
        result.push_str(&" ".repeat(col_start));
        result.push_str(&"^".repeat(carets));
        if line_no != last {
            result.push('\n');
        }
    }
    result
}
