//! Source positions and spans.
//!
//! Every token, AST node and runtime value carries a [`Span`] so that
//! diagnostics can point back at the exact piece of source that produced
//! them. Positions are cheap to clone: the source name and text are shared
//! behind reference counts.

use std::fmt;
use std::rc::Rc;

/// A named piece of source text.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

/// A cursor into a [`Source`].
///
/// `index` counts characters, `line` and `col` are zero-based. Positions
/// are values: advancing one never changes a copy that was handed out
/// earlier.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub col: usize,
    pub source: Rc<Source>,
}

impl Position {
    /// Position of the first character of `source`.
    pub fn start_of(source: Rc<Source>) -> Self {
        Position {
            index: 0,
            line: 0,
            col: 0,
            source,
        }
    }

    /// Moves past `current`, starting a new line after `'\n'`.
    pub fn advance(&mut self, current: Option<char>) {
        self.index += 1;
        self.col += 1;
        if current == Some('\n') {
            self.line += 1;
            self.col = 0;
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    pub fn source_text(&self) -> &str {
        &self.source.text
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source.name,
            self.line + 1,
            self.col + 1
        )
    }
}

/// A half-open `[start, end)` range of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }

    pub fn source_name(&self) -> &str {
        self.start.source_name()
    }

    /// One-based line number of the start, as shown to users.
    pub fn line_number(&self) -> usize {
        self.start.line + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> Rc<Source> {
        Rc::new(Source {
            name: "<test>".to_string(),
            text: text.to_string(),
        })
    }

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut pos = Position::start_of(source("ab\nc"));
        pos.advance(Some('a'));
        pos.advance(Some('b'));
        assert_eq!((pos.index, pos.line, pos.col), (2, 0, 2));
        pos.advance(Some('\n'));
        assert_eq!((pos.index, pos.line, pos.col), (3, 1, 0));
    }

    #[test]
    fn issued_copies_are_not_affected_by_advancing() {
        let mut pos = Position::start_of(source("xyz"));
        let issued = pos.clone();
        pos.advance(Some('x'));
        assert_eq!(issued.index, 0);
        assert_eq!(pos.index, 1);
    }
}
