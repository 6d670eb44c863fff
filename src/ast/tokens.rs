use std::fmt;

use crate::position::Span;

/// Reserved words.
///
/// `:` lexes as [`Keyword::Then`] and `<-` as [`Keyword::End`], so the
/// parser only ever has to check for the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Var,
    And,
    Or,
    Not,
    If,
    Elif,
    Else,
    Then,
    For,
    While,
    Step,
    End,
    Def,
    Break,
    Continue,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 16] = [
        Keyword::Var,
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
        Keyword::If,
        Keyword::Elif,
        Keyword::Else,
        Keyword::Then,
        Keyword::For,
        Keyword::While,
        Keyword::Step,
        Keyword::End,
        Keyword::Def,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Return,
    ];

    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|k| k.as_str() == word)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Var => "VAR",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::If => "IF",
            Keyword::Elif => "ELIF",
            Keyword::Else => "ELSE",
            Keyword::Then => "THEN",
            Keyword::For => "FOR",
            Keyword::While => "WHILE",
            Keyword::Step => "STEP",
            Keyword::End => "END",
            Keyword::Def => "DEF",
            Keyword::Break => "BREAK",
            Keyword::Continue => "CONTINUE",
            Keyword::Return => "RETURN",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 007
    /// ```
    Int(i64),

    /// Float literal, any numeral with a dot
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// .5
    /// 1.
    /// ```
    Float(f64),

    /// String literal in single or double quotes, taken verbatim
    String(String),

    /// Variable or function name
    Identifier(String),

    /// Reserved word, see [`Keyword`]
    Keyword(Keyword),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    /// Power (`^`)
    Caret,
    /// Root (`#`): `a # b` is the a-th root of b
    Hash,
    /// Modulo, written `MOD` or `%`
    Mod,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Delimiters
    /// Assignment (`=`)
    Eq,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `->`, recognised by the lexer but not part of any rule
    Arrow,

    /// Statement separator, `\n` or `;`
    Newline,

    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Float(n) => write!(f, "{n}"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Keyword(k) => write!(f, "{k}"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::Hash => f.write_str("#"),
            TokenKind::Mod => f.write_str("MOD"),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::NotEq => f.write_str("!="),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::LtEq => f.write_str("<="),
            TokenKind::GtEq => f.write_str(">="),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Comma => f.write_str(","),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Arrow => f.write_str("->"),
            TokenKind::Newline => f.write_str("NEWLINE"),
            TokenKind::Eof => f.write_str("EOF"),
        }
    }
}

/// A token and the span of source it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(kind)
    }
}
