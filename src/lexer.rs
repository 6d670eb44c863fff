use std::rc::Rc;

use log::trace;

use crate::ast::{Keyword, Token, TokenKind};
use crate::error::Error;
use crate::position::{Position, Source, Span};

/// Characters that may form operator and punctuation runs.
const OPERATOR_CHARS: &str = "+-*/#^%<>()[]=:,;!";

/// Two-character symbols, tried before single characters.
static DOUBLE_SYMBOLS: [(&str, TokenKind); 6] = [
    ("<-", TokenKind::Keyword(Keyword::End)),
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::LtEq),
    (">=", TokenKind::GtEq),
];

fn single_symbol(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '^' => TokenKind::Caret,
        '#' => TokenKind::Hash,
        '%' => TokenKind::Mod,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '=' => TokenKind::Eq,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Keyword(Keyword::Then),
        ';' => TokenKind::Newline,
        _ => return None,
    };
    Some(kind)
}

pub struct Lexer {
    input: Vec<char>,
    pos: Position,
}

impl Lexer {
    pub fn new(source_name: &str, text: &str) -> Self {
        let source = Rc::new(Source {
            name: source_name.to_string(),
            text: text.to_string(),
        });
        Lexer {
            input: text.chars().collect(),
            pos: Position::start_of(source),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos.index).copied()
    }

    fn advance(&mut self) {
        let current = self.current_char();
        self.pos.advance(current);
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos.clone())
    }

    /// Reads the whole input, ending with exactly one EOF token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current_char() {
            match ch {
                ' ' | '\t' | '\r' => self.advance(),
                '\n' => {
                    let start = self.pos.clone();
                    self.advance();
                    tokens.push(Token::new(TokenKind::Newline, self.span_from(start)));
                }
                '@' => self.skip_comment(),
                c if c.is_ascii_alphabetic() || c == '_' => tokens.push(self.read_word()),
                c if c.is_ascii_digit() || c == '.' => tokens.push(self.read_number()?),
                '"' | '\'' => tokens.push(self.read_string(ch)),
                c if OPERATOR_CHARS.contains(c) => self.read_operators(&mut tokens)?,
                c => {
                    let start = self.pos.clone();
                    self.advance();
                    return Err(Error::illegal_character(
                        self.span_from(start),
                        format!("'{c}'"),
                    ));
                }
            }
        }

        let eof = self.pos.clone();
        tokens.push(Token::new(TokenKind::Eof, Span::new(eof.clone(), eof)));
        trace!("lexed {} tokens from {}", tokens.len(), self.pos.source_name());
        Ok(tokens)
    }

    /// `@ ... @` or `@ ...` up to the end of the line, which is left for the
    /// newline token.
    fn skip_comment(&mut self) {
        self.advance();
        while let Some(ch) = self.current_char() {
            match ch {
                '@' => {
                    self.advance();
                    return;
                }
                '\n' => return,
                _ => self.advance(),
            }
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos.clone();
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if word == "MOD" {
            TokenKind::Mod
        } else if let Some(keyword) = Keyword::from_word(&word) {
            TokenKind::Keyword(keyword)
        } else {
            TokenKind::Identifier(word)
        };
        Token::new(kind, self.span_from(start))
    }

    /// Digits and at most two dots. A second dot ends the numeral, so
    /// `1.2.3` reads as `1.2.` followed by `3`.
    fn read_number(&mut self) -> Result<Token, Error> {
        let start = self.pos.clone();
        let mut text = String::new();
        let mut dots = 0;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' {
                dots += 1;
                text.push(ch);
                self.advance();
                if dots == 2 {
                    break;
                }
            } else {
                break;
            }
        }

        let span = self.span_from(start);
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::illegal_character(span, format!("'{text}'")));
        }

        if dots == 0 {
            let kind = match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                Err(_) => TokenKind::Float(parse_float(&text)),
            };
            return Ok(Token::new(kind, span));
        }

        let first_dot = text.find('.').map_or(text.len(), |i| i + 1);
        let value = match text[first_dot..].find('.') {
            Some(second) => &text[..first_dot + second],
            None => text.as_str(),
        };
        Ok(Token::new(TokenKind::Float(parse_float(value)), span))
    }

    /// Verbatim up to the matching quote or the end of input.
    fn read_string(&mut self, quote: char) -> Token {
        let start = self.pos.clone();
        let mut value = String::new();
        self.advance();

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                break;
            }
            value.push(ch);
        }
        Token::new(TokenKind::String(value), self.span_from(start))
    }

    /// Splits a run of operator characters into symbols, longest first.
    fn read_operators(&mut self, tokens: &mut Vec<Token>) -> Result<(), Error> {
        while let Some(ch) = self.current_char() {
            if !OPERATOR_CHARS.contains(ch) {
                break;
            }
            let start = self.pos.clone();

            if let Some(next) = self.input.get(self.pos.index + 1).copied() {
                let pair: String = [ch, next].iter().collect();
                if let Some((_, kind)) = DOUBLE_SYMBOLS.iter().find(|(text, _)| *text == pair) {
                    self.advance();
                    self.advance();
                    tokens.push(Token::new(kind.clone(), self.span_from(start)));
                    continue;
                }
            }

            self.advance();
            match single_symbol(ch) {
                Some(kind) => tokens.push(Token::new(kind, self.span_from(start))),
                None => {
                    return Err(Error::illegal_character(
                        self.span_from(start),
                        format!("'{ch}'"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parses a numeral of digits with one optional dot. Forms like `1.` and
/// `.5` are accepted by Rust's float parser.
fn parse_float(text: &str) -> f64 {
    text.parse::<f64>().unwrap_or(0.0)
}

/// Lexes `text`, naming its spans after `source_name`.
pub fn tokenize(source_name: &str, text: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source_name, text).tokenize()
}

#[cfg(test)]
fn kinds(text: &str) -> Vec<TokenKind> {
    tokenize("<test>", text)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_keywords_and_mod() {
    assert_eq!(
        kinds("VAR x MOD y"),
        vec![
            TokenKind::Keyword(Keyword::Var),
            TokenKind::Identifier("x".to_string()),
            TokenKind::Mod,
            TokenKind::Identifier("y".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_symbol_aliases() {
    assert_eq!(
        kinds(": <- ; %"),
        vec![
            TokenKind::Keyword(Keyword::Then),
            TokenKind::Keyword(Keyword::End),
            TokenKind::Newline,
            TokenKind::Mod,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operator_run_is_peeled() {
    assert_eq!(
        kinds("(-1)"),
        vec![
            TokenKind::LParen,
            TokenKind::Minus,
            TokenKind::Int(1),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_second_dot_ends_numeral() {
    assert_eq!(
        kinds("1.2.3"),
        vec![TokenKind::Float(1.2), TokenKind::Int(3), TokenKind::Eof]
    );
}

#[test]
fn test_lone_bang_is_illegal() {
    let err = tokenize("<test>", "1 ! 2").unwrap_err();
    assert_eq!(err.message, "'!'");
    assert_eq!(err.span.start.col, 2);
}
