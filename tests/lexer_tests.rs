// tests/lexer_tests.rs

use chp_lang::ast::{Keyword, TokenKind};
use chp_lang::error::ErrorKind;
use chp_lang::lexer::tokenize;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize("<test>", input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

// ============================================================================
// Single Symbols
// ============================================================================

#[test]
fn test_single_symbols() {
    let test_cases = vec![
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("^", TokenKind::Caret),
        ("#", TokenKind::Hash),
        ("%", TokenKind::Mod),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        ("=", TokenKind::Eq),
        (",", TokenKind::Comma),
        (":", TokenKind::Keyword(Keyword::Then)),
        (";", TokenKind::Newline),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected, TokenKind::Eof], "input: {input}");
    }
}

#[test]
fn test_double_symbols() {
    let test_cases = vec![
        ("==", TokenKind::EqEq),
        ("!=", TokenKind::NotEq),
        ("<=", TokenKind::LtEq),
        (">=", TokenKind::GtEq),
        ("->", TokenKind::Arrow),
        ("<-", TokenKind::Keyword(Keyword::End)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected, TokenKind::Eof], "input: {input}");
    }
}

#[test]
fn test_operator_runs_prefer_longest_symbol() {
    assert_eq!(
        kinds("==="),
        vec![TokenKind::EqEq, TokenKind::Eq, TokenKind::Eof]
    );
    assert_eq!(
        kinds("<=="),
        vec![TokenKind::LtEq, TokenKind::Eq, TokenKind::Eof]
    );
    assert_eq!(
        kinds("f()*-2"),
        vec![
            ident("f"),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Star,
            TokenKind::Minus,
            TokenKind::Int(2),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_peeled_symbols_get_their_own_spans() {
    let tokens = tokenize("<test>", "x==-1").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::EqEq);
    assert_eq!((tokens[1].span.start.col, tokens[1].span.end.col), (1, 3));
    assert_eq!(tokens[2].kind, TokenKind::Minus);
    assert_eq!((tokens[2].span.start.col, tokens[2].span.end.col), (3, 4));
}

// ============================================================================
// Words
// ============================================================================

#[test]
fn test_every_keyword() {
    for keyword in Keyword::ALL {
        assert_eq!(
            kinds(keyword.as_str()),
            vec![TokenKind::Keyword(keyword), TokenKind::Eof]
        );
    }
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("if"), vec![ident("if"), TokenKind::Eof]);
    assert_eq!(kinds("Mod"), vec![ident("Mod"), TokenKind::Eof]);
}

#[test]
fn test_mod_word_is_operator() {
    assert_eq!(
        kinds("7 MOD 2"),
        vec![TokenKind::Int(7), TokenKind::Mod, TokenKind::Int(2), TokenKind::Eof]
    );
}

#[test]
fn test_identifiers_with_digits_and_underscores() {
    assert_eq!(
        kinds("_tmp x1 snake_case"),
        vec![ident("_tmp"), ident("x1"), ident("snake_case"), TokenKind::Eof]
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers_and_floats() {
    assert_eq!(
        kinds("42 3.5 .5 7."),
        vec![
            TokenKind::Int(42),
            TokenKind::Float(3.5),
            TokenKind::Float(0.5),
            TokenKind::Float(7.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_second_dot_truncates_numeral() {
    let tokens = tokenize("<test>", "1.2.3").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Float(1.2));
    // The second dot belongs to the first numeral.
    assert_eq!(tokens[0].span.end.col, 4);
    assert_eq!(tokens[1].kind, TokenKind::Int(3));
}

#[test]
fn test_huge_integer_becomes_float() {
    assert_eq!(
        kinds("99999999999999999999"),
        vec![TokenKind::Float(1e20), TokenKind::Eof]
    );
}

#[test]
fn test_lone_dot_is_illegal() {
    let err = tokenize("<test>", "x = .").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalCharacter);
    assert_eq!(err.message, "'.'");
}

// ============================================================================
// Strings and Comments
// ============================================================================

#[test]
fn test_strings_are_verbatim() {
    assert_eq!(
        kinds(r#""a\nb" 'it"s'"#),
        vec![
            TokenKind::String(r"a\nb".to_string()),
            TokenKind::String("it\"s".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unterminated_string_runs_to_end() {
    assert_eq!(
        kinds("\"open"),
        vec![TokenKind::String("open".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_inline_comment() {
    assert_eq!(
        kinds("1 @ note @ + 2"),
        vec![TokenKind::Int(1), TokenKind::Plus, TokenKind::Int(2), TokenKind::Eof]
    );
}

#[test]
fn test_line_comment_keeps_newline() {
    assert_eq!(
        kinds("1 @ rest of line\n2"),
        vec![
            TokenKind::Int(1),
            TokenKind::Newline,
            TokenKind::Int(2),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Whitespace, Positions and Errors
// ============================================================================

#[test]
fn test_carriage_returns_and_tabs_are_skipped() {
    assert_eq!(
        kinds("1\t+\r\n2"),
        vec![
            TokenKind::Int(1),
            TokenKind::Plus,
            TokenKind::Newline,
            TokenKind::Int(2),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_exactly_one_eof() {
    let tokens = tokenize("<test>", "").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_positions_track_lines() {
    let tokens = tokenize("<test>", "a\n  bc").unwrap();
    let bc = &tokens[2];
    assert_eq!(bc.kind, ident("bc"));
    assert_eq!((bc.span.start.line, bc.span.start.col), (1, 2));
    assert_eq!(bc.span.end.col, 4);
    assert_eq!(bc.span.source_name(), "<test>");
}

#[test]
fn test_illegal_character() {
    let err = tokenize("<test>", "x = $").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalCharacter);
    assert_eq!(err.message, "'$'");
    assert_eq!(err.span.start.col, 4);
}

#[test]
fn test_bang_inside_run_is_illegal() {
    let err = tokenize("<test>", "(!1)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalCharacter);
    assert_eq!(err.message, "'!'");
    assert_eq!(err.span.start.col, 1);
}
