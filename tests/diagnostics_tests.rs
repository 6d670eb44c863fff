// tests/diagnostics_tests.rs

use chp_lang::{Engine, EngineOptions, Error, ErrorKind, MemoryHost};

fn run_err(code: &str) -> Error {
    let mut engine = Engine::with_host(MemoryHost::new(), EngineOptions::default());
    match engine.run("<test>", code) {
        Ok(value) => panic!("Expected an error, got {value}"),
        Err(e) => e,
    }
}

// ============================================================================
// Lexical and Syntax Errors
// ============================================================================

#[test]
fn test_illegal_character_render() {
    let err = run_err("x = $");
    assert_eq!(err.kind, ErrorKind::IllegalCharacter);
    assert_eq!(
        err.render(),
        "Illegal Character: '$'\nFile <test>, line 1\n\nx = $\n    ^"
    );
    assert!(err.context.is_none());
}

#[test]
fn test_syntax_error_render() {
    let err = run_err("VAR a = 1\nb = (1 + 2");
    assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    assert_eq!(
        err.render(),
        "Invalid Syntax: Expected ')'\nFile <test>, line 2\n\nb = (1 + 2\n          ^"
    );
}

#[test]
fn test_syntax_errors_stop_before_evaluation() {
    let mut engine = Engine::with_host(MemoryHost::new(), EngineOptions::default());
    let err = engine.run("<test>", "PRINT(1)\n1 +").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    assert!(engine.host().output.is_empty());
}

#[test]
fn test_check_reports_without_running() {
    let engine = Engine::with_host(MemoryHost::new(), EngineOptions::default());
    assert!(engine.check("<test>", "PRINT(1)\nundefined_name").is_ok());
    assert!(engine.check("<test>", "").is_ok());
    let err = engine.check("<test>", "IF 1 THEN\n2").unwrap_err();
    assert_eq!(err.message, "Expected 'END', 'ELIF' or 'ELSE'");
    assert!(engine.host().output.is_empty());
}

// ============================================================================
// Runtime Errors
// ============================================================================

#[test]
fn test_runtime_error_render() {
    let err = run_err("VAR a = 1\na + missing");
    assert_eq!(
        err.render(),
        "Traceback (most recent call last):\n  File <test>, line 2, in <program>\n\
         Runtime Error: 'missing' is not defined\n\na + missing\n    ^^^^^^^"
    );
}

#[test]
fn test_display_is_one_line() {
    let err = run_err("1 / 0");
    assert_eq!(err.to_string(), "Runtime Error: Division by zero");
}

#[test]
fn test_traceback_lists_every_frame() {
    let err = run_err("DEF inner() THEN 1 / 0\nDEF outer() THEN inner()\nouter()");
    assert_eq!(
        err.traceback(),
        "Traceback (most recent call last):\n\
         \x20 File <test>, line 3, in <program>\n\
         \x20 File <test>, line 2, in outer\n\
         \x20 File <test>, line 1, in inner\n"
    );
}

#[test]
fn test_arity_error_is_raised_in_callee_frame() {
    let err = run_err("DEF f(a) THEN a\nf()");
    assert_eq!(err.message, "1 too few args passed into f");
    assert_eq!(err.context.as_ref().map(|c| c.name.as_str()), Some("f"));
    assert_eq!(err.span.start.line, 1);
}

#[test]
fn test_builtin_frames_appear_in_traceback() {
    let err = run_err("DEF f(x) THEN LEN(x)\nf(3)");
    assert_eq!(err.message, "Argument must be a List or String");
    let traceback = err.traceback();
    assert!(traceback.contains("in f\n"));
    assert!(traceback.ends_with("in LEN\n"));
}

#[test]
fn test_multi_line_span_underlines_each_line() {
    let err = run_err("(IF 1 THEN\n2\nEND) - \"a\"");
    assert_eq!(err.message, "Illegal operation: Number - String");
    let render = err.render();
    assert!(
        render.ends_with("(IF 1 THEN\n ^^^^^^^^^\n2\n^\nEND) - \"a\"\n^^^^^^^^^^"),
        "{render}"
    );
}

#[test]
fn test_span_line_numbers() {
    let err = run_err("\n\n\nnope");
    assert_eq!(err.span.line_number(), 4);
    assert_eq!(err.span.source_name(), "<test>");
}
