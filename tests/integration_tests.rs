// tests/integration_tests.rs

use chp_lang::{Engine, EngineOptions, Error, ErrorKind, MemoryHost, Value};

fn engine() -> Engine<MemoryHost> {
    Engine::with_host(MemoryHost::new(), EngineOptions::default())
}

fn run(code: &str) -> Value {
    engine()
        .run("<test>", code)
        .unwrap_or_else(|e| panic!("{}", e.render()))
}

/// Value of the last statement of `code`.
fn last(code: &str) -> Value {
    let program = run(code);
    program
        .as_list()
        .and_then(|values| values.last().cloned())
        .unwrap_or_else(|| panic!("Expected a statement list, got {program}"))
}

fn number(code: &str) -> f64 {
    let value = last(code);
    value
        .as_number()
        .unwrap_or_else(|| panic!("Expected a Number, got {value}"))
}

fn run_err(code: &str) -> Error {
    match engine().run("<test>", code) {
        Ok(value) => panic!("Expected an error, got {value}"),
        Err(e) => e,
    }
}

fn runtime_message(code: &str) -> String {
    let err = run_err(code);
    assert_eq!(err.kind, ErrorKind::Runtime, "code: {code}");
    err.message
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_number_arithmetic() {
    let test_cases = vec![
        ("1 + 2 * 3", 7.0),
        ("(1 + 2) * 3", 9.0),
        ("7 / 2", 3.5),
        ("10 MOD 3", 1.0),
        ("-7 % 3", 2.0),
        ("7 % -3", -2.0),
        ("2 ^ 10", 1024.0),
        ("2 ^ -1", 0.5),
        ("-2 ^ 2", -4.0),
        ("2 # 9", 3.0),
        ("+5", 5.0),
        ("--5", 5.0),
    ];

    for (code, expected) in test_cases {
        assert_eq!(number(code), expected, "code: {code}");
    }
}

#[test]
fn test_root_is_power_of_reciprocal() {
    assert_eq!(number("2 # 8"), 8f64.powf(0.5));
}

#[test]
fn test_arithmetic_errors() {
    let test_cases = vec![
        ("1 / 0", "Division by zero"),
        ("1 % 0", "Division by zero"),
        ("0 ^ 0", "Indeterminate result"),
        ("0 ^ -1", "Division by zero"),
        ("(0 - 8) ^ 0.5", "Result is not a real number"),
        ("0 # 4", "Division by zero"),
    ];

    for (code, expected) in test_cases {
        assert_eq!(runtime_message(code), expected, "code: {code}");
    }
}

#[test]
fn test_division_by_zero_points_at_divisor() {
    let err = run_err("10 / 0");
    assert_eq!((err.span.start.col, err.span.end.col), (5, 6));
}

#[test]
fn test_illegal_operations_point_at_whole_expression() {
    let err = run_err("\"a\" - 1");
    assert_eq!(err.message, "Illegal operation: String - Number");
    assert_eq!((err.span.start.col, err.span.end.col), (0, 7));
}

// ============================================================================
// Strings and Lists
// ============================================================================

#[test]
fn test_string_operators() {
    assert_eq!(last("\"ab\" + \"cd\"").as_str(), Some("abcd"));
    assert_eq!(last("\"ab\" * 3").as_str(), Some("ababab"));
    assert_eq!(last("\"hello\" / 1").as_str(), Some("e"));
    assert_eq!(last("\"hello\" / -1").as_str(), Some("o"));
    assert_eq!(number("\"a\" == \"a\""), 1.0);
    assert_eq!(number("\"a\" != \"b\""), 1.0);
}

#[test]
fn test_list_operators() {
    let test_cases = vec![
        ("[1, 2] + 3", "[1, 2, 3]"),
        ("[1] + \"x\"", "[1, \"x\"]"),
        ("[1] + [2, 3]", "[1, 2, 3]"),
        ("[1, 2, 3] - 0", "[2, 3]"),
        ("[1, 2, 3] - -1", "[1, 2]"),
        ("[1, 2] * 2", "[1, 2, 1, 2]"),
        ("[1, 2, 3] / -1", "3"),
        ("[[1, 2], 3] / 0", "[1, 2]"),
    ];

    for (code, expected) in test_cases {
        assert_eq!(last(code).to_string(), expected, "code: {code}");
    }
}

#[test]
fn test_list_operators_copy() {
    let value = last("VAR a = [1, 2, 3]\nVAR b = a - 0\nVAR c = a + 4\na");
    assert_eq!(value.to_string(), "[1, 2, 3]");
}

#[test]
fn test_index_errors() {
    assert_eq!(runtime_message("[1, 2, 3] - 5"), "Index 5 is out of bounds");
    assert_eq!(runtime_message("[1, 2, 3] / -4"), "Index -4 is out of bounds");
    assert_eq!(runtime_message("\"abc\" / 1.5"), "Index 1.5 is not a whole number");
    assert_eq!(runtime_message("[] / 0"), "Index 0 is out of bounds");
}

#[test]
fn test_repeat_counts_are_bounded() {
    let err = run_err("\"ab\" * 100000000000000000000000");
    assert!(err.message.starts_with("Cannot repeat "), "{}", err.message);
    assert_eq!((err.span.start.col, err.span.end.col), (7, 31));

    let err = run_err("[1, 2] * 10000000000000000000");
    assert!(err.message.starts_with("Cannot repeat "), "{}", err.message);

    assert_eq!(number("LEN(\"ab\" * 524288)"), 1048576.0);
    assert_eq!(runtime_message("\"ab\" * 524289"), "Cannot repeat 524289 times");
    assert_eq!(runtime_message("[0] * 2000000"), "Cannot repeat 2000000 times");
    assert_eq!(runtime_message("\"ab\" * -1"), "Cannot repeat -1 times");
}

#[test]
fn test_repeating_empty_values() {
    assert_eq!(last("\"\" * 100000000000000000000000").as_str(), Some(""));
    assert_eq!(last("[] * 100000000000000000000000").to_string(), "[]");
}

#[test]
fn test_list_add_function_is_illegal() {
    assert_eq!(
        runtime_message("[1] + PRINT"),
        "Illegal operation: List + BuiltInFunction"
    );
}

// ============================================================================
// Comparison and Logic
// ============================================================================

#[test]
fn test_comparisons_and_logic() {
    let test_cases = vec![
        ("1 == 1", 1.0),
        ("2 < 1", 0.0),
        ("2 >= 2", 1.0),
        ("1 <= 0", 0.0),
        ("3 > 2", 1.0),
        ("1 AND 0", 0.0),
        ("0 OR 3", 1.0),
        ("NOT 0", 1.0),
        ("NOT 5", 0.0),
        ("NOT \"\"", 1.0),
        ("NOT [1]", 0.0),
        ("TRUE AND NOT FALSE", 1.0),
    ];

    for (code, expected) in test_cases {
        assert_eq!(number(code), expected, "code: {code}");
    }
}

#[test]
fn test_comparison_type_errors() {
    assert_eq!(
        runtime_message("[1] == [1]"),
        "Illegal operation: List == List"
    );
    assert_eq!(
        runtime_message("1 < \"a\""),
        "Illegal operation: Number < String"
    );
    assert_eq!(
        runtime_message("NOT PRINT"),
        "Illegal operation: NOT BuiltInFunction"
    );
}

// ============================================================================
// Programs and Variables
// ============================================================================

#[test]
fn test_program_value_is_statement_list() {
    assert_eq!(run("1\n2; 3").to_string(), "[1, 2, 3]");
    assert_eq!(run("VAR y = 3").to_string(), "[3]");
}

#[test]
fn test_empty_programs() {
    for code in ["", "\n\n", "@ only a comment @", ";;"] {
        let value = run(code);
        assert_eq!(value.as_list().map(<[Value]>::len), Some(0), "code: {code:?}");
    }
}

#[test]
fn test_constants() {
    assert_eq!(run("TRUE; FALSE; NULL").to_string(), "[1, 0, 0]");
    assert_eq!(number("pi"), 3.14159);
    assert_eq!(number("e"), 2.71828);
}

#[test]
fn test_assignment() {
    assert_eq!(number("VAR x = 5\nx = x + 1\nx"), 6.0);
    assert_eq!(number("VAR a = VAR b = 2\na + b"), 4.0);
}

#[test]
fn test_undefined_variable() {
    let err = run_err("VAR a = 1\na + missing");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert_eq!(err.message, "'missing' is not defined");
    assert_eq!(err.span.start.line, 1);
    assert_eq!((err.span.start.col, err.span.end.col), (4, 11));
}

#[test]
fn test_globals_persist_between_runs() {
    let mut engine = engine();
    engine.run("<one>", "VAR counter = 1").unwrap();
    engine.run("<two>", "counter = counter + 1").unwrap();
    let value = engine.run("<three>", "counter").unwrap();
    assert_eq!(value.to_string(), "[2]");
}

#[test]
fn test_top_level_return() {
    assert_eq!(run("1\nRETURN 7\n2").as_number(), Some(7.0));
    assert_eq!(run("RETURN").as_number(), Some(0.0));
}

#[test]
fn test_errors_abort_the_whole_run() {
    let mut engine = engine();
    let err = engine.run("<test>", "PRINT(1)\nVAR x = 1 / 0\nPRINT(2)");
    assert!(err.is_err());
    assert_eq!(engine.host().output, vec!["1".to_string()]);
    assert!(engine.globals().get("x").is_none());
}

// ============================================================================
// IF
// ============================================================================

#[test]
fn test_inline_if() {
    assert_eq!(number("IF TRUE THEN 5"), 5.0);
    assert_eq!(number("IF 0 THEN 5"), 0.0);
    assert_eq!(number("IF 0 THEN 1 ELIF 1 THEN 2 ELSE 3"), 2.0);
    assert_eq!(number("IF 0 THEN 1 ELIF 0 THEN 2 ELSE 3"), 3.0);
    assert_eq!(last("IF \"\" THEN 1 ELSE \"empty\"").as_str(), Some("empty"));
}

#[test]
fn test_block_if_is_null_but_runs() {
    let mut engine = engine();
    let value = engine
        .run("<test>", "IF TRUE THEN\nPRINT(\"yes\")\n5\nEND")
        .unwrap();
    assert_eq!(value.to_string(), "[0]");
    assert_eq!(engine.host().output, vec!["yes".to_string()]);
}

#[test]
fn test_block_if_else() {
    let mut engine = engine();
    engine
        .run(
            "<test>",
            "VAR n = 4\nIF n < 3 THEN\nPRINT(\"small\")\nELIF n < 10 THEN\nPRINT(\"medium\")\nELSE\nPRINT(\"big\")\nEND",
        )
        .unwrap();
    assert_eq!(engine.host().output, vec!["medium".to_string()]);
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn test_inline_for_collects() {
    assert_eq!(last("FOR i = 0 THEN 5 THEN i").to_string(), "[0, 1, 2, 3, 4]");
    assert_eq!(
        last("FOR i = 0 THEN 5 THEN i = i + 1").to_string(),
        "[1, 2, 3, 4, 5]"
    );
    assert_eq!(
        last("FOR i = 10 THEN 0 THEN STEP -3 THEN i").to_string(),
        "[10, 7, 4, 1]"
    );
    assert_eq!(last("FOR i = 5 THEN 0 THEN i").to_string(), "[]");
}

#[test]
fn test_block_for_is_null_with_side_effects() {
    let program = run("VAR t = 0\nFOR i = 0 THEN 4 THEN\nt = t + i\nEND\nt");
    assert_eq!(program.to_string(), "[0, 0, 6]");
}

#[test]
fn test_for_variable_stays_in_scope() {
    assert_eq!(number("FOR i = 0 THEN 3 THEN i\ni"), 2.0);
}

#[test]
fn test_for_bounds_must_be_numbers() {
    assert_eq!(
        runtime_message("FOR i = \"a\" THEN 3 THEN i"),
        "Loop start must be a Number"
    );
    assert_eq!(
        runtime_message("FOR i = 0 THEN [] THEN i"),
        "Loop end must be a Number"
    );
}

#[test]
fn test_while() {
    assert_eq!(
        last("VAR n = 0\nWHILE n < 3 THEN n = n + 1").to_string(),
        "[1, 2, 3]"
    );
    assert_eq!(
        run("VAR n = 3\nWHILE n > 0 THEN\nn = n - 1\nEND\nn").to_string(),
        "[3, 0, 0]"
    );
}

#[test]
fn test_break_and_continue() {
    let mut engine = engine();
    engine
        .run(
            "<test>",
            "FOR i = 0 THEN 10 THEN\nIF i == 3 THEN BREAK\nPRINT(i)\nEND",
        )
        .unwrap();
    assert_eq!(engine.host().output, vec!["0", "1", "2"]);

    assert_eq!(
        last("FOR i = 0 THEN 5 THEN IF i == 2 THEN CONTINUE ELSE i").to_string(),
        "[0, 1, 3, 4]"
    );
    assert_eq!(
        last("VAR n = 0\nWHILE TRUE THEN IF n == 3 THEN BREAK ELSE n = n + 1").to_string(),
        "[1, 2, 3]"
    );
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_inline_function_returns_body() {
    assert_eq!(number("DEF f(x) THEN x * 2\nf(3)"), 6.0);
}

#[test]
fn test_block_function_needs_return() {
    assert_eq!(number("DEF g(x) THEN\nx * 2\nEND\ng(3)"), 0.0);
    assert_eq!(number("DEF h(x) THEN\nRETURN x * 2\nEND\nh(3)"), 6.0);
    assert_eq!(number("DEF k() THEN\nRETURN\nEND\nk()"), 0.0);
}

#[test]
fn test_return_exits_loops_inside_functions() {
    let code = "DEF first_over(limit) THEN\nFOR i = 0 THEN 100 THEN\nIF i * i > limit THEN RETURN i\nEND\nEND\nfirst_over(50)";
    assert_eq!(number(code), 8.0);
}

#[test]
fn test_anonymous_functions() {
    assert_eq!(number("VAR sq = DEF (x) THEN x ^ 2\nsq(5)"), 25.0);
    assert_eq!(number("(DEF (a, b) THEN a - b)(5, 2)"), 3.0);
    assert_eq!(last("DEF () THEN 1").to_string(), "<function <lambda>>");
}

#[test]
fn test_recursion() {
    let code = "DEF fact(n) THEN IF n <= 1 THEN 1 ELSE n * fact(n - 1)\nfact(5)";
    assert_eq!(number(code), 120.0);
}

#[test]
fn test_closures_capture_definition_scope() {
    let code = "DEF make(a) THEN DEF (b) THEN a + b\nVAR add2 = make(2)\nadd2(3)";
    assert_eq!(number(code), 5.0);
}

#[test]
fn test_functions_see_later_globals() {
    assert_eq!(number("DEF f() THEN later\nVAR later = 4\nf()"), 4.0);
}

#[test]
fn test_function_locals_do_not_leak() {
    assert_eq!(
        runtime_message("DEF f() THEN\nVAR local = 1\nEND\nf()\nlocal"),
        "'local' is not defined"
    );
}

#[test]
fn test_arity_errors() {
    assert_eq!(
        runtime_message("DEF f(a, b) THEN a\nf(1, 2, 3, 4)"),
        "2 too many args passed into f"
    );
    assert_eq!(
        runtime_message("DEF f(a, b) THEN a\nf(1)"),
        "1 too few args passed into f"
    );
    assert_eq!(runtime_message("PRINT()"), "1 too few args passed into PRINT");
    assert_eq!(runtime_message("DIR(1)"), "1 too many args passed into DIR");
}

#[test]
fn test_calling_a_non_function() {
    assert_eq!(
        runtime_message("VAR x = 1\nx()"),
        "Illegal operation: Number is not callable"
    );
}

#[test]
fn test_function_display() {
    assert_eq!(last("DEF f() THEN 1\nf").to_string(), "<function f>");
    assert_eq!(last("PRINT").to_string(), "<built-in function PRINT>");
}

#[test]
fn test_call_depth_is_limited() {
    let options = EngineOptions {
        max_call_depth: 20,
        ..EngineOptions::default()
    };
    let mut engine = Engine::with_host(MemoryHost::new(), options);
    let err = engine.run("<test>", "DEF r() THEN r()\nr()").unwrap_err();
    assert_eq!(err.message, "Maximum call depth exceeded");
}

#[test]
fn test_default_limits_stop_runaway_recursion() {
    let err = run_err("DEF r() THEN r()\nr()");
    assert_eq!(err.message, "Maximum call depth exceeded");

    let code = "DEF f(n) THEN\nIF n > 0 THEN RETURN f(n - 1)\nRETURN 0\nEND\nf(250)";
    let err = run_err(code);
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.starts_with("Maximum"), "{}", err.message);
}

#[test]
fn test_default_limits_allow_moderate_recursion() {
    let code = "DEF f(n) THEN\nIF n > 0 THEN RETURN f(n - 1) + 1\nRETURN 0\nEND\nf(30)";
    assert_eq!(number(code), 30.0);
    assert_eq!(
        number("DEF down(n) THEN IF n == 0 THEN 0 ELSE down(n - 1)\ndown(60)"),
        0.0
    );
}

#[test]
fn test_long_operator_chains_evaluate() {
    let code = format!("1{}", " + 1".repeat(100));
    assert_eq!(number(&code), 101.0);
}

#[test]
fn test_nesting_depth_is_limited() {
    let options = EngineOptions {
        max_nesting_depth: 8,
        ..EngineOptions::default()
    };
    let mut engine = Engine::with_host(MemoryHost::new(), options);
    assert!(engine.run("<test>", "[[1]]").is_ok());
    let err = engine.run("<test>", "[[[[[[[[[1]]]]]]]]]").unwrap_err();
    assert_eq!(err.message, "Maximum nesting depth exceeded");

    // The budget is released after an error.
    assert!(engine.run("<test>", "[[1]]").is_ok());
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_input_placeholder_in_batch_mode() {
    let mut engine = engine();
    let value = engine.run("<test>", "INPUT()").unwrap();
    assert_eq!(value.to_string(), "[\"INPUT\"]");
    assert!(engine.input_requested());
}

#[test]
fn test_input_reads_host_lines_when_interactive() {
    let options = EngineOptions {
        interactive: true,
        ..EngineOptions::default()
    };
    let mut engine = Engine::with_host(MemoryHost::with_input(["Ada"]), options);
    let value = engine
        .run("<test>", "VAR name = INPUT()\n\"Hi \" + name")
        .unwrap();
    assert_eq!(value.to_string(), "[\"Ada\", \"Hi Ada\"]");
    assert!(!engine.input_requested());

    let err = engine.run("<test>", "INPUT()").unwrap_err();
    assert!(err.message.starts_with("Failed to read input"));
}
