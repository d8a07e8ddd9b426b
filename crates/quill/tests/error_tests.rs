use pretty_assertions::assert_eq;
use quill::*;

fn run_err_with(interp: &mut Interpreter, src: &str) -> RuntimeError {
    match interp.run("test.ql", src) {
        Err(QuillError::Runtime(e)) => e,
        Err(other) => panic!("expected a runtime error, got {}", other),
        Ok(value) => panic!("expected a runtime error, got {:?}", value),
    }
}

fn run_err(src: &str) -> RuntimeError {
    run_err_with(&mut Interpreter::default(), src)
}

#[test]
fn test_render_single_frame() {
    let e = run_err("1 / 0");
    assert_eq!(
        e.render(),
        "Traceback (most recent call last):\n\
         \x20 In file test.ql, line 1, in <program>:\n\
         \t1 / 0\n\
         \t^^^^^\n\
         ArithmeticError: division by zero."
    );
}

#[test]
fn test_traceback_lists_call_frames() {
    let e = run_err("def inner() -> 1 / 0\ndef outer() -> inner()\nouter()");
    assert_eq!(
        e.traceback_lines(),
        vec![
            "  In file test.ql, line 3, in <program>:".to_string(),
            "  In file test.ql, line 2, in outer:".to_string(),
            "  In file test.ql, line 1, in inner:".to_string(),
        ]
    );
}

#[test]
fn test_traceback_collapses_repeated_frames() {
    let e = run_err("def f(n) -> if n == 0 then 1 / 0 else f(n - 1)\nf(9)");
    let rendered = e.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "Traceback (most recent call last):");
    assert_eq!(lines[1], "  In file test.ql, line 2, in <program>:");
    for line in &lines[2..7] {
        assert_eq!(*line, "  In file test.ql, line 1, in f:");
    }
    assert_eq!(lines[7], "  (repeated 5 more times)");
    assert!(rendered.ends_with("ArithmeticError: division by zero."));
}

#[test]
fn test_not_defined_suggests_close_name() {
    let e = run_err("var counter = 1\ncountr");
    assert_eq!(e.kind, RuntimeErrorKind::NotDefined);
    assert_eq!(e.details, "'countr' is not defined.\nDid you mean 'counter'?");
}

#[test]
fn test_not_defined_prefers_inner_scope() {
    let src = "var totl = 1\n\
               def f()\n\
                 var total = 2\n\
                 return tota\n\
               end\n\
               f()";
    let e = run_err(src);
    assert_eq!(e.details, "'tota' is not defined.\nDid you mean 'total'?");
}

#[test]
fn test_dunder_names_get_a_note() {
    let e = run_err("__init__");
    assert!(
        e.details.contains("only defined by the constructs that use them"),
        "{}",
        e.details
    );
}

#[test]
fn test_recursion_limit() {
    let mut interp = Interpreter::new(EvalConfig::with_max_call_depth(50));
    let e = run_err_with(&mut interp, "def f(n) -> f(n + 1)\nf(0)");
    assert_eq!(e.kind, RuntimeErrorKind::Recursion);
    assert_eq!(e.details, "maximum recursion depth exceeded");
    assert_eq!(interp.call_depth(), 0);

    // The session is still usable afterwards
    assert_eq!(interp.run("test.ql", "1 + 1").unwrap(), Value::Int(2));
}

#[test]
fn test_error_leaves_earlier_bindings() {
    let mut interp = Interpreter::default();
    run_err_with(&mut interp, "var kept = 5\n1 / 0\nvar lost = 1");
    assert_eq!(interp.run("test.ql", "kept").unwrap(), Value::Int(5));
    assert!(interp.run("test.ql", "lost").is_err());
}

#[test]
fn test_type_error_message() {
    let e = run_err("1 + 'a'");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(e.details, "unsupported operand type(s) for +: 'int' and 'str'.");
}

#[test]
fn test_lex_error_is_reported() {
    let result = Interpreter::default().run("test.ql", "var x = 1\n!x");
    match result {
        Err(QuillError::Lex(e)) => {
            assert_eq!(e.kind, LexErrorKind::IllegalCharacter);
            assert!(e.render().starts_with("In file test.ql, line 2:\n"));
        }
        other => panic!("expected a lex error, got {:?}", other.map(|v| v.repr())),
    }
}

#[test]
fn test_syntax_error_is_reported() {
    let result = Interpreter::default().run("test.ql", "if 1 then");
    assert!(matches!(result, Err(QuillError::Syntax(_))));
}
