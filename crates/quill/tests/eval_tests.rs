use pretty_assertions::assert_eq;
use quill::*;

fn run(src: &str) -> Value {
    Interpreter::default().run("test.ql", src).unwrap()
}

fn run_output(src: &str) -> String {
    let out = SharedOutput::new();
    let mut interp = Interpreter::default().with_output(out.clone());
    interp.run("test.ql", src).unwrap();
    out.contents()
}

fn run_err(src: &str) -> RuntimeError {
    match Interpreter::default().run("test.ql", src) {
        Err(QuillError::Runtime(e)) => e,
        Err(other) => panic!("expected a runtime error, got {}", other),
        Ok(value) => panic!("expected a runtime error, got {:?}", value),
    }
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().map(|n| Value::Int(*n)).collect())
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic() {
    assert_eq!(run("1 + 2 * 3"), Value::Int(7));
    assert_eq!(run("7 / 2"), Value::Float(3.5));
    assert_eq!(run("7 // 2"), Value::Int(3));
    assert_eq!(run("-7 % 3"), Value::Int(2));
    assert_eq!(run("2 ^ 10"), Value::Int(1024));
    assert_eq!(run("1 + 0.5"), Value::Float(1.5));
}

#[test]
fn test_exponent_suffix() {
    assert_eq!(run("2e3"), Value::Int(2000));
    assert_eq!(run("2.5e2"), Value::Float(250.0));
    assert!(matches!(run("1e-2"), Value::Float(x) if (x - 0.01).abs() < 1e-12));
}

#[test]
fn test_division_by_zero_is_an_error_value() {
    let e = run_err("1 / 0");
    assert_eq!(e.kind, RuntimeErrorKind::Arithmetic);
}

#[test]
fn test_overflow_is_reported() {
    let e = run_err("9223372036854775807 + 1");
    assert_eq!(e.kind, RuntimeErrorKind::Overflow);
}

#[test]
fn test_bitwise_and_logic() {
    assert_eq!(run("6 & 3"), Value::Int(2));
    assert_eq!(run("6 | 3"), Value::Int(7));
    assert_eq!(run("6 ^^ 3"), Value::Int(5));
    assert_eq!(run("~0"), Value::Int(-1));
    assert_eq!(run("1 and 0"), Value::Int(0));
    assert_eq!(run("0 or 'x'"), Value::Int(1));
    assert_eq!(run("not 0"), Value::Int(1));
}

#[test]
fn test_short_circuit_skips_right_side() {
    assert_eq!(run("0 and undefined_name"), Value::Int(0));
    assert_eq!(run("1 or undefined_name"), Value::Int(1));
}

// ═══════════════════════════════════════════════════════════════════════
// Comparisons and fallback
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_chained_comparison() {
    assert_eq!(run("1 < 2 < 3"), Value::Int(1));
    assert_eq!(run("1 < 3 < 2"), Value::Int(0));
    assert_eq!(run("'a' < 'b'"), Value::Int(1));
    assert_eq!(run("1 == 1.0"), Value::Int(1));
    assert_eq!(run("1 == 'a'"), Value::Int(0));
}

#[test]
fn test_chained_comparison_stops_at_first_false() {
    assert_eq!(run("2 < 1 < undefined_name"), Value::Int(0));
}

#[test]
fn test_ordering_mismatched_types() {
    let e = run_err("1 < 'a'");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
}

#[test]
fn test_fallback_chain() {
    assert_eq!(run("None ? None ? 3"), Value::Int(3));
    assert_eq!(run("0 ? 5"), Value::Int(0));
    assert_eq!(run("None ? None"), Value::None);
}

// ═══════════════════════════════════════════════════════════════════════
// Strings and lists
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_strings() {
    assert_eq!(run("'ab' + 'cd'"), Value::string("abcd"));
    assert_eq!(run("'ab' * 3"), Value::string("ababab"));
    assert_eq!(run("'hello'(1)"), Value::string("e"));
    assert_eq!(run("len('hello')"), Value::Int(5));
}

#[test]
fn test_list_operators() {
    assert_eq!(run("[1, 2] + 3"), ints(&[1, 2, 3]));
    assert_eq!(run("[1, 2] * [3]"), ints(&[1, 2, 3]));
    assert_eq!(run("[1, 2] * 2"), ints(&[1, 2, 1, 2]));
    assert_eq!(run("[1, 2, 3] - 1"), ints(&[1, 3]));
    assert_eq!(run("[1, 2, 3](-1)"), Value::Int(3));
}

#[test]
fn test_list_index_out_of_range() {
    let e = run_err("[1, 2](5)");
    assert_eq!(e.kind, RuntimeErrorKind::Index);
}

#[test]
fn test_list_builtins_mutate_shared_handle() {
    let src = "var a = [3, 1, 2]\n\
               var b = a\n\
               append(b, 0)\n\
               sort(a)\n\
               b";
    assert_eq!(run(src), ints(&[0, 1, 2, 3]));
}

#[test]
fn test_list_builtins() {
    assert_eq!(run("var a = [1, 2, 3]\npop(a)"), Value::Int(3));
    assert_eq!(run("var a = [1, 2, 3]\npop(a, 0)\na"), ints(&[2, 3]));
    assert_eq!(run("var a = [1, 3]\ninsert(a, 1, 2)\na"), ints(&[1, 2, 3]));
    assert_eq!(run("var a = [1]\nextend(a, a)\na"), ints(&[1, 1]));
    assert_eq!(run("var a = [1, 2]\nreverse(a)\na"), ints(&[2, 1]));
}

#[test]
fn test_pop_index_out_of_range() {
    assert_eq!(run("var a = [1, 2, 3]\npop(a, -3)"), Value::Int(1));

    let e = run_err("var a = [1]\npop(a, 5)");
    assert_eq!(e.kind, RuntimeErrorKind::Index);
    assert_eq!(e.details, "pop index 5 is out of range.");
    assert_eq!((e.pos_start.column, e.pos_end.column), (7, 8));
}

#[test]
fn test_sort_rejects_mixed_lists() {
    let e = run_err("sort([1, 'a'])");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(e.details, "sort() requires a list of only numbers or only strings.");
}

#[test]
fn test_conversions() {
    assert_eq!(run("int('42')"), Value::Int(42));
    assert_eq!(run("int(3.9)"), Value::Int(3));
    assert_eq!(run("float(2)"), Value::Float(2.0));
    assert_eq!(run("str(12) + '!'"), Value::string("12!"));
    assert_eq!(run("type([])"), Value::string("list"));
}

#[test]
fn test_builtin_argument_type_error() {
    let e = run_err("append(1, 2)");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(
        e.details,
        "first argument of built-in function 'append' must be a list, not int."
    );
}

#[test]
fn test_builtin_argument_error_points_at_argument() {
    let e = run_err("var l = 5\nappend(l, 1)");
    assert_eq!(e.pos_start.display_line(), 2);
    assert_eq!((e.pos_start.column, e.pos_end.column), (7, 8));
    assert_eq!(
        e.render(),
        "Traceback (most recent call last):\n\
         \x20 In file test.ql, line 2, in <program>:\n\
         \tappend(l, 1)\n\
         \t       ^\n\
         TypeError: first argument of built-in function 'append' must be a list, not int."
    );

    let e = run_err("insert([], 'x' + 'y', 0)");
    assert_eq!((e.pos_start.column, e.pos_end.column), (11, 20));
}

// ═══════════════════════════════════════════════════════════════════════
// Assignment
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_assignment_and_compound_operators() {
    assert_eq!(run("var x = 5\nvar x += 2\nvar x *= 3\nx"), Value::Int(21));
}

#[test]
fn test_compound_assignment_requires_binding() {
    let e = run_err("var missing += 1");
    assert_eq!(e.kind, RuntimeErrorKind::NotDefined);
}

#[test]
fn test_multi_target_assignment() {
    assert_eq!(run("var a, b = 1, 2\n[b, a]"), ints(&[2, 1]));
    assert_eq!(run("var a, b = 1, 2"), ints(&[1, 2]));
}

#[test]
fn test_multi_target_count_mismatch() {
    let e = run_err("var a, b = 1, 2, 3");
    assert_eq!(e.kind, RuntimeErrorKind::RunTime);
    assert_eq!(e.details, "cannot assign 3 values to 2 targets.");
}

#[test]
fn test_delete() {
    let e = run_err("var x = 1\ndel x\nx");
    assert_eq!(e.kind, RuntimeErrorKind::NotDefined);

    let e = run_err("del nothing");
    assert_eq!(e.kind, RuntimeErrorKind::NotDefined);
}

// ═══════════════════════════════════════════════════════════════════════
// Conditionals and statements
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_inline_if_value() {
    assert_eq!(run("if 0 then 1 elif 1 then 2 else 3"), Value::Int(2));
    assert_eq!(run("if 0 then 1"), Value::None);
}

#[test]
fn test_block_if_is_none_and_shares_scope() {
    let src = "if 1 then\n  var inside = 7\nend";
    assert_eq!(run(src), Value::None);
    assert_eq!(run(&format!("{}\ninside", src)), Value::Int(7));
}

#[test]
fn test_statement_sequence_value() {
    assert_eq!(run("1\n2\n3"), Value::Int(3));
    assert_eq!(run(""), Value::None);
}

#[test]
fn test_assert() {
    assert_eq!(run("assert 1"), Value::None);

    let e = run_err("assert 1 == 2, 'numbers differ'");
    assert_eq!(e.kind, RuntimeErrorKind::Assertion);
    assert_eq!(e.details, "numbers differ");

    let e = run_err("assert 0");
    assert_eq!(e.details, "assertion failed.");
}

// ═══════════════════════════════════════════════════════════════════════
// Output
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_print() {
    assert_eq!(run_output("print('a', 1, [2, 'b'])"), "a 1 [2, \"b\"]\n");
    assert_eq!(run_output("print()"), "\n");
}

#[test]
fn test_debug_print() {
    assert_eq!(run_output("var name = 'x'\n$name"), "name = \"x\"\n");
}

#[test]
fn test_input_reads_a_line() {
    let out = SharedOutput::new();
    let mut interp = Interpreter::default()
        .with_output(out.clone())
        .with_input(std::io::Cursor::new("Ada\n"));
    let value = interp.run("test.ql", "input('name? ')").unwrap();
    assert_eq!(value, Value::string("Ada"));
    assert_eq!(out.contents(), "name? ");
}

#[test]
fn test_defined_sees_caller_names() {
    assert_eq!(run("var here = 1\ndefined('here')"), Value::Int(1));
    assert_eq!(run("defined('nowhere')"), Value::Int(0));
    assert_eq!(run("def f()\n  var local = 1\n  return defined('local')\nend\nf()"), Value::Int(1));
}

#[test]
fn test_default_outside_call_is_none() {
    assert_eq!(run("var d = default\nd"), Value::None);
}
