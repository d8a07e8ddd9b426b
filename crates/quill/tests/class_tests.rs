use pretty_assertions::assert_eq;
use quill::*;

fn run(src: &str) -> Value {
    Interpreter::default().run("test.ql", src).unwrap()
}

fn run_err(src: &str) -> RuntimeError {
    match Interpreter::default().run("test.ql", src) {
        Err(QuillError::Runtime(e)) => e,
        Err(other) => panic!("expected a runtime error, got {}", other),
        Ok(value) => panic!("expected a runtime error, got {:?}", value),
    }
}

const POINT: &str = "class Point\n\
                       def __init__(self, x, y)\n\
                         var self.x = x\n\
                         var self.y = y\n\
                       end\n\
                       def sum(self) -> self.x + self.y\n\
                     end\n";

#[test]
fn test_initializer_sets_attributes() {
    let src = format!("{}var p = Point(3, 4)\np.x + p.y", POINT);
    assert_eq!(run(&src), Value::Int(7));
}

#[test]
fn test_method_receives_object() {
    let src = format!("{}Point(1, 2).sum()", POINT);
    assert_eq!(run(&src), Value::Int(3));
}

#[test]
fn test_initializer_arity() {
    let e = run_err(&format!("{}Point(1)", POINT));
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(e.details, "function '__init__' expected 3 arguments, got 2.");
}

#[test]
fn test_class_without_initializer_takes_no_arguments() {
    let e = run_err("class A -> var x = 1\nA(5)");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(e.details, "class 'A' takes no arguments, got 1.");
}

#[test]
fn test_inheritance_overrides_and_inherits() {
    let src = "class A\n\
                 var f = 1\n\
                 def m(self) -> self.f\n\
               end\n\
               class B(A)\n\
                 var f = 2\n\
               end\n\
               var b = B()\n\
               [b.f, b.m()]";
    assert_eq!(run(src), Value::list(vec![Value::Int(2), Value::Int(2)]));
}

#[test]
fn test_parent_must_be_a_class() {
    let e = run_err("var A = 1\nclass B(A) -> var x = 1");
    assert_eq!(e.kind, RuntimeErrorKind::Type);
    assert_eq!(e.details, "class 'B' cannot inherit from 'int' object.");
}

#[test]
fn test_objects_are_shared_references() {
    let src = "class Counter\n\
                 var n = 0\n\
                 def bump(self) -> var self.n += 1\n\
               end\n\
               var c = Counter()\n\
               var d = c\n\
               d.bump()\n\
               d.bump()\n\
               c.n";
    assert_eq!(run(src), Value::Int(2));
}

#[test]
fn test_instances_do_not_share_attributes() {
    let src = "class Box -> var v = 0\n\
               var a = Box()\n\
               var b = Box()\n\
               var a.v = 5\n\
               b.v";
    assert_eq!(run(src), Value::Int(0));
}

#[test]
fn test_missing_attribute() {
    let e = run_err("class A -> var x = 1\nvar a = A()\na.y");
    assert_eq!(e.kind, RuntimeErrorKind::Attribute);
    assert_eq!(e.details, "'A' object has no attribute 'y'.");
}

#[test]
fn test_attribute_on_plain_value() {
    let e = run_err("var n = 1\nn.x");
    assert_eq!(e.kind, RuntimeErrorKind::Attribute);
    assert_eq!(e.details, "'int' object has no attribute 'x'.");
}

#[test]
fn test_attribute_chain_with_calls() {
    let src = "class Node\n\
                 def __init__(self, value)\n\
                   var self.value = value\n\
                 end\n\
                 def wrap(self, value) -> Node(value)\n\
               end\n\
               Node(1).wrap(2).wrap(3).value";
    assert_eq!(run(src), Value::Int(3));
}

#[test]
fn test_type_of_object_is_class_name() {
    assert_eq!(run("class A -> var x = 1\ntype(A())"), Value::string("A"));
}

#[test]
fn test_assign_through_call_result() {
    let src = format!(
        "{}var p = Point(1, 2)\n\
         def pick() -> p\n\
         var pick().x = 10\n\
         p.sum()",
        POINT
    );
    assert_eq!(run(&src), Value::Int(12));
}

#[test]
fn test_assign_through_method_chain() {
    let src = format!(
        "{}class Holder\n\
           def __init__(self, inner)\n\
             var self.inner = inner\n\
           end\n\
           def get(self) -> self.inner\n\
         end\n\
         var h = Holder(Point(1, 2))\n\
         var h.get().y += 5\n\
         h.inner.y",
        POINT
    );
    assert_eq!(run(&src), Value::Int(7));
}
