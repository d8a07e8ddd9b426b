//! Callable value types: functions, bound methods, and builtins

use std::rc::Rc;

use super::{Object, Value};
use crate::ast::Node;
use crate::context::Context;
use crate::environment::SymbolTable;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;

/// Type alias for builtin function pointers.
///
/// The argument vector is already bound: one slot per declared parameter
/// (required, then optional with defaults filled in), plus a trailing list
/// of extra arguments for non-strict builtins.
pub type BuiltinFnPtr = fn(&mut BuiltinCall<'_>, Vec<Value>) -> Result<Value, EvalError>;

/// A user-defined function.
///
/// Stores the body AST and the symbol table it was defined in; calls chain
/// their fresh table to `scope`, giving lexical scoping.
pub struct Function {
    /// Function name, `<anonymous>` for unnamed definitions
    pub name: String,

    /// Required parameter names
    pub params: Vec<String>,

    /// Optional parameters with their default expressions
    pub optional: Vec<(String, Rc<Node>)>,

    /// The function body
    pub body: Rc<Node>,

    /// Whether the body's value is the result (`->` form)
    pub auto_return: bool,

    /// Defining scope, captured at definition time
    pub scope: Rc<SymbolTable>,
}

impl Function {
    /// Smallest and largest accepted argument counts.
    pub fn arity(&self) -> (usize, usize) {
        (self.params.len(), self.params.len() + self.optional.len())
    }
}

/// A function bound to the object it was read from.
pub struct Method {
    /// The underlying function; its first parameter receives the object
    pub function: Rc<Function>,

    /// The bound receiver
    pub receiver: Rc<Object>,
}

/// Which frame a builtin runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    /// A fresh frame named after the builtin
    Own,
    /// The caller's frame (for builtins that inspect the caller's names)
    Caller,
}

/// A built-in native function.
///
/// Builtins are plain data: the evaluator binds arguments from the
/// declared parameter lists, so no reflection is needed at call time.
pub struct BuiltinFunction {
    /// Function name (for display and error messages)
    pub name: &'static str,

    /// Required parameter names
    pub params: &'static [&'static str],

    /// Optional parameters with their default values
    pub optional: Vec<(&'static str, Value)>,

    /// Reject extra arguments; non-strict builtins collect them into a list
    pub strict_arity: bool,

    /// Frame the builtin executes in
    pub context_mode: ContextMode,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFunction {
    /// A strict builtin with only required parameters, running in its own frame.
    pub fn new(name: &'static str, params: &'static [&'static str], func: BuiltinFnPtr) -> Self {
        Self {
            name,
            params,
            optional: Vec::new(),
            strict_arity: true,
            context_mode: ContextMode::Own,
            func,
        }
    }

    /// Add an optional parameter.
    pub fn with_optional(mut self, name: &'static str, default: Value) -> Self {
        self.optional.push((name, default));
        self
    }

    /// Accept any number of extra arguments.
    pub fn variadic(mut self) -> Self {
        self.strict_arity = false;
        self
    }

    /// Run in the caller's frame.
    pub fn in_caller_context(mut self) -> Self {
        self.context_mode = ContextMode::Caller;
        self
    }

    /// Wrap into a [`Value`].
    pub fn into_value(self) -> Value {
        Value::Builtin(Rc::new(self))
    }
}

/// Execution metadata handed to a builtin.
pub struct BuiltinCall<'a> {
    /// The running interpreter (for I/O and nested calls)
    pub interpreter: &'a mut Interpreter,

    /// Frame the builtin executes in
    pub context: &'a Rc<Context>,

    /// Frame the call expression was evaluated in
    pub caller: &'a Rc<Context>,

    /// Span of the call expression
    pub span: &'a Span,

    /// Span of each argument expression, in call order
    pub arg_spans: &'a [Span],
}

impl BuiltinCall<'_> {
    /// Attach the call site to an operation error.
    pub fn error(&self, error: OpError) -> EvalError {
        error.at(self.span, self.context).into()
    }

    /// Attach an argument's location to an operation error.
    ///
    /// `ordinal` counts from 1. Arguments without a known span fall back to
    /// the call site.
    pub fn arg_error(&self, ordinal: usize, error: OpError) -> EvalError {
        match ordinal.checked_sub(1).and_then(|i| self.arg_spans.get(i)) {
            Some(span) => error.at(span, self.caller).into(),
            None => self.error(error),
        }
    }

    /// Lift a value operation into the builtin's result channel.
    pub fn check<T>(&self, result: Result<T, OpError>) -> Result<T, EvalError> {
        result.map_err(|e| self.error(e))
    }
}
