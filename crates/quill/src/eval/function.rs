//! Function definition and invocation

use std::rc::Rc;

use tracing::trace;

use super::control::ControlFlow;
use super::Evaluate;
use crate::ast::FuncDefNode;
use crate::context::Context;
use crate::environment::SymbolTable;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::{Function, Value};

impl Evaluate for FuncDefNode {
    fn eval(&self, _interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let function = Value::Function(Rc::new(Function {
            name: self.name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
            params: self.params.clone(),
            optional: self.optional.clone(),
            body: Rc::clone(&self.body),
            auto_return: self.auto_return,
            scope: Rc::clone(&ctx.symbol_table),
        }));

        if let Some(name) = &self.name {
            ctx.symbol_table.set(name.clone(), function.clone());
        }
        Ok(function)
    }
}

/// Arity mismatch message shared by functions and builtins.
pub(crate) fn arity_error(kind: &str, name: &str, min: usize, max: Option<usize>, got: usize) -> OpError {
    let expected = match max {
        Some(max) if max == min => format!("{} argument{}", min, if min == 1 { "" } else { "s" }),
        Some(max) => format!("{} to {} arguments", min, max),
        None => format!("at least {} argument{}", min, if min == 1 { "" } else { "s" }),
    };
    OpError::type_error(format!("{} '{}' expected {}, got {}.", kind, name, expected, got))
}

/// Call a user-defined function.
///
/// `args` holds one slot per positional argument; `None` marks a `default`
/// placeholder. A bound receiver is passed as the first argument.
pub fn call_function(
    interp: &mut Interpreter,
    function: &Rc<Function>,
    mut args: Vec<Option<Value>>,
    receiver: Option<Value>,
    caller: &Rc<Context>,
    span: &Span,
) -> Result<Value, EvalError> {
    if let Some(receiver) = receiver {
        args.insert(0, Some(receiver));
    }

    let (min, max) = function.arity();
    if args.len() < min || args.len() > max {
        return Err(arity_error("function", &function.name, min, Some(max), args.len())
            .at(span, caller)
            .into());
    }

    trace!(function = %function.name, args = args.len(), "call");

    let mut guard = interp.enter_call(span, caller)?;
    let table = Rc::new(SymbolTable::with_parent(Rc::clone(&function.scope)));
    let call_ctx = Context::child(function.name.clone(), caller, span.start.clone(), table);

    let mut args = args.into_iter();

    for param in &function.params {
        match args.next().flatten() {
            Some(value) => call_ctx.symbol_table.set(param.clone(), value),
            None => {
                return Err(OpError::type_error(format!(
                    "function '{}' has no default for required parameter '{}'.",
                    function.name, param
                ))
                .at(span, caller)
                .into())
            }
        }
    }

    for (param, default) in &function.optional {
        let value = match args.next().flatten() {
            Some(value) => value,
            None => default.eval(&mut guard, &call_ctx)?,
        };
        call_ctx.symbol_table.set(param.clone(), value);
    }

    match function.body.eval(&mut guard, &call_ctx) {
        Ok(value) if function.auto_return => Ok(value),
        Ok(_) => Ok(Value::None),
        Err(EvalError::ControlFlow(ControlFlow::Return { value, .. })) => Ok(value),
        Err(EvalError::ControlFlow(cf)) => Err(cf.at_boundary(&call_ctx)),
        Err(e) => Err(e),
    }
}
