//! Call expression evaluation and dispatch on the callee's value

use std::rc::Rc;

use tracing::trace;

use super::class::instantiate;
use super::function::{arity_error, call_function};
use super::{AtSpan, Evaluate};
use crate::ast::{CallNode, Node};
use crate::context::Context;
use crate::environment::SymbolTable;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::{BuiltinCall, BuiltinFunction, ContextMode, Value};

impl Evaluate for CallNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let callee = self.callee.eval(interp, ctx)?;

        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                Node::Default(_) => args.push(None),
                other => args.push(Some(other.eval(interp, ctx)?)),
            }
        }

        let arg_spans: Vec<Span> = self.args.iter().map(|arg| arg.span().clone()).collect();
        call_value(interp, callee, args, ctx, &self.span, &arg_spans)
    }
}

/// Call any callable value.
///
/// A `None` argument is a `default` placeholder. `arg_spans` locates each
/// argument expression and may be shorter than `args`.
pub fn call_value(
    interp: &mut Interpreter,
    callee: Value,
    args: Vec<Option<Value>>,
    ctx: &Rc<Context>,
    span: &Span,
    arg_spans: &[Span],
) -> Result<Value, EvalError> {
    match callee {
        Value::Function(function) => call_function(interp, &function, args, None, ctx, span),
        Value::Method(method) => call_function(
            interp,
            &method.function,
            args,
            Some(Value::Object(Rc::clone(&method.receiver))),
            ctx,
            span,
        ),
        Value::Builtin(builtin) => call_builtin(interp, &builtin, args, ctx, span, arg_spans),
        Value::Constructor(constructor) => {
            instantiate(interp, &constructor, args, ctx, span, arg_spans)
        }
        Value::List(_) | Value::Str(_) => {
            let index = match <[Option<Value>; 1]>::try_from(args) {
                Ok([Some(index)]) => index,
                _ => {
                    return Err(OpError::type_error(format!(
                        "'{}' object takes exactly one index argument.",
                        callee.type_name()
                    ))
                    .at(span, ctx)
                    .into())
                }
            };
            callee.index(&index).at(span, ctx)
        }
        other => Err(OpError::type_error(format!(
            "'{}' object is not callable.",
            other.type_name()
        ))
        .at(span, ctx)
        .into()),
    }
}

fn call_builtin(
    interp: &mut Interpreter,
    builtin: &Rc<BuiltinFunction>,
    args: Vec<Option<Value>>,
    ctx: &Rc<Context>,
    span: &Span,
    arg_spans: &[Span],
) -> Result<Value, EvalError> {
    let required = builtin.params.len();
    let max = required + builtin.optional.len();

    if args.len() < required || (builtin.strict_arity && args.len() > max) {
        let max = builtin.strict_arity.then_some(max);
        return Err(arity_error("built-in function", builtin.name, required, max, args.len())
            .at(span, ctx)
            .into());
    }

    let mut args = args.into_iter();
    let mut bound = Vec::with_capacity(max + 1);

    for param in builtin.params {
        match args.next().flatten() {
            Some(value) => bound.push(value),
            None => {
                return Err(OpError::type_error(format!(
                    "built-in function '{}' has no default for required parameter '{}'.",
                    builtin.name, param
                ))
                .at(span, ctx)
                .into())
            }
        }
    }
    for (_, default) in &builtin.optional {
        bound.push(args.next().flatten().unwrap_or_else(|| default.clone()));
    }
    if !builtin.strict_arity {
        let extras = args.map(|arg| arg.unwrap_or(Value::None)).collect();
        bound.push(Value::list(extras));
    }

    trace!(builtin = builtin.name, "call");

    let mut guard = interp.enter_call(span, ctx)?;
    let frame = match builtin.context_mode {
        ContextMode::Own => Context::child(
            builtin.name,
            ctx,
            span.start.clone(),
            Rc::new(SymbolTable::with_parent(Rc::clone(&ctx.symbol_table))),
        ),
        ContextMode::Caller => Rc::clone(ctx),
    };

    let mut call = BuiltinCall {
        interpreter: &mut guard,
        context: &frame,
        caller: ctx,
        span,
        arg_spans,
    };
    (builtin.func)(&mut call, bound)
}
