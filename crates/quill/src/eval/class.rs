//! Class definition and instantiation

use std::rc::Rc;

use tracing::trace;

use super::call::call_value;
use super::control::ControlFlow;
use super::{AtSpan, Evaluate};
use crate::ast::ClassDefNode;
use crate::context::Context;
use crate::environment::SymbolTable;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::{Constructor, Object, Value};

/// Name of the member run when a class is called.
const INITIALIZER: &str = "__init__";

impl Evaluate for ClassDefNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let parent = match &self.parent {
            Some(node) => match node.eval(interp, ctx)? {
                Value::Constructor(parent) => Some(parent),
                other => {
                    return Err(OpError::type_error(format!(
                        "class '{}' cannot inherit from '{}' object.",
                        self.name,
                        other.type_name()
                    )))
                    .at(node.span(), ctx)
                }
            },
            None => None,
        };

        let table = Rc::new(SymbolTable::with_parent(Rc::clone(&ctx.symbol_table)));
        let body_ctx = Context::child(
            format!("<class {}>", self.name),
            ctx,
            self.span.start.clone(),
            Rc::clone(&table),
        );

        match self.body.eval(interp, &body_ctx) {
            Ok(_) => {}
            Err(EvalError::ControlFlow(cf @ ControlFlow::Exit { .. })) => return Err(cf.into()),
            Err(EvalError::ControlFlow(cf)) => return Err(cf.outside_error(&body_ctx).into()),
            Err(e) => return Err(e),
        }

        let constructor = Rc::new(Constructor::new(self.name.clone(), table.locals(), parent));
        trace!(class = %constructor.name, members = constructor.members.len(), "class defined");

        let value = Value::Constructor(constructor);
        ctx.symbol_table.set(self.name.clone(), value.clone());
        Ok(value)
    }
}

/// Build an object and run its initializer, if any.
pub fn instantiate(
    interp: &mut Interpreter,
    constructor: &Rc<Constructor>,
    args: Vec<Option<Value>>,
    ctx: &Rc<Context>,
    span: &Span,
    arg_spans: &[Span],
) -> Result<Value, EvalError> {
    let object = Object::new(Rc::clone(constructor));

    match object.get(INITIALIZER) {
        Some(init) => {
            call_value(interp, init, args, ctx, span, arg_spans)?;
        }
        None if !args.is_empty() => {
            return Err(OpError::type_error(format!(
                "class '{}' takes no arguments, got {}.",
                constructor.name,
                args.len()
            )))
            .at(span, ctx)
        }
        None => {}
    }

    Ok(Value::Object(object))
}
