//! Statement sequences and `assert`

use std::rc::Rc;

use super::Evaluate;
use crate::ast::{AssertNode, StatementsNode};
use crate::context::Context;
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::value::Value;

/// Evaluates to the last statement's value; the first error or control
/// signal aborts the rest.
impl Evaluate for StatementsNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let mut last = Value::None;
        for statement in &self.statements {
            last = statement.eval(interp, ctx)?;
        }
        Ok(last)
    }
}

impl Evaluate for AssertNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        if self.condition.eval(interp, ctx)?.is_truthy() {
            return Ok(Value::None);
        }

        let details = match &self.message {
            Some(node) => node.eval(interp, ctx)?.to_string(),
            None => "assertion failed.".to_string(),
        };
        Err(RuntimeError::at(RuntimeErrorKind::Assertion, details, &self.span, ctx).into())
    }
}
