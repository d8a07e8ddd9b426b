//! Literal evaluation

use std::rc::Rc;

use super::Evaluate;
use crate::ast::{DefaultNode, ListNode, Number, NumberNode, StringNode};
use crate::context::Context;
use crate::error::EvalError;
use crate::evaluator::Interpreter;
use crate::value::Value;

impl Evaluate for NumberNode {
    fn eval(&self, _interp: &mut Interpreter, _ctx: &Rc<Context>) -> Result<Value, EvalError> {
        Ok(match self.value {
            Number::Int(n) => Value::Int(n),
            Number::Float(x) => Value::Float(x),
        })
    }
}

impl Evaluate for StringNode {
    fn eval(&self, _interp: &mut Interpreter, _ctx: &Rc<Context>) -> Result<Value, EvalError> {
        Ok(Value::string(&self.value))
    }
}

impl Evaluate for ListNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let items = self
            .elements
            .iter()
            .map(|element| element.eval(interp, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::list(items))
    }
}

/// `default` outside an argument list is just None.
impl Evaluate for DefaultNode {
    fn eval(&self, _interp: &mut Interpreter, _ctx: &Rc<Context>) -> Result<Value, EvalError> {
        Ok(Value::None)
    }
}
