//! If expression evaluation

use std::rc::Rc;

use super::Evaluate;
use crate::ast::IfNode;
use crate::context::Context;
use crate::error::EvalError;
use crate::evaluator::Interpreter;
use crate::value::Value;

/// The inline form evaluates to the chosen branch; the block form to None.
/// Branches share the enclosing scope.
impl Evaluate for IfNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let mut chosen = None;
        for case in &self.cases {
            if case.condition.eval(interp, ctx)?.is_truthy() {
                chosen = Some(&case.body);
                break;
            }
        }
        let chosen = chosen.or(self.else_case.as_deref());

        let value = match chosen {
            Some(body) => body.eval(interp, ctx)?,
            None => Value::None,
        };

        Ok(if self.block { Value::None } else { value })
    }
}
