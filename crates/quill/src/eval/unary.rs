//! Unary operator evaluation

use std::rc::Rc;

use super::{AtSpan, Evaluate};
use crate::ast::UnaryOpNode;
use crate::context::Context;
use crate::error::EvalError;
use crate::evaluator::Interpreter;
use crate::value::Value;

impl Evaluate for UnaryOpNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let operand = self.operand.eval(interp, ctx)?;
        operand.unary_op(self.op).at(&self.span, ctx)
    }
}
