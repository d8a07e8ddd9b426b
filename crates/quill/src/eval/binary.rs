//! Binary operators, chained comparisons and the `?` fallback chain

use std::rc::Rc;

use super::{AtSpan, Evaluate};
use crate::ast::{BinOpNode, BinaryOp, CompareNode, FallbackNode};
use crate::context::Context;
use crate::error::EvalError;
use crate::evaluator::Interpreter;
use crate::value::{compare, Value};

impl Evaluate for BinOpNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let left = self.left.eval(interp, ctx)?;

        // Short-circuit operators
        match self.op {
            BinaryOp::And if !left.is_truthy() => return Ok(Value::bool(false)),
            BinaryOp::Or if left.is_truthy() => return Ok(Value::bool(true)),
            _ => {}
        }

        let right = self.right.eval(interp, ctx)?;
        left.binary_op(self.op, &right).at(&self.span, ctx)
    }
}

/// `a < b <= c` compares pairwise left to right and stops at the first
/// false comparison; later operands are not evaluated.
impl Evaluate for CompareNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let mut left = self.first.eval(interp, ctx)?;

        for (op, node) in &self.rest {
            let right = node.eval(interp, ctx)?;
            if !compare(*op, &left, &right).at(&self.span, ctx)? {
                return Ok(Value::bool(false));
            }
            left = right;
        }

        Ok(Value::bool(true))
    }
}

impl Evaluate for FallbackNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let Some((last, rest)) = self.operands.split_last() else {
            return Ok(Value::None);
        };

        for operand in rest {
            let value = operand.eval(interp, ctx)?;
            if !value.is_none() {
                return Ok(value);
            }
        }
        last.eval(interp, ctx)
    }
}
