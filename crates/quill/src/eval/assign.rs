//! Assignment and deletion

use std::rc::Rc;

use super::access::not_defined;
use super::{AtSpan, Evaluate};
use crate::ast::{AssignOp, DeleteNode, Target, VarAssignNode};
use crate::context::Context;
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::value::{Object, Value};

/// `var a, b.c = x, y` evaluates every value first, then assigns pairwise.
impl Evaluate for VarAssignNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let values = self
            .values
            .iter()
            .map(|node| node.eval(interp, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != self.targets.len() {
            return Err(RuntimeError::at(
                RuntimeErrorKind::RunTime,
                format!(
                    "cannot assign {} value{} to {} target{}.",
                    values.len(),
                    plural(values.len()),
                    self.targets.len(),
                    plural(self.targets.len())
                ),
                &self.span,
                ctx,
            )
            .into());
        }

        let mut assigned = Vec::with_capacity(values.len());
        for (target, value) in self.targets.iter().zip(values) {
            assigned.push(assign(target, self.op, value, interp, ctx)?);
        }

        if assigned.len() == 1 {
            Ok(assigned.remove(0))
        } else {
            Ok(Value::list(assigned))
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn assign(
    target: &Target,
    op: AssignOp,
    value: Value,
    interp: &mut Interpreter,
    ctx: &Rc<Context>,
) -> Result<Value, EvalError> {
    match &target.object {
        None => {
            let value = match op {
                AssignOp::Set => value,
                AssignOp::Compound(bin) => {
                    let current = ctx
                        .symbol_table
                        .get(&target.name, true)
                        .ok_or_else(|| not_defined(&target.name, &target.span, ctx))?;
                    current.binary_op(bin, &value).at(&target.span, ctx)?
                }
            };
            ctx.symbol_table.set(target.name.clone(), value.clone());
            Ok(value)
        }
        Some(object_node) => {
            let owner = object_node.eval(interp, ctx)?;
            let Value::Object(object) = &owner else {
                return Err(RuntimeError::at(
                    RuntimeErrorKind::Attribute,
                    format!(
                        "cannot set attribute '{}' on '{}' object.",
                        target.name,
                        owner.type_name()
                    ),
                    &target.span,
                    ctx,
                )
                .into());
            };

            let value = match op {
                AssignOp::Set => value,
                AssignOp::Compound(bin) => {
                    let current = current_attribute(object, &target.name).ok_or_else(|| {
                        RuntimeError::at(
                            RuntimeErrorKind::Attribute,
                            format!(
                                "'{}' object has no attribute '{}'.",
                                object.constructor.name, target.name
                            ),
                            &target.span,
                            ctx,
                        )
                    })?;
                    current.binary_op(bin, &value).at(&target.span, ctx)?
                }
            };
            object.set(target.name.clone(), value.clone());
            Ok(value)
        }
    }
}

fn current_attribute(object: &Rc<Object>, name: &str) -> Option<Value> {
    object.attributes.borrow().get(name).cloned()
}

/// `del name` removes a binding from the current table only.
impl Evaluate for DeleteNode {
    fn eval(&self, _interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        ctx.symbol_table
            .remove(&self.name)
            .ok_or_else(|| not_defined(&self.name, &self.span, ctx).into())
    }
}
