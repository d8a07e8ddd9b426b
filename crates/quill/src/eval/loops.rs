//! Loop expression evaluation
//!
//! Loops never open a scope: the loop variable and everything bound in the
//! body stay visible in the enclosing frame after the loop ends. Inline
//! loops collect each iteration's body value into a list; block loops
//! evaluate to None.

use std::rc::Rc;

use super::control::ControlFlow;
use super::{AtSpan, Evaluate};
use crate::ast::{DoWhileNode, ForInNode, ForNode, LoopNode, Node, WhileNode};
use crate::context::Context;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::Value;

/// Outcome of one pass through a loop body.
enum Step {
    Next(Value),
    Continue,
    Break,
}

/// Run a loop body, consuming `break`/`continue` addressed to this loop.
fn run_body(
    body: &Node,
    label: Option<&str>,
    interp: &mut Interpreter,
    ctx: &Rc<Context>,
) -> Result<Step, EvalError> {
    match body.eval(interp, ctx) {
        Ok(value) => Ok(Step::Next(value)),
        Err(EvalError::ControlFlow(cf)) if cf.matches_label(label) => match cf {
            ControlFlow::Break { .. } => Ok(Step::Break),
            ControlFlow::Continue { .. } => Ok(Step::Continue),
            other => Err(other.into()),
        },
        Err(e) => Err(e),
    }
}

/// Collects body values for inline loops.
struct Collector {
    items: Option<Vec<Value>>,
}

impl Collector {
    fn new(block: bool) -> Self {
        Self {
            items: if block { None } else { Some(Vec::new()) },
        }
    }

    fn push(&mut self, value: Value) {
        if let Some(items) = &mut self.items {
            items.push(value);
        }
    }

    fn finish(self) -> Value {
        match self.items {
            Some(items) => Value::list(items),
            None => Value::None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// for i = start to end step n
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for ForNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let start = int_bound(self.start.eval(interp, ctx)?, "start", self.start.span(), ctx)?;
        let end = int_bound(self.end.eval(interp, ctx)?, "end", self.end.span(), ctx)?;
        let step = match &self.step {
            Some(node) => int_bound(node.eval(interp, ctx)?, "step", node.span(), ctx)?,
            None => 1,
        };

        let label = self.label.as_deref();
        let mut collected = Collector::new(self.block);
        let mut i = start;

        while (step >= 0 && i < end) || (step < 0 && i > end) {
            ctx.symbol_table.set(self.var.clone(), Value::Int(i));

            match run_body(&self.body, label, interp, ctx)? {
                Step::Next(value) => collected.push(value),
                Step::Continue => {}
                Step::Break => break,
            }

            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }

        Ok(collected.finish())
    }
}

fn int_bound(value: Value, which: &str, span: &Span, ctx: &Rc<Context>) -> Result<i64, EvalError> {
    match value {
        Value::Int(n) => Ok(n),
        other => Err(OpError::type_error(format!(
            "'for' loop {} must be an int, not {}.",
            which,
            other.type_name()
        )))
        .at(span, ctx),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// for x in iterable
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for ForInNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let iterable = self.iterable.eval(interp, ctx)?;
        let items = iterable.iter_items().at(self.iterable.span(), ctx)?;

        let label = self.label.as_deref();
        let mut collected = Collector::new(self.block);

        for item in items {
            ctx.symbol_table.set(self.var.clone(), item);

            match run_body(&self.body, label, interp, ctx)? {
                Step::Next(value) => collected.push(value),
                Step::Continue => {}
                Step::Break => break,
            }
        }

        Ok(collected.finish())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// while / do ... loop while / loop
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for WhileNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let label = self.label.as_deref();
        let mut collected = Collector::new(self.block);

        while self.condition.eval(interp, ctx)?.is_truthy() {
            match run_body(&self.body, label, interp, ctx)? {
                Step::Next(value) => collected.push(value),
                Step::Continue => {}
                Step::Break => break,
            }
        }

        Ok(collected.finish())
    }
}

impl Evaluate for DoWhileNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let label = self.label.as_deref();
        let mut collected = Collector::new(self.block);

        loop {
            match run_body(&self.body, label, interp, ctx)? {
                Step::Next(value) => collected.push(value),
                Step::Continue => {}
                Step::Break => break,
            }
            if !self.condition.eval(interp, ctx)?.is_truthy() {
                break;
            }
        }

        Ok(collected.finish())
    }
}

impl Evaluate for LoopNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let label = self.label.as_deref();
        let mut collected = Collector::new(self.block);

        loop {
            match run_body(&self.body, label, interp, ctx)? {
                Step::Next(value) => collected.push(value),
                Step::Continue => {}
                Step::Break => break,
            }
        }

        Ok(collected.finish())
    }
}

