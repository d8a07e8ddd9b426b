//! Name lookup, `$name` debug printing and attribute chains

use std::rc::Rc;

use super::Evaluate;
use crate::ast::{AttributeNode, DebugPrintNode, Node, VarAccessNode};
use crate::context::Context;
use crate::environment::SymbolTable;
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::Value;

impl Evaluate for VarAccessNode {
    fn eval(&self, _interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        lookup(&self.name, &self.span, ctx)
    }
}

impl Evaluate for DebugPrintNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let value = lookup(&self.name, &self.span, ctx)?;
        interp
            .write_output(&format!("{} = {}\n", self.name, value.repr()))
            .map_err(|e| {
                RuntimeError::at(RuntimeErrorKind::Native, e.to_string(), &self.span, ctx)
            })?;
        Ok(value)
    }
}

/// Resolve a name through the frame's scope chain.
pub(crate) fn lookup(name: &str, span: &Span, ctx: &Rc<Context>) -> Result<Value, EvalError> {
    ctx.symbol_table
        .get(name, true)
        .ok_or_else(|| not_defined(name, span, ctx).into())
}

/// `NotDefinedError` with a "did you mean" suggestion.
pub(crate) fn not_defined(name: &str, span: &Span, ctx: &Rc<Context>) -> RuntimeError {
    let mut details = format!("'{}' is not defined.", name);
    if let Some(suggestion) = ctx.symbol_table.best_match(name) {
        details.push_str(&format!("\nDid you mean '{}'?", suggestion));
    }
    if is_dunder(name) {
        details.push_str(
            "\nNote: names like '__init__' are only defined by the constructs that use them.",
        );
    }
    RuntimeError::at(RuntimeErrorKind::NotDefined, details, span, ctx)
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

impl Evaluate for AttributeNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let mut current = self.base.eval(interp, ctx)?;
        for step in &self.steps {
            current = eval_step(&current, step, interp, ctx)?;
        }
        Ok(current)
    }
}

/// Evaluate one step of a chain in a frame exposing `current`'s attributes,
/// falling back to the enclosing scope for every other name.
fn eval_step(
    current: &Value,
    step: &Node,
    interp: &mut Interpreter,
    ctx: &Rc<Context>,
) -> Result<Value, EvalError> {
    let attributes = current.attribute_table();

    if let Some(name) = step.head_name() {
        if !attributes.contains_key(name) {
            return Err(RuntimeError::at(
                RuntimeErrorKind::Attribute,
                format!(
                    "'{}' object has no attribute '{}'.",
                    current.type_name(),
                    name
                ),
                step.span(),
                ctx,
            )
            .into());
        }
    }

    let table = SymbolTable::from_symbols(attributes, Some(Rc::clone(&ctx.symbol_table)));
    let step_ctx = ctx.with_table(Rc::new(table));
    step.eval(interp, &step_ctx)
}
