//! Control flow mechanism for return/break/continue/exit

use std::rc::Rc;

use super::Evaluate;
use crate::ast::{BreakNode, ContinueNode, ReturnNode};
use crate::context::Context;
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::position::{Position, Span};
use crate::value::Value;

/// Control flow signal for non-local jumps.
///
/// When `break`, `continue` or `return` is evaluated, it doesn't return a
/// normal value. Instead, it returns an `Err(EvalError::ControlFlow(...))`
/// that propagates up until caught by the enclosing loop or call.
#[derive(Debug, Clone)]
pub enum ControlFlow {
    /// Break out of a loop.
    Break {
        /// Optional loop label (`break:outer`)
        label: Option<String>,
        /// Where the `break` was written
        span: Span,
    },

    /// Continue to next iteration of a loop.
    Continue {
        /// Optional loop label
        label: Option<String>,
        /// Where the `continue` was written
        span: Span,
    },

    /// Return from a function with a value.
    Return {
        /// Value to return from the function
        value: Value,
        /// Where the `return` was written
        span: Span,
    },

    /// Stop the program (the `exit` builtin).
    Exit {
        /// Requested process exit code
        code: i32,
    },
}

impl ControlFlow {
    /// Check if this control flow matches a label.
    /// None label matches any loop, Some(l) matches only that label.
    pub fn matches_label(&self, loop_label: Option<&str>) -> bool {
        match self {
            ControlFlow::Break { label, .. } | ControlFlow::Continue { label, .. } => {
                match (label.as_deref(), loop_label) {
                    (None, _) => true,
                    (Some(l), Some(ll)) => l == ll,
                    (Some(_), None) => false,
                }
            }
            ControlFlow::Return { .. } | ControlFlow::Exit { .. } => false,
        }
    }

    /// The error reported when this signal escapes every construct that
    /// could consume it.
    pub fn outside_error(&self, ctx: &Rc<Context>) -> RuntimeError {
        let (details, span) = match self {
            ControlFlow::Return { span, .. } => ("'return' outside of a function", Some(span)),
            ControlFlow::Break { span, label: None } => ("'break' outside of a loop", Some(span)),
            ControlFlow::Continue { span, label: None } => {
                ("'continue' outside of a loop", Some(span))
            }
            ControlFlow::Break { span, label: Some(_) } => {
                ("'break' does not match any enclosing loop label", Some(span))
            }
            ControlFlow::Continue { span, label: Some(_) } => {
                ("'continue' does not match any enclosing loop label", Some(span))
            }
            ControlFlow::Exit { .. } => ("'exit' outside of a program", None),
        };

        match span {
            Some(span) => RuntimeError::at(RuntimeErrorKind::RunTime, details, span, ctx),
            None => {
                let here = Position::start_of("<unknown>", "");
                RuntimeError::new(RuntimeErrorKind::RunTime, details, here.clone(), here, Rc::clone(ctx))
            }
        }
    }

    /// Convert a `break`/`continue` that reached a function or class body
    /// boundary into its error; `return` and `exit` pass through.
    pub fn at_boundary(self, ctx: &Rc<Context>) -> EvalError {
        match self {
            ControlFlow::Break { .. } | ControlFlow::Continue { .. } => {
                self.outside_error(ctx).into()
            }
            other => other.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Signal-raising statements
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for ReturnNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let value = match &self.value {
            Some(node) => node.eval(interp, ctx)?,
            None => Value::None,
        };
        Err(ControlFlow::Return {
            value,
            span: self.span.clone(),
        }
        .into())
    }
}

impl Evaluate for BreakNode {
    fn eval(&self, _interp: &mut Interpreter, _ctx: &Rc<Context>) -> Result<Value, EvalError> {
        Err(ControlFlow::Break {
            label: self.label.clone(),
            span: self.span.clone(),
        }
        .into())
    }
}

impl Evaluate for ContinueNode {
    fn eval(&self, _interp: &mut Interpreter, _ctx: &Rc<Context>) -> Result<Value, EvalError> {
        Err(ControlFlow::Continue {
            label: self.label.clone(),
            span: self.span.clone(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::SymbolTable;

    fn span() -> Span {
        let p = Position::start_of("t.ql", "break");
        Span::new(p.clone(), p)
    }

    fn brk(label: Option<&str>) -> ControlFlow {
        ControlFlow::Break {
            label: label.map(str::to_string),
            span: span(),
        }
    }

    #[test]
    fn test_unlabeled_matches_any_loop() {
        assert!(brk(None).matches_label(None));
        assert!(brk(None).matches_label(Some("outer")));
    }

    #[test]
    fn test_labeled_matches_only_its_loop() {
        assert!(brk(Some("outer")).matches_label(Some("outer")));
        assert!(!brk(Some("outer")).matches_label(Some("inner")));
        assert!(!brk(Some("outer")).matches_label(None));
    }

    #[test]
    fn test_return_and_exit_never_match() {
        let ret = ControlFlow::Return {
            value: Value::None,
            span: span(),
        };
        assert!(!ret.matches_label(None));
        assert!(!ControlFlow::Exit { code: 0 }.matches_label(None));
    }

    #[test]
    fn test_outside_errors() {
        let ctx = Context::root("<program>", Rc::new(SymbolTable::new()));
        assert_eq!(
            brk(None).outside_error(&ctx).details,
            "'break' outside of a loop"
        );
        let ret = ControlFlow::Return {
            value: Value::None,
            span: span(),
        };
        assert_eq!(ret.outside_error(&ctx).details, "'return' outside of a function");
    }
}
