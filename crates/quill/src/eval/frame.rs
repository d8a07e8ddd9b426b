//! RAII call guard for the recursion-depth counter

use std::rc::Rc;

use crate::context::Context;
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::position::Span;

/// RAII guard that counts one call level and releases it when dropped.
///
/// Dereferences to the [`Interpreter`], so the callee body is evaluated
/// through the guard and the depth is restored on every exit path,
/// including errors and control signals.
pub struct CallGuard<'a> {
    interp: &'a mut Interpreter,
}

impl Interpreter {
    /// Enter one call level, failing with `RecursionError` at the limit.
    pub fn enter_call(
        &mut self,
        span: &Span,
        ctx: &Rc<Context>,
    ) -> Result<CallGuard<'_>, EvalError> {
        if self.call_depth >= self.config().max_call_depth {
            return Err(RuntimeError::at(
                RuntimeErrorKind::Recursion,
                "maximum recursion depth exceeded",
                span,
                ctx,
            )
            .into());
        }
        self.call_depth += 1;
        Ok(CallGuard { interp: self })
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.interp.call_depth -= 1;
    }
}

impl std::ops::Deref for CallGuard<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interp
    }
}

impl std::ops::DerefMut for CallGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::position::Position;

    fn span() -> Span {
        let p = Position::start_of("t.ql", "f()");
        Span::new(p.clone(), p)
    }

    #[test]
    fn test_guard_counts_depth() {
        let mut interp = Interpreter::new(EvalConfig::default());
        let ctx = interp.root_context();

        {
            let mut outer = interp.enter_call(&span(), &ctx).unwrap();
            assert_eq!(outer.call_depth(), 1);
            {
                let inner = outer.enter_call(&span(), &ctx).unwrap();
                assert_eq!(inner.call_depth(), 2);
            }
            assert_eq!(outer.call_depth(), 1);
        }
        assert_eq!(interp.call_depth(), 0);
    }

    #[test]
    fn test_guard_enforces_limit() {
        let mut interp = Interpreter::new(EvalConfig::with_max_call_depth(1));
        let ctx = interp.root_context();

        let mut guard = interp.enter_call(&span(), &ctx).unwrap();
        let err = guard.enter_call(&span(), &ctx).err().unwrap();
        let err = err.as_runtime().unwrap();
        assert_eq!(err.kind, RuntimeErrorKind::Recursion);
        assert_eq!(err.details, "maximum recursion depth exceeded");
    }
}
