//! `import` and `export`

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use super::control::ControlFlow;
use super::Evaluate;
use crate::ast::{ExportNode, ImportNode};
use crate::context::Context;
use crate::environment::{native_module, SymbolTable};
use crate::error::{EvalError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::lexer::{tokenize, Metas};
use crate::parser::parse;
use crate::position::{Position, Span};
use crate::value::{Module, Value};

/// Source file extension of library modules.
pub const MODULE_EXTENSION: &str = "ql";

/// Where a module was found.
enum Source {
    File(PathBuf),
    Native(IndexMap<String, Value>),
}

impl Evaluate for ImportNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let exports = match locate(interp, &self.name) {
            Some(Source::File(path)) => load_file(interp, &self.name, &path, ctx, &self.span)?,
            Some(Source::Native(exports)) => {
                debug!(module = %self.name, "importing native module");
                exports
            }
            None => {
                return Err(RuntimeError::at(
                    RuntimeErrorKind::RunTime,
                    format!("'{}' is not a module.", self.name),
                    &self.span,
                    ctx,
                )
                .into())
            }
        };

        let module = Value::Module(Rc::new(Module {
            name: self.name.clone(),
            exports,
        }));
        let alias = self.alias.as_ref().unwrap_or(&self.name);
        ctx.symbol_table.set(alias.clone(), module.clone());
        Ok(module)
    }
}

/// Working directory first, then the library directory, then native modules.
fn locate(interp: &Interpreter, name: &str) -> Option<Source> {
    let file_name = format!("{}.{}", name, MODULE_EXTENSION);
    let config = interp.config();

    let candidates = std::iter::once(config.working_dir.join(&file_name))
        .chain(config.lib_dir.as_ref().map(|dir| dir.join(&file_name)));
    for path in candidates {
        if path.is_file() {
            return Some(Source::File(path));
        }
    }

    native_module(name).map(Source::Native)
}

fn load_file(
    interp: &mut Interpreter,
    name: &str,
    path: &Path,
    ctx: &Rc<Context>,
    span: &Span,
) -> Result<IndexMap<String, Value>, EvalError> {
    debug!(module = name, path = %path.display(), "importing module");

    let text = fs::read_to_string(path).map_err(|e| -> EvalError {
        RuntimeError::at(
            RuntimeErrorKind::RunTime,
            format!("failed to load module '{}': {}", name, e),
            span,
            ctx,
        )
        .into()
    })?;

    let table = Rc::new(SymbolTable::with_parent(interp.builtins()));
    let module_ctx = Context::child(format!("<module {}>", name), ctx, span.start.clone(), table);

    // Lex and parse errors keep their place in the module's own source.
    let located = |details: String, start: Position, end: Position| -> EvalError {
        RuntimeError::new(
            RuntimeErrorKind::RunTime,
            format!("failed to load module '{}': {}", name, details),
            start,
            end,
            Rc::clone(&module_ctx),
        )
        .into()
    };

    let file_name = path.display().to_string();
    let (tokens, _) = tokenize(&file_name, &text, Metas::default())
        .map_err(|e| located(e.to_string(), e.pos_start, e.pos_end))?;
    let ast = parse(tokens).map_err(|e| located(e.to_string(), e.pos_start, e.pos_end))?;

    let mut guard = interp.enter_call(span, ctx)?;
    match ast.eval(&mut guard, &module_ctx) {
        Ok(_) => {}
        Err(EvalError::ControlFlow(cf @ ControlFlow::Exit { .. })) => return Err(cf.into()),
        Err(EvalError::ControlFlow(cf)) => return Err(cf.outside_error(&module_ctx).into()),
        Err(e) => return Err(e),
    }

    let exports = module_ctx.exported();
    debug!(module = name, exports = exports.len(), "module loaded");
    Ok(exports)
}

impl Evaluate for ExportNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let value = self.value.eval(interp, ctx)?;
        ctx.export(self.name.clone(), value.clone());
        Ok(value)
    }
}
