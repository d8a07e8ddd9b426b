//! `write` and `read` statements

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use super::{AtSpan, Evaluate};
use crate::ast::{Node, ReadNode, WriteNode};
use crate::context::Context;
use crate::error::{EvalError, OpError, RuntimeError, RuntimeErrorKind};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::value::Value;

/// Target naming the interpreter's output.
pub const STDOUT: &str = "<stdout>";
/// Target naming the interpreter's input.
pub const STDIN: &str = "<stdin>";

impl Evaluate for WriteNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let text = self.text.eval(interp, ctx)?.to_string();
        let target = target_name("write", &self.target, interp, ctx)?;
        let line = line_number(self.line.as_deref(), interp, ctx)?;

        if target == STDOUT {
            interp
                .write_output(&format!("{}\n", text))
                .map_err(|e| native(e, &self.span, ctx))?;
            return Ok(Value::string(text));
        }

        let path = interp.config().resolve(&target);
        debug!(path = %path.display(), overwrite = self.overwrite, ?line, "write");

        let result = match line {
            None if self.overwrite => fs::write(&path, &text),
            None => append(&path, &text),
            Some(n) => write_line(&path, &text, n, self.overwrite),
        };
        result.map_err(|e| io_error(e, &target, &self.span, ctx))?;

        Ok(Value::string(text))
    }
}

impl Evaluate for ReadNode {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        let target = target_name("read", &self.target, interp, ctx)?;
        let line = line_number(self.line.as_deref(), interp, ctx)?;

        let text = if target == STDIN {
            interp.read_line().map_err(|e| native(e, &self.span, ctx))?
        } else {
            let path = interp.config().resolve(&target);
            debug!(path = %path.display(), ?line, "read");

            let content =
                fs::read_to_string(&path).map_err(|e| io_error(e, &target, &self.span, ctx))?;
            match line {
                None => content,
                Some(n) => content
                    .lines()
                    .nth(n - 1)
                    .map(str::to_string)
                    .ok_or_else(|| line_out_of_range(n, &self.span, ctx))?,
            }
        };

        let value = Value::string(text);
        if let Some(name) = &self.into {
            ctx.symbol_table.set(name.clone(), value.clone());
        }
        Ok(value)
    }
}

fn target_name(
    statement: &str,
    node: &Node,
    interp: &mut Interpreter,
    ctx: &Rc<Context>,
) -> Result<String, EvalError> {
    match node.eval(interp, ctx)? {
        Value::Str(s) => Ok(s.to_string()),
        other => Err(OpError::type_error(format!(
            "'{}' target must be a str, not {}.",
            statement,
            other.type_name()
        )))
        .at(node.span(), ctx),
    }
}

/// 1-based line argument.
fn line_number(
    node: Option<&Node>,
    interp: &mut Interpreter,
    ctx: &Rc<Context>,
) -> Result<Option<usize>, EvalError> {
    let Some(node) = node else {
        return Ok(None);
    };

    match node.eval(interp, ctx)? {
        Value::Int(n) if n >= 1 => Ok(usize::try_from(n).ok()),
        Value::Int(n) => Err(line_out_of_range(n, node.span(), ctx)),
        other => Err(OpError::type_error(format!(
            "line number must be an int, not {}.",
            other.type_name()
        )))
        .at(node.span(), ctx),
    }
}

fn append(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}

/// Insert (or replace) line `n`, padding with blank lines past the end.
fn write_line(path: &Path, text: &str, n: usize, replace: bool) -> io::Result<()> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let mut lines: Vec<&str> = content.lines().collect();
    let index = n - 1;
    while lines.len() < index {
        lines.push("");
    }

    if replace && index < lines.len() {
        lines[index] = text;
    } else {
        lines.insert(index, text);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(path, out)
}

fn line_out_of_range(n: impl std::fmt::Display, span: &Span, ctx: &Rc<Context>) -> EvalError {
    RuntimeError::at(
        RuntimeErrorKind::Index,
        format!("line {} is out of range.", n),
        span,
        ctx,
    )
    .into()
}

fn io_error(e: io::Error, target: &str, span: &Span, ctx: &Rc<Context>) -> EvalError {
    if e.kind() == io::ErrorKind::NotFound {
        RuntimeError::at(
            RuntimeErrorKind::FileNotFound,
            format!("file '{}' not found.", target),
            span,
            ctx,
        )
        .into()
    } else {
        native(e, span, ctx)
    }
}

fn native(e: io::Error, span: &Span, ctx: &Rc<Context>) -> EvalError {
    RuntimeError::at(RuntimeErrorKind::Native, e.to_string(), span, ctx).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_line_pads_and_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_line(&path, "third", 3, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n\nthird\n");

        write_line(&path, "first", 1, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n\n\nthird\n");
    }

    #[test]
    fn test_write_line_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "a\nb\nc\n").unwrap();

        write_line(&path, "B", 2, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nB\nc\n");

        write_line(&path, "e", 5, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nB\nc\n\ne\n");
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        append(&path, "one").unwrap();
        append(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "onetwo");
    }
}
