//! The interpreter facade
//!
//! [`Interpreter`] owns everything that lives for a whole session: the
//! configuration, the standard environment, the root frame, the lexer
//! switches carried between runs, and the console streams. Each call to
//! [`Interpreter::run`] goes through lex, parse and evaluate against the same
//! root frame, so a REPL keeps its bindings between lines.

use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::ast::Node;
use crate::config::EvalConfig;
use crate::context::Context;
use crate::environment::{build_standard_environment, SymbolTable};
use crate::error::{EvalError, QuillError};
use crate::eval::{ControlFlow, Evaluate};
use crate::lexer::{tokenize, Metas};
use crate::parser::parse;
use crate::value::Value;

/// Display name of the root frame.
pub const ROOT_FRAME: &str = "<program>";

/// A Quill interpreter session.
pub struct Interpreter {
    config: EvalConfig,

    /// Current user call depth, maintained by [`CallGuard`](crate::eval::CallGuard)
    pub(crate) call_depth: usize,

    builtins: Rc<SymbolTable>,
    root: Rc<Context>,
    metas: Metas,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl Interpreter {
    /// Create an interpreter reading stdin and writing stdout.
    pub fn new(config: EvalConfig) -> Self {
        let builtins = build_standard_environment();
        let globals = Rc::new(SymbolTable::with_parent(Rc::clone(&builtins)));
        let root = Context::root(ROOT_FRAME, globals);

        debug!(
            max_call_depth = config.max_call_depth,
            working_dir = %config.working_dir.display(),
            builtins = builtins.len(),
            "interpreter created"
        );

        Self {
            config,
            call_depth: 0,
            builtins,
            root,
            metas: Metas::default(),
            output: Box::new(io::stdout()),
            input: Box::new(BufReader::new(io::stdin())),
        }
    }

    /// Replace the output stream used by `print`, `$name` and `<stdout>`.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Replace the input stream used by `input` and `<stdin>`.
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// The root frame.
    pub fn root_context(&self) -> Rc<Context> {
        Rc::clone(&self.root)
    }

    /// The standard environment every program and module falls back to.
    pub fn builtins(&self) -> Rc<SymbolTable> {
        Rc::clone(&self.builtins)
    }

    /// Number of calls currently active.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Lexer switches carried into the next [`run`](Self::run).
    pub fn metas(&self) -> Metas {
        self.metas
    }

    // ═══════════════════════════════════════════════════════════════════
    // Console
    // ═══════════════════════════════════════════════════════════════════

    /// Write text to the output stream and flush it.
    pub fn write_output(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    /// Read one line from the input stream, without its line terminator.
    /// Returns an empty string at end of input.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Running code
    // ═══════════════════════════════════════════════════════════════════

    /// Lex, parse and evaluate `text` in the root frame.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, syntax or runtime error, or
    /// [`QuillError::Exit`] when the program called `exit`.
    pub fn run(&mut self, file_name: &str, text: &str) -> Result<Value, QuillError> {
        let (tokens, metas) = tokenize(file_name, text, self.metas)?;
        self.metas = metas;
        let ast = parse(tokens)?;
        self.eval(&ast)
    }

    /// Run a source file.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), plus [`QuillError::Io`] when the file cannot
    /// be read.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<Value, QuillError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| QuillError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "running file");
        self.run(&path.display().to_string(), &text)
    }

    /// Evaluate a parsed program in the root frame.
    ///
    /// # Errors
    ///
    /// Control signals that reach the root become runtime errors, except
    /// `exit`, which becomes [`QuillError::Exit`].
    pub fn eval(&mut self, ast: &Node) -> Result<Value, QuillError> {
        let root = self.root_context();
        match ast.eval(self, &root) {
            Ok(value) => Ok(value),
            Err(EvalError::Runtime(e)) => Err(QuillError::Runtime(*e)),
            Err(EvalError::ControlFlow(ControlFlow::Exit { code })) => {
                Err(QuillError::Exit { code })
            }
            Err(EvalError::ControlFlow(cf)) => Err(QuillError::Runtime(cf.outside_error(&root))),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

/// An in-memory output sink that can be read back after the interpreter
/// has written to it.
#[derive(Clone, Default)]
pub struct SharedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedOutput {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn interpreter() -> (Interpreter, SharedOutput) {
        let out = SharedOutput::new();
        (Interpreter::default().with_output(out.clone()), out)
    }

    #[test]
    fn test_bindings_persist_between_runs() {
        let (mut interp, _) = interpreter();
        interp.run("<stdin>", "var x = 40").unwrap();
        let value = interp.run("<stdin>", "x + 2").unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn test_print_goes_to_output() {
        let (mut interp, out) = interpreter();
        interp.run("t.ql", "print(\"hello\", 1, 2.5)").unwrap();
        assert_eq!(out.contents(), "hello 1 2.5\n");
    }

    #[test]
    fn test_read_line_strips_terminator() {
        let mut interp = Interpreter::default().with_input(Cursor::new("abc\r\nrest\n"));
        assert_eq!(interp.read_line().unwrap(), "abc");
        assert_eq!(interp.read_line().unwrap(), "rest");
        assert_eq!(interp.read_line().unwrap(), "");
    }

    #[test]
    fn test_stray_return_at_root() {
        let (mut interp, _) = interpreter();
        match interp.run("t.ql", "return 1") {
            Err(QuillError::Runtime(e)) => {
                assert_eq!(e.kind, RuntimeErrorKind::RunTime);
                assert_eq!(e.details, "'return' outside of a function");
            }
            other => panic!("expected runtime error, got {:?}", other.map(|v| v.repr())),
        }
    }

    #[test]
    fn test_exit_code() {
        let (mut interp, _) = interpreter();
        match interp.run("t.ql", "exit(3)") {
            Err(QuillError::Exit { code }) => assert_eq!(code, 3),
            other => panic!("expected exit, got {:?}", other.map(|v| v.repr())),
        }
    }

    #[test]
    fn test_call_depth_restored_after_error() {
        let (mut interp, _) = interpreter();
        let result = interp.run("t.ql", "def f() -> 1 / 0\nf()");
        assert!(result.is_err());
        assert_eq!(interp.call_depth(), 0);
    }

    #[test]
    fn test_missing_file() {
        let (mut interp, _) = interpreter();
        let dir = tempfile::tempdir().unwrap();
        let result = interp.run_file(dir.path().join("nope.ql"));
        assert!(matches!(result, Err(QuillError::Io { .. })));
    }
}
