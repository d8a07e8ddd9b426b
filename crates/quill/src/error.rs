//! Error types for lexing, parsing and evaluation

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::context::Context;
use crate::eval::ControlFlow;
use crate::position::{Position, Span};

/// Traceback lines repeated more than this many times are collapsed.
const MAX_REPEATED_FRAMES: usize = 5;

// ═══════════════════════════════════════════════════════════════════════
// Lexer errors
// ═══════════════════════════════════════════════════════════════════════

/// Category of a lexical error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that starts no token
    IllegalCharacter,
    /// A string literal without its closing quote
    UnterminatedString,
    /// A `/*` comment without its closing `*/`
    UnterminatedComment,
    /// An opening bracket never closed
    UnclosedBracket,
    /// A closing bracket with no matching opener
    UnmatchedBracket,
    /// A malformed number literal
    InvalidNumber,
    /// A malformed escape sequence
    InvalidEscape,
    /// A misplaced or unknown `@meta` directive
    InvalidMeta,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexErrorKind::IllegalCharacter => "IllegalCharError",
            LexErrorKind::UnterminatedString => "UnterminatedStringError",
            LexErrorKind::UnterminatedComment => "UnterminatedCommentError",
            LexErrorKind::UnclosedBracket => "UnclosedBracketError",
            LexErrorKind::UnmatchedBracket => "UnmatchedBracketError",
            LexErrorKind::InvalidNumber => "SyntaxError",
            LexErrorKind::InvalidEscape => "InvalidEscapeError",
            LexErrorKind::InvalidMeta => "MetaError",
        };
        f.write_str(name)
    }
}

/// First lexical error found in a file.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {details}")]
pub struct LexError {
    /// What went wrong
    pub kind: LexErrorKind,
    /// Human-readable explanation
    pub details: String,
    /// Start of the offending text
    pub pos_start: Position,
    /// End of the offending text
    pub pos_end: Position,
}

impl LexError {
    /// Create a lexical error.
    pub fn new(
        kind: LexErrorKind,
        details: impl Into<String>,
        pos_start: Position,
        pos_end: Position,
    ) -> Self {
        Self {
            kind,
            details: details.into(),
            pos_start,
            pos_end,
        }
    }

    /// Full report with location and source excerpt.
    pub fn render(&self) -> String {
        render_located(&self.kind.to_string(), &self.details, &self.pos_start, &self.pos_end)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parser errors
// ═══════════════════════════════════════════════════════════════════════

/// First unrecoverable parse error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("SyntaxError: {details}")]
pub struct SyntaxError {
    /// Human-readable explanation, usually naming the expected tokens
    pub details: String,
    /// Start of the offending text
    pub pos_start: Position,
    /// End of the offending text
    pub pos_end: Position,
}

impl SyntaxError {
    /// Create a syntax error.
    pub fn new(details: impl Into<String>, pos_start: Position, pos_end: Position) -> Self {
        Self {
            details: details.into(),
            pos_start,
            pos_end,
        }
    }

    /// Create a syntax error covering a span.
    pub fn at(details: impl Into<String>, span: &Span) -> Self {
        Self::new(details, span.start.clone(), span.end.clone())
    }

    /// Full report with location and source excerpt.
    pub fn render(&self) -> String {
        render_located("SyntaxError", &self.details, &self.pos_start, &self.pos_end)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Runtime errors
// ═══════════════════════════════════════════════════════════════════════

/// Category of a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Generic runtime failure
    RunTime,
    /// Operand or argument of the wrong type, or wrong arity
    Type,
    /// Index out of range
    Index,
    /// Division, modulo or floor division by zero and other math errors
    Arithmetic,
    /// Result does not fit the numeric type
    Overflow,
    /// Name lookup failed
    NotDefined,
    /// Attribute lookup failed
    Attribute,
    /// `assert` failed
    Assertion,
    /// File missing for `read`, `write` or `import`
    FileNotFound,
    /// Call depth limit reached
    Recursion,
    /// A host-side failure surfaced to the script
    Native,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeErrorKind::RunTime => "RunTimeError",
            RuntimeErrorKind::Type => "TypeError",
            RuntimeErrorKind::Index => "IndexError",
            RuntimeErrorKind::Arithmetic => "ArithmeticError",
            RuntimeErrorKind::Overflow => "OverflowError",
            RuntimeErrorKind::NotDefined => "NotDefinedError",
            RuntimeErrorKind::Attribute => "AttributeError",
            RuntimeErrorKind::Assertion => "AssertionError",
            RuntimeErrorKind::FileNotFound => "FileNotFoundError",
            RuntimeErrorKind::Recursion => "RecursionError",
            RuntimeErrorKind::Native => "NativeError",
        };
        f.write_str(name)
    }
}

/// Failure of a value operation, before a source location is known.
///
/// Operators and conversions on [`Value`](crate::Value) return this; the
/// evaluator binds it to the node and frame being evaluated with [`OpError::at`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {details}")]
pub struct OpError {
    /// Error category
    pub kind: RuntimeErrorKind,
    /// Human-readable explanation
    pub details: String,
}

impl OpError {
    /// Create an operation error.
    pub fn new(kind: RuntimeErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: details.into(),
        }
    }

    /// Shorthand for a [`RuntimeErrorKind::Type`] error.
    pub fn type_error(details: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Type, details)
    }

    /// Type error for a builtin argument, e.g.
    /// "first argument of built-in function 'append' must be a list, not int."
    pub fn argument_type(function: &str, ordinal: usize, expected: &str, got: &str) -> Self {
        Self::type_error(format!(
            "{} argument of built-in function '{}' must be {}, not {}.",
            ordinal_word(ordinal),
            function,
            expected,
            got
        ))
    }

    /// Bind this error to a source span and frame.
    pub fn at(self, span: &Span, context: &Rc<Context>) -> RuntimeError {
        RuntimeError::new(
            self.kind,
            self.details,
            span.start.clone(),
            span.end.clone(),
            Rc::clone(context),
        )
    }
}

/// A runtime error with the frame it was raised in.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {details}")]
pub struct RuntimeError {
    /// Error category
    pub kind: RuntimeErrorKind,
    /// Human-readable explanation
    pub details: String,
    /// Start of the failing construct
    pub pos_start: Position,
    /// End of the failing construct
    pub pos_end: Position,
    /// Frame the error was raised in; its ancestors form the traceback
    pub context: Rc<Context>,
}

impl RuntimeError {
    /// Create a runtime error.
    pub fn new(
        kind: RuntimeErrorKind,
        details: impl Into<String>,
        pos_start: Position,
        pos_end: Position,
        context: Rc<Context>,
    ) -> Self {
        Self {
            kind,
            details: details.into(),
            pos_start,
            pos_end,
            context,
        }
    }

    /// Create a runtime error covering a span.
    pub fn at(
        kind: RuntimeErrorKind,
        details: impl Into<String>,
        span: &Span,
        context: &Rc<Context>,
    ) -> Self {
        Self::new(
            kind,
            details,
            span.start.clone(),
            span.end.clone(),
            Rc::clone(context),
        )
    }

    /// Traceback lines, outermost frame first, before repetition collapsing.
    pub fn traceback_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut pos = Some(self.pos_start.clone());
        let mut context = Some(Rc::clone(&self.context));

        while let (Some(p), Some(ctx)) = (pos, context) {
            lines.push(format!(
                "  In file {}, line {}, in {}:",
                p.file_name,
                p.display_line(),
                ctx.display_name
            ));
            pos = ctx.parent_entry_pos.clone();
            context = ctx.parent.clone();
        }

        lines.reverse();
        lines
    }

    /// Full report: traceback, source excerpt and `<Kind>: <details>`.
    pub fn render(&self) -> String {
        let mut out = String::from("Traceback (most recent call last):\n");
        for line in collapse_repeated(&self.traceback_lines()) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&excerpt(&self.pos_start, &self.pos_end));
        out.push_str(&format!("{}: {}", self.kind, self.details));
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Evaluation channel
// ═══════════════════════════════════════════════════════════════════════

/// The `Err` side of evaluation: a runtime error or a control signal.
///
/// Control signals (`return`, `break`, `continue`, `exit`) travel on the
/// error channel so that `?` aborts statement sequences for them too; loops
/// and calls intercept the signals addressed to them.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// A runtime error
    Runtime(Box<RuntimeError>),
    /// A non-local control transfer
    ControlFlow(ControlFlow),
}

impl EvalError {
    /// The runtime error, if this is one.
    pub fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            EvalError::Runtime(e) => Some(e),
            EvalError::ControlFlow(_) => None,
        }
    }
}

impl From<RuntimeError> for EvalError {
    fn from(e: RuntimeError) -> Self {
        EvalError::Runtime(Box::new(e))
    }
}

impl From<ControlFlow> for EvalError {
    fn from(cf: ControlFlow) -> Self {
        EvalError::ControlFlow(cf)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Runtime(e) => write!(f, "{}", e),
            EvalError::ControlFlow(cf) => write!(f, "uncaught control signal: {:?}", cf),
        }
    }
}

impl std::error::Error for EvalError {}

// ═══════════════════════════════════════════════════════════════════════
// Top-level error
// ═══════════════════════════════════════════════════════════════════════

/// Main error type for running Quill source.
#[derive(Error, Debug)]
pub enum QuillError {
    /// Lexing failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Evaluation failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The script called `exit`
    #[error("exit requested with code {code}")]
    Exit {
        /// Requested process exit code
        code: i32,
    },

    /// A source file could not be read
    #[error("could not read {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl QuillError {
    /// Full report suitable for printing to a terminal.
    pub fn render(&self) -> String {
        match self {
            QuillError::Lex(e) => e.render(),
            QuillError::Syntax(e) => e.render(),
            QuillError::Runtime(e) => e.render(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

// ═══════════════════════════════════════════════════════════════════════
// Rendering helpers
// ═══════════════════════════════════════════════════════════════════════

fn render_located(kind: &str, details: &str, start: &Position, end: &Position) -> String {
    format!(
        "In file {}, line {}:\n{}{}: {}",
        start.file_name,
        start.display_line(),
        excerpt(start, end),
        kind,
        details
    )
}

/// Source lines between two positions with a `^` underline per line.
pub fn excerpt(start: &Position, end: &Position) -> String {
    let lines: Vec<&str> = start.file_text.split('\n').collect();

    // A span ending at column 0 stops at the end of the previous line.
    let (last_line, last_column) = if end.line > start.line && end.column == 0 {
        (end.line - 1, None)
    } else {
        (end.line.max(start.line), Some(end.column))
    };

    let mut out = String::new();
    for line_no in start.line..=last_line {
        let Some(line) = lines.get(line_no) else {
            break;
        };
        let line = line.trim_end_matches('\r');
        let width = line.chars().count();

        let col_start = if line_no == start.line { start.column } else { 0 };
        let col_end = match (line_no == last_line, last_column) {
            (true, Some(col)) => col,
            _ => width,
        };
        let col_end = col_end.max(col_start + 1);

        out.push('\t');
        out.push_str(line);
        out.push('\n');
        out.push('\t');
        out.push_str(&" ".repeat(col_start));
        out.push_str(&"^".repeat(col_end - col_start));
        out.push('\n');
    }
    out
}

/// Collapse runs of more than five identical lines into a repetition marker.
pub fn collapse_repeated(lines: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let mut run = 1;
        while i + run < lines.len() && lines[i + run] == lines[i] {
            run += 1;
        }

        for _ in 0..run.min(MAX_REPEATED_FRAMES) {
            out.push(lines[i].clone());
        }
        if run > MAX_REPEATED_FRAMES {
            out.push(format!(
                "  (repeated {} more times)",
                run - MAX_REPEATED_FRAMES
            ));
        }
        i += run;
    }

    out
}

fn ordinal_word(n: usize) -> String {
    const WORDS: [&str; 10] = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth",
    ];
    if (1..=10).contains(&n) {
        return WORDS[n - 1].to_string();
    }
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(text: &str, line: usize, column: usize) -> Position {
        let mut p = Position::start_of("test.ql", text);
        p.line = line;
        p.column = column;
        p
    }

    #[test]
    fn test_excerpt_underlines_span() {
        let text = "var x = 1 / 0";
        let out = excerpt(&pos(text, 0, 8), &pos(text, 0, 13));
        assert_eq!(out, "\tvar x = 1 / 0\n\t        ^^^^^\n");
    }

    #[test]
    fn test_excerpt_multiline_span() {
        let text = "if a then\n  b\nend";
        let out = excerpt(&pos(text, 0, 0), &pos(text, 2, 3));
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("\tend\n\t^^^\n"));
    }

    #[test]
    fn test_collapse_repeated_keeps_five() {
        let lines: Vec<String> = std::iter::repeat("  In file f, line 1, in f:".to_string())
            .take(10)
            .collect();
        let collapsed = collapse_repeated(&lines);
        assert_eq!(collapsed.len(), 6);
        assert_eq!(collapsed[5], "  (repeated 5 more times)");
    }

    #[test]
    fn test_collapse_leaves_short_runs() {
        let lines: Vec<String> = vec!["a".into(), "a".into(), "b".into()];
        assert_eq!(collapse_repeated(&lines), lines);
    }

    #[test]
    fn test_argument_type_message() {
        let e = OpError::argument_type("append", 1, "a list", "int");
        assert_eq!(
            e.details,
            "first argument of built-in function 'append' must be a list, not int."
        );
        assert_eq!(e.kind, RuntimeErrorKind::Type);
    }

    #[test]
    fn test_ordinal_words_past_ten() {
        assert_eq!(ordinal_word(3), "third");
        assert_eq!(ordinal_word(11), "11th");
        assert_eq!(ordinal_word(12), "12th");
        assert_eq!(ordinal_word(13), "13th");
        assert_eq!(ordinal_word(21), "21st");
        assert_eq!(ordinal_word(22), "22nd");
        assert_eq!(ordinal_word(23), "23rd");
        assert_eq!(ordinal_word(111), "111th");
        assert_eq!(ordinal_word(102), "102nd");
    }

    #[test]
    fn test_lex_error_render() {
        let text = "1 § 2";
        let e = LexError::new(
            LexErrorKind::IllegalCharacter,
            "U+00A7 (SECTION SIGN) '§'",
            pos(text, 0, 2),
            pos(text, 0, 3),
        );
        assert_eq!(
            e.render(),
            "In file test.ql, line 1:\n\t1 § 2\n\t  ^\nIllegalCharError: U+00A7 (SECTION SIGN) '§'"
        );
    }
}
