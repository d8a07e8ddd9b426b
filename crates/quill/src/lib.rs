//! # Quill
//!
//! A tree-walking interpreter for the Quill scripting language.
//!
//! Source text goes through three stages, each usable on its own:
//!
//! ```text
//! text → [lexer::tokenize] → tokens → [parser::parse] → Node → [Interpreter] → Value
//! ```
//!
//! ## Architecture
//!
//! - **Lexer**: single forward pass producing [`Token`]s, with `@meta`
//!   directives carried between calls in [`Metas`]
//! - **Parser**: recursive descent with backtracking, producing an immutable
//!   [`Node`] tree
//! - **Runtime**: [`Value`]s, chained [`SymbolTable`]s and per-call
//!   [`Context`] frames that double as the traceback
//! - **Evaluator**: the [`Evaluate`] trait implemented per node; errors and
//!   control signals share the `Err` channel as [`EvalError`]
//!
//! ## Example
//!
//! ```
//! use quill::{EvalConfig, Interpreter, SharedOutput, Value};
//!
//! let out = SharedOutput::new();
//! let mut interp = Interpreter::new(EvalConfig::default()).with_output(out.clone());
//!
//! let value = interp
//!     .run("<example>", "def square(x) -> x * x\nprint(square(7))\nsquare(3)")
//!     .unwrap();
//!
//! assert_eq!(value, Value::Int(9));
//! assert_eq!(out.contents(), "49\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod config;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod stack;
pub mod suggest;
pub mod token;
pub mod value;

// Re-export main types
pub use ast::Node;
pub use config::EvalConfig;
pub use context::Context;
pub use environment::{build_standard_environment, native_module, SymbolTable};
pub use error::{
    EvalError, LexError, LexErrorKind, OpError, QuillError, Result, RuntimeError,
    RuntimeErrorKind, SyntaxError,
};
pub use eval::{ControlFlow, Evaluate};
pub use evaluator::{Interpreter, SharedOutput};
pub use lexer::{tokenize, Metas};
pub use parser::{parse, ParseResult, Parser};
pub use position::{Position, Span};
pub use token::{Keyword, Token, TokenKind};
pub use value::{
    BuiltinCall, BuiltinFnPtr, BuiltinFunction, Constructor, ContextMode, Function, Method,
    Module, Object, Value,
};

/// Quill version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
