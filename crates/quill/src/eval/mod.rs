//! Expression evaluation

pub mod access;
pub mod assign;
pub mod binary;
pub mod call;
pub mod class;
pub mod control;
pub mod frame;
pub mod function;
pub mod if_expr;
pub mod import;
pub mod io;
pub mod literal;
pub mod loops;
pub mod stmt;
pub mod unary;

pub use control::ControlFlow;
pub use frame::CallGuard;

use std::rc::Rc;

use crate::ast::Node;
use crate::context::Context;
use crate::error::{EvalError, OpError};
use crate::evaluator::Interpreter;
use crate::position::Span;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter. Each node
/// struct implements it; [`Node`] dispatches to them.
pub trait Evaluate {
    /// Evaluate this node in the given frame.
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Node {
    fn eval(&self, interp: &mut Interpreter, ctx: &Rc<Context>) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| match self {
            // Literals
            Node::Number(node) => node.eval(interp, ctx),
            Node::Str(node) => node.eval(interp, ctx),
            Node::List(node) => node.eval(interp, ctx),
            Node::Default(node) => node.eval(interp, ctx),

            // Names and attributes
            Node::VarAccess(node) => node.eval(interp, ctx),
            Node::DebugPrint(node) => node.eval(interp, ctx),
            Node::Attribute(node) => node.eval(interp, ctx),
            Node::VarAssign(node) => node.eval(interp, ctx),
            Node::Delete(node) => node.eval(interp, ctx),

            // Operators
            Node::BinOp(node) => node.eval(interp, ctx),
            Node::Compare(node) => node.eval(interp, ctx),
            Node::UnaryOp(node) => node.eval(interp, ctx),
            Node::Fallback(node) => node.eval(interp, ctx),

            // Control flow
            Node::If(node) => node.eval(interp, ctx),
            Node::For(node) => node.eval(interp, ctx),
            Node::ForIn(node) => node.eval(interp, ctx),
            Node::While(node) => node.eval(interp, ctx),
            Node::DoWhile(node) => node.eval(interp, ctx),
            Node::Loop(node) => node.eval(interp, ctx),
            Node::Return(node) => node.eval(interp, ctx),
            Node::Break(node) => node.eval(interp, ctx),
            Node::Continue(node) => node.eval(interp, ctx),

            // Functions and classes
            Node::FuncDef(node) => node.eval(interp, ctx),
            Node::ClassDef(node) => node.eval(interp, ctx),
            Node::Call(node) => node.eval(interp, ctx),

            // Modules and I/O
            Node::Import(node) => node.eval(interp, ctx),
            Node::Export(node) => node.eval(interp, ctx),
            Node::Write(node) => node.eval(interp, ctx),
            Node::Read(node) => node.eval(interp, ctx),

            // Statements
            Node::Assert(node) => node.eval(interp, ctx),
            Node::Statements(node) => node.eval(interp, ctx),
        })
    }
}

/// Attach a source span and frame to a value-level failure.
pub(crate) trait AtSpan<T> {
    fn at(self, span: &Span, ctx: &Rc<Context>) -> Result<T, EvalError>;
}

impl<T> AtSpan<T> for Result<T, OpError> {
    fn at(self, span: &Span, ctx: &Rc<Context>) -> Result<T, EvalError> {
        self.map_err(|e| e.at(span, ctx).into())
    }
}
