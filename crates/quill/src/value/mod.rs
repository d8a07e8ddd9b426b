//! Value representation for runtime values

mod callable;
mod class;
mod convert;
mod display;
mod impls;
mod ops;

pub use callable::{BuiltinCall, BuiltinFnPtr, BuiltinFunction, ContextMode, Function, Method};
pub use class::{Constructor, Module, Object};
pub use ops::compare;

pub(crate) use convert::normalize_index;

use std::cell::RefCell;
use std::rc::Rc;

/// Runtime value of a Quill expression.
///
/// Cloning a value is cheap: heap-backed variants clone a handle. Lists are
/// shared handles, so a list bound to two names is one list, and in-place
/// builtins (`append`, `sort`, ...) are visible through every binding.
/// Operators that produce lists (`+`, `*`, `-`) always build a new one.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// 64-bit signed integer; also the boolean type (1/0)
    Int(i64),

    /// 64-bit float
    Float(f64),

    /// Immutable string
    Str(Rc<str>),

    /// The absence of a value
    None,

    // ═══════════════════════════════════════════════════════════════════
    // Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Ordered, shared, mutable sequence
    List(Rc<RefCell<Vec<Value>>>),

    /// An imported module's exported bindings
    Module(Rc<Module>),

    // ═══════════════════════════════════════════════════════════════════
    // Classes and callables
    // ═══════════════════════════════════════════════════════════════════
    /// An evaluated class definition
    Constructor(Rc<Constructor>),

    /// An instance of a class
    Object(Rc<Object>),

    /// A user-defined function with its defining frame
    Function(Rc<Function>),

    /// A function bound to an object
    Method(Rc<Method>),

    /// A host function
    Builtin(Rc<BuiltinFunction>),
}

impl Value {
    /// Name of the value's type as shown in error messages and by `type()`.
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::None => "NoneType".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Module(_) => "module".to_string(),
            Value::Constructor(_) => "constructor".to_string(),
            Value::Object(object) => object.constructor.name.clone(),
            Value::Function(_) => "function".to_string(),
            Value::Method(_) => "method".to_string(),
            Value::Builtin(_) => "built-in function".to_string(),
        }
    }

    /// Truthiness: non-zero numbers and non-empty strings and lists are
    /// true, `None` is false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::None => false,
            _ => true,
        }
    }

    /// Whether calling this value is meaningful.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Method(_) | Value::Builtin(_) | Value::Constructor(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Int(3).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("x").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(Value::list(vec![Value::None]).is_truthy());
        assert!(!Value::None.is_truthy());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::string("a").type_name(), "str");
        assert_eq!(Value::None.type_name(), "NoneType");
        assert_eq!(Value::list(vec![]).type_name(), "list");
    }

    #[test]
    fn test_lists_share_their_handle() {
        let a = Value::list(vec![Value::Int(1)]);
        let b = a.clone();
        if let Value::List(items) = &b {
            items.borrow_mut().push(Value::Int(2));
        }
        assert_eq!(a, Value::list(vec![Value::Int(1), Value::Int(2)]));
    }
}
