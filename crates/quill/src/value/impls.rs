//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// Create a list value with a fresh handle
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Create a boolean (1 or 0)
    pub fn bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Type Predicates
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Check if this is None
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Check if this is an int or a float
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Check if this is a string
    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Value Extractors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as f64, promoting ints
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to borrow the list elements
    pub fn as_list(&self) -> Option<Ref<'_, Vec<Value>>> {
        match self {
            Value::List(items) => Some(items.borrow()),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Equality
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }

            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::None, Value::None) => true,

            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }

            // Everything else compares by identity
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::Constructor(a), Value::Constructor(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Method(a), Value::Method(b)) => {
                Rc::ptr_eq(&a.function, &b.function) && Rc::ptr_eq(&a.receiver, &b.receiver)
            }
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(a, b),

            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_across_types() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
    }

    #[test]
    fn test_different_types_are_unequal() {
        assert_ne!(Value::Int(0), Value::None);
        assert_ne!(Value::string("1"), Value::Int(1));
    }

    #[test]
    fn test_lists_compare_by_content() {
        let a = Value::list(vec![Value::Int(1), Value::string("x")]);
        let b = Value::list(vec![Value::Int(1), Value::string("x")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Int(1));
        assert_eq!(Value::from("a"), Value::string("a"));
        assert_eq!(Value::from(vec![Value::None]).as_list().map(|l| l.len()), Some(1));
    }
}
