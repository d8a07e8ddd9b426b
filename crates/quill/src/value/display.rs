//! Display and Debug implementations for Value
//!
//! `Display` is the `str()` form (strings unquoted); `Debug` is the repr
//! used by `$name`, list elements and the REPL (strings quoted).

use std::fmt;

use super::*;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s.as_ref()),
            Value::None => write!(f, "None"),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Module(m) => write!(f, "{:?}", m),
            Value::Constructor(c) => write!(f, "{:?}", c),
            Value::Object(o) => write!(f, "{:?}", o),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Method(m) => write!(f, "{:?}", m),
            Value::Builtin(b) => write!(f, "{:?}", b),
        }
    }
}

impl Value {
    /// The quoted, repr form of the value.
    pub fn repr(&self) -> String {
        format!("{:?}", self)
    }
}

// Manual impls: these types sit in reference cycles (functions capture the
// tables that hold them), so derived Debug would not terminate.

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<module {}>", self.name)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object>", self.constructor.name)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<method {} of {} object>",
            self.function.name, self.receiver.constructor.name
        )
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in function {}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_vs_repr() {
        let s = Value::string("hi");
        assert_eq!(s.to_string(), "hi");
        assert_eq!(s.repr(), "\"hi\"");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_list_shows_element_reprs() {
        let list = Value::list(vec![Value::Int(1), Value::string("a"), Value::None]);
        assert_eq!(list.to_string(), "[1, \"a\", None]");
    }
}
