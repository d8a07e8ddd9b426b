//! Conversions, indexing and iteration

use super::ops::index_error;
use super::Value;
use crate::error::{OpError, RuntimeErrorKind};

/// Map a possibly negative index onto `0..len`.
pub(crate) fn normalize_index(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let i = if index < 0 { index + len } else { index };
    if (0..len).contains(&i) {
        usize::try_from(i).ok()
    } else {
        None
    }
}

impl Value {
    /// `str()` conversion.
    pub fn to_str(&self) -> Result<Value, OpError> {
        match self {
            Value::Str(_) => Ok(self.clone()),
            other => Ok(Value::string(other.to_string())),
        }
    }

    /// `int()` conversion: floats truncate, strings are parsed.
    pub fn to_int(&self) -> Result<Value, OpError> {
        match self {
            Value::Int(_) => Ok(self.clone()),
            Value::Float(x) => {
                let t = x.trunc();
                if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Ok(Value::Int(t as i64))
                } else {
                    Err(OpError::new(
                        RuntimeErrorKind::Overflow,
                        format!("cannot convert float {:?} to int.", x),
                    ))
                }
            }
            Value::Str(s) => s
                .trim()
                .replace('_', "")
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| {
                    OpError::new(
                        RuntimeErrorKind::RunTime,
                        format!("invalid literal for int(): {:?}.", s.as_ref()),
                    )
                }),
            other => Err(conversion_error("int", other)),
        }
    }

    /// `float()` conversion.
    pub fn to_float(&self) -> Result<Value, OpError> {
        match self {
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Float(_) => Ok(self.clone()),
            Value::Str(s) => s
                .trim()
                .replace('_', "")
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| {
                    OpError::new(
                        RuntimeErrorKind::RunTime,
                        format!("invalid literal for float(): {:?}.", s.as_ref()),
                    )
                }),
            other => Err(conversion_error("float", other)),
        }
    }

    /// `list()` conversion: copies a list into a new handle, splits a
    /// string into characters.
    pub fn to_list(&self) -> Result<Value, OpError> {
        match self {
            Value::List(_) | Value::Str(_) => Ok(Value::list(self.iter_items()?)),
            other => Err(conversion_error("list", other)),
        }
    }

    /// Element of a list or character of a string; negative indices count
    /// from the end.
    pub fn index(&self, index: &Value) -> Result<Value, OpError> {
        let Value::Int(i) = index else {
            return Err(OpError::type_error(format!(
                "{} indices must be integers, not {}.",
                self.type_name(),
                index.type_name()
            )));
        };

        match self {
            Value::List(items) => {
                let items = items.borrow();
                normalize_index(items.len(), *i)
                    .map(|n| items[n].clone())
                    .ok_or_else(|| index_error(*i))
            }
            Value::Str(s) => {
                let len = s.chars().count();
                normalize_index(len, *i)
                    .and_then(|n| s.chars().nth(n))
                    .map(|c| Value::string(c.to_string()))
                    .ok_or_else(|| index_error(*i))
            }
            other => Err(OpError::type_error(format!(
                "'{}' object is not subscriptable.",
                other.type_name()
            ))),
        }
    }

    /// Items visited by `for x in value`: list elements (a snapshot) or
    /// one-character strings.
    pub fn iter_items(&self) -> Result<Vec<Value>, OpError> {
        match self {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            other => Err(OpError::type_error(format!(
                "'{}' object is not iterable.",
                other.type_name()
            ))),
        }
    }

    /// Number of elements or characters.
    pub fn length(&self) -> Result<usize, OpError> {
        match self {
            Value::List(items) => Ok(items.borrow().len()),
            Value::Str(s) => Ok(s.chars().count()),
            other => Err(OpError::type_error(format!(
                "object of type '{}' has no len().",
                other.type_name()
            ))),
        }
    }
}

fn conversion_error(target: &str, value: &Value) -> OpError {
    OpError::type_error(format!(
        "{}() argument must be a string or a number, not '{}'.",
        target,
        value.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(3, 0), Some(0));
        assert_eq!(normalize_index(3, -1), Some(2));
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(3, -4), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn test_to_int() {
        assert_eq!(Value::Float(-2.7).to_int().unwrap(), Value::Int(-2));
        assert_eq!(Value::string(" 42 ").to_int().unwrap(), Value::Int(42));
        assert_eq!(
            Value::string("abc").to_int().unwrap_err().kind,
            RuntimeErrorKind::RunTime
        );
        assert_eq!(
            Value::None.to_int().unwrap_err().kind,
            RuntimeErrorKind::Type
        );
        assert_eq!(
            Value::Float(f64::INFINITY).to_int().unwrap_err().kind,
            RuntimeErrorKind::Overflow
        );
    }

    #[test]
    fn test_to_list_copies() {
        let original = Value::list(vec![Value::Int(1)]);
        let copy = original.to_list().unwrap();
        if let Value::List(items) = &copy {
            items.borrow_mut().push(Value::Int(2));
        }
        assert_eq!(original.length().unwrap(), 1);
        assert_eq!(
            Value::string("ab").to_list().unwrap(),
            Value::list(vec![Value::string("a"), Value::string("b")])
        );
    }

    #[test]
    fn test_index() {
        let list = Value::list(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(list.index(&Value::Int(-1)).unwrap(), Value::Int(20));
        assert_eq!(
            list.index(&Value::Int(2)).unwrap_err().kind,
            RuntimeErrorKind::Index
        );
        assert_eq!(
            Value::string("héllo").index(&Value::Int(1)).unwrap(),
            Value::string("é")
        );
    }
}
