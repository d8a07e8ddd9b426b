//! Operator protocol
//!
//! Every operator returns `Result<Value, OpError>`: type mismatches,
//! division by zero and overflow are ordinary errors, never panics. Integer
//! arithmetic is checked; floats promote and only fail when a finite
//! computation overflows to infinity.

use std::cmp::Ordering;

use super::Value;
use crate::ast::{BinaryOp, CompareOp, UnaryOp};
use crate::error::{OpError, RuntimeErrorKind};

type OpResult = Result<Value, OpError>;

impl Value {
    /// Apply a binary operator.
    ///
    /// `and`/`or` are evaluated eagerly here; the evaluator short-circuits
    /// them before reaching this point.
    pub fn binary_op(&self, op: BinaryOp, other: &Value) -> OpResult {
        match op {
            BinaryOp::Add => self.add(other),
            BinaryOp::Sub => self.sub(other),
            BinaryOp::Mul => self.mul(other),
            BinaryOp::Div => self.div(other),
            BinaryOp::FloorDiv => self.floor_div(other),
            BinaryOp::Mod => self.rem(other),
            BinaryOp::Pow => self.pow(other),
            BinaryOp::Exponent => self.exponent(other),
            BinaryOp::BitOr => self.bitwise(op, other, |a, b| a | b),
            BinaryOp::BitAnd => self.bitwise(op, other, |a, b| a & b),
            BinaryOp::BitXor => self.bitwise(op, other, |a, b| a ^ b),
            BinaryOp::And => Ok(Value::bool(self.is_truthy() && other.is_truthy())),
            BinaryOp::Or => Ok(Value::bool(self.is_truthy() || other.is_truthy())),
            BinaryOp::Xor => Ok(Value::bool(self.is_truthy() != other.is_truthy())),
        }
    }

    /// Apply a unary operator.
    pub fn unary_op(&self, op: UnaryOp) -> OpResult {
        match (op, self) {
            (UnaryOp::Not, v) => Ok(Value::bool(!v.is_truthy())),
            (UnaryOp::Neg, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| overflow("-")),
            (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOp::Pos, Value::Int(_) | Value::Float(_)) => Ok(self.clone()),
            (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
            (op, v) => Err(OpError::type_error(format!(
                "bad operand type for unary {}: '{}'.",
                op.as_str(),
                v.type_name()
            ))),
        }
    }

    /// `+`: numeric addition, string concatenation, or list append.
    pub fn add(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_add(*b), "+"),
            (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{}{}", a, b))),
            (Value::List(items), item) => {
                let mut items = items.borrow().clone();
                items.push(item.clone());
                Ok(Value::list(items))
            }
            _ => self.float_op(BinaryOp::Add, other, |a, b| a + b),
        }
    }

    /// `-`: numeric subtraction, or list without the given index.
    pub fn sub(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_sub(*b), "-"),
            (Value::List(items), Value::Int(index)) => {
                let mut items = items.borrow().clone();
                let i = super::convert::normalize_index(items.len(), *index)
                    .ok_or_else(|| index_error(*index))?;
                items.remove(i);
                Ok(Value::list(items))
            }
            _ => self.float_op(BinaryOp::Sub, other, |a, b| a - b),
        }
    }

    /// `*`: numeric product, string or list repetition, list concatenation.
    pub fn mul(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_mul(*b), "*"),
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                let count = repeat_count(s.len(), *n)?;
                Ok(Value::string(s.repeat(count)))
            }
            (Value::List(a), Value::List(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::list(items))
            }
            (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items)) => {
                let items = items.borrow();
                let count = repeat_count(items.len(), *n)?;
                let mut repeated = Vec::with_capacity(items.len() * count);
                for _ in 0..count {
                    repeated.extend(items.iter().cloned());
                }
                Ok(Value::list(repeated))
            }
            _ => self.float_op(BinaryOp::Mul, other, |a, b| a * b),
        }
    }

    /// `/`: always produces a float.
    pub fn div(&self, other: &Value) -> OpResult {
        let (a, b) = self.float_operands(BinaryOp::Div, other)?;
        if b == 0.0 {
            return Err(zero_division("division by zero."));
        }
        finite(a / b, a, b, "/")
    }

    /// `//`: division rounded toward negative infinity.
    pub fn floor_div(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(zero_division("integer division by zero.")),
            (Value::Int(a), Value::Int(b)) => {
                let q = a.checked_div(*b).ok_or_else(|| overflow("//"))?;
                if a % b != 0 && ((*a < 0) != (*b < 0)) {
                    Ok(Value::Int(q - 1))
                } else {
                    Ok(Value::Int(q))
                }
            }
            _ => {
                let (a, b) = self.float_operands(BinaryOp::FloorDiv, other)?;
                if b == 0.0 {
                    return Err(zero_division("integer division by zero."));
                }
                finite((a / b).floor(), a, b, "//")
            }
        }
    }

    /// `%`: remainder taking the sign of the divisor.
    pub fn rem(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(zero_division("modulo by zero.")),
            (Value::Int(a), Value::Int(b)) => {
                let r = a.wrapping_rem(*b);
                if r != 0 && ((r < 0) != (*b < 0)) {
                    Ok(Value::Int(r + b))
                } else {
                    Ok(Value::Int(r))
                }
            }
            _ => {
                let (a, b) = self.float_operands(BinaryOp::Mod, other)?;
                if b == 0.0 {
                    return Err(zero_division("modulo by zero."));
                }
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                    Ok(Value::Float(r + b))
                } else {
                    Ok(Value::Float(r))
                }
            }
        }
    }

    /// `^`: integer power for non-negative int exponents, float otherwise.
    pub fn pow(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(base), Value::Int(exp)) if *exp >= 0 => int_pow(*base, *exp),
            (Value::Int(0), Value::Int(_)) => Err(zero_division(
                "zero cannot be raised to a negative power.",
            )),
            _ => {
                let (a, b) = self.float_operands(BinaryOp::Pow, other)?;
                if a == 0.0 && b < 0.0 {
                    return Err(zero_division("zero cannot be raised to a negative power."));
                }
                let r = a.powf(b);
                if r.is_nan() && !a.is_nan() && !b.is_nan() {
                    return Err(OpError::new(
                        RuntimeErrorKind::Arithmetic,
                        "math domain error.",
                    ));
                }
                finite(r, a, b, "^")
            }
        }
    }

    /// Scientific-notation suffix: `self * 10 ^ other`.
    pub fn exponent(&self, other: &Value) -> OpResult {
        match (self, other) {
            (Value::Int(base), Value::Int(exp)) if *exp >= 0 => {
                let scale = u32::try_from(*exp)
                    .ok()
                    .and_then(|e| 10i64.checked_pow(e));
                checked(scale.and_then(|s| base.checked_mul(s)), "e")
            }
            _ => {
                let (a, b) = self.float_operands(BinaryOp::Exponent, other)?;
                finite(a * 10f64.powf(b), a, b, "e")
            }
        }
    }

    fn bitwise(&self, op: BinaryOp, other: &Value, f: fn(i64, i64) -> i64) -> OpResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(f(*a, *b))),
            _ => Err(unsupported(op, self, other)),
        }
    }

    fn float_operands(&self, op: BinaryOp, other: &Value) -> Result<(f64, f64), OpError> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(unsupported(op, self, other)),
        }
    }

    fn float_op(&self, op: BinaryOp, other: &Value, f: fn(f64, f64) -> f64) -> OpResult {
        let (a, b) = self.float_operands(op, other)?;
        finite(f(a, b), a, b, op.as_str())
    }
}

/// Evaluate one comparison.
///
/// `==` and `!=` never fail; ordering is defined between numbers and
/// between strings only.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, OpError> {
    match op {
        CompareOp::Eq => return Ok(left == right),
        CompareOp::NotEq => return Ok(left != right),
        _ => {}
    }

    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                return Err(OpError::type_error(format!(
                    "'{}' not supported between instances of '{}' and '{}'.",
                    op.as_str(),
                    left.type_name(),
                    right.type_name()
                )))
            }
        },
    };

    // NaN compares false under every ordering
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
    })
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn int_pow(base: i64, exp: i64) -> OpResult {
    match base {
        0 | 1 => Ok(Value::Int(if exp == 0 { 1 } else { base })),
        -1 => Ok(Value::Int(if exp % 2 == 0 { 1 } else { -1 })),
        _ => {
            let result = u32::try_from(exp).ok().and_then(|e| base.checked_pow(e));
            checked(result, "^")
        }
    }
}

fn checked(result: Option<i64>, op: &str) -> OpResult {
    result.map(Value::Int).ok_or_else(|| overflow(op))
}

fn finite(result: f64, a: f64, b: f64, op: &str) -> OpResult {
    if result.is_infinite() && a.is_finite() && b.is_finite() {
        Err(overflow(op))
    } else {
        Ok(Value::Float(result))
    }
}

fn repeat_count(len: usize, n: i64) -> Result<usize, OpError> {
    let count = usize::try_from(n.max(0)).map_err(|_| repeat_too_long())?;
    match len.checked_mul(count) {
        Some(total) if total <= isize::MAX as usize => Ok(count),
        _ => Err(repeat_too_long()),
    }
}

fn repeat_too_long() -> OpError {
    OpError::new(RuntimeErrorKind::Overflow, "repeated sequence is too long.")
}

fn overflow(op: &str) -> OpError {
    OpError::new(
        RuntimeErrorKind::Overflow,
        format!("result of '{}' is too large to represent.", op),
    )
}

fn zero_division(details: &str) -> OpError {
    OpError::new(RuntimeErrorKind::Arithmetic, details)
}

pub(super) fn index_error(index: i64) -> OpError {
    OpError::new(
        RuntimeErrorKind::Index,
        format!("index {} is out of range.", index),
    )
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> OpError {
    OpError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'.",
        op.as_str(),
        left.type_name(),
        right.type_name()
    ))
}
