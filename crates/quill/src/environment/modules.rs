//! Native modules available to `import`

use indexmap::IndexMap;

use super::prelude::number_arg;
use crate::error::{EvalError, OpError, RuntimeErrorKind};
use crate::value::{BuiltinCall, BuiltinFunction, Value};

/// Export table of the native module `name`, if one exists.
pub fn native_module(name: &str) -> Option<IndexMap<String, Value>> {
    match name {
        "math" => Some(math()),
        _ => None,
    }
}

fn math() -> IndexMap<String, Value> {
    let mut exports = IndexMap::new();
    exports.insert("pi".to_string(), Value::Float(std::f64::consts::PI));
    exports.insert("e".to_string(), Value::Float(std::f64::consts::E));

    let functions = [
        BuiltinFunction::new("sqrt", &["x"], math_sqrt),
        BuiltinFunction::new("floor", &["x"], math_floor),
        BuiltinFunction::new("ceil", &["x"], math_ceil),
        BuiltinFunction::new("sin", &["x"], math_sin),
        BuiltinFunction::new("cos", &["x"], math_cos),
        BuiltinFunction::new("abs", &["x"], math_abs),
    ];
    for function in functions {
        exports.insert(function.name.to_string(), function.into_value());
    }
    exports
}

fn math_sqrt(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let x = number_arg(call, "sqrt", 1, &args[0])?;
    if x < 0.0 {
        return Err(call.arg_error(
            1,
            OpError::new(RuntimeErrorKind::Arithmetic, "math domain error."),
        ));
    }
    Ok(Value::Float(x.sqrt()))
}

fn math_floor(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    if let Value::Int(_) = args[0] {
        return Ok(args[0].clone());
    }
    let x = number_arg(call, "floor", 1, &args[0])?;
    call.check(Value::Float(x.floor()).to_int())
}

fn math_ceil(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    if let Value::Int(_) = args[0] {
        return Ok(args[0].clone());
    }
    let x = number_arg(call, "ceil", 1, &args[0])?;
    call.check(Value::Float(x.ceil()).to_int())
}

fn math_sin(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let x = number_arg(call, "sin", 1, &args[0])?;
    Ok(Value::Float(x.sin()))
}

fn math_cos(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let x = number_arg(call, "cos", 1, &args[0])?;
    Ok(Value::Float(x.cos()))
}

fn math_abs(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Int(n) => n.checked_abs().map(Value::Int).ok_or_else(|| {
            call.error(OpError::new(
                RuntimeErrorKind::Overflow,
                "result of 'abs' is too large to represent.",
            ))
        }),
        other => Ok(Value::Float(number_arg(call, "abs", 1, other)?.abs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_exports() {
        let math = native_module("math").unwrap();
        for name in ["pi", "e", "sqrt", "floor", "ceil", "sin", "cos", "abs"] {
            assert!(math.contains_key(name), "missing {}", name);
        }
        assert!(native_module("nope").is_none());
    }
}
