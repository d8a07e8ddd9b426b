//! Standard environment with built-in functions

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use super::SymbolTable;
use crate::error::{EvalError, OpError, RuntimeErrorKind};
use crate::eval::ControlFlow;
use crate::value::{normalize_index, BuiltinCall, BuiltinFunction, Value};

/// Build the root symbol table every program starts from.
pub fn build_standard_environment() -> Rc<SymbolTable> {
    let table = SymbolTable::new();

    // Constants
    table.set("True", Value::Int(1));
    table.set("False", Value::Int(0));
    table.set("None", Value::None);

    // Console
    define(
        &table,
        BuiltinFunction::new("print", &[], builtin_print)
            .with_optional("value", Value::string(""))
            .variadic(),
    );
    define(
        &table,
        BuiltinFunction::new("input", &[], builtin_input).with_optional("prompt", Value::string("")),
    );

    // Types and conversions
    define(&table, BuiltinFunction::new("type", &["value"], builtin_type));
    define(&table, BuiltinFunction::new("str", &["value"], builtin_str));
    define(&table, BuiltinFunction::new("int", &["value"], builtin_int));
    define(&table, BuiltinFunction::new("float", &["value"], builtin_float));
    define(&table, BuiltinFunction::new("list", &["value"], builtin_list));
    define(&table, BuiltinFunction::new("len", &["value"], builtin_len));

    // In-place list operations
    define(&table, BuiltinFunction::new("append", &["list", "value"], builtin_append));
    define(
        &table,
        BuiltinFunction::new("pop", &["list"], builtin_pop).with_optional("index", Value::Int(-1)),
    );
    define(
        &table,
        BuiltinFunction::new("insert", &["list", "index", "value"], builtin_insert),
    );
    define(&table, BuiltinFunction::new("extend", &["list", "other"], builtin_extend));
    define(&table, BuiltinFunction::new("reverse", &["list"], builtin_reverse));
    define(&table, BuiltinFunction::new("sort", &["list"], builtin_sort));

    // Introspection and process control
    define(
        &table,
        BuiltinFunction::new("defined", &["name"], builtin_defined).in_caller_context(),
    );
    define(
        &table,
        BuiltinFunction::new("exit", &[], builtin_exit).with_optional("code", Value::Int(0)),
    );

    Rc::new(table)
}

fn define(table: &SymbolTable, builtin: BuiltinFunction) {
    table.set(builtin.name, builtin.into_value());
}

// ═══════════════════════════════════════════════════════════════════════
// Argument helpers
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn list_arg(
    call: &BuiltinCall<'_>,
    function: &str,
    ordinal: usize,
    value: &Value,
) -> Result<Rc<RefCell<Vec<Value>>>, EvalError> {
    match value {
        Value::List(items) => Ok(Rc::clone(items)),
        other => Err(call.arg_error(
            ordinal,
            OpError::argument_type(function, ordinal, "a list", &other.type_name()),
        )),
    }
}

pub(super) fn int_arg(
    call: &BuiltinCall<'_>,
    function: &str,
    ordinal: usize,
    value: &Value,
) -> Result<i64, EvalError> {
    value.as_int().ok_or_else(|| {
        call.arg_error(
            ordinal,
            OpError::argument_type(function, ordinal, "an int", &value.type_name()),
        )
    })
}

pub(super) fn number_arg(
    call: &BuiltinCall<'_>,
    function: &str,
    ordinal: usize,
    value: &Value,
) -> Result<f64, EvalError> {
    value.as_f64().ok_or_else(|| {
        call.arg_error(
            ordinal,
            OpError::argument_type(function, ordinal, "a number", &value.type_name()),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn builtin_print(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let mut line = args[0].to_string();
    if let Some(extras) = args[1].as_list() {
        for extra in extras.iter() {
            line.push(' ');
            line.push_str(&extra.to_string());
        }
    }
    line.push('\n');

    call.interpreter
        .write_output(&line)
        .map_err(|e| call.error(OpError::new(RuntimeErrorKind::Native, e.to_string())))?;
    Ok(Value::None)
}

fn builtin_input(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let prompt = args[0].to_string();
    let native = |e: std::io::Error| OpError::new(RuntimeErrorKind::Native, e.to_string());

    if !prompt.is_empty() {
        call.interpreter
            .write_output(&prompt)
            .map_err(|e| call.error(native(e)))?;
    }
    let line = call.interpreter.read_line().map_err(|e| call.error(native(e)))?;
    Ok(Value::string(line))
}

fn builtin_type(_call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    Ok(Value::string(args[0].type_name()))
}

fn builtin_str(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    call.check(args[0].to_str())
}

fn builtin_int(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    call.check(args[0].to_int())
}

fn builtin_float(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    call.check(args[0].to_float())
}

fn builtin_list(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    call.check(args[0].to_list())
}

fn builtin_len(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let len = call.check(args[0].length())?;
    Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
}

fn builtin_append(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "append", 1, &args[0])?;
    list.borrow_mut().push(args[1].clone());
    Ok(Value::None)
}

fn builtin_pop(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "pop", 1, &args[0])?;
    let index = int_arg(call, "pop", 2, &args[1])?;

    let len = list.borrow().len();
    let i = normalize_index(len, index).ok_or_else(|| {
        call.arg_error(
            2,
            OpError::new(
                RuntimeErrorKind::Index,
                format!("pop index {} is out of range.", index),
            ),
        )
    })?;
    let removed = list.borrow_mut().remove(i);
    Ok(removed)
}

fn builtin_insert(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "insert", 1, &args[0])?;
    let index = int_arg(call, "insert", 2, &args[1])?;

    let mut items = list.borrow_mut();
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let i = if index < 0 { (index + len).max(0) } else { index.min(len) };
    items.insert(usize::try_from(i).unwrap_or(0), args[2].clone());
    Ok(Value::None)
}

fn builtin_extend(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "extend", 1, &args[0])?;
    let other = list_arg(call, "extend", 2, &args[1])?;

    // Snapshot first: `extend(a, a)` borrows the same handle twice
    let extra = other.borrow().clone();
    list.borrow_mut().extend(extra);
    Ok(Value::None)
}

fn builtin_reverse(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "reverse", 1, &args[0])?;
    list.borrow_mut().reverse();
    Ok(Value::None)
}

fn builtin_sort(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let list = list_arg(call, "sort", 1, &args[0])?;
    let mut items = list.borrow_mut();

    if items.iter().all(Value::is_number) {
        items.sort_by(|a, b| {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        });
    } else if items.iter().all(Value::is_str) {
        items.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    } else {
        return Err(call.error(OpError::type_error(
            "sort() requires a list of only numbers or only strings.",
        )));
    }
    Ok(Value::None)
}

fn builtin_defined(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let Some(name) = args[0].as_str() else {
        return Err(call.arg_error(
            1,
            OpError::argument_type("defined", 1, "a str", &args[0].type_name()),
        ));
    };
    Ok(Value::bool(call.context.symbol_table.exists(name, true)))
}

fn builtin_exit(call: &mut BuiltinCall<'_>, args: Vec<Value>) -> Result<Value, EvalError> {
    let code = int_arg(call, "exit", 1, &args[0])?;
    let code = i32::try_from(code).unwrap_or(1);
    Err(ControlFlow::Exit { code }.into())
}
