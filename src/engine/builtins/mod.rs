//! The fixed builtin operator library.
//!
//! Builtins are not environment bindings. A call whose head is a bare symbol
//! with no binding in scope is dispatched through this table by name, so a
//! `define` of the same name shadows the builtin.

pub mod list;
pub mod math;

use crate::engine::eval::EvalError;
use crate::engine::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{error, instrument, trace};

/// A native operator. Arguments arrive already evaluated.
pub type BuiltinFn = fn(Vec<Value>) -> Result<Value, EvalError>;

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    HashMap::from([
        ("+", math::native_add as BuiltinFn),
        ("-", math::native_subtract),
        ("*", math::native_multiply),
        ("/", math::native_divide),
        ("=", math::native_equals),
        ("<", math::native_less_than),
        (">", math::native_greater_than),
        ("<=", math::native_less_than_or_equal),
        (">=", math::native_greater_than_or_equal),
        ("length", list::native_length),
        ("cons", list::native_cons),
        ("append", list::native_append),
        ("concat", list::native_concat),
        ("get", list::native_get),
        ("list", list::native_list),
        ("first", list::native_first),
        ("rest", list::native_rest),
        ("println", native_println),
        ("not", native_not),
    ])
});

/// True when `name` names a builtin operator.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// Looks up and invokes a builtin operator by name.
#[instrument(skip(arguments), fields(operator = %name, argc = arguments.len()), ret, err)]
pub fn dispatch(name: &str, arguments: Vec<Value>) -> Result<Value, EvalError> {
    match BUILTINS.get(name) {
        Some(builtin) => {
            trace!("Dispatching builtin operator");
            builtin(arguments)
        }
        None => {
            error!(operator = %name, "Unknown operator");
            Err(EvalError::UnknownOperator(name.to_string()))
        }
    }
}

/// `println`: renders the arguments, joins them with spaces, and prints the
/// line to stdout. Returns nil.
#[instrument(skip(args), ret, err)]
pub fn native_println(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'println'");
    let rendered: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Nil)
}

/// `not`: the negated truthiness of a single argument.
#[instrument(skip(args), ret, err)]
pub fn native_not(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'not'");
    expect_exact("not", &args, 1)?;
    Ok(Value::Bool(!args[0].is_true()?))
}

/// Checks an exact argument count.
pub(crate) fn expect_exact(op: &str, args: &[Value], count: usize) -> Result<(), EvalError> {
    if args.len() != count {
        let noun = if count == 1 { "argument" } else { "arguments" };
        let arity_error = EvalError::ArityMismatch(format!(
            "'{}' expects exactly {} {}, got {}",
            op,
            count,
            noun,
            args.len()
        ));
        error!(operator = %op, error = %arity_error, "Arity error in builtin");
        return Err(arity_error);
    }
    Ok(())
}

/// Checks a minimum argument count.
pub(crate) fn expect_at_least(op: &str, args: &[Value], count: usize) -> Result<(), EvalError> {
    if args.len() < count {
        let noun = if count == 1 { "argument" } else { "arguments" };
        let arity_error = EvalError::ArityMismatch(format!(
            "'{}' expects at least {} {}, got {}",
            op,
            count,
            noun,
            args.len()
        ));
        error!(operator = %op, error = %arity_error, "Arity error in builtin");
        return Err(arity_error);
    }
    Ok(())
}

/// Narrows a value to a number, naming the operator in the error.
pub(crate) fn extract_number(op: &str, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Number(number) => Ok(*number),
        other => {
            let type_error = EvalError::TypeMismatch {
                expected: "Number".to_string(),
                found: other.type_name().to_string(),
            };
            error!(operator = %op, error = %type_error, "Type error in builtin");
            Err(type_error)
        }
    }
}

/// Narrows a value to a list, naming the operator in the error.
pub(crate) fn extract_list<'a>(op: &str, value: &'a Value) -> Result<&'a [Value], EvalError> {
    match value {
        Value::List(items) => Ok(items),
        other => {
            let type_error = EvalError::TypeMismatch {
                expected: "List".to_string(),
                found: other.type_name().to_string(),
            };
            error!(operator = %op, error = %type_error, "Type error in builtin");
            Err(type_error)
        }
    }
}
