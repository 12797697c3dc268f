//! Arithmetic and comparison builtins.

use crate::engine::builtins::{expect_at_least, expect_exact, extract_number};
use crate::engine::eval::EvalError;
use crate::engine::value::Value;
use tracing::trace;

/// `+` folds left from zero.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_add(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin '+'");
    expect_at_least("+", &args, 1)?;
    let mut sum = 0.0;
    for arg in &args {
        sum += extract_number("+", arg)?;
    }
    Ok(Value::Number(sum))
}

/// `-` seeds from its first argument, so `(- 5)` is 5, not negation.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_subtract(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin '-'");
    expect_at_least("-", &args, 1)?;
    let mut result = extract_number("-", &args[0])?;
    for arg in args.iter().skip(1) {
        result -= extract_number("-", arg)?;
    }
    Ok(Value::Number(result))
}

/// `*` seeds from its first argument.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_multiply(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin '*'");
    expect_at_least("*", &args, 1)?;
    let mut product = extract_number("*", &args[0])?;
    for arg in args.iter().skip(1) {
        product *= extract_number("*", arg)?;
    }
    Ok(Value::Number(product))
}

/// `/` seeds from its first argument. Division by zero follows IEEE 754 and
/// yields an infinity or NaN rather than an error.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_divide(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin '/'");
    expect_at_least("/", &args, 1)?;
    let mut quotient = extract_number("/", &args[0])?;
    for arg in args.iter().skip(1) {
        quotient /= extract_number("/", arg)?;
    }
    Ok(Value::Number(quotient))
}

// Generates the exactly-two-number comparison builtins.
macro_rules! define_comparison_fn {
    ($fn_name:ident, $op_str:expr, $op:tt) => {
        #[tracing::instrument(skip(args), ret, err)]
        pub fn $fn_name(args: Vec<Value>) -> Result<Value, EvalError> {
            trace!("Executing builtin '{}'", $op_str);
            expect_exact($op_str, &args, 2)?;
            let lhs = extract_number($op_str, &args[0])?;
            let rhs = extract_number($op_str, &args[1])?;
            Ok(Value::Bool(lhs $op rhs))
        }
    };
}

define_comparison_fn!(native_equals, "=", ==);
define_comparison_fn!(native_less_than, "<", <);
define_comparison_fn!(native_greater_than, ">", >);
define_comparison_fn!(native_less_than_or_equal, "<=", <=);
define_comparison_fn!(native_greater_than_or_equal, ">=", >=);
