//! List builtins. Lists are immutable values; every operator returns a new
//! list and leaves its arguments alone.

use crate::engine::builtins::{expect_exact, extract_list, extract_number};
use crate::engine::eval::EvalError;
use crate::engine::value::Value;
use tracing::{error, trace};

/// `list` builds a list from its arguments.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_list(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'list'");
    Ok(Value::List(args))
}

/// `length` of a list.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_length(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'length'");
    expect_exact("length", &args, 1)?;
    let items = extract_list("length", &args[0])?;
    Ok(Value::Number(items.len() as f64))
}

/// `cons` prepends a value to a list.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_cons(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'cons'");
    expect_exact("cons", &args, 2)?;
    let mut items = extract_list("cons", &args[1])?.to_vec();
    items.insert(0, args[0].clone());
    Ok(Value::List(items))
}

/// `append` adds a value at the end of a list.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_append(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'append'");
    expect_exact("append", &args, 2)?;
    let mut items = extract_list("append", &args[1])?.to_vec();
    items.push(args[0].clone());
    Ok(Value::List(items))
}

/// `concat` flattens any number of lists into one.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_concat(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'concat'");
    let mut items = Vec::new();
    for arg in &args {
        items.extend(extract_list("concat", arg)?.iter().cloned());
    }
    Ok(Value::List(items))
}

/// `get` indexes into a list. The index truncates to a whole number and
/// must land inside the list.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_get(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'get'");
    expect_exact("get", &args, 2)?;
    let items = extract_list("get", &args[0])?;
    let index = extract_number("get", &args[1])?;

    if index >= 0.0 {
        if let Some(item) = items.get(index as usize) {
            return Ok(item.clone());
        }
    }
    let bounds_error = EvalError::ValueError(format!(
        "Index {} is out of bounds for a list of {} elements",
        index,
        items.len()
    ));
    error!(operator = "get", error = %bounds_error, "Bounds error in builtin");
    Err(bounds_error)
}

/// `first` element of a nonempty list.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_first(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'first'");
    expect_exact("first", &args, 1)?;
    let items = extract_list("first", &args[0])?;
    match items.first() {
        Some(item) => Ok(item.clone()),
        None => {
            let empty_error = EvalError::ValueError("'first' called on an empty list".to_string());
            error!(operator = "first", error = %empty_error, "Value error in builtin");
            Err(empty_error)
        }
    }
}

/// `rest` of a nonempty list: everything after the first element.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_rest(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing builtin 'rest'");
    expect_exact("rest", &args, 1)?;
    let items = extract_list("rest", &args[0])?;
    if items.is_empty() {
        let empty_error = EvalError::ValueError("'rest' called on an empty list".to_string());
        error!(operator = "rest", error = %empty_error, "Value error in builtin");
        return Err(empty_error);
    }
    Ok(Value::List(items[1..].to_vec()))
}
