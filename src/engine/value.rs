//! Runtime values.

use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::EvalError;
use std::fmt;
use std::rc::Rc;

/// A function value: parameter names, an unevaluated body, and a snapshot of
/// the environment taken where the `lambda` form was evaluated.
#[derive(Clone)]
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Expr,
    pub closure: Environment,
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("closure", &"<captured_env>")
            .finish()
    }
}

// Two lambdas are equal when their parameters and body match. The captured
// environment is not compared.
impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Number(f64),
    Bool(bool),
    Str(String),
    // No surface syntax produces a symbol value today.
    #[allow(dead_code)]
    Symbol(String),
    List(Vec<Value>),
    Lambda(Rc<Lambda>),
}

impl Value {
    /// The value's kind name, as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "List",
            Value::Lambda(_) => "Lambda",
        }
    }

    /// Coerces the value to a boolean for `if`, `cond`, `and`, `or`, and
    /// `not`: nil and `false` are false, zero is false, the empty string is
    /// false, everything else is true. Lists and lambdas have no truthiness.
    pub fn is_true(&self) -> Result<bool, EvalError> {
        match self {
            Value::Nil => Ok(false),
            Value::Number(number) => Ok(*number != 0.0),
            Value::Bool(boolean) => Ok(*boolean),
            Value::Str(text) => Ok(!text.is_empty()),
            Value::Symbol(_) => Ok(true),
            Value::List(_) | Value::Lambda(_) => Err(EvalError::TypeMismatch {
                expected: "Bool".to_string(),
                found: self.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(number) => write!(f, "{}", number),
            Value::Bool(boolean) => write!(f, "{}", boolean),
            Value::Str(text) => write!(f, "\"{}\"", text),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::List(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Lambda(_) => write!(f, "lambda"),
        }
    }
}
