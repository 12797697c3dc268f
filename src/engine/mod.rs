//! The interpreter core: tokenizer, parser, evaluator, and the builtin and
//! bootstrap libraries.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod parser;
pub mod special_forms;
pub mod stdlib;
pub mod token;
pub mod value;

pub use env::Environment;
pub use eval::{EvalError, evaluate_program};
pub use parser::{ParseError, parse_fragment};
pub use stdlib::install_stdlib;
pub use value::Value;

use thiserror::Error;

/// Any failure on the source-to-value path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpreterError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses and evaluates a source fragment against `env` in one step.
pub fn evaluate_source(source: &str, env: &mut Environment) -> Result<Value, InterpreterError> {
    let expressions = parse_fragment(source)?;
    Ok(evaluate_program(&expressions, env)?)
}
