//! The evaluator: a tree walk over desugared expressions.

use crate::engine::ast::Expr;
use crate::engine::builtins;
use crate::engine::env::Environment;
use crate::engine::special_forms;
use crate::engine::value::{Lambda, Value};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Undeclared symbol: {0}")]
    UndeclaredSymbol(String),
    #[error("Arity mismatch: {0}")]
    ArityMismatch(String),
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("Cannot apply, not a function: {0}")]
    NotCallable(String),
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    #[error("Value error: {0}")]
    ValueError(String),
}

/// Evaluates one expression against `env`.
///
/// `define` mutates `env` in place; every other scope-introducing construct
/// works on a snapshot and leaves `env` untouched.
#[instrument(skip(expr, env), fields(expr = ?expr), ret, err)]
pub fn evaluate(expr: &Expr, env: &mut Environment) -> Result<Value, EvalError> {
    trace!("Starting evaluation");
    match expr {
        Expr::Literal(value) => Ok(value.clone()),

        Expr::SymbolRef(name) => env.get(name).ok_or_else(|| {
            error!(symbol = %name, "Undeclared symbol");
            EvalError::UndeclaredSymbol(name.clone())
        }),

        Expr::Do(expressions) => {
            let mut result = Value::Nil;
            for expression in expressions {
                result = evaluate(expression, env)?;
            }
            Ok(result)
        }

        Expr::If {
            condition,
            consequent,
            alternative,
        } => {
            if evaluate(condition, env)?.is_true()? {
                evaluate(consequent, env)
            } else {
                evaluate(alternative, env)
            }
        }

        Expr::Cond(clauses) => evaluate_cond(clauses, env),

        Expr::Define { name, value } => {
            let value = evaluate(value, env)?;
            debug!(name = %name, "Binding defined");
            env.define(name.clone(), value);
            Ok(Value::Nil)
        }

        Expr::Let { bindings, body } => {
            let mut scope = env.clone();
            for (name, value_expr) in bindings {
                let value = evaluate(value_expr, &mut scope)?;
                scope.define(name.clone(), value);
            }
            evaluate(body, &mut scope)
        }

        Expr::Lambda { params, body } => Ok(Value::Lambda(Rc::new(Lambda {
            params: params.clone(),
            body: (**body).clone(),
            closure: env.clone(),
        }))),

        Expr::And(operands) => {
            for operand in operands {
                if !evaluate(operand, env)?.is_true()? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }

        Expr::Or(operands) => {
            for operand in operands {
                if evaluate(operand, env)?.is_true()? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }

        Expr::Call { head, args } => evaluate_call(head, args, env),
    }
}

/// Evaluates a sequence of top-level expressions against a shared
/// environment, returning the value of the last one (nil when empty).
#[instrument(skip(expressions, env), fields(count = expressions.len()), ret, err)]
pub fn evaluate_program(expressions: &[Expr], env: &mut Environment) -> Result<Value, EvalError> {
    let mut result = Value::Nil;
    for expression in expressions {
        result = evaluate(expression, env)?;
    }
    Ok(result)
}

fn evaluate_cond(clauses: &[(Expr, Expr)], env: &mut Environment) -> Result<Value, EvalError> {
    for (test, result) in clauses {
        let matched = match test {
            // A bare `else` in test position always matches.
            Expr::SymbolRef(name) if name == special_forms::ELSE => true,
            _ => evaluate(test, env)?.is_true()?,
        };
        if matched {
            return evaluate(result, env);
        }
    }
    Ok(Value::Nil)
}

/// Resolves and applies a call head.
///
/// A bare symbol head is looked up in the environment first; only an unbound
/// symbol falls through to the builtin operator table, so user definitions
/// shadow builtins of the same name.
fn evaluate_call(head: &Expr, args: &[Expr], env: &mut Environment) -> Result<Value, EvalError> {
    if let Expr::SymbolRef(name) = head {
        return match env.get(name) {
            Some(Value::Lambda(lambda)) => {
                let arguments = evaluate_arguments(args, env)?;
                apply(&lambda, arguments, env)
            }
            Some(other) => {
                error!(head = %name, found = %other.type_name(), "Call head is bound to a non-function");
                Err(EvalError::NotCallable(format!("{}", other)))
            }
            None => {
                let arguments = evaluate_arguments(args, env)?;
                builtins::dispatch(name, arguments)
            }
        };
    }

    match evaluate(head, env)? {
        Value::Lambda(lambda) => {
            let arguments = evaluate_arguments(args, env)?;
            apply(&lambda, arguments, env)
        }
        other => {
            error!(found = %other.type_name(), "Call head evaluated to a non-function");
            Err(EvalError::NotCallable(format!("{}", other)))
        }
    }
}

fn evaluate_arguments(args: &[Expr], env: &mut Environment) -> Result<Vec<Value>, EvalError> {
    let mut arguments = Vec::with_capacity(args.len());
    for arg in args {
        arguments.push(evaluate(arg, env)?);
    }
    Ok(arguments)
}

/// Applies a lambda to already-evaluated arguments.
///
/// The body scope layers three snapshots: the caller's environment, then the
/// closure taken at definition time (captured bindings are immune to later
/// redefinition), then the parameters.
#[instrument(skip(lambda, arguments, caller_env), fields(params = ?lambda.params, args = ?arguments), ret, err)]
fn apply(
    lambda: &Lambda,
    arguments: Vec<Value>,
    caller_env: &Environment,
) -> Result<Value, EvalError> {
    if arguments.len() != lambda.params.len() {
        error!(
            expected = lambda.params.len(),
            got = arguments.len(),
            "Arity mismatch applying lambda"
        );
        return Err(EvalError::ArityMismatch(format!(
            "Function expects {} arguments, got {}",
            lambda.params.len(),
            arguments.len()
        )));
    }

    let mut scope = caller_env.clone();
    scope.extend(&lambda.closure);
    for (param, argument) in lambda.params.iter().zip(arguments) {
        scope.define(param.clone(), argument);
    }

    trace!("Evaluating lambda body");
    evaluate(&lambda.body, &mut scope)
}
