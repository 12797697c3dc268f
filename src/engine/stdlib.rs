//! The bootstrap library, written in the language itself and evaluated into
//! every top-level environment at startup.

use crate::engine::env::Environment;
use crate::engine::{InterpreterError, evaluate_source};
use tracing::debug;

/// Library source evaluated at startup. These are ordinary bindings, so user
/// code may shadow them with `define`.
const STDLIB_SOURCE: &str = "\
(define empty?
  (lambda (seq)
    (= (length seq) 0)))

(define map
  (lambda (fn seq)
    (if (empty? seq)
        (list)
        (cons (fn (first seq))
              (map fn (rest seq))))))
";

/// Evaluates the bootstrap library into `env`.
pub fn install_stdlib(env: &mut Environment) -> Result<(), InterpreterError> {
    debug!("Installing the bootstrap library");
    evaluate_source(STDLIB_SOURCE, env)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::value::Value;
    use crate::logging::init_test_logging;

    fn run(source: &str) -> Result<Value, InterpreterError> {
        let mut env = Environment::new();
        install_stdlib(&mut env).expect("stdlib should install");
        evaluate_source(source, &mut env)
    }

    #[test]
    fn empty_predicate() {
        init_test_logging();
        assert_eq!(run("(empty? (list))"), Ok(Value::Bool(true)));
        assert_eq!(run("(empty? (list 1))"), Ok(Value::Bool(false)));
    }

    #[test]
    fn map_applies_in_order() {
        init_test_logging();
        assert_eq!(
            run("(map (lambda (x) (* 2 x)) (list 1 2 3))"),
            Ok(Value::List(vec![
                Value::Number(2.0),
                Value::Number(4.0),
                Value::Number(6.0),
            ]))
        );
    }

    #[test]
    fn map_over_the_empty_list() {
        init_test_logging();
        assert_eq!(
            run("(map (lambda (x) x) (list))"),
            Ok(Value::List(vec![]))
        );
    }

    #[test]
    fn map_with_a_user_function() {
        init_test_logging();
        assert_eq!(
            run("(define square (lambda (x) (* x x))) (map square (list 1 2 3))"),
            Ok(Value::List(vec![
                Value::Number(1.0),
                Value::Number(4.0),
                Value::Number(9.0),
            ]))
        );
    }

    #[test]
    fn stdlib_bindings_can_be_shadowed() {
        init_test_logging();
        assert_eq!(run("(define map 5) map"), Ok(Value::Number(5.0)));
    }
}
