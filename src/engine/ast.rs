//! The abstract syntax tree produced by the parser.

use crate::engine::value::Value;

/// A parsed expression.
///
/// Special forms are rewritten into dedicated variants at parse time, so the
/// evaluator never sees `do`, `if`, `cond`, `define`, `let`, `lambda`, `and`,
/// or `or` as ordinary calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A self-evaluating constant: numbers, strings, and the empty form `()`.
    Literal(Value),
    /// A symbol in value position, resolved against the environment.
    SymbolRef(String),
    /// A parenthesized form that is not a special form.
    Call { head: Box<Expr>, args: Vec<Expr> },
    Do(Vec<Expr>),
    If {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternative: Box<Expr>,
    },
    /// Test/result clause pairs, tried in order.
    Cond(Vec<(Expr, Expr)>),
    Define { name: String, value: Box<Expr> },
    /// Name/value pairs bound left to right, then a body.
    Let {
        bindings: Vec<(String, Expr)>,
        body: Box<Expr>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn symbol(name: &str) -> Expr {
        Expr::SymbolRef(name.to_string())
    }

    pub fn number(number: f64) -> Expr {
        Expr::Literal(Value::Number(number))
    }

    pub fn string(text: &str) -> Expr {
        Expr::Literal(Value::Str(text.to_string()))
    }

    pub fn empty_list() -> Expr {
        Expr::Literal(Value::List(Vec::new()))
    }

    pub fn call(head: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            head: Box::new(head),
            args,
        }
    }
}
