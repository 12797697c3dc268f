//! The parser. Tokens become AST nodes by recursive descent, and special
//! forms are checked for shape and desugared into their dedicated variants
//! here, not in the evaluator.

use crate::engine::ast::Expr;
use crate::engine::special_forms;
use crate::engine::token::{LexError, Token, TokenKind, tokenize};
use crate::engine::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input ended while a form was still open. Interactive callers
    /// treat this as "keep reading" rather than as a failure.
    #[error("Incomplete input: {0}")]
    Incomplete(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// A position in the token stream, threaded through the descent.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        TokenCursor {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

/// Tokenizes and parses a source fragment into top-level expressions.
#[tracing::instrument(level = "trace", skip(source), fields(source = %source))]
pub fn parse_fragment(source: &str) -> Result<Vec<Expr>, ParseError> {
    let tokens = tokenize(source)?;
    parse_all(&tokens)
}

/// Parses an entire token stream. Every token must belong to an expression.
pub fn parse_all(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let mut cursor = TokenCursor::new(tokens);
    let mut expressions = Vec::new();
    while !cursor.at_end() {
        expressions.push(parse_expr(&mut cursor)?);
    }
    Ok(expressions)
}

fn parse_expr(cursor: &mut TokenCursor) -> Result<Expr, ParseError> {
    let Some(token) = cursor.advance() else {
        return Err(ParseError::Incomplete("Expected an expression".to_string()));
    };
    match token.kind {
        TokenKind::LeftParen => parse_form(cursor),
        TokenKind::RightParen => Err(ParseError::Syntax("Unexpected ')'".to_string())),
        TokenKind::StringLiteral => Ok(Expr::string(&token.text)),
        TokenKind::Atom => Ok(parse_atom(&token.text)),
    }
}

/// An atom whose whole spelling reads as a number is a number literal;
/// everything else is a symbol. `1x` is a symbol, not `1` followed by junk.
fn parse_atom(text: &str) -> Expr {
    match text.parse::<f64>() {
        Ok(number) => Expr::number(number),
        Err(_) => Expr::symbol(text),
    }
}

/// Parses the remainder of a parenthesized form, the `(` already consumed.
fn parse_form(cursor: &mut TokenCursor) -> Result<Expr, ParseError> {
    let mut items = Vec::new();
    loop {
        match cursor.peek() {
            None => {
                let message = if items.is_empty() {
                    "Expected expression after '('"
                } else {
                    "Expected ')'"
                };
                return Err(ParseError::Incomplete(message.to_string()));
            }
            Some(token) if token.kind == TokenKind::RightParen => {
                cursor.advance();
                break;
            }
            Some(_) => items.push(parse_expr(cursor)?),
        }
    }
    build_form(items)
}

/// Builds the node for a completed form: the empty list for `()`, a
/// special-form node when the head is a reserved symbol, a call otherwise.
fn build_form(mut items: Vec<Expr>) -> Result<Expr, ParseError> {
    if items.is_empty() {
        return Ok(Expr::empty_list());
    }

    let builder = match &items[0] {
        Expr::SymbolRef(name) => FORM_BUILDERS.get(name.as_str()).copied(),
        _ => None,
    };
    if let Some(builder) = builder {
        trace!(head = ?items[0], "Desugaring special form");
        return builder(items.split_off(1));
    }

    let head = items.remove(0);
    Ok(Expr::call(head, items))
}

type FormBuilder = fn(Vec<Expr>) -> Result<Expr, ParseError>;

/// Reserved head symbol -> AST builder. Resolution happens here exactly
/// once, at parse time.
static FORM_BUILDERS: Lazy<HashMap<&'static str, FormBuilder>> = Lazy::new(|| {
    HashMap::from([
        (special_forms::DO, build_do as FormBuilder),
        (special_forms::IF, build_if),
        (special_forms::COND, build_cond),
        (special_forms::DEFINE, build_define),
        (special_forms::LET, build_let),
        (special_forms::LAMBDA, build_lambda),
        (special_forms::AND, build_and),
        (special_forms::OR, build_or),
    ])
});

/// Recovers the element sequence of a sub-form that was parsed as a generic
/// call or as the empty list. Binding lists, parameter lists, and `cond`
/// clauses arrive this way. Desugared nodes return `None`: a reserved name
/// cannot open one of these lists.
fn flatten_form(form: Expr) -> Option<Vec<Expr>> {
    match form {
        Expr::Call { head, args } => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(*head);
            items.extend(args);
            Some(items)
        }
        Expr::Literal(Value::List(items)) if items.is_empty() => Some(Vec::new()),
        _ => None,
    }
}

fn build_do(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    Ok(Expr::Do(forms))
}

fn build_if(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    let [condition, consequent, alternative] = <[Expr; 3]>::try_from(forms).map_err(|forms| {
        ParseError::Syntax(format!(
            "'if' expects a condition and two branches, got {} expressions",
            forms.len()
        ))
    })?;
    Ok(Expr::If {
        condition: Box::new(condition),
        consequent: Box::new(consequent),
        alternative: Box::new(alternative),
    })
}

fn build_cond(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    let mut clauses = Vec::with_capacity(forms.len());
    for clause_form in forms {
        let Some(items) = flatten_form(clause_form) else {
            return Err(ParseError::Syntax(
                "'cond' clauses must be parenthesized test/result pairs".to_string(),
            ));
        };
        let [test, result] = <[Expr; 2]>::try_from(items).map_err(|items| {
            ParseError::Syntax(format!(
                "'cond' clauses must pair a test with one result, got {} expressions",
                items.len()
            ))
        })?;
        clauses.push((test, result));
    }
    Ok(Expr::Cond(clauses))
}

fn build_define(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    let [name_form, value] = <[Expr; 2]>::try_from(forms).map_err(|forms| {
        ParseError::Syntax(format!(
            "'define' expects a name and a value, got {} expressions",
            forms.len()
        ))
    })?;
    let Expr::SymbolRef(name) = name_form else {
        return Err(ParseError::Syntax(
            "'define' name must be a bare symbol".to_string(),
        ));
    };
    Ok(Expr::Define {
        name,
        value: Box::new(value),
    })
}

fn build_let(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    let [bindings_form, body] = <[Expr; 2]>::try_from(forms).map_err(|forms| {
        ParseError::Syntax(format!(
            "'let' expects a binding list and a body, got {} expressions",
            forms.len()
        ))
    })?;
    let Some(items) = flatten_form(bindings_form) else {
        return Err(ParseError::Syntax(
            "'let' bindings must be a parenthesized list".to_string(),
        ));
    };
    if items.len() % 2 != 0 {
        return Err(ParseError::Syntax(
            "'let' bindings must pair each name with a value".to_string(),
        ));
    }

    let mut bindings = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(name_form), Some(value)) = (items.next(), items.next()) {
        let Expr::SymbolRef(name) = name_form else {
            return Err(ParseError::Syntax(
                "'let' binding names must be bare symbols".to_string(),
            ));
        };
        bindings.push((name, value));
    }
    Ok(Expr::Let {
        bindings,
        body: Box::new(body),
    })
}

fn build_lambda(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    let [params_form, body] = <[Expr; 2]>::try_from(forms).map_err(|forms| {
        ParseError::Syntax(format!(
            "'lambda' expects a parameter list and a body, got {} expressions",
            forms.len()
        ))
    })?;
    let Some(items) = flatten_form(params_form) else {
        return Err(ParseError::Syntax(
            "'lambda' parameters must be a parenthesized list".to_string(),
        ));
    };

    let mut params = Vec::with_capacity(items.len());
    for item in items {
        let Expr::SymbolRef(name) = item else {
            return Err(ParseError::Syntax(
                "'lambda' parameters must be bare symbols".to_string(),
            ));
        };
        params.push(name);
    }
    Ok(Expr::Lambda {
        params,
        body: Box::new(body),
    })
}

fn build_and(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    Ok(Expr::And(forms))
}

fn build_or(forms: Vec<Expr>) -> Result<Expr, ParseError> {
    Ok(Expr::Or(forms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn parse_one(source: &str) -> Expr {
        let mut expressions = parse_fragment(source).expect("source should parse");
        assert_eq!(expressions.len(), 1, "expected one expression");
        expressions.remove(0)
    }

    fn parse_err(source: &str) -> ParseError {
        parse_fragment(source).expect_err("source should not parse")
    }

    #[test]
    fn parse_empty_fragment() {
        init_test_logging();
        assert_eq!(parse_fragment(""), Ok(vec![]));
        assert_eq!(parse_fragment("  \n ; just a comment"), Ok(vec![]));
    }

    #[test]
    fn parse_number_atoms() {
        init_test_logging();
        assert_eq!(parse_one("5"), Expr::number(5.0));
        assert_eq!(parse_one("2.5"), Expr::number(2.5));
        assert_eq!(parse_one("-3"), Expr::number(-3.0));
        assert_eq!(parse_one("1e3"), Expr::number(1000.0));
    }

    #[test]
    fn parse_symbol_atoms() {
        init_test_logging();
        assert_eq!(parse_one("hello"), Expr::symbol("hello"));
        assert_eq!(parse_one("+"), Expr::symbol("+"));
        assert_eq!(parse_one("empty?"), Expr::symbol("empty?"));
    }

    #[test]
    fn parse_atom_requires_the_whole_token_to_be_numeric() {
        init_test_logging();
        assert_eq!(parse_one("1x"), Expr::symbol("1x"));
        assert_eq!(parse_one("2.5.3"), Expr::symbol("2.5.3"));
        assert_eq!(parse_one("-"), Expr::symbol("-"));
    }

    #[test]
    fn parse_string_literal() {
        init_test_logging();
        assert_eq!(parse_one("\"hi there\""), Expr::string("hi there"));
    }

    #[test]
    fn parse_empty_form_is_the_empty_list() {
        init_test_logging();
        assert_eq!(parse_one("()"), Expr::empty_list());
    }

    #[test]
    fn parse_call_with_arguments() {
        init_test_logging();
        assert_eq!(
            parse_one("(+ 1 2)"),
            Expr::call(Expr::symbol("+"), vec![Expr::number(1.0), Expr::number(2.0)])
        );
    }

    #[test]
    fn parse_nested_calls() {
        init_test_logging();
        assert_eq!(
            parse_one("(add 1 (double 2))"),
            Expr::call(
                Expr::symbol("add"),
                vec![
                    Expr::number(1.0),
                    Expr::call(Expr::symbol("double"), vec![Expr::number(2.0)]),
                ]
            )
        );
    }

    #[test]
    fn parse_call_with_expression_head() {
        init_test_logging();
        assert_eq!(
            parse_one("((lambda (x) x) 5)"),
            Expr::call(
                Expr::Lambda {
                    params: vec!["x".to_string()],
                    body: Box::new(Expr::symbol("x")),
                },
                vec![Expr::number(5.0)]
            )
        );
    }

    #[test]
    fn parse_multiple_top_level_expressions() {
        init_test_logging();
        assert_eq!(
            parse_fragment("1 two \"three\""),
            Ok(vec![
                Expr::number(1.0),
                Expr::symbol("two"),
                Expr::string("three"),
            ])
        );
    }

    #[test]
    fn parse_all_accepts_a_prepared_token_stream() {
        init_test_logging();
        let tokens = vec![
            Token::left_paren(),
            Token::atom("f"),
            Token::atom("1"),
            Token::right_paren(),
        ];
        assert_eq!(
            parse_all(&tokens),
            Ok(vec![Expr::call(Expr::symbol("f"), vec![Expr::number(1.0)])])
        );
    }

    #[test]
    fn desugar_do() {
        init_test_logging();
        assert_eq!(
            parse_one("(do 1 2)"),
            Expr::Do(vec![Expr::number(1.0), Expr::number(2.0)])
        );
        assert_eq!(parse_one("(do)"), Expr::Do(vec![]));
    }

    #[test]
    fn desugar_if() {
        init_test_logging();
        assert_eq!(
            parse_one("(if 1 2 3)"),
            Expr::If {
                condition: Box::new(Expr::number(1.0)),
                consequent: Box::new(Expr::number(2.0)),
                alternative: Box::new(Expr::number(3.0)),
            }
        );
    }

    #[test]
    fn desugar_cond() {
        init_test_logging();
        assert_eq!(
            parse_one("(cond ((= 1 2) 1) (else 2))"),
            Expr::Cond(vec![
                (
                    Expr::call(Expr::symbol("="), vec![Expr::number(1.0), Expr::number(2.0)]),
                    Expr::number(1.0),
                ),
                (Expr::symbol("else"), Expr::number(2.0)),
            ])
        );
        assert_eq!(parse_one("(cond)"), Expr::Cond(vec![]));
    }

    #[test]
    fn desugar_define() {
        init_test_logging();
        assert_eq!(
            parse_one("(define x 5)"),
            Expr::Define {
                name: "x".to_string(),
                value: Box::new(Expr::number(5.0)),
            }
        );
    }

    #[test]
    fn desugar_let() {
        init_test_logging();
        assert_eq!(
            parse_one("(let (x 1 y 2) (+ x y))"),
            Expr::Let {
                bindings: vec![
                    ("x".to_string(), Expr::number(1.0)),
                    ("y".to_string(), Expr::number(2.0)),
                ],
                body: Box::new(Expr::call(
                    Expr::symbol("+"),
                    vec![Expr::symbol("x"), Expr::symbol("y")]
                )),
            }
        );
    }

    #[test]
    fn desugar_let_with_empty_bindings() {
        init_test_logging();
        assert_eq!(
            parse_one("(let () 1)"),
            Expr::Let {
                bindings: vec![],
                body: Box::new(Expr::number(1.0)),
            }
        );
    }

    #[test]
    fn desugar_lambda() {
        init_test_logging();
        assert_eq!(
            parse_one("(lambda (a b) (+ a b))"),
            Expr::Lambda {
                params: vec!["a".to_string(), "b".to_string()],
                body: Box::new(Expr::call(
                    Expr::symbol("+"),
                    vec![Expr::symbol("a"), Expr::symbol("b")]
                )),
            }
        );
        assert_eq!(
            parse_one("(lambda () 7)"),
            Expr::Lambda {
                params: vec![],
                body: Box::new(Expr::number(7.0)),
            }
        );
    }

    #[test]
    fn desugar_and_or() {
        init_test_logging();
        assert_eq!(
            parse_one("(and 1 2)"),
            Expr::And(vec![Expr::number(1.0), Expr::number(2.0)])
        );
        assert_eq!(parse_one("(and)"), Expr::And(vec![]));
        assert_eq!(parse_one("(or)"), Expr::Or(vec![]));
    }

    #[test]
    fn reserved_names_are_plain_symbols_outside_head_position() {
        init_test_logging();
        assert_eq!(parse_one("if"), Expr::symbol("if"));
        assert_eq!(
            parse_one("(f lambda)"),
            Expr::call(Expr::symbol("f"), vec![Expr::symbol("lambda")])
        );
    }

    #[test]
    fn define_may_rebind_a_reserved_name() {
        init_test_logging();
        assert_eq!(
            parse_one("(define if 3)"),
            Expr::Define {
                name: "if".to_string(),
                value: Box::new(Expr::number(3.0)),
            }
        );
    }

    #[test]
    fn if_requires_exactly_three_expressions() {
        init_test_logging();
        assert_eq!(
            parse_err("(if 1 2)"),
            ParseError::Syntax(
                "'if' expects a condition and two branches, got 2 expressions".to_string()
            )
        );
        assert!(matches!(parse_err("(if 1 2 3 4)"), ParseError::Syntax(_)));
    }

    #[test]
    fn define_shape_errors() {
        init_test_logging();
        assert!(matches!(parse_err("(define x)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(define x 1 2)"), ParseError::Syntax(_)));
        assert_eq!(
            parse_err("(define 3 4)"),
            ParseError::Syntax("'define' name must be a bare symbol".to_string())
        );
        assert!(matches!(parse_err("(define (f) 1)"), ParseError::Syntax(_)));
    }

    #[test]
    fn let_shape_errors() {
        init_test_logging();
        assert_eq!(
            parse_err("(let (x) 1)"),
            ParseError::Syntax("'let' bindings must pair each name with a value".to_string())
        );
        assert!(matches!(parse_err("(let x 1)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(let (1 2) 3)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(let (x 1))"), ParseError::Syntax(_)));
    }

    #[test]
    fn lambda_shape_errors() {
        init_test_logging();
        assert!(matches!(parse_err("(lambda x x)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(lambda (1) 1)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(lambda (x))"), ParseError::Syntax(_)));
    }

    #[test]
    fn cond_shape_errors() {
        init_test_logging();
        assert!(matches!(parse_err("(cond 5)"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(cond (1))"), ParseError::Syntax(_)));
        assert!(matches!(parse_err("(cond (1 2 3))"), ParseError::Syntax(_)));
    }

    #[test]
    fn unclosed_forms_are_incomplete() {
        init_test_logging();
        assert_eq!(
            parse_err("("),
            ParseError::Incomplete("Expected expression after '('".to_string())
        );
        assert_eq!(
            parse_err("(+ 1"),
            ParseError::Incomplete("Expected ')'".to_string())
        );
        assert!(matches!(parse_err("((f 1)"), ParseError::Incomplete(_)));
        assert!(matches!(
            parse_err("(let (x 1) (do x"),
            ParseError::Incomplete(_)
        ));
    }

    #[test]
    fn stray_close_paren_is_a_syntax_error() {
        init_test_logging();
        assert_eq!(
            parse_err(")"),
            ParseError::Syntax("Unexpected ')'".to_string())
        );
        assert_eq!(
            parse_err("(f 1)) 2"),
            ParseError::Syntax("Unexpected ')'".to_string())
        );
    }

    #[test]
    fn lex_errors_pass_through() {
        init_test_logging();
        assert_eq!(
            parse_err("value\""),
            ParseError::Lex(LexError::QuoteInSymbol)
        );
    }

    #[test]
    fn empty_form_can_appear_in_argument_position() {
        init_test_logging();
        assert_eq!(
            parse_one("(list ())"),
            Expr::call(
                Expr::symbol("list"),
                vec![Expr::Literal(Value::List(vec![]))]
            )
        );
    }
}
