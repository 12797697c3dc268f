//! The tokenizer. Source text becomes a flat stream of parens, string
//! literals, and atoms; whitespace and comments are dropped between tokens.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{opt, recognize, value},
    sequence::{pair, preceded},
};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected '\"' inside a symbol")]
    QuoteInSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    StringLiteral,
    Atom,
}

/// One lexical unit. `text` holds the atom spelling or the string contents
/// without the surrounding quotes; parens carry their single character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn left_paren() -> Self {
        Token {
            kind: TokenKind::LeftParen,
            text: "(".to_string(),
        }
    }

    pub fn right_paren() -> Self {
        Token {
            kind: TokenKind::RightParen,
            text: ")".to_string(),
        }
    }

    pub fn string(text: &str) -> Self {
        Token {
            kind: TokenKind::StringLiteral,
            text: text.to_string(),
        }
    }

    pub fn atom(text: &str) -> Self {
        Token {
            kind: TokenKind::Atom,
            text: text.to_string(),
        }
    }
}

/// Whitespace is space and newline only. Everything else that is not a
/// paren or a quote may appear inside an atom, semicolons included.
fn is_atom_char(c: char) -> bool {
    !matches!(c, ' ' | '\n' | '(' | ')' | '"')
}

fn blank(input: &str) -> IResult<&str, ()> {
    value((), take_while1(|c| c == ' ' || c == '\n')).parse(input)
}

/// A comment runs from a `;` at a token boundary to the end of the line.
/// A `;` reached while reading an atom belongs to the atom instead.
fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(char(';'), take_while(|c| c != '\n'))).parse(input)
}

/// Consumes the run of blanks and comments separating two tokens.
fn gap(input: &str) -> &str {
    let mut rest = input;
    while let Ok((after, ())) = alt((blank, comment)).parse(rest) {
        rest = after;
    }
    rest
}

fn paren(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::left_paren(), char('(')),
        value(Token::right_paren(), char(')')),
    ))
    .parse(input)
}

/// String contents run to the next `"`. A missing closing quote ends the
/// string at the end of input instead of failing.
fn string_literal(input: &str) -> IResult<&str, Token> {
    preceded(char('"'), pair(take_while(|c| c != '"'), opt(char('"'))))
        .map(|(contents, _)| Token::string(contents))
        .parse(input)
}

fn atom(input: &str) -> IResult<&str, Token> {
    recognize(pair(
        satisfy(|c| is_atom_char(c) && c != ';'),
        take_while(is_atom_char),
    ))
    .map(Token::atom)
    .parse(input)
}

/// Tokenizes a complete source fragment.
#[tracing::instrument(level = "trace", skip(source), fields(source = %source))]
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        rest = gap(rest);
        if rest.is_empty() {
            break;
        }

        // After the gap the head is a paren, a quote, or an atom character,
        // so one of the three token parsers always applies.
        let (after, token) = match alt((paren, string_literal, atom)).parse(rest) {
            Ok(step) => step,
            Err(_) => break,
        };

        if token.kind == TokenKind::Atom && after.starts_with('"') {
            return Err(LexError::QuoteInSymbol);
        }

        trace!(token = ?token, "Token produced");
        tokens.push(token);
        rest = after;
    }

    Ok(tokens)
}
