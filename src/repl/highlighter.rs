//! The rustyline helper: syntax highlighting plus multi-line continuation.

use lazy_static::lazy_static;
use owo_colors::OwoColorize;
use regex::{Captures, Regex};
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline_derive::{Completer, Helper, Hinter};
use std::borrow::Cow::{self, Borrowed, Owned};

use crate::engine::{ParseError, builtins, parse_fragment, special_forms};

lazy_static! {
    // One pass over the line. The alternatives mirror the tokenizer: strings
    // swallow structural characters, comments run to the end of the line,
    // and anything else up to a delimiter is an atom.
    static ref TOKEN_RE: Regex = Regex::new(
        r#"(?P<string>"[^"]*"?)|(?P<comment>;[^\n]*)|(?P<paren>[()])|(?P<atom>[^ \n()"]+)"#
    )
    .unwrap();
}

fn style_token(captures: &Captures, text: &str) -> String {
    if captures.name("string").is_some() {
        text.green().to_string()
    } else if captures.name("comment").is_some() {
        text.bright_black().to_string()
    } else if captures.name("paren").is_some() {
        text.yellow().to_string()
    } else if text.parse::<f64>().is_ok() {
        text.magenta().to_string()
    } else if special_forms::is_special_form(text) {
        text.cyan().bold().to_string()
    } else if builtins::is_builtin(text) {
        text.blue().to_string()
    } else {
        text.to_string()
    }
}

#[derive(Default)]
pub struct LispHighlighter {
    brackets: MatchingBracketHighlighter,
}

impl LispHighlighter {
    fn paint(&self, line: &str) -> String {
        let mut painted = String::with_capacity(line.len() * 2);
        let mut cursor = 0;
        for captures in TOKEN_RE.captures_iter(line) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            painted.push_str(&line[cursor..whole.start()]);
            painted.push_str(&style_token(&captures, whole.as_str()));
            cursor = whole.end();
        }
        painted.push_str(&line[cursor..]);
        painted
    }
}

impl Highlighter for LispHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }
        Owned(self.paint(line))
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        // Repaint on bracket events and whenever there is text to color.
        self.brackets.highlight_char(line, pos, forced) || !line.is_empty()
    }
}

#[derive(Completer, Helper, Hinter)]
pub struct ReplHelper {
    highlighter: LispHighlighter,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            highlighter: LispHighlighter::default(),
        }
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

impl Validator for ReplHelper {
    /// Holds submission back while a form is still open, so a `(define`
    /// spanning several lines reads as one expression. Hard syntax errors
    /// pass through as valid and are reported when the line runs.
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        match parse_fragment(ctx.input()) {
            Err(ParseError::Incomplete(_)) => Ok(ValidationResult::Incomplete),
            _ => Ok(ValidationResult::Valid(None)),
        }
    }
}
