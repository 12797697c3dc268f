//! Reserved form names.
//!
//! A bare symbol in head position matching one of these is rewritten by the
//! parser into a dedicated AST node and never reaches the evaluator as a
//! call. In any other position these names are ordinary symbols.

pub const DO: &str = "do";
pub const IF: &str = "if";
pub const COND: &str = "cond";
pub const DEFINE: &str = "define";
pub const LET: &str = "let";
pub const LAMBDA: &str = "lambda";
pub const AND: &str = "and";
pub const OR: &str = "or";

/// Not a special form: `else` is only meaningful as the test of a final
/// `cond` clause, where the evaluator treats it as always matching.
pub const ELSE: &str = "else";

pub const SPECIAL_FORMS: &[&str] = &[DO, IF, COND, DEFINE, LET, LAMBDA, AND, OR];

pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}
