//! Notation Expander
//!
//! Rewrites nanoscript's mathematical notation into plain host expressions.
//! Every pass works on tokens of a single expression, in this order:
//!
//! ```text
//! conditionals → ⌊⌋ ⌈⌉ → |…| ‖…‖ → implicit × → glyphs → implicit × → trig → x**(n) → render
//! ```
//!
//! Literal suffixes and hex colors are expanded earlier, per line, by
//! [`expand_literals`].

mod implicit;
mod literals;
mod operators;
mod peephole;
mod render;

pub use implicit::{expand_glyphs, insert_implicit_multiplication, parenthesize_trig};
pub use literals::{expand_literals, hex_channels};
pub use operators::{rewrite_bars, rewrite_conditionals, rewrite_floor_ceil};
pub use peephole::expand_small_powers;
pub use render::render;

use crate::error::Result;
use crate::lexer::Token;
use crate::parser::Expr;

/// Words that act as operators and never as operands
pub const WORD_OPERATORS: &[&str] = &[
    "and", "or", "not", "xor", "mod", "bitand", "bitor", "bitxor", "bitnot", "bitshl", "bitshr",
    "for", "with", "if", "then", "else",
];

pub fn is_word_operator(name: &str) -> bool {
    WORD_OPERATORS.contains(&name)
}

/// Runs every token pass over one expression
pub fn expand_tokens(tokens: Vec<Token>, line: usize) -> Result<Vec<Token>> {
    let tokens = rewrite_conditionals(tokens, line)?;
    let tokens = rewrite_floor_ceil(tokens);
    let tokens = rewrite_bars(tokens, line)?;

    // Twice: glyph expansion creates new adjacencies inside exponents
    let tokens = insert_implicit_multiplication(tokens);
    let tokens = expand_glyphs(tokens)?;
    let tokens = insert_implicit_multiplication(tokens);

    let tokens = parenthesize_trig(tokens);
    Ok(expand_small_powers(tokens))
}

/// Expands and renders one expression as host source
pub fn expand(expr: &Expr, line: usize) -> Result<String> {
    render(&expand_tokens(expr.tokens.clone(), line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    fn compile_expr(source: &str) -> String {
        let tokens = expand_literals(scan_line(source, 1).unwrap()).unwrap();
        expand(&Expr::new(tokens), 1).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        assert_eq!(compile_expr("y = 3x²"), "y = 3 * (x * x)");
        assert_eq!(compile_expr("d = |a - b|"), "d = abs(a - b)");
        assert_eq!(compile_expr("a = 2cosθ"), "a = 2 * cos(θ)");
        assert_eq!(compile_expr("h = ½w"), "h = (1/2) * w");
        assert_eq!(compile_expr("p = 50%"), "p = (50 * 0.01)");
        assert_eq!(compile_expr("r = 90°"), "r = (90 * .017453292519943295)");
        assert_eq!(compile_expr("i = ⌊x⌋"), "i = floor(x)");
    }

    #[test]
    fn test_conditional_pipeline() {
        assert_eq!(
            compile_expr("v = if x > 0 then 1 else -1"),
            "v = (x > 0) ? (1) : -1"
        );
    }

    #[test]
    fn test_colors_pipeline() {
        assert_eq!(compile_expr("c = #f00"), "c = rgb(1, 0, 0)");
        assert_eq!(compile_expr("c = #888"), "c = gray(0.5333333333333333)");
    }

    #[test]
    fn test_implicit_product_of_parenthesized_terms() {
        assert_eq!(compile_expr("z = (a + b)(c)"), "z = (a + b) * (c)");
    }
}
