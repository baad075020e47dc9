//! Implicit multiplication, glyph expansion and bare trig arguments

use super::is_word_operator;
use crate::error::Result;
use crate::lexer::glyphs::fraction_parts;
use crate::lexer::{scan_line, Token, TokenKind};

/// Tokens after which a juxtaposed operand means multiplication
fn ends_operand(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::RightParen
            | TokenKind::Number(_)
            | TokenKind::Constant(_)
            | TokenKind::Fraction(_)
            | TokenKind::Superscript(_)
            | TokenKind::Subscript(_)
    )
}

/// Tokens that may start the right-hand factor of an implicit product
fn starts_factor(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Identifier(id) => !is_word_operator(id),
        TokenKind::LeftParen | TokenKind::Constant(_) => true,
        _ => false,
    }
}

/// Inserts `*` between juxtaposed factors: `2x`, `3(a + b)`, `(a)(b)`, `2π`
///
/// Word operators are never treated as factors, so `2 mod 3` is untouched.
/// Applying this twice gives the same result as applying it once.
pub fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for mut token in tokens {
        if out.last().map_or(false, ends_operand) && starts_factor(&token) {
            out.push(Token::synthetic(
                TokenKind::Operator("*".to_string()),
                token.line,
                true,
            ));
            token.space_before = true;
        }
        out.push(token);
    }
    out
}

/// Tokens of glyph text that was already translated to plain characters
fn relex(text: &str, line: usize) -> Result<Vec<Token>> {
    let mut tokens = scan_line(text.trim(), line)?;
    if let Some(first) = tokens.first_mut() {
        first.space_before = false;
    }
    Ok(tokens)
}

/// Fractions, superscripts, subscripts and `^`
///
/// `½` → `(1/2)`, `x²` → `x ** (2)`, `a₁` → `a[(1)]`, `a^b` → `a ** b`.
pub fn expand_glyphs(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let line = token.line;
        let space = token.space_before;

        match &token.kind {
            TokenKind::Fraction(glyph) => match fraction_parts(*glyph) {
                Some((numerator, denominator)) => out.extend([
                    Token::synthetic(TokenKind::LeftParen, line, space),
                    Token::synthetic(TokenKind::Number(numerator.to_string()), line, false),
                    Token::synthetic(TokenKind::Operator("/".to_string()), line, false),
                    Token::synthetic(TokenKind::Number(denominator.to_string()), line, false),
                    Token::synthetic(TokenKind::RightParen, line, false),
                ]),
                None => out.push(token),
            },

            TokenKind::Superscript(text) => {
                out.push(Token::synthetic(
                    TokenKind::Operator("**".to_string()),
                    line,
                    true,
                ));
                out.push(Token::synthetic(TokenKind::LeftParen, line, true));
                out.extend(relex(text, line)?);
                out.push(Token::synthetic(TokenKind::RightParen, line, false));
            }

            TokenKind::Subscript(text) => {
                out.push(Token::synthetic(TokenKind::LeftBracket, line, false));
                out.push(Token::synthetic(TokenKind::LeftParen, line, false));
                out.extend(relex(text, line)?);
                out.push(Token::synthetic(TokenKind::RightParen, line, false));
                out.push(Token::synthetic(TokenKind::RightBracket, line, false));
            }

            TokenKind::Operator(op) if op == "^" || op == "^=" => {
                let power = if op == "^" { "**" } else { "**=" };
                out.push(Token::synthetic(
                    TokenKind::Operator(power.to_string()),
                    line,
                    space,
                ));
            }

            _ => out.push(token),
        }
    }

    Ok(out)
}

const TRIG_FUNCTIONS: &[&str] = &["sin", "cos", "tan"];

/// `sinθ` → `sin(θ)` for a single bare identifier or constant argument
pub fn parenthesize_trig(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let is_trig = matches!(&token.kind, TokenKind::Identifier(id) if TRIG_FUNCTIONS.contains(&id.as_str()))
            && !matches!(out.last().map(|t| &t.kind), Some(TokenKind::Dot));
        let bare_argument = iter.peek().map_or(false, |next| match &next.kind {
            TokenKind::Identifier(id) => !is_word_operator(id),
            TokenKind::Constant(_) => true,
            _ => false,
        });

        let line = token.line;
        out.push(token);

        if is_trig && bare_argument {
            if let Some(argument) = iter.next() {
                out.push(Token::synthetic(TokenKind::LeftParen, line, false));
                out.push(argument.spaced(false));
                out.push(Token::synthetic(TokenKind::RightParen, line, false));
            }
        }
    }

    out
}
