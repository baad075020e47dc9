//! Bracketing rewrites: conditional expressions, floor/ceiling and bars

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

fn count_ident(tokens: &[Token], name: &str) -> usize {
    tokens.iter().filter(|t| t.is_ident(name)).count()
}

fn op(symbol: &str, line: usize, space_before: bool) -> Token {
    Token::synthetic(TokenKind::Operator(symbol.to_string()), line, space_before)
}

/// `if T then A else B` → `(T) ? (A) : B`
///
/// Chained conditionals need no parentheses: the alternate simply extends to
/// the end of the enclosing expression, as the target's `?:` does.
pub fn rewrite_conditionals(tokens: Vec<Token>, line: usize) -> Result<Vec<Token>> {
    let ifs = count_ident(&tokens, "if");
    let thens = count_ident(&tokens, "then");
    let elses = count_ident(&tokens, "else");

    if thens > elses {
        return Err(Error::syntax(line, "\"then\" without \"else\"."));
    }
    if thens > ifs {
        return Err(Error::syntax(line, "\"then\" without \"if\"."));
    }
    if ifs > thens {
        return Err(Error::syntax(line, "\"if\" without \"then\"."));
    }
    if ifs == 0 {
        return Ok(tokens);
    }

    let mut out = Vec::with_capacity(tokens.len() + 2 * ifs);
    let mut tighten_next = false;

    for mut token in tokens {
        if tighten_next {
            token.space_before = false;
            tighten_next = false;
        }

        if token.is_ident("if") {
            out.push(Token::synthetic(TokenKind::LeftParen, line, token.space_before));
            tighten_next = true;
        } else if token.is_ident("then") {
            out.push(Token::synthetic(TokenKind::RightParen, line, false));
            out.push(op("?", line, true));
            out.push(Token::synthetic(TokenKind::LeftParen, line, true));
            tighten_next = true;
        } else if token.is_ident("else") {
            out.push(Token::synthetic(TokenKind::RightParen, line, false));
            out.push(Token::synthetic(TokenKind::Colon, line, true));
        } else {
            out.push(token);
        }
    }

    Ok(out)
}

/// `⌊x⌋` → `floor(x)`, `⌈x⌉` → `ceil(x)`
pub fn rewrite_floor_ceil(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let function = match token.kind {
            TokenKind::FloorOpen => "floor",
            TokenKind::CeilOpen => "ceil",
            TokenKind::FloorClose | TokenKind::CeilClose => {
                out.push(Token::synthetic(TokenKind::RightParen, token.line, false));
                continue;
            }
            _ => {
                out.push(token);
                continue;
            }
        };
        out.push(Token::synthetic(
            TokenKind::Identifier(function.to_string()),
            token.line,
            token.space_before,
        ));
        out.push(Token::synthetic(TokenKind::LeftParen, token.line, false));
    }
    out
}

/// Index of the bar closing the one at `open`, at the same bracket depth
fn closing_bar(tokens: &[Token], open: usize, bar: &TokenKind) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open + 1) {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
            if depth < 0 {
                return None;
            }
        } else if depth == 0 && &token.kind == bar {
            return Some(i);
        }
    }
    None
}

/// `|e|` → `abs(e)` and `‖e‖` → `magnitude(e)`
pub fn rewrite_bars(mut tokens: Vec<Token>, line: usize) -> Result<Vec<Token>> {
    for (bar, function, symbol) in [
        (TokenKind::Bar, "abs", "|"),
        (TokenKind::DoubleBar, "magnitude", "‖"),
    ] {
        while let Some(open) = tokens.iter().position(|t| t.kind == bar) {
            let close = closing_bar(&tokens, open, &bar).ok_or_else(|| {
                Error::syntax(line, format!("Unbalanced {}...{}", symbol, symbol))
            })?;

            let space = tokens[open].space_before;
            tokens[close] = Token::synthetic(TokenKind::RightParen, line, false);
            tokens.splice(
                open..=open,
                [
                    Token::synthetic(TokenKind::Identifier(function.to_string()), line, space),
                    Token::synthetic(TokenKind::LeftParen, line, false),
                ],
            );
        }
    }
    Ok(tokens)
}
