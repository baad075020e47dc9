use super::is_word_operator;
use crate::lexer::{Token, TokenKind};

/// Small integer exponent of `ident ** (n)` starting at `index`, if the
/// pattern matches; returns the exponent and the pattern length
fn small_power(tokens: &[Token], index: usize) -> Option<(i32, usize)> {
    let base = tokens.get(index)?;
    match &base.kind {
        TokenKind::Identifier(id) if !is_word_operator(id) => {}
        _ => return None,
    }
    if !tokens.get(index + 1)?.is_op("**") || tokens.get(index + 2)?.kind != TokenKind::LeftParen
    {
        return None;
    }

    let (negative, digit_at) = if tokens.get(index + 3)?.is_op("-") {
        (true, index + 4)
    } else {
        (false, index + 3)
    };

    let exponent = match &tokens.get(digit_at)?.kind {
        TokenKind::Number(n) if n.len() == 1 => n.parse::<i32>().ok()?,
        _ => return None,
    };
    if tokens.get(digit_at + 1)?.kind != TokenKind::RightParen {
        return None;
    }

    let exponent = if negative { -exponent } else { exponent };
    Some((exponent, digit_at + 2 - index))
}

/// True when the token before a base makes the rewrite ambiguous
fn blocks_rewrite(previous: Option<&Token>) -> bool {
    previous.map_or(false, |p| {
        p.kind == TokenKind::Dot || p.is_op("++") || p.is_op("--") || p.is_op("**")
    })
}

/// `x ** (3)` → `(x * x * x)`, `x ** (-2)` → `(1 / (x * x))`
pub fn expand_small_powers(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let rewrite = small_power(&tokens, i)
            .filter(|&(exponent, _)| exponent != 0 && !blocks_rewrite(out.last()));

        let Some((exponent, length)) = rewrite else {
            out.push(tokens[i].clone());
            i += 1;
            continue;
        };

        let base = &tokens[i];
        let line = base.line;
        let mut product = Vec::new();
        for n in 0..exponent.unsigned_abs() {
            if n > 0 {
                product.push(Token::synthetic(
                    TokenKind::Operator("*".to_string()),
                    line,
                    true,
                ));
            }
            product.push(base.clone().spaced(n > 0));
        }

        out.push(Token::synthetic(TokenKind::LeftParen, line, base.space_before));
        if exponent < 0 {
            out.push(Token::synthetic(TokenKind::Number("1".to_string()), line, false));
            out.push(Token::synthetic(TokenKind::Operator("/".to_string()), line, true));
            out.push(Token::synthetic(TokenKind::LeftParen, line, true));
            out.extend(product);
            out.push(Token::synthetic(TokenKind::RightParen, line, false));
        } else {
            out.extend(product);
        }
        out.push(Token::synthetic(TokenKind::RightParen, line, false));

        i += length;
    }

    out
}
