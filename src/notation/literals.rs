//! Literal notation: percent and degree suffixes, hex colors
//!
//! Runs on every line before statement parsing, so that FOR bounds and block
//! conditions see the expanded forms.

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// `π/180`, spelled the way the runtime expects it
const DEGREES_TO_RADIANS: &str = ".017453292519943295";

fn synthetic(kind: TokenKind, line: usize, space_before: bool) -> Token {
    Token::synthetic(kind, line, space_before)
}

/// `(n * factor)`
fn scaled(number: Token, factor: &str) -> Vec<Token> {
    let line = number.line;
    let space = number.space_before;
    vec![
        synthetic(TokenKind::LeftParen, line, space),
        number.spaced(false),
        synthetic(TokenKind::Operator("*".to_string()), line, true),
        synthetic(TokenKind::Number(factor.to_string()), line, true),
        synthetic(TokenKind::RightParen, line, false),
    ]
}

/// Color channels of a hex literal and whether it carries alpha
pub fn hex_channels(digits: &str) -> Option<(Vec<f64>, bool)> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |c: char| c.to_digit(16).map(|v| v as f64 / 15.0);
    let byte = |pair: &str| u8::from_str_radix(pair, 16).ok().map(|v| v as f64 / 255.0);
    let chars: Vec<char> = digits.chars().collect();

    match chars.len() {
        1 => {
            let v = nibble(chars[0])?;
            Some((vec![v, v, v], false))
        }
        3 | 4 => {
            let channels = chars.iter().map(|&c| nibble(c)).collect::<Option<Vec<_>>>()?;
            Some((channels, chars.len() == 4))
        }
        6 | 8 => {
            let channels = (0..digits.len())
                .step_by(2)
                .map(|i| byte(&digits[i..i + 2]))
                .collect::<Option<Vec<_>>>()?;
            Some((channels, digits.len() == 8))
        }
        _ => None,
    }
}

/// Constructor call for a hex color: `gray`, `rgb` or `rgba`
fn color_call(token: &Token, digits: &str) -> Result<Vec<Token>> {
    let (channels, alpha) = hex_channels(digits).ok_or_else(|| {
        Error::syntax(token.line, format!("Illegal hex color \"#{}\"", digits))
    })?;

    let gray = !alpha && channels[0] == channels[1] && channels[1] == channels[2];
    let (name, args) = match (gray, alpha) {
        (true, _) => ("gray", &channels[..1]),
        (false, false) => ("rgb", &channels[..3]),
        (false, true) => ("rgba", &channels[..4]),
    };

    let line = token.line;
    let mut tokens = vec![
        synthetic(
            TokenKind::Identifier(name.to_string()),
            line,
            token.space_before,
        ),
        synthetic(TokenKind::LeftParen, line, false),
    ];
    for (i, value) in args.iter().enumerate() {
        if i > 0 {
            tokens.push(synthetic(TokenKind::Comma, line, false));
        }
        tokens.push(synthetic(TokenKind::Number(value.to_string()), line, i > 0));
    }
    tokens.push(synthetic(TokenKind::RightParen, line, false));
    Ok(tokens)
}

/// Expands percent, degree and hex color literals in one line
pub fn expand_literals(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match &token.kind {
            TokenKind::Number(_) => {
                let suffix = iter.peek().and_then(|next| match &next.kind {
                    TokenKind::Percent if !next.space_before => Some("0.01"),
                    TokenKind::Degree if !next.space_before => Some(DEGREES_TO_RADIANS),
                    TokenKind::Identifier(id) if id == "deg" => Some(DEGREES_TO_RADIANS),
                    _ => None,
                });
                match suffix {
                    Some(factor) => {
                        iter.next();
                        out.extend(scaled(token, factor));
                    }
                    None => out.push(token),
                }
            }
            TokenKind::HexColor(digits) => {
                let call = color_call(&token, digits)?;
                out.extend(call);
            }
            _ => out.push(token),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    fn lexemes(source: &str) -> Vec<String> {
        expand_literals(scan_line(source, 1).unwrap())
            .unwrap()
            .into_iter()
            .map(|t| t.lexeme)
            .collect()
    }

    #[test]
    fn test_percent() {
        assert_eq!(lexemes("50%"), vec!["(", "50", "*", "0.01", ")"]);
    }

    #[test]
    fn test_degrees() {
        assert_eq!(lexemes("90°"), vec!["(", "90", "*", DEGREES_TO_RADIANS, ")"]);
        assert_eq!(lexemes("45 deg"), vec!["(", "45", "*", DEGREES_TO_RADIANS, ")"]);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(lexemes("#f00"), vec!["rgb", "(", "1", ",", "0", ",", "0", ")"]);
        assert_eq!(lexemes("#fff"), vec!["gray", "(", "1", ")"]);
        assert_eq!(lexemes("#000000"), vec!["gray", "(", "0", ")"]);
        let alpha = (128.0f64 / 255.0).to_string();
        assert_eq!(
            lexemes("#ff000080"),
            vec!["rgba", "(", "1", ",", "0", ",", "0", ",", alpha.as_str(), ")"]
        );
    }

    #[test]
    fn test_equal_channels_make_gray() {
        let (channels, alpha) = hex_channels("888").unwrap();
        assert!(!alpha);
        assert_eq!(channels, vec![8.0 / 15.0; 3]);
        assert_eq!(lexemes("#888")[0], "gray");
    }

    #[test]
    fn test_illegal_hex_color() {
        let err = expand_literals(scan_line("c = #12345", 3).unwrap()).unwrap_err();
        assert_eq!(err, Error::syntax(3, "Illegal hex color \"#12345\""));
        assert!(hex_channels("ggg").is_none());
    }
}
