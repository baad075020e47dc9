//! Per-line validation of nanoscript tokens
//!
//! Rejects host-language constructs that nanoscript does not allow, naming
//! the nanoscript spelling where one exists.

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Host-language words that may not appear in nanoscript source
const RESERVED_WORDS: &[&str] = &[
    "toString",
    "try",
    "switch",
    "this",
    "delete",
    "null",
    "arguments",
    "undefined",
    "use",
    "using",
    "yield",
    "prototype",
    "var",
    "new",
    "auto",
    "as",
    "instanceof",
    "typeof",
    "class",
];

/// Host-language operators that may not appear in nanoscript source
const ILLEGAL_OPERATORS: &[&str] = &["===", "!==", "$", "!", "'"];

/// Suggested nanoscript replacement for a rejected symbol
pub fn suggested_alternative(symbol: &str) -> Option<&'static str> {
    match symbol {
        "'" => Some("\""),
        "!==" => Some("!="),
        "!" => Some("not"),
        "var" => Some("let"),
        "null" => Some("nil"),
        "===" => Some("=="),
        _ => None,
    }
}

fn illegal_symbol(line: usize, symbol: &str) -> Error {
    if symbol == "'" {
        return Error::syntax(
            line,
            "Illegal single-quote ('). Maybe you meant to use double quote (\") for a string.",
        );
    }

    let message = match suggested_alternative(symbol) {
        Some(alternative) => format!(
            "Illegal symbol \"{}\" (maybe you meant \"{}\")",
            symbol, alternative
        ),
        None => format!("Illegal symbol \"{}\"", symbol),
    };
    Error::syntax(line, message)
}

/// Checks one tokenized line; the first violation is returned
pub fn validate_line(tokens: &[Token], line: usize) -> Result<()> {
    for (i, token) in tokens.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| &tokens[p]);
        let after_number = !token.space_before
            && matches!(previous.map(|p| &p.kind), Some(TokenKind::Number(_)));

        match &token.kind {
            TokenKind::Number(n) => {
                let mut chars = n.chars();
                if chars.next() == Some('0') && chars.next().map_or(false, |c| c.is_ascii_digit())
                {
                    return Err(Error::syntax(
                        line,
                        "Numbers may not begin with a leading zero",
                    ));
                }
            }

            TokenKind::Percent if !after_number => {
                return Err(Error::syntax(
                    line,
                    "% may only appear at the end of a number (did you intend to use the \"mod\" operator?)",
                ));
            }

            TokenKind::Degree if !after_number => {
                return Err(Error::syntax(line, "° may only appear at the end of a number"));
            }

            TokenKind::Identifier(id) => {
                if id.starts_with('_') || RESERVED_WORDS.contains(&id.as_str()) {
                    return Err(illegal_symbol(line, id));
                }
            }

            TokenKind::Operator(op) if ILLEGAL_OPERATORS.contains(&op.as_str()) => {
                return Err(illegal_symbol(line, op));
            }

            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    fn check(source: &str) -> Result<()> {
        validate_line(&scan_line(source, 1)?, 1)
    }

    fn message(source: &str) -> String {
        match check(source) {
            Err(Error::SyntaxError { message, .. }) => message,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_var_suggests_let() {
        assert_eq!(
            message("var x = 1"),
            "Illegal symbol \"var\" (maybe you meant \"let\")"
        );
    }

    #[test]
    fn test_operator_suggestions() {
        assert_eq!(
            message("if a === b: c()"),
            "Illegal symbol \"===\" (maybe you meant \"==\")"
        );
        assert_eq!(
            message("x = !y"),
            "Illegal symbol \"!\" (maybe you meant \"not\")"
        );
        assert!(message("s = 'abc'").starts_with("Illegal single-quote"));
        assert_eq!(message("x = null"), "Illegal symbol \"null\" (maybe you meant \"nil\")");
    }

    #[test]
    fn test_underscore_identifiers_are_reserved() {
        assert_eq!(message("_secret = 3"), "Illegal symbol \"_secret\"");
    }

    #[test]
    fn test_leading_zero() {
        assert!(check("x = 0.5 + 10 + 0").is_ok());
        assert!(check("x = 0x1F").is_ok());
        assert_eq!(message("x = 07"), "Numbers may not begin with a leading zero");
    }

    #[test]
    fn test_percent_and_degree_placement() {
        assert!(check("x = 50% + 90°").is_ok());
        assert!(message("x = a % b").starts_with("% may only appear"));
        assert!(message("x = 50 %").starts_with("% may only appear"));
        assert!(check("x = a°").is_err());
    }

    #[test]
    fn test_not_equal_is_allowed() {
        assert!(check("if a != b: c()").is_ok());
    }
}
