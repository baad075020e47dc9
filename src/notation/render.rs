use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Host spelling of a word operator, constant name or statement-like word
fn word(name: &str) -> Option<&'static str> {
    Some(match name {
        "and" => "&&",
        "or" => "||",
        "not" => "!",
        "xor" => "!==",
        "mod" => "%",
        "bitand" => "&",
        "bitor" => "|",
        "bitxor" => "^",
        "bitnot" => "~",
        "bitshl" => "<<",
        "bitshr" => ">>",
        "infinity" => "(Infinity)",
        "nan" => "(NaN)",
        "nil" => "(undefined)",
        "pi" => "(_Math.PI+0)",
        "epsilon" => "(1e-7+0)",
        "reset" => "{ throw new Error(\"RESET\"); }",
        "assert" => "_assertEnabled && assert",
        "debugPrint" => "_debugPrintEnabled && debugPrint",
        _ => return None,
    })
}

/// Host spelling of a nanoscript operator glyph
fn operator(op: &str) -> &str {
    match op {
        "==" | "≟" => "===",
        "!=" | "≠" => "!==",
        "¬" => "!",
        "≤" => "<=",
        "≥" => ">=",
        "∩" => "&",
        "∪" => "|",
        "⊕" => "^",
        "◅" => "<<",
        "▻" => ">>",
        "∩=" => "&=",
        "∪=" => "|=",
        "⊕=" => "^=",
        "◅=" => "<<=",
        "▻=" => ">>=",
        "^" => "**",
        other => other,
    }
}

fn constant(glyph: char) -> Option<&'static str> {
    Some(match glyph {
        'π' => "(_Math.PI+0)",
        'ε' => "(1e-7+0)",
        'ξ' => "rnd()",
        '∞' => "(Infinity)",
        '∅' => "(undefined)",
        _ => return None,
    })
}

/// Writes fully expanded tokens as host source
pub fn render(tokens: &[Token]) -> Result<String> {
    let mut out = String::new();

    for (i, token) in tokens.iter().enumerate() {
        let after_dot = i > 0 && tokens[i - 1].kind == TokenKind::Dot;
        if i > 0 && token.space_before {
            out.push(' ');
        }

        match &token.kind {
            TokenKind::Identifier(id) if !after_dot => match word(id) {
                Some(text) => out.push_str(text),
                None => out.push_str(id),
            },
            TokenKind::Operator(op) => out.push_str(operator(op)),
            TokenKind::Constant(c) => match constant(*c) {
                Some(text) => out.push_str(text),
                None => out.push(*c),
            },
            TokenKind::ElementOf => {
                return Err(Error::syntax(
                    token.line,
                    "∊ may only appear in FOR and WITH statements",
                ));
            }
            other => out.push_str(&other.to_string()),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    fn rendered(source: &str) -> String {
        render(&scan_line(source, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_word_operators() {
        assert_eq!(rendered("a and not b or c"), "a && ! b || c");
        assert_eq!(rendered("a xor b"), "a !== b");
        assert_eq!(rendered("7 mod 3"), "7 % 3");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(rendered("a == b ≠ c"), "a === b !== c");
        assert_eq!(rendered("a ≤ b"), "a <= b");
    }

    #[test]
    fn test_constants() {
        assert_eq!(rendered("x = ∅"), "x = (undefined)");
        assert_eq!(rendered("x = nil"), "x = (undefined)");
        assert_eq!(rendered("t = π"), "t = (_Math.PI+0)");
        assert_eq!(rendered("r = ξ"), "r = rnd()");
    }

    #[test]
    fn test_member_names_are_verbatim() {
        assert_eq!(rendered("a.pi + b.and"), "a.pi + b.and");
    }

    #[test]
    fn test_membership_outside_loops() {
        assert!(render(&scan_line("x ∊ y", 1).unwrap()).is_err());
    }
}
