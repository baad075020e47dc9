use serde::{Deserialize, Serialize};

/// A single token from one logical source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
    /// Whether whitespace separated this token from the previous one
    pub space_before: bool,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
            space_before: false,
        }
    }

    /// Creates a token that has no source position of its own, attributed to `line`
    pub fn synthetic(kind: TokenKind, line: usize, space_before: bool) -> Self {
        let lexeme = kind.to_string();
        Token {
            kind,
            lexeme,
            line,
            column: 0,
            space_before,
        }
    }

    /// Returns a copy with a different leading-space flag
    pub fn spaced(mut self, space_before: bool) -> Self {
        self.space_before = space_before;
        self
    }

    /// True for an identifier token with exactly this name
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(id) if id == name)
    }

    /// True for an operator token with exactly this spelling
    pub fn is_op(&self, op: &str) -> bool {
        matches!(&self.kind, TokenKind::Operator(o) if o == op)
    }
}

/// All token types of a nanoscript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, kept as written (decimal, exponent or 0x form)
    Number(String),
    /// Protected string literal; holds the placeholder text between the quotes
    String(String),
    /// Hex color literal without the leading `#`
    HexColor(String),
    /// Unicode vulgar fraction such as `½`
    Fraction(char),
    /// Run of superscript glyphs, already translated to plain text
    Superscript(String),
    /// Run of subscript glyphs, already translated to plain text
    Subscript(String),
    /// Special constant glyph: `π`, `ε`, `ξ`, `∞` or `∅`
    Constant(char),

    // Identifiers
    /// Identifier, including word operators such as `and` and `mod`
    Identifier(String),

    // Operators
    /// Any operator or symbol without a dedicated kind, canonicalized
    /// (`<=` is stored as `≤`, `>=` as `≥`)
    Operator(String),
    /// Membership `∊` (also written `∈` or `in`)
    ElementOf,
    /// Absolute-value bar `|`
    Bar,
    /// Magnitude bar `‖`
    DoubleBar,
    /// Floor open `⌊`
    FloorOpen,
    /// Floor close `⌋`
    FloorClose,
    /// Ceiling open `⌈`
    CeilOpen,
    /// Ceiling close `⌉`
    CeilClose,
    /// Degree suffix `°`
    Degree,
    /// Percent suffix `%`
    Percent,

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left bracket [
    LeftBracket,
    /// Right bracket ]
    RightBracket,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Comma delimiter
    Comma,
    /// Semicolon statement separator
    Semicolon,
    /// Colon (block headers and object literals)
    Colon,
    /// Member access dot
    Dot,
}

impl TokenKind {
    /// Opening bracket of any kind
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Closing bracket of any kind
    pub fn is_close(&self) -> bool {
        matches!(
            self,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::HexColor(h) => write!(f, "#{}", h),
            TokenKind::Fraction(c) | TokenKind::Constant(c) => write!(f, "{}", c),
            TokenKind::Superscript(s) => write!(f, "^({})", s),
            TokenKind::Subscript(s) => write!(f, "[({})]", s),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::ElementOf => write!(f, "∊"),
            TokenKind::Bar => write!(f, "|"),
            TokenKind::DoubleBar => write!(f, "‖"),
            TokenKind::FloorOpen => write!(f, "⌊"),
            TokenKind::FloorClose => write!(f, "⌋"),
            TokenKind::CeilOpen => write!(f, "⌈"),
            TokenKind::CeilClose => write!(f, "⌉"),
            TokenKind::Degree => write!(f, "°"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_lexeme_matches_display() {
        let token = Token::synthetic(TokenKind::LeftBrace, 4, true);
        assert_eq!(token.lexeme, "{");
        assert_eq!(token.line, 4);
        assert!(token.space_before);
    }

    #[test]
    fn test_bracket_classification() {
        assert!(TokenKind::LeftBracket.is_open());
        assert!(TokenKind::RightBrace.is_close());
        assert!(!TokenKind::Bar.is_open());
        assert!(!TokenKind::Identifier("x".to_string()).is_close());
    }
}
