use super::glyphs::{
    fraction_parts, is_constant_glyph, is_double_bar, is_greek_identifier_letter,
    subscript_to_normal, superscript_to_normal,
};
use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Multi-character operators, longest first so that the first match wins
const COMPOUND_OPERATORS: &[&str] = &[
    "===", "!==", "**=", "...", "**", "++", "--", "+=", "-=", "*=", "/=", "==", "!=", "<=",
    ">=", "&&", "||", "<<", ">>", "=>", "&=", "|=", "^=", "◅=", "▻=", "∩=", "∪=", "⊕=",
];

/// Scanner for one logical line of protected nanoscript source
///
/// Comments must already be stripped and string literals protected; the
/// scanner never sees a newline.
pub struct LineScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Line number attributed to every token (1-indexed)
    line: usize,
    /// Whether whitespace was skipped since the last token
    pending_space: bool,
}

impl LineScanner {
    /// Creates a new scanner for a single line
    pub fn new(source: &str, line: usize) -> Self {
        LineScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line,
            pending_space: false,
        }
    }

    /// Scans all tokens of the line
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            ' ' | '\t' | '\r' => {
                self.pending_space = true;
            }

            '\n' => {
                return Err(self.error("Unexpected line break inside a logical line"));
            }

            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '[' => self.add_token(TokenKind::LeftBracket),
            ']' => self.add_token(TokenKind::RightBracket),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            ';' => self.add_token(TokenKind::Semicolon),
            ':' => self.add_token(TokenKind::Colon),

            '∊' | '∈' => self.add_token(TokenKind::ElementOf),
            '⌊' => self.add_token(TokenKind::FloorOpen),
            '⌋' => self.add_token(TokenKind::FloorClose),
            '⌈' => self.add_token(TokenKind::CeilOpen),
            '⌉' => self.add_token(TokenKind::CeilClose),
            '°' => self.add_token(TokenKind::Degree),
            '%' => self.add_token(TokenKind::Percent),

            '"' => self.scan_string()?,
            '#' => self.scan_hex_color(),

            '.' => {
                if self.peek().is_ascii_digit() && !self.follows_value() {
                    self.scan_number();
                } else if self.peek() == '.' && self.peek_next() == '.' {
                    self.current += 2;
                    self.add_operator("...");
                } else {
                    self.add_token(TokenKind::Dot);
                }
            }

            '|' if !matches!(self.peek(), '|' | '=') || self.closes_bar() => {
                self.add_token(TokenKind::Bar)
            }
            c if is_double_bar(c) => self.add_token(TokenKind::DoubleBar),

            c if c.is_ascii_digit() => self.scan_number(),
            c if is_constant_glyph(c) => self.add_token(TokenKind::Constant(c)),

            c if fraction_parts(c).is_some() => self.add_token(TokenKind::Fraction(c)),
            c if superscript_to_normal(c).is_some() => {
                let text = self.scan_glyph_run(c, superscript_to_normal);
                self.add_token(TokenKind::Superscript(text));
            }
            c if subscript_to_normal(c).is_some() => {
                let text = self.scan_glyph_run(c, subscript_to_normal);
                self.add_token(TokenKind::Subscript(text));
            }

            'Δ' if self.peek().is_ascii_alphabetic() || is_greek_identifier_letter(self.peek()) => {
                self.advance();
                self.scan_identifier();
            }
            c if c.is_ascii_alphabetic() || c == '_' || is_greek_identifier_letter(c) => {
                self.current -= 1;
                self.scan_identifier();
            }

            _ => self.scan_operator(c),
        }

        Ok(())
    }

    /// True when a `|=` here is the closing bar of `|x|` followed by `=`
    fn closes_bar(&self) -> bool {
        let open = self
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Bar)
            .count();
        self.peek() == '=' && open % 2 == 1
    }

    /// True when the previous token ends a value, so a `.` is member access
    fn follows_value(&self) -> bool {
        !self.pending_space
            && matches!(
                self.tokens.last().map(|t| &t.kind),
                Some(TokenKind::Identifier(_))
                    | Some(TokenKind::RightParen)
                    | Some(TokenKind::RightBracket)
            )
    }

    fn scan_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\\' {
                self.advance();
            }
            if !self.is_at_end() {
                self.advance();
            }
        }

        if self.is_at_end() {
            return Err(self.error("Unterminated string literal"));
        }

        self.advance(); // Closing "

        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token(TokenKind::String(value));
        Ok(())
    }

    fn scan_hex_color(&mut self) {
        while self.peek().is_ascii_alphanumeric() {
            self.advance();
        }
        let digits: String = self.source[self.start + 1..self.current].iter().collect();
        self.add_token(TokenKind::HexColor(digits));
    }

    fn scan_number(&mut self) {
        let first = self.source[self.start];

        if first == '0' && matches!(self.peek(), 'x' | 'X') && self.peek_next().is_ascii_hexdigit()
        {
            self.advance();
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }
            self.add_number();
            return;
        }

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if first != '.' && self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume .
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // Exponent only when digits follow, so `2e` still reads as 2 times e
        if matches!(self.peek(), 'e' | 'E') {
            let exponent_start = if matches!(self.peek_next(), '+' | '-') {
                self.current + 2
            } else {
                self.current + 1
            };
            if self
                .source
                .get(exponent_start)
                .map_or(false, |c| c.is_ascii_digit())
            {
                self.current = exponent_start;
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        self.add_number();
    }

    fn add_number(&mut self) {
        let text: String = self.source[self.start..self.current].iter().collect();
        self.add_token(TokenKind::Number(text));
    }

    fn scan_identifier(&mut self) {
        let first = self.advance();

        if is_greek_identifier_letter(first) {
            // Greek identifiers are one letter with an optional numeric suffix
            while self.peek().is_ascii_digit() || self.peek() == '_' {
                self.advance();
            }
        } else {
            while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        let kind = match text.as_str() {
            "in" => TokenKind::ElementOf,
            _ => TokenKind::Identifier(text),
        };
        self.add_token(kind);
    }

    fn scan_glyph_run(&mut self, first: char, table: fn(char) -> Option<&'static str>) -> String {
        let mut text = table(first).unwrap_or_default().to_string();
        while let Some(normal) = table(self.peek()) {
            self.advance();
            text.push_str(normal);
        }
        text
    }

    fn scan_operator(&mut self, first: char) {
        let rest: String = std::iter::once(first)
            .chain(self.source[self.current..].iter().take(2).copied())
            .collect();

        for op in COMPOUND_OPERATORS {
            if rest.starts_with(op) {
                self.current = self.start + op.chars().count();
                let canonical = match *op {
                    "<=" => "≤",
                    ">=" => "≥",
                    other => other,
                };
                self.add_operator(canonical);
                return;
            }
        }

        self.add_operator(&first.to_string());
    }

    fn add_operator(&mut self, op: &str) {
        self.add_token(TokenKind::Operator(op.to_string()));
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        let mut token = Token::new(kind, lexeme, self.line, self.start + 1);
        token.space_before = self.pending_space;
        self.pending_space = false;
        self.tokens.push(token);
    }

    fn error(&self, message: &str) -> Error {
        Error::syntax(self.line, message)
    }
}

/// Tokenizes one line; convenience wrapper over [`LineScanner`]
pub fn scan_line(source: &str, line: usize) -> Result<Vec<Token>> {
    LineScanner::new(source, line).scan_tokens()
}
