//! String literal protection and comment stripping
//!
//! Structural passes run over text in which every string literal's contents
//! have been swapped for a single private-use placeholder character, so that
//! brackets, colons or comment markers inside strings cannot be misread.

use crate::error::{Error, Result};

/// Shield for an escaped quote that appears outside of a string literal
pub const ESCAPED_QUOTE_SHIELD: char = '\u{E000}';

/// First placeholder codepoint; literal `n` is stored as `PROTECTION_BLOCK_START + n`
pub const PROTECTION_BLOCK_START: u32 = 0xE001;

/// Last codepoint of the Basic Multilingual Plane private use area
const PROTECTION_BLOCK_END: u32 = 0xF8FF;

/// Ordered contents of the string literals removed by [`protect_strings`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionMap {
    literals: Vec<String>,
}

impl ProtectionMap {
    /// Number of protected literals
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Contents of the literal represented by `placeholder`
    pub fn get(&self, placeholder: char) -> Option<&str> {
        let code = placeholder as u32;
        if code < PROTECTION_BLOCK_START {
            return None;
        }
        self.literals
            .get((code - PROTECTION_BLOCK_START) as usize)
            .map(String::as_str)
    }

    fn push(&mut self, literal: String, line: usize) -> Result<char> {
        let code = PROTECTION_BLOCK_START + self.literals.len() as u32;
        let placeholder = (code <= PROTECTION_BLOCK_END)
            .then(|| char::from_u32(code))
            .flatten()
            .ok_or_else(|| Error::syntax(line, "Too many string literals in one source file"))?;
        self.literals.push(literal);
        Ok(placeholder)
    }
}

/// True for characters reserved for placeholders and shields
pub fn is_reserved_char(c: char) -> bool {
    (ESCAPED_QUOTE_SHIELD as u32..=PROTECTION_BLOCK_END).contains(&(c as u32))
}

/// Replaces the interior of every double-quoted literal with one placeholder
///
/// Comments are copied through untouched (quotes inside them are not string
/// delimiters). An escaped quote outside a literal is shielded so that it can
/// never open one.
pub fn protect_strings(src: &str) -> Result<(String, ProtectionMap)> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut map = ProtectionMap::default();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if is_reserved_char(c) {
            return Err(Error::syntax(line, format!("Illegal character U+{:04X}", c as u32)));
        }

        match (c, next) {
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                out.push_str("/*");
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    out.push_str("*/");
                    i += 2;
                }
            }
            ('\\', Some('"')) => {
                out.push(ESCAPED_QUOTE_SHIELD);
                i += 2;
            }
            ('"', _) => {
                let start_line = line;
                let mut literal = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None | Some('\n') => {
                            return Err(Error::syntax(start_line, "Unterminated string literal"));
                        }
                        Some('"') => break,
                        Some('\\') => {
                            literal.push('\\');
                            if let Some(&escaped) = chars.get(i + 1) {
                                if escaped == '\n' {
                                    return Err(Error::syntax(
                                        start_line,
                                        "Unterminated string literal",
                                    ));
                                }
                                literal.push(escaped);
                            }
                            i += 2;
                        }
                        Some(&other) => {
                            literal.push(other);
                            i += 1;
                        }
                    }
                }
                i += 1; // Closing "
                let placeholder = map.push(literal, start_line)?;
                out.push('"');
                out.push(placeholder);
                out.push('"');
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                out.push(c);
                i += 1;
            }
        }
    }

    Ok((out, map))
}

/// Exact inverse of [`protect_strings`]
pub fn unprotect_strings(src: &str, map: &ProtectionMap) -> String {
    let mut out = String::with_capacity(src.len());
    for c in src.chars() {
        if c == ESCAPED_QUOTE_SHIELD {
            out.push_str("\\\"");
        } else if let Some(literal) = map.get(c) {
            out.push_str(literal);
        } else {
            out.push(c);
        }
    }
    out
}

/// Removes comments from protected text, keeping every newline
///
/// A block comment is replaced by just the newlines it contained, so all
/// following code keeps its line number.
pub fn strip_comments(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;

    while i < chars.len() {
        match (chars[i], chars.get(i + 1)) {
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i += 2;
            }
            ('"', _) => {
                // Protected literal: quote, placeholder, quote
                out.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    out.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    out.push('"');
                    i += 1;
                }
            }
            (c, _) => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}
