//! Multi-line expression compaction
//!
//! Pulls expressions that are still open at a line break up onto the line
//! where they started and blanks the continuation lines. Every later pass can
//! then treat one line as one logical line, at the cost of attributing errors
//! inside such an expression to its first line.

use crate::error::{Error, Result};

/// Bracket kinds tracked by the compactor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Paren,
    Bracket,
    Brace,
}

impl BracketKind {
    fn close(self) -> char {
        match self {
            BracketKind::Paren => ')',
            BracketKind::Bracket => ']',
            BracketKind::Brace => '}',
        }
    }
}

/// Running, independent balance of each bracket kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketBalance {
    pub paren: i64,
    pub bracket: i64,
    pub brace: i64,
}

impl BracketBalance {
    /// Accumulates the brackets of one line
    pub fn update(&mut self, line: &str) {
        for c in line.chars() {
            match c {
                '(' => self.paren += 1,
                ')' => self.paren -= 1,
                '[' => self.bracket += 1,
                ']' => self.bracket -= 1,
                '{' => self.brace += 1,
                '}' => self.brace -= 1,
                _ => {}
            }
        }
    }

    /// The first kind whose counter went negative
    pub fn negative(&self) -> Option<BracketKind> {
        [
            (BracketKind::Paren, self.paren),
            (BracketKind::Bracket, self.bracket),
            (BracketKind::Brace, self.brace),
        ]
        .into_iter()
        .find(|(_, count)| *count < 0)
        .map(|(kind, _)| kind)
    }

    pub fn is_balanced(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }
}

/// Joins bracket-continued lines onto the line where the expression began
///
/// The number of lines never changes: continuation lines become empty.
pub fn compact_multiline_literals(lines: &mut [String]) -> Result<()> {
    let mut balance = BracketBalance::default();
    let mut expression_start: Option<usize> = None;

    for i in 0..lines.len() {
        balance.update(&lines[i]);

        if let Some(kind) = balance.negative() {
            return Err(Error::syntax(
                i + 1,
                format!(
                    "Unmatched closing bracket \"{}\": no expression to close",
                    kind.close()
                ),
            ));
        }

        let open = !balance.is_balanced();

        match expression_start {
            None => {
                if open {
                    expression_start = Some(i);
                }
            }
            Some(start) => {
                if !open && lines[i].contains(';') {
                    return Err(Error::syntax(
                        i + 1,
                        "\";\" not allowed on lines ending multi-line expressions",
                    ));
                }

                let continuation = std::mem::take(&mut lines[i]);
                let continuation = continuation.trim();
                if !continuation.is_empty() {
                    lines[start].push(' ');
                    lines[start].push_str(continuation);
                }

                if !open {
                    expression_start = None;
                }
            }
        }
    }

    match expression_start {
        Some(start) => Err(Error::syntax(
            start + 1,
            "Expression not closed before the end of the file",
        )),
        None => Ok(()),
    }
}
