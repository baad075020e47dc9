use super::compact::compact_multiline_literals;
use crate::error::Result;

/// Ordered, mutable lines of one compilation unit
///
/// A line's position is its identity: index `i` is reported as line `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    lines: Vec<String>,
}

impl SourceBuffer {
    /// Splits text into lines, dropping carriage returns
    pub fn from_text(text: &str) -> Self {
        SourceBuffer {
            lines: text.split('\n').map(|l| l.replace('\r', "")).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text of a 1-based line
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Collapses bracket-continued expressions in place
    pub fn compact(&mut self) -> Result<()> {
        compact_multiline_literals(&mut self.lines)
    }

    pub fn join(&self) -> String {
        self.lines.join("\n")
    }
}

/// Column of the first non-whitespace character, `None` for a blank line
pub fn indentation(line: &str) -> Option<usize> {
    line.chars().position(|c| !c.is_whitespace())
}

/// The leading whitespace of a line
pub fn indent_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}
