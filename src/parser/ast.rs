//! Statement AST for nanoscript
//!
//! Expressions stay as token runs: the notation expander rewrites them once
//! statement structure is known, so scaffolding produced by lowering is never
//! re-scanned.

use crate::lexer::{Token, TokenKind};
use serde::{Deserialize, Serialize};

/// A run of tokens forming one expression
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expr {
    pub tokens: Vec<Token>,
}

impl Expr {
    pub fn new(tokens: Vec<Token>) -> Self {
        Expr { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Line of the first token, if any
    pub fn line(&self) -> Option<usize> {
        self.tokens.first().map(|t| t.line)
    }

    /// The single number literal this expression consists of, if it is one
    pub fn as_number(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [Token {
                kind: TokenKind::Number(n),
                ..
            }] => Some(n),
            _ => None,
        }
    }

    /// Source spelling of the expression, spaced as written
    pub fn source_text(&self) -> String {
        let mut text = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 && token.space_before {
                text.push(' ');
            }
            text.push_str(&token.lexeme);
        }
        text
    }
}

/// A node of the indentation tree; one per non-blank source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A line ending in `:` whose following lines are indented further
    Block {
        /// Line number of the header (1-indexed)
        line: usize,
        /// Leading whitespace of the header line
        prefix: String,
        header: BlockHeader,
        body: Vec<Node>,
        /// Whether a suspension point opens the body
        suspend: bool,
    },
    /// Any other line, compiled in place
    Line {
        line: usize,
        prefix: String,
        statements: Vec<Statement>,
    },
}

impl Node {
    pub fn line(&self) -> usize {
        match self {
            Node::Block { line, .. } | Node::Line { line, .. } => *line,
        }
    }

    /// Line of the last source line this node covers
    pub fn last_line(&self) -> usize {
        match self {
            Node::Block { line, body, .. } => body.last().map_or(*line, Node::last_line),
            Node::Line { line, .. } => *line,
        }
    }
}

/// One `;`-separated statement of a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Plain expression or declaration, emitted with a trailing `;`
    Expression(Expr),
    /// `debugWatch(expr)`
    DebugWatch(Expr),
    /// Single-line block form: `if x: y; z`
    Inline {
        header: BlockHeader,
        body: Vec<Statement>,
        suspend: bool,
    },
}

/// The control construct introduced by a block line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockHeader {
    If(Expr),
    ElseIf(Expr),
    Else,
    While(Expr),
    Until(Expr),
    For(ForClause),
    With(WithClause),
    Local,
    PreservingTransform,
    Def {
        name: String,
        params: Expr,
    },
}

impl BlockHeader {
    /// Loops are the only constructs that take a suspension point
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            BlockHeader::While(_) | BlockHeader::Until(_) | BlockHeader::For(_)
        )
    }

    /// Keyword used in diagnostics
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockHeader::If(_) => "if",
            BlockHeader::ElseIf(_) => "else if",
            BlockHeader::Else => "else",
            BlockHeader::While(_) => "while",
            BlockHeader::Until(_) => "until",
            BlockHeader::For(_) => "for",
            BlockHeader::With(_) => "with",
            BlockHeader::Local => "local",
            BlockHeader::PreservingTransform => "preservingTransform",
            BlockHeader::Def { .. } => "def",
        }
    }
}

/// The three FOR-loop forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForClause {
    /// `x ∊ expr`
    Container { variable: String, container: Expr },
    /// `a, b ∊ x ∊ expr`: iterate `x`, aliasing `x.a` and `x.b` each pass
    WithContainer {
        members: Vec<String>,
        variable: String,
        container: Expr,
    },
    /// `a < x < b`, `a ≤ x ≤ b`, `x < b` and mixed forms
    Range {
        variable: String,
        lower: Option<RangeBound>,
        upper: RangeBound,
    },
}

/// One side of a numeric range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    pub expr: Expr,
    /// `≤` rather than `<`
    pub inclusive: bool,
}

/// `with a, b ∊ expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithClause {
    pub members: Vec<String>,
    pub object: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan_line;

    #[test]
    fn test_source_text_keeps_spacing() {
        let expr = Expr::new(scan_line("f(a,  b) + 2", 1).unwrap());
        assert_eq!(expr.source_text(), "f(a, b) + 2");
    }

    #[test]
    fn test_last_line_follows_deepest_descendant() {
        let node = Node::Block {
            line: 1,
            prefix: String::new(),
            header: BlockHeader::Local,
            body: vec![
                Node::Line {
                    line: 2,
                    prefix: "  ".to_string(),
                    statements: vec![],
                },
                Node::Block {
                    line: 3,
                    prefix: "  ".to_string(),
                    header: BlockHeader::Else,
                    body: vec![Node::Line {
                        line: 5,
                        prefix: "    ".to_string(),
                        statements: vec![],
                    }],
                    suspend: false,
                },
            ],
            suspend: false,
        };
        assert_eq!(node.last_line(), 5);
    }
}
