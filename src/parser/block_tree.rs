use super::ast::Node;
use super::stmt_parser::{parse_block_header, parse_statements};
use super::validate::validate_line;
use crate::error::{Error, Result};
use crate::lexer::{scan_line, Token, TokenKind};
use crate::notation::expand_literals;
use crate::source::{indent_prefix, indentation};

/// Builds the indentation tree of one compilation unit
///
/// Lines are consumed top to bottom and every line is validated before any
/// line below it, so the first diagnostic is always the earliest one.
pub struct BlockParser<'a> {
    /// Compacted, comment-free, string-protected lines
    lines: &'a [String],
    /// Index of the next unconsumed line
    current: usize,
}

impl<'a> BlockParser<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        BlockParser { lines, current: 0 }
    }

    /// Parses the whole unit into top-level nodes
    pub fn parse(mut self) -> Result<Vec<Node>> {
        if let Some(first) = self.next_nonblank(0) {
            if indentation(&self.lines[first]).unwrap_or(0) > 0 {
                return Err(Error::syntax(first + 1, "First line must not be indented"));
            }
        }
        self.parse_block(None)
    }

    /// Parses sibling lines until a dedent below the block's indentation
    ///
    /// `header_indent` is the indentation of the line that opened this block.
    fn parse_block(&mut self, header_indent: Option<usize>) -> Result<Vec<Node>> {
        let lines = self.lines;
        let mut nodes = Vec::new();
        let mut suite_indent = None;

        while let Some(index) = self.next_nonblank(self.current) {
            let indent = indentation(&lines[index]).unwrap_or(0);
            let block_indent = *suite_indent.get_or_insert(indent);

            if indent < block_indent {
                if header_indent.map_or(false, |h| indent > h) {
                    return Err(Error::syntax(index + 1, "Inconsistent indentation"));
                }
                break;
            }

            self.current = index + 1;
            nodes.push(self.parse_line(index, indent)?);
        }

        Ok(nodes)
    }

    fn parse_line(&mut self, index: usize, indent: usize) -> Result<Node> {
        let line = index + 1;
        let lines = self.lines;
        let text = &lines[index];
        let prefix = indent_prefix(text).to_string();

        let tokens = scan_line(text, line)?;
        validate_line(&tokens, line)?;
        let tokens = expand_literals(tokens)?;

        let opens_suite = self
            .next_nonblank(self.current)
            .map_or(false, |next| indentation(&lines[next]).unwrap_or(0) > indent);

        if !opens_suite {
            return Ok(Node::Line {
                line,
                prefix,
                statements: parse_statements(&tokens, line)?,
            });
        }

        let header = match split_trailing_colon(&tokens) {
            Some(header_tokens) => parse_block_header(header_tokens, line)?,
            None => return Err(Error::syntax(line, "Illegal block statement")),
        };
        let body = self.parse_block(Some(indent))?;

        Ok(Node::Block {
            line,
            prefix,
            header,
            body,
            suspend: false,
        })
    }

    fn next_nonblank(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&i| indentation(&self.lines[i]).is_some())
    }
}

/// Header tokens of a suite line, which must end in `:`
fn split_trailing_colon(tokens: &[Token]) -> Option<&[Token]> {
    match tokens.split_last() {
        Some((last, header)) if last.kind == TokenKind::Colon => Some(header),
        _ => None,
    }
}

/// Parses a prepared unit into its indentation tree
pub fn parse_unit(lines: &[String]) -> Result<Vec<Node>> {
    BlockParser::new(lines).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BlockHeader;

    fn lines(src: &str) -> Vec<String> {
        src.split('\n').map(String::from).collect()
    }

    #[test]
    fn test_nested_blocks() {
        let nodes = parse_unit(&lines("if a:\n    b()\n    while c:\n        d()\n\ne()")).unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            Node::Block { header, body, .. } => {
                assert!(matches!(header, BlockHeader::If(_)));
                assert_eq!(body.len(), 2);
                assert_eq!(body[1].last_line(), 4);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(nodes[1].line(), 6);
    }

    #[test]
    fn test_first_line_indented() {
        assert_eq!(
            parse_unit(&lines("\n  x = 1")).unwrap_err(),
            Error::syntax(2, "First line must not be indented")
        );
    }

    #[test]
    fn test_inconsistent_indentation() {
        assert_eq!(
            parse_unit(&lines("if a:\n        b()\n    c()")).unwrap_err(),
            Error::syntax(3, "Inconsistent indentation")
        );
    }

    #[test]
    fn test_suite_header_needs_colon() {
        assert_eq!(
            parse_unit(&lines("x = 1\n    y = 2")).unwrap_err(),
            Error::syntax(1, "Illegal block statement")
        );
    }

    #[test]
    fn test_errors_come_in_line_order() {
        let err = parse_unit(&lines("if a:\n    var b = 1\nnull")).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.line), Some(2));
    }
}
