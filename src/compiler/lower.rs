//! Tree lowering with suspension planning
//!
//! Output keeps one host line per source line: a block's opening code replaces
//! its header line and its closing code is appended to the last line of its
//! body, so diagnostics and stack traces in the host point at source lines.

use super::desugar::{lower_header, suspension_point, Lowered};
use super::gensym::Gensym;
use crate::error::{Error, Result};
use crate::notation::expand;
use crate::parser::{BlockHeader, Node, Statement};

/// Whether a unit may contain suspension points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    /// The unit runs inside the frame generator
    Allowed,
    /// The unit runs inside an ordinary function
    Forbidden,
}

/// Marks the loops that receive a suspension point
///
/// Loops directly in an allowed unit qualify; loops inside a `def` body never
/// do, since a nested function cannot suspend its caller.
pub fn plan_suspension(nodes: &mut [Node], suspension: Suspension) {
    plan_nodes(nodes, suspension == Suspension::Allowed);
}

fn plan_nodes(nodes: &mut [Node], allowed: bool) {
    for node in nodes {
        match node {
            Node::Block {
                header,
                body,
                suspend,
                ..
            } => {
                *suspend = allowed && header.is_loop();
                let inner = allowed && !matches!(header, BlockHeader::Def { .. });
                plan_nodes(body, inner);
            }
            Node::Line { statements, .. } => plan_statements(statements, allowed),
        }
    }
}

fn plan_statements(statements: &mut [Statement], allowed: bool) {
    for statement in statements {
        if let Statement::Inline {
            header,
            body,
            suspend,
        } = statement
        {
            *suspend = allowed && header.is_loop();
            let inner = allowed && !matches!(header, BlockHeader::Def { .. });
            plan_statements(body, inner);
        }
    }
}

/// Lowers an indentation tree to host lines
pub struct Lowerer<'a> {
    gensym: &'a mut Gensym,
    suspension: Suspension,
    yield_mask: u32,
    out: Vec<String>,
}

impl<'a> Lowerer<'a> {
    /// `line_count` is the number of source lines of the unit
    pub fn new(
        gensym: &'a mut Gensym,
        suspension: Suspension,
        yield_mask: u32,
        line_count: usize,
    ) -> Self {
        Lowerer {
            gensym,
            suspension,
            yield_mask,
            out: vec![String::new(); line_count],
        }
    }

    pub fn lower(mut self, nodes: &[Node]) -> Result<Vec<String>> {
        self.lower_nodes(nodes, false)?;
        Ok(self.out)
    }

    fn lower_nodes(&mut self, nodes: &[Node], in_function: bool) -> Result<()> {
        for node in nodes {
            match node {
                Node::Line {
                    line,
                    prefix,
                    statements,
                } => {
                    let code = self.lower_statements(statements, *line, in_function)?;
                    self.set_line(*line, format!("{}{}", prefix, code));
                }

                Node::Block {
                    line,
                    prefix,
                    header,
                    body,
                    suspend,
                } => {
                    let Lowered { open, close } = self.open_block(header, *line, *suspend, in_function)?;
                    self.set_line(*line, format!("{}{}", prefix, open));

                    let body_in_function = in_function || matches!(header, BlockHeader::Def { .. });
                    self.lower_nodes(body, body_in_function)?;

                    self.append_to_line(node.last_line(), &close);
                }
            }
        }
        Ok(())
    }

    fn lower_statements(
        &mut self,
        statements: &[Statement],
        line: usize,
        in_function: bool,
    ) -> Result<String> {
        let mut parts = Vec::with_capacity(statements.len());

        for statement in statements {
            match statement {
                Statement::Expression(expr) => parts.push(format!("{};", expand(expr, line)?)),

                Statement::DebugWatch(expr) => {
                    let label = expr.source_text().replace('"', "\\\"");
                    parts.push(format!(
                        "(_debugWatchEnabled && _debugWatch(\"{}\", {}));",
                        label,
                        expand(expr, line)?
                    ));
                }

                Statement::Inline {
                    header,
                    body,
                    suspend,
                } => {
                    let Lowered { open, close } = self.open_block(header, line, *suspend, in_function)?;
                    let body_in_function = in_function || matches!(header, BlockHeader::Def { .. });
                    let body = self.lower_statements(body, line, body_in_function)?;
                    if body.is_empty() {
                        parts.push(format!("{} {}", open, close));
                    } else {
                        parts.push(format!("{} {} {}", open, body, close));
                    }
                }
            }
        }

        Ok(parts.join(" "))
    }

    /// Opening code of a block, with its suspension point when one is planned
    fn open_block(
        &mut self,
        header: &BlockHeader,
        line: usize,
        suspend: bool,
        in_function: bool,
    ) -> Result<Lowered> {
        if suspend && (in_function || self.suspension == Suspension::Forbidden) {
            return Err(Error::syntax(
                line,
                format!(
                    "\"{}\" loop may not suspend inside a function body",
                    header.keyword()
                ),
            ));
        }

        let mut lowered = lower_header(header, line, self.gensym)?;
        if suspend {
            lowered.open.push(' ');
            lowered.open.push_str(&suspension_point(self.yield_mask));
        }
        Ok(lowered)
    }

    fn set_line(&mut self, line: usize, code: String) {
        if let Some(slot) = self.out.get_mut(line - 1) {
            *slot = code;
        }
    }

    fn append_to_line(&mut self, line: usize, code: &str) {
        if let Some(slot) = self.out.get_mut(line - 1) {
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(code);
        }
    }
}
