//! nanoscript parser
//!
//! Turns prepared source lines into an explicit indentation tree whose nodes
//! carry statements and block headers. Expressions are left as token runs for
//! the notation expander.

pub mod ast;
mod block_tree;
mod stmt_parser;
mod validate;

pub use ast::{BlockHeader, Expr, ForClause, Node, RangeBound, Statement, WithClause};
pub use block_tree::{parse_unit, BlockParser};
pub use stmt_parser::{
    block_keyword, find_top_level, matching_close, parse_block_header, parse_for_clause,
    parse_statements, parse_with_clause,
};
pub use validate::{suggested_alternative, validate_line};
