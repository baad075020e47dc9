//! Lexical analysis for nanoscript
//!
//! Converts one logical (already compacted) source line into tokens. Unicode
//! notation is recognized here so later passes rewrite tokens, not text.

pub mod glyphs;
mod line_scanner;
mod token;

pub use line_scanner::{scan_line, LineScanner};
pub use token::{Token, TokenKind};
