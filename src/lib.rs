//! # nanoscript - math-notation game scripts compiled to JavaScript
//!
//! A source-to-source compiler for **nanoscript**, an indentation-sensitive
//! scripting dialect with mathematical notation, into JavaScript meant to run
//! inside a generator driven once per rendered frame.
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> nanoscript::Result<()> {
//! let js = nanoscript::compile("x = 2y")?;
//! assert_eq!(js, "x = 2 * y;");
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - Blocks by indentation after a trailing `:` (`if`, `while`, `until`,
//!   `for`, `with`, `local`, `preservingTransform`, `def`), or inline on one
//!   line: `if x > 0: f()`
//! - Ranges and containers: `for 0 ≤ i < n:`, `for p ∊ points:`
//! - Member aliasing: `with x, y ∊ p:` writes `x` and `y` back on exit
//! - Notation: `3x²`, `½w`, `|v|`, `‖v‖`, `⌊x⌋`, `sinθ`, `90°`, `50%`, `#f80`
//!
//! ## Architecture
//!
//! ```text
//! Source → Protector → Compactor → LineScanner → Block Tree → Notation → Lowering → JavaScript
//! ```
//!
//! ### Main Components
//!
//! - [`source`] - Literal protection, comment removal, line compaction
//! - [`lexer`] - Per-line tokenizer
//! - [`parser`] - Indentation tree and statement AST
//! - [`notation`] - Expression rewrites and rendering
//! - [`compiler`] - Lowering, suspension points, modes and program assembly
//!
//! ## Error Handling
//!
//! The first failure aborts the unit being compiled:
//!
//! ```rust
//! let err = nanoscript::compile("x = 1\nvar y = 2").unwrap_err();
//! let diagnostic = err.diagnostic().unwrap();
//! assert_eq!(diagnostic.line, 2);
//! assert!(diagnostic.message.contains("\"let\""));
//! ```
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

#![allow(clippy::needless_range_loop)] // Index needed for error messages

/// Version of the nanoscript compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod notation;
pub mod parser;
pub mod source;

// Re-export main types
pub use compiler::{
    CompileOptions, Compiler, DirectorySource, FrameSignal, GameManifest, SourceProvider,
    Suspension,
};
pub use error::{Diagnostic, Error, Result};
pub use lexer::{LineScanner, Token, TokenKind};
pub use parser::{BlockHeader, Node, Statement};

/// Compile one stand-alone unit with default options
///
/// Loops do not receive suspension points; use [`Compiler::compile_source`]
/// with [`Suspension::Allowed`] for code that runs inside a frame.
pub fn compile(source: &str) -> Result<String> {
    Compiler::default().compile_source(source, Suspension::Forbidden)
}
