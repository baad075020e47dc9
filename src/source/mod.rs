//! Source text preparation
//!
//! Protects string literals, strips comments and compacts multi-line
//! expressions so that structural passes can work one line at a time.

mod buffer;
mod compact;
mod protect;

pub use buffer::{indent_prefix, indentation, SourceBuffer};
pub use compact::{compact_multiline_literals, BracketBalance, BracketKind};
pub use protect::{
    is_reserved_char, protect_strings, strip_comments, unprotect_strings, ProtectionMap,
    ESCAPED_QUOTE_SHIELD, PROTECTION_BLOCK_START,
};
