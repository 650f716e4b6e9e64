/*!
# Rust Language Module

This Rust module provides lexical analysis of the BASIC language.
Program text becomes a `Line` of tokens which the machine walks directly.

*/

#[macro_use]
mod error;
mod lex;
mod line;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use lex::tokenise;
pub use line::join;
pub use line::Line;

pub type LineNumber = u16;

/// Highest line number accepted by the tokeniser.
pub const MAX_LINE_NUMBER: LineNumber = 63999;
