/*!
## Rust Machine Module

This Rust module is the interpreter for BASIC. It walks tokenised lines
directly, one statement per step, so a host can interleave execution with
terminal input and Ctrl-C handling.

*/

mod command;
mod cursor;
mod data;
mod env;
mod eval;
mod function;
mod listing;
mod operation;
mod runtime;
mod stack;
mod teletype;
mod val;
mod var;

pub use cursor::Cursor;
pub use data::{DataPointer, Datum};
pub use env::{Environment, Frame, LastError, Position, UserFunction};
pub use eval::MAX_DEPTH;
pub use function::Random;
pub use listing::Listing;
pub use operation::Operation;
pub use runtime::{Event, Flow, Halt, Runtime};
pub use stack::{Stack, MAX_STACK};
pub use teletype::{Tape, Teletype, COMMA_ZONE};
pub use val::{parse_number, Val, MAX_STRING_LEN};
pub use var::{Binding, VarRef, Variables, IMPLICIT_BOUND};

#[cfg(test)]
mod tests;
