//! # BASIC
//!
//! The BASIC programming language as it was in the 8-bit era.
//!

fn main() {
    basic::term::main();
}
