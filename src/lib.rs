//! # Classic BASIC
//!
//! A line-numbered BASIC interpreter in the 8-bit tradition.
//!
//! Begin by opening a terminal and running the executable. If you get the
//! following, you have achieved success.
//! ```text
//! READY.
//! █
//! ```
//!
//! Type a line with a number to store it, or without one to run it now.
//! A program file given on the command line is loaded and run at start-up.
//! Set `BASIC_LOG=debug` to trace the interpreter on stderr.
//!
//! The machine can also be driven without a terminal:
//! ```
//! use basic::mach::{Event, Runtime, Tape};
//!
//! let tape = Tape::new();
//! let mut runtime = Runtime::new(Box::new(tape.clone()));
//! runtime.enter("10 PRINT \"HELLO\"");
//! runtime.enter("RUN");
//! assert_eq!(runtime.execute(100), Event::Stopped);
//! assert_eq!(tape.take_output(), "HELLO\n");
//! ```

pub mod lang;
pub mod mach;
pub mod term;
