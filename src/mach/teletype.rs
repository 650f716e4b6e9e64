use crate::lang::Error;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Width of a PRINT comma zone.
pub const COMMA_ZONE: usize = 14;

/// ## Teletype device
///
/// Everything the machine prints or reads goes through here. `read` never
/// blocks; `None` means no line has been typed yet and the caller should
/// try again on a later step.
pub trait Teletype {
    fn write(&mut self, s: &str);
    fn read(&mut self) -> Option<String>;
    fn column(&self) -> usize;

    fn newline(&mut self) {
        self.write("\n");
    }

    fn space(&mut self, count: usize) {
        self.write(&" ".repeat(count));
    }

    fn tab(&mut self, column: usize) {
        let current = self.column();
        if column > current {
            self.space(column - current);
        }
    }

    fn comma(&mut self) {
        let next = (self.column() / COMMA_ZONE + 1) * COMMA_ZONE;
        self.tab(next);
    }

    fn write_error(&mut self, error: &Error) {
        if self.column() > 0 {
            self.newline();
        }
        if error.is_break() {
            self.write(&format!("{}\n", error));
        } else {
            self.write(&format!("?{}\n", error));
        }
    }
}

#[derive(Debug, Default)]
struct TapeInner {
    output: String,
    input: VecDeque<String>,
    column: usize,
}

/// In-memory teletype. Clones share the same tape so a host or test can
/// keep a handle after giving one to the `Runtime`.
#[derive(Debug, Clone, Default)]
pub struct Tape {
    inner: Rc<RefCell<TapeInner>>,
}

impl Tape {
    pub fn new() -> Tape {
        Tape::default()
    }

    /// Queue a typed line for a later `read`.
    pub fn push_input(&self, line: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.input.push_back(line.to_string());
    }

    pub fn take_output(&self) -> String {
        std::mem::take(&mut self.inner.borrow_mut().output)
    }
}

impl Teletype for Tape {
    fn write(&mut self, s: &str) {
        let mut inner = self.inner.borrow_mut();
        for ch in s.chars() {
            if ch == '\n' {
                inner.column = 0;
            } else {
                inner.column += 1;
            }
        }
        inner.output.push_str(s);
    }

    fn read(&mut self) -> Option<String> {
        let mut inner = self.inner.borrow_mut();
        let line = inner.input.pop_front();
        if line.is_some() {
            inner.column = 0;
        }
        line
    }

    fn column(&self) -> usize {
        self.inner.borrow().column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones() {
        let mut tape = Tape::new();
        tape.write("AB");
        tape.comma();
        assert_eq!(tape.column(), 14);
        tape.comma();
        assert_eq!(tape.column(), 28);
        tape.tab(5);
        assert_eq!(tape.column(), 28);
        tape.newline();
        assert_eq!(tape.column(), 0);
        assert_eq!(tape.take_output().len(), 29);
    }

    #[test]
    fn test_input() {
        let mut tape = Tape::new();
        let handle = tape.clone();
        assert_eq!(tape.read(), None);
        tape.write("? ");
        handle.push_input("42");
        assert_eq!(tape.read(), Some("42".to_string()));
        assert_eq!(tape.column(), 0);
    }
}
