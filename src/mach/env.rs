use super::command::Pending;
use super::data::DataPointer;
use super::{Stack, VarRef};
use crate::lang::{token::Token, ErrorCode, LineNumber};
use std::collections::HashMap;
use std::rc::Rc;

/// A resumable spot: a stored line (or the direct line) and a token index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: Option<LineNumber>,
    pub token: usize,
}

impl Position {
    pub fn new(line: Option<LineNumber>, token: usize) -> Position {
        Position { line, token }
    }

    pub fn is_direct(&self) -> bool {
        self.line.is_none()
    }
}

/// One entry of the shared GOSUB/FOR stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Gosub {
        ret: Position,
    },
    For {
        var: VarRef,
        limit: f64,
        step: f64,
        body: Position,
    },
}

impl Frame {
    fn position(&self) -> Position {
        match self {
            Frame::Gosub { ret } => *ret,
            Frame::For { body, .. } => *body,
        }
    }
}

/// The condition a trap handler is servicing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastError {
    pub statement: Position,
    pub line: Option<LineNumber>,
    pub code: ErrorCode,
    pub stack_depth: usize,
}

impl LastError {
    pub fn number(&self) -> u16 {
        self.code.number().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub params: Vec<Rc<str>>,
    pub body: Rc<[Token]>,
}

/// ## Run environment
///
/// Control state for one interpreter session. `clear` resets everything
/// except where execution currently is.
#[derive(Debug)]
pub struct Environment {
    pub running: bool,
    pub line: Option<LineNumber>,
    pub statement: Position,
    pub direct: Rc<[Token]>,
    pub cont: Option<Position>,
    /// Whether CONT re-enters an error handler.
    pub cont_trapping: bool,
    pub data: Option<DataPointer>,
    pub last_error: Option<LastError>,
    pub trap: Option<LineNumber>,
    pub trap_depth: usize,
    pub trapping: bool,
    pub keyboard_break: bool,
    pub stack: Stack<Frame>,
    pub functions: HashMap<Rc<str>, UserFunction>,
    pub pending: Option<Pending>,
}

impl Default for Environment {
    fn default() -> Environment {
        Environment {
            running: false,
            line: None,
            statement: Position::new(None, 0),
            direct: Rc::from(Vec::new()),
            cont: None,
            cont_trapping: false,
            data: None,
            last_error: None,
            trap: None,
            trap_depth: 0,
            trapping: false,
            keyboard_break: false,
            stack: Stack::new("STACK OVERFLOW"),
            functions: HashMap::default(),
            pending: None,
        }
    }
}

impl Environment {
    pub fn clear(&mut self) {
        self.cont = None;
        self.cont_trapping = false;
        self.data = None;
        self.last_error = None;
        self.trap = None;
        self.trap_depth = 0;
        self.trapping = false;
        self.keyboard_break = false;
        self.stack.clear();
        self.functions.clear();
        self.pending = None;
    }

    pub fn is_direct(&self) -> bool {
        self.line.is_none()
    }

    /// Drop frames that point into a direct line about to be replaced.
    pub fn forget_direct_frames(&mut self) {
        if let Some(index) = self.stack.iter().position(|f| f.position().is_direct()) {
            self.stack.truncate(index);
            if self.trap_depth > index {
                self.trap_depth = index;
            }
        }
    }
}
