use super::command::{self, Command, Pending, Poll, StepFn, StepState};
use super::env::{Environment, LastError, Position};
use super::function::Random;
use super::{Cursor, Listing, Tape, Teletype, Variables};
use crate::error;
use crate::lang::{token::Token, tokenise, Error, ErrorCode, LineNumber};
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// ## Events for the host
///
/// Everything the machine prints has already gone to the teletype by the
/// time an event is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The cycle budget ran out; call `execute` again.
    Running,
    /// An interruptable statement is polling the teletype for a line.
    Waiting,
    /// Nothing is running; the host may `enter` another line.
    Stopped,
    /// A condition was reported and execution stopped.
    Error(Error),
    /// SYSTEM was executed.
    Exit,
}

/// Why a run ended, kept apart from the error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Normal,
    End,
    Break,
    System,
}

/// What a statement asks the executor to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Finished; the statement must end here.
    Next,
    /// Dispatch again from the cursor without a statement boundary.
    Repeat,
    /// The cursor was moved.
    Jump,
    /// Waiting on the teletype.
    Wait,
    Halt(Halt),
}

/// ## Interpreter session
///
/// Owns the program, the variables, the run environment and the teletype.
/// The host drives it by calling `execute` in a loop.
pub struct Runtime {
    pub(super) listing: Listing,
    pub(super) vars: Variables,
    pub(super) env: Environment,
    pub(super) cursor: Cursor,
    pub(super) tty: Box<dyn Teletype>,
    pub(super) random: Random,
    pub(super) depth: usize,
    report: Option<Error>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Box::new(Tape::default()))
    }
}

impl Runtime {
    pub fn new(tty: Box<dyn Teletype>) -> Runtime {
        Runtime {
            listing: Listing::default(),
            vars: Variables::new(),
            env: Environment::default(),
            cursor: Cursor::default(),
            tty,
            random: Random::default(),
            depth: 0,
            report: None,
        }
    }

    /// Accept a typed line. Numbered lines are stored (or deleted when
    /// empty); anything else starts running immediately. Returns true when
    /// the line is worth keeping in history.
    pub fn enter(&mut self, s: &str) -> bool {
        let line = match tokenise(s) {
            Ok(line) => line,
            Err(error) => {
                self.report(error);
                return false;
            }
        };
        if self.env.running {
            self.report(error!(UnableToEdit));
            return false;
        }
        if line.is_direct() {
            if line.is_empty() {
                return false;
            }
            self.env.forget_direct_frames();
            self.env.direct = line.shared();
            self.env.line = None;
            self.cursor = Cursor::new(line.shared(), 0);
            self.env.running = true;
            trace!(line = %line, "direct");
        } else {
            self.listing.set_program_line(line);
            self.env.cont = None;
        }
        true
    }

    /// Replace the program with numbered lines of text.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let mut listing = Listing::default();
        for s in text.lines() {
            if s.trim().is_empty() {
                continue;
            }
            let line = tokenise(s)?;
            if line.is_direct() {
                return Err(error!(IllegalDirect; "LINE NUMBER MISSING"));
            }
            listing.set_program_line(line);
        }
        self.listing = listing;
        self.clear();
        debug!(lines = self.listing.lines().count(), "loaded");
        Ok(())
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn is_running(&self) -> bool {
        self.env.running
    }

    /// Request a break. It is noticed at the next statement boundary.
    pub fn interrupt(&mut self) {
        if self.env.running {
            self.env.keyboard_break = true;
        }
    }

    /// Run up to `cycles` steps.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(error) = self.report.take() {
            return Event::Error(error);
        }
        for _ in 0..cycles {
            match self.execute_line() {
                Event::Running => {}
                event => return event,
            }
        }
        Event::Running
    }

    /// One step: a single statement, or one poll of a waiting statement.
    pub fn execute_line(&mut self) -> Event {
        if !self.env.running {
            return Event::Stopped;
        }
        match self.step() {
            Ok(Flow::Wait) => Event::Waiting,
            Ok(Flow::Halt(halt)) => self.halt(halt),
            Ok(_) => Event::Running,
            Err(error) => self.handle_error(error),
        }
    }

    pub(super) fn clear(&mut self) {
        self.vars.clear();
        self.env.clear();
    }

    pub(super) fn position(&self) -> Position {
        Position::new(self.env.line, self.cursor.pos())
    }

    pub(super) fn jump(&mut self, position: Position) -> Result<()> {
        let tokens = match position.line {
            Some(number) => self.listing.get_line(number)?.shared(),
            None => self.env.direct.clone(),
        };
        self.cursor = Cursor::new(tokens, position.token);
        self.env.line = position.line;
        Ok(())
    }

    pub(super) fn goto_line(&mut self, number: LineNumber) -> Result<()> {
        self.jump(Position::new(Some(number), 0))
    }

    fn report(&mut self, error: Error) {
        self.tty.write_error(&error);
        self.report = Some(error);
    }

    fn step(&mut self) -> Result<Flow> {
        if self.env.keyboard_break {
            self.env.keyboard_break = false;
            if self.env.pending.take().is_some() {
                self.cursor.set_pos(self.env.statement.token);
            }
            return Ok(Flow::Halt(Halt::Break));
        }
        if let Some(pending) = self.env.pending.take() {
            return self.poll(pending.step, pending.state);
        }
        if !self.next_statement() {
            return Ok(Flow::Halt(Halt::Normal));
        }
        self.dispatch()
    }

    /// Move past colons and finished lines to the start of a statement.
    fn next_statement(&mut self) -> bool {
        loop {
            match self.cursor.peek() {
                Some(Token::Colon) => self.cursor.advance(),
                Some(_) => {
                    self.env.statement = self.position();
                    return true;
                }
                None => {
                    let next = match self.env.line {
                        Some(number) => self
                            .listing
                            .next_line(number)
                            .map(|line| (line.number(), line.shared())),
                        None => None,
                    };
                    match next {
                        Some((number, tokens)) => {
                            self.env.line = number;
                            self.cursor = Cursor::new(tokens, 0);
                        }
                        None => return false,
                    }
                }
            }
        }
    }

    fn dispatch(&mut self) -> Result<Flow> {
        loop {
            let flow = match self.cursor.peek().cloned() {
                None | Some(Token::Colon) => Flow::Next,
                Some(Token::Ident(_)) => command::assign(self)?,
                Some(token) => {
                    let (word, command) = match token.statement() {
                        Some(word) => match command::lookup(word) {
                            Some(command) => (word.clone(), command),
                            None => return Err(error!(SyntaxError)),
                        },
                        None => return Err(error!(SyntaxError)),
                    };
                    self.cursor.advance();
                    trace!(line = ?self.env.line, statement = %word, "dispatch");
                    match command {
                        Command::Execute(execute) => execute(self)?,
                        Command::Interruptable(setup, step) => {
                            let state = setup(self)?;
                            return self.poll(step, state);
                        }
                    }
                }
            };
            match flow {
                Flow::Repeat => continue,
                Flow::Next => return self.end_of_statement(),
                flow => return Ok(flow),
            }
        }
    }

    fn poll(&mut self, step: StepFn, state: StepState) -> Result<Flow> {
        match step(self, state)? {
            Poll::Done => self.end_of_statement(),
            Poll::Continue(state) => {
                self.env.pending = Some(Pending { step, state });
                Ok(Flow::Wait)
            }
        }
    }

    fn end_of_statement(&self) -> Result<Flow> {
        if self.cursor.at_end_of_statement() {
            Ok(Flow::Next)
        } else {
            Err(error!(SyntaxError))
        }
    }

    fn halt(&mut self, halt: Halt) -> Event {
        self.env.running = false;
        self.env.pending = None;
        let trapping = std::mem::take(&mut self.env.trapping);
        let deferred = !self.env.is_direct();
        let here = self.position();
        match halt {
            Halt::Normal => {
                if deferred {
                    self.env.cont = None;
                }
                Event::Stopped
            }
            Halt::End => {
                if deferred {
                    self.env.cont = Some(here);
                    self.env.cont_trapping = trapping;
                }
                Event::Stopped
            }
            Halt::Break => {
                if deferred {
                    self.env.cont = Some(here);
                    self.env.cont_trapping = trapping;
                }
                let error = error!(Break, self.env.line);
                debug!(line = ?self.env.line, "break");
                self.tty.write_error(&error);
                Event::Error(error)
            }
            Halt::System => Event::Exit,
        }
    }

    fn handle_error(&mut self, error: Error) -> Event {
        let mut error = match error.line_number() {
            Some(_) => error,
            None => error.in_line_number(self.env.line),
        };
        if !self.env.is_direct() && !self.env.trapping && !error.is_break() {
            if let Some(trap) = self.env.trap {
                match self.trap(&error, trap) {
                    Ok(()) => return Event::Running,
                    Err(e) => error = e.in_line_number(self.env.line),
                }
            }
        }
        self.env.running = false;
        self.env.pending = None;
        self.env.trapping = false;
        if !self.env.is_direct() {
            self.env.cont = match error.code() {
                ErrorCode::IllegalDeferred | ErrorCode::UnableToEdit | ErrorCode::CannotContinue => {
                    None
                }
                _ => Some(self.env.statement),
            };
            self.env.cont_trapping = false;
        }
        debug!(error = %error, "uncaught");
        self.tty.write_error(&error);
        Event::Error(error)
    }

    fn trap(&mut self, error: &Error, trap: LineNumber) -> Result<()> {
        self.env.last_error = Some(LastError {
            statement: self.env.statement,
            line: error.line_number(),
            code: error.code(),
            stack_depth: self.env.stack.len(),
        });
        self.env.stack.truncate(self.env.trap_depth);
        self.env.trapping = true;
        self.env.pending = None;
        debug!(error = %error, trap, "trapped");
        self.goto_line(trap)
    }
}
