use super::data::{self, DataPointer};
use super::env::{Frame, UserFunction};
use super::runtime::{Flow, Halt};
use super::val::parse_number;
use super::{Runtime, Val, VarRef};
use crate::error;
use crate::lang::{
    token::{Operator, Token, Word},
    Error, ErrorCode, LineNumber, MAX_LINE_NUMBER,
};
use std::rc::Rc;
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

pub type ExecuteFn = fn(&mut Runtime) -> Result<Flow>;
pub type SetupFn = fn(&mut Runtime) -> Result<StepState>;
pub type StepFn = fn(&mut Runtime, StepState) -> Result<Poll>;

/// How a statement runs: once, or set up once and then stepped on every
/// re-entry until it reports `Done`.
#[derive(Clone, Copy)]
pub enum Command {
    Execute(ExecuteFn),
    Interruptable(SetupFn, StepFn),
}

#[derive(Debug)]
pub enum Poll {
    Done,
    Continue(StepState),
}

#[derive(Debug)]
pub enum StepState {
    Input(InputState),
}

#[derive(Debug)]
pub struct InputState {
    prompt: Rc<str>,
    vars: Vec<VarRef>,
}

/// An interruptable statement waiting to be stepped again.
pub struct Pending {
    pub step: StepFn,
    pub state: StepState,
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pending {{ {:?} }}", self.state)
    }
}

/// ## Statement catalogue
pub fn lookup(word: &Word) -> Option<Command> {
    use Command::*;
    let command = match word {
        Word::Clear => Execute(r#clear),
        Word::Cont => Execute(r#cont),
        Word::Data => Execute(r#data),
        Word::Def => Execute(r#def),
        Word::Delete => Execute(r#delete),
        Word::Dim => Execute(r#dim),
        Word::Else => Execute(r#rem),
        Word::End => Execute(r#end),
        Word::Error => Execute(r#error),
        Word::For => Execute(r#for),
        Word::Gosub => Execute(r#gosub),
        Word::Goto => Execute(r#goto),
        Word::If => Execute(r#if),
        Word::Input => Interruptable(input_setup, input_step),
        Word::Let => Execute(r#let),
        Word::List => Execute(r#list),
        Word::New => Execute(r#new),
        Word::Next => Execute(r#next),
        Word::On => Execute(r#on),
        Word::Print => Execute(r#print),
        Word::Read => Execute(r#read),
        Word::Rem => Execute(r#rem),
        Word::Restore => Execute(r#restore),
        Word::Resume => Execute(r#resume),
        Word::Return => Execute(r#return),
        Word::Run => Execute(r#run),
        Word::Stop => Execute(r#stop),
        Word::System => Execute(r#system),
        Word::Fn | Word::Step | Word::Then | Word::To => return None,
    };
    Some(command)
}

fn r#clear(rt: &mut Runtime) -> Result<Flow> {
    rt.clear();
    Ok(Flow::Next)
}

fn r#cont(rt: &mut Runtime) -> Result<Flow> {
    if !rt.env.is_direct() {
        return Err(error!(IllegalDeferred));
    }
    match rt.env.cont.take() {
        Some(position) => {
            debug!(line = ?position.line, token = position.token, "continue");
            rt.jump(position)?;
            rt.env.trapping = rt.env.cont_trapping;
            Ok(Flow::Jump)
        }
        None => Err(error!(CannotContinue)),
    }
}

fn r#data(rt: &mut Runtime) -> Result<Flow> {
    rt.cursor.skip_statement();
    Ok(Flow::Next)
}

fn r#def(rt: &mut Runtime) -> Result<Flow> {
    if rt.env.is_direct() {
        return Err(error!(IllegalDirect));
    }
    rt.cursor.expect(&Token::Word(Word::Fn))?;
    let name = ident(rt)?;
    rt.cursor.expect(&Token::LParen)?;
    let mut params = vec![];
    loop {
        params.push(ident(rt)?);
        if !rt.cursor.accept(&Token::Comma) {
            break;
        }
    }
    rt.cursor.expect(&Token::RParen)?;
    rt.cursor.expect(&Token::Operator(Operator::Equal))?;
    let start = rt.cursor.pos();
    rt.cursor.skip_statement();
    let body: Rc<[Token]> = rt.cursor.tokens()[start..rt.cursor.pos()].into();
    if body.is_empty() {
        return Err(error!(SyntaxError));
    }
    rt.env.functions.insert(name, UserFunction { params, body });
    Ok(Flow::Next)
}

fn r#delete(rt: &mut Runtime) -> Result<Flow> {
    if !rt.env.is_direct() {
        return Err(error!(UnableToEdit));
    }
    if rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    let (start, end) = line_range(rt)?;
    rt.listing.delete_lines(start, end);
    rt.env.cont = None;
    Ok(Flow::Next)
}

fn r#dim(rt: &mut Runtime) -> Result<Flow> {
    loop {
        let name = ident(rt)?;
        rt.cursor.expect(&Token::LParen)?;
        let mut dimensions = vec![];
        loop {
            dimensions.push(rt.get_short()?);
            if !rt.cursor.accept(&Token::Comma) {
                break;
            }
        }
        rt.cursor.expect(&Token::RParen)?;
        rt.vars.dimension_array(&name, &dimensions)?;
        if !rt.cursor.accept(&Token::Comma) {
            return Ok(Flow::Next);
        }
    }
}

fn r#end(_rt: &mut Runtime) -> Result<Flow> {
    Ok(Flow::Halt(Halt::End))
}

fn r#error(rt: &mut Runtime) -> Result<Flow> {
    let n = rt.get_short()?;
    if n < 0 {
        return Err(error!(IllegalQuantity));
    }
    match ErrorCode::from_number(n as u16) {
        Some(code) => Err(Error::new(code)),
        None => Err(error!(IllegalQuantity)),
    }
}

fn r#for(rt: &mut Runtime) -> Result<Flow> {
    let var = rt.get_left_value()?;
    if var.is_string() {
        return Err(error!(TypeMismatch));
    }
    if !var.indexes().is_empty() {
        return Err(error!(SyntaxError));
    }
    rt.cursor.expect(&Token::Operator(Operator::Equal))?;
    let start = rt.get_expression()?.as_double()?;
    var.set(&mut rt.vars, Val::Number(start))?;
    rt.cursor.expect(&Token::Word(Word::To))?;
    let limit = rt.get_expression()?.as_double()?;
    let step = if rt.cursor.accept(&Token::Word(Word::Step)) {
        rt.get_expression()?.as_double()?
    } else {
        1.0
    };
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    let reuse = rt
        .env
        .stack
        .iter()
        .enumerate()
        .rev()
        .take_while(|(_, frame)| matches!(frame, Frame::For { .. }))
        .find(|(_, frame)| matches!(frame, Frame::For { var: v, .. } if *v == var))
        .map(|(i, _)| i);
    if let Some(index) = reuse {
        rt.env.stack.truncate(index);
    }
    let body = rt.position();
    rt.env.stack.push(Frame::For {
        var,
        limit,
        step,
        body,
    })?;
    Ok(Flow::Next)
}

fn r#gosub(rt: &mut Runtime) -> Result<Flow> {
    let number = rt.expect_line_number()?;
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    gosub_line(rt, number)
}

fn gosub_line(rt: &mut Runtime, number: LineNumber) -> Result<Flow> {
    rt.listing.get_line(number)?;
    rt.env.stack.test_for_overflow()?;
    let ret = rt.position();
    rt.env.stack.push(Frame::Gosub { ret })?;
    rt.goto_line(number)?;
    Ok(Flow::Jump)
}

fn r#goto(rt: &mut Runtime) -> Result<Flow> {
    let number = rt.expect_line_number()?;
    rt.goto_line(number)?;
    Ok(Flow::Jump)
}

fn r#if(rt: &mut Runtime) -> Result<Flow> {
    let condition = rt.get_expression()?.is_true()?;
    let via_goto = match rt.cursor.next() {
        Some(Token::Word(Word::Then)) => false,
        Some(Token::Word(Word::Goto)) => true,
        _ => return Err(error!(SyntaxError)),
    };
    if condition {
        if via_goto {
            return r#goto(rt);
        }
        if let Some(number) = rt.get_line_number() {
            rt.goto_line(number)?;
            return Ok(Flow::Jump);
        }
        return Ok(Flow::Repeat);
    }
    match rt.cursor.find_else() {
        Some(pos) => {
            rt.cursor.set_pos(pos);
            if let Some(number) = rt.get_line_number() {
                rt.goto_line(number)?;
                return Ok(Flow::Jump);
            }
            Ok(Flow::Repeat)
        }
        None => {
            rt.cursor.skip_line();
            Ok(Flow::Next)
        }
    }
}

fn input_setup(rt: &mut Runtime) -> Result<StepState> {
    if rt.env.is_direct() {
        return Err(error!(IllegalDirect));
    }
    let mut prompt: Rc<str> = "".into();
    if let (Some(Token::String(_)), Some(Token::Semicolon)) =
        (rt.cursor.peek(), rt.cursor.peek_at(1))
    {
        if let Some(Token::String(s)) = rt.cursor.next() {
            prompt = s;
        }
        rt.cursor.advance();
    }
    let mut vars = vec![];
    loop {
        vars.push(rt.get_left_value()?);
        if !rt.cursor.accept(&Token::Comma) {
            break;
        }
    }
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    rt.tty.write(&prompt);
    rt.tty.write("? ");
    Ok(StepState::Input(InputState { prompt, vars }))
}

fn input_step(rt: &mut Runtime, state: StepState) -> Result<Poll> {
    let StepState::Input(mut state) = state;
    let line = match rt.tty.read() {
        Some(line) => line,
        None => return Ok(Poll::Continue(StepState::Input(state))),
    };
    let items = split_input(&line);
    let mut values = Vec::with_capacity(state.vars.len());
    for (var, item) in state.vars.iter().zip(&items) {
        if var.is_string() {
            values.push(Val::String(item.as_str().into()));
        } else {
            match parse_number(item) {
                Some(n) => values.push(Val::Number(n)),
                None => {
                    rt.tty.write("?REDO FROM START\n");
                    rt.tty.write(&state.prompt);
                    rt.tty.write("? ");
                    return Ok(Poll::Continue(StepState::Input(state)));
                }
            }
        }
    }
    let filled = values.len();
    for (var, val) in state.vars.iter().zip(values) {
        var.set(&mut rt.vars, val)?;
    }
    if filled < state.vars.len() {
        state.vars.drain(..filled);
        state.prompt = "?".into();
        rt.tty.write("?? ");
        return Ok(Poll::Continue(StepState::Input(state)));
    }
    if items.len() > filled {
        rt.tty.write("?EXTRA IGNORED\n");
    }
    Ok(Poll::Done)
}

/// Split a typed answer on commas outside of quotes.
fn split_input(line: &str) -> Vec<String> {
    let mut items = vec![];
    let mut item = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                was_quoted = true;
            }
            ',' if !quoted => {
                items.push(finish_item(&item, was_quoted));
                item.clear();
                was_quoted = false;
            }
            _ => item.push(ch),
        }
    }
    items.push(finish_item(&item, was_quoted));
    items
}

fn finish_item(item: &str, quoted: bool) -> String {
    if quoted {
        item.to_string()
    } else {
        item.trim().to_string()
    }
}

fn r#let(rt: &mut Runtime) -> Result<Flow> {
    let var = rt.get_left_value()?;
    rt.cursor.expect(&Token::Operator(Operator::Equal))?;
    let val = rt.get_expression()?;
    var.set(&mut rt.vars, val)?;
    Ok(Flow::Next)
}

pub(super) fn assign(rt: &mut Runtime) -> Result<Flow> {
    r#let(rt)
}

fn r#list(rt: &mut Runtime) -> Result<Flow> {
    let (start, end) = line_range(rt)?;
    for line in rt.listing.list(start, end) {
        rt.tty.write(&line);
        rt.tty.newline();
    }
    Ok(Flow::Next)
}

/// `[n][-[m]]` as an inclusive range.
fn line_range(rt: &mut Runtime) -> Result<(LineNumber, LineNumber)> {
    let from = rt.get_line_number();
    if rt.cursor.accept(&Token::Operator(Operator::Minus)) {
        let to = rt.get_line_number();
        Ok((from.unwrap_or(0), to.unwrap_or(MAX_LINE_NUMBER)))
    } else {
        match from {
            Some(n) => Ok((n, n)),
            None => Ok((0, MAX_LINE_NUMBER)),
        }
    }
}

fn r#new(rt: &mut Runtime) -> Result<Flow> {
    rt.listing.clear();
    rt.clear();
    rt.env.line = None;
    rt.cursor.skip_line();
    Ok(Flow::Halt(Halt::Normal))
}

fn r#next(rt: &mut Runtime) -> Result<Flow> {
    loop {
        let name = match rt.cursor.peek() {
            Some(Token::Ident(_)) => Some(ident(rt)?),
            _ => None,
        };
        let found = rt
            .env
            .stack
            .iter()
            .enumerate()
            .rev()
            .take_while(|(_, frame)| matches!(frame, Frame::For { .. }))
            .find(|(_, frame)| match (frame, &name) {
                (Frame::For { var, .. }, Some(name)) => var.name() == name,
                _ => true,
            })
            .map(|(i, frame)| (i, frame.clone()));
        let (index, frame) = match found {
            Some(found) => found,
            None => return Err(error!(NextWithoutFor)),
        };
        rt.env.stack.truncate(index + 1);
        if let Frame::For {
            var,
            limit,
            step,
            body,
        } = frame
        {
            let n = var.get(&rt.vars).as_double()? + step;
            if !n.is_finite() {
                return Err(error!(Overflow));
            }
            var.set(&mut rt.vars, Val::Number(n))?;
            let more = if step < 0.0 { n >= limit } else { n <= limit };
            if more {
                rt.jump(body)?;
                return Ok(Flow::Jump);
            }
            rt.env.stack.pop();
        }
        if name.is_none() || !rt.cursor.accept(&Token::Comma) {
            return Ok(Flow::Next);
        }
    }
}

fn r#on(rt: &mut Runtime) -> Result<Flow> {
    if rt.cursor.accept(&Token::Word(Word::Error)) {
        rt.cursor.expect(&Token::Word(Word::Goto))?;
        let number = rt.expect_line_number()?;
        return on_error_goto(rt, number);
    }
    let n = rt.get_short()?;
    if !(0..=255).contains(&n) {
        return Err(error!(IllegalQuantity));
    }
    let via_gosub = match rt.cursor.next() {
        Some(Token::Word(Word::Goto)) => false,
        Some(Token::Word(Word::Gosub)) => true,
        _ => return Err(error!(SyntaxError)),
    };
    let mut targets = vec![];
    loop {
        targets.push(rt.expect_line_number()?);
        if !rt.cursor.accept(&Token::Comma) {
            break;
        }
    }
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    match targets.get((n as usize).wrapping_sub(1)) {
        Some(&number) if via_gosub => gosub_line(rt, number),
        Some(&number) => {
            rt.goto_line(number)?;
            Ok(Flow::Jump)
        }
        None => Ok(Flow::Next),
    }
}

fn on_error_goto(rt: &mut Runtime, number: LineNumber) -> Result<Flow> {
    if number == 0 {
        rt.env.trap = None;
        if rt.env.trapping {
            if let Some(last) = rt.env.last_error {
                rt.env.trapping = false;
                return Err(Error::new(last.code).in_line_number(last.line));
            }
        }
    } else {
        rt.env.trap = Some(number);
        rt.env.trap_depth = rt.env.stack.len();
    }
    Ok(Flow::Next)
}

fn r#print(rt: &mut Runtime) -> Result<Flow> {
    let mut newline = true;
    loop {
        if rt.cursor.at_end_of_statement() {
            break;
        }
        if rt.cursor.accept(&Token::Semicolon) {
            newline = false;
            continue;
        }
        if rt.cursor.accept(&Token::Comma) {
            rt.tty.comma();
            newline = false;
            continue;
        }
        match rt.get_expression()? {
            Val::String(s) => rt.tty.write(&s),
            val => rt.tty.write(&format!("{} ", val)),
        }
        newline = true;
    }
    if newline {
        rt.tty.newline();
    }
    Ok(Flow::Next)
}

fn r#read(rt: &mut Runtime) -> Result<Flow> {
    loop {
        let var = rt.get_left_value()?;
        let datum = data::read(&rt.listing, &mut rt.env.data)?;
        let val = if var.is_string() {
            Val::string(&datum.text)?
        } else {
            match parse_number(&datum.text) {
                Some(n) if !datum.quoted => Val::Number(n),
                _ => return Err(error!(SyntaxError, Some(datum.line))),
            }
        };
        var.set(&mut rt.vars, val)?;
        if !rt.cursor.accept(&Token::Comma) {
            return Ok(Flow::Next);
        }
    }
}

fn r#rem(rt: &mut Runtime) -> Result<Flow> {
    rt.cursor.skip_line();
    Ok(Flow::Next)
}

fn r#restore(rt: &mut Runtime) -> Result<Flow> {
    rt.env.data = match rt.get_line_number() {
        Some(number) => {
            rt.listing.get_line(number)?;
            Some(DataPointer::at_line(number))
        }
        None => None,
    };
    Ok(Flow::Next)
}

fn r#resume(rt: &mut Runtime) -> Result<Flow> {
    let last = match rt.env.last_error {
        Some(last) if rt.env.trapping => last,
        _ => return Err(error!(CannotContinue)),
    };
    let resume_next = rt.cursor.accept(&Token::Word(Word::Next));
    let target = if resume_next { None } else { rt.get_line_number() };
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    rt.env.trapping = false;
    match target {
        Some(number) if number != 0 => rt.goto_line(number)?,
        _ => {
            rt.jump(last.statement)?;
            if resume_next {
                skip_failed_statement(rt);
            }
        }
    }
    debug!(line = ?rt.env.line, "resume");
    Ok(Flow::Jump)
}

/// Step over the statement at the cursor, including a whole IF.
fn skip_failed_statement(rt: &mut Runtime) {
    if rt.cursor.peek() == Some(&Token::Word(Word::If)) {
        rt.cursor.skip_line();
    } else {
        rt.cursor.skip_statement();
    }
}

fn r#return(rt: &mut Runtime) -> Result<Flow> {
    match rt.env.stack.last() {
        Some(Frame::Gosub { .. }) => {}
        _ => return Err(error!(ReturnWithoutGosub)),
    }
    if let Some(Frame::Gosub { ret }) = rt.env.stack.pop() {
        rt.jump(ret)?;
    }
    Ok(Flow::Jump)
}

fn r#run(rt: &mut Runtime) -> Result<Flow> {
    let start = rt.get_line_number();
    if !rt.cursor.at_end_of_statement() {
        return Err(error!(SyntaxError));
    }
    rt.clear();
    let first = match start {
        Some(number) => Some(rt.listing.get_line(number)?.number()),
        None => rt.listing.first_line().map(|line| line.number()),
    };
    debug!(start = ?start, "run");
    match first.flatten() {
        Some(number) => {
            rt.goto_line(number)?;
            Ok(Flow::Jump)
        }
        None => {
            rt.cursor.skip_line();
            Ok(Flow::Halt(Halt::Normal))
        }
    }
}

fn r#stop(_rt: &mut Runtime) -> Result<Flow> {
    Ok(Flow::Halt(Halt::Break))
}

fn r#system(_rt: &mut Runtime) -> Result<Flow> {
    Ok(Flow::Halt(Halt::System))
}

fn ident(rt: &mut Runtime) -> Result<Rc<str>> {
    match rt.cursor.next() {
        Some(Token::Ident(name)) => Ok(name),
        _ => Err(error!(SyntaxError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_input() {
        assert_eq!(split_input(" 1, 2 ,3"), vec!["1", "2", "3"]);
        assert_eq!(split_input("\"A, B\",C"), vec!["A, B", "C"]);
        assert_eq!(split_input(""), vec![""]);
    }

    #[test]
    fn test_catalogue() {
        for word in Word::ALL.iter() {
            assert_eq!(lookup(word).is_some(), word.starts_statement(), "{}", word);
        }
    }
}
