use super::var::Binding;
use super::{function, Cursor, Operation, Runtime, Val, VarRef};
use crate::error;
use crate::lang::{
    token::{Function, Operator, Token, Word},
    Error, LineNumber,
};
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Deepest nesting of bracketed sub-expressions before FORMULA TOO COMPLEX.
pub const MAX_DEPTH: usize = 64;

fn binary_precedence(op: &Operator) -> Option<u8> {
    use Operator::*;
    match op {
        Or => Some(1),
        And => Some(2),
        Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(4),
        Plus | Minus => Some(5),
        Multiply | Divide => Some(6),
        Caret => Some(8),
        Not => None,
    }
}

/// ## Expression evaluator
///
/// Precedence climbing over the shared cursor. Statements call in here
/// and then carry on consuming their own tokens.
impl Runtime {
    pub fn get_expression(&mut self) -> Result<Val> {
        self.expression(1)
    }

    /// Parse one variable with its subscripts, unevaluated.
    pub fn get_left_value(&mut self) -> Result<VarRef> {
        match self.cursor.next() {
            Some(Token::Ident(name)) => self.variable(name),
            _ => Err(error!(SyntaxError)),
        }
    }

    /// A bare line number, or nothing with the cursor left where it was.
    pub fn get_line_number(&mut self) -> Option<LineNumber> {
        let number = self
            .cursor
            .peek()
            .and_then(|token| LineNumber::try_from(token).ok());
        if number.is_some() {
            self.cursor.advance();
        }
        number
    }

    pub(super) fn expect_line_number(&mut self) -> Result<LineNumber> {
        match self.cursor.peek() {
            Some(token) => {
                let number = LineNumber::try_from(token)?;
                self.cursor.advance();
                Ok(number)
            }
            None => Err(error!(SyntaxError; "EXPECTED LINE NUMBER")),
        }
    }

    pub(super) fn get_short(&mut self) -> Result<i16> {
        self.get_expression()?.as_short()
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Val> {
        let lhs = self.unary()?;
        self.binary(lhs, min_precedence)
    }

    fn binary(&mut self, mut lhs: Val, min_precedence: u8) -> Result<Val> {
        loop {
            let op = match self.cursor.peek() {
                Some(Token::Operator(op)) => op.clone(),
                _ => break,
            };
            let precedence = match binary_precedence(&op) {
                Some(p) if p >= min_precedence => p,
                _ => break,
            };
            self.cursor.advance();
            let next = if op == Operator::Caret {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.expression(next)?;
            lhs = Operation::binary(&op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// Prefix operators are collected up front and applied innermost
    /// first, each taking the operators that bind tighter than it does.
    fn unary(&mut self) -> Result<Val> {
        let mut prefixes = vec![];
        loop {
            let op = match self.cursor.peek() {
                Some(Token::Operator(Operator::Minus)) => Operator::Minus,
                Some(Token::Operator(Operator::Plus)) => Operator::Plus,
                Some(Token::Operator(Operator::Not)) => Operator::Not,
                _ => break,
            };
            self.cursor.advance();
            prefixes.push(op);
        }
        let mut val = self.atom()?;
        for op in prefixes.into_iter().rev() {
            val = match op {
                Operator::Not => Operation::not(self.binary(val, 4)?)?,
                Operator::Plus => {
                    let val = self.binary(val, 7)?;
                    val.as_double()?;
                    val
                }
                _ => Operation::negate(self.binary(val, 7)?)?,
            };
        }
        Ok(val)
    }

    /// An expression inside brackets. Only these count towards `MAX_DEPTH`.
    fn bracketed(&mut self) -> Result<Val> {
        if self.depth >= MAX_DEPTH {
            return Err(error!(FormulaTooComplex));
        }
        self.depth += 1;
        let result = self.get_expression();
        self.depth -= 1;
        result
    }

    fn atom(&mut self) -> Result<Val> {
        match self.cursor.next() {
            Some(Token::Number(s)) => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Val::Number(n)),
                Ok(_) => Err(error!(Overflow)),
                Err(_) => Err(error!(SyntaxError)),
            },
            Some(Token::String(s)) => Val::string(&s),
            Some(Token::Ident(name)) => {
                let var = self.variable(name)?;
                Ok(var.get(&self.vars))
            }
            Some(Token::Function(f)) => self.call_function(f),
            Some(Token::Word(Word::Fn)) => self.call_user_function(),
            Some(Token::LParen) => {
                let val = self.bracketed()?;
                self.cursor.expect(&Token::RParen)?;
                Ok(val)
            }
            _ => Err(error!(SyntaxError)),
        }
    }

    fn variable(&mut self, name: Rc<str>) -> Result<VarRef> {
        let mut indexes = vec![];
        if self.cursor.accept(&Token::LParen) {
            loop {
                indexes.push(self.bracketed()?.as_short()?);
                if !self.cursor.accept(&Token::Comma) {
                    break;
                }
            }
            self.cursor.expect(&Token::RParen)?;
        }
        self.vars.get_or_create(&name, &indexes)
    }

    fn arguments(&mut self) -> Result<Vec<Val>> {
        self.cursor.expect(&Token::LParen)?;
        let mut args = vec![];
        loop {
            args.push(self.bracketed()?);
            if !self.cursor.accept(&Token::Comma) {
                break;
            }
        }
        self.cursor.expect(&Token::RParen)?;
        Ok(args)
    }

    fn call_function(&mut self, f: Function) -> Result<Val> {
        let args = match f {
            Function::Err | Function::Erl => vec![],
            _ => self.arguments()?,
        };
        function::call(self, &f, args)
    }

    fn call_user_function(&mut self) -> Result<Val> {
        let name = match self.cursor.next() {
            Some(Token::Ident(name)) => name,
            _ => return Err(error!(SyntaxError)),
        };
        let func = match self.env.functions.get(&name) {
            Some(func) => func.clone(),
            None => return Err(error!(UndefinedFunction)),
        };
        let args = self.arguments()?;
        if args.len() != func.params.len() {
            return Err(error!(SyntaxError; "WRONG NUMBER OF ARGUMENTS"));
        }
        for (param, arg) in func.params.iter().zip(&args) {
            if param.ends_with('$') != arg.is_string() {
                return Err(error!(TypeMismatch));
            }
        }
        let mut shadowed = Vec::with_capacity(args.len());
        for (param, arg) in func.params.iter().zip(args) {
            let old = self.vars.replace(param, Some(Binding::Scalar(arg)));
            shadowed.push((param.clone(), old));
        }
        let outer = std::mem::replace(&mut self.cursor, Cursor::new(func.body.clone(), 0));
        let result = match self.bracketed() {
            Ok(_) if !self.cursor.at_end_of_line() => Err(error!(SyntaxError)),
            result => result,
        };
        self.cursor = outer;
        for (param, old) in shadowed.into_iter().rev() {
            self.vars.replace(&param, old);
        }
        let val = result?;
        if name.ends_with('$') != val.is_string() {
            return Err(error!(TypeMismatch));
        }
        Ok(val)
    }
}
