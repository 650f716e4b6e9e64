use crate::error;
use crate::lang::{
    token::{Token, Word},
    Error,
};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Token cursor
///
/// Shared by the executor and the evaluator so statements can consume
/// their own punctuation around expressions.

#[derive(Debug, Clone)]
pub struct Cursor {
    tokens: Rc<[Token]>,
    pos: usize,
}

impl Default for Cursor {
    fn default() -> Cursor {
        Cursor::new(Rc::from(Vec::new()), 0)
    }
}

impl Cursor {
    pub fn new(tokens: Rc<[Token]>, pos: usize) -> Cursor {
        Cursor { tokens, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    pub fn tokens(&self) -> &Rc<[Token]> {
        &self.tokens
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume `token` if it is next.
    pub fn accept(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, token: &Token) -> Result<()> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    pub fn at_end_of_line(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// A statement ends at the end of the line, a colon, or an ELSE.
    pub fn at_end_of_statement(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::Colon) | Some(Token::Word(Word::Else))
        )
    }

    /// Move to the next colon or the end of the line.
    pub fn skip_statement(&mut self) {
        while let Some(token) = self.peek() {
            if *token == Token::Colon {
                break;
            }
            self.pos += 1;
        }
    }

    pub fn skip_line(&mut self) {
        self.pos = self.tokens.len();
    }

    /// Position just past the ELSE that pairs with the IF already consumed.
    pub fn find_else(&self) -> Option<usize> {
        let mut depth = 0;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos) {
            match token {
                Token::Word(Word::If) => depth += 1,
                Token::Word(Word::Else) if depth == 0 => return Some(i + 1),
                Token::Word(Word::Else) => depth -= 1,
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lex;

    fn cursor(s: &str) -> Cursor {
        Cursor::new(lex(s).unwrap().1.into(), 0)
    }

    #[test]
    fn test_statement_ends() {
        let mut c = cursor("A=1:B=2");
        assert!(!c.at_end_of_statement());
        c.skip_statement();
        assert_eq!(c.pos(), 3);
        assert!(c.at_end_of_statement());
        c.advance();
        c.skip_statement();
        assert!(c.at_end_of_line());
    }

    #[test]
    fn test_find_else() {
        let mut c = cursor("IF A THEN IF B THEN 10 ELSE 20 ELSE 30");
        c.advance();
        assert_eq!(c.find_else(), Some(10));
        let c = cursor("IF A THEN PRINT");
        assert_eq!(c.find_else(), None);
    }

    #[test]
    fn test_expect() {
        let mut c = cursor("(1)");
        assert!(c.expect(&Token::LParen).is_ok());
        assert!(c.expect(&Token::RParen).is_err());
        assert_eq!(c.next(), Some(Token::Number("1".into())));
    }
}
