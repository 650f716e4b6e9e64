use super::token::*;
use super::LineNumber;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: Option<LineNumber>,
    tokens: Rc<[Token]>,
}

impl Line {
    pub fn new(number: Option<LineNumber>, tokens: Vec<Token>) -> Line {
        Line {
            number,
            tokens: tokens.into(),
        }
    }

    pub fn number(&self) -> Option<LineNumber> {
        self.number
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// A cheap handle on the tokens for walking while the line may be replaced.
    pub fn shared(&self) -> Rc<[Token]> {
        Rc::clone(&self.tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_direct(&self) -> bool {
        self.number.is_none()
    }
}

/// Render tokens the way LIST shows them.
pub fn join(tokens: &[Token]) -> String {
    let mut s = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens {
        if let Some(p) = prev {
            let spaced = match token {
                Token::Unknown(_) => false,
                Token::LParen => {
                    p.is_wordy() && !matches!(p, Token::Function(_) | Token::Ident(_))
                }
                _ => p.is_wordy() && token.is_wordy(),
            };
            if spaced {
                s.push(' ');
            }
        }
        s.push_str(&token.to_string());
        prev = Some(token);
    }
    s
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.number {
            Some(number) => write!(f, "{} {}", number, join(&self.tokens)),
            None => write!(f, "{}", join(&self.tokens)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lang::tokenise;

    fn list(s: &str) -> String {
        tokenise(s).unwrap().to_string()
    }

    #[test]
    fn test_list() {
        assert_eq!(list("10 fori=1to10step2"), "10 FOR I=1 TO 10 STEP 2");
        assert_eq!(list("20 ?\"A\";a$(1),left$(b$,2)"), "20 PRINT \"A\";A$(1),LEFT$(B$,2)");
        assert_eq!(list("30 if a and not b then 100"), "30 IF A AND NOT B THEN 100");
        assert_eq!(list("40 rem  keep  this"), "40 REM  keep  this");
        assert_eq!(list("print (1+2)"), "PRINT (1+2)");
    }

    #[test]
    fn test_crlf() {
        let l = tokenise("list\r\n").unwrap();
        assert_eq!(l.tokens(), [super::Token::Word(super::Word::List)]);
    }
}
