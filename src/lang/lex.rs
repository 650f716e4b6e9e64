use super::{token::*, Error, Line, LineNumber, MAX_LINE_NUMBER};

type Result<T> = std::result::Result<T, Error>;

/// Tokenise one line of text. A leading integer becomes the line number.
pub fn lex(s: &str) -> Result<(Option<LineNumber>, Vec<Token>)> {
    BasicLexer::lex(s)
}

/// Tokenise one line of text into a `Line`.
pub fn tokenise(s: &str) -> Result<Line> {
    let (number, tokens) = lex(s)?;
    Ok(Line::new(number, tokens))
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

trait Tokenizers<'a> {
    fn rest(&self) -> &'a str;
    fn advance(&mut self, len: usize);

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn whitespace(&mut self) {
        let len = self
            .rest()
            .find(|c| !is_basic_whitespace(c))
            .unwrap_or_else(|| self.rest().len());
        self.advance(len);
    }

    fn number(&mut self) -> Result<Token> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = 0;
        let mut digits = 0;
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
            digits += 1;
        }
        if len < bytes.len() && bytes[len] == b'.' {
            len += 1;
            while len < bytes.len() && bytes[len].is_ascii_digit() {
                len += 1;
                digits += 1;
            }
            if len < bytes.len() && bytes[len] == b'.' {
                return Err(error!(SyntaxError; "MALFORMED NUMBER"));
            }
        }
        if digits == 0 {
            return Err(error!(SyntaxError; "MALFORMED NUMBER"));
        }
        if len < bytes.len() && (bytes[len] == b'E' || bytes[len] == b'e') {
            let mut exp = len + 1;
            if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
                exp += 1;
            }
            let start = exp;
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            if exp > start {
                len = exp;
            } else if start > len + 1 || start == bytes.len() {
                // A sign or the end of input after E is an unfinished exponent.
                return Err(error!(SyntaxError; "MALFORMED NUMBER"));
            }
        }
        let text = rest[..len].to_ascii_uppercase();
        self.advance(len);
        Ok(Token::Number(text.into()))
    }

    fn string(&mut self) -> Token {
        let rest = &self.rest()[1..];
        let (s, len) = match rest.find('"') {
            Some(end) => (&rest[..end], end + 2),
            None => (rest, rest.len() + 1),
        };
        self.advance(len);
        Token::String(s.into())
    }

    fn alphabetic(&mut self) -> Token {
        let rest = self.rest();
        let mut len = rest
            .find(|c: char| !(is_basic_alphabetic(c) || is_basic_digit(c)))
            .unwrap_or_else(|| rest.len());
        if rest[len..].starts_with('$') {
            len += 1;
        }
        let s = rest[..len].to_ascii_uppercase();
        self.advance(len);
        Token::Ident(s.into())
    }

    /// The items of a DATA statement, kept as written. Unquoted items
    /// become `Unknown` text; the colon that ends the statement is left.
    fn data(&mut self) -> Vec<Token> {
        let mut tokens = vec![];
        loop {
            let quoted = self
                .rest()
                .trim_start_matches(is_basic_whitespace)
                .starts_with('"');
            if quoted {
                self.whitespace();
                tokens.push(self.string());
            }
            let rest = self.rest();
            let len = rest
                .find(|c: char| c == ',' || c == ':')
                .unwrap_or_else(|| rest.len());
            let item = if len == rest.len() {
                rest.trim_end()
            } else {
                &rest[..len]
            };
            if !item.is_empty() && !(quoted && item.trim().is_empty()) {
                tokens.push(Token::Unknown(item.into()));
            }
            self.advance(len);
            if self.peek() != Some(',') {
                return tokens;
            }
            self.advance(1);
            tokens.push(Token::Comma);
        }
    }

    fn remark(&mut self) -> Option<Token> {
        let rest = self.rest().trim_end();
        self.advance(self.rest().len());
        if rest.is_empty() {
            None
        } else {
            Some(Token::Unknown(rest.into()))
        }
    }
}

struct BasicLexer<'a> {
    s: &'a str,
}

impl<'a> Tokenizers<'a> for BasicLexer<'a> {
    fn rest(&self) -> &'a str {
        self.s
    }
    fn advance(&mut self, len: usize) {
        self.s = &self.s[len..];
    }
}

impl<'a> BasicLexer<'a> {
    fn lex(s: &str) -> Result<(Option<LineNumber>, Vec<Token>)> {
        let s = s.trim_end_matches(|c| c == '\n' || c == '\r');
        let mut lexer = BasicLexer { s };
        lexer.whitespace();
        let line_number = lexer.line_number()?;
        let mut tokens = vec![];
        loop {
            lexer.whitespace();
            let pk = match lexer.peek() {
                Some(pk) => pk,
                None => break,
            };
            if pk == '"' {
                tokens.push(lexer.string());
                continue;
            }
            if is_basic_digit(pk) || pk == '.' {
                tokens.push(lexer.number()?);
                continue;
            }
            if let Some((len, token)) = Token::longest_match(lexer.rest()) {
                lexer.advance(len);
                let remark = token == Token::Word(Word::Rem);
                let data = token == Token::Word(Word::Data);
                tokens.push(token);
                if remark {
                    tokens.extend(lexer.remark());
                    break;
                }
                if data {
                    tokens.extend(lexer.data());
                }
                continue;
            }
            if is_basic_alphabetic(pk) {
                tokens.push(lexer.alphabetic());
                continue;
            }
            return Err(error!(SyntaxError; "UNKNOWN CHARACTER"));
        }
        Ok((line_number, tokens))
    }

    fn line_number(&mut self) -> Result<Option<LineNumber>> {
        let len = self
            .s
            .find(|c: char| !is_basic_digit(c))
            .unwrap_or_else(|| self.s.len());
        if len == 0 {
            return Ok(None);
        }
        match self.s[..len].parse::<u32>() {
            Ok(n) if n <= MAX_LINE_NUMBER as u32 => {
                self.advance(len);
                Ok(Some(n as LineNumber))
            }
            _ => Err(error!(SyntaxError; "INVALID LINE NUMBER")),
        }
    }
}
