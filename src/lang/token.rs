use super::{Error, LineNumber, MAX_LINE_NUMBER};
use std::convert::TryFrom;
use std::rc::Rc;

thread_local!(
    /// Every spelling the tokeniser recognizes, longest first so the
    /// first prefix hit is the longest match.
    static KEYWORDS: Vec<(&'static str, Token)> = {
        let mut v: Vec<(&'static str, Token)> = Word::ALL
            .iter()
            .map(|w| (w.as_str(), Token::Word(w.clone())))
            .chain(Function::ALL.iter().map(|f| (f.as_str(), Token::Function(f.clone()))))
            .chain(Operator::ALL.iter().map(|o| (o.as_str(), Token::Operator(o.clone()))))
            .chain(
                [
                    Token::LParen,
                    Token::RParen,
                    Token::Comma,
                    Token::Colon,
                    Token::Semicolon,
                ]
                .iter()
                .map(|t| (t.separator_str(), t.clone())),
            )
            .collect();
        v.push(("?", Token::Word(Word::Print)));
        v.push(("=<", Token::Operator(Operator::LessEqual)));
        v.push(("=>", Token::Operator(Operator::GreaterEqual)));
        v.push(("><", Token::Operator(Operator::NotEqual)));
        v.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        v
    };
);

/// Coarse classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Command,
    Function,
    Operator,
    Separator,
    Variable,
    Number,
    String,
    Unknown,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// Verbatim text that is never interpreted, e.g. the tail of a REM.
    Unknown(Rc<str>),
    Word(Word),
    Function(Function),
    Operator(Operator),
    Ident(Rc<str>),
    Number(Rc<str>),
    String(Rc<str>),
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,
}

impl Token {
    /// Exact (case insensitive) lookup of a built-in spelling.
    pub fn from_string(s: &str) -> Option<Token> {
        KEYWORDS.with(|keywords| {
            keywords
                .iter()
                .find(|(text, _)| text.eq_ignore_ascii_case(s))
                .map(|(_, token)| token.clone())
        })
    }

    /// Longest built-in spelling at the start of `s` and its byte length.
    pub fn longest_match(s: &str) -> Option<(usize, Token)> {
        KEYWORDS.with(|keywords| {
            keywords.iter().find_map(|(text, token)| match s.get(..text.len()) {
                Some(head) if head.eq_ignore_ascii_case(text) => Some((text.len(), token.clone())),
                _ => None,
            })
        })
    }

    pub fn class(&self) -> TokenClass {
        use Token::*;
        match self {
            Unknown(_) => TokenClass::Unknown,
            Word(_) => TokenClass::Command,
            Function(_) => TokenClass::Function,
            Operator(_) => TokenClass::Operator,
            Ident(_) => TokenClass::Variable,
            Number(_) => TokenClass::Number,
            String(_) => TokenClass::String,
            LParen | RParen | Comma | Colon | Semicolon => TokenClass::Separator,
        }
    }

    /// The statement kind for tokens that may begin a statement.
    pub fn statement(&self) -> Option<&Word> {
        match self {
            Token::Word(word) if word.starts_statement() => Some(word),
            _ => None,
        }
    }

    /// Tokens that need a space between them when listed side by side.
    pub fn is_wordy(&self) -> bool {
        match self.class() {
            TokenClass::Operator => {
                matches!(self, Token::Operator(op) if op.is_reserved_word())
            }
            TokenClass::Separator | TokenClass::Unknown => false,
            _ => true,
        }
    }

    fn separator_str(&self) -> &'static str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Semicolon => ";",
            _ => "",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Function(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            Number(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
            LParen | RParen | Comma | Colon | Semicolon => write!(f, "{}", self.separator_str()),
        }
    }
}

impl TryFrom<&Token> for LineNumber {
    type Error = Error;
    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        if let Token::Number(s) = token {
            if s.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(line) = s.parse::<u32>() {
                    if line <= MAX_LINE_NUMBER as u32 {
                        return Ok(line as LineNumber);
                    }
                }
                return Err(error!(SyntaxError; "INVALID LINE NUMBER"));
            }
        }
        Err(error!(SyntaxError; "EXPECTED LINE NUMBER"))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Word {
    Clear,
    Cont,
    Data,
    Def,
    Delete,
    Dim,
    Else,
    End,
    Error,
    Fn,
    For,
    Gosub,
    Goto,
    If,
    Input,
    Let,
    List,
    New,
    Next,
    On,
    Print,
    Read,
    Rem,
    Restore,
    Resume,
    Return,
    Run,
    Step,
    Stop,
    System,
    Then,
    To,
}

impl Word {
    pub const ALL: [Word; 32] = [
        Word::Clear,
        Word::Cont,
        Word::Data,
        Word::Def,
        Word::Delete,
        Word::Dim,
        Word::Else,
        Word::End,
        Word::Error,
        Word::Fn,
        Word::For,
        Word::Gosub,
        Word::Goto,
        Word::If,
        Word::Input,
        Word::Let,
        Word::List,
        Word::New,
        Word::Next,
        Word::On,
        Word::Print,
        Word::Read,
        Word::Rem,
        Word::Restore,
        Word::Resume,
        Word::Return,
        Word::Run,
        Word::Step,
        Word::Stop,
        Word::System,
        Word::Then,
        Word::To,
    ];

    pub fn starts_statement(&self) -> bool {
        use Word::*;
        !matches!(self, Fn | Step | Then | To)
    }

    pub fn as_str(&self) -> &'static str {
        use Word::*;
        match self {
            Clear => "CLEAR",
            Cont => "CONT",
            Data => "DATA",
            Def => "DEF",
            Delete => "DELETE",
            Dim => "DIM",
            Else => "ELSE",
            End => "END",
            Error => "ERROR",
            Fn => "FN",
            For => "FOR",
            Gosub => "GOSUB",
            Goto => "GOTO",
            If => "IF",
            Input => "INPUT",
            Let => "LET",
            List => "LIST",
            New => "NEW",
            Next => "NEXT",
            On => "ON",
            Print => "PRINT",
            Read => "READ",
            Rem => "REM",
            Restore => "RESTORE",
            Resume => "RESUME",
            Return => "RETURN",
            Run => "RUN",
            Step => "STEP",
            Stop => "STOP",
            System => "SYSTEM",
            Then => "THEN",
            To => "TO",
        }
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Function {
    Abs,
    Asc,
    Atn,
    Chr,
    Cos,
    Erl,
    Err,
    Exp,
    Int,
    Left,
    Len,
    Log,
    Mid,
    Pos,
    Right,
    Rnd,
    Sgn,
    Sin,
    Spc,
    Sqr,
    Str,
    Tab,
    Tan,
    Val,
}

impl Function {
    pub const ALL: [Function; 24] = [
        Function::Abs,
        Function::Asc,
        Function::Atn,
        Function::Chr,
        Function::Cos,
        Function::Erl,
        Function::Err,
        Function::Exp,
        Function::Int,
        Function::Left,
        Function::Len,
        Function::Log,
        Function::Mid,
        Function::Pos,
        Function::Right,
        Function::Rnd,
        Function::Sgn,
        Function::Sin,
        Function::Spc,
        Function::Sqr,
        Function::Str,
        Function::Tab,
        Function::Tan,
        Function::Val,
    ];

    pub fn as_str(&self) -> &'static str {
        use Function::*;
        match self {
            Abs => "ABS",
            Asc => "ASC",
            Atn => "ATN",
            Chr => "CHR$",
            Cos => "COS",
            Erl => "ERL",
            Err => "ERR",
            Exp => "EXP",
            Int => "INT",
            Left => "LEFT$",
            Len => "LEN",
            Log => "LOG",
            Mid => "MID$",
            Pos => "POS",
            Right => "RIGHT$",
            Rnd => "RND",
            Sgn => "SGN",
            Sin => "SIN",
            Spc => "SPC",
            Sqr => "SQR",
            Str => "STR$",
            Tab => "TAB",
            Tan => "TAN",
            Val => "VAL",
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Caret,
        Operator::Multiply,
        Operator::Divide,
        Operator::Plus,
        Operator::Minus,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Not,
        Operator::And,
        Operator::Or,
    ];

    pub fn is_reserved_word(&self) -> bool {
        use Operator::*;
        match self {
            Caret | Multiply | Divide | Plus | Minus | Equal | NotEqual | Less | LessEqual
            | Greater | GreaterEqual => false,
            Not | And | Or => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Operator::*;
        match self {
            Caret => "^",
            Multiply => "*",
            Divide => "/",
            Plus => "+",
            Minus => "-",
            Equal => "=",
            NotEqual => "<>",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Not => "NOT",
            And => "AND",
            Or => "OR",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let t = Token::from_string("rem");
        assert_eq!(t, Some(Token::Word(Word::Rem)));
        let t = Token::from_string("PICKLES");
        assert_eq!(t, None);
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(
            Token::longest_match("<>1"),
            Some((2, Token::Operator(Operator::NotEqual)))
        );
        assert_eq!(
            Token::longest_match("INPUT A"),
            Some((5, Token::Word(Word::Input)))
        );
        assert_eq!(
            Token::longest_match("left$(A$,1)"),
            Some((5, Token::Function(Function::Left)))
        );
        assert_eq!(Token::longest_match("XYZ"), None);
    }

    #[test]
    fn test_line_number() {
        let t = Token::Number("100".into());
        assert_eq!(LineNumber::try_from(&t), Ok(100));
        let t = Token::Number("64000".into());
        assert!(LineNumber::try_from(&t).is_err());
        let t = Token::Number("1.5".into());
        assert!(LineNumber::try_from(&t).is_err());
    }

    #[test]
    fn test_class() {
        assert_eq!(Token::Word(Word::Print).class(), TokenClass::Command);
        assert_eq!(Token::Ident("A$".into()).class(), TokenClass::Variable);
        assert_eq!(Token::Colon.class(), TokenClass::Separator);
        assert_eq!(Token::Word(Word::Let).statement(), Some(&Word::Let));
        assert_eq!(Token::Word(Word::Then).statement(), None);
    }
}
