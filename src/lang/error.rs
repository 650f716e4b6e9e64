use super::LineNumber;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: "",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The classic numeric code, if the condition has one.
    pub fn number(&self) -> Option<u16> {
        self.code.number()
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn is_break(&self) -> bool {
        self.code == ErrorCode::Break
    }

    pub fn in_line_number(&self, line: Option<LineNumber>) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            code: self.code,
            line_number: line,
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NextWithoutFor,
    SyntaxError,
    ReturnWithoutGosub,
    OutOfData,
    IllegalQuantity,
    Overflow,
    OutOfMemory,
    UndefinedStatement,
    BadSubscript,
    RedimensionedArray,
    DivisionByZero,
    IllegalDirect,
    TypeMismatch,
    StringTooLong,
    FormulaTooComplex,
    CannotContinue,
    UndefinedFunction,
    IllegalDeferred,
    UnableToEdit,
    Break,
}

impl ErrorCode {
    pub fn number(self) -> Option<u16> {
        use ErrorCode::*;
        match self {
            NextWithoutFor => Some(1),
            SyntaxError => Some(2),
            ReturnWithoutGosub => Some(3),
            OutOfData => Some(4),
            IllegalQuantity => Some(5),
            Overflow => Some(6),
            OutOfMemory => Some(7),
            UndefinedStatement => Some(8),
            BadSubscript => Some(9),
            RedimensionedArray => Some(10),
            DivisionByZero => Some(11),
            IllegalDirect => Some(12),
            TypeMismatch => Some(13),
            StringTooLong => Some(15),
            FormulaTooComplex => Some(16),
            CannotContinue => Some(17),
            UndefinedFunction => Some(18),
            IllegalDeferred | UnableToEdit | Break => None,
        }
    }

    pub fn from_number(number: u16) -> Option<ErrorCode> {
        use ErrorCode::*;
        [
            NextWithoutFor,
            SyntaxError,
            ReturnWithoutGosub,
            OutOfData,
            IllegalQuantity,
            Overflow,
            OutOfMemory,
            UndefinedStatement,
            BadSubscript,
            RedimensionedArray,
            DivisionByZero,
            IllegalDirect,
            TypeMismatch,
            StringTooLong,
            FormulaTooComplex,
            CannotContinue,
            UndefinedFunction,
        ]
        .iter()
        .copied()
        .find(|code| code.number() == Some(number))
    }

    pub fn as_str(self) -> &'static str {
        use ErrorCode::*;
        match self {
            NextWithoutFor => "NEXT WITHOUT FOR",
            SyntaxError => "SYNTAX ERROR",
            ReturnWithoutGosub => "RETURN WITHOUT GOSUB",
            OutOfData => "OUT OF DATA",
            IllegalQuantity => "ILLEGAL QUANTITY",
            Overflow => "OVERFLOW",
            OutOfMemory => "OUT OF MEMORY",
            UndefinedStatement => "UNDEFINED STATEMENT",
            BadSubscript => "BAD SUBSCRIPT",
            RedimensionedArray => "REDIMENSIONED ARRAY",
            DivisionByZero => "DIVISION BY ZERO",
            IllegalDirect => "ILLEGAL DIRECT",
            TypeMismatch => "TYPE MISMATCH",
            StringTooLong => "STRING TOO LONG",
            FormulaTooComplex => "FORMULA TOO COMPLEX",
            CannotContinue => "CAN'T CONTINUE",
            UndefinedFunction => "UNDEFINED FUNCTION",
            IllegalDeferred => "ILLEGAL DEFERRED",
            UnableToEdit => "UNABLE TO EDIT",
            Break => "BREAK",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" IN {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        write!(f, "{}{}", self.code.as_str(), suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error;

    #[test]
    fn test_display() {
        assert_eq!(error!(SyntaxError).to_string(), "SYNTAX ERROR");
        assert_eq!(error!(Break, Some(20)).to_string(), "BREAK IN 20");
        assert_eq!(
            error!(IllegalQuantity, Some(5); "START IS 0").to_string(),
            "ILLEGAL QUANTITY IN 5; START IS 0"
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(error!(IllegalQuantity).number(), Some(5));
        assert_eq!(error!(Break).number(), None);
        assert_eq!(ErrorCode::from_number(13), Some(ErrorCode::TypeMismatch));
        assert_eq!(ErrorCode::from_number(14), None);
    }
}
