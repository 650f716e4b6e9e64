use super::Listing;
use crate::error;
use crate::lang::{
    token::{Token, Word},
    join, Error, LineNumber,
};

type Result<T> = std::result::Result<T, Error>;

/// Where the next READ picks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPointer {
    pub line: LineNumber,
    pub token: usize,
    /// The token index is inside a DATA list rather than a place to start
    /// searching for one.
    pub in_data: bool,
}

impl DataPointer {
    pub fn at_line(line: LineNumber) -> DataPointer {
        DataPointer {
            line,
            token: 0,
            in_data: false,
        }
    }
}

/// One item of a DATA list.
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    pub text: String,
    pub quoted: bool,
    pub line: LineNumber,
}

/// Fetch the next DATA item and move the pointer past it.
pub fn read(listing: &Listing, pointer: &mut Option<DataPointer>) -> Result<Datum> {
    let mut ptr = match pointer {
        Some(ptr) => *ptr,
        None => match listing.first_line().and_then(|l| l.number()) {
            Some(line) => DataPointer::at_line(line),
            None => return Err(error!(OutOfData)),
        },
    };
    loop {
        let line = match listing.line_at_or_after(ptr.line) {
            Some(line) => line,
            None => return Err(error!(OutOfData)),
        };
        let number = match line.number() {
            Some(number) => number,
            None => return Err(error!(OutOfData)),
        };
        if number != ptr.line {
            ptr = DataPointer::at_line(number);
        }
        let tokens = line.tokens();
        if !ptr.in_data {
            match tokens
                .iter()
                .skip(ptr.token)
                .position(|t| *t == Token::Word(Word::Data))
            {
                Some(offset) => {
                    ptr.token += offset + 1;
                    ptr.in_data = true;
                }
                None => {
                    match listing.next_line(number).and_then(|l| l.number()) {
                        Some(next) => ptr = DataPointer::at_line(next),
                        None => {
                            *pointer = Some(DataPointer {
                                line: number,
                                token: tokens.len(),
                                in_data: false,
                            });
                            return Err(error!(OutOfData));
                        }
                    }
                    continue;
                }
            }
        }
        let start = ptr.token.min(tokens.len());
        let end = tokens[start..]
            .iter()
            .position(|t| *t == Token::Comma || *t == Token::Colon)
            .map_or(tokens.len(), |offset| start + offset);
        let item = &tokens[start..end];
        let datum = match item {
            [Token::String(s)] => Datum {
                text: s.to_string(),
                quoted: true,
                line: number,
            },
            [Token::Unknown(s)] => Datum {
                text: s.trim().to_string(),
                quoted: false,
                line: number,
            },
            _ => Datum {
                text: join(item).trim().to_string(),
                quoted: false,
                line: number,
            },
        };
        ptr.in_data = tokens.get(end) == Some(&Token::Comma);
        ptr.token = if ptr.in_data { end + 1 } else { end };
        *pointer = Some(ptr);
        return Ok(datum);
    }
}
