use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Longest string a variable or expression may hold.
pub const MAX_STRING_LEN: usize = 255;

/// ## The accumulator
///
/// Every expression produces exactly one of these. Conversions never cross
/// between numbers and strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f64),
    String(Rc<str>),
}

impl Val {
    /// A string value, failing when it is longer than `MAX_STRING_LEN`.
    pub fn string(s: &str) -> Result<Val> {
        if s.chars().count() > MAX_STRING_LEN {
            Err(error!(StringTooLong))
        } else {
            Ok(Val::String(s.into()))
        }
    }

    pub fn zero_for(name: &str) -> Val {
        if name.ends_with('$') {
            Val::String("".into())
        } else {
            Val::Number(0.0)
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            Val::Number(n) => Ok(*n),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn as_string(&self) -> Result<Rc<str>> {
        match self {
            Val::String(s) => Ok(Rc::clone(s)),
            Val::Number(_) => Err(error!(TypeMismatch)),
        }
    }

    /// Truncate toward zero into the signed 16-bit domain.
    pub fn as_short(&self) -> Result<i16> {
        let n = self.as_double()?.trunc();
        if n.is_nan() || n < i16::min_value() as f64 || n > i16::max_value() as f64 {
            Err(error!(IllegalQuantity))
        } else {
            Ok(n as i16)
        }
    }

    /// Classic truth: non-zero numbers are true.
    pub fn is_true(&self) -> Result<bool> {
        Ok(self.as_double()? != 0.0)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Val {
        Val::Number(n)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Val {
        Val::Number(if b { -1.0 } else { 0.0 })
    }
}

/// Numbers print with a sign position; strings print as they are.
impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::String(s) => write!(f, "{}", s),
            Val::Number(n) => {
                if n.is_sign_negative() && *n != 0.0 {
                    write!(f, "-{}", format_magnitude(-n))
                } else {
                    write!(f, " {}", format_magnitude(*n))
                }
            }
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

/// Parse text typed at INPUT or read from DATA. Blank text is zero.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if !s.chars().all(is_number_char) || !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The longest leading number in `s`, or zero. This is how VAL reads.
pub fn parse_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let len = s.find(|c| !is_number_char(c)).unwrap_or_else(|| s.len());
    (1..=len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok().filter(|n| n.is_finite()))
        .unwrap_or(0.0)
}

/// Nine significant digits, fixed notation for ordinary magnitudes.
fn format_magnitude(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return "OVERFLOW".to_string();
    }
    let sci = format!("{:.8e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    if (-2..9).contains(&exp) {
        let point = exp + 1;
        if point <= 0 {
            format!(".{}{}", "0".repeat(-point as usize), digits)
        } else if point as usize >= digits.len() {
            format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
        } else {
            let (int, frac) = digits.split_at(point as usize);
            format!("{}.{}", int, frac)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if exp < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}E{}{:02}", first, sign, exp.abs())
        } else {
            format!("{}.{}E{}{:02}", first, rest, sign, exp.abs())
        }
    }
}
