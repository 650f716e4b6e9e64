use super::val::MAX_STRING_LEN;
use super::Val;
use crate::error;
use crate::lang::{token::Operator, Error};

type Result<T> = std::result::Result<T, Error>;

pub struct Operation {}

impl Operation {
    /// Apply a binary operator. Only `+` accepts two strings.
    pub fn binary(op: &Operator, lhs: Val, rhs: Val) -> Result<Val> {
        use Operator::*;
        match op {
            Plus => Operation::sum(lhs, rhs),
            Minus => Operation::arithmetic(lhs, rhs, |l, r| Ok(l - r)),
            Multiply => Operation::arithmetic(lhs, rhs, |l, r| Ok(l * r)),
            Divide => Operation::arithmetic(lhs, rhs, |l, r| {
                if r == 0.0 {
                    Err(error!(DivisionByZero))
                } else {
                    Ok(l / r)
                }
            }),
            Caret => Operation::arithmetic(lhs, rhs, |l, r| {
                let n = l.powf(r);
                if n.is_nan() {
                    Err(error!(IllegalQuantity))
                } else {
                    Ok(n)
                }
            }),
            Equal => Operation::compare(lhs, rhs, |o| o == std::cmp::Ordering::Equal),
            NotEqual => Operation::compare(lhs, rhs, |o| o != std::cmp::Ordering::Equal),
            Less => Operation::compare(lhs, rhs, |o| o == std::cmp::Ordering::Less),
            LessEqual => Operation::compare(lhs, rhs, |o| o != std::cmp::Ordering::Greater),
            Greater => Operation::compare(lhs, rhs, |o| o == std::cmp::Ordering::Greater),
            GreaterEqual => Operation::compare(lhs, rhs, |o| o != std::cmp::Ordering::Less),
            And => Ok(Val::Number((lhs.as_short()? & rhs.as_short()?) as f64)),
            Or => Ok(Val::Number((lhs.as_short()? | rhs.as_short()?) as f64)),
            Not => Err(error!(SyntaxError)),
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        match val {
            Val::Number(n) => Ok(Val::Number(-n)),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Number(!val.as_short()? as f64))
    }

    fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        match (lhs, rhs) {
            (Val::String(l), Val::String(r)) => {
                if l.chars().count() + r.chars().count() > MAX_STRING_LEN {
                    return Err(error!(StringTooLong));
                }
                let mut s = String::with_capacity(l.len() + r.len());
                s.push_str(&l);
                s.push_str(&r);
                Ok(Val::String(s.into()))
            }
            (lhs, rhs) => Operation::arithmetic(lhs, rhs, |l, r| Ok(l + r)),
        }
    }

    fn arithmetic<F>(lhs: Val, rhs: Val, f: F) -> Result<Val>
    where
        F: Fn(f64, f64) -> Result<f64>,
    {
        match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => {
                let n = f(l, r)?;
                if n.is_finite() {
                    Ok(Val::Number(n))
                } else {
                    Err(error!(Overflow))
                }
            }
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn compare<F>(lhs: Val, rhs: Val, f: F) -> Result<Val>
    where
        F: Fn(std::cmp::Ordering) -> bool,
    {
        let ordering = match (&lhs, &rhs) {
            (Val::Number(l), Val::Number(r)) => match l.partial_cmp(r) {
                Some(o) => o,
                None => return Err(error!(IllegalQuantity)),
            },
            (Val::String(l), Val::String(r)) => l.cmp(r),
            _ => return Err(error!(TypeMismatch)),
        };
        Ok(Val::from(f(ordering)))
    }
}
