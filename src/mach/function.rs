use super::val::{parse_prefix, MAX_STRING_LEN};
use super::{Runtime, Val};
use crate::error;
use crate::lang::{token::Function, Error};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## RND state
///
/// Negative arguments reseed, zero repeats the last value, positive
/// arguments draw the next one.
#[derive(Debug)]
pub struct Random {
    rng: StdRng,
    last: f64,
}

impl Default for Random {
    fn default() -> Random {
        let mut rng = StdRng::from_entropy();
        let last = rng.gen::<f64>();
        Random { rng, last }
    }
}

impl Random {
    pub fn rnd(&mut self, n: f64) -> f64 {
        if n < 0.0 {
            self.rng = StdRng::seed_from_u64(n.to_bits());
            self.last = self.rng.gen::<f64>();
        } else if n > 0.0 {
            self.last = self.rng.gen::<f64>();
        }
        self.last
    }
}

/// Invoke a builtin. `ERR` and `ERL` take no parameters; the rest check
/// their own count and types.
pub fn call(runtime: &mut Runtime, function: &Function, args: Vec<Val>) -> Result<Val> {
    match function {
        Function::Abs => math(&args, f64::abs),
        Function::Atn => math(&args, f64::atan),
        Function::Cos => math(&args, f64::cos),
        Function::Exp => math(&args, f64::exp),
        Function::Int => math(&args, f64::floor),
        Function::Sin => math(&args, f64::sin),
        Function::Tan => math(&args, f64::tan),
        Function::Sgn => math(&args, |n| {
            if n > 0.0 {
                1.0
            } else if n < 0.0 {
                -1.0
            } else {
                0.0
            }
        }),
        Function::Log => {
            let n = number(&args, 0, 1)?;
            if n <= 0.0 {
                return Err(error!(IllegalQuantity));
            }
            Ok(Val::Number(n.ln()))
        }
        Function::Sqr => {
            let n = number(&args, 0, 1)?;
            if n < 0.0 {
                return Err(error!(IllegalQuantity));
            }
            Ok(Val::Number(n.sqrt()))
        }
        Function::Rnd => {
            let n = number(&args, 0, 1)?;
            Ok(Val::Number(runtime.random.rnd(n)))
        }
        Function::Asc => {
            let s = string(&args, 0, 1)?;
            match s.chars().next() {
                Some(ch) => Ok(Val::Number(ch as u32 as f64)),
                None => Err(error!(IllegalQuantity)),
            }
        }
        Function::Chr => {
            let n = short(&args, 0, 1)?;
            let ch = u32::try_from(n)
                .ok()
                .and_then(std::char::from_u32)
                .ok_or_else(|| error!(IllegalQuantity))?;
            Ok(Val::String(ch.to_string().into()))
        }
        Function::Len => Ok(Val::Number(string(&args, 0, 1)?.chars().count() as f64)),
        Function::Str => {
            let n = number(&args, 0, 1)?;
            Val::string(&Val::Number(n).to_string())
        }
        Function::Val => Ok(Val::Number(parse_prefix(&string(&args, 0, 1)?))),
        Function::Left => {
            arity(&args, 2, 2)?;
            let s = string(&args, 0, 2)?;
            let n = length(&args, 1, 1)?;
            Ok(Val::String(s.chars().take(n).collect::<String>().into()))
        }
        Function::Right => {
            arity(&args, 2, 2)?;
            let s = string(&args, 0, 2)?;
            let n = length(&args, 1, 1)?;
            let len = s.chars().count();
            Ok(Val::String(
                s.chars().skip(len.saturating_sub(n)).collect::<String>().into(),
            ))
        }
        Function::Mid => {
            arity(&args, 2, 3)?;
            let s = string(&args, 0, 3)?;
            let start = length(&args, 1, 1)?;
            let len = if args.len() == 3 {
                length(&args, 2, 0)?
            } else {
                MAX_STRING_LEN
            };
            Ok(Val::String(
                s.chars().skip(start - 1).take(len).collect::<String>().into(),
            ))
        }
        Function::Pos => {
            arity(&args, 1, 1)?;
            Ok(Val::Number(runtime.tty.column() as f64))
        }
        Function::Spc => {
            let n = length(&args, 0, 0)?;
            arity(&args, 1, 1)?;
            Ok(Val::String(" ".repeat(n).into()))
        }
        Function::Tab => {
            let n = length(&args, 0, 0)?;
            arity(&args, 1, 1)?;
            let column = runtime.tty.column();
            Ok(Val::String(" ".repeat(n.saturating_sub(column)).into()))
        }
        Function::Err => {
            arity(&args, 0, 0)?;
            let number = runtime.env.last_error.map_or(0, |e| e.number());
            Ok(Val::Number(number as f64))
        }
        Function::Erl => {
            arity(&args, 0, 0)?;
            let line = runtime.env.last_error.and_then(|e| e.line).unwrap_or(0);
            Ok(Val::Number(line as f64))
        }
    }
}

fn arity(args: &[Val], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        Err(error!(SyntaxError; "WRONG NUMBER OF ARGUMENTS"))
    } else {
        Ok(())
    }
}

fn arg(args: &[Val], index: usize) -> Result<&Val> {
    args.get(index)
        .ok_or_else(|| error!(SyntaxError; "WRONG NUMBER OF ARGUMENTS"))
}

/// Sole (or first of `count`) numeric argument.
fn number(args: &[Val], index: usize, count: usize) -> Result<f64> {
    arity(args, count, count)?;
    arg(args, index)?.as_double()
}

fn string(args: &[Val], index: usize, count: usize) -> Result<std::rc::Rc<str>> {
    if args.len() < index + 1 || args.len() > count {
        return Err(error!(SyntaxError; "WRONG NUMBER OF ARGUMENTS"));
    }
    arg(args, index)?.as_string()
}

fn short(args: &[Val], index: usize, count: usize) -> Result<i16> {
    arity(args, count, count)?;
    arg(args, index)?.as_short()
}

/// A character count or position in `min..=255`.
fn length(args: &[Val], index: usize, min: usize) -> Result<usize> {
    let n = arg(args, index)?.as_short()?;
    if n < min as i16 || n as usize > MAX_STRING_LEN {
        Err(error!(IllegalQuantity))
    } else {
        Ok(n as usize)
    }
}

fn math<F>(args: &[Val], f: F) -> Result<Val>
where
    F: Fn(f64) -> f64,
{
    let n = f(number(args, 0, 1)?);
    if n.is_finite() {
        Ok(Val::Number(n))
    } else {
        Err(error!(Overflow))
    }
}
