use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Upper bound of every dimension of an array used before DIM.
pub const IMPLICIT_BOUND: usize = 10;

const MAX_ELEMENTS: usize = 1 << 20;
const MAX_BINDINGS: usize = u16::max_value() as usize;

/// ## Variable memory

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Scalar(Val),
    Array { bounds: Vec<usize>, data: Vec<Val> },
}

/// A storage slot: a name and, for array elements, validated indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    name: Rc<str>,
    indexes: Vec<usize>,
}

impl VarRef {
    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn is_string(&self) -> bool {
        self.name.ends_with('$')
    }

    pub fn get(&self, vars: &Variables) -> Val {
        vars.fetch(self)
    }

    pub fn set(&self, vars: &mut Variables, val: Val) -> Result<()> {
        vars.store(self, val)
    }
}

#[derive(Debug, Default)]
pub struct Variables {
    vars: HashMap<Rc<str>, Binding>,
}

impl Variables {
    pub fn new() -> Variables {
        Variables::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn dimension_array(&mut self, name: &Rc<str>, dimensions: &[i16]) -> Result<()> {
        if self.vars.contains_key(name) {
            return Err(error!(RedimensionedArray));
        }
        let mut bounds = Vec::with_capacity(dimensions.len());
        for &d in dimensions {
            if d < 0 {
                return Err(error!(IllegalQuantity));
            }
            bounds.push(d as usize);
        }
        let binding = Variables::array(name, bounds)?;
        self.insert(name, binding)
    }

    /// Resolve a name and indexes to a slot, creating it on first touch.
    pub fn get_or_create(&mut self, name: &Rc<str>, indexes: &[i16]) -> Result<VarRef> {
        if !self.vars.contains_key(name) {
            let binding = if indexes.is_empty() {
                Binding::Scalar(Val::zero_for(name))
            } else {
                Variables::array(name, vec![IMPLICIT_BOUND; indexes.len()])?
            };
            self.insert(name, binding)?;
        }
        match self.vars.get(name) {
            Some(Binding::Scalar(_)) if indexes.is_empty() => Ok(VarRef {
                name: name.clone(),
                indexes: vec![],
            }),
            Some(Binding::Array { bounds, .. }) if bounds.len() == indexes.len() => {
                let mut checked = Vec::with_capacity(indexes.len());
                for (&index, &bound) in indexes.iter().zip(bounds) {
                    if index < 0 || index as usize > bound {
                        return Err(error!(BadSubscript));
                    }
                    checked.push(index as usize);
                }
                Ok(VarRef {
                    name: name.clone(),
                    indexes: checked,
                })
            }
            _ => Err(error!(SyntaxError; "WRONG NUMBER OF SUBSCRIPTS")),
        }
    }

    /// Swap a binding in or out, returning what was there. Used to shadow
    /// user function parameters.
    pub fn replace(&mut self, name: &Rc<str>, binding: Option<Binding>) -> Option<Binding> {
        match binding {
            Some(binding) => self.vars.insert(name.clone(), binding),
            None => self.vars.remove(name),
        }
    }

    fn insert(&mut self, name: &Rc<str>, binding: Binding) -> Result<()> {
        if self.vars.len() >= MAX_BINDINGS {
            return Err(error!(OutOfMemory));
        }
        self.vars.insert(name.clone(), binding);
        Ok(())
    }

    fn array(name: &str, bounds: Vec<usize>) -> Result<Binding> {
        let mut size: usize = 1;
        for bound in &bounds {
            size = match size.checked_mul(bound + 1) {
                Some(size) if size <= MAX_ELEMENTS => size,
                _ => return Err(error!(OutOfMemory)),
            };
        }
        Ok(Binding::Array {
            data: vec![Val::zero_for(name); size],
            bounds,
        })
    }

    fn offset(bounds: &[usize], indexes: &[usize]) -> Option<usize> {
        if bounds.len() != indexes.len() {
            return None;
        }
        let mut offset = 0;
        for (&index, &bound) in indexes.iter().zip(bounds) {
            if index > bound {
                return None;
            }
            offset = offset * (bound + 1) + index;
        }
        Some(offset)
    }

    fn fetch(&self, var: &VarRef) -> Val {
        let val = match self.vars.get(&var.name) {
            Some(Binding::Scalar(val)) if var.indexes.is_empty() => Some(val),
            Some(Binding::Array { bounds, data }) => {
                Variables::offset(bounds, &var.indexes).and_then(|i| data.get(i))
            }
            _ => None,
        };
        match val {
            Some(val) => val.clone(),
            None => Val::zero_for(&var.name),
        }
    }

    fn store(&mut self, var: &VarRef, val: Val) -> Result<()> {
        let val = match val {
            Val::String(s) if var.is_string() => Val::string(&s)?,
            Val::Number(n) if !var.is_string() => Val::Number(n),
            _ => return Err(error!(TypeMismatch)),
        };
        if !self.vars.contains_key(&var.name) {
            let indexes: Vec<i16> = var.indexes.iter().map(|&i| i as i16).collect();
            self.get_or_create(&var.name, &indexes)?;
        }
        match self.vars.get_mut(&var.name) {
            Some(Binding::Scalar(slot)) if var.indexes.is_empty() => {
                *slot = val;
                Ok(())
            }
            Some(Binding::Array { bounds, data }) => {
                match Variables::offset(bounds, &var.indexes).and_then(|i| data.get_mut(i)) {
                    Some(slot) => {
                        *slot = val;
                        Ok(())
                    }
                    None => Err(error!(BadSubscript)),
                }
            }
            _ => Err(error!(SyntaxError; "WRONG NUMBER OF SUBSCRIPTS")),
        }
    }
}
