use crate::error;
use crate::lang::{Error, Line, LineNumber};
use std::collections::{btree_map::Values, BTreeMap};
use std::ops::Bound::{Excluded, Included, Unbounded};

type Result<T> = std::result::Result<T, Error>;

/// ## Program memory
///
/// Stored lines ordered by line number.

#[derive(Debug, Clone, Default)]
pub struct Listing {
    source: BTreeMap<LineNumber, Line>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn get_line(&self, number: LineNumber) -> Result<&Line> {
        match self.source.get(&number) {
            Some(line) => Ok(line),
            None => Err(error!(UndefinedStatement)),
        }
    }

    pub fn first_line(&self) -> Option<&Line> {
        self.source.values().next()
    }

    pub fn next_line(&self, number: LineNumber) -> Option<&Line> {
        self.source
            .range((Excluded(number), Unbounded))
            .next()
            .map(|(_, line)| line)
    }

    pub fn line_at_or_after(&self, number: LineNumber) -> Option<&Line> {
        self.source
            .range((Included(number), Unbounded))
            .next()
            .map(|(_, line)| line)
    }

    /// Insert or replace a numbered line. A line with no tokens deletes.
    pub fn set_program_line(&mut self, line: Line) {
        let number = match line.number() {
            Some(number) => number,
            None => return,
        };
        if line.is_empty() {
            self.source.remove(&number);
        } else {
            self.source.insert(number, line);
        }
    }

    /// Remove every line in `start..=end`.
    pub fn delete_lines(&mut self, start: LineNumber, end: LineNumber) {
        if start > end {
            return;
        }
        let doomed: Vec<LineNumber> = self.source.range(start..=end).map(|(k, _)| *k).collect();
        for number in doomed {
            self.source.remove(&number);
        }
    }

    pub fn lines(&self) -> Values<'_, LineNumber, Line> {
        self.source.values()
    }

    /// Lines in `start..=end` as LIST shows them.
    pub fn list(&self, start: LineNumber, end: LineNumber) -> Vec<String> {
        if start > end {
            return vec![];
        }
        self.source
            .range(start..=end)
            .map(|(_, line)| line.to_string())
            .collect()
    }
}
