//! Console input for the READ instruction.
//!
//! READ blocks on an [`Input`] rather than on stdin directly, so programs
//! can be fed canned values.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use log::warn;

/// A source of integers for READ.
pub trait Input {
    /// Block until the next integer is available.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn read_value(&mut self) -> io::Result<Option<i64>>;
}

/// A fixed list of values, consumed in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    values: VecDeque<i64>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl Input for ScriptedInput {
    fn read_value(&mut self) -> io::Result<Option<i64>> {
        Ok(self.values.pop_front())
    }
}

/// Whitespace-separated integers from a buffered reader.
///
/// Tokens that are not integers are skipped.
pub struct LineInput<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Input for LineInput<R> {
    fn read_value(&mut self) -> io::Result<Option<i64>> {
        loop {
            while let Some(token) = self.pending.pop_front() {
                match token.parse::<i64>() {
                    Ok(value) => return Ok(Some(value)),
                    Err(_) => warn!("ignoring non-integer input {:?}", token),
                }
            }

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input() {
        let mut input = ScriptedInput::new([4000, -3]);
        assert_eq!(input.read_value().unwrap(), Some(4000));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read_value().unwrap(), Some(-3));
        assert_eq!(input.read_value().unwrap(), None);
    }

    #[test]
    fn test_line_input_tokens() {
        let text = "4000 3000\n\n  abc -12\n";
        let mut input = LineInput::new(text.as_bytes());

        assert_eq!(input.read_value().unwrap(), Some(4000));
        assert_eq!(input.read_value().unwrap(), Some(3000));
        assert_eq!(input.read_value().unwrap(), Some(-12));
        assert_eq!(input.read_value().unwrap(), None);
    }
}
