//! Program loading.
//!
//! A Simpletron program is a list of signed integers, one word per memory
//! location starting at 0. Programs come from a text file (any
//! whitespace-separated integers) or are typed in one word per line.
//! Either way at most one page is loaded.

use crate::cpu::PAGE_SIZE;
use crate::word::Word;
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Most words a program can hold.
pub const LOAD_CAPACITY: usize = PAGE_SIZE;

/// Typing this value ends keyboard entry.
pub const SENTINEL: i64 = -999_999;

/// A loaded program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Words for locations 0, 1, 2, ...
    pub words: Vec<Word>,
    /// Integers that were dropped for lying outside the word range.
    pub rejected: Vec<i64>,
}

impl Program {
    /// Get the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Report rejected words and confirm the load.
    pub fn announce<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for value in &self.rejected {
            writeln!(out, "Invalid instruction: {}", value)?;
        }
        writeln!(out, "Program loaded successfully.")
    }
}

/// Parse program text.
///
/// Tokens that are not integers are skipped. Integers outside the word
/// range are recorded in [`Program::rejected`]. Parsing stops once
/// [`LOAD_CAPACITY`] words are collected.
pub fn parse_program(text: &str) -> Program {
    let mut program = Program::default();

    for token in text.split_whitespace() {
        if program.words.len() >= LOAD_CAPACITY {
            debug!("program full at {} words, ignoring the rest", LOAD_CAPACITY);
            break;
        }

        let Ok(value) = token.parse::<i64>() else {
            debug!("skipping non-integer token {:?}", token);
            continue;
        };

        match Word::try_from(value) {
            Ok(word) => program.words.push(word),
            Err(e) => {
                warn!("{}", e);
                program.rejected.push(value);
            }
        }
    }

    program
}

/// Load a program file from disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let program = parse_program(&text);
    if program.is_empty() {
        warn!("{} holds no program words", path.display());
    } else {
        info!("loaded {} words from {}", program.len(), path.display());
    }
    Ok(program)
}

/// Read a program typed one word per line.
///
/// Each location is prompted as `NN ? `. Entry stops at [`SENTINEL`], when
/// the page is full, or at end of input. Bad lines are reported and the
/// same location is prompted again.
pub fn load_interactive<R, W>(input: &mut R, out: &mut W) -> Result<Program, LoadError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "*** Please enter your program one instruction (or data word) at a time ***")?;
    writeln!(out, "*** Type {} to stop entering your program ***", SENTINEL)?;

    let mut program = Program::default();
    while program.words.len() < LOAD_CAPACITY {
        write!(out, "{:02} ? ", program.words.len())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("end of input during program entry");
            break;
        }

        let Ok(value) = line.trim().parse::<i64>() else {
            writeln!(out, "Invalid input. Please enter a valid integer.")?;
            continue;
        };
        if value == SENTINEL {
            break;
        }

        match Word::try_from(value) {
            Ok(word) => program.words.push(word),
            Err(_) => {
                writeln!(out, "Invalid instruction. Please enter a number between -999999 and +999999.")?;
            }
        }
    }

    info!("entered {} words", program.len());
    Ok(program)
}

/// Ask whether the program is in a file, then load it from the named
/// file or from the keyboard.
pub fn load_prompted<R, W>(input: &mut R, out: &mut W) -> Result<Program, LoadError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "*** Welcome to Simpletron V2! ***")?;
    write!(out, "Do you have a file that contains your SML program? (Y/N): ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if answer.trim().eq_ignore_ascii_case("y") {
        write!(out, "Please enter the filename containing your SML program: ")?;
        out.flush()?;

        let mut path = String::new();
        input.read_line(&mut path)?;
        load_file(path.trim())
    } else {
        load_interactive(input, out)
    }
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(program: &Program) -> Vec<i32> {
        program.words.iter().map(|w| w.value()).collect()
    }

    #[test]
    fn test_parse_program() {
        let program = parse_program("100007 100008\n200007 ; comment\n  -4500\n");
        assert_eq!(values(&program), vec![100_007, 100_008, 200_007, -4500]);
        assert!(program.rejected.is_empty());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let program = parse_program("1000000 200007 -1000000 999999");
        assert_eq!(values(&program), vec![200_007, 999_999]);
        assert_eq!(program.rejected, vec![1_000_000, -1_000_000]);
    }

    #[test]
    fn test_parse_capacity() {
        let text = "1 ".repeat(LOAD_CAPACITY + 20);
        let program = parse_program(&text);
        assert_eq!(program.len(), LOAD_CAPACITY);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file("/nonexistent/program.sml");
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("simpletron-load-{}.sml", std::process::id()));
        std::fs::write(&path, "100007\n450000\n").unwrap();

        let program = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(values(&program), vec![100_007, 450_000]);
    }

    #[test]
    fn test_load_empty_file() {
        let path = std::env::temp_dir().join(format!("simpletron-empty-{}.sml", std::process::id()));
        std::fs::write(&path, "; nothing here\n").unwrap();

        let program = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(program.is_empty());
        assert!(program.rejected.is_empty());
    }

    #[test]
    fn test_interactive_sentinel() {
        let mut input = "100007\n450000\n-999999\n200000\n".as_bytes();
        let mut out = Vec::new();

        let program = load_interactive(&mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(values(&program), vec![100_007, 450_000]);
        assert!(out.contains("00 ? 01 ? 02 ? "));
        // The word after the sentinel is left for the program's READs.
        assert_eq!(input, b"200000\n");
    }

    #[test]
    fn test_interactive_reprompts_bad_lines() {
        let mut input = "abc\n1234567\n42\n".as_bytes();
        let mut out = Vec::new();

        let program = load_interactive(&mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(values(&program), vec![42]);
        assert!(out.contains("00 ? Invalid input. Please enter a valid integer.\n00 ? "));
        assert!(out.contains("Invalid instruction. Please enter a number between -999999 and +999999.\n00 ? "));
    }

    #[test]
    fn test_prompted_keyboard() {
        let mut input = "n\n450000\n-999999\n".as_bytes();
        let mut out = Vec::new();

        let program = load_prompted(&mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(values(&program), vec![450_000]);
        assert!(out.starts_with("*** Welcome to Simpletron V2! ***\n"));
    }

    #[test]
    fn test_announce() {
        let program = Program { words: vec![], rejected: vec![1_000_000] };
        let mut out = Vec::new();
        program.announce(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Invalid instruction: 1000000\nProgram loaded successfully.\n"
        );
    }
}
