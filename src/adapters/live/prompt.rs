//! Live confirmation gates.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Mutex;

use crate::ports::prompt::Confirm;

/// Asks on a line-oriented reader/writer pair, stdin/stdout by default.
///
/// Only `y` or `yes` (any case) confirm. Anything else, including an empty
/// line or end of input, declines.
pub struct StdinConfirm<R = BufReader<Stdin>, W = Stdout> {
    io: Mutex<(R, W)>,
}

impl StdinConfirm {
    /// Creates a gate reading from stdin and writing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl Default for StdinConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinConfirm<R, W> {
    /// Creates a gate over an arbitrary reader and writer.
    pub fn with_io(reader: R, writer: W) -> Self {
        Self { io: Mutex::new((reader, writer)) }
    }
}

impl<R: BufRead + Send, W: Write + Send> Confirm for StdinConfirm<R, W> {
    fn confirm(&self, question: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut io = self.io.lock().map_err(|_| "prompt lock poisoned")?;
        let (reader, writer) = &mut *io;

        write!(writer, "{question} (yes/no) [no]: ")?;
        writer.flush()?;

        let mut line = String::new();
        reader.read_line(&mut line)?;
        Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Confirms everything without asking. Used for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let gate = StdinConfirm::with_io(Cursor::new(input.to_string()), Vec::new());
        let answer = gate.confirm("Do you want to delete sites/all/modules/token ?").unwrap();
        let (_, written) = gate.io.into_inner().unwrap();
        (answer, String::from_utf8(written).unwrap())
    }

    #[test]
    fn yes_confirms() {
        let (answer, written) = ask("yes\n");
        assert!(answer);
        assert!(written.starts_with("Do you want to delete sites/all/modules/token ?"));
        assert!(ask("Y\n").0);
    }

    #[test]
    fn anything_else_declines() {
        assert!(!ask("no\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("sure\n").0);
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!ask("").0);
    }

    #[test]
    fn assume_yes_always_confirms() {
        assert!(AssumeYes.confirm("anything").unwrap());
    }
}
