//! CLI utilities for carlot.
//!
//! The utilities present in this module can be used to create an interactive
//! front end for the record store.
use std::io::{self, BufRead, Write};

/// Prompt the user for one input line.
///
/// Returns `None` at end of input. The returned line is trimmed of its
/// terminator but not yet parsed; see [`Command`](crate::command::Command).
pub fn prompt<R, W>(mut reader: R, mut writer: W) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(&mut writer, "> ")?;
    writer.flush()?;

    let mut s = String::new();
    if reader.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_prints_correctly() {
        let input = b".exit\n";
        let mut output = Vec::new();

        prompt(&input[..], &mut output).unwrap();

        let output = String::from_utf8(output).expect("not valid UTF-8");
        assert_eq!("> ", output);
    }

    #[test]
    fn prompt_returns_trimmed_line() {
        let input = b"info VIN001\n";
        let mut output = Vec::new();

        let line = prompt(&input[..], &mut output).unwrap();
        assert_eq!(line.as_deref(), Some("info VIN001"));
    }

    #[test]
    fn prompt_signals_end_of_input() {
        let input = b"";
        let mut output = Vec::new();

        let line = prompt(&input[..], &mut output).unwrap();
        assert_eq!(line, None);
    }
}
