//! Transcript sources for dictated input.
//!
//! The speech-to-text backend itself is out of scope; a source only hands
//! over the finished utterance text, or `None` when the user cancelled or
//! nothing was captured. Which source backs `dictate` is decided once at
//! dispatch time, not scattered through call sites.

use std::io::{self, BufRead};

/// One-shot provider of a dictated utterance.
pub trait TranscriptSource {
    /// Produce the captured utterance, or `None` on cancel / no input.
    fn capture(&mut self) -> io::Result<Option<String>>;
}

/// Reads a single line from any `BufRead`, e.g. piped stdin.
pub struct ReaderSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> ReaderSource<R> {
        ReaderSource { reader }
    }
}

impl<R: BufRead> TranscriptSource for ReaderSource<R> {
    fn capture(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            // EOF before any input: the user backed out
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// A fixed transcript, handed over once.
///
/// Stands in for a real speech backend: `dictate TEXT...` uses it for
/// text given on the command line, and tests script it directly.
pub struct ScriptedSource {
    transcript: Option<String>,
}

impl ScriptedSource {
    pub fn new(transcript: impl Into<String>) -> ScriptedSource {
        ScriptedSource {
            transcript: Some(transcript.into()),
        }
    }

    /// A source that immediately reports a cancelled capture.
    pub fn cancelled() -> ScriptedSource {
        ScriptedSource { transcript: None }
    }
}

impl TranscriptSource for ScriptedSource {
    fn capture(&mut self) -> io::Result<Option<String>> {
        Ok(self.transcript.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_source_reads_one_line() {
        let mut source = ReaderSource::new("buy milk and call mom\nleftover".as_bytes());
        assert_eq!(
            source.capture().unwrap(),
            Some("buy milk and call mom".to_string())
        );
    }

    #[test]
    fn reader_source_treats_eof_as_cancel() {
        let mut source = ReaderSource::new("".as_bytes());
        assert_eq!(source.capture().unwrap(), None);
    }

    #[test]
    fn scripted_source_hands_over_once() {
        let mut source = ScriptedSource::new("water plants");
        assert_eq!(source.capture().unwrap(), Some("water plants".to_string()));
        assert_eq!(source.capture().unwrap(), None);
    }

    #[test]
    fn cancelled_source_yields_nothing() {
        let mut source = ScriptedSource::cancelled();
        assert_eq!(source.capture().unwrap(), None);
    }
}
