//! ARI text codec (C2): lexer, recursive descent parser, and canonical
//! encoder, grounded in `original_source/src/ace/ari_text/`.

mod encode;
mod error;
mod lexer;
mod parser;

pub use error::TextError;

use crate::ari::Ari;

/// Decode one complete ARI text value.
pub fn decode(input: &str) -> Result<Ari, TextError> {
    parser::parse(input)
}

/// Encode an ARI to its canonical text form.
pub fn encode(ari: &Ari) -> String {
    encode::encode(ari)
}

/// Recovers a stream of line-delimited ARI texts one parse at a time
/// (spec.md §7 policy (i)): partial lines accumulate until a parse
/// succeeds, at which point the buffer resets; if the stream ends with
/// unconsumed text, the last error is surfaced. Used by the CLI's `text`
/// and `cborhex` input modes, where a logical ARI may be split across
/// physical lines (e.g. a very long nested AC).
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buffer: String,
    last_error: Option<TextError>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one more line of input. Returns `Some(ari)` as soon as the
    /// accumulated buffer parses; otherwise returns `None` and keeps
    /// buffering.
    pub fn push_line(&mut self, line: &str) -> Option<Result<Ari, TextError>> {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);

        match decode(&self.buffer) {
            Ok(ari) => {
                self.buffer.clear();
                self.last_error = None;
                Some(Ok(ari))
            }
            Err(e) => {
                self.last_error = Some(e);
                None
            }
        }
    }

    /// Call once the input stream is exhausted. `Some(error)` if
    /// unconsumed, never-parsed text remains in the buffer.
    pub fn finish(self) -> Option<TextError> {
        if self.buffer.is_empty() {
            None
        } else {
            self.last_error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let text = "ari:/IANA:amp_agent/RPTT.full_report";
        let ari = decode(text).unwrap();
        assert_eq!(encode(&ari), text);
    }

    #[test]
    fn line_accumulator_resolves_single_line_inputs() {
        let mut acc = LineAccumulator::new();
        let result = acc.push_line("ari:/ns/VAR.x").unwrap().unwrap();
        assert!(matches!(result, Ari::Reference(_)));
        assert!(acc.finish().is_none());
    }

    #[test]
    fn line_accumulator_surfaces_trailing_error() {
        let mut acc = LineAccumulator::new();
        assert!(acc.push_line("ari:/ns/VAR.x(").is_none());
        assert!(acc.finish().is_some());
    }
}
