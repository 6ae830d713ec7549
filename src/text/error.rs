use std::fmt;

/// Indicate an error in ARI text parsing. Carries the offending source
/// fragment and a position hint, per spec.md §4.1 "Failure modes": any
/// lex/parse error, range violation, or literal kind mismatch is reported
/// as a single `ParseError`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextError {
    pub message: String,
    pub position: usize,
    pub source: String,
}

impl TextError {
    pub fn new(message: impl Into<String>, position: usize, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position,
            source: source.into(),
        }
    }
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse ARI text at byte {}: {} (in \"{}\")",
            self.position, self.message, self.source
        )
    }
}

impl std::error::Error for TextError {}
