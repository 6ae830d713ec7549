use std::fmt;

/// Indicate an error in ARI CBOR parsing or construction. Mirrors
/// `ace.ari_cbor.ParseError`.
#[derive(Debug, Clone, PartialEq)]
pub struct CborError {
    pub message: String,
}

impl CborError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode ARI CBOR: {}", self.message)
    }
}

impl std::error::Error for CborError {}

impl From<serde_cbor::Error> for CborError {
    fn from(err: serde_cbor::Error) -> Self {
        CborError::new(err.to_string())
    }
}
