use std::fmt;

/// Indicates a failure to ingest, look up, or encode ADM catalog data.
/// Mirrors the bare `RuntimeError`/`KeyError` the original raises from
/// `adm_set.py`/`adm_json.py`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmError {
    pub message: String,
}

impl AdmError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ADM catalog error: {}", self.message)
    }
}

impl std::error::Error for AdmError {}
