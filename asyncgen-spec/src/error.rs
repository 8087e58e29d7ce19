//! Error types for document decoding

/// Structured error type for document decoding.
#[derive(Debug, Clone)]
pub enum SpecError {
    ParseError { path: String, source: String },
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::ParseError { path, source } => {
                write!(f, "Parse error in {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for SpecError {}
