use crate::location::Location;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal errors raised while walking a single document.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("path={location}: {message}")]
    Malformed { location: Location, message: String },

    #[error("path={location}: invalid reference {reference:?}: {reason}")]
    InvalidReference {
        location: Location,
        reference: String,
        reason: String,
    },

    #[error("path={location} proto={protocol}: {message}")]
    ProtocolDecode {
        location: Location,
        protocol: String,
        message: String,
    },

    #[error("path={location}: an artifact is already registered at this location")]
    DuplicateLocation { location: Location },

    #[error("path={location}: compile hook panicked: {message}")]
    Panicked {
        document: String,
        location: Location,
        message: String,
    },

    #[error("Unknown protocol {0:?} in configuration")]
    UnknownProtocol(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl CompileError {
    /// Location the error was raised at, when it has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            CompileError::Malformed { location, .. }
            | CompileError::InvalidReference { location, .. }
            | CompileError::ProtocolDecode { location, .. }
            | CompileError::DuplicateLocation { location }
            | CompileError::Panicked { location, .. } => Some(location),
            CompileError::UnknownProtocol(_) | CompileError::Resolve(_) => None,
        }
    }
}

/// Failure to provide an external document.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Document {document:?} is not available")]
    NotFound { document: String },

    #[error("Document {document:?} could not be loaded: {message}")]
    Failed { document: String, message: String },
}

/// A single resolution failure found while linking.
#[derive(Error, Debug, Clone)]
pub enum LinkError {
    #[error(
        "path={origin}: reference target {target} not found{}",
        .suggestion.as_ref().map(|s| format!(" (did you mean {:?}?)", s)).unwrap_or_default()
    )]
    NotFound {
        origin: Location,
        target: Location,
        suggestion: Option<String>,
    },

    #[error("path={origin}: no artifact matches {description}")]
    NoMatch { origin: Location, description: String },

    #[error("path={origin}: {count} artifacts match {description}, expected exactly one")]
    Ambiguous {
        origin: Location,
        description: String,
        count: usize,
    },

    #[error("path={origin}: expected {expected}, found {found} at {target}")]
    Narrowing {
        origin: Location,
        target: Location,
        expected: String,
        found: String,
    },

    #[error("path={origin}: {message}")]
    Transform { origin: Location, message: String },

    #[error("path={origin}: reference cycle {chain}")]
    RefCycle { origin: Location, chain: String },
}

impl LinkError {
    pub fn origin(&self) -> &Location {
        match self {
            LinkError::NotFound { origin, .. }
            | LinkError::NoMatch { origin, .. }
            | LinkError::Ambiguous { origin, .. }
            | LinkError::Narrowing { origin, .. }
            | LinkError::Transform { origin, .. }
            | LinkError::RefCycle { origin, .. } => origin,
        }
    }
}

/// Every failure found by one link run.
#[derive(Debug, Clone)]
pub struct LinkErrors(pub Vec<LinkError>);

impl LinkErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkError> {
        self.0.iter()
    }
}

impl fmt::Display for LinkErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} link error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for LinkErrors {}

/// Either phase of a project build.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Link(#[from] LinkErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// Non-fatal finding recorded during compilation.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            protocol: None,
            message: message.into(),
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path={}", self.location)?;
        if let Some(protocol) = &self.protocol {
            write!(f, " proto={}", protocol)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mentions_suggestion() {
        let err = LinkError::NotFound {
            origin: Location::new("main.json", ["channels", "a"]),
            target: Location::new("main.json", ["components", "channels", "Orderz"]),
            suggestion: Some("Orders".to_string()),
        };
        let text = err.to_string();
        assert!(text.starts_with("path=main.json#/channels/a"));
        assert!(text.contains("did you mean \"Orders\"?"));
    }

    #[test]
    fn test_link_errors_lists_every_failure() {
        let origin = Location::new("main.json", ["servers", "x"]);
        let errors = LinkErrors(vec![
            LinkError::NoMatch {
                origin: origin.clone(),
                description: "a kafka server".to_string(),
            },
            LinkError::Transform {
                origin,
                message: "bad".to_string(),
            },
        ]);
        let text = errors.to_string();
        assert!(text.starts_with("2 link error(s)"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::warning(
            Location::new("main.json", ["servers", "prod", "bindings"]),
            "unknown protocol, bindings skipped",
        )
        .with_protocol("foo");
        assert_eq!(
            diagnostic.to_string(),
            "path=main.json#/servers/prod/bindings proto=foo: unknown protocol, bindings skipped"
        );
    }
}
