//! Sources for documents addressed by cross-document references.

use crate::error::ResolveError;
use asyncgen_spec::{parse_document_content, AsyncApi};
use std::collections::HashMap;

/// Provides decoded documents by identifier.
///
/// Identifiers are the document part of a reference, e.g. `common.json`
/// for `common.json#/components/messages/Ping`.
pub trait DocumentResolver {
    fn resolve(&self, document: &str) -> Result<AsyncApi, ResolveError>;
}

/// Resolver for single-document projects; every lookup fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExternalDocuments;

impl DocumentResolver for NoExternalDocuments {
    fn resolve(&self, document: &str) -> Result<AsyncApi, ResolveError> {
        Err(ResolveError::NotFound {
            document: document.to_string(),
        })
    }
}

/// Resolver over documents held in memory as JSON text.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResolver {
    documents: HashMap<String, String>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(document, content);
        self
    }

    pub fn insert(&mut self, document: impl Into<String>, content: impl Into<String>) {
        self.documents.insert(document.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentResolver for InMemoryResolver {
    fn resolve(&self, document: &str) -> Result<AsyncApi, ResolveError> {
        let content = self.documents.get(document).ok_or_else(|| ResolveError::NotFound {
            document: document.to_string(),
        })?;
        parse_document_content(content).map_err(|e| ResolveError::Failed {
            document: document.to_string(),
            message: e.to_string(),
        })
    }
}
