//! Multi-document compile driver.
//!
//! A project walks its root document, then every document the walked
//! documents reference, breadth first, before anything is linked. Each
//! document is walked into its own store; a fault inside a compile hook
//! discards that store and surfaces as [`CompileError::Panicked`].

use crate::context::CompileContext;
use crate::error::{BuildError, CompileError};
use crate::link::{link, LinkedGraph};
use crate::location::normalize_document;
use crate::options::CompileOptions;
use crate::protocol::ProtocolRegistry;
use crate::resolver::DocumentResolver;
use crate::store::{ArtifactStore, DocumentStore};
use crate::walker::walk;
use asyncgen_spec::AsyncApi;
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info};

pub struct Project<'r> {
    options: CompileOptions,
    protocols: ProtocolRegistry,
    resolver: &'r dyn DocumentResolver,
}

impl<'r> Project<'r> {
    /// Project with the built-in builders allowed by `options`.
    pub fn new(options: CompileOptions, resolver: &'r dyn DocumentResolver) -> Result<Self, CompileError> {
        let protocols = ProtocolRegistry::from_options(&options)?;
        Ok(Self {
            options,
            protocols,
            resolver,
        })
    }

    pub fn with_registry(mut self, protocols: ProtocolRegistry) -> Self {
        self.protocols = protocols;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    /// Walk `root` and every document reachable from it.
    ///
    /// Documents are compiled in discovery order; each is compiled once.
    /// Document ids are normalized paths relative to the root document's
    /// directory, and the resolver is asked for exactly those ids.
    pub fn compile(&self, root_id: &str, root: &AsyncApi) -> Result<ArtifactStore, CompileError> {
        let root_id = normalize_document(root_id);
        let mut store = ArtifactStore::new();
        let mut seen: HashSet<String> = HashSet::from([root_id.clone()]);
        let mut pending = VecDeque::new();

        let compiled = self.compile_document(store.next_index(), &root_id, root)?;
        self.enqueue(&compiled, &mut seen, &mut pending);
        store.push(compiled);

        while let Some(document) = pending.pop_front() {
            debug!(%document, "resolving external document");
            let doc = self.resolver.resolve(&document)?;
            let compiled = self.compile_document(store.next_index(), &document, &doc)?;
            self.enqueue(&compiled, &mut seen, &mut pending);
            store.push(compiled);
        }

        info!(
            documents = store.documents().len(),
            artifacts = store.len(),
            "compile finished"
        );
        Ok(store)
    }

    /// Compile and link.
    pub fn build(&self, root_id: &str, root: &AsyncApi) -> Result<LinkedGraph, BuildError> {
        let store = self.compile(root_id, root)?;
        Ok(link(store)?)
    }

    fn enqueue(&self, compiled: &DocumentStore, seen: &mut HashSet<String>, pending: &mut VecDeque<String>) {
        for external in compiled.externals() {
            if seen.insert(external.to_string()) {
                pending.push_back(external.to_string());
            }
        }
    }

    /// Walk one document into a fresh store.
    pub fn compile_document(
        &self,
        index: u32,
        document: &str,
        doc: &AsyncApi,
    ) -> Result<DocumentStore, CompileError> {
        info!(%document, "walking document");
        let mut store = DocumentStore::new(index, document);
        let mut ctx = CompileContext::new(&mut store, &self.options, &self.protocols);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| walk(&mut ctx, doc)));
        match outcome {
            Ok(result) => result?,
            Err(payload) => {
                let location = ctx.location();
                let message = panic_message(payload.as_ref());
                error!(%document, %location, %message, "compile hook panicked");
                return Err(CompileError::Panicked {
                    document: document.to_string(),
                    location,
                    message,
                });
            }
        }

        debug!(
            %document,
            artifacts = store.artifacts().len(),
            promises = store.promise_count(),
            "document walked"
        );
        Ok(store)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
