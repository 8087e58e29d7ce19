//! Compile context threaded through one document walk.

use crate::artifact::{Artifact, ArtifactId, Narrow};
use crate::error::{CompileError, Diagnostic};
use crate::link::Promise;
use crate::location::Location;
use crate::options::CompileOptions;
use crate::protocol::ProtocolRegistry;
use crate::store::DocumentStore;
use asyncgen_spec::Tags;
use std::sync::Arc;

/// One step of the walk: the key under the parent and the effective tags.
#[derive(Debug, Clone)]
pub struct Frame {
    pub key: String,
    pub tags: Tags,
}

pub struct CompileContext<'a> {
    stack: Vec<Frame>,
    store: &'a mut DocumentStore,
    options: &'a CompileOptions,
    protocols: &'a ProtocolRegistry,
    default_content_type: Option<String>,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        store: &'a mut DocumentStore,
        options: &'a CompileOptions,
        protocols: &'a ProtocolRegistry,
    ) -> Self {
        Self {
            stack: Vec::new(),
            store,
            options,
            protocols,
            default_content_type: None,
        }
    }

    /// Enter `key`. Inheritable tags of the parent frame carry over.
    pub fn push(&mut self, key: impl Into<String>, tags: Tags) {
        let inherited = self
            .stack
            .last()
            .map(|frame| frame.tags.inherited())
            .unwrap_or_default();
        self.stack.push(Frame {
            key: key.into(),
            tags: tags | inherited,
        });
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.store.document_arc().clone(),
            self.stack.iter().map(|frame| frame.key.clone()),
        )
    }

    pub fn document(&self) -> &Arc<str> {
        self.store.document_arc()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.stack.last().map(|frame| frame.key.as_str())
    }

    pub fn tags(&self) -> Tags {
        self.stack.last().map(|frame| frame.tags).unwrap_or_default()
    }

    pub fn parent_tags(&self) -> Tags {
        self.stack
            .len()
            .checked_sub(2)
            .map(|index| self.stack[index].tags)
            .unwrap_or_default()
    }

    /// The current node is a direct entry of a definitions section.
    pub fn is_definition(&self) -> bool {
        self.parent_tags().contains(Tags::DEFINITION)
    }

    /// The current node starts a data model: it is tagged as one and its
    /// parent is not.
    pub fn is_data_model_root(&self) -> bool {
        self.tags().contains(Tags::DATA_MODEL) && !self.parent_tags().contains(Tags::DATA_MODEL)
    }

    /// The current node sits directly under a top-level section such as
    /// `servers` or `channels`.
    pub fn is_top_level(&self, section: &str) -> bool {
        self.stack.len() == 2 && self.stack[0].key == section
    }

    pub fn options(&self) -> &'a CompileOptions {
        self.options
    }

    pub fn protocols(&self) -> &'a ProtocolRegistry {
        self.protocols
    }

    pub fn default_content_type(&self) -> &str {
        self.default_content_type
            .as_deref()
            .unwrap_or(&self.options.default_content_type)
    }

    pub(crate) fn set_default_content_type(&mut self, content_type: Option<String>) {
        self.default_content_type = content_type;
    }

    pub fn store(&mut self) -> &mut DocumentStore {
        &mut *self.store
    }

    pub fn add(&mut self, artifact: Artifact) -> Result<ArtifactId, CompileError> {
        self.store.add(artifact)
    }

    /// Promise from the current location to `target`.
    pub fn promise_to<T: Narrow>(&mut self, target: Location) -> Promise<T> {
        let origin = self.location();
        self.store.path_promise(origin, target)
    }

    /// Promise from the current location to a child of it.
    pub fn promise_child<T: Narrow>(&mut self, segments: &[&str]) -> Promise<T> {
        let mut target = self.location();
        for segment in segments {
            target = target.join(*segment);
        }
        self.promise_to(target)
    }

    /// Promise to a named entry of a components section of this document.
    pub fn promise_component<T: Narrow>(&mut self, section: &str, name: &str) -> Promise<T> {
        let target = Location::new(self.document().clone(), ["components", section, name]);
        self.promise_to(target)
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.store.diagnose(diagnostic);
    }
}
