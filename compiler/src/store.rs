//! Per-document artifact storage.
//!
//! A [`DocumentStore`] is filled by exactly one walk and owns the artifacts
//! and promise cells that walk produced. The [`ArtifactStore`] collects the
//! stores of every document in a project, in compile order.

use crate::artifact::{Artifact, ArtifactId, ArtifactKind, Narrow};
use crate::error::{CompileError, Diagnostic};
use crate::link::{
    Binding, CellId, Expectation, ListCell, ListPromise, Promise, PromiseCell, Query, RefId,
    RefSlot, Transform,
};
use crate::link::LinkView;
use crate::location::Location;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;

pub struct DocumentStore {
    pub(crate) index: u32,
    pub(crate) document: Arc<str>,
    pub(crate) artifacts: Vec<Artifact>,
    by_location: HashMap<Location, u32>,
    pub(crate) promises: Vec<PromiseCell>,
    pub(crate) lists: Vec<ListCell>,
    pub(crate) refs: Vec<RefSlot>,
    externals: IndexSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentStore {
    pub fn new(index: u32, document: impl Into<Arc<str>>) -> Self {
        Self {
            index,
            document: document.into(),
            artifacts: Vec::new(),
            by_location: HashMap::new(),
            promises: Vec::new(),
            lists: Vec::new(),
            refs: Vec::new(),
            externals: IndexSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub(crate) fn document_arc(&self) -> &Arc<str> {
        &self.document
    }

    /// Register an artifact. Two artifacts never share a location.
    pub fn add(&mut self, artifact: Artifact) -> Result<ArtifactId, CompileError> {
        if self.by_location.contains_key(&artifact.location) {
            return Err(CompileError::DuplicateLocation {
                location: artifact.location.clone(),
            });
        }

        let index = self.artifacts.len() as u32;
        tracing::trace!(
            location = %artifact.location,
            kind = %artifact.kind,
            name = %artifact.name,
            "registered artifact"
        );
        self.by_location.insert(artifact.location.clone(), index);
        self.artifacts.push(artifact);
        Ok(ArtifactId::new(self.index, index))
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn find(&self, location: &Location) -> Option<ArtifactId> {
        self.by_location
            .get(location)
            .map(|index| ArtifactId::new(self.index, *index))
    }

    pub fn promise<T: Narrow>(&mut self, origin: Location, query: Query) -> Promise<T> {
        self.push_promise(origin, query, None)
    }

    pub fn path_promise<T: Narrow>(&mut self, origin: Location, target: Location) -> Promise<T> {
        self.push_promise(origin, Query::path(target), None)
    }

    /// Promise whose raw binding is passed through `transform` before the
    /// result is checked against `T`.
    pub fn transformed_promise<T: Narrow>(
        &mut self,
        origin: Location,
        query: Query,
        transform: impl Fn(&LinkView<'_>, ArtifactId) -> Result<ArtifactId, String>
            + Send
            + Sync
            + 'static,
    ) -> Promise<T> {
        self.push_promise(origin, query, Some(Box::new(transform)))
    }

    fn push_promise<T: Narrow>(
        &mut self,
        origin: Location,
        query: Query,
        transform: Option<Transform>,
    ) -> Promise<T> {
        if let Query::Path(target) = &query {
            self.note_external(target);
        }
        let cell = CellId {
            document: self.index,
            index: self.promises.len() as u32,
        };
        self.promises.push(PromiseCell {
            origin,
            query,
            expect: Expectation::of::<T>(),
            transform,
            binding: Binding::default(),
        });
        Promise::new(cell)
    }

    pub fn list_promise<T: Narrow>(
        &mut self,
        origin: Location,
        description: impl Into<String>,
        matches: impl Fn(&Artifact) -> bool + Send + Sync + 'static,
    ) -> ListPromise<T> {
        let cell = CellId {
            document: self.index,
            index: self.lists.len() as u32,
        };
        self.lists.push(ListCell {
            origin,
            description: description.into(),
            matches: Box::new(matches),
            expect: Expectation::of::<T>(),
            binding: Binding::default(),
        });
        ListPromise::new(cell)
    }

    /// Edge for a reference artifact of `kind` at `origin`.
    pub fn reference(&mut self, origin: Location, target: Location, kind: ArtifactKind) -> RefId {
        self.note_external(&target);
        let cell = CellId {
            document: self.index,
            index: self.refs.len() as u32,
        };
        self.refs.push(RefSlot {
            origin,
            target,
            expect: Expectation::kind(kind),
            binding: Binding::default(),
        });
        RefId { cell }
    }

    fn note_external(&mut self, target: &Location) {
        if target.document() != &*self.document {
            self.externals.insert(target.document().to_string());
        }
    }

    /// Other documents addressed by this document's references.
    pub fn externals(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().map(String::as_str)
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "compile diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn promise_count(&self) -> usize {
        self.promises.len() + self.lists.len() + self.refs.len()
    }
}

/// Stores of every compiled document, in compile order.
#[derive(Default)]
pub struct ArtifactStore {
    pub(crate) documents: Vec<DocumentStore>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next pushed document store must carry.
    pub fn next_index(&self) -> u32 {
        self.documents.len() as u32
    }

    pub fn push(&mut self, store: DocumentStore) {
        assert_eq!(
            store.index,
            self.next_index(),
            "document store {} pushed out of order",
            store.document
        );
        self.documents.push(store);
    }

    pub fn documents(&self) -> &[DocumentStore] {
        &self.documents
    }

    pub fn contains_document(&self, document: &str) -> bool {
        self.documents.iter().any(|d| d.document() == document)
    }

    pub fn get(&self, id: ArtifactId) -> &Artifact {
        &self.documents[id.document as usize].artifacts[id.index as usize]
    }

    pub fn find(&self, location: &Location) -> Option<ArtifactId> {
        self.documents
            .iter()
            .find(|d| d.document() == location.document())
            .and_then(|d| d.find(location))
    }

    /// Every artifact in store order: documents in compile order, then
    /// insertion order within a document.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &Artifact)> {
        self.documents.iter().flat_map(|store| {
            store
                .artifacts
                .iter()
                .enumerate()
                .map(move |(index, artifact)| (ArtifactId::new(store.index, index as u32), artifact))
        })
    }

    pub fn len(&self) -> usize {
        self.documents.iter().map(|d| d.artifacts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn promise_cell(&self, cell: CellId) -> &PromiseCell {
        &self.documents[cell.document as usize].promises[cell.index as usize]
    }

    pub(crate) fn list_cell(&self, cell: CellId) -> &ListCell {
        &self.documents[cell.document as usize].lists[cell.index as usize]
    }

    pub(crate) fn ref_slot(&self, cell: CellId) -> &RefSlot {
        &self.documents[cell.document as usize].refs[cell.index as usize]
    }
}
