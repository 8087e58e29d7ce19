use super::promise::CellId;
use super::{ListPromise, Promise, RefId};
use crate::artifact::{Artifact, ArtifactId, ArtifactKind, Body, Narrow};
use crate::error::Diagnostic;
use crate::location::Location;
use crate::store::ArtifactStore;

/// A successfully linked project.
///
/// Owning a `LinkedGraph` proves every promise in it is bound, so reads
/// never fail. Reading a promise that belongs to another graph is a
/// contract violation and panics.
pub struct LinkedGraph {
    store: ArtifactStore,
}

impl LinkedGraph {
    pub(crate) fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn artifact(&self, id: ArtifactId) -> &Artifact {
        self.store.get(id)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = (ArtifactId, &Artifact)> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn find(&self, location: &Location) -> Option<ArtifactId> {
        self.store.find(location)
    }

    /// Raw binding of a promise. May be a reference artifact.
    pub fn binding<T>(&self, promise: &Promise<T>) -> ArtifactId {
        let cell = self.store.promise_cell(promise.cell);
        match cell.binding.get() {
            Some(id) => *id,
            None => panic!("promise at {} read before linking", cell.origin),
        }
    }

    /// Bound artifact of a promise, references followed.
    pub fn resolve<T: Narrow>(&self, promise: &Promise<T>) -> (ArtifactId, &T) {
        let id = self.deref(self.binding(promise));
        (id, self.narrow(id))
    }

    pub fn get<T: Narrow>(&self, promise: &Promise<T>) -> &T {
        self.resolve(promise).1
    }

    /// Raw bindings of a list promise, in store order.
    pub fn list_bindings<T>(&self, promise: &ListPromise<T>) -> &[ArtifactId] {
        let cell = self.store.list_cell(promise.cell);
        match cell.binding.get() {
            Some(ids) => ids,
            None => panic!("list promise at {} read before linking", cell.origin),
        }
    }

    pub fn resolve_list<T: Narrow>(&self, promise: &ListPromise<T>) -> Vec<(ArtifactId, &T)> {
        self.list_bindings(promise)
            .iter()
            .map(|raw| {
                let id = self.deref(*raw);
                (id, self.narrow(id))
            })
            .collect()
    }

    /// Raw target of a reference; may itself be a reference.
    pub fn ref_target(&self, reference: RefId) -> ArtifactId {
        self.ref_binding(reference.cell)
    }

    fn ref_binding(&self, cell: CellId) -> ArtifactId {
        let slot = self.store.ref_slot(cell);
        match slot.binding.get() {
            Some(id) => *id,
            None => panic!("reference at {} read before linking", slot.origin),
        }
    }

    /// Follow references until a concrete artifact. Cycles were rejected
    /// at link time, so a chain longer than the graph is a defect.
    pub fn deref(&self, mut id: ArtifactId) -> ArtifactId {
        let mut hops = 0;
        while let Body::Ref(reference) = &self.artifact(id).body {
            hops += 1;
            if hops > self.len() {
                panic!("reference chain from {} does not terminate", reference.target);
            }
            id = self.ref_binding(reference.id.cell);
        }
        id
    }

    fn narrow<T: Narrow>(&self, id: ArtifactId) -> &T {
        let artifact = self.artifact(id);
        match T::narrow(&artifact.body) {
            Some(body) => body,
            None => panic!(
                "artifact at {} is a {}, not a {}",
                artifact.location,
                artifact.body.label(),
                T::LABEL
            ),
        }
    }

    /// Name an artifact renders under. A reference uses its name override,
    /// else the name of what it points to.
    pub fn display_name(&self, mut id: ArtifactId) -> &str {
        loop {
            let artifact = self.artifact(id);
            match &artifact.body {
                Body::Ref(reference) => match &reference.name_override {
                    Some(name) => return name,
                    None => id = self.ref_binding(reference.id.cell),
                },
                _ => return &artifact.name,
            }
        }
    }

    pub fn is_selectable(&self, mut id: ArtifactId) -> bool {
        loop {
            let artifact = self.artifact(id);
            match &artifact.body {
                Body::Ref(reference) => match reference.selectable_override {
                    Some(selectable) => return selectable,
                    None => id = self.ref_binding(reference.id.cell),
                },
                _ => return artifact.selectable,
            }
        }
    }

    pub fn is_visible(&self, id: ArtifactId) -> bool {
        self.artifact(self.deref(id)).visible
    }

    /// Every artifact of `kind` in store order, references included.
    pub fn by_kind(&self, kind: ArtifactKind) -> Vec<ArtifactId> {
        self.artifacts()
            .filter(|(_, artifact)| artifact.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Names of every compiled document; the root document comes first.
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.store.documents().iter().map(|d| d.document())
    }

    /// Documents pulled in through references, in compile order.
    pub fn external_documents(&self) -> impl Iterator<Item = &str> {
        self.documents().skip(1)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.store
            .documents()
            .iter()
            .flat_map(|d| d.diagnostics().iter())
    }

    /// True when every cell of every document holds a binding.
    pub fn is_fully_bound(&self) -> bool {
        self.store.documents().iter().all(|d| {
            d.promises.iter().all(|p| p.binding.is_assigned())
                && d.lists.iter().all(|l| l.binding.is_assigned())
                && d.refs.iter().all(|r| r.binding.is_assigned())
        })
    }
}
