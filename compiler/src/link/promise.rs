//! Deferred edges between artifacts.
//!
//! Compile hooks create promises instead of holding direct references. Each
//! handle points at a cell in its document's store; the cell records the
//! query used to find the target and its binding. Bindings are written
//! once, by the linker, and only read through `LinkedGraph`.

use super::LinkView;
use crate::artifact::{Artifact, ArtifactId, ArtifactKind, Body, Narrow};
use crate::location::Location;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CellId {
    pub(crate) document: u32,
    pub(crate) index: u32,
}

pub type Predicate = Box<dyn Fn(&Artifact) -> bool + Send + Sync>;

/// Post-resolution step applied to a raw binding before it is assigned.
pub type Transform =
    Box<dyn Fn(&LinkView<'_>, ArtifactId) -> Result<ArtifactId, String> + Send + Sync>;

/// How a promise finds its target.
pub enum Query {
    /// Exact location match.
    Path(Location),
    /// Scan of every artifact; exactly one must match.
    Predicate {
        description: String,
        matches: Predicate,
    },
}

impl Query {
    pub fn path(target: Location) -> Self {
        Query::Path(target)
    }

    pub fn predicate(
        description: impl Into<String>,
        matches: impl Fn(&Artifact) -> bool + Send + Sync + 'static,
    ) -> Self {
        Query::Predicate {
            description: description.into(),
            matches: Box::new(matches),
        }
    }
}

/// What a bound artifact must turn out to be once references are followed.
#[derive(Clone, Copy)]
pub(crate) struct Expectation {
    pub(crate) label: &'static str,
    pub(crate) kind: ArtifactKind,
    accepts: Option<fn(&Body) -> bool>,
}

fn accepts<T: Narrow>(body: &Body) -> bool {
    T::narrow(body).is_some()
}

impl Expectation {
    pub(crate) fn of<T: Narrow>() -> Self {
        Self {
            label: T::LABEL,
            kind: T::KIND,
            accepts: Some(accepts::<T> as fn(&Body) -> bool),
        }
    }

    /// Any concrete artifact of `kind`.
    pub(crate) fn kind(kind: ArtifactKind) -> Self {
        Self {
            label: kind.as_str(),
            kind,
            accepts: None,
        }
    }

    pub(crate) fn accepts(&self, artifact: &Artifact) -> bool {
        match self.accepts {
            Some(accepts) => accepts(&artifact.body),
            None => artifact.kind == self.kind,
        }
    }
}

/// Write-once slot.
pub(crate) struct Binding<T>(Option<T>);

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Binding(None)
    }
}

impl<T> Binding<T> {
    /// Only the linker assigns bindings.
    pub(super) fn assign(&mut self, value: T, origin: &Location) {
        if self.0.is_some() {
            panic!("promise at {} was assigned twice", origin);
        }
        self.0 = Some(value);
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub(crate) fn is_assigned(&self) -> bool {
        self.0.is_some()
    }
}

pub(crate) struct PromiseCell {
    pub(crate) origin: Location,
    pub(crate) query: Query,
    pub(crate) expect: Expectation,
    pub(crate) transform: Option<Transform>,
    pub(crate) binding: Binding<ArtifactId>,
}

pub(crate) struct ListCell {
    pub(crate) origin: Location,
    pub(crate) description: String,
    pub(crate) matches: Predicate,
    pub(crate) expect: Expectation,
    pub(crate) binding: Binding<Vec<ArtifactId>>,
}

/// The edge of a reference artifact. Bound to the raw target, which may
/// itself be a reference.
pub(crate) struct RefSlot {
    pub(crate) origin: Location,
    pub(crate) target: Location,
    pub(crate) expect: Expectation,
    pub(crate) binding: Binding<ArtifactId>,
}

/// Typed handle to a single-target promise.
pub struct Promise<T> {
    pub(crate) cell: CellId,
    marker: PhantomData<fn() -> T>,
}

impl<T> Promise<T> {
    pub(crate) fn new(cell: CellId) -> Self {
        Self {
            cell,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Promise<T> {}

impl<T: Narrow> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Promise<{}>({}:{})",
            T::LABEL,
            self.cell.document,
            self.cell.index
        )
    }
}

/// Typed handle to a promise of every artifact matching a predicate.
pub struct ListPromise<T> {
    pub(crate) cell: CellId,
    marker: PhantomData<fn() -> T>,
}

impl<T> ListPromise<T> {
    pub(crate) fn new(cell: CellId) -> Self {
        Self {
            cell,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for ListPromise<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListPromise<T> {}

impl<T: Narrow> fmt::Debug for ListPromise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ListPromise<{}>({}:{})",
            T::LABEL,
            self.cell.document,
            self.cell.index
        )
    }
}

/// Handle to the edge of a reference artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId {
    pub(crate) cell: CellId,
}
