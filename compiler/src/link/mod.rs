//! Linker: binds every promise of every document in a project.
//!
//! Linking runs in phases over the whole [`ArtifactStore`]:
//! 1. raw binding of every reference, promise and list promise,
//! 2. reference cycle detection,
//! 3. transforms and narrowing against the expected entity,
//! 4. assignment, only when phases 1 to 3 found no error.
//!
//! Errors are collected across all phases so one run reports every broken
//! edge at once.

mod graph;
mod promise;

pub use graph::LinkedGraph;
pub use promise::{ListPromise, Predicate, Promise, Query, RefId, Transform};
pub(crate) use promise::{Binding, CellId, Expectation, ListCell, PromiseCell, RefSlot};

use crate::artifact::{Artifact, ArtifactId, Body};
use crate::error::{LinkError, LinkErrors};
use crate::location::Location;
use crate::store::ArtifactStore;
use asyncgen_spec::suggest_similar;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

/// Read-only view of the store during linking, with raw reference
/// bindings available for dereferencing.
pub struct LinkView<'a> {
    store: &'a ArtifactStore,
    refs: &'a HashMap<CellId, ArtifactId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerefError {
    Unresolved(Location),
    Cycle(Location),
}

impl fmt::Display for DerefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerefError::Unresolved(at) => write!(f, "reference at {} is unresolved", at),
            DerefError::Cycle(at) => write!(f, "reference at {} is part of a cycle", at),
        }
    }
}

impl<'a> LinkView<'a> {
    pub fn artifact(&self, id: ArtifactId) -> &'a Artifact {
        self.store.get(id)
    }

    pub fn find(&self, location: &Location) -> Option<ArtifactId> {
        self.store.find(location)
    }

    /// Follow references from `id` until a concrete artifact.
    pub fn deref(&self, id: ArtifactId) -> Result<ArtifactId, DerefError> {
        let mut current = id;
        let mut seen = HashSet::new();
        loop {
            let artifact = self.store.get(current);
            let Body::Ref(reference) = &artifact.body else {
                return Ok(current);
            };
            if !seen.insert(current) {
                return Err(DerefError::Cycle(artifact.location.clone()));
            }
            match self.refs.get(&reference.id.cell) {
                Some(next) => current = *next,
                None => return Err(DerefError::Unresolved(artifact.location.clone())),
            }
        }
    }
}

/// Link a fully compiled project.
pub fn link(mut store: ArtifactStore) -> Result<LinkedGraph, LinkErrors> {
    resolve(&mut store)?;
    Ok(LinkedGraph::new(store))
}

pub(crate) fn resolve(store: &mut ArtifactStore) -> Result<(), LinkErrors> {
    let mut errors = Vec::new();

    let (ref_targets, promise_targets, list_targets) = {
        let raw_refs = bind_refs(store, &mut errors);
        let raw_promises = bind_promises(store, &mut errors);
        let raw_lists = bind_lists(store);

        detect_cycles(store, &raw_refs, &mut errors);

        let view = LinkView {
            store: &*store,
            refs: &raw_refs,
        };
        let refs = narrow_refs(&view, &mut errors);
        let promises = transform_promises(&view, raw_promises, &mut errors);
        let lists = narrow_lists(&view, raw_lists, &mut errors);
        (refs, promises, lists)
    };

    if !errors.is_empty() {
        info!(errors = errors.len(), "link failed");
        return Err(LinkErrors(errors));
    }

    for (cell, target) in &ref_targets {
        let slot = &mut store.documents[cell.document as usize].refs[cell.index as usize];
        slot.binding.assign(*target, &slot.origin);
    }
    for (cell, target) in &promise_targets {
        let promise = &mut store.documents[cell.document as usize].promises[cell.index as usize];
        promise.binding.assign(*target, &promise.origin);
    }
    for (cell, targets) in list_targets {
        let list = &mut store.documents[cell.document as usize].lists[cell.index as usize];
        list.binding.assign(targets, &list.origin);
    }

    info!(
        documents = store.documents.len(),
        artifacts = store.len(),
        refs = ref_targets.len(),
        promises = promise_targets.len(),
        "link complete"
    );
    Ok(())
}

fn not_found(store: &ArtifactStore, origin: &Location, target: &Location) -> LinkError {
    let parent = target.parent();
    let siblings: Vec<&str> = store
        .iter()
        .filter(|(_, artifact)| artifact.location.parent() == parent)
        .filter_map(|(_, artifact)| artifact.location.last())
        .collect();
    let suggestion = target
        .last()
        .and_then(|name| suggest_similar(name, &siblings, 3).into_iter().next())
        .map(|s| s.candidate);

    LinkError::NotFound {
        origin: origin.clone(),
        target: target.clone(),
        suggestion,
    }
}

fn bind_refs(store: &ArtifactStore, errors: &mut Vec<LinkError>) -> HashMap<CellId, ArtifactId> {
    let mut bound = HashMap::new();
    for document in &store.documents {
        for (index, slot) in document.refs.iter().enumerate() {
            let cell = CellId {
                document: document.index,
                index: index as u32,
            };
            match store.find(&slot.target) {
                Some(target) => {
                    bound.insert(cell, target);
                }
                None => errors.push(not_found(store, &slot.origin, &slot.target)),
            }
        }
    }
    bound
}

fn bind_promises(store: &ArtifactStore, errors: &mut Vec<LinkError>) -> Vec<(CellId, ArtifactId)> {
    let mut bound = Vec::new();
    for document in &store.documents {
        for (index, promise) in document.promises.iter().enumerate() {
            let cell = CellId {
                document: document.index,
                index: index as u32,
            };
            match &promise.query {
                Query::Path(target) => match store.find(target) {
                    Some(id) => bound.push((cell, id)),
                    None => errors.push(not_found(store, &promise.origin, target)),
                },
                Query::Predicate {
                    description,
                    matches,
                } => {
                    let hits: Vec<ArtifactId> = store
                        .iter()
                        .filter(|(_, artifact)| matches(artifact))
                        .map(|(id, _)| id)
                        .collect();
                    match hits.as_slice() {
                        [id] => bound.push((cell, *id)),
                        [] => errors.push(LinkError::NoMatch {
                            origin: promise.origin.clone(),
                            description: description.clone(),
                        }),
                        many => errors.push(LinkError::Ambiguous {
                            origin: promise.origin.clone(),
                            description: description.clone(),
                            count: many.len(),
                        }),
                    }
                }
            }
        }
    }
    bound
}

fn bind_lists(store: &ArtifactStore) -> Vec<(CellId, Vec<ArtifactId>)> {
    let mut bound = Vec::new();
    for document in &store.documents {
        for (index, list) in document.lists.iter().enumerate() {
            let cell = CellId {
                document: document.index,
                index: index as u32,
            };
            let hits = store
                .iter()
                .filter(|(_, artifact)| (list.matches)(artifact))
                .map(|(id, _)| id)
                .collect();
            bound.push((cell, hits));
        }
    }
    bound
}

/// Report every reference cycle once, from its lowest member.
fn detect_cycles(
    store: &ArtifactStore,
    refs: &HashMap<CellId, ArtifactId>,
    errors: &mut Vec<LinkError>,
) {
    for document in &store.documents {
        for slot in &document.refs {
            let Some(start) = store.find(&slot.origin) else {
                continue;
            };
            let mut chain = vec![start];
            let mut current = start;
            loop {
                let next = match &store.get(current).body {
                    Body::Ref(reference) => match refs.get(&reference.id.cell) {
                        Some(next) => *next,
                        None => break,
                    },
                    _ => break,
                };
                if next == start {
                    if chain.iter().min() == Some(&start) {
                        let rendered: Vec<String> = chain
                            .iter()
                            .chain(std::iter::once(&start))
                            .map(|id| store.get(*id).location.to_string())
                            .collect();
                        errors.push(LinkError::RefCycle {
                            origin: slot.origin.clone(),
                            chain: rendered.join(" -> "),
                        });
                    }
                    break;
                }
                if chain.contains(&next) {
                    break;
                }
                chain.push(next);
                current = next;
            }
        }
    }
}

/// Check that `id` dereferences to what `expect` wants.
///
/// `Ok(false)` means the chain is broken by an error reported elsewhere.
fn check(
    view: &LinkView<'_>,
    expect: &Expectation,
    origin: &Location,
    id: ArtifactId,
) -> Result<bool, LinkError> {
    let Ok(target) = view.deref(id) else {
        return Ok(false);
    };
    let artifact = view.artifact(target);
    if expect.accepts(artifact) {
        Ok(true)
    } else {
        Err(LinkError::Narrowing {
            origin: origin.clone(),
            target: artifact.location.clone(),
            expected: expect.label.to_string(),
            found: artifact.body.label().to_string(),
        })
    }
}

fn narrow_refs(view: &LinkView<'_>, errors: &mut Vec<LinkError>) -> Vec<(CellId, ArtifactId)> {
    let mut narrowed = Vec::new();
    for document in &view.store.documents {
        for (index, slot) in document.refs.iter().enumerate() {
            let cell = CellId {
                document: document.index,
                index: index as u32,
            };
            let Some(raw) = view.refs.get(&cell) else {
                continue;
            };
            match check(view, &slot.expect, &slot.origin, *raw) {
                Ok(true) => narrowed.push((cell, *raw)),
                Ok(false) => {}
                Err(error) => errors.push(error),
            }
        }
    }
    narrowed
}

fn transform_promises(
    view: &LinkView<'_>,
    raw: Vec<(CellId, ArtifactId)>,
    errors: &mut Vec<LinkError>,
) -> Vec<(CellId, ArtifactId)> {
    let mut narrowed = Vec::with_capacity(raw.len());
    for (cell, id) in raw {
        let promise = view.store.promise_cell(cell);
        let candidate = match &promise.transform {
            Some(transform) => match transform(view, id) {
                Ok(candidate) => candidate,
                Err(message) => {
                    errors.push(LinkError::Transform {
                        origin: promise.origin.clone(),
                        message,
                    });
                    continue;
                }
            },
            None => id,
        };
        match check(view, &promise.expect, &promise.origin, candidate) {
            Ok(true) => narrowed.push((cell, candidate)),
            Ok(false) => {}
            Err(error) => errors.push(error),
        }
    }
    narrowed
}

fn narrow_lists(
    view: &LinkView<'_>,
    raw: Vec<(CellId, Vec<ArtifactId>)>,
    errors: &mut Vec<LinkError>,
) -> Vec<(CellId, Vec<ArtifactId>)> {
    let mut narrowed = Vec::with_capacity(raw.len());
    for (cell, hits) in raw {
        let list = view.store.list_cell(cell);
        let mut accepted = Vec::with_capacity(hits.len());
        for id in hits {
            match check(view, &list.expect, &list.origin, id) {
                Ok(true) => accepted.push(id),
                Ok(false) => {}
                Err(error) => errors.push(error),
            }
        }
        debug!(
            origin = %list.origin,
            description = %list.description,
            matched = accepted.len(),
            "bound list promise"
        );
        narrowed.push((cell, accepted));
    }
    narrowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactKind, RefTarget};
    use crate::entities::{CorrelationId, SecurityScheme};
    use crate::store::DocumentStore;

    const DOC: &str = "main.json";

    fn loc(segments: &[&str]) -> Location {
        Location::new(DOC, segments.iter().copied())
    }

    fn correlation(store: &mut DocumentStore, name: &str) -> ArtifactId {
        store
            .add(Artifact::new(
                ArtifactKind::Other,
                name,
                loc(&["components", "correlationIds", name]),
                Body::CorrelationId(CorrelationId {
                    description: None,
                    location: format!("$message.header#/{}", name),
                }),
            ))
            .unwrap()
    }

    fn scheme(store: &mut DocumentStore, name: &str) -> ArtifactId {
        store
            .add(Artifact::new(
                ArtifactKind::Security,
                name,
                loc(&["components", "securitySchemes", name]),
                Body::Security(SecurityScheme {
                    scheme_type: "userPassword".to_string(),
                    description: None,
                    name: None,
                    location: None,
                    scheme: None,
                    bearer_format: None,
                    open_id_connect_url: None,
                    flows: None,
                }),
            ))
            .unwrap()
    }

    fn reference(store: &mut DocumentStore, at: Location, target: Location) -> ArtifactId {
        let id = store.reference(at.clone(), target.clone(), ArtifactKind::Other);
        store
            .add(Artifact::new(
                ArtifactKind::Other,
                "ref",
                at,
                Body::Ref(RefTarget {
                    id,
                    target,
                    name_override: None,
                    selectable_override: None,
                }),
            ))
            .unwrap()
    }

    fn single(store: DocumentStore) -> ArtifactStore {
        let mut artifacts = ArtifactStore::new();
        artifacts.push(store);
        artifacts
    }

    #[test]
    fn test_path_promise_binds_exactly_once() {
        let mut store = DocumentStore::new(0, DOC);
        let target = correlation(&mut store, "a");
        let promise = store.path_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            loc(&["components", "correlationIds", "a"]),
        );

        let graph = link(single(store)).unwrap();
        assert!(graph.is_fully_bound());
        let (id, body) = graph.resolve(&promise);
        assert_eq!(id, target);
        assert_eq!(body.location, "$message.header#/a");
    }

    #[test]
    fn test_predicate_promise_is_deterministic() {
        let mut store = DocumentStore::new(0, DOC);
        correlation(&mut store, "a");
        let b = correlation(&mut store, "b");
        let promise = store.promise::<CorrelationId>(
            loc(&["channels", "x"]),
            Query::predicate("correlation id named b", |artifact| artifact.name() == "b"),
        );

        let graph = link(single(store)).unwrap();
        assert_eq!(graph.resolve(&promise).0, b);
    }

    #[test]
    fn test_ambiguous_and_missing_predicates_fail() {
        let mut store = DocumentStore::new(0, DOC);
        correlation(&mut store, "a");
        correlation(&mut store, "b");
        store.promise::<CorrelationId>(
            loc(&["channels", "x"]),
            Query::predicate("any correlation id", |artifact| {
                artifact.kind() == ArtifactKind::Other
            }),
        );
        store.promise::<CorrelationId>(
            loc(&["channels", "y"]),
            Query::predicate("nothing", |_| false),
        );

        let errors = link(single(store)).err().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors.0[0],
            LinkError::Ambiguous { count: 2, .. }
        ));
        assert!(matches!(errors.0[1], LinkError::NoMatch { .. }));
    }

    #[test]
    fn test_missing_target_suggests_sibling() {
        let mut store = DocumentStore::new(0, DOC);
        correlation(&mut store, "orderId");
        store.path_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            loc(&["components", "correlationIds", "orderID"]),
        );

        let errors = link(single(store)).err().unwrap();
        match &errors.0[..] {
            [LinkError::NotFound { suggestion, origin, .. }] => {
                assert_eq!(suggestion.as_deref(), Some("orderId"));
                assert_eq!(origin, &loc(&["channels", "x"]));
            }
            other => panic!("unexpected errors {:?}", other),
        }
    }

    #[test]
    fn test_narrowing_follows_references() {
        let mut store = DocumentStore::new(0, DOC);
        let target = correlation(&mut store, "a");
        reference(
            &mut store,
            loc(&["components", "correlationIds", "alias"]),
            loc(&["components", "correlationIds", "a"]),
        );
        let through_ref = store.path_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            loc(&["components", "correlationIds", "alias"]),
        );

        let graph = link(single(store)).unwrap();
        assert_eq!(graph.resolve(&through_ref).0, target);
    }

    #[test]
    fn test_narrowing_mismatch_is_reported() {
        let mut store = DocumentStore::new(0, DOC);
        scheme(&mut store, "basic");
        store.path_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            loc(&["components", "securitySchemes", "basic"]),
        );

        let errors = link(single(store)).err().unwrap();
        match &errors.0[..] {
            [LinkError::Narrowing { expected, found, .. }] => {
                assert_eq!(expected, "correlation id");
                assert_eq!(found, "security scheme");
            }
            other => panic!("unexpected errors {:?}", other),
        }
    }

    #[test]
    fn test_transform_replaces_raw_binding() {
        let mut store = DocumentStore::new(0, DOC);
        correlation(&mut store, "a");
        let b = correlation(&mut store, "b");
        let promise = store.transformed_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            Query::path(loc(&["components", "correlationIds", "a"])),
            |view, _raw| {
                view.find(&Location::new(DOC, ["components", "correlationIds", "b"]))
                    .ok_or_else(|| "sibling missing".to_string())
            },
        );

        let graph = link(single(store)).unwrap();
        assert_eq!(graph.resolve(&promise).0, b);
    }

    #[test]
    fn test_reference_cycle_is_reported_once() {
        let mut store = DocumentStore::new(0, DOC);
        let a = loc(&["components", "correlationIds", "a"]);
        let b = loc(&["components", "correlationIds", "b"]);
        reference(&mut store, a.clone(), b.clone());
        reference(&mut store, b.clone(), a.clone());

        let errors = link(single(store)).err().unwrap();
        match &errors.0[..] {
            [LinkError::RefCycle { origin, chain }] => {
                assert_eq!(origin, &a);
                assert_eq!(
                    chain,
                    "main.json#/components/correlationIds/a -> main.json#/components/correlationIds/b -> main.json#/components/correlationIds/a"
                );
            }
            other => panic!("unexpected errors {:?}", other),
        }
    }

    #[test]
    fn test_list_promise_keeps_store_order() {
        let mut store = DocumentStore::new(0, DOC);
        let a = correlation(&mut store, "a");
        scheme(&mut store, "basic");
        let c = correlation(&mut store, "c");
        let list = store.list_promise::<CorrelationId>(
            loc(&["servers", "x"]),
            "correlation ids",
            |artifact| artifact.kind() == ArtifactKind::Other,
        );

        let graph = link(single(store)).unwrap();
        let ids: Vec<ArtifactId> = graph.resolve_list(&list).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn test_relinking_panics() {
        let mut store = DocumentStore::new(0, DOC);
        correlation(&mut store, "a");
        store.path_promise::<CorrelationId>(
            loc(&["channels", "x"]),
            loc(&["components", "correlationIds", "a"]),
        );
        let mut artifacts = single(store);

        resolve(&mut artifacts).unwrap();
        let _ = resolve(&mut artifacts);
    }
}
