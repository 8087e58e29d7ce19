//! Compile-then-link engine for asynchronous API documents.
//!
//! A [`Project`] walks every document of a compilation unit with the
//! [`walker`], producing [`Artifact`]s and the promises that describe what
//! each artifact still needs. The [`link`] pass then binds every promise
//! against the complete artifact set and hands back a [`LinkedGraph`], the
//! only place bound promises can be read. [`Selection`] decides which
//! protocol variants apply once the graph is linked.

pub mod artifact;
mod compile;
pub mod context;
pub mod entities;
pub mod error;
pub mod link;
pub mod location;
pub mod options;
pub mod project;
pub mod protocol;
pub mod resolver;
pub mod select;
pub mod store;
pub mod walker;

pub use artifact::{Artifact, ArtifactId, ArtifactKind, Body, Narrow, RefTarget};
pub use context::CompileContext;
pub use error::{BuildError, CompileError, Diagnostic, LinkError, LinkErrors, ResolveError, Severity};
pub use link::{link, LinkedGraph, ListPromise, Promise, Query, RefId};
pub use location::Location;
pub use options::{CompileOptions, DEFAULT_CONTENT_TYPE};
pub use project::Project;
pub use protocol::{ProtoVariant, ProtocolBuilder, ProtocolRegistry};
pub use resolver::{DocumentResolver, InMemoryResolver, NoExternalDocuments};
pub use select::{GraphReport, Selection, UnitReport};
pub use store::{ArtifactStore, DocumentStore};
