//! Artifacts are the compiled units stored per document.
//!
//! Every artifact carries a common header (name, kind, selectability,
//! visibility and location) and a body that is either a concrete entity or
//! a [`RefTarget`] standing in for some other artifact.

use crate::entities::*;
use crate::link::RefId;
use crate::location::Location;
use serde::Serialize;
use std::fmt;

/// Stable identity of an artifact: its document and its index in that
/// document's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArtifactId {
    pub(crate) document: u32,
    pub(crate) index: u32,
}

impl ArtifactId {
    pub(crate) fn new(document: u32, index: u32) -> Self {
        Self { document, index }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Schema,
    Server,
    Channel,
    Operation,
    Message,
    Parameter,
    Security,
    Bindings,
    Root,
    Other,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Schema => "schema",
            ArtifactKind::Server => "server",
            ArtifactKind::Channel => "channel",
            ArtifactKind::Operation => "operation",
            ArtifactKind::Message => "message",
            ArtifactKind::Parameter => "parameter",
            ArtifactKind::Security => "security",
            ArtifactKind::Bindings => "bindings",
            ArtifactKind::Root => "root",
            ArtifactKind::Other => "other",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference artifact. Its target is bound by the linker.
#[derive(Debug)]
pub struct RefTarget {
    pub(crate) id: RefId,
    pub target: Location,
    /// Name to render under instead of the target's own name.
    pub name_override: Option<String>,
    /// Replaces the target's selectability when set.
    pub selectable_override: Option<bool>,
}

impl RefTarget {
    pub fn id(&self) -> RefId {
        self.id
    }
}

#[derive(Debug)]
pub enum Body {
    Root(Root),
    Server(Server),
    ServerVariable(ServerVariable),
    Channel(Channel),
    Operation(Operation),
    Message(Message),
    CorrelationId(CorrelationId),
    Parameter(Parameter),
    Security(SecurityScheme),
    Schema(Schema),
    Bindings(Bindings),
    Ref(RefTarget),
}

impl Body {
    pub fn is_ref(&self) -> bool {
        matches!(self, Body::Ref(_))
    }

    /// Human readable label used in narrowing errors.
    pub fn label(&self) -> &'static str {
        match self {
            Body::Root(_) => "document root",
            Body::Server(_) => "server",
            Body::ServerVariable(_) => "server variable",
            Body::Channel(_) => "channel",
            Body::Operation(_) => "operation",
            Body::Message(_) => "message",
            Body::CorrelationId(_) => "correlation id",
            Body::Parameter(_) => "parameter",
            Body::Security(_) => "security scheme",
            Body::Schema(_) => "schema",
            Body::Bindings(_) => "bindings",
            Body::Ref(_) => "reference",
        }
    }
}

#[derive(Debug)]
pub struct Artifact {
    pub(crate) name: String,
    pub(crate) kind: ArtifactKind,
    pub(crate) selectable: bool,
    pub(crate) visible: bool,
    pub(crate) location: Location,
    pub(crate) body: Body,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, name: impl Into<String>, location: Location, body: Body) -> Self {
        Self {
            name: name.into(),
            kind,
            selectable: false,
            visible: true,
            location,
            body,
        }
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Own selectability flag. References are resolved through
    /// `LinkedGraph::is_selectable`.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Typed view of an artifact body.
///
/// Implemented by every concrete entity so typed promises can check and
/// extract the body they expect.
pub trait Narrow: Sized + 'static {
    const KIND: ArtifactKind;
    const LABEL: &'static str;

    fn narrow(body: &Body) -> Option<&Self>;
}

macro_rules! narrow {
    ($($ty:ident => $variant:ident, $kind:ident, $label:literal;)*) => {
        $(
            impl Narrow for $ty {
                const KIND: ArtifactKind = ArtifactKind::$kind;
                const LABEL: &'static str = $label;

                fn narrow(body: &Body) -> Option<&Self> {
                    match body {
                        Body::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

narrow! {
    Root => Root, Root, "document root";
    Server => Server, Server, "server";
    ServerVariable => ServerVariable, Other, "server variable";
    Channel => Channel, Channel, "channel";
    Operation => Operation, Operation, "operation";
    Message => Message, Message, "message";
    CorrelationId => CorrelationId, Other, "correlation id";
    Parameter => Parameter, Parameter, "parameter";
    SecurityScheme => Security, Security, "security scheme";
    Schema => Schema, Schema, "schema";
    Bindings => Bindings, Bindings, "bindings";
}
