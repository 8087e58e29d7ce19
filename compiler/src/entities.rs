//! Artifact bodies for every compiled entity.
//!
//! Bodies own copies of the document data they need. Edges to other
//! artifacts are promises bound by the linker and read through
//! `LinkedGraph`.

use crate::link::{ListPromise, Promise};
use crate::protocol::{BindingsValue, ProtoVariant};
use asyncgen_spec::BindingsKind;
use indexmap::IndexMap;
use serde_json::Value;

/// The document root.
#[derive(Debug)]
pub struct Root {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub document_id: Option<String>,
    pub default_content_type: Option<String>,
}

#[derive(Debug)]
pub struct Server {
    pub url: String,
    pub protocol: String,
    pub protocol_version: Option<String>,
    pub description: Option<String>,
    pub variables: Vec<(String, Promise<ServerVariable>)>,
    pub security: Vec<Promise<SecurityScheme>>,
    pub bindings: Option<Promise<Bindings>>,
    /// Protocol variants keyed by protocol name, one per registered builder.
    pub variants: IndexMap<String, ProtoVariant>,
}

#[derive(Debug)]
pub struct ServerVariable {
    pub allowed: Vec<String>,
    pub default: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<String>,
}

/// Servers a channel is available on.
#[derive(Debug)]
pub enum ChannelServers {
    /// The channel names its servers.
    Named(Vec<Promise<Server>>),
    /// No list given: every visible server of the document.
    All(ListPromise<Server>),
}

#[derive(Debug)]
pub struct Channel {
    pub address: String,
    pub description: Option<String>,
    /// Declared server names, `None` when the channel lists none.
    pub server_names: Option<Vec<String>>,
    pub servers: ChannelServers,
    pub parameters: Vec<(String, Promise<Parameter>)>,
    pub publish: Option<Promise<Operation>>,
    pub subscribe: Option<Promise<Operation>>,
    pub bindings: Option<Promise<Bindings>>,
    pub variants: IndexMap<String, ProtoVariant>,
}

impl Channel {
    pub fn operations(&self) -> impl Iterator<Item = &Promise<Operation>> {
        self.publish.iter().chain(self.subscribe.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Publish,
    Subscribe,
}

impl Direction {
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "publish" => Some(Direction::Publish),
            "subscribe" => Some(Direction::Subscribe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Publish => "publish",
            Direction::Subscribe => "subscribe",
        }
    }
}

#[derive(Debug)]
pub struct Operation {
    pub direction: Direction,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// The owning channel.
    pub channel: Promise<Channel>,
    pub messages: Vec<Promise<Message>>,
    pub security: Vec<Promise<SecurityScheme>>,
    pub bindings: Option<Promise<Bindings>>,
}

#[derive(Debug)]
pub struct Message {
    pub message_id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Declared content type, else the document default, else the
    /// configured fallback.
    pub content_type: String,
    pub headers: Option<Promise<Schema>>,
    pub payload: Option<Promise<Schema>>,
    pub correlation_id: Option<Promise<CorrelationId>>,
    pub bindings: Option<Promise<Bindings>>,
    pub variants: IndexMap<String, ProtoVariant>,
}

#[derive(Debug)]
pub struct CorrelationId {
    pub description: Option<String>,
    pub location: String,
}

#[derive(Debug)]
pub struct Parameter {
    pub description: Option<String>,
    pub schema: Option<Promise<Schema>>,
    pub location: Option<String>,
}

#[derive(Debug)]
pub struct SecurityScheme {
    pub scheme_type: String,
    pub description: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub open_id_connect_url: Option<String>,
    pub flows: Option<Value>,
}

#[derive(Debug)]
pub struct Schema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub nullable: bool,
    pub default: Option<Value>,
    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,
    pub shape: SchemaShape,
}

#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub required: bool,
    pub schema: Promise<Schema>,
}

#[derive(Debug)]
pub enum SchemaShape {
    Object {
        fields: Vec<Field>,
        additional: Option<Promise<Schema>>,
    },
    /// Object without properties whose values follow one schema.
    Map { values: Promise<Schema> },
    Array { items: Option<Promise<Schema>> },
    Primitive {
        type_name: String,
        format: Option<String>,
    },
    /// Several primitive type names, e.g. `["string", "integer"]`.
    Mixed(Vec<String>),
    Union {
        variants: Vec<Promise<Schema>>,
        exclusive: bool,
    },
    AllOf { parts: Vec<Promise<Schema>> },
    Any,
}

/// Decoded protocol bindings, keyed by protocol name.
#[derive(Debug)]
pub struct Bindings {
    pub kind: BindingsKind,
    pub values: IndexMap<String, BindingsValue>,
}
