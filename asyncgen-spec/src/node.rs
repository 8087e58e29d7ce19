//! Structural view over the document tree.
//!
//! Every document type exposes its shape as one of a closed set of node
//! views (map, sequence, union, record, scalar) and optionally an
//! [`Entity`] describing its compile capability. Consumers walk the tree
//! through [`Node::view`] without knowing the concrete types.

use crate::types::*;
use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
    /// Flags attached to record fields and carried by walker frames.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Tags: u8 {
        /// The subtree is a data model; inherited by every descendant.
        const DATA_MODEL = 0b0001;
        /// The field is a definitions section; its direct entries are
        /// standalone definitions.
        const DEFINITION = 0b0010;
        /// Data models below are always inlined into their owner.
        const INLINE = 0b0100;
    }
}

impl Tags {
    /// Tags that survive into descendant frames.
    pub const INHERITED: Tags = Tags::DATA_MODEL.union(Tags::INLINE);

    pub fn inherited(self) -> Tags {
        self & Tags::INHERITED
    }
}

/// A single field of a record node.
pub struct FieldView<'a> {
    pub name: &'static str,
    pub tags: Tags,
    pub node: &'a dyn Node,
}

pub enum NodeView<'a> {
    /// Ordered map; entries in insertion order.
    Map(Vec<(&'a str, &'a dyn Node)>),
    Seq(Vec<&'a dyn Node>),
    /// Tagged union; carries the active variant, if any.
    Union(Option<&'a dyn Node>),
    Record(Vec<FieldView<'a>>),
    Scalar,
}

/// Which bindings section a bindings node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingsKind {
    Server,
    Channel,
    Operation,
    Message,
}

impl BindingsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingsKind::Server => "server",
            BindingsKind::Channel => "channel",
            BindingsKind::Operation => "operation",
            BindingsKind::Message => "message",
        }
    }
}

/// Raw bindings data shared by the four bindings sections.
#[derive(Debug, Clone, Copy)]
pub struct BindingsSource<'a> {
    pub kind: BindingsKind,
    pub reference: Option<&'a str>,
    pub protocols: &'a IndexMap<String, serde_json::Value>,
}

/// Compile capability of a node.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Document(&'a AsyncApi),
    Server(&'a Server),
    ServerVariable(&'a ServerVariable),
    Channel(&'a Channel),
    Operation(&'a Operation),
    Message(&'a Message),
    CorrelationId(&'a CorrelationId),
    Parameter(&'a Parameter),
    SecurityScheme(&'a SecurityScheme),
    Schema(&'a Schema),
    Bindings(BindingsSource<'a>),
}

pub trait Node {
    fn view(&self) -> NodeView<'_>;

    fn entity(&self) -> Option<Entity<'_>> {
        None
    }
}

fn field<'a>(name: &'static str, tags: Tags, node: &'a dyn Node) -> FieldView<'a> {
    FieldView { name, tags, node }
}

impl<T: Node> Node for IndexMap<String, T> {
    fn view(&self) -> NodeView<'_> {
        NodeView::Map(
            self.iter()
                .map(|(key, value)| (key.as_str(), value as &dyn Node))
                .collect(),
        )
    }
}

impl<T: Node> Node for Vec<T> {
    fn view(&self) -> NodeView<'_> {
        NodeView::Seq(self.iter().map(|item| item as &dyn Node).collect())
    }
}

impl<T: Node> Node for Option<T> {
    fn view(&self) -> NodeView<'_> {
        NodeView::Union(self.as_ref().map(|inner| inner as &dyn Node))
    }
}

impl<T: Node> Node for Box<T> {
    fn view(&self) -> NodeView<'_> {
        self.as_ref().view()
    }

    fn entity(&self) -> Option<Entity<'_>> {
        self.as_ref().entity()
    }
}

impl Node for AsyncApi {
    fn view(&self) -> NodeView<'_> {
        NodeView::Record(vec![
            field("servers", Tags::empty(), &self.servers),
            field("channels", Tags::empty(), &self.channels),
            field("components", Tags::empty(), &self.components),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Document(self))
    }
}

impl Node for Components {
    fn view(&self) -> NodeView<'_> {
        NodeView::Record(vec![
            field("schemas", Tags::DEFINITION | Tags::DATA_MODEL, &self.schemas),
            field("servers", Tags::DEFINITION, &self.servers),
            field("serverVariables", Tags::DEFINITION, &self.server_variables),
            field("channels", Tags::DEFINITION, &self.channels),
            field("messages", Tags::DEFINITION, &self.messages),
            field("securitySchemes", Tags::DEFINITION, &self.security_schemes),
            field("parameters", Tags::DEFINITION, &self.parameters),
            field("correlationIds", Tags::DEFINITION, &self.correlation_ids),
            field("serverBindings", Tags::DEFINITION, &self.server_bindings),
            field("channelBindings", Tags::DEFINITION, &self.channel_bindings),
            field("operationBindings", Tags::DEFINITION, &self.operation_bindings),
            field("messageBindings", Tags::DEFINITION, &self.message_bindings),
        ])
    }
}

impl Node for Server {
    fn view(&self) -> NodeView<'_> {
        if self.reference.is_some() {
            return NodeView::Scalar;
        }
        NodeView::Record(vec![
            field("variables", Tags::empty(), &self.variables),
            field("bindings", Tags::empty(), &self.bindings),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Server(self))
    }
}

impl Node for ServerVariable {
    fn view(&self) -> NodeView<'_> {
        NodeView::Scalar
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::ServerVariable(self))
    }
}

impl Node for Channel {
    fn view(&self) -> NodeView<'_> {
        if self.reference.is_some() {
            return NodeView::Scalar;
        }
        NodeView::Record(vec![
            field("publish", Tags::empty(), &self.publish),
            field("subscribe", Tags::empty(), &self.subscribe),
            field("parameters", Tags::empty(), &self.parameters),
            field("bindings", Tags::empty(), &self.bindings),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Channel(self))
    }
}

impl Node for Operation {
    fn view(&self) -> NodeView<'_> {
        NodeView::Record(vec![
            field("bindings", Tags::empty(), &self.bindings),
            field("message", Tags::empty(), &self.message),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Operation(self))
    }
}

impl Node for OperationMessage {
    fn view(&self) -> NodeView<'_> {
        match self {
            OperationMessage::OneOf(one_of) => NodeView::Union(Some(one_of as &dyn Node)),
            OperationMessage::Single(message) => NodeView::Union(Some(message as &dyn Node)),
        }
    }
}

impl Node for OneOfMessages {
    fn view(&self) -> NodeView<'_> {
        NodeView::Record(vec![field("oneOf", Tags::empty(), &self.one_of)])
    }
}

impl Node for Message {
    fn view(&self) -> NodeView<'_> {
        if self.reference.is_some() {
            return NodeView::Scalar;
        }
        NodeView::Record(vec![
            field("headers", Tags::DATA_MODEL, &self.headers),
            field("payload", Tags::DATA_MODEL, &self.payload),
            field("correlationId", Tags::empty(), &self.correlation_id),
            field("bindings", Tags::empty(), &self.bindings),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Message(self))
    }
}

impl Node for CorrelationId {
    fn view(&self) -> NodeView<'_> {
        NodeView::Scalar
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::CorrelationId(self))
    }
}

impl Node for Parameter {
    fn view(&self) -> NodeView<'_> {
        if self.reference.is_some() {
            return NodeView::Scalar;
        }
        NodeView::Record(vec![field(
            "schema",
            Tags::DATA_MODEL | Tags::INLINE,
            &self.schema,
        )])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Parameter(self))
    }
}

impl Node for SecurityScheme {
    fn view(&self) -> NodeView<'_> {
        NodeView::Scalar
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::SecurityScheme(self))
    }
}

impl Node for Schema {
    fn view(&self) -> NodeView<'_> {
        if self.reference.is_some() {
            return NodeView::Scalar;
        }
        NodeView::Record(vec![
            field("properties", Tags::DATA_MODEL, &self.properties),
            field("items", Tags::DATA_MODEL, &self.items),
            field(
                "additionalProperties",
                Tags::DATA_MODEL,
                &self.additional_properties,
            ),
            field("oneOf", Tags::DATA_MODEL, &self.one_of),
            field("anyOf", Tags::DATA_MODEL, &self.any_of),
            field("allOf", Tags::DATA_MODEL, &self.all_of),
        ])
    }

    fn entity(&self) -> Option<Entity<'_>> {
        Some(Entity::Schema(self))
    }
}

impl Node for AdditionalProperties {
    fn view(&self) -> NodeView<'_> {
        match self {
            AdditionalProperties::Flag(_) => NodeView::Union(None),
            AdditionalProperties::Schema(schema) => NodeView::Union(Some(schema as &dyn Node)),
        }
    }
}

macro_rules! bindings_node {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            impl Node for $name {
                fn view(&self) -> NodeView<'_> {
                    NodeView::Scalar
                }

                fn entity(&self) -> Option<Entity<'_>> {
                    Some(Entity::Bindings(BindingsSource {
                        kind: BindingsKind::$kind,
                        reference: self.reference.as_deref(),
                        protocols: &self.protocols,
                    }))
                }
            }
        )*
    };
}

bindings_node! {
    ServerBindings => Server,
    ChannelBindings => Channel,
    OperationBindings => Operation,
    MessageBindings => Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document_content;

    fn record_fields(node: &dyn Node) -> Vec<(&'static str, Tags)> {
        match node.view() {
            NodeView::Record(fields) => fields.iter().map(|f| (f.name, f.tags)).collect(),
            _ => panic!("expected a record node"),
        }
    }

    #[test]
    fn test_inherited_tags() {
        let tags = Tags::DEFINITION | Tags::DATA_MODEL;
        assert_eq!(tags.inherited(), Tags::DATA_MODEL);
        assert_eq!(Tags::INLINE.inherited(), Tags::INLINE);
        assert_eq!(Tags::DEFINITION.inherited(), Tags::empty());
    }

    #[test]
    fn test_map_view_preserves_insertion_order() {
        let doc = parse_document_content(
            r#"{
                "channels": {
                    "zeta": {},
                    "alpha": {},
                    "mid": {}
                }
            }"#,
        )
        .unwrap();

        let keys: Vec<&str> = match doc.channels.view() {
            NodeView::Map(entries) => entries.iter().map(|(k, _)| *k).collect(),
            _ => panic!("channels should be a map node"),
        };
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reference_nodes_are_leaves() {
        let doc = parse_document_content(
            r##"{
                "channels": {
                    "a": { "$ref": "#/components/channels/b" }
                }
            }"##,
        )
        .unwrap();

        let channel = &doc.channels["a"];
        assert!(matches!(channel.view(), NodeView::Scalar));
        assert!(matches!(channel.entity(), Some(Entity::Channel(_))));
    }

    #[test]
    fn test_components_sections_are_definitions() {
        let components = Components::default();
        let fields = record_fields(&components);
        assert_eq!(fields.len(), 12);
        assert!(fields.iter().all(|(_, tags)| tags.contains(Tags::DEFINITION)));
        assert!(fields
            .iter()
            .any(|(name, tags)| *name == "schemas" && tags.contains(Tags::DATA_MODEL)));
    }

    #[test]
    fn test_box_forwards_entity() {
        let schema: Box<Schema> = Box::default();
        assert!(matches!(schema.entity(), Some(Entity::Schema(_))));
    }

    #[test]
    fn test_single_and_one_of_messages() {
        let doc = parse_document_content(
            r#"{
                "channels": {
                    "single": { "publish": { "message": { "name": "A" } } },
                    "many": { "publish": { "message": { "oneOf": [ { "name": "B" }, { "name": "C" } ] } } }
                }
            }"#,
        )
        .unwrap();

        let single = doc.channels["single"].publish.as_ref().unwrap();
        assert!(matches!(single.message, Some(OperationMessage::Single(_))));

        let many = doc.channels["many"].publish.as_ref().unwrap();
        match &many.message {
            Some(OperationMessage::OneOf(one_of)) => assert_eq!(one_of.one_of.len(), 2),
            other => panic!("expected oneOf, got {:?}", other),
        }
    }

    #[test]
    fn test_bindings_entity_carries_protocols() {
        let doc = parse_document_content(
            r#"{
                "servers": {
                    "prod": {
                        "url": "broker:9092",
                        "protocol": "kafka",
                        "bindings": { "kafka": { "clientId": "svc" }, "mqtt": {} }
                    }
                }
            }"#,
        )
        .unwrap();

        let bindings = doc.servers["prod"].bindings.as_ref().unwrap();
        match bindings.entity() {
            Some(Entity::Bindings(source)) => {
                assert_eq!(source.kind, BindingsKind::Server);
                let protocols: Vec<&String> = source.protocols.keys().collect();
                assert_eq!(protocols, vec!["kafka", "mqtt"]);
            }
            _ => panic!("expected bindings entity"),
        }
    }
}
