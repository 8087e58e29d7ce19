//! Core type definitions for API specification documents

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AsyncApi {
    #[serde(default)]
    pub asyncapi: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub info: Info,
    #[serde(rename = "defaultContentType", default)]
    pub default_content_type: Option<String>,
    #[serde(default)]
    pub servers: IndexMap<String, Server>,
    #[serde(default)]
    pub channels: IndexMap<String, Channel>,
    #[serde(default)]
    pub components: Option<Components>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Server {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
    /// Security requirements: each entry maps a scheme name to its scopes.
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    #[serde(default)]
    pub bindings: Option<ServerBindings>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerVariable {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "enum", default)]
    pub allowed: Vec<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Channel {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Names of the top-level servers this channel is available on.
    /// `None` means every server.
    #[serde(default)]
    pub servers: Option<Vec<String>>,
    #[serde(default)]
    pub publish: Option<Operation>,
    #[serde(default)]
    pub subscribe: Option<Operation>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub bindings: Option<ChannelBindings>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    #[serde(default)]
    pub bindings: Option<OperationBindings>,
    #[serde(default)]
    pub message: Option<OperationMessage>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

/// An operation carries either a single message or a `oneOf` list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OperationMessage {
    OneOf(OneOfMessages),
    Single(Box<Message>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OneOfMessages {
    #[serde(rename = "oneOf")]
    pub one_of: Vec<Message>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Message {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub headers: Option<Box<Schema>>,
    #[serde(default)]
    pub payload: Option<Box<Schema>>,
    #[serde(rename = "correlationId", default)]
    pub correlation_id: Option<CorrelationId>,
    #[serde(default)]
    pub bindings: Option<MessageBindings>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorrelationId {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Parameter {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Box<Schema>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "type", default)]
    pub scheme_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Header, query or cookie name for `httpApiKey` schemes.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", default)]
    pub bearer_format: Option<String>,
    #[serde(rename = "openIdConnectUrl", default)]
    pub open_id_connect_url: Option<String>,
    #[serde(default)]
    pub flows: Option<Value>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

/// JSON Schema subset understood by the data-model compiler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Schema {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "type", default)]
    pub schema_type: Option<SchemaType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    #[serde(rename = "const", default)]
    pub const_value: Option<Value>,
    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<Schema>,
    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<Schema>,
    #[serde(rename = "allOf", default)]
    pub all_of: Vec<Schema>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(rename = "x-name", default)]
    pub x_name: Option<String>,
    #[serde(rename = "x-ignore", default)]
    pub x_ignore: bool,
}

/// `type` may be a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Many(Vec<String>),
}

impl SchemaType {
    pub fn names(&self) -> Vec<&str> {
        match self {
            SchemaType::Single(name) => vec![name.as_str()],
            SchemaType::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// `additionalProperties` is either a flag or a schema for the values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub servers: IndexMap<String, Server>,
    #[serde(rename = "serverVariables", default)]
    pub server_variables: IndexMap<String, ServerVariable>,
    #[serde(default)]
    pub channels: IndexMap<String, Channel>,
    #[serde(default)]
    pub messages: IndexMap<String, Message>,
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(rename = "correlationIds", default)]
    pub correlation_ids: IndexMap<String, CorrelationId>,
    #[serde(rename = "serverBindings", default)]
    pub server_bindings: IndexMap<String, ServerBindings>,
    #[serde(rename = "channelBindings", default)]
    pub channel_bindings: IndexMap<String, ChannelBindings>,
    #[serde(rename = "operationBindings", default)]
    pub operation_bindings: IndexMap<String, OperationBindings>,
    #[serde(rename = "messageBindings", default)]
    pub message_bindings: IndexMap<String, MessageBindings>,
}

macro_rules! bindings_map {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, Deserialize, Serialize)]
            pub struct $name {
                #[serde(rename = "$ref", default)]
                pub reference: Option<String>,
                /// Raw protocol-specific data keyed by protocol name.
                #[serde(flatten)]
                pub protocols: IndexMap<String, Value>,
            }
        )*
    };
}

bindings_map! {
    /// Protocol-specific server settings.
    ServerBindings,
    /// Protocol-specific channel settings.
    ChannelBindings,
    /// Protocol-specific operation settings.
    OperationBindings,
    /// Protocol-specific message settings.
    MessageBindings,
}
