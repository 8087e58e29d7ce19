//! Protocol builders.
//!
//! A [`ProtocolBuilder`] decodes the protocol-specific bindings of one
//! protocol and derives protocol variants of abstract servers, channels and
//! messages. Builders are held in a [`ProtocolRegistry`] owned by the
//! compile run; compile hooks look builders up by protocol name.

mod amqp;
mod http;
mod kafka;
mod mqtt;
mod ws;

pub use amqp::Amqp;
pub use http::Http;
pub use kafka::Kafka;
pub use mqtt::Mqtt;
pub use ws::WebSocket;

use crate::error::CompileError;
use crate::options::CompileOptions;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Decoded bindings of a single protocol.
#[derive(Debug, Clone, Serialize)]
pub struct BindingsValue {
    /// Recognized keys only, normalized through the protocol's schema.
    pub value: Value,
    /// Fields that hold JSON schemas, kept raw for data-model emission.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Value>,
}

/// Protocol-specific form of an abstract server, channel or message.
#[derive(Debug, Clone, Serialize)]
pub struct ProtoVariant {
    pub protocol: String,
    pub name: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Value>,
}

impl ProtoVariant {
    pub fn new(protocol: &str, name: impl Into<String>) -> Self {
        Self {
            protocol: protocol.to_string(),
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_optional(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with_attribute(key, value),
            None => self,
        }
    }
}

/// What a builder sees when deriving a variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantSeed<'a> {
    /// Display name of the abstract entity.
    pub name: &'a str,
    /// Channel address, server URL or message content type.
    pub address: &'a str,
    /// Inline bindings for this builder's protocol, when present.
    pub bindings: Option<&'a Value>,
}

pub trait ProtocolBuilder: Send + Sync {
    fn protocol(&self) -> &'static str;

    /// Suffix appended to variant names, e.g. `Kafka`.
    fn title(&self) -> &'static str;

    fn server_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error>;
    fn channel_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error>;
    fn operation_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error>;
    fn message_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error>;

    fn server(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        Ok(self.variant(seed))
    }

    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        Ok(self.variant(seed))
    }

    fn message(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        Ok(self.variant(seed))
    }

    fn variant(&self, seed: &VariantSeed<'_>) -> ProtoVariant {
        ProtoVariant::new(self.protocol(), format!("{}{}", seed.name, self.title()))
    }
}

/// Decode `raw` through `T`, dropping unknown keys, and lift the named
/// schema fields out of the normalized value.
pub(crate) fn decode<T>(raw: &Value, schema_fields: &[&str]) -> Result<BindingsValue, serde_json::Error>
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = serde_json::from_value(raw.clone())?;
    let value = serde_json::to_value(&typed)?;
    let schemas = schema_fields
        .iter()
        .filter_map(|field| value.get(*field).map(|schema| (field.to_string(), schema.clone())))
        .collect();
    Ok(BindingsValue { value, schemas })
}

/// Decode `raw` into `T` for variant derivation. Absent bindings decode as
/// the default.
pub(crate) fn decode_seed<T>(raw: Option<&Value>) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    match raw {
        Some(raw) => serde_json::from_value(raw.clone()),
        None => Ok(T::default()),
    }
}

/// Builders available to a compile run, keyed by protocol name.
#[derive(Default)]
pub struct ProtocolRegistry {
    builders: IndexMap<&'static str, Box<dyn ProtocolBuilder>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in protocol.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Amqp);
        registry.register(Http);
        registry.register(Kafka);
        registry.register(Mqtt);
        registry.register(WebSocket);
        registry
    }

    /// Built-in protocols narrowed to the ones enabled in `options`.
    pub fn from_options(options: &CompileOptions) -> Result<Self, CompileError> {
        let builtin = Self::with_defaults();
        let Some(enabled) = &options.protocols else {
            return Ok(builtin);
        };

        let mut registry = Self::new();
        let mut builders = builtin.builders;
        for name in enabled {
            let Some((key, builder)) = builders.shift_remove_entry(name.as_str()) else {
                return Err(CompileError::UnknownProtocol(name.clone()));
            };
            registry.builders.insert(key, builder);
        }
        Ok(registry)
    }

    /// Add or replace the builder for its protocol.
    pub fn register(&mut self, builder: impl ProtocolBuilder + 'static) {
        self.builders.insert(builder.protocol(), Box::new(builder));
    }

    pub fn get(&self, protocol: &str) -> Option<&dyn ProtocolBuilder> {
        self.builders.get(protocol).map(|builder| builder.as_ref())
    }

    pub fn contains(&self, protocol: &str) -> bool {
        self.builders.contains_key(protocol)
    }

    pub fn protocols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builders.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ProtocolBuilder> {
        self.builders.values().map(|builder| builder.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_protocols() {
        let registry = ProtocolRegistry::with_defaults();
        let names: Vec<&str> = registry.protocols().collect();
        assert_eq!(names, vec!["amqp", "http", "kafka", "mqtt", "ws"]);
        assert!(registry.get("kafka").is_some());
        assert!(registry.get("nats").is_none());
    }

    #[test]
    fn test_registry_from_options() {
        let options = CompileOptions::default().with_protocols(["mqtt", "kafka"]);
        let registry = ProtocolRegistry::from_options(&options).unwrap();
        let names: Vec<&str> = registry.protocols().collect();
        assert_eq!(names, vec!["mqtt", "kafka"]);

        let options = CompileOptions::default().with_protocols(["nats"]);
        let err = ProtocolRegistry::from_options(&options).err().unwrap();
        assert!(matches!(err, CompileError::UnknownProtocol(name) if name == "nats"));
    }

    #[test]
    fn test_default_variant_name() {
        let seed = VariantSeed {
            name: "Lights",
            address: "lights",
            bindings: None,
        };
        let variant = Kafka.variant(&seed);
        assert_eq!(variant.protocol, "kafka");
        assert_eq!(variant.name, "LightsKafka");
    }

    #[test]
    fn test_decode_lifts_schema_fields() {
        let raw = json!({
            "key": { "type": "string" },
            "schemaIdLocation": "payload",
            "unknown": true
        });
        let decoded = Kafka.message_bindings(&raw).unwrap();
        assert!(decoded.value.get("unknown").is_none());
        assert_eq!(decoded.schemas["key"], json!({ "type": "string" }));
    }
}
