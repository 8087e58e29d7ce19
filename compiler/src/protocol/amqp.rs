use super::{decode, decode_seed, BindingsValue, ProtoVariant, ProtocolBuilder, VariantSeed};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct Amqp;

/// AMQP defines no server bindings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelBindings {
    #[serde(rename = "is", skip_serializing_if = "Option::is_none")]
    kind: Option<ChannelKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exchange: Option<Exchange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue: Option<Queue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
enum ChannelKind {
    RoutingKey,
    Queue,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Exchange {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    exchange_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    durable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vhost: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Queue {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    durable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vhost: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    cc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivery_mode: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mandatory: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    bcc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ack: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

impl ProtocolBuilder for Amqp {
    fn protocol(&self) -> &'static str {
        "amqp"
    }

    fn title(&self) -> &'static str {
        "Amqp"
    }

    fn server_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<ServerBindings>(raw, &[])
    }

    fn channel_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<ChannelBindings>(raw, &[])
    }

    fn operation_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<OperationBindings>(raw, &[])
    }

    fn message_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<MessageBindings>(raw, &[])
    }

    /// Routing-key channels publish to an exchange named after the channel
    /// unless the bindings name one; queue channels consume from a queue.
    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: ChannelBindings = decode_seed(seed.bindings)?;
        let variant = self.variant(seed);
        Ok(match bindings.kind.unwrap_or(ChannelKind::RoutingKey) {
            ChannelKind::RoutingKey => {
                let exchange = bindings.exchange.unwrap_or_default();
                variant
                    .with_attribute("is", "routingKey")
                    .with_attribute(
                        "exchange",
                        exchange.name.as_deref().unwrap_or(seed.address),
                    )
                    .with_optional("exchangeType", exchange.exchange_type)
            }
            ChannelKind::Queue => {
                let queue = bindings.queue.unwrap_or_default();
                variant
                    .with_attribute("is", "queue")
                    .with_attribute("queue", queue.name.as_deref().unwrap_or(seed.address))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_server_key_is_dropped() {
        let raw = json!({ "bindingVersion": "0.2.0", "foo": "bar" });
        let decoded = Amqp.server_bindings(&raw).unwrap();
        assert_eq!(decoded.value, json!({ "bindingVersion": "0.2.0" }));
    }

    #[test]
    fn test_queue_channel_variant() {
        let raw = json!({ "is": "queue", "queue": { "name": "lights", "durable": true } });
        let seed = VariantSeed {
            name: "Lights",
            address: "lights/measured",
            bindings: Some(&raw),
        };
        let variant = Amqp.channel(&seed).unwrap();
        assert_eq!(variant.attributes["is"], "queue");
        assert_eq!(variant.attributes["queue"], "lights");
    }

    #[test]
    fn test_routing_key_defaults_to_address() {
        let seed = VariantSeed {
            name: "Lights",
            address: "lights/measured",
            bindings: None,
        };
        let variant = Amqp.channel(&seed).unwrap();
        assert_eq!(variant.attributes["exchange"], "lights/measured");
    }

    #[test]
    fn test_invalid_channel_kind() {
        assert!(Amqp.channel_bindings(&json!({ "is": "topic" })).is_err());
    }
}
