use super::{decode, decode_seed, BindingsValue, ProtoVariant, ProtocolBuilder, VariantSeed};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct Kafka;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_registry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_registry_vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    partitions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic_configuration: Option<TopicConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TopicConfiguration {
    #[serde(rename = "cleanup.policy", skip_serializing_if = "Vec::is_empty", default)]
    cleanup_policy: Vec<String>,
    #[serde(rename = "retention.ms", skip_serializing_if = "Option::is_none")]
    retention_ms: Option<i64>,
    #[serde(rename = "retention.bytes", skip_serializing_if = "Option::is_none")]
    retention_bytes: Option<i64>,
    #[serde(rename = "delete.retention.ms", skip_serializing_if = "Option::is_none")]
    delete_retention_ms: Option<i64>,
    #[serde(rename = "max.message.bytes", skip_serializing_if = "Option::is_none")]
    max_message_bytes: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_id_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_id_payload_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_lookup_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

impl ProtocolBuilder for Kafka {
    fn protocol(&self) -> &'static str {
        "kafka"
    }

    fn title(&self) -> &'static str {
        "Kafka"
    }

    fn server_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<ServerBindings>(raw, &[])
    }

    fn channel_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<ChannelBindings>(raw, &[])
    }

    fn operation_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<OperationBindings>(raw, &["groupId", "clientId"])
    }

    fn message_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<MessageBindings>(raw, &["key"])
    }

    fn server(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: ServerBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("bootstrap", seed.address)
            .with_optional("schemaRegistryUrl", bindings.schema_registry_url))
    }

    /// The topic defaults to the channel address.
    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: ChannelBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("topic", bindings.topic.as_deref().unwrap_or(seed.address))
            .with_optional("partitions", bindings.partitions)
            .with_optional("replicas", bindings.replicas))
    }

    fn message(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: MessageBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("keyed", bindings.key.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_topic_defaults_to_address() {
        let seed = VariantSeed {
            name: "Orders",
            address: "orders/created",
            bindings: None,
        };
        let variant = Kafka.channel(&seed).unwrap();
        assert_eq!(variant.name, "OrdersKafka");
        assert_eq!(variant.attributes["topic"], "orders/created");
        assert!(!variant.attributes.contains_key("partitions"));
    }

    #[test]
    fn test_channel_bindings_override_topic() {
        let raw = json!({ "topic": "orders.v1", "partitions": 6, "replicas": 3 });
        let seed = VariantSeed {
            name: "Orders",
            address: "orders/created",
            bindings: Some(&raw),
        };
        let variant = Kafka.channel(&seed).unwrap();
        assert_eq!(variant.attributes["topic"], "orders.v1");
        assert_eq!(variant.attributes["partitions"], 6);
    }

    #[test]
    fn test_malformed_channel_bindings() {
        let raw = json!({ "partitions": "many" });
        assert!(Kafka.channel_bindings(&raw).is_err());
    }

    #[test]
    fn test_topic_configuration_keys() {
        let raw = json!({
            "topic": "orders",
            "topicConfiguration": { "cleanup.policy": ["compact"], "retention.ms": 604800000 }
        });
        let decoded = Kafka.channel_bindings(&raw).unwrap();
        assert_eq!(
            decoded.value["topicConfiguration"]["cleanup.policy"],
            json!(["compact"])
        );
    }
}
