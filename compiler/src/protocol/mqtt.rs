use super::{decode, decode_seed, BindingsValue, ProtoVariant, ProtocolBuilder, VariantSeed};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct Mqtt;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clean_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_will: Option<LastWill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_expiry_interval: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum_packet_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct LastWill {
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qos: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retain: Option<bool>,
}

/// MQTT defines no channel bindings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    qos: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_expiry_interval: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_format_indicator: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_topic: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

impl ProtocolBuilder for Mqtt {
    fn protocol(&self) -> &'static str {
        "mqtt"
    }

    fn title(&self) -> &'static str {
        "Mqtt"
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
        decode::<MessageBindings>(raw, &["correlationData"])
    }

    fn server(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: ServerBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("broker", seed.address)
            .with_optional("clientId", bindings.client_id)
            .with_optional("cleanSession", bindings.clean_session)
            .with_optional("keepAlive", bindings.keep_alive))
    }

    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        Ok(self.variant(seed).with_attribute("topic", seed.address))
    }
}
