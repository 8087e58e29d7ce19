use super::{decode, decode_seed, BindingsValue, ProtoVariant, ProtocolBuilder, VariantSeed};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct WebSocket;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Empty {
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

impl ProtocolBuilder for WebSocket {
    fn protocol(&self) -> &'static str {
        "ws"
    }

    fn title(&self) -> &'static str {
        "WebSocket"
    }

    fn server_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<Empty>(raw, &[])
    }

    fn channel_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<ChannelBindings>(raw, &["query", "headers"])
    }

    fn operation_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<Empty>(raw, &[])
    }

    fn message_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<Empty>(raw, &[])
    }

    /// The handshake method defaults to GET.
    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: ChannelBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("path", seed.address)
            .with_attribute("method", bindings.method.as_deref().unwrap_or("GET")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handshake_method_default() {
        let seed = VariantSeed {
            name: "Events",
            address: "/events",
            bindings: None,
        };
        assert_eq!(WebSocket.channel(&seed).unwrap().attributes["method"], "GET");

        let raw = json!({ "method": "POST", "headers": { "type": "object" } });
        let decoded = WebSocket.channel_bindings(&raw).unwrap();
        assert!(decoded.schemas.contains_key("headers"));
    }
}
