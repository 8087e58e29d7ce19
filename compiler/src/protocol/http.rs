use super::{decode, decode_seed, BindingsValue, ProtoVariant, ProtocolBuilder, VariantSeed};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct Http;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Empty {
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binding_version: Option<String>,
}

impl ProtocolBuilder for Http {
    fn protocol(&self) -> &'static str {
        "http"
    }

    fn title(&self) -> &'static str {
        "Http"
    }

    fn server_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<Empty>(raw, &[])
    }

    fn channel_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<Empty>(raw, &[])
    }

    fn operation_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<OperationBindings>(raw, &["query"])
    }

    fn message_bindings(&self, raw: &Value) -> Result<BindingsValue, serde_json::Error> {
        decode::<MessageBindings>(raw, &["headers"])
    }

    fn channel(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        Ok(self.variant(seed).with_attribute("path", seed.address))
    }

    fn message(&self, seed: &VariantSeed<'_>) -> Result<ProtoVariant, serde_json::Error> {
        let bindings: MessageBindings = decode_seed(seed.bindings)?;
        Ok(self
            .variant(seed)
            .with_attribute("contentType", seed.address)
            .with_optional("statusCode", bindings.status_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_schema_is_lifted() {
        let raw = json!({ "method": "GET", "query": { "type": "object" } });
        let decoded = Http.operation_bindings(&raw).unwrap();
        assert_eq!(decoded.value["method"], "GET");
        assert_eq!(decoded.schemas["query"], json!({ "type": "object" }));
    }
}
