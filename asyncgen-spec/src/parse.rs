//! Document decoding utilities

use crate::error::SpecError;
use crate::types::AsyncApi;
use std::fs;
use std::path::Path;

pub fn parse_document_file<P: AsRef<Path>>(path: P) -> Result<AsyncApi, SpecError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SpecError::ParseError {
        path: path.display().to_string(),
        source: format!("failed to read file: {}", e),
    })?;

    parse_document_content(&content).map_err(|e| match e {
        SpecError::ParseError { source, .. } => SpecError::ParseError {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

pub fn parse_document_content(content: &str) -> Result<AsyncApi, SpecError> {
    let document: AsyncApi =
        serde_json::from_str(content).map_err(|e| SpecError::ParseError {
            path: "<memory>".to_string(),
            source: e.to_string(),
        })?;

    tracing::debug!(
        title = %document.info.title,
        servers = document.servers.len(),
        channels = document.channels.len(),
        "decoded document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdditionalProperties, OperationMessage, SchemaType};

    #[test]
    fn test_minimal_document_parses_with_defaults() {
        let doc = parse_document_content(r#"{ "asyncapi": "2.6.0" }"#)
            .expect("minimal document should parse");

        assert_eq!(doc.asyncapi, "2.6.0");
        assert!(doc.servers.is_empty());
        assert!(doc.channels.is_empty());
        assert!(doc.components.is_none());
        assert!(doc.default_content_type.is_none());
    }

    #[test]
    fn test_servers_keep_declaration_order() {
        let json = r#"{
            "asyncapi": "2.6.0",
            "info": { "title": "Orders", "version": "1.0.0" },
            "servers": {
                "zeta": { "url": "kafka:9092", "protocol": "kafka" },
                "alpha": { "url": "mqtt://broker", "protocol": "mqtt" }
            }
        }"#;
        let doc = parse_document_content(json).unwrap();

        let names: Vec<&str> = doc.servers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(doc.servers["alpha"].protocol, "mqtt");
        assert_eq!(doc.info.title, "Orders");
    }

    #[test]
    fn test_references_and_extensions() {
        let json = r##"{
            "channels": {
                "user/signup": {
                    "x-name": "Signup",
                    "x-ignore": true,
                    "publish": {
                        "message": { "$ref": "#/components/messages/UserSignedUp" }
                    }
                }
            }
        }"##;
        let doc = parse_document_content(json).unwrap();
        let channel = &doc.channels["user/signup"];

        assert_eq!(channel.x_name.as_deref(), Some("Signup"));
        assert!(channel.x_ignore);
        match &channel.publish.as_ref().unwrap().message {
            Some(OperationMessage::Single(message)) => assert_eq!(
                message.reference.as_deref(),
                Some("#/components/messages/UserSignedUp")
            ),
            other => panic!("expected a single message, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_unions() {
        let json = r#"{
            "components": {
                "schemas": {
                    "Tags": {
                        "type": ["object", "null"],
                        "additionalProperties": { "type": "string" }
                    },
                    "Closed": {
                        "type": "object",
                        "additionalProperties": false
                    }
                }
            }
        }"#;
        let doc = parse_document_content(json).unwrap();
        let schemas = &doc.components.as_ref().unwrap().schemas;

        let tags = &schemas["Tags"];
        assert_eq!(
            tags.schema_type,
            Some(SchemaType::Many(vec!["object".into(), "null".into()]))
        );
        assert!(matches!(
            tags.additional_properties,
            Some(AdditionalProperties::Schema(_))
        ));
        assert!(matches!(
            schemas["Closed"].additional_properties,
            Some(AdditionalProperties::Flag(false))
        ));
    }

    #[test]
    fn test_bindings_flatten_protocols() {
        let json = r##"{
            "components": {
                "channelBindings": {
                    "orders": {
                        "kafka": { "topic": "orders", "partitions": 3 },
                        "amqp": { "is": "routingKey" }
                    },
                    "shared": { "$ref": "#/components/channelBindings/orders" }
                }
            }
        }"##;
        let doc = parse_document_content(json).unwrap();
        let bindings = &doc.components.as_ref().unwrap().channel_bindings;

        let orders = &bindings["orders"];
        assert!(orders.reference.is_none());
        assert_eq!(orders.protocols.len(), 2);
        assert_eq!(orders.protocols["kafka"]["partitions"], 3);

        let shared = &bindings["shared"];
        assert!(shared.protocols.is_empty());
        assert!(shared.reference.is_some());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_document_content("{ not json").unwrap_err();
        assert!(matches!(err, SpecError::ParseError { .. }));
        assert!(err.to_string().starts_with("Parse error in <memory>"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = parse_document_file("/definitely/not/here.json").unwrap_err();
        let SpecError::ParseError { path, .. } = err;
        assert!(path.ends_with("here.json"));
    }
}
