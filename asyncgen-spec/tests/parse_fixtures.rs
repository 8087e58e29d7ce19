use asyncgen_spec::parse::parse_document_file;
use asyncgen_spec::{search_document, DocumentSection, OperationMessage};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_parse_streetlights() {
    let doc = parse_document_file(fixture_path("streetlights.json"))
        .expect("should parse streetlights.json");

    assert_eq!(doc.info.title, "Streetlights API");
    assert_eq!(doc.servers.len(), 2, "streetlights should have 2 servers");
    assert_eq!(doc.channels.len(), 3, "streetlights should have 3 channels");
    assert_eq!(
        doc.default_content_type.as_deref(),
        Some("application/json")
    );

    let components = doc.components.as_ref().expect("components present");
    assert_eq!(components.messages.len(), 2);
    assert_eq!(components.schemas.len(), 3);
}

#[test]
fn test_streetlights_channel_shapes() {
    let doc = parse_document_file(fixture_path("streetlights.json")).unwrap();

    let measured = &doc.channels["smartylighting/streetlights/{streetlightId}/lighting/measured"];
    assert!(measured.servers.is_none(), "measured channel has no server list");
    assert!(measured.subscribe.is_some());
    assert!(measured.publish.is_none());

    let dim = &doc.channels["smartylighting/streetlights/{streetlightId}/action/dim"];
    assert_eq!(dim.servers.as_deref(), Some(&["production".to_string()][..]));
    match &dim.publish.as_ref().unwrap().message {
        Some(OperationMessage::Single(message)) => {
            assert!(message.reference.is_none());
            assert!(message.payload.is_some());
        }
        other => panic!("expected inline message, got {:?}", other),
    }
}

#[test]
fn test_search_streetlights() {
    let doc = parse_document_file(fixture_path("streetlights.json")).unwrap();
    let results = search_document(&doc, "turn");

    assert!(results
        .iter()
        .any(|r| r.name == "turnOnOff" && r.section == DocumentSection::Message));
    assert!(results
        .iter()
        .any(|r| r.name == "turnOnOffPayload" && r.section == DocumentSection::Schema));
}
