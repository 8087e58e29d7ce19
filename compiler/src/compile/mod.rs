//! Compile hooks, one per entity.
//!
//! Each hook reads the node it was called for, registers exactly one
//! artifact at the current location and records promises for every edge to
//! another artifact. Hooks never look at other artifacts directly; the
//! linker binds the promises later.

mod bindings;
mod channel;
mod document;
mod message;
mod operation;
mod schema;
mod security;
mod server;

use crate::artifact::{Artifact, ArtifactKind, Body, RefTarget};
use crate::context::CompileContext;
use crate::entities::SecurityScheme;
use crate::error::CompileError;
use crate::link::Promise;
use crate::location::Location;
use asyncgen_spec::{name_from_segments, Entity};
use indexmap::IndexMap;
use tracing::debug;

pub(crate) fn compile_entity(
    ctx: &mut CompileContext<'_>,
    entity: Entity<'_>,
) -> Result<(), CompileError> {
    match entity {
        Entity::Document(doc) => document::compile(ctx, doc),
        Entity::Server(server) => server::compile(ctx, server),
        Entity::ServerVariable(variable) => server::compile_variable(ctx, variable),
        Entity::Channel(channel) => channel::compile(ctx, channel),
        Entity::Parameter(parameter) => channel::compile_parameter(ctx, parameter),
        Entity::Operation(operation) => operation::compile(ctx, operation),
        Entity::Message(message) => message::compile(ctx, message),
        Entity::CorrelationId(correlation) => message::compile_correlation_id(ctx, correlation),
        Entity::SecurityScheme(scheme) => security::compile(ctx, scheme),
        Entity::Schema(schema) => schema::compile(ctx, schema),
        Entity::Bindings(source) => bindings::compile(ctx, source),
    }
}

/// Display name of the entity at the current location.
///
/// `x-name` wins. Definitions and entries of the given top-level section
/// keep their map key; everything else is named after its location.
pub(crate) fn entity_name(
    ctx: &CompileContext<'_>,
    x_name: Option<&str>,
    section: Option<&str>,
) -> String {
    if let Some(name) = x_name {
        return name.to_string();
    }
    let location = ctx.location();
    let keyed = ctx.is_definition() || section.is_some_and(|section| ctx.is_top_level(section));
    match location.last() {
        Some(key) if keyed => key.to_string(),
        _ => name_from_segments(location.segments()),
    }
}

/// Register a reference artifact of `kind` at the current location.
///
/// Inside a definitions section the reference is an alias: it keeps the
/// map key as its name and is selectable. Elsewhere it stands in for its
/// target and is never selected itself. An `x-name` beside the `$ref`
/// overrides the name in both cases.
pub(crate) fn compile_ref(
    ctx: &mut CompileContext<'_>,
    reference: &str,
    kind: ArtifactKind,
    x_name: Option<&str>,
) -> Result<(), CompileError> {
    let location = ctx.location();
    let target = Location::parse_ref(ctx.document(), reference).map_err(|reason| {
        CompileError::InvalidReference {
            location: location.clone(),
            reference: reference.to_string(),
            reason,
        }
    })?;

    let definition = ctx.is_definition();
    let name_override = match x_name {
        Some(name) => Some(name.to_string()),
        None if definition => location.last().map(str::to_string),
        None => None,
    };
    let name = name_override
        .clone()
        .or_else(|| target.last().map(str::to_string))
        .unwrap_or_else(|| target.document().to_string());

    debug!(%location, %target, %kind, "compiled reference");
    let id = ctx
        .store()
        .reference(location.clone(), target.clone(), kind);
    ctx.add(
        Artifact::new(
            kind,
            name,
            location,
            Body::Ref(RefTarget {
                id,
                target,
                name_override,
                selectable_override: Some(definition),
            }),
        )
        .selectable(definition),
    )?;
    Ok(())
}

/// Promises for the schemes named by security requirements.
pub(crate) fn security_promises(
    ctx: &mut CompileContext<'_>,
    requirements: &[IndexMap<String, Vec<String>>],
) -> Vec<Promise<SecurityScheme>> {
    requirements
        .iter()
        .flat_map(|requirement| requirement.keys())
        .map(|scheme| ctx.promise_component::<SecurityScheme>("securitySchemes", scheme))
        .collect()
}

pub(crate) fn protocol_error(
    location: &Location,
    protocol: &str,
    error: serde_json::Error,
) -> CompileError {
    CompileError::ProtocolDecode {
        location: location.clone(),
        protocol: protocol.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use crate::project::Project;
    use crate::protocol::ProtocolRegistry;
    use crate::resolver::NoExternalDocuments;
    use crate::store::DocumentStore;
    use asyncgen_spec::Tags;

    #[test]
    fn test_entity_name_rules() {
        let mut store = DocumentStore::new(0, "main.json");
        let options = CompileOptions::default();
        let protocols = ProtocolRegistry::with_defaults();
        let mut ctx = CompileContext::new(&mut store, &options, &protocols);

        ctx.push("channels", Tags::empty());
        ctx.push("user/signup", Tags::empty());
        assert_eq!(entity_name(&ctx, None, Some("channels")), "user/signup");
        assert_eq!(entity_name(&ctx, Some("Signup"), Some("channels")), "Signup");

        ctx.push("publish", Tags::empty());
        ctx.push("message", Tags::empty());
        assert_eq!(entity_name(&ctx, None, None), "UserSignupPublishMessage");
    }

    #[test]
    fn test_invalid_reference_is_fatal() {
        let mut store = DocumentStore::new(0, "main.json");
        let options = CompileOptions::default();
        let protocols = ProtocolRegistry::with_defaults();
        let mut ctx = CompileContext::new(&mut store, &options, &protocols);
        ctx.push("channels", Tags::empty());
        ctx.push("a", Tags::empty());

        let err = compile_ref(&mut ctx, "#components/channels/b", ArtifactKind::Channel, None)
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidReference { .. }));
        assert!(err.to_string().starts_with("path=main.json#/channels/a"));
    }

    #[test]
    fn test_x_name_beside_ref_overrides_name() {
        let doc = asyncgen_spec::parse_document_content(
            r##"{
                "channels": {
                    "plain": { "$ref": "#/components/channels/Core" },
                    "named": { "$ref": "#/components/channels/Core", "x-name": "EdgeFeed" }
                },
                "components": { "channels": { "Core": {} } }
            }"##,
        )
        .unwrap();
        let graph = Project::new(CompileOptions::default(), &NoExternalDocuments)
            .unwrap()
            .build("main.json", &doc)
            .unwrap();

        let at = |segments: [&str; 2]| graph.find(&Location::new("main.json", segments)).unwrap();
        assert_eq!(graph.display_name(at(["channels", "plain"])), "Core");
        assert_eq!(graph.display_name(at(["channels", "named"])), "EdgeFeed");
        assert!(!graph.is_selectable(at(["channels", "named"])));
    }
}
