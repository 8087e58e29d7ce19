use super::{compile_ref, entity_name, protocol_error};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::{Bindings, CorrelationId, Message, Schema};
use crate::error::CompileError;
use crate::protocol::VariantSeed;
use asyncgen_spec as spec;
use indexmap::IndexMap;

pub(super) fn compile(ctx: &mut CompileContext<'_>, message: &spec::Message) -> Result<(), CompileError> {
    if let Some(reference) = &message.reference {
        return compile_ref(ctx, reference, ArtifactKind::Message, message.x_name.as_deref());
    }

    let location = ctx.location();
    let declared = message.x_name.as_deref().or(message.name.as_deref());
    let name = entity_name(ctx, declared, None);
    let content_type = message
        .content_type
        .clone()
        .unwrap_or_else(|| ctx.default_content_type().to_string());

    let headers = message
        .headers
        .as_ref()
        .map(|_| ctx.promise_child::<Schema>(&["headers"]));
    let payload = message
        .payload
        .as_ref()
        .map(|_| ctx.promise_child::<Schema>(&["payload"]));
    let correlation_id = message
        .correlation_id
        .as_ref()
        .map(|_| ctx.promise_child::<CorrelationId>(&["correlationId"]));
    let bindings = message
        .bindings
        .as_ref()
        .map(|_| ctx.promise_child::<Bindings>(&["bindings"]));

    let mut variants = IndexMap::new();
    for builder in ctx.protocols().iter() {
        let protocol = builder.protocol();
        let seed = VariantSeed {
            name: &name,
            address: &content_type,
            bindings: message.bindings.as_ref().and_then(|b| b.protocols.get(protocol)),
        };
        let variant = builder
            .message(&seed)
            .map_err(|e| protocol_error(&location.join("bindings"), protocol, e))?;
        variants.insert(protocol.to_string(), variant);
    }

    ctx.add(
        Artifact::new(
            ArtifactKind::Message,
            name,
            location,
            Body::Message(Message {
                message_id: message.message_id.clone(),
                title: message.title.clone(),
                summary: message.summary.clone(),
                description: message.description.clone(),
                content_type,
                headers,
                payload,
                correlation_id,
                bindings,
                variants,
            }),
        )
        .selectable(true)
        .visible(!message.x_ignore),
    )?;
    Ok(())
}

pub(super) fn compile_correlation_id(
    ctx: &mut CompileContext<'_>,
    correlation: &spec::CorrelationId,
) -> Result<(), CompileError> {
    if let Some(reference) = &correlation.reference {
        return compile_ref(ctx, reference, ArtifactKind::Other, correlation.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, correlation.x_name.as_deref(), None);
    let definition = ctx.is_definition();
    ctx.add(
        Artifact::new(
            ArtifactKind::Other,
            name,
            location,
            Body::CorrelationId(CorrelationId {
                description: correlation.description.clone(),
                location: correlation.location.clone(),
            }),
        )
        .selectable(definition),
    )?;
    Ok(())
}
