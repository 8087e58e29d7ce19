use super::{compile_ref, entity_name, protocol_error, security_promises};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::{Bindings, Server, ServerVariable};
use crate::error::{CompileError, Diagnostic};
use crate::protocol::VariantSeed;
use asyncgen_spec as spec;
use indexmap::IndexMap;

pub(super) fn compile(ctx: &mut CompileContext<'_>, server: &spec::Server) -> Result<(), CompileError> {
    if let Some(reference) = &server.reference {
        return compile_ref(ctx, reference, ArtifactKind::Server, server.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, server.x_name.as_deref(), Some("servers"));

    let variables = server
        .variables
        .keys()
        .map(|key| {
            let promise = ctx.promise_child::<ServerVariable>(&["variables", key]);
            (key.clone(), promise)
        })
        .collect();
    let security = security_promises(ctx, &server.security);
    let bindings = server
        .bindings
        .as_ref()
        .map(|_| ctx.promise_child::<Bindings>(&["bindings"]));

    if !ctx.protocols().contains(&server.protocol) {
        ctx.diagnose(
            Diagnostic::warning(
                location.clone(),
                "no builder registered for this protocol",
            )
            .with_protocol(server.protocol.clone()),
        );
    }

    let mut variants = IndexMap::new();
    for builder in ctx.protocols().iter() {
        let protocol = builder.protocol();
        let seed = VariantSeed {
            name: &name,
            address: &server.url,
            bindings: server.bindings.as_ref().and_then(|b| b.protocols.get(protocol)),
        };
        let variant = builder
            .server(&seed)
            .map_err(|e| protocol_error(&location.join("bindings"), protocol, e))?;
        variants.insert(protocol.to_string(), variant);
    }

    ctx.add(
        Artifact::new(
            ArtifactKind::Server,
            name,
            location,
            Body::Server(Server {
                url: server.url.clone(),
                protocol: server.protocol.clone(),
                protocol_version: server.protocol_version.clone(),
                description: server.description.clone(),
                variables,
                security,
                bindings,
                variants,
            }),
        )
        .selectable(true)
        .visible(!server.x_ignore),
    )?;
    Ok(())
}

pub(super) fn compile_variable(
    ctx: &mut CompileContext<'_>,
    variable: &spec::ServerVariable,
) -> Result<(), CompileError> {
    if let Some(reference) = &variable.reference {
        return compile_ref(ctx, reference, ArtifactKind::Other, None);
    }

    let location = ctx.location();
    let name = entity_name(ctx, None, None);
    let definition = ctx.is_definition();
    ctx.add(
        Artifact::new(
            ArtifactKind::Other,
            name,
            location,
            Body::ServerVariable(ServerVariable {
                allowed: variable.allowed.clone(),
                default: variable.default.clone(),
                description: variable.description.clone(),
                examples: variable.examples.clone(),
            }),
        )
        .selectable(definition),
    )?;
    Ok(())
}
