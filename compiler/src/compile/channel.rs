use super::{compile_ref, entity_name, protocol_error};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::{Bindings, Channel, ChannelServers, Operation, Parameter, Schema, Server};
use crate::error::CompileError;
use crate::location::Location;
use crate::protocol::VariantSeed;
use asyncgen_spec as spec;
use indexmap::IndexMap;

pub(super) fn compile(ctx: &mut CompileContext<'_>, channel: &spec::Channel) -> Result<(), CompileError> {
    if let Some(reference) = &channel.reference {
        return compile_ref(ctx, reference, ArtifactKind::Channel, channel.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, channel.x_name.as_deref(), Some("channels"));
    let address = location.last().unwrap_or_default().to_string();

    let servers = match &channel.servers {
        Some(names) => ChannelServers::Named(
            names
                .iter()
                .map(|server| {
                    let target = Location::new(ctx.document().clone(), ["servers", server.as_str()]);
                    ctx.promise_to::<Server>(target)
                })
                .collect(),
        ),
        None => {
            let document = ctx.document().clone();
            ChannelServers::All(ctx.store().list_promise::<Server>(
                location.clone(),
                "every visible server",
                move |artifact| {
                    let location = artifact.location();
                    artifact.kind() == ArtifactKind::Server
                        && artifact.is_visible()
                        && location.has_prefix(&document, &["servers"])
                        && location.segments().len() == 2
                },
            ))
        }
    };

    let parameters = channel
        .parameters
        .keys()
        .map(|key| {
            let promise = ctx.promise_child::<Parameter>(&["parameters", key]);
            (key.clone(), promise)
        })
        .collect();
    let publish = channel
        .publish
        .as_ref()
        .map(|_| ctx.promise_child::<Operation>(&["publish"]));
    let subscribe = channel
        .subscribe
        .as_ref()
        .map(|_| ctx.promise_child::<Operation>(&["subscribe"]));
    let bindings = channel
        .bindings
        .as_ref()
        .map(|_| ctx.promise_child::<Bindings>(&["bindings"]));

    let mut variants = IndexMap::new();
    for builder in ctx.protocols().iter() {
        let protocol = builder.protocol();
        let seed = VariantSeed {
            name: &name,
            address: &address,
            bindings: channel.bindings.as_ref().and_then(|b| b.protocols.get(protocol)),
        };
        let variant = builder
            .channel(&seed)
            .map_err(|e| protocol_error(&location.join("bindings"), protocol, e))?;
        variants.insert(protocol.to_string(), variant);
    }

    ctx.add(
        Artifact::new(
            ArtifactKind::Channel,
            name,
            location,
            Body::Channel(Channel {
                address,
                description: channel.description.clone(),
                server_names: channel.servers.clone(),
                servers,
                parameters,
                publish,
                subscribe,
                bindings,
                variants,
            }),
        )
        .selectable(true)
        .visible(!channel.x_ignore),
    )?;
    Ok(())
}

pub(super) fn compile_parameter(
    ctx: &mut CompileContext<'_>,
    parameter: &spec::Parameter,
) -> Result<(), CompileError> {
    if let Some(reference) = &parameter.reference {
        return compile_ref(ctx, reference, ArtifactKind::Parameter, parameter.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, parameter.x_name.as_deref(), None);
    let definition = ctx.is_definition();
    let schema = parameter
        .schema
        .as_ref()
        .map(|_| ctx.promise_child::<Schema>(&["schema"]));

    ctx.add(
        Artifact::new(
            ArtifactKind::Parameter,
            name,
            location,
            Body::Parameter(Parameter {
                description: parameter.description.clone(),
                schema,
                location: parameter.location.clone(),
            }),
        )
        .selectable(definition),
    )?;
    Ok(())
}
