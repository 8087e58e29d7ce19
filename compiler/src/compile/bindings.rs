use super::{compile_ref, entity_name};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::Bindings;
use crate::error::{CompileError, Diagnostic};
use asyncgen_spec::{BindingsKind, BindingsSource};
use indexmap::IndexMap;

/// Decode every protocol entry of a bindings object through its builder.
///
/// Extension keys are skipped. A protocol without a builder is reported
/// and skipped; a builder rejecting its data fails the document.
pub(super) fn compile(ctx: &mut CompileContext<'_>, source: BindingsSource<'_>) -> Result<(), CompileError> {
    if let Some(reference) = source.reference {
        return compile_ref(ctx, reference, ArtifactKind::Bindings, None);
    }

    let location = ctx.location();
    let name = entity_name(ctx, None, None);
    let definition = ctx.is_definition();

    let mut values = IndexMap::new();
    for (protocol, raw) in source.protocols {
        if protocol.starts_with("x-") {
            continue;
        }
        let Some(builder) = ctx.protocols().get(protocol) else {
            ctx.diagnose(
                Diagnostic::warning(location.clone(), "bindings for an unknown protocol were ignored")
                    .with_protocol(protocol.clone()),
            );
            continue;
        };
        let decoded = match source.kind {
            BindingsKind::Server => builder.server_bindings(raw),
            BindingsKind::Channel => builder.channel_bindings(raw),
            BindingsKind::Operation => builder.operation_bindings(raw),
            BindingsKind::Message => builder.message_bindings(raw),
        };
        let value = decoded.map_err(|e| CompileError::ProtocolDecode {
            location: location.clone(),
            protocol: protocol.clone(),
            message: e.to_string(),
        })?;
        values.insert(protocol.clone(), value);
    }

    ctx.add(
        Artifact::new(
            ArtifactKind::Bindings,
            name,
            location,
            Body::Bindings(Bindings {
                kind: source.kind,
                values,
            }),
        )
        .selectable(definition),
    )?;
    Ok(())
}
