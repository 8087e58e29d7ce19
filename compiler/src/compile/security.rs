use super::{compile_ref, entity_name};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::SecurityScheme;
use crate::error::CompileError;
use asyncgen_spec as spec;

pub(super) fn compile(
    ctx: &mut CompileContext<'_>,
    scheme: &spec::SecurityScheme,
) -> Result<(), CompileError> {
    if let Some(reference) = &scheme.reference {
        return compile_ref(ctx, reference, ArtifactKind::Security, scheme.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, scheme.x_name.as_deref(), None);
    let definition = ctx.is_definition();
    ctx.add(
        Artifact::new(
            ArtifactKind::Security,
            name,
            location,
            Body::Security(SecurityScheme {
                scheme_type: scheme.scheme_type.clone(),
                description: scheme.description.clone(),
                name: scheme.name.clone(),
                location: scheme.location.clone(),
                scheme: scheme.scheme.clone(),
                bearer_format: scheme.bearer_format.clone(),
                open_id_connect_url: scheme.open_id_connect_url.clone(),
                flows: scheme.flows.clone(),
            }),
        )
        .selectable(definition)
        .visible(!scheme.x_ignore),
    )?;
    Ok(())
}
