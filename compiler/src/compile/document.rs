use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::Root;
use crate::error::CompileError;
use asyncgen_spec::AsyncApi;
use tracing::info;

/// The root artifact. Also fixes the document default content type for
/// every message compiled after it.
pub(super) fn compile(ctx: &mut CompileContext<'_>, doc: &AsyncApi) -> Result<(), CompileError> {
    ctx.set_default_content_type(doc.default_content_type.clone());

    let name = if doc.info.title.is_empty() {
        ctx.document().to_string()
    } else {
        doc.info.title.clone()
    };
    info!(
        document = %ctx.document(),
        asyncapi = %doc.asyncapi,
        servers = doc.servers.len(),
        channels = doc.channels.len(),
        "compiling document"
    );

    let location = ctx.location();
    ctx.add(Artifact::new(
        ArtifactKind::Root,
        name,
        location,
        Body::Root(Root {
            title: doc.info.title.clone(),
            version: doc.info.version.clone(),
            description: doc.info.description.clone(),
            document_id: doc.id.clone(),
            default_content_type: doc.default_content_type.clone(),
        }),
    ))?;
    Ok(())
}
