use super::{entity_name, security_promises};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::{Bindings, Channel, Direction, Message, Operation};
use crate::error::CompileError;
use asyncgen_spec::{self as spec, to_pascal_case, OperationMessage};

pub(super) fn compile(
    ctx: &mut CompileContext<'_>,
    operation: &spec::Operation,
) -> Result<(), CompileError> {
    let location = ctx.location();
    let Some(direction) = ctx.current_key().and_then(Direction::from_key) else {
        return Err(CompileError::Malformed {
            location,
            message: "operation outside a publish or subscribe slot".to_string(),
        });
    };
    let Some(channel_location) = location.parent() else {
        return Err(CompileError::Malformed {
            location,
            message: "operation without an owning channel".to_string(),
        });
    };

    let name = match (&operation.x_name, &operation.operation_id) {
        (Some(name), _) => name.clone(),
        (None, Some(id)) => to_pascal_case(id),
        (None, None) => entity_name(ctx, None, None),
    };

    let channel = ctx.promise_to::<Channel>(channel_location);
    let messages = match &operation.message {
        None => Vec::new(),
        Some(OperationMessage::Single(_)) => vec![ctx.promise_child::<Message>(&["message"])],
        Some(OperationMessage::OneOf(one_of)) => (0..one_of.one_of.len())
            .map(|index| {
                ctx.promise_child::<Message>(&["message", "oneOf", &index.to_string()])
            })
            .collect(),
    };
    let security = security_promises(ctx, &operation.security);
    let bindings = operation
        .bindings
        .as_ref()
        .map(|_| ctx.promise_child::<Bindings>(&["bindings"]));

    let visible = !operation.x_ignore && ctx.options().direction_enabled(direction);
    ctx.add(
        Artifact::new(
            ArtifactKind::Operation,
            name,
            location,
            Body::Operation(Operation {
                direction,
                operation_id: operation.operation_id.clone(),
                summary: operation.summary.clone(),
                description: operation.description.clone(),
                channel,
                messages,
                security,
                bindings,
            }),
        )
        .selectable(true)
        .visible(visible),
    )?;
    Ok(())
}
