use super::{compile_ref, entity_name};
use crate::artifact::{Artifact, ArtifactKind, Body};
use crate::context::CompileContext;
use crate::entities::{Field, Schema, SchemaShape};
use crate::error::CompileError;
use crate::link::Promise;
use asyncgen_spec::{self as spec, AdditionalProperties, Tags};

pub(super) fn compile(ctx: &mut CompileContext<'_>, schema: &spec::Schema) -> Result<(), CompileError> {
    if let Some(reference) = &schema.reference {
        return compile_ref(ctx, reference, ArtifactKind::Schema, schema.x_name.as_deref());
    }

    let location = ctx.location();
    let name = entity_name(ctx, schema.x_name.as_deref(), None);
    let (shape, nullable) = shape(ctx, schema);

    let object_with_fields = matches!(&shape, SchemaShape::Object { fields, .. } if !fields.is_empty());
    let selectable = !ctx.tags().contains(Tags::INLINE)
        && (ctx.is_definition() || ctx.is_data_model_root() || object_with_fields);

    ctx.add(
        Artifact::new(
            ArtifactKind::Schema,
            name,
            location,
            Body::Schema(Schema {
                title: schema.title.clone(),
                description: schema.description.clone(),
                nullable: schema.nullable || nullable,
                default: schema.default.clone(),
                enum_values: schema.enum_values.clone(),
                const_value: schema.const_value.clone(),
                shape,
            }),
        )
        .selectable(selectable)
        .visible(!schema.x_ignore),
    )?;
    Ok(())
}

/// Shape of a schema and whether its type list admits `null`.
///
/// Combinators win over `type`. Without a `type` the shape is inferred
/// from the keywords present.
fn shape(ctx: &mut CompileContext<'_>, schema: &spec::Schema) -> (SchemaShape, bool) {
    if !schema.one_of.is_empty() {
        let variants = indexed(ctx, "oneOf", schema.one_of.len());
        return (SchemaShape::Union { variants, exclusive: true }, false);
    }
    if !schema.any_of.is_empty() {
        let variants = indexed(ctx, "anyOf", schema.any_of.len());
        return (SchemaShape::Union { variants, exclusive: false }, false);
    }
    if !schema.all_of.is_empty() {
        let parts = indexed(ctx, "allOf", schema.all_of.len());
        return (SchemaShape::AllOf { parts }, false);
    }

    let names: Vec<&str> = schema
        .schema_type
        .as_ref()
        .map(|t| t.names())
        .unwrap_or_default();
    let nullable = names.contains(&"null");
    let names: Vec<&str> = names.into_iter().filter(|name| *name != "null").collect();

    let shape = match names.as_slice() {
        ["object"] => object(ctx, schema),
        ["array"] => array(ctx, schema),
        [primitive] => SchemaShape::Primitive {
            type_name: primitive.to_string(),
            format: schema.format.clone(),
        },
        [] if !schema.properties.is_empty() || schema_values(schema) => object(ctx, schema),
        [] if schema.items.is_some() => array(ctx, schema),
        [] => SchemaShape::Any,
        many => SchemaShape::Mixed(many.iter().map(|name| name.to_string()).collect()),
    };
    (shape, nullable)
}

fn schema_values(schema: &spec::Schema) -> bool {
    matches!(schema.additional_properties, Some(AdditionalProperties::Schema(_)))
}

fn object(ctx: &mut CompileContext<'_>, schema: &spec::Schema) -> SchemaShape {
    let additional = schema_values(schema).then(|| ctx.promise_child::<Schema>(&["additionalProperties"]));

    if schema.properties.is_empty() {
        if let Some(values) = additional {
            return SchemaShape::Map { values };
        }
    }

    let fields = schema
        .properties
        .keys()
        .map(|key| Field {
            name: key.clone(),
            required: schema.required.contains(key),
            schema: ctx.promise_child::<Schema>(&["properties", key]),
        })
        .collect();
    SchemaShape::Object { fields, additional }
}

fn array(ctx: &mut CompileContext<'_>, schema: &spec::Schema) -> SchemaShape {
    let items = schema
        .items
        .as_ref()
        .map(|_| ctx.promise_child::<Schema>(&["items"]));
    SchemaShape::Array { items }
}

fn indexed(ctx: &mut CompileContext<'_>, keyword: &str, len: usize) -> Vec<Promise<Schema>> {
    (0..len)
        .map(|index| ctx.promise_child::<Schema>(&[keyword, &index.to_string()]))
        .collect()
}
