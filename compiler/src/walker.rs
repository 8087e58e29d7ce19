//! Depth-first document walk.
//!
//! The walker visits every node of a document through its [`NodeView`],
//! keeping the frame stack of the [`CompileContext`] in step with the
//! location. Nodes with an [`Entity`] are compiled before their children.
//! The first compile error aborts the walk.
//!
//! [`Entity`]: asyncgen_spec::Entity

use crate::compile;
use crate::context::CompileContext;
use crate::error::CompileError;
use asyncgen_spec::{Node, NodeView, Tags};

pub fn walk(ctx: &mut CompileContext<'_>, node: &dyn Node) -> Result<(), CompileError> {
    if let Some(entity) = node.entity() {
        compile::compile_entity(ctx, entity)?;
    }

    match node.view() {
        NodeView::Map(entries) => {
            for (key, child) in entries {
                ctx.push(key, Tags::empty());
                walk(ctx, child)?;
                ctx.pop();
            }
        }
        NodeView::Seq(items) => {
            for (index, child) in items.into_iter().enumerate() {
                ctx.push(index.to_string(), Tags::empty());
                walk(ctx, child)?;
                ctx.pop();
            }
        }
        NodeView::Union(Some(active)) => walk(ctx, active)?,
        NodeView::Union(None) | NodeView::Scalar => {}
        NodeView::Record(fields) => {
            for field in fields {
                ctx.push(field.name, field.tags);
                walk(ctx, field.node)?;
                ctx.pop();
            }
        }
    }
    Ok(())
}
