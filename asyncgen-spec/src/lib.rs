//! Document model for asyncgen
//!
//! This crate provides the typed, order-preserving document tree for
//! asynchronous API specifications together with a reflection-free
//! structural view ([`node::Node`]) that the compiler walks.

pub mod error;
pub mod node;
pub mod parse;
pub mod search;
pub mod types;
pub mod utils;

pub use error::*;
pub use parse::{parse_document_content, parse_document_file};
pub use node::{BindingsKind, BindingsSource, Entity, FieldView, Node, NodeView, Tags};
pub use search::*;
pub use types::*;
pub use utils::{name_from_segments, to_pascal_case, to_snake_case};
